use dioxus::prelude::*;

use crate::io::upload::FileFormat;
use crate::notify::Notifier;
use crate::state::surface::{CellAdvisory, GridSurface};
use crate::store::{AppSettings, FileStorage, Project, ProjectStore, ThemeMode};
use crate::ui::actions;
use crate::ui::toasts::ToastSink;

#[component]
pub fn Toolbar(
    surface: Signal<GridSurface>,
    store: Signal<ProjectStore<FileStorage>>,
    settings: Signal<AppSettings>,
    active_project: Signal<Option<Project>>,
    busy: Signal<bool>,
    show_filters: Signal<bool>,
    show_projects: Signal<bool>,
    show_json_editor: Signal<bool>,
    validation: Signal<Option<Vec<CellAdvisory>>>,
    selected_row: Signal<Option<usize>>,
    selected_column: Signal<Option<String>>,
    sink: ToastSink,
) -> Element {
    let mut new_column = use_signal(String::new);
    let mut export_format = use_signal(|| settings.peek().default_format);

    let snapshot = surface.read().clone();
    let can_undo = snapshot.can_undo();
    let can_redo = snapshot.can_redo();
    let search_open = snapshot.search_open();
    let filters_visible = *show_filters.read();
    let validation_open = validation.read().is_some();
    let json_editor_open = *show_json_editor.read();
    let is_busy = *busy.read();
    let theme = settings.read().theme;
    let theme_value = theme_code(theme);
    let export_value = format_code(*export_format.read());
    let selected_width = selected_column
        .read()
        .as_ref()
        .map(|id| snapshot.column_width(id));

    rsx! {
        div { class: "toolbar",
            // File group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-import",
                    disabled: is_busy,
                    onclick: move |_| {
                        spawn(async move {
                            actions::import_file(surface, active_project, busy, sink).await;
                        });
                    },
                    "\u{1F4C2} Import"
                }
                select {
                    class: "toolbar-select toolbar-select-sm",
                    id: "select-export-format",
                    value: "{export_value}",
                    onchange: move |evt| {
                        export_format.set(format_from_code(&evt.value()));
                    },
                    option { value: "json", "JSON" }
                    option { value: "csv", "CSV" }
                    option { value: "xlsx", "Excel" }
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-export",
                    onclick: move |_| {
                        let format = *export_format.read();
                        spawn(async move {
                            actions::export_file(surface, format, sink).await;
                        });
                    },
                    "\u{1F4BE} Export"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-projects",
                    onclick: move |_| {
                        let open = *show_projects.read();
                        let mut show_projects = show_projects;
                        show_projects.set(!open);
                    },
                    "\u{1F4C1} Projects"
                }
            }
            div { class: "toolbar-separator" }

            // Edit group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-undo",
                    disabled: !can_undo,
                    onclick: move |_| {
                        surface.with_mut(|s| {
                            s.undo();
                        });
                        selected_row.set(None);
                    },
                    "\u{21A9} Undo"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-redo",
                    disabled: !can_redo,
                    onclick: move |_| {
                        surface.with_mut(|s| {
                            s.redo();
                        });
                        selected_row.set(None);
                    },
                    "\u{21AA} Redo"
                }
            }
            div { class: "toolbar-separator" }

            // Row/column group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-add-row",
                    onclick: move |_| {
                        surface.with_mut(|s| {
                            s.add_row();
                        });
                    },
                    "\u{2795} Row"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-delete-row",
                    disabled: selected_row.read().is_none(),
                    onclick: move |_| {
                        let row_index = *selected_row.read();
                        if let Some(row_index) = row_index {
                            surface.with_mut(|s| {
                                s.remove_row(row_index);
                            });
                            selected_row.set(None);
                        }
                    },
                    "\u{1F5D1} Row"
                }
                input {
                    class: "toolbar-input",
                    id: "input-new-column",
                    placeholder: "Column name",
                    value: "{new_column.read()}",
                    oninput: move |evt| {
                        new_column.set(evt.value());
                    }
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-add-column",
                    onclick: move |_| {
                        let name = new_column.read().trim().to_string();
                        surface.with_mut(|s| {
                            s.add_column(if name.is_empty() { None } else { Some(&name) });
                        });
                        new_column.set(String::new());
                    },
                    "\u{2795} Column"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-delete-column",
                    disabled: selected_column.read().is_none(),
                    onclick: move |_| {
                        let column = selected_column.read().clone();
                        if let Some(column) = column {
                            surface.with_mut(|s| {
                                s.remove_column(&column);
                            });
                            selected_column.set(None);
                        }
                    },
                    "\u{1F5D1} Column"
                }
                if let Some(width) = selected_width {
                    input {
                        class: "toolbar-input toolbar-input-sm",
                        id: "input-column-width",
                        r#type: "number",
                        min: "50",
                        max: "2000",
                        value: "{width}",
                        oninput: move |evt: Event<FormData>| {
                            let column = selected_column.read().clone();
                            if let (Some(column), Ok(width)) = (column, evt.value().parse::<u32>()) {
                                surface.with_mut(|s| s.resize_column(&column, width));
                            }
                        }
                    }
                }
            }
            div { class: "toolbar-separator" }

            // Data group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-auto-format",
                    onclick: move |_| {
                        surface.with_mut(|s| {
                            s.auto_format();
                        });
                        sink.info("Auto-formatted numeric and boolean strings");
                    },
                    "\u{2728} Auto Format"
                }
                button {
                    class: toggle_class("toolbar-btn", validation_open),
                    id: "btn-validate",
                    onclick: move |_| {
                        let mut validation = validation;
                        if validation.peek().is_some() {
                            validation.set(None);
                        } else {
                            let findings = surface.read().validate();
                            validation.set(Some(findings));
                        }
                    },
                    "\u{2714} Validate"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-clear",
                    onclick: move |_| {
                        surface.with_mut(|s| {
                            s.clear();
                        });
                        selected_row.set(None);
                        selected_column.set(None);
                        sink.info("Cleared all data");
                    },
                    "\u{1F5D1} Clear"
                }
            }
            div { class: "toolbar-separator" }

            // View group
            div { class: "toolbar-group",
                button {
                    class: toggle_class("toolbar-btn", search_open),
                    id: "btn-search",
                    onclick: move |_| {
                        surface.with_mut(|s| s.toggle_search());
                    },
                    "\u{1F50D} Search"
                }
                button {
                    class: toggle_class("toolbar-btn", json_editor_open),
                    id: "btn-json-editor",
                    onclick: move |_| {
                        let open = *show_json_editor.read();
                        let mut show_json_editor = show_json_editor;
                        show_json_editor.set(!open);
                    },
                    "\u{1F4C4} JSON"
                }
                button {
                    class: toggle_class("toolbar-btn", filters_visible),
                    id: "btn-filters",
                    onclick: move |_| {
                        let visible = *show_filters.read();
                        let mut show_filters = show_filters;
                        show_filters.set(!visible);
                        if visible {
                            surface.with_mut(|s| s.clear_filters());
                        }
                    },
                    "\u{25BD} Filters"
                }
                select {
                    class: "toolbar-select toolbar-select-sm",
                    id: "select-theme",
                    value: "{theme_value}",
                    onchange: move |evt| {
                        let next = theme_from_code(&evt.value());
                        let mut updated = settings.peek().clone();
                        updated.theme = next;
                        let mut settings = settings;
                        settings.set(updated.clone());
                        if let Err(err) = store.with_mut(|s| s.save_settings(&updated)) {
                            log::error!("saving settings failed: {err}");
                            sink.error("Failed to save settings");
                        }
                    },
                    option { value: "light", "Light" }
                    option { value: "dark", "Dark" }
                    option { value: "system", "System" }
                }
            }

            // Info area (right-aligned)
            div { class: "toolbar-info",
                if is_busy {
                    span { class: "toolbar-label busy-label", "Importing..." }
                }
                if let Some(project) = active_project.read().as_ref() {
                    span { class: "toolbar-label", id: "label-active-project", "{project.name}" }
                }
                if let Some(col) = selected_column.read().as_ref() {
                    span { class: "toolbar-label", id: "label-selected-column", "Column: {col}" }
                }
            }
        }
    }
}

fn toggle_class(base: &str, active: bool) -> String {
    if active {
        format!("{base} toolbar-btn-active")
    } else {
        base.to_string()
    }
}

fn format_code(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Json => "json",
        FileFormat::Csv => "csv",
        FileFormat::Xlsx => "xlsx",
    }
}

fn format_from_code(code: &str) -> FileFormat {
    match code {
        "csv" => FileFormat::Csv,
        "xlsx" => FileFormat::Xlsx,
        _ => FileFormat::Json,
    }
}

fn theme_code(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
        ThemeMode::System => "system",
    }
}

fn theme_from_code(code: &str) -> ThemeMode {
    match code {
        "light" => ThemeMode::Light,
        "dark" => ThemeMode::Dark,
        _ => ThemeMode::System,
    }
}
