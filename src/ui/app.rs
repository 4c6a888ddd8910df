use dioxus::prelude::*;

use crate::state::surface::{CellAdvisory, GridSurface};
use crate::store::{AppSettings, AutoSaver, FileStorage, Project, ProjectStore, ThemeMode};
use crate::ui::grid::Grid;
use crate::ui::json_editor::JsonEditorPanel;
use crate::ui::projects::ProjectPanel;
use crate::ui::toasts::{Toast, ToastHost, ToastSink};
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

#[component]
pub fn App() -> Element {
    let surface = use_signal(GridSurface::default);
    let store = use_signal(|| ProjectStore::new(FileStorage::for_app()));
    let settings = use_signal(AppSettings::default);
    let active_project = use_signal::<Option<Project>>(|| None);
    let busy = use_signal(|| false);
    let show_filters = use_signal(|| false);
    let show_projects = use_signal(|| false);
    let show_json_editor = use_signal(|| false);
    let validation = use_signal::<Option<Vec<CellAdvisory>>>(|| None);
    let selected_row = use_signal::<Option<usize>>(|| None);
    let selected_column = use_signal::<Option<String>>(|| None);

    let toasts = use_signal(Vec::<Toast>::new);
    let next_toast_id = use_signal(|| 0u64);
    let sink = ToastSink::new(toasts, next_toast_id);

    // Load persisted settings once at startup.
    use_effect({
        let mut settings = settings;
        move || {
            let loaded = store.peek().settings();
            settings.set(loaded);
        }
    });

    // Auto-save loop: polls on the configured interval and only writes when
    // the dataset actually changed.
    use_future(move || async move {
        let mut saver = AutoSaver::new();
        let mut store = store;
        let mut active_project = active_project;
        loop {
            let interval = settings.peek().auto_save_interval.max(1_000);
            tokio::time::sleep(std::time::Duration::from_millis(interval)).await;

            if !settings.peek().auto_save {
                continue;
            }
            let Some(mut project) = active_project.peek().clone() else {
                continue;
            };
            project.data = surface.peek().persisted();

            match store.with_mut(|s| saver.tick(s, &mut project)) {
                Ok(true) => active_project.set(Some(project)),
                Ok(false) => {}
                Err(err) => log::error!("auto-save failed: {err}"),
            }
        }
    });

    let theme_class = match settings.read().theme {
        ThemeMode::Light => "theme-light",
        ThemeMode::Dark => "theme-dark",
        ThemeMode::System => "theme-system",
    };

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app {theme_class}",
            Toolbar {
                surface,
                store,
                settings,
                active_project,
                busy,
                show_filters,
                show_projects,
                show_json_editor,
                validation,
                selected_row,
                selected_column,
                sink,
            }
            if validation.read().is_some() {
                ValidationPanel { validation }
            }
            div { class: "main-area",
                Grid { surface, show_filters, selected_row, selected_column }
                if *show_json_editor.read() {
                    JsonEditorPanel { surface, show_json_editor, sink }
                }
                if *show_projects.read() {
                    ProjectPanel { surface, store, active_project, show_projects, sink }
                }
            }
            ToastHost { toasts, sink }
        }
    }
}

#[component]
fn ValidationPanel(validation: Signal<Option<Vec<CellAdvisory>>>) -> Element {
    let findings = validation.read().clone().unwrap_or_default();

    rsx! {
        div { class: "validation-panel", id: "validation-panel",
            div { class: "validation-header",
                h3 { "Validation ({findings.len()} findings)" }
                button {
                    class: "panel-close",
                    id: "btn-close-validation",
                    onclick: move |_| {
                        let mut validation = validation;
                        validation.set(None);
                    },
                    "\u{2715}"
                }
            }
            if findings.is_empty() {
                p { class: "empty-message", "No issues found." }
            } else {
                ul { class: "validation-list",
                    for (idx, finding) in findings.iter().enumerate() {
                        li { class: "validation-item", key: "{idx}",
                            "Row {finding.row + 1}, {finding.column}: {finding.kind}"
                        }
                    }
                }
            }
        }
    }
}
