use dioxus::prelude::*;

use crate::state::surface::GridSurface;
use crate::store::{FileStorage, Project, ProjectMetadata, ProjectStore};
use crate::ui::actions;
use crate::ui::toasts::ToastSink;

/// Project manager panel: save the current sheet under a name, load or
/// delete saved projects, and keep an eye on the storage budget.
#[component]
pub fn ProjectPanel(
    surface: Signal<GridSurface>,
    store: Signal<ProjectStore<FileStorage>>,
    active_project: Signal<Option<Project>>,
    show_projects: Signal<bool>,
    sink: ToastSink,
) -> Element {
    let project_name = use_signal(|| {
        active_project
            .peek()
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    });

    let projects = store.read().list_projects();
    let info = store.read().storage_info();
    let active_id = active_project.read().as_ref().map(|p| p.id.clone());

    rsx! {
        div { class: "project-panel", id: "project-panel",
            div { class: "project-panel-header",
                h2 { "Projects" }
                button {
                    class: "panel-close",
                    id: "btn-close-projects",
                    onclick: move |_| {
                        let mut show_projects = show_projects;
                        show_projects.set(false);
                    },
                    "\u{2715}"
                }
            }
            div { class: "project-save-row",
                input {
                    class: "project-name-input",
                    id: "input-project-name",
                    placeholder: "Project name",
                    value: "{project_name.read()}",
                    oninput: move |evt| {
                        let mut project_name = project_name;
                        project_name.set(evt.value());
                    }
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save-project",
                    onclick: move |_| {
                        let name = project_name.read().clone();
                        actions::save_project_as(&name, surface, store, active_project, sink);
                    },
                    "\u{1F4BE} Save"
                }
            }
            if projects.is_empty() {
                p { class: "empty-message", "No saved projects yet." }
            } else {
                ul { class: "project-list",
                    for project in projects {
                        ProjectRow {
                            key: "{project.id}",
                            project,
                            active_id: active_id.clone(),
                            surface,
                            store,
                            active_project,
                            project_name,
                            sink,
                        }
                    }
                }
            }
            div { class: "storage-info",
                "Storage: {info.used} / {info.total} bytes ({info.percentage:.1}%)"
            }
        }
    }
}

#[component]
fn ProjectRow(
    project: ProjectMetadata,
    active_id: Option<String>,
    surface: Signal<GridSurface>,
    store: Signal<ProjectStore<FileStorage>>,
    active_project: Signal<Option<Project>>,
    project_name: Signal<String>,
    sink: ToastSink,
) -> Element {
    let is_active = active_id.as_deref() == Some(project.id.as_str());
    let class = if is_active {
        "project-item active-project"
    } else {
        "project-item"
    };
    let updated = project.updated_at.format("%Y-%m-%d %H:%M").to_string();
    let load_id = project.id.clone();
    let load_name = project.name.clone();
    let delete_id = project.id.clone();

    rsx! {
        li { class: "{class}",
            div { class: "project-item-main",
                span { class: "project-item-name", "{project.name}" }
                span { class: "project-item-meta",
                    "{project.row_count} rows \u{00B7} {project.column_count} columns \u{00B7} updated {updated}"
                }
                if let Some(description) = project.description.as_ref() {
                    span { class: "project-item-description", "{description}" }
                }
            }
            div { class: "project-item-actions",
                button {
                    class: "toolbar-btn",
                    id: format!("btn-load-{}", project.id),
                    onclick: move |_| {
                        actions::load_project(&load_id, surface, store, active_project, sink);
                        let mut project_name = project_name;
                        project_name.set(load_name.clone());
                    },
                    "Load"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: format!("btn-delete-{}", project.id),
                    onclick: move |_| {
                        actions::delete_project(&delete_id, store, active_project, sink);
                    },
                    "Delete"
                }
            }
        }
    }
}
