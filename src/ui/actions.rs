use std::path::Path;

use dioxus::prelude::*;

use crate::io::upload::{self, FileFormat, UploadLimits};
use crate::io::{atomic_write_string, csv_codec, excel_codec, json_codec};
use crate::notify::Notifier;
use crate::state::surface::GridSurface;
use crate::store::{validate_project_name, FileStorage, Project, ProjectStore};
use crate::ui::toasts::ToastSink;

/// Picks a file, gates it, parses it, and swaps the dataset in. A second
/// import while one is running is rejected rather than queued.
pub async fn import_file(
    mut surface: Signal<GridSurface>,
    mut active_project: Signal<Option<Project>>,
    mut busy: Signal<bool>,
    sink: ToastSink,
) {
    if *busy.peek() {
        sink.warning("An import is already in progress");
        return;
    }
    busy.set(true);

    let task = rfd::AsyncFileDialog::new()
        .add_filter("Data files", &["json", "csv", "txt"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        let path = handle.path().to_path_buf();
        let filename = handle.file_name();
        load_from_path(&path, &filename, surface, active_project, sink);
    }

    busy.set(false);
}

fn load_from_path(
    path: &Path,
    filename: &str,
    mut surface: Signal<GridSurface>,
    mut active_project: Signal<Option<Project>>,
    sink: ToastSink,
) {
    // Gate on the on-disk size before pulling the file into memory.
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            sink.error(format!("Failed to read file: {err}"));
            return;
        }
    };
    if let Err(err) = upload::validate_upload(filename, size, UploadLimits::default()) {
        sink.error(err.to_string());
        return;
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            sink.error(format!("Failed to read file: {err}"));
            return;
        }
    };

    match upload::import_text(filename, &text) {
        Ok(data) => {
            let rows = data.len();
            if let Some(project) = active_project.write().as_mut() {
                project.data = data.clone();
            }
            surface.with_mut(|s| s.replace_data(data));
            sink.success(format!("Imported {rows} rows from {filename}"));
        }
        Err(err) => {
            log::warn!("import of {filename} failed: {err}");
            sink.error(err.to_string());
        }
    }
}

/// Renders the current dataset in the chosen format and writes it where the
/// save dialog points.
pub async fn export_file(surface: Signal<GridSurface>, format: FileFormat, sink: ToastSink) {
    let data = surface.peek().persisted();
    if data.is_empty() {
        sink.error("No data to export");
        return;
    }

    let content = match format {
        FileFormat::Json => match json_codec::format_json(&data) {
            Ok(text) => text,
            Err(err) => {
                sink.error(format!("Export failed: {err}"));
                return;
            }
        },
        FileFormat::Csv => csv_codec::to_csv(&data),
        FileFormat::Xlsx => excel_codec::to_excel_html(&data),
    };

    let task = rfd::AsyncFileDialog::new()
        .set_file_name(format!("export.{}", format.extension()))
        .save_file()
        .await;

    if let Some(handle) = task {
        let path = handle.path().to_path_buf();
        match atomic_write_string(&path, &content) {
            Ok(()) => {
                let stats = upload::export_stats(&data);
                sink.success(format!(
                    "Exported {} rows x {} columns to {}",
                    stats.total_rows,
                    stats.total_columns,
                    path.display()
                ));
            }
            Err(err) => sink.error(format!("Export failed: {err}")),
        }
    }
}

/// Saves the grid's persisted dataset under `name`, reusing the active
/// project's identity when one is loaded.
pub fn save_project_as(
    name: &str,
    surface: Signal<GridSurface>,
    mut store: Signal<ProjectStore<FileStorage>>,
    mut active_project: Signal<Option<Project>>,
    sink: ToastSink,
) {
    let name = name.trim();
    if let Err(err) = validate_project_name(name) {
        sink.warning(err.to_string());
        return;
    }

    let data = surface.peek().persisted();
    let project = match active_project.peek().clone() {
        Some(mut project) => {
            project.name = name.to_string();
            project.data = data;
            project.updated_at = chrono::Utc::now();
            project
        }
        None => Project::new(name, data),
    };

    match store.with_mut(|s| s.save_project(&project)) {
        Ok(()) => {
            sink.success(format!("Saved project: {name}"));
            active_project.set(Some(project));
        }
        Err(err) => {
            log::error!("saving project {name} failed: {err}");
            sink.error(format!("Failed to save project: {err}"));
        }
    }
}

pub fn load_project(
    project_id: &str,
    mut surface: Signal<GridSurface>,
    store: Signal<ProjectStore<FileStorage>>,
    mut active_project: Signal<Option<Project>>,
    sink: ToastSink,
) {
    match store.peek().load_project(project_id) {
        Some(project) => {
            surface.with_mut(|s| s.replace_data(project.data.clone()));
            sink.success(format!("Loaded project: {}", project.name));
            active_project.set(Some(project));
        }
        None => sink.error("Project not found"),
    }
}

pub fn delete_project(
    project_id: &str,
    mut store: Signal<ProjectStore<FileStorage>>,
    mut active_project: Signal<Option<Project>>,
    sink: ToastSink,
) {
    if let Err(err) = store.with_mut(|s| s.delete_project(project_id)) {
        log::error!("deleting project {project_id} failed: {err}");
        sink.error(format!("Failed to delete project: {err}"));
        return;
    }

    let was_active = active_project
        .peek()
        .as_ref()
        .map(|p| p.id == project_id)
        .unwrap_or(false);
    if was_active {
        active_project.set(None);
    }
    sink.info("Project deleted");
}
