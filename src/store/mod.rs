pub mod backend;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::io::upload::FileFormat;
use crate::state::data_model::Dataset;

pub use backend::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

pub const STORAGE_KEY: &str = "jsoncel-data";
pub const SETTINGS_KEY: &str = "jsoncel-settings";
pub const STORAGE_VERSION: &str = "1.0.0";

/// Nominal budget for the whole envelope, matching a typical browser
/// local-storage quota.
pub const STORAGE_BUDGET_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub auto_save: bool,
    /// Milliseconds between auto-save polls.
    pub auto_save_interval: u64,
    pub default_format: FileFormat,
    pub max_projects: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            auto_save: true,
            auto_save_interval: 5_000,
            default_format: FileFormat::Json,
            max_projects: 50,
        }
    }
}

pub const MAX_PROJECT_NAME_LEN: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectNameError {
    #[error("project name is required")]
    Empty,
    #[error("project name must be at most {MAX_PROJECT_NAME_LEN} characters")]
    TooLong,
    #[error(
        "project name can only contain letters, numbers, spaces, hyphens, underscores, and dots"
    )]
    InvalidCharacters,
}

/// Checks a user-entered project name: trimmed, non-empty, at most
/// `MAX_PROJECT_NAME_LEN` characters, restricted to letters, numbers,
/// spaces, hyphens, underscores, and dots.
pub fn validate_project_name(name: &str) -> Result<(), ProjectNameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProjectNameError::Empty);
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(ProjectNameError::TooLong);
    }
    let allowed = |ch: char| ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '-' | '_' | '.');
    if !name.chars().all(allowed) {
        return Err(ProjectNameError::InvalidCharacters);
    }
    Ok(())
}

/// A named, persisted dataset. Dates round-trip as ISO strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub data: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: &str, data: Dataset) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            data,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Projection of a project without its dataset payload, keeping list views
/// cheap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub row_count: usize,
    pub column_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything in one storage slot: all projects plus settings, versioned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEnvelope {
    pub projects: Vec<Project>,
    pub settings: AppSettings,
    pub version: String,
}

impl Default for StorageEnvelope {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            settings: AppSettings::default(),
            version: STORAGE_VERSION.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StorageInfo {
    pub used: usize,
    pub total: usize,
    pub percentage: f64,
}

/// The app's single persistence service, constructed once at startup and
/// passed to consumers. Reads are best-effort (defaults on failure, with a
/// log line); writes surface `StorageError`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Settings from the dedicated slot, merged over defaults; any failure
    /// falls back to defaults.
    pub fn settings(&self) -> AppSettings {
        match self.storage.get(SETTINGS_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::error!("error loading settings: {err}");
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(err) => {
                log::error!("error loading settings: {err}");
                AppSettings::default()
            }
        }
    }

    /// Writes settings to their own slot and into the envelope (the
    /// duplication is deliberate; the envelope stays self-contained).
    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<(), StorageError> {
        let text = serde_json::to_string(settings).map_err(|err| {
            log::error!("error serializing settings: {err}");
            StorageError::WriteFailed
        })?;
        self.storage.set(SETTINGS_KEY, &text)?;

        let mut envelope = self.envelope();
        envelope.settings = settings.clone();
        self.write_envelope(envelope)
    }

    /// Upserts by id. Beyond `max_projects` the least-recently-updated
    /// projects are evicted.
    pub fn save_project(&mut self, project: &Project) -> Result<(), StorageError> {
        let mut envelope = self.envelope();

        match envelope.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => envelope.projects.push(project.clone()),
        }

        let max_projects = self.settings().max_projects;
        if envelope.projects.len() > max_projects {
            envelope
                .projects
                .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            envelope.projects.truncate(max_projects);
        }

        self.write_envelope(envelope)
    }

    pub fn load_project(&self, project_id: &str) -> Option<Project> {
        self.envelope()
            .projects
            .into_iter()
            .find(|p| p.id == project_id)
    }

    pub fn delete_project(&mut self, project_id: &str) -> Result<(), StorageError> {
        let mut envelope = self.envelope();
        envelope.projects.retain(|p| p.id != project_id);
        self.write_envelope(envelope)
    }

    /// Metadata projections only; the dataset payloads stay in storage.
    pub fn list_projects(&self) -> Vec<ProjectMetadata> {
        self.envelope()
            .projects
            .iter()
            .map(|project| ProjectMetadata {
                id: project.id.clone(),
                name: project.name.clone(),
                created_at: project.created_at,
                updated_at: project.updated_at,
                row_count: project.data.len(),
                column_count: project.data.first().map(|r| r.len()).unwrap_or(0),
                description: project.description.clone(),
            })
            .collect()
    }

    pub fn storage_info(&self) -> StorageInfo {
        let used = serde_json::to_string(&self.envelope())
            .map(|s| s.len())
            .unwrap_or(0);
        StorageInfo {
            used,
            total: STORAGE_BUDGET_BYTES,
            percentage: used as f64 / STORAGE_BUDGET_BYTES as f64 * 100.0,
        }
    }

    fn envelope(&self) -> StorageEnvelope {
        match self.storage.get(STORAGE_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::error!("error reading storage envelope: {err}");
                StorageEnvelope::default()
            }),
            Ok(None) => StorageEnvelope::default(),
            Err(err) => {
                log::error!("error reading storage envelope: {err}");
                StorageEnvelope::default()
            }
        }
    }

    fn write_envelope(&mut self, mut envelope: StorageEnvelope) -> Result<(), StorageError> {
        envelope.version = STORAGE_VERSION.to_string();
        let text = serde_json::to_string(&envelope).map_err(|err| {
            log::error!("error serializing storage envelope: {err}");
            StorageError::WriteFailed
        })?;
        self.storage.set(STORAGE_KEY, &text)
    }
}

/// Debounce-by-polling auto-save: callers tick this on a timer and it only
/// writes when the serialized dataset actually changed since the last save.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoSaver {
    last_saved: Option<String>,
}

impl AutoSaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `project` (with a fresh `updated_at`) when its dataset differs
    /// from the last saved snapshot. Returns whether a write happened.
    pub fn tick<S: KeyValueStorage>(
        &mut self,
        store: &mut ProjectStore<S>,
        project: &mut Project,
    ) -> Result<bool, StorageError> {
        let snapshot = serde_json::to_string(&project.data).map_err(|err| {
            log::error!("auto-save serialization failed: {err}");
            StorageError::WriteFailed
        })?;

        if self.last_saved.as_deref() == Some(snapshot.as_str()) {
            return Ok(false);
        }

        project.updated_at = Utc::now();
        store.save_project(project)?;
        self.last_saved = Some(snapshot);
        log::info!("auto-saved project: {}", project.name);
        Ok(true)
    }
}
