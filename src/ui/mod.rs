pub mod actions;
pub mod app;
pub mod grid;
pub mod json_editor;
pub mod projects;
pub mod toasts;
pub mod toolbar;
