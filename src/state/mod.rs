pub mod columns;
pub mod data_model;
pub mod history;
pub mod surface;
