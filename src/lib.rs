pub mod io;
pub mod notify;
pub mod state;
pub mod store;
pub mod ui;
