pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use app::app;
pub use state::AppState;
