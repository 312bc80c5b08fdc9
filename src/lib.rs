pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod models;
pub mod record;
pub mod repository;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod state;
pub mod storage;

pub use app::router;
pub use config::Configuration;
pub use session::DaySession;
pub use settings::Settings;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
