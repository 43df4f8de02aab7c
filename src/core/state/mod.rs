mod app_state;

pub use app_state::{settings_path, ApiSettings, AppState, CURSEFORGE_KEY_ENV};
