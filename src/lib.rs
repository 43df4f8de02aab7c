pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{ApiError, ApiResult};
pub use crate::core::state::{ApiSettings, AppState};

/// Initialize structured logging. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,minecraft_api_lib=debug")),
        )
        .try_init();
}
