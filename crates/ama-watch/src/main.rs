//! AMA room watcher entry point
//!
//! Run with:
//! ```bash
//! AMA_ROOM_ID=<room> cargo run -p ama-watch
//! ```
//!
//! Configuration is loaded from environment variables.

use ama_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so the log format can follow APP_ENV
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        api_url = %config.api.base_url,
        ws_url = %config.stream.base_url,
        "Configuration loaded"
    );

    if let Err(e) = ama_watch::run(config).await {
        error!(
            error = %e,
            code = e.error_code(),
            configuration = e.is_configuration(),
            "ama-watch stopped"
        );
        std::process::exit(1);
    }
}
