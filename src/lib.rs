pub mod commands;
pub mod config;
pub mod core_state; // Shared store handle for every front end
pub mod db;
pub mod ipc; // Line-delimited JSON channel to the presentation process
pub mod models;
pub mod search;
pub mod summary;

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Open the record store and serve IPC requests on stdin/stdout until the
/// presentation process closes its end. Logs go to stderr.
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    let state = match core_state::CoreState::open(&db_path) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(path = %db_path.display(), error = %e, "Cannot open record store");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let served = runtime.block_on(ipc::serve(
        state,
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ));
    match served {
        Ok(()) => {
            tracing::info!("{} shutting down", config::APP_NAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "IPC channel failed");
            ExitCode::FAILURE
        }
    }
}
