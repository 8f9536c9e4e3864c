use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "EmrDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the record store inside the data directory.
pub const DATABASE_FILE_NAME: &str = "emr.db";

/// Rows shown per dependent type on the patient detail view.
pub const SUMMARY_LIMIT: u32 = 5;

/// Upper bound on waiting for a locked database file.
pub const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Get the application data directory
/// ~/EmrDesk/ on all platforms; ./EmrDesk/ when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the single on-disk record store.
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE_NAME)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "emr_desk_lib=info,emr_desk=info,warn"
}
