//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default data directory or report knobs, only edit this file.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SocLog";

/// Default directory scanned for `*.csv` log sources when no arguments are given
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default sensitive file locations checked by the access report
pub const DEFAULT_SENSITIVE_PATHS: &[&str] = &[
    "/etc/shadow",
    "/etc/passwd",
    "/etc/sudoers",
    "/var/log",
    "/root/.ssh",
];

/// Default number of top-frequency events shown in the report
pub const DEFAULT_TOP_K: usize = 3;

/// Default number of top processes shown per window
pub const DEFAULT_PROCESS_LIMIT: usize = 5;

/// Default events-per-minute threshold for the high-frequency heuristic
pub const DEFAULT_FREQUENCY_THRESHOLD: u64 = 100;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get data directory from environment or use default
pub fn get_data_dir() -> String {
    std::env::var("SOCLOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
}

/// Get sensitive path list from environment (colon-separated) or use default
pub fn get_sensitive_paths() -> Vec<String> {
    match std::env::var("SOCLOG_SENSITIVE_PATHS") {
        Ok(raw) => raw
            .split(':')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => DEFAULT_SENSITIVE_PATHS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Get high-frequency threshold (events/minute) from environment or use default
pub fn get_frequency_threshold() -> u64 {
    std::env::var("SOCLOG_FREQUENCY_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FREQUENCY_THRESHOLD)
}

/// Get JSON export target from environment; export is off when unset
pub fn get_export_path() -> Option<String> {
    std::env::var("SOCLOG_EXPORT_JSON").ok()
}
