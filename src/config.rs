use std::path::PathBuf;

/// Default location of the bank store, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "accounts.json";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings shared by both binaries; fixed defaults, no flags or env vars
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File the bank registry is loaded from and saved to
    pub store_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}
