//! Server configuration from environment variables.

/// Runtime configuration, all overridable via `SP_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// SQLite database file (or directory) path.
    pub db_path: String,
    /// Base URL of the upstream signal feed service.
    pub signals_api_url: String,
    /// Path to the `symbol,company` stock list CSV.
    pub stock_list_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("SP_LISTEN_ADDR", "127.0.0.1:8420"),
            db_path: env_or("SP_DB_PATH", "data/stockpulse.db"),
            signals_api_url: env_or("SP_SIGNALS_API_URL", "http://127.0.0.1:4000/api"),
            stock_list_path: env_or("SP_STOCK_LIST", "data/list.csv"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
