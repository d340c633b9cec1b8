use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "cadence.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Address the HTTP API binds to
    pub listen_address: String,
    /// Maximum number of tasks returned by a listing
    pub list_limit: u32,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// When set, the task API requires a token obtained from `/api/signin`
    pub password: Option<String>,
    /// Static front end served for paths outside `/api`
    pub web_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("scheduler.db"),
            listen_address: "127.0.0.1:7540".to_string(),
            list_limit: 50,
            log_filter: "cadence=info,cadence_core=info,tower_http=info".to_string(),
            password: None,
            web_dir: PathBuf::from("web"),
        }
    }
}

impl Config {
    /// Defaults, then `cadence.toml`, then `CADENCE_*` environment variables.
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("CADENCE_"))
    }
}
