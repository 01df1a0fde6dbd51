use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Server configuration, layered from `planner.toml` and `PLANNER_`-prefixed
/// environment variables (environment wins).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TCP port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Session password. Empty disables authentication entirely.
    #[serde(default)]
    pub password: String,
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_port() -> u16 {
    7540
}

fn default_database_path() -> String {
    "planner.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            password: String::new(),
            database_path: default_database_path(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("planner.toml"))
            .merge(Env::prefixed("PLANNER_"))
            .extract()
    }
}
