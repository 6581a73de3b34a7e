use std::env;
use std::path::PathBuf;

const DEFAULT_USERNAME: &str = "default_user";
const DEFAULT_DATABASE_PATH: &str = "boardgames.sqlite";
const DEFAULT_CACHE_DIR: &str = ".cache/bgg-details";

/// Runtime settings, environment-driven with sensible defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: String,
    pub database_path: PathBuf,
    pub cache_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            username: env_or("BGG_USERNAME", DEFAULT_USERNAME),
            database_path: PathBuf::from(env_or("DATABASE_PATH", DEFAULT_DATABASE_PATH)),
            cache_dir: PathBuf::from(env_or("CACHE_DIR", DEFAULT_CACHE_DIR)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
