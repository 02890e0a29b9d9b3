use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Backend origin every request is issued against.
    pub api_url: String,
    /// Directory holding the persisted session keys.
    pub data_dir: PathBuf,
}

impl FrontendConfig {
    pub fn from_env() -> Self {
        let api_url = env::var("MENTII_API_URL")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let data_dir = env::var_os("MENTII_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self { api_url, data_dir }
    }

    pub fn new(api_url: impl Into<String>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            api_url: api_url.into(),
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("mentii"),
        None => PathBuf::from(".mentii"),
    }
}
