use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    /// "mock" reads `mock_file`, "remote" queries `url`
    pub mode: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mock_file: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheSettings {
    pub file: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LogSettings {
    #[serde(default)]
    pub level: Option<String>,
}

fn default_timeout_secs() -> u64 {
    5
}
