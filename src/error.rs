use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Config directory not found at {0}. Run 'invoice-viewer init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown api mode '{0}'. Use 'mock' or 'remote'.")]
    InvalidApiMode(String),

    #[error("api.url must be set when api.mode is 'remote'")]
    MissingApiUrl,

    #[error("Mock payload not found: {0}")]
    MockFileNotFound(PathBuf),

    #[error("Failed to decode invoices from {origin}: {source}")]
    Payload {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Network(String),

    /// Final state of a refresh that the engine reported as failed
    #[error("{0}")]
    RefreshFailed(String),

    #[error("Invalid date '{0}'. Expected dd/mm/yyyy.")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The background fetch stopped before reporting an outcome.
    #[error("Refresh interrupted")]
    Interrupted,
}

impl ViewerError {
    /// Human-readable description carried by the failure, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            ViewerError::Interrupted => None,
            other => Some(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
