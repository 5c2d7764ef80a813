mod settings;

pub use settings::{ApiSettings, CacheSettings, Config, LogSettings};

use crate::error::{Result, ViewerError};
use crate::source::{Endpoint, InvoiceCache};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the config directory path (~/.invoice-viewer/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-viewer") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.invoice-viewer/
    let home = dirs_home().ok_or_else(|| {
        ViewerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-viewer"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a configured path: `~/` is expanded, relative paths hang off the
/// config directory
pub fn resolve_path(path: &str, cfg_dir: &Path) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        cfg_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    if !cfg_dir.exists() {
        return Err(ViewerError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let path = cfg_dir.join("config.toml");
    if !path.exists() {
        return Err(ViewerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ViewerError::ConfigParse { path, source: e })
}

/// Create the config directory with a template config and a sample payload
pub fn init_config_dir(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(ViewerError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir.join("mock"))?;
    fs::create_dir_all(cfg_dir.join("cache"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("mock").join("facturas.json"), MOCK_PAYLOAD)?;
    Ok(())
}

impl Config {
    /// Endpoint a refresh should read from
    pub fn endpoint(&self, cfg_dir: &Path) -> Result<Endpoint> {
        match self.api.mode.as_str() {
            "mock" => {
                let file = self.api.mock_file.as_deref().unwrap_or("mock/facturas.json");
                Ok(Endpoint::Mock(resolve_path(file, cfg_dir)))
            }
            "remote" => {
                let url = self.api.url.clone().ok_or(ViewerError::MissingApiUrl)?;
                Ok(Endpoint::Remote {
                    url,
                    timeout: Duration::from_secs(self.api.timeout_secs),
                })
            }
            other => Err(ViewerError::InvalidApiMode(other.to_string())),
        }
    }

    pub fn cache(&self, cfg_dir: &Path) -> InvoiceCache {
        InvoiceCache::new(resolve_path(&self.cache.file, cfg_dir))
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
mode = "mock"                        # "mock" or "remote"
mock_file = "mock/facturas.json"     # relative to this directory, or ~/...
# url = "https://example.com/facturas"
timeout_secs = 5

[cache]
file = "cache/invoices.json"

[log]
level = "warn"   # overridden by RUST_LOG
"#;

/// Sample payload served in mock mode
pub const MOCK_PAYLOAD: &str = r#"{
  "numFacturas": 6,
  "facturas": [
    { "descEstado": "Pendiente de pago", "importeOrdenacion": 1.56, "fecha": "07/02/2019" },
    { "descEstado": "Pagada", "importeOrdenacion": 25.14, "fecha": "05/02/2019" },
    { "descEstado": "Pagada", "importeOrdenacion": 22.69, "fecha": "08/01/2019" },
    { "descEstado": "Anulada", "importeOrdenacion": 12.84, "fecha": "07/12/2018" },
    { "descEstado": "Cuota Fija", "importeOrdenacion": 35.16, "fecha": "16/11/2018" },
    { "descEstado": "Plan de pago", "importeOrdenacion": 162.32, "fecha": "05/10/2018" }
  ]
}
"#;
