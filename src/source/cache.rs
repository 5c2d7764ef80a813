use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};
use crate::invoice::Invoice;

/// Last fetched invoices, kept on disk as a JSON array
#[derive(Debug, Clone)]
pub struct InvoiceCache {
    path: PathBuf,
}

impl InvoiceCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached invoices (empty if nothing was cached yet)
    pub fn load(&self) -> Result<Vec<Invoice>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| ViewerError::Payload {
            origin: self.path.display().to_string(),
            source: e,
        })
    }

    /// Replace the cached invoices
    pub fn store(&self, invoices: &[Invoice]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(invoices).map_err(|e| {
            ViewerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
