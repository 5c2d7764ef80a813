use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, ViewerError};
use crate::invoice::Invoice;

/// Body returned by the invoice API
#[derive(Debug, Deserialize)]
struct InvoicePayload {
    #[serde(rename = "numFacturas", default)]
    count: Option<usize>,
    #[serde(rename = "facturas")]
    invoices: Vec<Invoice>,
}

/// Where a refresh reads invoices from
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Canned payload on disk, used for demos and offline work
    Mock(PathBuf),
    /// Live API queried over HTTP
    Remote { url: String, timeout: Duration },
}

/// Decode an API body into invoices
pub fn decode_payload(body: &str, origin: &str) -> Result<Vec<Invoice>> {
    let payload: InvoicePayload =
        serde_json::from_str(body).map_err(|e| ViewerError::Payload {
            origin: origin.to_string(),
            source: e,
        })?;
    if let Some(count) = payload.count {
        if count != payload.invoices.len() {
            debug!(
                declared = count,
                received = payload.invoices.len(),
                "invoice count mismatch in payload"
            );
        }
    }
    Ok(payload.invoices)
}

/// Fetch the full invoice list. Blocking; run it off the async executor.
pub fn fetch_invoices(endpoint: &Endpoint) -> Result<Vec<Invoice>> {
    match endpoint {
        Endpoint::Mock(path) => {
            if !path.exists() {
                return Err(ViewerError::MockFileNotFound(path.clone()));
            }
            let body = fs::read_to_string(path)?;
            decode_payload(&body, &path.display().to_string())
        }
        Endpoint::Remote { url, timeout } => {
            let body = get_body(url, *timeout)?;
            decode_payload(&body, url)
        }
    }
}

fn get_body(url: &str, timeout: Duration) -> Result<String> {
    use ureq::Agent;

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();

    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| ViewerError::Network(format!("Error de conexión: {e}")))?;

    response
        .body_mut()
        .read_to_string()
        .map_err(|e| ViewerError::Network(format!("Error de conexión: {e}")))
}
