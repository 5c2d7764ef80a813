use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use super::cache::InvoiceCache;
use super::fetch::{fetch_invoices, Endpoint};
use super::InvoiceSource;
use crate::error::{Result, ViewerError};
use crate::invoice::Invoice;

/// Invoice source backed by the on-disk cache and refreshed from an endpoint
#[derive(Debug)]
pub struct InvoiceRepository {
    cache: InvoiceCache,
    endpoint: Endpoint,
    invoices: watch::Sender<Vec<Invoice>>,
}

impl InvoiceRepository {
    /// Open the repository, publishing whatever the cache already holds
    pub fn open(cache: InvoiceCache, endpoint: Endpoint) -> Result<Self> {
        let cached = cache.load()?;
        info!(
            path = %cache.path().display(),
            count = cached.len(),
            "loaded invoice cache"
        );
        Ok(Self {
            cache,
            endpoint,
            invoices: watch::Sender::new(cached),
        })
    }

    /// Snapshot of the current invoices
    pub fn invoices(&self) -> Vec<Invoice> {
        self.invoices.borrow().clone()
    }
}

#[async_trait]
impl InvoiceSource for InvoiceRepository {
    fn observe_invoices(&self) -> watch::Receiver<Vec<Invoice>> {
        self.invoices.subscribe()
    }

    async fn refresh_invoices(&self) -> Result<()> {
        let endpoint = self.endpoint.clone();
        let cache = self.cache.clone();

        let fetched = tokio::task::spawn_blocking(move || -> Result<Vec<Invoice>> {
            let invoices = fetch_invoices(&endpoint)?;
            cache.store(&invoices)?;
            Ok(invoices)
        })
        .await
        .map_err(|_| ViewerError::Interrupted)??;

        info!(count = fetched.len(), "invoice cache replaced");
        self.invoices.send_replace(fetched);
        Ok(())
    }
}
