mod cache;
mod fetch;
mod repository;

pub use cache::InvoiceCache;
pub use fetch::{decode_payload, fetch_invoices, Endpoint};
pub use repository::InvoiceRepository;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::invoice::Invoice;

/// Where invoices come from.
///
/// `observe_invoices` always carries the full current collection; a
/// successful `refresh_invoices` replaces it and notifies every observer.
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    fn observe_invoices(&self) -> watch::Receiver<Vec<Invoice>>;

    async fn refresh_invoices(&self) -> Result<()>;
}
