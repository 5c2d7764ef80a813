pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod invoice;
pub mod source;

pub use config::Config;
pub use engine::{InvoiceStateEngine, UiState};
pub use error::{Result, ViewerError};
pub use filters::{AmountBounds, FilterDraft, FilterStore};
pub use invoice::{FilterCriteria, Invoice, InvoiceStatus, StatusSelection};
pub use source::{Endpoint, InvoiceCache, InvoiceRepository, InvoiceSource};
