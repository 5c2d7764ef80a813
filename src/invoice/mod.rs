mod filter;
mod record;

pub use filter::{
    parse_date, FilterCriteria, StatusSelection, DEFAULT_AMOUNT_MAX, DEFAULT_AMOUNT_MIN,
};
pub use record::{Invoice, InvoiceStatus};
