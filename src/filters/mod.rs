mod draft;
mod store;

pub use draft::FilterDraft;
pub use store::{AmountBounds, FilterStore};
