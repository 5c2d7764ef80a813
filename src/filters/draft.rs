use std::sync::Arc;

use super::store::{AmountBounds, FilterStore};
use crate::invoice::{FilterCriteria, InvoiceStatus, StatusSelection};

/// Per-screen working copy of the filter.
///
/// Edits stay local until [`FilterDraft::apply`] commits them to the shared
/// store in one step.
#[derive(Debug)]
pub struct FilterDraft {
    store: Arc<FilterStore>,
    date_from: String,
    date_to: String,
    amount_min: i64,
    amount_max: i64,
    statuses: StatusSelection,
    bounds: AmountBounds,
}

impl FilterDraft {
    pub fn new(store: Arc<FilterStore>) -> Self {
        let current = store.current();
        let bounds = store.data_bounds();
        Self {
            store,
            date_from: current.date_from,
            date_to: current.date_to,
            amount_min: current.amount_min,
            amount_max: current.amount_max,
            statuses: current.statuses,
            bounds,
        }
    }

    pub fn date_from(&self) -> &str {
        &self.date_from
    }

    pub fn date_to(&self) -> &str {
        &self.date_to
    }

    pub fn amount_min(&self) -> i64 {
        self.amount_min
    }

    pub fn amount_max(&self) -> i64 {
        self.amount_max
    }

    pub fn statuses(&self) -> StatusSelection {
        self.statuses
    }

    /// Dataset bounds captured when the draft was (re)loaded, for range controls
    pub fn data_bounds(&self) -> AmountBounds {
        self.bounds
    }

    // Dates are validated when filters are evaluated, not here.
    pub fn set_date_from(&mut self, value: &str) {
        self.date_from = value.to_string();
    }

    pub fn set_date_to(&mut self, value: &str) {
        self.date_to = value.to_string();
    }

    /// Set the lower amount; drags the upper amount along when crossed
    pub fn set_amount_min(&mut self, value: i64) {
        let value = value.max(1);
        self.amount_min = value;
        if value > self.amount_max {
            self.amount_max = value;
        }
    }

    /// Set the upper amount; drags the lower amount along when crossed
    pub fn set_amount_max(&mut self, value: i64) {
        let value = value.max(1);
        self.amount_max = value;
        if value < self.amount_min {
            self.amount_min = value;
        }
    }

    pub fn toggle_status(&mut self, status: InvoiceStatus) {
        self.statuses.toggle(status);
    }

    /// Criteria built from the current field values
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            amount_min: self.amount_min,
            amount_max: self.amount_max,
            statuses: self.statuses,
        }
    }

    /// Clear the shared filter and reload this draft from it
    pub fn clear(&mut self) {
        self.store.clear();
        *self = Self::new(Arc::clone(&self.store));
    }

    /// Commit the draft to the shared store
    pub fn apply(&self) {
        self.store.save(self.criteria());
    }
}
