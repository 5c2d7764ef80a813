use chrono::NaiveDate;

use super::record::{Invoice, InvoiceStatus};
use crate::error::{Result, ViewerError};

/// Lower amount bound of an untouched filter
pub const DEFAULT_AMOUNT_MIN: i64 = 1;
/// Upper amount bound of an untouched filter
pub const DEFAULT_AMOUNT_MAX: i64 = 300;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a dd/mm/yyyy date as used by both the API and the filter screen
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ViewerError::InvalidDate(value.to_string()))
}

/// Which statuses the user accepts. Every status of the vocabulary always
/// has an entry; nothing selected means no status restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSelection([bool; InvoiceStatus::COUNT]);

impl StatusSelection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, status: InvoiceStatus) -> bool {
        self.0[status.index()]
    }

    pub fn set(&mut self, status: InvoiceStatus, selected: bool) {
        self.0[status.index()] = selected;
    }

    pub fn toggle(&mut self, status: InvoiceStatus) {
        self.0[status.index()] = !self.0[status.index()];
    }

    pub fn with(mut self, status: InvoiceStatus) -> Self {
        self.set(status, true);
        self
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|selected| *selected)
    }

    /// All statuses with their flag, in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (InvoiceStatus, bool)> + '_ {
        InvoiceStatus::ALL
            .into_iter()
            .map(move |status| (status, self.is_selected(status)))
    }

    pub fn accepted(&self) -> impl Iterator<Item = InvoiceStatus> + '_ {
        self.iter()
            .filter_map(|(status, selected)| selected.then_some(status))
    }

    fn admits(&self, label: &str) -> bool {
        !self.any() || self.accepted().any(|status| status.label() == label)
    }
}

/// The active set of constraints narrowing which invoices are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Empty means unset
    pub date_from: String,
    /// Empty means unset
    pub date_to: String,
    pub amount_min: i64,
    pub amount_max: i64,
    pub statuses: StatusSelection,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            date_from: String::new(),
            date_to: String::new(),
            amount_min: DEFAULT_AMOUNT_MIN,
            amount_max: DEFAULT_AMOUNT_MAX,
            statuses: StatusSelection::none(),
        }
    }
}

impl FilterCriteria {
    /// True when the criteria narrow anything relative to the fixed defaults.
    /// Compares against 1/300, not against the dataset bounds.
    pub fn is_filtering(&self) -> bool {
        !self.date_from.is_empty()
            || !self.date_to.is_empty()
            || self.amount_min > DEFAULT_AMOUNT_MIN
            || self.amount_max < DEFAULT_AMOUNT_MAX
            || self.statuses.any()
    }

    /// Whether the invoice passes every clause
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.passes_date_from(invoice)
            && self.passes_date_to(invoice)
            && self.passes_amount(invoice)
            && self.statuses.admits(&invoice.status_description)
    }

    /// Keep the invoices that pass, preserving input order
    pub fn apply(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        invoices
            .iter()
            .filter(|invoice| self.matches(invoice))
            .cloned()
            .collect()
    }

    // Date clauses fail open: an unparseable bound or issue date never excludes.
    fn passes_date_from(&self, invoice: &Invoice) -> bool {
        if self.date_from.is_empty() {
            return true;
        }
        match (parse_date(&self.date_from), parse_date(&invoice.issue_date)) {
            (Ok(from), Ok(issued)) => issued >= from,
            _ => true,
        }
    }

    fn passes_date_to(&self, invoice: &Invoice) -> bool {
        if self.date_to.is_empty() {
            return true;
        }
        match (parse_date(&self.date_to), parse_date(&invoice.issue_date)) {
            (Ok(to), Ok(issued)) => issued <= to,
            _ => true,
        }
    }

    fn passes_amount(&self, invoice: &Invoice) -> bool {
        invoice.amount >= self.amount_min as f64 && invoice.amount <= self.amount_max as f64
    }
}
