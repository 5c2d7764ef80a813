use serde::{Deserialize, Serialize};
use std::fmt;

/// A single billing entry as delivered by the invoice API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Invoice {
    #[serde(rename = "descEstado")]
    pub status_description: String,
    /// Sortable amount; negative and fractional values occur in real data
    #[serde(rename = "importeOrdenacion")]
    pub amount: f64,
    /// Issue date as sent by the API (dd/mm/yyyy), not guaranteed parseable
    #[serde(rename = "fecha")]
    pub issue_date: String,
}

impl Invoice {
    pub fn new(status_description: &str, amount: f64, issue_date: &str) -> Self {
        Self {
            status_description: status_description.to_string(),
            amount,
            issue_date: issue_date.to_string(),
        }
    }

    /// The recognized status, or None for labels outside the vocabulary
    pub fn status(&self) -> Option<InvoiceStatus> {
        InvoiceStatus::from_label(&self.status_description)
    }
}

/// Fixed status vocabulary used by the invoice API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InvoiceStatus {
    Paid,
    Voided,
    FixedInstallment,
    Pending,
    PaymentPlan,
}

impl InvoiceStatus {
    pub const COUNT: usize = 5;

    pub const ALL: [InvoiceStatus; Self::COUNT] = [
        InvoiceStatus::Paid,
        InvoiceStatus::Voided,
        InvoiceStatus::FixedInstallment,
        InvoiceStatus::Pending,
        InvoiceStatus::PaymentPlan,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Pagada",
            Self::Voided => "Anulada",
            Self::FixedInstallment => "Cuota Fija",
            Self::Pending => "Pendiente de pago",
            Self::PaymentPlan => "Plan de pago",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
