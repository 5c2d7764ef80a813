use crate::invoice::{FilterCriteria, Invoice};

/// Shown when the data source holds no invoices at all
pub const NO_INVOICES: &str = "No hay facturas disponibles";
/// Shown when invoices exist but the filter excludes every one
pub const NO_MATCHES: &str = "No hay facturas que coincidan con los filtros seleccionados";
/// Substituted when a refresh fails without describing why
pub const UNKNOWN_ERROR: &str = "unknown error";

/// What the invoice list screen should render. Exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    /// Non-empty filtered list
    Success(Vec<Invoice>),
    Empty(String),
    Error(String),
}

/// Transient flags owned by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFlags {
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Combine the three inputs into one state. First match wins:
/// loading, then error, then the filtered list, then the two empty cases.
pub fn derive_ui_state(
    invoices: &[Invoice],
    criteria: &FilterCriteria,
    flags: &LocalFlags,
) -> UiState {
    if flags.is_loading {
        return UiState::Loading;
    }
    if let Some(message) = &flags.last_error {
        return UiState::Error(message.clone());
    }

    let filtered = criteria.apply(invoices);
    if !filtered.is_empty() {
        UiState::Success(filtered)
    } else if invoices.is_empty() {
        UiState::Empty(NO_INVOICES.to_string())
    } else {
        UiState::Empty(NO_MATCHES.to_string())
    }
}

/// Amount range spanned by the invoices, or None for an empty collection.
///
/// `min` is the floored smallest amount clamped to at least 1, `max` the
/// ceiled largest amount, never below `min`.
pub fn data_bounds(invoices: &[Invoice]) -> Option<(i64, i64)> {
    let (first, rest) = invoices.split_first()?;
    let (lowest, highest) = rest
        .iter()
        .fold((first.amount, first.amount), |(lo, hi), invoice| {
            (lo.min(invoice.amount), hi.max(invoice.amount))
        });

    let min = (lowest.floor() as i64).max(1);
    let max = (highest.ceil() as i64).max(min);
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceStatus, StatusSelection};

    fn sample() -> Vec<Invoice> {
        vec![
            Invoice::new("Pagada", 100.0, "01/01/2025"),
            Invoice::new("Anulada", 200.0, "15/02/2025"),
            Invoice::new("Pendiente de pago", 150.0, "10/03/2025"),
        ]
    }

    fn loading() -> LocalFlags {
        LocalFlags {
            is_loading: true,
            last_error: None,
        }
    }

    fn failed(message: &str) -> LocalFlags {
        LocalFlags {
            is_loading: false,
            last_error: Some(message.to_string()),
        }
    }

    #[test]
    fn loading_wins_over_everything() {
        let mut flags = loading();
        flags.last_error = Some("boom".to_string());
        assert_eq!(
            derive_ui_state(&sample(), &FilterCriteria::default(), &flags),
            UiState::Loading
        );
    }

    #[test]
    fn error_hides_loaded_invoices() {
        assert_eq!(
            derive_ui_state(&sample(), &FilterCriteria::default(), &failed("sin red")),
            UiState::Error("sin red".to_string())
        );
    }

    #[test]
    fn filtered_invoices_are_shown() {
        let criteria = FilterCriteria {
            statuses: StatusSelection::none().with(InvoiceStatus::Paid),
            ..FilterCriteria::default()
        };
        assert_eq!(
            derive_ui_state(&sample(), &criteria, &LocalFlags::default()),
            UiState::Success(vec![Invoice::new("Pagada", 100.0, "01/01/2025")])
        );
    }

    #[test]
    fn empty_messages_distinguish_no_data_from_no_match() {
        assert_eq!(
            derive_ui_state(&[], &FilterCriteria::default(), &LocalFlags::default()),
            UiState::Empty(NO_INVOICES.to_string())
        );

        let criteria = FilterCriteria {
            amount_min: 1000,
            ..FilterCriteria::default()
        };
        assert_eq!(
            derive_ui_state(&sample(), &criteria, &LocalFlags::default()),
            UiState::Empty(NO_MATCHES.to_string())
        );
    }

    #[test]
    fn bounds_clamp_negative_floor() {
        let invoices = vec![
            Invoice::new("Pagada", -50.0, "01/01/2025"),
            Invoice::new("Anulada", 10.0, "01/01/2025"),
        ];
        assert_eq!(data_bounds(&invoices), Some((1, 10)));
    }

    #[test]
    fn bounds_round_outwards() {
        let invoices = vec![
            Invoice::new("Pagada", 50.4, "01/01/2025"),
            Invoice::new("Anulada", 99.9, "01/01/2025"),
        ];
        assert_eq!(data_bounds(&invoices), Some((50, 100)));
    }

    #[test]
    fn bounds_never_invert() {
        let invoices = vec![Invoice::new("Pagada", -7.5, "01/01/2025")];
        assert_eq!(data_bounds(&invoices), Some((1, 1)));
        assert_eq!(data_bounds(&[]), None);
    }

    #[test]
    fn bounds_cover_every_amount() {
        let invoices = vec![
            Invoice::new("Pagada", 3.2, "01/01/2025"),
            Invoice::new("Pagada", 250.01, "01/01/2025"),
            Invoice::new("Pagada", 17.0, "01/01/2025"),
        ];
        let (min, max) = data_bounds(&invoices).unwrap();
        assert_eq!((min, max), (3, 251));
        assert!(invoices.iter().all(|i| i.amount.ceil() as i64 <= max));
    }
}
