use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::invoice::{FilterCriteria, StatusSelection, DEFAULT_AMOUNT_MAX, DEFAULT_AMOUNT_MIN};

/// Amount range observed in the current dataset, always with `1 <= min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBounds {
    pub min: i64,
    pub max: i64,
}

impl AmountBounds {
    /// Normalize raw bounds: non-positive min becomes 1, max never below min
    pub fn clamped(min: i64, max: i64) -> Self {
        let min = if min <= 0 { 1 } else { min };
        let max = if max < min { min } else { max };
        Self { min, max }
    }
}

impl Default for AmountBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_AMOUNT_MIN,
            max: DEFAULT_AMOUNT_MAX,
        }
    }
}

/// Single shared holder of the active filter and the dataset bounds.
///
/// Build one per process, wrap it in an `Arc` and hand it to the engine and
/// to every editing screen. All state is published through watch channels,
/// so consumers either take a snapshot or subscribe.
#[derive(Debug)]
pub struct FilterStore {
    criteria: watch::Sender<FilterCriteria>,
    bounds: watch::Sender<AmountBounds>,
    applied: watch::Sender<bool>,
    /// Held by every mutator so criteria and `applied` always change together
    writer: Mutex<()>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            criteria: watch::Sender::new(FilterCriteria::default()),
            bounds: watch::Sender::new(AmountBounds::default()),
            applied: watch::Sender::new(false),
            writer: Mutex::new(()),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the active criteria
    pub fn current(&self) -> FilterCriteria {
        self.criteria.borrow().clone()
    }

    pub fn data_bounds(&self) -> AmountBounds {
        *self.bounds.borrow()
    }

    pub fn filters_applied(&self) -> bool {
        *self.applied.borrow()
    }

    pub fn observe_filter_criteria(&self) -> watch::Receiver<FilterCriteria> {
        self.criteria.subscribe()
    }

    pub fn observe_amount_bounds(&self) -> watch::Receiver<AmountBounds> {
        self.bounds.subscribe()
    }

    pub fn observe_filters_applied(&self) -> watch::Receiver<bool> {
        self.applied.subscribe()
    }

    /// Replace the active criteria wholesale
    pub fn save(&self, criteria: FilterCriteria) {
        let applied = criteria.is_filtering();
        debug!(?criteria, applied, "saving filter criteria");
        let _writer = self.lock_writer();
        self.criteria.send_replace(criteria);
        self.applied.send_replace(applied);
    }

    /// Record the amount range of the live dataset
    pub fn update_data_bounds(&self, min: i64, max: i64) {
        let bounds = AmountBounds::clamped(min, max);
        debug!(min = bounds.min, max = bounds.max, "updating dataset bounds");
        let _writer = self.lock_writer();
        self.bounds.send_if_modified(|current| {
            if *current == bounds {
                return false;
            }
            *current = bounds;
            true
        });
    }

    /// Drop every restriction. The amount range resets to the dataset bounds
    /// rather than to the fixed defaults.
    pub fn clear(&self) {
        let _writer = self.lock_writer();
        let bounds = self.data_bounds();
        debug!(min = bounds.min, max = bounds.max, "clearing filters");
        self.criteria.send_replace(FilterCriteria {
            date_from: String::new(),
            date_to: String::new(),
            amount_min: bounds.min,
            amount_max: bounds.max,
            statuses: StatusSelection::none(),
        });
        self.applied.send_replace(false);
    }
}
