//! Invoice list state engine.
//!
//! Combines the live invoice collection, the shared filter criteria and the
//! engine's own loading/error flags into a single observable [`UiState`].
//! Every publication is made while holding the flags lock and reads the
//! newest value of all three inputs, so observers never see a state built
//! from a partial update.

mod state;

pub use state::{
    data_bounds, derive_ui_state, LocalFlags, UiState, NO_INVOICES, NO_MATCHES, UNKNOWN_ERROR,
};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, ViewerError};
use crate::filters::FilterStore;
use crate::invoice::{FilterCriteria, Invoice};
use crate::source::InvoiceSource;

pub struct InvoiceStateEngine {
    inner: Arc<Inner>,
    pump: JoinHandle<()>,
}

struct Inner {
    source: Arc<dyn InvoiceSource>,
    store: Arc<FilterStore>,
    invoices: watch::Receiver<Vec<Invoice>>,
    flags: Mutex<LocalFlags>,
    ui_state: watch::Sender<UiState>,
    dialog: watch::Sender<bool>,
}

impl InvoiceStateEngine {
    /// Subscribe to the source and the store and publish the first state.
    ///
    /// If the source holds no invoices yet, one refresh is started right
    /// away. Must be called from within a tokio runtime.
    pub fn new(source: Arc<dyn InvoiceSource>, store: Arc<FilterStore>) -> Self {
        let mut invoices = source.observe_invoices();
        let criteria = store.observe_filter_criteria();

        let (first_is_empty, first_bounds) = {
            let snapshot = invoices.borrow_and_update();
            (snapshot.is_empty(), data_bounds(&snapshot))
        };

        let inner = Arc::new(Inner {
            source,
            store,
            invoices: invoices.clone(),
            flags: Mutex::new(LocalFlags::default()),
            ui_state: watch::Sender::new(UiState::Loading),
            dialog: watch::Sender::new(false),
        });

        if let Some((min, max)) = first_bounds {
            inner.store.update_data_bounds(min, max);
        }
        if first_is_empty {
            info!("no invoices available yet, starting initial refresh");
            inner.refresh();
        }
        inner.publish();

        let pump = tokio::spawn(pump_inputs(Arc::clone(&inner), invoices, criteria));
        Self { inner, pump }
    }

    pub fn observe_ui_state(&self) -> watch::Receiver<UiState> {
        self.inner.ui_state.subscribe()
    }

    /// Snapshot of the current state
    pub fn ui_state(&self) -> UiState {
        self.inner.ui_state.borrow().clone()
    }

    /// Wait until the state is anything other than `Loading`
    pub async fn settled(&self) -> UiState {
        let mut states = self.observe_ui_state();
        let state = match states.wait_for(|state| *state != UiState::Loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.ui_state(),
        };
        state
    }

    /// Bring the dataset bounds and the published state up to date with the
    /// current inputs without waiting for the subscription task.
    pub fn resync(&self) {
        let bounds = data_bounds(&self.inner.invoices.borrow());
        if let Some((min, max)) = bounds {
            self.inner.store.update_data_bounds(min, max);
        }
        self.inner.publish();
    }

    pub fn observe_dialog_visible(&self) -> watch::Receiver<bool> {
        self.inner.dialog.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock_flags().is_loading
    }

    pub fn filter_store(&self) -> &Arc<FilterStore> {
        &self.inner.store
    }

    /// Start a refresh unless one is already running, in which case the
    /// request is dropped.
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    pub fn retry(&self) {
        self.refresh();
    }

    pub fn show_dialog(&self) {
        self.inner.dialog.send_replace(true);
    }

    pub fn hide_dialog(&self) {
        self.inner.dialog.send_replace(false);
    }
}

impl Drop for InvoiceStateEngine {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl Inner {
    fn lock_flags(&self) -> MutexGuard<'_, LocalFlags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(self: &Arc<Self>) {
        {
            let mut flags = self.lock_flags();
            if flags.is_loading {
                debug!("refresh already in flight, dropping request");
                return;
            }
            flags.is_loading = true;
            flags.last_error = None;
            self.publish_locked(&flags);
        }

        info!("refreshing invoices");
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let source = Arc::clone(&inner.source);
            // A panicking source must not leave the engine stuck in Loading.
            let outcome = tokio::spawn(async move { source.refresh_invoices().await })
                .await
                .unwrap_or(Err(ViewerError::Interrupted));
            inner.finish_refresh(outcome);
        });
    }

    fn finish_refresh(&self, outcome: Result<()>) {
        let mut flags = self.lock_flags();
        flags.is_loading = false;
        match outcome {
            Ok(()) => info!("invoice refresh finished"),
            Err(err) => {
                let message = err.detail().unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                warn!(error = %message, "invoice refresh failed");
                flags.last_error = Some(message);
            }
        }
        self.publish_locked(&flags);
    }

    fn publish(&self) {
        let flags = self.lock_flags();
        self.publish_locked(&flags);
    }

    fn publish_locked(&self, flags: &LocalFlags) {
        let criteria: FilterCriteria = self.store.current();
        let next = {
            let invoices = self.invoices.borrow();
            derive_ui_state(&invoices, &criteria, flags)
        };
        self.ui_state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!(state = state_name(&next), "ui state changed");
            *current = next;
            true
        });
    }
}

fn state_name(state: &UiState) -> &'static str {
    match state {
        UiState::Loading => "loading",
        UiState::Success(_) => "success",
        UiState::Empty(_) => "empty",
        UiState::Error(_) => "error",
    }
}

/// Republish on every change of the invoice collection or the criteria, and
/// keep the store's dataset bounds in step with the invoices.
async fn pump_inputs(
    inner: Arc<Inner>,
    mut invoices: watch::Receiver<Vec<Invoice>>,
    mut criteria: watch::Receiver<FilterCriteria>,
) {
    loop {
        tokio::select! {
            changed = invoices.changed() => {
                if changed.is_err() {
                    debug!("invoice source closed");
                    break;
                }
                let bounds = data_bounds(&invoices.borrow_and_update());
                if let Some((min, max)) = bounds {
                    inner.store.update_data_bounds(min, max);
                }
            }
            changed = criteria.changed() => {
                if changed.is_err() {
                    break;
                }
                criteria.borrow_and_update();
            }
        }
        inner.publish();
    }
}
