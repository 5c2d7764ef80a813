use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use invoice_viewer::{Invoice, InvoiceSource, InvoiceStateEngine, Result, UiState, ViewerError};
use tokio::sync::{watch, Notify};

/// What the next refresh should do
pub enum Outcome {
    Replace(Vec<Invoice>),
    Fail(ViewerError),
}

/// In-memory invoice source whose refreshes follow a script
pub struct ScriptedSource {
    invoices: watch::Sender<Vec<Invoice>>,
    outcomes: Mutex<VecDeque<Outcome>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    pub fn new(initial: Vec<Invoice>) -> Self {
        Self {
            invoices: watch::Sender::new(initial),
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Refreshes block until the gate is notified
    pub fn gated(initial: Vec<Invoice>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(initial)
        }
    }

    pub fn then(self, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvoiceSource for ScriptedSource {
    fn observe_invoices(&self) -> watch::Receiver<Vec<Invoice>> {
        self.invoices.subscribe()
    }

    async fn refresh_invoices(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        match next {
            Some(Outcome::Replace(invoices)) => {
                self.invoices.send_replace(invoices);
                Ok(())
            }
            Some(Outcome::Fail(err)) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn sample() -> Vec<Invoice> {
    vec![
        Invoice::new("Pagada", 100.0, "01/01/2025"),
        Invoice::new("Anulada", 200.0, "15/02/2025"),
        Invoice::new("Pendiente de pago", 150.0, "10/03/2025"),
    ]
}

/// Wait for the engine to leave `Loading`, failing the test after a while
pub async fn settle(engine: &InvoiceStateEngine) -> UiState {
    tokio::time::timeout(Duration::from_secs(5), engine.settled())
        .await
        .expect("engine stayed in Loading")
}

/// Wait until the published state satisfies `predicate`
pub async fn wait_for_state<F>(engine: &InvoiceStateEngine, predicate: F) -> UiState
where
    F: FnMut(&UiState) -> bool,
{
    let mut states = engine.observe_ui_state();
    let waited = tokio::time::timeout(Duration::from_secs(5), states.wait_for(predicate))
        .await
        .expect("state never matched");
    let state = waited.expect("state channel closed").clone();
    state
}
