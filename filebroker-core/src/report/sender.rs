use crate::report::{MessageKind, OutcomeBody, ReportFn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A report as it travels over the channel to the evaluation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMessage {
    pub kind: MessageKind,
    pub body: OutcomeBody,
}

/// Channel-backed report function factory.
///
/// Hosts that forward reports over a single pipe (a subprocess, a
/// postMessage bridge) hand a fresh [`ReportFn`] to every request and drain
/// the receiver elsewhere. Sends never fail from the broker's point of view:
/// if the receiver is gone the message is dropped.
#[derive(Clone)]
pub struct OutcomeSender {
    outcome_tx: mpsc::UnboundedSender<OutcomeMessage>,
    history: Arc<Mutex<Vec<OutcomeMessage>>>,
}

impl OutcomeSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutcomeMessage>) {
        let (outcome_tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                outcome_tx,
                history: Arc::new(Mutex::new(Vec::new())),
            },
            rx,
        )
    }

    pub fn reporter(&self) -> ReportFn {
        let sender = self.clone();
        Box::new(move |kind, body| sender.send(OutcomeMessage { kind, body }))
    }

    pub fn send(&self, message: OutcomeMessage) {
        self.history.lock().unwrap().push(message.clone());
        let _ = self.outcome_tx.send(message);
    }

    pub fn history(&self) -> Vec<OutcomeMessage> {
        self.history.lock().unwrap().clone()
    }

    pub fn history_for(&self, file_request_id: &str) -> Vec<OutcomeMessage> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.body.file_request_id() == file_request_id)
            .cloned()
            .collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().unwrap().clear();
    }
}
