use std::sync::mpsc;

use crate::BackendEvent;

/// Receives backend results. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BackendEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<BackendEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<BackendEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: BackendEvent) {
        // A closed receiver means the session is shutting down.
        let _ = self.tx.send(event);
    }
}
