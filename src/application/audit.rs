//! Broadcast-backed audit sink

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::audit::{AuditEntry, AuditSink};

const DEFAULT_CAPACITY: usize = 1024;

/// Publishes audit entries to every subscriber. With no subscriber the
/// entry is dropped; publishing never fails the caller.
#[derive(Clone)]
pub struct AuditBus {
    sender: broadcast::Sender<AuditEntry>,
}

impl AuditBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuditEntry> {
        self.sender.subscribe()
    }
}

impl Default for AuditBus {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for AuditBus {
    fn record(&self, entry: AuditEntry) {
        let entity = entry.entity;
        let entity_id = entry.entity_id.clone();
        match self.sender.send(entry) {
            Ok(count) => debug!(entity, entity_id, subscribers = count, "Audit entry published"),
            Err(_) => debug!(entity, entity_id, "Audit entry dropped (no subscribers)"),
        }
    }
}

pub type SharedAuditBus = Arc<AuditBus>;

/// Drain the bus into the `audit` log target until the bus is dropped.
pub fn spawn_audit_logger(bus: &AuditBus) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(entry) => match serde_json::to_string(&entry) {
                    Ok(json) => info!(target: "audit", action = ?entry.action, entity = entry.entity, "{}", json),
                    Err(e) => warn!(target: "audit", error = %e, "Unserializable audit entry"),
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(target: "audit", missed, "Audit logger lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_receive_entries() {
        let bus = AuditBus::new();
        let mut rx = bus.subscribe();
        bus.log_create("Order", "7".into(), Some("user-1"), json!({"total": "238.48"}));

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.entity, "Order");
        assert_eq!(entry.entity_id, "7");
        assert!(entry.before.is_none());
        assert_eq!(entry.actor.as_deref(), Some("user-1"));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = AuditBus::new();
        bus.log_delete("Order", "1".into(), None, json!({}));
    }
}
