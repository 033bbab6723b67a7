//! Audit side-channel contract
//!
//! Entries are fire-and-forget: recording can never fail the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub entity: &'static str,
    pub entity_id: String,
    pub actor: Option<String>,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub at: DateTime<Utc>,
}

pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);

    fn log_create(&self, entity: &'static str, entity_id: String, actor: Option<&str>, after: Value) {
        self.record(AuditEntry {
            action: AuditAction::Create,
            entity,
            entity_id,
            actor: actor.map(str::to_string),
            before: None,
            after: Some(after),
            at: Utc::now(),
        });
    }

    fn log_update(
        &self,
        entity: &'static str,
        entity_id: String,
        actor: Option<&str>,
        before: Option<Value>,
        after: Value,
    ) {
        self.record(AuditEntry {
            action: AuditAction::Update,
            entity,
            entity_id,
            actor: actor.map(str::to_string),
            before,
            after: Some(after),
            at: Utc::now(),
        });
    }

    fn log_delete(&self, entity: &'static str, entity_id: String, actor: Option<&str>, before: Value) {
        self.record(AuditEntry {
            action: AuditAction::Delete,
            entity,
            entity_id,
            actor: actor.map(str::to_string),
            before: Some(before),
            after: None,
            at: Utc::now(),
        });
    }
}

/// Sink that drops everything
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _entry: AuditEntry) {}
}
