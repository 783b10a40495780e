//! Event log - append-only ordered record of every executed turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the turn's decision was accepted or why it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Validity {
    Accepted,
    Rejected(String),
}

/// One turn's record. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationEvent {
    /// 1-based turn index.
    pub turn: u32,
    pub timestamp: DateTime<Utc>,
    /// Canonical text of the decision, or the raw text when it could not be
    /// decoded.
    pub action: String,
    pub validity: Validity,
    /// Action-specific effect summary (cost, movement, gathered amounts...).
    pub effect: Value,
    pub budget_after: u64,
}

impl ExplorationEvent {
    /// The event without its wall-clock timestamp, for replay comparison.
    pub fn replay_view(&self) -> (u32, &str, &Validity, &Value, u64) {
        (
            self.turn,
            self.action.as_str(),
            &self.validity,
            &self.effect,
            self.budget_after,
        )
    }
}

/// Append-only, insertion-ordered sequence of [`ExplorationEvent`]s.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: Vec<ExplorationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: ExplorationEvent) {
        self.entries.push(event);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplorationEvent> {
        self.entries.iter()
    }

    /// Read-only export of the full trace, in turn order.
    pub fn export(&self) -> &[ExplorationEvent] {
        &self.entries
    }
}
