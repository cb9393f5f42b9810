//! Focus audit trail
//!
//! Every focus change inside a note is recorded with a logical timestamp so
//! tests and hosts can replay what the keyboard did.

use serde::{Deserialize, Serialize};

/// Focus change between snippets, identified by snippet id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusEvent {
    /// Focus was given to a snippet while none had it
    Granted { snippet_id: String, timestamp: u64 },
    /// Focus moved from one snippet to another
    Transferred {
        from_snippet_id: String,
        to_snippet_id: String,
        timestamp: u64,
    },
    /// The focused snippet lost focus and nothing took it
    Released { snippet_id: String, timestamp: u64 },
}

impl FocusEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Granted { timestamp, .. }
            | Self::Transferred { timestamp, .. }
            | Self::Released { timestamp, .. } => *timestamp,
        }
    }
}

/// Append-only record of focus changes
#[derive(Debug, Clone, Default)]
pub struct FocusTrail {
    events: Vec<FocusEvent>,
    next_timestamp: u64,
}

impl FocusTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&mut self, snippet_id: &str) {
        let timestamp = self.next_timestamp();
        self.events.push(FocusEvent::Granted {
            snippet_id: snippet_id.to_string(),
            timestamp,
        });
    }

    pub fn transferred(&mut self, from_snippet_id: &str, to_snippet_id: &str) {
        let timestamp = self.next_timestamp();
        self.events.push(FocusEvent::Transferred {
            from_snippet_id: from_snippet_id.to_string(),
            to_snippet_id: to_snippet_id.to_string(),
            timestamp,
        });
    }

    pub fn released(&mut self, snippet_id: &str) {
        let timestamp = self.next_timestamp();
        self.events.push(FocusEvent::Released {
            snippet_id: snippet_id.to_string(),
            timestamp,
        });
    }

    pub fn events(&self) -> &[FocusEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&FocusEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn next_timestamp(&mut self) -> u64 {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        ts
    }
}
