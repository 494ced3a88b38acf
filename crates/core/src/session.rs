//! Session turn log.
//!
//! A session is an ordered list of user/assistant turns bound to one
//! student. Prior turns are replayed to the model as role-tagged messages
//! instead of being concatenated into the query text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;
use crate::profile::StudentId;

/// Stable identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub student_id: StudentId,
    /// Ordered turns, oldest first.
    pub turns: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(student_id: StudentId) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            student_id,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record one exchange and keep at most `limit` most recent turns.
    pub fn record(&mut self, query: &str, reply: &str, limit: usize) {
        self.turns.push(Message::user(query));
        self.turns.push(Message::assistant(reply));
        if self.turns.len() > limit {
            let excess = self.turns.len() - limit;
            self.turns.drain(..excess);
        }
        self.updated_at = Utc::now();
    }
}
