//! In-memory session turn logs for `/agent`.
//!
//! Each session is bound to the student that opened it. The map is bounded:
//! once `max_sessions` is reached the least recently updated session is
//! dropped to make room.

use std::collections::HashMap;

use padhai_core::message::Message;
use padhai_core::profile::StudentId;
use padhai_core::session::{Session, SessionId};
use padhai_core::{Error, Result};
use tokio::sync::RwLock;
use tracing::debug;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
    max_sessions: usize,
    turn_limit: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, turn_limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            turn_limit: turn_limit.max(1),
        }
    }

    /// Prior turns of `id` for `student_id`, oldest first.
    ///
    /// An id the registry does not hold (never seen, or evicted) has no
    /// history. An id bound to another student is rejected.
    pub async fn history(&self, id: &SessionId, student_id: &StudentId) -> Result<Vec<Message>> {
        let sessions = self.sessions.read().await;
        match sessions.get(id) {
            Some(session) if session.student_id != *student_id => Err(Error::InvalidInput(
                format!("session {id} belongs to another student"),
            )),
            Some(session) => Ok(session.turns.clone()),
            None => Ok(Vec::new()),
        }
    }

    /// Record one exchange, creating the session if needed.
    pub async fn record(
        &self,
        id: &SessionId,
        student_id: &StudentId,
        query: &str,
        reply: &str,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(id) {
            if session.student_id != *student_id {
                return Err(Error::InvalidInput(format!(
                    "session {id} belongs to another student"
                )));
            }
            session.record(query, reply, self.turn_limit);
            return Ok(());
        }

        if sessions.len() >= self.max_sessions {
            if let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.updated_at)
                .map(|(k, _)| k.clone())
            {
                sessions.remove(&oldest);
                debug!(session = %oldest, "Evicted session");
            }
        }

        let mut session = Session::new(student_id.clone());
        session.id = id.clone();
        session.record(query, reply, self.turn_limit);
        sessions.insert(id.clone(), session);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
