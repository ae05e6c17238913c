//! Presence tracking for documents open by several users.
//!
//! Only cursors are shared; document content is never merged here.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cursors not refreshed within this window are no longer shown.
pub const PRESENCE_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: u32,
    pub head: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationCursor {
    pub user_id: String,
    pub user_name: String,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    pub last_seen: DateTime<Utc>,
}

/// Body of a cursor update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorUpdate {
    pub position: u32,
    #[serde(default)]
    pub selection: Option<Selection>,
}

/// Presence summary returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceView {
    pub document_id: String,
    pub cursors: Vec<CollaborationCursor>,
    pub is_collaborating: bool,
}

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    sessions: RwLock<HashMap<String, HashMap<String, CollaborationCursor>>>,
}

type Sessions = HashMap<String, HashMap<String, CollaborationCursor>>;

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Sessions> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Sessions> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a user on a document with the cursor at the start.
    pub fn join(&self, document_id: &str, user_id: &str, user_name: &str) -> CollaborationCursor {
        let cursor = CollaborationCursor {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            position: 0,
            selection: None,
            last_seen: Utc::now(),
        };
        self.write()
            .entry(document_id.to_string())
            .or_default()
            .insert(user_id.to_string(), cursor.clone());
        tracing::debug!(document_id, user_id, "joined document");
        cursor
    }

    /// Move a user's cursor, joining the document first when needed.
    pub fn update_cursor(
        &self,
        document_id: &str,
        user_id: &str,
        user_name: &str,
        update: CursorUpdate,
    ) -> CollaborationCursor {
        let mut sessions = self.write();
        let cursor = sessions
            .entry(document_id.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_insert_with(|| CollaborationCursor {
                user_id: user_id.to_string(),
                user_name: user_name.to_string(),
                position: 0,
                selection: None,
                last_seen: Utc::now(),
            });
        cursor.position = update.position;
        cursor.selection = update.selection;
        cursor.last_seen = Utc::now();
        cursor.clone()
    }

    pub fn leave(&self, document_id: &str, user_id: &str) {
        let mut sessions = self.write();
        if let Some(cursors) = sessions.get_mut(document_id) {
            cursors.remove(user_id);
            if cursors.is_empty() {
                sessions.remove(document_id);
            }
        }
    }

    /// Drop every cursor of a document, e.g. after it was deleted.
    pub fn close(&self, document_id: &str) {
        self.write().remove(document_id);
    }

    pub fn active_cursors(&self, document_id: &str) -> Vec<CollaborationCursor> {
        self.active_cursors_at(document_id, Utc::now())
    }

    /// Cursors seen within [`PRESENCE_TTL_MINUTES`] of `now`, ordered by user id.
    pub fn active_cursors_at(&self, document_id: &str, now: DateTime<Utc>) -> Vec<CollaborationCursor> {
        let cutoff = now - Duration::minutes(PRESENCE_TTL_MINUTES);
        let mut cursors: Vec<CollaborationCursor> = self
            .read()
            .get(document_id)
            .map(|c| c.values().filter(|c| c.last_seen > cutoff).cloned().collect())
            .unwrap_or_default();
        cursors.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        cursors
    }

    /// More than one person currently has the document open.
    pub fn has_active_collaborators(&self, document_id: &str) -> bool {
        self.active_cursors(document_id).len() > 1
    }

    pub fn view(&self, document_id: &str) -> PresenceView {
        let cursors = self.active_cursors(document_id);
        PresenceView {
            document_id: document_id.to_string(),
            is_collaborating: cursors.len() > 1,
            cursors,
        }
    }
}
