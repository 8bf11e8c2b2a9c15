//! Per-navigation collections of captured events.
//!
//! One store per panel instance; it owns the session list, the active
//! session pointer and the global event counter, so there is no ambient
//! global state anywhere in the pipeline.

use log::{debug, warn};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{ActiveTab, CapturedEvent, EventId, EventOrigin, PageSession, SessionId};

/// One event as delivered by the ingestion boundary, before id assignment.
#[derive(Debug, Clone)]
pub struct EventData {
    pub raw_kind: String,
    pub name: String,
    pub payload: Value,
}

#[derive(Debug, Default)]
pub struct EventStore {
    /// Newest first; the newest session is the active one.
    sessions: Vec<PageSession>,
    active_session: Option<SessionId>,
    last_event_id: u64,
    last_session_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for a freshly navigated page and makes it the one
    /// new events attach to. The previous session keeps its events but is
    /// collapsed and frozen.
    pub fn start_session(&mut self, url: impl Into<String>) -> SessionId {
        if let Some(active_id) = self.active_session
            && let Some(prev) = self.session_mut(active_id)
        {
            prev.expanded = false;
        }

        let id = self.next_session_id();
        let url = url.into();
        debug!("starting session {} for {}", id.0, url);

        self.sessions.insert(0, PageSession::new(id, url));
        self.active_session = Some(id);
        id
    }

    fn next_session_id(&mut self) -> SessionId {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        // Two navigations within one millisecond must still get distinct ids.
        let id = now_millis.max(self.last_session_id + 1);
        self.last_session_id = id;
        SessionId(id)
    }

    /// Appends an event to the active session's per-origin sequence.
    ///
    /// With no active session the event is dropped: notifications can beat
    /// the initial navigation signal during panel startup, and that must
    /// never take the pipeline down.
    pub fn append_event(&mut self, origin: EventOrigin, data: EventData) -> Option<&CapturedEvent> {
        let Some(active_id) = self.active_session else {
            warn!(
                "no active session, dropping {:?} event {:?}",
                origin, data.name
            );
            return None;
        };

        self.last_event_id += 1;
        let event = CapturedEvent {
            id: EventId(self.last_event_id),
            origin,
            raw_kind: data.raw_kind,
            name: data.name,
            payload: data.payload,
        };

        let session = self.session_mut(active_id)?;
        let events = session.events_mut(origin);
        events.push(event);
        events.last()
    }

    /// Sessions, newest first.
    pub fn sessions(&self) -> &[PageSession] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<&PageSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_session(&self) -> Option<&PageSession> {
        self.active_session.and_then(|id| self.session(id))
    }

    /// Marks an event as the detail-view selection for its tab. False when
    /// the session or event is unknown.
    pub fn select_event(&mut self, session: SessionId, origin: EventOrigin, event: EventId) -> bool {
        let Some(session) = self.session_mut(session) else {
            return false;
        };
        if !session.events(origin).iter().any(|e| e.id == event) {
            return false;
        }
        match origin {
            EventOrigin::Instrumentation => session.selected_instrumentation_id = Some(event),
            EventOrigin::Network => session.selected_network_id = Some(event),
        }
        true
    }

    pub fn set_active_tab(&mut self, session: SessionId, tab: ActiveTab) -> bool {
        match self.session_mut(session) {
            Some(session) => {
                session.active_tab = tab;
                true
            }
            None => false,
        }
    }

    pub fn toggle_expanded(&mut self, session: SessionId) -> bool {
        match self.session_mut(session) {
            Some(session) => {
                session.expanded = !session.expanded;
                true
            }
            None => false,
        }
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut PageSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
