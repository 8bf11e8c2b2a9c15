use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of one navigation of the inspected tab, derived from the
/// creation time (epoch millis) so sessions sort by when they started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Store-wide event identifier, strictly increasing across all sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// How an event was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    /// Pushed onto the page's data layer and observed by the page hook.
    Instrumentation,
    /// Recognized analytics beacon on the wire.
    Network,
}

/// Which of a session's two event collections the UI currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    Instrumentation,
    Network,
}

/// One observed instrumentation push or one recognized network hit.
///
/// Immutable once appended to a session; the id is assigned at capture time
/// and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedEvent {
    pub id: EventId,
    pub origin: EventOrigin,
    /// Free-form capture tag, e.g. "dataLayerPush" or "ga4-hit".
    pub raw_kind: String,
    pub name: String,
    pub payload: Value,
}

/// Everything captured during one navigation/reload of the inspected tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSession {
    pub id: SessionId,
    /// Address the tab navigated to when this session started.
    pub url: String,
    pub expanded: bool,
    pub active_tab: ActiveTab,
    pub instrumentation_events: Vec<CapturedEvent>,
    pub network_events: Vec<CapturedEvent>,
    pub selected_instrumentation_id: Option<EventId>,
    pub selected_network_id: Option<EventId>,
}

impl PageSession {
    pub(crate) fn new(id: SessionId, url: String) -> Self {
        Self {
            id,
            url,
            expanded: true,
            active_tab: ActiveTab::Instrumentation,
            instrumentation_events: Vec::new(),
            network_events: Vec::new(),
            selected_instrumentation_id: None,
            selected_network_id: None,
        }
    }

    pub fn events(&self, origin: EventOrigin) -> &[CapturedEvent] {
        match origin {
            EventOrigin::Instrumentation => &self.instrumentation_events,
            EventOrigin::Network => &self.network_events,
        }
    }

    pub(crate) fn events_mut(&mut self, origin: EventOrigin) -> &mut Vec<CapturedEvent> {
        match origin {
            EventOrigin::Instrumentation => &mut self.instrumentation_events,
            EventOrigin::Network => &mut self.network_events,
        }
    }
}
