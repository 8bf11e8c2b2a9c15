//! Actix message types at the panel's ingestion boundary.

use actix::prelude::*;

use taglens_core::error::CoreError;
use taglens_protocol::{DataLayerMessage, RequestRecord};

use crate::model::{ActiveTab, EventId, EventOrigin, PageSession, SessionId};
use crate::validator::ValidationResult;

// --- Relay ingestion ---

/// The inspected tab navigated (delivered once at panel startup too).
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct PageNavigated {
    pub url: String,
}

/// A data-layer notification forwarded verbatim by the relay.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct DataLayerNotice(pub DataLayerMessage);

/// One finished network request from the network-inspection API.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct RequestFinished(pub RequestRecord);

// --- Store change notifications ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Broadcast to subscribers after every successful store mutation.
#[derive(Message, Debug, Clone, PartialEq)]
#[rtype(result = "()")]
pub enum StoreChanged {
    SessionStarted {
        session: SessionId,
    },
    EventCaptured {
        session: SessionId,
        origin: EventOrigin,
        event: EventId,
    },
}

#[derive(Message)]
#[rtype(result = "Result<SubscriptionId, CoreError>")]
pub struct Subscribe {
    pub subscriber: Recipient<StoreChanged>,
}

#[derive(Message)]
#[rtype(result = "Result<(), CoreError>")]
pub struct Unsubscribe {
    pub subscription_id: SubscriptionId,
}

// --- Presentation-layer reads and commands ---

/// Cloned snapshot of all sessions, newest first.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<Vec<PageSession>, CoreError>")]
pub struct GetSessions;

/// Runs the spec validator against one captured event. `Ok(None)` when the
/// session or event is unknown.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<Option<ValidationResult>, CoreError>")]
pub struct ValidateEvent {
    pub session: SessionId,
    pub origin: EventOrigin,
    pub event: EventId,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "bool")]
pub struct SelectEvent {
    pub session: SessionId,
    pub origin: EventOrigin,
    pub event: EventId,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "bool")]
pub struct SetActiveTab {
    pub session: SessionId,
    pub tab: ActiveTab,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "bool")]
pub struct ToggleExpanded {
    pub session: SessionId,
}
