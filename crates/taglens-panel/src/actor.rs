//! The ingestion boundary: a single actor whose mailbox is the one logical
//! consumer of relay notifications. Each notification is processed to
//! completion (classify -> append -> notify subscribers) before the next,
//! so arrival order is store order and no mutation ever overlaps another.

use std::collections::HashMap;
use std::time::SystemTime;

use actix::{Actor, Context, Handler, Recipient, Supervised};
use log::{debug, info, warn};
use serde_json::Value;

use taglens_core::error::CoreError;
use taglens_protocol::DataLayerMessage;

use crate::classifier;
use crate::messages::{
    DataLayerNotice, GetSessions, PageNavigated, RequestFinished, SelectEvent, SetActiveTab,
    StoreChanged, Subscribe, SubscriptionId, ToggleExpanded, Unsubscribe, ValidateEvent,
};
use crate::model::{EventOrigin, PageSession};
use crate::spec::ParameterSpec;
use crate::store::{EventData, EventStore};
use crate::validator::{self, ValidationResult};

const RAW_KIND_PUSH: &str = "dataLayerPush";
const RAW_KIND_INIT: &str = "dataLayerInit";
const RAW_KIND_HIT: &str = "ga4-hit";

/// Name given to pushes whose first argument has no `event` field.
const NO_EVENT_NAME: &str = "(no event)";
/// Name given to the pre-existing queue snapshot.
const INIT_EVENT_NAME: &str = "[dataLayer init]";

#[derive(Debug, Default)]
struct PanelMetrics {
    events_captured: u64,
    events_dropped: u64,
    classify_errors: u64,
    last_event_at: Option<SystemTime>,
    last_error_at: Option<SystemTime>,
}

pub struct PanelActor {
    store: EventStore,
    spec: ParameterSpec,
    subscribers: HashMap<SubscriptionId, Recipient<StoreChanged>>,
    next_subscription_id: u64,
    metrics: PanelMetrics,
}

impl Actor for PanelActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("PanelActor started ({} spec entries)", self.spec.len());
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(
            "PanelActor stopped (captured: {}, dropped: {}, classify errors: {})",
            self.metrics.events_captured, self.metrics.events_dropped, self.metrics.classify_errors
        );
        self.subscribers.clear();
    }
}

impl Supervised for PanelActor {
    fn restarting(&mut self, _ctx: &mut <Self as Actor>::Context) {
        warn!("PanelActor is being restarted");
        self.subscribers.clear();
    }
}

impl PanelActor {
    pub fn new(spec: ParameterSpec) -> Self {
        Self {
            store: EventStore::new(),
            spec,
            subscribers: HashMap::new(),
            next_subscription_id: 1,
            metrics: PanelMetrics::default(),
        }
    }

    fn broadcast(&mut self, change: StoreChanged) {
        let mut failed = Vec::new();

        for (id, subscriber) in &self.subscribers {
            if let Err(e) = subscriber.try_send(change.clone()) {
                warn!("failed to deliver store change to subscriber {}: {}", id.0, e);
                failed.push(*id);
            }
        }

        // Clean up subscribers that went away.
        for id in failed {
            self.subscribers.remove(&id);
        }
    }

    /// Appends one classified event and tells subscribers. Dropping (no
    /// active session yet) is a recoverable no-op.
    fn capture(&mut self, origin: EventOrigin, data: EventData) {
        let appended = self.store.append_event(origin, data).map(|event| event.id);

        match appended {
            Some(event) => {
                self.metrics.events_captured += 1;
                self.metrics.last_event_at = Some(SystemTime::now());

                if let Some(session) = self.store.active_session().map(|s| s.id) {
                    self.broadcast(StoreChanged::EventCaptured {
                        session,
                        origin,
                        event,
                    });
                }
            }
            None => {
                self.metrics.events_dropped += 1;
            }
        }
    }
}

impl Handler<PageNavigated> for PanelActor {
    type Result = ();

    fn handle(&mut self, msg: PageNavigated, _ctx: &mut Context<Self>) {
        let session = self.store.start_session(msg.url);
        self.broadcast(StoreChanged::SessionStarted { session });
    }
}

impl Handler<DataLayerNotice> for PanelActor {
    type Result = ();

    fn handle(&mut self, msg: DataLayerNotice, _ctx: &mut Context<Self>) {
        match msg.0 {
            DataLayerMessage::DataLayerPush { args } => {
                // The first push argument carries the event, if any.
                let first = args.into_iter().next().unwrap_or(Value::Null);
                let name = first
                    .get("event")
                    .and_then(Value::as_str)
                    .unwrap_or(NO_EVENT_NAME)
                    .to_string();

                self.capture(
                    EventOrigin::Instrumentation,
                    EventData {
                        raw_kind: RAW_KIND_PUSH.to_string(),
                        name,
                        payload: first,
                    },
                );
            }
            DataLayerMessage::DataLayerInit { data } => {
                self.capture(
                    EventOrigin::Instrumentation,
                    EventData {
                        raw_kind: RAW_KIND_INIT.to_string(),
                        name: INIT_EVENT_NAME.to_string(),
                        payload: Value::Array(data),
                    },
                );
            }
        }
    }
}

impl Handler<RequestFinished> for PanelActor {
    type Result = ();

    fn handle(&mut self, msg: RequestFinished, _ctx: &mut Context<Self>) {
        match classifier::classify(&msg.0) {
            Ok(Some(hit)) => {
                debug!("GA4 hit detected: {}", hit.name);
                self.capture(
                    EventOrigin::Network,
                    EventData {
                        raw_kind: RAW_KIND_HIT.to_string(),
                        name: hit.name,
                        payload: Value::Object(hit.payload),
                    },
                );
            }
            Ok(None) => {} // Not analytics traffic, or not GA4-shaped.
            Err(e) => {
                // Malformed input never aborts the pipeline.
                warn!("discarding request: {}", e);
                self.metrics.classify_errors += 1;
                self.metrics.last_error_at = Some(SystemTime::now());
            }
        }
    }
}

impl Handler<Subscribe> for PanelActor {
    type Result = Result<SubscriptionId, CoreError>;

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Context<Self>) -> Self::Result {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.insert(id, msg.subscriber);
        Ok(id)
    }
}

impl Handler<Unsubscribe> for PanelActor {
    type Result = Result<(), CoreError>;

    fn handle(&mut self, msg: Unsubscribe, _ctx: &mut Context<Self>) -> Self::Result {
        self.subscribers.remove(&msg.subscription_id);
        Ok(())
    }
}

impl Handler<GetSessions> for PanelActor {
    type Result = Result<Vec<PageSession>, CoreError>;

    fn handle(&mut self, _msg: GetSessions, _ctx: &mut Context<Self>) -> Self::Result {
        Ok(self.store.sessions().to_vec())
    }
}

impl Handler<ValidateEvent> for PanelActor {
    type Result = Result<Option<ValidationResult>, CoreError>;

    fn handle(&mut self, msg: ValidateEvent, _ctx: &mut Context<Self>) -> Self::Result {
        let event = self
            .store
            .session(msg.session)
            .and_then(|s| s.events(msg.origin).iter().find(|e| e.id == msg.event));

        Ok(event.map(|event| validator::validate(event, &self.spec)))
    }
}

impl Handler<SelectEvent> for PanelActor {
    type Result = bool;

    fn handle(&mut self, msg: SelectEvent, _ctx: &mut Context<Self>) -> Self::Result {
        self.store.select_event(msg.session, msg.origin, msg.event)
    }
}

impl Handler<SetActiveTab> for PanelActor {
    type Result = bool;

    fn handle(&mut self, msg: SetActiveTab, _ctx: &mut Context<Self>) -> Self::Result {
        self.store.set_active_tab(msg.session, msg.tab)
    }
}

impl Handler<ToggleExpanded> for PanelActor {
    type Result = bool;

    fn handle(&mut self, msg: ToggleExpanded, _ctx: &mut Context<Self>) -> Self::Result {
        self.store.toggle_expanded(msg.session)
    }
}
