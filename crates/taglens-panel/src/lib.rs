//! Core pipeline of the taglens devtools panel: classify analytics network
//! hits, correlate captured events with the navigated page and validate
//! event parameters against a declared spec.
//!
//! The presentation layer and the message relay are external collaborators;
//! they talk to this crate through [`PanelActor`] messages and the pure
//! [`validate`] function.

// --- Data Model ---
pub mod model;
pub use model::*;

// --- Hit Classifier ---
pub mod classifier;
pub use classifier::{ANALYTICS_HOSTS, NetworkHit, classify};

// --- Parameter Spec ---
pub mod spec;
pub use spec::{EventSpec, ParamType, ParameterSpec};

// --- Page/Event Store ---
pub mod store;
pub use store::{EventData, EventStore};

// --- Spec Validator ---
pub mod validator;
pub use validator::{TypeMismatch, ValidationResult, validate};

// --- Ingestion Actor ---
pub mod messages;
pub use messages::*;

mod actor;
pub use actor::PanelActor;
