//! Diffs a captured event's actual parameters against its declared spec.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::CapturedEvent;
use crate::spec::{ParamType, ParameterSpec};

pub const NO_EVENT_NAME: &str = "no event name on this event";
pub const NO_MATCHING_SPEC: &str = "no spec defined for this event";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMismatch {
    pub key: String,
    pub expected: ParamType,
    pub actual: ParamType,
}

/// Outcome of one comparison. Derived fresh per call, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub has_spec: bool,
    /// Why no comparison happened, when `has_spec` is false.
    pub reason: Option<&'static str>,
    pub event_name: Option<String>,
    pub expected_count: usize,
    pub actual_count: usize,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
}

impl ValidationResult {
    fn without_spec(reason: &'static str) -> Self {
        Self {
            has_spec: false,
            reason: Some(reason),
            ..Self::default()
        }
    }

    /// True when a spec exists and all three difference lists are empty.
    pub fn is_compliant(&self) -> bool {
        self.has_spec
            && self.missing.is_empty()
            && self.extra.is_empty()
            && self.type_mismatches.is_empty()
    }
}

/// Compares `event` against the spec declared for its name.
///
/// Pure and order-independent: the same (event, spec) pair always yields the
/// identical result, with difference lists in sorted order.
pub fn validate(event: &CapturedEvent, spec: &ParameterSpec) -> ValidationResult {
    if event.name.is_empty() {
        return ValidationResult::without_spec(NO_EVENT_NAME);
    }

    let Some(event_spec) = spec.get(&event.name) else {
        return ValidationResult::without_spec(NO_MATCHING_SPEC);
    };
    let expected = &event_spec.params;

    // Actual params are the top-level payload keys, minus the framework's
    // own fields ("event" itself and the gtm.* bookkeeping keys). Non-object
    // payloads (e.g. a dataLayer init snapshot) have no parameters.
    let empty = serde_json::Map::new();
    let payload = event.payload.as_object().unwrap_or(&empty);
    let actual_keys: BTreeSet<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|k| *k != "event" && !k.starts_with("gtm."))
        .collect();

    let mut missing = Vec::new();
    let mut type_mismatches = Vec::new();
    for (key, expected_type) in expected {
        if !actual_keys.contains(key.as_str()) {
            missing.push(key.clone());
        } else {
            let actual_type = ParamType::of_value(&payload[key]);
            if *expected_type != actual_type {
                type_mismatches.push(TypeMismatch {
                    key: key.clone(),
                    expected: *expected_type,
                    actual: actual_type,
                });
            }
        }
    }
    missing.sort();
    type_mismatches.sort_by(|a, b| a.key.cmp(&b.key));

    let extra: Vec<String> = actual_keys
        .iter()
        .filter(|k| !expected.contains_key(**k))
        .map(|k| k.to_string())
        .collect();

    ValidationResult {
        has_spec: true,
        reason: None,
        event_name: Some(event.name.clone()),
        expected_count: expected.len(),
        actual_count: actual_keys.len(),
        missing,
        extra,
        type_mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventId, EventOrigin};
    use serde_json::json;

    fn push_event(name: &str, payload: serde_json::Value) -> CapturedEvent {
        CapturedEvent {
            id: EventId(1),
            origin: EventOrigin::Instrumentation,
            raw_kind: "dataLayerPush".to_string(),
            name: name.to_string(),
            payload,
        }
    }

    #[test]
    fn reports_missing_params() {
        let spec = ParameterSpec::builtin();
        let event = push_event(
            "about_us_click",
            json!({ "event": "about_us_click", "page_type": "home" }),
        );

        let result = validate(&event, &spec);
        assert!(result.has_spec);
        assert_eq!(result.actual_count, 1);
        assert_eq!(result.expected_count, 10);
        assert!(result.missing.contains(&"cta_text".to_string()));
        assert!(!result.missing.contains(&"page_type".to_string()));
        assert!(result.extra.is_empty());
        assert!(result.type_mismatches.is_empty());
    }

    #[test]
    fn reports_extra_and_mismatched_params() {
        let spec = ParameterSpec::builtin();
        let event = push_event(
            "homepage_category_bar",
            json!({
                "event": "homepage_category_bar",
                "page_type": 7,
                "cta_text": "Shop",
                "link_path": "/shop",
                "user_type_event": "guest",
                "User_ID_event": "u-1",
                "PC1": "a",
                "PC2": "b",
                "debug_mode": true,
            }),
        );

        let result = validate(&event, &spec);
        assert_eq!(result.extra, vec!["debug_mode".to_string()]);
        assert_eq!(
            result.type_mismatches,
            vec![TypeMismatch {
                key: "page_type".to_string(),
                expected: ParamType::String,
                actual: ParamType::Number,
            }]
        );
        assert!(result.missing.is_empty());
        assert!(!result.is_compliant());
    }

    #[test]
    fn framework_keys_are_not_parameters() {
        let spec = ParameterSpec::builtin();
        let event = push_event(
            "about_us_click",
            json!({
                "event": "about_us_click",
                "gtm.uniqueEventId": 42,
                "gtm.start": 1700000000,
                "page_type": "home",
            }),
        );

        let result = validate(&event, &spec);
        assert_eq!(result.actual_count, 1);
        assert!(result.extra.is_empty());
    }

    #[test]
    fn unknown_event_has_no_spec() {
        let spec = ParameterSpec::builtin();
        let result = validate(&push_event("(no event)", json!({})), &spec);
        assert!(!result.has_spec);
        assert_eq!(result.reason, Some(NO_MATCHING_SPEC));
    }

    #[test]
    fn nameless_event_has_no_spec() {
        let spec = ParameterSpec::builtin();
        let result = validate(&push_event("", json!({})), &spec);
        assert!(!result.has_spec);
        assert_eq!(result.reason, Some(NO_EVENT_NAME));
    }

    #[test]
    fn fully_compliant_event() {
        let spec = ParameterSpec::builtin();
        let event = push_event(
            "homepage_category_bar",
            json!({
                "event": "homepage_category_bar",
                "page_type": "home",
                "cta_text": "Shop",
                "link_path": "/shop",
                "user_type_event": "guest",
                "User_ID_event": "u-1",
                "PC1": "a",
                "PC2": "b",
            }),
        );

        let result = validate(&event, &spec);
        assert!(result.is_compliant());
        assert_eq!(result.expected_count, result.actual_count);
    }

    #[test]
    fn validation_is_deterministic() {
        let spec = ParameterSpec::builtin();
        let event = push_event(
            "about_us_click",
            json!({ "event": "about_us_click", "page_type": null, "surprise": 1 }),
        );

        let first = validate(&event, &spec);
        let second = validate(&event, &spec);
        assert_eq!(first, second);
        assert_eq!(
            first.type_mismatches[0],
            TypeMismatch {
                key: "page_type".to_string(),
                expected: ParamType::String,
                actual: ParamType::Null,
            }
        );
    }

    #[test]
    fn array_payload_has_no_parameters() {
        let spec = ParameterSpec::builtin();
        let mut event = push_event("about_us_click", json!([{ "event": "x" }]));
        event.raw_kind = "dataLayerInit".to_string();

        let result = validate(&event, &spec);
        assert!(result.has_spec);
        assert_eq!(result.actual_count, 0);
        assert_eq!(result.missing.len(), 10);
    }
}
