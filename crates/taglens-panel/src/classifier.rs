//! Decides whether a finished network request is a GA4-shaped analytics hit
//! and, if so, turns it into a flat parameter map ready for the store.

use serde_json::{Map, Value};
use url::Url;

use taglens_core::error::ClassifyError;
use taglens_protocol::RequestRecord;

/// Hosts whose traffic is considered analytics traffic. Matched as plain
/// substrings of the request host, case-sensitive as received.
pub const ANALYTICS_HOSTS: [&str; 3] = [
    "google-analytics.com",
    "analytics.google.com",
    "merchant-center-analytics.goog",
];

/// Placeholder name for hits accepted on `v=2` alone.
const NO_EN_NAME: &str = "(no en)";

/// A recognized GA4 hit: logical event name plus the merged parameter map
/// (query + POST body, with `_host` / `_path` derived fields).
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkHit {
    pub name: String,
    pub payload: Map<String, Value>,
}

/// Classifies one finished request. Pure: no side effects beyond the
/// returned descriptor.
///
/// `Ok(None)` means the request is simply not in scope (wrong host, or not
/// GA4-shaped). `Err` is reserved for URLs that do not parse at all; callers
/// log and drop those rather than propagating.
pub fn classify(record: &RequestRecord) -> Result<Option<NetworkHit>, ClassifyError> {
    let url = Url::parse(&record.url)
        .map_err(|_| ClassifyError::MalformedUrl(record.url.clone()))?;

    let host = url.host_str().unwrap_or("");
    let path = url.path();

    if !ANALYTICS_HOSTS.iter().any(|allowed| host.contains(allowed)) {
        return Ok(None);
    }

    // Query params first; on repeats the last occurrence wins.
    let mut params = Map::new();
    for (key, value) in url.query_pairs() {
        params.insert(key.into_owned(), Value::String(value.into_owned()));
    }

    // Merge POST body params, never overriding what the query supplied.
    if let Some(body) = record.body_text() {
        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| Value::String(value.into_owned()));
        }
    }

    // GA4 by protocol version or by a non-empty event name. Other analytics
    // traffic to these hosts (e.g. UA hits) is out of scope.
    let version_is_2 = params.get("v").and_then(Value::as_str) == Some("2");
    let event_name = match params.get("en").and_then(Value::as_str) {
        Some(en) if !en.is_empty() => Some(en.to_string()),
        _ => None,
    };

    if !version_is_2 && event_name.is_none() {
        log::debug!("analytics hit ignored (not GA4): {}", record.url);
        return Ok(None);
    }

    let name = event_name.unwrap_or_else(|| NO_EN_NAME.to_string());
    params.insert("_host".to_string(), Value::String(host.to_string()));
    params.insert("_path".to_string(), Value::String(path.to_string()));

    Ok(Some(NetworkHit { name, payload: params }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taglens_protocol::PostData;

    fn record(url: &str) -> RequestRecord {
        RequestRecord {
            url: url.to_string(),
            method: None,
            post_data: None,
        }
    }

    fn record_with_body(url: &str, body: &str) -> RequestRecord {
        RequestRecord {
            url: url.to_string(),
            method: Some("POST".to_string()),
            post_data: Some(PostData {
                text: Some(body.to_string()),
            }),
        }
    }

    #[test]
    fn recognizes_v2_collect_hit() {
        let hit = classify(&record(
            "https://www.google-analytics.com/g/collect?v=2&en=purchase&tid=G-XXX",
        ))
        .unwrap()
        .expect("should classify");

        assert_eq!(hit.name, "purchase");
        assert_eq!(hit.payload["v"], "2");
        assert_eq!(hit.payload["en"], "purchase");
        assert_eq!(hit.payload["tid"], "G-XXX");
        assert_eq!(hit.payload["_host"], "www.google-analytics.com");
        assert_eq!(hit.payload["_path"], "/g/collect");
    }

    #[test]
    fn ignores_non_analytics_hosts() {
        let out = classify(&record("https://cdn.example.com/g/collect?v=2&en=purchase")).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn ignores_analytics_traffic_that_is_not_ga4_shaped() {
        // UA-era hit: v=1 and no event name.
        let out = classify(&record(
            "https://www.google-analytics.com/collect?v=1&t=pageview",
        ))
        .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn accepts_on_event_name_alone() {
        let hit = classify(&record(
            "https://analytics.google.com/g/collect?en=scroll",
        ))
        .unwrap()
        .expect("en alone is enough");
        assert_eq!(hit.name, "scroll");
    }

    #[test]
    fn empty_en_does_not_count_as_event_name() {
        let out = classify(&record("https://www.google-analytics.com/g/collect?en=")).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn v2_without_en_gets_placeholder_name() {
        let hit = classify(&record("https://www.google-analytics.com/g/collect?v=2"))
            .unwrap()
            .unwrap();
        assert_eq!(hit.name, "(no en)");
    }

    #[test]
    fn query_params_win_over_post_body() {
        let hit = classify(&record_with_body(
            "https://www.google-analytics.com/g/collect?v=2&cid=from-query",
            "cid=from-body&sid=123",
        ))
        .unwrap()
        .unwrap();

        assert_eq!(hit.payload["cid"], "from-query");
        assert_eq!(hit.payload["sid"], "123");
    }

    #[test]
    fn event_name_may_come_from_the_body() {
        let hit = classify(&record_with_body(
            "https://www.google-analytics.com/g/collect?v=2",
            "en=add_to_cart",
        ))
        .unwrap()
        .unwrap();
        assert_eq!(hit.name, "add_to_cart");
    }

    #[test]
    fn malformed_url_is_reported_not_classified() {
        let err = classify(&record("not a url at all")).unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedUrl(_)));
    }
}
