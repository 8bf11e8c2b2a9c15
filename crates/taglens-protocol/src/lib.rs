//! Wire types for everything the message relay delivers to the panel.
//!
//! The relay itself (page hook -> content script -> background -> panel) is
//! a byte-for-byte forwarder and lives outside this workspace; these types
//! only pin down the shapes it carries: data-layer notifications from the
//! page hook, finished-request records from the network-inspection API and
//! navigation notices for the inspected tab.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A notification emitted by the page observer hook.
///
/// The hook posts `{ type: "dataLayerInit" | "dataLayerPush", payload: ... }`
/// messages; the tag/content split below matches that envelope verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum DataLayerMessage {
    /// Snapshot of the queue contents at hook-install time.
    DataLayerInit {
        #[serde(default)]
        data: Vec<Value>,
    },
    /// Arguments of one `push(...)` call observed after install.
    DataLayerPush {
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// One finished network request as reported by the network-inspection API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RequestRecord {
    /// The raw POST body text, when the record carries one.
    pub fn body_text(&self) -> Option<&str> {
        self.post_data.as_ref()?.text.as_deref()
    }
}

/// Address delivered once at panel startup and once per navigation of the
/// inspected tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageNavigation {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_push_envelope_from_relay() {
        let raw = json!({
            "type": "dataLayerPush",
            "payload": { "args": [ { "event": "about_us_click", "page_type": "home" } ] }
        });

        let msg: DataLayerMessage = serde_json::from_value(raw).unwrap();
        match msg {
            DataLayerMessage::DataLayerPush { args } => {
                assert_eq!(args.len(), 1);
                assert_eq!(args[0]["event"], "about_us_click");
            }
            other => panic!("expected push, got {other:?}"),
        }
    }

    #[test]
    fn parses_init_envelope_with_missing_data() {
        // The hook sends whatever the queue held; tolerate an empty payload.
        let msg: DataLayerMessage =
            serde_json::from_value(json!({ "type": "dataLayerInit", "payload": {} })).unwrap();
        assert_eq!(msg, DataLayerMessage::DataLayerInit { data: vec![] });
    }

    #[test]
    fn parses_request_record_with_post_body() {
        let raw = json!({
            "url": "https://www.google-analytics.com/g/collect?v=2",
            "postData": { "text": "en=page_view" }
        });

        let record: RequestRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.body_text(), Some("en=page_view"));
        assert!(record.method.is_none());
    }
}
