//! Declared parameter expectations per event name, keyed the way the
//! instrumentation team writes them: event -> { param -> type tag }.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use taglens_core::error::CoreError;

/// Runtime type tag of an event parameter.
///
/// `Undefined` never comes out of [`ParamType::of_value`]; it exists so
/// spec tables written against the original panel keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    Undefined,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }

    /// Type tag of a captured JSON value.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected parameters for one event name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    #[serde(default)]
    pub params: HashMap<String, ParamType>,
}

/// The process-wide event-name -> expected-parameters table. Read-only at
/// runtime; assembled once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpec {
    events: HashMap<String, EventSpec>,
}

impl ParameterSpec {
    /// The table shipped with the panel.
    pub fn builtin() -> Self {
        fn entry(params: &[&str]) -> EventSpec {
            EventSpec {
                params: params
                    .iter()
                    .map(|name| (name.to_string(), ParamType::String))
                    .collect(),
            }
        }

        let mut events = HashMap::new();
        events.insert(
            "homepage_category_bar".to_string(),
            entry(&[
                "page_type",
                "cta_text",
                "link_path",
                "user_type_event",
                "User_ID_event",
                "PC1",
                "PC2",
            ]),
        );
        events.insert(
            "about_us_click".to_string(),
            entry(&[
                "page_type",
                "section_name",
                "cta_text",
                "sub_section_name",
                "selection_type",
                "link_path",
                "user_type_event",
                "User_ID_event",
                "PC1",
                "PC2",
            ]),
        );

        Self { events }
    }

    pub fn get(&self, event_name: &str) -> Option<&EventSpec> {
        self.events.get(event_name)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Merges extra entries from a TOML table of the form
    /// `[event_name.params] param = "string"`. Entries in the file replace
    /// same-named built-in entries wholesale.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), CoreError> {
        let table: HashMap<String, EventSpec> = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()
            .map_err(|e| CoreError::SpecFile(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::SpecFile(e.to_string()))?;

        log::debug!("Merging {} spec entries from {:?}", table.len(), path);
        self.events.extend(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_table_covers_the_poc_events() {
        let spec = ParameterSpec::builtin();
        assert_eq!(spec.len(), 2);
        assert_eq!(
            spec.get("about_us_click").unwrap().params["section_name"],
            ParamType::String
        );
        assert!(spec.get("purchase").is_none());
    }

    #[test]
    fn value_type_tags() {
        assert_eq!(ParamType::of_value(&json!("x")), ParamType::String);
        assert_eq!(ParamType::of_value(&json!(1.5)), ParamType::Number);
        assert_eq!(ParamType::of_value(&json!(true)), ParamType::Boolean);
        assert_eq!(ParamType::of_value(&json!({})), ParamType::Object);
        assert_eq!(ParamType::of_value(&json!([])), ParamType::Array);
        assert_eq!(ParamType::of_value(&json!(null)), ParamType::Null);
    }

    #[test]
    fn type_tags_deserialize_lowercase() {
        let spec: EventSpec =
            serde_json::from_value(json!({ "params": { "items": "array", "value": "number" } }))
                .unwrap();
        assert_eq!(spec.params["items"], ParamType::Array);
        assert_eq!(spec.params["value"], ParamType::Number);
    }
}
