//! Wire contract shared by the pixel service and the pixel client.
//!
//! Every response body is a JSON envelope with a top-level `status`:
//!
//! ```text
//! {"status":"success","data":"#ff0000_US_Seattle_1700000000"}   get, pixel exists
//! {"status":"success","data":null}                              get, never painted
//! {"status":"success","data":{"key":"5_-3","value":"..."}}      set / update
//! {"status":"success","message":"Deleted"}                      delete
//! {"status":"error","message":"Missing action parameter"}       any failure
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameter selecting the operation.
pub const PARAM_ACTION: &str = "action";
/// Query parameter carrying the x coordinate.
pub const PARAM_X: &str = "x";
/// Query parameter carrying the y coordinate.
pub const PARAM_Y: &str = "y";
/// Query parameter carrying the color (set/update only).
pub const PARAM_COLOR: &str = "color";

/// Request header with the writer's country, set by the edge network.
pub const COUNTRY_HEADER: &str = "x-client-country";
/// Request header with the writer's city, set by the edge network.
pub const CITY_HEADER: &str = "x-client-city";

/// Message returned for a successful delete.
pub const DELETED_MESSAGE: &str = "Deleted";

/// Operations understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Set,
    Update,
    Delete,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an action name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "set" => Ok(Action::Set),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Envelope status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// JSON response envelope.
///
/// `data` is tri-state on the wire: absent (delete, errors), `null` (get of
/// an unpainted pixel) or a value. `Some(Value::Null)` serializes as `null`.
/// When deserializing, `null` and absent both become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Successful get; `None` means the pixel was never painted.
    pub fn value(raw: Option<String>) -> Self {
        Self {
            status: Status::Success,
            data: Some(raw.map(Value::String).unwrap_or(Value::Null)),
            message: None,
        }
    }

    /// Successful set/update, echoing the key and the stored value.
    pub fn written(key: &str, value: &str) -> Self {
        Self {
            status: Status::Success,
            data: Some(serde_json::json!({ "key": key, "value": value })),
            message: None,
        }
    }

    /// Successful operation reported with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Failed operation.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    /// True if the status is `success`.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// `data` payload of a successful set/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenPixel {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_parse() {
        assert_eq!("get".parse::<Action>(), Ok(Action::Get));
        assert_eq!("update".parse::<Action>(), Ok(Action::Update));
        assert_eq!(
            "frobnicate".parse::<Action>(),
            Err(UnknownAction("frobnicate".to_string()))
        );
        // Action names are case-sensitive.
        assert!("GET".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_round_trip_names() {
        for action in [Action::Get, Action::Set, Action::Update, Action::Delete] {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_value_envelope_null() {
        let json = serde_json::to_value(Envelope::value(None)).unwrap();
        assert_eq!(json, json!({"status": "success", "data": null}));
    }

    #[test]
    fn test_value_envelope_present() {
        let json = serde_json::to_value(Envelope::value(Some("#fff_XX_Unknown_1".into()))).unwrap();
        assert_eq!(json, json!({"status": "success", "data": "#fff_XX_Unknown_1"}));
    }

    #[test]
    fn test_written_envelope() {
        let json = serde_json::to_value(Envelope::written("5_-3", "v")).unwrap();
        assert_eq!(
            json,
            json!({"status": "success", "data": {"key": "5_-3", "value": "v"}})
        );
    }

    #[test]
    fn test_message_and_error_envelopes() {
        let json = serde_json::to_value(Envelope::message(DELETED_MESSAGE)).unwrap();
        assert_eq!(json, json!({"status": "success", "message": "Deleted"}));

        let json = serde_json::to_value(Envelope::error("Missing action parameter")).unwrap();
        assert_eq!(
            json,
            json!({"status": "error", "message": "Missing action parameter"})
        );
    }

    #[test]
    fn test_deserialize_lenient() {
        let env: Envelope = serde_json::from_str(r#"{"status":"success","data":null}"#).unwrap();
        assert!(env.is_success());
        assert_eq!(env.data, None);

        let env: Envelope = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(env.status, Status::Unknown);
        assert!(!env.is_success());

        let written: WrittenPixel =
            serde_json::from_value(json!({"key": "1_1", "value": "x"})).unwrap();
        assert_eq!(written.key, "1_1");
    }
}
