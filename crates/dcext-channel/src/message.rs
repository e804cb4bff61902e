use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation id for a request/response pair. Unique per connection.
pub type RequestId = u64;

/// One message crossing the extension/host boundary.
///
/// Serialized as an internally tagged JSON object, for example
/// `{"kind":"request","id":3,"event":"context:get"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Envelope {
    /// Extension hello, sent once per connection attempt.
    Connect { protocol: String, version: String },
    /// Host hello reply.
    Connected { protocol: String, version: String },
    /// One-way event.
    Emit {
        event: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// Correlated request; answered by exactly one `Resolve` or `Reject`.
    Request {
        id: RequestId,
        event: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    /// Successful answer to a `Request`.
    Resolve {
        id: RequestId,
        #[serde(default)]
        payload: Value,
    },
    /// Failed answer to a `Request`.
    Reject { id: RequestId, reason: String },
    /// Either side is going away.
    Disconnect,
}

impl Envelope {
    /// Short name of the variant, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Connect { .. } => "connect",
            Envelope::Connected { .. } => "connected",
            Envelope::Emit { .. } => "emit",
            Envelope::Request { .. } => "request",
            Envelope::Resolve { .. } => "resolve",
            Envelope::Reject { .. } => "reject",
            Envelope::Disconnect => "disconnect",
        }
    }

    /// Event name carried by `Emit` and `Request`.
    pub fn event(&self) -> Option<&str> {
        match self {
            Envelope::Emit { event, .. } | Envelope::Request { event, .. } => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_wire_shape() {
        let env = Envelope::Request {
            id: 7,
            event: "context:get".to_string(),
            payload: None,
        };
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({ "kind": "request", "id": 7, "event": "context:get" })
        );
    }

    #[test]
    fn emit_without_payload_parses() {
        let env: Envelope =
            serde_json::from_str(r#"{"kind":"emit","event":"frame:auto-resizer:start"}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Emit {
                event: "frame:auto-resizer:start".to_string(),
                payload: None,
            }
        );
        assert_eq!(env.kind(), "emit");
        assert_eq!(env.event(), Some("frame:auto-resizer:start"));
    }

    #[test]
    fn resolve_defaults_missing_payload_to_null() {
        let env: Envelope = serde_json::from_str(r#"{"kind":"resolve","id":1}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Resolve {
                id: 1,
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn unknown_kind_rejected() {
        let result = serde_json::from_str::<Envelope>(r#"{"kind":"shout","id":1}"#);
        assert!(result.is_err());
    }
}
