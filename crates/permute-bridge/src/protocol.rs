//! Wire messages exchanged between the controller and the producer.
//!
//! Requests are JSON objects tagged by `type`:
//!
//! ```json
//! { "type": "INIT", "inputs": ["a", "b", "c"], "generation": 1 }
//! { "type": "NEXT", "generation": 1 }
//! { "type": "RESET", "generation": 2 }
//! ```
//!
//! Responses echo the request's `type` and `generation`:
//!
//! ```json
//! { "type": "INIT", "ok": true, "generation": 1 }
//! { "type": "NEXT", "ok": true, "generation": 1, "results": { "done": false, "values": ["abc", "acb"] } }
//! { "type": "NEXT", "ok": false, "generation": 0, "error": "generator is not initialized" }
//! ```
//!
//! `generation` defaults to `0` when absent, so a bare `{"type":"NEXT"}` is a
//! valid request.

use crate::Result;
use core::fmt;
use permute::Batch;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Discriminator shared by requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Init,
    Next,
    Reset,
    /// Only used in responses to requests that could not be decoded.
    Error,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "INIT",
            Self::Next => "NEXT",
            Self::Reset => "RESET",
            Self::Error => "ERROR",
        })
    }
}

/// A controller-to-producer message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Request {
    /// Replace the producer's enumerator with a fresh one over `inputs`.
    Init {
        inputs: Vec<String>,
        #[serde(default)]
        generation: u64,
    },
    /// Pull the next batch.
    Next {
        #[serde(default)]
        generation: u64,
    },
    /// Drop the producer's enumerator.
    Reset {
        #[serde(default)]
        generation: u64,
    },
}

impl Request {
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Init { .. } => MessageKind::Init,
            Self::Next { .. } => MessageKind::Next,
            Self::Reset { .. } => MessageKind::Reset,
        }
    }

    pub const fn generation(&self) -> u64 {
        match self {
            Self::Init { generation, .. }
            | Self::Next { generation }
            | Self::Reset { generation } => *generation,
        }
    }
}

/// A producer-to-controller message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub ok: bool,
    #[serde(default)]
    pub generation: u64,
    /// Present on successful `NEXT` responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Batch>,
    /// Present when `ok` is `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A bare acknowledgement.
    pub const fn ok(kind: MessageKind, generation: u64) -> Self {
        Self {
            kind,
            ok: true,
            generation,
            results: None,
            error: None,
        }
    }

    /// A successful `NEXT` carrying `batch`.
    pub const fn batch(generation: u64, batch: Batch) -> Self {
        Self {
            kind: MessageKind::Next,
            ok: true,
            generation,
            results: Some(batch),
            error: None,
        }
    }

    /// A refusal with a human-readable reason.
    pub fn rejected(kind: MessageKind, generation: u64, reason: impl Into<String>) -> Self {
        Self {
            kind,
            ok: false,
            generation,
            results: None,
            error: Some(reason.into()),
        }
    }
}

/// Serializes a message as a single line of JSON.
///
/// # Errors
///
/// Returns [`crate::Error::Codec`] if serialization fails.
pub fn encode<T>(message: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string(message)?)
}

/// Parses a message from JSON.
///
/// # Errors
///
/// Returns [`crate::Error::Codec`] on malformed JSON, an unknown `type`, or
/// missing fields.
pub fn decode<T>(line: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::{Value, json};

    #[test]
    fn bare_requests_default_generation() {
        assert_eq!(
            decode::<Request>(r#"{"type":"NEXT"}"#),
            Ok(Request::Next { generation: 0 })
        );
        assert_eq!(
            decode::<Request>(r#"{"type":"RESET"}"#),
            Ok(Request::Reset { generation: 0 })
        );
        assert_eq!(
            decode::<Request>(r#"{"type":"INIT","inputs":["a","b"]}"#),
            Ok(Request::Init {
                inputs: vec!["a".into(), "b".into()],
                generation: 0,
            })
        );
    }

    #[test]
    fn unknown_or_incomplete_requests_fail_to_decode() {
        assert!(matches!(
            decode::<Request>(r#"{"type":"STOP"}"#),
            Err(Error::Codec { .. })
        ));
        assert!(matches!(
            decode::<Request>(r#"{"type":"INIT"}"#),
            Err(Error::Codec { .. })
        ));
        assert!(matches!(decode::<Request>("not json"), Err(Error::Codec { .. })));
    }

    #[test]
    fn request_shape() {
        let encoded = encode(&Request::Init {
            inputs: vec!["x".into()],
            generation: 3,
        })
        .unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({ "type": "INIT", "inputs": ["x"], "generation": 3 })
        );
    }

    #[test]
    fn response_shapes() {
        let batch = Batch {
            done: true,
            values: vec!["ab".into(), "ba".into()],
        };
        let value: Value =
            serde_json::from_str(&encode(&Response::batch(2, batch.clone())).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "NEXT",
                "ok": true,
                "generation": 2,
                "results": { "done": true, "values": ["ab", "ba"] }
            })
        );

        let value: Value =
            serde_json::from_str(&encode(&Response::ok(MessageKind::Reset, 4)).unwrap()).unwrap();
        assert_eq!(value, json!({ "type": "RESET", "ok": true, "generation": 4 }));

        let decoded: Response = decode(r#"{"type":"NEXT","ok":false}"#).unwrap();
        assert_eq!(decoded.kind, MessageKind::Next);
        assert!(!decoded.ok);
        assert_eq!(decoded.results, None);
    }

    #[test]
    fn request_accessors() {
        let request = Request::Reset { generation: 9 };
        assert_eq!(request.kind(), MessageKind::Reset);
        assert_eq!(request.generation(), 9);
        assert_eq!(MessageKind::Init.to_string(), "INIT");
    }
}
