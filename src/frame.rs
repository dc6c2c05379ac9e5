use serde::{Deserialize, Serialize};

use crate::flat::Flat;

/// A request sent by a client: a command name and an optional argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub payload: Option<Payload>,
}

/// The server's answer to a single request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub payload: Option<Payload>,
}

/// Typed argument or result attached to a request or response.
///
/// On the wire: `{"type": "<variant>", "value": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Record(Flat),
    Update { id: u64, record: Flat },
    Id(u64),
    Count(usize),
    Text(String),
    Number(i64),
}

impl Request {
    pub fn new(command: impl Into<String>) -> Request {
        Request {
            command: command.into(),
            payload: None,
        }
    }

    pub fn with_payload(command: impl Into<String>, payload: Payload) -> Request {
        Request {
            command: command.into(),
            payload: Some(payload),
        }
    }

    pub fn parse(src: &[u8]) -> Result<Request, serde_json::Error> {
        serde_json::from_slice(src)
    }
}

impl Response {
    pub fn success(message: impl Into<String>) -> Response {
        Response {
            success: true,
            message: message.into(),
            payload: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Response {
        Response {
            success: false,
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Response {
        self.payload = Some(payload);
        self
    }

    pub fn parse(src: &[u8]) -> Result<Response, serde_json::Error> {
        serde_json::from_slice(src)
    }
}
