//! Raw backend responses.

use serde_json::Value;

/// A backend response, returned to the caller exactly as the backend produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResponse {
    /// A JSON response body.
    Json(Value),
    /// An unparsed `text/event-stream` body, returned when the request asked to stream.
    EventStream(String),
}

impl BackendResponse {
    /// Borrow the JSON body, if this is a JSON response.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            BackendResponse::Json(value) => Some(value),
            BackendResponse::EventStream(_) => None,
        }
    }

    /// Take the JSON body, if this is a JSON response.
    pub fn into_json(self) -> Option<Value> {
        match self {
            BackendResponse::Json(value) => Some(value),
            BackendResponse::EventStream(_) => None,
        }
    }

    pub fn is_event_stream(&self) -> bool {
        matches!(self, BackendResponse::EventStream(_))
    }
}
