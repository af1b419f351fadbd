use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{Result, RetryError};

/// Request body payload.
///
/// Raw bytes and text pass through unchanged; structured values are
/// marshaled to JSON via [`Body::json`]. Marshal failure surfaces at
/// construction time, before any attempt is made.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
    /// Text, sent as its UTF-8 bytes.
    Text(String),
    /// Structured value, serialized as JSON.
    Json(JsonValue),
}

impl Body {
    /// Marshals a structured value to JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(RetryError::Encode)
    }

    /// Stringifies a scalar value.
    pub fn text(value: impl ToString) -> Self {
        Self::Text(value.to_string())
    }

    /// Renders the body to the byte sequence handed to the transport.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Text(text) => Ok(text.clone().into_bytes()),
            Self::Json(value) => serde_json::to_vec(value).map_err(RetryError::Encode),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::Body;

    #[test]
    fn bytes_pass_through_unchanged() {
        let body: Body = b"\x00\x01raw".as_slice().into();
        assert_eq!(body.to_bytes().unwrap(), b"\x00\x01raw");
    }

    #[test]
    fn text_passes_through_unchanged() {
        let body: Body = "plain text".into();
        assert_eq!(body.to_bytes().unwrap(), b"plain text");
    }

    #[test]
    fn structured_value_marshals_to_json() {
        #[derive(Serialize)]
        struct Payload {
            name: String,
            age: u32,
        }

        let payload = Payload {
            name: "test".to_owned(),
            age: 25,
        };
        let body = Body::json(&payload).expect("must marshal");
        assert_eq!(
            body.to_bytes().unwrap(),
            serde_json::to_vec(&payload).unwrap()
        );
    }

    #[test]
    fn scalar_is_stringified() {
        assert_eq!(Body::text(42).to_bytes().unwrap(), b"42");
        assert_eq!(Body::text(true).to_bytes().unwrap(), b"true");
    }
}
