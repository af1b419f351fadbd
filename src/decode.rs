use serde::de::DeserializeOwned;

use crate::{Result, RetryError};

type JsonSink<'a> = Box<dyn FnMut(&[u8]) -> Result<()> + Send + 'a>;

/// Where the final response body lands.
///
/// The variant is chosen by the caller at bind time; there is no runtime
/// inspection of the target's shape. [`DecodeTarget::Json`] holds an
/// erased deserializer writing into the caller's own value.
pub enum DecodeTarget<'a> {
    /// Assigns the body verbatim as UTF-8 text.
    Text(&'a mut String),
    /// Deserializes the body as JSON into the bound value.
    Json(JsonSink<'a>),
}

impl<'a> DecodeTarget<'a> {
    /// Binds a plain-text slot.
    pub fn text(slot: &'a mut String) -> Self {
        Self::Text(slot)
    }

    /// Binds a JSON-deserializable slot.
    pub fn json<T>(slot: &'a mut T) -> Self
    where
        T: DeserializeOwned + Send,
    {
        Self::Json(Box::new(move |bytes| {
            *slot = serde_json::from_slice(bytes)
                .map_err(|err| RetryError::Decode(err.to_string()))?;
            Ok(())
        }))
    }
}

/// Decodes the buffered body into the bound target.
pub(crate) fn decode_into(body: &[u8], target: DecodeTarget<'_>) -> Result<()> {
    match target {
        DecodeTarget::Text(slot) => {
            let text = std::str::from_utf8(body).map_err(|err| {
                RetryError::Decode(format!("response body is not valid UTF-8: {err}"))
            })?;
            *slot = text.to_owned();
            Ok(())
        }
        DecodeTarget::Json(mut sink) => sink(body),
    }
}
