use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Result, RetryError};

/// Lists the fields a value wants projected into query parameters or
/// headers.
///
/// This is the declarative replacement for tag-driven field walking: a
/// source describes each field explicitly instead of relying on runtime
/// introspection. The same source type can feed both the query sink and
/// the header sink.
pub trait ParamSource {
    /// Returns the fields to emit, in order.
    fn fields(&self) -> Vec<Field>;
}

impl ParamSource for Vec<Field> {
    fn fields(&self) -> Vec<Field> {
        self.clone()
    }
}

impl<const N: usize> ParamSource for [Field; N] {
    fn fields(&self) -> Vec<Field> {
        self.to_vec()
    }
}

/// One named value scheduled for emission.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    value: FieldValue,
    omit_empty: bool,
    default: Option<String>,
}

/// Scalar or repeated field payload.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A single stringified value.
    Text(String),
    /// Repeated values; one pair is emitted per element.
    List(Vec<String>),
}

impl Field {
    /// Creates a scalar field. A field named `-` is never emitted.
    pub fn text(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.to_string()),
            omit_empty: false,
            default: None,
        }
    }

    /// Creates a repeated field.
    pub fn list<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            name: name.into(),
            value: FieldValue::List(values.into_iter().map(|v| v.to_string()).collect()),
            omit_empty: false,
            default: None,
        }
    }

    /// Skips the field entirely when its value is empty.
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Emits this value instead when the field's own value is empty.
    pub fn or_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn is_empty(&self) -> bool {
        match &self.value {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }
}

/// Receives name/value pairs from [`emit`].
pub trait ParamSink {
    /// Appends one pair to the sink.
    fn append(&mut self, name: &str, value: &str) -> Result<()>;
}

impl ParamSink for Vec<(String, String)> {
    fn append(&mut self, name: &str, value: &str) -> Result<()> {
        self.push((name.to_owned(), value.to_owned()));
        Ok(())
    }
}

impl ParamSink for HeaderMap {
    fn append(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| RetryError::Build(format!("invalid header name '{name}': {err}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| RetryError::Build(format!("invalid value for header '{name}': {err}")))?;
        HeaderMap::append(self, header_name, header_value);
        Ok(())
    }
}

/// Emits every field into `sink`, honoring skip, omit-empty and default
/// rules.
pub(crate) fn emit(fields: &[Field], sink: &mut dyn ParamSink) -> Result<()> {
    for field in fields {
        if field.name == "-" {
            continue;
        }
        if field.omit_empty && field.is_empty() {
            continue;
        }

        match &field.value {
            FieldValue::List(values) => {
                for value in values {
                    sink.append(&field.name, value)?;
                }
            }
            FieldValue::Text(text) => {
                let value = if text.is_empty() {
                    field.default.as_deref().unwrap_or("")
                } else {
                    text.as_str()
                };
                sink.append(&field.name, value)?;
            }
        }
    }

    Ok(())
}
