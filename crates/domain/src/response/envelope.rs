//! Loosely-typed view over a JSON response body.
//!
//! The remote API has no schema enforced on this side: fields are looked up
//! by name when an assertion needs them, and unexpected fields are ignored.

use serde_json::Value;
use thiserror::Error;

/// Error raised for a malformed field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An array index is not a number.
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),

    /// A bracket was opened but never closed.
    #[error("unterminated bracket in '{0}'")]
    UnterminatedBracket(String),

    /// `[*]` is followed by further segments; only a trailing `[*]` is
    /// supported.
    #[error("'[*]' must be the last segment in '{0}'")]
    WildcardNotLast(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Field(&'a str),
    Index(usize),
    Wildcard,
}

/// Deserialized JSON body inspected by assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    value: Value,
}

impl Envelope {
    /// Wraps an already parsed JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parses JSON text into an envelope.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the text is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Top-level field by name; `None` when absent or the body is not an object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    /// Top-level string field.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Top-level integer field.
    #[must_use]
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    /// Elements of the body when it is a JSON array.
    #[must_use]
    pub fn elements(&self) -> Option<&[Value]> {
        self.value.as_array().map(Vec::as_slice)
    }

    /// True when the body is an array with at least one element.
    #[must_use]
    pub fn is_non_empty_array(&self) -> bool {
        self.elements().is_some_and(|items| !items.is_empty())
    }

    /// True when at least one array element has a non-null value at `field`.
    #[must_use]
    pub fn any_element_has(&self, field: &str) -> bool {
        self.elements()
            .is_some_and(|items| items.iter().any(|item| has_non_null(item, field)))
    }

    /// Resolves a path such as `$.user.id`, `items[0].title` or `title`.
    ///
    /// A trailing `[*]` returns the whole array it applies to. Use
    /// `any_element_has` to look inside the elements.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if the path is malformed or `[*]` is not the last
    /// segment. A well-formed path that does not resolve yields `Ok(None)`.
    pub fn query(&self, path: &str) -> Result<Option<&Value>, PathError> {
        let mut current = &self.value;
        for segment in parse_path(path)? {
            let next = match segment {
                Segment::Field(name) => current.get(name),
                Segment::Index(idx) => current.get(idx),
                Segment::Wildcard => return Ok(current.is_array().then_some(current)),
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

fn has_non_null(item: &Value, field: &str) -> bool {
    item.get(field).is_some_and(|v| !v.is_null())
}

fn parse_path(path: &str) -> Result<Vec<Segment<'_>>, PathError> {
    let trimmed = path.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let body = body.strip_prefix('.').unwrap_or(body);

    let mut segments = Vec::new();
    for part in body.split('.').filter(|p| !p.is_empty()) {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(Segment::Field(name));
        }
        while let Some(open) = rest.strip_prefix('[') {
            let close = open
                .find(']')
                .ok_or_else(|| PathError::UnterminatedBracket(path.to_string()))?;
            let index = &open[..close];
            if index == "*" {
                segments.push(Segment::Wildcard);
            } else {
                let idx = index
                    .parse()
                    .map_err(|_| PathError::InvalidIndex(index.to_string()))?;
                segments.push(Segment::Index(idx));
            }
            rest = &open[close + 1..];
        }
    }

    if segments
        .iter()
        .position(|s| *s == Segment::Wildcard)
        .is_some_and(|pos| pos + 1 < segments.len())
    {
        return Err(PathError::WildcardNotLast(path.to_string()));
    }
    Ok(segments)
}
