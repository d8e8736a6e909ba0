use std::fmt;
use std::str::FromStr;

use crate::{BunsenError, Result};

/// One step of a bunsenId.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Object property name.
    Key(&'a str),
    /// Array position (also usable as an object key when the container is an object).
    Index(usize),
}

impl Segment<'_> {
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => (*key).to_string(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// Dotted path addressing a single field in the value tree and the schema.
///
/// `address.street`, `phones.0.number`. Segments made of ASCII digits address
/// array items.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct BunsenId(String);

impl BunsenId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.split('.').any(str::is_empty) {
            return Err(BunsenError::InvalidBunsenId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        self.0.split('.').map(|part| {
            if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().map_or(Segment::Key(part), Segment::Index)
            } else {
                Segment::Key(part)
            }
        })
    }

    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }

    /// Path of the containing field, `None` for a top-level field.
    pub fn parent(&self) -> Option<BunsenId> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    pub fn last(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub fn child(&self, key: &str) -> Result<BunsenId> {
        Self::new(format!("{}.{key}", self.0))
    }
}

impl fmt::Display for BunsenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BunsenId {
    type Err = BunsenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for BunsenId {
    type Error = BunsenError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BunsenId> for String {
    fn from(id: BunsenId) -> Self {
        id.0
    }
}
