//! Cursor-paged collections

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque resume token handed out by a paged endpoint.
///
/// The client never builds or inspects one; it only stores the token it was
/// given and sends it back verbatim on the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Cursor(token.to_string())
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The backend currently sends row ids, but the token is kept textual
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCursor {
            Integer(i64),
            Text(String),
        }

        Ok(match RawCursor::deserialize(deserializer)? {
            RawCursor::Integer(n) => Cursor(n.to_string()),
            RawCursor::Text(s) => Cursor(s),
        })
    }
}

/// One page of a cursor-paged collection.
///
/// `next_cursor` and `has_next` come from the server as two separate
/// signals and are stored as-is; neither is derived from the other.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>, has_next: bool) -> Self {
        Page {
            items,
            next_cursor,
            has_next,
        }
    }
}
