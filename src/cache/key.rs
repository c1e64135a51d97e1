//! Cache Key Module
//!
//! Derives canonical cache keys of the form `prefix:subject:path:query`.
//!
//! The query component is a compact JSON object with parameter names sorted,
//! so two requests that differ only in parameter order share a key. All
//! query values stay strings, exactly as they arrived on the URL. Repeated
//! parameters become a JSON array in request order.
//!
//! `:` and `%` are percent-escaped inside the prefix and subject, which keeps
//! the subject as the second `:`-separated segment of every derived key.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use axum::{extract::Query, http::Uri};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

// == Public Constants ==
/// Subject used for unauthenticated requests
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Separator between key components
pub const KEY_SEPARATOR: char = ':';

// == Cache Key ==
/// A derived cache key. Use `to_string()` to obtain the store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    prefix: String,
    subject: String,
    path: String,
    query: String,
}

impl CacheKey {
    // == Constructor ==
    /// Builds a key from already-decoded query pairs.
    ///
    /// A `None` subject maps to [`ANONYMOUS_SUBJECT`].
    pub fn new(
        prefix: &str,
        subject: Option<&str>,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Self> {
        Ok(Self {
            prefix: escape_component(prefix).into_owned(),
            subject: escape_component(subject.unwrap_or(ANONYMOUS_SUBJECT)).into_owned(),
            path: path.to_string(),
            query: canonical_query(query)?,
        })
    }

    // == From URI ==
    /// Builds a key from a request URI, decoding its query string.
    pub fn from_uri(prefix: &str, subject: Option<&str>, uri: &Uri) -> Result<Self> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map_err(|rejection| ApiError::KeyDerivation(rejection.body_text()))?;

        Self::new(prefix, subject, uri.path(), &pairs)
    }

    /// The escaped subject component.
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.prefix,
            self.subject,
            self.path,
            self.query,
            sep = KEY_SEPARATOR
        )
    }
}

// == Canonical Query ==
/// Serializes query pairs as a sorted compact JSON object.
pub fn canonical_query(pairs: &[(String, String)]) -> Result<String> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, value) in pairs {
        grouped.entry(name.as_str()).or_default().push(value.as_str());
    }

    let object: Map<String, Value> = grouped
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                Value::String(values.remove(0).to_string())
            } else {
                Value::Array(
                    values
                        .into_iter()
                        .map(|v| Value::String(v.to_string()))
                        .collect(),
                )
            };
            (name.to_string(), value)
        })
        .collect();

    serde_json::to_string(&Value::Object(object))
        .map_err(|e| ApiError::KeyDerivation(e.to_string()))
}

// == Escaping ==
/// Percent-escapes `%` and `:` so a component never spans a separator.
pub fn escape_component(raw: &str) -> Cow<'_, str> {
    if raw.contains(['%', KEY_SEPARATOR]) {
        Cow::Owned(raw.replace('%', "%25").replace(KEY_SEPARATOR, "%3A"))
    } else {
        Cow::Borrowed(raw)
    }
}

// == Key Parsing ==
/// Returns the subject component of a stored key.
///
/// Keys with fewer than three separators carry no subject.
pub fn subject_of(key: &str) -> Option<&str> {
    let mut parts = key.splitn(3, KEY_SEPARATOR);
    let _prefix = parts.next()?;
    let subject = parts.next()?;
    let rest = parts.next()?;

    rest.contains(KEY_SEPARATOR).then_some(subject)
}

/// Returns the prefix component of a stored key.
pub fn prefix_of(key: &str) -> Option<&str> {
    key.split_once(KEY_SEPARATOR).map(|(prefix, _)| prefix)
}
