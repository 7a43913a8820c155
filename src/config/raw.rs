//! Raw key/value bundles as delivered by a watcher.
//!
//! A [`RawUpdate`] is one complete, self-contained bundle for one section.
//! [`RawData`] carries typed accessors so section parsers read fields the
//! same way and report malformed values with the key that caused them.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SectionError;

/// Flat string key/value bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawData(BTreeMap<String, String>);

impl RawData {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw lookup, with surrounding whitespace trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value, or `default` when the key is absent.
    pub fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// String value, `None` when absent or blank.
    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// String value that must be present and non-blank.
    pub fn required_string(&self, key: &str) -> Result<String, SectionError> {
        self.optional_string(key)
            .ok_or_else(|| SectionError::MissingKey(key.to_string()))
    }

    /// Boolean value. Accepts `true`/`false` in any case.
    pub fn bool(&self, key: &str, default: bool) -> Result<bool, SectionError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
            Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
            Some(v) => Err(SectionError::invalid(key, v, "expected true or false")),
        }
    }

    /// Any `FromStr` value, or `default` when the key is absent.
    pub fn parsed<T>(&self, key: &str, default: T) -> Result<T, SectionError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v
                .parse()
                .map_err(|e: T::Err| SectionError::invalid(key, v, e.to_string())),
        }
    }

    /// Duration in humantime form (`60s`, `2m`, `500ms`).
    pub fn duration(&self, key: &str, default: Duration) -> Result<Duration, SectionError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => humantime::parse_duration(v)
                .map_err(|e| SectionError::invalid(key, v, e.to_string())),
        }
    }

    /// All keys sharing `prefix`, with the prefix stripped.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix).map(|rest| (rest, v.trim()))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for RawData {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A complete bundle for one named section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpdate {
    /// Section the bundle applies to.
    pub name: String,
    pub data: RawData,
}

impl RawUpdate {
    pub fn new(name: impl Into<String>, data: RawData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build an update from literal pairs.
    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(name, pairs.into_iter().collect())
    }
}
