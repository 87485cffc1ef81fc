//! Raw property maps and the properties-file reader.
//!
//! The file format is the usual `key=value` per line. `key: value` is also
//! accepted, blank lines and lines starting with `#` or `!` are skipped, and
//! surrounding whitespace is trimmed from keys and values. A key may appear
//! only once per file.

use std::path::Path;

use tracing::debug;

use crate::error::SourceError;

/// Ordered map from property key to raw string value.
///
/// Keys are unique. Order is insertion order and is what the binder uses
/// to order its errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProperties {
    entries: Vec<(String, String)>,
}

impl RawProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Parses properties-file text.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let mut properties = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(SourceError::Malformed {
                    line: line_number,
                    content: trimmed.to_string(),
                });
            };
            let key = trimmed[..split].trim();
            let value = trimmed[split + 1..].trim();
            if key.is_empty() {
                return Err(SourceError::Malformed {
                    line: line_number,
                    content: trimmed.to_string(),
                });
            }
            if properties.contains_key(key) {
                return Err(SourceError::DuplicateKey {
                    line: line_number,
                    key: key.to_string(),
                });
            }
            properties.insert(key, value);
        }
        Ok(properties)
    }

    /// Reads and parses a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let properties = Self::parse(&text)?;
        debug!(
            "Loaded {} properties from {}",
            properties.len(),
            path.display()
        );
        Ok(properties)
    }
}

impl<K, V> FromIterator<(K, V)> for RawProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

impl<K, V> Extend<(K, V)> for RawProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
