//! Field sets: the named values available for substitution
//!
//! A note stores its data either as a plain key/value mapping or as a list of
//! "data sockets" (`[{"key": ..., "value": ...}, ...]`) whose values may be
//! lazily produced content rather than text. Both shapes load into a
//! [`FieldSet`]: an insertion-ordered collection of unique keys. Non-text
//! socket values do not substitute into templates, but their keys still count
//! as present when conditional sections are evaluated.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when loading field data
#[derive(Error, Debug)]
pub enum FieldSetError {
    #[error("Failed to read field file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse JSON field data: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse TOML field data: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Field data must be an object or an array of key/value sockets")]
    UnsupportedShape,
    #[error("Invalid socket entry {index}: expected an object with a string \"key\"")]
    InvalidSocket { index: usize },
}

/// JSON structure for deserializing a stored data-socket entry
#[derive(Deserialize)]
struct SocketEntry {
    key: String,
    #[serde(default)]
    value: Value,
}

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text; participates in placeholder substitution.
    Text(String),
    /// An opaque data socket (lazily produced content). Its key is known to
    /// the renderer but nothing is substituted for it.
    Socket(Value),
}

impl FieldValue {
    /// The text of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Socket(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Socket(other),
        }
    }
}

/// An ordered collection of unique field keys and their values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, FieldValue)>,
}

impl FieldSet {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a field value by key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether a key is present, regardless of value kind
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load field data from a file, picking the format by extension
    /// (`.json` for JSON, anything else is treated as TOML)
    pub fn from_file(path: &Path) -> Result<Self, FieldSetError> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Load field data from JSON: either an object mapping keys to values,
    /// or the stored socket-list form `[{"key": ..., "value": ...}, ...]`
    pub fn from_json_str(content: &str) -> Result<Self, FieldSetError> {
        let root: Value = serde_json::from_str(content)?;
        let mut set = FieldSet::new();
        match root {
            Value::Object(map) => {
                for (key, value) in map {
                    set.insert(key, FieldValue::from(value));
                }
            }
            Value::Array(sockets) => {
                for (index, socket) in sockets.into_iter().enumerate() {
                    let entry: SocketEntry = serde_json::from_value(socket)
                        .map_err(|_| FieldSetError::InvalidSocket { index })?;
                    set.insert(entry.key, FieldValue::from(entry.value));
                }
            }
            _ => return Err(FieldSetError::UnsupportedShape),
        }
        Ok(set)
    }

    /// Load field data from a TOML table; non-string values become sockets
    pub fn from_toml_str(content: &str) -> Result<Self, FieldSetError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut set = FieldSet::new();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => set.insert(key, s),
                other => set.insert(key, FieldValue::Socket(serde_json::to_value(other)?)),
            }
        }
        Ok(set)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut set = FieldSet::new();
        set.insert("a", "one");
        set.insert("b", "two");
        set.insert("a", "three");
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a"), Some(&FieldValue::Text("three".into())));
        // Replacement keeps the original position.
        assert_eq!(set.iter().next().map(|(k, _)| k), Some("a"));
    }

    #[test]
    fn test_from_json_object() {
        let set = FieldSet::from_json_str(r#"{"Word": "cat", "Count": 3}"#).unwrap();
        assert_eq!(set.get("Word"), Some(&FieldValue::Text("cat".into())));
        assert_eq!(set.get("Count"), Some(&FieldValue::Socket(json!(3))));
    }

    #[test]
    fn test_from_json_socket_list() {
        let set = FieldSet::from_json_str(
            r#"[{"key": "Word", "value": "cat"}, {"key": "Audio", "value": {"url": "cat.mp3"}}]"#,
        )
        .unwrap();
        assert_eq!(set.get("Word"), Some(&FieldValue::Text("cat".into())));
        assert!(matches!(set.get("Audio"), Some(FieldValue::Socket(_))));
    }

    #[test]
    fn test_socket_without_key_rejected() {
        let result = FieldSet::from_json_str(r#"[{"value": "cat"}]"#);
        assert!(matches!(
            result,
            Err(FieldSetError::InvalidSocket { index: 0 })
        ));
    }

    #[test]
    fn test_scalar_root_rejected() {
        assert!(matches!(
            FieldSet::from_json_str(r#""cat""#),
            Err(FieldSetError::UnsupportedShape)
        ));
    }

    #[test]
    fn test_from_toml_table() {
        let set = FieldSet::from_toml_str("Word = \"cat\"\nCount = 3\n").unwrap();
        assert_eq!(set.get("Word"), Some(&FieldValue::Text("cat".into())));
        assert!(matches!(set.get("Count"), Some(FieldValue::Socket(_))));
    }

    #[test]
    fn test_socket_value_has_no_text() {
        let value = FieldValue::from(json!({"url": "cat.mp3"}));
        assert_eq!(value.as_text(), None);
        assert_eq!(FieldValue::from("cat").as_text(), Some("cat"));
    }
}
