use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Opaque handle to a user-chosen file. The engine stores and forwards it
/// verbatim; it never opens the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name: the final path component, or the raw path when it has
    /// none.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

/// Current value of one field, tagged by shape. Text-like kinds (including
/// `select`, which stores the chosen option) hold `Text`; `file` holds an
/// opaque handle. The tag is enforced where an input control writes into the
/// map; the engine itself never coerces across tags.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(FileHandle),
}

impl FieldValue {
    pub fn text(contents: impl Into<String>) -> Self {
        FieldValue::Text(contents.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        FieldValue::File(FileHandle::new(path))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::File(handle) => handle.is_empty(),
        }
    }

    /// Text view used by visibility predicates and pattern rules. File
    /// handles have no text view, so they never match an allowed-value set.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::File(handle) => Some(handle),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::File(handle) => json!({
                "name": handle.name(),
                "path": handle.path().to_string_lossy(),
            }),
        }
    }
}

/// In-memory mapping from field name to current value for one form session.
pub type ValueMap = IndexMap<String, FieldValue>;

/// Serialize a value map for handing to output layers.
pub fn values_to_json(values: &ValueMap) -> Value {
    let mut map = Map::new();
    for (name, value) in values {
        map.insert(name.clone(), value.to_json());
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_handle_name_is_final_component() {
        let handle = FileHandle::new("/tmp/uploads/passport.jpg");
        assert_eq!(handle.name(), "passport.jpg");
        assert!(!handle.is_empty());
        assert!(FileHandle::new("").is_empty());
    }

    #[test]
    fn file_values_have_no_text_view() {
        let value = FieldValue::file("/tmp/scan.pdf");
        assert!(value.as_text().is_none());
        assert!(value.as_file().is_some());
        assert_eq!(FieldValue::text("hi").as_text(), Some("hi"));
    }

    #[test]
    fn values_serialize_per_tag() {
        let mut values = ValueMap::new();
        values.insert("email".into(), FieldValue::text("a@b.co"));
        values.insert("photo".into(), FieldValue::file("/tmp/me.png"));
        let json = values_to_json(&values);
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["photo"]["name"], "me.png");
    }
}
