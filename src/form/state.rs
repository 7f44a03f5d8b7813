use indexmap::IndexMap;

use super::value::{FieldValue, ValueMap};

/// Per-session state for one mounted form: the value map, the error map, and
/// the in-flight submission flag. Created all-empty, discarded with the
/// session; nothing here persists.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub values: ValueMap,
    pub errors: IndexMap<String, String>,
    pub submitting: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// A field absent from the map is treated as empty.
    pub fn is_empty_value(&self, name: &str) -> bool {
        self.values.get(name).is_none_or(FieldValue::is_empty)
    }

    /// Store a value and drop the field's stale error; fresh validation runs
    /// on blur or submit, never per keystroke.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
        self.errors.shift_remove(name);
    }

    pub fn clear_value(&mut self, name: &str) {
        self.values.shift_remove(name);
        self.errors.shift_remove(name);
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn set_error(&mut self, name: &str, message: String) {
        self.errors.insert(name.to_string(), message);
    }

    pub fn clear_error(&mut self, name: &str) {
        self.errors.shift_remove(name);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.values.values().any(|value| !value.is_empty())
    }
}
