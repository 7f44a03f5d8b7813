use indexmap::IndexMap;

use crate::domain::{FormConfig, FormField};

use super::value::{FieldValue, ValueMap};

/// Pure visibility predicate. A field with no `show_if` is always visible.
/// Otherwise every referenced field must currently hold a non-empty text
/// value contained in its allowed set; a single failing pair hides the
/// field. References to undeclared fields read as empty and therefore hide.
pub fn is_visible(field: &FormField, values: &ValueMap) -> bool {
    let Some(predicate) = &field.visible_when else {
        return true;
    };
    predicate.iter().all(|(dependent, allowed)| {
        values
            .get(dependent)
            .and_then(FieldValue::as_text)
            .is_some_and(|text| !text.is_empty() && allowed.iter().any(|option| option == text))
    })
}

/// Reverse index from dependent-field name to the fields whose predicate
/// references it, so a renderer can recompute only affected fields after an
/// edit instead of sweeping the whole config.
#[derive(Debug, Clone, Default)]
pub struct VisibilityIndex {
    dependents: IndexMap<String, Vec<String>>,
}

impl VisibilityIndex {
    pub fn from_config(config: &FormConfig) -> Self {
        let mut dependents: IndexMap<String, Vec<String>> = IndexMap::new();
        for field in config.fields() {
            let Some(predicate) = &field.visible_when else {
                continue;
            };
            for target in predicate.keys() {
                dependents
                    .entry(target.clone())
                    .or_default()
                    .push(field.name.clone());
            }
        }
        Self { dependents }
    }

    /// Names of fields whose visibility depends on `name`.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.dependents
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when editing `name` can change some other field's visibility.
    pub fn is_trigger(&self, name: &str) -> bool {
        !self.dependents_of(name).is_empty()
    }
}
