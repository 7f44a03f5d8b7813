use anyhow::Result;
use tracing::error;

use crate::domain::{FormConfig, FormField};

use super::{
    rules::validation_rules_for,
    state::FormState,
    value::{FieldValue, ValueMap},
    visibility::{VisibilityIndex, is_visible},
};

/// Result of one submit attempt, returned to the embedding UI so the failure
/// path stays observable. The engine itself never propagates a handler
/// error: it logs the failure, resets `submitting`, and lets the user retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed and the handler accepted the values.
    Submitted,
    /// Validation failed; the handler was not invoked and the error map
    /// holds a message per offending field.
    Rejected { issues: usize },
    /// Validation passed but the handler returned an error.
    Failed { message: String },
}

/// Owns [`FormState`] for a single [`FormConfig`] instance: computes field
/// visibility, derives validation rules, and dispatches submission.
#[derive(Debug)]
pub struct FormController {
    config: FormConfig,
    state: FormState,
    index: VisibilityIndex,
}

impl FormController {
    /// Mount a form: empty value map, no defaults. A config with zero
    /// sections is legal and renders nothing.
    pub fn new(config: FormConfig) -> Self {
        let index = VisibilityIndex::from_config(&config);
        Self {
            config,
            state: FormState::new(),
            index,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &ValueMap {
        &self.state.values
    }

    pub fn visibility_index(&self) -> &VisibilityIndex {
        &self.index
    }

    /// Update one field's value. The value's tag must match the field's kind
    /// (caller contract, not runtime-checked). Writes to names the config
    /// does not declare are ignored, keeping the value map a subset of the
    /// declared fields.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        if !self.config.declares(name) {
            return;
        }
        self.state.set_value(name, value);
    }

    pub fn clear_value(&mut self, name: &str) {
        self.state.clear_value(name);
    }

    pub fn is_visible(&self, field: &FormField) -> bool {
        is_visible(field, &self.state.values)
    }

    /// Fields that currently render, in section then field order: known
    /// kinds whose visibility predicate holds. Unknown kinds are silently
    /// skipped everywhere (rendering, focus, validation).
    pub fn visible_fields(&self) -> impl Iterator<Item = &FormField> {
        self.config
            .fields()
            .filter(|field| field.kind.is_known() && is_visible(field, &self.state.values))
    }

    /// Blur-time validation: recompute one field's error. Hidden fields
    /// never validate; a pending error is dropped when the field hides.
    pub fn validate_field(&mut self, name: &str) {
        let Some(field) = self.config.field(name) else {
            return;
        };
        if !field.kind.is_known() || !is_visible(field, &self.state.values) {
            self.state.errors.shift_remove(name);
            return;
        }
        match validation_rules_for(field).check(self.state.values.get(name)) {
            Some(message) => {
                self.state.errors.insert(name.to_string(), message);
            }
            None => {
                self.state.errors.shift_remove(name);
            }
        }
    }

    /// Whole-form validation across currently visible fields. Hidden
    /// required fields never block submission. Returns the issue count.
    pub fn validate_all(&mut self) -> usize {
        self.state.errors.clear();
        for section in &self.config.sections {
            for field in &section.fields {
                if !field.kind.is_known() || !is_visible(field, &self.state.values) {
                    continue;
                }
                if let Some(message) =
                    validation_rules_for(field).check(self.state.values.get(&field.name))
                {
                    self.state.errors.insert(field.name.clone(), message);
                }
            }
        }
        self.state.errors.len()
    }

    /// Validate, then forward the value map to the handler. `submitting` is
    /// raised for the duration of the handler and reset on every path. On a
    /// validation failure the handler is not invoked; on a handler failure
    /// the error is logged and reported as [`SubmitOutcome::Failed`].
    pub fn submit<F>(&mut self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(&ValueMap) -> Result<()>,
    {
        self.state.submitting = true;
        let issues = self.validate_all();
        if issues > 0 {
            self.state.submitting = false;
            return SubmitOutcome::Rejected { issues };
        }
        let outcome = match on_submit(&self.state.values) {
            Ok(()) => SubmitOutcome::Submitted,
            Err(err) => {
                error!(error = %err, "form submission handler failed");
                SubmitOutcome::Failed {
                    message: err.to_string(),
                }
            }
        };
        self.state.submitting = false;
        outcome
    }
}
