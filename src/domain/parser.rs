use std::collections::HashSet;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;

use super::schema::{FieldKind, FormConfig};

/// Parse a JSON payload into a [`FormConfig`]. Only structural problems are
/// fatal; semantic oddities (unknown kinds, dangling `show_if` targets) parse
/// fine and are reported separately by [`lint_config`].
pub fn parse_form_config(value: &Value) -> Result<FormConfig> {
    serde_json::from_value(value.clone()).context("payload is not a valid form config")
}

impl FormConfig {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(contents).context("form config is not valid JSON")?;
        parse_form_config(&value)
    }
}

/// Non-fatal findings about a parsed config. Rendering degrades gracefully
/// around all of these, so they are warnings rather than errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),
    #[error("field '{field}' has unrecognized kind '{kind}' and will not render")]
    UnknownKind { field: String, kind: String },
    #[error("select field '{0}' declares no options")]
    EmptySelect(String),
    #[error("field '{field}' is conditioned on undeclared field '{target}' and will stay hidden")]
    DanglingShowIf { field: String, target: String },
    #[error("field '{field}' allows no values for '{target}' and will stay hidden")]
    EmptyShowIf { field: String, target: String },
}

/// Inspect a config for mistakes that silently change what renders.
pub fn lint_config(config: &FormConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for field in config.fields() {
        if !seen.insert(field.name.as_str()) {
            warnings.push(ConfigWarning::DuplicateField(field.name.clone()));
        }
        if let FieldKind::Unknown(token) = &field.kind {
            warnings.push(ConfigWarning::UnknownKind {
                field: field.name.clone(),
                kind: token.clone(),
            });
        }
        if field.kind == FieldKind::Select && field.options.is_empty() {
            warnings.push(ConfigWarning::EmptySelect(field.name.clone()));
        }
        if let Some(predicate) = &field.visible_when {
            for (target, allowed) in predicate {
                if !config.declares(target) {
                    warnings.push(ConfigWarning::DanglingShowIf {
                        field: field.name.clone(),
                        target: target.clone(),
                    });
                }
                if allowed.is_empty() {
                    warnings.push(ConfigWarning::EmptyShowIf {
                        field: field.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    warnings
}
