use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{FormConfig, parse_form_config};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).context("failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).context("failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .context("failed to parse TOML document")
            .and_then(|value| serde_json::to_value(value).context("failed to convert TOML to JSON")),
    }
}

/// Decode a remote or on-disk form payload into a [`FormConfig`].
pub fn form_config_from_str(contents: &str, format: DocumentFormat) -> Result<FormConfig> {
    let value = parse_document_str(contents, format)?;
    parse_form_config(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;

    const FORM_JSON: &str = r#"{
        "title": "Pass Application",
        "description": "Apply for a campus pass",
        "sections": [
            {"title": "Contact", "fields": [
                {"name": "email", "label": "Email", "type": "email", "required": true}
            ]}
        ]
    }"#;

    #[test]
    fn decodes_json_form_payloads() {
        let config = form_config_from_str(FORM_JSON, DocumentFormat::Json).unwrap();
        assert_eq!(config.title, "Pass Application");
        assert_eq!(config.field_count(), 1);
        assert_eq!(config.field("email").unwrap().kind, FieldKind::Email);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn decodes_yaml_form_payloads() {
        let raw = "title: T\ndescription: D\nsections:\n  - title: S\n    fields:\n      - name: n\n        label: N\n        type: text\n";
        let config = form_config_from_str(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(config.field("n").unwrap().kind, FieldKind::Text);
        assert!(!config.field("n").unwrap().required);
    }

    #[test]
    fn rejects_structural_garbage() {
        assert!(form_config_from_str("{\"sections\": 7}", DocumentFormat::Json).is_err());
        assert!(parse_document_str("not json", DocumentFormat::Json).is_err());
    }
}
