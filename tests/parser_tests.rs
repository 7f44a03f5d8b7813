use dynform::{ConfigWarning, FieldKind, FormConfig, lint_config, parse_form_config};
use serde_json::json;

#[test]
fn parses_the_remote_wire_format() {
    let payload = json!({
        "title": "Campus Pass Application",
        "description": "Apply for a campus pass.",
        "type": "pass_application",
        "sections": [
            {
                "title": "Documents",
                "fields": [
                    {
                        "name": "photo",
                        "label": "Passport Photo",
                        "type": "file",
                        "required": true,
                        "accept": ["image/*", "application/pdf"]
                    },
                    {
                        "name": "pass_type",
                        "label": "Pass Type",
                        "type": "select",
                        "required": true,
                        "options": ["Transit", "Library"]
                    },
                    {
                        "name": "reason",
                        "label": "Reason",
                        "type": "textarea",
                        "show_if": {"pass_type": ["Library"], "photo": ["never"]}
                    }
                ]
            }
        ]
    });

    let config = parse_form_config(&payload).unwrap();
    assert_eq!(config.title, "Campus Pass Application");
    assert_eq!(config.form_type.as_deref(), Some("pass_application"));
    assert_eq!(config.field_count(), 3);

    let photo = config.field("photo").unwrap();
    assert_eq!(photo.kind, FieldKind::File);
    assert_eq!(photo.accept, ["image/*", "application/pdf"]);

    let pass_type = config.field("pass_type").unwrap();
    assert_eq!(pass_type.options, ["Transit", "Library"]);

    let reason = config.field("reason").unwrap();
    assert!(!reason.required, "required defaults to false");
    let predicate = reason.visible_when.as_ref().unwrap();
    // show_if entries keep their declared order
    let targets: Vec<&str> = predicate.keys().map(String::as_str).collect();
    assert_eq!(targets, ["pass_type", "photo"]);
}

#[test]
fn unknown_kind_tokens_are_preserved() {
    let payload = json!({
        "title": "",
        "description": "",
        "sections": [{
            "title": "S",
            "fields": [
                {"name": "sig", "label": "Signature", "type": "signature-pad"}
            ]
        }]
    });
    let config = parse_form_config(&payload).unwrap();
    let field = config.field("sig").unwrap();
    assert_eq!(field.kind, FieldKind::Unknown("signature-pad".into()));
    assert!(!field.kind.is_known());
    assert_eq!(field.kind.as_str(), "signature-pad");
}

#[test]
fn configs_round_trip_through_serde() {
    let payload = json!({
        "title": "T",
        "description": "D",
        "sections": [{
            "title": "S",
            "fields": [
                {
                    "name": "a",
                    "label": "A",
                    "type": "select",
                    "required": true,
                    "options": ["x", "y"]
                },
                {
                    "name": "b",
                    "label": "B",
                    "type": "text",
                    "show_if": {"a": ["x"]}
                }
            ]
        }]
    });
    let config = parse_form_config(&payload).unwrap();
    let reserialized = serde_json::to_value(&config).unwrap();
    let reparsed: FormConfig = serde_json::from_value(reserialized).unwrap();
    assert_eq!(config, reparsed);
}

#[test]
fn structural_problems_are_fatal() {
    assert!(parse_form_config(&json!({"sections": 42})).is_err());
    assert!(FormConfig::from_json_str("{ nope").is_err());
}

#[test]
fn zero_sections_parse_and_lint_clean() {
    let config = parse_form_config(&json!({"title": "", "description": "", "sections": []})).unwrap();
    assert!(lint_config(&config).is_empty());
}

#[test]
fn lint_reports_semantic_oddities() {
    let config = parse_form_config(&json!({
        "title": "",
        "description": "",
        "sections": [{
            "title": "S",
            "fields": [
                {"name": "dup", "label": "One", "type": "text"},
                {"name": "dup", "label": "Two", "type": "text"},
                {"name": "sig", "label": "Sig", "type": "signature-pad"},
                {"name": "choice", "label": "Choice", "type": "select"},
                {"name": "gated", "label": "Gated", "type": "text", "show_if": {"ghost": ["x"]}},
                {"name": "stuck", "label": "Stuck", "type": "text", "show_if": {"dup": []}}
            ]
        }]
    }))
    .unwrap();

    let warnings = lint_config(&config);
    assert!(warnings.contains(&ConfigWarning::DuplicateField("dup".into())));
    assert!(warnings.contains(&ConfigWarning::UnknownKind {
        field: "sig".into(),
        kind: "signature-pad".into()
    }));
    assert!(warnings.contains(&ConfigWarning::EmptySelect("choice".into())));
    assert!(warnings.contains(&ConfigWarning::DanglingShowIf {
        field: "gated".into(),
        target: "ghost".into()
    }));
    assert!(warnings.contains(&ConfigWarning::EmptyShowIf {
        field: "stuck".into(),
        target: "dup".into()
    }));
}
