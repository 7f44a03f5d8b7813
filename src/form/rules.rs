use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{FieldKind, FormField};

use super::value::FieldValue;

// Local-part @ domain, domain contains a dot, case-insensitive.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

// Optional leading '+', first digit 1-9, up to fifteen more digits.
static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern compiles"));

/// Built-in shape rule attached to a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRule {
    Email,
    Phone,
}

impl PatternRule {
    pub fn matches(self, text: &str) -> bool {
        match self {
            PatternRule::Email => EMAIL_SHAPE.is_match(text),
            PatternRule::Phone => PHONE_SHAPE.is_match(text),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PatternRule::Email => "Invalid email address",
            PatternRule::Phone => "Invalid phone number",
        }
    }
}

/// Rule set derived from a field's kind and required flag. Visibility is not
/// part of the rules; callers only check fields that are currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRules {
    pub required: Option<String>,
    pub pattern: Option<PatternRule>,
}

/// Pure function of `field.kind` and `field.required`.
pub fn validation_rules_for(field: &FormField) -> ValidationRules {
    ValidationRules {
        required: field
            .required
            .then(|| format!("{} is required", field.label)),
        pattern: match field.kind {
            FieldKind::Email => Some(PatternRule::Email),
            FieldKind::Tel => Some(PatternRule::Phone),
            _ => None,
        },
    }
}

impl ValidationRules {
    /// Check a current value; `None` means it passes. Emptiness is owned by
    /// the required rule, so pattern rules skip empty/missing values.
    pub fn check(&self, value: Option<&FieldValue>) -> Option<String> {
        if value.is_none_or(FieldValue::is_empty) {
            return self.required.clone();
        }
        let pattern = self.pattern?;
        let text = value.and_then(FieldValue::as_text)?;
        if pattern.matches(text) {
            None
        } else {
            Some(pattern.message().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind, required: bool) -> FormField {
        FormField {
            name: "subject".into(),
            label: "Subject".into(),
            kind,
            required,
            options: Vec::new(),
            accept: Vec::new(),
            visible_when: None,
        }
    }

    #[test]
    fn required_message_uses_label() {
        let rules = validation_rules_for(&field(FieldKind::Text, true));
        assert_eq!(rules.check(None).as_deref(), Some("Subject is required"));
        assert_eq!(
            rules.check(Some(&FieldValue::text(""))).as_deref(),
            Some("Subject is required")
        );
        assert!(rules.check(Some(&FieldValue::text("x"))).is_none());
    }

    #[test]
    fn optional_fields_pass_when_empty() {
        let rules = validation_rules_for(&field(FieldKind::Email, false));
        assert!(rules.check(None).is_none());
        assert!(rules.check(Some(&FieldValue::text(""))).is_none());
    }

    #[test]
    fn email_shape_is_case_insensitive() {
        let rules = validation_rules_for(&field(FieldKind::Email, true));
        assert!(rules.check(Some(&FieldValue::text("a@b.co"))).is_none());
        assert!(rules.check(Some(&FieldValue::text("A.User@Example.ORG"))).is_none());
        assert_eq!(
            rules.check(Some(&FieldValue::text("not-an-email"))).as_deref(),
            Some("Invalid email address")
        );
        assert_eq!(
            rules.check(Some(&FieldValue::text("user@nodot"))).as_deref(),
            Some("Invalid email address")
        );
    }

    #[test]
    fn phone_shape_bounds_length_and_leading_digit() {
        let rules = validation_rules_for(&field(FieldKind::Tel, true));
        assert!(rules.check(Some(&FieldValue::text("12345"))).is_none());
        assert!(rules.check(Some(&FieldValue::text("+4915112345678"))).is_none());
        // sixteen digits is the ceiling
        assert!(rules.check(Some(&FieldValue::text("1234567890123456"))).is_none());
        assert_eq!(
            rules
                .check(Some(&FieldValue::text("+12345678901234567")))
                .as_deref(),
            Some("Invalid phone number")
        );
        assert_eq!(
            rules.check(Some(&FieldValue::text("0123"))).as_deref(),
            Some("Invalid phone number")
        );
        assert_eq!(
            rules.check(Some(&FieldValue::text("12-34"))).as_deref(),
            Some("Invalid phone number")
        );
    }

    #[test]
    fn only_email_and_tel_carry_patterns() {
        for kind in [
            FieldKind::Text,
            FieldKind::Date,
            FieldKind::Textarea,
            FieldKind::Select,
            FieldKind::File,
        ] {
            assert!(validation_rules_for(&field(kind, false)).pattern.is_none());
        }
    }
}
