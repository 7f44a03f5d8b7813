#![deny(rust_2018_idioms)]

mod domain;
mod form;
mod io;
mod runtime;
mod ui;

pub use domain::{
    ConfigWarning, FieldKind, FormConfig, FormField, FormSection, VisibleWhen, lint_config,
    parse_form_config,
};
pub use form::{
    FieldValue, FileHandle, FormController, FormState, PatternRule, SubmitOutcome,
    ValidationRules, ValueMap, VisibilityIndex, is_visible, validation_rules_for, values_to_json,
};
pub use io::{
    DocumentFormat, OutputDestination, SubmissionWriter, form_config_from_str, parse_document_str,
};
pub use runtime::{FormUI, SubmitHandler, UiOptions};

pub mod prelude {
    pub use super::{
        FieldValue, FormConfig, FormController, FormUI, SubmitOutcome, UiOptions,
    };
}
