mod parser;
mod schema;

pub use parser::{ConfigWarning, lint_config, parse_form_config};
pub use schema::{FieldKind, FormConfig, FormField, FormSection, VisibleWhen};
