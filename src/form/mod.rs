mod controller;
mod rules;
mod state;
mod value;
mod visibility;

pub use controller::{FormController, SubmitOutcome};
pub use rules::{PatternRule, ValidationRules, validation_rules_for};
pub use state::FormState;
pub use value::{FieldValue, FileHandle, ValueMap, values_to_json};
pub use visibility::{VisibilityIndex, is_visible};
