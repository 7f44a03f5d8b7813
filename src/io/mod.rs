mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{form_config_from_str, parse_document_str};
pub use output::{OutputDestination, SubmissionWriter};
