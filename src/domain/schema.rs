use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Visibility predicate: dependent field name -> allowed values. A field is
/// shown only when every referenced field currently holds one of its allowed
/// values (AND across entries, never OR).
pub type VisibleWhen = IndexMap<String, Vec<String>>;

/// Input kinds the renderer understands. Tokens outside the closed set are
/// preserved as `Unknown`; such fields render nothing and never validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Textarea,
    Select,
    File,
    Unknown(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Date => "date",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
            FieldKind::File => "file",
            FieldKind::Unknown(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldKind::Unknown(_))
    }

    /// Kinds edited as a single-line text buffer.
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Email | FieldKind::Tel | FieldKind::Date
        )
    }
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "tel" => FieldKind::Tel,
            "date" => FieldKind::Date,
            "textarea" => FieldKind::Textarea,
            "select" => FieldKind::Select,
            "file" => FieldKind::File,
            _ => FieldKind::Unknown(raw),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One input descriptor. `options` is meaningful for `select`, `accept`
/// (MIME patterns such as `image/*`) for `file`; both deserialize to empty
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    #[serde(
        rename = "show_if",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub visible_when: Option<VisibleWhen>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// Root schema object. Immutable once handed to a controller; the optional
/// wire `type` tag is carried through untouched for the embedding layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

impl FormConfig {
    /// All fields in section order, then field order within each section.
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields().find(|field| field.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }
}
