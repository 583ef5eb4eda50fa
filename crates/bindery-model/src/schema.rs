//! Entity schema descriptions.
//!
//! An [`EntitySchema`] mirrors the persistence layer's record definition:
//! an ordered list of named, typed fields with their constraints. The form
//! builder reads these to synthesize field schemas; nothing in this crate
//! ever mutates them.

use crate::value::Value;

/// The storage-level kind of an entity field.
///
/// Kinds describe what the store holds, not how a form collects it; the
/// form builder owns the correspondence between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// Auto-incrementing integer identifier, assigned by the store.
    AutoId,
    /// Variable-length string (pair with `max_length`).
    Text,
    /// Unlimited-length text.
    LongText,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating-point number.
    Float,
    /// Fixed-precision decimal number.
    Decimal {
        /// Maximum total digits.
        max_digits: u32,
        /// Digits after the decimal point.
        decimal_places: u32,
    },
    /// Boolean (true/false).
    Boolean,
    /// Date without time.
    Date,
    /// Date and time.
    DateTime,
    /// Time without date.
    Time,
    /// UUID value.
    Uuid,
    /// Email address (text with email validation).
    Email,
    /// URL (text with URL validation).
    Url,
    /// URL-friendly string.
    Slug,
    /// One of a fixed set of values (pair with `choices`).
    Choice,
    /// JSON document.
    Json,
    /// Raw binary data; has no form representation.
    Binary,
}

/// Complete definition of one entity field: name, kind, and constraints.
///
/// Constructed with builder methods:
///
/// ```
/// use bindery_model::schema::{EntityField, EntityKind};
///
/// let field = EntityField::new("title", EntityKind::Text)
///     .max_length(200)
///     .help_text("The book's title as printed on the cover");
/// assert!(field.required);
/// assert_eq!(field.verbose_name, "title");
/// ```
#[derive(Debug, Clone)]
pub struct EntityField {
    /// The field name, unique within its schema.
    pub name: &'static str,
    /// The storage-level kind.
    pub kind: EntityKind,
    /// Whether the store demands a value for this field.
    pub required: bool,
    /// Default value applied when none is supplied.
    pub default: Option<Value>,
    /// Maximum character length (text-like kinds).
    pub max_length: Option<usize>,
    /// Human-readable name; derived from `name` unless set.
    pub verbose_name: String,
    /// Human-readable help text.
    pub help_text: String,
    /// Allowed values as (stored value, display label) pairs.
    pub choices: Option<Vec<(String, String)>>,
    /// Whether the field may be exposed for editing at all.
    pub editable: bool,
}

impl EntityField {
    /// Creates a new field definition with sensible defaults: required,
    /// editable, no default value.
    pub fn new(name: &'static str, kind: EntityKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            max_length: None,
            verbose_name: name.replace('_', " "),
            help_text: String::new(),
            choices: None,
            editable: true,
        }
    }

    /// Marks this field as optional in the store.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the allowed values.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(&str, &str)>) -> Self {
        self.choices = Some(
            choices
                .into_iter()
                .map(|(v, label)| (v.to_string(), label.to_string()))
                .collect(),
        );
        self
    }

    /// Marks this field as never editable through a form.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }
}

/// An ordered collection of entity fields under one entity name.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    /// The entity name in lowercase snake case (e.g. "book", "loan").
    /// Used for store namespacing, template names, and detail paths.
    pub name: &'static str,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Field definitions, in the entity's native order.
    pub fields: Vec<EntityField>,
}

impl EntitySchema {
    /// Creates a schema from an ordered field list.
    pub fn new(name: &'static str, fields: Vec<EntityField>) -> Self {
        Self {
            name,
            verbose_name: name.replace('_', " "),
            fields,
        }
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the field names in the entity's native order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_schema() -> EntitySchema {
        EntitySchema::new(
            "book",
            vec![
                EntityField::new("id", EntityKind::AutoId).read_only(),
                EntityField::new("title", EntityKind::Text).max_length(200),
                EntityField::new("page_count", EntityKind::Integer)
                    .optional()
                    .verbose_name("number of pages"),
                EntityField::new("in_print", EntityKind::Boolean).default(true),
            ],
        )
    }

    #[test]
    fn test_field_defaults() {
        let f = EntityField::new("due_back", EntityKind::Date);
        assert!(f.required);
        assert!(f.editable);
        assert!(f.default.is_none());
        assert!(f.max_length.is_none());
        assert_eq!(f.verbose_name, "due back");
        assert_eq!(f.help_text, "");
    }

    #[test]
    fn test_field_builders() {
        let f = EntityField::new("status", EntityKind::Choice)
            .optional()
            .choices(vec![("m", "Maintenance"), ("o", "On loan")])
            .default("m")
            .help_text("Book availability");
        assert!(!f.required);
        assert_eq!(f.default, Some(Value::Text("m".into())));
        assert_eq!(
            f.choices.as_deref(),
            Some(&[("m".to_string(), "Maintenance".to_string()),
                   ("o".to_string(), "On loan".to_string())][..])
        );
    }

    #[test]
    fn test_schema_lookup() {
        let schema = book_schema();
        assert_eq!(schema.verbose_name, "book");
        assert!(schema.field("title").is_some());
        assert!(schema.field("isbn").is_none());
        assert_eq!(
            schema.field_names(),
            vec!["id", "title", "page_count", "in_print"]
        );
    }

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema = book_schema();
        let kinds: Vec<_> = schema.fields.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(kinds[0], EntityKind::AutoId);
        assert_eq!(kinds[1], EntityKind::Text);
    }
}
