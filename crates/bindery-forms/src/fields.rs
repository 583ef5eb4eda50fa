//! Field kinds, field schemas, and per-field cleaning.
//!
//! A [`FieldSchema`] declares one input: its [`FieldKind`] (which fixes the
//! coercion from raw text to a typed [`Value`]), whether it is required, its
//! presentation metadata, and any declared checks. [`clean_field_value`]
//! runs the per-field stages in order (presence, then coercion against the
//! kind's accepted input formats, then built-in constraints and declared
//! checks) and stops at the first failure, so a field reports errors from
//! exactly one stage.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use bindery_model::Value;

use crate::validation::{run_checks, FieldCheck, ValidationFailure};
use crate::widgets::WidgetHint;

/// Accepted input formats for date fields, tried in order.
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Accepted input formats for datetime fields, tried in order.
pub const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accepted input formats for time fields, tried in order.
pub const TIME_INPUT_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// The kind of a form field, with its built-in constraint parameters.
///
/// The kind determines the coercion from raw textual input to a typed
/// [`Value`] and which built-in constraints run after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text, with optional length bounds and whitespace stripping.
    Text {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Strip surrounding whitespace before any other processing.
        strip: bool,
    },
    /// Whole number with optional bounds.
    Integer {
        /// Smallest accepted value.
        min_value: Option<i64>,
        /// Largest accepted value.
        max_value: Option<i64>,
    },
    /// Floating-point number with optional bounds.
    Float {
        /// Smallest accepted value.
        min_value: Option<f64>,
        /// Largest accepted value.
        max_value: Option<f64>,
    },
    /// Fixed-precision number; digit limits are checked against the
    /// submitted text.
    Decimal {
        /// Maximum total digits.
        max_digits: u32,
        /// Maximum digits after the decimal point.
        decimal_places: u32,
    },
    /// True/false with checkbox semantics: absent input means `false` for
    /// optional fields.
    Boolean,
    /// Date without time.
    Date,
    /// Date and time.
    DateTime,
    /// Time without date.
    Time,
    /// Exactly one of a fixed set of values.
    Choice {
        /// Accepted values as (stored value, display label) pairs.
        choices: Vec<(String, String)>,
    },
    /// Any subset of a fixed set of values.
    MultiChoice {
        /// Accepted values as (stored value, display label) pairs.
        choices: Vec<(String, String)>,
    },
    /// Email address.
    Email,
    /// HTTP or HTTPS URL.
    Url,
    /// URL-friendly string of letters, numbers, underscores, and hyphens.
    Slug,
    /// Text matching an arbitrary pattern.
    Regex {
        /// The pattern the raw value must match.
        pattern: String,
    },
    /// UUID value.
    Uuid,
    /// A file name, optionally restricted by extension. Transport of file
    /// contents is out of scope; forms see the submitted name only.
    File {
        /// Accepted extensions (lowercase, without the dot); empty accepts
        /// anything.
        allowed_extensions: Vec<String>,
    },
    /// A JSON document.
    Json,
}

impl FieldKind {
    /// Unconstrained text with stripping on.
    pub const fn text() -> Self {
        Self::Text {
            min_length: None,
            max_length: None,
            strip: true,
        }
    }

    /// Unbounded integer.
    pub const fn integer() -> Self {
        Self::Integer {
            min_value: None,
            max_value: None,
        }
    }

    /// Unbounded float.
    pub const fn float() -> Self {
        Self::Float {
            min_value: None,
            max_value: None,
        }
    }

    /// Single choice from literal pairs.
    pub fn choice(pairs: Vec<(&str, &str)>) -> Self {
        Self::Choice {
            choices: own_pairs(pairs),
        }
    }

    /// Multiple choice from literal pairs.
    pub fn multi_choice(pairs: Vec<(&str, &str)>) -> Self {
        Self::MultiChoice {
            choices: own_pairs(pairs),
        }
    }
}

fn own_pairs(pairs: Vec<(&str, &str)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(v, label)| (v.to_string(), label.to_string()))
        .collect()
}

/// Derives a display label from a field name: underscores become spaces
/// and the first letter is capitalized (`"renewal_date"` -> `"Renewal date"`).
pub fn derive_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Returns the default widget hint for a field kind.
pub const fn default_hint_for_kind(kind: &FieldKind) -> WidgetHint {
    match kind {
        FieldKind::Text { .. } | FieldKind::Slug | FieldKind::Regex { .. } | FieldKind::Uuid => {
            WidgetHint::Text
        }
        FieldKind::Integer { .. } | FieldKind::Float { .. } | FieldKind::Decimal { .. } => {
            WidgetHint::Number
        }
        FieldKind::Boolean => WidgetHint::Checkbox,
        FieldKind::Date => WidgetHint::Date,
        FieldKind::DateTime => WidgetHint::DateTime,
        FieldKind::Time => WidgetHint::Time,
        FieldKind::Choice { .. } => WidgetHint::Select,
        FieldKind::MultiChoice { .. } => WidgetHint::SelectMultiple,
        FieldKind::Email => WidgetHint::Email,
        FieldKind::Url => WidgetHint::Url,
        FieldKind::File { .. } => WidgetHint::File,
        FieldKind::Json => WidgetHint::Textarea,
    }
}

/// Declarative description of one form input.
///
/// Constructed with builder methods; the label and widget hint default from
/// the name and kind:
///
/// ```
/// use bindery_forms::fields::{FieldKind, FieldSchema};
///
/// let field = FieldSchema::new("renewal_date", FieldKind::Date)
///     .help_text("Enter a date between now and 4 weeks.");
/// assert!(field.required);
/// assert_eq!(field.label, "Renewal date");
/// ```
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// The field name, unique within a form.
    pub name: String,
    /// The kind, controlling coercion and built-in constraints.
    pub kind: FieldKind,
    /// Whether empty input is an error.
    pub required: bool,
    /// Human-readable label; derived from the name unless set.
    pub label: String,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Default value used when the form is unbound.
    pub initial: Option<Value>,
    /// Declared checks, run in order after the built-in constraints.
    pub checks: Vec<FieldCheck>,
    /// Disabled fields render but ignore submitted data.
    pub disabled: bool,
    /// Presentation hint; carries no validation semantics.
    pub widget: WidgetHint,
    /// Error-message overrides keyed by code ("required", "invalid", ...).
    pub error_messages: HashMap<String, String>,
    /// Input-format override for the temporal kinds; `None` uses the
    /// kind's default ordered list.
    pub input_formats: Option<Vec<String>>,
}

impl FieldSchema {
    /// Creates a field schema with defaults: required, enabled, label and
    /// widget derived from the name and kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let label = derive_label(&name);
        let widget = default_hint_for_kind(&kind);
        Self {
            name,
            kind,
            required: true,
            label,
            help_text: String::new(),
            initial: None,
            checks: Vec::new(),
            disabled: false,
            widget,
            error_messages: HashMap::new(),
            input_formats: None,
        }
    }

    /// Sets whether the field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Appends a declared check.
    #[must_use]
    pub fn check(
        mut self,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.checks.push(FieldCheck::new(message, predicate));
        self
    }

    /// Sets whether the field is disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Replaces the widget hint.
    #[must_use]
    pub const fn widget(mut self, widget: WidgetHint) -> Self {
        self.widget = widget;
        self
    }

    /// Overrides the error message for a code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), message.into());
        self
    }

    /// Replaces the accepted input formats for a temporal kind.
    #[must_use]
    pub fn input_formats(mut self, formats: &[&str]) -> Self {
        self.input_formats = Some(formats.iter().map(ToString::to_string).collect());
        self
    }

    /// Returns the configured choices, or an empty slice for kinds without
    /// any.
    pub fn choices(&self) -> &[(String, String)] {
        match &self.kind {
            FieldKind::Choice { choices } | FieldKind::MultiChoice { choices } => choices,
            _ => &[],
        }
    }
}

/// Looks up an error message, honoring per-field overrides by code.
fn message(field: &FieldSchema, code: &str, default: String) -> String {
    field.error_messages.get(code).map_or(default, Clone::clone)
}

/// Cleans the submitted values for one field into a typed [`Value`].
///
/// `raw` holds every value submitted under the field's HTML name, in
/// submission order; scalar kinds use the last, multi-choice uses all.
/// The stages run in order and the first failure ends processing:
///
/// 1. Presence: empty input on a required field is the "required" error;
///    empty input on an optional field cleans to `Null` (`false` for
///    booleans) with no further stages.
/// 2. Coercion: the raw text is parsed per the kind, trying each accepted
///    input format in order for the temporal kinds.
/// 3. Built-in constraints in a fixed order, then declared checks in
///    declaration order.
///
/// The caller runs the custom hook stage; see
/// [`clean_fields`](crate::validation::clean_fields).
pub fn clean_field_value(field: &FieldSchema, raw: &[String]) -> Result<Value, ValidationFailure> {
    let scalar = raw.last().map_or("", String::as_str);
    let scalar = match &field.kind {
        FieldKind::Text { strip: true, .. } => scalar.trim(),
        _ => scalar,
    };
    let is_empty = match &field.kind {
        FieldKind::MultiChoice { .. } => raw.iter().all(String::is_empty),
        _ => scalar.is_empty(),
    };

    if is_empty {
        if field.required {
            return Err(ValidationFailure::new(message(
                field,
                "required",
                "This field is required.".to_string(),
            )));
        }
        if matches!(field.kind, FieldKind::Boolean) {
            // An unchecked checkbox submits nothing at all.
            return Ok(Value::Bool(false));
        }
        return Ok(Value::Null);
    }

    let value = coerce(field, scalar, raw)?;
    run_checks(&field.checks, &value)?;
    Ok(value)
}

/// Applies the kind's coercion and built-in constraints to non-empty input.
#[allow(clippy::too_many_lines)]
fn coerce(field: &FieldSchema, scalar: &str, raw: &[String]) -> Result<Value, ValidationFailure> {
    let fail = |code: &str, default: String| {
        Err(ValidationFailure::new(message(field, code, default)))
    };

    match &field.kind {
        FieldKind::Text {
            min_length,
            max_length,
            ..
        } => {
            let length = scalar.chars().count();
            if let Some(min) = min_length {
                if length < *min {
                    return fail(
                        "min_length",
                        format!(
                            "Ensure this value has at least {min} characters (it has {length})."
                        ),
                    );
                }
            }
            if let Some(max) = max_length {
                if length > *max {
                    return fail(
                        "max_length",
                        format!(
                            "Ensure this value has at most {max} characters (it has {length})."
                        ),
                    );
                }
            }
            Ok(Value::Text(scalar.to_string()))
        }

        FieldKind::Integer {
            min_value,
            max_value,
        } => {
            let Ok(n) = scalar.parse::<i64>() else {
                return fail("invalid", "Enter a whole number.".to_string());
            };
            if let Some(min) = min_value {
                if n < *min {
                    return fail(
                        "min_value",
                        format!("Ensure this value is greater than or equal to {min}."),
                    );
                }
            }
            if let Some(max) = max_value {
                if n > *max {
                    return fail(
                        "max_value",
                        format!("Ensure this value is less than or equal to {max}."),
                    );
                }
            }
            Ok(Value::Int(n))
        }

        FieldKind::Float {
            min_value,
            max_value,
        } => {
            let Ok(n) = scalar.parse::<f64>() else {
                return fail("invalid", "Enter a number.".to_string());
            };
            if let Some(min) = min_value {
                if n < *min {
                    return fail(
                        "min_value",
                        format!("Ensure this value is greater than or equal to {min}."),
                    );
                }
            }
            if let Some(max) = max_value {
                if n > *max {
                    return fail(
                        "max_value",
                        format!("Ensure this value is less than or equal to {max}."),
                    );
                }
            }
            Ok(Value::Float(n))
        }

        FieldKind::Decimal {
            max_digits,
            decimal_places,
        } => {
            let Ok(n) = scalar.parse::<f64>() else {
                return fail("invalid", "Enter a number.".to_string());
            };
            // Digit limits are judged on the submitted text, not the float.
            let parts: Vec<&str> = scalar.trim_start_matches('-').split('.').collect();
            let integer_digits = parts[0].len();
            let actual_places = parts.get(1).map_or(0, |p| p.len());
            if integer_digits + actual_places > *max_digits as usize {
                return fail(
                    "max_digits",
                    format!("Ensure that there are no more than {max_digits} digits in total."),
                );
            }
            if actual_places > *decimal_places as usize {
                return fail(
                    "max_decimal_places",
                    format!(
                        "Ensure that there are no more than {decimal_places} decimal places."
                    ),
                );
            }
            Ok(Value::Float(n))
        }

        FieldKind::Boolean => {
            let falsy = matches!(scalar.to_lowercase().as_str(), "false" | "0" | "off");
            Ok(Value::Bool(!falsy))
        }

        FieldKind::Date => {
            for format in temporal_formats(field, DATE_INPUT_FORMATS) {
                if let Ok(d) = chrono::NaiveDate::parse_from_str(scalar, &format) {
                    return Ok(Value::Date(d));
                }
            }
            fail("invalid", "Enter a valid date.".to_string())
        }

        FieldKind::DateTime => {
            for format in temporal_formats(field, DATETIME_INPUT_FORMATS) {
                if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(scalar, &format) {
                    return Ok(Value::DateTime(dt));
                }
            }
            fail("invalid", "Enter a valid date/time.".to_string())
        }

        FieldKind::Time => {
            for format in temporal_formats(field, TIME_INPUT_FORMATS) {
                if let Ok(t) = chrono::NaiveTime::parse_from_str(scalar, &format) {
                    return Ok(Value::Time(t));
                }
            }
            fail("invalid", "Enter a valid time.".to_string())
        }

        FieldKind::Choice { choices } => {
            if choices.iter().any(|(v, _)| v == scalar) {
                Ok(Value::Text(scalar.to_string()))
            } else {
                fail(
                    "invalid_choice",
                    format!("Select a valid choice. {scalar} is not one of the available choices."),
                )
            }
        }

        FieldKind::MultiChoice { choices } => {
            let mut values = Vec::new();
            for submitted in raw.iter().filter(|v| !v.is_empty()) {
                if choices.iter().any(|(v, _)| v == submitted) {
                    values.push(Value::Text(submitted.clone()));
                } else {
                    return fail(
                        "invalid_choice",
                        format!(
                            "Select a valid choice. {submitted} is not one of the available choices."
                        ),
                    );
                }
            }
            Ok(Value::List(values))
        }

        FieldKind::Email => {
            if EMAIL_RE.is_match(scalar) {
                Ok(Value::Text(scalar.to_string()))
            } else {
                fail("invalid", "Enter a valid email address.".to_string())
            }
        }

        FieldKind::Url => {
            if URL_RE.is_match(scalar) {
                Ok(Value::Text(scalar.to_string()))
            } else {
                fail("invalid", "Enter a valid URL.".to_string())
            }
        }

        FieldKind::Slug => {
            if SLUG_RE.is_match(scalar) {
                Ok(Value::Text(scalar.to_string()))
            } else {
                fail(
                    "invalid",
                    "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens."
                        .to_string(),
                )
            }
        }

        FieldKind::Regex { pattern } => {
            let re = Regex::new(pattern)
                .map_err(|e| ValidationFailure::new(format!("Invalid pattern: {e}")))?;
            if re.is_match(scalar) {
                Ok(Value::Text(scalar.to_string()))
            } else {
                fail("invalid", "Enter a valid value.".to_string())
            }
        }

        FieldKind::Uuid => match uuid::Uuid::parse_str(scalar) {
            Ok(u) => Ok(Value::Uuid(u)),
            Err(_) => fail("invalid", "Enter a valid UUID.".to_string()),
        },

        FieldKind::File { allowed_extensions } => {
            if !allowed_extensions.is_empty() {
                let ext = scalar
                    .rsplit('.')
                    .next()
                    .map(str::to_lowercase)
                    .unwrap_or_default();
                if !allowed_extensions.iter().any(|e| e.to_lowercase() == ext) {
                    return fail(
                        "invalid_extension",
                        format!(
                            "File extension not allowed. Allowed extensions: {}.",
                            allowed_extensions.join(", ")
                        ),
                    );
                }
            }
            Ok(Value::Text(scalar.to_string()))
        }

        FieldKind::Json => match serde_json::from_str::<serde_json::Value>(scalar) {
            Ok(j) => Ok(Value::Json(j)),
            Err(_) => fail("invalid", "Enter valid JSON.".to_string()),
        },
    }
}

/// Returns the accepted formats for a temporal field: the per-field
/// override when set, otherwise the kind's defaults.
fn temporal_formats(field: &FieldSchema, defaults: &[&str]) -> Vec<String> {
    field.input_formats.as_ref().map_or_else(
        || defaults.iter().map(ToString::to_string).collect(),
        Clone::clone,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(field: &FieldSchema, raw: &str) -> Result<Value, ValidationFailure> {
        clean_field_value(field, &[raw.to_string()])
    }

    fn first_message(result: Result<Value, ValidationFailure>) -> String {
        result.unwrap_err().into_messages().remove(0)
    }

    #[test]
    fn test_derive_label() {
        assert_eq!(derive_label("renewal_date"), "Renewal date");
        assert_eq!(derive_label("title"), "Title");
        assert_eq!(derive_label("first_name"), "First name");
        assert_eq!(derive_label(""), "");
    }

    #[test]
    fn test_new_defaults() {
        let field = FieldSchema::new("page_count", FieldKind::integer());
        assert!(field.required);
        assert!(!field.disabled);
        assert_eq!(field.label, "Page count");
        assert_eq!(field.widget, WidgetHint::Number);
        assert!(field.initial.is_none());
    }

    #[test]
    fn test_default_widgets() {
        assert_eq!(default_hint_for_kind(&FieldKind::text()), WidgetHint::Text);
        assert_eq!(default_hint_for_kind(&FieldKind::Boolean), WidgetHint::Checkbox);
        assert_eq!(default_hint_for_kind(&FieldKind::Date), WidgetHint::Date);
        assert_eq!(
            default_hint_for_kind(&FieldKind::choice(vec![])),
            WidgetHint::Select
        );
        assert_eq!(
            default_hint_for_kind(&FieldKind::multi_choice(vec![])),
            WidgetHint::SelectMultiple
        );
        assert_eq!(default_hint_for_kind(&FieldKind::Json), WidgetHint::Textarea);
    }

    #[test]
    fn test_required_empty_input() {
        let field = FieldSchema::new("title", FieldKind::text());
        assert_eq!(first_message(clean(&field, "")), "This field is required.");
        assert_eq!(
            first_message(clean_field_value(&field, &[])),
            "This field is required."
        );
    }

    #[test]
    fn test_optional_empty_input_is_null() {
        let field = FieldSchema::new("notes", FieldKind::text()).required(false);
        assert_eq!(clean(&field, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_strip_applies_before_presence_check() {
        let field = FieldSchema::new("title", FieldKind::text());
        assert_eq!(first_message(clean(&field, "   ")), "This field is required.");

        let unstripped = FieldSchema::new(
            "raw",
            FieldKind::Text {
                min_length: None,
                max_length: None,
                strip: false,
            },
        );
        assert_eq!(clean(&unstripped, "   ").unwrap(), Value::Text("   ".into()));
    }

    #[test]
    fn test_text_strips_and_bounds() {
        let field = FieldSchema::new(
            "title",
            FieldKind::Text {
                min_length: Some(2),
                max_length: Some(10),
                strip: true,
            },
        );
        assert_eq!(clean(&field, "  Dune  ").unwrap(), Value::Text("Dune".into()));
        assert_eq!(
            first_message(clean(&field, "D")),
            "Ensure this value has at least 2 characters (it has 1)."
        );
        assert_eq!(
            first_message(clean(&field, "An Extremely Long Title")),
            "Ensure this value has at most 10 characters (it has 23)."
        );
    }

    #[test]
    fn test_integer_coercion_and_bounds() {
        let field = FieldSchema::new(
            "copies",
            FieldKind::Integer {
                min_value: Some(1),
                max_value: Some(99),
            },
        );
        assert_eq!(clean(&field, "42").unwrap(), Value::Int(42));
        assert_eq!(clean(&field, "-0").unwrap(), Value::Int(0));
        assert_eq!(first_message(clean(&field, "many")), "Enter a whole number.");
        assert_eq!(
            first_message(clean(&field, "0")),
            "Ensure this value is greater than or equal to 1."
        );
        assert_eq!(
            first_message(clean(&field, "100")),
            "Ensure this value is less than or equal to 99."
        );
    }

    #[test]
    fn test_float_coercion() {
        let field = FieldSchema::new("rating", FieldKind::float());
        assert_eq!(clean(&field, "4.5").unwrap(), Value::Float(4.5));
        assert_eq!(first_message(clean(&field, "x")), "Enter a number.");
    }

    #[test]
    fn test_decimal_digit_limits() {
        let field = FieldSchema::new(
            "price",
            FieldKind::Decimal {
                max_digits: 5,
                decimal_places: 2,
            },
        );
        assert_eq!(clean(&field, "123.45").unwrap(), Value::Float(123.45));
        assert_eq!(clean(&field, "-99.99").unwrap(), Value::Float(-99.99));
        assert_eq!(
            first_message(clean(&field, "1234.56")),
            "Ensure that there are no more than 5 digits in total."
        );
        assert_eq!(
            first_message(clean(&field, "1.234")),
            "Ensure that there are no more than 2 decimal places."
        );
    }

    #[test]
    fn test_boolean_semantics() {
        let field = FieldSchema::new("in_print", FieldKind::Boolean).required(false);
        assert_eq!(clean(&field, "true").unwrap(), Value::Bool(true));
        assert_eq!(clean(&field, "on").unwrap(), Value::Bool(true));
        assert_eq!(clean(&field, "anything").unwrap(), Value::Bool(true));
        assert_eq!(clean(&field, "false").unwrap(), Value::Bool(false));
        assert_eq!(clean(&field, "0").unwrap(), Value::Bool(false));
        assert_eq!(clean(&field, "off").unwrap(), Value::Bool(false));
        // Unchecked checkbox: nothing submitted at all.
        assert_eq!(clean_field_value(&field, &[]).unwrap(), Value::Bool(false));

        let required = FieldSchema::new("accepted", FieldKind::Boolean);
        assert_eq!(
            first_message(clean_field_value(&required, &[])),
            "This field is required."
        );
    }

    #[test]
    fn test_date_accepts_each_format_in_order() {
        let field = FieldSchema::new("due_back", FieldKind::Date);
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        for raw in ["2024-01-20", "01/20/2024", "01/20/24"] {
            assert_eq!(clean(&field, raw).unwrap(), Value::Date(expected), "raw {raw}");
        }
        assert_eq!(first_message(clean(&field, "20.01.2024")), "Enter a valid date.");
        assert_eq!(first_message(clean(&field, "2024-13-01")), "Enter a valid date.");
    }

    #[test]
    fn test_datetime_accepts_each_format() {
        let field = FieldSchema::new("added", FieldKind::DateTime);
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let with_seconds = base.and_hms_opt(13, 30, 15).unwrap();
        let without_seconds = base.and_hms_opt(13, 30, 0).unwrap();
        assert_eq!(
            clean(&field, "2024-01-20 13:30:15").unwrap(),
            Value::DateTime(with_seconds)
        );
        assert_eq!(
            clean(&field, "2024-01-20T13:30:15").unwrap(),
            Value::DateTime(with_seconds)
        );
        assert_eq!(
            clean(&field, "2024-01-20 13:30").unwrap(),
            Value::DateTime(without_seconds)
        );
        assert_eq!(
            clean(&field, "01/20/2024 13:30").unwrap(),
            Value::DateTime(without_seconds)
        );
        assert_eq!(
            first_message(clean(&field, "next tuesday")),
            "Enter a valid date/time."
        );
    }

    #[test]
    fn test_time_accepts_each_format() {
        let field = FieldSchema::new("opens_at", FieldKind::Time);
        let with_seconds = chrono::NaiveTime::from_hms_opt(9, 30, 15).unwrap();
        let without_seconds = chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(clean(&field, "09:30:15").unwrap(), Value::Time(with_seconds));
        assert_eq!(clean(&field, "09:30").unwrap(), Value::Time(without_seconds));
        assert_eq!(first_message(clean(&field, "9 am")), "Enter a valid time.");
    }

    #[test]
    fn test_input_format_override() {
        let field = FieldSchema::new("due_back", FieldKind::Date).input_formats(&["%d.%m.%Y"]);
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(clean(&field, "20.01.2024").unwrap(), Value::Date(expected));
        // The defaults no longer apply once overridden.
        assert_eq!(first_message(clean(&field, "2024-01-20")), "Enter a valid date.");
    }

    #[test]
    fn test_coercion_round_trips_for_typed_values() {
        // Serializing a typed value with an accepted format and cleaning it
        // back yields the same value, whichever format was used.
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let date_field = FieldSchema::new("d", FieldKind::Date);
        for format in DATE_INPUT_FORMATS {
            let raw = date.format(format).to_string();
            assert_eq!(clean(&date_field, &raw).unwrap(), Value::Date(date), "format {format}");
        }

        let time = chrono::NaiveTime::from_hms_opt(8, 15, 0).unwrap();
        let time_field = FieldSchema::new("t", FieldKind::Time);
        for format in TIME_INPUT_FORMATS {
            let raw = time.format(format).to_string();
            assert_eq!(clean(&time_field, &raw).unwrap(), Value::Time(time), "format {format}");
        }

        let dt = date.and_hms_opt(8, 15, 0).unwrap();
        let dt_field = FieldSchema::new("dt", FieldKind::DateTime);
        for format in DATETIME_INPUT_FORMATS {
            let raw = dt.format(format).to_string();
            assert_eq!(
                clean(&dt_field, &raw).unwrap(),
                Value::DateTime(dt),
                "format {format}"
            );
        }

        let int_field = FieldSchema::new("n", FieldKind::integer());
        assert_eq!(clean(&int_field, &Value::Int(-17).to_string()).unwrap(), Value::Int(-17));

        let float_field = FieldSchema::new("f", FieldKind::float());
        assert_eq!(
            clean(&float_field, &Value::Float(2.5).to_string()).unwrap(),
            Value::Float(2.5)
        );

        let bool_field = FieldSchema::new("b", FieldKind::Boolean);
        assert_eq!(
            clean(&bool_field, &Value::Bool(true).to_string()).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            clean(&bool_field, &Value::Bool(false).to_string()).unwrap(),
            Value::Bool(false)
        );

        let id = uuid::Uuid::new_v4();
        let uuid_field = FieldSchema::new("u", FieldKind::Uuid);
        assert_eq!(
            clean(&uuid_field, &Value::Uuid(id).to_string()).unwrap(),
            Value::Uuid(id)
        );
    }

    #[test]
    fn test_choice_membership() {
        let field = FieldSchema::new(
            "status",
            FieldKind::choice(vec![("m", "Maintenance"), ("o", "On loan")]),
        );
        assert_eq!(clean(&field, "m").unwrap(), Value::Text("m".into()));
        assert_eq!(
            first_message(clean(&field, "x")),
            "Select a valid choice. x is not one of the available choices."
        );
    }

    #[test]
    fn test_multi_choice() {
        let field = FieldSchema::new(
            "genres",
            FieldKind::multi_choice(vec![("sf", "Science fiction"), ("f", "Fantasy")]),
        );
        let cleaned =
            clean_field_value(&field, &["sf".to_string(), "f".to_string()]).unwrap();
        assert_eq!(
            cleaned,
            Value::List(vec![Value::Text("sf".into()), Value::Text("f".into())])
        );

        let err = clean_field_value(&field, &["sf".to_string(), "romance".to_string()]);
        assert_eq!(
            first_message(err),
            "Select a valid choice. romance is not one of the available choices."
        );
    }

    #[test]
    fn test_multi_choice_optional_empty() {
        let field = FieldSchema::new("genres", FieldKind::multi_choice(vec![("sf", "SF")]))
            .required(false);
        assert_eq!(clean_field_value(&field, &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_email() {
        let field = FieldSchema::new("email", FieldKind::Email);
        assert_eq!(
            clean(&field, "reader@example.com").unwrap(),
            Value::Text("reader@example.com".into())
        );
        assert_eq!(
            first_message(clean(&field, "not-an-email")),
            "Enter a valid email address."
        );
    }

    #[test]
    fn test_url() {
        let field = FieldSchema::new("homepage", FieldKind::Url);
        assert_eq!(
            clean(&field, "https://example.com/books").unwrap(),
            Value::Text("https://example.com/books".into())
        );
        assert_eq!(first_message(clean(&field, "example.com")), "Enter a valid URL.");
    }

    #[test]
    fn test_slug() {
        let field = FieldSchema::new("slug", FieldKind::Slug);
        assert_eq!(clean(&field, "dune-1965").unwrap(), Value::Text("dune-1965".into()));
        assert!(first_message(clean(&field, "dune 1965")).starts_with("Enter a valid \"slug\""));
    }

    #[test]
    fn test_regex_kind() {
        let field = FieldSchema::new(
            "isbn",
            FieldKind::Regex {
                pattern: r"^\d{13}$".to_string(),
            },
        );
        assert_eq!(
            clean(&field, "9780441013593").unwrap(),
            Value::Text("9780441013593".into())
        );
        assert_eq!(first_message(clean(&field, "978-0441013593")), "Enter a valid value.");
    }

    #[test]
    fn test_regex_kind_bad_pattern_is_field_error() {
        let field = FieldSchema::new(
            "broken",
            FieldKind::Regex {
                pattern: "[unclosed".to_string(),
            },
        );
        assert!(first_message(clean(&field, "anything")).starts_with("Invalid pattern:"));
    }

    #[test]
    fn test_uuid() {
        let field = FieldSchema::new("copy_id", FieldKind::Uuid);
        let id = uuid::Uuid::new_v4();
        assert_eq!(clean(&field, &id.to_string()).unwrap(), Value::Uuid(id));
        assert_eq!(first_message(clean(&field, "not-a-uuid")), "Enter a valid UUID.");
    }

    #[test]
    fn test_file_extensions() {
        let field = FieldSchema::new(
            "cover",
            FieldKind::File {
                allowed_extensions: vec!["jpg".to_string(), "png".to_string()],
            },
        );
        assert_eq!(clean(&field, "dune.JPG").unwrap(), Value::Text("dune.JPG".into()));
        assert_eq!(
            first_message(clean(&field, "dune.pdf")),
            "File extension not allowed. Allowed extensions: jpg, png."
        );
    }

    #[test]
    fn test_json() {
        let field = FieldSchema::new("extra", FieldKind::Json);
        assert_eq!(
            clean(&field, r#"{"shelf": 3}"#).unwrap(),
            Value::Json(serde_json::json!({"shelf": 3}))
        );
        assert_eq!(first_message(clean(&field, "{not json")), "Enter valid JSON.");
    }

    #[test]
    fn test_declared_checks_run_after_builtins() {
        let field = FieldSchema::new(
            "copies",
            FieldKind::Integer {
                min_value: Some(0),
                max_value: None,
            },
        )
        .check("Must be an even number.", |v| {
            v.as_int().is_some_and(|n| n % 2 == 0)
        });

        assert_eq!(clean(&field, "4").unwrap(), Value::Int(4));
        assert_eq!(first_message(clean(&field, "3")), "Must be an even number.");
        // Built-in failure short-circuits; the declared check never runs.
        assert_eq!(
            first_message(clean(&field, "-2")),
            "Ensure this value is greater than or equal to 0."
        );
    }

    #[test]
    fn test_checks_run_in_declaration_order() {
        let field = FieldSchema::new("n", FieldKind::integer())
            .check("first", |_| false)
            .check("second", |_| false);
        assert_eq!(first_message(clean(&field, "1")), "first");
    }

    #[test]
    fn test_error_message_override() {
        let field = FieldSchema::new("title", FieldKind::text())
            .error_message("required", "A book needs a title.");
        assert_eq!(first_message(clean(&field, "")), "A book needs a title.");

        let date = FieldSchema::new("due_back", FieldKind::Date)
            .error_message("invalid", "Use YYYY-MM-DD.");
        assert_eq!(first_message(clean(&date, "someday")), "Use YYYY-MM-DD.");
    }

    #[test]
    fn test_scalar_kinds_use_last_submitted_value() {
        let field = FieldSchema::new("title", FieldKind::text());
        let cleaned =
            clean_field_value(&field, &["first".to_string(), "second".to_string()]).unwrap();
        assert_eq!(cleaned, Value::Text("second".into()));
    }

    #[test]
    fn test_choices_accessor() {
        let field = FieldSchema::new("status", FieldKind::choice(vec![("m", "Maintenance")]));
        assert_eq!(field.choices().len(), 1);
        let plain = FieldSchema::new("title", FieldKind::text());
        assert!(plain.choices().is_empty());
    }
}
