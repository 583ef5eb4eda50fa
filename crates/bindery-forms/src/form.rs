//! The form state machine.
//!
//! A [`Form`] aggregates field schemas, binds submitted data, and runs the
//! cleaning pipeline. It starts [`Unbound`](FormState::Unbound) (display
//! only) or [`Bound`](FormState::Bound) (carrying submitted data), and
//! [`validate`](Form::validate) moves a bound form exactly once into one of
//! the two terminal states. Cleaned values and errors are then read through
//! accessors; nothing mutates a terminal form.

use std::collections::HashMap;
use std::sync::Arc;

use bindery_http::FormData;
use bindery_model::Value;

use crate::bound_field::BoundField;
use crate::fields::{FieldKind, FieldSchema};
use crate::validation::{self, CheckHook, FormHook, ValidationFailure};

/// The error key carrying form-level (non-field) messages.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Where a form is in its lifecycle.
///
/// `Valid` and `Invalid` are terminal: once reached, further `validate`
/// calls are no-ops returning the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No submitted data; the form only displays initial values.
    Unbound,
    /// Submitted data attached but not yet validated.
    Bound,
    /// Validation ran and every field passed.
    Valid,
    /// Validation ran and at least one field or the form itself failed.
    Invalid,
}

impl FormState {
    /// Lowercase name, used in render contexts and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Bound => "bound",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

/// A declared set of fields plus binding, validation, and render state.
///
/// # Examples
///
/// ```
/// use bindery_forms::fields::{FieldKind, FieldSchema};
/// use bindery_forms::form::{Form, FormState};
/// use bindery_http::FormData;
///
/// let fields = vec![FieldSchema::new("title", FieldKind::text())];
/// let mut form = Form::bound(fields, FormData::from_pairs(&[("title", "Dune")]));
/// assert_eq!(form.validate(), FormState::Valid);
/// assert_eq!(form.cleaned_data()["title"].as_str(), Some("Dune"));
/// ```
pub struct Form {
    fields: Vec<FieldSchema>,
    data: Option<FormData>,
    initial: HashMap<String, Value>,
    prefix: Option<String>,
    check_hooks: HashMap<String, CheckHook>,
    form_hook: Option<FormHook>,
    state: FormState,
    cleaned: HashMap<String, Value>,
    errors: HashMap<String, Vec<String>>,
}

impl Form {
    /// Creates an unbound form that displays initial values only.
    pub fn unbound(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            data: None,
            initial: HashMap::new(),
            prefix: None,
            check_hooks: HashMap::new(),
            form_hook: None,
            state: FormState::Unbound,
            cleaned: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Creates a form bound to submitted data, ready to validate.
    pub fn bound(fields: Vec<FieldSchema>, data: FormData) -> Self {
        let mut form = Self::unbound(fields);
        form.data = Some(data);
        form.state = FormState::Bound;
        form
    }

    /// Overrides schema-declared initial values per field name.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial = initial;
        self
    }

    /// Namespaces the form's HTML field names as `prefix-name`, for pages
    /// carrying several forms. Binding honors the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Registers a per-field hook, run after the field's built-in
    /// constraints all pass. The hook may transform the coerced value or
    /// reject it.
    #[must_use]
    pub fn with_check_hook(
        mut self,
        name: impl Into<String>,
        hook: impl Fn(Value) -> Result<Value, ValidationFailure> + Send + Sync + 'static,
    ) -> Self {
        self.check_hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Registers the whole-form hook, run once after every field has been
    /// cleaned. It receives the mutable cleaned-data map and may mutate
    /// values or fail with form-level messages.
    #[must_use]
    pub fn with_form_hook(
        mut self,
        hook: impl Fn(&mut HashMap<String, Value>) -> Result<(), ValidationFailure>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.form_hook = Some(Arc::new(hook));
        self
    }

    /// Runs the cleaning pipeline, moving a bound form to a terminal state.
    ///
    /// Idempotent: on an already-terminal form this returns the existing
    /// outcome without re-running any stage or hook. On an unbound form it
    /// is a no-op returning [`FormState::Unbound`].
    pub fn validate(&mut self) -> FormState {
        if self.state != FormState::Bound {
            return self.state;
        }
        let Some(data) = self.data.as_ref() else {
            return self.state;
        };

        validation::clean_fields(
            &self.fields,
            data,
            self.prefix.as_deref(),
            &self.initial,
            &self.check_hooks,
            &mut self.cleaned,
            &mut self.errors,
        );

        if let Some(hook) = &self.form_hook {
            if let Err(failure) = hook(&mut self.cleaned) {
                self.errors
                    .entry(NON_FIELD_ERRORS.to_string())
                    .or_default()
                    .extend(failure.into_messages());
            }
        }

        self.state = if self.errors.is_empty() {
            FormState::Valid
        } else {
            FormState::Invalid
        };
        tracing::debug!(
            state = self.state.as_str(),
            errors = self.errors.len(),
            "form validated"
        );
        self.state
    }

    /// Returns the current lifecycle state.
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Returns `true` if the form carries submitted data.
    pub fn is_bound(&self) -> bool {
        self.state != FormState::Unbound
    }

    /// Returns `true` only when validation ran and everything passed.
    /// Always `false` for unbound and not-yet-validated forms.
    pub fn is_valid(&self) -> bool {
        self.state == FormState::Valid
    }

    /// Returns the field schemas in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks up a field schema by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the form prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the HTML name for a field, with the prefix applied.
    pub fn html_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{name}"),
            None => name.to_string(),
        }
    }

    /// Returns every error keyed by field name (plus [`NON_FIELD_ERRORS`]).
    pub fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns the errors for one field, empty if none.
    pub fn errors_for(&self, name: &str) -> &[String] {
        self.errors.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the form-level messages, empty if none.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors_for(NON_FIELD_ERRORS)
    }

    /// Returns the cleaned name-to-value map.
    ///
    /// Complete after a `Valid` outcome; after `Invalid` it holds entries
    /// only for the fields that individually passed.
    pub fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned
    }

    /// Returns the best value to show for a field right now.
    ///
    /// After a `Valid` outcome this is the cleaned typed value. Otherwise a
    /// bound form re-displays the submitted raw text (disabled fields their
    /// initial), and an unbound form shows the initial override or schema
    /// default.
    pub fn value_for(&self, name: &str) -> Value {
        if self.state == FormState::Valid {
            if let Some(value) = self.cleaned.get(name) {
                return value.clone();
            }
        }
        let Some(field) = self.field(name) else {
            return Value::Null;
        };
        match &self.data {
            Some(data) if !field.disabled => {
                let html_name = self.html_name(name);
                match &field.kind {
                    FieldKind::MultiChoice { .. } => {
                        let values: Vec<Value> = data
                            .get_list(&html_name)
                            .iter()
                            .map(|s| Value::Text(s.clone()))
                            .collect();
                        if values.is_empty() {
                            Value::Null
                        } else {
                            Value::List(values)
                        }
                    }
                    _ => data
                        .get(&html_name)
                        .map_or(Value::Null, |s| Value::Text(s.to_string())),
                }
            }
            _ => self
                .initial
                .get(name)
                .or(field.initial.as_ref())
                .cloned()
                .unwrap_or(Value::Null),
        }
    }

    /// Projects every field into its renderable state, in declaration
    /// order.
    pub fn bound_fields(&self) -> Vec<BoundField> {
        self.fields
            .iter()
            .map(|field| {
                let value = self.value_for(&field.name);
                let selected = match &value {
                    Value::List(items) => items.iter().map(ToString::to_string).collect(),
                    _ => Vec::new(),
                };
                BoundField::new(
                    field,
                    self.prefix.as_deref(),
                    value.to_string(),
                    selected,
                    self.errors_for(&field.name).to_vec(),
                )
            })
            .collect()
    }

    fn non_field_errors_ul(&self) -> String {
        let messages = self.non_field_errors();
        if messages.is_empty() {
            return String::new();
        }
        let items: String = messages
            .iter()
            .map(|e| format!("<li>{}</li>", crate::widgets::escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist nonfield">{items}</ul>"#)
    }

    /// Renders the whole form as table rows.
    pub fn as_table(&self) -> String {
        let mut out = String::new();
        let non_field = self.non_field_errors_ul();
        if !non_field.is_empty() {
            out.push_str(&format!(r#"<tr><td colspan="2">{non_field}</td></tr>"#));
        }
        for bf in self.bound_fields() {
            out.push_str(&format!(
                "<tr><th>{}</th><td>{}{}{}</td></tr>",
                bf.label_tag(),
                bf.errors_as_ul(),
                bf.widget_html(),
                bf.help_html()
            ));
        }
        out
    }

    /// Renders the whole form as list items.
    pub fn as_ul(&self) -> String {
        let mut out = String::new();
        let non_field = self.non_field_errors_ul();
        if !non_field.is_empty() {
            out.push_str(&format!("<li>{non_field}</li>"));
        }
        for bf in self.bound_fields() {
            out.push_str(&format!(
                "<li>{}{} {}{}</li>",
                bf.errors_as_ul(),
                bf.label_tag(),
                bf.widget_html(),
                bf.help_html()
            ));
        }
        out
    }

    /// Renders the whole form as paragraphs.
    pub fn as_p(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.non_field_errors_ul());
        for bf in self.bound_fields() {
            out.push_str(&bf.errors_as_ul());
            out.push_str(&format!(
                "<p>{} {}{}</p>",
                bf.label_tag(),
                bf.widget_html(),
                bf.help_html()
            ));
        }
        out
    }

    /// Builds the JSON context renderers receive for this form.
    pub fn render_context(&self) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = self
            .bound_fields()
            .iter()
            .map(|bf| {
                serde_json::json!({
                    "name": bf.name,
                    "html_name": bf.html_name,
                    "auto_id": bf.auto_id(),
                    "label": bf.label,
                    "label_tag": bf.label_tag(),
                    "help_text": bf.help_text,
                    "required": bf.required,
                    "value": bf.value,
                    "errors": bf.errors,
                    "widget": bf.widget_html(),
                })
            })
            .collect();
        serde_json::json!({
            "fields": fields,
            "errors": self.errors,
            "non_field_errors": self.non_field_errors(),
            "is_bound": self.is_bound(),
            "is_valid": self.is_valid(),
            "state": self.state.as_str(),
            "as_table": self.as_table(),
            "as_ul": self.as_ul(),
            "as_p": self.as_p(),
        })
    }
}
