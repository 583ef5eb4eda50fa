//! Per-field projection for renderers.
//!
//! A [`BoundField`] pairs one field schema with its current display state:
//! the value to re-show, the submitted selections, and any validation
//! errors. Forms hand these out in declaration order so templates and the
//! built-in layouts can render rows without touching the form internals.

use std::collections::BTreeMap;

use crate::fields::FieldSchema;
use crate::widgets::{escape_html, render_widget, WidgetHint};

/// One field of a form, ready to render.
///
/// Owns snapshots of the schema metadata rather than borrowing the form, so
/// renderers can hold bound fields without lifetime ties.
#[derive(Debug, Clone)]
pub struct BoundField {
    /// The schema name.
    pub name: String,
    /// The HTML `name` attribute, with any form prefix applied.
    pub html_name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text, possibly empty.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
    /// The control shape to render.
    pub hint: WidgetHint,
    /// The current display value.
    pub value: String,
    /// Every submitted value, for multi-valued controls.
    pub selected: Vec<String>,
    /// Validation errors in pipeline order.
    pub errors: Vec<String>,
    /// (stored value, display label) pairs for select shapes.
    pub choices: Vec<(String, String)>,
}

impl BoundField {
    /// Projects a field schema into its renderable state.
    pub fn new(
        field: &FieldSchema,
        prefix: Option<&str>,
        value: String,
        selected: Vec<String>,
        errors: Vec<String>,
    ) -> Self {
        let html_name = match prefix {
            Some(p) => format!("{p}-{}", field.name),
            None => field.name.clone(),
        };
        Self {
            name: field.name.clone(),
            html_name,
            label: field.label.clone(),
            help_text: field.help_text.clone(),
            required: field.required,
            disabled: field.disabled,
            hint: field.widget,
            value,
            selected,
            errors,
            choices: field.choices().to_vec(),
        }
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.html_name)
    }

    /// Renders a `<label>` element pointing at the widget.
    pub fn label_tag(&self) -> String {
        format!(
            r#"<label for="{}">{}</label>"#,
            self.auto_id(),
            escape_html(&self.label)
        )
    }

    /// Renders the widget markup with `id`, `required`, and `disabled`
    /// attributes applied.
    pub fn widget_html(&self) -> String {
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), self.auto_id());
        if self.required {
            attrs.insert("required".to_string(), "required".to_string());
        }
        if self.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        render_widget(
            self.hint,
            &self.html_name,
            &self.value,
            &self.selected,
            &self.choices,
            &attrs,
        )
    }

    /// Returns `true` if this field carries any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the field's errors as a `<ul class="errorlist">`, or an
    /// empty string when there are none.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }

    /// Renders the help text as a `<span class="helptext">`, or an empty
    /// string when there is none.
    pub fn help_html(&self) -> String {
        if self.help_text.is_empty() {
            return String::new();
        }
        format!(
            r#"<span class="helptext">{}</span>"#,
            escape_html(&self.help_text)
        )
    }
}
