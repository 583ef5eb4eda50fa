//! Widget hints and their HTML rendering.
//!
//! A [`WidgetHint`] names the input control shape a field should render as.
//! It is presentation metadata only and carries no validation semantics;
//! the cleaning pipeline never looks at it. [`render_widget`] turns a hint
//! plus the current display state into markup with deterministic attribute
//! order and escaped values.

use std::collections::BTreeMap;
use std::fmt;

/// Enumerates the built-in input control shapes.
///
/// Each variant corresponds to a distinct HTML form element or input type.
/// Fields get a default hint from their kind; callers may override it per
/// field at declaration time or through builder overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetHint {
    /// `<input type="text">`.
    Text,
    /// `<input type="number">`.
    Number,
    /// `<input type="email">`.
    Email,
    /// `<input type="url">`.
    Url,
    /// `<input type="password">`; never re-displays the submitted value.
    Password,
    /// `<input type="hidden">`.
    Hidden,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
    /// `<input type="date">`.
    Date,
    /// `<input type="datetime-local">`.
    DateTime,
    /// `<input type="time">`.
    Time,
    /// `<input type="file">`; never re-displays the submitted value.
    File,
}

impl fmt::Display for WidgetHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Textarea => "textarea",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::SelectMultiple => "select-multiple",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::File => "file",
        };
        write!(f, "{name}")
    }
}

impl WidgetHint {
    /// Returns the HTML `type` attribute for `<input>`-shaped hints, or
    /// `None` for `<select>`/`<textarea>` shapes.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Number => Some("number"),
            Self::Email => Some("email"),
            Self::Url => Some("url"),
            Self::Password => Some("password"),
            Self::Hidden => Some("hidden"),
            Self::Checkbox => Some("checkbox"),
            Self::Date => Some("date"),
            Self::DateTime => Some("datetime-local"),
            Self::Time => Some("time"),
            Self::File => Some("file"),
            Self::Textarea | Self::Select | Self::SelectMultiple => None,
        }
    }
}

/// Escapes a string for safe interpolation into HTML attribute values and
/// element bodies.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Formats an attribute map as ` key="value"` pairs.
///
/// A `BTreeMap` keeps the output deterministic, which the layout tests
/// rely on.
fn render_attrs(attrs: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        out.push_str(&format!(r#" {key}="{}""#, escape_html(value)));
    }
    out
}

/// Renders the markup for one widget.
///
/// # Arguments
/// - `hint` - the control shape
/// - `name` - the HTML `name` attribute (prefix already applied)
/// - `value` - the current display value
/// - `selected` - every submitted value, used by multi-valued controls
/// - `choices` - (stored value, display label) pairs for select shapes
/// - `attrs` - additional attributes (`id`, `required`, `disabled`, ...)
pub fn render_widget(
    hint: WidgetHint,
    name: &str,
    value: &str,
    selected: &[String],
    choices: &[(String, String)],
    attrs: &BTreeMap<String, String>,
) -> String {
    let name = escape_html(name);
    let extra = render_attrs(attrs);
    match hint {
        WidgetHint::Textarea => {
            format!(
                "<textarea name=\"{name}\"{extra}>{}</textarea>",
                escape_html(value)
            )
        }
        WidgetHint::Select => {
            let options = render_options(choices, &[value.to_string()]);
            format!("<select name=\"{name}\"{extra}>{options}</select>")
        }
        WidgetHint::SelectMultiple => {
            let options = render_options(choices, selected);
            format!("<select name=\"{name}\" multiple{extra}>{options}</select>")
        }
        WidgetHint::Checkbox => {
            let checked = if is_truthy(value) { " checked" } else { "" };
            format!(r#"<input type="checkbox" name="{name}" value="true"{checked}{extra} />"#)
        }
        WidgetHint::Password | WidgetHint::File => {
            // Submitted values are never echoed back for these shapes.
            let input_type = hint.input_type().unwrap_or("text");
            format!(r#"<input type="{input_type}" name="{name}"{extra} />"#)
        }
        _ => {
            let input_type = hint.input_type().unwrap_or("text");
            format!(
                r#"<input type="{input_type}" name="{name}" value="{}"{extra} />"#,
                escape_html(value)
            )
        }
    }
}

/// Renders `<option>` elements, marking the selected ones.
fn render_options(choices: &[(String, String)], selected: &[String]) -> String {
    let mut out = String::new();
    for (stored, label) in choices {
        let marker = if selected.iter().any(|s| s == stored) {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<option value="{}"{marker}>{}</option>"#,
            escape_html(stored),
            escape_html(label)
        ));
    }
    out
}

/// Interprets a display value as a checkbox state.
fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
