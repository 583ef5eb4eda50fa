//! Deriving form fields from an entity schema.
//!
//! [`derive_fields`] reads an [`EntitySchema`] and synthesizes the
//! [`FieldSchema`] list a form needs to edit records of that entity, so the
//! field inventory is written once, on the entity. Storage kinds map to form
//! kinds; store constraints (required, max length, choices, defaults) carry
//! over; [`FieldOverrides`] adjusts presentation and adds checks without
//! touching the entity.

use std::collections::HashMap;

use bindery_core::{BinderyError, BinderyResult};
use bindery_model::schema::{EntityField, EntityKind, EntitySchema};
use bindery_model::Value;

use crate::fields::{FieldKind, FieldSchema};
use crate::validation::FieldCheck;
use crate::widgets::WidgetHint;

/// Which entity fields a derived form exposes.
///
/// Prefer an explicit allow-list: with [`FieldSelection::All`], a field
/// added to the entity later silently becomes user-submittable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// Exactly these fields, in this order.
    Allow(Vec<String>),
    /// Every editable field with a form representation, in entity order.
    All,
}

impl FieldSelection {
    /// Builds an allow-list from string slices.
    pub fn allow(names: &[&str]) -> Self {
        Self::Allow(names.iter().map(|n| (*n).to_string()).collect())
    }
}

/// Per-field presentation and validation adjustments applied on top of
/// what the entity schema declares.
#[derive(Debug, Default)]
pub struct FieldOverrides {
    labels: HashMap<String, String>,
    help_texts: HashMap<String, String>,
    widgets: HashMap<String, WidgetHint>,
    checks: HashMap<String, Vec<FieldCheck>>,
}

impl FieldOverrides {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the label derived from the entity's verbose name.
    #[must_use]
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    /// Replaces the help text carried over from the entity.
    #[must_use]
    pub fn with_help_text(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.help_texts.insert(field.into(), text.into());
        self
    }

    /// Replaces the widget hint chosen for the field's kind.
    #[must_use]
    pub fn with_widget(mut self, field: impl Into<String>, widget: WidgetHint) -> Self {
        self.widgets.insert(field.into(), widget);
        self
    }

    /// Adds a declared check to the derived field. Checks accumulate in
    /// call order and run after the field's built-in constraints.
    #[must_use]
    pub fn with_check(
        mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.checks
            .entry(field.into())
            .or_default()
            .push(FieldCheck::new(message, predicate));
        self
    }
}

/// Synthesizes form field schemas for an entity.
///
/// With [`FieldSelection::Allow`], the result follows the allow-list order
/// and naming an unknown field, a field with no form representation, or a
/// non-editable field is a [`BinderyError::Configuration`]. With
/// [`FieldSelection::All`], the result follows entity order and such fields
/// are skipped instead.
///
/// # Errors
///
/// Returns [`BinderyError::Configuration`] for allow-list entries that
/// cannot be edited through a form.
pub fn derive_fields(
    entity: &EntitySchema,
    selection: &FieldSelection,
    overrides: &FieldOverrides,
) -> BinderyResult<Vec<FieldSchema>> {
    match selection {
        FieldSelection::Allow(names) => {
            let mut fields = Vec::with_capacity(names.len());
            for name in names {
                let Some(entity_field) = entity.field(name) else {
                    return Err(BinderyError::Configuration(format!(
                        "entity \"{}\" has no field named \"{name}\"",
                        entity.name
                    )));
                };
                let Some(kind) = form_kind_for(entity_field) else {
                    return Err(BinderyError::Configuration(format!(
                        "field \"{name}\" of entity \"{}\" has no form representation",
                        entity.name
                    )));
                };
                if !entity_field.editable {
                    return Err(BinderyError::Configuration(format!(
                        "field \"{name}\" of entity \"{}\" is not editable",
                        entity.name
                    )));
                }
                fields.push(synthesize(entity_field, kind, overrides));
            }
            Ok(fields)
        }
        FieldSelection::All => {
            tracing::warn!(
                entity = entity.name,
                "deriving every editable field; entity fields added later become user-submittable"
            );
            let mut fields = Vec::new();
            for entity_field in &entity.fields {
                if !entity_field.editable {
                    continue;
                }
                let Some(kind) = form_kind_for(entity_field) else {
                    continue;
                };
                fields.push(synthesize(entity_field, kind, overrides));
            }
            Ok(fields)
        }
    }
}

/// Maps a storage kind to the form kind that collects it. `None` means the
/// field cannot be edited through a form at all.
fn form_kind_for(field: &EntityField) -> Option<FieldKind> {
    let kind = match &field.kind {
        EntityKind::AutoId | EntityKind::Binary => return None,
        EntityKind::Text | EntityKind::LongText => FieldKind::Text {
            min_length: None,
            max_length: field.max_length,
            strip: true,
        },
        EntityKind::Integer => FieldKind::integer(),
        EntityKind::Float => FieldKind::float(),
        EntityKind::Decimal {
            max_digits,
            decimal_places,
        } => FieldKind::Decimal {
            max_digits: *max_digits,
            decimal_places: *decimal_places,
        },
        EntityKind::Boolean => FieldKind::Boolean,
        EntityKind::Date => FieldKind::Date,
        EntityKind::DateTime => FieldKind::DateTime,
        EntityKind::Time => FieldKind::Time,
        EntityKind::Uuid => FieldKind::Uuid,
        EntityKind::Email => FieldKind::Email,
        EntityKind::Url => FieldKind::Url,
        EntityKind::Slug => FieldKind::Slug,
        EntityKind::Choice => FieldKind::Choice {
            choices: field.choices.clone().unwrap_or_default(),
        },
        EntityKind::Json => FieldKind::Json,
    };
    Some(kind)
}

/// Builds one form field from its entity counterpart plus overrides.
///
/// A field with a store default is never required on the form: omitting it
/// lets the default apply.
fn synthesize(
    entity_field: &EntityField,
    kind: FieldKind,
    overrides: &FieldOverrides,
) -> FieldSchema {
    let mut schema = FieldSchema::new(entity_field.name, kind)
        .required(entity_field.required && entity_field.default.is_none())
        .label(entity_field.verbose_name.clone())
        .help_text(entity_field.help_text.clone());
    if entity_field.kind == EntityKind::LongText {
        schema = schema.widget(WidgetHint::Textarea);
    }
    if let Some(default) = &entity_field.default {
        schema = schema.initial(default.clone());
    }

    if let Some(label) = overrides.labels.get(entity_field.name) {
        schema = schema.label(label.clone());
    }
    if let Some(text) = overrides.help_texts.get(entity_field.name) {
        schema = schema.help_text(text.clone());
    }
    if let Some(widget) = overrides.widgets.get(entity_field.name) {
        schema = schema.widget(*widget);
    }
    if let Some(checks) = overrides.checks.get(entity_field.name) {
        schema.checks.extend(checks.iter().cloned());
    }
    schema
}
