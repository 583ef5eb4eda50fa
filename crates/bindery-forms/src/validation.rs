//! Validation failures, declared checks, and the per-field cleaning loop.
//!
//! A [`ValidationFailure`] is how any stage of the cleaning pipeline reports
//! a problem with one field (or, from a form-level hook, with the whole
//! form). Failures never propagate as `BinderyError`: they accumulate in the
//! form's error collections and surface through its accessors.
//!
//! [`clean_fields`] drives the per-field stages for every field of a bound
//! form: presence, coercion, built-in constraints, declared checks, then the
//! field's custom hook. The first failing stage ends processing for that
//! field; in particular a custom hook never runs after a built-in failure,
//! so a field carries errors from exactly one stage.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bindery_http::FormData;
use bindery_model::Value;

use crate::fields::{clean_field_value, FieldSchema};

/// One or more messages explaining why a value was rejected.
///
/// Most failures carry a single message; hooks may attach several at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    messages: Vec<String>,
}

impl ValidationFailure {
    /// Creates a failure with a single message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Creates a failure carrying several messages.
    pub fn with_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Appends an additional message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Returns the messages in the order they were attached.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consumes the failure, yielding its messages.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// A declared predicate+message pair attached to one field schema.
///
/// Checks run after the kind's built-in constraints, in declaration order,
/// against the already-coerced typed value. The first failing check ends
/// validation for the field.
#[derive(Clone)]
pub struct FieldCheck {
    message: String,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl FieldCheck {
    /// Creates a check that fails with `message` when `predicate` returns
    /// `false`.
    pub fn new(
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Applies the predicate to a coerced value.
    pub fn passes(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for FieldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCheck")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A per-field hook registered by name at form construction.
///
/// Receives the fully coerced and constraint-checked value and returns a
/// (possibly transformed) final value, or a failure.
pub type CheckHook = Arc<dyn Fn(Value) -> Result<Value, ValidationFailure> + Send + Sync>;

/// A whole-form hook that runs after every field has been cleaned.
///
/// Receives the mutable cleaned-data map, which holds entries only for
/// fields that passed; invalid fields are structurally out of reach.
pub type FormHook =
    Arc<dyn Fn(&mut HashMap<String, Value>) -> Result<(), ValidationFailure> + Send + Sync>;

/// Runs a field's declared checks in order, stopping at the first failure.
pub fn run_checks(checks: &[FieldCheck], value: &Value) -> Result<(), ValidationFailure> {
    for check in checks {
        if !check.passes(value) {
            return Err(ValidationFailure::new(check.message()));
        }
    }
    Ok(())
}

/// Cleans every field of a bound form.
///
/// For each field schema, in declaration order:
/// 1. Disabled fields ignore submitted data entirely and clean from their
///    initial value, still subject to declared checks and the custom hook.
/// 2. Everything else runs [`clean_field_value`] on the submitted values
///    for the field's (prefix-aware) HTML name.
/// 3. A registered custom hook runs only when the earlier stages passed.
///
/// Results land in `cleaned` on success or `errors` on failure; each field
/// gets exactly one of the two.
pub fn clean_fields(
    fields: &[FieldSchema],
    data: &FormData,
    prefix: Option<&str>,
    initial: &HashMap<String, Value>,
    check_hooks: &HashMap<String, CheckHook>,
    cleaned: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in fields {
        let outcome = if field.disabled {
            let value = initial
                .get(&field.name)
                .or(field.initial.as_ref())
                .cloned()
                .unwrap_or(Value::Null);
            run_checks(&field.checks, &value).map(|()| value)
        } else {
            let html_name = match prefix {
                Some(p) => format!("{p}-{}", field.name),
                None => field.name.clone(),
            };
            clean_field_value(field, data.get_list(&html_name))
        };

        let outcome = outcome.and_then(|value| match check_hooks.get(&field.name) {
            Some(hook) => hook(value),
            None => Ok(value),
        });

        match outcome {
            Ok(value) => {
                cleaned.insert(field.name.clone(), value);
            }
            Err(failure) => {
                errors.insert(field.name.clone(), failure.into_messages());
            }
        }
    }
}
