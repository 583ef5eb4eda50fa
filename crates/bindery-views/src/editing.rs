//! Schema-derived editing controllers.
//!
//! [`CreateController`], [`UpdateController`], and [`DeleteController`]
//! cover the standard editing flow for one entity: safe methods show a form
//! (or a confirmation page), `POST` validates and persists through the
//! entity store, and a successful submission answers with a redirect to its
//! [`SuccessTarget`].
//!
//! All three share an [`EditingConfig`]. Form fields are derived from the
//! entity schema once, when a controller is constructed, so a bad
//! allow-list fails at wiring time rather than on the first request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use bindery_core::{BinderyError, BinderyResult};
use bindery_forms::{
    derive_fields, CheckHook, FieldOverrides, FieldSchema, FieldSelection, Form, FormHook,
    FormState, ValidationFailure,
};
use bindery_http::{FormData, Request, Response};
use bindery_model::{EntitySchema, EntityStore, Record, Value};

use crate::controller::Controller;
use crate::render::Renderer;

/// Where a successful submission redirects to.
#[derive(Clone)]
pub enum SuccessTarget {
    /// The detail path of the record that was written, `/{entity}/{id}/`.
    /// After a delete, where that page no longer exists, this falls back to
    /// the entity listing `/{entity}/`.
    Detail,
    /// A fixed URL.
    Url(String),
    /// Computed from the record the submission touched. A delete resolver
    /// receives the record as it was before removal.
    Resolver(Arc<dyn Fn(&Record) -> String + Send + Sync>),
}

impl SuccessTarget {
    fn resolve(&self, entity: &str, record: &Record) -> String {
        match self {
            Self::Detail => match record.id_text() {
                Some(id) => format!("/{entity}/{id}/"),
                None => format!("/{entity}/"),
            },
            Self::Url(url) => url.clone(),
            Self::Resolver(resolver) => resolver(record),
        }
    }

    fn resolve_removed(&self, entity: &str, record: &Record) -> String {
        match self {
            Self::Detail => format!("/{entity}/"),
            _ => self.resolve(entity, record),
        }
    }
}

/// Per-route configuration shared by the editing controllers.
///
/// Carries the entity, which of its fields the form exposes, presentation
/// and validation overrides, and where success redirects to. A delete
/// route uses only the entity, template, and success target.
pub struct EditingConfig {
    entity: &'static EntitySchema,
    selection: FieldSelection,
    overrides: FieldOverrides,
    initial: HashMap<String, Value>,
    check_hooks: HashMap<String, CheckHook>,
    form_hook: Option<FormHook>,
    template: Option<String>,
    success: SuccessTarget,
}

impl EditingConfig {
    pub fn new(entity: &'static EntitySchema, selection: FieldSelection) -> Self {
        Self {
            entity,
            selection,
            overrides: FieldOverrides::new(),
            initial: HashMap::new(),
            check_hooks: HashMap::new(),
            form_hook: None,
            template: None,
            success: SuccessTarget::Detail,
        }
    }

    /// Sets presentation and constraint overrides for the derived fields.
    #[must_use]
    pub fn with_overrides(mut self, overrides: FieldOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Pre-fills one field of the unbound form.
    #[must_use]
    pub fn with_initial(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial.insert(name.into(), value.into());
        self
    }

    /// Attaches a per-field hook, run after the field's own validation.
    #[must_use]
    pub fn with_check_hook(
        mut self,
        name: impl Into<String>,
        hook: impl Fn(Value) -> Result<Value, ValidationFailure> + Send + Sync + 'static,
    ) -> Self {
        self.check_hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Attaches a whole-form hook, run once every field has been cleaned.
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

    /// Overrides the template reference derived from the entity name.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Sets the destination of a successful submission.
    #[must_use]
    pub fn with_success(mut self, success: SuccessTarget) -> Self {
        self.success = success;
        self
    }

    fn template_or(&self, suffix: &str) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| format!("{}{suffix}.html", self.entity.name))
    }
}

/// A config with its fields already derived. Create and update controllers
/// clone the schemas into a fresh request-scoped [`Form`].
struct FormSource {
    config: EditingConfig,
    fields: Vec<FieldSchema>,
}

impl FormSource {
    fn build(config: EditingConfig) -> BinderyResult<Self> {
        let fields = derive_fields(config.entity, &config.selection, &config.overrides)?;
        Ok(Self { config, fields })
    }

    fn form(&self, data: Option<FormData>, initial: HashMap<String, Value>) -> Form {
        let mut form = match data {
            Some(data) => Form::bound(self.fields.clone(), data),
            None => Form::unbound(self.fields.clone()),
        };
        form = form.with_initial(initial);
        for (name, hook) in &self.config.check_hooks {
            let hook = Arc::clone(hook);
            form = form.with_check_hook(name.clone(), move |value| hook(value));
        }
        if let Some(hook) = &self.config.form_hook {
            let hook = Arc::clone(hook);
            form = form.with_form_hook(move |cleaned| hook(cleaned));
        }
        form
    }

    fn entity(&self) -> &'static EntitySchema {
        self.config.entity
    }
}

/// Resolves the record a request addresses, from the identifier captured
/// out of the path. No identifier is a routing defect and answers 400; an
/// identifier that matches nothing answers 404.
async fn fetch_target(
    store: &dyn EntityStore,
    entity: &EntitySchema,
    request: &Request,
) -> BinderyResult<Record> {
    let id = request.identifier().ok_or_else(|| {
        BinderyError::BadRequest(format!("no identifier in path \"{}\"", request.path()))
    })?;
    store.fetch_by_id(entity, id).await
}

fn edit_context(form: &Form, entity: &EntitySchema, record: Option<&Record>) -> serde_json::Value {
    let mut context = serde_json::json!({
        "entity": entity.name,
        "entity_label": entity.verbose_name,
        "form": form.render_context(),
    });
    if let Some(record) = record {
        context["record"] = serde_json::json!(record);
    }
    context
}

/// Cleaned data ready for a create call. `Null` entries are dropped so the
/// store's declared defaults apply to fields the submission left blank.
fn creatable(cleaned: &HashMap<String, Value>) -> HashMap<String, Value> {
    cleaned
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Shows an empty form on safe methods and creates a record from a valid
/// `POST`.
pub struct CreateController {
    source: FormSource,
    store: Arc<dyn EntityStore>,
    renderer: Arc<dyn Renderer>,
}

impl CreateController {
    /// Builds the controller, deriving the form fields once. Fails with a
    /// configuration error when the selection names a field the entity
    /// lacks, a non-editable field, or a field with no form counterpart.
    pub fn new(
        config: EditingConfig,
        store: Arc<dyn EntityStore>,
        renderer: Arc<dyn Renderer>,
    ) -> BinderyResult<Self> {
        Ok(Self {
            source: FormSource::build(config)?,
            store,
            renderer,
        })
    }

    async fn render_form(&self, form: &Form) -> BinderyResult<Response> {
        let context = edit_context(form, self.source.entity(), None);
        let template = self.source.config.template_or("_form");
        let body = self.renderer.render(&template, &context).await?;
        Ok(Response::ok(body))
    }
}

#[async_trait]
impl Controller for CreateController {
    async fn display(&self, _request: &Request) -> BinderyResult<Response> {
        let form = self
            .source
            .form(None, self.source.config.initial.clone());
        self.render_form(&form).await
    }

    async fn submit(&self, request: &Request) -> BinderyResult<Response> {
        let mut form = self.source.form(
            Some(request.form_data().clone()),
            self.source.config.initial.clone(),
        );
        if form.validate() == FormState::Valid {
            let values = creatable(form.cleaned_data());
            let record = self.store.create(self.source.entity(), values).await?;
            tracing::debug!(
                entity = self.source.entity().name,
                id = %record.id_text().unwrap_or_default(),
                "record created"
            );
            let url = self
                .source
                .config
                .success
                .resolve(self.source.entity().name, &record);
            return Ok(Response::redirect(&url));
        }
        self.render_form(&form).await
    }
}

/// Shows a record-prefilled form on safe methods and saves a valid `POST`
/// back onto the record.
///
/// The record is fetched before any form work on both paths, so a stale or
/// mistyped identifier answers 404 without touching the renderer.
pub struct UpdateController {
    source: FormSource,
    store: Arc<dyn EntityStore>,
    renderer: Arc<dyn Renderer>,
}

impl UpdateController {
    /// Builds the controller, deriving the form fields once. Fails with a
    /// configuration error under the same conditions as
    /// [`CreateController::new`].
    pub fn new(
        config: EditingConfig,
        store: Arc<dyn EntityStore>,
        renderer: Arc<dyn Renderer>,
    ) -> BinderyResult<Self> {
        Ok(Self {
            source: FormSource::build(config)?,
            store,
            renderer,
        })
    }

    /// Configured initial values with the record's own values layered on
    /// top. The record wins: editing starts from what is stored.
    fn record_initial(&self, record: &Record) -> HashMap<String, Value> {
        let mut initial = self.source.config.initial.clone();
        for (name, value) in &record.values {
            initial.insert(name.clone(), value.clone());
        }
        initial
    }

    async fn render_form(&self, form: &Form, record: &Record) -> BinderyResult<Response> {
        let context = edit_context(form, self.source.entity(), Some(record));
        let template = self.source.config.template_or("_form");
        let body = self.renderer.render(&template, &context).await?;
        Ok(Response::ok(body))
    }
}

#[async_trait]
impl Controller for UpdateController {
    async fn display(&self, request: &Request) -> BinderyResult<Response> {
        let record = fetch_target(self.store.as_ref(), self.source.entity(), request).await?;
        let form = self.source.form(None, self.record_initial(&record));
        self.render_form(&form, &record).await
    }

    async fn submit(&self, request: &Request) -> BinderyResult<Response> {
        let record = fetch_target(self.store.as_ref(), self.source.entity(), request).await?;
        let mut form = self.source.form(
            Some(request.form_data().clone()),
            self.record_initial(&record),
        );
        if form.validate() == FormState::Valid {
            let saved = self
                .store
                .save(self.source.entity(), &record, form.cleaned_data().clone())
                .await?;
            tracing::debug!(
                entity = self.source.entity().name,
                id = %saved.id_text().unwrap_or_default(),
                "record saved"
            );
            let url = self
                .source
                .config
                .success
                .resolve(self.source.entity().name, &saved);
            return Ok(Response::redirect(&url));
        }
        self.render_form(&form, &record).await
    }
}

/// Shows a confirmation page on safe methods and removes the record on
/// `POST`.
///
/// There is no form and no invalid path: the only inputs are the path
/// identifier and the method.
pub struct DeleteController {
    config: EditingConfig,
    store: Arc<dyn EntityStore>,
    renderer: Arc<dyn Renderer>,
}

impl DeleteController {
    /// Builds the controller. Nothing is derived, so construction cannot
    /// fail.
    pub fn new(
        config: EditingConfig,
        store: Arc<dyn EntityStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            config,
            store,
            renderer,
        }
    }
}

#[async_trait]
impl Controller for DeleteController {
    async fn display(&self, request: &Request) -> BinderyResult<Response> {
        let record = fetch_target(self.store.as_ref(), self.config.entity, request).await?;
        let context = serde_json::json!({
            "entity": self.config.entity.name,
            "entity_label": self.config.entity.verbose_name,
            "record": record,
        });
        let template = self.config.template_or("_confirm_delete");
        let body = self.renderer.render(&template, &context).await?;
        Ok(Response::ok(body))
    }

    async fn submit(&self, request: &Request) -> BinderyResult<Response> {
        let record = fetch_target(self.store.as_ref(), self.config.entity, request).await?;
        self.store.delete(self.config.entity, &record).await?;
        tracing::debug!(
            entity = self.config.entity.name,
            id = %record.id_text().unwrap_or_default(),
            "record deleted"
        );
        let url = self
            .config
            .success
            .resolve_removed(self.config.entity.name, &record);
        Ok(Response::redirect(&url))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use bindery_model::{EntityField, EntityKind, MemoryStore};

    use crate::render::DebugRenderer;

    use super::*;

    static AUTHOR: LazyLock<EntitySchema> = LazyLock::new(|| {
        EntitySchema::new(
            "author",
            vec![
                EntityField::new("id", EntityKind::AutoId).read_only(),
                EntityField::new("name", EntityKind::Text).max_length(100),
                EntityField::new("bio", EntityKind::LongText).optional(),
            ],
        )
    });

    fn record_with_id(id: i64) -> Record {
        let mut record = Record::new();
        record.id = Some(Value::Int(id));
        record
    }

    #[test]
    fn test_success_target_detail_uses_record_id() {
        let record = record_with_id(7);
        assert_eq!(SuccessTarget::Detail.resolve("author", &record), "/author/7/");
    }

    #[test]
    fn test_success_target_fixed_url() {
        let target = SuccessTarget::Url("/thanks/".into());
        assert_eq!(target.resolve("author", &record_with_id(7)), "/thanks/");
    }

    #[test]
    fn test_success_target_resolver_sees_the_record() {
        let target = SuccessTarget::Resolver(Arc::new(|record: &Record| {
            format!("/authors/{}/welcome/", record.id_text().unwrap_or_default())
        }));
        assert_eq!(
            target.resolve("author", &record_with_id(3)),
            "/authors/3/welcome/"
        );
    }

    #[test]
    fn test_detail_target_after_delete_falls_back_to_listing() {
        let record = record_with_id(7);
        assert_eq!(
            SuccessTarget::Detail.resolve_removed("author", &record),
            "/author/"
        );
        let fixed = SuccessTarget::Url("/archive/".into());
        assert_eq!(fixed.resolve_removed("author", &record), "/archive/");
    }

    #[test]
    fn test_template_defaults_per_flow() {
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name"]));
        assert_eq!(config.template_or("_form"), "author_form.html");
        assert_eq!(
            config.template_or("_confirm_delete"),
            "author_confirm_delete.html"
        );
        let themed = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name"]))
            .with_template("authors/editor.html");
        assert_eq!(themed.template_or("_form"), "authors/editor.html");
    }

    #[test]
    fn test_construction_rejects_a_bad_allow_list() {
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name", "shoe_size"]));
        let result = CreateController::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(DebugRenderer),
        );
        match result {
            Err(BinderyError::Configuration(msg)) => assert!(msg.contains("shoe_size")),
            _ => panic!("expected a configuration error"),
        }
    }

    #[tokio::test]
    async fn test_create_display_renders_the_form_template() {
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name", "bio"]));
        let controller = CreateController::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(DebugRenderer),
        )
        .unwrap();
        let response = controller.dispatch(&Request::get("/author/add/")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.body().contains("<!-- Template: author_form.html -->"));
        assert!(response.body().contains("\"name\": \"name\""));
    }

    #[tokio::test]
    async fn test_create_submit_persists_and_redirects_to_detail() {
        let store = Arc::new(MemoryStore::new());
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name", "bio"]));
        let controller =
            CreateController::new(
                config,
                Arc::clone(&store) as Arc<dyn EntityStore>,
                Arc::new(DebugRenderer),
            )
            .unwrap();
        let request = Request::post("/author/add/", "name=Ursula");
        let response = controller.dispatch(&request).await;
        assert_eq!(response.status(), http::StatusCode::FOUND);
        assert_eq!(response.location(), Some("/author/1/"));
        assert_eq!(store.len("author"), 1);
    }

    #[tokio::test]
    async fn test_update_prefills_from_the_record() {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .create(
                &AUTHOR,
                HashMap::from([("name".to_string(), Value::Text("Octavia".into()))]),
            )
            .await
            .unwrap();
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name", "bio"]));
        let controller =
            UpdateController::new(
                config,
                Arc::clone(&store) as Arc<dyn EntityStore>,
                Arc::new(DebugRenderer),
            )
            .unwrap();
        let request =
            Request::get("/author/1/edit/").with_identifier(created.id_text().unwrap());
        let response = controller.dispatch(&request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.body().contains("Octavia"));
    }

    #[tokio::test]
    async fn test_delete_confirmation_then_removal() {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .create(
                &AUTHOR,
                HashMap::from([("name".to_string(), Value::Text("Iain".into()))]),
            )
            .await
            .unwrap();
        let config = EditingConfig::new(&AUTHOR, FieldSelection::allow(&["name"]));
        let controller =
            DeleteController::new(
                config,
                Arc::clone(&store) as Arc<dyn EntityStore>,
                Arc::new(DebugRenderer),
            );
        let id = created.id_text().unwrap();

        let confirm = controller
            .dispatch(&Request::get("/author/1/delete/").with_identifier(&id))
            .await;
        assert_eq!(confirm.status(), http::StatusCode::OK);
        assert!(confirm
            .body()
            .contains("<!-- Template: author_confirm_delete.html -->"));
        assert_eq!(store.len("author"), 1, "confirmation page must not delete");

        let removal = controller
            .dispatch(&Request::post("/author/1/delete/", "").with_identifier(&id))
            .await;
        assert_eq!(removal.status(), http::StatusCode::FOUND);
        assert_eq!(removal.location(), Some("/author/"));
        assert!(store.is_empty("author"));
    }
}
