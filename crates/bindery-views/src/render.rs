//! Response body rendering.
//!
//! Controllers describe a page as a template reference plus a JSON context
//! and hand both to a [`Renderer`]. [`DebugRenderer`] skips templating and
//! dumps the context as annotated JSON, which is what tests and quick demos
//! use; [`TeraRenderer`] renders real templates from a directory.

use async_trait::async_trait;

use bindery_core::{BinderyError, BinderyResult};

/// Turns a template reference and a context into a response body.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `template` against `context`.
    async fn render(&self, template: &str, context: &serde_json::Value) -> BinderyResult<String>;
}

/// A renderer that emits the context as pretty-printed JSON inside a
/// minimal HTML shell, annotated with the template reference it would have
/// used. It never fails and needs no template files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugRenderer;

#[async_trait]
impl Renderer for DebugRenderer {
    async fn render(&self, template: &str, context: &serde_json::Value) -> BinderyResult<String> {
        let body = serde_json::to_string_pretty(context).unwrap_or_default();
        Ok(format!(
            "<!-- Template: {template} -->\n<html><body><pre>{body}</pre></body></html>"
        ))
    }
}

/// A renderer backed by a [`tera`] template directory.
pub struct TeraRenderer {
    engine: tera::Tera,
}

impl TeraRenderer {
    /// Loads every template matching `glob`, e.g. `"templates/**/*.html"`.
    pub fn new(glob: &str) -> BinderyResult<Self> {
        let engine = tera::Tera::new(glob).map_err(|e| BinderyError::Render(e.to_string()))?;
        Ok(Self { engine })
    }

    /// Wraps an already-configured engine, for callers that register their
    /// own filters or raw templates.
    pub const fn from_engine(engine: tera::Tera) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Renderer for TeraRenderer {
    async fn render(&self, template: &str, context: &serde_json::Value) -> BinderyResult<String> {
        let context = tera::Context::from_value(context.clone())
            .map_err(|e| BinderyError::Render(e.to_string()))?;
        self.engine
            .render(template, &context)
            .map_err(|e| BinderyError::Render(e.to_string()))
    }
}
