//! # bindery Library Example
//!
//! A working library-desk application demonstrating the bindery pipeline:
//!
//! - **Catalog**: a `book` entity schema with choices, defaults, and dates
//! - **Controllers**: schema-derived create, update, and delete flows
//! - **Renewal rule**: a check hook holding renewals to a four-week window
//! - **Gating**: a staff-only route that refuses outside requests
//! - **Templates**: the same flows rendered through real tera templates
//! - **Settings**: configurable via `library.toml` or plain defaults
//!
//! ## Running
//!
//! ```bash
//! cargo run --package library-demo
//! ```
//!
//! Requests are simulated in-process; the resulting statuses, redirects,
//! and body sizes are logged. Set `debug = false` in `library.toml` to
//! route every flow through the tera renderer instead of the debug one.

mod catalog;
mod routes;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use bindery_core::logging::{request_span, setup_logging};
use bindery_core::{Settings, SETTINGS};
use bindery_http::Request;
use bindery_model::{EntityStore, MemoryStore, Value};
use bindery_views::{Controller, DebugRenderer, Gated, Renderer, TeraRenderer};

use catalog::BOOK;
use routes::{book_desk, BookDesk};

#[tokio::main]
async fn main() {
    let settings = if std::path::Path::new("library.toml").exists() {
        Settings::from_toml_file("library.toml").unwrap_or_default()
    } else {
        Settings::default()
    };
    setup_logging(&settings);
    SETTINGS.configure(settings);
    tracing::info!(
        debug = SETTINGS.get().debug,
        log_level = %SETTINGS.get().log_level,
        "library desk starting"
    );

    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    seed_catalog(&store).await;

    let renderer: Arc<dyn Renderer> = if SETTINGS.get().debug {
        Arc::new(DebugRenderer)
    } else {
        Arc::new(TeraRenderer::from_engine(desk_engine()))
    };

    let today = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date");
    let desk = book_desk(&store, &renderer, today).expect("desk wiring");

    demonstrate_intake(&desk).await;
    demonstrate_edit(&desk).await;
    demonstrate_renewal(&desk).await;
    demonstrate_retire(&desk).await;
    demonstrate_gate(&store, &renderer, today).await;
    demonstrate_templates(&store, today).await;

    tracing::info!("library example complete");
}

/// Stocks the shelves with a couple of books so the update, renewal, and
/// delete flows have something to work on.
async fn seed_catalog(store: &Arc<dyn EntityStore>) {
    let seeds = [
        ("The Dispossessed", "Ursula K. Le Guin", "o", Some("2024-01-15")),
        ("Use of Weapons", "Iain M. Banks", "a", None),
    ];
    for (title, author, status, due_back) in seeds {
        let mut values = HashMap::from([
            ("title".to_string(), Value::Text(title.into())),
            ("author".to_string(), Value::Text(author.into())),
            ("status".to_string(), Value::Text(status.into())),
        ]);
        if let Some(date) = due_back {
            let date = date.parse().expect("seed date parses");
            values.insert("due_back".to_string(), Value::Date(date));
        }
        let record = store.create(&BOOK, values).await.expect("seeding the catalog");
        tracing::info!(
            id = %record.id_text().unwrap_or_default(),
            title,
            "seeded book"
        );
    }
}

/// Dispatches one request and logs the outcome.
async fn show(label: &str, controller: &dyn Controller, request: Request) {
    let response = controller.dispatch(&request).await;

    let span = request_span(request.method().as_str(), request.path());
    let _guard = span.enter();
    match response.location() {
        Some(url) => tracing::info!(status = %response.status(), redirect = url, "{label}"),
        None => tracing::info!(
            status = %response.status(),
            bytes = response.body().len(),
            "{label}"
        ),
    }
}

async fn demonstrate_intake(desk: &BookDesk) {
    tracing::info!("--- Book intake ---");
    show("blank intake form", &desk.add, Request::get("/book/add/")).await;
    show(
        "valid intake redirects to the new book",
        &desk.add,
        Request::post(
            "/book/add/",
            "title=A+Wizard+of+Earthsea&author=Ursula+K.+Le+Guin&status=a",
        ),
    )
    .await;
    show(
        "missing author re-renders with errors",
        &desk.add,
        Request::post("/book/add/", "title=No+Author+Given"),
    )
    .await;
}

async fn demonstrate_edit(desk: &BookDesk) {
    tracing::info!("--- Editing a book ---");
    show(
        "edit form prefilled from the record",
        &desk.edit,
        Request::get("/book/2/edit/").with_identifier("2"),
    )
    .await;
    show(
        "status change saves in place",
        &desk.edit,
        Request::post(
            "/book/2/edit/",
            "title=Use+of+Weapons&author=Iain+M.+Banks&status=o&due_back=2024-02-01",
        )
        .with_identifier("2"),
    )
    .await;
    show(
        "unknown book is a 404",
        &desk.edit,
        Request::get("/book/999/edit/").with_identifier("999"),
    )
    .await;
}

async fn demonstrate_renewal(desk: &BookDesk) {
    tracing::info!("--- Loan renewal ---");
    show(
        "renewal in the past is rejected",
        &desk.renew,
        Request::post("/book/1/renew/", "due_back=2024-01-05").with_identifier("1"),
    )
    .await;
    show(
        "renewal beyond four weeks is rejected",
        &desk.renew,
        Request::post("/book/1/renew/", "due_back=2024-03-01").with_identifier("1"),
    )
    .await;
    show(
        "renewal inside the window succeeds",
        &desk.renew,
        Request::post("/book/1/renew/", "due_back=2024-01-31").with_identifier("1"),
    )
    .await;
}

async fn demonstrate_retire(desk: &BookDesk) {
    tracing::info!("--- Retiring a copy ---");
    show(
        "confirmation page",
        &desk.retire,
        Request::get("/book/3/delete/").with_identifier("3"),
    )
    .await;
    show(
        "confirmed removal redirects to the desk",
        &desk.retire,
        Request::post("/book/3/delete/", "").with_identifier("3"),
    )
    .await;
    show(
        "the copy is gone",
        &desk.retire,
        Request::get("/book/3/delete/").with_identifier("3"),
    )
    .await;
}

async fn demonstrate_gate(
    store: &Arc<dyn EntityStore>,
    renderer: &Arc<dyn Renderer>,
    today: NaiveDate,
) {
    tracing::info!("--- Staff-only route ---");
    let desk = book_desk(store, renderer, today).expect("desk wiring");
    let staff_only = Gated::new(desk.retire, |request: &Request| {
        request.path().starts_with("/staff/")
    });
    show(
        "public request is refused",
        &staff_only,
        Request::post("/book/1/delete/", "").with_identifier("1"),
    )
    .await;
    show(
        "staff request passes the gate",
        &staff_only,
        Request::get("/staff/book/1/delete/").with_identifier("1"),
    )
    .await;
}

/// Runs the renewal flow once more through real templates, to show the
/// same context feeding tera instead of the debug renderer.
async fn demonstrate_templates(store: &Arc<dyn EntityStore>, today: NaiveDate) {
    tracing::info!("--- Real templates ---");
    let renderer: Arc<dyn Renderer> = Arc::new(TeraRenderer::from_engine(desk_engine()));
    let desk = book_desk(store, &renderer, today).expect("desk wiring");

    let request = Request::get("/book/1/renew/").with_identifier("1");
    let response = desk.renew.dispatch(&request).await;
    let preview: String = response.body().chars().take(160).collect();
    tracing::info!(status = %response.status(), "rendered book_renew.html");
    tracing::info!("preview: {preview}...");
}

/// Builds the tera engine with inline templates for demonstration.
fn desk_engine() -> tera::Tera {
    let mut engine = tera::Tera::default();
    engine
        .add_raw_templates(vec![
            (
                "book_form.html",
                r#"<!DOCTYPE html>
<html>
<head><title>{{ entity_label }}</title></head>
<body>
<h1>{% if record is defined %}Edit{% else %}New{% endif %} {{ entity_label }}</h1>
<form method="post">
<table>
{{ form.as_table | safe }}
</table>
<button type="submit">Save</button>
</form>
</body>
</html>"#,
            ),
            (
                "book_renew.html",
                r#"<h1>Renew: {{ record.values.title.value }}</h1>
<form method="post">{{ form.as_p | safe }}<button type="submit">Renew</button></form>"#,
            ),
            (
                "book_confirm_delete.html",
                r#"<h1>Retire "{{ record.values.title.value }}"?</h1>
<form method="post"><button type="submit">Confirm</button></form>"#,
            ),
        ])
        .expect("inline templates parse");
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeding_fills_the_store() {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn EntityStore> = Arc::clone(&memory) as Arc<dyn EntityStore>;
        seed_catalog(&store).await;
        assert_eq!(memory.len("book"), 2);
    }

    #[tokio::test]
    async fn test_desk_engine_renders_the_renewal_page() {
        let renderer = TeraRenderer::from_engine(desk_engine());
        let context = serde_json::json!({
            "record": {"id": {"type": "Int", "value": 1},
                        "values": {"title": {"type": "Text", "value": "Dune"}}},
            "form": {"as_p": "<p>due back</p>"},
        });
        let body = renderer
            .render("book_renew.html", &context)
            .await
            .expect("template renders");
        assert!(body.contains("Renew: Dune"));
        assert!(body.contains("<p>due back</p>"));
    }

    #[tokio::test]
    async fn test_form_template_distinguishes_edit_from_new() {
        let renderer = TeraRenderer::from_engine(desk_engine());
        let new_page = renderer
            .render(
                "book_form.html",
                &serde_json::json!({"entity_label": "book", "form": {"as_table": ""}}),
            )
            .await
            .expect("template renders");
        assert!(new_page.contains("<h1>New book</h1>"));

        let edit_page = renderer
            .render(
                "book_form.html",
                &serde_json::json!({
                    "entity_label": "book",
                    "form": {"as_table": ""},
                    "record": {"id": {"type": "Int", "value": 1}, "values": {}},
                }),
            )
            .await
            .expect("template renders");
        assert!(edit_page.contains("<h1>Edit book</h1>"));
    }
}
