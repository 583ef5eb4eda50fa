//! Controller wiring for the library desk.
//!
//! One entity, four routes: add a book, edit it, renew a loan, retire a
//! copy. Renewal is an update restricted to `due_back`, with the desk rule
//! that a renewal lands between today and four weeks out.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use bindery_core::BinderyResult;
use bindery_forms::{FieldOverrides, FieldSelection, ValidationFailure};
use bindery_model::EntityStore;
use bindery_views::{
    CreateController, DeleteController, EditingConfig, Renderer, SuccessTarget, UpdateController,
};

use crate::catalog::BOOK;

/// The full set of book controllers, wired to one store and renderer.
pub struct BookDesk {
    pub add: CreateController,
    pub edit: UpdateController,
    pub renew: UpdateController,
    pub retire: DeleteController,
}

/// Builds the book controllers. Fails only on a wiring mistake, such as an
/// allow-list naming a field the schema lacks.
pub fn book_desk(
    store: &Arc<dyn EntityStore>,
    renderer: &Arc<dyn Renderer>,
    today: NaiveDate,
) -> BinderyResult<BookDesk> {
    let add = CreateController::new(
        EditingConfig::new(
            &BOOK,
            FieldSelection::allow(&["title", "author", "summary", "isbn", "status"]),
        )
        .with_overrides(
            FieldOverrides::new().with_help_text("isbn", "Thirteen digits, no dashes."),
        ),
        Arc::clone(store),
        Arc::clone(renderer),
    )?;

    let edit = UpdateController::new(
        EditingConfig::new(
            &BOOK,
            FieldSelection::allow(&["title", "author", "summary", "isbn", "status", "due_back"]),
        ),
        Arc::clone(store),
        Arc::clone(renderer),
    )?;

    let renew = UpdateController::new(
        renewal_config(today),
        Arc::clone(store),
        Arc::clone(renderer),
    )?;

    let retire = DeleteController::new(
        EditingConfig::new(&BOOK, FieldSelection::allow(&[]))
            .with_success(SuccessTarget::Url("/desk/".into())),
        Arc::clone(store),
        Arc::clone(renderer),
    );

    Ok(BookDesk {
        add,
        edit,
        renew,
        retire,
    })
}

/// Renewal form configuration: only `due_back` is editable, and the desk
/// accepts a date between today and four weeks out.
pub fn renewal_config(today: NaiveDate) -> EditingConfig {
    EditingConfig::new(&BOOK, FieldSelection::allow(&["due_back"]))
        .with_template("book_renew.html")
        .with_success(SuccessTarget::Url("/desk/".into()))
        .with_check_hook("due_back", move |value| {
            let Some(date) = value.as_date() else {
                return Ok(value);
            };
            if date < today {
                return Err(ValidationFailure::new("Invalid date - renewal in past"));
            }
            if date > today + Duration::weeks(4) {
                return Err(ValidationFailure::new(
                    "Invalid date - renewal more than 4 weeks ahead",
                ));
            }
            Ok(value)
        })
}

#[cfg(test)]
mod tests {
    use bindery_http::Request;
    use bindery_model::MemoryStore;
    use bindery_views::{Controller, DebugRenderer};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[tokio::test]
    async fn test_desk_wires_up() {
        let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
        let renderer: Arc<dyn Renderer> = Arc::new(DebugRenderer);
        assert!(book_desk(&store, &renderer, date(2024, 1, 10)).is_ok());
    }

    #[tokio::test]
    async fn test_renewal_rejects_a_past_date() {
        let memory = Arc::new(MemoryStore::new());
        let created = memory
            .create(
                &BOOK,
                std::collections::HashMap::from([(
                    "title".to_string(),
                    bindery_model::Value::Text("Dune".into()),
                )]),
            )
            .await
            .expect("seed book");
        let store: Arc<dyn EntityStore> = memory;
        let renderer: Arc<dyn Renderer> = Arc::new(DebugRenderer);
        let desk = book_desk(&store, &renderer, date(2024, 1, 10)).expect("wiring");

        let request = Request::post("/book/1/renew/", "due_back=2024-01-05")
            .with_identifier(created.id_text().expect("assigned id"));
        let response = desk.renew.dispatch(&request).await;

        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.body().contains("Invalid date - renewal in past"));
    }

    #[tokio::test]
    async fn test_renewal_accepts_a_date_inside_the_window() {
        let memory = Arc::new(MemoryStore::new());
        let created = memory
            .create(
                &BOOK,
                std::collections::HashMap::from([(
                    "title".to_string(),
                    bindery_model::Value::Text("Dune".into()),
                )]),
            )
            .await
            .expect("seed book");
        let store: Arc<dyn EntityStore> = memory;
        let renderer: Arc<dyn Renderer> = Arc::new(DebugRenderer);
        let desk = book_desk(&store, &renderer, date(2024, 1, 10)).expect("wiring");

        let request = Request::post("/book/1/renew/", "due_back=2024-01-24")
            .with_identifier(created.id_text().expect("assigned id"));
        let response = desk.renew.dispatch(&request).await;

        assert_eq!(response.status(), http::StatusCode::FOUND);
        assert_eq!(response.location(), Some("/desk/"));
    }
}
