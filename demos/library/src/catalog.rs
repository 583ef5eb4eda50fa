//! Entity schemas for the library desk.

use std::sync::LazyLock;

use bindery_model::{EntityField, EntityKind, EntitySchema, Value};

/// A book in the catalog.
///
/// `status` mirrors the loan lifecycle; a fresh copy starts in maintenance
/// until a librarian shelves it. `due_back` is only set while the book is
/// out.
pub static BOOK: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        "book",
        vec![
            EntityField::new("id", EntityKind::AutoId).read_only(),
            EntityField::new("title", EntityKind::Text).max_length(200),
            EntityField::new("author", EntityKind::Text).max_length(100),
            EntityField::new("summary", EntityKind::LongText)
                .optional()
                .help_text("Back-cover copy shown on the detail page."),
            EntityField::new("isbn", EntityKind::Text)
                .max_length(13)
                .verbose_name("ISBN")
                .optional(),
            EntityField::new("status", EntityKind::Choice)
                .choices(vec![("m", "Maintenance"), ("o", "On loan"), ("a", "Available")])
                .default(Value::Text("m".into())),
            EntityField::new("due_back", EntityKind::Date).optional(),
        ],
    )
});
