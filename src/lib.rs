//! # crudpanel
//!
//! Relationship introspection for CRUD admin panels. Given a model's declared
//! relations and a panel's form fields, `crudpanel` resolves dotted entity
//! paths (`author.profile.bio`) to relations, classifies fields by relation
//! type, converts HTML bracket names (`author[profile][bio]`) to dot notation
//! and rewrites submitted `BelongsTo` values onto their foreign key columns.
//!
//! Rendering and persistence stay with the host application: this crate only
//! produces field lists and rewritten submission data.
//!
//! ```rust
//! use std::sync::Arc;
//! use crudpanel::{CrudPanel, Field, ModelRegistry, ModelSchema, Relationships};
//! use serde_json::json;
//!
//! let registry = Arc::new(
//!     ModelRegistry::new()
//!         .with_model(ModelSchema::new("articles").belongs_to("author", "users", "author_id"))
//!         .with_model(ModelSchema::new("users")),
//! );
//!
//! let mut panel = CrudPanel::new(registry, "articles").unwrap();
//! panel.add_field(Field::new("author")).unwrap();
//!
//! let submitted = json!({"title": "Hello", "author": 5});
//! let data = panel
//!     .belongs_to_names_to_foreign_keys(submitted.as_object().unwrap().clone())
//!     .unwrap();
//! assert_eq!(serde_json::Value::Object(data), json!({"title": "Hello", "author_id": 5}));
//! ```

pub mod entity;
pub mod errors;
pub mod field;
pub mod panel;
pub mod path;
pub mod relation;
pub mod relationships;
pub mod schema;

pub use errors::PanelError;
pub use field::{Field, fields_from_json, parse_relation_field_names_from_html};
pub use panel::CrudPanel;
pub use path::{EntityPath, dots_to_square_brackets, square_brackets_to_dots};
pub use relation::{
    Relation, RelationKind, RelationType, has_multiple_related_records, uses_pivot_table,
};
pub use relationships::Relationships;
pub use schema::{ModelRegistry, ModelSchema};
