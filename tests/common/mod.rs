use crudpanel::{CrudPanel, Field, ModelRegistry, ModelSchema};
use std::sync::Arc;

pub mod customer_entity;
pub mod vehicle_entity;
pub mod vehicle_part_entity;

/// Blog schema shared by the integration tests.
///
/// ```text
/// articles --author/editor--> users --profile--> profiles --avatar--> photos
///          --category-------> categories --parent--> categories
///          --comments-------> comments --author--> users
///          --tags (pivot)---> tags
///          --photos (morph)-> photos
///          --commenters (through comments)--> users
/// ```
pub fn blog_registry() -> Arc<ModelRegistry> {
    let registry = ModelRegistry::new()
        .with_model(
            ModelSchema::new("articles")
                .belongs_to("author", "users", "author_id")
                .belongs_to("editor", "users", "editor_id")
                .belongs_to("category", "categories", "category_id")
                .has_many("comments", "comments", "article_id")
                .belongs_to_many("tags", "tags", "article_tag")
                .morph_many("photos", "photos", "imageable")
                .has_many_through("commenters", "users", "comments"),
        )
        .with_model(
            ModelSchema::new("users")
                .has_one("profile", "profiles", "user_id")
                .has_many("articles", "articles", "author_id")
                .belongs_to("country", "countries", "country_id"),
        )
        .with_model(
            ModelSchema::new("profiles")
                .belongs_to("user", "users", "user_id")
                .morph_one("avatar", "photos", "imageable"),
        )
        .with_model(
            ModelSchema::new("comments")
                .belongs_to("article", "articles", "article_id")
                .belongs_to("author", "users", "user_id"),
        )
        .with_model(ModelSchema::new("tags").belongs_to_many("articles", "articles", "article_tag"))
        .with_model(ModelSchema::new("photos").morph_to("imageable", "articles", "imageable"))
        .with_model(ModelSchema::new("categories").belongs_to("parent", "categories", "parent_id"))
        .with_model(ModelSchema::new("countries"));

    Arc::new(registry)
}

/// Article panel with relationship attributes inferred for every field.
pub fn article_panel(fields: Vec<Field>) -> CrudPanel {
    let mut panel = CrudPanel::new(blog_registry(), "articles").expect("articles is registered");
    panel.add_fields(fields).expect("fields resolve");
    panel
}

/// Article panel with fields kept exactly as declared.
pub fn raw_article_panel(fields: Vec<Field>) -> CrudPanel {
    CrudPanel::new(blog_registry(), "articles")
        .expect("articles is registered")
        .with_fields(fields)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
