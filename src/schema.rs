//! Model schemas: each model class declares its relations up front, so
//! "is this segment a relation?" is a map lookup.
//!
//! ```rust
//! use crudpanel::{ModelRegistry, ModelSchema};
//!
//! let mut registry = ModelRegistry::new();
//! registry.register(
//!     ModelSchema::new("articles")
//!         .belongs_to("author", "users", "author_id")
//!         .belongs_to_many("tags", "tags", "article_tag"),
//! );
//! registry.register(ModelSchema::new("users").has_one("profile", "profiles", "user_id"));
//!
//! let articles = registry.model("articles").unwrap();
//! assert!(articles.has_relation("author"));
//! assert!(!articles.has_relation("title"));
//! ```

use crate::errors::PanelError;
use crate::relation::{Relation, RelationKind};
use std::collections::HashMap;

/// Relations declared by one model class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    class: String,
    relations: HashMap<String, Relation>,
}

impl ModelSchema {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            relations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Declare a relation. A later declaration with the same name replaces the earlier one.
    #[must_use]
    pub fn relation_def(mut self, relation: Relation) -> Self {
        self.relations.insert(relation.name().to_string(), relation);
        self
    }

    #[must_use]
    pub fn with_relation(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        self.relation_def(Relation::new(name, related, kind))
    }

    /// `foreign_key` is a column on this model; the owner key defaults to `id`.
    #[must_use]
    pub fn belongs_to(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::BelongsTo {
                foreign_key: foreign_key.into(),
                owner_key: "id".to_string(),
            },
        )
    }

    /// `foreign_key` is a column on the related model.
    #[must_use]
    pub fn has_one(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::HasOne {
                foreign_key: foreign_key.into(),
            },
        )
    }

    #[must_use]
    pub fn has_many(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::HasMany {
                foreign_key: foreign_key.into(),
            },
        )
    }

    #[must_use]
    pub fn belongs_to_many(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        pivot_table: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::BelongsToMany {
                pivot_table: pivot_table.into(),
            },
        )
    }

    #[must_use]
    pub fn has_one_through(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        through: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::HasOneThrough {
                through: through.into(),
            },
        )
    }

    #[must_use]
    pub fn has_many_through(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        through: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::HasManyThrough {
                through: through.into(),
            },
        )
    }

    #[must_use]
    pub fn morph_one(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        morph_name: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::MorphOne {
                morph_name: morph_name.into(),
            },
        )
    }

    #[must_use]
    pub fn morph_many(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        morph_name: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::MorphMany {
                morph_name: morph_name.into(),
            },
        )
    }

    /// The related class of a `MorphTo` is only known per record; `related`
    /// names the class used for introspection.
    #[must_use]
    pub fn morph_to(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        morph_name: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::MorphTo {
                morph_name: morph_name.into(),
            },
        )
    }

    #[must_use]
    pub fn morph_to_many(
        self,
        name: impl Into<String>,
        related: impl Into<String>,
        pivot_table: impl Into<String>,
        morph_name: impl Into<String>,
    ) -> Self {
        self.with_relation(
            name,
            related,
            RelationKind::MorphToMany {
                pivot_table: pivot_table.into(),
                morph_name: morph_name.into(),
            },
        )
    }
}

/// All model schemas known to a panel, keyed by class
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelSchema>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any schema with the same class.
    pub fn register(&mut self, schema: ModelSchema) -> &mut Self {
        tracing::trace!(model = %schema.class(), relations = schema.relations.len(), "Registering model schema");
        self.models.insert(schema.class().to_string(), schema);
        self
    }

    #[must_use]
    pub fn with_model(mut self, schema: ModelSchema) -> Self {
        self.register(schema);
        self
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.models.contains_key(class)
    }

    /// Look up a registered schema.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownModel`] when `class` was never registered.
    pub fn model(&self, class: &str) -> Result<&ModelSchema, PanelError> {
        self.models
            .get(class)
            .ok_or_else(|| PanelError::unknown_model(class))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
