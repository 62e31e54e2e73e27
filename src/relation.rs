//! Relation kinds and resolved relation descriptors.
//!
//! [`RelationType`] is the short tag a field declaration carries
//! (`"BelongsTo"`, `"HasMany"`, ...). [`RelationKind`] is the full description
//! of one relation, carrying the keys or pivot table that kind needs.
//! [`Relation`] is one named hop between two models.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Relation type tag
///
/// Deserializes through [`RelationType::from_tag`], so qualified tags are
/// accepted in field configuration too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
pub enum RelationType {
    BelongsTo,
    BelongsToMany,
    HasOne,
    HasMany,
    HasOneOrMany,
    HasOneThrough,
    HasManyThrough,
    MorphOne,
    MorphMany,
    MorphOneOrMany,
    MorphTo,
    MorphToMany,
}

impl RelationType {
    pub const ALL: [Self; 12] = [
        Self::BelongsTo,
        Self::BelongsToMany,
        Self::HasOne,
        Self::HasMany,
        Self::HasOneOrMany,
        Self::HasOneThrough,
        Self::HasManyThrough,
        Self::MorphOne,
        Self::MorphMany,
        Self::MorphOneOrMany,
        Self::MorphTo,
        Self::MorphToMany,
    ];

    /// Short tag, e.g. `"BelongsToMany"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "BelongsTo",
            Self::BelongsToMany => "BelongsToMany",
            Self::HasOne => "HasOne",
            Self::HasMany => "HasMany",
            Self::HasOneOrMany => "HasOneOrMany",
            Self::HasOneThrough => "HasOneThrough",
            Self::HasManyThrough => "HasManyThrough",
            Self::MorphOne => "MorphOne",
            Self::MorphMany => "MorphMany",
            Self::MorphOneOrMany => "MorphOneOrMany",
            Self::MorphTo => "MorphTo",
            Self::MorphToMany => "MorphToMany",
        }
    }

    /// Parse a tag. Namespace-qualified names are accepted and reduced to
    /// their last identifier (`Relations\BelongsTo`, `relations::HasMany`).
    /// Unknown tags give `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let short = tag
            .rsplit(['\\', ':'])
            .next()
            .unwrap_or(tag)
            .trim();
        Self::ALL.into_iter().find(|t| t.as_str() == short)
    }

    /// Whether a relation of this type can point at more than one record.
    #[must_use]
    pub const fn allows_multiple(self) -> bool {
        matches!(
            self,
            Self::BelongsToMany
                | Self::HasMany
                | Self::HasManyThrough
                | Self::HasOneOrMany
                | Self::MorphMany
                | Self::MorphOneOrMany
                | Self::MorphToMany
        )
    }

    /// Whether a relation of this type goes through an intermediate table.
    #[must_use]
    pub const fn has_pivot(self) -> bool {
        matches!(
            self,
            Self::BelongsToMany | Self::HasManyThrough | Self::MorphToMany
        )
    }
}

impl TryFrom<String> for RelationType {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Self::from_tag(&tag).ok_or_else(|| format!("unknown relation type `{tag}`"))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a relation tag allows multiple related records. Unknown tags are `false`.
#[must_use]
pub fn has_multiple_related_records(tag: &str) -> bool {
    RelationType::from_tag(tag).is_some_and(RelationType::allows_multiple)
}

/// Whether a relation tag uses a pivot table. Unknown tags are `false`.
#[must_use]
pub fn uses_pivot_table(tag: &str) -> bool {
    RelationType::from_tag(tag).is_some_and(RelationType::has_pivot)
}

/// Everything a relation of a given kind needs to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// Foreign key lives on this model
    BelongsTo {
        foreign_key: String,
        owner_key: String,
    },
    /// Foreign key lives on the related model
    HasOne { foreign_key: String },
    HasMany { foreign_key: String },
    BelongsToMany { pivot_table: String },
    /// `through` is the class of the intermediate model
    HasOneThrough { through: String },
    HasManyThrough { through: String },
    /// `morph_name` prefixes the `{name}_id` / `{name}_type` column pair
    MorphOne { morph_name: String },
    MorphMany { morph_name: String },
    MorphTo { morph_name: String },
    MorphToMany {
        pivot_table: String,
        morph_name: String,
    },
}

impl RelationKind {
    #[must_use]
    pub const fn relation_type(&self) -> RelationType {
        match self {
            Self::BelongsTo { .. } => RelationType::BelongsTo,
            Self::HasOne { .. } => RelationType::HasOne,
            Self::HasMany { .. } => RelationType::HasMany,
            Self::BelongsToMany { .. } => RelationType::BelongsToMany,
            Self::HasOneThrough { .. } => RelationType::HasOneThrough,
            Self::HasManyThrough { .. } => RelationType::HasManyThrough,
            Self::MorphOne { .. } => RelationType::MorphOne,
            Self::MorphMany { .. } => RelationType::MorphMany,
            Self::MorphTo { .. } => RelationType::MorphTo,
            Self::MorphToMany { .. } => RelationType::MorphToMany,
        }
    }
}

/// One named relation from a model to a related model class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    name: String,
    related: String,
    kind: RelationKind,
}

impl Relation {
    pub fn new(name: impl Into<String>, related: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            name: name.into(),
            related: related.into(),
            kind,
        }
    }

    /// Accessor name used to read and write the relation on the model
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the model on the far side of this relation
    #[must_use]
    pub fn related(&self) -> &str {
        &self.related
    }

    #[must_use]
    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    #[must_use]
    pub const fn relation_type(&self) -> RelationType {
        self.kind.relation_type()
    }

    /// Foreign key column, only for key-bearing kinds
    #[must_use]
    pub fn foreign_key_name(&self) -> Option<&str> {
        match &self.kind {
            RelationKind::BelongsTo { foreign_key, .. }
            | RelationKind::HasOne { foreign_key }
            | RelationKind::HasMany { foreign_key } => Some(foreign_key),
            _ => None,
        }
    }

    #[must_use]
    pub fn pivot_table(&self) -> Option<&str> {
        match &self.kind {
            RelationKind::BelongsToMany { pivot_table }
            | RelationKind::MorphToMany { pivot_table, .. } => Some(pivot_table),
            RelationKind::HasManyThrough { through } => Some(through),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPLE: [&str; 7] = [
        "BelongsToMany",
        "HasMany",
        "HasManyThrough",
        "HasOneOrMany",
        "MorphMany",
        "MorphOneOrMany",
        "MorphToMany",
    ];

    #[test]
    fn test_has_multiple_related_records() {
        for tag in MULTIPLE {
            assert!(has_multiple_related_records(tag), "{tag} should allow multiple");
        }
        for tag in ["BelongsTo", "HasOne", "HasOneThrough", "MorphOne", "MorphTo"] {
            assert!(!has_multiple_related_records(tag), "{tag} should be single");
        }
    }

    #[test]
    fn test_uses_pivot_table() {
        let pivots: Vec<_> = RelationType::ALL
            .into_iter()
            .filter(|t| uses_pivot_table(t.as_str()))
            .collect();
        assert_eq!(
            pivots,
            vec![
                RelationType::BelongsToMany,
                RelationType::HasManyThrough,
                RelationType::MorphToMany
            ]
        );
    }

    #[test]
    fn test_unknown_tags_are_false() {
        for tag in ["", "Unknown", "belongsToMany", "HasManyish", "Many"] {
            assert!(!has_multiple_related_records(tag));
            assert!(!uses_pivot_table(tag));
        }
    }

    #[test]
    fn test_from_tag_strips_namespace() {
        assert_eq!(
            RelationType::from_tag("Illuminate\\Database\\Eloquent\\Relations\\BelongsTo"),
            Some(RelationType::BelongsTo)
        );
        assert_eq!(
            RelationType::from_tag("relations::MorphToMany"),
            Some(RelationType::MorphToMany)
        );
        assert_eq!(RelationType::from_tag("HasOne"), Some(RelationType::HasOne));
        assert_eq!(RelationType::from_tag("Nope"), None);
    }

    #[test]
    fn test_tag_round_trips_through_serde() {
        let json = serde_json::to_string(&RelationType::HasManyThrough).unwrap();
        assert_eq!(json, "\"HasManyThrough\"");
        let back: RelationType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RelationType::HasManyThrough);
    }

    #[test]
    fn test_foreign_key_only_for_key_bearing_kinds() {
        let author = Relation::new(
            "author",
            "users",
            RelationKind::BelongsTo {
                foreign_key: "author_id".into(),
                owner_key: "id".into(),
            },
        );
        assert_eq!(author.foreign_key_name(), Some("author_id"));
        assert_eq!(author.relation_type(), RelationType::BelongsTo);

        let tags = Relation::new(
            "tags",
            "tags",
            RelationKind::BelongsToMany {
                pivot_table: "article_tag".into(),
            },
        );
        assert_eq!(tags.foreign_key_name(), None);
        assert_eq!(tags.pivot_table(), Some("article_tag"));
    }
}
