//! Build [`ModelSchema`]s from Sea-ORM entities.
//!
//! Every variant of an entity's `Relation` enum becomes a relation named after
//! the variant in snake case (`Relation::MaintenanceRecords` ->
//! `maintenance_records`). Model classes are table names.
//!
//! | Sea-ORM declaration | Relation kind | Foreign key        |
//! |---------------------|---------------|--------------------|
//! | `belongs_to`        | `BelongsTo`   | `from` column      |
//! | `has_one`           | `HasOne`      | column on related  |
//! | `has_many`          | `HasMany`     | column on related  |
//!
//! Many-to-many relations go through `Related::via` in Sea-ORM and are not
//! visible on the `Relation` enum; declare them with
//! [`ModelSchema::belongs_to_many`].

use crate::relation::RelationKind;
use crate::schema::ModelSchema;
use heck::ToSnakeCase;
use sea_orm::sea_query::{Iden, TableRef};
use sea_orm::{EntityTrait, Identity, Iterable, RelationDef, RelationTrait, RelationType};

impl ModelSchema {
    /// Schema for a Sea-ORM entity, keyed by its table name.
    #[must_use]
    pub fn from_entity<E: EntityTrait>() -> Self {
        let class = E::default().table_name().to_string();
        let mut schema = Self::new(class);

        for relation in E::Relation::iter() {
            let name = format!("{relation:?}").to_snake_case();
            let def = relation.def();
            let related = table_name(&def.to_tbl);
            let kind = relation_kind(&def);
            tracing::trace!(
                model = %schema.class(),
                relation = %name,
                related = %related,
                kind = %kind.relation_type(),
                "Mapped Sea-ORM relation"
            );
            schema = schema.with_relation(name, related, kind);
        }

        schema
    }
}

/// Map a Sea-ORM relation definition onto a relation kind.
///
/// `belongs_to` definitions are the non-owning side of a `HasOne`.
#[must_use]
pub fn relation_kind(def: &RelationDef) -> RelationKind {
    match (&def.rel_type, def.is_owner) {
        (RelationType::HasOne, false) => RelationKind::BelongsTo {
            foreign_key: identity_name(&def.from_col),
            owner_key: identity_name(&def.to_col),
        },
        (RelationType::HasOne, true) => RelationKind::HasOne {
            foreign_key: identity_name(&def.to_col),
        },
        (RelationType::HasMany, _) => RelationKind::HasMany {
            foreign_key: identity_name(&def.to_col),
        },
    }
}

fn table_name(table: &TableRef) -> String {
    match table {
        TableRef::Table(iden)
        | TableRef::SchemaTable(_, iden)
        | TableRef::DatabaseSchemaTable(_, _, iden)
        | TableRef::TableAlias(iden, _)
        | TableRef::SchemaTableAlias(_, iden, _)
        | TableRef::DatabaseSchemaTableAlias(_, _, iden, _) => Iden::to_string(&**iden),
        other => {
            tracing::warn!(table = ?other, "Relation target is not a plain table");
            String::new()
        }
    }
}

/// Composite keys are joined with `,`.
fn identity_name(identity: &Identity) -> String {
    match identity {
        Identity::Unary(a) => Iden::to_string(&**a),
        Identity::Binary(a, b) => [a, b].map(|iden| Iden::to_string(&**iden)).join(","),
        Identity::Ternary(a, b, c) => [a, b, c].map(|iden| Iden::to_string(&**iden)).join(","),
        Identity::Many(idens) => idens
            .iter()
            .map(|iden| Iden::to_string(&**iden))
            .collect::<Vec<_>>()
            .join(","),
    }
}
