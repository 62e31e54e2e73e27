//! # Relationship Introspection
//!
//! The [`Relationships`] trait answers relationship questions about the fields
//! of a CRUD panel: which relation a field points at, what type it is, which
//! model sits on the other side, and how submitted form data must be rewritten
//! before it can be persisted.
//!
//! Implementors only supply the root model schema, the registry used to step
//! from one model to the next, and the declared fields. Every operation is a
//! provided method that returns new values and leaves the panel untouched.
//!
//! ## Entity paths
//!
//! A field's `entity` is a dotted path walked from the root model:
//! `author.profile.bio` follows `author` to the author's model, `profile` to
//! the profile model, and ends at `bio`, which may be a relation or a plain
//! attribute. [`Relationships::only_relation_entity`] drops a trailing
//! attribute so that [`Relationships::resolve_relation`] only ever sees
//! relation segments.

use crate::errors::PanelError;
use crate::field::Field;
use crate::path::{EntityPath, square_brackets_to_dots};
use crate::relation::{Relation, RelationType};
use crate::schema::{ModelRegistry, ModelSchema};
use serde_json::{Map, Value};

pub trait Relationships {
    /// Schema of the model being administered
    fn model(&self) -> &ModelSchema;

    /// Schemas used to step from one related model to the next
    fn registry(&self) -> &ModelRegistry;

    /// Declared fields, in declaration order
    fn fields(&self) -> &[Field];

    /// Walk `entity` from the root model and return the relation named by its
    /// last segment.
    ///
    /// Every segment must name a relation on the model reached so far. Only
    /// the tail relation is returned; `a.b.c` yields `c` as declared on the
    /// model `b` points at.
    ///
    /// Returns `Ok(None)` when the first segment is not a relation of the
    /// root model: the field is a plain column, not a relation field.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidPath`] for a malformed path
    /// - [`PanelError::UnknownRelation`] when a later segment is not a relation
    /// - [`PanelError::UnknownModel`] when an intermediate model is not registered
    fn resolve_relation(&self, entity: &str) -> Result<Option<Relation>, PanelError> {
        let path = EntityPath::parse(entity)?;

        if !self.model().has_relation(path.first()) {
            tracing::debug!(entity = %path, model = %self.model().class(), "Entity is not a relation");
            return Ok(None);
        }

        let mut model = self.model();
        let mut relation: Option<&Relation> = None;

        for segment in path.segments() {
            if let Some(previous) = relation {
                model = self.registry().model(previous.related())?;
            }
            relation = Some(
                model
                    .relation(segment)
                    .ok_or_else(|| PanelError::unknown_relation(model.class(), segment))?,
            );
        }

        if let Some(relation) = relation {
            tracing::trace!(
                entity = %path,
                relation = %relation.name(),
                related = %relation.related(),
                "Resolved relation"
            );
        }

        Ok(relation.cloned())
    }

    /// The relation behind a field, after trimming a trailing attribute from
    /// its entity.
    ///
    /// # Errors
    ///
    /// See [`Relationships::resolve_relation`].
    fn relation_instance(&self, field: &Field) -> Result<Option<Relation>, PanelError> {
        let entity = self.only_relation_entity(field)?;
        self.resolve_relation(&entity)
    }

    /// Class of the model the field's relation points at.
    ///
    /// The walk in [`Relationships::resolve_relation`] has already moved onto
    /// the related model of every hop, so this is the related class of the
    /// tail relation.
    ///
    /// # Errors
    ///
    /// See [`Relationships::resolve_relation`].
    fn infer_field_model_from_relationship(
        &self,
        field: &Field,
    ) -> Result<Option<String>, PanelError> {
        Ok(self
            .relation_instance(field)?
            .map(|relation| relation.related().to_string()))
    }

    /// Relation type of the field: `BelongsTo`, `HasOne` ...
    ///
    /// # Errors
    ///
    /// See [`Relationships::resolve_relation`].
    fn infer_relation_type_from_relationship(
        &self,
        field: &Field,
    ) -> Result<Option<RelationType>, PanelError> {
        Ok(self
            .relation_instance(field)?
            .map(|relation| relation.relation_type()))
    }

    /// Model reached by walking `entity` minus its last `drop_last` segments.
    ///
    /// Segments that are not relations leave the walk on the current model.
    ///
    /// # Errors
    ///
    /// [`PanelError::InvalidPath`] for a malformed path, or
    /// [`PanelError::UnknownModel`] when a relation points at an unregistered model.
    fn relation_model(&self, entity: &str, drop_last: usize) -> Result<&ModelSchema, PanelError> {
        let path = EntityPath::parse(entity)?;
        let take = path.len().saturating_sub(drop_last);

        let mut model = self.model();
        for segment in &path.segments()[..take] {
            if let Some(relation) = model.relation(segment) {
                model = self.registry().model(relation.related())?;
            }
        }

        Ok(model)
    }

    /// The field's entity reduced to its deepest relation path.
    ///
    /// `author.name` becomes `author` when `name` is a plain attribute of the
    /// author model, and stays `author.profile` when `profile` is a relation of it.
    ///
    /// # Errors
    ///
    /// See [`Relationships::relation_model`].
    fn only_relation_entity(&self, field: &Field) -> Result<String, PanelError> {
        let entity = field_entity(field);
        let path = EntityPath::parse(&entity)?;
        let model = self.relation_model(&entity, 1)?;

        if model.has_relation(path.last()) {
            return Ok(path.to_string());
        }

        Ok(path.parent().unwrap_or(path).to_string())
    }

    /// Fields that declare a related model
    fn relation_fields(&self) -> Vec<Field> {
        self.fields()
            .iter()
            .filter(|field| field.is_relation_field())
            .cloned()
            .collect()
    }

    /// Relation fields of the given types. Only direct relations are returned:
    /// a nested field (`tags.extra`) is kept only when its declared model is the
    /// model its first segment leads to.
    fn fields_with_relation_types(&self, relation_types: &[RelationType]) -> Vec<Field> {
        self.fields()
            .iter()
            .filter(|field| field.is_relation_field())
            .filter(|field| {
                field
                    .relation_type
                    .is_some_and(|relation_type| relation_types.contains(&relation_type))
            })
            .filter(|field| declares_direct_relation_model(self.model(), field))
            .cloned()
            .collect()
    }

    /// Relation fields whose type is not one of `relation_types`.
    ///
    /// With `include_nested`, fields of an excluded type are still kept when
    /// their name is nested (`photos.caption`), so the sub-fields of an
    /// excluded relation survive.
    fn relation_fields_without_relation_types(
        &self,
        relation_types: &[RelationType],
        include_nested: bool,
    ) -> Vec<Field> {
        self.relation_fields()
            .into_iter()
            .filter(|field| match field.relation_type {
                Some(relation_type) if relation_types.contains(&relation_type) => {
                    include_nested && field.is_nested()
                }
                _ => true,
            })
            .collect()
    }

    /// Move submitted `BelongsTo` values from the relation name to the foreign key column.
    ///
    /// `{"author": 5}` becomes `{"author_id": 5}`. Fields are processed in
    /// declaration order; when two relations share a foreign key, the last
    /// declared one wins.
    ///
    /// # Errors
    ///
    /// See [`Relationships::resolve_relation`].
    fn belongs_to_names_to_foreign_keys(
        &self,
        mut data: Map<String, Value>,
    ) -> Result<Map<String, Value>, PanelError> {
        for field in self.fields_with_relation_types(&[RelationType::BelongsTo]) {
            let Some(relation) = self.relation_instance(&field)? else {
                continue;
            };
            let Some(foreign_key) = relation.foreign_key_name() else {
                continue;
            };

            if let Some(value) = data.remove(relation.name()) {
                tracing::trace!(
                    relation = %relation.name(),
                    foreign_key = %foreign_key,
                    "Renaming submitted relation to foreign key"
                );
                data.insert(foreign_key.to_string(), value);
            }
        }

        Ok(data)
    }

    /// Relation fields that explicitly declare `pivot: true`
    fn relation_fields_with_pivot(&self) -> Vec<Field> {
        self.relation_fields()
            .into_iter()
            .filter(|field| field.pivot == Some(true))
            .collect()
    }

    /// Relation fields that explicitly declare `pivot: false`
    fn relation_fields_without_pivot(&self) -> Vec<Field> {
        self.relation_fields()
            .into_iter()
            .filter(|field| field.pivot == Some(false))
            .collect()
    }

    /// Complete a field declaration from the relation it points at.
    ///
    /// Missing `entity`, `model`, `relation_type`, `multiple` and `pivot` keys
    /// are filled in; declared values are kept. The entity is guessed from the
    /// field name: `author` or `author[profile]` when the first segment is a
    /// relation, `author` for a `BelongsTo` submitted as `author_id`. Fields
    /// that do not point at a relation come back unchanged.
    ///
    /// # Errors
    ///
    /// See [`Relationships::resolve_relation`].
    fn infer_relationship_attributes(&self, field: &Field) -> Result<Field, PanelError> {
        let mut field = field.clone();

        if field.entity.is_none() {
            match guess_entity(self.model(), &field.name) {
                Some(entity) => field.entity = Some(entity),
                None => return Ok(field),
            }
        }

        let Some(relation) = self.relation_instance(&field)? else {
            return Ok(field);
        };
        let relation_type = relation.relation_type();

        field.model.get_or_insert_with(|| relation.related().to_string());
        field.relation_type.get_or_insert(relation_type);
        field.multiple.get_or_insert(relation_type.allows_multiple());
        field.pivot.get_or_insert(relation_type.has_pivot());

        tracing::debug!(
            field = %field.name,
            relation = %relation.name(),
            relation_type = %relation_type,
            "Inferred relationship attributes"
        );

        Ok(field)
    }
}

/// The dotted path a field points at: its `entity`, or its name when no
/// entity is declared.
fn field_entity(field: &Field) -> String {
    field
        .entity
        .clone()
        .unwrap_or_else(|| square_brackets_to_dots(&field.name))
}

/// A nested entity only counts as a direct relation field when its declared
/// model is the one its first segment leads to.
fn declares_direct_relation_model(root: &ModelSchema, field: &Field) -> bool {
    let entity = field_entity(field);
    let Some((first, _)) = entity.split_once('.') else {
        return true;
    };

    root.relation(first)
        .is_some_and(|relation| field.model.as_deref() == Some(relation.related()))
}

fn guess_entity(root: &ModelSchema, name: &str) -> Option<String> {
    let dotted = square_brackets_to_dots(name);
    let first = dotted.split('.').next().unwrap_or_default();
    if root.has_relation(first) {
        return Some(dotted);
    }

    let relation_name = name.strip_suffix("_id")?;
    root.relation(relation_name)
        .filter(|relation| relation.relation_type() == RelationType::BelongsTo)
        .map(|relation| relation.name().to_string())
}
