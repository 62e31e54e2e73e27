use crate::errors::PanelError;
use crate::path::{contains_brackets, square_brackets_to_dots};
use crate::relation::RelationType;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

/// A declared form field.
///
/// Fields are usually loaded from configuration:
///
/// ```json
/// [
///   {"name": "title", "type": "text"},
///   {"name": "author", "entity": "author", "model": "users", "relation_type": "BelongsTo"},
///   {"name": "tags", "entity": "tags.name", "model": "tags", "relation_type": "BelongsToMany", "pivot": true}
/// ]
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Field {
    /// HTML input name; may be bracketed (`author[profile][bio]`) or dotted
    pub name: String,
    pub label: Option<String>,
    /// Field type used by the view layer (`select`, `text`, ...)
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// Dotted relation path, e.g. `tags.name`
    pub entity: Option<String>,
    /// Attribute of the related model shown to the user
    pub attribute: Option<String>,
    /// Class of the related model
    pub model: Option<String>,
    pub relation_type: Option<RelationType>,
    /// Whether the field holds more than one related record
    pub multiple: Option<bool>,
    /// Whether the relation goes through a pivot table
    pub pivot: Option<bool>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn relation_type(mut self, relation_type: RelationType) -> Self {
        self.relation_type = Some(relation_type);
        self
    }

    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = Some(multiple);
        self
    }

    #[must_use]
    pub fn pivot(mut self, pivot: bool) -> Self {
        self.pivot = Some(pivot);
        self
    }

    /// A field takes part in relationship handling once it declares a related model.
    #[must_use]
    pub fn is_relation_field(&self) -> bool {
        self.model.as_deref().is_some_and(|model| !model.is_empty())
    }

    /// Whether the field's `name` addresses something below a relation (`photos.caption`).
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.name.contains('.')
    }
}

/// Load a declared field list from JSON.
///
/// # Errors
///
/// Returns [`PanelError::Config`] when the JSON is not an array of fields.
pub fn fields_from_json(json: &str) -> Result<Vec<Field>, PanelError> {
    let fields: Vec<Field> = serde_json::from_str(json)?;
    tracing::debug!(count = fields.len(), "Loaded field declarations");
    Ok(fields)
}

/// Turn bracketed HTML input names of relation fields back into dot notation.
///
/// Only fields with a `relation_type` whose `name` contains `[` or `]` are
/// rewritten: `parent[child][grandchild]` becomes `parent.child.grandchild`.
/// Everything else is returned as declared.
#[must_use]
pub fn parse_relation_field_names_from_html(fields: &[Field]) -> Vec<Field> {
    fields
        .iter()
        .map(|field| {
            if field.relation_type.is_some() && contains_brackets(&field.name) {
                Field {
                    name: square_brackets_to_dots(&field.name),
                    ..field.clone()
                }
            } else {
                field.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_from_json() {
        let json = r#"[
            {"name": "title", "type": "text", "label": "Title"},
            {"name": "author", "entity": "author", "model": "users", "relation_type": "BelongsTo"},
            {"name": "tags", "entity": "tags.name", "model": "tags", "relation_type": "BelongsToMany", "pivot": true}
        ]"#;

        let fields = fields_from_json(json).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type.as_deref(), Some("text"));
        assert!(!fields[0].is_relation_field());
        assert_eq!(fields[1].relation_type, Some(RelationType::BelongsTo));
        assert!(fields[1].is_relation_field());
        assert_eq!(fields[2].pivot, Some(true));
    }

    #[test]
    fn test_fields_from_json_accepts_qualified_relation_types() {
        let json = r#"[
            {"name": "author", "model": "users", "relation_type": "Illuminate\\Database\\Eloquent\\Relations\\BelongsTo"},
            {"name": "tags", "model": "tags", "relation_type": "relations::BelongsToMany"}
        ]"#;

        let fields = fields_from_json(json).unwrap();
        assert_eq!(fields[0].relation_type, Some(RelationType::BelongsTo));
        assert_eq!(fields[1].relation_type, Some(RelationType::BelongsToMany));

        // Serializes back to the short tag
        let json = serde_json::to_value(&fields[0]).unwrap();
        assert_eq!(json["relation_type"], "BelongsTo");
    }

    #[test]
    fn test_fields_from_json_rejects_unknown_relation_type() {
        let err = fields_from_json(r#"[{"name": "author", "relation_type": "HasSome"}]"#).unwrap_err();
        match err {
            PanelError::Config { internal: Some(details), .. } => {
                assert!(details.contains("unknown relation type `HasSome`"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_fields_from_json_rejects_garbage() {
        let err = fields_from_json(r#"{"name": "not a list"}"#).unwrap_err();
        assert!(matches!(err, PanelError::Config { .. }));
    }

    #[test]
    fn test_serialization_skips_unset_keys() {
        let field = Field::new("author").model("users");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json, serde_json::json!({"name": "author", "model": "users"}));
    }

    #[test]
    fn test_parse_relation_field_names_from_html() {
        let fields = vec![
            Field::new("parent[child][grandchild]").relation_type(RelationType::HasOne),
            Field::new("tags[]").relation_type(RelationType::BelongsToMany),
            Field::new("options[color]"),
            Field::new("author").relation_type(RelationType::BelongsTo),
        ];

        let parsed = parse_relation_field_names_from_html(&fields);
        assert_eq!(parsed[0].name, "parent.child.grandchild");
        assert_eq!(parsed[1].name, "tags");
        // No relation type, left alone
        assert_eq!(parsed[2].name, "options[color]");
        assert_eq!(parsed[3].name, "author");
        // Input untouched
        assert_eq!(fields[0].name, "parent[child][grandchild]");
    }

    #[test]
    fn test_empty_model_is_not_a_relation_field() {
        assert!(!Field::new("x").model("").is_relation_field());
    }
}
