use crate::errors::PanelError;
use crate::field::{Field, fields_from_json, parse_relation_field_names_from_html};
use crate::relationships::Relationships;
use crate::schema::{ModelRegistry, ModelSchema};
use std::sync::Arc;

/// Fields of one administered model, together with the schemas needed to
/// introspect their relations.
///
/// The registry is shared between panels; a panel is cheap to build per request.
///
/// ```rust
/// use std::sync::Arc;
/// use crudpanel::{CrudPanel, Field, ModelRegistry, ModelSchema, RelationType, Relationships};
///
/// let registry = Arc::new(
///     ModelRegistry::new()
///         .with_model(ModelSchema::new("articles").belongs_to("author", "users", "author_id"))
///         .with_model(ModelSchema::new("users")),
/// );
///
/// let mut panel = CrudPanel::new(registry, "articles").unwrap();
/// panel.add_field(Field::new("author")).unwrap();
///
/// let author = &panel.fields()[0];
/// assert_eq!(author.relation_type, Some(RelationType::BelongsTo));
/// assert_eq!(author.model.as_deref(), Some("users"));
/// ```
#[derive(Debug, Clone)]
pub struct CrudPanel {
    registry: Arc<ModelRegistry>,
    root: ModelSchema,
    fields: Vec<Field>,
}

impl CrudPanel {
    /// Panel for the model registered as `model`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownModel`] when `model` is not in the registry.
    pub fn new(registry: Arc<ModelRegistry>, model: &str) -> Result<Self, PanelError> {
        let root = registry.model(model)?.clone();
        Ok(Self {
            registry,
            root,
            fields: Vec::new(),
        })
    }

    /// Replace the field list with `fields` exactly as declared.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Add a field, filling in its relationship attributes.
    ///
    /// # Errors
    ///
    /// Fails when the field's entity cannot be resolved, see
    /// [`Relationships::infer_relationship_attributes`].
    pub fn add_field(&mut self, field: Field) -> Result<&mut Self, PanelError> {
        let field = self.infer_relationship_attributes(&field)?;
        self.fields.push(field);
        Ok(self)
    }

    /// Add several fields in order.
    ///
    /// # Errors
    ///
    /// Stops at the first field that fails [`CrudPanel::add_field`].
    pub fn add_fields(
        &mut self,
        fields: impl IntoIterator<Item = Field>,
    ) -> Result<&mut Self, PanelError> {
        for field in fields {
            self.add_field(field)?;
        }
        Ok(self)
    }

    /// Add fields declared as a JSON array.
    ///
    /// # Errors
    ///
    /// [`PanelError::Config`] for invalid JSON, otherwise see [`CrudPanel::add_field`].
    pub fn add_fields_from_json(&mut self, json: &str) -> Result<&mut Self, PanelError> {
        let fields = fields_from_json(json)?;
        self.add_fields(fields)
    }

    /// Declared fields with bracketed relation names converted to dot notation,
    /// as they are matched against submitted data.
    #[must_use]
    pub fn all_field_names(&self) -> Vec<String> {
        parse_relation_field_names_from_html(&self.fields)
            .into_iter()
            .map(|field| field.name)
            .collect()
    }
}

impl Relationships for CrudPanel {
    fn model(&self) -> &ModelSchema {
        &self.root
    }

    fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }
}
