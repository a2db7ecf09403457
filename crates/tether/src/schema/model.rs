use super::{BelongsTo, HasMany, Relation, Type};

/// A model's declaration, as written by its [`Model::schema`] implementation.
///
/// This is resolved into the runtime schema when the database is built:
/// fields become table columns, belongs-to relations add their foreign key
/// column and every relation becomes an association descriptor.
///
/// [`Model::schema`]: crate::Model::schema
#[derive(Debug, Clone)]
pub struct Model {
    /// Name of the model
    pub name: &'static str,

    /// Table the model is stored in
    pub table: &'static str,

    /// Declared columns, excluding the primary key
    pub fields: Vec<Field>,

    /// Declared associations
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Model {
    pub fn new<M: crate::Model>() -> Self {
        Self {
            name: M::NAME,
            table: M::TABLE,
            fields: vec![],
            relations: vec![],
        }
    }

    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn belongs_to<T: crate::Model>(self, name: &str) -> Self {
        self.relation(BelongsTo::new::<T>(name))
    }

    pub fn has_many<T: crate::Model>(self, name: &str) -> Self {
        self.relation(HasMany::new::<T>(name))
    }

    /// Declare a configured relation.
    pub fn relation(mut self, relation: impl Into<Relation>) -> Self {
        self.relations.push(relation.into());
        self
    }
}
