use super::{Name, RemovalPolicy};
use tether_core::schema::{Association, AssociationKind};

#[derive(Debug, Clone)]
pub enum Relation {
    BelongsTo(BelongsTo),
    HasMany(HasMany),
}

/// The declaring model holds a foreign key to one target row.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Accessor name
    pub name: String,

    /// Name of the target model
    pub target: &'static str,

    /// Table storing the target model
    pub target_table: &'static str,

    /// Explicit foreign key column. Defaults to `{name}_id`.
    pub foreign_key: Option<String>,
}

/// Rows of the target model hold a foreign key to the declaring model.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Accessor name
    pub name: String,

    /// Name of the target model
    pub target: &'static str,

    /// Table storing the target model
    pub target_table: &'static str,

    /// Explicit foreign key column in the target table. Defaults to the
    /// snake case owner name followed by `_id`.
    pub foreign_key: Option<String>,

    pub on_remove: RemovalPolicy,
}

impl Relation {
    pub fn name(&self) -> &str {
        match self {
            Self::BelongsTo(rel) => &rel.name,
            Self::HasMany(rel) => &rel.name,
        }
    }

    pub(crate) fn to_association(&self, owner: &str) -> Association {
        match self {
            Self::BelongsTo(rel) => Association {
                kind: AssociationKind::BelongsTo,
                name: rel.name.clone(),
                owner: owner.to_string(),
                target: rel.target.to_string(),
                target_table: rel.target_table.to_string(),
                foreign_key: rel.foreign_key_column(),
                on_remove: RemovalPolicy::default(),
            },
            Self::HasMany(rel) => Association {
                kind: AssociationKind::HasMany,
                name: rel.name.clone(),
                owner: owner.to_string(),
                target: rel.target.to_string(),
                target_table: rel.target_table.to_string(),
                foreign_key: rel.foreign_key_column(owner),
                on_remove: rel.on_remove,
            },
        }
    }
}

impl BelongsTo {
    pub fn new<T: crate::Model>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: T::NAME,
            target_table: T::TABLE,
            foreign_key: None,
        }
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub(crate) fn foreign_key_column(&self) -> String {
        self.foreign_key
            .clone()
            .unwrap_or_else(|| Name::new(&self.name).foreign_key())
    }
}

impl HasMany {
    pub fn new<T: crate::Model>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: T::NAME,
            target_table: T::TABLE,
            foreign_key: None,
            on_remove: RemovalPolicy::default(),
        }
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    /// What `clear` and `replace` do with rows leaving the collection.
    pub fn on_remove(mut self, policy: RemovalPolicy) -> Self {
        self.on_remove = policy;
        self
    }

    pub(crate) fn foreign_key_column(&self, owner: &str) -> String {
        self.foreign_key
            .clone()
            .unwrap_or_else(|| Name::new(owner).foreign_key())
    }
}

impl From<BelongsTo> for Relation {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}

impl From<HasMany> for Relation {
    fn from(value: HasMany) -> Self {
        Self::HasMany(value)
    }
}
