mod association;
pub use association::{Association, AssociationKind, RemovalPolicy};

mod builder;
pub use builder::Builder;

pub mod db;

mod name;
pub use name::Name;

mod registry;
pub use registry::Registry;

use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Schema {
    /// Registered models, keyed by model name
    pub models: IndexMap<String, Model>,

    /// Database-level schema, handed to the driver
    pub db: Arc<db::Schema>,

    /// Association descriptors, keyed by owner model and association name
    pub registry: Registry,
}

/// A registered model and the table it is stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub table: String,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models
            .get(name)
            .ok_or_else(|| Error::invalid_schema(format!("model `{name}` is not registered")))
    }

    pub fn table_for(&self, model: &str) -> Result<&db::Table> {
        let model = self.model(model)?;
        self.db.table(&model.table)
    }

    /// Looks up the association `name` declared on `owner`.
    pub fn association(&self, owner: &str, name: &str) -> Result<&Arc<Association>> {
        self.registry.lookup(owner, name)
    }
}
