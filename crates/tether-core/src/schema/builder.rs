use super::{db, Association, Model, Registry, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Collects models, tables and association descriptors, then validates them
/// into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<Model>,
    tables: Vec<db::Table>,
    associations: Vec<Association>,
}

impl Builder {
    pub fn model(&mut self, model: Model, table: db::Table) -> &mut Self {
        self.models.push(model);
        self.tables.push(table);
        self
    }

    pub fn association(&mut self, association: Association) -> &mut Self {
        self.associations.push(association);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut models = IndexMap::new();

        for model in self.models {
            if model.table.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` has no table name",
                    model.name
                )));
            }

            if models.values().any(|m: &Model| m.table == model.table) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is mapped by more than one model",
                    model.table
                )));
            }

            if models.insert(model.name.clone(), model.clone()).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` registered twice",
                    model.name
                )));
            }
        }

        let mut registry = Registry::new();

        for association in self.associations {
            verify_association(&models, &association)?;
            registry.register(association)?;
        }

        Ok(Schema {
            models,
            db: Arc::new(db::Schema {
                tables: self.tables,
            }),
            registry,
        })
    }
}

fn verify_association(models: &IndexMap<String, Model>, association: &Association) -> Result<()> {
    if !models.contains_key(&association.owner) {
        return Err(Error::invalid_schema(format!(
            "association `{}` declared on unregistered model `{}`",
            association.name, association.owner
        )));
    }

    let Some(target) = models.get(&association.target) else {
        return Err(Error::invalid_schema(format!(
            "association `{association}` targets unregistered model `{}`",
            association.target
        )));
    };

    if target.table != association.target_table {
        return Err(Error::invalid_schema(format!(
            "association `{association}` expects table `{}` but `{}` is stored in `{}`",
            association.target_table, target.name, target.table
        )));
    }

    if association.foreign_key.is_empty() {
        return Err(Error::invalid_schema(format!(
            "association `{association}` has an empty foreign key"
        )));
    }

    // Foreign key columns are not checked here; drivers reject queries naming
    // an absent column.
    Ok(())
}
