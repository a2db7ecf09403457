use super::Db;
use crate::{driver::Connection, schema::Relation, Model, Result};

use tether_core::{
    driver::Driver,
    schema::{
        self,
        db::{Column, Table, Type},
        Schema,
    },
};

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Model declarations, resolved when the database is built
    models: Vec<crate::schema::Model>,
}

impl Builder {
    pub fn register<T: Model>(&mut self) -> &mut Self {
        self.models.push(T::schema());
        self
    }

    /// Resolve the registered declarations into tables and an association
    /// registry.
    pub fn build_schema(&self) -> Result<Schema> {
        let mut builder = Schema::builder();

        for model in &self.models {
            let mut table = Table::new(model.table);

            for field in &model.fields {
                table.columns.push(Column::new(&field.name, field.ty));
            }

            for relation in &model.relations {
                let association = relation.to_association(model.name);

                if let Relation::BelongsTo(_) = relation {
                    add_foreign_key(&mut table, &association.foreign_key, &association.target_table);
                }

                tracing::debug!(%association, foreign_key = %association.foreign_key, "registering association");
                builder.association(association);
            }

            builder.model(
                schema::Model {
                    name: model.name.to_string(),
                    table: model.table.to_string(),
                },
                table,
            );
        }

        builder.build()
    }

    /// Build a database using the built-in driver selected by `url`.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        let driver = Connection::connect(url)?;
        self.build(driver).await
    }

    pub async fn build(&mut self, mut driver: impl Driver) -> Result<Db> {
        let schema = Arc::new(self.build_schema()?);

        driver.register_schema(&schema.db).await?;

        tracing::debug!(
            models = schema.models.len(),
            associations = schema.registry.len(),
            "database built"
        );

        Ok(Db::new(schema, Box::new(driver)))
    }
}

/// Adds the belongs-to foreign key column, or marks an explicitly declared
/// column as referencing the target table.
fn add_foreign_key(table: &mut Table, column: &str, target_table: &str) {
    match table.columns.iter_mut().find(|c| c.name == column) {
        Some(existing) => {
            if existing.references.is_none() {
                existing.references = Some(target_table.to_string());
            }
        }
        None => table
            .columns
            .push(Column::new(column, Type::I64).references(target_table)),
    }
}
