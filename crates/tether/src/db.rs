mod builder;
pub use builder::Builder;

use crate::{Error, Id, Model, Record, Result, Value, ValueRecord};

use tether_core::{
    driver::{
        operation::{DeleteByKey, FindMany, FindOne, Insert, UpdateByKey},
        Driver, Operation, Response,
    },
    Schema,
};

use std::sync::Arc;

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,
    pub(crate) driver: Box<dyn Driver>,
}

/// A database handle.
///
/// Cloning is cheap; every clone shares the schema, including the association
/// registry, and the driver.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(schema: Arc<Schema>, driver: Box<dyn Driver>) -> Self {
        Self {
            shared: Arc::new(Shared { schema, driver }),
        }
    }

    /// Insert a new `M` built from `values`.
    pub async fn create<M: Model>(&self, values: impl Into<ValueRecord>) -> Result<M> {
        let mut model = M::new(values);
        self.save(&mut model).await?;
        Ok(model)
    }

    /// Insert a new model, or write every column of a persisted one.
    pub async fn save<M: Model>(&self, model: &mut M) -> Result<()> {
        self.save_record(model.record_mut()).await
    }

    pub async fn find<M: Model>(&self, id: Id) -> Result<Option<M>> {
        let record = self.find_one(M::NAME, Id::COLUMN, id.into()).await?;
        Ok(record.map(M::load))
    }

    /// Like [`Db::find`], failing when no row has the id.
    pub async fn get<M: Model>(&self, id: Id) -> Result<M> {
        match self.find::<M>(id).await? {
            Some(model) => Ok(model),
            None => Err(Error::record_not_found(format!(
                "`{}` with id {id}",
                M::NAME
            ))),
        }
    }

    /// Every `M` whose `column` equals `value`, in id order. A `Null` value
    /// matches null columns.
    pub async fn find_by<M: Model>(
        &self,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<M>> {
        let records = self.find_many(M::NAME, column, value.into()).await?;
        Ok(records.into_iter().map(M::load).collect())
    }

    /// Read the model's row again, discarding unsaved column changes.
    pub async fn reload<M: Model>(&self, model: &mut M) -> Result<()> {
        let record = model.record_mut();
        let id = record.expect_id("reload")?;

        let Some(row) = self.find_row(record.model(), Id::COLUMN, id.into()).await? else {
            return Err(Error::record_not_found(format!(
                "`{}` with id {id}",
                record.model()
            )));
        };

        record.refresh(row)
    }

    /// Delete the model's row.
    pub async fn destroy<M: Model>(&self, model: &mut M) -> Result<()> {
        self.delete_record(model.record()).await?;
        model.record_mut().mark_destroyed();
        Ok(())
    }

    /// Drops every row of every table.
    pub async fn reset_db(&self) -> Result<()> {
        self.shared.driver.reset_db().await
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    /// Execute a single driver operation.
    pub(crate) async fn exec(&self, op: Operation) -> Result<Response> {
        tracing::debug!(op = op.name(), table = op.table(), "exec");

        self.shared
            .driver
            .exec(op)
            .await
            .inspect_err(|err| tracing::debug!(%err, "driver operation failed"))
    }

    pub(crate) async fn save_record(&self, record: &mut Record) -> Result<()> {
        if record.is_destroyed() {
            return Err(Error::record_not_saved(format!(
                "`{}` {} was destroyed",
                record.model(),
                record.id().map(|id| id.to_string()).unwrap_or_default(),
            )));
        }

        if record.is_persisted() {
            return self.update_record(record, record.values().clone()).await;
        }

        let table = self.table(record.model())?;
        let row = self
            .exec(
                Insert {
                    table: table.to_string(),
                    values: record.values().clone(),
                }
                .into(),
            )
            .await?
            .into_first()?
            .ok_or_else(|| crate::err!("insert into `{table}` returned no row"))?;

        record.refresh(row)
    }

    /// Write `values` to the record's row.
    pub(crate) async fn update_record(&self, record: &Record, values: ValueRecord) -> Result<()> {
        let id = record.expect_id("update")?;
        let table = self.table(record.model())?;

        let count = self
            .exec(
                UpdateByKey {
                    table: table.to_string(),
                    id,
                    values,
                }
                .into(),
            )
            .await?
            .into_count()?;

        if count == 0 {
            return Err(Error::record_not_found(format!(
                "`{}` with id {id}",
                record.model()
            )));
        }

        Ok(())
    }

    pub(crate) async fn delete_record(&self, record: &Record) -> Result<()> {
        let id = record.expect_id("destroy")?;
        let table = self.table(record.model())?;

        self.exec(
            DeleteByKey {
                table: table.to_string(),
                id,
            }
            .into(),
        )
        .await?;

        Ok(())
    }

    pub(crate) async fn find_one(
        &self,
        model: &'static str,
        column: &str,
        value: Value,
    ) -> Result<Option<Record>> {
        self.find_row(model, column, value)
            .await?
            .map(|row| Record::from_row(model, row))
            .transpose()
    }

    pub(crate) async fn find_many(
        &self,
        model: &'static str,
        column: &str,
        value: Value,
    ) -> Result<Vec<Record>> {
        let table = self.table(model)?;

        self.exec(
            FindMany {
                table: table.to_string(),
                column: column.to_string(),
                value,
                order_by: Some(Id::COLUMN.to_string()),
            }
            .into(),
        )
        .await?
        .into_values()?
        .into_iter()
        .map(|row| Record::from_row(model, row))
        .collect()
    }

    async fn find_row(&self, model: &str, column: &str, value: Value) -> Result<Option<ValueRecord>> {
        let table = self.table(model)?;

        self.exec(
            FindOne {
                table: table.to_string(),
                column: column.to_string(),
                value,
            }
            .into(),
        )
        .await?
        .into_first()
    }

    /// Table storing `model`, failing for unregistered models.
    fn table(&self, model: &str) -> Result<&str> {
        Ok(&self.shared.schema.model(model)?.table)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.shared.schema)
            .field("driver", &self.shared.driver)
            .finish()
    }
}
