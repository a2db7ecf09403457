use tether_core::{
    async_trait,
    driver::{
        operation::{DeleteByKey, FindMany, FindOne, Insert, UpdateByKey},
        Driver, Operation, Response,
    },
    schema::db::{Schema, Table},
    stmt::{Id, Value, ValueRecord},
    Error, Result,
};

use indexmap::IndexMap;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

/// Driver keeping every table in process memory.
///
/// Rows are kept in primary key order, which is also insertion order.
/// Foreign key columns are checked on every write the way SQLite checks them
/// with `PRAGMA foreign_keys = ON`.
#[derive(Debug, Default)]
pub struct Memory {
    store: Mutex<Store>,
}

#[derive(Debug, Default)]
struct Store {
    schema: Arc<Schema>,
    tables: IndexMap<String, TableData>,
}

#[derive(Debug, Default)]
struct TableData {
    rows: BTreeMap<Id, ValueRecord>,
    next_id: i64,
}

/// A write rejected by a foreign key constraint.
#[derive(Debug)]
pub struct ConstraintViolation {
    message: String,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| tether_core::err!("memory driver store lock poisoned"))
    }
}

#[async_trait]
impl Driver for Memory {
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> Result<()> {
        let mut store = self.store()?;
        store.schema = schema.clone();

        for table in &schema.tables {
            store.tables.entry(table.name.clone()).or_default();
        }

        Ok(())
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut store = self.store()?;

        match op {
            Operation::FindOne(op) => store.find_one(op),
            Operation::FindMany(op) => store.find_many(op),
            Operation::Insert(op) => store.insert(op),
            Operation::UpdateByKey(op) => store.update_by_key(op),
            Operation::DeleteByKey(op) => store.delete_by_key(op),
        }
    }

    async fn reset_db(&self) -> Result<()> {
        let mut store = self.store()?;

        for data in store.tables.values_mut() {
            *data = TableData::default();
        }

        Ok(())
    }
}

impl Store {
    fn table(&self, name: &str) -> Result<&Table> {
        self.schema.table(name)
    }

    fn rows(&self, table: &str) -> Result<&BTreeMap<Id, ValueRecord>> {
        self.tables
            .get(table)
            .map(|data| &data.rows)
            .ok_or_else(|| Error::invalid_schema(format!("unknown table `{table}`")))
    }

    fn data_mut(&mut self, table: &str) -> Result<&mut TableData> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| Error::invalid_schema(format!("unknown table `{table}`")))
    }

    fn find_one(&self, op: FindOne) -> Result<Response> {
        self.table(&op.table)?.expect_column(&op.column)?;

        let row = self
            .rows(&op.table)?
            .values()
            .find(|row| row.get(&op.column) == &op.value)
            .cloned();

        Ok(Response::values(row.into_iter().collect()))
    }

    fn find_many(&self, op: FindMany) -> Result<Response> {
        let table = self.table(&op.table)?;
        table.expect_column(&op.column)?;

        let mut rows: Vec<_> = self
            .rows(&op.table)?
            .values()
            .filter(|row| row.get(&op.column) == &op.value)
            .cloned()
            .collect();

        if let Some(order_by) = &op.order_by {
            table.expect_column(order_by)?;
            rows.sort_by(|a, b| compare(a.get(order_by), b.get(order_by)));
        }

        Ok(Response::values(rows))
    }

    fn insert(&mut self, op: Insert) -> Result<Response> {
        let table = self.table(&op.table)?.clone();

        if op.values.contains(Id::COLUMN) {
            return Err(Error::invalid_schema(format!(
                "insert into `{}` must not assign `{}`",
                op.table,
                Id::COLUMN
            )));
        }

        for column in op.values.columns() {
            table.expect_column(column)?;
        }

        self.check_references(&table, &op.values)?;

        let data = self.data_mut(&op.table)?;
        data.next_id += 1;
        let id = Id::new(data.next_id);

        let mut row = ValueRecord::new();
        row.set(Id::COLUMN, id);
        for column in &table.columns {
            row.set(column.name.clone(), op.values.get(&column.name).clone());
        }

        data.rows.insert(id, row.clone());
        tracing::trace!(table = %op.table, %id, "memory insert");

        Ok(Response::values(vec![row]))
    }

    fn update_by_key(&mut self, op: UpdateByKey) -> Result<Response> {
        let table = self.table(&op.table)?.clone();

        for column in op.values.columns() {
            if column == Id::COLUMN {
                return Err(Error::invalid_schema(format!(
                    "update of `{}` must not assign `{}`",
                    op.table,
                    Id::COLUMN
                )));
            }
            table.expect_column(column)?;
        }

        self.check_references(&table, &op.values)?;

        let data = self.data_mut(&op.table)?;
        let Some(row) = data.rows.get_mut(&op.id) else {
            return Ok(Response::count(0));
        };

        for (column, value) in op.values {
            row.set(column, value);
        }

        Ok(Response::count(1))
    }

    fn delete_by_key(&mut self, op: DeleteByKey) -> Result<Response> {
        self.table(&op.table)?;

        if !self.rows(&op.table)?.contains_key(&op.id) {
            return Ok(Response::count(0));
        }

        // Refuse to orphan rows that still reference this one.
        for child in &self.schema.tables {
            for (column, references) in child.foreign_keys() {
                if references != op.table {
                    continue;
                }

                let referenced = self
                    .rows(&child.name)?
                    .values()
                    .any(|row| row.get(&column.name) == &Value::from(op.id));

                if referenced {
                    return Err(ConstraintViolation::new(format!(
                        "FOREIGN KEY constraint failed: `{}.{}` references `{}` {}",
                        child.name, column.name, op.table, op.id
                    ))
                    .into());
                }
            }
        }

        self.data_mut(&op.table)?.rows.remove(&op.id);
        Ok(Response::count(1))
    }

    fn check_references(&self, table: &Table, values: &ValueRecord) -> Result<()> {
        for (column, references) in table.foreign_keys() {
            let Some(id) = Id::from_value(values.get(&column.name))? else {
                continue;
            };

            if !self.rows(references)?.contains_key(&id) {
                return Err(ConstraintViolation::new(format!(
                    "FOREIGN KEY constraint failed: `{}.{}` = {} has no row in `{}`",
                    table.name, column.name, id, references
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::I64(a), Value::I64(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (a, b) => a.type_name().cmp(b.type_name()),
    }
}

impl ConstraintViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl std::error::Error for ConstraintViolation {}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<ConstraintViolation> for Error {
    fn from(value: ConstraintViolation) -> Self {
        Error::persistence_failure(value)
    }
}
