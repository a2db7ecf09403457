mod value;
pub(crate) use value::Value;

use rusqlite::Connection;
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tether_core::{
    async_trait,
    driver::{
        operation::{DeleteByKey, FindMany, FindOne, Insert, UpdateByKey},
        Driver, Operation, Response,
    },
    schema::db::{Schema, Table, Type},
    stmt::{self, Id, ValueRecord},
    Error, Result,
};
use url::Url;

/// SQLite driver. Foreign key constraints are enforced.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
    schema: Arc<Schema>,
}

impl Sqlite {
    /// Open a database from a `sqlite::memory:` or `sqlite:<path>` URL.
    pub fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| tether_core::err!("invalid connection URL; url={url}; {err}"))?;

        if url.scheme() != "sqlite" {
            return Err(tether_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            ));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::persistence_failure)?;
        Self::new(connection)
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).map_err(Error::persistence_failure)?;
        Self::new(connection)
    }

    fn new(connection: Connection) -> Result<Self> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Error::persistence_failure)?;

        Ok(Self {
            connection: Mutex::new(connection),
            schema: Arc::default(),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| tether_core::err!("sqlite connection lock poisoned"))
    }
}

#[async_trait]
impl Driver for Sqlite {
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> Result<()> {
        self.schema = schema.clone();

        let connection = self.connection()?;
        for table in &schema.tables {
            connection
                .execute(&create_table(table), [])
                .map_err(Error::persistence_failure)?;
        }

        Ok(())
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let connection = self.connection()?;

        match op {
            Operation::FindOne(op) => self.find_one(&connection, op),
            Operation::FindMany(op) => self.find_many(&connection, op),
            Operation::Insert(op) => self.insert(&connection, op),
            Operation::UpdateByKey(op) => self.update_by_key(&connection, op),
            Operation::DeleteByKey(op) => self.delete_by_key(&connection, op),
        }
    }

    async fn reset_db(&self) -> Result<()> {
        let connection = self.connection()?;

        let mut sql = String::from("PRAGMA foreign_keys = OFF;\n");
        for table in &self.schema.tables {
            sql.push_str(&format!("DROP TABLE IF EXISTS {};\n", ident(&table.name)));
            sql.push_str(&create_table(table));
            sql.push_str(";\n");
        }
        sql.push_str("PRAGMA foreign_keys = ON;");

        connection
            .execute_batch(&sql)
            .map_err(Error::persistence_failure)
    }
}

impl Sqlite {
    fn find_one(&self, connection: &Connection, op: FindOne) -> Result<Response> {
        let table = self.schema.table(&op.table)?;
        table.expect_column(&op.column)?;

        let sql = format!(
            "{} WHERE {} IS ?1 ORDER BY {} LIMIT 1",
            select(table),
            ident(&op.column),
            ident(Id::COLUMN)
        );
        let rows = query(connection, table, &sql, vec![op.value.into()])?;
        Ok(Response::values(rows))
    }

    fn find_many(&self, connection: &Connection, op: FindMany) -> Result<Response> {
        let table = self.schema.table(&op.table)?;
        table.expect_column(&op.column)?;

        let mut sql = format!("{} WHERE {} IS ?1", select(table), ident(&op.column));
        if let Some(order_by) = &op.order_by {
            table.expect_column(order_by)?;
            sql.push_str(&format!(" ORDER BY {}", ident(order_by)));
        }

        let rows = query(connection, table, &sql, vec![op.value.into()])?;
        Ok(Response::values(rows))
    }

    fn insert(&self, connection: &Connection, op: Insert) -> Result<Response> {
        let table = self.schema.table(&op.table)?;

        if op.values.contains(Id::COLUMN) {
            return Err(Error::invalid_schema(format!(
                "insert into `{}` must not assign `{}`",
                op.table,
                Id::COLUMN
            )));
        }

        let mut columns = vec![];
        let mut params = vec![];
        for (column, value) in op.values {
            table.expect_column(&column)?;
            columns.push(ident(&column));
            params.push(Value::from(value));
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", ident(&table.name))
        } else {
            let placeholders: Vec<_> = (1..=params.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                ident(&table.name),
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        connection
            .execute(&sql, rusqlite::params_from_iter(params.iter()))
            .map_err(Error::persistence_failure)?;

        let id = connection.last_insert_rowid();
        tracing::trace!(table = %table.name, id, "sqlite insert");

        let sql = format!("{} WHERE {} = ?1", select(table), ident(Id::COLUMN));
        let rows = query(connection, table, &sql, vec![stmt::Value::I64(id).into()])?;
        Ok(Response::values(rows))
    }

    fn update_by_key(&self, connection: &Connection, op: UpdateByKey) -> Result<Response> {
        let table = self.schema.table(&op.table)?;

        if op.values.is_empty() {
            let sql = format!("{} WHERE {} = ?1", select(table), ident(Id::COLUMN));
            let rows = query(connection, table, &sql, vec![stmt::Value::from(op.id).into()])?;
            return Ok(Response::count(rows.len() as u64));
        }

        let mut assignments = vec![];
        let mut params = vec![];
        for (column, value) in op.values {
            if column == Id::COLUMN {
                return Err(Error::invalid_schema(format!(
                    "update of `{}` must not assign `{}`",
                    op.table,
                    Id::COLUMN
                )));
            }
            table.expect_column(&column)?;
            params.push(Value::from(value));
            assignments.push(format!("{} = ?{}", ident(&column), params.len()));
        }
        params.push(stmt::Value::from(op.id).into());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            ident(&table.name),
            assignments.join(", "),
            ident(Id::COLUMN),
            params.len()
        );

        let count = connection
            .execute(&sql, rusqlite::params_from_iter(params.iter()))
            .map_err(Error::persistence_failure)?;
        Ok(Response::count(count as u64))
    }

    fn delete_by_key(&self, connection: &Connection, op: DeleteByKey) -> Result<Response> {
        let table = self.schema.table(&op.table)?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            ident(&table.name),
            ident(Id::COLUMN)
        );
        let count = connection
            .execute(&sql, [Value::from(stmt::Value::from(op.id))])
            .map_err(Error::persistence_failure)?;
        Ok(Response::count(count as u64))
    }
}

fn query(
    connection: &Connection,
    table: &Table,
    sql: &str,
    params: Vec<Value>,
) -> Result<Vec<ValueRecord>> {
    let mut stmt = connection
        .prepare_cached(sql)
        .map_err(Error::persistence_failure)?;
    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter()))
        .map_err(Error::persistence_failure)?;

    let mut ret = vec![];

    while let Some(row) = rows.next().map_err(Error::persistence_failure)? {
        let mut record = ValueRecord::new();
        record.set(Id::COLUMN, Value::from_sql(row, 0, Type::I64)?.into_inner());

        for (index, column) in table.columns.iter().enumerate() {
            let value = Value::from_sql(row, index + 1, column.ty)?;
            record.set(column.name.clone(), value.into_inner());
        }

        ret.push(record);
    }

    Ok(ret)
}

fn select(table: &Table) -> String {
    let mut columns = vec![ident(Id::COLUMN)];
    columns.extend(table.columns.iter().map(|column| ident(&column.name)));
    format!("SELECT {} FROM {}", columns.join(", "), ident(&table.name))
}

fn create_table(table: &Table) -> String {
    let mut columns = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        ident(Id::COLUMN)
    )];

    for column in &table.columns {
        let ty = match column.ty {
            Type::Bool => "BOOLEAN",
            Type::I64 => "INTEGER",
            Type::String => "TEXT",
        };

        let mut def = format!("{} {ty}", ident(&column.name));
        if let Some(target) = &column.references {
            def.push_str(&format!(
                " REFERENCES {}({})",
                ident(target),
                ident(Id::COLUMN)
            ));
        }
        columns.push(def);
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        ident(&table.name),
        columns.join(", ")
    )
}

fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
