use crate::{stmt::Id, Error, Result};

/// The tables a driver is asked to manage.
#[derive(Debug, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
}

/// A database table. Every table has an implicit auto-incrementing integer
/// primary key column named `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// Columns other than the primary key
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The column type.
    pub ty: Type,

    /// When set, the column is a foreign key referencing the `id` column of
    /// the named table.
    pub references: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Bool,
    I64,
    String,
}

impl Schema {
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| Error::invalid_schema(format!("unknown table `{name}`")))
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns `true` if `name` is the primary key or one of the columns.
    pub fn has_column(&self, name: &str) -> bool {
        name == Id::COLUMN || self.column(name).is_some()
    }

    /// Fails with an invalid schema error naming the table if `name` is not
    /// a column of this table.
    pub fn expect_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(Error::invalid_schema(format!(
                "table `{}` has no column `{name}`",
                self.name
            )))
        }
    }

    /// Foreign key columns of this table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &str)> + '_ {
        self.columns
            .iter()
            .filter_map(|column| Some((column, column.references.as_deref()?)))
    }
}

impl Column {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            references: None,
        }
    }

    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.references = Some(table.into());
        self
    }
}
