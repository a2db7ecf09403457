use super::Value;
use crate::{Error, Result};

use std::fmt;

/// Primary key of a stored record.
///
/// Every table managed by Tether has an auto-incrementing integer `id`
/// column; foreign keys store the same integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(i64);

impl Id {
    /// Name of the primary key column in every table.
    pub const COLUMN: &'static str = "id";

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Reads an optional id from a column value. `Null` is `None`.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::I64(raw) => Ok(Some(Self(*raw))),
            other => Err(Error::type_conversion(other.clone(), "Id")),
        }
    }
}

impl From<i64> for Id {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<Id> for Value {
    fn from(value: Id) -> Self {
        Value::I64(value.0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
