use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};
use tether_core::{
    schema::db::Type,
    stmt::{self, Value as CoreValue},
    Error, Result,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Tether value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a Tether value of the column
    /// type.
    pub fn from_sql(row: &Row, index: usize, ty: Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::persistence_failure)?;

        let core_value = match value {
            SqlValue::Null => stmt::Value::Null,
            SqlValue::Integer(value) => match ty {
                Type::Bool => stmt::Value::Bool(value != 0),
                Type::I64 => stmt::Value::I64(value),
                Type::String => {
                    return Err(Error::type_conversion(stmt::Value::I64(value), "String"))
                }
            },
            SqlValue::Text(value) => match ty {
                Type::String => stmt::Value::String(value),
                Type::Bool => return Err(Error::type_conversion(value.into(), "bool")),
                Type::I64 => return Err(Error::type_conversion(value.into(), "i64")),
            },
            SqlValue::Real(value) => {
                return Err(tether_core::err!(
                    "unsupported SQLite value; value={value}; column type={ty:?}"
                ))
            }
            SqlValue::Blob(_) => {
                return Err(tether_core::err!(
                    "unsupported SQLite blob; column type={ty:?}"
                ))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
