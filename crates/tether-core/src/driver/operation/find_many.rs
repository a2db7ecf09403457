use super::Operation;
use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FindMany {
    /// Table to query
    pub table: String,

    /// Column to filter on
    pub column: String,

    /// Value the column must equal. `Null` matches null columns.
    pub value: Value,

    /// Column to sort the result by, ascending. Drivers fall back to
    /// insertion order when unset.
    pub order_by: Option<String>,
}

impl From<FindMany> for Operation {
    fn from(value: FindMany) -> Self {
        Self::FindMany(value)
    }
}
