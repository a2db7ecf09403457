use super::Operation;
use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FindOne {
    /// Table to query
    pub table: String,

    /// Column to filter on
    pub column: String,

    /// Value the column must equal
    pub value: Value,
}

impl From<FindOne> for Operation {
    fn from(value: FindOne) -> Self {
        Self::FindOne(value)
    }
}
