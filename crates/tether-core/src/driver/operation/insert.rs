use super::Operation;
use crate::stmt::ValueRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Table to insert into
    pub table: String,

    /// Column values of the new row. Must not contain `id`; the driver
    /// generates it.
    pub values: ValueRecord,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
