use super::Operation;
use crate::stmt::{Id, ValueRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateByKey {
    /// Table to update
    pub table: String,

    /// Primary key of the row to update
    pub id: Id,

    /// Columns to assign
    pub values: ValueRecord,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
