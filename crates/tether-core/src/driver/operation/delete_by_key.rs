use super::Operation;
use crate::stmt::Id;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteByKey {
    /// Table to delete from
    pub table: String,

    /// Primary key of the row to delete
    pub id: Id,
}

impl From<DeleteByKey> for Operation {
    fn from(value: DeleteByKey) -> Self {
        Self::DeleteByKey(value)
    }
}
