mod delete_by_key;
pub use delete_by_key::DeleteByKey;

mod find_many;
pub use find_many::FindMany;

mod find_one;
pub use find_one::FindOne;

mod insert;
pub use insert::Insert;

mod update_by_key;
pub use update_by_key::UpdateByKey;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Delete the record with the given primary key.
    DeleteByKey(DeleteByKey),

    /// Find every record whose column equals a value.
    FindMany(FindMany),

    /// Find the first record whose column equals a value.
    FindOne(FindOne),

    /// Create a new record, generating its primary key.
    Insert(Insert),

    /// Update columns of the record with the given primary key.
    UpdateByKey(UpdateByKey),
}

impl Operation {
    /// Table the operation targets.
    pub fn table(&self) -> &str {
        match self {
            Self::DeleteByKey(op) => &op.table,
            Self::FindMany(op) => &op.table,
            Self::FindOne(op) => &op.table,
            Self::Insert(op) => &op.table,
            Self::UpdateByKey(op) => &op.table,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteByKey(_) => "delete_by_key",
            Self::FindMany(_) => "find_many",
            Self::FindOne(_) => "find_one",
            Self::Insert(_) => "insert",
            Self::UpdateByKey(_) => "update_by_key",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::FindMany(_) | Self::FindOne(_))
    }

    pub fn is_write(&self) -> bool {
        !self.is_read()
    }
}
