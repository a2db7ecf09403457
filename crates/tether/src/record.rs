use crate::{Error, Id, Result, Value, ValueRecord};

use std::sync::atomic::{AtomicU64, Ordering};

/// The stored state of one model instance.
///
/// Two records are the same entity when both are persisted with the same
/// model and id. Records without an id are only equal to their own clones.
#[derive(Debug, Clone)]
pub struct Record {
    model: &'static str,
    key: u64,
    id: Option<Id>,
    values: ValueRecord,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Built in memory, never inserted.
    New,

    /// Backed by a row.
    Persisted,

    /// The row was deleted.
    Destroyed,
}

/// Process-unique key for a new record instance.
fn next_key() -> u64 {
    static NEXT_KEY: AtomicU64 = AtomicU64::new(0);
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

impl Record {
    /// Create a new record of `model`. An `id` entry in `values` is dropped;
    /// ids are assigned by the store.
    pub fn new(model: &'static str, mut values: ValueRecord) -> Self {
        values.remove(Id::COLUMN);

        Self {
            model,
            key: next_key(),
            id: None,
            values,
            state: State::New,
        }
    }

    /// Load a record from a stored row.
    pub(crate) fn from_row(model: &'static str, row: ValueRecord) -> Result<Self> {
        let mut record = Self::new(model, ValueRecord::new());
        record.refresh(row)?;
        Ok(record)
    }

    /// Replace the values with a stored row, marking the record persisted.
    pub(crate) fn refresh(&mut self, mut row: ValueRecord) -> Result<()> {
        let Some(id) = row.id()? else {
            return Err(crate::err!("stored `{}` row has no `id`", self.model));
        };
        row.remove(Id::COLUMN);

        self.id = Some(id);
        self.values = row;
        self.state = State::Persisted;
        Ok(())
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.state = State::Destroyed;
    }

    /// Returns the id, or fails if the record was never inserted.
    pub(crate) fn expect_id(&self, action: &str) -> Result<Id> {
        self.id.ok_or_else(|| {
            Error::record_not_saved(format!("cannot {action} a new `{}`", self.model))
        })
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_new(&self) -> bool {
        self.state == State::New
    }

    pub fn is_persisted(&self) -> bool {
        self.state == State::Persisted
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == State::Destroyed
    }

    /// Returns the value of `column`. The primary key is read through
    /// [`Record::id`].
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column)
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.values.set(column, value);
    }

    /// Column values, without the primary key.
    pub fn values(&self) -> &ValueRecord {
        &self.values
    }

    /// Reads `column` as a foreign key.
    pub fn foreign_key(&self, column: &str) -> Result<Option<Id>> {
        Id::from_value(self.get(column))
    }

    /// Returns `true` if `other` is the same stored entity, or the same
    /// unsaved instance.
    pub fn same_entity(&self, other: &Record) -> bool {
        if self.model != other.model {
            return false;
        }

        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.key == other.key,
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_entity(other)
    }
}
