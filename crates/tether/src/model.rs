use crate::{schema, stmt::Value, Id, Record, ValueRecord};

/// A type stored in its own table and reachable through associations.
///
/// Implementations own a [`Record`] holding the row and one slot per declared
/// association.
pub trait Model: Sized + Clone + 'static {
    /// Model name, used as the registry key for its associations.
    const NAME: &'static str;

    /// Table storing rows of this model.
    const TABLE: &'static str;

    /// Columns and associations of the model.
    fn schema() -> schema::Model;

    /// Wrap a record in a fresh instance with unloaded association slots.
    fn load(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Create a new, unpersisted instance from column values.
    fn new(values: impl Into<ValueRecord>) -> Self {
        Self::load(Record::new(Self::NAME, values.into()))
    }

    fn id(&self) -> Option<Id> {
        self.record().id()
    }

    fn get(&self, column: &str) -> &Value {
        self.record().get(column)
    }

    fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.record_mut().set(column, value);
    }
}
