use super::{Id, Value};
use crate::Result;

use indexmap::IndexMap;

/// Named column values of one row, in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValueRecord {
    fields: IndexMap<String, Value>,
}

impl ValueRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value of `column`, treating absent columns as `Null`.
    pub fn get(&self, column: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Sets `column`, returning the previous value if there was one.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(column.into(), value.into())
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.fields.shift_remove(column)
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads the `id` column of a stored row.
    pub fn id(&self) -> Result<Option<Id>> {
        Id::from_value(self.get(Id::COLUMN))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for ValueRecord {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for ValueRecord {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
