use crate::{stmt::ValueRecord, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by the operation, including their `id` column
    Values(Vec<ValueRecord>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<ValueRecord>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    /// Returns the affected row count.
    pub fn into_count(self) -> Result<u64> {
        match self.rows {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => Err(Error::from_args(format_args!(
                "invalid result: expected a row count, got rows"
            ))),
        }
    }

    /// Returns the rows of the response.
    pub fn into_values(self) -> Result<Vec<ValueRecord>> {
        match self.rows {
            Rows::Values(values) => Ok(values),
            Rows::Count(_) => Err(Error::from_args(format_args!(
                "invalid result: expected rows, got a row count"
            ))),
        }
    }

    /// Returns the single row of the response, if any.
    pub fn into_first(self) -> Result<Option<ValueRecord>> {
        Ok(self.into_values()?.into_iter().next())
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }
}
