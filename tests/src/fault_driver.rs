use std::{
    fmt,
    sync::{Arc, Mutex},
};
use tether::driver::{Driver, Operation, Response, Schema};
use tether_core::{async_trait, Error, Result};

/// Wraps a driver, failing operations registered with [`Faults`].
#[derive(Debug)]
pub struct FaultDriver {
    inner: Box<dyn Driver>,
    faults: Faults,
}

/// Shared list of pending failures.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pending: Arc<Mutex<Vec<Fault>>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Fault {
    op: &'static str,
    table: String,
}

/// The error a [`FaultDriver`] fails with.
#[derive(Debug)]
pub struct InjectedFault {
    op: &'static str,
    table: String,
}

impl FaultDriver {
    pub fn new(inner: Box<dyn Driver>, faults: Faults) -> Self {
        Self { inner, faults }
    }
}

impl Faults {
    /// Fail the next `op` against `table`. `op` is an operation name, e.g.
    /// `"update_by_key"`.
    pub fn fail_next(&self, op: &'static str, table: &str) {
        self.pending.lock().unwrap().push(Fault {
            op,
            table: table.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    fn take(&self, op: &Operation) -> Option<Fault> {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|fault| fault.op == op.name() && fault.table == op.table())?;
        Some(pending.remove(index))
    }
}

#[async_trait]
impl Driver for FaultDriver {
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> Result<()> {
        self.inner.register_schema(schema).await
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        if let Some(fault) = self.faults.take(&op) {
            tracing::debug!(op = fault.op, table = %fault.table, "injecting fault");
            return Err(Error::persistence_failure(InjectedFault {
                op: fault.op,
                table: fault.table,
            }));
        }

        self.inner.exec(op).await
    }

    async fn reset_db(&self) -> Result<()> {
        self.inner.reset_db().await
    }
}

impl std::error::Error for InjectedFault {}

impl fmt::Display for InjectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected fault; op={}; table={}", self.op, self.table)
    }
}
