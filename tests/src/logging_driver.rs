use crate::ExecLog;

use std::sync::Arc;
use tether::driver::{Driver, Operation, Response, Schema};
use tether_core::{async_trait, Result};

/// Passes every operation to `inner` and records it, with its response, in
/// an [`ExecLog`].
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
    log: ExecLog,
}

impl LoggingDriver {
    pub fn new(inner: Box<dyn Driver>, log: ExecLog) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> Result<()> {
        self.inner.register_schema(schema).await
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let result = self.inner.exec(op.clone()).await;
        self.log.record(op, result.as_ref().ok().cloned());
        result
    }

    async fn reset_db(&self) -> Result<()> {
        self.inner.reset_db().await
    }
}
