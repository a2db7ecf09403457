mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::db::Schema};

use std::{fmt::Debug, sync::Arc};

/// The storage backend the association engine issues logical operations
/// against.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register the schema with the driver, creating any missing tables.
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> crate::Result<()>;

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;

    /// Drop every row of every registered table.
    async fn reset_db(&self) -> crate::Result<()>;
}
