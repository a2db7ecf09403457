use crate::Result;

pub use tether_core::{
    driver::{
        operation::{self, Operation},
        Driver, Response, Rows,
    },
    schema::db::Schema,
};

use std::sync::Arc;
use url::Url;

/// A built-in driver selected by connection URL.
#[derive(Debug)]
pub(crate) enum Connection {
    #[cfg(feature = "memory")]
    Memory(tether_driver_memory::Memory),

    #[cfg(feature = "sqlite")]
    Sqlite(tether_driver_sqlite::Sqlite),
}

impl Connection {
    pub(crate) fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| crate::err!("invalid connection URL; url={url}; {err}"))?;

        match parsed.scheme() {
            "memory" => Self::connect_memory(&parsed),
            "sqlite" => Self::connect_sqlite(&parsed),
            scheme => Err(crate::err!(
                "unsupported database; scheme={scheme}; url={url}"
            )),
        }
    }

    #[cfg(feature = "memory")]
    fn connect_memory(_url: &Url) -> Result<Self> {
        Ok(Self::Memory(tether_driver_memory::Memory::new()))
    }

    #[cfg(not(feature = "memory"))]
    fn connect_memory(_url: &Url) -> Result<Self> {
        Err(crate::err!("`memory` feature not enabled"))
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(url: &Url) -> Result<Self> {
        let driver = tether_driver_sqlite::Sqlite::connect(url.as_str())?;
        Ok(Self::Sqlite(driver))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_url: &Url) -> Result<Self> {
        Err(crate::err!("`sqlite` feature not enabled"))
    }
}

macro_rules! match_db {
    ($self:expr, $driver:pat => $e:expr) => {
        match *$self {
            #[cfg(feature = "memory")]
            Connection::Memory($driver) => $e,

            #[cfg(feature = "sqlite")]
            Connection::Sqlite($driver) => $e,
        }
    };
}

#[tether_core::async_trait]
impl Driver for Connection {
    async fn register_schema(&mut self, schema: &Arc<Schema>) -> Result<()> {
        #[allow(unused_variables)]
        let schema = schema;
        match_db!(self, ref mut driver => driver.register_schema(schema).await)
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        #[allow(unused_variables)]
        let op = op;
        match_db!(self, ref driver => driver.exec(op).await)
    }

    async fn reset_db(&self) -> Result<()> {
        match_db!(self, ref driver => driver.reset_db().await)
    }
}
