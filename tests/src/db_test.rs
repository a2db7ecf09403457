use crate::{
    fault_driver::{FaultDriver, Faults},
    logging_driver::LoggingDriver,
    ExecLog, Setup,
};

use std::{future::Future, pin::Pin};
use tether::{db::Builder, Db};
use tracing_subscriber::EnvFilter;

type TestFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// State for one integration test against one driver.
///
/// Databases are built on the driver the setup provides, wrapped so that
/// every operation is logged and can be made to fail.
pub struct DbTest {
    setup: Box<dyn Setup>,
    log: ExecLog,
    faults: Faults,
}

impl DbTest {
    pub fn new(setup: impl Setup) -> Self {
        Self {
            setup: Box::new(setup),
            log: ExecLog::default(),
            faults: Faults::default(),
        }
    }

    /// Run `test` to completion on a current-thread runtime.
    ///
    /// Set `RUST_LOG=tether=trace` to see the association engine's events.
    pub fn run(setup: impl Setup, test: impl for<'a> FnOnce(&'a mut DbTest) -> TestFuture<'a>) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");

        let mut db_test = DbTest::new(setup);
        runtime.block_on(test(&mut db_test));
    }

    /// Build a fresh, empty database for the registered models.
    pub async fn try_setup_db(&mut self, mut builder: Builder) -> tether::Result<Db> {
        let driver = self.setup.connect().await?;
        let driver = FaultDriver::new(driver, self.faults.clone());

        self.log = ExecLog::default();
        let driver = LoggingDriver::new(Box::new(driver), self.log.clone());

        let db = builder.build(driver).await?;
        db.reset_db().await?;
        Ok(db)
    }

    pub async fn setup_db(&mut self, builder: Builder) -> Db {
        self.try_setup_db(builder).await.unwrap()
    }

    /// Operations issued since the database was set up.
    pub fn log(&self) -> ExecLog {
        self.log.clone()
    }

    /// Failures to inject into upcoming operations.
    pub fn faults(&self) -> &Faults {
        &self.faults
    }
}
