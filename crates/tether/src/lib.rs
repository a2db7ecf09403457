pub mod db;
pub use db::Db;

pub mod driver;

mod model;
pub use model::Model;

pub mod record;
pub use record::Record;

pub mod relation;
pub use relation::{BelongsTo, BelongsToAssociation, HasMany, HasManyAssociation};

pub mod schema;

pub use tether_core::{
    bail, err, record,
    schema::RemovalPolicy,
    stmt::{self, Id, Value, ValueRecord},
    Error, Result,
};
