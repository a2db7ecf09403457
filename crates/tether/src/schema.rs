mod model;
pub use model::{Field, Model};

mod relation;
pub use relation::{BelongsTo, HasMany, Relation};

pub use tether_core::schema::{db::Type, Name, RemovalPolicy};
