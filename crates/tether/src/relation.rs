mod belongs_to;
pub use belongs_to::{BelongsTo, BelongsToAssociation};

mod has_many;
pub use has_many::{HasMany, HasManyAssociation};

use crate::{Db, Error, Model, Record, Result};
use tether_core::schema::{Association, AssociationKind};

use std::sync::Arc;

/// Looks up the descriptor a slot binds to, checking it has the slot's shape.
fn resolve<T: Model>(
    db: &Db,
    owner: &Record,
    name: &str,
    kind: AssociationKind,
) -> Result<Arc<Association>> {
    let association = db.schema().association(owner.model(), name)?;

    if association.kind != kind || association.target != T::NAME {
        return Err(Error::invalid_schema(format!(
            "association `{association}` accessed as {kind} of `{}`",
            T::NAME
        )));
    }

    tracing::trace!(%association, "association slot initialized");
    Ok(association.clone())
}
