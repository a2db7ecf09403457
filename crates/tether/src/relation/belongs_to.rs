use crate::{Db, Id, Model, Record, Result, Value, ValueRecord};
use tether_core::schema::{Association, AssociationKind};

use std::sync::Arc;

/// Association slot for the single target a model references through its own
/// foreign key.
///
/// The slot lives in the owner instance. It is bound to its descriptor on
/// first access and caches the target once read.
#[derive(Debug, Clone)]
pub struct BelongsTo<T> {
    state: Option<State<T>>,
}

#[derive(Debug, Clone)]
struct State<T> {
    association: Arc<Association>,

    /// `None` until loaded, then the target (absent when the foreign key is
    /// null or dangling).
    target: Option<Option<T>>,
}

/// Operations on one owner's belongs-to association.
#[derive(Debug)]
pub struct BelongsToAssociation<'a, T> {
    db: &'a Db,
    owner: &'a mut Record,
    association: &'a Association,
    target: &'a mut Option<Option<T>>,
}

impl<T> Default for BelongsTo<T> {
    fn default() -> Self {
        Self { state: None }
    }
}

impl<T: Model> BelongsTo<T> {
    /// Bind the slot to the `name` association of `owner`.
    ///
    /// Fails with an unknown association error if the owner's model declares
    /// no association called `name`.
    pub fn bind<'a>(
        &'a mut self,
        db: &'a Db,
        owner: &'a mut Record,
        name: &str,
    ) -> Result<BelongsToAssociation<'a, T>> {
        let state = match self.state.take() {
            Some(state) if state.association.name == name => self.state.insert(state),
            _ => self.state.insert(State {
                association: super::resolve::<T>(db, owner, name, AssociationKind::BelongsTo)?,
                target: None,
            }),
        };

        Ok(BelongsToAssociation {
            db,
            owner,
            association: &state.association,
            target: &mut state.target,
        })
    }

    /// The cached target, without reading from the database.
    pub fn get(&self) -> Option<&T> {
        self.state.as_ref()?.target.as_ref()?.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.target.is_some())
    }
}

impl<'a, T: Model> BelongsToAssociation<'a, T> {
    pub fn association(&self) -> &Association {
        self.association
    }

    /// The owner's foreign key.
    ///
    /// A built target that has since been saved is adopted first.
    pub fn foreign_key(&mut self) -> Result<Option<Id>> {
        self.adopt_saved_target()?;
        self.owner.foreign_key(&self.association.foreign_key)
    }

    pub fn is_loaded(&self) -> bool {
        self.target.is_some()
    }

    /// The target, read on first access.
    ///
    /// A foreign key that references no row reads as `None`.
    pub async fn reader(mut self) -> Result<Option<&'a T>> {
        self.load().await?;

        let target: &'a Option<Option<T>> = self.target;
        Ok(target.as_ref().and_then(Option::as_ref))
    }

    /// Point the owner at `target`, or at nothing.
    ///
    /// Only the owner's foreign key changes in memory; neither side is saved.
    /// A target that was never saved has no id, so the foreign key becomes
    /// null.
    pub fn writer(mut self, target: Option<&T>) {
        self.set_foreign_key(target.and_then(T::id));
        *self.target = Some(target.cloned());
    }

    /// Build a new, unsaved target and assign it.
    ///
    /// The owner's foreign key stays null until the target is saved; the next
    /// access through this association then points the owner at it.
    pub fn build(mut self, values: impl Into<ValueRecord>) -> &'a mut T {
        self.set_foreign_key(None);

        let slot = self.target;
        slot.insert(None).insert(T::new(values))
    }

    /// Insert a new target and assign it.
    ///
    /// If the insert fails the owner and the cache are left untouched.
    pub async fn create(mut self, values: impl Into<ValueRecord>) -> Result<&'a mut T> {
        let mut target = T::new(values);
        self.db.save(&mut target).await?;
        self.set_foreign_key(target.id());

        let slot = self.target;
        Ok(slot.insert(None).insert(target))
    }

    /// Drop the cached target and read it again.
    pub async fn reload(mut self) -> Result<Option<&'a T>> {
        *self.target = None;
        self.reader().await
    }

    async fn load(&mut self) -> Result<()> {
        if self.target.is_some() {
            tracing::trace!(association = %self.association, "cache hit");
            return self.adopt_saved_target();
        }

        let loaded = match self.foreign_key()? {
            None => None,
            Some(id) => {
                let record = self.db.find_one(T::NAME, Id::COLUMN, id.into()).await?;

                if record.is_none() {
                    tracing::debug!(
                        association = %self.association,
                        %id,
                        "foreign key references a missing row"
                    );
                }

                record.map(T::load)
            }
        };

        tracing::trace!(association = %self.association, found = loaded.is_some(), "loaded target");
        *self.target = Some(loaded);
        Ok(())
    }

    /// Points a null foreign key at the cached target once that target has an
    /// id, i.e. after a built target was saved.
    fn adopt_saved_target(&mut self) -> Result<()> {
        let Some(Some(target)) = self.target.as_ref() else {
            return Ok(());
        };
        let Some(id) = target.id() else {
            return Ok(());
        };

        if self.owner.foreign_key(&self.association.foreign_key)?.is_none() {
            self.set_foreign_key(Some(id));
        }
        Ok(())
    }

    fn set_foreign_key(&mut self, id: Option<Id>) {
        self.owner
            .set(&self.association.foreign_key, Value::from(id));

        tracing::trace!(association = %self.association, target = ?id, "assigned target");
    }
}
