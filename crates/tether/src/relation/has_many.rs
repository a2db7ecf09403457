use crate::{Db, Error, Id, Model, Record, RemovalPolicy, Result, Value, ValueRecord};
use tether_core::{
    record,
    schema::{Association, AssociationKind},
};

use std::sync::Arc;

/// Association slot for the rows of another model that reference this one.
///
/// Members are read on first access and kept in id order. Every cached
/// member's foreign key equals the owner's id.
#[derive(Debug, Clone)]
pub struct HasMany<T> {
    state: Option<State<T>>,
}

#[derive(Debug, Clone)]
struct State<T> {
    association: Arc<Association>,
    members: Option<Vec<T>>,
}

/// Collection operations on one owner's has-many association.
///
/// Every operation loads the collection first if it is not cached. When a
/// driver call fails, the cache and the entities passed in keep their
/// previous state.
#[derive(Debug)]
pub struct HasManyAssociation<'a, T> {
    db: &'a Db,
    owner: &'a Record,
    association: &'a Association,
    members: &'a mut Option<Vec<T>>,
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        Self { state: None }
    }
}

impl<T: Model> HasMany<T> {
    /// Bind the slot to the `name` association of `owner`.
    pub fn bind<'a>(
        &'a mut self,
        db: &'a Db,
        owner: &'a Record,
        name: &str,
    ) -> Result<HasManyAssociation<'a, T>> {
        let state = match self.state.take() {
            Some(state) if state.association.name == name => self.state.insert(state),
            _ => self.state.insert(State {
                association: super::resolve::<T>(db, owner, name, AssociationKind::HasMany)?,
                members: None,
            }),
        };

        Ok(HasManyAssociation {
            db,
            owner,
            association: &state.association,
            members: &mut state.members,
        })
    }

    /// The cached members, without reading from the database.
    pub fn get(&self) -> Option<&[T]> {
        self.state.as_ref()?.members.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.members.is_some())
    }
}

impl<'a, T: Model> HasManyAssociation<'a, T> {
    pub fn association(&self) -> &Association {
        self.association
    }

    pub fn is_loaded(&self) -> bool {
        self.members.is_some()
    }

    /// The members, in id order.
    pub async fn reader(mut self) -> Result<&'a [T]> {
        self.load().await?;

        let members: &'a Option<Vec<T>> = self.members;
        Ok(members.as_deref().unwrap_or_default())
    }

    pub async fn count(mut self) -> Result<usize> {
        self.load().await?;
        Ok(self.cached().len())
    }

    pub async fn is_empty(mut self) -> Result<bool> {
        self.load().await?;
        Ok(self.cached().is_empty())
    }

    pub async fn first(self) -> Result<Option<&'a T>> {
        Ok(self.reader().await?.first())
    }

    /// The member with primary key `id`.
    pub async fn find(self, id: Id) -> Result<Option<&'a T>> {
        let members = self.reader().await?;
        Ok(members.iter().find(|member| member.id() == Some(id)))
    }

    /// Returns `true` if `entity` is a member.
    pub async fn include(mut self, entity: &T) -> Result<bool> {
        self.load().await?;
        Ok(self.position(entity).is_some())
    }

    /// Primary keys of the members. Members that were never saved have no
    /// key and are skipped.
    pub async fn ids(mut self) -> Result<Vec<Id>> {
        self.load().await?;
        Ok(self.cached().iter().filter_map(T::id).collect())
    }

    /// Build a new member referencing the owner. Nothing is saved.
    pub async fn build(mut self, values: impl Into<ValueRecord>) -> Result<&'a mut T> {
        self.load().await?;

        let mut member = T::new(values);
        member.set(&self.association.foreign_key, self.owner.id());

        tracing::trace!(association = %self.association, "built member");
        Ok(self.push(member))
    }

    /// Insert a new member referencing the owner.
    pub async fn create(mut self, values: impl Into<ValueRecord>) -> Result<&'a mut T> {
        let owner_id = self.owner_id("create")?;
        self.load().await?;

        let mut member = T::new(values);
        member.set(&self.association.foreign_key, owner_id);
        self.db.save(&mut member).await?;

        tracing::trace!(association = %self.association, id = ?member.id(), "created member");
        Ok(self.push(member))
    }

    /// Make `entity` a member. A saved entity gets its foreign key written;
    /// appending a member again does nothing more.
    pub async fn append(mut self, entity: &mut T) -> Result<()> {
        let owner_id = self.owner_id("append to")?;
        self.check_not_destroyed(entity)?;
        self.load().await?;

        let position = self.position(entity);
        let current = entity.record().foreign_key(&self.association.foreign_key)?;

        let mut staged = entity.clone();
        staged.set(&self.association.foreign_key, owner_id);

        let needs_write = position.is_none() || current != Some(owner_id);
        if needs_write && staged.record().is_persisted() {
            self.write_foreign_key(&staged, owner_id.into()).await?;
        }

        tracing::trace!(association = %self.association, id = ?staged.id(), "appended member");

        match position {
            Some(index) => self.members_mut()[index] = staged.clone(),
            None => self.members_mut().push(staged.clone()),
        }
        *entity = staged;
        Ok(())
    }

    /// Remove `entity` from the collection, nulling its foreign key. The row
    /// is kept. Does nothing if `entity` is not a member.
    pub async fn delete(mut self, entity: &mut T) -> Result<()> {
        self.owner_id("delete from")?;
        self.load().await?;

        let Some(index) = self.position(entity) else {
            return Ok(());
        };

        let mut staged = entity.clone();
        staged.set(&self.association.foreign_key, Value::Null);

        if staged.record().is_persisted() {
            self.write_foreign_key(&staged, Value::Null).await?;
        }

        tracing::trace!(association = %self.association, id = ?staged.id(), "deleted member");
        self.members_mut().remove(index);
        *entity = staged;
        Ok(())
    }

    /// Remove `entity` from the collection and delete its row. Does nothing
    /// if `entity` is not a member.
    pub async fn destroy(mut self, entity: &mut T) -> Result<()> {
        self.owner_id("destroy from")?;
        self.load().await?;

        let Some(index) = self.position(entity) else {
            return Ok(());
        };

        let mut staged = entity.clone();
        if staged.record().is_persisted() {
            self.db.destroy(&mut staged).await?;
        }

        tracing::trace!(association = %self.association, id = ?staged.id(), "destroyed member");
        self.members_mut().remove(index);
        *entity = staged;
        Ok(())
    }

    /// Make the collection exactly `entities`.
    ///
    /// Members not in `entities` leave according to the association's removal
    /// policy; entities that are not yet members are appended.
    pub async fn replace(mut self, entities: Vec<T>) -> Result<()> {
        let owner_id = self.owner_id("replace")?;
        for entity in &entities {
            self.check_not_destroyed(entity)?;
        }
        self.load().await?;

        let foreign_key = &self.association.foreign_key;
        let current = self.cached();
        let mut removed = 0;

        for member in current {
            let kept = entities
                .iter()
                .any(|entity| entity.record().same_entity(member.record()));

            if kept {
                continue;
            }

            removed += 1;
            if !member.record().is_persisted() {
                continue;
            }

            match self.association.on_remove {
                RemovalPolicy::Nullify => {
                    self.write_foreign_key(member, Value::Null).await?;
                }
                RemovalPolicy::Destroy => {
                    self.db.delete_record(member.record()).await?;
                }
            }
        }

        let mut staged = entities;
        for entity in &mut staged {
            let member = current
                .iter()
                .any(|member| member.record().same_entity(entity.record()));

            let needs_write = !member || entity.record().foreign_key(foreign_key)? != Some(owner_id);
            entity.set(foreign_key, owner_id);

            if needs_write && entity.record().is_persisted() {
                self.write_foreign_key(entity, owner_id.into()).await?;
            }
        }

        tracing::trace!(
            association = %self.association,
            removed,
            members = staged.len(),
            "replaced members"
        );

        *self.members = Some(staged);
        Ok(())
    }

    /// Replace the collection with the rows whose primary keys are `ids`.
    ///
    /// Every id is resolved before anything is written; a missing row fails
    /// with a record not found error.
    pub async fn ids_writer(self, ids: &[Id]) -> Result<()> {
        self.owner_id("assign ids of")?;

        let mut entities = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(record) = self.db.find_one(T::NAME, Id::COLUMN, id.into()).await? else {
                return Err(Error::record_not_found(format!(
                    "`{}` with id {id}",
                    T::NAME
                )));
            };
            entities.push(T::load(record));
        }

        self.replace(entities).await
    }

    /// Remove every member according to the association's removal policy.
    pub async fn clear(self) -> Result<()> {
        self.replace(vec![]).await
    }

    /// Drop the cached members and read them again.
    pub async fn reload(mut self) -> Result<&'a [T]> {
        *self.members = None;
        self.reader().await
    }

    async fn load(&mut self) -> Result<()> {
        if self.members.is_some() {
            tracing::trace!(association = %self.association, "cache hit");
            return Ok(());
        }

        let loaded = match self.owner.id() {
            // Nothing can reference an owner that was never saved.
            None => vec![],
            Some(id) => self
                .db
                .find_many(T::NAME, &self.association.foreign_key, id.into())
                .await?
                .into_iter()
                .map(T::load)
                .collect(),
        };

        tracing::trace!(association = %self.association, count = loaded.len(), "loaded members");
        *self.members = Some(loaded);
        Ok(())
    }

    fn owner_id(&self, action: &str) -> Result<Id> {
        self.owner.id().ok_or_else(|| {
            Error::record_not_saved(format!(
                "cannot {action} `{}` through a new `{}`",
                self.association.name, self.association.owner
            ))
        })
    }

    fn check_not_destroyed(&self, entity: &T) -> Result<()> {
        if !entity.record().is_destroyed() {
            return Ok(());
        }

        Err(Error::record_not_saved(format!(
            "cannot add destroyed `{}` {} to `{}`",
            T::NAME,
            entity.id().map(|id| id.to_string()).unwrap_or_default(),
            self.association
        )))
    }

    fn cached(&self) -> &[T] {
        self.members.as_deref().unwrap_or_default()
    }

    fn members_mut(&mut self) -> &mut Vec<T> {
        self.members.get_or_insert_with(Vec::new)
    }

    fn position(&self, entity: &T) -> Option<usize> {
        self.cached()
            .iter()
            .position(|member| member.record().same_entity(entity.record()))
    }

    fn push(self, member: T) -> &'a mut T {
        let members = self.members.get_or_insert_with(Vec::new);
        let index = members.len();
        members.push(member);
        &mut members[index]
    }

    async fn write_foreign_key(&self, entity: &T, value: Value) -> Result<()> {
        let values = record! { self.association.foreign_key.as_str() => value };
        self.db.update_record(entity.record(), values).await
    }
}
