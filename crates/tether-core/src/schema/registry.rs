use super::Association;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Association descriptors keyed by `(owner model, association name)`.
///
/// Filled while the schema is built and read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    associations: IndexMap<(String, String), Arc<Association>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `association` under its owner and name.
    ///
    /// Declaring the same name twice on one model is an error.
    pub fn register(&mut self, association: Association) -> Result<&Arc<Association>> {
        let key = (association.owner.clone(), association.name.clone());

        if self.associations.contains_key(&key) {
            return Err(Error::invalid_schema(format!(
                "duplicate association `{}` on `{}`",
                key.1, key.0
            )));
        }

        let entry = self.associations.entry(key).or_insert(Arc::new(association));
        Ok(entry)
    }

    pub fn lookup(&self, owner: &str, name: &str) -> Result<&Arc<Association>> {
        self.associations
            .get(&(owner.to_string(), name.to_string()))
            .ok_or_else(|| Error::unknown_association(owner, name))
    }

    /// All associations declared on `owner`, in declaration order.
    pub fn associations_of<'a>(
        &'a self,
        owner: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Association>> + 'a {
        self.associations
            .iter()
            .filter(move |((o, _), _)| o == owner)
            .map(|(_, association)| association)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Association>> + '_ {
        self.associations.values()
    }

    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}
