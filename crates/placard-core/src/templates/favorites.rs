//! Templates the user marked as favourites.
//!
//! The ids are kept in a JSON list under their own storage key, apart from the
//! working design.

use crate::storage::{KeyValueStore, LoadError, PersistenceError};

/// Storage key of the favourites list.
pub const FAVORITES_KEY: &str = "template_favorites";

/// Pseudo-category listing only favourite templates.
pub const FAVORITES_CATEGORY: &str = "favorites";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of ids, dropping repeats.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut favorites = Self::new();
        for id in ids {
            let id = id.into();
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// Ids in the order they were added.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add the id, or remove it if already present.
    /// Returns true if the template is now a favourite.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|f| f == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        }
    }

    /// Read the stored list. A missing key is an empty list.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self, LoadError> {
        let Some(json) = store.get(FAVORITES_KEY).await? else {
            return Ok(Self::new());
        };
        let ids: Vec<String> = serde_json::from_str(&json)?;
        Ok(Self::from_ids(ids))
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.ids)?;
        store.set(FAVORITES_KEY, &json).await?;
        log::debug!("Saved {} favourite templates", self.ids.len());
        Ok(())
    }
}
