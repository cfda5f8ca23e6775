use foundation::ids::new_entry_id;
use foundation::time::Clock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use viewstate::ViewState;

use crate::entry::{FavoriteEntry, HistoryEntry, Located};
use crate::error::{CatalogError, DuplicateError, StorageError};
use crate::storage::KeyValueStore;

/// Most history entries kept; older visits are evicted.
pub const HISTORY_LIMIT: usize = 50;

pub const FAVORITES_KEY: &str = "satellitesmaps-favorites";
pub const HISTORY_KEY: &str = "satellitesmaps-history";

/// Storage keys for the two collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub favorites_key: String,
    pub history_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            favorites_key: FAVORITES_KEY.to_string(),
            history_key: HISTORY_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    pub keys: StorageKeys,
    pub history_limit: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            history_limit: HISTORY_LIMIT,
        }
    }
}

/// Favorites and history, newest first, written through to `S`.
///
/// Every mutation updates memory, then saves the whole affected collection
/// before returning. A failed save is returned to the caller; the in-memory
/// change stays so the session keeps working.
pub struct PlacesCatalog<S> {
    store: S,
    options: CatalogOptions,
    clock: Box<dyn Clock>,
    favorites: Vec<FavoriteEntry>,
    history: Vec<HistoryEntry>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for PlacesCatalog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesCatalog")
            .field("store", &self.store)
            .field("options", &self.options)
            .field("favorites", &self.favorites.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl<S: KeyValueStore> PlacesCatalog<S> {
    /// Loads both collections from `store`.
    ///
    /// A collection that cannot be read starts empty; the read errors are
    /// returned next to the catalog instead of failing the whole open.
    pub fn open(store: S, options: CatalogOptions, clock: Box<dyn Clock>) -> (Self, Vec<StorageError>) {
        let mut errors = Vec::new();

        let favorites = load_collection::<FavoriteEntry>(&store, &options.keys.favorites_key)
            .unwrap_or_else(|e| (Vec::new(), Some(e)));
        let history = load_collection::<HistoryEntry>(&store, &options.keys.history_key)
            .unwrap_or_else(|e| (Vec::new(), Some(e)));
        let (favorites, mut history) = (collect(favorites, &mut errors), collect(history, &mut errors));
        history.truncate(options.history_limit);

        tracing::debug!(
            favorites = favorites.len(),
            history = history.len(),
            "places catalog opened"
        );

        let catalog = Self {
            store,
            options,
            clock,
            favorites,
            history,
        };
        (catalog, errors)
    }

    pub fn favorites(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn favorite(&self, id: &str) -> Option<&FavoriteEntry> {
        self.favorites.iter().find(|f| f.id == id)
    }

    pub fn history_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|h| h.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Saves `view` as a favorite unless one already exists near it.
    pub fn add_favorite(
        &mut self,
        view: &ViewState,
        name: impl Into<String>,
    ) -> Result<FavoriteEntry, CatalogError> {
        let point = view.center();
        if let Some(existing) = self.favorites.iter().find(|f| f.is_near(point)) {
            return Err(DuplicateError {
                existing_id: existing.id.clone(),
                existing_name: existing.name.clone(),
            }
            .into());
        }

        let entry = FavoriteEntry::from_view(new_entry_id(), name.into(), view, self.clock.now_ms());
        self.favorites.insert(0, entry.clone());
        tracing::info!(id = %entry.id, name = %entry.name, "favorite added");

        self.save_favorites()?;
        Ok(entry)
    }

    /// Removes the favorite with `id`. Returns `Ok(false)` when there was none.
    pub fn remove_favorite(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(idx) = self.favorites.iter().position(|f| f.id == id) else {
            return Ok(false);
        };
        self.favorites.remove(idx);
        tracing::info!(id, "favorite removed");

        self.save_favorites()?;
        Ok(true)
    }

    /// Records a visit: drops any entry near the same place, prepends the new
    /// one and evicts the oldest beyond the limit.
    pub fn record_visit(
        &mut self,
        view: &ViewState,
        name: impl Into<String>,
    ) -> Result<HistoryEntry, StorageError> {
        let point = view.center();
        self.history.retain(|h| !h.is_near(point));

        let entry = HistoryEntry::from_view(new_entry_id(), name.into(), view, self.clock.now_ms());
        self.history.insert(0, entry.clone());
        self.history.truncate(self.options.history_limit);
        tracing::debug!(id = %entry.id, len = self.history.len(), "visit recorded");

        self.save_history()?;
        Ok(entry)
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        self.history.clear();
        tracing::info!("history cleared");
        self.save_history()
    }

    fn save_favorites(&mut self) -> Result<(), StorageError> {
        save_collection(
            &mut self.store,
            &self.options.keys.favorites_key,
            &self.favorites,
        )
    }

    fn save_history(&mut self) -> Result<(), StorageError> {
        save_collection(&mut self.store, &self.options.keys.history_key, &self.history)
    }
}

fn load_collection<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<(Vec<T>, Option<StorageError>), StorageError> {
    let Some(raw) = store.load(key)? else {
        return Ok((Vec::new(), None));
    };
    if raw.trim().is_empty() {
        return Ok((Vec::new(), None));
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
        tracing::warn!(key, error = %e, "discarding unreadable collection");
        StorageError::Corrupt(format!("{key}: {e}"))
    })?;

    // Entries are read one by one so a single bad element does not take the
    // rest of the collection down with it.
    let mut items = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "skipping unreadable entry");
                skipped.push(format!("#{index}: {e}"));
            }
        }
    }

    let partial = (!skipped.is_empty()).then(|| {
        StorageError::Corrupt(format!(
            "{key}: skipped {} unreadable entries ({})",
            skipped.len(),
            skipped.join("; ")
        ))
    });
    Ok((items, partial))
}

fn collect<T>((items, error): (Vec<T>, Option<StorageError>), errors: &mut Vec<StorageError>) -> Vec<T> {
    errors.extend(error);
    items
}

fn save_collection<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items).map_err(|e| StorageError::Io(e.to_string()))?;
    store.save(key, &raw).inspect_err(|e| {
        tracing::warn!(key, error = %e, "failed to persist collection");
    })
}
