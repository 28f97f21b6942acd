//! Persistence of the per-user favorites set

use crate::error::CatalogError;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Store entry name for the persisted favorites list
pub const FAVORITES_KEY: &str = "template-favorites";

/// Storage backend for the favorites set
pub trait FavoritesStore {
    /// Load the persisted template ids
    fn load(&self) -> Result<BTreeSet<String>, CatalogError>;

    /// Replace the persisted ids with `ids`
    fn save(&mut self, ids: &BTreeSet<String>) -> Result<(), CatalogError>;
}

/// Favorites persisted as a JSON array of template ids
#[derive(Debug, Clone)]
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$HOME/.calc-templates/template-favorites.json`
    pub fn in_home() -> Option<Self> {
        let home = env::var("HOME").ok()?;
        Some(Self::new(
            PathBuf::from(home)
                .join(".calc-templates")
                .join(format!("{FAVORITES_KEY}.json")),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for JsonFavoritesStore {
    fn load(&self) -> Result<BTreeSet<String>, CatalogError> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| CatalogError::FavoritesUnavailable {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            })?;

        let ids: Vec<String> =
            serde_json::from_str(&contents).map_err(|e| CatalogError::FavoritesUnavailable {
                message: format!("Failed to parse {}: {}", self.path.display(), e),
            })?;

        Ok(ids.into_iter().collect())
    }

    fn save(&mut self, ids: &BTreeSet<String>) -> Result<(), CatalogError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| CatalogError::FavoritesUnavailable {
                    message: format!("Failed to create favorites directory: {}", e),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(ids).map_err(|e| {
            CatalogError::FavoritesUnavailable {
                message: format!("Failed to serialize favorites: {}", e),
            }
        })?;

        fs::write(&self.path, json).map_err(|e| CatalogError::FavoritesUnavailable {
            message: format!("Failed to write favorites file: {}", e),
        })
    }
}

/// Shared in-memory store; clones observe the same set
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoritesStore {
    ids: Arc<Mutex<BTreeSet<String>>>,
}

impl MemoryFavoritesStore {
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Arc::new(Mutex::new(ids.into_iter().map(Into::into).collect())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeSet<String>>, CatalogError> {
        self.ids
            .lock()
            .map_err(|_| CatalogError::FavoritesUnavailable {
                message: "favorites lock poisoned".to_string(),
            })
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> Result<BTreeSet<String>, CatalogError> {
        Ok(self.lock()?.clone())
    }

    fn save(&mut self, ids: &BTreeSet<String>) -> Result<(), CatalogError> {
        *self.lock()? = ids.clone();
        Ok(())
    }
}
