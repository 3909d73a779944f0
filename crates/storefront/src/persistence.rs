//! Local preferences and saved cart/wishlist.
//!
//! Everything lives in one JSON file, `preferences.json`, under the
//! configured data directory. Writes go to a temporary file that is then
//! renamed over the original, so a crash mid-write leaves the previous file
//! intact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::scope::ViewScope;
use crate::store::{SavedSelection, ShopStore, StoreSnapshot};

const FILE_NAME: &str = "preferences.json";

/// Location label shown before the shopper picks one.
pub const DEFAULT_LOCATION: &str = "Select Location";

/// Errors reading or writing the preferences file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid preferences JSON.
    #[error("Corrupt preferences file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Preferences could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Contents of the preferences file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub has_completed_onboarding: bool,
    pub has_skipped_login: bool,
    pub selected_location: String,
    pub selection: SavedSelection,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            has_skipped_login: false,
            selected_location: DEFAULT_LOCATION.to_string(),
            selection: SavedSelection::default(),
        }
    }
}

/// File-backed preferences.
///
/// Cheap to clone; clones share the in-memory copy and serialize writes.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    inner: Arc<PreferencesInner>,
}

#[derive(Debug)]
struct PreferencesInner {
    path: PathBuf,
    state: Mutex<Preferences>,
}

impl PreferencesStore {
    /// Open (or start) the preferences file in `data_dir`.
    ///
    /// A missing file yields defaults; nothing is written until the first
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the file exists but doesn't
    /// parse, or [`PersistenceError::Io`] if it can't be read.
    #[instrument(fields(dir = %data_dir.display()))]
    pub async fn open(data_dir: &Path) -> Result<Self, PersistenceError> {
        let path = data_dir.join(FILE_NAME);

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                PersistenceError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences file, using defaults");
                Preferences::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: Arc::new(PreferencesInner {
                path,
                state: Mutex::new(state),
            }),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Copy of the current preferences.
    pub async fn preferences(&self) -> Preferences {
        self.inner.state.lock().await.clone()
    }

    /// Apply `f` and persist the result if it reports a change.
    async fn modify(
        &self,
        f: impl FnOnce(&mut Preferences) -> bool,
    ) -> Result<(), PersistenceError> {
        let mut state = self.inner.state.lock().await;
        let mut next = state.clone();
        if !f(&mut next) {
            return Ok(());
        }

        write_atomic(&self.inner.path, &next).await?;
        *state = next;
        Ok(())
    }

    // =========================================================================
    // Onboarding
    // =========================================================================

    pub async fn has_completed_onboarding(&self) -> bool {
        self.inner.state.lock().await.has_completed_onboarding
    }

    pub async fn has_skipped_login(&self) -> bool {
        self.inner.state.lock().await.has_skipped_login
    }

    /// Mark onboarding as done.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    pub async fn complete_onboarding(&self) -> Result<(), PersistenceError> {
        self.modify(|prefs| !std::mem::replace(&mut prefs.has_completed_onboarding, true))
            .await
    }

    /// Continue as a guest; also completes onboarding.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    pub async fn skip_login(&self) -> Result<(), PersistenceError> {
        self.modify(|prefs| {
            let changed = !prefs.has_skipped_login || !prefs.has_completed_onboarding;
            prefs.has_skipped_login = true;
            prefs.has_completed_onboarding = true;
            changed
        })
        .await
    }

    // =========================================================================
    // Location
    // =========================================================================

    pub async fn selected_location(&self) -> String {
        self.inner.state.lock().await.selected_location.clone()
    }

    /// Remember the delivery location label.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    pub async fn set_selected_location(&self, location: &str) -> Result<(), PersistenceError> {
        self.modify(|prefs| {
            if prefs.selected_location == location {
                return false;
            }
            location.clone_into(&mut prefs.selected_location);
            true
        })
        .await
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    /// Save the cart and wishlist part of a store snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    pub async fn save_selection(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError> {
        let selection = SavedSelection::from(snapshot);
        self.modify(|prefs| {
            if prefs.selection == selection {
                return false;
            }
            prefs.selection = selection;
            true
        })
        .await
    }

    /// The last saved cart and wishlist.
    pub async fn load_selection(&self) -> SavedSelection {
        self.inner.state.lock().await.selection.clone()
    }
}

async fn write_atomic(path: &Path, prefs: &Preferences) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec_pretty(prefs)?;
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(dir).await?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "Saved preferences");
    Ok(())
}

/// Save the store's cart and wishlist after every change until `scope`
/// closes. A change still pending when the scope closes is written before
/// the task exits. Write failures are logged and the next change retries.
pub fn spawn_autosave(
    store: &ShopStore,
    prefs: PreferencesStore,
    scope: &ViewScope,
) -> JoinHandle<()> {
    let mut rx = store.subscribe();
    let token = scope.token();

    tokio::spawn(async move {
        loop {
            let closing = tokio::select! {
                biased;
                () = token.cancelled() => true,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    false
                }
            };

            if closing && !rx.has_changed().unwrap_or(false) {
                break;
            }

            let snapshot = rx.borrow_and_update().clone();
            if let Err(e) = prefs.save_selection(&snapshot).await {
                warn!(error = %e, "Failed to save cart");
            }

            if closing {
                break;
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use screw_plus_core::{Price, Product};

    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();

        assert!(!prefs.has_completed_onboarding().await);
        assert!(!prefs.has_skipped_login().await);
        assert_eq!(prefs.selected_location().await, DEFAULT_LOCATION);
        assert_eq!(prefs.load_selection().await, SavedSelection::default());
        assert!(!prefs.path().exists());
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();

        prefs.skip_login().await.unwrap();
        prefs.set_selected_location("Pune, Maharashtra").await.unwrap();

        let reopened = PreferencesStore::open(dir.path()).await.unwrap();
        assert!(reopened.has_completed_onboarding().await);
        assert!(reopened.has_skipped_login().await);
        assert_eq!(reopened.selected_location().await, "Pune, Maharashtra");
        assert!(!dir.path().join("preferences.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_complete_onboarding_alone() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();
        prefs.complete_onboarding().await.unwrap();

        let reopened = PreferencesStore::open(dir.path()).await.unwrap();
        assert!(reopened.has_completed_onboarding().await);
        assert!(!reopened.has_skipped_login().await);
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), b"{ not json").unwrap();

        let err = PreferencesStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let prefs = PreferencesStore::open(&nested).await.unwrap();
        prefs.complete_onboarding().await.unwrap();
        assert!(nested.join(FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_selection_restores_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();

        let store = ShopStore::new();
        let tee = Product::new("1", "Classic White T-Shirt", Price::from(799));
        store.add_to_cart_with_quantity(&tee, "M", "White", 2);
        store.toggle_favorite("7");
        prefs.save_selection(&store.snapshot()).await.unwrap();

        let reopened = PreferencesStore::open(dir.path()).await.unwrap();
        let restored = ShopStore::new();
        restored.restore(reopened.load_selection().await);

        assert_eq!(restored.cart_items_count(), 2);
        assert_eq!(restored.cart_total(), Price::from(1598));
        assert!(restored.is_favorite("7"));
    }

    #[tokio::test]
    async fn test_autosave_follows_store() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();
        let store = ShopStore::new();
        let scope = ViewScope::new();
        let handle = spawn_autosave(&store, prefs.clone(), &scope);

        store.toggle_favorite("42");
        for _ in 0..200 {
            if prefs.load_selection().await.favorites.contains("42") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(prefs.load_selection().await.favorites.contains("42"));

        scope.close();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_autosave_flushes_last_change_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesStore::open(dir.path()).await.unwrap();
        let store = ShopStore::new();
        let scope = ViewScope::new();
        let handle = spawn_autosave(&store, prefs, &scope);
        tokio::task::yield_now().await;

        let tee = Product::new("1", "Classic White T-Shirt", Price::from(799));
        store.add_to_cart(&tee, "M", "White");
        scope.close();
        handle.await.unwrap();

        let reopened = PreferencesStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load_selection().await.cart.lines().len(), 1);
    }
}
