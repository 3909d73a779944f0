//! Shopper profile documents in the `users` collection.

use chrono::Utc;
use screw_plus_core::{ProfileUpdate, UserId, UserProfile};
use tracing::{debug, instrument};

use super::service::timestamp;
use super::{CatalogError, DocumentStore, Fields, USERS, to_fields};

/// Reads and writes [`UserProfile`] documents keyed by uid.
#[derive(Debug, Clone)]
pub struct ProfileService<S> {
    store: S,
}

impl<S: DocumentStore> ProfileService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The profile for `uid`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the document doesn't decode.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn load_profile(&self, uid: &str) -> Result<Option<UserProfile>, CatalogError> {
        match self.store.get(USERS, uid).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    /// Load the profile, creating it on first sign-in.
    ///
    /// Blank display names are stored as `"User"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or the create fails.
    #[instrument(skip(self, email, photo_url), fields(uid = %uid))]
    pub async fn ensure_profile(
        &self,
        uid: &str,
        email: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> Result<UserProfile, CatalogError> {
        if let Some(profile) = self.load_profile(uid).await? {
            return Ok(profile);
        }

        let mut profile = UserProfile::new(UserId::new(uid), email, display_name, Utc::now());
        profile.photo_url = photo_url.map(str::to_string);

        self.store.set(USERS, uid, to_fields(&profile)?).await?;
        debug!("Created user profile");
        Ok(profile)
    }

    /// Apply a partial update, stamp `updatedAt` and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the profile doesn't exist, or the
    /// store's error if the write fails.
    #[instrument(skip(self, update), fields(uid = %uid))]
    pub async fn update_profile(
        &self,
        uid: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, CatalogError> {
        let mut fields = to_fields(update)?;
        fields.insert("updatedAt".to_string(), timestamp(Utc::now()));
        self.store.update(USERS, uid, fields).await?;

        self.load_profile(uid)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("{USERS}/{uid}")))
    }

    /// Remember the shopper's delivery location on their profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the profile doesn't exist, or the
    /// store's error if the write fails.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn update_selected_location(
        &self,
        uid: &str,
        location: &str,
    ) -> Result<(), CatalogError> {
        let mut fields = Fields::new();
        fields.insert(
            "selectedLocation".to_string(),
            serde_json::Value::String(location.to_string()),
        );
        fields.insert("updatedAt".to_string(), timestamp(Utc::now()));
        self.store.update(USERS, uid, fields).await
    }
}
