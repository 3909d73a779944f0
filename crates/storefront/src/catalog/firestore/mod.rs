//! Firestore REST v1 document store.
//!
//! Reads and writes go straight to
//! `{base}/v1/projects/{project}/databases/(default)/documents/{collection}`.
//! Requests carry the web API key as a `key` query parameter when one is
//! configured; access is otherwise governed by the database's security rules.

mod value;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{CatalogError, Document, DocumentStore, Fields, OrderBy};
use crate::config::FirebaseConfig;

use value::{ListDocumentsResponse, RawDocument, document_to_fields, fields_to_json};

const PAGE_SIZE: &str = "300";

/// Firestore-backed [`DocumentStore`].
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    inner: Arc<FirestoreInner>,
}

struct FirestoreInner {
    client: reqwest::Client,
    base_url: Url,
    project_id: String,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for FirestoreDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreDocumentStore")
            .field("base_url", &self.inner.base_url.as_str())
            .field("project_id", &self.inner.project_id)
            .field("api_key", &self.inner.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Error body returned by Google APIs.
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl FirestoreDocumentStore {
    /// Create a client for the configured project.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(FirestoreInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                project_id: config.project_id.clone(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// URL for a collection, or for a document within it when `id` is given.
    fn url(&self, collection: &str, id: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                CatalogError::Decode(format!(
                    "base URL cannot be a base: {}",
                    self.inner.base_url
                ))
            })?;
            segments.pop_if_empty().extend([
                "v1",
                "projects",
                self.inner.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                collection,
            ]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        if let Some(key) = &self.inner.api_key {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }
        Ok(url)
    }

    /// Turn a non-success response into [`CatalogError::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text).map_or_else(
            |_| text.chars().take(200).collect::<String>(),
            |body| body.error.message,
        );
        tracing::error!(status = %status, message = %message, "Firestore request failed");

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(message));
        }
        Err(CatalogError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn decode(raw: RawDocument) -> Result<Document, CatalogError> {
        let id = raw.id().to_string();
        Ok(Document::new(id, fields_to_json(raw.fields)?))
    }

    fn body(fields: Fields) -> serde_json::Value {
        serde_json::json!({ "fields": document_to_fields(fields) })
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    #[instrument(skip(self), fields(collection = %collection, order_by = %order.field))]
    async fn list(&self, collection: &str, order: &OrderBy) -> Result<Vec<Document>, CatalogError> {
        let order_by = format!("{} {}", order.field, order.direction.as_str());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(collection, None)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("orderBy", &order_by)
                    .append_pair("pageSize", PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.inner.client.get(url).send().await?;
            let page: ListDocumentsResponse = Self::check(response).await?.json().await?;

            for raw in page.documents {
                let name = raw.name.clone();
                match Self::decode(raw) {
                    Ok(doc) => documents.push(doc),
                    Err(e) => warn!(document = %name, error = %e, "Skipping undecodable document"),
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = documents.len(), "Listed documents");
        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, CatalogError> {
        let url = self.url(collection, Some(id))?;
        let response = self.inner.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let raw: RawDocument = Self::check(response).await?.json().await?;
        Self::decode(raw).map(Some)
    }

    #[instrument(skip(self, fields), fields(collection = %collection))]
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, CatalogError> {
        let url = self.url(collection, None)?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&Self::body(fields))
            .send()
            .await?;

        let raw: RawDocument = Self::check(response).await?.json().await?;
        let id = raw.id().to_string();
        debug!(id = %id, "Created document");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        let url = self.url(collection, Some(id))?;
        let response = self
            .inner
            .client
            .patch(url)
            .json(&Self::body(fields))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        let mut url = self.url(collection, Some(id))?;
        {
            let mut query = url.query_pairs_mut();
            for field in fields.keys() {
                query.append_pair("updateMask.fieldPaths", field);
            }
            query.append_pair("currentDocument.exists", "true");
        }

        let response = self
            .inner
            .client
            .patch(url)
            .json(&Self::body(fields))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), CatalogError> {
        let url = self.url(collection, Some(id))?;
        let response = self.inner.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
