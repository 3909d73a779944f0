//! Live catalog lists for screens that stay open.
//!
//! A [`LiveCatalog`] holds the latest list a screen should render. Each
//! [`publish`](LiveCatalog::publish) replaces the whole list: the last write
//! wins and nothing is merged.

use std::sync::Arc;
use std::time::Duration;

use screw_plus_core::Product;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CatalogError, CatalogService, DocumentStore};
use crate::scope::ViewScope;

/// Observable list of catalog records.
///
/// Holds `None` until the first list has been published.
#[derive(Debug)]
pub struct LiveCatalog<T> {
    tx: Arc<watch::Sender<Option<Vec<T>>>>,
}

impl<T> Clone for LiveCatalog<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> Default for LiveCatalog<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }
}

impl<T: Clone> LiveCatalog<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every published list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<T>>> {
        self.tx.subscribe()
    }

    /// The most recently published list.
    #[must_use]
    pub fn current(&self) -> Option<Vec<T>> {
        self.tx.borrow().clone()
    }

    /// Replace the list and notify subscribers.
    pub fn publish(&self, items: Vec<T>) {
        self.tx.send_replace(Some(items));
    }
}

impl LiveCatalog<Product> {
    /// Read products from the store (bypassing the cache) and publish them.
    /// Returns how many were published.
    ///
    /// # Errors
    ///
    /// Returns the read error; the published list is left untouched.
    pub async fn refresh_products<S: DocumentStore>(
        &self,
        service: &CatalogService<S>,
    ) -> Result<usize, CatalogError> {
        let products = service.reload_products().await?;
        let count = products.len();
        self.publish(products);
        Ok(count)
    }

    /// Refresh products now and then every `interval` until `scope` closes.
    ///
    /// Failed refreshes are logged and retried on the next tick.
    pub fn spawn_polling<S>(
        &self,
        service: CatalogService<S>,
        interval: Duration,
        scope: &ViewScope,
    ) -> JoinHandle<()>
    where
        S: DocumentStore + 'static,
    {
        let live = self.clone();
        let token = scope.token();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                // A refresh that finishes after the scope closed is not published.
                let refreshed = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    result = service.reload_products() => result,
                };

                match refreshed {
                    Ok(products) => {
                        debug!(count = products.len(), "Polled products");
                        live.publish(products);
                    }
                    Err(e) => warn!(error = %e, "Product refresh failed"),
                }
            }
            debug!("Product polling stopped");
        })
    }
}
