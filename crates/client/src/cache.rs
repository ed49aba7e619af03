//! Catalog snapshot persisted in the key-value store.

use billing_core::Catalog;
use billing_store::KeyValueStore;

use crate::error::BillingError;

/// The catalog snapshot stored under one key.
pub struct SnapshotCache<'a, S: ?Sized> {
    store: &'a S,
    key: &'a str,
}

impl<'a, S> SnapshotCache<'a, S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: &'a S, key: &'a str) -> Self {
        Self { store, key }
    }

    pub async fn save(&self, catalog: &Catalog) -> Result<(), BillingError> {
        let json = catalog.to_snapshot()?;
        self.store.set(self.key, &json).await?;
        tracing::debug!(key = self.key, products = catalog.len(), "stored catalog snapshot");
        Ok(())
    }

    /// Read and parse the snapshot.
    ///
    /// `Ok(None)` when nothing is stored; a stored but unparsable snapshot is
    /// an error.
    pub async fn load(&self) -> Result<Option<Catalog>, BillingError> {
        let Some(json) = self.store.get(self.key).await? else {
            return Ok(None);
        };
        Ok(Some(Catalog::from_snapshot(&json)?))
    }

    /// Like [`load`](Self::load), but every failure is logged and reported
    /// as "no snapshot".
    pub async fn restore(&self) -> Option<Catalog> {
        match self.load().await {
            Ok(Some(catalog)) => Some(catalog),
            Ok(None) => {
                tracing::info!(key = self.key, "no catalog snapshot stored");
                None
            }
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "ignoring unusable catalog snapshot");
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<(), BillingError> {
        self.store.remove(self.key).await?;
        Ok(())
    }
}
