//! Snapshots of server collections that are fetched whole.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::Result;
use crate::service::Service;
use crate::source::{Batch, ListSource};

/// A lazily loaded snapshot of a server-side collection.
///
/// Reading never fetches. Each [`load`](Self::load) replaces the snapshot
/// entirely; there is no merging and no expiry.
#[derive(Debug)]
pub struct CachedCollection<T> {
    service: Service,
    source: ListSource,
    snapshot: Arc<Vec<T>>,
    loaded: bool,
}

/// Cached collection whose elements keep the server's order.
pub type CachedList<T> = CachedCollection<T>;

impl<T> CachedCollection<T> {
    pub fn new(service: Service, source: ListSource) -> Self {
        Self {
            service,
            source,
            snapshot: Arc::new(Vec::new()),
            loaded: false,
        }
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The current snapshot; empty before the first load.
    pub fn get(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.snapshot)
    }

    pub fn to_list(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.snapshot.as_ref().clone()
    }
}

impl<T: DeserializeOwned> CachedCollection<T> {
    /// Fetches the collection and replaces the snapshot, even when already
    /// loaded.
    pub fn load(&mut self) -> Result<Arc<Vec<T>>> {
        let batch: Batch<T> = self.source.fetch(&self.service, None)?;
        trace!(
            field = self.source.field(),
            previous = self.snapshot.len(),
            current = batch.items.len(),
            "replacing cached snapshot"
        );
        self.snapshot = Arc::new(batch.items);
        self.loaded = true;
        Ok(self.get())
    }

    /// Loads only if nothing was loaded yet.
    pub fn load_first_time(&mut self) -> Result<Arc<Vec<T>>> {
        if self.loaded {
            return Ok(self.get());
        }
        self.load()
    }
}
