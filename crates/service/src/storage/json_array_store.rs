use std::{path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::error;

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered sequence store.
///
/// Persists a `Vec<V>` to a single pretty-printed JSON file and rewrites the
/// whole file after every mutation. Intended for small collections where a
/// database is overkill.
///
/// Write failures are logged and swallowed at the [`mutate`](Self::mutate)
/// seam; the in-memory collection stays authoritative until the next
/// successful write.
#[derive(Clone)]
pub struct JsonArrayStore<V> {
    inner: Arc<RwLock<Vec<V>>>,
    file_path: PathBuf,
}

impl<V> JsonArrayStore<V>
where
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path, loading any existing collection.
    ///
    /// A missing, unreadable, or malformed file yields an empty collection;
    /// the failure is logged and never surfaced. The file itself is only
    /// written on the first mutation.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let items: Vec<V> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(items) => items,
                Err(e) => {
                    error!(path = %file_path.display(), error = %e, "failed to parse stored collection, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                error!(path = %file_path.display(), error = %e, "failed to read stored collection, starting empty");
                Vec::new()
            }
        };

        Arc::new(Self {
            inner: Arc::new(RwLock::new(items)),
            file_path,
        })
    }

    /// Serialize the full collection and overwrite the file in one write.
    /// Load and save formats are identical, so load/save round-trips are
    /// stable.
    async fn save(&self) -> Result<(), ServiceError> {
        let items = self.inner.read().await;
        let data = serde_json::to_vec_pretty(&*items)?;
        drop(items);
        fs::write(&self.file_path, data).await?;
        Ok(())
    }

    /// Clone of all items in insertion order.
    pub async fn list(&self) -> Vec<V> {
        self.inner.read().await.clone()
    }

    /// Run a read-only closure against the collection.
    pub async fn find<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[V]) -> R,
    {
        let items = self.inner.read().await;
        f(&items)
    }

    /// Apply a mutation and persist the collection afterwards.
    ///
    /// The closure returns `Some` with its result when it changed the
    /// collection and `None` when it left it untouched; nothing is written
    /// in the latter case. A persist failure is logged and swallowed while
    /// the in-memory change is kept — this method is the single seam to
    /// widen should write failures ever need to reach callers.
    pub async fn mutate<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Vec<V>) -> Option<R>,
    {
        let mut items = self.inner.write().await;
        let out = f(&mut items);
        drop(items);
        if out.is_some() {
            if let Err(e) = self.save().await {
                error!(path = %self.file_path.display(), error = %e, "failed to persist collection");
            }
        }
        out
    }
}
