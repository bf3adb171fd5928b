use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::storage::json_array_store::JsonArrayStore;

/// An invoice is an open JSON object. No schema is enforced, and the `id`
/// field, when present, is caller-supplied — never generated or validated.
pub type Invoice = Map<String, Value>;

/// File-backed invoice collection.
///
/// Holds the authoritative in-memory sequence (insertion order) and mirrors
/// it to a JSON file after every mutation. Duplicate or missing `id` values
/// are tolerated; lookups act on the first match.
#[derive(Clone)]
pub struct InvoiceStore {
    store: Arc<JsonArrayStore<Invoice>>,
}

/// Only a JSON string `id` can match a path identifier; comparison is exact,
/// with no normalization.
fn id_matches(invoice: &Invoice, id: &str) -> bool {
    invoice.get("id").and_then(Value::as_str) == Some(id)
}

impl InvoiceStore {
    /// Initialize the store from the given file path. A missing or corrupt
    /// file starts the collection empty (logged, not raised).
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonArrayStore::<Invoice>::new(path).await;
        Arc::new(Self { store })
    }

    /// All invoices in insertion order.
    pub async fn list(&self) -> Vec<Invoice> {
        self.store.list().await
    }

    /// First invoice whose `id` field equals the given identifier.
    pub async fn get(&self, id: &str) -> Option<Invoice> {
        self.store
            .find(|items| items.iter().find(|inv| id_matches(inv, id)).cloned())
            .await
    }

    /// Append the payload verbatim and persist. No identifier is generated
    /// and duplicate ids are not rejected.
    pub async fn create(&self, payload: Invoice) -> Invoice {
        self.store
            .mutate(|items| {
                items.push(payload.clone());
                Some(payload)
            })
            .await
            .expect("create always mutates")
    }

    /// Shallow-merge `patch` over the first invoice matching `id`, persist,
    /// and return the merged record. Patch fields win on key collision;
    /// fields absent from the patch are preserved (including `id`, unless
    /// the patch itself carries one).
    pub async fn update(&self, id: &str, patch: Invoice) -> Result<Invoice, ServiceError> {
        self.store
            .mutate(|items| {
                let existing = items.iter_mut().find(|inv| id_matches(inv, id))?;
                for (key, value) in patch {
                    existing.insert(key, value);
                }
                Some(existing.clone())
            })
            .await
            .ok_or_else(|| ServiceError::not_found("Invoice"))
    }

    /// Remove the first invoice matching `id`, persist, and return the
    /// removed record. The rest of the sequence keeps its order.
    pub async fn delete(&self, id: &str) -> Result<Invoice, ServiceError> {
        self.store
            .mutate(|items| {
                let index = items.iter().position(|inv| id_matches(inv, id))?;
                Some(items.remove(index))
            })
            .await
            .ok_or_else(|| ServiceError::not_found("Invoice"))
    }
}
