// Tenant Data Store - generic per-tenant CRUD over the four entity collections.
//
// The physical storage engine lives behind the `TableStore` trait; the shipped
// engine is in-memory. Collections hold dynamic JSON rows with a store-assigned
// id, so the routing layer stays independent of entity shapes.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque reference to one tenant's isolated set of collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreHandle(Uuid);

impl StoreHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The four entity collections every tenant store carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Teachers,
    Students,
    Classes,
    Attendance,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Teachers => "Teachers",
            Collection::Students => "Students",
            Collection::Classes => "Classes",
            Collection::Attendance => "Attendance",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored record: a store-assigned id plus the caller-supplied fields.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: Uuid,
    pub fields: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no {collection} record with id {id}")]
    NotFound { collection: Collection, id: Uuid },
    #[error("tenant store {0} is unavailable")]
    Unavailable(StoreHandle),
}

/// Tenant-scoped table store. Each operation is individually atomic and
/// immediately durable within the engine; reads always reflect the latest
/// write. Cross-collection transactions are deliberately not offered.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Allocate a fresh, empty, isolated store (all four collections present).
    async fn create_store(&self) -> Result<StoreHandle, StoreError>;

    /// All records of a collection in append order.
    async fn list(&self, handle: StoreHandle, collection: Collection) -> Result<Vec<Row>, StoreError>;

    /// Append a record under a freshly assigned, previously unused id.
    async fn insert(
        &self,
        handle: StoreHandle,
        collection: Collection,
        fields: Value,
    ) -> Result<Uuid, StoreError>;

    /// Replace the fields of the record with the given id.
    async fn update(
        &self,
        handle: StoreHandle,
        collection: Collection,
        id: Uuid,
        fields: Value,
    ) -> Result<(), StoreError>;

    /// Remove the record with the given id.
    async fn delete(
        &self,
        handle: StoreHandle,
        collection: Collection,
        id: Uuid,
    ) -> Result<(), StoreError>;

    /// Append several records as one contiguous, all-or-nothing block.
    /// Returns the assigned ids in input order.
    async fn append_batch(
        &self,
        handle: StoreHandle,
        collection: Collection,
        rows: Vec<Value>,
    ) -> Result<Vec<Uuid>, StoreError>;
}
