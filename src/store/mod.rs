//! Backing-store seams. Handlers only see these traits; `main` injects the real clients
//! and tests inject in-memory ones.

pub mod document;
pub mod object;
pub mod relational;

use crate::error::StoreError;
use crate::model::{
    BucketEntry, ObjectEntry, Product, ProductInput, UploadReceipt, UploadedFile, User, UserInput,
};
use async_trait::async_trait;

pub use document::MongoUserStore;
pub use object::S3ObjectStore;
pub use relational::MySqlProductStore;

/// User records in the document store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// One arbitrary read. `Ok(true)` when at least one user exists.
    async fn probe(&self) -> Result<bool, StoreError>;
    async fn create(&self, input: UserInput) -> Result<User, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    /// `Ok(None)` for an unknown or malformed id.
    async fn get(&self, id: &str) -> Result<Option<User>, StoreError>;
    /// Sets the provided fields and returns the record after the update.
    async fn update(&self, id: &str, input: UserInput) -> Result<Option<User>, StoreError>;
    /// `Ok(false)` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Product rows in the relational store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Create the database and table if absent. Safe to call repeatedly.
    async fn init_schema(&self) -> Result<(), StoreError>;
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;
    /// Returns the generated id.
    async fn create(&self, input: ProductInput) -> Result<u64, StoreError>;
    /// `Ok(false)` when no row matched.
    async fn update(&self, id: i64, input: ProductInput) -> Result<bool, StoreError>;
    /// `Ok(false)` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Buckets and objects in object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketEntry>, StoreError>;
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectEntry>, StoreError>;
    /// Stores `file` under its own file name, overwriting any existing object.
    async fn put_object(&self, bucket: &str, file: UploadedFile) -> Result<UploadReceipt, StoreError>;
    /// Succeeds whether or not the object existed.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;
}
