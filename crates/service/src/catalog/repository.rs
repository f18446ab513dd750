use async_trait::async_trait;
use thiserror::Error;

use super::domain::{Category, Product};
use crate::pagination::{Page, PageRequest};

/// Failure signals raised at the persistence boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// Referential conflict, e.g. deleting a row that is still referenced.
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Persistence capability for products.
///
/// `save` inserts when `id` is `None` and overwrites otherwise; overwriting a
/// missing id and deleting a missing id both fail with `NotFound`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError>;
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<Product, RepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError>;
}

/// Persistence capability for categories; same contract as [`ProductRepository`].
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError>;
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Category>, RepositoryError>;
    async fn save(&self, category: Category) -> Result<Category, RepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError>;
}
