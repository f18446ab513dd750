use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::Category;
use super::dto::CategoryDto;
use super::repository::{CategoryRepository, RepositoryError};
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

pub const SORTABLE: &[&str] = &["id", "name"];

/// Application service for categories. Same error policy as the product service;
/// a category that still has products cannot be deleted.
pub struct CategoryService<C: CategoryRepository + ?Sized> {
    repo: Arc<C>,
}

impl<C: CategoryRepository + ?Sized> CategoryService<C> {
    pub fn new(repo: Arc<C>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<CategoryDto, ServiceError> {
        let category = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("category", id))?;
        Ok(category.into())
    }

    #[instrument(skip(self))]
    pub async fn find_all_paged(&self, request: PageRequest) -> Result<Page<CategoryDto>, ServiceError> {
        request.ensure_sortable(SORTABLE)?;
        Ok(self.repo.find_page(&request).await?.map(CategoryDto::from))
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn insert(&self, dto: CategoryDto) -> Result<CategoryDto, ServiceError> {
        models::category::validate_name(&dto.name)?;
        let saved = self.repo.save(Category::new(dto.name.trim())).await?;
        info!(id = ?saved.id, "category_created");
        Ok(saved.into())
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: CategoryDto) -> Result<CategoryDto, ServiceError> {
        models::category::validate_name(&dto.name)?;
        let mut category = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("category", id))?;
        category.name = dto.name.trim().to_string();
        let saved = self.repo.save(category).await?;
        info!(id, "category_updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        match self.repo.delete_by_id(id).await {
            Ok(()) => {
                info!(id, "category_deleted");
                Ok(())
            }
            Err(RepositoryError::Integrity(msg)) => {
                info!(id, reason = %msg, "category_delete_blocked");
                Err(ServiceError::Database(format!("category {id} still has products")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
