use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{Category, Product};
use super::dto::{CategoryDto, ProductDto};
use super::repository::{CategoryRepository, ProductRepository, RepositoryError};
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Properties `find_all_paged` accepts as sort keys.
pub const SORTABLE: &[&str] = &["id", "name", "price", "date"];

/// Application service for products.
/// Converts between DTOs and domain values and owns the error-mapping policy:
/// callers only ever see [`ServiceError`].
pub struct ProductService<P: ProductRepository + ?Sized, C: CategoryRepository + ?Sized> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository + ?Sized, C: CategoryRepository + ?Sized> ProductService<P, C> {
    pub fn new(products: Arc<P>, categories: Arc<C>) -> Self { Self { products, categories } }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<ProductDto, ServiceError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))?;
        Ok(ProductDto::from(product))
    }

    /// The repository's page, items converted to DTOs, metadata untouched.
    #[instrument(skip(self))]
    pub async fn find_all_paged(&self, request: PageRequest) -> Result<Page<ProductDto>, ServiceError> {
        request.ensure_sortable(SORTABLE)?;
        let page = self.products.find_page(&request).await?;
        debug!(total = page.total_elements, returned = page.number_of_elements, "products_paged");
        Ok(page.map(ProductDto::from))
    }

    /// Persist a new product. Any `id` on the input is ignored.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::catalog::{memory::InMemoryCatalog, dto::{CategoryDto, ProductDto}, ProductService};
    /// let catalog = InMemoryCatalog::seeded();
    /// let svc = ProductService::new(Arc::new(catalog.products()), Arc::new(catalog.categories()));
    /// let dto = ProductDto {
    ///     id: None,
    ///     name: "Phone".into(),
    ///     description: "Good phone".into(),
    ///     price: 800.0,
    ///     img_url: String::new(),
    ///     date: chrono::Utc::now(),
    ///     categories: vec![CategoryDto { id: Some(2), name: String::new() }],
    /// };
    /// let created = tokio_test::block_on(svc.insert(dto)).unwrap();
    /// assert!(created.id.is_some());
    /// assert_eq!(created.categories[0].name, "Electronics");
    /// ```
    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn insert(&self, dto: ProductDto) -> Result<ProductDto, ServiceError> {
        validate(&dto)?;
        let mut product = Product::new(String::new(), String::new(), dto.price, String::new(), dto.date);
        self.copy_dto_to_entity(&dto, &mut product).await?;
        let saved = self.products.save(product).await?;
        info!(id = ?saved.id, "product_created");
        Ok(saved.into())
    }

    /// Overwrite every mutable field and the category set of an existing product.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: ProductDto) -> Result<ProductDto, ServiceError> {
        validate(&dto)?;
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))?;
        self.copy_dto_to_entity(&dto, &mut product).await?;
        let saved = self.products.save(product).await?;
        info!(id, "product_updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        match self.products.delete_by_id(id).await {
            Ok(()) => {
                info!(id, "product_deleted");
                Ok(())
            }
            Err(RepositoryError::Integrity(msg)) => {
                info!(id, reason = %msg, "product_delete_blocked");
                Err(ServiceError::Database(format!("product {id} is referenced by other records")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn copy_dto_to_entity(&self, dto: &ProductDto, product: &mut Product) -> Result<(), ServiceError> {
        product.name = dto.name.trim().to_string();
        product.description = dto.description.clone();
        product.price = dto.price;
        product.img_url = dto.img_url.clone();
        product.date = dto.date;
        let categories = self.resolve_categories(&dto.categories).await?;
        product.set_categories(categories);
        Ok(())
    }

    /// Look every referenced category up once; unknown ids fail the request.
    async fn resolve_categories(&self, refs: &[CategoryDto]) -> Result<Vec<Category>, ServiceError> {
        let mut ids: Vec<i64> = Vec::with_capacity(refs.len());
        for r in refs {
            let id = r.id.ok_or_else(|| ServiceError::Validation("category reference without id".into()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let category = self
                .categories
                .find_by_id(id)
                .await?
                .ok_or_else(|| ServiceError::not_found("category", id))?;
            resolved.push(category);
        }
        Ok(resolved)
    }
}

fn validate(dto: &ProductDto) -> Result<(), ServiceError> {
    models::product::validate_name(&dto.name)?;
    models::product::validate_description(&dto.description)?;
    models::product::validate_price(dto.price)?;
    models::product::validate_img_url(&dto.img_url)?;
    Ok(())
}
