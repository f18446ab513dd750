use std::sync::Arc;

use configs::CatalogConfig;
use sea_orm::DatabaseConnection;
use service::catalog::{
    memory::InMemoryCatalog,
    repo::seaorm::{SeaOrmCategoryRepository, SeaOrmProductRepository},
    repository::{CategoryRepository, ProductRepository},
    CategoryService, ProductService,
};

pub type DynProductService = ProductService<dyn ProductRepository, dyn CategoryRepository>;
pub type DynCategoryService = CategoryService<dyn CategoryRepository>;

/// Page size bounds applied to list endpoints.
#[derive(Clone, Copy, Debug)]
pub struct PagingDefaults {
    pub default_size: u64,
    pub max_size: u64,
}

impl From<&CatalogConfig> for PagingDefaults {
    fn from(cfg: &CatalogConfig) -> Self {
        Self { default_size: cfg.default_page_size, max_size: cfg.max_page_size }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<DynProductService>,
    pub categories: Arc<DynCategoryService>,
    pub paging: PagingDefaults,
}

impl ServerState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        paging: PagingDefaults,
    ) -> Self {
        Self {
            products: Arc::new(ProductService::new(products, Arc::clone(&categories))),
            categories: Arc::new(CategoryService::new(categories)),
            paging,
        }
    }

    pub fn postgres(db: DatabaseConnection, paging: PagingDefaults) -> Self {
        let products: Arc<dyn ProductRepository> = Arc::new(SeaOrmProductRepository { db: db.clone() });
        let categories: Arc<dyn CategoryRepository> = Arc::new(SeaOrmCategoryRepository { db });
        Self::new(products, categories, paging)
    }

    pub fn in_memory(catalog: &InMemoryCatalog, paging: PagingDefaults) -> Self {
        let products: Arc<dyn ProductRepository> = Arc::new(catalog.products());
        let categories: Arc<dyn CategoryRepository> = Arc::new(catalog.categories());
        Self::new(products, categories, paging)
    }
}
