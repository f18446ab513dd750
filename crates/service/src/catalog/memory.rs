//! In-memory catalog store.
//!
//! Backs the `memory` storage mode and the service/endpoint tests. Products and
//! categories share one state so the category-in-use rule holds the same way the
//! relational schema enforces it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::domain::{Category, Product};
use super::repository::{CategoryRepository, ProductRepository, RepositoryError};
use crate::pagination::{Direction, Page, PageRequest};

#[derive(Debug, Clone)]
struct ProductRow {
    name: String,
    description: String,
    price: f64,
    img_url: String,
    date: DateTime<Utc>,
    category_ids: Vec<i64>,
}

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<i64, ProductRow>,
    categories: BTreeMap<i64, String>,
    // Products that something outside the catalog still points at
    held: BTreeSet<i64>,
    last_product_id: i64,
    last_category_id: i64,
}

impl State {
    fn product(&self, id: i64, row: &ProductRow) -> Product {
        let mut p = Product::new(row.name.clone(), row.description.clone(), row.price, row.img_url.clone(), row.date);
        p.id = Some(id);
        p.with_categories(row.category_ids.iter().filter_map(|cid| self.category(*cid)))
    }

    fn category(&self, id: i64) -> Option<Category> {
        self.categories.get(&id).map(|name| Category { id: Some(id), name: name.clone() })
    }

    fn insert_category(&mut self, name: &str) -> i64 {
        self.last_category_id += 1;
        self.categories.insert(self.last_category_id, name.to_string());
        self.last_category_id
    }

    fn insert_product(&mut self, row: ProductRow) -> i64 {
        self.last_product_id += 1;
        self.products.insert(self.last_product_id, row);
        self.last_product_id
    }
}

/// Snapshot of how often each repository operation was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub find_by_id: usize,
    pub find_page: usize,
    pub save: usize,
    pub delete_by_id: usize,
}

#[derive(Debug, Default)]
struct Calls {
    find_by_id: AtomicUsize,
    find_page: AtomicUsize,
    save: AtomicUsize,
    delete_by_id: AtomicUsize,
}

impl Calls {
    fn snapshot(&self) -> CallCounts {
        CallCounts {
            find_by_id: self.find_by_id.load(Ordering::Relaxed),
            find_page: self.find_page.load(Ordering::Relaxed),
            save: self.save.load(Ordering::Relaxed),
            delete_by_id: self.delete_by_id.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for c in [&self.find_by_id, &self.find_page, &self.save, &self.delete_by_id] {
            c.store(0, Ordering::Relaxed);
        }
    }
}

fn bump(counter: &AtomicUsize) { counter.fetch_add(1, Ordering::Relaxed); }

/// Shared in-memory catalog; hand out repositories with [`InMemoryCatalog::products`]
/// and [`InMemoryCatalog::categories`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<State>>,
    product_calls: Arc<Calls>,
    category_calls: Arc<Calls>,
}

impl InMemoryCatalog {
    pub fn new() -> Self { Self::default() }

    /// Catalog preloaded with a few categories and products.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        if let Ok(mut state) = catalog.state.lock() {
            let books = state.insert_category("Books");
            let electronics = state.insert_category("Electronics");
            let computers = state.insert_category("Computers");
            let date = Utc.with_ymd_and_hms(2020, 7, 14, 10, 0, 0).single().unwrap_or_else(Utc::now);
            let seed = [
                ("The Lord of the Rings", "Three-volume epic fantasy novel.", 90.5, vec![books]),
                ("Smart TV", "55 inch 4K smart television.", 2190.0, vec![electronics, computers]),
                ("Macbook Pro", "Laptop with 16GB RAM and 512GB SSD.", 1250.0, vec![computers]),
                ("PC Gamer", "Desktop with dedicated graphics card.", 1200.0, vec![computers]),
            ];
            for (name, description, price, category_ids) in seed {
                state.insert_product(ProductRow {
                    name: name.into(),
                    description: description.into(),
                    price,
                    img_url: String::new(),
                    date,
                    category_ids,
                });
            }
        }
        catalog
    }

    pub fn products(&self) -> InMemoryProductRepository { InMemoryProductRepository { catalog: self.clone() } }

    pub fn categories(&self) -> InMemoryCategoryRepository { InMemoryCategoryRepository { catalog: self.clone() } }

    /// Register an outside reference (an order line, say) that blocks deleting the product.
    pub fn hold_reference(&self, product_id: i64) {
        if let Ok(mut state) = self.state.lock() {
            state.held.insert(product_id);
        }
    }

    pub fn release_reference(&self, product_id: i64) {
        if let Ok(mut state) = self.state.lock() {
            state.held.remove(&product_id);
        }
    }

    pub fn product_calls(&self) -> CallCounts { self.product_calls.snapshot() }

    pub fn category_calls(&self) -> CallCounts { self.category_calls.snapshot() }

    pub fn reset_calls(&self) {
        self.product_calls.reset();
        self.category_calls.reset();
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state.lock().map_err(|_| RepositoryError::Backend("catalog store lock poisoned".into()))
    }
}

fn paginate<T>(mut items: Vec<T>, request: &PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = usize::try_from(request.offset()).unwrap_or(usize::MAX).min(items.len());
    let end = start.saturating_add(usize::try_from(request.size).unwrap_or(usize::MAX)).min(items.len());
    let content: Vec<T> = items.drain(start..end).collect();
    Page::new(content, request, total)
}

#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    catalog: InMemoryCatalog,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        bump(&self.catalog.product_calls.find_by_id);
        let state = self.catalog.lock()?;
        Ok(state.products.get(&id).map(|row| state.product(id, row)))
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError> {
        bump(&self.catalog.product_calls.find_page);
        let state = self.catalog.lock()?;
        let mut all: Vec<Product> = state.products.iter().map(|(id, row)| state.product(*id, row)).collect();
        if let Some(sort) = &request.sort {
            // rows come out in id order and the sort is stable, so ties break by id
            match sort.property.as_str() {
                "name" => all.sort_by(|a, b| a.name.cmp(&b.name)),
                "price" => all.sort_by(|a, b| a.price.total_cmp(&b.price)),
                "date" => all.sort_by(|a, b| a.date.cmp(&b.date)),
                _ => {}
            }
            if sort.direction == Direction::Desc {
                all.reverse();
            }
        }
        Ok(paginate(all, request))
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        bump(&self.catalog.product_calls.save);
        let mut state = self.catalog.lock()?;
        let category_ids = product.category_ids();
        if let Some(missing) = category_ids.iter().find(|cid| !state.categories.contains_key(cid)) {
            return Err(RepositoryError::Integrity(format!("category {missing} does not exist")));
        }
        let row = ProductRow {
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            category_ids,
        };
        let id = match product.id {
            None => state.insert_product(row.clone()),
            Some(id) => match state.products.get_mut(&id) {
                Some(existing) => {
                    *existing = row.clone();
                    id
                }
                None => return Err(RepositoryError::NotFound { entity: "product", id }),
            },
        };
        Ok(state.product(id, &row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        bump(&self.catalog.product_calls.delete_by_id);
        let mut state = self.catalog.lock()?;
        if !state.products.contains_key(&id) {
            return Err(RepositoryError::NotFound { entity: "product", id });
        }
        if state.held.contains(&id) {
            return Err(RepositoryError::Integrity(format!("product {id} is still referenced")));
        }
        state.products.remove(&id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    catalog: InMemoryCatalog,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        bump(&self.catalog.category_calls.find_by_id);
        let state = self.catalog.lock()?;
        Ok(state.category(id))
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Category>, RepositoryError> {
        bump(&self.catalog.category_calls.find_page);
        let state = self.catalog.lock()?;
        let mut all: Vec<Category> = state
            .categories
            .iter()
            .map(|(id, name)| Category { id: Some(*id), name: name.clone() })
            .collect();
        if let Some(sort) = &request.sort {
            if sort.property == "name" {
                all.sort_by(|a, b| a.name.cmp(&b.name));
            }
            if sort.direction == Direction::Desc {
                all.reverse();
            }
        }
        Ok(paginate(all, request))
    }

    async fn save(&self, category: Category) -> Result<Category, RepositoryError> {
        bump(&self.catalog.category_calls.save);
        let mut state = self.catalog.lock()?;
        let id = match category.id {
            None => state.insert_category(&category.name),
            Some(id) => match state.categories.get_mut(&id) {
                Some(name) => {
                    name.clone_from(&category.name);
                    id
                }
                None => return Err(RepositoryError::NotFound { entity: "category", id }),
            },
        };
        Ok(Category { id: Some(id), name: category.name })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        bump(&self.catalog.category_calls.delete_by_id);
        let mut state = self.catalog.lock()?;
        if !state.categories.contains_key(&id) {
            return Err(RepositoryError::NotFound { entity: "category", id });
        }
        if state.products.values().any(|p| p.category_ids.contains(&id)) {
            return Err(RepositoryError::Integrity(format!("category {id} still has products")));
        }
        state.categories.remove(&id);
        Ok(())
    }
}
