use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, NotSet, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use models::{category, product, product_category};

use crate::catalog::domain::{Category, Product};
use crate::catalog::repository::{CategoryRepository, ProductRepository, RepositoryError};
use crate::pagination::{Direction, Page, PageRequest};

/// Fold sea-orm errors into the repository signals. Foreign-key and unique
/// violations are referential conflicts; everything else is a backend failure.
fn map_db_err(e: DbErr) -> RepositoryError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepositoryError::Integrity(msg),
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepositoryError::Integrity(msg),
        _ => RepositoryError::Backend(e.to_string()),
    }
}

fn order_of(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    }
}

fn category_from_model(m: category::Model) -> Category { Category { id: Some(m.id), name: m.name } }

fn product_from_model(m: product::Model, categories: Vec<category::Model>) -> Product {
    let mut p = Product::new(m.name, m.description, m.price, m.img_url, m.date.with_timezone(&Utc));
    p.id = Some(m.id);
    p.with_categories(categories.into_iter().map(category_from_model))
}

/// SeaORM-backed product repository.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    async fn with_categories<C: ConnectionTrait>(db: &C, model: product::Model) -> Result<Product, RepositoryError> {
        let categories = model
            .find_related(category::Entity)
            .order_by_asc(category::Column::Id)
            .all(db)
            .await
            .map_err(map_db_err)?;
        Ok(product_from_model(model, categories))
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let found = product::Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;
        match found {
            Some(m) => Ok(Some(Self::with_categories(&self.db, m).await?)),
            None => Ok(None),
        }
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError> {
        let mut select = product::Entity::find();
        if let Some(sort) = &request.sort {
            let column = match sort.property.as_str() {
                "name" => product::Column::Name,
                "price" => product::Column::Price,
                "date" => product::Column::Date,
                _ => product::Column::Id,
            };
            select = select.order_by(column, order_of(sort.direction));
        }
        // Stable paging needs a total order
        let paginator = select.order_by_asc(product::Column::Id).paginate(&self.db, request.size);
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator.fetch_page(request.page).await.map_err(map_db_err)?;
        let mut content = Vec::with_capacity(rows.len());
        for m in rows {
            content.push(Self::with_categories(&self.db, m).await?);
        }
        debug!(page = request.page, size = request.size, total, "product_page_loaded");
        Ok(Page::new(content, request, total))
    }

    async fn save(&self, p: Product) -> Result<Product, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let now = Utc::now().fixed_offset();
        let category_ids = p.category_ids();
        let model = match p.id {
            None => product::ActiveModel {
                id: NotSet,
                name: Set(p.name),
                description: Set(p.description),
                price: Set(p.price),
                img_url: Set(p.img_url),
                date: Set(p.date.fixed_offset()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?,
            Some(id) => {
                let mut am: product::ActiveModel = product::Entity::find_by_id(id)
                    .one(&txn)
                    .await
                    .map_err(map_db_err)?
                    .ok_or(RepositoryError::NotFound { entity: "product", id })?
                    .into();
                am.name = Set(p.name);
                am.description = Set(p.description);
                am.price = Set(p.price);
                am.img_url = Set(p.img_url);
                am.date = Set(p.date.fixed_offset());
                am.updated_at = Set(now);
                am.update(&txn).await.map_err(map_db_err)?
            }
        };

        // Replace the link set wholesale
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(model.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if !category_ids.is_empty() {
            let links: Vec<product_category::ActiveModel> = category_ids
                .iter()
                .map(|cid| product_category::ActiveModel { product_id: Set(model.id), category_id: Set(*cid) })
                .collect();
            product_category::Entity::insert_many(links).exec_without_returning(&txn).await.map_err(map_db_err)?;
        }

        let saved = Self::with_categories(&txn, model).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await.map_err(map_db_err)?;
        if res.rows_affected == 0 {
            return Err(RepositoryError::NotFound { entity: "product", id });
        }
        Ok(())
    }
}

/// SeaORM-backed category repository.
pub struct SeaOrmCategoryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let found = category::Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;
        Ok(found.map(category_from_model))
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Category>, RepositoryError> {
        let mut select = category::Entity::find();
        if let Some(sort) = &request.sort {
            let column = match sort.property.as_str() {
                "name" => category::Column::Name,
                _ => category::Column::Id,
            };
            select = select.order_by(column, order_of(sort.direction));
        }
        let paginator = select.order_by_asc(category::Column::Id).paginate(&self.db, request.size);
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator.fetch_page(request.page).await.map_err(map_db_err)?;
        Ok(Page::new(rows.into_iter().map(category_from_model).collect(), request, total))
    }

    async fn save(&self, c: Category) -> Result<Category, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = match c.id {
            None => category::ActiveModel { id: NotSet, name: Set(c.name), created_at: Set(now), updated_at: Set(now) }
                .insert(&self.db)
                .await
                .map_err(map_db_err)?,
            Some(id) => {
                let mut am: category::ActiveModel = category::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(map_db_err)?
                    .ok_or(RepositoryError::NotFound { entity: "category", id })?
                    .into();
                am.name = Set(c.name);
                am.updated_at = Set(now);
                am.update(&self.db).await.map_err(map_db_err)?
            }
        };
        Ok(category_from_model(model))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let res = category::Entity::delete_by_id(id).exec(&self.db).await.map_err(map_db_err)?;
        if res.rows_affected == 0 {
            return Err(RepositoryError::NotFound { entity: "category", id });
        }
        Ok(())
    }
}
