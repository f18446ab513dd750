use crate::db::connect;
use crate::{category, product, product_category};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set, NotSet};
use anyhow::Result;
use migration::MigratorTrait;

/// Test product <-> category many-to-many wiring
#[tokio::test]
async fn test_product_category_link() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(());
    }

    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;

    let now = chrono::Utc::now().fixed_offset();
    let cat = category::ActiveModel {
        id: NotSet,
        name: Set("Link Test Category".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    let prod = product::ActiveModel {
        id: NotSet,
        name: Set("Link Test Product".into()),
        description: Set("linked".into()),
        price: Set(10.0),
        img_url: Set(String::new()),
        date: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    product_category::ActiveModel { product_id: Set(prod.id), category_id: Set(cat.id) }
        .insert(&db)
        .await?;

    let related = prod.find_related(category::Entity).all(&db).await?;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, cat.id);

    // Category still referenced: the restrict FK must refuse
    assert!(category::Entity::delete_by_id(cat.id).exec(&db).await.is_err());

    // Product delete cascades the link, then the category goes
    product::Entity::delete_by_id(prod.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}
