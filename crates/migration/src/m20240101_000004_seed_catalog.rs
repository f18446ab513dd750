//! Seed a small demo catalog so a fresh database serves non-empty pages.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CATEGORIES: &[&str] = &["Books", "Electronics", "Computers"];

// (name, description, price, img_url, date, categories)
const PRODUCTS: &[(&str, &str, f64, &str, &str, &[&str])] = &[
    (
        "The Lord of the Rings",
        "Three-volume epic fantasy novel.",
        90.5,
        "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img/1-big.jpg",
        "2020-07-13T20:50:07Z",
        &["Books"],
    ),
    (
        "Smart TV",
        "55 inch 4K smart television.",
        2190.0,
        "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img/2-big.jpg",
        "2020-07-14T10:00:00Z",
        &["Electronics", "Computers"],
    ),
    (
        "Macbook Pro",
        "Laptop with 16GB RAM and 512GB SSD.",
        1250.0,
        "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img/3-big.jpg",
        "2020-07-14T10:00:00Z",
        &["Computers"],
    ),
    (
        "PC Gamer",
        "Desktop with dedicated graphics card.",
        1200.0,
        "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img/4-big.jpg",
        "2020-07-14T10:00:00Z",
        &["Computers"],
    ),
];

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn seed_sql() -> String {
    let mut sql = String::new();
    let categories: Vec<String> = CATEGORIES
        .iter()
        .map(|name| format!("({}, NOW(), NOW())", quote(name)))
        .collect();
    sql.push_str(&format!(
        "INSERT INTO category (name, created_at, updated_at) VALUES {};\n",
        categories.join(", ")
    ));

    let products: Vec<String> = PRODUCTS
        .iter()
        .map(|(name, description, price, img_url, date, _)| {
            format!(
                "({}, {}, {}, {}, {}, NOW(), NOW())",
                quote(name),
                quote(description),
                price,
                quote(img_url),
                quote(date)
            )
        })
        .collect();
    sql.push_str(&format!(
        "INSERT INTO product (name, description, price, img_url, date, created_at, updated_at) VALUES {};\n",
        products.join(", ")
    ));

    let links: Vec<String> = PRODUCTS
        .iter()
        .flat_map(|(name, _, _, _, _, cats)| cats.iter().map(move |c| format!("({}, {})", quote(name), quote(c))))
        .collect();
    sql.push_str(&format!(
        "INSERT INTO product_category (product_id, category_id) \
         SELECT p.id, c.id FROM product p JOIN category c ON (p.name, c.name) IN ({});\n",
        links.join(", ")
    ));
    sql
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(&seed_sql()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let products: Vec<String> = PRODUCTS.iter().map(|p| quote(p.0)).collect();
        let categories: Vec<String> = CATEGORIES.iter().map(|c| quote(c)).collect();
        let sql = format!(
            "DELETE FROM product WHERE name IN ({});\nDELETE FROM category WHERE name IN ({});\n",
            products.join(", "),
            categories.join(", ")
        );
        manager.get_connection().execute_unprepared(&sql).await?;
        Ok(())
    }
}
