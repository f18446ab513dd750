//! Transfer objects for request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Category, Product};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self { Self { id: c.id, name: c.name } }
}

impl From<&Category> for CategoryDto {
    fn from(c: &Category) -> Self { Self { id: c.id, name: c.name.clone() } }
}

/// Flat projection of [`Product`] plus its categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub img_url: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            img_url: p.img_url.clone(),
            date: p.date,
            categories: p.categories().iter().map(CategoryDto::from).collect(),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self { Self::from(&p) }
}
