use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, product_category};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub img_url: String,
    pub date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ProductCategory }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ProductCategory => Entity::has_many(product_category::Entity).into(),
        }
    }
}

impl Related<product_category::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductCategory.def() }
}

impl Related<crate::category::Entity> for Entity {
    fn to() -> RelationDef { product_category::Relation::Category.def() }
    fn via() -> Option<RelationDef> { Some(product_category::Relation::Product.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 60;
/// Matches the `img_url` column width.
pub const IMG_URL_MAX: usize = 512;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(errors::ModelError::Validation(format!(
            "product name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().is_empty() {
        return Err(errors::ModelError::Validation("description required".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(errors::ModelError::Validation("price must be a positive number".into()));
    }
    Ok(())
}

/// An empty image URL is allowed; anything else must be absolute http(s).
pub fn validate_img_url(u: &str) -> Result<(), errors::ModelError> {
    if u.is_empty() {
        return Ok(());
    }
    if u.chars().count() > IMG_URL_MAX {
        return Err(errors::ModelError::Validation(format!("img_url must be at most {IMG_URL_MAX} characters")));
    }
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(errors::ModelError::Validation("img_url must start with http(s)".into()));
    }
    Ok(())
}
