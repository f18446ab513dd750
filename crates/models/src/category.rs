use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, product_category};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
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

impl Related<crate::product::Entity> for Entity {
    fn to() -> RelationDef { product_category::Relation::Product.def() }
    fn via() -> Option<RelationDef> { Some(product_category::Relation::Category.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 60;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(errors::ModelError::Validation(format!(
            "category name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}
