//! Catalog module: domain, repository and service layers for products and
//! categories.

pub mod domain;
pub mod dto;
pub mod repository;
pub mod memory;
pub mod repo;
pub mod product_service;
pub mod category_service;

pub use category_service::CategoryService;
pub use product_service::ProductService;
