//! Service layer providing the catalog's business-oriented CRUD operations.
//! - Separates business logic from data access behind repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Translates every persistence failure into [`errors::ServiceError`].

pub mod errors;
pub mod pagination;
pub mod catalog;
#[cfg(test)]
pub mod test_support;
