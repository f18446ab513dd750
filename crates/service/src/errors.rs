use thiserror::Error;

use crate::catalog::repository::RepositoryError;

/// Domain-level failures surfaced by the catalog services.
///
/// Repository and sea-orm error types never cross this boundary: every
/// persistence failure is folded into one of these kinds exactly once.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// A referential dependency blocked the operation.
    #[error("integrity violation: {0}")]
    Database(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self { Self::NotFound(format!("{} {} not found", entity, id)) }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound { .. } => Self::NotFound(e.to_string()),
            RepositoryError::Integrity(msg) => Self::Database(msg),
            RepositoryError::Backend(msg) => Self::Db(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_disjoint_kinds() {
        let nf: ServiceError = RepositoryError::NotFound { entity: "product", id: 7 }.into();
        assert!(matches!(nf, ServiceError::NotFound(ref m) if m == "product 7 not found"));

        let conflict: ServiceError = RepositoryError::Integrity("fk".into()).into();
        assert!(matches!(conflict, ServiceError::Database(_)));

        let backend: ServiceError = RepositoryError::Backend("down".into()).into();
        assert!(matches!(backend, ServiceError::Db(_)));
    }
}
