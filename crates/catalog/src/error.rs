//! Error types for marketplace operations.

use catalog_core::{CatalogError, ValidationError};
use catalog_db::DatabaseError;
use thiserror::Error;

/// Errors that can occur during marketplace operations.
///
/// Permission failures are not errors here; they come back as
/// [`Decision::Denied`](crate::Decision::Denied).
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Input rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Lookup by id or email found nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violated (cpf, email, admin_id, one advertisement per vehicle).
    #[error("{entity} already exists: {id}")]
    Integrity { entity: &'static str, id: String },

    /// Entity rule broken, such as an advertisement leaving a terminal status.
    #[error(transparent)]
    Catalog(CatalogError),

    /// Store failure.
    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for MarketplaceError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::AlreadyExists { entity, id } => MarketplaceError::Integrity { entity, id },
            DatabaseError::NotFound { entity, id } => MarketplaceError::NotFound { entity, id },
            DatabaseError::Validation(v) => MarketplaceError::Validation(v),
            other => MarketplaceError::Database(other),
        }
    }
}

impl From<CatalogError> for MarketplaceError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(v) => MarketplaceError::Validation(v),
            CatalogError::NotFound { entity, id } => MarketplaceError::NotFound { entity, id },
            other => MarketplaceError::Catalog(other),
        }
    }
}

/// Result type for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketplaceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::AdStatus;

    #[test]
    fn test_store_errors_map_to_the_taxonomy() {
        let err: MarketplaceError = DatabaseError::AlreadyExists {
            entity: "User",
            id: "ana@email.com".to_string(),
        }
        .into();
        assert!(matches!(err, MarketplaceError::Integrity { entity: "User", .. }));

        let err: MarketplaceError = DatabaseError::NotFound {
            entity: "Advertisement",
            id: "9".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Advertisement not found: 9");
    }

    #[test]
    fn test_entity_errors_keep_validation_separate() {
        let err: MarketplaceError = CatalogError::from(ValidationError::Empty("name".to_string())).into();
        assert!(matches!(err, MarketplaceError::Validation(_)));

        let err: MarketplaceError = CatalogError::InvalidTransition {
            from: AdStatus::Approved,
            to: AdStatus::Pending,
        }
        .into();
        assert!(matches!(err, MarketplaceError::Catalog(_)));
    }
}
