use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Human-readable reason without the variant prefix, suitable for clients.
    pub fn reason(&self) -> String {
        match self {
            DomainError::NotFound {
                entity,
                field,
                value,
            } => format!("{} with {} '{}' not found", entity, field, value),
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg) => msg.clone(),
            DomainError::Storage(_) => "Internal storage error".to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the whole request may succeed if the caller retries it.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_) | DomainError::Conflict(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
