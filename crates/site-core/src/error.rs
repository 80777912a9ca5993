//! Errors raised while bringing up shared infrastructure

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to run database migrations: {0}")]
    Migration(String),
}

/// Result type alias for infrastructure setup
pub type ServiceResult<T> = Result<T, ServiceError>;
