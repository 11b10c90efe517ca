use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("PostgreSQL not configured: {0}")]
    NotConfigured(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
