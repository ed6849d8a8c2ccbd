use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Country name already exists in the database!")]
    DuplicateKey,

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("No record stored under '{0}'")]
    NotFound(String),
}
