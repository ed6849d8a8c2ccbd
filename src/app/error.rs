use crate::domain::validate::ValidationFailure;
use crate::storage::records::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Country name already exists in the database!")]
    DuplicateKey,

    #[error("That country does not exist")]
    CountryNotFound,

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => ServiceError::DuplicateKey,
            StoreError::InvalidYear(year) => ServiceError::InvalidYear(year),
            StoreError::NotFound(_) => ServiceError::CountryNotFound,
            other => ServiceError::Store(other),
        }
    }
}
