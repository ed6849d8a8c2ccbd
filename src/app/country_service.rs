//! The Country Service.
//!
//! Sits between the HTTP handlers and the record store:
//! 1.  Reads go straight to the store.
//! 2.  Writes open one transaction, validate the payload against the schema,
//!     apply it and re-read the stored row, then commit.
//!
//! Any failure drops the transaction before it commits, so a rejected request
//! leaves nothing behind.

use crate::app::error::ServiceError;
use crate::domain::model::{Record, YearProjection};
use crate::domain::validate::{validate_for_insert, validate_for_update};
use crate::storage::records::RecordStore;
use serde_json::{Map, Value as JsonValue};

/// Number of entries in the top ranking endpoint.
pub const TOP_COUNTRIES: u32 = 10;

#[derive(Clone)]
pub struct CountryService {
    store: RecordStore,
}

impl CountryService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub async fn list_countries(&self) -> Result<Vec<Record>, ServiceError> {
        Ok(self.store.fetch_all().await?)
    }

    pub async fn country(&self, name: &str) -> Result<Option<Record>, ServiceError> {
        Ok(self.store.fetch_by_key(name).await?)
    }

    pub async fn year(&self, year: &str) -> Result<YearProjection, ServiceError> {
        Ok(self.store.fetch_year_projection(year).await?)
    }

    pub async fn top_countries(&self) -> Result<Vec<Record>, ServiceError> {
        Ok(self.store.top_n_by_average(TOP_COUNTRIES).await?)
    }

    /// Validates and stores a brand new country.
    pub async fn create_country(
        &self,
        payload: &Map<String, JsonValue>,
    ) -> Result<Record, ServiceError> {
        let mut tx = self.store.begin().await?;
        let record = validate_for_insert(self.store.schema(), payload)?;
        let stored = tx.insert(&record).await?;
        tx.commit().await?;
        tracing::info!(country = %stored.key(), "Country created.");
        Ok(stored)
    }

    /// Validates and applies a partial update to an existing country.
    pub async fn update_country(
        &self,
        name: &str,
        payload: &Map<String, JsonValue>,
    ) -> Result<Record, ServiceError> {
        let mut tx = self.store.begin().await?;
        let existing = tx
            .fetch_by_key(name)
            .await?
            .ok_or(ServiceError::CountryNotFound)?;
        let changes = validate_for_update(&existing, payload)?;
        if changes.is_empty() {
            return Ok(existing);
        }
        let updated = tx.apply_update(&existing, &changes).await?;
        tx.commit().await?;
        tracing::info!(country = %name, fields = changes.len(), "Country updated.");
        Ok(updated)
    }
}
