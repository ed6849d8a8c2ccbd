pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::country_service::CountryService;
pub use domain::model::{Record, SchemaRegistry, TOURISM_ARRIVALS};
pub use domain::validate::{validate_for_insert, validate_for_update, ValidationFailure};
pub use storage::records::{RecordStore, StoreError};
