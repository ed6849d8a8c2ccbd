pub mod error;
pub mod sqlite;

pub use error::StoreError;
pub use sqlite::{RecordStore, RecordTx};
