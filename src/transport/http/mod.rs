pub mod error;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod countries;
    pub mod health;
    pub mod rankings;
}

pub use error::ApiError;
pub use router::{create_router, ApiDoc};
pub use types::AppState;
