pub mod country_service;
pub mod error;
