pub mod validator;

pub use validator::{validate_for_insert, validate_for_update, ValidationFailure};
