pub mod model;
pub mod validate;
