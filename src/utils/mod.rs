pub mod date_format;
pub mod numeric_id;
pub mod validate;

pub use validate::{ValidatedJson, ValidatedQuery};
