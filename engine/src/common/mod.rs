pub mod errors;

pub use errors::{ColorError, FetchError, StoreError, ThemeError};
