pub mod api;
pub mod error;

// Convenience re-exports
pub use api::client::RustlinksClient;
pub use api::types;
pub use error::{ErrorKind, Result, RustlinksError};
