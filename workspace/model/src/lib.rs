pub mod entities;
pub mod error;
pub mod password;
pub mod schema;
pub mod store;
pub mod wire;

pub use error::{Result, StoreError};

// Re-export tracing for use in this crate
pub use tracing;
