pub mod config;
pub mod error;
pub mod format;
pub mod types;

pub use config::SommelierConfig;
pub use error::{Result, SommelierError, ValidationError};
pub use types::*;
