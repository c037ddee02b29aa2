mod error;
mod uuid;

pub use error::*;
pub use uuid::*;
