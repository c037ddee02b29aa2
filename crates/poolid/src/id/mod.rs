mod uuid;

pub use uuid::*;
