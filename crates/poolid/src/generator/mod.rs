mod error;
mod interface;
mod lock;
mod pool;
#[cfg(test)]
mod tests;

pub use error::*;
pub use interface::*;
pub use lock::*;
pub use pool::*;
