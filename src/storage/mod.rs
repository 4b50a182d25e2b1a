pub mod error;
pub mod memory;
pub mod storage;

pub use error::*;
pub use memory::*;
pub use storage::*;
