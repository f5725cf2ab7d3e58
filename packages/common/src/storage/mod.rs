mod error;
mod traits;

pub mod memory;
#[cfg(feature = "remote-store")]
pub mod remote;

pub use error::StorageError;
pub use traits::NameStore;
