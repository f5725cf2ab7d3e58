pub mod config;
pub mod flower;
pub mod registry;
pub mod retry;
pub mod storage;

pub use flower::{FlowerName, normalize_key};
pub use registry::{BatchInterrupted, BatchOutcome, NameRegistry};
pub use storage::{NameStore, StorageError};
