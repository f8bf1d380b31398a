pub mod outbound;

pub use outbound::{KvStore, StorageError};
