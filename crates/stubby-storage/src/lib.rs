//! Storage backends for URL mappings.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use stubby_core::repository::{ReadRepository, Repository, Result};
pub use stubby_core::StorageError;
