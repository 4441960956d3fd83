pub mod checkpointer;
pub mod error;
pub mod memory;
pub mod models;

pub use checkpointer::Checkpointer;
pub use error::PersistError;
pub use memory::InMemoryCheckpointer;
pub use models::ThreadInfo;
