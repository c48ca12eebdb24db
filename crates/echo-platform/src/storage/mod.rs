//! Storage backends.
//!
//! All backends implement [`StoragePort`](echo_core::ports::StoragePort)
//! so the core never knows which one it is talking to.

mod auto;
mod file;
mod memory;

pub use auto::open_storage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
