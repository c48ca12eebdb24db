//! Platform adapters: concrete storage backends and generation clients
//! behind the core port traits.

pub mod llm;
pub mod storage;
