//! Block Composer - typed page blocks
//!
//! This crate lets a host application compose a page out of typed blocks.
//! It provides the block data model and templates, a strict type registry,
//! an ordered block collection with a pluggable save sink, an async block
//! service over a pluggable repository, and a field renderer registry for
//! form layers.

pub mod config;
pub mod core;
pub mod logging;
pub mod service;
pub mod store;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use crate::config::StoreConfig;
pub use crate::core::{Block, BlockEntity, BlockTemplate, TypeRegistry};
pub use crate::service::BlockService;
pub use crate::store::BlockStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
