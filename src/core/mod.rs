//! Core block abstractions and types
//!
//! This module defines the block data model, block templates, the type and
//! field-renderer registries, and the entity model used by the service path.

pub mod block;
pub mod entity;
pub mod registry;
pub mod renderer;
pub mod template;

pub use block::{new_block_id, Block, BlockMetadata, Position, Props, Size};
pub use entity::{BlockDraft, BlockEntity};
pub use registry::{RegistryError, TypeRegistry};
pub use renderer::{FieldRenderer, FieldRendererRegistry, RendererError};
pub use template::{builtin_templates, BlockTemplate, FieldKind, FieldSpec, FormSchema};
