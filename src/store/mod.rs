//! Block Collection Store
//!
//! The store owns the ordered sequence of live blocks together with the type
//! registry used to instantiate them. Sequence order is the canonical page
//! order. Every reorder is a swap of two neighbours, so the set of blocks
//! only changes through `add_block`, `remove_block` and `load_blocks`.
//!
//! ## Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `add_block` | Clone a registered template, assign an id, append |
//! | `edit_block` | Replace the props of the block at an index |
//! | `remove_block` | Drop the block with a given id (idempotent) |
//! | `move_next_block` / `move_prev_block` | Swap with the right / left neighbour |
//! | `save` | Post the whole sequence to the configured sink |

pub mod sink;

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::config::StoreConfig;
use crate::core::block::{new_block_id, Block, Props};
use crate::core::registry::{RegistryError, TypeRegistry};
use crate::core::template::BlockTemplate;

use self::sink::{BlockSink, SinkError};

/// Where `save` sends the sequence
#[derive(Clone)]
struct SaveTarget {
    endpoint: Option<String>,
    sink: Arc<dyn BlockSink>,
}

/// Ordered, mutable collection of blocks
pub struct BlockStore {
    blocks: Vec<Block>,
    registry: TypeRegistry,
    target: Option<SaveTarget>,
}

impl BlockStore {
    /// Create an empty store with an empty registry and no sink
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::new())
    }

    /// Create an empty store whose registry holds the built-in templates
    pub fn with_builtins() -> Self {
        Self::with_registry(TypeRegistry::with_builtins())
    }

    /// Create an empty store over an existing registry
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            blocks: Vec::new(),
            registry,
            target: None,
        }
    }

    /// Build a store from configuration, saving through `sink`
    pub fn from_config(config: &StoreConfig, sink: Arc<dyn BlockSink>) -> Self {
        let registry = if config.seed_builtins {
            TypeRegistry::with_builtins()
        } else {
            TypeRegistry::new()
        };
        let mut store = Self::with_registry(registry);
        store.target = Some(SaveTarget {
            endpoint: config.save_endpoint.clone(),
            sink,
        });
        store
    }

    /// Configure the save endpoint and transport
    pub fn with_sink(mut self, endpoint: impl Into<String>, sink: Arc<dyn BlockSink>) -> Self {
        self.target = Some(SaveTarget {
            endpoint: Some(endpoint.into()),
            sink,
        });
        self
    }

    /// Configured save endpoint, if any
    pub fn save_endpoint(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.endpoint.as_deref())
    }

    // -- Registry ------------------------------------------------------------

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Register a template; duplicate types are rejected
    pub fn register_template(&self, template: BlockTemplate) -> Result<(), StoreError> {
        Ok(self.registry.register(template)?)
    }

    /// Every registered template keyed by type
    pub fn get_registered_blocks(&self) -> HashMap<String, Arc<BlockTemplate>> {
        self.registry.templates()
    }

    // -- Queries -------------------------------------------------------------

    /// The ordered block sequence
    pub fn get_blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Index of the block with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // -- Mutations -----------------------------------------------------------

    /// Instantiate a registered template and append it
    ///
    /// The template's default block is cloned; `props`, when given, replaces
    /// the default props wholesale. A fresh id is assigned if the template
    /// does not carry one.
    ///
    /// # Returns
    /// * `Err(StoreError::UnregisteredType)` if `block_type` is unknown
    /// * `Err(StoreError::DuplicateBlockId)` if the template's fixed id is
    ///   already in the sequence
    pub fn add_block(&mut self, block_type: &str, props: Option<Props>) -> Result<&Block, StoreError> {
        let template = self
            .registry
            .get(block_type)
            .ok_or_else(|| StoreError::UnregisteredType(block_type.to_string()))?;

        let mut block = template.instantiate(props);
        if !block.has_id() {
            block.id = new_block_id();
        } else if self.position_of(&block.id).is_some() {
            return Err(StoreError::DuplicateBlockId(block.id));
        }

        tracing::debug!(block_id = %block.id, block_type, "added block");
        self.blocks.push(block);
        let index = self.blocks.len() - 1;
        Ok(&self.blocks[index])
    }

    /// Replace the props of the block at `index`
    ///
    /// # Returns
    /// * `Err(StoreError::IndexOutOfRange)` if `index >= len()`
    pub fn edit_block(&mut self, index: usize, props: Props) -> Result<&Block, StoreError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;

        block.props = props;
        tracing::debug!(block_id = %block.id, index, "edited block props");
        Ok(&*block)
    }

    /// Remove the block with `id`; returns whether anything was removed
    pub fn remove_block(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        let removed = self.blocks.len() != before;
        if removed {
            tracing::debug!(block_id = %id, "removed block");
        }
        removed
    }

    /// Swap the block at `index` with its right neighbour
    ///
    /// A no-op for the last block.
    pub fn move_next_block(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        if index + 1 < self.blocks.len() {
            self.blocks.swap(index, index + 1);
            tracing::debug!(from = index, to = index + 1, "moved block");
        }
        Ok(())
    }

    /// Swap the block at `index` with its left neighbour
    ///
    /// A no-op for the first block.
    pub fn move_prev_block(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        if index > 0 {
            self.blocks.swap(index - 1, index);
            tracing::debug!(from = index, to = index - 1, "moved block");
        }
        Ok(())
    }

    /// Replace the whole sequence with previously saved blocks
    ///
    /// Blocks without an id get a fresh one. Types are not checked against
    /// the registry, so saved pages stay loadable after a template is
    /// retired. On error the store is left unchanged.
    pub fn load_blocks(&mut self, blocks: Vec<Block>) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        let mut loaded = Vec::with_capacity(blocks.len());
        for mut block in blocks {
            if !block.has_id() {
                block.id = new_block_id();
            }
            if !seen.insert(block.id.clone()) {
                return Err(StoreError::DuplicateBlockId(block.id));
            }
            loaded.push(block);
        }

        tracing::debug!(count = loaded.len(), "loaded block sequence");
        self.blocks = loaded;
        Ok(())
    }

    // -- Persistence ---------------------------------------------------------

    /// The body `save` transmits: the ordered sequence as a JSON array
    pub fn to_json(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(&self.blocks)?)
    }

    /// Post the full ordered sequence to the configured sink
    ///
    /// # Returns
    /// * `Err(StoreError::NoSaveEndpoint)` if no endpoint or sink is set
    /// * `Err(StoreError::Sink)` with the transport's error, unmodified
    pub async fn save(&self) -> Result<(), StoreError> {
        let (endpoint, sink) = match &self.target {
            Some(SaveTarget {
                endpoint: Some(endpoint),
                sink,
            }) => (endpoint.as_str(), sink),
            _ => return Err(StoreError::NoSaveEndpoint),
        };

        let body = self.to_json()?;
        sink.post(endpoint, &body).await?;
        tracing::info!(endpoint, count = self.blocks.len(), "saved block sequence");
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.blocks.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        Ok(())
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockStore")
            .field("blocks", &self.blocks)
            .field("registry", &self.registry)
            .field("save_endpoint", &self.save_endpoint())
            .finish()
    }
}

/// Collection store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Instantiating a type with no registered template
    #[error("Block type not registered: {0}")]
    UnregisteredType(String),

    /// Index does not address a block
    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    /// Saving without a configured endpoint
    #[error("No save endpoint configured")]
    NoSaveEndpoint,

    /// An id already present in the sequence
    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
