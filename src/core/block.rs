//! Block record and shared value types
//!
//! This module defines the block record held by the collection store, along
//! with the geometry and metadata types shared with the richer entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Property bag carried by every block.
///
/// Always a key-value mapping at the top level; values are arbitrary JSON.
pub type Props = Map<String, Value>;

/// Generate a new opaque block identifier
///
/// The only contract is uniqueness within the running process.
pub fn new_block_id() -> String {
    Uuid::new_v4().to_string()
}

/// A live block in the collection store
///
/// Serializes to the wire shape `{id, type, name, props}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique block identifier (empty on template defaults)
    #[serde(default)]
    pub id: String,
    /// Registered type identifier
    #[serde(rename = "type")]
    pub block_type: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Block properties
    #[serde(default)]
    pub props: Props,
}

impl Block {
    /// Create a block with no identity yet
    pub fn new(block_type: impl Into<String>, name: impl Into<String>, props: Props) -> Self {
        Self {
            id: String::new(),
            block_type: block_type.into(),
            name: name.into(),
            props,
        }
    }

    /// Whether this block still needs an identity
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Block position on the page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Block dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Bookkeeping attached to entity-path blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    /// When the block was created
    pub created_at: DateTime<Utc>,
    /// When the block was last mutated
    pub updated_at: DateTime<Utc>,
    /// Record schema version
    pub version: u32,
}

impl BlockMetadata {
    /// Metadata for a block created right now
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Stamp the block as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for BlockMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// Shallow-merge `partial` onto `target`, overwriting top-level keys.
pub(crate) fn merge_props(target: &mut Props, partial: Props) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}
