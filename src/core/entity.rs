//! Block entity used by the service path
//!
//! `BlockEntity` is the full block model: identity, type, settings, props,
//! geometry, visibility and lock flags, plus timestamps. Its type is fixed at
//! construction; every other field changes only through a narrow mutator that
//! touches its own field and stamps `metadata.updated_at`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::block::{merge_props, BlockMetadata, Position, Props, Size};

/// A self-contained, mutable block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEntity {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    settings: Props,
    #[serde(default)]
    props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    size: Size,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    metadata: BlockMetadata,
}

fn default_true() -> bool {
    true
}

impl BlockEntity {
    /// Create a visible, unlocked entity with empty settings and props
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            name: String::new(),
            settings: Props::new(),
            props: Props::new(),
            template: None,
            position: Position::default(),
            size: Size::default(),
            visible: true,
            locked: false,
            metadata: BlockMetadata::now(),
        }
    }

    // -- Construction --------------------------------------------------------

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_settings(mut self, settings: Props) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_metadata(mut self, metadata: BlockMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    // -- Accessors -----------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &Props {
        &self.settings
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Raw render template, if any
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    // -- Mutators ------------------------------------------------------------

    /// Merge `partial` onto the existing settings
    pub fn update_settings(&mut self, partial: Props) {
        merge_props(&mut self.settings, partial);
        self.metadata.touch();
    }

    /// Merge `partial` onto the existing props
    pub fn update_props(&mut self, partial: Props) {
        merge_props(&mut self.props, partial);
        self.metadata.touch();
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
        self.metadata.touch();
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.metadata.touch();
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        self.metadata.touch();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.metadata.touch();
    }

    // -- Predicates ----------------------------------------------------------

    /// Editable when unlocked and visible
    pub fn can_edit(&self) -> bool {
        !self.locked && self.visible
    }

    /// Deletable when unlocked
    pub fn can_delete(&self) -> bool {
        !self.locked
    }

    // -- Copies --------------------------------------------------------------

    /// Independent copy under a new identity; every other field is kept as is
    pub fn clone_with_id(&self, new_id: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.id = new_id.into();
        copy
    }

    /// Plain-data snapshot in the serialized block shape
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild an entity from a snapshot produced by [`BlockEntity::to_json`]
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Caller-supplied data for creating an entity through the service
///
/// Everything except the type is optional; missing fields get defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDraft {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub settings: Option<Props>,
    #[serde(default)]
    pub props: Option<Props>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
}

impl BlockDraft {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            ..Default::default()
        }
    }

    pub fn settings(mut self, settings: Props) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build the entity under `id` with fresh metadata
    pub fn into_entity(self, id: impl Into<String>) -> BlockEntity {
        let mut entity = BlockEntity::new(id, self.block_type)
            .with_settings(self.settings.unwrap_or_default())
            .with_props(self.props.unwrap_or_default())
            .with_position(self.position.unwrap_or_default())
            .with_size(self.size.unwrap_or_default())
            .with_visible(self.visible.unwrap_or(true))
            .with_locked(self.locked.unwrap_or(false));
        if let Some(name) = self.name {
            entity = entity.with_name(name);
        }
        if let Some(template) = self.template {
            entity = entity.with_template(template);
        }
        entity
    }
}
