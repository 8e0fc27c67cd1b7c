//! Block templates and form schemas
//!
//! A template is the registered default shape for one block type: the block
//! that gets cloned on instantiation, plus a form description that an
//! external form layer uses to build an editor for the block's props.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use super::block::{Block, Props};

/// Form description: field name → field metadata
pub type FormSchema = BTreeMap<String, FieldSpec>;

/// Kind of editor a form field needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    /// Single-line or multi-line text
    Text,
    /// Image reference
    Image,
    /// Array whose items follow the `each` sub-schema
    EachArray,
    /// Object whose fields follow the `each` sub-schema
    EachObject,
}

impl FieldKind {
    /// Whether this kind carries a nested `each` schema
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldKind::EachArray | FieldKind::EachObject)
    }
}

/// Descriptor for one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Editor kind
    pub type_field: FieldKind,
    /// Optional placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Sub-schema for array/object kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub each: Option<FormSchema>,
}

impl FieldSpec {
    pub fn text(placeholder: impl Into<String>) -> Self {
        Self {
            type_field: FieldKind::Text,
            placeholder: Some(placeholder.into()),
            each: None,
        }
    }

    pub fn image(placeholder: impl Into<String>) -> Self {
        Self {
            type_field: FieldKind::Image,
            placeholder: Some(placeholder.into()),
            each: None,
        }
    }

    pub fn each_array(each: FormSchema) -> Self {
        Self {
            type_field: FieldKind::EachArray,
            placeholder: None,
            each: Some(each),
        }
    }

    pub fn each_object(each: FormSchema) -> Self {
        Self {
            type_field: FieldKind::EachObject,
            placeholder: None,
            each: Some(each),
        }
    }
}

/// Registered default shape for a block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    /// Default block cloned on instantiation
    pub block: Block,
    /// Form description for the block's props
    #[serde(default)]
    pub form: FormSchema,
}

impl BlockTemplate {
    pub fn new(
        block_type: impl Into<String>,
        name: impl Into<String>,
        props: Props,
        form: FormSchema,
    ) -> Self {
        Self {
            block: Block::new(block_type, name, props),
            form,
        }
    }

    /// Stable type identifier
    pub fn block_type(&self) -> &str {
        &self.block.block_type
    }

    pub fn name(&self) -> &str {
        &self.block.name
    }

    /// Default props
    pub fn props(&self) -> &Props {
        &self.block.props
    }

    /// Clone the default block.
    ///
    /// Supplied `props` replace the defaults wholesale; they are never merged.
    /// The clone keeps whatever id the template's default block carries.
    pub fn instantiate(&self, props: Option<Props>) -> Block {
        let mut block = self.block.clone();
        if let Some(props) = props {
            block.props = props;
        }
        block
    }
}

fn props_of(value: serde_json::Value) -> Props {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

/// Templates seeded into a registry in bootstrap mode
pub fn builtin_templates() -> Vec<BlockTemplate> {
    let text = BlockTemplate::new(
        "text",
        "Text",
        props_of(json!({ "content": "Text" })),
        BTreeMap::from([("content".to_string(), FieldSpec::text("Enter text"))]),
    );

    let text_image = BlockTemplate::new(
        "text-image",
        "Text with image",
        props_of(json!({
            "text": "Text",
            "image": "https://via.placeholder.com/150"
        })),
        BTreeMap::from([
            ("text".to_string(), FieldSpec::text("Enter text")),
            ("image".to_string(), FieldSpec::image("Image URL")),
        ]),
    );

    let card_list = BlockTemplate::new(
        "card-list",
        "Card list",
        props_of(json!({
            "cards": [
                { "title": "Card", "image": "https://via.placeholder.com/150" }
            ]
        })),
        BTreeMap::from([(
            "cards".to_string(),
            FieldSpec::each_array(BTreeMap::from([
                ("title".to_string(), FieldSpec::text("Card title")),
                ("image".to_string(), FieldSpec::image("Card image URL")),
            ])),
        )]),
    );

    vec![text, text_image, card_list]
}
