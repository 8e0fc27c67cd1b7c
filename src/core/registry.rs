//! Type Registry - Central registry of block templates
//!
//! This module maps type identifiers to the templates used to instantiate new
//! blocks. Registration is strict: a type identifier can be registered exactly
//! once, and a second registration is rejected rather than shadowing the
//! first template.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::template::{builtin_templates, BlockTemplate};

/// Registry of block templates keyed by type identifier
///
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct TypeRegistry {
    templates: Arc<RwLock<HashMap<String, Arc<BlockTemplate>>>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    ///
    /// # Example
    /// ```
    /// use block_composer::core::registry::TypeRegistry;
    ///
    /// let registry = TypeRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            templates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry seeded with the built-in templates
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        {
            let mut templates = registry.templates.write();
            for template in builtin_templates() {
                templates.insert(template.block_type().to_string(), Arc::new(template));
            }
        }
        tracing::info!(count = registry.count(), "seeded built-in block templates");
        registry
    }

    /// Register a template under its type identifier
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(RegistryError::DuplicateType)` if the type is already registered;
    ///   the existing template is left untouched
    /// * `Err(RegistryError::InvalidTemplate)` if the type identifier is empty
    pub fn register(&self, template: BlockTemplate) -> Result<(), RegistryError> {
        Self::validate_template(&template)?;

        let block_type = template.block_type().to_string();
        let mut templates = self.templates.write();

        if templates.contains_key(&block_type) {
            return Err(RegistryError::DuplicateType(block_type));
        }

        tracing::debug!(block_type = %block_type, "registered block template");
        templates.insert(block_type, Arc::new(template));
        Ok(())
    }

    /// Check if a type is registered
    pub fn has(&self, block_type: &str) -> bool {
        self.templates.read().contains_key(block_type)
    }

    /// Get the template for a type, if registered
    pub fn get(&self, block_type: &str) -> Option<Arc<BlockTemplate>> {
        self.templates.read().get(block_type).cloned()
    }

    /// Snapshot of every registered template
    pub fn templates(&self) -> HashMap<String, Arc<BlockTemplate>> {
        self.templates.read().clone()
    }

    /// Registered type identifiers, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.templates.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Get the number of registered templates
    pub fn count(&self) -> usize {
        self.templates.read().len()
    }

    fn validate_template(template: &BlockTemplate) -> Result<(), RegistryError> {
        if template.block_type().trim().is_empty() {
            return Err(RegistryError::InvalidTemplate(
                "Template type cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types())
            .finish()
    }
}

/// Registry error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a type that is already known
    #[error("Block type already registered: {0}")]
    DuplicateType(String),

    /// Template failed validation
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}
