//! Custom field renderer registry
//!
//! A named-plugin store that the form layer uses to resolve a field kind
//! identifier to a rendering strategy. Unlike the type registry, registering
//! an id that is already present replaces the previous renderer (with a
//! warning), so renderers can be swapped at runtime.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::template::FieldSpec;

/// A rendering strategy for one kind of form field
pub trait FieldRenderer: Send + Sync {
    /// Registry key
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Render the editor for field `key` with its current value
    fn render(&self, key: &str, field: &FieldSpec, value: Option<&Value>) -> String;
}

#[derive(Default)]
struct Entries {
    renderers: HashMap<String, Arc<dyn FieldRenderer>>,
    /// Registration order of the ids in `renderers`
    order: Vec<String>,
}

/// Registry of field renderers keyed by id
#[derive(Clone, Default)]
pub struct FieldRendererRegistry {
    entries: Arc<RwLock<Entries>>,
}

impl FieldRendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any renderer with the same id
    ///
    /// # Returns
    /// * `Err(RendererError::MissingId)` if the renderer's id is empty
    pub fn register(&self, renderer: Arc<dyn FieldRenderer>) -> Result<(), RendererError> {
        let id = renderer.id().to_string();
        if id.is_empty() {
            return Err(RendererError::MissingId);
        }

        let mut entries = self.entries.write();
        if entries.renderers.insert(id.clone(), renderer).is_some() {
            tracing::warn!(renderer_id = %id, "overwriting existing field renderer");
        } else {
            tracing::debug!(renderer_id = %id, "registered field renderer");
            entries.order.push(id);
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn FieldRenderer>> {
        self.entries.read().renderers.get(id).cloned()
    }

    pub fn has(&self, id: &str) -> bool {
        self.entries.read().renderers.contains_key(id)
    }

    /// Remove a renderer; returns whether one was registered under `id`
    pub fn unregister(&self, id: &str) -> bool {
        let mut entries = self.entries.write();
        if entries.renderers.remove(id).is_none() {
            return false;
        }
        entries.order.retain(|existing| existing != id);
        true
    }

    /// Detached copy of the full mapping
    pub fn get_all(&self) -> HashMap<String, Arc<dyn FieldRenderer>> {
        self.entries.read().renderers.clone()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.renderers.clear();
        entries.order.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.read().renderers.len()
    }

    /// Registered ids in registration order
    pub fn get_ids(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }
}

impl std::fmt::Debug for FieldRendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRendererRegistry")
            .field("ids", &self.get_ids())
            .finish()
    }
}

/// Renderer registry errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RendererError {
    /// Renderer has an empty id
    #[error("Field renderer must have a non-empty id")]
    MissingId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticRenderer {
        id: String,
        label: String,
    }

    impl StaticRenderer {
        fn new(id: &str, label: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.into(),
                label: label.into(),
            })
        }
    }

    impl FieldRenderer for StaticRenderer {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.label
        }

        fn render(&self, key: &str, _field: &FieldSpec, value: Option<&Value>) -> String {
            format!("{}:{}={}", self.label, key, value.cloned().unwrap_or(Value::Null))
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = FieldRendererRegistry::new();
        registry.register(StaticRenderer::new("color", "Color")).unwrap();

        assert!(registry.has("color"));
        assert_eq!(registry.count(), 1);

        let renderer = registry.get("color").unwrap();
        assert_eq!(renderer.name(), "Color");
        let out = renderer.render("bg", &FieldSpec::text("x"), Some(&json!("red")));
        assert_eq!(out, "Color:bg=\"red\"");
    }

    #[test]
    fn test_missing_id_rejected() {
        let registry = FieldRendererRegistry::new();
        let result = registry.register(StaticRenderer::new("", "Nameless"));
        assert_eq!(result.unwrap_err(), RendererError::MissingId);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_reregister_overwrites() {
        let registry = FieldRendererRegistry::new();
        registry.register(StaticRenderer::new("color", "Old")).unwrap();
        registry.register(StaticRenderer::new("color", "New")).unwrap();

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get("color").unwrap().name(), "New");
        assert_eq!(registry.get_ids(), vec!["color"]);
    }

    #[test]
    fn test_unregister_reports_removal() {
        let registry = FieldRendererRegistry::new();
        registry.register(StaticRenderer::new("color", "Color")).unwrap();

        assert!(registry.unregister("color"));
        assert!(!registry.unregister("color"));
        assert!(registry.get("color").is_none());
        assert!(registry.get_ids().is_empty());
    }

    #[test]
    fn test_get_all_is_a_copy() {
        let registry = FieldRendererRegistry::new();
        registry.register(StaticRenderer::new("a", "A")).unwrap();

        let mut all = registry.get_all();
        all.clear();
        all.insert("b".into(), StaticRenderer::new("b", "B"));

        assert_eq!(registry.count(), 1);
        assert!(registry.has("a"));
        assert!(!registry.has("b"));
    }

    #[test]
    fn test_ids_follow_registration_order() {
        let registry = FieldRendererRegistry::new();
        for id in ["slider", "color", "date"] {
            registry.register(StaticRenderer::new(id, id)).unwrap();
        }
        assert_eq!(registry.get_ids(), vec!["slider", "color", "date"]);

        registry.clear();
        assert_eq!(registry.count(), 0);
        assert!(registry.get_ids().is_empty());
    }
}
