//! Integration tests: a page editing session end to end
//!
//! These tests wire the pieces together the way a host does:
//!   config → store (registry + sink) → edits → save → reload
//!   drafts → service (repository) → entity updates
//!   template form → renderer registry lookups

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::config::StoreConfig;
    use crate::core::block::{Block, Props};
    use crate::core::entity::BlockDraft;
    use crate::core::renderer::{FieldRenderer, FieldRendererRegistry};
    use crate::core::template::{FieldKind, FieldSpec, FormSchema};
    use crate::service::repository::InMemoryBlockRepository;
    use crate::service::BlockService;
    use crate::store::sink::MemorySink;
    use crate::store::BlockStore;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    /// Renders a field as `<kind name="key">value</kind>`
    struct TagRenderer {
        id: &'static str,
    }

    impl FieldRenderer for TagRenderer {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            "Tag renderer"
        }

        fn render(&self, key: &str, _field: &FieldSpec, value: Option<&Value>) -> String {
            let value = value.and_then(Value::as_str).unwrap_or_default();
            format!("<{} name=\"{}\">{}</{}>", self.id, key, value, self.id)
        }
    }

    /// Resolve a renderer for every field of a form, recursing into `each`.
    fn render_form(
        renderers: &FieldRendererRegistry,
        form: &FormSchema,
        props: &Props,
        out: &mut Vec<String>,
    ) {
        for (key, field) in form {
            let renderer_id = match field.type_field {
                FieldKind::Text => "text",
                FieldKind::Image => "image",
                FieldKind::EachArray | FieldKind::EachObject => {
                    if let (Some(each), Some(Value::Array(items))) = (&field.each, props.get(key)) {
                        for item in items {
                            if let Value::Object(item_props) = item {
                                render_form(renderers, each, item_props, out);
                            }
                        }
                    }
                    continue;
                }
            };
            if let Some(renderer) = renderers.get(renderer_id) {
                out.push(renderer.render(key, field, props.get(key)));
            }
        }
    }

    // ====================================================================
    // Test 1: edit a page, save it, reload it into a fresh store
    // ====================================================================

    #[tokio::test]
    async fn test_edit_save_reload_session() {
        let config = StoreConfig::from_json_str(
            r#"{"saveEndpoint": "/api/pages/home/blocks", "seedBuiltins": true}"#,
        )
        .unwrap();
        let sink = Arc::new(MemorySink::new());
        let mut store = BlockStore::from_config(&config, sink.clone());

        let hero = store
            .add_block("text-image", Some(props(json!({"text": "Welcome", "image": "hero.png"}))))
            .unwrap()
            .id
            .clone();
        let intro = store.add_block("text", None).unwrap().id.clone();
        let cards = store.add_block("card-list", None).unwrap().id.clone();

        // Move the card list to the top and edit the intro text.
        store.move_prev_block(2).unwrap();
        store.move_prev_block(1).unwrap();
        let intro_index = store.position_of(&intro).unwrap();
        store
            .edit_block(intro_index, props(json!({"content": "About us"})))
            .unwrap();

        let order: Vec<&str> = store.get_blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec![cards.as_str(), hero.as_str(), intro.as_str()]);

        store.save().await.unwrap();

        // Reload what the sink received
        let body = sink.last_body().unwrap();
        let saved: Vec<Block> = serde_json::from_value(body).unwrap();
        let mut reloaded = BlockStore::with_builtins();
        reloaded.load_blocks(saved).unwrap();

        assert_eq!(reloaded.get_blocks(), store.get_blocks());
        assert_eq!(
            reloaded.get_block(&intro).unwrap().props["content"],
            json!("About us")
        );
    }

    // ====================================================================
    // Test 2: template forms resolve through the renderer registry
    // ====================================================================

    #[test]
    fn test_form_rendering_through_registry() {
        let mut store = BlockStore::with_builtins();
        let renderers = FieldRendererRegistry::new();
        renderers.register(Arc::new(TagRenderer { id: "text" })).unwrap();
        renderers.register(Arc::new(TagRenderer { id: "image" })).unwrap();

        let block = store
            .add_block(
                "card-list",
                Some(props(json!({
                    "cards": [
                        {"title": "One", "image": "1.png"},
                        {"title": "Two", "image": "2.png"}
                    ]
                }))),
            )
            .unwrap()
            .clone();

        let template = store.registry().get(&block.block_type).unwrap();
        let mut out = Vec::new();
        render_form(&renderers, &template.form, &block.props, &mut out);

        assert_eq!(
            out,
            vec![
                "<image name=\"image\">1.png</image>",
                "<text name=\"title\">One</text>",
                "<image name=\"image\">2.png</image>",
                "<text name=\"title\">Two</text>",
            ]
        );

        // Re-registering an id replaces the renderer instead of adding one
        renderers.register(Arc::new(TagRenderer { id: "image" })).unwrap();
        assert_eq!(renderers.count(), 2);
    }

    // ====================================================================
    // Test 3: service session with locking
    // ====================================================================

    #[tokio::test]
    async fn test_service_layout_session() {
        let repository = Arc::new(InMemoryBlockRepository::new());
        let service = BlockService::new(repository.clone());

        let header = service
            .create_block(
                BlockDraft::new("text")
                    .name("Header")
                    .settings(props(json!({"fontSize": 32, "weight": "bold"}))),
            )
            .await
            .unwrap();
        let body = service
            .create_block(BlockDraft::new("text").name("Body"))
            .await
            .unwrap();

        service
            .update_block_settings(header.id(), props(json!({"fontSize": 28})))
            .await
            .unwrap();
        service.set_block_locked(header.id(), true).await.unwrap();

        let header = service.get_block(header.id()).await.unwrap().unwrap();
        assert_eq!(header.settings()["fontSize"], json!(28));
        assert_eq!(header.settings()["weight"], json!("bold"));
        assert!(!header.can_delete());

        // The lock is a gate for callers; the service itself does not enforce it.
        assert!(service.delete_block(header.id()).await.unwrap());
        assert_eq!(repository.len(), 1);
        assert_eq!(service.get_all_blocks().await.unwrap()[0].id(), body.id());
    }
}
