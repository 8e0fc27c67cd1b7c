//! WASM API: `#[wasm_bindgen]` exports for a JavaScript page editor.
//!
//! This module is only compiled when targeting `wasm32`. It holds one
//! [`BlockStore`] per thread and speaks JSON strings in both directions:
//! - `init_store` / `destroy_store`: lifecycle
//! - `add_block` / `edit_block` / `remove_block`: mutation
//! - `move_next_block` / `move_prev_block`: reordering
//! - `get_blocks` / `get_registered_blocks`: queries
//! - `load_blocks` / `save`: persistence through a host callback

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::StoreConfig;
use crate::core::block::{Block, Props};
use crate::store::{BlockStore, StoreError};

// ── Global state ────────────────────────────────────────────────────────────

struct WasmStore {
    store: BlockStore,
    /// The host posts saved sequences itself, so only the endpoint lives here.
    save_endpoint: Option<String>,
}

thread_local! {
    static STORE: RefCell<Option<WasmStore>> = RefCell::new(None);
}

fn with_state<R>(f: impl FnOnce(&mut WasmStore) -> R) -> Result<R, String> {
    STORE.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(state) => Ok(f(state)),
            None => Err("Store not initialized. Call init_store() first.".into()),
        }
    })
}

fn with_store<R>(f: impl FnOnce(&mut BlockStore) -> R) -> Result<R, String> {
    with_state(|state| f(&mut state.store))
}

// ── JSON interchange types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct AddBlockJson {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    props: Option<Props>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct RemovedResponse {
    removed: bool,
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn json_err(msg: impl Into<String>) -> String {
    json_of(&ErrorResponse { error: msg.into() })
}

fn json_block(result: Result<Result<Block, StoreError>, String>) -> String {
    match result {
        Ok(Ok(block)) => json_of(&block),
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

fn json_unit(result: Result<Result<(), StoreError>, String>) -> String {
    match result {
        Ok(Ok(())) => json_of(&OkResponse { ok: true }),
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

// ── Exported functions ──────────────────────────────────────────────────────

/// Create the store. `config_json` uses the [`StoreConfig`] shape.
#[wasm_bindgen]
pub fn init_store(config_json: &str) -> String {
    console_error_panic_hook::set_once();

    let config = match StoreConfig::from_json_str(config_json) {
        Ok(c) => c,
        Err(e) => return json_err(e.to_string()),
    };

    let store = if config.seed_builtins {
        BlockStore::with_builtins()
    } else {
        BlockStore::new()
    };

    STORE.with(|cell| {
        *cell.borrow_mut() = Some(WasmStore {
            store,
            save_endpoint: config.save_endpoint,
        });
    });
    json_of(&OkResponse { ok: true })
}

#[wasm_bindgen]
pub fn destroy_store() {
    STORE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

#[wasm_bindgen]
pub fn add_block(request_json: &str) -> String {
    let request: AddBlockJson = match serde_json::from_str(request_json) {
        Ok(r) => r,
        Err(e) => return json_err(format!("Invalid block JSON: {}", e)),
    };

    json_block(with_store(|store| {
        store
            .add_block(&request.block_type, request.props)
            .map(Block::clone)
    }))
}

#[wasm_bindgen]
pub fn edit_block(index: usize, props_json: &str) -> String {
    let props: Props = match serde_json::from_str(props_json) {
        Ok(p) => p,
        Err(e) => return json_err(format!("Props must be a JSON object: {}", e)),
    };

    json_block(with_store(|store| {
        store.edit_block(index, props).map(Block::clone)
    }))
}

#[wasm_bindgen]
pub fn remove_block(id: &str) -> String {
    match with_store(|store| store.remove_block(id)) {
        Ok(removed) => json_of(&RemovedResponse { removed }),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn move_next_block(index: usize) -> String {
    json_unit(with_store(|store| store.move_next_block(index)))
}

#[wasm_bindgen]
pub fn move_prev_block(index: usize) -> String {
    json_unit(with_store(|store| store.move_prev_block(index)))
}

#[wasm_bindgen]
pub fn get_blocks() -> String {
    match with_store(|store| json_of(&store.get_blocks())) {
        Ok(json) => json,
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn get_registered_blocks() -> String {
    match with_store(|store| {
        let templates: std::collections::BTreeMap<_, _> = store
            .get_registered_blocks()
            .into_iter()
            .map(|(block_type, template)| (block_type, (*template).clone()))
            .collect();
        json_of(&templates)
    }) {
        Ok(json) => json,
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn load_blocks(blocks_json: &str) -> String {
    let blocks: Vec<Block> = match serde_json::from_str(blocks_json) {
        Ok(b) => b,
        Err(e) => return json_err(format!("Invalid blocks JSON: {}", e)),
    };

    json_unit(with_store(|store| store.load_blocks(blocks)))
}

/// Hand the serialized sequence to the host for posting.
///
/// `post_callback` is called as `post_callback(endpoint, bodyJson)`; the host
/// owns the actual transport.
#[wasm_bindgen]
pub fn save(post_callback: &js_sys::Function) -> String {
    let prepared = with_state(|state| -> Result<(String, String), StoreError> {
        let endpoint = state
            .save_endpoint
            .clone()
            .ok_or(StoreError::NoSaveEndpoint)?;
        let body = serde_json::to_string(&state.store.to_json()?)?;
        Ok((endpoint, body))
    });

    match prepared {
        Ok(Ok((endpoint, body))) => {
            match post_callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(&endpoint),
                &JsValue::from_str(&body),
            ) {
                Ok(_) => json_of(&OkResponse { ok: true }),
                Err(e) => json_err(format!("Host transport failed: {:?}", e)),
            }
        }
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}
