//! WebAssembly bindings
//!
//! Browser callers pass graph documents and optional configuration as
//! JSON strings and get the laid-out document back as JSON.

use wasm_bindgen::prelude::*;

use crate::document::relayout_document_json;

/// Initialize WASM module
///
/// Sets up panic hooks and logging to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Lay out every node of a JSON graph document
///
/// # Arguments
/// * `document` - `{ "nodes": [...], "edges": [...] }`
/// * `config` - optional JSON layout config; absent fields use defaults
///
/// # Returns
/// * The document with updated positions, as JSON
/// * Throws a JavaScript error on malformed JSON or invalid config
#[wasm_bindgen(js_name = relayoutAll)]
pub fn relayout_all(document: &str, config: Option<String>) -> Result<String, JsValue> {
    relayout_document_json(document, None, config.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Re-place what an edit to `changed_id` can have moved
///
/// # Arguments
/// * `document` - `{ "nodes": [...], "edges": [...] }`
/// * `changed_id` - id of the edited node
/// * `config` - optional JSON layout config
#[wasm_bindgen(js_name = relayoutFrom)]
pub fn relayout_from(
    document: &str,
    changed_id: &str,
    config: Option<String>,
) -> Result<String, JsValue> {
    relayout_document_json(document, Some(changed_id), config.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
