//! WebAssembly bindings for builder-core.
//!
//! Structured values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::event::{DragPayload, InputEvent, Point, PointerEvent, PointerTarget};
use crate::palette::Palette;
use crate::properties::PropertyField;
use crate::schema::DesignDocument;
use crate::state::EditorState;
use crate::ElementId;

/// Initialize the builder WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor whose canvas starts at (`origin_x`, `origin_y`) on the page.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(origin_x: f32, origin_y: f32) -> Self {
        Self {
            state: EditorState::new(Point::new(origin_x, origin_y)),
        }
    }

    /// Update the canvas origin after layout changes.
    #[wasm_bindgen(js_name = setCanvasOrigin)]
    pub fn set_canvas_origin(&mut self, x: f32, y: f32) {
        self.state.set_canvas_origin(Point::new(x, y));
    }

    /// Feed a serialized [`InputEvent`]. Returns the outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event is malformed or cannot be applied.
    #[wasm_bindgen(js_name = processEvent)]
    pub fn process_event(&mut self, json: &str) -> Result<String, String> {
        let event: InputEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let outcome = self.state.process_event(&event).map_err(|e| e.to_string())?;
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }

    /// Pointer pressed on an element (`id`) or on empty canvas (`None`).
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, id: Option<String>, x: f32, y: f32) -> Result<String, String> {
        let target = match id {
            Some(raw) => PointerTarget::Element(parse_id(&raw)?),
            None => PointerTarget::Canvas,
        };
        self.pointer(PointerEvent::Down {
            target,
            point: Point::new(x, y),
        })
    }

    /// Pointer moved.
    ///
    /// # Errors
    ///
    /// Returns an error string if the outcome cannot be serialized.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<String, String> {
        self.pointer(PointerEvent::Move {
            point: Point::new(x, y),
        })
    }

    /// Pointer released.
    ///
    /// # Errors
    ///
    /// Returns an error string if the outcome cannot be serialized.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Result<String, String> {
        self.pointer(PointerEvent::Up {
            point: Point::new(x, y),
        })
    }

    /// Drop a palette payload (serialized [`DragPayload`]) at a page point.
    ///
    /// # Errors
    ///
    /// Returns an error string if the payload does not name a blueprint.
    #[wasm_bindgen(js_name = dropPayload)]
    pub fn drop_payload(&mut self, payload_json: &str, x: f32, y: f32) -> Result<String, String> {
        let payload: DragPayload =
            serde_json::from_str(payload_json).map_err(|e| e.to_string())?;
        self.process(&InputEvent::Drop {
            payload,
            point: Point::new(x, y),
        })
    }

    /// Set a property on the selected element. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if `field` is not a known property name.
    #[wasm_bindgen(js_name = applyProperty)]
    pub fn apply_property(&mut self, field: &str, value: &str) -> Result<bool, String> {
        let field: PropertyField =
            serde_json::from_value(serde_json::Value::String(field.to_string()))
                .map_err(|e| e.to_string())?;
        Ok(self.state.edit_property(field, value))
    }

    /// Delete the selected element.
    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> bool {
        self.state.delete_selected()
    }

    /// Layer rows as JSON.
    #[wasm_bindgen(js_name = layers)]
    #[must_use]
    pub fn layers(&self) -> String {
        serde_json::to_string(&self.state.layer_rows()).unwrap_or_default()
    }

    /// Palette blueprints matching `query` as JSON.
    #[wasm_bindgen(js_name = palette)]
    #[must_use]
    pub fn palette(query: &str) -> String {
        serde_json::to_string(&Palette::standard().filter(query)).unwrap_or_default()
    }

    /// Whether there are unsaved changes.
    #[wasm_bindgen(js_name = hasLocalChanges)]
    #[must_use]
    pub fn has_local_changes(&self) -> bool {
        self.state.has_local_changes
    }

    /// Clear the unsaved-changes flag.
    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.state.mark_saved();
    }

    /// Current design as a JSON document.
    #[wasm_bindgen(js_name = documentJson)]
    #[must_use]
    pub fn document_json(&self) -> String {
        serde_json::to_string(&self.state.to_document()).unwrap_or_default()
    }

    /// Replace the design from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing or validation fails.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, json: &str) -> Result<(), String> {
        let document: DesignDocument = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let origin = self.state.canvas_origin();
        self.state = EditorState::from_document(document, origin).map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl WasmEditor {
    fn pointer(&mut self, event: PointerEvent) -> Result<String, String> {
        self.process(&InputEvent::Pointer(event))
    }

    fn process(&mut self, event: &InputEvent) -> Result<String, String> {
        let outcome = self.state.process_event(event).map_err(|e| e.to_string())?;
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn parse_id(raw: &str) -> Result<ElementId, String> {
    ElementId::parse(raw).map_err(|e| format!("invalid element id {raw}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_id(outcome: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(outcome).expect("outcome json");
        value["id"].as_str().expect("created id").to_string()
    }

    #[test]
    fn drop_then_drag_moves_element() {
        let mut editor = WasmEditor::new(100.0, 50.0);
        let payload = r#"{"key":"text","effect":"copy"}"#;
        let outcome = editor.drop_payload(payload, 100.0, 50.0).expect("drop");
        let id = created_id(&outcome);

        editor.pointer_down(Some(id), 110.0, 60.0).expect("down");
        editor.pointer_move(160.0, 90.0).expect("move");
        editor.pointer_up(160.0, 90.0).expect("up");

        let doc: serde_json::Value =
            serde_json::from_str(&editor.document_json()).expect("doc json");
        assert_eq!(doc["elements"][0]["position"]["x"], 50.0);
        assert_eq!(doc["elements"][0]["position"]["y"], 30.0);
        assert!(editor.has_local_changes());
    }

    #[test]
    fn pointer_down_rejects_bad_id() {
        let mut editor = WasmEditor::default();
        assert!(editor.pointer_down(Some("nope".into()), 0.0, 0.0).is_err());
    }

    #[test]
    fn apply_property_uses_camel_case_names() {
        let mut editor = WasmEditor::default();
        editor
            .drop_payload(r#"{"key":"button","effect":"copy"}"#, 0.0, 0.0)
            .expect("drop");
        assert_eq!(editor.apply_property("fontSize", "18"), Ok(true));
        assert!(editor.apply_property("notAField", "1").is_err());
    }

    #[test]
    fn load_document_rejects_invalid_json() {
        let mut editor = WasmEditor::default();
        assert!(editor.load_document("{ not json").is_err());
    }

    #[test]
    fn document_roundtrips_through_load() {
        let mut editor = WasmEditor::default();
        editor
            .drop_payload(r#"{"key":"heading","effect":"copy"}"#, 10.0, 10.0)
            .expect("drop");
        let json = editor.document_json();

        let mut other = WasmEditor::default();
        other.load_document(&json).expect("load");
        assert_eq!(other.document_json(), json);
        assert!(!other.has_local_changes());
    }

    #[test]
    fn palette_filters_case_insensitively() {
        let json = WasmEditor::palette("BUT");
        assert!(json.contains("button"));
        assert!(!json.contains("\"image\""));
    }
}
