//! Editor state: one element store plus the controllers that mutate it.

use serde::Serialize;

use crate::event::{InputEvent, Point};
use crate::interaction::{InteractionController, InteractionOutcome, InteractionState};
use crate::layers::{LayerAction, LayerPanel, LayerRow};
use crate::properties::{self, PropertyField, StyleCache};
use crate::schema::{CanvasDocument, DesignDocument};
use crate::{BuilderResult, Element, ElementId, ElementStore};

/// Keys that delete the current selection.
const DELETE_KEYS: [&str; 2] = ["Delete", "Backspace"];

/// The complete editing state for one page.
#[derive(Debug, Clone, Serialize)]
pub struct EditorState {
    /// The element store.
    store: ElementStore,
    /// Selection and drag state machine.
    controller: InteractionController,
    /// Layer panel row-drag state.
    #[serde(skip)]
    layers: LayerPanel,
    /// Render cache of the selected element's styles.
    #[serde(skip)]
    style_cache: StyleCache,
    /// Canvas dimensions.
    pub canvas: CanvasDocument,
    /// Whether there are unsaved local changes.
    pub has_local_changes: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

impl EditorState {
    /// Create an empty editor for a canvas at `canvas_origin` in page coordinates.
    #[must_use]
    pub fn new(canvas_origin: Point) -> Self {
        Self {
            store: ElementStore::new(),
            controller: InteractionController::new(canvas_origin),
            layers: LayerPanel::new(),
            style_cache: StyleCache::new(),
            canvas: CanvasDocument::default(),
            has_local_changes: false,
        }
    }

    /// Load an editor from a saved design.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_document(document: DesignDocument, canvas_origin: Point) -> BuilderResult<Self> {
        let canvas = document.canvas;
        let store = document.into_store()?;
        tracing::debug!("Loaded design with {} elements", store.len());
        Ok(Self {
            store,
            canvas,
            ..Self::new(canvas_origin)
        })
    }

    /// Snapshot the design for persistence.
    #[must_use]
    pub fn to_document(&self) -> DesignDocument {
        DesignDocument::from_store(&self.store, self.canvas)
    }

    /// Read-only access to the element store.
    #[must_use]
    pub const fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Current interaction state.
    #[must_use]
    pub const fn interaction(&self) -> InteractionState {
        self.controller.state()
    }

    /// Currently selected element id.
    #[must_use]
    pub const fn selected(&self) -> Option<ElementId> {
        self.controller.selected()
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected().and_then(|id| self.store.get(id))
    }

    /// Styles of the selected element as last synced.
    #[must_use]
    pub const fn style_cache(&self) -> &StyleCache {
        &self.style_cache
    }

    /// Canvas origin in page coordinates.
    #[must_use]
    pub const fn canvas_origin(&self) -> Point {
        self.controller.canvas_origin()
    }

    /// Update the canvas origin after layout changes.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.controller.set_canvas_origin(origin);
    }

    /// Process an input event.
    ///
    /// # Errors
    ///
    /// Returns an error if a dropped payload does not name a blueprint.
    pub fn process_event(&mut self, event: &InputEvent) -> BuilderResult<InteractionOutcome> {
        let outcome = match event {
            InputEvent::Pointer(pointer) => self.controller.handle(&mut self.store, pointer),
            InputEvent::Drop { payload, point } => {
                self.controller
                    .drop_payload(&mut self.store, payload, *point)?
            }
            InputEvent::Key { key, .. } => self.handle_key(key),
        };
        self.after(outcome);
        Ok(outcome)
    }

    /// Select an element (palette or layer click).
    pub fn select(&mut self, id: ElementId) -> InteractionOutcome {
        let outcome = LayerPanel::select(&mut self.controller, &self.store, id);
        self.after(outcome);
        outcome
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) -> InteractionOutcome {
        let outcome = self.controller.clear();
        self.after(outcome);
        outcome
    }

    /// Edit a property of the selected element.
    ///
    /// Returns `false` when nothing is selected or the field does not apply.
    pub fn edit_property(&mut self, field: PropertyField, raw: &str) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        let changed = properties::apply(&mut self.store, id, field, raw);
        if changed {
            self.mark_changed();
        }
        changed
    }

    /// Delete an element, clearing the selection if it was selected.
    pub fn delete(&mut self, id: ElementId) -> bool {
        let removed = self.store.remove(id).is_some();
        if self.controller.forget(id) || removed {
            self.style_cache.sync(&self.store, self.selected());
        }
        if removed {
            self.mark_changed();
        }
        removed
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> bool {
        self.selected().is_some_and(|id| self.delete(id))
    }

    /// Layer panel rows in display order.
    #[must_use]
    pub fn layer_rows(&self) -> Vec<LayerRow> {
        LayerPanel::rows(&self.store, self.selected())
    }

    /// Start dragging a layer row. Returns `false` for locked or unknown elements.
    pub fn begin_layer_drag(&mut self, id: ElementId) -> bool {
        self.layers.begin_drag(&self.store, id).is_some()
    }

    /// Drop the dragged layer row onto another row.
    pub fn drop_layer_on(&mut self, target: ElementId) -> bool {
        let moved = self.layers.drop_on(&mut self.store, target);
        if moved {
            self.mark_changed();
        }
        moved
    }

    /// Reorder by layer ids directly.
    pub fn reorder_layers(&mut self, source: ElementId, target: ElementId) -> bool {
        let moved = LayerPanel::reorder(&mut self.store, source, target);
        if moved {
            self.mark_changed();
        }
        moved
    }

    /// Flip an element's visibility.
    pub fn toggle_visibility(&mut self, id: ElementId) -> Option<bool> {
        let visible = LayerPanel::toggle_visibility(&mut self.store, id)?;
        self.mark_changed();
        Some(visible)
    }

    /// Flip an element's lock.
    pub fn toggle_lock(&mut self, id: ElementId) -> Option<bool> {
        let locked = LayerPanel::toggle_lock(&mut self.store, id)?;
        self.mark_changed();
        Some(locked)
    }

    /// Run a layer context-menu action.
    ///
    /// # Errors
    ///
    /// Returns an error for actions that have no defined behavior.
    pub fn layer_action(&mut self, id: ElementId, action: LayerAction) -> BuilderResult<bool> {
        let changed =
            LayerPanel::context_action(&mut self.store, &mut self.controller, id, action)?;
        if changed {
            self.style_cache.sync(&self.store, self.selected());
            self.mark_changed();
        }
        Ok(changed)
    }

    /// Clear the unsaved-changes flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.has_local_changes = false;
    }

    fn handle_key(&mut self, key: &str) -> InteractionOutcome {
        if DELETE_KEYS.contains(&key) {
            if self.controller.is_dragging() {
                return InteractionOutcome::None;
            }
            let selected = self.selected();
            if self.delete_selected() {
                tracing::debug!("Deleted {selected:?} via {key}");
                return InteractionOutcome::SelectionChanged { selected: None };
            }
        } else if key == "Escape" && !self.controller.is_dragging() {
            // Drags end only on pointer-up.
            return self.controller.clear();
        }
        InteractionOutcome::None
    }

    fn after(&mut self, outcome: InteractionOutcome) {
        match outcome {
            InteractionOutcome::None => {}
            InteractionOutcome::SelectionChanged { .. } => {
                self.style_cache.sync(&self.store, self.selected());
            }
            InteractionOutcome::Moved { .. } => self.mark_changed(),
            InteractionOutcome::Created { .. } => {
                self.style_cache.sync(&self.store, self.selected());
                self.mark_changed();
            }
        }
    }

    fn mark_changed(&mut self) {
        self.has_local_changes = true;
        self.style_cache.sync(&self.store, self.selected());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DragPayload, KeyModifiers, PointerEvent, PointerTarget};
    use crate::ElementKind;

    fn place(editor: &mut EditorState, kind: ElementKind, x: f32, y: f32) -> ElementId {
        let outcome = editor
            .process_event(&InputEvent::Drop {
                payload: DragPayload::from_kind(kind),
                point: Point::new(x, y),
            })
            .expect("drop");
        match outcome {
            InteractionOutcome::Created { id } => id,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    fn key(name: &str) -> InputEvent {
        InputEvent::Key {
            key: name.to_string(),
            modifiers: KeyModifiers::default(),
        }
    }

    #[test]
    fn drop_selects_new_element_and_marks_dirty() {
        let mut editor = EditorState::default();
        let id = place(&mut editor, ElementKind::Text, 10.0, 10.0);
        assert_eq!(editor.selected(), Some(id));
        assert!(editor.has_local_changes);
        assert_eq!(editor.style_cache().element(), Some(id));
    }

    #[test]
    fn deleting_selection_clears_it() {
        let mut editor = EditorState::default();
        let id = place(&mut editor, ElementKind::Text, 10.0, 10.0);

        assert!(editor.delete(id));
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.style_cache().element(), None);
        assert!(editor.store().is_empty());
    }

    #[test]
    fn deleting_other_element_keeps_selection() {
        let mut editor = EditorState::default();
        let a = place(&mut editor, ElementKind::Text, 10.0, 10.0);
        let b = place(&mut editor, ElementKind::Button, 10.0, 10.0);
        editor.select(a);

        assert!(editor.delete(b));
        assert_eq!(editor.selected(), Some(a));
    }

    #[test]
    fn delete_key_removes_selection() {
        let mut editor = EditorState::default();
        place(&mut editor, ElementKind::Image, 0.0, 0.0);
        editor.process_event(&key("Delete")).expect("key");
        assert!(editor.store().is_empty());
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn escape_does_not_cancel_drag() {
        let mut editor = EditorState::default();
        let id = place(&mut editor, ElementKind::Text, 0.0, 0.0);
        editor
            .process_event(&InputEvent::Pointer(PointerEvent::Down {
                target: PointerTarget::Element(id),
                point: Point::new(5.0, 5.0),
            }))
            .expect("down");

        editor.process_event(&key("Escape")).expect("key");
        assert!(matches!(editor.interaction(), InteractionState::Dragging { .. }));
        editor.process_event(&key("Delete")).expect("key");
        assert!(editor.store().contains(id));

        editor
            .process_event(&InputEvent::Pointer(PointerEvent::Up {
                point: Point::new(5.0, 5.0),
            }))
            .expect("up");
        editor.process_event(&key("Escape")).expect("key");
        assert_eq!(editor.interaction(), InteractionState::Idle);
    }

    #[test]
    fn edit_property_requires_selection() {
        let mut editor = EditorState::default();
        assert!(!editor.edit_property(PropertyField::FontSize, "20"));

        let id = place(&mut editor, ElementKind::Text, 0.0, 0.0);
        assert!(editor.edit_property(PropertyField::FontSize, "72"));
        assert_eq!(editor.style_cache().get("fontSize"), Some("72px"));
        assert_eq!(
            editor
                .store()
                .get(id)
                .and_then(|e| e.styles.get("fontSize"))
                .map(String::as_str),
            Some("72px")
        );
    }

    #[test]
    fn document_roundtrip_restores_editor() {
        let mut editor = EditorState::default();
        place(&mut editor, ElementKind::Heading, 10.0, 20.0);
        place(&mut editor, ElementKind::Button, 30.0, 40.0);

        let doc = editor.to_document();
        let restored = EditorState::from_document(doc, Point::default()).expect("restore");
        assert_eq!(restored.store(), editor.store());
        assert_eq!(restored.selected(), None);
        assert!(!restored.has_local_changes);
    }

    #[test]
    fn layer_lock_during_canvas_drag_pins_element() {
        let mut editor = EditorState::default();
        let id = place(&mut editor, ElementKind::Text, 10.0, 10.0);
        editor
            .process_event(&InputEvent::Pointer(PointerEvent::Down {
                target: PointerTarget::Element(id),
                point: Point::new(20.0, 20.0),
            }))
            .expect("down");
        assert_eq!(editor.toggle_lock(id), Some(true));

        for event in [
            PointerEvent::Move {
                point: Point::new(220.0, 320.0),
            },
            PointerEvent::Up {
                point: Point::new(220.0, 320.0),
            },
        ] {
            editor.process_event(&InputEvent::Pointer(event)).expect("pointer");
        }

        let position = editor.store().get(id).expect("exists").position;
        assert_eq!(position, crate::Position::new(10.0, 10.0));
        assert_eq!(editor.interaction(), InteractionState::Selected { id });
    }

    #[test]
    fn editor_snapshots_reload_only_through_validated_documents() {
        let mut editor = EditorState::default();
        place(&mut editor, ElementKind::Heading, 0.0, 0.0);
        let snapshot = serde_json::to_value(&editor).expect("serialize");
        assert!(snapshot["store"]["elements"].is_array());

        let mut value = editor.to_document().to_value().expect("to value");
        let elements = value["elements"].as_array_mut().expect("elements");
        let first = elements[0].clone();
        elements.push(first);

        let doc = DesignDocument::from_value(value).expect("document shape");
        assert!(EditorState::from_document(doc, Point::default()).is_err());
    }

    #[test]
    fn mark_saved_clears_dirty_flag() {
        let mut editor = EditorState::default();
        place(&mut editor, ElementKind::Text, 0.0, 0.0);
        editor.mark_saved();
        assert!(!editor.has_local_changes);
    }
}
