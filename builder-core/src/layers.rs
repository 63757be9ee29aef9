//! Layer panel: the element store presented as a sortable list.
//!
//! Rows are shown in descending `zIndex` order, but drag-reordering works on
//! store indices, never on display positions.

use serde::{Deserialize, Serialize};

use crate::event::DragPayload;
use crate::interaction::{InteractionController, InteractionOutcome};
use crate::{BuilderError, BuilderResult, ElementId, ElementKind, ElementPatch, ElementStore};

/// Maximum characters of content shown in a row name.
const NAME_PREVIEW_CHARS: usize = 24;

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRow {
    /// Element shown by this row.
    pub id: ElementId,
    /// Element type.
    pub kind: ElementKind,
    /// Display name.
    pub name: String,
    /// Position in the unsorted store.
    pub store_index: usize,
    /// Ordering hint used for display.
    pub z_index: i32,
    /// Whether the element is painted.
    pub is_visible: bool,
    /// Whether drags are rejected.
    pub is_locked: bool,
    /// Whether the element is the current selection.
    pub is_selected: bool,
}

/// Context-menu actions on a layer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerAction {
    /// Copy the element.
    Duplicate,
    /// Group with other elements.
    Group,
    /// Dissolve a group.
    Ungroup,
    /// Move to the top of the stack.
    BringToFront,
    /// Move to the bottom of the stack.
    SendToBack,
    /// Delete the element.
    Delete,
}

/// Layer panel state: the in-progress row drag, if any.
#[derive(Debug, Clone, Default)]
pub struct LayerPanel {
    drag_source: Option<ElementId>,
}

impl LayerPanel {
    /// Create a panel with no drag in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in display order (descending z-index, ties in store order).
    #[must_use]
    pub fn rows(store: &ElementStore, selected: Option<ElementId>) -> Vec<LayerRow> {
        store
            .display_order()
            .into_iter()
            .filter_map(|element| {
                let store_index = store.index_of(element.id)?;
                Some(LayerRow {
                    id: element.id,
                    kind: element.kind(),
                    name: row_name(element.kind(), element.content().summary()),
                    store_index,
                    z_index: element.z_index(),
                    is_visible: element.is_visible,
                    is_locked: element.is_locked,
                    is_selected: selected == Some(element.id),
                })
            })
            .collect()
    }

    /// Row click: select the element.
    pub fn select(
        controller: &mut InteractionController,
        store: &ElementStore,
        id: ElementId,
    ) -> InteractionOutcome {
        controller.select(store, id)
    }

    /// Start dragging a row. Locked elements cannot be dragged.
    pub fn begin_drag(&mut self, store: &ElementStore, id: ElementId) -> Option<DragPayload> {
        let element = store.get(id)?;
        if element.is_locked {
            tracing::debug!("Layer {id} is locked; reorder rejected");
            self.drag_source = None;
            return None;
        }
        self.drag_source = Some(id);
        Some(DragPayload::for_layer(id))
    }

    /// Element currently being dragged.
    #[must_use]
    pub const fn drag_source(&self) -> Option<ElementId> {
        self.drag_source
    }

    /// Drop the dragged row onto `target`, reordering the store.
    pub fn drop_on(&mut self, store: &mut ElementStore, target: ElementId) -> bool {
        match self.drag_source.take() {
            Some(source) => Self::reorder(store, source, target),
            None => false,
        }
    }

    /// Abandon a row drag without reordering.
    pub fn cancel_drag(&mut self) {
        self.drag_source = None;
    }

    /// Move `source` to the store position of `target`.
    ///
    /// Indices are resolved against the unsorted store. Rejected when either
    /// id is unknown or `source` is locked.
    pub fn reorder(store: &mut ElementStore, source: ElementId, target: ElementId) -> bool {
        if store.get(source).is_some_and(|element| element.is_locked) {
            tracing::debug!("Layer {source} is locked; reorder rejected");
            return false;
        }
        match (store.index_of(source), store.index_of(target)) {
            (Some(from), Some(to)) => store.reorder(from, to),
            _ => false,
        }
    }

    /// Flip visibility. Returns the new value, or `None` for an unknown id.
    pub fn toggle_visibility(store: &mut ElementStore, id: ElementId) -> Option<bool> {
        let visible = !store.get(id)?.is_visible;
        store.update(id, &ElementPatch::new().visible(visible));
        Some(visible)
    }

    /// Flip the lock. Returns the new value, or `None` for an unknown id.
    pub fn toggle_lock(store: &mut ElementStore, id: ElementId) -> Option<bool> {
        let locked = !store.get(id)?.is_locked;
        store.update(id, &ElementPatch::new().locked(locked));
        Some(locked)
    }

    /// Run a context-menu action.
    ///
    /// Returns whether the store changed.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Unsupported`] for every action except
    /// [`LayerAction::Delete`]; their semantics are not defined yet.
    pub fn context_action(
        store: &mut ElementStore,
        controller: &mut InteractionController,
        id: ElementId,
        action: LayerAction,
    ) -> BuilderResult<bool> {
        match action {
            LayerAction::Delete => {
                let removed = store.remove(id).is_some();
                controller.forget(id);
                Ok(removed)
            }
            LayerAction::Duplicate
            | LayerAction::Group
            | LayerAction::Ungroup
            | LayerAction::BringToFront
            | LayerAction::SendToBack => Err(BuilderError::Unsupported(format!("{action:?}"))),
        }
    }
}

fn row_name(kind: ElementKind, summary: &str) -> String {
    let summary = summary.lines().next().unwrap_or_default().trim();
    if summary.is_empty() {
        return capitalize(kind.as_str());
    }
    let mut preview: String = summary.chars().take(NAME_PREVIEW_CHARS).collect();
    if summary.chars().count() > NAME_PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
