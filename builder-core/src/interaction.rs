//! Selection and direct-manipulation state machine.
//!
//! ```text
//!            down(element)              down(unlocked element)
//!   Idle ──────────────────▶ Selected ─────────────────────────▶ Dragging
//!    ▲                          │  ▲                                 │
//!    └──── down(canvas) ────────┘  └──────────── up ─────────────────┘
//! ```
//!
//! Transitions are pure: the controller reads pointer events, writes
//! positions through the [`ElementStore`], and reports what changed so the
//! host can re-render. A drag ends only on pointer-up.

use serde::{Deserialize, Serialize};

use crate::event::{DragPayload, Point, PointerEvent, PointerTarget};
use crate::{BuilderResult, ElementId, ElementPatch, ElementStore, Position};

/// Controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InteractionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// One element selected.
    Selected {
        /// Selected element.
        id: ElementId,
    },
    /// Selected element following the pointer.
    Dragging {
        /// Dragged element.
        id: ElementId,
        /// Pointer position relative to the element origin at press time.
        offset: Point,
    },
}

impl InteractionState {
    /// The selected element, whether or not it is being dragged.
    #[must_use]
    pub const fn selected(&self) -> Option<ElementId> {
        match *self {
            Self::Idle => None,
            Self::Selected { id } | Self::Dragging { id, .. } => Some(id),
        }
    }
}

/// What a transition changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// Nothing observable changed.
    None,
    /// The selection changed.
    SelectionChanged {
        /// New selection.
        selected: Option<ElementId>,
    },
    /// An element was moved.
    Moved {
        /// Moved element.
        id: ElementId,
        /// Stored position after clamping.
        position: Position,
    },
    /// An element was created from a dropped blueprint.
    Created {
        /// New element.
        id: ElementId,
    },
}

/// Selection and drag controller for one canvas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionController {
    state: InteractionState,
    /// Canvas origin in page coordinates.
    canvas_origin: Point,
}

impl InteractionController {
    /// Create a controller for a canvas whose top-left corner is at `canvas_origin`.
    #[must_use]
    pub fn new(canvas_origin: Point) -> Self {
        Self {
            state: InteractionState::Idle,
            canvas_origin,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Currently selected element.
    #[must_use]
    pub const fn selected(&self) -> Option<ElementId> {
        self.state.selected()
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    /// Canvas origin in page coordinates.
    #[must_use]
    pub const fn canvas_origin(&self) -> Point {
        self.canvas_origin
    }

    /// Update the canvas origin, e.g. after the page scrolls or resizes.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Convert a page point to a clamped canvas position.
    #[must_use]
    pub fn to_canvas(&self, point: Point) -> Position {
        let local = point - self.canvas_origin;
        Position::clamped(local.x, local.y)
    }

    /// Feed a pointer event through the state machine.
    pub fn handle(&mut self, store: &mut ElementStore, event: &PointerEvent) -> InteractionOutcome {
        match *event {
            PointerEvent::Down {
                target: PointerTarget::Canvas,
                ..
            } => self.clear(),
            PointerEvent::Down {
                target: PointerTarget::Element(id),
                point,
            } => self.press_element(store, id, point),
            PointerEvent::Move { point } => self.drag_to(store, point),
            PointerEvent::Up { point } => {
                let outcome = self.drag_to(store, point);
                if let InteractionState::Dragging { id, .. } = self.state {
                    tracing::debug!("Drag of {id} finished");
                    self.state = InteractionState::Selected { id };
                }
                outcome
            }
        }
    }

    /// Select an element directly (palette or layer click).
    ///
    /// Selecting an unknown id is a no-op. Any drag in progress ends.
    pub fn select(&mut self, store: &ElementStore, id: ElementId) -> InteractionOutcome {
        if !store.contains(id) {
            tracing::trace!("select: element {id} not found");
            return InteractionOutcome::None;
        }
        let changed = self.selected() != Some(id);
        self.state = InteractionState::Selected { id };
        if changed {
            InteractionOutcome::SelectionChanged { selected: Some(id) }
        } else {
            InteractionOutcome::None
        }
    }

    /// Clear the selection.
    pub fn clear(&mut self) -> InteractionOutcome {
        if self.state == InteractionState::Idle {
            return InteractionOutcome::None;
        }
        self.state = InteractionState::Idle;
        InteractionOutcome::SelectionChanged { selected: None }
    }

    /// Drop the selection if it refers to `id`. Called when `id` is deleted.
    pub fn forget(&mut self, id: ElementId) -> bool {
        if self.selected() == Some(id) {
            self.state = InteractionState::Idle;
            true
        } else {
            false
        }
    }

    /// Create an element from a palette drag payload dropped at `point`.
    ///
    /// The new element is selected; no drag starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not resolve to a blueprint.
    pub fn drop_payload(
        &mut self,
        store: &mut ElementStore,
        payload: &DragPayload,
        point: Point,
    ) -> BuilderResult<InteractionOutcome> {
        let blueprint = payload.resolve_blueprint()?;
        let position = self.to_canvas(point);
        let id = store.add(blueprint.instantiate(position)).id;
        self.state = InteractionState::Selected { id };
        Ok(InteractionOutcome::Created { id })
    }

    fn press_element(
        &mut self,
        store: &ElementStore,
        id: ElementId,
        point: Point,
    ) -> InteractionOutcome {
        let Some(element) = store.get(id) else {
            tracing::trace!("pointer down on unknown element {id}");
            return InteractionOutcome::None;
        };
        let previous = self.selected();

        if element.is_locked {
            tracing::debug!("Element {id} is locked; selecting without drag");
            self.state = InteractionState::Selected { id };
        } else {
            let local = point - self.canvas_origin;
            let offset = Point::new(local.x - element.position.x, local.y - element.position.y);
            tracing::debug!("Drag of {id} started with offset ({}, {})", offset.x, offset.y);
            self.state = InteractionState::Dragging { id, offset };
        }

        if previous == Some(id) {
            InteractionOutcome::None
        } else {
            InteractionOutcome::SelectionChanged { selected: Some(id) }
        }
    }

    fn drag_to(&mut self, store: &mut ElementStore, point: Point) -> InteractionOutcome {
        let InteractionState::Dragging { id, offset } = self.state else {
            return InteractionOutcome::None;
        };
        if store.get(id).is_some_and(|element| element.is_locked) {
            tracing::debug!("Element {id} was locked mid-drag; drag ended");
            self.state = InteractionState::Selected { id };
            return InteractionOutcome::None;
        }
        let local = point - self.canvas_origin - offset;
        let position = Position::clamped(local.x, local.y);
        if store.update(id, &ElementPatch::new().position(position.x, position.y)) {
            InteractionOutcome::Moved { id, position }
        } else {
            InteractionOutcome::None
        }
    }
}
