//! Input events for canvas interaction.
//!
//! Hosts translate native pointer, keyboard and drag-transfer events into
//! these types; nothing here touches a DOM.

use serde::{Deserialize, Serialize};

use crate::palette::{Blueprint, Palette};
use crate::{BuilderError, BuilderResult, ElementId, ElementKind};

/// A point in page (viewport) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// What the pointer was over when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum PointerTarget {
    /// The canvas background itself, not a child.
    Canvas,
    /// The body of an element.
    Element(ElementId),
}

/// Pointer (mouse/touch) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Pointer pressed.
    Down {
        /// Hit target.
        target: PointerTarget,
        /// Pointer position.
        point: Point,
    },
    /// Pointer moved.
    Move {
        /// Pointer position.
        point: Point,
    },
    /// Pointer released.
    Up {
        /// Pointer position.
        point: Point,
    },
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer event on the canvas.
    Pointer(PointerEvent),

    /// Key pressed.
    Key {
        /// Key name (`"Delete"`, `"Escape"`, ...).
        key: String,
        /// Active modifier keys.
        modifiers: KeyModifiers,
    },

    /// A drag transfer dropped on the canvas.
    Drop {
        /// Transfer contents.
        payload: DragPayload,
        /// Drop position.
        point: Point,
    },
}

/// Drop semantic of a drag transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    /// Palette to canvas: a new element is created.
    Copy,
    /// Layer row to layer row: an existing element is reordered.
    Move,
}

/// Contents of a cross-component drag transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// Element type key for copies, element id for moves.
    pub key: String,
    /// Full serialized blueprint, when the source provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_json: Option<String>,
    /// Drop semantic.
    pub effect: DropEffect,
}

impl DragPayload {
    /// Payload for dragging a palette blueprint onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the blueprint cannot be serialized.
    pub fn from_blueprint(blueprint: &Blueprint) -> BuilderResult<Self> {
        Ok(Self {
            key: blueprint.kind.as_str().to_string(),
            blueprint_json: Some(serde_json::to_string(blueprint)?),
            effect: DropEffect::Copy,
        })
    }

    /// Payload carrying only a type key, as some drag sources provide.
    #[must_use]
    pub fn from_kind(kind: ElementKind) -> Self {
        Self {
            key: kind.as_str().to_string(),
            blueprint_json: None,
            effect: DropEffect::Copy,
        }
    }

    /// Payload for dragging a layer row.
    #[must_use]
    pub fn for_layer(id: ElementId) -> Self {
        Self {
            key: id.to_string(),
            blueprint_json: None,
            effect: DropEffect::Move,
        }
    }

    /// Resolve the blueprint a copy payload describes.
    ///
    /// The serialized blueprint wins when it parses; otherwise the type key
    /// is looked up in the standard palette.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidPayload`] for move payloads and
    /// [`BuilderError::UnknownBlueprint`] when neither form names a blueprint.
    pub fn resolve_blueprint(&self) -> BuilderResult<Blueprint> {
        if self.effect != DropEffect::Copy {
            return Err(BuilderError::InvalidPayload(format!(
                "expected a copy payload, got {:?}",
                self.effect
            )));
        }
        if let Some(ref json) = self.blueprint_json {
            match serde_json::from_str::<Blueprint>(json) {
                Ok(blueprint) => return Ok(blueprint),
                Err(e) => tracing::debug!("Blueprint JSON unreadable, using key: {e}"),
            }
        }
        ElementKind::from_key(&self.key)
            .and_then(|kind| Palette::standard().find(kind))
            .cloned()
            .ok_or_else(|| BuilderError::UnknownBlueprint(self.key.clone()))
    }

    /// The element a move payload refers to.
    #[must_use]
    pub fn layer_id(&self) -> Option<ElementId> {
        if self.effect == DropEffect::Move {
            ElementId::parse(&self.key).ok()
        } else {
            None
        }
    }
}
