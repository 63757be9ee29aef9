//! # Site Builder Core
//!
//! Editing model for a drag-and-drop website builder.
//! Compiles to WASM so the browser UI and native tools share one model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              builder-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Element Store   │  Interaction             │
//! │  - Add / update  │  - Select                │
//! │  - Remove        │  - Drag with clamping    │
//! │  - Reorder       │  - Palette drops         │
//! ├─────────────────────────────────────────────┤
//! │  Properties      │  Layers                  │
//! │  - Field coerce  │  - zIndex display order  │
//! │  - px suffixes   │  - Lock / visibility     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod layers;
pub mod palette;
pub mod patch;
pub mod properties;
pub mod schema;
pub mod state;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use element::{Element, ElementContent, ElementId, ElementKind, Position, Size, Styles};
pub use error::{BuilderError, BuilderResult};
pub use event::{DragPayload, DropEffect, InputEvent, KeyModifiers, Point, PointerEvent, PointerTarget};
pub use interaction::{InteractionController, InteractionOutcome, InteractionState};
pub use layers::{LayerAction, LayerPanel, LayerRow};
pub use palette::{Blueprint, Category, Palette};
pub use patch::ElementPatch;
pub use properties::{PropertyField, StyleCache};
pub use schema::{CanvasDocument, DesignDocument, ElementDocument, DOCUMENT_VERSION};
pub use state::EditorState;
pub use store::ElementStore;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
