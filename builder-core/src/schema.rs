//! Canonical serialized form of a page design, stored as a project's design data.

use serde::{Deserialize, Serialize};

use crate::element::{ElementContent, ElementKind, Position, Size, Styles};
use crate::{BuilderError, BuilderResult, Element, ElementId, ElementStore};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Document-friendly element description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDocument {
    /// Element identifier.
    pub id: String,
    /// Element type.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Canvas offset.
    pub position: Position,
    /// Dimensions.
    pub size: Size,
    /// CSS properties.
    #[serde(default)]
    pub styles: Styles,
    /// Type-specific content.
    pub content: ElementContent,
    /// Visibility flag.
    #[serde(default = "ElementDocument::default_visible")]
    pub is_visible: bool,
    /// Lock flag.
    #[serde(default)]
    pub is_locked: bool,
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            kind: element.kind(),
            position: element.position,
            size: element.size,
            styles: element.styles.clone(),
            content: element.content().clone(),
            is_visible: element.is_visible,
            is_locked: element.is_locked,
        }
    }
}

impl ElementDocument {
    const fn default_visible() -> bool {
        true
    }

    /// Convert document to runtime element.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidDocument`] if the id is not a valid
    /// UUID or the content shape does not match the element type.
    pub fn into_element(self) -> BuilderResult<Element> {
        let id = ElementId::parse(&self.id)
            .map_err(|e| BuilderError::InvalidDocument(format!("element id {}: {e}", self.id)))?;
        if !self.content.fits(self.kind) {
            return Err(BuilderError::InvalidDocument(format!(
                "element {} has content that does not fit type {}",
                self.id, self.kind
            )));
        }
        let mut element = Element::new(self.kind)
            .with_position(self.position)
            .with_size(self.size)
            .with_content(self.content);
        element.id = id;
        element.styles = self.styles;
        element.is_visible = self.is_visible;
        element.is_locked = self.is_locked;
        Ok(element)
    }
}

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Serialized page design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Format version.
    #[serde(default = "DesignDocument::default_version")]
    pub version: u32,
    /// Canvas dimensions.
    #[serde(default)]
    pub canvas: CanvasDocument,
    /// Elements in store (paint) order.
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

impl Default for DesignDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            canvas: CanvasDocument::default(),
            elements: Vec::new(),
        }
    }
}

impl DesignDocument {
    const fn default_version() -> u32 {
        DOCUMENT_VERSION
    }

    /// Build from an element store.
    #[must_use]
    pub fn from_store(store: &ElementStore, canvas: CanvasDocument) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            canvas,
            elements: store.iter().map(ElementDocument::from).collect(),
        }
    }

    /// Convert back into an element store, preserving ids and order.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidDocument`] for malformed elements or
    /// duplicate ids.
    pub fn into_store(self) -> BuilderResult<ElementStore> {
        let mut store = ElementStore::new();
        for element_doc in self.elements {
            let element = element_doc.into_element()?;
            let id = element.id;
            if !store.restore(element) {
                return Err(BuilderError::InvalidDocument(format!(
                    "duplicate element id {id}"
                )));
            }
        }
        Ok(store)
    }

    /// Serialize to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> BuilderResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a design document.
    pub fn from_value(value: serde_json::Value) -> BuilderResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
