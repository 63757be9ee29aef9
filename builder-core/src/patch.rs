//! Partial element updates merged key-by-key into stored elements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::{clamp_non_negative, Element, ElementContent};

/// A partial update to an element.
///
/// Only the fields that are set are written. `position` and `size` merge per
/// axis, `styles` merges per key (a `None` value removes the key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New X position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// New Y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Style keys to set (`Some`) or remove (`None`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, Option<String>>,
    /// Replacement content. Must fit the element's kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ElementContent>,
    /// New visibility flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    /// New lock flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl ElementPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both position axes.
    #[must_use]
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set both dimensions.
    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set a style key.
    #[must_use]
    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(key.into(), Some(value.into()));
        self
    }

    /// Remove a style key.
    #[must_use]
    pub fn remove_style(mut self, key: impl Into<String>) -> Self {
        self.styles.insert(key.into(), None);
        self
    }

    /// Replace the content.
    #[must_use]
    pub fn content(mut self, content: ElementContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = Some(visible);
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.is_locked = Some(locked);
        self
    }

    /// Whether the patch writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge this patch into an element. Geometry is clamped on the way in.
    pub fn apply_to(&self, element: &mut Element) {
        if let Some(x) = self.x {
            element.position.x = clamp_non_negative(x);
        }
        if let Some(y) = self.y {
            element.position.y = clamp_non_negative(y);
        }
        if let Some(width) = self.width {
            element.size.width = clamp_non_negative(width);
        }
        if let Some(height) = self.height {
            element.size.height = clamp_non_negative(height);
        }
        for (key, value) in &self.styles {
            match value {
                Some(value) => {
                    element.styles.insert(key.clone(), value.clone());
                }
                None => {
                    element.styles.remove(key);
                }
            }
        }
        if let Some(ref content) = self.content {
            element.set_content(content.clone());
        }
        if let Some(visible) = self.is_visible {
            element.is_visible = visible;
        }
        if let Some(locked) = self.is_locked {
            element.is_locked = locked;
        }
    }
}
