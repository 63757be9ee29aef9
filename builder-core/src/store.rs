//! The element store: the ordered collection of elements for one editing session.
//!
//! Store order is paint order (later elements are drawn on top). The layer
//! panel derives its own display order from `styles.zIndex` without touching
//! store order.
//!
//! Lookups that miss (stale ids, out-of-range indices) are silent no-ops:
//! the editor only ever issues ids it just read from current state, so a miss
//! means a stale event rather than a user-facing condition.

use serde::Serialize;

use crate::{Element, ElementId, ElementPatch};

/// Ordered collection of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element under a freshly generated id.
    ///
    /// Any id already on `element` is discarded. Geometry is clamped.
    pub fn add(&mut self, mut element: Element) -> &Element {
        element.id = self.fresh_id();
        element.sanitize_geometry();
        tracing::debug!(
            "Added {} element {} at ({}, {})",
            element.kind(),
            element.id,
            element.position.x,
            element.position.y
        );
        self.elements.push(element);
        &self.elements[self.elements.len() - 1]
    }

    /// Append an element keeping its existing id, as when loading a document.
    ///
    /// Returns `false` without inserting if the id is already present.
    pub fn restore(&mut self, mut element: Element) -> bool {
        if self.contains(element.id) {
            tracing::debug!("Refusing to restore duplicate element {}", element.id);
            return false;
        }
        element.sanitize_geometry();
        self.elements.push(element);
        true
    }

    /// Merge a patch into the element with the given id.
    ///
    /// Returns `false` if no element has that id.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if let Some(element) = self.get_mut(id) {
            patch.apply_to(element);
            true
        } else {
            tracing::trace!("update: element {id} not found");
            false
        }
    }

    /// Remove the element with the given id, returning it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let Some(index) = self.index_of(id) else {
            tracing::trace!("remove: element {id} not found");
            return None;
        };
        let removed = self.elements.remove(index);
        tracing::debug!("Removed {} element {id}", removed.kind());
        Some(removed)
    }

    /// Move the element at `from` to `to`, shifting the elements in between.
    ///
    /// Returns `false` and leaves the order untouched if either index is out
    /// of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.elements.len();
        if from >= len || to >= len {
            tracing::trace!("reorder: {from} -> {to} out of range for {len} elements");
            return false;
        }
        if from != to {
            let element = self.elements.remove(from);
            self.elements.insert(to, element);
        }
        true
    }

    /// Snapshot sorted by descending z-index. Ties keep store order.
    #[must_use]
    pub fn display_order(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|element| std::cmp::Reverse(element.z_index()));
        sorted
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    /// Store index of the element with the given id.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id == id)
    }

    /// Whether an element with the given id is stored.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Topmost visible element containing the point, in paint order.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.is_visible && element.contains_point(x, y))
            .map(|element| element.id)
    }

    /// Elements in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Element ids in store order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|element| element.id).collect()
    }

    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    fn fresh_id(&self) -> ElementId {
        loop {
            let id = ElementId::new();
            if !self.contains(id) {
                return id;
            }
        }
    }
}
