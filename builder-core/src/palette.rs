//! Component palette: the catalog of element blueprints users drag onto the canvas.
//!
//! The palette never mutates the element store. It supplies blueprints; the
//! interaction controller turns a dropped blueprint into an element.

use std::borrow::Cow;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind, Position};

/// Palette grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Text and buttons.
    Basic,
    /// Structural boxes and spacing.
    Layout,
    /// Images and video.
    Media,
    /// Form controls.
    Forms,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Layout, Self::Media, Self::Forms];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Layout => "Layout",
            Self::Media => "Media",
            Self::Forms => "Forms",
        }
    }
}

/// Template for a new element, not yet placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Element type to create.
    pub kind: ElementKind,
    /// Name shown in the palette.
    pub display_name: Cow<'static, str>,
    /// Icon identifier.
    pub icon: Cow<'static, str>,
    /// One-line description.
    pub description: Cow<'static, str>,
    /// Palette group.
    pub category: Category,
}

impl Blueprint {
    const fn builtin(
        kind: ElementKind,
        display_name: &'static str,
        icon: &'static str,
        description: &'static str,
        category: Category,
    ) -> Self {
        Self {
            kind,
            display_name: Cow::Borrowed(display_name),
            icon: Cow::Borrowed(icon),
            description: Cow::Borrowed(description),
            category,
        }
    }

    /// Build an element from this blueprint at the given canvas position.
    ///
    /// The element carries the kind's default size, default content and
    /// default styles. Its id is replaced when the store adds it.
    #[must_use]
    pub fn instantiate(&self, position: Position) -> Element {
        default_styles(self.kind).iter().fold(
            Element::new(self.kind).with_position(position),
            |element, (key, value)| element.with_style(*key, *value),
        )
    }

    /// Case-insensitive substring match over name and description.
    ///
    /// The query is used as typed; surrounding whitespace is significant.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        query.is_empty()
            || self.display_name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

fn default_styles(kind: ElementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        ElementKind::Text => &[("fontSize", "16px"), ("color", "#1f2937")],
        ElementKind::Heading => &[("fontSize", "32px"), ("fontWeight", "700")],
        ElementKind::Button => &[
            ("backgroundColor", "#2563eb"),
            ("color", "#ffffff"),
            ("borderRadius", "6px"),
            ("padding", "12px"),
        ],
        ElementKind::Container | ElementKind::Form => {
            &[("backgroundColor", "#f9fafb"), ("padding", "16px")]
        }
        ElementKind::Section => &[("backgroundColor", "#ffffff"), ("padding", "48px")],
        ElementKind::Divider => &[("backgroundColor", "#e5e7eb")],
        ElementKind::Input => &[("borderWidth", "1px"), ("borderRadius", "4px")],
        ElementKind::Image | ElementKind::Video | ElementKind::Spacer | ElementKind::List => &[],
    }
}

/// The catalog of blueprints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    blueprints: Vec<Blueprint>,
}

impl Palette {
    /// Create a palette from a custom list of blueprints.
    #[must_use]
    pub fn new(blueprints: Vec<Blueprint>) -> Self {
        Self { blueprints }
    }

    /// The built-in palette.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<Palette> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::new(vec![
                Blueprint::builtin(
                    ElementKind::Text,
                    "Text",
                    "type",
                    "A paragraph of body text",
                    Category::Basic,
                ),
                Blueprint::builtin(
                    ElementKind::Heading,
                    "Heading",
                    "heading",
                    "Section title, levels one to six",
                    Category::Basic,
                ),
                Blueprint::builtin(
                    ElementKind::Button,
                    "Button",
                    "mouse-pointer-click",
                    "Call-to-action button with a link",
                    Category::Basic,
                ),
                Blueprint::builtin(
                    ElementKind::List,
                    "List",
                    "list",
                    "Bulleted list of items",
                    Category::Basic,
                ),
                Blueprint::builtin(
                    ElementKind::Container,
                    "Container",
                    "square",
                    "Box that groups other content",
                    Category::Layout,
                ),
                Blueprint::builtin(
                    ElementKind::Section,
                    "Section",
                    "layout-template",
                    "Full-width page band",
                    Category::Layout,
                ),
                Blueprint::builtin(
                    ElementKind::Divider,
                    "Divider",
                    "minus",
                    "Horizontal separator line",
                    Category::Layout,
                ),
                Blueprint::builtin(
                    ElementKind::Spacer,
                    "Spacer",
                    "move-vertical",
                    "Empty vertical space",
                    Category::Layout,
                ),
                Blueprint::builtin(
                    ElementKind::Image,
                    "Image",
                    "image",
                    "Picture with alternative text",
                    Category::Media,
                ),
                Blueprint::builtin(
                    ElementKind::Video,
                    "Video",
                    "video",
                    "Embedded video player",
                    Category::Media,
                ),
                Blueprint::builtin(
                    ElementKind::Form,
                    "Form",
                    "clipboard-list",
                    "Contact or signup form",
                    Category::Forms,
                ),
                Blueprint::builtin(
                    ElementKind::Input,
                    "Input",
                    "text-cursor-input",
                    "Single-line form field",
                    Category::Forms,
                ),
            ])
        })
    }

    /// All blueprints in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Blueprint] {
        &self.blueprints
    }

    /// Blueprint for the given kind.
    #[must_use]
    pub fn find(&self, kind: ElementKind) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.kind == kind)
    }

    /// Blueprints whose name or description contains `query`, ignoring case.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&Blueprint> {
        self.blueprints.iter().filter(|b| b.matches(query)).collect()
    }

    /// Filtered blueprints grouped by category; empty groups are skipped.
    #[must_use]
    pub fn grouped(&self, query: &str) -> Vec<(Category, Vec<&Blueprint>)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let items: Vec<&Blueprint> = self
                    .blueprints
                    .iter()
                    .filter(|b| b.category == category && b.matches(query))
                    .collect();
                (!items.is_empty()).then_some((category, items))
            })
            .collect()
    }
}
