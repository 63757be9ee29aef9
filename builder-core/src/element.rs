//! Page elements - the units placed on the design canvas.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// CSS property name to value.
pub type Styles = BTreeMap<String, String>;

/// Style key holding the layer ordering hint.
pub const Z_INDEX_KEY: &str = "zIndex";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed vocabulary of element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Paragraph text.
    Text,
    /// Heading (h1-h6).
    Heading,
    /// Clickable button or link.
    Button,
    /// Image with alternative text.
    Image,
    /// Generic box that holds other content.
    Container,
    /// Horizontal rule.
    Divider,
    /// Empty vertical space.
    Spacer,
    /// Embedded video.
    Video,
    /// Form wrapper.
    Form,
    /// Single form input.
    Input,
    /// Bulleted list.
    List,
    /// Full-width page section.
    Section,
}

impl ElementKind {
    /// Every kind, in palette order.
    pub const ALL: [Self; 12] = [
        Self::Text,
        Self::Heading,
        Self::Button,
        Self::Image,
        Self::Container,
        Self::Divider,
        Self::Spacer,
        Self::Video,
        Self::Form,
        Self::Input,
        Self::List,
        Self::Section,
    ];

    /// The string key used in drag payloads and documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Button => "button",
            Self::Image => "image",
            Self::Container => "container",
            Self::Divider => "divider",
            Self::Spacer => "spacer",
            Self::Video => "video",
            Self::Form => "form",
            Self::Input => "input",
            Self::List => "list",
            Self::Section => "section",
        }
    }

    /// Look up a kind by its string key (case-insensitive).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(key))
    }

    /// Default size for a freshly dropped element of this kind.
    #[must_use]
    pub const fn default_size(self) -> Size {
        match self {
            Self::Text => Size::new(200.0, 100.0),
            Self::Heading => Size::new(300.0, 60.0),
            Self::Button => Size::new(140.0, 44.0),
            Self::Image | Self::Video => Size::new(320.0, 200.0),
            Self::Container | Self::Form => Size::new(400.0, 240.0),
            Self::Divider => Size::new(400.0, 2.0),
            Self::Spacer => Size::new(400.0, 40.0),
            Self::Input => Size::new(240.0, 40.0),
            Self::List => Size::new(240.0, 120.0),
            Self::Section => Size::new(960.0, 400.0),
        }
    }

    /// Default content for a freshly dropped element of this kind.
    #[must_use]
    pub fn default_content(self) -> ElementContent {
        match self {
            Self::Text => ElementContent::Text {
                text: "Edit this text".to_string(),
            },
            Self::Heading => ElementContent::Heading {
                text: "Heading".to_string(),
                level: 2,
            },
            Self::Button => ElementContent::Button {
                label: "Click me".to_string(),
                href: "#".to_string(),
            },
            Self::Image => ElementContent::Image {
                src: "https://placehold.co/320x200".to_string(),
                alt: "Placeholder image".to_string(),
            },
            Self::Input => ElementContent::Plain {
                text: "Enter a value".to_string(),
            },
            Self::List => ElementContent::Plain {
                text: "First item\nSecond item".to_string(),
            },
            Self::Container
            | Self::Divider
            | Self::Spacer
            | Self::Video
            | Self::Form
            | Self::Section => ElementContent::Plain {
                text: String::new(),
            },
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a coordinate or dimension into the finite, non-negative range.
#[must_use]
pub fn clamp_non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Pixel offset of an element within the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge.
    pub x: f32,
    /// Pixels from the top edge.
    pub y: f32,
}

impl Position {
    /// Create a position without clamping.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a position clamped to `>= 0` on both axes.
    #[must_use]
    pub fn clamped(x: f32, y: f32) -> Self {
        Self {
            x: clamp_non_negative(x),
            y: clamp_non_negative(y),
        }
    }
}

/// Pixel dimensions of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size without clamping.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a size clamped to `>= 0` on both axes.
    #[must_use]
    pub fn clamped(width: f32, height: f32) -> Self {
        Self {
            width: clamp_non_negative(width),
            height: clamp_non_negative(height),
        }
    }
}

/// Content of an element, one shape per element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ElementContent {
    /// Paragraph text.
    Text {
        /// Body text.
        text: String,
    },
    /// Heading text and level.
    Heading {
        /// Heading text.
        text: String,
        /// Heading level, 1 through 6.
        level: u8,
    },
    /// Button label and link target.
    Button {
        /// Visible label.
        label: String,
        /// Link target.
        href: String,
    },
    /// Image source and alternative text.
    Image {
        /// Image URL or data URI.
        src: String,
        /// Alternative text.
        alt: String,
    },
    /// Single free-form text value used by every other kind.
    Plain {
        /// Free-form text.
        text: String,
    },
}

impl ElementContent {
    /// Whether this content shape belongs to the given kind.
    #[must_use]
    pub const fn fits(&self, kind: ElementKind) -> bool {
        matches!(
            (self, kind),
            (Self::Text { .. }, ElementKind::Text)
                | (Self::Heading { .. }, ElementKind::Heading)
                | (Self::Button { .. }, ElementKind::Button)
                | (Self::Image { .. }, ElementKind::Image)
                | (
                    Self::Plain { .. },
                    ElementKind::Container
                        | ElementKind::Divider
                        | ElementKind::Spacer
                        | ElementKind::Video
                        | ElementKind::Form
                        | ElementKind::Input
                        | ElementKind::List
                        | ElementKind::Section
                )
        )
    }

    /// Short human-readable summary, used for layer names.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Text { text } | Self::Heading { text, .. } | Self::Plain { text } => text,
            Self::Button { label, .. } => label,
            Self::Image { alt, .. } => alt,
        }
    }
}

/// An element placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element type. Immutable after creation.
    kind: ElementKind,
    /// Offset within the canvas.
    pub position: Position,
    /// Dimensions.
    pub size: Size,
    /// CSS properties.
    #[serde(default)]
    pub styles: Styles,
    /// Type-specific content.
    content: ElementContent,
    /// Whether the element is painted on the canvas.
    #[serde(default = "default_true")]
    pub is_visible: bool,
    /// Whether drag gestures are rejected for this element.
    #[serde(default)]
    pub is_locked: bool,
}

const fn default_true() -> bool {
    true
}

impl Element {
    /// Create a new element of the given kind with its default content and size.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            position: Position::default(),
            size: kind.default_size(),
            styles: Styles::new(),
            content: kind.default_content(),
            is_visible: true,
            is_locked: false,
        }
    }

    /// Set the position, clamped to the canvas.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Position::clamped(position.x, position.y);
        self
    }

    /// Set the size, clamped to non-negative dimensions.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Size::clamped(size.width, size.height);
        self
    }

    /// Set a style property.
    #[must_use]
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Replace the content; ignored when the shape does not fit this kind.
    #[must_use]
    pub fn with_content(mut self, content: ElementContent) -> Self {
        self.set_content(content);
        self
    }

    /// The element type.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The element content.
    #[must_use]
    pub const fn content(&self) -> &ElementContent {
        &self.content
    }

    /// Replace the content if its shape fits this element's kind.
    ///
    /// Returns `false` and leaves the content untouched otherwise.
    pub fn set_content(&mut self, content: ElementContent) -> bool {
        if content.fits(self.kind) {
            self.content = content;
            true
        } else {
            tracing::debug!(
                "Ignoring {:?} content for {} element {}",
                content,
                self.kind,
                self.id
            );
            false
        }
    }

    /// Layer ordering hint read from `styles.zIndex`, defaulting to 0.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.styles
            .get(Z_INDEX_KEY)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0)
    }

    /// Clamp geometry back into the finite, non-negative range.
    pub fn sanitize_geometry(&mut self) {
        self.position = Position::clamped(self.position.x, self.position.y);
        self.size = Size::clamped(self.size.width, self.size.height);
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.position.x
            && x <= self.position.x + self.size.width
            && y >= self.position.y
            && y <= self.position.y + self.size.height
    }
}
