//! Property editor: form fields bound to the selected element.
//!
//! Every edit writes straight through to the [`ElementStore`]; there is no
//! draft state. Numeric input never fails: unparseable text becomes 0
//! (1 for opacity) so `NaN` can never reach the store.

use serde::{Deserialize, Serialize};

use crate::element::{ElementContent, ElementKind, Styles, Z_INDEX_KEY};
use crate::{Element, ElementId, ElementPatch, ElementStore};

/// Editable field in the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyField {
    /// Body text (text, heading and plain content).
    Text,
    /// Heading level, 1 through 6.
    HeadingLevel,
    /// Button label.
    Label,
    /// Button link target.
    Href,
    /// Image source.
    Src,
    /// Image alternative text.
    Alt,
    /// X position.
    X,
    /// Y position.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// `fontSize` style, in pixels.
    FontSize,
    /// `color` style.
    Color,
    /// `backgroundColor` style.
    BackgroundColor,
    /// `padding` style, in pixels.
    Padding,
    /// `margin` style, in pixels.
    Margin,
    /// `borderRadius` style, in pixels.
    BorderRadius,
    /// `borderWidth` style, in pixels.
    BorderWidth,
    /// `opacity` style, 0 to 1.
    Opacity,
    /// `zIndex` style, integer.
    ZIndex,
}

/// How a field's raw input is interpreted and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Part of the element's typed content.
    Content,
    /// Position or size, stored as a number.
    Geometry,
    /// Style stored as `"<n>px"`.
    Pixels(&'static str),
    /// Style stored verbatim; empty input removes it.
    Free(&'static str),
    /// Style stored as a number clamped to `[0, 1]`.
    Opacity,
    /// Style stored as an integer.
    Integer(&'static str),
}

const LAYOUT_FIELDS: [PropertyField; 4] = [
    PropertyField::X,
    PropertyField::Y,
    PropertyField::Width,
    PropertyField::Height,
];

const STYLE_FIELDS: [PropertyField; 9] = [
    PropertyField::FontSize,
    PropertyField::Color,
    PropertyField::BackgroundColor,
    PropertyField::Padding,
    PropertyField::Margin,
    PropertyField::BorderRadius,
    PropertyField::BorderWidth,
    PropertyField::Opacity,
    PropertyField::ZIndex,
];

impl PropertyField {
    /// Storage semantics of this field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Text | Self::HeadingLevel | Self::Label | Self::Href | Self::Src | Self::Alt => {
                FieldKind::Content
            }
            Self::X | Self::Y | Self::Width | Self::Height => FieldKind::Geometry,
            Self::FontSize => FieldKind::Pixels("fontSize"),
            Self::Padding => FieldKind::Pixels("padding"),
            Self::Margin => FieldKind::Pixels("margin"),
            Self::BorderRadius => FieldKind::Pixels("borderRadius"),
            Self::BorderWidth => FieldKind::Pixels("borderWidth"),
            Self::Color => FieldKind::Free("color"),
            Self::BackgroundColor => FieldKind::Free("backgroundColor"),
            Self::Opacity => FieldKind::Opacity,
            Self::ZIndex => FieldKind::Integer(Z_INDEX_KEY),
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::HeadingLevel => "Level",
            Self::Label => "Label",
            Self::Href => "Link",
            Self::Src => "Image URL",
            Self::Alt => "Alt text",
            Self::X => "X",
            Self::Y => "Y",
            Self::Width => "Width",
            Self::Height => "Height",
            Self::FontSize => "Font size",
            Self::Color => "Text color",
            Self::BackgroundColor => "Background",
            Self::Padding => "Padding",
            Self::Margin => "Margin",
            Self::BorderRadius => "Border radius",
            Self::BorderWidth => "Border width",
            Self::Opacity => "Opacity",
            Self::ZIndex => "Layer order",
        }
    }
}

/// Content fields offered for an element kind.
#[must_use]
pub fn content_fields(kind: ElementKind) -> &'static [PropertyField] {
    match kind {
        ElementKind::Heading => &[PropertyField::Text, PropertyField::HeadingLevel],
        ElementKind::Button => &[PropertyField::Label, PropertyField::Href],
        ElementKind::Image => &[PropertyField::Src, PropertyField::Alt],
        ElementKind::Text
        | ElementKind::Container
        | ElementKind::Divider
        | ElementKind::Spacer
        | ElementKind::Video
        | ElementKind::Form
        | ElementKind::Input
        | ElementKind::List
        | ElementKind::Section => &[PropertyField::Text],
    }
}

/// Every field offered for an element kind: content, then layout, then style.
#[must_use]
pub fn fields_for(kind: ElementKind) -> Vec<PropertyField> {
    content_fields(kind)
        .iter()
        .chain(LAYOUT_FIELDS.iter())
        .chain(STYLE_FIELDS.iter())
        .copied()
        .collect()
}

/// Parse a number from free-form input, accepting an optional `px` suffix.
///
/// Returns `fallback` for anything that is not a finite number.
#[must_use]
pub fn parse_number(raw: &str, fallback: f32) -> f32 {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    digits
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(fallback)
}

/// Build the patch an edit produces for `element`.
///
/// Returns `None` when the field does not apply to the element's content
/// shape.
#[must_use]
pub fn patch_for(element: &Element, field: PropertyField, raw: &str) -> Option<ElementPatch> {
    let patch = ElementPatch::new();
    let patch = match field.kind() {
        FieldKind::Content => patch.content(edit_content(element.content(), field, raw)?),
        FieldKind::Geometry => {
            let value = parse_number(raw, 0.0);
            let mut patch = patch;
            match field {
                PropertyField::X => patch.x = Some(value),
                PropertyField::Y => patch.y = Some(value),
                PropertyField::Width => patch.width = Some(value),
                _ => patch.height = Some(value),
            }
            patch
        }
        FieldKind::Pixels(key) => patch.style(key, format!("{}px", parse_number(raw, 0.0))),
        FieldKind::Free(key) => {
            let value = raw.trim();
            if value.is_empty() {
                patch.remove_style(key)
            } else {
                patch.style(key, value)
            }
        }
        FieldKind::Opacity => {
            patch.style("opacity", parse_number(raw, 1.0).clamp(0.0, 1.0).to_string())
        }
        FieldKind::Integer(key) => {
            let value = raw
                .trim()
                .parse::<i32>()
                .unwrap_or_else(|_| round_to_i32(parse_number(raw, 0.0)));
            patch.style(key, value.to_string())
        }
    };
    Some(patch)
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i32(value: f32) -> i32 {
    // `as` saturates at the i32 bounds
    value.round() as i32
}

fn edit_content(
    current: &ElementContent,
    field: PropertyField,
    raw: &str,
) -> Option<ElementContent> {
    let value = raw.to_string();
    match (current, field) {
        (ElementContent::Text { .. }, PropertyField::Text) => {
            Some(ElementContent::Text { text: value })
        }
        (ElementContent::Plain { .. }, PropertyField::Text) => {
            Some(ElementContent::Plain { text: value })
        }
        (ElementContent::Heading { level, .. }, PropertyField::Text) => {
            Some(ElementContent::Heading {
                text: value,
                level: *level,
            })
        }
        (ElementContent::Heading { text, .. }, PropertyField::HeadingLevel) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let level = parse_number(raw, 0.0).round().clamp(1.0, 6.0) as u8;
            Some(ElementContent::Heading {
                text: text.clone(),
                level,
            })
        }
        (ElementContent::Button { href, .. }, PropertyField::Label) => {
            Some(ElementContent::Button {
                label: value,
                href: href.clone(),
            })
        }
        (ElementContent::Button { label, .. }, PropertyField::Href) => {
            Some(ElementContent::Button {
                label: label.clone(),
                href: value,
            })
        }
        (ElementContent::Image { alt, .. }, PropertyField::Src) => Some(ElementContent::Image {
            src: value,
            alt: alt.clone(),
        }),
        (ElementContent::Image { src, .. }, PropertyField::Alt) => Some(ElementContent::Image {
            src: src.clone(),
            alt: value,
        }),
        _ => None,
    }
}

/// Apply an edit to the element with the given id.
///
/// Returns `false` when the element is gone or the field does not apply.
/// Locked elements remain editable here.
pub fn apply(store: &mut ElementStore, id: ElementId, field: PropertyField, raw: &str) -> bool {
    let Some(patch) = store.get(id).and_then(|element| patch_for(element, field, raw)) else {
        tracing::trace!("property {field:?} not applicable to {id}");
        return false;
    };
    store.update(id, &patch)
}

/// Current value of a field, formatted for display (`"72px"`, `"0.5"`).
#[must_use]
pub fn display_value(element: &Element, field: PropertyField) -> String {
    match field.kind() {
        FieldKind::Content => match (element.content(), field) {
            (
                ElementContent::Text { text }
                | ElementContent::Plain { text }
                | ElementContent::Heading { text, .. },
                PropertyField::Text,
            ) => text.clone(),
            (ElementContent::Heading { level, .. }, PropertyField::HeadingLevel) => {
                level.to_string()
            }
            (ElementContent::Button { label, .. }, PropertyField::Label) => label.clone(),
            (ElementContent::Button { href, .. }, PropertyField::Href) => href.clone(),
            (ElementContent::Image { src, .. }, PropertyField::Src) => src.clone(),
            (ElementContent::Image { alt, .. }, PropertyField::Alt) => alt.clone(),
            _ => String::new(),
        },
        FieldKind::Geometry => match field {
            PropertyField::X => element.position.x.to_string(),
            PropertyField::Y => element.position.y.to_string(),
            PropertyField::Width => element.size.width.to_string(),
            _ => element.size.height.to_string(),
        },
        FieldKind::Pixels(key) => style_label(&element.styles, key, "0px"),
        FieldKind::Free(key) => style_label(&element.styles, key, ""),
        FieldKind::Opacity => style_label(&element.styles, "opacity", "1"),
        FieldKind::Integer(key) => style_label(&element.styles, key, "0"),
    }
}

fn style_label(styles: &Styles, key: &str, default: &str) -> String {
    styles
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Render cache of the selected element's styles.
///
/// Kept in sync by calling [`StyleCache::sync`] whenever the selection or
/// the store changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleCache {
    element: Option<ElementId>,
    styles: Styles,
}

impl StyleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh from the store for the given selection.
    pub fn sync(&mut self, store: &ElementStore, selected: Option<ElementId>) {
        match selected.and_then(|id| store.get(id)) {
            Some(element) => {
                self.element = Some(element.id);
                self.styles.clone_from(&element.styles);
            }
            None => {
                self.element = None;
                self.styles.clear();
            }
        }
    }

    /// The element the cache reflects.
    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Cached style value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.styles.get(key).map(String::as_str)
    }

    /// All cached styles.
    #[must_use]
    pub const fn styles(&self) -> &Styles {
        &self.styles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Position, Size};

    fn store_with(kind: ElementKind) -> (ElementStore, ElementId) {
        let mut store = ElementStore::new();
        let id = store.add(Element::new(kind)).id;
        (store, id)
    }

    #[test]
    fn fields_follow_element_kind() {
        assert_eq!(
            content_fields(ElementKind::Image),
            &[PropertyField::Src, PropertyField::Alt]
        );
        assert_eq!(content_fields(ElementKind::Section), &[PropertyField::Text]);

        let fields = fields_for(ElementKind::Button);
        assert_eq!(fields[..2], [PropertyField::Label, PropertyField::Href]);
        assert!(fields.contains(&PropertyField::Opacity));
        assert!(fields.contains(&PropertyField::Width));
    }

    #[test]
    fn font_size_gets_pixel_unit() {
        let (mut store, id) = store_with(ElementKind::Text);
        assert!(apply(&mut store, id, PropertyField::FontSize, "72"));

        let element = store.get(id).expect("exists");
        assert_eq!(element.styles.get("fontSize").map(String::as_str), Some("72px"));
        assert_eq!(display_value(element, PropertyField::FontSize), "72px");
    }

    #[test]
    fn pixel_suffix_is_not_doubled() {
        let (mut store, id) = store_with(ElementKind::Text);
        apply(&mut store, id, PropertyField::Padding, "12px");
        let element = store.get(id).expect("exists");
        assert_eq!(element.styles.get("padding").map(String::as_str), Some("12px"));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let (mut store, id) = store_with(ElementKind::Text);
        apply(&mut store, id, PropertyField::X, "abc");
        apply(&mut store, id, PropertyField::Width, "NaN");
        apply(&mut store, id, PropertyField::BorderRadius, "round");
        apply(&mut store, id, PropertyField::Opacity, "half");

        let element = store.get(id).expect("exists");
        assert_eq!(element.position.x, 0.0);
        assert_eq!(element.size.width, 0.0);
        assert_eq!(element.styles.get("borderRadius").map(String::as_str), Some("0px"));
        assert_eq!(element.styles.get("opacity").map(String::as_str), Some("1"));
    }

    #[test]
    fn opacity_is_clamped() {
        let (mut store, id) = store_with(ElementKind::Container);
        apply(&mut store, id, PropertyField::Opacity, "0.25");
        assert_eq!(
            display_value(store.get(id).expect("exists"), PropertyField::Opacity),
            "0.25"
        );
        apply(&mut store, id, PropertyField::Opacity, "4");
        assert_eq!(
            display_value(store.get(id).expect("exists"), PropertyField::Opacity),
            "1"
        );
    }

    #[test]
    fn geometry_edits_merge_single_axis() {
        let (mut store, id) = store_with(ElementKind::Text);
        store.update(id, &ElementPatch::new().position(30.0, 40.0).size(200.0, 100.0));

        apply(&mut store, id, PropertyField::Y, "90");
        let element = store.get(id).expect("exists");
        assert_eq!(element.position, Position::new(30.0, 90.0));
        assert_eq!(element.size, Size::new(200.0, 100.0));
    }

    #[test]
    fn content_edits_keep_sibling_fields() {
        let (mut store, id) = store_with(ElementKind::Button);
        apply(&mut store, id, PropertyField::Label, "Buy now");
        apply(&mut store, id, PropertyField::Href, "/checkout");
        assert_eq!(
            store.get(id).expect("exists").content(),
            &ElementContent::Button {
                label: "Buy now".to_string(),
                href: "/checkout".to_string(),
            }
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        let (mut store, id) = store_with(ElementKind::Heading);
        apply(&mut store, id, PropertyField::HeadingLevel, "9");
        assert_eq!(
            display_value(store.get(id).expect("exists"), PropertyField::HeadingLevel),
            "6"
        );
        apply(&mut store, id, PropertyField::HeadingLevel, "junk");
        assert_eq!(
            display_value(store.get(id).expect("exists"), PropertyField::HeadingLevel),
            "1"
        );
    }

    #[test]
    fn mismatched_content_field_is_noop() {
        let (mut store, id) = store_with(ElementKind::Text);
        let before = store.clone();
        assert!(!apply(&mut store, id, PropertyField::Src, "a.png"));
        assert_eq!(store, before);
    }

    #[test]
    fn empty_color_removes_style() {
        let (mut store, id) = store_with(ElementKind::Text);
        apply(&mut store, id, PropertyField::Color, "#ff0000");
        apply(&mut store, id, PropertyField::Color, "  ");
        assert!(!store.get(id).expect("exists").styles.contains_key("color"));
    }

    #[test]
    fn locked_elements_remain_editable() {
        let (mut store, id) = store_with(ElementKind::Text);
        store.update(id, &ElementPatch::new().locked(true));
        assert!(apply(&mut store, id, PropertyField::X, "120"));
        assert_eq!(store.get(id).expect("exists").position.x, 120.0);
    }

    #[test]
    fn z_index_accepts_integers() {
        let (mut store, id) = store_with(ElementKind::Text);
        apply(&mut store, id, PropertyField::ZIndex, "3");
        assert_eq!(store.get(id).expect("exists").z_index(), 3);
        apply(&mut store, id, PropertyField::ZIndex, "2.6");
        assert_eq!(store.get(id).expect("exists").z_index(), 3);
    }

    #[test]
    fn style_cache_follows_selection() {
        let (mut store, id) = store_with(ElementKind::Text);
        let mut cache = StyleCache::new();

        cache.sync(&store, Some(id));
        assert_eq!(cache.element(), Some(id));
        assert_eq!(cache.get("fontSize"), None);

        apply(&mut store, id, PropertyField::FontSize, "20");
        cache.sync(&store, Some(id));
        assert_eq!(cache.get("fontSize"), Some("20px"));

        cache.sync(&store, None);
        assert_eq!(cache.element(), None);
        assert!(cache.styles().is_empty());
    }

    #[test]
    fn parse_number_handles_suffix_and_garbage() {
        assert_eq!(parse_number(" 14px ", 0.0), 14.0);
        assert_eq!(parse_number("1e3", 0.0), 1000.0);
        assert_eq!(parse_number("inf", 0.0), 0.0);
        assert_eq!(parse_number("", 1.0), 1.0);
    }
}
