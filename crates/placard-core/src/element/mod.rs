//! Elements placed on the canvas.

mod style;

pub use style::{BoxSides, Color, Side, StyleMap, StyleValue};

use crate::geometry::Geometry;
use base64::Engine;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Kind of an element. Selects its control schema.
///
/// Kinds this build does not know are kept verbatim in `Other` so a document
/// survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Heading,
    Text,
    Image,
    Shape,
    Widget,
    Other(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Heading => "heading",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
            ElementKind::Widget => "widget",
            ElementKind::Other(name) => name,
        }
    }

    /// Whether the element carries editable text content.
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            ElementKind::Heading | ElementKind::Text | ElementKind::Widget | ElementKind::Other(_)
        )
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        match value {
            "heading" => ElementKind::Heading,
            "text" => ElementKind::Text,
            "image" => ElementKind::Image,
            "shape" => ElementKind::Shape,
            "widget" | "genericWidget" => ElementKind::Widget,
            other => ElementKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        ElementKind::from(value.as_str())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Reference to image data: a URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Inline `bytes` as a base64 `data:` URI.
    pub fn from_data(mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime_type};base64,{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Decode the payload of a base64 `data:` URI.
    pub fn decode_data(&self) -> Option<Vec<u8>> {
        let rest = self.0.strip_prefix("data:")?;
        let (_, payload) = rest.split_once(";base64,")?;
        base64::engine::general_purpose::STANDARD.decode(payload).ok()
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 3] = [ShapeType::Rectangle, ShapeType::Circle, ShapeType::Triangle];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Triangle => "triangle",
        }
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangle" => Ok(ShapeType::Rectangle),
            "circle" => Ok(ShapeType::Circle),
            "triangle" => Ok(ShapeType::Triangle),
            other => Err(format!("unknown shape type '{other}'")),
        }
    }
}

/// What an element shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Media(MediaRef),
    Shape(ShapeType),
}

/// A positioned, styled item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub geometry: Geometry,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub content: Content,
    /// Semantic tag such as `H1` or `P`, for text-bearing kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Hidden elements stay in the document but are not drawn or hit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Element {
    pub fn new(kind: ElementKind, geometry: Geometry, content: Content) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            geometry,
            style: StyleMap::new(),
            content,
            tag: None,
            hidden: false,
        }
    }

    pub fn heading(geometry: Geometry, text: impl Into<String>) -> Self {
        let mut element = Self::new(ElementKind::Heading, geometry, Content::Text(text.into()));
        element.tag = Some("H2".to_string());
        element
    }

    pub fn text(geometry: Geometry, text: impl Into<String>) -> Self {
        let mut element = Self::new(ElementKind::Text, geometry, Content::Text(text.into()));
        element.tag = Some("P".to_string());
        element
    }

    pub fn image(geometry: Geometry, media: MediaRef) -> Self {
        Self::new(ElementKind::Image, geometry, Content::Media(media))
    }

    pub fn shape(geometry: Geometry, shape_type: ShapeType) -> Self {
        Self::new(ElementKind::Shape, geometry, Content::Shape(shape_type))
    }

    pub fn widget(geometry: Geometry, label: impl Into<String>) -> Self {
        Self::new(ElementKind::Widget, geometry, Content::Text(label.into()))
    }

    /// Builder-style style attribute.
    pub fn with_style(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.style.insert(key.to_string(), value.into());
        self
    }

    /// A copy carrying a different tag but the same identity, geometry, style and content.
    pub fn with_tag(&self, tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self.clone()
        }
    }

    /// Give the element a fresh identity (used when cloning from templates).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    pub fn media(&self) -> Option<&MediaRef> {
        match &self.content {
            Content::Media(media) => Some(media),
            _ => None,
        }
    }

    pub fn style_value(&self, key: &str) -> Option<&StyleValue> {
        self.style.get(key)
    }

    pub fn set_style(&mut self, key: &str, value: impl Into<StyleValue>) {
        self.style.insert(key.to_string(), value.into());
    }

    pub fn remove_style(&mut self, key: &str) -> Option<StyleValue> {
        self.style.remove(key)
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }

    /// Hit test against the rotated box. Hidden elements are never hit.
    pub fn hit_test(&self, point: Point) -> bool {
        !self.hidden && self.geometry.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for name in ["heading", "text", "image", "shape", "widget", "countdown"] {
            let kind = ElementKind::from(name);
            assert_eq!(String::from(kind.clone()), name);
        }
        assert_eq!(ElementKind::from("genericWidget"), ElementKind::Widget);
        assert_eq!(
            ElementKind::from("countdown"),
            ElementKind::Other("countdown".to_string())
        );
    }

    #[test]
    fn test_unknown_kind_survives_serialization() {
        let element = Element::new(
            ElementKind::Other("countdown".into()),
            Geometry::new(0.0, 0.0, 100.0, 40.0),
            Content::Text("10 days".into()),
        );
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"kind\":\"countdown\""));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_with_tag_keeps_identity() {
        let heading = Element::heading(Geometry::new(0.0, 0.0, 200.0, 50.0), "Hello")
            .with_style("color", Color::rgb(255, 0, 0));
        let replaced = heading.with_tag("H1");
        assert_eq!(replaced.id, heading.id);
        assert_eq!(replaced.style, heading.style);
        assert_eq!(replaced.text_content(), Some("Hello"));
        assert_eq!(replaced.tag.as_deref(), Some("H1"));
    }

    #[test]
    fn test_media_data_uri() {
        let media = MediaRef::from_data("image/png", &[1, 2, 3, 4]);
        assert!(media.is_data_uri());
        assert!(media.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(media.decode_data(), Some(vec![1, 2, 3, 4]));
        assert_eq!(MediaRef::new("https://x.test/a.png").decode_data(), None);
    }

    #[test]
    fn test_shape_type_parse() {
        assert_eq!("Circle".parse::<ShapeType>(), Ok(ShapeType::Circle));
        assert!("hexagon".parse::<ShapeType>().is_err());
    }

    #[test]
    fn test_hit_test() {
        let e = Element::shape(Geometry::new(10.0, 10.0, 50.0, 50.0), ShapeType::Circle);
        assert!(e.hit_test(Point::new(30.0, 30.0)));
        assert!(!e.hit_test(Point::new(80.0, 30.0)));
    }

    #[test]
    fn test_kind_display_honours_width() {
        assert_eq!(format!("{:8}|", ElementKind::Text), "text    |");
        assert_eq!(format!("{:>7}", ElementKind::Shape), "  shape");
    }

    #[test]
    fn test_hidden_element_is_not_hit() {
        let mut e = Element::shape(Geometry::new(10.0, 10.0, 50.0, 50.0), ShapeType::Rectangle);
        e.set_visible(false);
        assert!(!e.is_visible());
        assert!(!e.hit_test(Point::new(30.0, 30.0)));
        e.set_visible(true);
        assert!(e.hit_test(Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_hidden_flag_serialization() {
        let mut e = Element::text(Geometry::new(0.0, 0.0, 100.0, 40.0), "Date");
        let visible = serde_json::to_value(&e).unwrap();
        assert!(visible.get("hidden").is_none());

        e.set_visible(false);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"hidden\":true"));
        let restored: Element = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_visible());
    }
}
