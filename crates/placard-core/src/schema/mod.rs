//! Declarative property-panel schemas, one per element kind.
//!
//! A schema lists the controls shown for an element, grouped into tabs and
//! sections. Each control is bound to one attribute of the element; the
//! [`ControlPanel`] reads and writes through that binding.

mod panel;

pub use panel::{
    BindingOutcome, ControlError, ControlInput, ControlPanel, ControlView, PanelView, SectionView,
    hydrate_defaults, read_binding,
};

use crate::element::{Color, ElementKind, StyleValue};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Text alignment choices.
pub const ALIGNMENTS: &[&str] = &["left", "center", "right", "justify"];

/// Semantic tags a text element can carry.
pub const TAG_OPTIONS: &[&str] = &["H1", "H2", "H3", "H4", "H5", "H6", "P", "SPAN"];

pub const FONT_WEIGHTS: &[&str] = &["100", "300", "400", "600", "700", "900"];

pub const FONT_FAMILIES: &[&str] = &[
    "Inter",
    "Amiri",
    "Cairo",
    "Poppins",
    "Outfit",
    "Montserrat",
    "Playfair Display",
    "Georgia",
    "Roboto",
];

pub const OBJECT_FITS: &[&str] = &["cover", "contain", "fill"];

pub const SHAPE_TYPES: &[&str] = &["rectangle", "circle", "triangle"];

pub const ENTRANCE_ANIMATIONS: &[&str] = &["none", "fadeUp", "fadeIn", "zoomIn", "slideLeft"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Content,
    Style,
    Advanced,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Content, Tab::Style, Tab::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Content => "Content",
            Tab::Style => "Style",
            Tab::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryField {
    Width,
    Height,
    Rotation,
}

/// The element attribute a control reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Text content.
    Text,
    /// Semantic tag. Writing it replaces the element.
    Tag,
    /// Image reference.
    Media,
    ShapeType,
    Geometry(GeometryField),
    /// A style attribute by key.
    Style(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlType {
    Text,
    Textarea,
    Slider {
        min: f64,
        max: f64,
        step: f64,
        unit: Option<&'static str>,
    },
    Color,
    Select(&'static [&'static str]),
    Alignment,
    /// Four-sided box with a linked mode.
    DimensionBox,
    Toggle,
    MediaPicker,
}

/// One control in a panel section.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub id: &'static str,
    pub label: &'static str,
    pub control_type: ControlType,
    pub binding: Binding,
    /// Value written by reset and used to hydrate new elements.
    pub default: Option<StyleValue>,
}

impl Control {
    fn new(id: &'static str, label: &'static str, control_type: ControlType, binding: Binding) -> Self {
        Self {
            id,
            label,
            control_type,
            binding,
            default: None,
        }
    }

    /// A control bound to the style attribute named like the control.
    fn style(id: &'static str, label: &'static str, control_type: ControlType) -> Self {
        Self::new(id, label, control_type, Binding::Style(id))
    }

    fn slider(id: &'static str, label: &'static str, min: f64, max: f64, step: f64, unit: Option<&'static str>) -> Self {
        Self::style(id, label, ControlType::Slider { min, max, step, unit })
    }

    fn with_default(mut self, value: impl Into<StyleValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn bound_to(mut self, binding: Binding) -> Self {
        self.binding = binding;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub controls: Vec<Control>,
}

impl Section {
    fn new(title: &'static str, controls: Vec<Control>) -> Self {
        Self { title, controls }
    }
}

/// Tabs of sections for one element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSchema {
    pub kind: ElementKind,
    pub content: Vec<Section>,
    pub style: Vec<Section>,
    pub advanced: Vec<Section>,
}

impl ControlSchema {
    pub fn sections(&self, tab: Tab) -> &[Section] {
        match tab {
            Tab::Content => &self.content,
            Tab::Style => &self.style,
            Tab::Advanced => &self.advanced,
        }
    }

    /// Look a control up by id across all tabs.
    pub fn find(&self, control_id: &str) -> Option<&Control> {
        self.controls().find(|c| c.id == control_id)
    }

    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        Tab::ALL
            .into_iter()
            .flat_map(move |tab| self.sections(tab))
            .flat_map(|section| section.controls.iter())
    }
}

struct Registry {
    heading: ControlSchema,
    text: ControlSchema,
    image: ControlSchema,
    shape: ControlSchema,
    widget: ControlSchema,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The schema for an element kind.
///
/// Kinds without a schema of their own get the heading controls.
pub fn schema_for(kind: &ElementKind) -> &'static ControlSchema {
    let registry = REGISTRY.get_or_init(|| Registry {
        heading: heading_schema(),
        text: text_schema(),
        image: image_schema(),
        shape: shape_schema(),
        widget: widget_schema(),
    });

    match kind {
        ElementKind::Heading => &registry.heading,
        ElementKind::Text => &registry.text,
        ElementKind::Image => &registry.image,
        ElementKind::Shape => &registry.shape,
        ElementKind::Widget => &registry.widget,
        ElementKind::Other(name) => {
            log::debug!("No control schema for '{}', using heading controls", name);
            &registry.heading
        }
    }
}

fn typography(font_size: f64, font_weight: &str) -> Section {
    Section::new(
        "Typography",
        vec![
            Control::style("color", "Text Color", ControlType::Color).with_default(Color::black()),
            Control::slider("font_size", "Font Size", 10.0, 300.0, 1.0, Some("px")).with_default(font_size),
            Control::style("font_weight", "Font Weight", ControlType::Select(FONT_WEIGHTS))
                .with_default(font_weight),
            Control::style("font_family", "Font Family", ControlType::Select(FONT_FAMILIES))
                .with_default("Inter"),
            Control::slider("line_height", "Line Height", 0.5, 3.0, 0.1, None).with_default(1.2),
            Control::slider("letter_spacing", "Letter Spacing", -5.0, 20.0, 1.0, Some("px"))
                .with_default(0.0),
        ],
    )
}

fn text_effects() -> Section {
    Section::new(
        "Text Effects",
        vec![
            Control::style("text_glow", "Text Glow", ControlType::Toggle).with_default(false),
            Control::slider("blur", "Blur", 0.0, 20.0, 1.0, Some("px")).with_default(0.0),
        ],
    )
}

fn advanced() -> Vec<Section> {
    vec![
        Section::new(
            "Layout",
            vec![
                Control::slider("opacity", "Opacity", 0.0, 1.0, 0.1, None).with_default(1.0),
                Control::slider("rotation", "Rotation", 0.0, 359.0, 1.0, Some("deg"))
                    .bound_to(Binding::Geometry(GeometryField::Rotation)),
                Control::style("margin", "Margin", ControlType::DimensionBox),
                Control::style("padding", "Padding", ControlType::DimensionBox),
            ],
        ),
        Section::new(
            "Motion Effects",
            vec![
                Control::style("entrance_animation", "Entrance Animation", ControlType::Select(ENTRANCE_ANIMATIONS))
                    .with_default("none"),
                Control::slider("animation_delay", "Animation Delay", 0.0, 2000.0, 100.0, Some("ms"))
                    .with_default(0.0),
            ],
        ),
    ]
}

fn heading_schema() -> ControlSchema {
    ControlSchema {
        kind: ElementKind::Heading,
        content: vec![Section::new(
            "Title",
            vec![
                Control::new("text", "Title", ControlType::Textarea, Binding::Text),
                Control::new("tag", "HTML Tag", ControlType::Select(TAG_OPTIONS), Binding::Tag).with_default("H2"),
                Control::style("text_align", "Alignment", ControlType::Alignment).with_default("left"),
            ],
        )],
        style: vec![typography(56.0, "900"), text_effects()],
        advanced: advanced(),
    }
}

fn text_schema() -> ControlSchema {
    ControlSchema {
        kind: ElementKind::Text,
        content: vec![Section::new(
            "Text",
            vec![
                Control::new("text", "Text", ControlType::Textarea, Binding::Text),
                Control::new("tag", "HTML Tag", ControlType::Select(TAG_OPTIONS), Binding::Tag).with_default("P"),
                Control::style("text_align", "Alignment", ControlType::Alignment).with_default("left"),
            ],
        )],
        style: vec![typography(16.0, "400"), text_effects()],
        advanced: advanced(),
    }
}

fn image_schema() -> ControlSchema {
    let size = |id, label, field| {
        Control::slider(id, label, 20.0, 800.0, 1.0, Some("px")).bound_to(Binding::Geometry(field))
    };

    ControlSchema {
        kind: ElementKind::Image,
        content: vec![Section::new(
            "Image",
            vec![
                Control::new("source", "Choose Image", ControlType::MediaPicker, Binding::Media),
                Control::style("object_fit", "Object Fit", ControlType::Select(OBJECT_FITS)).with_default("cover"),
            ],
        )],
        style: vec![
            Section::new(
                "Dimensions",
                vec![
                    size("width", "Width", GeometryField::Width),
                    size("height", "Height", GeometryField::Height),
                ],
            ),
            Section::new(
                "Border",
                vec![
                    Control::slider("border_radius", "Border Radius", 0.0, 100.0, 1.0, Some("px")).with_default(0.0),
                    Control::style("border_color", "Border Color", ControlType::Color).with_default(Color::black()),
                    Control::slider("border_width", "Border Width", 0.0, 20.0, 1.0, Some("px")).with_default(0.0),
                ],
            ),
        ],
        advanced: advanced(),
    }
}

fn shape_schema() -> ControlSchema {
    let size = |id, label, field| {
        Control::slider(id, label, 20.0, 1000.0, 1.0, Some("px")).bound_to(Binding::Geometry(field))
    };

    ControlSchema {
        kind: ElementKind::Shape,
        content: vec![Section::new(
            "Shape",
            vec![
                Control::new("shape_type", "Shape Type", ControlType::Select(SHAPE_TYPES), Binding::ShapeType)
                    .with_default("rectangle"),
            ],
        )],
        style: vec![Section::new(
            "Fill",
            vec![
                Control::style("background_color", "Background Color", ControlType::Color)
                    .with_default(Color::rgb(0x00, 0xf3, 0xff)),
                size("width", "Width", GeometryField::Width),
                size("height", "Height", GeometryField::Height),
                Control::slider("border_radius", "Border Radius", 0.0, 500.0, 1.0, Some("px")).with_default(0.0),
            ],
        )],
        advanced: advanced(),
    }
}

fn widget_schema() -> ControlSchema {
    ControlSchema {
        kind: ElementKind::Widget,
        content: vec![Section::new(
            "Widget",
            vec![
                Control::new("text", "Label", ControlType::Text, Binding::Text),
                Control::style("link", "Link", ControlType::Text),
                Control::style("text_align", "Alignment", ControlType::Alignment).with_default("center"),
            ],
        )],
        style: vec![Section::new(
            "Appearance",
            vec![
                Control::style("background_color", "Background Color", ControlType::Color)
                    .with_default(Color::rgb(0x63, 0x66, 0xf1)),
                Control::style("color", "Text Color", ControlType::Color).with_default(Color::white()),
                Control::slider("font_size", "Font Size", 10.0, 100.0, 1.0, Some("px")).with_default(16.0),
                Control::slider("border_radius", "Border Radius", 0.0, 100.0, 1.0, Some("px")).with_default(4.0),
            ],
        )],
        advanced: advanced(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_three_tabs() {
        for kind in [
            ElementKind::Heading,
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Shape,
            ElementKind::Widget,
        ] {
            let schema = schema_for(&kind);
            assert_eq!(schema.kind, kind);
            for tab in Tab::ALL {
                assert!(!schema.sections(tab).is_empty(), "{kind} has empty {tab:?} tab");
            }
        }
    }

    #[test]
    fn test_unknown_kind_falls_back_to_heading() {
        let schema = schema_for(&ElementKind::Other("countdown".into()));
        assert_eq!(schema.kind, ElementKind::Heading);
    }

    #[test]
    fn test_control_ids_unique_per_schema() {
        for kind in [ElementKind::Heading, ElementKind::Image, ElementKind::Shape] {
            let schema = schema_for(&kind);
            let mut seen = HashSet::new();
            for control in schema.controls() {
                assert!(seen.insert(control.id), "duplicate control {} in {kind}", control.id);
            }
        }
    }

    #[test]
    fn test_heading_tag_options() {
        let tag = schema_for(&ElementKind::Heading).find("tag").unwrap();
        assert_eq!(tag.binding, Binding::Tag);
        assert_eq!(tag.control_type, ControlType::Select(TAG_OPTIONS));
    }

    #[test]
    fn test_no_stacking_control() {
        // Stacking order lives in the canvas, never in a style attribute.
        for kind in [ElementKind::Heading, ElementKind::Image, ElementKind::Shape, ElementKind::Widget] {
            assert!(schema_for(&kind).find("z_index").is_none());
        }
    }
}
