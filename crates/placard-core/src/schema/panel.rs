//! The property panel: renders a schema against an element and writes
//! control edits back through their bindings.

use super::{ALIGNMENTS, Binding, Control, ControlType, GeometryField, Tab, schema_for};
use crate::canvas::Canvas;
use crate::element::{BoxSides, Content, Element, ElementId, ElementKind, MediaRef, ShapeType, Side, StyleValue};
use crate::geometry::{MIN_SIZE, normalize_rotation};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("no control '{control}' for {kind} elements")]
    UnknownControl { control: String, kind: String },
    #[error("invalid value for '{control}': {reason}")]
    InvalidValue { control: String, reason: String },
}

/// What the user did to a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    Value(StyleValue),
    /// Edit one side of a dimension box.
    Side { side: Side, value: f64 },
    /// Toggle a dimension box's linked mode.
    Linked(bool),
}

impl From<StyleValue> for ControlInput {
    fn from(value: StyleValue) -> Self {
        ControlInput::Value(value)
    }
}

/// Side effects of a write that the caller must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingOutcome {
    /// The element was swapped for a new one with the same id.
    pub replaced: bool,
    /// The panel shows stale values and must be rebuilt.
    pub rerender_panel: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlView {
    pub id: &'static str,
    pub label: &'static str,
    pub control_type: ControlType,
    /// Current value, or the default when the attribute is unset.
    pub value: Option<StyleValue>,
    pub is_default: bool,
}

impl ControlView {
    /// The value as the panel prints it. Colors are always `#rrggbb`.
    pub fn display_value(&self) -> String {
        self.value.as_ref().map(StyleValue::display).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub title: &'static str,
    pub controls: Vec<ControlView>,
}

/// A rendered panel for one element and tab.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub element: ElementId,
    pub kind: ElementKind,
    pub tab: Tab,
    pub sections: Vec<SectionView>,
}

impl PanelView {
    pub fn control(&self, id: &str) -> Option<&ControlView> {
        self.sections
            .iter()
            .flat_map(|s| s.controls.iter())
            .find(|c| c.id == id)
    }

    /// Keep controls whose label contains `term` (case-insensitive) and drop
    /// sections left empty. An empty term keeps everything.
    pub fn filtered(mut self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self;
        }
        for section in &mut self.sections {
            section
                .controls
                .retain(|c| c.label.to_lowercase().contains(&term));
        }
        self.sections.retain(|s| !s.controls.is_empty());
        self
    }
}

/// Panel state: the active tab and the search term.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    tab: Tab,
    search: String,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switch tabs. Never touches the element.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Build the view of the active tab for `element`.
    pub fn render(&self, element: &Element) -> PanelView {
        let schema = schema_for(&element.kind);
        let sections = schema
            .sections(self.tab)
            .iter()
            .map(|section| SectionView {
                title: section.title,
                controls: section.controls.iter().map(|c| view_control(element, c)).collect(),
            })
            .collect();

        PanelView {
            element: element.id,
            kind: element.kind.clone(),
            tab: self.tab,
            sections,
        }
        .filtered(&self.search)
    }

    /// Write a control edit into the canvas.
    ///
    /// Does not touch history; the caller decides whether the edit is a
    /// live preview or a committed change.
    pub fn apply(
        &self,
        canvas: &mut Canvas,
        id: ElementId,
        control_id: &str,
        input: ControlInput,
    ) -> Result<BindingOutcome, ControlError> {
        let element = canvas.get(id).ok_or(ControlError::ElementNotFound(id))?;
        let control = find_control(element, control_id)?;

        let value = match input {
            ControlInput::Value(value) => coerce(control, value)?,
            ControlInput::Side { side, value } => {
                if !value.is_finite() {
                    return Err(invalid(control, format!("{} is not a finite number", value)));
                }
                let mut sides = current_sides(element, control)?;
                sides.set(side, value);
                StyleValue::Sides(sides)
            }
            ControlInput::Linked(linked) => {
                let mut sides = current_sides(element, control)?;
                sides.linked = linked;
                StyleValue::Sides(sides)
            }
        };

        write(canvas, id, control, value)
    }

    /// Restore a control's default and ask for a full panel rebuild.
    ///
    /// Controls without a default clear their style attribute.
    pub fn reset(&self, canvas: &mut Canvas, id: ElementId, control_id: &str) -> Result<BindingOutcome, ControlError> {
        let element = canvas.get(id).ok_or(ControlError::ElementNotFound(id))?;
        let control = find_control(element, control_id)?;

        let mut outcome = match (&control.default, control.binding) {
            (Some(default), _) => write(canvas, id, control, default.clone())?,
            (None, Binding::Style(key)) => {
                if let Some(element) = canvas.get_mut(id) {
                    element.remove_style(key);
                }
                BindingOutcome::default()
            }
            (None, _) => BindingOutcome::default(),
        };
        outcome.rerender_panel = true;
        Ok(outcome)
    }
}

/// Fill unset style attributes (and the tag) with schema defaults.
pub fn hydrate_defaults(element: &mut Element) {
    let schema = schema_for(&element.kind);
    for control in schema.controls() {
        let Some(default) = &control.default else {
            continue;
        };
        match control.binding {
            Binding::Style(key) if !element.style.contains_key(key) => {
                element.style.insert(key.to_string(), default.clone());
            }
            Binding::Tag if element.tag.is_none() => {
                element.tag = default.as_text().map(str::to_string);
            }
            _ => {}
        }
    }
}

/// Current value of a binding on an element.
pub fn read_binding(element: &Element, binding: Binding) -> Option<StyleValue> {
    match binding {
        Binding::Text => element.text_content().map(StyleValue::text),
        Binding::Tag => element.tag.as_deref().map(StyleValue::text),
        Binding::Media => element.media().map(|m| StyleValue::text(m.as_str())),
        Binding::ShapeType => match &element.content {
            Content::Shape(shape) => Some(StyleValue::text(shape.as_str())),
            _ => None,
        },
        Binding::Geometry(GeometryField::Width) => Some(StyleValue::Number(element.geometry.width)),
        Binding::Geometry(GeometryField::Height) => Some(StyleValue::Number(element.geometry.height)),
        Binding::Geometry(GeometryField::Rotation) => Some(StyleValue::Number(element.geometry.rotation_degrees)),
        Binding::Style(key) => element.style_value(key).cloned(),
    }
}

fn find_control(element: &Element, control_id: &str) -> Result<&'static Control, ControlError> {
    schema_for(&element.kind)
        .find(control_id)
        .ok_or_else(|| ControlError::UnknownControl {
            control: control_id.to_string(),
            kind: element.kind.to_string(),
        })
}

fn view_control(element: &Element, control: &Control) -> ControlView {
    let current = read_binding(element, control.binding);
    let is_default = current.is_none();
    ControlView {
        id: control.id,
        label: control.label,
        control_type: control.control_type.clone(),
        value: current.or_else(|| control.default.clone()),
        is_default,
    }
}

fn current_sides(element: &Element, control: &Control) -> Result<BoxSides, ControlError> {
    if control.control_type != ControlType::DimensionBox {
        return Err(invalid(control, "not a dimension box"));
    }
    Ok(match read_binding(element, control.binding) {
        Some(StyleValue::Sides(sides)) => sides,
        _ => BoxSides::default(),
    })
}

fn invalid(control: &Control, reason: impl Into<String>) -> ControlError {
    ControlError::InvalidValue {
        control: control.id.to_string(),
        reason: reason.into(),
    }
}

/// Check a value against the control type and bring it into canonical form.
fn coerce(control: &Control, value: StyleValue) -> Result<StyleValue, ControlError> {
    match &control.control_type {
        ControlType::Text | ControlType::Textarea | ControlType::MediaPicker => match value {
            StyleValue::Text(text) => Ok(StyleValue::Text(text)),
            other => Err(invalid(control, format!("expected text, got {}", other.display()))),
        },
        ControlType::Slider { min, max, .. } => {
            let number = value
                .as_number()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid(control, format!("expected a number, got {}", value.display())))?;
            Ok(StyleValue::Number(number.clamp(*min, *max)))
        }
        ControlType::Color => value
            .as_color()
            .map(StyleValue::Color)
            .ok_or_else(|| invalid(control, format!("'{}' is not a color", value.display()))),
        ControlType::Select(options) => pick_option(control, options, &value),
        ControlType::Alignment => pick_option(control, ALIGNMENTS, &value),
        ControlType::Toggle => value
            .as_bool()
            .map(StyleValue::Bool)
            .ok_or_else(|| invalid(control, "expected true or false")),
        ControlType::DimensionBox => match value {
            StyleValue::Sides(sides) => finite_sides(control, sides).map(StyleValue::Sides),
            StyleValue::Number(n) => finite_sides(control, BoxSides::uniform(n)).map(StyleValue::Sides),
            other => Err(invalid(control, format!("expected box sides, got {}", other.display()))),
        },
    }
}

fn finite_sides(control: &Control, sides: BoxSides) -> Result<BoxSides, ControlError> {
    let all = [sides.top, sides.right, sides.bottom, sides.left];
    match all.iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(invalid(control, format!("{} is not a finite number", bad))),
        None => Ok(sides),
    }
}

fn pick_option(control: &Control, options: &[&'static str], value: &StyleValue) -> Result<StyleValue, ControlError> {
    let wanted = value.display();
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(&wanted))
        .map(|o| StyleValue::text(*o))
        .ok_or_else(|| invalid(control, format!("'{}' is not one of {}", wanted, options.join(", "))))
}

fn write(canvas: &mut Canvas, id: ElementId, control: &Control, value: StyleValue) -> Result<BindingOutcome, ControlError> {
    let text = || value.as_text().map(str::to_string).ok_or_else(|| invalid(control, "expected text"));
    let number = || value.as_number().ok_or_else(|| invalid(control, "expected a number"));

    let element = canvas.get_mut(id).ok_or(ControlError::ElementNotFound(id))?;
    match control.binding {
        Binding::Tag => {
            // A new element with the same id takes the old one's place.
            *element = element.with_tag(text()?);
            return Ok(BindingOutcome {
                replaced: true,
                rerender_panel: true,
            });
        }
        Binding::Text => element.set_text(text()?),
        Binding::Media => element.content = Content::Media(MediaRef::new(text()?)),
        Binding::ShapeType => {
            let shape: ShapeType = text()?.parse().map_err(|e: String| invalid(control, e))?;
            element.content = Content::Shape(shape);
        }
        Binding::Geometry(GeometryField::Width) => element.geometry.width = number()?.max(MIN_SIZE),
        Binding::Geometry(GeometryField::Height) => element.geometry.height = number()?.max(MIN_SIZE),
        Binding::Geometry(GeometryField::Rotation) => {
            element.geometry.rotation_degrees = normalize_rotation(number()?)
        }
        Binding::Style(key) => element.set_style(key, value.clone()),
    }
    Ok(BindingOutcome::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Color;
    use crate::geometry::Geometry;

    fn heading_canvas() -> (Canvas, ElementId) {
        let mut canvas = Canvas::default();
        let id = canvas.add_element(Element::heading(Geometry::new(100.0, 100.0, 200.0, 50.0), "Hello"));
        (canvas, id)
    }

    #[test]
    fn test_render_content_tab() {
        let (canvas, id) = heading_canvas();
        let panel = ControlPanel::new();
        let view = panel.render(canvas.get(id).unwrap());
        assert_eq!(view.tab, Tab::Content);
        assert_eq!(view.control("text").unwrap().value, Some(StyleValue::text("Hello")));
        let align = view.control("text_align").unwrap();
        assert!(align.is_default);
        assert_eq!(align.display_value(), "left");
    }

    #[test]
    fn test_switching_tabs_leaves_element_alone() {
        let (canvas, id) = heading_canvas();
        let before = canvas.clone();
        let mut panel = ControlPanel::new();
        panel.set_tab(Tab::Style);
        let view = panel.render(canvas.get(id).unwrap());
        assert_eq!(view.sections[0].title, "Typography");
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_color_written_and_displayed_as_hex() {
        let (mut canvas, id) = heading_canvas();
        let mut panel = ControlPanel::new();
        panel
            .apply(&mut canvas, id, "color", StyleValue::text("rgb(255, 0, 0)").into())
            .unwrap();
        assert_eq!(
            canvas.get(id).unwrap().style_value("color"),
            Some(&StyleValue::Color(Color::rgb(255, 0, 0)))
        );
        panel.set_tab(Tab::Style);
        let view = panel.render(canvas.get(id).unwrap());
        assert_eq!(view.control("color").unwrap().display_value(), "#ff0000");
    }

    #[test]
    fn test_tag_change_replaces_element() {
        let (mut canvas, id) = heading_canvas();
        canvas.get_mut(id).unwrap().set_style("color", Color::rgb(1, 2, 3));
        let outcome = ControlPanel::new()
            .apply(&mut canvas, id, "tag", StyleValue::text("h1").into())
            .unwrap();
        assert!(outcome.replaced);
        let element = canvas.get(id).unwrap();
        assert_eq!(element.tag.as_deref(), Some("H1"));
        assert_eq!(element.style_value("color"), Some(&StyleValue::Color(Color::rgb(1, 2, 3))));
        assert_eq!(element.text_content(), Some("Hello"));
    }

    #[test]
    fn test_invalid_alignment_rejected() {
        let (mut canvas, id) = heading_canvas();
        let before = canvas.clone();
        let err = ControlPanel::new()
            .apply(&mut canvas, id, "text_align", StyleValue::text("diagonal").into())
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidValue { .. }));
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_slider_clamps_to_range() {
        let (mut canvas, id) = heading_canvas();
        ControlPanel::new()
            .apply(&mut canvas, id, "font_size", StyleValue::Number(900.0).into())
            .unwrap();
        assert_eq!(canvas.get(id).unwrap().style_value("font_size"), Some(&StyleValue::Number(300.0)));
    }

    #[test]
    fn test_geometry_binding_respects_minimum() {
        let mut canvas = Canvas::default();
        let id = canvas.add_element(Element::shape(Geometry::new(0.0, 0.0, 100.0, 100.0), ShapeType::Rectangle));
        let panel = ControlPanel::new();
        panel.apply(&mut canvas, id, "width", StyleValue::Number(5.0).into()).unwrap();
        panel.apply(&mut canvas, id, "height", StyleValue::Number(250.0).into()).unwrap();
        let g = canvas.get(id).unwrap().geometry;
        assert_eq!((g.width, g.height), (MIN_SIZE, 250.0));
    }

    #[test]
    fn test_dimension_box_linked_mode() {
        let (mut canvas, id) = heading_canvas();
        let panel = ControlPanel::new();
        panel.apply(&mut canvas, id, "padding", ControlInput::Linked(true)).unwrap();
        panel
            .apply(&mut canvas, id, "padding", ControlInput::Side { side: Side::Top, value: 12.0 })
            .unwrap();
        assert_eq!(
            canvas.get(id).unwrap().style_value("padding"),
            Some(&StyleValue::Sides(BoxSides::uniform(12.0)))
        );

        panel.apply(&mut canvas, id, "padding", ControlInput::Linked(false)).unwrap();
        panel
            .apply(&mut canvas, id, "padding", ControlInput::Side { side: Side::Left, value: 3.0 })
            .unwrap();
        let Some(StyleValue::Sides(sides)) = canvas.get(id).unwrap().style_value("padding").cloned() else {
            panic!("padding should be a box");
        };
        assert_eq!((sides.top, sides.left), (12.0, 3.0));
    }

    #[test]
    fn test_dimension_box_rejects_non_finite() {
        let (mut canvas, id) = heading_canvas();
        let panel = ControlPanel::new();
        let before = canvas.clone();

        let side = panel.apply(
            &mut canvas,
            id,
            "padding",
            ControlInput::Side { side: Side::Top, value: f64::INFINITY },
        );
        assert!(matches!(side, Err(ControlError::InvalidValue { .. })));

        let uniform = panel.apply(&mut canvas, id, "margin", StyleValue::Number(f64::NAN).into());
        assert!(matches!(uniform, Err(ControlError::InvalidValue { .. })));

        let mut sides = BoxSides::uniform(4.0);
        sides.bottom = f64::NEG_INFINITY;
        let boxed = panel.apply(&mut canvas, id, "padding", StyleValue::Sides(sides).into());
        assert!(matches!(boxed, Err(ControlError::InvalidValue { .. })));

        assert_eq!(canvas, before);
        assert!(Canvas::from_json(&canvas.to_json().unwrap()).is_ok());
    }

    #[test]
    fn test_reset_restores_default() {
        let (mut canvas, id) = heading_canvas();
        let panel = ControlPanel::new();
        panel.apply(&mut canvas, id, "font_size", StyleValue::Number(20.0).into()).unwrap();
        let outcome = panel.reset(&mut canvas, id, "font_size").unwrap();
        assert!(outcome.rerender_panel);
        assert_eq!(canvas.get(id).unwrap().style_value("font_size"), Some(&StyleValue::Number(56.0)));

        panel
            .apply(&mut canvas, id, "margin", StyleValue::Number(8.0).into())
            .unwrap();
        panel.reset(&mut canvas, id, "margin").unwrap();
        assert_eq!(canvas.get(id).unwrap().style_value("margin"), None);
    }

    #[test]
    fn test_unknown_control() {
        let (mut canvas, id) = heading_canvas();
        let err = ControlPanel::new()
            .apply(&mut canvas, id, "object_fit", StyleValue::text("cover").into())
            .unwrap_err();
        assert!(matches!(err, ControlError::UnknownControl { .. }));
    }

    #[test]
    fn test_search_filters_and_hides_empty_sections() {
        let (canvas, id) = heading_canvas();
        let mut panel = ControlPanel::new();
        panel.set_tab(Tab::Style);
        panel.set_search("FONT");
        let view = panel.render(canvas.get(id).unwrap());
        assert_eq!(view.sections.len(), 1);
        let ids: Vec<_> = view.sections[0].controls.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["font_size", "font_weight", "font_family"]);
    }

    #[test]
    fn test_hydrate_defaults() {
        let mut element = Element::shape(Geometry::new(0.0, 0.0, 50.0, 50.0), ShapeType::Circle)
            .with_style("opacity", 0.5);
        hydrate_defaults(&mut element);
        assert_eq!(element.style_value("opacity"), Some(&StyleValue::Number(0.5)));
        assert_eq!(
            element.style_value("background_color"),
            Some(&StyleValue::Color(Color::rgb(0x00, 0xf3, 0xff)))
        );
        assert!(element.style_value("margin").is_none());
    }

    #[test]
    fn test_unknown_kind_uses_heading_controls() {
        let mut canvas = Canvas::default();
        let id = canvas.add_element(Element::new(
            ElementKind::Other("countdown".into()),
            Geometry::new(0.0, 0.0, 100.0, 40.0),
            Content::Text("soon".into()),
        ));
        ControlPanel::new()
            .apply(&mut canvas, id, "text", StyleValue::text("tomorrow").into())
            .unwrap();
        let element = canvas.get(id).unwrap();
        assert_eq!(element.text_content(), Some("tomorrow"));
        assert_eq!(element.kind, ElementKind::Other("countdown".into()));
    }
}
