//! The canvas document: page size, background and stacked elements.

use crate::element::{Color, Element, ElementId, MediaRef};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default page width in canvas units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;
/// Default page height in canvas units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Page background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Solid(Color),
    LinearGradient {
        angle_degrees: f64,
        from: Color,
        to: Color,
    },
    Image(MediaRef),
}

impl Background {
    /// The color that best represents this background (for contrast swaps).
    pub fn primary_color(&self) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::LinearGradient { from, .. } => *from,
            Background::Image(_) => Color::white(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::white())
    }
}

/// A page being designed.
///
/// `elements` is in stacking order: index 0 is the back-most element and the
/// last entry is drawn on top. Stacking is never stored on elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Canvas {
    /// Create an empty canvas with a white background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Background::default(),
            elements: Vec::new(),
        }
    }

    /// Add an element on top of the stack and return its id.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element from the canvas.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Swap in a new element with the same id at the same stacking position.
    ///
    /// Returns the element that was replaced.
    pub fn replace_element(&mut self, element: Element) -> Option<Element> {
        let index = self.index_of(element.id)?;
        Some(std::mem::replace(&mut self.elements[index], element))
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Stacking position of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                let element = self.elements.remove(pos);
                self.elements.push(element);
                true
            }
            _ => false,
        }
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                let element = self.elements.remove(pos);
                self.elements.insert(0, element);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer forward (towards front).
    /// Returns true if the element was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos + 1 < self.elements.len() {
                self.elements.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an element one layer backward (towards back).
    /// Returns true if the element was moved, false if already at back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos > 0 {
                self.elements.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Find elements under a point, front-most first.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| e.hit_test(point))
            .map(|e| e.id)
            .collect()
    }

    /// The front-most element under a point.
    pub fn element_at_point(&self, point: Point) -> Option<ElementId> {
        self.elements.iter().rev().find(|e| e.hit_test(point)).map(|e| e.id)
    }

    /// Rendered bounds of every visible element except `id`.
    pub fn bounds_except(&self, id: ElementId) -> impl Iterator<Item = Rect> + '_ {
        self.elements
            .iter()
            .filter(move |e| e.id != id && e.is_visible())
            .map(|e| e.geometry.bounds())
    }

    /// The page rectangle.
    pub fn page_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Check if the canvas has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the canvas to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a canvas from JSON, repairing invariants a hand-edited
    /// document might break.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut canvas: Canvas = serde_json::from_str(json)?;
        canvas.normalize();
        Ok(canvas)
    }

    /// Clamp geometry and give duplicated ids a fresh identity.
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        for element in &mut self.elements {
            element.geometry = element.geometry.normalized();
            if !seen.insert(element.id) {
                log::warn!("Duplicate element id {} in document, regenerating", element.id);
                element.regenerate_id();
                seen.insert(element.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeType;
    use crate::geometry::{Geometry, MIN_SIZE};

    fn square(x: f64, y: f64) -> Element {
        Element::shape(Geometry::new(x, y, 100.0, 100.0), ShapeType::Rectangle)
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::default();
        assert!(canvas.is_empty());
        assert_eq!(canvas.width, DEFAULT_CANVAS_WIDTH);
    }

    #[test]
    fn test_add_and_remove() {
        let mut canvas = Canvas::default();
        let id = canvas.add_element(square(0.0, 0.0));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.get(id).is_some());

        assert!(canvas.remove_element(id).is_some());
        assert!(canvas.is_empty());
        assert!(canvas.remove_element(id).is_none());
    }

    #[test]
    fn test_z_order() {
        let mut canvas = Canvas::default();
        let a = canvas.add_element(square(0.0, 0.0));
        let b = canvas.add_element(square(50.0, 50.0));
        let c = canvas.add_element(square(100.0, 100.0));

        assert!(canvas.bring_to_front(a));
        assert_eq!(canvas.index_of(a), Some(2));
        assert!(!canvas.bring_to_front(a));

        assert!(canvas.send_to_back(a));
        assert_eq!(canvas.index_of(a), Some(0));

        assert!(canvas.bring_forward(a));
        assert_eq!(canvas.index_of(a), Some(1));
        assert_eq!(canvas.index_of(b), Some(0));

        assert!(canvas.send_backward(c));
        assert_eq!(canvas.index_of(c), Some(1));
        assert!(!canvas.send_backward(b));
    }

    #[test]
    fn test_elements_at_point_front_first() {
        let mut canvas = Canvas::default();
        let back = canvas.add_element(square(0.0, 0.0));
        let front = canvas.add_element(square(50.0, 50.0));

        assert_eq!(canvas.elements_at_point(Point::new(75.0, 75.0)), vec![front, back]);
        assert_eq!(canvas.element_at_point(Point::new(10.0, 10.0)), Some(back));
        assert_eq!(canvas.element_at_point(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut canvas = Canvas::default();
        canvas.add_element(square(0.0, 0.0));
        let heading = Element::heading(Geometry::new(0.0, 0.0, 200.0, 50.0), "Title");
        let id = canvas.add_element(heading.clone());
        canvas.add_element(square(10.0, 10.0));

        let old = canvas.replace_element(heading.with_tag("H1")).unwrap();
        assert_eq!(old.tag.as_deref(), Some("H2"));
        assert_eq!(canvas.index_of(id), Some(1));
        assert_eq!(canvas.get(id).unwrap().tag.as_deref(), Some("H1"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut canvas = Canvas::new(400.0, 400.0);
        canvas.background = Background::LinearGradient {
            angle_degrees: 135.0,
            from: Color::rgb(0xf0, 0x93, 0xfb),
            to: Color::rgb(0xf5, 0x57, 0x6c),
        };
        canvas.add_element(square(0.0, 0.0));
        canvas.add_element(Element::heading(Geometry::new(10.0, 10.0, 200.0, 50.0), "Hi"));

        let json = canvas.to_json().unwrap();
        let restored = Canvas::from_json(&json).unwrap();
        assert_eq!(restored, canvas);
    }

    #[test]
    fn test_hidden_elements_are_skipped() {
        let mut canvas = Canvas::default();
        let back = canvas.add_element(square(0.0, 0.0));
        let front = canvas.add_element(square(50.0, 50.0));
        canvas.get_mut(front).unwrap().set_visible(false);

        assert_eq!(canvas.element_at_point(Point::new(75.0, 75.0)), Some(back));
        assert_eq!(canvas.bounds_except(back).count(), 0);
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn test_round_trip_keeps_free_rotations() {
        let start = Geometry::new(100.0, 100.0, 160.0, 90.0);
        let center = start.center();
        let mut canvas = Canvas::default();
        for step in 0..500 {
            let angle = step as f64 * 0.7318;
            let pointer = Point::new(center.x + 80.0 * angle.cos(), center.y + 80.0 * angle.sin());
            let mut element = square(0.0, 0.0);
            element.geometry = crate::geometry::rotate(&start, pointer);
            canvas.add_element(element);
        }

        let restored = Canvas::from_json(&canvas.to_json().unwrap()).unwrap();
        for (a, b) in canvas.elements.iter().zip(&restored.elements) {
            assert_eq!(a.geometry.rotation_degrees.to_bits(), b.geometry.rotation_degrees.to_bits());
        }
        assert_eq!(restored, canvas);
    }

    #[test]
    fn test_from_json_repairs_document() {
        let mut canvas = Canvas::default();
        let mut tiny = square(0.0, 0.0);
        tiny.geometry.width = 2.0;
        let dup = tiny.clone();
        canvas.elements.push(tiny);
        canvas.elements.push(dup);

        let json = serde_json::to_string(&canvas).unwrap();
        let restored = Canvas::from_json(&json).unwrap();
        assert_eq!(restored.elements[0].geometry.width, MIN_SIZE);
        assert_ne!(restored.elements[0].id, restored.elements[1].id);
    }
}
