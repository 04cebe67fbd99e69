//! In-flight pointer gestures.

use crate::element::ElementId;
use crate::geometry::{self, Corner, Geometry};
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(Corner),
    Rotate,
}

/// State captured at pointer-down.
///
/// Every move recomputes the element geometry from `original` and the
/// cumulative pointer delta.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub element: ElementId,
    pub kind: GestureKind,
    pub start_pointer: Point,
    pub current_pointer: Point,
    pub original: Geometry,
}

impl Gesture {
    pub fn new(element: ElementId, kind: GestureKind, start_pointer: Point, original: Geometry) -> Self {
        Self {
            element,
            kind,
            start_pointer,
            current_pointer: start_pointer,
            original,
        }
    }

    /// Movement since pointer-down.
    pub fn delta(&self) -> Vec2 {
        self.current_pointer - self.start_pointer
    }

    /// Geometry for the current pointer position.
    pub fn apply(&self, snap_unit: f64) -> Geometry {
        match self.kind {
            // The drag transform takes the pull vector, the reverse of the delta.
            GestureKind::Drag => geometry::drag(&self.original, -self.delta(), snap_unit),
            GestureKind::Resize(corner) => geometry::resize(&self.original, corner, self.delta(), snap_unit),
            GestureKind::Rotate => geometry::rotate(&self.original, self.current_pointer),
        }
    }
}
