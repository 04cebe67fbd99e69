//! Selection handles drawn around the selected element.

use super::Geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 10.0;

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "se")]
    SouthEast,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    pub fn is_east(self) -> bool {
        matches!(self, Corner::NorthEast | Corner::SouthEast)
    }

    pub fn is_south(self) -> bool {
        matches!(self, Corner::SouthWest | Corner::SouthEast)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::NorthWest => "nw",
            Corner::NorthEast => "ne",
            Corner::SouthWest => "sw",
            Corner::SouthEast => "se",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nw" => Ok(Corner::NorthWest),
            "ne" => Ok(Corner::NorthEast),
            "sw" => Ok(Corner::SouthWest),
            "se" => Ok(Corner::SouthEast),
            other => Err(format!("unknown corner '{other}'")),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(Corner),
    /// Sits above the top-center and turns the element about its center.
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    /// `tolerance` should already be divided by the zoom factor.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Four corner handles plus the rotation handle, turned with the element.
pub fn handles_for(geometry: &Geometry) -> Vec<Handle> {
    let center = geometry.center();
    let half_w = geometry.width / 2.0;
    let half_h = geometry.height / 2.0;
    let (sin_r, cos_r) = geometry.rotation_degrees.to_radians().sin_cos();

    let rotate_point = |dx: f64, dy: f64| -> Point {
        Point::new(
            center.x + dx * cos_r - dy * sin_r,
            center.y + dx * sin_r + dy * cos_r,
        )
    };

    vec![
        Handle::new(rotate_point(-half_w, -half_h), HandleKind::Resize(Corner::NorthWest)),
        Handle::new(rotate_point(half_w, -half_h), HandleKind::Resize(Corner::NorthEast)),
        Handle::new(rotate_point(-half_w, half_h), HandleKind::Resize(Corner::SouthWest)),
        Handle::new(rotate_point(half_w, half_h), HandleKind::Resize(Corner::SouthEast)),
        Handle::new(rotate_point(0.0, -half_h - ROTATE_HANDLE_OFFSET), HandleKind::Rotate),
    ]
}

/// Find the handle under `point`, if any.
pub fn hit_test_handles(geometry: &Geometry, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(geometry)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_unrotated() {
        let g = Geometry::new(0.0, 0.0, 100.0, 50.0);
        let handles = handles_for(&g);
        assert_eq!(handles.len(), 5);
        assert_eq!(handles[0].position, Point::new(0.0, 0.0));
        assert_eq!(handles[3].position, Point::new(100.0, 50.0));
        assert_eq!(handles[4].kind, HandleKind::Rotate);
        assert_eq!(handles[4].position, Point::new(50.0, -ROTATE_HANDLE_OFFSET));
    }

    #[test]
    fn test_handles_follow_rotation() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0).with_rotation(90.0);
        let rotate = handles_for(&g)
            .into_iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap();
        // Top-center turned a quarter clockwise ends up on the right.
        assert!((rotate.position.x - (100.0 + ROTATE_HANDLE_OFFSET)).abs() < 1e-9);
        assert!((rotate.position.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_handles() {
        let g = Geometry::new(10.0, 10.0, 100.0, 100.0);
        assert_eq!(
            hit_test_handles(&g, Point::new(112.0, 108.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Resize(Corner::SouthEast))
        );
        assert_eq!(
            hit_test_handles(&g, Point::new(60.0, -15.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&g, Point::new(60.0, 60.0), HANDLE_HIT_TOLERANCE), None);
    }

    #[test]
    fn test_corner_parse() {
        for corner in Corner::ALL {
            assert_eq!(corner.as_str().parse::<Corner>(), Ok(corner));
        }
        assert!("north".parse::<Corner>().is_err());
    }
}
