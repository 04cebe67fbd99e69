//! Geometry engine: grid snapping plus the drag, resize and rotate transforms.
//!
//! Every function here is pure. Gestures recompute from the geometry captured at
//! pointer-down plus the cumulative pointer delta, never incrementally, so a long
//! gesture does not accumulate rounding drift.

mod guides;
mod handles;

pub use guides::{GUIDE_THRESHOLD, Guide, GuideEdge, GuideOrientation, alignment_guides};
pub use handles::{
    Corner, HANDLE_HIT_TOLERANCE, Handle, HandleKind, ROTATE_HANDLE_OFFSET, handles_for,
    hit_test_handles,
};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Grid unit that positions and resize deltas snap to.
pub const SNAP_UNIT: f64 = 10.0;

/// Smallest width or height an element may have.
pub const MIN_SIZE: f64 = 20.0;

/// Rotation snaps to multiples of this many degrees...
pub const ROTATION_SNAP_STEP: f64 = 45.0;

/// ...when the raw angle is closer than this to one of them.
pub const ROTATION_SNAP_TOLERANCE: f64 = 10.0;

/// Position, size and rotation of an element in canvas units.
///
/// `width` and `height` never drop below [`MIN_SIZE`] and `rotation_degrees`
/// is kept in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation_degrees: f64,
}

impl Geometry {
    /// Create an unrotated geometry, clamping the size to [`MIN_SIZE`].
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(MIN_SIZE),
            height: height.max(MIN_SIZE),
            rotation_degrees: 0.0,
        }
    }

    /// Return a copy rotated to `degrees` (normalized).
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = normalize_rotation(degrees);
        self
    }

    /// Re-establish the size and rotation invariants.
    ///
    /// Geometry read from an external document may violate them.
    pub fn normalized(self) -> Self {
        let width = if self.width.is_finite() { self.width } else { MIN_SIZE };
        let height = if self.height.is_finite() { self.height } else { MIN_SIZE };
        let rotation = if self.rotation_degrees.is_finite() {
            self.rotation_degrees
        } else {
            0.0
        };
        Self {
            x: self.x,
            y: self.y,
            width: width.max(MIN_SIZE),
            height: height.max(MIN_SIZE),
            rotation_degrees: normalize_rotation(rotation),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Axis-aligned bounds of the rotated box, as a layout engine would measure it.
    pub fn bounds(&self) -> Rect {
        let rect = self.rect();
        if self.rotation_degrees.abs() < 1e-9 {
            return rect;
        }

        let rot = Affine::rotate_about(self.rotation_degrees.to_radians(), rect.center());
        let corners = [
            rot * Point::new(rect.x0, rect.y0),
            rot * Point::new(rect.x1, rect.y0),
            rot * Point::new(rect.x1, rect.y1),
            rot * Point::new(rect.x0, rect.y1),
        ];

        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Check whether a canvas point falls inside the rotated box.
    pub fn contains(&self, point: Point) -> bool {
        let rect = self.rect();
        // Undo the rotation on the point instead of rotating the box.
        let local = Affine::rotate_about(-self.rotation_degrees.to_radians(), rect.center()) * point;
        rect.contains(local)
    }
}

/// Round `value` to the nearest multiple of `unit`.
///
/// Halves round toward positive infinity, the same way pointer coordinates
/// round in a browser.
pub fn snap(value: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    (value / unit + 0.5).floor() * unit
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can land on 360.0 for tiny negative inputs; -0.0 is folded too.
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Snap an angle to the nearest [`ROTATION_SNAP_STEP`] multiple if it is within
/// [`ROTATION_SNAP_TOLERANCE`] of it; otherwise leave it alone.
pub fn snap_rotation(degrees: f64) -> f64 {
    let nearest = (degrees / ROTATION_SNAP_STEP).round() * ROTATION_SNAP_STEP;
    if (degrees - nearest).abs() < ROTATION_SNAP_TOLERANCE {
        nearest
    } else {
        degrees
    }
}

/// Move an element.
///
/// `pull` is the pointer-down position minus the current pointer position, so
/// the new origin is `snap(start - pull)`. No clamping to the canvas edges.
pub fn drag(start: &Geometry, pull: Vec2, snap_unit: f64) -> Geometry {
    Geometry {
        x: snap(start.x - pull.x, snap_unit),
        y: snap(start.y - pull.y, snap_unit),
        ..*start
    }
}

/// Resize an element from one of its corners.
///
/// `delta` is the cumulative pointer movement since pointer-down. It is snapped
/// to the grid before use. West and north handles move the origin so that the
/// opposite edge stays where it was, even when the size hits [`MIN_SIZE`].
pub fn resize(start: &Geometry, corner: Corner, delta: Vec2, snap_unit: f64) -> Geometry {
    let dx = snap(delta.x, snap_unit);
    let dy = snap(delta.y, snap_unit);

    let mut width = start.width;
    let mut height = start.height;

    if corner.is_east() {
        width = start.width + dx;
    } else {
        width -= dx;
    }
    if corner.is_south() {
        height = start.height + dy;
    } else {
        height -= dy;
    }

    let width = width.max(MIN_SIZE);
    let height = height.max(MIN_SIZE);

    let x = if corner.is_east() {
        start.x
    } else {
        start.x + start.width - width
    };
    let y = if corner.is_south() {
        start.y
    } else {
        start.y + start.height - height
    };

    Geometry {
        x,
        y,
        width,
        height,
        rotation_degrees: start.rotation_degrees,
    }
}

/// Angle (degrees, normalized) that points the element's top edge at `pointer`.
///
/// Zero means "pointer straight above the center". The result snaps to the
/// nearest 45° multiple when within tolerance.
pub fn rotation_toward(center: Point, pointer: Point) -> f64 {
    let raw = (pointer.y - center.y)
        .atan2(pointer.x - center.x)
        .to_degrees()
        + 90.0;
    normalize_rotation(snap_rotation(raw))
}

/// Rotate an element about the center of its geometry at gesture start.
pub fn rotate(start: &Geometry, pointer: Point) -> Geometry {
    Geometry {
        rotation_degrees: rotation_toward(start.center(), pointer),
        ..*start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(23.0, 10.0), 20.0);
        assert_eq!(snap(85.0, 10.0), 90.0);
        assert_eq!(snap(107.0, 10.0), 110.0);
        assert_eq!(snap(-85.0, 10.0), -80.0);
        assert_eq!(snap(40.0, 10.0), 40.0);
    }

    #[test]
    fn test_snap_zero_unit_is_identity() {
        assert_eq!(snap(13.7, 0.0), 13.7);
    }

    #[test]
    fn test_new_clamps_size() {
        let g = Geometry::new(0.0, 0.0, 5.0, 500.0);
        assert_eq!(g.width, MIN_SIZE);
        assert_eq!(g.height, 500.0);
    }

    #[test]
    fn test_drag_subtracts_pull_and_snaps() {
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let moved = drag(&start, Vec2::new(15.0, -7.0), SNAP_UNIT);
        assert_eq!((moved.x, moved.y), (90.0, 110.0));
        assert_eq!((moved.width, moved.height), (200.0, 50.0));
    }

    #[test]
    fn test_drag_can_leave_canvas() {
        let start = Geometry::new(10.0, 10.0, 50.0, 50.0);
        let moved = drag(&start, Vec2::new(500.0, 500.0), SNAP_UNIT);
        assert_eq!((moved.x, moved.y), (-490.0, -490.0));
    }

    #[test]
    fn test_resize_south_east() {
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let g = resize(&start, Corner::SouthEast, Vec2::new(23.0, 8.0), SNAP_UNIT);
        assert_eq!((g.width, g.height), (120.0, 110.0));
        assert_eq!((g.x, g.y), (0.0, 0.0));
    }

    #[test]
    fn test_resize_north_west_keeps_opposite_edge() {
        let start = Geometry::new(50.0, 50.0, 100.0, 100.0);
        let g = resize(&start, Corner::NorthWest, Vec2::new(20.0, -30.0), SNAP_UNIT);
        assert_eq!((g.width, g.height), (80.0, 130.0));
        assert_eq!((g.x, g.y), (70.0, 20.0));
        assert_eq!(g.x + g.width, 150.0);
        assert_eq!(g.y + g.height, 150.0);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        for corner in Corner::ALL {
            let g = resize(&start, corner, Vec2::new(-400.0, -400.0), SNAP_UNIT);
            assert!(g.width >= MIN_SIZE && g.height >= MIN_SIZE);
            let g = resize(&start, corner, Vec2::new(400.0, 400.0), SNAP_UNIT);
            assert!(g.width >= MIN_SIZE && g.height >= MIN_SIZE);
        }
    }

    #[test]
    fn test_resize_north_east_clamped_keeps_bottom_edge() {
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let g = resize(&start, Corner::NorthEast, Vec2::new(0.0, 500.0), SNAP_UNIT);
        assert_eq!(g.height, MIN_SIZE);
        assert_eq!(g.y + g.height, 100.0);
    }

    #[test]
    fn test_rotation_straight_up_is_zero() {
        let center = Point::new(0.0, 0.0);
        assert_close(rotation_toward(center, Point::new(0.0, -50.0)), 0.0);
        assert_close(rotation_toward(center, Point::new(50.0, 0.0)), 90.0);
        assert_close(rotation_toward(center, Point::new(0.0, 50.0)), 180.0);
        assert_close(rotation_toward(center, Point::new(-50.0, 0.0)), 270.0);
    }

    #[test]
    fn test_rotation_snaps_within_tolerance() {
        assert_close(snap_rotation(43.0), 45.0);
        assert_close(snap_rotation(52.0), 45.0);
        assert_close(snap_rotation(60.0), 60.0);
        assert_close(snap_rotation(-4.0), 0.0);
    }

    #[test]
    fn test_rotation_is_normalized() {
        let center = Point::new(100.0, 100.0);
        for i in 0..72 {
            let angle = (i as f64 * 5.0 + 0.3).to_radians();
            let pointer = Point::new(center.x + 80.0 * angle.cos(), center.y + 80.0 * angle.sin());
            let deg = rotation_toward(center, pointer);
            assert!((0.0..360.0).contains(&deg), "{deg} out of range");
        }
    }

    #[test]
    fn test_normalize_rotation() {
        assert_close(normalize_rotation(-90.0), 270.0);
        assert_close(normalize_rotation(360.0), 0.0);
        assert_close(normalize_rotation(725.0), 5.0);
        assert!(normalize_rotation(-0.0).is_sign_positive());
    }

    #[test]
    fn test_rotate_uses_start_center() {
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let g = rotate(&start, Point::new(150.0, 50.0));
        assert_close(g.rotation_degrees, 90.0);
        assert_eq!(g.rect(), start.rect());
    }

    #[test]
    fn test_bounds_of_quarter_turn() {
        let g = Geometry::new(0.0, 0.0, 100.0, 40.0).with_rotation(90.0);
        let b = g.bounds();
        assert_close(b.width(), 40.0);
        assert_close(b.height(), 100.0);
        assert_close(b.center().x, 50.0);
    }

    #[test]
    fn test_contains_respects_rotation() {
        let g = Geometry::new(0.0, 0.0, 100.0, 20.0).with_rotation(90.0);
        // (50, -30) is outside the unrotated box but inside the rotated one.
        assert!(g.contains(Point::new(50.0, -30.0)));
        assert!(!g.contains(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_normalized_repairs_invalid_geometry() {
        let g = Geometry {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: f64::NAN,
            rotation_degrees: -45.0,
        }
        .normalized();
        assert_eq!(g.width, MIN_SIZE);
        assert_eq!(g.height, MIN_SIZE);
        assert_close(g.rotation_degrees, 315.0);
    }
}
