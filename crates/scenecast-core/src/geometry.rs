//! Geometric primitives for scene layout and edge routing.
//!
//! This module provides the geometric types the layout engine works with
//! when placing nodes, detecting collisions, and routing edges.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding/margin values for four sides
//!
//! # Coordinate System
//!
//! Scenecast uses a coordinate system consistent with SVG and most video
//! compositors:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in canvas coordinate space.
///
/// Points use `f32` coordinates and provide operations for basic vector math.
///
/// # Examples
///
/// ```
/// # use scenecast_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks that both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// Returns `None` for vectors too short to carry a direction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenecast_core::geometry::Point;
    /// let dir = Point::new(3.0, 4.0).normalized().unwrap();
    /// assert!((dir.x() - 0.6).abs() < 1e-6);
    /// assert!((dir.y() - 0.8).abs() < 1e-6);
    ///
    /// assert!(Point::new(0.0, 0.0).normalized().is_none());
    /// ```
    pub fn normalized(self) -> Option<Self> {
        let length = self.hypot();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Returns the vector rotated by 90 degrees (clockwise in screen space)
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size with padding added to both width and height
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns true if both dimensions are strictly positive and finite
    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenecast_core::geometry::{Bounds, Point, Size};
    /// let header = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let content = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = header.merge(&content);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Expands the bounds by adding insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Returns the overlap extents along each axis, or `None` when the two
    /// bounds do not intersect.
    ///
    /// Touching edges are not an overlap: the extents must be strictly
    /// positive on both axes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenecast_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
    /// let b = Bounds::new_from_top_left(Point::new(80.0, 40.0), Size::new(100.0, 50.0));
    /// let (ox, oy) = a.overlap(&b).unwrap();
    /// assert_eq!(ox, 20.0);
    /// assert_eq!(oy, 10.0);
    ///
    /// let c = Bounds::new_from_top_left(Point::new(100.0, 0.0), Size::new(10.0, 10.0));
    /// assert!(a.overlap(&c).is_none());
    /// ```
    pub fn overlap(&self, other: &Self) -> Option<(f32, f32)> {
        let overlap_x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let overlap_y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        (overlap_x > 0.0 && overlap_y > 0.0).then_some((overlap_x, overlap_y))
    }

    /// Returns true if the two bounds share interior area
    pub fn intersects(&self, other: &Self) -> bool {
        self.overlap(other).is_some()
    }

    /// Returns true if the point lies strictly inside the bounds
    fn contains_interior(&self, point: Point) -> bool {
        point.x > self.min_x && point.x < self.max_x && point.y > self.min_y && point.y < self.max_y
    }

    /// Returns true if the segment from `a` to `b` passes through the interior
    /// of the bounds.
    ///
    /// Uses Liang–Barsky clipping; a segment that only grazes an edge or a
    /// corner does not count.
    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;

        let checks = [
            (-dx, a.x - self.min_x),
            (dx, self.max_x - a.x),
            (-dy, a.y - self.min_y),
            (dy, self.max_y - a.y),
        ];

        for (p, q) in checks {
            if p == 0.0 {
                if q <= 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 >= t1 {
                return false;
            }
        }

        let inside = Point::new(a.x + dx * (t0 + t1) / 2.0, a.y + dy * (t0 + t1) / 2.0);
        self.contains_interior(inside)
    }

    /// Returns the point where a ray from the center toward `target` leaves
    /// the bounds.
    ///
    /// When `target` is the center itself the center is returned.
    pub fn boundary_toward(&self, target: Point) -> Point {
        let center = self.center();
        let dx = target.x - center.x;
        let dy = target.y - center.y;
        if dx.abs() <= f32::EPSILON && dy.abs() <= f32::EPSILON {
            return center;
        }

        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;
        let scale_x = if dx.abs() > f32::EPSILON {
            half_width / dx.abs()
        } else {
            f32::INFINITY
        };
        let scale_y = if dy.abs() > f32::EPSILON {
            half_height / dy.abs()
        } else {
            f32::INFINITY
        };
        let scale = scale_x.min(scale_y);

        Point::new(center.x + dx * scale, center.y + dy * scale)
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_point_add_and_sub() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.add_point(p2), Point::new(4.0, 6.0));
        assert_eq!(p2.sub_point(p1), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::default().hypot(), 0.0);
    }

    #[test]
    fn test_point_perpendicular() {
        let p = Point::new(1.0, 0.0).perpendicular();
        assert_eq!(p, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f32::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_bounds_new_from_center() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 60.0), Size::new(20.0, 30.0));

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), Point::new(50.0, 60.0));
    }

    #[test]
    fn test_bounds_add_padding() {
        let padded = rect(2.0, 3.0, 4.0, 5.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(padded.min_x(), -2.0);
        assert_eq!(padded.min_y(), 2.0);
        assert_eq!(padded.max_x(), 8.0);
        assert_eq!(padded.max_y(), 11.0);
    }

    #[test]
    fn test_size_add_padding() {
        let padded = Size::new(4.0, 5.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(padded, Size::new(10.0, 9.0));
    }

    #[test]
    fn test_overlap_touching_edges_is_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_overlap_contained() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(outer.overlap(&inner), Some((30.0, 40.0)));
    }

    #[test]
    fn test_segment_through_interior() {
        let b = rect(10.0, 10.0, 20.0, 20.0);
        assert!(b.intersects_segment(Point::new(0.0, 20.0), Point::new(40.0, 20.0)));
        assert!(b.intersects_segment(Point::new(15.0, 15.0), Point::new(16.0, 16.0)));
    }

    #[test]
    fn test_segment_missing_or_grazing() {
        let b = rect(10.0, 10.0, 20.0, 20.0);
        // Passes above
        assert!(!b.intersects_segment(Point::new(0.0, 5.0), Point::new(40.0, 5.0)));
        // Runs along the top edge
        assert!(!b.intersects_segment(Point::new(0.0, 10.0), Point::new(40.0, 10.0)));
        // Stops short
        assert!(!b.intersects_segment(Point::new(0.0, 20.0), Point::new(9.0, 20.0)));
    }

    #[test]
    fn test_boundary_toward_axis_aligned() {
        let b = rect(0.0, 0.0, 100.0, 40.0);
        assert_eq!(b.boundary_toward(Point::new(500.0, 20.0)), Point::new(100.0, 20.0));
        assert_eq!(b.boundary_toward(Point::new(50.0, -300.0)), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_boundary_toward_center_returns_center() {
        let b = rect(0.0, 0.0, 100.0, 40.0);
        assert_eq!(b.boundary_toward(b.center()), b.center());
    }

    #[test]
    fn test_size_is_positive() {
        assert!(Size::new(1.0, 1.0).is_positive());
        assert!(!Size::new(0.0, 1.0).is_positive());
        assert!(!Size::new(1.0, f32::NAN).is_positive());
    }
}
