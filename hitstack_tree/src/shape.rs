// Copyright 2025 the Hitstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-area geometry.
//!
//! Rectangles and ellipses are tested exactly in the area's local space. Every
//! other [`kurbo::Shape`] is approximated by its bounding box when it is
//! converted into an [`AreaShape`]; this is the documented behavior, not an
//! error, and no precision is recovered later.

use kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape};

/// Geometry of one hit area in its local coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AreaShape {
    /// Axis-aligned rectangle. Contains points on its min edges but not on its
    /// max edges, so abutting areas never share a point.
    Rect(Rect),
    /// Ellipse, possibly rotated.
    Ellipse(Ellipse),
}

impl AreaShape {
    /// Rectangular area. The rectangle is normalized to positive width and height.
    pub fn rect(rect: Rect) -> Self {
        Self::Rect(rect.abs())
    }

    /// Axis-aligned ellipse inscribed in `bounds`.
    pub fn ellipse(bounds: Rect) -> Self {
        Self::Ellipse(Ellipse::from_rect(bounds.abs()))
    }

    /// Approximate an arbitrary shape by its bounding box.
    pub fn bounding(shape: &impl Shape) -> Self {
        Self::Rect(shape.bounding_box())
    }

    /// Bounding box of the area in local coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Ellipse(e) => e.bounding_box(),
        }
    }

    /// Returns true if the local-space point lies inside the area.
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(pt),
            // A degenerate ellipse has no inverse transform and contains nothing.
            Self::Ellipse(e) => e.contains(pt),
        }
    }
}

impl From<Rect> for AreaShape {
    fn from(rect: Rect) -> Self {
        Self::rect(rect)
    }
}

impl From<Ellipse> for AreaShape {
    fn from(ellipse: Ellipse) -> Self {
        Self::Ellipse(ellipse)
    }
}

impl From<Circle> for AreaShape {
    fn from(circle: Circle) -> Self {
        Self::Ellipse(Ellipse::from(circle))
    }
}

impl From<RoundedRect> for AreaShape {
    fn from(rr: RoundedRect) -> Self {
        Self::bounding(&rr)
    }
}

impl From<&BezPath> for AreaShape {
    fn from(path: &BezPath) -> Self {
        Self::bounding(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_half_open() {
        let s = AreaShape::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(s.contains(Point::new(0.0, 0.0)));
        assert!(s.contains(Point::new(9.5, 9.5)));
        assert!(!s.contains(Point::new(10.0, 5.0)));
        assert!(!s.contains(Point::new(5.0, 10.0)));
    }

    #[test]
    fn reversed_rect_is_normalized() {
        let s = AreaShape::rect(Rect::new(10.0, 10.0, 0.0, 0.0));
        assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(s.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn ellipse_excludes_bounding_box_corners() {
        let s = AreaShape::ellipse(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(s.contains(Point::new(50.0, 25.0)));
        assert!(s.contains(Point::new(95.0, 25.0)));
        assert!(!s.contains(Point::new(2.0, 2.0)));
        assert!(!s.contains(Point::new(98.0, 48.0)));
        let b = s.bounds();
        assert!((b.x0 - 0.0).abs() < 1e-9 && (b.x1 - 100.0).abs() < 1e-9);
        assert!((b.y0 - 0.0).abs() < 1e-9 && (b.y1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn circle_converts_to_exact_ellipse() {
        let s = AreaShape::from(Circle::new((10.0, 10.0), 10.0));
        assert!(s.contains(Point::new(10.0, 1.0)));
        assert!(!s.contains(Point::new(1.0, 1.0)));
    }

    #[test]
    fn rounded_rect_uses_bounding_box() {
        let rr = RoundedRect::new(0.0, 0.0, 40.0, 40.0, 15.0);
        let s = AreaShape::from(rr);
        // The corner is cut off by the rounding but the approximation keeps it.
        assert!(!rr.contains(Point::new(1.0, 1.0)));
        assert!(s.contains(Point::new(1.0, 1.0)));
        assert_eq!(s, AreaShape::Rect(Rect::new(0.0, 0.0, 40.0, 40.0)));
    }

    #[test]
    fn path_uses_bounding_box() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((30.0, 0.0));
        path.line_to((0.0, 20.0));
        path.close_path();
        let s = AreaShape::from(&path);
        assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 30.0, 20.0));
        // Outside the triangle, inside its box.
        assert!(s.contains(Point::new(25.0, 15.0)));
    }
}
