use crate::math::intersect_2d::{
    arc_arc_intersect_2d, horizontal_ray_arc_2d, horizontal_ray_segment_2d,
    segment_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::{Point2, Vector2};

use super::arc::CircularArc;
use super::bbox::Box2;
use super::segment::Segment;

/// The geometric primitive carried by an edge.
///
/// Segments and arcs differ in intersection, splitting, length and
/// direction, so the edge shape is a tagged sum with a small shared
/// capability set rather than a trait hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Segment(Segment),
    Arc(CircularArc),
}

impl Shape {
    /// Start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Shape::Segment(s) => s.start,
            Shape::Arc(a) => a.start(),
        }
    }

    /// End point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Shape::Segment(s) => s.end,
            Shape::Arc(a) => a.end(),
        }
    }

    /// Length along the shape.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Shape::Segment(s) => s.length(),
            Shape::Arc(a) => a.length(),
        }
    }

    /// Bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Box2 {
        match self {
            Shape::Segment(s) => s.bounding_box(),
            Shape::Arc(a) => a.bounding_box(),
        }
    }

    /// Midpoint of the shape.
    #[must_use]
    pub fn middle(&self) -> Point2 {
        match self {
            Shape::Segment(s) => s.middle(),
            Shape::Arc(a) => a.middle(),
        }
    }

    /// Whether `pt` lies on the shape under tolerance.
    #[must_use]
    pub fn contains(&self, pt: &Point2) -> bool {
        match self {
            Shape::Segment(s) => s.contains(pt),
            Shape::Arc(a) => a.contains(pt),
        }
    }

    /// Splits the shape at `pt`.
    ///
    /// Returns `None` if `pt` is off the shape; a `None` side means `pt`
    /// coincides with that endpoint.
    #[must_use]
    pub fn split(&self, pt: &Point2) -> Option<(Option<Shape>, Option<Shape>)> {
        match self {
            Shape::Segment(s) => s
                .split(pt)
                .map(|(a, b)| (a.map(Shape::Segment), b.map(Shape::Segment))),
            Shape::Arc(a) => a
                .split(pt)
                .map(|(x, y)| (x.map(Shape::Arc), y.map(Shape::Arc))),
        }
    }

    /// Intersection points with another shape.
    #[must_use]
    pub fn intersect(&self, other: &Shape) -> Vec<Point2> {
        match (self, other) {
            (Shape::Segment(s1), Shape::Segment(s2)) => {
                segment_segment_intersect_2d(&s1.start, &s1.end, &s2.start, &s2.end)
            }
            (Shape::Segment(s), Shape::Arc(a)) | (Shape::Arc(a), Shape::Segment(s)) => {
                segment_arc_intersect_2d(
                    &s.start,
                    &s.end,
                    a.center.x,
                    a.center.y,
                    a.radius,
                    a.start_angle,
                    a.sweep,
                )
            }
            (Shape::Arc(a1), Shape::Arc(a2)) => arc_arc_intersect_2d(
                a1.center.x,
                a1.center.y,
                a1.radius,
                a1.start_angle,
                a1.sweep,
                a2.center.x,
                a2.center.y,
                a2.radius,
                a2.start_angle,
                a2.sweep,
            ),
        }
    }

    /// Hits of the horizontal ray from `origin` (toward +x) against the shape.
    #[must_use]
    pub fn horizontal_ray_hits(&self, origin: &Point2) -> Vec<Point2> {
        match self {
            Shape::Segment(s) => horizontal_ray_segment_2d(origin, &s.start, &s.end),
            Shape::Arc(a) => horizontal_ray_arc_2d(
                origin,
                a.center.x,
                a.center.y,
                a.radius,
                a.start_angle,
                a.sweep,
            ),
        }
    }

    /// Unit tangent at the start, pointing into the shape.
    #[must_use]
    pub fn tangent_in_start(&self) -> Vector2 {
        match self {
            Shape::Segment(s) => s.tangent_in_start(),
            Shape::Arc(a) => a.tangent_in_start(),
        }
    }

    /// Unit tangent at the end, pointing back into the shape.
    #[must_use]
    pub fn tangent_in_end(&self) -> Vector2 {
        match self {
            Shape::Segment(s) => s.tangent_in_end(),
            Shape::Arc(a) => a.tangent_in_end(),
        }
    }

    /// Unit tangent in the direction of travel at the given point.
    ///
    /// For segments the direction is constant; for arcs it is evaluated at
    /// the point's parameter (falling back to the start tangent off-arc).
    #[must_use]
    pub fn tangent_at_point(&self, pt: &Point2) -> Vector2 {
        match self {
            Shape::Segment(s) => s.tangent_in_start(),
            Shape::Arc(a) => a
                .param_of(pt)
                .map_or_else(|| a.tangent_in_start(), |t| a.tangent_at(t)),
        }
    }

    /// The same shape traversed in the opposite direction.
    #[must_use]
    pub fn reverse(&self) -> Shape {
        match self {
            Shape::Segment(s) => Shape::Segment(s.reverse()),
            Shape::Arc(a) => Shape::Arc(a.reverse()),
        }
    }
}
