use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::point_on_segment_2d;
use crate::math::{eq_0, points_equal, Point2, Vector2, TOLERANCE};

use super::bbox::Box2;

/// A directed line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    /// Creates a new segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is shorter than the tolerance.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "zero-length segment at ({}, {})",
                start.x, start.y
            ))
            .into());
        }
        Ok(Self { start, end })
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Box2 {
        Box2::from_points(&self.start, &self.end)
    }

    /// Whether `pt` lies on the segment under tolerance.
    #[must_use]
    pub fn contains(&self, pt: &Point2) -> bool {
        point_on_segment_2d(pt, &self.start, &self.end)
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn middle(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) * 0.5,
            (self.start.y + self.end.y) * 0.5,
        )
    }

    /// Splits the segment at `pt`.
    ///
    /// Returns `None` if `pt` does not lie on the segment. A side is `None`
    /// when `pt` coincides with the corresponding endpoint.
    #[must_use]
    pub fn split(&self, pt: &Point2) -> Option<(Option<Self>, Option<Self>)> {
        if !self.contains(pt) {
            return None;
        }
        if points_equal(pt, &self.start) {
            return Some((None, Some(self.clone())));
        }
        if points_equal(pt, &self.end) {
            return Some((Some(self.clone()), None));
        }
        Some((
            Some(Self {
                start: self.start,
                end: *pt,
            }),
            Some(Self {
                start: *pt,
                end: self.end,
            }),
        ))
    }

    /// Unit tangent at the start, pointing into the segment.
    #[must_use]
    pub fn tangent_in_start(&self) -> Vector2 {
        let d = self.end - self.start;
        let len = d.norm();
        if eq_0(len) {
            return Vector2::new(0.0, 0.0);
        }
        d / len
    }

    /// Unit tangent at the end, pointing back into the segment.
    #[must_use]
    pub fn tangent_in_end(&self) -> Vector2 {
        -self.tangent_in_start()
    }

    /// The same segment traversed in the opposite direction.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}
