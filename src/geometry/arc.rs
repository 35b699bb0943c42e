use std::f64::consts::PI;

use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::angle_to_arc_param;
use crate::math::{eq, eq_0, Point2, Vector2, TOLERANCE};

use super::bbox::Box2;

/// A circular arc in center-radius-angle form.
///
/// The arc sweeps from `start_angle` by the signed `sweep` (positive is
/// counter-clockwise). The parametric form maps `t` in `[0, 1]` to the
/// angle `start_angle + sweep * t`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl CircularArc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the sweep is zero.
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be non-zero".into()).into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Creates the arc from chord endpoints and a bulge value.
    ///
    /// Bulge convention: `bulge = tan(sweep / 4)`; positive is a
    /// counter-clockwise arc, `|bulge| = 1` a semicircle.
    ///
    /// # Errors
    ///
    /// Returns an error if the chord is degenerate or the bulge is zero.
    pub fn from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Result<Self> {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let chord_len = (dx * dx + dy * dy).sqrt();

        if chord_len < TOLERANCE {
            return Err(GeometryError::Degenerate("zero-length arc chord".into()).into());
        }
        if bulge.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("zero bulge describes a segment".into()).into());
        }

        // Distance from the chord midpoint to the center, signed by bulge.
        let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
        let mx = (p0.x + p1.x) * 0.5;
        let my = (p0.y + p1.y) * 0.5;

        // Normal to the chord; for positive bulge the center lies left of it.
        let nx = -dy / chord_len;
        let ny = dx / chord_len;

        let cx = mx + sagitta_ratio * (chord_len * 0.5) * nx;
        let cy = my + sagitta_ratio * (chord_len * 0.5) * ny;

        // r = d*(1+b²)/(4*|b|) from r = d/(2*sin(θ/2)) with θ = 4*atan(b)
        let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());

        let start_angle = (p0.y - cy).atan2(p0.x - cx);
        let sweep = 4.0 * bulge.atan();

        Self::new(Point2::new(cx, cy), radius, start_angle, sweep)
    }

    /// Point on the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Start point of the arc.
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.point_at(0.0)
    }

    /// End point of the arc.
    #[must_use]
    pub fn end(&self) -> Point2 {
        self.point_at(1.0)
    }

    /// Midpoint of the arc.
    #[must_use]
    pub fn middle(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Parameter of `pt` on the arc, or `None` if `pt` is off the arc.
    #[must_use]
    pub fn param_of(&self, pt: &Point2) -> Option<f64> {
        let d = pt - self.center;
        if !eq(d.norm(), self.radius) {
            return None;
        }
        let angle = d.y.atan2(d.x);
        angle_to_arc_param(angle, self.start_angle, self.sweep)
    }

    /// Whether `pt` lies on the arc under tolerance.
    #[must_use]
    pub fn contains(&self, pt: &Point2) -> bool {
        self.param_of(pt).is_some()
    }

    /// Splits the arc at `pt`.
    ///
    /// Returns `None` if `pt` does not lie on the arc. A side is `None`
    /// when `pt` coincides with the corresponding endpoint.
    #[must_use]
    pub fn split(&self, pt: &Point2) -> Option<(Option<Self>, Option<Self>)> {
        let t = self.param_of(pt)?;
        if eq_0(t * self.length()) {
            return Some((None, Some(self.clone())));
        }
        if eq_0((1.0 - t) * self.length()) {
            return Some((Some(self.clone()), None));
        }
        Some((
            Some(Self {
                center: self.center,
                radius: self.radius,
                start_angle: self.start_angle,
                sweep: self.sweep * t,
            }),
            Some(Self {
                center: self.center,
                radius: self.radius,
                start_angle: self.start_angle + self.sweep * t,
                sweep: self.sweep * (1.0 - t),
            }),
        ))
    }

    /// Unit tangent in the direction of travel at parameter `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }

    /// Unit tangent at the start, pointing into the arc.
    #[must_use]
    pub fn tangent_in_start(&self) -> Vector2 {
        self.tangent_at(0.0)
    }

    /// Unit tangent at the end, pointing back into the arc.
    #[must_use]
    pub fn tangent_in_end(&self) -> Vector2 {
        -self.tangent_at(1.0)
    }

    /// The same arc traversed in the opposite direction.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle + self.sweep,
            sweep: -self.sweep,
        }
    }

    /// Bounding box: chord endpoints plus any cardinal extremes the arc covers.
    #[must_use]
    pub fn bounding_box(&self) -> Box2 {
        let start = self.start();
        let end = self.end();
        let mut b = Box2::from_points(&start, &end);
        for k in 0..4 {
            let angle = f64::from(k) * PI / 2.0;
            if angle_to_arc_param(angle, self.start_angle, self.sweep).is_some() {
                b.expand(&Point2::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                ));
            }
        }
        b
    }
}
