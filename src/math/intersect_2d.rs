use std::f64::consts::PI;

use super::{eq, eq_0, points_equal, Point2, TOLERANCE};

/// Checks whether `p` lies on the closed segment `a0..a1` under tolerance.
#[must_use]
pub fn point_on_segment_2d(p: &Point2, a0: &Point2, a1: &Point2) -> bool {
    let d = a1 - a0;
    let len = d.norm();
    if eq_0(len) {
        return points_equal(p, a0);
    }
    let ap = p - a0;
    let dist = (d.x * ap.y - d.y * ap.x).abs() / len;
    if !eq_0(dist) {
        return false;
    }
    let along = ap.dot(&d) / len;
    along >= -TOLERANCE && along <= len + TOLERANCE
}

/// Bounded segment-segment intersection in 2D.
///
/// Non-parallel segments yield at most one point. Collinear overlapping
/// segments yield the endpoints shared by both segments (up to two points),
/// which is what boundary-overlap detection downstream feeds on.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Vec<Point2> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if eq_0(cross) {
        // Parallel. Collinear overlap reports shared endpoints.
        let mut pts: Vec<Point2> = Vec::new();
        for cand in [a0, a1, b0, b1] {
            if point_on_segment_2d(cand, a0, a1)
                && point_on_segment_2d(cand, b0, b1)
                && !pts.iter().any(|p| points_equal(p, cand))
            {
                pts.push(*cand);
            }
        }
        return pts;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let tc = t.clamp(0.0, 1.0);
        vec![Point2::new(a0.x + da.x * tc, a0.y + da.y * tc)]
    } else {
        Vec::new()
    }
}

/// Intersection of a line segment with a circular arc in 2D.
///
/// The arc has center `(cx, cy)`, `radius`, `start_angle` and signed `sweep`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn segment_arc_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> Vec<Point2> {
    let mut results = Vec::new();
    if radius < TOLERANCE || sweep.abs() < TOLERANCE {
        return results;
    }

    let dx = a1.x - a0.x;
    let dy = a1.y - a0.y;
    let seg_len_sq = dx * dx + dy * dy;
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute the parametric line into the circle equation:
    // (a0.x + t*dx - cx)² + (a0.y + t*dy - cy)² = r²
    let fx = a0.x - cx;
    let fy = a0.y - cy;
    let a = seg_len_sq;
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let eps = TOLERANCE;
    let t_roots = if disc_sqrt < TOLERANCE * 100.0 {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t_seg in t_roots {
        if t_seg < -eps || t_seg > 1.0 + eps {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);

        let px = a0.x + t_seg * dx;
        let py = a0.y + t_seg * dy;

        // Check that the point is within the arc's angular range.
        let angle = (py - cy).atan2(px - cx);
        if angle_to_arc_param(angle, start_angle, sweep).is_some() {
            results.push(Point2::new(px, py));
        }
    }

    results
}

/// Intersection of two circular arcs in 2D.
///
/// Arcs on the same circle yield the endpoints of one arc lying on the
/// other (the overlap endpoints), mirroring the collinear segment case.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn arc_arc_intersect_2d(
    c1x: f64,
    c1y: f64,
    r1: f64,
    start1: f64,
    sweep1: f64,
    c2x: f64,
    c2y: f64,
    r2: f64,
    start2: f64,
    sweep2: f64,
) -> Vec<Point2> {
    let mut results = Vec::new();
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return results;
    }

    let dx = c2x - c1x;
    let dy = c2y - c1y;
    let dist_sq = dx * dx + dy * dy;
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE {
        if !eq(r1, r2) {
            // Concentric with different radii: no intersection.
            return results;
        }
        // Same circle: the overlap endpoints are the arc endpoints that
        // lie on both angular ranges.
        let end_angles = [start1, start1 + sweep1, start2, start2 + sweep2];
        for angle in end_angles {
            if angle_to_arc_param(angle, start1, sweep1).is_some()
                && angle_to_arc_param(angle, start2, sweep2).is_some()
            {
                let pt = Point2::new(c1x + r1 * angle.cos(), c1y + r1 * angle.sin());
                if !results.iter().any(|p| points_equal(p, &pt)) {
                    results.push(pt);
                }
            }
        }
        return results;
    }

    // Check that the circles intersect.
    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + TOLERANCE || dist < diff - TOLERANCE {
        return results;
    }

    // Distance from c1 along the line c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -TOLERANCE {
        return results;
    }
    let h = h_sq.max(0.0).sqrt();

    // Midpoint on the radical line.
    let mx = c1x + a * dx / dist;
    let my = c1y + a * dy / dist;

    // Perpendicular direction.
    let px = -dy / dist;
    let py = dx / dist;

    // Two candidate intersection points, or one if tangent.
    let candidates = if h < TOLERANCE {
        vec![(mx, my)]
    } else {
        vec![(mx + h * px, my + h * py), (mx - h * px, my - h * py)]
    };

    for (ix, iy) in candidates {
        let angle1 = (iy - c1y).atan2(ix - c1x);
        let angle2 = (iy - c2y).atan2(ix - c2x);

        if angle_to_arc_param(angle1, start1, sweep1).is_some()
            && angle_to_arc_param(angle2, start2, sweep2).is_some()
        {
            results.push(Point2::new(ix, iy));
        }
    }

    results
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    let eps = TOLERANCE * 100.0;

    if sweep.abs() < TOLERANCE {
        return None;
    }

    // Angular offset from start_angle in the sweep direction.
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += 2.0 * PI;
        }
        while delta > 2.0 * PI + eps {
            delta -= 2.0 * PI;
        }
    } else {
        while delta > eps {
            delta -= 2.0 * PI;
        }
        while delta < -2.0 * PI - eps {
            delta += 2.0 * PI;
        }
    }

    let t = delta / sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Hits of the horizontal ray `{(x, origin.y) : x >= origin.x}` against a segment.
#[must_use]
pub fn horizontal_ray_segment_2d(origin: &Point2, a0: &Point2, a1: &Point2) -> Vec<Point2> {
    let py = origin.y;
    let dy = a1.y - a0.y;

    if eq_0(dy) {
        if !eq(a0.y, py) {
            return Vec::new();
        }
        // Segment collinear with the ray: report its endpoints on the ray.
        return [a0, a1]
            .into_iter()
            .filter(|p| p.x >= origin.x - TOLERANCE)
            .map(|p| Point2::new(p.x, py))
            .collect();
    }

    let t = (py - a0.y) / dy;
    let eps = TOLERANCE / dy.abs();
    if t < -eps || t > 1.0 + eps {
        return Vec::new();
    }
    let tc = t.clamp(0.0, 1.0);
    let px = a0.x + tc * (a1.x - a0.x);
    if px >= origin.x - TOLERANCE {
        vec![Point2::new(px, py)]
    } else {
        Vec::new()
    }
}

/// Hits of the horizontal ray from `origin` against a circular arc.
#[must_use]
pub fn horizontal_ray_arc_2d(
    origin: &Point2,
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> Vec<Point2> {
    let py = origin.y;
    let dy0 = py - cy;
    let disc = radius * radius - dy0 * dy0;
    if disc < -TOLERANCE {
        return Vec::new();
    }

    let half = disc.max(0.0).sqrt();
    let candidates = if half < TOLERANCE {
        vec![cx]
    } else {
        vec![cx - half, cx + half]
    };

    let mut results = Vec::new();
    for x in candidates {
        if x < origin.x - TOLERANCE {
            continue;
        }
        let angle = (py - cy).atan2(x - cx);
        if angle_to_arc_param(angle, start_angle, sweep).is_some() {
            results.push(Point2::new(x, py));
        }
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_segment_crossing() {
        let pts =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0));
        assert_eq!(pts.len(), 1);
        assert!(points_equal(&pts[0], &p(1.0, 1.0)));
    }

    #[test]
    fn segment_segment_disjoint_parallel() {
        let pts =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0));
        assert!(pts.is_empty());
    }

    #[test]
    fn segment_segment_collinear_overlap_endpoints() {
        // Overlap from (1,0) to (2,0): both endpoints reported.
        let pts =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0));
        assert_eq!(pts.len(), 2, "pts={pts:?}");
        assert!(pts.iter().any(|q| points_equal(q, &p(1.0, 0.0))));
        assert!(pts.iter().any(|q| points_equal(q, &p(2.0, 0.0))));
    }

    #[test]
    fn segment_segment_identical_reversed() {
        let pts =
            segment_segment_intersect_2d(&p(2.0, 0.0), &p(2.0, 2.0), &p(2.0, 2.0), &p(2.0, 0.0));
        assert_eq!(pts.len(), 2, "pts={pts:?}");
    }

    #[test]
    fn segment_segment_touch_at_endpoint() {
        let pts =
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0));
        assert_eq!(pts.len(), 1);
        assert!(points_equal(&pts[0], &p(1.0, 1.0)));
    }

    #[test]
    fn segment_arc_two_crossings() {
        // Horizontal segment through the upper unit semicircle endpoints.
        let pts = segment_arc_intersect_2d(&p(-2.0, 0.0), &p(2.0, 0.0), 0.0, 0.0, 1.0, 0.0, PI);
        assert_eq!(pts.len(), 2, "pts={pts:?}");
    }

    #[test]
    fn segment_arc_outside_angular_range() {
        let pts = segment_arc_intersect_2d(
            &p(-2.0, 0.0),
            &p(2.0, 0.0),
            0.0,
            0.0,
            1.0,
            PI / 4.0,
            PI / 4.0,
        );
        assert!(pts.is_empty(), "pts={pts:?}");
    }

    #[test]
    fn arc_arc_two_crossings() {
        let pts = arc_arc_intersect_2d(
            0.0,
            0.0,
            1.0,
            -PI,
            2.0 * PI,
            1.0,
            0.0,
            1.0,
            0.0,
            2.0 * PI,
        );
        assert_eq!(pts.len(), 2, "pts={pts:?}");
        let sqrt3_2 = 3.0_f64.sqrt() / 2.0;
        let (mut y0, mut y1) = (pts[0].y, pts[1].y);
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
        }
        assert!((y0 + sqrt3_2).abs() < 1e-6, "y0={y0}");
        assert!((y1 - sqrt3_2).abs() < 1e-6, "y1={y1}");
    }

    #[test]
    fn arc_arc_same_circle_overlap() {
        // Upper semicircle vs right semicircle of the unit circle:
        // the overlap is the first quadrant, endpoints (0,1) and (1,0).
        let pts = arc_arc_intersect_2d(
            0.0,
            0.0,
            1.0,
            0.0,
            PI,
            0.0,
            0.0,
            1.0,
            -PI / 2.0,
            PI,
        );
        assert_eq!(pts.len(), 2, "pts={pts:?}");
        assert!(pts.iter().any(|q| points_equal(q, &p(1.0, 0.0))));
        assert!(pts.iter().any(|q| points_equal(q, &p(0.0, 1.0))));
    }

    #[test]
    fn ray_segment_crossing_and_miss() {
        let hits = horizontal_ray_segment_2d(&p(0.0, 1.0), &p(2.0, 0.0), &p(2.0, 2.0));
        assert_eq!(hits.len(), 1);
        assert!(points_equal(&hits[0], &p(2.0, 1.0)));

        // Behind the ray origin.
        let hits = horizontal_ray_segment_2d(&p(3.0, 1.0), &p(2.0, 0.0), &p(2.0, 2.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn ray_segment_collinear() {
        let hits = horizontal_ray_segment_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn ray_arc_tangent_is_single_hit() {
        // Ray at y=1 tangent to the unit circle at (0,1).
        let hits = horizontal_ray_arc_2d(&p(-3.0, 1.0), 0.0, 0.0, 1.0, 0.0, PI);
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(points_equal(&hits[0], &p(0.0, 1.0)));
    }

    #[test]
    fn ray_arc_two_hits() {
        let hits = horizontal_ray_arc_2d(&p(-3.0, 0.5), 0.0, 0.0, 1.0, 0.0, PI);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }
}
