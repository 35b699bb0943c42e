use crate::error::Result;
use crate::geometry::{Box2, Shape};
use crate::math::{eq_0, gt, points_equal, Point2};

use super::edge::{EdgeId, Inclusion, Overlap};
use super::{PolygonId, PolygonStore};

impl PolygonStore {
    /// Classifies a point against a polygon by horizontal ray casting.
    ///
    /// Shoots a ray from `pt` toward +x and counts boundary crossings. A
    /// hit landing on a ring vertex is counted once, and only when the two
    /// incident edges leave the vertex on opposite sides of the ray; a ray
    /// grazing an arc tangentially is not counted. Odd count means inside.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon's topology is broken.
    pub fn ray_shoot(&self, poly: PolygonId, pt: &Point2) -> Result<Inclusion> {
        let ray_box = Box2::new(pt.x, pt.y, f64::INFINITY, pt.y);
        let candidates = self.polygon(poly)?.index.search(&ray_box);
        if candidates.is_empty() {
            return Ok(Inclusion::Outside);
        }

        for &id in &candidates {
            if self.edge(id)?.shape.contains(pt) {
                return Ok(Inclusion::Boundary);
            }
        }

        struct Hit {
            pt: Point2,
            edge: EdgeId,
        }
        let mut hits: Vec<Hit> = Vec::new();
        for &id in &candidates {
            for h in self.edge(id)?.shape.horizontal_ray_hits(pt) {
                hits.push(Hit { pt: h, edge: id });
            }
        }

        hits.sort_by(|a, b| {
            a.pt.x
                .partial_cmp(&b.pt.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut counter = 0u32;
        for hit in &hits {
            let edge = self.edge(hit.edge)?;
            let shape = &edge.shape;
            if points_equal(&hit.pt, &shape.end()) {
                // Vertex hit: pair this edge with its successor and count
                // once, if the ring actually crosses the ray here.
                let outgoing = &self.edge(edge.next)?.shape;
                let back = shape.tangent_in_end();
                let fwd = outgoing.tangent_in_start();
                if gt(back.y, 0.0) != gt(fwd.y, 0.0) {
                    counter += 1;
                }
            } else if points_equal(&hit.pt, &shape.start()) {
                // Counted at the end-hit of the predecessor edge.
            } else {
                match shape {
                    Shape::Segment(_) => counter += 1,
                    Shape::Arc(_) => {
                        // A horizontal tangent at the hit means the ray
                        // grazes the arc at a y-extreme without crossing.
                        let t = shape.tangent_at_point(&hit.pt);
                        if !eq_0(t.y) {
                            counter += 1;
                        }
                    }
                }
            }
        }

        Ok(if counter % 2 == 1 {
            Inclusion::Inside
        } else {
            Inclusion::Outside
        })
    }

    /// Computes an edge's inclusion relative to another polygon, consistent
    /// with any endpoint classification already present.
    ///
    /// Endpoints without a value are classified by ray shooting. When both
    /// endpoints sit on the other boundary, the midpoint decides the edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or the other polygon is
    /// malformed.
    pub fn set_inclusion(&mut self, edge: EdgeId, other: PolygonId) -> Result<Inclusion> {
        if let Some(bv) = self.edge(edge)?.bv {
            return Ok(bv);
        }

        let (start, end, mid) = {
            let shape = &self.edge(edge)?.shape;
            (shape.start(), shape.end(), shape.middle())
        };

        let bv_start = match self.edge(edge)?.bv_start {
            Some(v) => v,
            None => {
                let v = self.ray_shoot(other, &start)?;
                self.edge_mut(edge)?.bv_start = Some(v);
                v
            }
        };
        let bv_end = match self.edge(edge)?.bv_end {
            Some(v) => v,
            None => {
                let v = self.ray_shoot(other, &end)?;
                self.edge_mut(edge)?.bv_end = Some(v);
                v
            }
        };

        let bv = if bv_start == Inclusion::Boundary && bv_end == Inclusion::Boundary {
            self.ray_shoot(other, &mid)?
        } else if bv_start == Inclusion::Boundary {
            bv_end
        } else {
            // Covers bv_end == Boundary and the plain interior case, where
            // both endpoints agree.
            bv_start
        };

        self.edge_mut(edge)?.bv = Some(bv);
        Ok(bv)
    }

    /// Compares the directions of two coincident boundary edges and stamps
    /// the overlap flag on both.
    ///
    /// Returns `None` without stamping when the shapes do not actually
    /// coincide (mixed kinds, or equal endpoints on different curves).
    ///
    /// # Errors
    ///
    /// Returns an error if either edge is missing.
    pub fn set_overlap(&mut self, e1: EdgeId, e2: EdgeId) -> Result<Option<Overlap>> {
        let flag = {
            let s1 = &self.edge(e1)?.shape;
            let s2 = &self.edge(e2)?.shape;
            overlap_flag(s1, s2)
        };
        if let Some(f) = flag {
            self.edge_mut(e1)?.overlap = Some(f);
            self.edge_mut(e2)?.overlap = Some(f);
        }
        Ok(flag)
    }
}

fn overlap_flag(s1: &Shape, s2: &Shape) -> Option<Overlap> {
    match (s1, s2) {
        (Shape::Segment(a), Shape::Segment(b)) => {
            if points_equal(&a.start, &b.start) && points_equal(&a.end, &b.end) {
                Some(Overlap::Same)
            } else if points_equal(&a.start, &b.end) && points_equal(&a.end, &b.start) {
                Some(Overlap::Opposite)
            } else {
                None
            }
        }
        (Shape::Arc(a), Shape::Arc(b)) => {
            // Equal endpoints alone do not pin down an arc; the midpoint
            // settles which side of the chord it bulges to.
            if !points_equal(&a.middle(), &b.middle()) {
                return None;
            }
            if points_equal(&a.start(), &b.start()) && points_equal(&a.end(), &b.end()) {
                Some(Overlap::Same)
            } else if points_equal(&a.start(), &b.end()) && points_equal(&a.end(), &b.start()) {
                Some(Overlap::Opposite)
            } else {
                None
            }
        }
        _ => None,
    }
}
