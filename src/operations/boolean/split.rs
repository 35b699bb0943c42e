use crate::error::Result;
use crate::math::points_equal;
use crate::polygon::{PolygonId, PolygonStore};

use super::records::{CrossingRecord, END_VERTEX, NOT_VERTEX, START_VERTEX};

/// Splits one polygon's edges at its crossing points, in arc order.
///
/// Two passes that must stay separate: the first inserts vertices and
/// retargets `edge_before`, the second resolves `edge_after` from the
/// final `next` links. Fusing them would read `next` pointers that later
/// splits still move.
///
/// # Errors
///
/// Returns an error if the polygon's topology is broken or a split point
/// is rejected by the store.
pub fn split_polygon_edges(
    store: &mut PolygonStore,
    poly: PolygonId,
    recs: &mut [CrossingRecord],
    sorted: &[usize],
) -> Result<()> {
    for &ri in sorted {
        let Some(edge) = recs[ri].edge_before else {
            continue;
        };
        let pt = recs[ri].pt;

        // Earlier splits may have moved the point onto a neighbour edge
        // or an endpoint, so the vertex flags are recomputed against the
        // current edge before deciding.
        let (start, end) = {
            let shape = &store.edge(edge)?.shape;
            (shape.start(), shape.end())
        };
        let mut flags = NOT_VERTEX;
        if points_equal(&pt, &start) {
            flags |= START_VERTEX;
        }
        if points_equal(&pt, &end) {
            flags |= END_VERTEX;
        }

        if flags & START_VERTEX != 0 {
            // The point is already a vertex: the edge ending there is the
            // predecessor.
            recs[ri].edge_before = Some(store.edge(edge)?.prev);
            recs[ri].is_vertex = END_VERTEX;
            continue;
        }
        if flags & END_VERTEX != 0 {
            recs[ri].is_vertex = END_VERTEX;
            continue;
        }

        recs[ri].is_vertex = flags;
        let head = store.add_vertex(poly, &pt, edge)?;
        recs[ri].edge_before = Some(head);
    }

    for &ri in sorted {
        if let Some(before) = recs[ri].edge_before {
            recs[ri].edge_after = Some(store.edge(before)?.next);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::collect::collect_crossings;
    use super::super::sort::sort_crossings;
    use super::*;
    use crate::math::{eq, points_equal, Point2};

    #[test]
    fn split_establishes_before_after_links() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        store
            .add_face_from_points(a, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
            .unwrap();
        let b = store.add_polygon();
        store
            .add_face_from_points(b, &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)])
            .unwrap();

        let mut xs = collect_crossings(&store, a, b).unwrap();
        sort_crossings(&mut xs);
        split_polygon_edges(&mut store, a, &mut xs.a, &xs.sorted_a).unwrap();
        split_polygon_edges(&mut store, b, &mut xs.b, &xs.sorted_b).unwrap();

        for recs in [&xs.a, &xs.b] {
            for rec in recs.iter() {
                let before = rec.edge_before.unwrap();
                let after = rec.edge_after.unwrap();
                assert_eq!(store.edge(before).unwrap().next, after);
                assert!(points_equal(&store.edge(before).unwrap().shape.end(), &rec.pt));
                assert!(points_equal(
                    &store.edge(after).unwrap().shape.start(),
                    &rec.pt
                ));
                // Arc lengths stay additive across the split.
                let before_edge = store.edge(before).unwrap();
                let after_edge = store.edge(after).unwrap();
                if !eq(after_edge.arc_length, 0.0) {
                    assert!(eq(
                        before_edge.arc_length + before_edge.shape.length(),
                        after_edge.arc_length
                    ));
                }
            }
        }

        // Both rings grew by one vertex per crossing on that polygon.
        let face_a = store.polygon(a).unwrap().faces[0];
        assert_eq!(store.ring_edges(face_a).unwrap().len(), 6);
    }

    #[test]
    fn crossing_at_existing_vertex_does_not_split() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        store
            .add_face_from_points(a, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])
            .unwrap();
        let b = store.add_polygon();
        store
            .add_face_from_points(b, &[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)])
            .unwrap();

        let mut xs = collect_crossings(&store, a, b).unwrap();
        sort_crossings(&mut xs);
        split_polygon_edges(&mut store, a, &mut xs.a, &xs.sorted_a).unwrap();
        split_polygon_edges(&mut store, b, &mut xs.b, &xs.sorted_b).unwrap();

        let face_a = store.polygon(a).unwrap().faces[0];
        let face_b = store.polygon(b).unwrap().faces[0];
        assert_eq!(store.ring_edges(face_a).unwrap().len(), 4);
        assert_eq!(store.ring_edges(face_b).unwrap().len(), 4);

        let touch = Point2::new(2.0, 2.0);
        for rec in xs.a.iter().chain(xs.b.iter()) {
            assert_eq!(rec.is_vertex, END_VERTEX);
            let before = rec.edge_before.unwrap();
            assert!(points_equal(&store.edge(before).unwrap().shape.end(), &touch));
        }
    }
}
