use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::polygon::{FaceId, Inclusion, Overlap, PolygonId, PolygonStore};

use super::engine::BooleanOp;
use super::records::{pull_range, CrossingRecord};

/// Deletes the chains of `poly` that cannot contribute to the result.
///
/// For each sorted crossing, the chain runs from its `edge_after` to the
/// next same-face crossing's `edge_before` (wrapping to the face's first
/// crossing). After a deletion every record in the from-pull loses its
/// `edge_after` and every record in the to-pull its `edge_before`, and the
/// walk skips past the from-pull.
///
/// # Errors
///
/// Returns an error if the store rejects a chain removal.
pub fn remove_irrelevant_chains(
    store: &mut PolygonStore,
    poly: PolygonId,
    op: BooleanOp,
    recs: &mut [CrossingRecord],
    sorted: &[usize],
    is_res: bool,
) -> Result<()> {
    let mut cur_face: Option<FaceId> = None;
    let mut first_in_face = 0usize;
    let mut pos = 0usize;

    while pos < sorted.len() {
        let i = sorted[pos];
        if recs[i].face != cur_face {
            cur_face = recs[i].face;
            first_in_face = pos;
        }
        let next_pos = if pos + 1 < sorted.len() && recs[sorted[pos + 1]].face == cur_face {
            pos + 1
        } else {
            first_in_face
        };
        let j = sorted[next_pos];

        let (Some(edge_from), Some(edge_to), Some(face)) =
            (recs[i].edge_after, recs[j].edge_before, recs[i].face)
        else {
            pos += 1;
            continue;
        };
        let (Ok(from_data), Ok(to_data)) = (store.edge(edge_from), store.edge(edge_to)) else {
            pos += 1;
            continue;
        };
        let bv_from = from_data.bv;
        let bv_to = to_data.bv;
        let overlap = from_data.overlap;

        let bv_remove = match op {
            BooleanOp::Union => {
                bv_from == Some(Inclusion::Inside) && bv_to == Some(Inclusion::Inside)
            }
            BooleanOp::Intersect => {
                bv_from == Some(Inclusion::Outside) && bv_to == Some(Inclusion::Outside)
            }
            BooleanOp::Subtract if is_res => {
                bv_from == Some(Inclusion::Inside) || bv_to == Some(Inclusion::Inside)
            }
            BooleanOp::Subtract => {
                bv_from == Some(Inclusion::Outside) || bv_to == Some(Inclusion::Outside)
            }
        };
        // Coincident boundary: a same-direction overlap keeps exactly one
        // copy, on the non-result polygon; an opposite-direction overlap
        // cancels under every operator.
        let boundary_remove = bv_from == Some(Inclusion::Boundary)
            && bv_to == Some(Inclusion::Boundary)
            && match overlap {
                Some(Overlap::Same) => is_res,
                Some(Overlap::Opposite) => true,
                None => false,
            };

        if !(bv_remove || boundary_remove) {
            pos += 1;
            continue;
        }

        let from_pull = pull_range(recs, sorted, pos);
        let to_pull = pull_range(recs, sorted, next_pos);
        store.remove_chain(poly, face, edge_from, edge_to)?;
        for k in from_pull.0..=from_pull.1 {
            recs[sorted[k]].edge_after = None;
        }
        for k in to_pull.0..=to_pull.1 {
            recs[sorted[k]].edge_before = None;
        }
        pos = from_pull.1 + 1;
    }
    Ok(())
}

/// Deletes whole faces of `poly` that carry no crossing and whose
/// face-wide classification rules them out of the result.
///
/// # Errors
///
/// Returns an error if a face ring is broken.
pub fn remove_irrelevant_faces(
    store: &mut PolygonStore,
    poly: PolygonId,
    op: BooleanOp,
    recs: &[CrossingRecord],
    is_res: bool,
) -> Result<()> {
    let crossed: HashSet<FaceId> = recs.iter().filter_map(|r| r.face).collect();
    for face in store.polygon(poly)?.faces.clone() {
        if crossed.contains(&face) || !store.face_exists(face) {
            continue;
        }
        let first = store.face(face)?.first;
        let bv = store.edge(first)?.bv;

        let remove = match (op, bv) {
            (BooleanOp::Union, Some(Inclusion::Inside)) => true,
            (BooleanOp::Intersect, Some(Inclusion::Outside)) => true,
            (BooleanOp::Subtract, Some(Inclusion::Inside)) => is_res,
            (BooleanOp::Subtract, Some(Inclusion::Outside)) => !is_res,
            _ => false,
        };
        if remove {
            debug!(?op, is_res, "deleting non-intersected face");
            store.delete_face(poly, face)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::collect::collect_crossings;
    use super::super::classify::{
        classify_incident_edges, mark_non_intersected_faces, seed_boundary_flags,
        set_overlap_flags,
    };
    use super::super::dedup::filter_duplicates;
    use super::super::records::Crossings;
    use super::super::sort::sort_crossings;
    use super::super::split::split_polygon_edges;
    use super::*;

    fn prepare(store: &mut PolygonStore, a: PolygonId, b: PolygonId) -> Crossings {
        let mut xs = collect_crossings(store, a, b).unwrap();
        sort_crossings(&mut xs);
        split_polygon_edges(store, a, &mut xs.a, &xs.sorted_a).unwrap();
        split_polygon_edges(store, b, &mut xs.b, &xs.sorted_b).unwrap();
        filter_duplicates(&mut xs);
        mark_non_intersected_faces(store, a, b, &xs.a).unwrap();
        mark_non_intersected_faces(store, b, a, &xs.b).unwrap();
        seed_boundary_flags(store, &xs.a).unwrap();
        seed_boundary_flags(store, &xs.b).unwrap();
        classify_incident_edges(store, &xs.a, b).unwrap();
        classify_incident_edges(store, &xs.b, a).unwrap();
        set_overlap_flags(store, &xs).unwrap();
        xs
    }

    #[test]
    fn union_excises_the_buried_corners() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        let face_a = store
            .add_face_from_points(a, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
            .unwrap();
        let b = store.add_polygon();
        let face_b = store
            .add_face_from_points(b, &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)])
            .unwrap();
        let mut xs = prepare(&mut store, a, b);

        remove_irrelevant_chains(&mut store, a, BooleanOp::Union, &mut xs.a, &xs.sorted_a, true)
            .unwrap();
        remove_irrelevant_chains(&mut store, b, BooleanOp::Union, &mut xs.b, &xs.sorted_b, false)
            .unwrap();

        // Each square loses the two-edge corner buried in the other: six
        // split edges minus two on each ring.
        assert_eq!(store.ring_edges(face_a).unwrap().len(), 4);
        assert_eq!(store.ring_edges(face_b).unwrap().len(), 4);

        // Every crossing now has exactly one open side per polygon.
        for i in 0..xs.len() {
            let ra = &xs.a[i];
            let rb = &xs.b[i];
            assert_ne!(ra.edge_before.is_some(), ra.edge_after.is_some());
            assert_ne!(rb.edge_before.is_some(), rb.edge_after.is_some());
        }
    }

    #[test]
    fn intersect_deletes_contained_outer_face() {
        let mut store = PolygonStore::new();
        let outer = store.add_polygon();
        store
            .add_face_from_points(
                outer,
                &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            )
            .unwrap();
        let inner = store.add_polygon();
        store
            .add_face_from_points(inner, &[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)])
            .unwrap();
        let xs = prepare(&mut store, outer, inner);
        assert!(xs.is_empty());

        remove_irrelevant_faces(&mut store, outer, BooleanOp::Intersect, &xs.a, true).unwrap();
        remove_irrelevant_faces(&mut store, inner, BooleanOp::Intersect, &xs.b, false).unwrap();

        assert!(store.polygon(outer).unwrap().faces.is_empty());
        assert_eq!(store.polygon(inner).unwrap().faces.len(), 1);
    }

    #[test]
    fn union_keeps_disjoint_faces() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        store
            .add_face_from_points(a, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])
            .unwrap();
        let b = store.add_polygon();
        store
            .add_face_from_points(b, &[(5.0, 0.0), (7.0, 0.0), (7.0, 2.0), (5.0, 2.0)])
            .unwrap();
        let xs = prepare(&mut store, a, b);

        remove_irrelevant_faces(&mut store, a, BooleanOp::Union, &xs.a, true).unwrap();
        remove_irrelevant_faces(&mut store, b, BooleanOp::Union, &xs.b, false).unwrap();
        assert_eq!(store.polygon(a).unwrap().faces.len(), 1);
        assert_eq!(store.polygon(b).unwrap().faces.len(), 1);
    }
}
