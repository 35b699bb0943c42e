use std::collections::HashSet;

use crate::error::Result;
use crate::polygon::{FaceId, Inclusion, PolygonId, PolygonStore};

use super::records::{CrossingRecord, Crossings};

/// Classifies the faces of `poly` that carry no crossing at all, by ray
/// shooting their first edge against the other polygon. The face-wide
/// value is read back from that edge.
///
/// # Errors
///
/// Returns an error if the topology is broken.
pub fn mark_non_intersected_faces(
    store: &mut PolygonStore,
    poly: PolygonId,
    other: PolygonId,
    recs: &[CrossingRecord],
) -> Result<()> {
    let crossed: HashSet<FaceId> = recs.iter().filter_map(|r| r.face).collect();
    for face in store.polygon(poly)?.faces.clone() {
        if crossed.contains(&face) {
            continue;
        }
        let first = store.face(face)?.first;
        store.edge_mut(first)?.clear_classification();
        store.set_inclusion(first, other)?;
    }
    Ok(())
}

/// Resets the edges incident to crossings and seeds the crossing endpoint
/// with BOUNDARY (the point lies on the other polygon's boundary by
/// construction).
///
/// Clearing and seeding are separate passes: an edge incident to two
/// crossings carries a boundary mark at both ends, and a fused loop would
/// wipe the first mark while clearing for the second crossing.
///
/// # Errors
///
/// Returns an error if an incident edge is missing.
pub fn seed_boundary_flags(store: &mut PolygonStore, recs: &[CrossingRecord]) -> Result<()> {
    for rec in recs {
        if let Some(e) = rec.edge_before {
            store.edge_mut(e)?.clear_classification();
        }
        if let Some(e) = rec.edge_after {
            store.edge_mut(e)?.clear_classification();
        }
    }
    for rec in recs {
        if let Some(e) = rec.edge_before {
            store.edge_mut(e)?.bv_end = Some(Inclusion::Boundary);
        }
        if let Some(e) = rec.edge_after {
            store.edge_mut(e)?.bv_start = Some(Inclusion::Boundary);
        }
    }
    Ok(())
}

/// Computes `bv` for every edge incident to a crossing.
///
/// # Errors
///
/// Returns an error if an incident edge is missing or the other polygon is
/// malformed.
pub fn classify_incident_edges(
    store: &mut PolygonStore,
    recs: &[CrossingRecord],
    other: PolygonId,
) -> Result<()> {
    for rec in recs {
        if let Some(e) = rec.edge_before {
            store.set_inclusion(e, other)?;
        }
        if let Some(e) = rec.edge_after {
            store.set_inclusion(e, other)?;
        }
    }
    Ok(())
}

/// Finds single-edge boundary chains between consecutive crossings on
/// polygon A, locates the paired chain on polygon B (trying both pairing
/// directions), and stamps SAME/OPPOSITE overlap flags on both edges.
///
/// A chain whose B side is not a single boundary edge in either direction
/// is an overlap conflict and is skipped; excision then falls back to the
/// plain bv rules.
///
/// # Errors
///
/// Returns an error if an incident edge is missing.
pub fn set_overlap_flags(store: &mut PolygonStore, crossings: &Crossings) -> Result<()> {
    let sorted = &crossings.sorted_a;
    let recs = &crossings.a;
    let mut cur_face: Option<FaceId> = None;
    let mut first_in_face = 0usize;

    for pos in 0..sorted.len() {
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

        let (Some(from_a), Some(to_a)) = (recs[i].edge_after, recs[j].edge_before) else {
            continue;
        };
        if from_a != to_a {
            continue;
        }
        if store.edge(from_a)?.bv != Some(Inclusion::Boundary) {
            continue;
        }

        // The paired chain on B runs between the same two crossings, in
        // either direction.
        let candidate = [
            (crossings.b[i].edge_after, crossings.b[j].edge_before),
            (crossings.b[j].edge_after, crossings.b[i].edge_before),
        ]
        .into_iter()
        .find_map(|(from_b, to_b)| match (from_b, to_b) {
            (Some(f), Some(t)) if f == t => Some(f),
            _ => None,
        });
        let Some(edge_b) = candidate else {
            continue;
        };
        if store.edge(edge_b)?.bv != Some(Inclusion::Boundary) {
            continue;
        }

        store.set_overlap(from_a, edge_b)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::collect::collect_crossings;
    use super::super::dedup::filter_duplicates;
    use super::super::sort::sort_crossings;
    use super::super::split::split_polygon_edges;
    use super::*;
    use crate::polygon::Overlap;

    fn run_until_classify(
        store: &mut PolygonStore,
        a: PolygonId,
        b: PolygonId,
    ) -> Crossings {
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
    fn overlapping_squares_incident_edges() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        store
            .add_face_from_points(a, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
            .unwrap();
        let b = store.add_polygon();
        store
            .add_face_from_points(b, &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)])
            .unwrap();
        let xs = run_until_classify(&mut store, a, b);

        // Around each crossing, one side of A dips inside B and the other
        // stays out.
        let mut seen = Vec::new();
        for rec in &xs.a {
            let before = store.edge(rec.edge_before.unwrap()).unwrap();
            let after = store.edge(rec.edge_after.unwrap()).unwrap();
            assert_eq!(before.bv_end, Some(Inclusion::Boundary));
            assert_eq!(after.bv_start, Some(Inclusion::Boundary));
            seen.push((before.bv.unwrap(), after.bv.unwrap()));
        }
        assert!(seen.contains(&(Inclusion::Outside, Inclusion::Inside)));
        assert!(seen.contains(&(Inclusion::Inside, Inclusion::Outside)));
    }

    #[test]
    fn containment_marks_whole_faces() {
        let mut store = PolygonStore::new();
        let outer = store.add_polygon();
        let outer_face = store
            .add_face_from_points(
                outer,
                &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            )
            .unwrap();
        let inner = store.add_polygon();
        let inner_face = store
            .add_face_from_points(inner, &[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)])
            .unwrap();
        let _ = run_until_classify(&mut store, outer, inner);

        let outer_first = store.face(outer_face).unwrap().first;
        let inner_first = store.face(inner_face).unwrap().first;
        assert_eq!(store.edge(outer_first).unwrap().bv, Some(Inclusion::Outside));
        assert_eq!(store.edge(inner_first).unwrap().bv, Some(Inclusion::Inside));
    }

    #[test]
    fn shared_edge_gets_opposite_overlap() {
        let mut store = PolygonStore::new();
        let a = store.add_polygon();
        store
            .add_face_from_points(a, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])
            .unwrap();
        let b = store.add_polygon();
        store
            .add_face_from_points(b, &[(2.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0)])
            .unwrap();
        let xs = run_until_classify(&mut store, a, b);

        // Both copies of the shared edge are boundary with an OPPOSITE flag
        // (the two counter-clockwise rings traverse it in opposite
        // directions).
        let mut overlapped = 0;
        for rec in xs.a.iter().chain(xs.b.iter()) {
            for edge in [rec.edge_before, rec.edge_after].into_iter().flatten() {
                let e = store.edge(edge).unwrap();
                if e.overlap == Some(Overlap::Opposite) {
                    assert_eq!(e.bv, Some(Inclusion::Boundary));
                    overlapped += 1;
                }
            }
        }
        assert!(overlapped >= 2, "overlapped={overlapped}");
    }
}
