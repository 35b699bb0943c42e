use std::collections::HashSet;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::points_equal;
use crate::polygon::{EdgeId, FaceId, PolygonId, PolygonStore};

use super::records::{CrossingRecord, Crossings};

/// Merges the work polygon's surviving edges into the result polygon's
/// edge index. A work face carrying no crossing keeps its ring as-is and
/// moves over whole.
///
/// # Errors
///
/// Returns an error if the work polygon's topology is broken.
pub fn merge_work_polygon(
    store: &mut PolygonStore,
    res: PolygonId,
    wrk: PolygonId,
    wrk_recs: &[CrossingRecord],
) -> Result<()> {
    let crossed: HashSet<FaceId> = wrk_recs.iter().filter_map(|r| r.face).collect();
    for face in store.polygon(wrk)?.faces.clone() {
        for edge in store.ring_edges(face)? {
            store.index_edge(res, edge)?;
        }
        if !crossed.contains(&face) {
            store.move_face(wrk, res, face)?;
        }
    }
    Ok(())
}

/// Cross-links the two polygons at every crossing whose continuation was
/// excised on one side and survived on the other, then routes the
/// touching points whose continuation lives back on the same polygon.
///
/// # Errors
///
/// Returns an error if a link endpoint is missing from the store.
pub fn swap_links(store: &mut PolygonStore, crossings: &mut Crossings) -> Result<()> {
    for i in 0..crossings.len() {
        let (a, b) = (&mut crossings.a, &mut crossings.b);
        if a[i].edge_before.is_some()
            && a[i].edge_after.is_none()
            && b[i].edge_before.is_none()
            && b[i].edge_after.is_some()
        {
            let before = a[i].edge_before;
            let after = b[i].edge_after;
            link(store, before, after)?;
            a[i].edge_after = after;
            b[i].edge_before = before;
        }
        if b[i].edge_before.is_some()
            && b[i].edge_after.is_none()
            && a[i].edge_before.is_none()
            && a[i].edge_after.is_some()
        {
            let before = b[i].edge_before;
            let after = a[i].edge_after;
            link(store, before, after)?;
            b[i].edge_after = after;
            a[i].edge_before = before;
        }
    }

    resolve_touching(store, &mut crossings.a, &crossings.sorted_a)?;
    resolve_touching(store, &mut crossings.b, &crossings.sorted_b)?;
    Ok(())
}

/// A crossing left half-open after the pair swap continues on the same
/// polygon: another record at the identical point holds the surviving
/// continuation. Splice through it the same way.
fn resolve_touching(
    store: &mut PolygonStore,
    recs: &mut [CrossingRecord],
    sorted: &[usize],
) -> Result<()> {
    for pos in 0..sorted.len() {
        let i = sorted[pos];
        if recs[i].edge_before.is_none() || recs[i].edge_after.is_some() {
            continue;
        }
        let partner = sorted.iter().copied().find(|&j| {
            j != i
                && recs[j].edge_before.is_none()
                && recs[j].edge_after.is_some()
                && points_equal(&recs[j].pt, &recs[i].pt)
        });
        let Some(j) = partner else {
            continue;
        };
        debug!(
            x = recs[i].pt.x,
            y = recs[i].pt.y,
            "routing touching point through same-polygon record"
        );
        let before = recs[i].edge_before;
        let after = recs[j].edge_after;
        link(store, before, after)?;
        recs[i].edge_after = after;
        recs[j].edge_before = before;
    }
    Ok(())
}

fn link(store: &mut PolygonStore, before: Option<EdgeId>, after: Option<EdgeId>) -> Result<()> {
    let (Some(before), Some(after)) = (before, after) else {
        return Ok(());
    };
    store.edge_mut(before)?.next = after;
    store.edge_mut(after)?.prev = before;
    Ok(())
}

/// Verifies that every crossing is either fully linked or fully consumed.
///
/// A record with exactly one open side is a dead end the link swap could
/// not close: a topological inconsistency the caller must not retry.
///
/// # Errors
///
/// Returns [`OperationError::UnresolvedTouching`] on a half-open record.
pub fn check_unresolved(crossings: &Crossings) -> Result<()> {
    for rec in crossings.a.iter().chain(crossings.b.iter()) {
        if rec.edge_before.is_some() != rec.edge_after.is_some() {
            return Err(OperationError::UnresolvedTouching {
                x: rec.pt.x,
                y: rec.pt.y,
            }
            .into());
        }
    }
    Ok(())
}

/// Dissolves every face referenced by a crossing and detaches the
/// crossings' surrounding edges from it. The edges stay alive; only the
/// face entities disappear, making room for the restored rings.
///
/// # Errors
///
/// Returns an error if an edge referenced by a crossing is missing.
pub fn discard_old_faces(
    store: &mut PolygonStore,
    res: PolygonId,
    wrk: PolygonId,
    crossings: &Crossings,
) -> Result<()> {
    for (recs, poly) in [(&crossings.a, res), (&crossings.b, wrk)] {
        for rec in recs {
            if let Some(face) = rec.face {
                if store.face_exists(face) {
                    store.dissolve_face(poly, face)?;
                }
            }
            if let Some(e) = rec.edge_before {
                store.edge_mut(e)?.face = None;
            }
            if let Some(e) = rec.edge_after {
                store.edge_mut(e)?.face = None;
            }
        }
    }
    Ok(())
}

/// Walks the restitched rings and materializes the new faces on the
/// result polygon. Crossings of A seed rings first, then crossings of B
/// pick up rings that contain no A-side crossing at all.
///
/// # Errors
///
/// Returns an error if a restored ring does not close.
pub fn restore_faces(
    store: &mut PolygonStore,
    res: PolygonId,
    crossings: &mut Crossings,
) -> Result<()> {
    for recs in [&mut crossings.a, &mut crossings.b] {
        for rec in recs.iter_mut() {
            let (Some(before), Some(after)) = (rec.edge_before, rec.edge_after) else {
                // Fully consumed crossing: both continuations were excised.
                continue;
            };
            if store.edge(after)?.face.is_some() {
                continue;
            }
            let face = store.add_face_from_ring(res, after, before)?;
            rec.face = Some(face);
        }
    }
    Ok(())
}
