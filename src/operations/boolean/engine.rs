use tracing::{debug, instrument};

use crate::error::Result;
use crate::polygon::{PolygonId, PolygonStore};

use super::classify::{
    classify_incident_edges, mark_non_intersected_faces, seed_boundary_flags, set_overlap_flags,
};
use super::collect::collect_crossings;
use super::dedup::filter_duplicates;
use super::excise::{remove_irrelevant_chains, remove_irrelevant_faces};
use super::records::Crossings;
use super::restitch::{
    check_unresolved, discard_old_faces, merge_work_polygon, restore_faces, swap_links,
};
use super::sort::sort_crossings;
use super::split::split_polygon_edges;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BooleanOp {
    Union = 1,
    Intersect = 2,
    Subtract = 3,
}

/// Runs the boolean pipeline on clones of `a` and `b`.
///
/// Returns `(result, work)`: the result carrier and the partially consumed
/// work polygon. With `restore` false the pipeline stops after excision,
/// leaving each clone holding exactly the boundary pieces that survive the
/// operation; the clip entry points read those back directly.
///
/// # Errors
///
/// Returns an error on malformed input or an unresolvable touching point.
pub(super) fn boolean_op_binary(
    store: &mut PolygonStore,
    a: PolygonId,
    b: PolygonId,
    op: BooleanOp,
    restore: bool,
) -> Result<(PolygonId, PolygonId)> {
    let res = store.clone_polygon(a)?;
    let wrk = store.clone_polygon(b)?;
    if op == BooleanOp::Subtract {
        store.reverse_polygon(wrk)?;
    }

    let mut crossings = prepare_crossings(store, res, wrk)?;
    debug!(crossings = crossings.len(), "collected and split");

    mark_non_intersected_faces(store, res, wrk, &crossings.a)?;
    mark_non_intersected_faces(store, wrk, res, &crossings.b)?;
    seed_boundary_flags(store, &crossings.a)?;
    seed_boundary_flags(store, &crossings.b)?;
    classify_incident_edges(store, &crossings.a, wrk)?;
    classify_incident_edges(store, &crossings.b, res)?;
    set_overlap_flags(store, &crossings)?;

    remove_irrelevant_chains(store, res, op, &mut crossings.a, &crossings.sorted_a, true)?;
    remove_irrelevant_chains(store, wrk, op, &mut crossings.b, &crossings.sorted_b, false)?;
    remove_irrelevant_faces(store, res, op, &crossings.a, true)?;
    remove_irrelevant_faces(store, wrk, op, &crossings.b, false)?;

    if restore {
        merge_work_polygon(store, res, wrk, &crossings.b)?;
        swap_links(store, &mut crossings)?;
        check_unresolved(&crossings)?;
        discard_old_faces(store, res, wrk, &crossings)?;
        restore_faces(store, res, &mut crossings)?;
        debug!(
            faces = store.polygon(res)?.faces.len(),
            "restitched result polygon"
        );
    }

    Ok((res, wrk))
}

/// Collect, sort, split and deduplicate: the shared front half of the
/// pipeline, also used by the intersection-point query.
pub(super) fn prepare_crossings(
    store: &mut PolygonStore,
    res: PolygonId,
    wrk: PolygonId,
) -> Result<Crossings> {
    let mut crossings = collect_crossings(store, res, wrk)?;
    sort_crossings(&mut crossings);
    split_polygon_edges(store, res, &mut crossings.a, &crossings.sorted_a)?;
    split_polygon_edges(store, wrk, &mut crossings.b, &crossings.sorted_b)?;
    filter_duplicates(&mut crossings);
    Ok(crossings)
}

/// Executes a boolean operation and returns the result polygon.
///
/// Both inputs are cloned first; the originals are untouched.
///
/// # Errors
///
/// Returns an error on malformed input or an unresolvable touching point.
#[instrument(skip(store))]
pub fn boolean_execute(
    store: &mut PolygonStore,
    a: PolygonId,
    b: PolygonId,
    op: BooleanOp,
) -> Result<PolygonId> {
    let (res, wrk) = boolean_op_binary(store, a, b, op, true)?;
    store.remove_polygon(wrk);
    Ok(res)
}

/// Set union of two polygons.
///
/// # Errors
///
/// Returns an error on malformed input or an unresolvable touching point.
pub fn unify(store: &mut PolygonStore, a: PolygonId, b: PolygonId) -> Result<PolygonId> {
    boolean_execute(store, a, b, BooleanOp::Union)
}

/// Set intersection of two polygons.
///
/// # Errors
///
/// Returns an error on malformed input or an unresolvable touching point.
pub fn intersect(store: &mut PolygonStore, a: PolygonId, b: PolygonId) -> Result<PolygonId> {
    boolean_execute(store, a, b, BooleanOp::Intersect)
}

/// Set difference `a \ b`.
///
/// The clone of `b` is reversed before the pipeline runs; the excision
/// rules assume that reversal.
///
/// # Errors
///
/// Returns an error on malformed input or an unresolvable touching point.
pub fn subtract(store: &mut PolygonStore, a: PolygonId, b: PolygonId) -> Result<PolygonId> {
    boolean_execute(store, a, b, BooleanOp::Subtract)
}
