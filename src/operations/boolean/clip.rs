use crate::error::Result;
use crate::geometry::Shape;
use crate::math::Point2;
use crate::polygon::{PolygonId, PolygonStore};

use super::engine::{boolean_op_binary, prepare_crossings, BooleanOp};

/// Boundary of `a ∩ b` as raw edge lists, split by the operand each piece
/// came from.
///
/// Runs the intersection pipeline without restitching: after excision each
/// clone holds exactly the boundary pieces inside the other polygon.
///
/// # Errors
///
/// Returns an error on malformed input.
pub fn inner_clip(
    store: &mut PolygonStore,
    a: PolygonId,
    b: PolygonId,
) -> Result<(Vec<Shape>, Vec<Shape>)> {
    let (res, wrk) = boolean_op_binary(store, a, b, BooleanOp::Intersect, false)?;
    let shapes_a = store.polygon_shapes(res)?;
    let shapes_b = store.polygon_shapes(wrk)?;
    store.remove_polygon_deep(res)?;
    store.remove_polygon_deep(wrk)?;
    Ok((shapes_a, shapes_b))
}

/// Boundary of `a \ b`, taken from `a` only.
///
/// # Errors
///
/// Returns an error on malformed input.
pub fn outer_clip(store: &mut PolygonStore, a: PolygonId, b: PolygonId) -> Result<Vec<Shape>> {
    let (res, wrk) = boolean_op_binary(store, a, b, BooleanOp::Subtract, false)?;
    let shapes = store.polygon_shapes(res)?;
    store.remove_polygon_deep(res)?;
    store.remove_polygon_deep(wrk)?;
    Ok(shapes)
}

/// Boundary crossing points of the two polygons, each list ordered by
/// `(face, arc length)` along its own polygon.
///
/// Stops after duplicate filtering; no classification or excision runs.
///
/// # Errors
///
/// Returns an error on malformed input.
pub fn calculate_intersections(
    store: &mut PolygonStore,
    a: PolygonId,
    b: PolygonId,
) -> Result<(Vec<Point2>, Vec<Point2>)> {
    let res = store.clone_polygon(a)?;
    let wrk = store.clone_polygon(b)?;
    let crossings = prepare_crossings(store, res, wrk)?;

    let pts_a = crossings.sorted_a.iter().map(|&i| crossings.a[i].pt).collect();
    let pts_b = crossings.sorted_b.iter().map(|&i| crossings.b[i].pt).collect();

    store.remove_polygon_deep(res)?;
    store.remove_polygon_deep(wrk)?;
    Ok((pts_a, pts_b))
}
