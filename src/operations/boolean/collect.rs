use tracing::debug;

use crate::error::Result;
use crate::math::{eq, eq_0, Point2};
use crate::polygon::{EdgeId, PolygonId, PolygonStore};

use super::records::{CrossingRecord, Crossings, END_VERTEX, NOT_VERTEX, START_VERTEX};

/// Walks every edge of polygon `a` against polygon `b`'s spatial index and
/// collects all boundary crossings as paired records.
///
/// The two record pushes for one geometric crossing happen together, so
/// `a[i]` and `b[i]` always describe the same point.
///
/// # Errors
///
/// Returns an error if either polygon's topology is broken.
pub fn collect_crossings(
    store: &PolygonStore,
    a: PolygonId,
    b: PolygonId,
) -> Result<Crossings> {
    let mut crossings = Crossings::default();

    for &face in &store.polygon(a)?.faces {
        for e1 in store.ring_edges(face)? {
            let shape1 = store.edge(e1)?.shape.clone();
            let candidates = store.search(b, &shape1.bounding_box())?;
            for e2 in candidates {
                let shape2 = store.edge(e2)?.shape.clone();
                for pt in shape1.intersect(&shape2) {
                    let Some(ra) = make_record(store, e1, &pt)? else {
                        debug!(x = pt.x, y = pt.y, "dropping degenerate crossing");
                        continue;
                    };
                    let Some(rb) = make_record(store, e2, &pt)? else {
                        debug!(x = pt.x, y = pt.y, "dropping degenerate crossing");
                        continue;
                    };
                    crossings.push_pair(ra, rb);
                }
            }
        }
    }

    Ok(crossings)
}

/// Builds one crossing record for `pt` on `edge`, or `None` when the
/// oracle reports the point off the edge (a degenerate crossing).
fn make_record(
    store: &PolygonStore,
    edge: EdgeId,
    pt: &Point2,
) -> Result<Option<CrossingRecord>> {
    let e = store.edge(edge)?;
    let Some((head, tail)) = e.shape.split(pt) else {
        return Ok(None);
    };

    let len = match (&head, &tail) {
        (None, _) => 0.0,
        (_, None) => e.shape.length(),
        (Some(h), Some(_)) => h.length(),
    };

    let mut is_vertex = NOT_VERTEX;
    if eq_0(len) {
        is_vertex |= START_VERTEX;
    }
    if eq(len, e.shape.length()) {
        is_vertex |= END_VERTEX;
    }

    // A crossing at the edge's end that lands on the face origin wraps to
    // arc length zero instead of the full perimeter.
    let arc_length = if is_vertex & END_VERTEX != 0 && eq_0(store.edge(e.next)?.arc_length) {
        0.0
    } else {
        e.arc_length + len
    };

    Ok(Some(CrossingRecord {
        id: None,
        pt: *pt,
        arc_length,
        edge_before: Some(edge),
        edge_after: None,
        face: e.face,
        is_vertex,
        face_seq: 0,
    }))
}
