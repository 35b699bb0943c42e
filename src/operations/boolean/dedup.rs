use tracing::debug;

use crate::math::eq;

use super::records::{CrossingRecord, Crossings};
use super::sort::sort_crossings;

/// Removes duplicated crossings: pairs that collapsed to the same
/// `(face, arc position, edge_before, edge_after)` fingerprint on both
/// polygons, which happens when an intersection lands on a polygon vertex
/// and is reported once per incident edge.
///
/// Two sweeps (one per sorted list) mark victims by clearing their ids;
/// marked pairs are then squeezed out of both lists together, ids are
/// re-densified, and the sorted orders rebuilt from scratch.
pub fn filter_duplicates(crossings: &mut Crossings) {
    sweep(&mut crossings.a, &crossings.sorted_a, &mut crossings.b);
    sweep(&mut crossings.b, &crossings.sorted_b, &mut crossings.a);

    if crossings.a.iter().all(|r| r.id.is_some()) {
        return;
    }

    let before = crossings.len();
    let mut kept_a = Vec::with_capacity(before);
    let mut kept_b = Vec::with_capacity(before);
    for i in 0..before {
        if crossings.a[i].id.is_some() && crossings.b[i].id.is_some() {
            kept_a.push(crossings.a[i].clone());
            kept_b.push(crossings.b[i].clone());
        }
    }
    for (i, (ra, rb)) in kept_a.iter_mut().zip(kept_b.iter_mut()).enumerate() {
        ra.id = Some(i);
        rb.id = Some(i);
    }
    debug!(before, after = kept_a.len(), "squeezed duplicated crossings");

    crossings.a = kept_a;
    crossings.b = kept_b;
    sort_crossings(crossings);
}

/// One marking sweep over a sorted list.
///
/// A rolling reference record tracks the current arc position; a record at
/// the same position whose counterpart shares the reference counterpart's
/// edges is a duplicate, and the whole pair is marked.
fn sweep(primary: &mut [CrossingRecord], sorted: &[usize], counterpart: &mut [CrossingRecord]) {
    let mut reference: Option<usize> = None;
    for &i in sorted {
        if primary[i].id.is_none() {
            continue;
        }
        let Some(r) = reference else {
            reference = Some(i);
            continue;
        };
        if primary[i].face != primary[r].face
            || !eq(primary[i].arc_length, primary[r].arc_length)
        {
            reference = Some(i);
            continue;
        }
        if counterpart[i].edge_before == counterpart[r].edge_before
            && counterpart[i].edge_after == counterpart[r].edge_after
        {
            primary[i].id = None;
            counterpart[i].id = None;
        }
    }
}
