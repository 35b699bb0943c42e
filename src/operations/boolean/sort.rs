use std::cmp::Ordering;
use std::collections::HashMap;

use crate::math::{gt, lt};
use crate::polygon::FaceId;

use super::records::{CrossingRecord, Crossings};

/// Orders both crossing lists by `(face, arc length)`.
///
/// Faces are numbered densely in first-seen order per list, then a stable
/// sort under epsilon arc-length comparison builds the sorted index
/// vectors. The unsorted lists are untouched, keeping pair lookups valid.
pub fn sort_crossings(crossings: &mut Crossings) {
    sort_list(&mut crossings.a, &mut crossings.sorted_a);
    sort_list(&mut crossings.b, &mut crossings.sorted_b);
}

fn sort_list(recs: &mut [CrossingRecord], sorted: &mut Vec<usize>) {
    let mut face_numbers: HashMap<Option<FaceId>, usize> = HashMap::new();
    for rec in recs.iter_mut() {
        let next = face_numbers.len();
        rec.face_seq = *face_numbers.entry(rec.face).or_insert(next);
    }

    *sorted = (0..recs.len()).collect();
    sorted.sort_by(|&i, &j| {
        recs[i]
            .face_seq
            .cmp(&recs[j].face_seq)
            .then_with(|| cmp_arc(recs[i].arc_length, recs[j].arc_length))
    });
}

fn cmp_arc(a: f64, b: f64) -> Ordering {
    if lt(a, b) {
        Ordering::Less
    } else if gt(a, b) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::polygon::FaceId;
    use slotmap::Key;

    fn rec(face: FaceId, arc_length: f64) -> CrossingRecord {
        CrossingRecord {
            id: None,
            pt: Point2::new(0.0, 0.0),
            arc_length,
            edge_before: None,
            edge_after: None,
            face: Some(face),
            is_vertex: 0,
            face_seq: 0,
        }
    }

    #[test]
    fn groups_by_face_then_arc_length() {
        let f1 = FaceId::null();
        let mut crossings = Crossings::default();
        crossings.a = vec![rec(f1, 5.0), rec(f1, 1.0), rec(f1, 3.0)];
        crossings.b = vec![rec(f1, 0.0), rec(f1, 0.0), rec(f1, 0.0)];
        sort_crossings(&mut crossings);
        assert_eq!(crossings.sorted_a, vec![1, 2, 0]);
    }

    #[test]
    fn equal_arc_lengths_keep_insertion_order() {
        let f1 = FaceId::null();
        let mut crossings = Crossings::default();
        crossings.a = vec![rec(f1, 2.0), rec(f1, 2.0), rec(f1, 1.0)];
        crossings.b = vec![rec(f1, 0.0), rec(f1, 0.0), rec(f1, 0.0)];
        sort_crossings(&mut crossings);
        assert_eq!(crossings.sorted_a, vec![2, 0, 1]);
    }
}
