use crate::geometry::Shape;

use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the polygon store.
    pub struct EdgeId;
}

/// Classification of an edge (or point) relative to the other polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Inside,
    Outside,
    Boundary,
}

/// Direction flag for an edge coincident with the other polygon's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    Same,
    Opposite,
}

/// Data associated with a polygon edge.
///
/// Edges form circular doubly-linked rings via `prev`/`next` ids. The
/// classification fields are scratch state owned by the boolean engine
/// and are only meaningful during an operation.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// The geometric primitive defining this edge.
    pub shape: Shape,
    /// Previous edge on the face ring.
    pub prev: EdgeId,
    /// Next edge on the face ring.
    pub next: EdgeId,
    /// Owning face, if currently attached to one.
    pub face: Option<FaceId>,
    /// Cumulative length from the face origin to this edge's start.
    pub arc_length: f64,
    /// Edge classification relative to the other polygon.
    pub bv: Option<Inclusion>,
    /// Classification immediately at the start point.
    pub bv_start: Option<Inclusion>,
    /// Classification immediately at the end point.
    pub bv_end: Option<Inclusion>,
    /// Boundary-overlap direction flag.
    pub overlap: Option<Overlap>,
}

impl EdgeData {
    /// Creates an unlinked edge carrying `shape`.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            prev: EdgeId::default(),
            next: EdgeId::default(),
            face: None,
            arc_length: 0.0,
            bv: None,
            bv_start: None,
            bv_end: None,
            overlap: None,
        }
    }

    /// Clears all classification scratch fields.
    pub fn clear_classification(&mut self) {
        self.bv = None;
        self.bv_start = None;
        self.bv_end = None;
        self.overlap = None;
    }
}
