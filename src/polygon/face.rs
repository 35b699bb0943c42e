use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the polygon store.
    pub struct FaceId;
}

/// A face: one closed region bounded by a circular ring of edges.
///
/// By convention outer faces are oriented counter-clockwise and holes
/// clockwise. `last` is always `first.prev` on a well-formed ring.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// First edge of the ring (the arc-length origin starts at its start point).
    pub first: EdgeId,
    /// Last edge of the ring.
    pub last: EdgeId,
}
