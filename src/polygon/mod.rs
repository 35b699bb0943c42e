pub mod edge;
pub mod face;
pub mod inclusion;
pub mod index;

pub use edge::{EdgeData, EdgeId, Inclusion, Overlap};
pub use face::{FaceData, FaceId};
pub use index::EdgeIndex;

use slotmap::SlotMap;

use crate::error::{OperationError, Result, TopologyError};
use crate::geometry::{Box2, Segment, Shape};
use crate::math::{points_equal, Point2};

slotmap::new_key_type! {
    /// Unique identifier for a polygon in the store.
    pub struct PolygonId;
}

/// A polygon: a set of faces plus a spatial index over its edges.
#[derive(Debug, Clone, Default)]
pub struct PolygonData {
    /// Faces belonging to this polygon.
    pub faces: Vec<FaceId>,
    /// Spatial index over this polygon's edges.
    pub index: EdgeIndex,
}

/// Central arena that owns all polygon entities.
///
/// Edges, faces and polygons reference each other via typed ids
/// (generational indices), avoiding self-referential structures and
/// making link rewiring during boolean operations an O(1) id swap.
#[derive(Debug, Default)]
pub struct PolygonStore {
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    polygons: SlotMap<PolygonId, PolygonData>,
}

impl PolygonStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Returns a reference to the polygon data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn polygon(&self, id: PolygonId) -> Result<&PolygonData, TopologyError> {
        self.polygons
            .get(id)
            .ok_or(TopologyError::EntityNotFound("polygon"))
    }

    /// Returns a mutable reference to the polygon data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn polygon_mut(&mut self, id: PolygonId) -> Result<&mut PolygonData, TopologyError> {
        self.polygons
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("polygon"))
    }

    /// Whether a face id is still live in the store.
    #[must_use]
    pub fn face_exists(&self, id: FaceId) -> bool {
        self.faces.contains_key(id)
    }

    // --- Construction ---

    /// Creates an empty polygon and returns its id.
    pub fn add_polygon(&mut self) -> PolygonId {
        self.polygons.insert(PolygonData::default())
    }

    /// Adds a face to a polygon from a closed chain of shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if consecutive shapes do not connect or the chain
    /// does not close back on itself.
    pub fn add_face_from_shapes(&mut self, poly: PolygonId, shapes: Vec<Shape>) -> Result<FaceId> {
        if shapes.is_empty() {
            return Err(OperationError::InvalidInput("face with no edges".into()).into());
        }
        let n = shapes.len();
        for i in 0..n {
            let end = shapes[i].end();
            let start = shapes[(i + 1) % n].start();
            if !points_equal(&end, &start) {
                return Err(TopologyError::RingNotClosed.into());
            }
        }

        let ids: Vec<EdgeId> = shapes
            .into_iter()
            .map(|s| self.edges.insert(EdgeData::new(s)))
            .collect();
        for i in 0..n {
            let prev = ids[(i + n - 1) % n];
            let next = ids[(i + 1) % n];
            let e = &mut self.edges[ids[i]];
            e.prev = prev;
            e.next = next;
        }

        let face = self.faces.insert(FaceData {
            first: ids[0],
            last: ids[n - 1],
        });

        let mut acc = 0.0;
        for &id in &ids {
            let bbox = self.edges[id].shape.bounding_box();
            let e = &mut self.edges[id];
            e.face = Some(face);
            e.arc_length = acc;
            acc += e.shape.length();
            self.polygon_mut(poly)?.index.add(id, bbox);
        }

        self.polygon_mut(poly)?.faces.push(face);
        Ok(face)
    }

    /// Adds a segment-only face from a vertex list.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three vertices are given or any
    /// consecutive pair coincides.
    pub fn add_face_from_points(&mut self, poly: PolygonId, pts: &[(f64, f64)]) -> Result<FaceId> {
        if pts.len() < 3 {
            return Err(OperationError::InvalidInput(format!(
                "face needs at least 3 vertices, got {}",
                pts.len()
            ))
            .into());
        }
        let n = pts.len();
        let mut shapes = Vec::with_capacity(n);
        for i in 0..n {
            let (x0, y0) = pts[i];
            let (x1, y1) = pts[(i + 1) % n];
            shapes.push(Shape::Segment(Segment::new(
                Point2::new(x0, y0),
                Point2::new(x1, y1),
            )?));
        }
        self.add_face_from_shapes(poly, shapes)
    }

    // --- Traversal ---

    /// Edges of a face ring, in order, starting from `first`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring does not close within the number of
    /// live edges (a broken `next` chain).
    pub fn ring_edges(&self, face: FaceId) -> Result<Vec<EdgeId>> {
        let first = self.face(face)?.first;
        let mut ring = Vec::new();
        let mut cur = first;
        loop {
            ring.push(cur);
            cur = self.edge(cur)?.next;
            if cur == first {
                break;
            }
            if ring.len() > self.edges.len() {
                return Err(TopologyError::InvalidTopology(
                    "face ring does not close".into(),
                )
                .into());
            }
        }
        Ok(ring)
    }

    /// Ring start points of a face, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring is broken.
    pub fn face_points(&self, face: FaceId) -> Result<Vec<Point2>> {
        let ring = self.ring_edges(face)?;
        let mut pts = Vec::with_capacity(ring.len());
        for id in ring {
            pts.push(self.edge(id)?.shape.start());
        }
        Ok(pts)
    }

    /// All edge shapes of a polygon, face by face.
    ///
    /// # Errors
    ///
    /// Returns an error if any ring is broken.
    pub fn polygon_shapes(&self, poly: PolygonId) -> Result<Vec<Shape>> {
        let mut shapes = Vec::new();
        for &face in &self.polygon(poly)?.faces {
            for id in self.ring_edges(face)? {
                shapes.push(self.edge(id)?.shape.clone());
            }
        }
        Ok(shapes)
    }

    // --- Whole-polygon operations ---

    /// Deep-clones a polygon: fresh edges and faces, classification reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the source polygon is malformed.
    pub fn clone_polygon(&mut self, poly: PolygonId) -> Result<PolygonId> {
        let clone = self.add_polygon();
        let faces = self.polygon(poly)?.faces.clone();
        for face in faces {
            let ring = self.ring_edges(face)?;
            let shapes: Vec<Shape> = ring
                .iter()
                .map(|&id| self.edge(id).map(|e| e.shape.clone()))
                .collect::<Result<_, _>>()?;
            self.add_face_from_shapes(clone, shapes)?;
        }
        Ok(clone)
    }

    /// Flips the orientation of every face of a polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is malformed.
    pub fn reverse_polygon(&mut self, poly: PolygonId) -> Result<()> {
        let faces = self.polygon(poly)?.faces.clone();
        for face in faces {
            let ring = self.ring_edges(face)?;
            for &id in &ring {
                let e = self.edge_mut(id)?;
                e.shape = e.shape.reverse();
                std::mem::swap(&mut e.prev, &mut e.next);
            }
            let first = self.face(face)?.first;
            let last = self.edge(first)?.prev;
            self.face_mut(face)?.last = last;
        }
        self.set_arc_lengths(poly)
    }

    /// Recomputes cumulative arc lengths from each face origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is malformed.
    pub fn set_arc_lengths(&mut self, poly: PolygonId) -> Result<()> {
        let faces = self.polygon(poly)?.faces.clone();
        for face in faces {
            let ring = self.ring_edges(face)?;
            let mut acc = 0.0;
            for id in ring {
                let e = self.edge_mut(id)?;
                e.arc_length = acc;
                acc += e.shape.length();
            }
        }
        Ok(())
    }

    // --- Mutation during boolean operations ---

    /// Inserts a new vertex at `pt` by splitting `edge`.
    ///
    /// The returned edge carries the head piece (ending at `pt`) and is
    /// spliced in before `edge`, which keeps the tail piece. Arc lengths
    /// and the spatial index stay consistent.
    ///
    /// # Errors
    ///
    /// Returns an error if `pt` is not interior to the edge's shape.
    pub fn add_vertex(&mut self, poly: PolygonId, pt: &Point2, edge: EdgeId) -> Result<EdgeId> {
        let shape = self.edge(edge)?.shape.clone();
        let Some((Some(head), Some(tail))) = shape.split(pt) else {
            return Err(OperationError::Failed(format!(
                "split point ({}, {}) is not interior to the edge",
                pt.x, pt.y
            ))
            .into());
        };
        let head_len = head.length();

        let (prev, face, base_arc) = {
            let e = self.edge(edge)?;
            (e.prev, e.face, e.arc_length)
        };

        let mut new_edge = EdgeData::new(head);
        new_edge.prev = prev;
        new_edge.next = edge;
        new_edge.face = face;
        new_edge.arc_length = base_arc;
        let new_id = self.edges.insert(new_edge);

        self.edge_mut(prev)?.next = new_id;
        {
            let e = self.edge_mut(edge)?;
            e.prev = new_id;
            e.shape = tail;
            e.arc_length = base_arc + head_len;
        }

        if let Some(face) = face {
            if self.face(face)?.first == edge {
                self.face_mut(face)?.first = new_id;
            }
        }

        let head_box = self.edge(new_id)?.shape.bounding_box();
        let tail_box = self.edge(edge)?.shape.bounding_box();
        let index = &mut self.polygon_mut(poly)?.index;
        index.add(new_id, head_box);
        index.update(edge, tail_box);

        Ok(new_id)
    }

    /// Removes the chain of edges `from..=to` from a face, relinking the
    /// ring across the gap. Removing the entire ring deletes the face.
    ///
    /// # Errors
    ///
    /// Returns an error if `to` is not reachable from `from` along the ring.
    pub fn remove_chain(
        &mut self,
        poly: PolygonId,
        face: FaceId,
        from: EdgeId,
        to: EdgeId,
    ) -> Result<()> {
        let mut chain = Vec::new();
        let mut cur = from;
        loop {
            chain.push(cur);
            if cur == to {
                break;
            }
            cur = self.edge(cur)?.next;
            if chain.len() > self.edges.len() {
                return Err(TopologyError::InvalidTopology(
                    "chain end not reachable from chain start".into(),
                )
                .into());
            }
        }

        let from_prev = self.edge(from)?.prev;
        let to_next = self.edge(to)?.next;

        if to_next == from {
            // The chain is the whole ring: the face becomes empty.
            for id in chain {
                self.polygon_mut(poly)?.index.remove(id);
                self.edges.remove(id);
            }
            self.polygon_mut(poly)?.faces.retain(|&f| f != face);
            self.faces.remove(face);
            return Ok(());
        }

        self.edge_mut(from_prev)?.next = to_next;
        self.edge_mut(to_next)?.prev = from_prev;

        {
            let f = self.face_mut(face)?;
            if chain.contains(&f.first) || chain.contains(&f.last) {
                f.first = to_next;
                f.last = from_prev;
            }
        }

        for id in chain {
            self.polygon_mut(poly)?.index.remove(id);
            self.edges.remove(id);
        }
        Ok(())
    }

    /// Deletes a face and all its edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the face ring is broken.
    pub fn delete_face(&mut self, poly: PolygonId, face: FaceId) -> Result<()> {
        let ring = self.ring_edges(face)?;
        for id in ring {
            self.polygon_mut(poly)?.index.remove(id);
            self.edges.remove(id);
        }
        self.polygon_mut(poly)?.faces.retain(|&f| f != face);
        self.faces.remove(face);
        Ok(())
    }

    /// Creates a face from an already-linked ring running `first..=last`.
    ///
    /// Walks the ring, assigns the new face to every edge on it, and
    /// verifies that `last` links back to `first`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring does not close.
    pub fn add_face_from_ring(
        &mut self,
        poly: PolygonId,
        first: EdgeId,
        last: EdgeId,
    ) -> Result<FaceId> {
        let mut ring = Vec::new();
        let mut cur = first;
        loop {
            ring.push(cur);
            if cur == last {
                break;
            }
            cur = self.edge(cur)?.next;
            if ring.len() > self.edges.len() {
                return Err(TopologyError::RingNotClosed.into());
            }
        }
        if self.edge(last)?.next != first {
            return Err(TopologyError::RingNotClosed.into());
        }

        let face = self.faces.insert(FaceData { first, last });
        for id in ring {
            self.edge_mut(id)?.face = Some(face);
        }
        self.polygon_mut(poly)?.faces.push(face);
        Ok(face)
    }

    /// Removes a face entity without touching its edges.
    ///
    /// Used when dissolving crossed faces before restitched rings are
    /// rebuilt over the same edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is missing.
    pub fn dissolve_face(&mut self, poly: PolygonId, face: FaceId) -> Result<()> {
        self.polygon_mut(poly)?.faces.retain(|&f| f != face);
        self.faces.remove(face);
        Ok(())
    }

    /// Moves a face from one polygon's face set to another's.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is missing.
    pub fn move_face(&mut self, from: PolygonId, to: PolygonId, face: FaceId) -> Result<()> {
        self.polygon_mut(from)?.faces.retain(|&f| f != face);
        self.polygon_mut(to)?.faces.push(face);
        Ok(())
    }

    /// Registers an edge in a polygon's spatial index.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or polygon is missing.
    pub fn index_edge(&mut self, poly: PolygonId, edge: EdgeId) -> Result<()> {
        let bbox = self.edge(edge)?.shape.bounding_box();
        self.polygon_mut(poly)?.index.update(edge, bbox);
        Ok(())
    }

    /// Edges of a polygon whose boxes overlap the query box.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is missing.
    pub fn search(&self, poly: PolygonId, query: &Box2) -> Result<Vec<EdgeId>> {
        Ok(self.polygon(poly)?.index.search(query))
    }

    /// Drops a polygon entity, leaving its faces and edges in the arena.
    pub fn remove_polygon(&mut self, poly: PolygonId) {
        self.polygons.remove(poly);
    }

    /// Deletes a polygon together with all its faces and edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is malformed.
    pub fn remove_polygon_deep(&mut self, poly: PolygonId) -> Result<()> {
        let faces = self.polygon(poly)?.faces.clone();
        for face in faces {
            if self.face_exists(face) {
                self.delete_face(poly, face)?;
            }
        }
        self.polygons.remove(poly);
        Ok(())
    }
}
