// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the shrinking wavefront.
//!
//! The [`SkeletonArena`] is the central owner of all data of one skeleton run.
//! Original edges, wavefront vertices, faces and face nodes live inside slot
//! maps with stable, generational keys, so the many cross references between
//! them (vertex → edge, vertex → face node, node → face, event → vertex) are
//! plain `Copy` keys instead of shared pointers.
//!
//! ## LAVs
//!
//! The wavefront is a set of circular lists of active vertices (LAVs). The
//! cyclic links live on the vertices themselves (`lav_previous`, `lav_next`),
//! so navigation, removal and insertion are O(1). A [`LavData`] record keeps
//! the head and length of each list; the head only decides where iteration
//! starts. A vertex belongs to at most one LAV at a time.

use std::collections::VecDeque;

use nalgebra::{Point2, Vector2};
use slotmap::SlotMap;

use crate::events::{EventQueue, QueueEvent};
use crate::geometry::{unit, LineLinear2d, Ray2d};
use crate::keys::*;

/// An original footprint edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub begin: Point2<f64>,
    pub end: Point2<f64>,
    pub previous: EdgeKey,
    pub next: EdgeKey,
    /// Bisector at `end`, shared with `next` as its previous bisector.
    pub bisector_next: Ray2d,
    /// Unit direction `begin → end`.
    pub direction: Vector2<f64>,
    pub line: LineLinear2d,
}

/// A wavefront vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point2<f64>,
    pub distance: f64,
    pub bisector: Ray2d,
    pub previous_edge: EdgeKey,
    pub next_edge: EdgeKey,
    pub left_node: Option<NodeKey>,
    pub right_node: Option<NodeKey>,
    pub processed: bool,
    /// LAV membership; the cyclic links below are stale while this is `None`.
    pub lav: Option<LavKey>,
    pub lav_previous: VertexKey,
    pub lav_next: VertexKey,
}

/// Head and length of one LAV.
#[derive(Debug, Clone, Default)]
pub struct LavData {
    pub head: Option<VertexKey>,
    pub len: usize,
}

/// Ordered node queue of one output face.
///
/// Nodes are only ever pushed or popped at the two ends.
#[derive(Debug, Clone, Default)]
pub struct FaceData {
    pub nodes: VecDeque<NodeKey>,
    /// Original edge the face belongs to; `None` for auxiliary faces opened by
    /// opposite-edge splits.
    pub edge: Option<EdgeKey>,
    pub closed: bool,
}

/// A point queued on a face.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub point: Point2<f64>,
    pub distance: f64,
    pub face: Option<FaceKey>,
}

/// The central arena owning all entities of one skeleton computation.
#[derive(Debug)]
pub struct SkeletonArena {
    // Entity storage
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) nodes: SlotMap<NodeKey, NodeData>,

    // Original edges in input order
    pub(crate) edge_order: Vec<EdgeKey>,
    // Output faces, one per original edge, in input order
    pub(crate) face_order: Vec<FaceKey>,

    pub(crate) lavs: SlotMap<LavKey, LavData>,
    // Live LAVs in creation order
    pub(crate) lav_order: Vec<LavKey>,
    pub(crate) queue: EventQueue,
}

impl SkeletonArena {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self {
            edges: SlotMap::with_key(),
            vertices: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            nodes: SlotMap::with_key(),
            edge_order: Vec::new(),
            face_order: Vec::new(),
            lavs: SlotMap::with_key(),
            lav_order: Vec::new(),
            queue: EventQueue::new(),
        }
    }

    // --- Edge operations ---

    /// Creates an unlinked edge and appends it to the original edge order.
    ///
    /// Neighbour links and the bisector are filled in by the SLAV setup.
    pub fn add_edge(&mut self, begin: Point2<f64>, end: Point2<f64>) -> EdgeKey {
        let key = self.edges.insert(EdgeData {
            begin,
            end,
            previous: EdgeKey::default(),
            next: EdgeKey::default(),
            bisector_next: Ray2d::new(end, Vector2::zeros()),
            direction: unit(&(end - begin)),
            line: LineLinear2d::new(&begin, &end),
        });
        self.edge_order.push(key);
        key
    }

    pub fn edge(&self, key: EdgeKey) -> &EdgeData {
        &self.edges[key]
    }

    /// Original edges in input order.
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edge_order
    }

    /// Bisector at `begin` of an edge, owned by the previous edge.
    pub fn bisector_previous(&self, key: EdgeKey) -> Ray2d {
        self.edges[self.edges[key].previous].bisector_next
    }

    // --- Vertex operations ---

    /// Creates a vertex that is not yet part of any LAV.
    pub fn add_vertex(
        &mut self,
        point: Point2<f64>,
        distance: f64,
        bisector: Ray2d,
        previous_edge: EdgeKey,
        next_edge: EdgeKey,
    ) -> VertexKey {
        self.vertices.insert(VertexData {
            point,
            distance,
            bisector,
            previous_edge,
            next_edge,
            left_node: None,
            right_node: None,
            processed: false,
            lav: None,
            lav_previous: VertexKey::default(),
            lav_next: VertexKey::default(),
        })
    }

    pub fn vertex(&self, key: VertexKey) -> &VertexData {
        &self.vertices[key]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// An event is obsolete once any of its parent vertices was processed.
    pub fn is_obsolete(&self, event: &QueueEvent) -> bool {
        event
            .parents()
            .iter()
            .any(|&v| self.vertices[v].processed)
    }

    // --- LAV navigation ---

    /// Creates a LAV linking `vertices` cyclically, in order, with the first
    /// one as head.
    ///
    /// # Panics
    ///
    /// If one of the vertices already belongs to a LAV.
    pub fn add_lav(&mut self, vertices: &[VertexKey]) -> LavKey {
        let lav = self.lavs.insert(LavData {
            head: vertices.first().copied(),
            len: vertices.len(),
        });

        let n = vertices.len();
        for (i, &v) in vertices.iter().enumerate() {
            let vertex = &mut self.vertices[v];
            if vertex.lav.is_some() {
                panic!("vertex {v:?} is already a member of a LAV");
            }
            vertex.lav = Some(lav);
            vertex.lav_previous = vertices[(i + n - 1) % n];
            vertex.lav_next = vertices[(i + 1) % n];
        }

        self.lav_order.push(lav);
        lav
    }

    fn member(&self, v: VertexKey) -> (LavKey, &VertexData) {
        let vertex = &self.vertices[v];
        match vertex.lav {
            Some(lav) => (lav, vertex),
            None => panic!("vertex {v:?} is not a member of any LAV"),
        }
    }

    /// LAV containing `v`.
    ///
    /// # Panics
    ///
    /// If `v` is not in any LAV.
    pub fn lav_of(&self, v: VertexKey) -> LavKey {
        self.member(v).0
    }

    /// Position of the LAV containing `v` among the live LAVs.
    ///
    /// # Panics
    ///
    /// If `v` is not in any LAV.
    pub fn lav_index(&self, v: VertexKey) -> usize {
        let lav = self.lav_of(v);
        match self.lav_order.iter().position(|&l| l == lav) {
            Some(index) => index,
            None => panic!("LAV {lav:?} of vertex {v:?} was already dropped"),
        }
    }

    /// Number of vertices in the LAV containing `v`.
    pub fn lav_len(&self, v: VertexKey) -> usize {
        self.lavs[self.lav_of(v)].len
    }

    pub fn contains_in_lav(&self, v: VertexKey) -> bool {
        self.vertices[v].lav.is_some()
    }

    /// Cyclic predecessor of `v` in its LAV.
    pub fn previous(&self, v: VertexKey) -> VertexKey {
        self.member(v).1.lav_previous
    }

    /// Cyclic successor of `v` in its LAV.
    pub fn next(&self, v: VertexKey) -> VertexKey {
        self.member(v).1.lav_next
    }

    /// Remove `v` from its LAV; a vertex in no LAV is left alone. Removing
    /// the head hands it on to the successor.
    pub fn remove_from_lav(&mut self, v: VertexKey) {
        let Some(lav) = self.vertices[v].lav else {
            return;
        };
        let (previous, next) = {
            let vertex = &self.vertices[v];
            (vertex.lav_previous, vertex.lav_next)
        };

        self.vertices[previous].lav_next = next;
        self.vertices[next].lav_previous = previous;
        self.vertices[v].lav = None;

        let data = &mut self.lavs[lav];
        data.len -= 1;
        if data.head == Some(v) {
            data.head = (data.len > 0).then_some(next);
        }
    }

    /// Mark `v` processed and take it off the wavefront.
    pub fn retire(&mut self, v: VertexKey) {
        self.vertices[v].processed = true;
        self.remove_from_lav(v);
    }

    fn link_before(&mut self, base: VertexKey, v: VertexKey) -> LavKey {
        let (lav, previous) = {
            let (lav, vertex) = self.member(base);
            (lav, vertex.lav_previous)
        };
        if self.vertices[v].lav.is_some() {
            panic!("vertex {v:?} is already a member of a LAV");
        }

        self.vertices[previous].lav_next = v;
        self.vertices[base].lav_previous = v;
        let vertex = &mut self.vertices[v];
        vertex.lav = Some(lav);
        vertex.lav_previous = previous;
        vertex.lav_next = base;

        self.lavs[lav].len += 1;
        lav
    }

    /// Insert `v` directly before `base` in the LAV of `base`. Inserting in
    /// front of the head makes `v` the new head.
    pub fn insert_before(&mut self, base: VertexKey, v: VertexKey) {
        let lav = self.link_before(base, v);
        let data = &mut self.lavs[lav];
        if data.head == Some(base) {
            data.head = Some(v);
        }
    }

    /// Insert `v` directly before `base` without moving the head; in front of
    /// the head this appends `v` as the last vertex.
    pub fn push_before(&mut self, base: VertexKey, v: VertexKey) {
        self.link_before(base, v);
    }

    /// Insert `v` directly after `base` in the LAV of `base`.
    pub fn insert_after(&mut self, base: VertexKey, v: VertexKey) {
        let next = self.next(base);
        self.link_before(next, v);
    }

    /// Vertices of `lav` from its head onwards.
    pub fn lav_vertices(&self, lav: LavKey) -> Vec<VertexKey> {
        let data = &self.lavs[lav];
        let mut vertices = Vec::with_capacity(data.len);
        if let Some(head) = data.head {
            let mut current = head;
            for _ in 0..data.len {
                vertices.push(current);
                current = self.vertices[current].lav_next;
            }
        }
        vertices
    }

    /// Live LAV keys in creation order.
    pub fn lav_keys(&self) -> &[LavKey] {
        &self.lav_order
    }

    /// Snapshot of every live LAV, each from its head.
    pub fn lavs(&self) -> Vec<Vec<VertexKey>> {
        self.lav_order
            .iter()
            .map(|&lav| self.lav_vertices(lav))
            .collect()
    }

    pub fn remove_empty_lavs(&mut self) {
        let lavs = &mut self.lavs;
        self.lav_order.retain(|&lav| {
            if lavs[lav].len > 0 {
                return true;
            }
            lavs.remove(lav);
            false
        });
    }
}

impl Default for SkeletonArena {
    fn default() -> Self {
        Self::new()
    }
}
