// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face node queues.
//!
//! Every original edge owns one output face. While the wavefront shrinks,
//! the two wavefront vertices bordering that edge's face push new nodes onto
//! the two ends of its queue. When both ends meet (`connect_faces`) the face
//! is closed. Opposite-edge splits open auxiliary faces with no edge of their
//! own; those are later drained into a bound face.

use nalgebra::Point2;

use crate::arena::{FaceData, NodeData, SkeletonArena};
use crate::keys::*;

impl SkeletonArena {
    // --- Face / node creation ---

    pub fn add_face(&mut self, edge: Option<EdgeKey>) -> FaceKey {
        self.faces.insert(FaceData {
            edge,
            ..FaceData::default()
        })
    }

    /// Creates a node that belongs to no face yet.
    pub fn add_node(&mut self, point: Point2<f64>, distance: f64) -> NodeKey {
        self.nodes.insert(NodeData {
            point,
            distance,
            face: None,
        })
    }

    /// Face the node is currently queued on.
    ///
    /// # Panics
    ///
    /// If the node was popped and never pushed again.
    pub fn face_of(&self, node: NodeKey) -> FaceKey {
        match self.nodes[node].face {
            Some(face) => face,
            None => panic!("face node {node:?} is not assigned to any face"),
        }
    }

    pub fn face(&self, key: FaceKey) -> &FaceData {
        &self.faces[key]
    }

    fn node_index(&self, face: FaceKey, node: NodeKey) -> usize {
        match self.faces[face].nodes.iter().position(|&n| n == node) {
            Some(idx) => idx,
            None => panic!("face node {node:?} is not queued on face {face:?}"),
        }
    }

    fn is_end(&self, face: FaceKey, node: NodeKey) -> bool {
        let idx = self.node_index(face, node);
        idx == 0 || idx + 1 == self.faces[face].nodes.len()
    }

    // --- Queue operations ---

    /// Push `new_node` onto the end of the queue that `node` sits on.
    ///
    /// # Panics
    ///
    /// If the face is closed or `node` is not at either end.
    pub fn add_push(&mut self, node: NodeKey, new_node: NodeKey) {
        let face = self.face_of(node);
        if self.faces[face].closed {
            panic!("can't add node to closed face {face:?}");
        }

        let idx = self.node_index(face, node);
        let len = self.faces[face].nodes.len();
        if idx + 1 == len {
            self.faces[face].nodes.push_back(new_node);
        } else if idx == 0 {
            self.faces[face].nodes.push_front(new_node);
        } else {
            panic!(
                "can't push new node: node {node:?} is inside the queue of face {face:?}, \
                 new nodes may only be added at the ends"
            );
        }

        self.nodes[new_node].face = Some(face);
    }

    /// Pop an end node off its face and return the node now at that end.
    ///
    /// Returns `None` when the face became empty.
    ///
    /// # Panics
    ///
    /// If `node` is not at either end of its face.
    pub fn pop_node(&mut self, node: NodeKey) -> Option<NodeKey> {
        let face = self.face_of(node);
        if !self.is_end(face, node) {
            panic!("can pop only from the end of the queue of face {face:?}");
        }

        let idx = self.node_index(face, node);
        let nodes = &mut self.faces[face].nodes;
        nodes.remove(idx);
        self.nodes[node].face = None;

        let nodes = &self.faces[face].nodes;
        if nodes.is_empty() {
            None
        } else if idx > 0 {
            nodes.back().copied()
        } else {
            nodes.front().copied()
        }
    }

    /// Move all nodes of `second`'s face onto the queue of `first`'s face,
    /// starting with `second` and walking outward.
    pub fn move_nodes(&mut self, first: NodeKey, second: NodeKey) {
        if self.face_of(first) == self.face_of(second) {
            return;
        }

        let mut queue = first;
        let mut current = Some(second);
        while let Some(node) = current {
            let next = self.pop_node(node);
            self.add_push(queue, node);
            queue = node;
            current = next;
        }
    }

    /// Join the faces of two nodes.
    ///
    /// Two ends of the same face close it. Nodes on different faces merge the
    /// unbound face into the bound one and mark the drained face closed.
    ///
    /// # Panics
    ///
    /// On a same-face join away from the ends or on an unbound face, and when
    /// both faces are bound to original edges.
    pub fn connect_faces(&mut self, first: NodeKey, second: NodeKey) {
        let first_face = self.face_of(first);
        let second_face = self.face_of(second);

        if first_face == second_face {
            if !self.is_end(first_face, first) || !self.is_end(second_face, second) {
                panic!("tried to connect the same face {first_face:?} not on end nodes");
            }
            if self.faces[first_face].edge.is_none() {
                panic!("can't close face {first_face:?}: it is not connected to an edge");
            }
            self.faces[first_face].closed = true;
            return;
        }

        let first_bound = self.faces[first_face].edge.is_some();
        let second_bound = self.faces[second_face].edge.is_some();
        if first_bound && second_bound {
            panic!(
                "can't connect faces {first_face:?} and {second_face:?}: \
                 both are connected to an edge"
            );
        }

        if first_bound {
            self.move_nodes(first, second);
            self.faces[second_face].closed = true;
        } else {
            self.move_nodes(second, first);
            self.faces[first_face].closed = true;
        }
    }

    // --- Building blocks for level handlers ---

    fn left_node_of(&self, v: VertexKey) -> NodeKey {
        match self.vertices[v].left_node {
            Some(n) => n,
            None => panic!("vertex {v:?} has no left face node"),
        }
    }

    fn right_node_of(&self, v: VertexKey) -> NodeKey {
        match self.vertices[v].right_node {
            Some(n) => n,
            None => panic!("vertex {v:?} has no right face node"),
        }
    }

    /// Extend the face to the left of `va` with a node for `new_vertex`.
    pub fn add_face_left(&mut self, new_vertex: VertexKey, va: VertexKey) {
        let anchor = self.left_node_of(va);
        let (point, distance) = {
            let v = &self.vertices[new_vertex];
            (v.point, v.distance)
        };
        let node = self.add_node(point, distance);
        self.add_push(anchor, node);
        self.vertices[new_vertex].left_node = Some(node);
    }

    /// Extend the face to the right of `vb` with a node for `new_vertex`.
    pub fn add_face_right(&mut self, new_vertex: VertexKey, vb: VertexKey) {
        let anchor = self.right_node_of(vb);
        let (point, distance) = {
            let v = &self.vertices[new_vertex];
            (v.point, v.distance)
        };
        let node = self.add_node(point, distance);
        self.add_push(anchor, node);
        self.vertices[new_vertex].right_node = Some(node);
    }

    /// Close the face between `va` and `vb` at a collapse point.
    pub fn add_face_back(&mut self, point: Point2<f64>, distance: f64, va: VertexKey, vb: VertexKey) {
        let anchor = self.right_node_of(va);
        let node = self.add_node(point, distance);
        self.add_push(anchor, node);
        let other = self.left_node_of(vb);
        self.connect_faces(node, other);
    }

    /// Open an auxiliary face holding a single node, used where a split
    /// vertex borders three faces.
    pub fn create_opposite_edge_node(&mut self, point: Point2<f64>, distance: f64) -> NodeKey {
        let face = self.add_face(None);
        let node = self.add_node(point, distance);
        self.faces[face].nodes.push_back(node);
        self.nodes[node].face = Some(face);
        node
    }
}
