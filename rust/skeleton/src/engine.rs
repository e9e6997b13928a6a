// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Skeleton engine: SLAV setup, the level loop and the level handlers.
//!
//! Each iteration of the loop resolves one *level*: every live event within
//! `EPSILON` of the lowest queued distance. Events of a level are grouped by
//! shared parents and result points, then resolved as pick, multi-edge or
//! multi-split events. After a level, two-vertex LAVs are closed off, stale
//! events at or below the level height are dropped and empty LAVs removed.

use nalgebra::Point2;
use rustc_hash::FxHashSet;

use crate::arena::SkeletonArena;
use crate::chains::{group_level_events, Chain, EdgeChain, LevelEvent, SingleEdgeChain};
use crate::error::Result;
use crate::geometry::{calc_bisector, calc_vector_bisector, unit, Ray2d};
use crate::keys::{EdgeKey, NodeKey, VertexKey};
use crate::polygon::{is_clockwise, validate_ring};
use crate::MAX_LEVELS;

/// A point of an output face together with its offset distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceVertex {
    pub point: Point2<f64>,
    /// Distance of the point from the footprint edge, i.e. its height at a
    /// 45 degree slope.
    pub distance: f64,
}

/// The roof face of one footprint edge.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonFace {
    /// Footprint edge `(begin, end)`, in counter-clockwise order.
    pub edge: (Point2<f64>, Point2<f64>),
    pub vertices: Vec<FaceVertex>,
}

/// Straight skeleton of a simple polygon, as one face per footprint edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    /// Faces in counter-clockwise edge order; faces that ended up empty are
    /// omitted.
    pub faces: Vec<SkeletonFace>,
    /// Number of levels the event loop went through.
    pub levels: usize,
}

impl Skeleton {
    /// Compute the straight skeleton of an open ring of points.
    ///
    /// Clockwise rings are processed in reversed order.
    ///
    /// # Errors
    ///
    /// Returns an error for rings with fewer than three points or an explicit
    /// closing point.
    ///
    /// # Panics
    ///
    /// On broken internal invariants, including running past
    /// [`MAX_LEVELS`] levels.
    pub fn build(points: &[Point2<f64>]) -> Result<Skeleton> {
        validate_ring(points)?;

        let mut ring = points.to_vec();
        let reversed = is_clockwise(&ring);
        if reversed {
            ring.reverse();
        }

        let mut arena = SkeletonArena::new();
        arena.init_slav(&ring);
        arena.init_events();
        let levels = arena.run();

        let skeleton = arena.into_skeleton(levels);
        tracing::debug!(
            points = ring.len(),
            reversed,
            levels,
            faces = skeleton.faces.len(),
            "Built straight skeleton"
        );
        Ok(skeleton)
    }
}

impl SkeletonArena {
    /// Build edges, the initial LAV and one face per edge from a
    /// counter-clockwise ring.
    pub(crate) fn init_slav(&mut self, points: &[Point2<f64>]) {
        let n = points.len();

        let edges: Vec<EdgeKey> = (0..n)
            .map(|i| self.add_edge(points[i], points[(i + 1) % n]))
            .collect();

        for i in 0..n {
            let edge = &mut self.edges[edges[i]];
            edge.previous = edges[(i + n - 1) % n];
            edge.next = edges[(i + 1) % n];
        }

        for i in 0..n {
            let next = edges[(i + 1) % n];
            let next_dir = self.edges[next].direction;
            let edge = &mut self.edges[edges[i]];
            edge.bisector_next = calc_bisector(edge.end, &edge.direction, &next_dir);
        }

        let lav: Vec<VertexKey> = edges
            .iter()
            .map(|&e| {
                let (end, bisector, next) = {
                    let edge = &self.edges[e];
                    (edge.end, edge.bisector_next, edge.next)
                };
                self.add_vertex(end, 0.0, bisector, e, next)
            })
            .collect();
        self.add_lav(&lav);

        for i in 0..n {
            let v = lav[i];
            let next = lav[(i + 1) % n];

            let edge = self.vertices[v].next_edge;
            let face = self.add_face(Some(edge));

            let right = self.add_node(self.vertices[v].point, self.vertices[v].distance);
            self.faces[face].nodes.push_back(right);
            self.nodes[right].face = Some(face);
            self.vertices[v].right_node = Some(right);

            let left = self.add_node(self.vertices[next].point, self.vertices[next].distance);
            self.add_push(right, left);
            self.vertices[next].left_node = Some(left);

            self.face_order.push(face);
        }
    }

    /// Resolve levels until the queue runs dry. Returns the level count.
    pub(crate) fn run(&mut self) -> usize {
        let mut levels = 0;

        while let Some(level_height) = self.queue.peek_distance() {
            levels += 1;
            if levels > MAX_LEVELS {
                panic!("maximum number of skeleton levels ({MAX_LEVELS}) exceeded");
            }

            let level_events = group_level_events(self.load_level_events());
            tracing::trace!(
                level = levels,
                height = level_height,
                events = level_events.len(),
                queued = self.queue.len(),
                "Resolving level"
            );

            for event in level_events {
                match event {
                    LevelEvent::Pick {
                        point,
                        distance,
                        chain,
                    } => self.pick_event(point, distance, &chain),
                    LevelEvent::MultiEdge {
                        point,
                        distance,
                        chain,
                    } => self.multi_edge_event(point, distance, &chain),
                    LevelEvent::MultiSplit {
                        point,
                        distance,
                        chains,
                    } => self.multi_split_event(point, distance, chains),
                }
            }

            self.process_two_node_lavs();
            self.queue.remove_under_height(level_height);
            self.remove_empty_lavs();
        }

        levels
    }

    fn into_skeleton(self, levels: usize) -> Skeleton {
        let faces = self
            .face_order
            .iter()
            .filter_map(|&f| {
                let face = &self.faces[f];
                if face.nodes.is_empty() {
                    return None;
                }
                let edge = &self.edges[face.edge?];
                Some(SkeletonFace {
                    edge: (edge.begin, edge.end),
                    vertices: face
                        .nodes
                        .iter()
                        .map(|&n| FaceVertex {
                            point: self.nodes[n].point,
                            distance: self.nodes[n].distance,
                        })
                        .collect(),
                })
            })
            .collect();

        Skeleton { faces, levels }
    }

    // --- Pick / multi edge ---

    fn add_multi_back_faces(&mut self, chain: &EdgeChain, point: Point2<f64>, distance: f64) {
        for event in &chain.events {
            self.retire(event.previous_vertex);
            self.retire(event.next_vertex);
            self.add_face_back(point, distance, event.previous_vertex, event.next_vertex);
        }
    }

    /// A closed chain collapses its whole LAV into `point`.
    fn pick_event(&mut self, point: Point2<f64>, distance: f64, chain: &EdgeChain) {
        self.add_multi_back_faces(chain, point, distance);
    }

    /// An open chain collapses into a single new vertex at `point`.
    fn multi_edge_event(&mut self, point: Point2<f64>, distance: f64, chain: &EdgeChain) {
        let previous = chain.previous_vertex();
        let next = chain.next_vertex();

        self.vertices[previous].processed = true;
        self.vertices[next].processed = true;

        let previous_edge = self.vertices[previous].previous_edge;
        let next_edge = self.vertices[next].next_edge;
        let bisector = calc_bisector(
            point,
            &self.edges[previous_edge].direction,
            &self.edges[next_edge].direction,
        );
        let edge_vertex = self.add_vertex(point, distance, bisector, previous_edge, next_edge);

        self.add_face_left(edge_vertex, previous);
        self.add_face_right(edge_vertex, next);

        // before `previous`; at the head of the LAV this appends
        self.push_before(previous, edge_vertex);

        self.add_multi_back_faces(chain, point, distance);

        self.compute_events(edge_vertex);
    }

    // --- Multi split ---

    /// Add a single-edge chain for every distinct opposite edge of the split
    /// chains. Split chains whose opposite edge left the wavefront are
    /// dropped.
    fn create_opposite_edge_chains(&self, chains: &mut Vec<Chain>, center: &Point2<f64>) {
        let mut seen: FxHashSet<EdgeKey> = FxHashSet::default();
        let mut opposite_chains = Vec::new();
        let mut removed = Vec::new();

        for (i, chain) in chains.iter().enumerate() {
            let Chain::Split(split) = chain else {
                continue;
            };
            let Some(edge) = split.opposite_edge else {
                continue;
            };
            if !seen.insert(edge) {
                continue;
            }

            match self.find_opposite_edge_lav(edge, center) {
                Some(next_vertex) => opposite_chains.push(Chain::SingleEdge(SingleEdgeChain {
                    opposite_edge: edge,
                    next_vertex,
                    previous_vertex: self.previous(next_vertex),
                })),
                None => removed.push(i),
            }
        }

        for &i in removed.iter().rev() {
            chains.remove(i);
        }
        chains.extend(opposite_chains);
    }

    /// Flip the bisector of a new split vertex when its two edges are nearly
    /// antiparallel and the computed direction disagrees with the position
    /// of the neighbouring vertices.
    fn correct_bisector_direction(
        &self,
        bisector: &mut Ray2d,
        begin_next_vertex: VertexKey,
        end_previous_vertex: VertexKey,
        begin_edge: EdgeKey,
        end_edge: EdgeKey,
    ) {
        let begin_next = &self.vertices[begin_next_vertex];
        let end_previous = &self.vertices[end_previous_vertex];

        if begin_next.previous_edge != begin_edge || end_previous.next_edge != end_edge {
            panic!(
                "split vertex neighbours do not border the chain edges \
                 ({begin_edge:?}, {end_edge:?})"
            );
        }

        let begin_dir = self.edges[begin_edge].direction;
        let end_dir = self.edges[end_edge].direction;
        if begin_dir.dot(&end_dir) < -0.97 {
            let n1 = unit(&(bisector.point - end_previous.point));
            let n2 = unit(&(begin_next.point - bisector.point));
            let prediction = calc_vector_bisector(&n1, &n2);

            if bisector.vector.dot(&prediction) < 0.0 {
                bisector.vector = -bisector.vector;
            }
        }
    }

    /// Wire the faces of a new split vertex. Faces of opposite edges are
    /// shared between consecutive vertices: the first one opens an auxiliary
    /// face node, the next one takes it over.
    fn add_split_faces(
        &mut self,
        mut last_node: Option<NodeKey>,
        begin: &Chain,
        end: &Chain,
        new_vertex: VertexKey,
    ) -> Option<NodeKey> {
        let (point, distance) = {
            let v = &self.vertices[new_vertex];
            (v.point, v.distance)
        };

        match begin {
            Chain::SingleEdge(_) => {
                let node = match last_node.take() {
                    Some(node) => node,
                    None => {
                        let node = self.create_opposite_edge_node(point, distance);
                        last_node = Some(node);
                        node
                    }
                };
                self.vertices[new_vertex].right_node = Some(node);
            }
            Chain::Split(split) => self.add_face_right(new_vertex, split.parent),
            Chain::Edge(_) => panic!("edge chain can't open the right face of a split vertex"),
        }

        match end {
            Chain::SingleEdge(_) => {
                let node = match last_node.take() {
                    Some(node) => node,
                    None => {
                        let node = self.create_opposite_edge_node(point, distance);
                        last_node = Some(node);
                        node
                    }
                };
                self.vertices[new_vertex].left_node = Some(node);
            }
            Chain::Split(split) => self.add_face_left(new_vertex, split.parent),
            Chain::Edge(_) => panic!("edge chain can't open the left face of a split vertex"),
        }

        last_node
    }

    /// Split chains meeting in `point`: one new vertex between every pair of
    /// angularly consecutive chains, cutting or merging LAVs as needed.
    fn multi_split_event(&mut self, point: Point2<f64>, distance: f64, mut chains: Vec<Chain>) {
        self.create_opposite_edge_chains(&mut chains, &point);

        chains.sort_by(|a, b| {
            let pa = self.edges[a.previous_edge(self)].begin;
            let pb = self.edges[b.previous_edge(self)].begin;
            let angle_a = (pa.y - point.y).atan2(pa.x - point.x);
            let angle_b = (pb.y - point.y).atan2(pb.x - point.x);
            angle_a.total_cmp(&angle_b)
        });

        let mut last_node = None;
        let n = chains.len();
        for i in 0..n {
            let begin = &chains[i];
            let end = &chains[(i + 1) % n];

            let next_edge = begin.next_edge(self);
            let previous_edge = end.previous_edge(self);

            let mut bisector = calc_bisector(
                point,
                &self.edges[previous_edge].direction,
                &self.edges[next_edge].direction,
            );

            let begin_next_vertex = begin.next_vertex(self);
            let end_previous_vertex = end.previous_vertex(self);

            self.correct_bisector_direction(
                &mut bisector,
                begin_next_vertex,
                end_previous_vertex,
                next_edge,
                previous_edge,
            );

            let new_vertex = self.add_vertex(point, distance, bisector, previous_edge, next_edge);

            if self.lav_of(begin_next_vertex) == self.lav_of(end_previous_vertex) {
                let part = self.cut_lav_part(begin_next_vertex, end_previous_vertex);
                let mut lav = Vec::with_capacity(part.len() + 1);
                lav.push(new_vertex);
                lav.extend(part);
                self.add_lav(&lav);
            } else {
                self.merge_before_base_vertex(begin_next_vertex, end_previous_vertex);
                self.insert_after(end_previous_vertex, new_vertex);
            }

            self.compute_events(new_vertex);

            last_node = self.add_split_faces(last_node, begin, end, new_vertex);
        }

        for chain in &chains {
            if let Some(v) = chain.current_vertex() {
                self.retire(v);
            }
        }
    }

    // --- End of level ---

    /// Close off every LAV that shrank to two vertices.
    fn process_two_node_lavs(&mut self) {
        for i in 0..self.lav_order.len() {
            let lav = &self.lavs[self.lav_order[i]];
            let first = match (lav.len, lav.head) {
                (2, Some(head)) => head,
                _ => continue,
            };
            let last = self.next(first);

            let (first_left, first_right) = self.face_nodes(first);
            let (last_left, last_right) = self.face_nodes(last);
            self.connect_faces(first_left, last_right);
            self.connect_faces(first_right, last_left);

            self.retire(first);
            self.retire(last);
        }
    }

    fn face_nodes(&self, v: VertexKey) -> (NodeKey, NodeKey) {
        let vertex = &self.vertices[v];
        match (vertex.left_node, vertex.right_node) {
            (Some(left), Some(right)) => (left, right),
            _ => panic!("wavefront vertex {v:?} is missing a face node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    fn ring(points: &[(f64, f64)]) -> Vec<Point2<f64>> {
        points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn init_slav_builds_one_face_per_edge() {
        let mut arena = SkeletonArena::new();
        arena.init_slav(&ring(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]));

        assert_eq!(arena.edges().len(), 4);
        assert_eq!(arena.lavs().len(), 1);
        assert_eq!(arena.lavs()[0].len(), 4);
        assert_eq!(arena.face_order.len(), 4);
        for &f in &arena.face_order {
            assert_eq!(arena.faces[f].nodes.len(), 2);
        }

        // first vertex is the end of the first edge, bisector points inside
        let v = arena.vertex(arena.lavs()[0][0]);
        assert_eq!(v.point, Point2::new(2.0, 0.0));
        assert!(v.bisector.vector.x < 0.0 && v.bisector.vector.y > 0.0);

        let e = arena.edges()[1];
        assert_eq!(arena.bisector_previous(e), arena.edge(arena.edges()[0]).bisector_next);
    }

    #[test]
    fn square_collapses_in_one_level() {
        let skeleton = Skeleton::build(&ring(&[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)])).unwrap();
        assert_eq!(skeleton.levels, 1);
        assert_eq!(skeleton.faces.len(), 4);
        for face in &skeleton.faces {
            assert_eq!(face.vertices.len(), 3);
            let apex = face
                .vertices
                .iter()
                .find(|v| v.distance > 0.5)
                .unwrap();
            assert_relative_eq!(apex.point.x, 0.0, epsilon = 1e-9);
            assert_relative_eq!(apex.point.y, 0.0, epsilon = 1e-9);
            assert_relative_eq!(apex.distance, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn clockwise_ring_is_reversed() {
        let ccw = Skeleton::build(&ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)])).unwrap();
        let cw = Skeleton::build(&ring(&[(0.0, 2.0), (4.0, 2.0), (4.0, 0.0), (0.0, 0.0)])).unwrap();
        assert_eq!(ccw.faces.len(), cw.faces.len());
        let total = |s: &Skeleton| s.faces.iter().map(|f| f.vertices.len()).sum::<usize>();
        assert_eq!(total(&ccw), total(&cw));

        // reversed input yields the same counter-clockwise edges
        for face in &cw.faces {
            assert!(ccw.faces.iter().any(|f| f.edge == face.edge), "edge {:?} is not counter-clockwise", face.edge);
        }
    }

    #[test]
    fn invalid_rings_are_rejected() {
        assert_eq!(
            Skeleton::build(&ring(&[(0.0, 0.0), (1.0, 0.0)])),
            Err(Error::TooFewPoints(2))
        );
        assert_eq!(
            Skeleton::build(&ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)])),
            Err(Error::RepeatedEndpoint)
        );
    }
}
