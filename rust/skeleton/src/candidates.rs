// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event computation: edge events between neighbouring bisectors and split
//! events against opposite edges.

use nalgebra::{distance_squared, Point2};

use crate::arena::SkeletonArena;
use crate::events::{EdgeEvent, QueueEvent, SplitEvent, VertexSplitEvent};
use crate::geometry::{calc_distance, calc_vector_bisector, LineLinear2d, Ray2d};
use crate::keys::{EdgeKey, VertexKey};
use crate::EPSILON;

/// Whether the supporting line of an edge lies entirely behind a bisector.
pub fn edge_behind_bisector(bisector: &Ray2d, line: &LineLinear2d) -> bool {
    bisector.collide(line, EPSILON).is_none()
}

/// Candidate point where a reflex vertex's bisector hits an opposite edge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitCandidate {
    pub point: Point2<f64>,
    pub distance: f64,
    /// Hit edge, `None` when the candidate lands on one of its end vertices.
    pub opposite_edge: Option<EdgeKey>,
}

impl SkeletonArena {
    /// Edge adjacent to `v` that is less parallel to `edge`, or `None` when
    /// both adjacent edges are parallel to it.
    fn choose_less_parallel_vertex_edge(&self, v: VertexKey, edge: EdgeKey) -> Option<EdgeKey> {
        let vertex = &self.vertices[v];
        let dir = self.edges[edge].direction;

        let dot_a = dir.dot(&self.edges[vertex.previous_edge].direction).abs();
        let dot_b = dir.dot(&self.edges[vertex.next_edge].direction).abs();

        if dot_a + dot_b >= 2.0 - EPSILON {
            return None;
        }

        if dot_a > dot_b {
            Some(vertex.next_edge)
        } else {
            Some(vertex.previous_edge)
        }
    }

    pub(crate) fn calc_candidate_point_for_split(
        &self,
        v: VertexKey,
        edge: EdgeKey,
    ) -> Option<SplitCandidate> {
        let vertex_edge = self.choose_less_parallel_vertex_edge(v, edge)?;

        let ve = &self.edges[vertex_edge];
        let e = &self.edges[edge];
        let edges_bisector = calc_vector_bisector(&ve.direction, &e.direction);

        // parallel edges have no meeting point to anchor the angle bisector
        let edges_collide = ve.line.collide(&e.line)?;
        let bisector_line = Ray2d::new(edges_collide, edges_bisector).linear_form();

        let candidate = self.vertices[v].bisector.collide(&bisector_line, EPSILON)?;

        let bisector_previous = self.bisector_previous(edge);
        let bisector_next = e.bisector_next;

        if !(bisector_previous.is_on_right_side(&candidate, EPSILON)
            && bisector_next.is_on_left_side(&candidate, EPSILON))
        {
            return None;
        }

        let distance = calc_distance(&candidate, &e.begin, &e.end);

        if bisector_previous.is_on_left_side(&candidate, EPSILON)
            || bisector_next.is_on_right_side(&candidate, EPSILON)
        {
            return Some(SplitCandidate {
                point: candidate,
                distance,
                opposite_edge: None,
            });
        }

        Some(SplitCandidate {
            point: candidate,
            distance,
            opposite_edge: Some(edge),
        })
    }

    /// Split candidates of `v` against every original edge, nearest first.
    pub(crate) fn calc_opposite_edges(&self, v: VertexKey) -> Vec<SplitCandidate> {
        let bisector = self.vertices[v].bisector;

        let mut candidates: Vec<SplitCandidate> = self
            .edge_order
            .iter()
            .filter(|&&edge| !edge_behind_bisector(&bisector, &self.edges[edge].line))
            .filter_map(|&edge| self.calc_candidate_point_for_split(v, edge))
            .collect();

        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates
    }

    /// Queue split events of `v`. Candidates farther from `v` than
    /// `distance_squared` (its closest edge event) are skipped.
    pub(crate) fn compute_split_events(&mut self, v: VertexKey, distance_squared_bound: Option<f64>) {
        let source = self.vertices[v].point;

        for candidate in self.calc_opposite_edges(v) {
            if let Some(bound) = distance_squared_bound {
                if distance_squared(&source, &candidate.point) > bound + EPSILON {
                    continue;
                }
            }

            let event = match candidate.opposite_edge {
                Some(opposite_edge) => QueueEvent::Split(SplitEvent {
                    point: candidate.point,
                    distance: candidate.distance,
                    parent: v,
                    opposite_edge,
                }),
                None => QueueEvent::VertexSplit(VertexSplitEvent {
                    point: candidate.point,
                    distance: candidate.distance,
                    parent: v,
                }),
            };
            self.queue.push(event);
        }
    }

    /// Meeting point of the bisectors of two vertices; a meeting exactly at
    /// either vertex does not count.
    pub(crate) fn compute_intersection_bisectors(
        &self,
        previous: VertexKey,
        next: VertexKey,
    ) -> Option<Point2<f64>> {
        let vp = &self.vertices[previous];
        let vn = &self.vertices[next];

        let intersect = vp.bisector.intersect(&vn.bisector)?;
        if vp.point == intersect || vn.point == intersect {
            return None;
        }
        Some(intersect)
    }

    fn create_edge_event(&self, point: Point2<f64>, previous: VertexKey, next: VertexKey) -> QueueEvent {
        let edge = &self.edges[self.vertices[previous].next_edge];
        QueueEvent::Edge(EdgeEvent {
            point,
            distance: calc_distance(&point, &edge.begin, &edge.end),
            previous_vertex: previous,
            next_vertex: next,
        })
    }

    pub(crate) fn compute_edge_events(&mut self, previous: VertexKey, next: VertexKey) {
        if let Some(point) = self.compute_intersection_bisectors(previous, next) {
            let event = self.create_edge_event(point, previous, next);
            self.queue.push(event);
        }
    }

    /// Queue the closer of the two edge events of `v` (both when they tie
    /// within `EPSILON`) and return its squared distance from `v`.
    pub(crate) fn compute_closer_edge_event(&mut self, v: VertexKey) -> Option<f64> {
        let next = self.next(v);
        let previous = self.previous(v);
        let source = self.vertices[v].point;

        let point1 = self.compute_intersection_bisectors(v, next);
        let point2 = self.compute_intersection_bisectors(previous, v);

        if point1.is_none() && point2.is_none() {
            return None;
        }

        let distance1 = point1.map_or(f64::MAX, |p| distance_squared(&source, &p));
        let distance2 = point2.map_or(f64::MAX, |p| distance_squared(&source, &p));

        if let Some(p) = point1 {
            if distance1 - EPSILON < distance2 {
                let event = self.create_edge_event(p, v, next);
                self.queue.push(event);
            }
        }
        if let Some(p) = point2 {
            if distance2 - EPSILON < distance1 {
                let event = self.create_edge_event(p, previous, v);
                self.queue.push(event);
            }
        }

        Some(distance1.min(distance2))
    }

    /// Schedule all events of a freshly created wavefront vertex.
    pub(crate) fn compute_events(&mut self, v: VertexKey) {
        let bound = self.compute_closer_edge_event(v);
        self.compute_split_events(v, bound);
    }

    /// Seed the queue from the initial LAVs: split events of every vertex,
    /// then edge events of every adjacent pair.
    pub(crate) fn init_events(&mut self) {
        let vertices: Vec<VertexKey> = self.lavs().into_iter().flatten().collect();
        for &v in &vertices {
            self.compute_split_events(v, None);
        }
        for &v in &vertices {
            let next = self.next(v);
            self.compute_edge_events(v, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn line(a: (f64, f64), b: (f64, f64)) -> LineLinear2d {
        LineLinear2d::new(&Point2::new(a.0, a.1), &Point2::new(b.0, b.1))
    }

    #[test]
    fn edge_in_front_of_bisector() {
        let bisector = Ray2d::new(Point2::new(0.0, -1.0), Vector2::new(0.0, 1.0));
        assert!(!edge_behind_bisector(&bisector, &line((-1.0, 0.0), (1.0, 0.0))));
    }

    #[test]
    fn collinear_edge_is_behind() {
        let bisector = Ray2d::new(Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0));
        assert!(edge_behind_bisector(&bisector, &line((-1.0, 0.0), (1.0, 0.0))));
    }

    #[test]
    fn edge_through_origin_is_behind() {
        let bisector = Ray2d::new(Point2::new(0.0, 0.0), Vector2::new(0.0, 1.0));
        assert!(edge_behind_bisector(&bisector, &line((0.0, 1.0), (0.0, -1.0))));
    }

    #[test]
    fn nearly_parallel_edge_is_behind() {
        let bisector = Ray2d::new(Point2::new(-1.0, 0.0000001), Vector2::new(1.0, 0.0));
        assert!(edge_behind_bisector(&bisector, &line((-1.0, 0.0), (1.0, 0.0))));
    }
}
