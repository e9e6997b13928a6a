// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LAV surgery used by multi-split events: cutting a run of vertices out of
//! a LAV, merging two LAVs, and finding the LAV that still borders an
//! opposite edge.

use nalgebra::Point2;

use crate::arena::SkeletonArena;
use crate::keys::{EdgeKey, LavKey, VertexKey};
use crate::polygon::is_inside_polygon;

impl SkeletonArena {
    /// Remove and return the run `start..=end` of the LAV holding `start`,
    /// following `next`.
    ///
    /// # Panics
    ///
    /// If `end` is not reachable from `start` within the LAV.
    pub fn cut_lav_part(&mut self, start: VertexKey, end: VertexKey) -> Vec<VertexKey> {
        let lav_len = self.lav_len(start);

        let mut part = vec![start];
        let mut current = start;
        while current != end {
            current = self.next(current);
            part.push(current);
            if part.len() > lav_len {
                panic!("end vertex {end:?} not found in the LAV of start vertex {start:?}");
            }
        }

        for &v in &part {
            self.remove_from_lav(v);
        }
        part
    }

    /// Move the whole LAV of `merged` in front of `base`, starting with the
    /// successor of `merged` and ending with `merged` itself. The merged LAV
    /// is left empty.
    pub fn merge_before_base_vertex(&mut self, base: VertexKey, merged: VertexKey) {
        let size = self.lav_len(merged);

        for _ in 0..size {
            let next_merged = self.next(merged);
            self.remove_from_lav(next_merged);
            self.insert_before(base, next_merged);
        }
    }

    /// First vertex of `lav`, counting from its head, that sits at the end
    /// of `edge`, either as its own previous edge or as the next edge of its
    /// predecessor.
    pub fn edge_in_lav(&self, lav: LavKey, edge: EdgeKey) -> Option<VertexKey> {
        self.lav_vertices(lav).into_iter().find(|&v| {
            let vertex = &self.vertices[v];
            vertex.previous_edge == edge || self.vertices[vertex.lav_previous].next_edge == edge
        })
    }

    /// Pick which of several LAVs bordering `edge` contains the event
    /// `center`.
    ///
    /// A LAV qualifies when the projection of `center` onto the edge lies
    /// strictly between the projections of the bordering vertex and its
    /// predecessor; failing that, the LAV polygon that contains `center`.
    ///
    /// # Panics
    ///
    /// If several candidates exist and none qualifies.
    pub fn choose_opposite_edge_lav_index(
        &self,
        edge_lavs: &[VertexKey],
        edge: EdgeKey,
        center: &Point2<f64>,
    ) -> Option<usize> {
        match edge_lavs.len() {
            0 => return None,
            1 => return Some(0),
            _ => {}
        }

        let e = &self.edges[edge];
        let center_dot = e.direction.dot(&(center - e.begin));

        for (i, &end) in edge_lavs.iter().enumerate() {
            let begin = self.previous(end);
            let begin_dot = e.direction.dot(&(self.vertices[begin].point - e.begin));
            let end_dot = e.direction.dot(&(self.vertices[end].point - e.begin));

            if (begin_dot < center_dot && center_dot < end_dot)
                || (begin_dot > center_dot && center_dot > end_dot)
            {
                return Some(i);
            }
        }

        for (i, &end) in edge_lavs.iter().enumerate() {
            let size = self.lav_len(end);
            let mut points = Vec::with_capacity(size);
            let mut current = end;
            for _ in 0..size {
                points.push(self.vertices[current].point);
                current = self.next(current);
            }
            if is_inside_polygon(center, &points) {
                return Some(i);
            }
        }

        panic!(
            "could not find the LAV of opposite edge {edge:?} for event at ({}, {})",
            center.x, center.y
        );
    }

    /// Vertex bordering `edge` in the LAV that contains `center`, if the edge
    /// is still part of the wavefront.
    pub fn find_opposite_edge_lav(&self, edge: EdgeKey, center: &Point2<f64>) -> Option<VertexKey> {
        let edge_lavs: Vec<VertexKey> = self
            .lav_order
            .iter()
            .filter_map(|&lav| self.edge_in_lav(lav, edge))
            .collect();

        self.choose_opposite_edge_lav_index(&edge_lavs, edge, center)
            .map(|i| edge_lavs[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::tests::arena_with_lav;

    #[test]
    fn cut_middle_run() {
        let (mut arena, v) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let part = arena.cut_lav_part(v[1], v[2]);
        assert_eq!(part, vec![v[1], v[2]]);
        assert_eq!(arena.lavs()[0], vec![v[0], v[3], v[4]]);
    }

    #[test]
    fn cut_single_vertex() {
        let (mut arena, v) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let part = arena.cut_lav_part(v[0], v[0]);
        assert_eq!(part, vec![v[0]]);
        assert!(!arena.contains_in_lav(v[0]));
    }

    #[test]
    fn cut_wraps_around() {
        let (mut arena, v) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let part = arena.cut_lav_part(v[3], v[0]);
        assert_eq!(part, vec![v[3], v[0]]);
        assert_eq!(arena.lavs()[0], vec![v[1], v[2]]);
    }

    #[test]
    fn merge_moves_whole_lav_before_base() {
        let (mut arena, a) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);

        // second LAV built from fresh vertices in the same arena
        let bisector = arena.vertex(a[0]).bisector;
        let b: Vec<_> = (0..3)
            .map(|i| {
                arena.add_vertex(
                    Point2::new(i as f64, 5.0),
                    0.0,
                    bisector,
                    EdgeKey::default(),
                    EdgeKey::default(),
                )
            })
            .collect();
        arena.add_lav(&b);

        arena.merge_before_base_vertex(a[1], b[1]);
        assert_eq!(arena.lavs()[0], vec![a[0], b[2], b[0], b[1], a[1], a[2]]);
        assert!(arena.lavs()[1].is_empty());

        arena.remove_empty_lavs();
        assert_eq!(arena.lavs().len(), 1);
    }

    #[test]
    fn navigation_after_cut_and_merge() {
        let (mut arena, a) =
            arena_with_lav(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let bisector = arena.vertex(a[0]).bisector;
        let split = arena.add_vertex(Point2::new(1.5, 1.0), 1.0, bisector, EdgeKey::default(), EdgeKey::default());

        // split a[1..=2] off into a LAV of its own, headed by the new vertex
        let mut part = vec![split];
        part.extend(arena.cut_lav_part(a[1], a[2]));
        let cut = arena.add_lav(&part);

        assert_eq!(arena.next(a[0]), a[3]);
        assert_eq!(arena.previous(a[3]), a[0]);
        assert_eq!(arena.lav_len(a[0]), 3);
        assert_eq!(arena.lav_of(a[1]), cut);
        assert_eq!(arena.next(a[2]), split);
        assert_eq!(arena.previous(split), a[2]);
        assert_eq!(arena.lav_index(split), 1);

        // and fold it back in front of the head of the first LAV
        arena.merge_before_base_vertex(a[0], a[2]);
        assert_eq!(arena.lavs()[0], vec![split, a[1], a[2], a[0], a[3], a[4]]);
        assert_eq!(arena.next(a[4]), split);
        assert_eq!(arena.previous(a[0]), a[2]);
        assert_eq!(arena.lav_len(split), 6);
        assert!(arena.lav_vertices(cut).is_empty());

        arena.remove_empty_lavs();
        assert_eq!(arena.lav_keys().len(), 1);
        assert_eq!(arena.lav_index(a[2]), 0);
    }

    #[test]
    fn edge_lookup_walks_from_head() {
        let mut arena = SkeletonArena::new();
        let points = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let edges: Vec<EdgeKey> = (0..4)
            .map(|i| {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % 4];
                arena.add_edge(Point2::new(x0, y0), Point2::new(x1, y1))
            })
            .collect();
        let bisector = crate::geometry::Ray2d::new(Point2::origin(), nalgebra::Vector2::zeros());
        let v: Vec<VertexKey> = (0..4)
            .map(|i| {
                let (x, y) = points[(i + 1) % 4];
                arena.add_vertex(Point2::new(x, y), 0.0, bisector, edges[i], edges[(i + 1) % 4])
            })
            .collect();
        let lav = arena.add_lav(&v);

        assert_eq!(arena.edge_in_lav(lav, edges[1]), Some(v[1]));
        assert_eq!(arena.edge_in_lav(lav, edges[0]), Some(v[0]));

        // with v[0] gone, edge 0 is only reachable as the next edge of the
        // predecessor of v[1]
        arena.remove_from_lav(v[0]);
        assert_eq!(arena.edge_in_lav(lav, edges[0]), Some(v[1]));
        assert_eq!(arena.find_opposite_edge_lav(edges[2], &Point2::new(2.0, 2.0)), Some(v[2]));
    }

    #[test]
    fn opposite_lav_single_candidate() {
        let (mut arena, v) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0)]);
        let edge = arena.add_edge(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_eq!(
            arena.choose_opposite_edge_lav_index(&[v[1]], edge, &Point2::new(9.0, 9.0)),
            Some(0)
        );
        assert_eq!(
            arena.choose_opposite_edge_lav_index(&[], edge, &Point2::new(9.0, 9.0)),
            None
        );
    }

    #[test]
    fn opposite_lav_by_projection_same_lav() {
        let (mut arena, v) = arena_with_lav(&[(0.0, 0.0), (1.0, 0.0)]);
        let edge = arena.add_edge(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let center = Point2::new(0.5, 1.0);

        let idx = arena.choose_opposite_edge_lav_index(&v, edge, &center);
        assert_eq!(idx.map(|i| v[i]), Some(v[0]));
    }

    #[test]
    fn opposite_lav_by_projection_two_lavs() {
        let (mut arena, first) = arena_with_lav(&[(0.0, 0.0), (0.2, 0.0)]);
        let bisector = arena.vertex(first[0]).bisector;
        let v3 = arena.add_vertex(Point2::new(0.2, 0.0), 0.0, bisector, EdgeKey::default(), EdgeKey::default());
        let v4 = arena.add_vertex(Point2::new(1.0, 0.0), 0.0, bisector, EdgeKey::default(), EdgeKey::default());
        arena.add_lav(&[v3, v4]);

        let edge = arena.add_edge(Point2::new(0.0, 0.0), Point2::new(0.2, 0.0));
        let center = Point2::new(0.5, 1.0);
        let candidates = [first[0], v3];

        let idx = arena.choose_opposite_edge_lav_index(&candidates, edge, &center);
        assert_eq!(idx.map(|i| candidates[i]), Some(v3));
    }
}
