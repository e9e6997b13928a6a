// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping of queue events into level events.
//!
//! All live events of one height are loaded together, clustered by shared
//! parent vertices or a shared result point, and each cluster is turned into
//! chains:
//!
//! - **edge chains**: edge events linked through their vertices; a chain
//!   whose ends meet is *closed* and collapses a whole LAV (pick event)
//! - **split chains**: a single split or vertex-split event
//! - **single-edge chains**: the opposite edge of a split, added while the
//!   multi-split event is processed
//!
//! One open edge chain gives a multi-edge event, anything else a multi-split
//! event.

use nalgebra::Point2;
use rustc_hash::FxHashSet;

use crate::arena::SkeletonArena;
use crate::events::{EdgeEvent, QueueEvent};
use crate::keys::{EdgeKey, VertexKey};
use crate::EPSILON;

/// Connected edge events, ordered from the previous end to the next end.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeChain {
    pub events: Vec<EdgeEvent>,
    pub closed: bool,
}

impl EdgeChain {
    /// # Panics
    ///
    /// If `events` is empty.
    pub fn new(events: Vec<EdgeEvent>) -> Self {
        let closed = match (events.first(), events.last()) {
            (Some(first), Some(last)) => first.previous_vertex == last.next_vertex,
            _ => panic!("edge chain needs at least one edge event"),
        };
        Self { events, closed }
    }

    /// Vertex before the chain.
    pub fn previous_vertex(&self) -> VertexKey {
        self.events[0].previous_vertex
    }

    /// Vertex after the chain.
    pub fn next_vertex(&self) -> VertexKey {
        self.events[self.events.len() - 1].next_vertex
    }

    fn touches(&self, v: VertexKey) -> bool {
        self.events
            .iter()
            .any(|e| e.previous_vertex == v || e.next_vertex == v)
    }
}

/// A split or vertex-split event; vertex splits carry no opposite edge.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitChain {
    pub point: Point2<f64>,
    pub distance: f64,
    pub parent: VertexKey,
    pub opposite_edge: Option<EdgeKey>,
}

/// Opposite edge of a split, located in the LAV that currently holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleEdgeChain {
    pub opposite_edge: EdgeKey,
    pub next_vertex: VertexKey,
    /// Captured when the chain is built; the LAV changes while the level is
    /// processed.
    pub previous_vertex: VertexKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chain {
    Edge(EdgeChain),
    Split(SplitChain),
    SingleEdge(SingleEdgeChain),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMode {
    Edge,
    ClosedEdge,
    Split,
}

impl Chain {
    pub fn mode(&self) -> ChainMode {
        match self {
            Chain::Edge(chain) if chain.closed => ChainMode::ClosedEdge,
            Chain::Edge(_) => ChainMode::Edge,
            Chain::Split(_) | Chain::SingleEdge(_) => ChainMode::Split,
        }
    }

    pub fn previous_edge(&self, arena: &SkeletonArena) -> EdgeKey {
        match self {
            Chain::Edge(chain) => arena.vertex(chain.previous_vertex()).previous_edge,
            Chain::Split(chain) => arena.vertex(chain.parent).previous_edge,
            Chain::SingleEdge(chain) => chain.opposite_edge,
        }
    }

    pub fn next_edge(&self, arena: &SkeletonArena) -> EdgeKey {
        match self {
            Chain::Edge(chain) => arena.vertex(chain.next_vertex()).next_edge,
            Chain::Split(chain) => arena.vertex(chain.parent).next_edge,
            Chain::SingleEdge(chain) => chain.opposite_edge,
        }
    }

    /// Vertex before the chain; split chains look it up in the live LAV.
    pub fn previous_vertex(&self, arena: &SkeletonArena) -> VertexKey {
        match self {
            Chain::Edge(chain) => chain.previous_vertex(),
            Chain::Split(chain) => arena.previous(chain.parent),
            Chain::SingleEdge(chain) => chain.previous_vertex,
        }
    }

    /// Vertex after the chain; split chains look it up in the live LAV.
    pub fn next_vertex(&self, arena: &SkeletonArena) -> VertexKey {
        match self {
            Chain::Edge(chain) => chain.next_vertex(),
            Chain::Split(chain) => arena.next(chain.parent),
            Chain::SingleEdge(chain) => chain.next_vertex,
        }
    }

    /// The reflex vertex of a split chain.
    pub fn current_vertex(&self) -> Option<VertexKey> {
        match self {
            Chain::Split(chain) => Some(chain.parent),
            _ => None,
        }
    }

    pub fn opposite_edge(&self) -> Option<EdgeKey> {
        match self {
            Chain::Split(chain) => chain.opposite_edge,
            Chain::SingleEdge(chain) => Some(chain.opposite_edge),
            Chain::Edge(_) => None,
        }
    }
}

/// All events meeting in one point at one height.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelEvent {
    /// A closed edge chain: a whole LAV collapses to a point.
    Pick {
        point: Point2<f64>,
        distance: f64,
        chain: EdgeChain,
    },
    /// An open edge chain collapses into one new vertex.
    MultiEdge {
        point: Point2<f64>,
        distance: f64,
        chain: EdgeChain,
    },
    /// Split chains (possibly with edge chains) meeting in one point.
    MultiSplit {
        point: Point2<f64>,
        distance: f64,
        chains: Vec<Chain>,
    },
}

impl SkeletonArena {
    /// Pop every non-obsolete event within `EPSILON` of the first live event.
    pub(crate) fn load_level_events(&mut self) -> Vec<QueueEvent> {
        let start = loop {
            match self.queue.pop() {
                Some(event) if self.is_obsolete(&event) => continue,
                Some(event) => break event,
                None => return Vec::new(),
            }
        };

        let start_height = start.distance();
        let mut level = vec![start];

        while let Some(d) = self.queue.peek_distance() {
            if d - start_height >= EPSILON {
                break;
            }
            if let Some(event) = self.queue.pop() {
                if !self.is_obsolete(&event) {
                    level.push(event);
                }
            }
        }

        level
    }
}

/// Take the first event of `cluster` and grow a chain from it in both
/// directions, removing the used events from `cluster`.
pub(crate) fn create_edge_chain(cluster: &mut Vec<EdgeEvent>) -> Vec<EdgeEvent> {
    let mut chain = vec![cluster.remove(0)];

    loop {
        let begin = chain[0].previous_vertex;
        let end = chain[chain.len() - 1].next_vertex;

        let found = cluster
            .iter()
            .position(|e| e.previous_vertex == end || e.next_vertex == begin);

        match found {
            Some(i) => {
                let event = cluster.remove(i);
                if event.previous_vertex == end {
                    chain.push(event);
                } else {
                    chain.insert(0, event);
                }
            }
            None => break,
        }
    }

    chain
}

/// Split a cluster into edge chains and split chains.
///
/// Split events win over vertex-split events of the same parent, and a split
/// whose parent takes part in an edge chain is absorbed by that chain.
pub(crate) fn create_chains(cluster: Vec<QueueEvent>) -> Vec<Chain> {
    let mut edge_cluster = Vec::new();
    let mut split_cluster = Vec::new();
    let mut split_parents = FxHashSet::default();

    for event in &cluster {
        match event {
            QueueEvent::Edge(e) => edge_cluster.push(e.clone()),
            QueueEvent::Split(e) => {
                split_parents.insert(e.parent);
                split_cluster.push(SplitChain {
                    point: e.point,
                    distance: e.distance,
                    parent: e.parent,
                    opposite_edge: Some(e.opposite_edge),
                });
            }
            QueueEvent::VertexSplit(_) => {}
        }
    }

    // one vertex split per parent, and only without a real split
    for event in &cluster {
        if let QueueEvent::VertexSplit(e) = event {
            if split_parents.insert(e.parent) {
                split_cluster.push(SplitChain {
                    point: e.point,
                    distance: e.distance,
                    parent: e.parent,
                    opposite_edge: None,
                });
            }
        }
    }

    let mut edge_chains = Vec::new();
    while !edge_cluster.is_empty() {
        edge_chains.push(EdgeChain::new(create_edge_chain(&mut edge_cluster)));
    }

    let mut chains: Vec<Chain> = Vec::with_capacity(edge_chains.len() + split_cluster.len());
    for split in split_cluster {
        if edge_chains.iter().any(|chain| chain.touches(split.parent)) {
            continue;
        }
        chains.push(Chain::Split(split));
    }
    // edge chains first, in creation order
    chains.splice(0..0, edge_chains.into_iter().map(Chain::Edge));

    chains
}

/// Classify a cluster of events sharing one point.
///
/// # Panics
///
/// If a closed edge chain shows up together with other chains.
pub(crate) fn create_level_event(point: Point2<f64>, distance: f64, cluster: Vec<QueueEvent>) -> LevelEvent {
    let mut chains = create_chains(cluster);

    if chains.len() == 1 {
        match chains.pop() {
            Some(Chain::Edge(chain)) if chain.closed => {
                return LevelEvent::Pick {
                    point,
                    distance,
                    chain,
                }
            }
            Some(Chain::Edge(chain)) => {
                return LevelEvent::MultiEdge {
                    point,
                    distance,
                    chain,
                }
            }
            Some(other) => chains.push(other),
            None => {}
        }
    }

    if chains.iter().any(|c| c.mode() == ChainMode::ClosedEdge) {
        panic!(
            "found a closed chain of events for a single point at ({}, {}), \
             but there is more than one chain",
            point.x, point.y
        );
    }

    LevelEvent::MultiSplit {
        point,
        distance,
        chains,
    }
}

/// Cluster the events of one level and build a level event per cluster.
///
/// The first remaining event seeds a cluster; later events join it when
/// they share a parent with any event already in it or land within
/// `EPSILON` of the seed point.
pub(crate) fn group_level_events(events: Vec<QueueEvent>) -> Vec<LevelEvent> {
    let mut ret = Vec::new();
    let mut remaining = events;

    while !remaining.is_empty() {
        let first = remaining.remove(0);
        let center = first.point();
        let distance = first.distance();

        let mut parents: Vec<VertexKey> = first.parents().to_vec();
        let mut cluster = vec![first];
        let mut rest = Vec::with_capacity(remaining.len());

        for event in remaining.drain(..) {
            if event.shares_parent(&parents) || nalgebra::distance(&center, &event.point()) < EPSILON {
                parents.extend(event.parents());
                cluster.push(event);
            } else {
                rest.push(event);
            }
        }

        remaining = rest;
        ret.push(create_level_event(center, distance, cluster));
    }

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{SplitEvent, VertexSplitEvent};
    use slotmap::SlotMap;

    fn vertices(n: usize) -> Vec<VertexKey> {
        let mut map: SlotMap<VertexKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn edge(previous: VertexKey, next: VertexKey) -> EdgeEvent {
        EdgeEvent {
            point: Point2::origin(),
            distance: 0.0,
            previous_vertex: previous,
            next_vertex: next,
        }
    }

    #[test]
    fn edge_chain_appends_successor() {
        let v = vertices(5);
        let e1 = edge(v[0], v[1]);
        let e2 = edge(v[2], v[3]);
        let e3 = edge(v[1], v[4]);
        let mut cluster = vec![e1.clone(), e2.clone(), e3.clone()];

        let chain = create_edge_chain(&mut cluster);
        assert_eq!(chain, vec![e1, e3]);
        assert_eq!(cluster, vec![e2]);
    }

    #[test]
    fn edge_chain_prepends_predecessor() {
        let v = vertices(4);
        let e1 = edge(v[0], v[1]);
        let e2 = edge(v[2], v[0]);
        let e3 = edge(v[1], v[3]);
        let mut cluster = vec![e1.clone(), e2.clone(), e3.clone()];

        let chain = create_edge_chain(&mut cluster);
        assert_eq!(chain, vec![e2, e1, e3]);
        assert!(cluster.is_empty());
    }

    #[test]
    fn closed_ring_groups_into_pick() {
        let v = vertices(4);
        let events = vec![
            QueueEvent::Edge(edge(v[0], v[1])),
            QueueEvent::Edge(edge(v[1], v[2])),
            QueueEvent::Edge(edge(v[2], v[3])),
            QueueEvent::Edge(edge(v[3], v[0])),
        ];

        let level = group_level_events(events);
        assert_eq!(level.len(), 1);
        assert!(matches!(level[0], LevelEvent::Pick { .. }));
    }

    #[test]
    fn open_chain_groups_into_multi_edge() {
        let v = vertices(4);
        let events = vec![
            QueueEvent::Edge(edge(v[0], v[1])),
            QueueEvent::Edge(edge(v[1], v[2])),
        ];

        let level = group_level_events(events);
        match &level[0] {
            LevelEvent::MultiEdge { chain, .. } => {
                assert_eq!(chain.previous_vertex(), v[0]);
                assert_eq!(chain.next_vertex(), v[2]);
                assert!(!chain.closed);
            }
            other => panic!("expected multi edge event, got {other:?}"),
        }
    }

    #[test]
    fn split_preferred_over_vertex_split_of_same_parent() {
        let v = vertices(2);
        let mut edges: SlotMap<EdgeKey, ()> = SlotMap::with_key();
        let opposite = edges.insert(());

        let cluster = vec![
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 1.0,
                parent: v[0],
            }),
            QueueEvent::Split(SplitEvent {
                point: Point2::origin(),
                distance: 1.0,
                parent: v[0],
                opposite_edge: opposite,
            }),
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 1.0,
                parent: v[1],
            }),
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 1.0,
                parent: v[1],
            }),
        ];

        let chains = create_chains(cluster);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].opposite_edge(), Some(opposite));
        assert_eq!(chains[0].current_vertex(), Some(v[0]));
        assert_eq!(chains[1].opposite_edge(), None);
        assert_eq!(chains[1].current_vertex(), Some(v[1]));
    }

    #[test]
    fn split_absorbed_by_edge_chain() {
        let v = vertices(3);
        let cluster = vec![
            QueueEvent::Edge(edge(v[0], v[1])),
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 0.0,
                parent: v[1],
            }),
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 0.0,
                parent: v[2],
            }),
        ];

        let chains = create_chains(cluster);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].mode(), ChainMode::Edge);
        assert_eq!(chains[1].current_vertex(), Some(v[2]));
    }

    #[test]
    fn far_events_without_shared_parent_stay_apart() {
        let v = vertices(4);
        let mut far = edge(v[2], v[3]);
        far.point = Point2::new(5.0, 0.0);
        let events = vec![QueueEvent::Edge(edge(v[0], v[1])), QueueEvent::Edge(far)];

        let level = group_level_events(events);
        assert_eq!(level.len(), 2);
    }

    #[test]
    #[should_panic(expected = "more than one chain")]
    fn closed_chain_with_other_chain_panics() {
        let v = vertices(3);
        let cluster = vec![
            QueueEvent::Edge(edge(v[0], v[1])),
            QueueEvent::Edge(edge(v[1], v[0])),
            QueueEvent::VertexSplit(VertexSplitEvent {
                point: Point2::origin(),
                distance: 0.0,
                parent: v[2],
            }),
        ];
        create_level_event(Point2::origin(), 0.0, cluster);
    }
}
