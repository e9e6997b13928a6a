// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Queue events and the global priority queue.
//!
//! Three kinds of event are scheduled while the wavefront shrinks:
//!
//! - [`EdgeEvent`]: two neighbouring bisectors meet, the edge between them
//!   collapses.
//! - [`SplitEvent`]: a reflex vertex hits the interior of an opposite edge.
//! - [`VertexSplitEvent`]: a reflex vertex hits a vertex of the wavefront.
//!
//! Events are never removed from the queue when they go stale; instead they
//! are recognised as obsolete when popped (one of their parent vertices has
//! been processed in the meantime).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use nalgebra::Point2;
use ordered_float::OrderedFloat;
use smallvec::{smallvec, SmallVec};

use crate::keys::{EdgeKey, VertexKey};
use crate::EPSILON;

/// Parent vertices of an event: one for split events, two for edge events.
pub type Parents = SmallVec<[VertexKey; 2]>;

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEvent {
    pub point: Point2<f64>,
    pub distance: f64,
    pub previous_vertex: VertexKey,
    pub next_vertex: VertexKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitEvent {
    pub point: Point2<f64>,
    pub distance: f64,
    pub parent: VertexKey,
    pub opposite_edge: EdgeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexSplitEvent {
    pub point: Point2<f64>,
    pub distance: f64,
    pub parent: VertexKey,
}

/// An event in the global queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    Edge(EdgeEvent),
    Split(SplitEvent),
    VertexSplit(VertexSplitEvent),
}

impl QueueEvent {
    /// Where the event happens.
    pub fn point(&self) -> Point2<f64> {
        match self {
            QueueEvent::Edge(e) => e.point,
            QueueEvent::Split(e) => e.point,
            QueueEvent::VertexSplit(e) => e.point,
        }
    }

    /// Offset distance (height) at which the event happens.
    pub fn distance(&self) -> f64 {
        match self {
            QueueEvent::Edge(e) => e.distance,
            QueueEvent::Split(e) => e.distance,
            QueueEvent::VertexSplit(e) => e.distance,
        }
    }

    /// Vertices whose processing makes this event obsolete.
    pub fn parents(&self) -> Parents {
        match self {
            QueueEvent::Edge(e) => smallvec![e.previous_vertex, e.next_vertex],
            QueueEvent::Split(e) => smallvec![e.parent],
            QueueEvent::VertexSplit(e) => smallvec![e.parent],
        }
    }

    /// Parent of a split-type event.
    pub fn split_parent(&self) -> Option<VertexKey> {
        match self {
            QueueEvent::Edge(_) => None,
            QueueEvent::Split(e) => Some(e.parent),
            QueueEvent::VertexSplit(e) => Some(e.parent),
        }
    }

    /// Whether any parent is in `group`.
    pub fn shares_parent(&self, group: &[VertexKey]) -> bool {
        self.parents().iter().any(|p| group.contains(p))
    }
}

struct Entry {
    distance: OrderedFloat<f64>,
    seq: u64,
    event: QueueEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-queue of events ordered by distance.
///
/// Events with equal distance pop in insertion order.
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: QueueEvent) {
        let entry = Entry {
            distance: OrderedFloat(event.distance()),
            seq: self.seq,
            event,
        };
        self.seq += 1;
        self.heap.push(Reverse(entry));
    }

    pub fn pop(&mut self) -> Option<QueueEvent> {
        self.heap.pop().map(|Reverse(entry)| entry.event)
    }

    /// Distance of the next event, if any.
    pub fn peek_distance(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(entry)| entry.distance.0)
    }

    /// Drop every event with `distance <= height + EPSILON`.
    pub fn remove_under_height(&mut self, height: f64) {
        while let Some(d) = self.peek_distance() {
            if d > height + EPSILON {
                break;
            }
            self.heap.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.heap.len())
            .finish()
    }
}
