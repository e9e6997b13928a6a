// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based skeleton storage.
//!
//! Every edge, active vertex, LAV, face and face node gets a unique,
//! type-safe key for O(1) lookup in the
//! [`SkeletonArena`](crate::arena::SkeletonArena). Keys are created by
//! `slotmap::SlotMap` and stay valid for the whole run: retired vertices are
//! tombstoned with a `processed` flag, never freed. Emptied LAVs are the only
//! entities that get removed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an original footprint edge.
    pub struct EdgeKey;

    /// Key for a wavefront vertex (member of at most one LAV at a time).
    pub struct VertexKey;

    /// Key for a face queue (one per original edge, plus auxiliary faces
    /// opened by opposite-edge splits).
    pub struct FaceKey;

    /// Key for a node queued on a face.
    pub struct NodeKey;

    /// Key for a list of active vertices (LAV).
    pub struct LavKey;
}
