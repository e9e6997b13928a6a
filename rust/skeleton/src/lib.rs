// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roofline Skeleton
//!
//! Straight skeleton of simple polygons, computed with a level-grouped
//! variant of the Felkel/Obdrzalek wavefront algorithm.
//!
//! The footprint's edges move inward at unit speed. Wavefront vertices travel
//! along angle bisectors; when bisectors meet (edge events) or a reflex
//! vertex runs into an opposite edge (split events) the wavefront changes
//! topology. Every original edge sweeps out one face; the distance travelled
//! by each face point is its height at a 45 degree roof slope.
//!
//! All events closer than [`EPSILON`] in height are resolved together as one
//! level, which keeps symmetric and degenerate footprints (squares, crosses,
//! parallel wings) stable.
//!
//! ```
//! use nalgebra::Point2;
//! use roofline_skeleton::Skeleton;
//!
//! let square = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//! let skeleton = Skeleton::build(&square).unwrap();
//! assert_eq!(skeleton.faces.len(), 4);
//! ```

pub mod arena;
pub mod candidates;
pub mod chains;
pub mod engine;
pub mod error;
pub mod events;
pub mod faces;
pub mod geometry;
pub mod keys;
pub mod lav;
pub mod polygon;

pub use arena::SkeletonArena;
pub use engine::{FaceVertex, Skeleton, SkeletonFace};
pub use error::{Error, Result};
pub use geometry::{LineLinear2d, Ray2d};
pub use keys::{EdgeKey, FaceKey, NodeKey, VertexKey};

/// Tolerance for all geometric comparisons of the engine.
pub const EPSILON: f64 = 1e-10;

/// Upper bound on processed levels; exceeding it means the engine is stuck.
pub const MAX_LEVELS: usize = 10_000;
