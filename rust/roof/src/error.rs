// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for roof generation.

/// Result type for roof operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a footprint or a roof configuration is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("all polygon z coordinates must be the same: point {index} has z = {z}, expected {expected}")]
    NonPlanar { index: usize, z: f64, expected: f64 },

    #[error("roof pitch must be within [0, 90) degrees, got {0}")]
    InvalidPitch(f64),

    #[error("shed direction must be a finite angle, got {0}")]
    InvalidDirection(f64),

    #[error("could not obtain centroid for polygon")]
    DegenerateFootprint,

    #[error("invalid roof parameters: {0}")]
    InvalidParams(String),

    #[error("invalid footprint: {0}")]
    Skeleton(#[from] roofline_skeleton::Error),
}
