// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for skeleton input validation.
//!
//! Only malformed input is reported through [`Error`]. Broken internal
//! invariants (a vertex missing from every LAV, a push into a closed face,
//! the level bound being exceeded) abort the run with a panic instead.

/// Result type alias for skeleton operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating a polygon ring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The ring has fewer than three points.
    #[error("polygon must have at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// The ring repeats its first point at the end; closure is implicit.
    #[error("polygon can't start and end with the same point")]
    RepeatedEndpoint,
}
