// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roofline
//!
//! Roof surfaces for horizontal building footprints.
//!
//! - **Hip**: every wall carries a sloped plane; planes meet along the
//!   straight skeleton of the footprint.
//! - **Gable**: a hip roof whose triangular ends are turned into vertical
//!   gables.
//! - **Shed**: a single plane rising in one direction, closed with walls.
//!
//! Roofs are returned as lists of 3D polygons. The plain `generate_*`
//! functions return an empty list for rejected input; their `try_*` twins
//! report the reason.
//!
//! ```
//! use nalgebra::Point3;
//! use roofline::generate_hip_roof;
//!
//! let mut footprint = vec![
//!     Point3::new(5.0, 25.0, 0.0),
//!     Point3::new(25.0, 25.0, 0.0),
//!     Point3::new(25.0, 5.0, 0.0),
//!     Point3::new(5.0, 5.0, 0.0),
//! ];
//! let pitch = (6.0f64 / 12.0).atan().to_degrees();
//! let surfaces = generate_hip_roof(&mut footprint, pitch);
//!
//! assert_eq!(surfaces.len(), 4);
//! let apex = surfaces[0].iter().map(|p| p.z).fold(0.0, f64::max);
//! assert!((apex - 5.0).abs() < 1e-9);
//! ```

pub mod batch;
pub mod error;
pub mod footprint;
pub mod gable;
pub mod hip;
pub mod params;
pub mod shed;

pub use batch::{generate_batch, requests_from_json, RoofRequest};
pub use error::{Error, Result};
pub use footprint::Footprint;
pub use gable::{apply_gables, generate_gable_roof, try_generate_gable_roof};
pub use hip::{generate_hip_roof, try_generate_hip_roof};
pub use params::{roof_slope, RoofParams, RoofStyle};
pub use shed::{generate_shed_roof, shed_line, try_generate_shed_roof};

// Re-export the skeleton engine
pub use roofline_skeleton as skeleton;
