// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofs for many footprints at once.
//!
//! Every request owns its footprint and parameters, so requests run on the
//! rayon pool without any shared state.

use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::RoofParams;

/// One footprint together with the roof to put on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofRequest {
    /// Footprint ring as `[x, y, z]` triples.
    pub footprint: Vec<[f64; 3]>,
    pub params: RoofParams,
}

impl RoofRequest {
    pub fn new(footprint: &[Point3<f64>], params: RoofParams) -> Self {
        Self {
            footprint: footprint.iter().map(|p| [p.x, p.y, p.z]).collect(),
            params,
        }
    }

    pub fn points(&self) -> Vec<Point3<f64>> {
        self.footprint
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect()
    }

    /// Build the roof on a private copy of the footprint.
    pub fn generate(&self) -> Result<Vec<Vec<Point3<f64>>>> {
        self.params.validate()?;
        let mut points = self.points();
        self.params.generate(&mut points)
    }
}

/// Parse a JSON array of requests.
pub fn requests_from_json(json: &str) -> Result<Vec<RoofRequest>> {
    serde_json::from_str(json).map_err(|e| Error::InvalidParams(e.to_string()))
}

/// Generate every request in parallel; results keep the request order.
pub fn generate_batch(requests: &[RoofRequest]) -> Vec<Result<Vec<Vec<Point3<f64>>>>> {
    let results: Vec<_> = requests.par_iter().map(RoofRequest::generate).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::debug!(requests = requests.len(), failed, "Generated roof batch");
    results
}
