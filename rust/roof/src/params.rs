// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof configuration.
//!
//! ```
//! use roofline::{RoofParams, RoofStyle};
//!
//! let params = RoofParams::from_json(
//!     r#"{ "style": "shed", "direction_degrees": 90.0, "pitch_degrees": 15.0 }"#,
//! )
//! .unwrap();
//! assert_eq!(params.style, RoofStyle::Shed { direction_degrees: 90.0 });
//! ```

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gable::try_generate_gable_roof;
use crate::hip::try_generate_hip_roof;
use crate::shed::try_generate_shed_roof;

/// Roof shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum RoofStyle {
    Hip,
    Gable,
    /// Single sloped plane rising towards `direction_degrees`
    /// (0 = +y, 90 = +x).
    Shed { direction_degrees: f64 },
}

/// Style and pitch of one roof.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofParams {
    #[serde(flatten)]
    pub style: RoofStyle,
    pub pitch_degrees: f64,
}

impl RoofParams {
    pub fn new(style: RoofStyle, pitch_degrees: f64) -> Self {
        Self {
            style,
            pitch_degrees,
        }
    }

    pub fn hip(pitch_degrees: f64) -> Self {
        Self::new(RoofStyle::Hip, pitch_degrees)
    }

    pub fn gable(pitch_degrees: f64) -> Self {
        Self::new(RoofStyle::Gable, pitch_degrees)
    }

    pub fn shed(pitch_degrees: f64, direction_degrees: f64) -> Self {
        Self::new(RoofStyle::Shed { direction_degrees }, pitch_degrees)
    }

    pub fn validate(&self) -> Result<()> {
        roof_slope(self.pitch_degrees)?;
        if let RoofStyle::Shed { direction_degrees } = self.style {
            check_direction(direction_degrees)?;
        }
        Ok(())
    }

    /// Parse and validate parameters from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidParams(e.to_string()))
    }

    /// Build the roof surfaces for `polygon` with this style.
    pub fn generate(&self, polygon: &mut [Point3<f64>]) -> Result<Vec<Vec<Point3<f64>>>> {
        match self.style {
            RoofStyle::Hip => try_generate_hip_roof(polygon, self.pitch_degrees),
            RoofStyle::Gable => try_generate_gable_roof(polygon, self.pitch_degrees),
            RoofStyle::Shed { direction_degrees } => {
                try_generate_shed_roof(polygon, self.pitch_degrees, direction_degrees)
            }
        }
    }
}

/// Rise per unit of run for a pitch in degrees.
///
/// Pitches outside `[0, 90)` (or non-finite) are rejected.
pub fn roof_slope(pitch_degrees: f64) -> Result<f64> {
    if !(0.0..90.0).contains(&pitch_degrees) {
        return Err(Error::InvalidPitch(pitch_degrees));
    }
    Ok(pitch_degrees.to_radians().tan())
}

pub(crate) fn check_direction(direction_degrees: f64) -> Result<()> {
    if !direction_degrees.is_finite() {
        return Err(Error::InvalidDirection(direction_degrees));
    }
    Ok(())
}
