// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated, flattened building footprint.
//!
//! Roofs are built in plan view. A [`Footprint`] keeps the xy projection of
//! the caller's ring together with the shared elevation that is added back
//! onto every generated roof point.

use nalgebra::{Point2, Point3};
use roofline_skeleton::polygon::{is_clockwise, validate_ring};
use roofline_skeleton::Skeleton;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    points: Vec<Point2<f64>>,
    elevation: f64,
}

impl Footprint {
    /// Validate a horizontal ring.
    ///
    /// The ring needs at least three points, must not repeat its first point
    /// at the end, and every point must share the z of the first point.
    pub fn new(polygon: &[Point3<f64>]) -> Result<Self> {
        let points: Vec<Point2<f64>> = polygon.iter().map(|p| p.xy()).collect();
        validate_ring(&points)?;

        let elevation = polygon[0].z;
        if let Some((index, p)) = polygon
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, p)| p.z != elevation)
        {
            return Err(Error::NonPlanar {
                index,
                z: p.z,
                expected: elevation,
            });
        }

        Ok(Self { points, elevation })
    }

    /// Plan-view points in input order.
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Shared z of the input ring.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_clockwise(&self) -> bool {
        is_clockwise(&self.points)
    }

    /// Straight skeleton of the plan-view ring.
    pub fn skeleton(&self) -> Result<Skeleton> {
        Ok(Skeleton::build(&self.points)?)
    }

    /// Lift a plan-view point to `elevation + height`.
    pub fn lift(&self, point: &Point2<f64>, height: f64) -> Point3<f64> {
        Point3::new(point.x, point.y, self.elevation + height)
    }
}
