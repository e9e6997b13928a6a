// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shed roofs: one plane rising in a compass direction, closed off by
//! vertical walls down to the footprint elevation.
//!
//! Heights are measured from a reference segment placed well outside the
//! footprint, perpendicular to the slope direction. The footprint point
//! closest to it stays at the base elevation.

use nalgebra::{Point2, Point3, Vector2};
use roofline_skeleton::polygon::{centroid, distance_to_segment};
use roofline_skeleton::EPSILON;

use crate::error::{Error, Result};
use crate::footprint::Footprint;
use crate::params::{check_direction, roof_slope};

/// Shed roof surfaces, or an empty list if the footprint, pitch or
/// direction is rejected.
///
/// The roof height of every footprint point is written into its z.
pub fn generate_shed_roof(
    polygon: &mut [Point3<f64>],
    pitch_degrees: f64,
    direction_degrees: f64,
) -> Vec<Vec<Point3<f64>>> {
    match try_generate_shed_roof(polygon, pitch_degrees, direction_degrees) {
        Ok(surfaces) => surfaces,
        Err(err) => {
            tracing::warn!(error = %err, points = polygon.len(), "Shed roof rejected footprint");
            Vec::new()
        }
    }
}

/// Shed roof surfaces, reporting why a footprint was rejected.
///
/// Walls come first, one per footprint edge that has an endpoint above the
/// base elevation; the sloped cap is last, in reverse footprint order.
pub fn try_generate_shed_roof(
    polygon: &mut [Point3<f64>],
    pitch_degrees: f64,
    direction_degrees: f64,
) -> Result<Vec<Vec<Point3<f64>>>> {
    let slope = roof_slope(pitch_degrees)?;
    check_direction(direction_degrees)?;
    let footprint = Footprint::new(polygon)?;

    let (start, end) = shed_line(footprint.points(), direction_degrees)?;
    let distances: Vec<f64> = footprint
        .points()
        .iter()
        .map(|p| distance_to_segment(p, &start, &end))
        .collect();
    let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);

    for ((vertex, point), distance) in polygon.iter_mut().zip(footprint.points()).zip(&distances) {
        *vertex = footprint.lift(point, (distance - nearest) * slope);
    }

    let base = footprint.elevation();
    let n = polygon.len();
    let mut surfaces = Vec::with_capacity(n + 1);
    for i in 0..n {
        let vertex = polygon[i];
        let next = polygon[(i + 1) % n];

        let mut wall = vec![vertex, next];
        if next.z - base > EPSILON {
            wall.push(Point3::new(next.x, next.y, base));
        }
        if vertex.z - base > EPSILON {
            wall.push(Point3::new(vertex.x, vertex.y, base));
        }
        if wall.len() > 2 {
            surfaces.push(wall);
        }
    }

    let mut cap = polygon.to_vec();
    cap.reverse();
    surfaces.push(cap);

    tracing::debug!(
        points = n,
        direction_degrees,
        walls = surfaces.len() - 1,
        "Generated shed roof"
    );
    Ok(surfaces)
}

/// Reference segment the shed heights are measured from.
///
/// The segment passes through the footprint centroid perpendicular to
/// `direction_degrees` (0 = +y, 90 = +x, clockwise), with half-length twice
/// the largest centroid-to-vertex distance, and is then moved that same
/// distance against the slope direction.
pub fn shed_line(
    points: &[Point2<f64>],
    direction_degrees: f64,
) -> Result<(Point2<f64>, Point2<f64>)> {
    let center = centroid(points).ok_or(Error::DegenerateFootprint)?;
    let reach = 2.0
        * points
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0, f64::max);

    let standard = 90.0 - direction_degrees;
    let towards = |degrees: f64| {
        let radians = degrees.to_radians();
        center + Vector2::new(radians.cos(), radians.sin()) * reach
    };
    let start = towards(standard - 90.0);
    let end = towards(standard + 90.0);

    let angle = (end.x - start.x).atan2(end.y - start.y);
    let shift = Vector2::new(-reach * angle.cos(), reach * angle.sin());
    Ok((start + shift, end + shift))
}
