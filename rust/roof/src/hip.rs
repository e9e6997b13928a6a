// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hip roofs: every footprint edge rises at the same pitch, so the roof is
//! the straight skeleton of the footprint lifted by `distance * tan(pitch)`.

use nalgebra::Point3;
use roofline_skeleton::polygon::make_counter_clockwise;
use roofline_skeleton::Skeleton;

use crate::error::Result;
use crate::footprint::Footprint;
use crate::params::roof_slope;

/// Hip roof surfaces, or an empty list if the footprint or pitch is
/// rejected.
///
/// `polygon` is reordered to counter-clockwise in place.
pub fn generate_hip_roof(polygon: &mut [Point3<f64>], pitch_degrees: f64) -> Vec<Vec<Point3<f64>>> {
    match try_generate_hip_roof(polygon, pitch_degrees) {
        Ok(surfaces) => surfaces,
        Err(err) => {
            tracing::warn!(error = %err, points = polygon.len(), "Hip roof rejected footprint");
            Vec::new()
        }
    }
}

/// Hip roof surfaces, reporting why a footprint was rejected.
pub fn try_generate_hip_roof(
    polygon: &mut [Point3<f64>],
    pitch_degrees: f64,
) -> Result<Vec<Vec<Point3<f64>>>> {
    let slope = roof_slope(pitch_degrees)?;
    let footprint = Footprint::new(polygon)?;
    let reversed = make_counter_clockwise(polygon, footprint.points());

    let skeleton = footprint.skeleton()?;
    let surfaces = lift_faces(&skeleton, &footprint, slope);

    tracing::debug!(
        points = footprint.len(),
        reversed,
        levels = skeleton.levels,
        surfaces = surfaces.len(),
        "Generated hip roof"
    );
    Ok(surfaces)
}

/// One 3D surface per non-empty skeleton face.
pub(crate) fn lift_faces(
    skeleton: &Skeleton,
    footprint: &Footprint,
    slope: f64,
) -> Vec<Vec<Point3<f64>>> {
    skeleton
        .faces
        .iter()
        .filter(|face| !face.vertices.is_empty())
        .map(|face| {
            face.vertices
                .iter()
                .map(|v| footprint.lift(&v.point, v.distance * slope))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rectangle(width: f64, depth: f64, z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(width, 0.0, z),
            Point3::new(width, depth, z),
            Point3::new(0.0, depth, z),
        ]
    }

    fn max_height(surfaces: &[Vec<Point3<f64>>]) -> f64 {
        surfaces
            .iter()
            .flatten()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn one_surface_per_edge() {
        let surfaces = generate_hip_roof(&mut rectangle(12.0, 8.0, 0.0), 30.0);
        assert_eq!(surfaces.len(), 4);
        assert!(surfaces.iter().all(|s| s.len() >= 3));
    }

    #[test]
    fn apex_height_follows_short_side() {
        let surfaces = generate_hip_roof(&mut rectangle(12.0, 8.0, 0.0), 45.0);
        assert_relative_eq!(max_height(&surfaces), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn elevation_is_restored() {
        let surfaces = generate_hip_roof(&mut rectangle(12.0, 8.0, 3.0), 45.0);
        assert_relative_eq!(max_height(&surfaces), 7.0, epsilon = 1e-9);
        let lowest = surfaces
            .iter()
            .flatten()
            .map(|p| p.z)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(lowest, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_footprint_is_reordered() {
        let mut polygon = rectangle(4.0, 2.0, 1.0);
        polygon.reverse();
        let surfaces = generate_hip_roof(&mut polygon, 30.0);
        assert_eq!(surfaces.len(), 4);
        assert_eq!(polygon[0], Point3::new(0.0, 0.0, 1.0));
        assert_eq!(polygon[1], Point3::new(4.0, 0.0, 1.0));
    }

    #[test]
    fn rejected_input_yields_no_surfaces() {
        assert!(generate_hip_roof(&mut rectangle(4.0, 2.0, 0.0)[..2].to_vec(), 30.0).is_empty());
        assert!(generate_hip_roof(&mut rectangle(4.0, 2.0, 0.0), 90.0).is_empty());
    }
}
