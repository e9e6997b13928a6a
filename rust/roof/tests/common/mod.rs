// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use nalgebra::Point3;

pub const TOLERANCE: f64 = 0.01;

pub fn ring(points: &[(f64, f64, f64)]) -> Vec<Point3<f64>> {
    points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect()
}

/// Pitch in degrees for a rise over run, e.g. `pitch(6.0, 12.0)` for 6:12.
pub fn pitch(rise: f64, run: f64) -> f64 {
    (rise / run).atan().to_degrees()
}

/// Same cyclic sequence of points, allowing any starting index.
pub fn circular_equal(expected: &[Point3<f64>], actual: &[Point3<f64>]) -> bool {
    if expected.len() != actual.len() || expected.is_empty() {
        return false;
    }
    let n = expected.len();
    (0..n).any(|offset| {
        (0..n).all(|i| {
            let a = expected[i];
            let b = actual[(i + offset) % n];
            (a.x - b.x).abs() <= TOLERANCE
                && (a.y - b.y).abs() <= TOLERANCE
                && (a.z - b.z).abs() <= TOLERANCE
        })
    })
}

/// Every surface must match exactly one expected polygon.
pub fn assert_surfaces(actual: &[Vec<Point3<f64>>], expected: &[Vec<(f64, f64, f64)>]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "surface count mismatch: {actual:#?}"
    );

    let expected: Vec<Vec<Point3<f64>>> = expected.iter().map(|p| ring(p)).collect();
    for surface in actual {
        let matches = expected
            .iter()
            .filter(|polygon| circular_equal(polygon, surface))
            .count();
        assert_eq!(
            matches, 1,
            "surface {surface:?} matched {matches} expected polygons"
        );
    }
}

/// Signed plan-view area of a polygon.
pub fn plan_area(points: &[Point3<f64>]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        area += p.x * q.y - q.x * p.y;
    }
    area * 0.5
}
