// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon helpers shared by the skeleton engine and the roof assemblers.
//!
//! Rings are open: the last point connects back to the first implicitly.

use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};
use crate::geometry::perp_dot;
use crate::EPSILON;

/// Check that a ring has enough points and does not close itself explicitly.
pub fn validate_ring(points: &[Point2<f64>]) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::TooFewPoints(points.len()));
    }
    if points.first() == points.last() {
        return Err(Error::RepeatedEndpoint);
    }
    Ok(())
}

/// Signed shoelace area; positive for counter-clockwise rings.
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut p = n - 1;
    for q in 0..n {
        a += points[p].x * points[q].y - points[q].x * points[p].y;
        p = q;
    }
    a * 0.5
}

#[inline]
pub fn is_clockwise(points: &[Point2<f64>]) -> bool {
    signed_area(points) < 0.0
}

/// Reverse the ring in place if it winds clockwise. Returns `true` when the
/// order was changed.
pub fn make_counter_clockwise<T>(points: &mut [T], projected: &[Point2<f64>]) -> bool {
    debug_assert_eq!(points.len(), projected.len());
    if is_clockwise(projected) {
        points.reverse();
        return true;
    }
    false
}

/// Even-odd point in polygon test.
pub fn is_inside_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Area centroid of the ring, `None` for degenerate (zero-area) rings.
pub fn centroid(points: &[Point2<f64>]) -> Option<Point2<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    // relative to the first point to keep the products small
    let origin = points[0];
    let mut area2 = 0.0;
    let mut acc = Vector2::zeros();
    for i in 1..n - 1 {
        let a = points[i] - origin;
        let b = points[i + 1] - origin;
        let cross = perp_dot(&a, &b);
        area2 += cross;
        acc += (a + b) * cross;
    }

    if area2.abs() < EPSILON {
        return None;
    }

    Some(origin + acc / (3.0 * area2))
}

/// Distance from `p` to the closed segment `a..b`.
pub fn distance_to_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    perp_dot(&(b - a), &(c - a))
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether the closed segments `a1..a2` and `b1..b2` cross or touch.
pub fn segments_intersect(
    a1: &Point2<f64>,
    a2: &Point2<f64>,
    b1: &Point2<f64>,
    b2: &Point2<f64>,
) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
    {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(b1, b2, a1))
        || (d2.abs() <= EPSILON && on_segment(b1, b2, a2))
        || (d3.abs() <= EPSILON && on_segment(a1, a2, b1))
        || (d4.abs() <= EPSILON && on_segment(a1, a2, b2))
}
