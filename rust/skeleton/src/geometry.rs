// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D primitives used by the wavefront: lines in linear form, rays and the
//! bisector construction.
//!
//! All tests that need a tolerance take [`EPSILON`](crate::EPSILON); point
//! equality elsewhere is exact.

use nalgebra::{Point2, Vector2};

use crate::EPSILON;

/// Vector rotated 90 degrees counter-clockwise.
#[inline]
pub fn orthogonal_left(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Vector rotated 90 degrees clockwise.
#[inline]
pub fn orthogonal_right(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(v.y, -v.x)
}

/// Perp-dot (2D cross) product.
#[inline]
pub fn perp_dot(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unit vector in the direction of `v`; a zero vector is returned unchanged.
#[inline]
pub fn unit(v: &Vector2<f64>) -> Vector2<f64> {
    v.try_normalize(0.0).unwrap_or(*v)
}

/// Line in general form `A·x + B·y + C = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLinear2d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineLinear2d {
    /// Line through two points.
    pub fn new(p1: &Point2<f64>, p2: &Point2<f64>) -> Self {
        Self {
            a: p1.y - p2.y,
            b: p2.x - p1.x,
            c: p1.x * p2.y - p2.x * p1.y,
        }
    }

    /// Intersection point of two lines, `None` when they are parallel.
    pub fn collide(&self, other: &LineLinear2d) -> Option<Point2<f64>> {
        let wab = self.a * other.b - other.a * self.b;
        let wbc = self.b * other.c - other.b * self.c;
        let wca = self.c * other.a - other.c * self.a;

        if wab == 0.0 {
            return None;
        }

        Some(Point2::new(wbc / wab, wca / wab))
    }
}

/// Half-line starting at `point` heading along `vector` (not normalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2d {
    pub point: Point2<f64>,
    pub vector: Vector2<f64>,
}

impl Ray2d {
    pub fn new(point: Point2<f64>, vector: Vector2<f64>) -> Self {
        Self { point, vector }
    }

    /// Supporting line of the ray.
    pub fn linear_form(&self) -> LineLinear2d {
        let a = self.vector.y;
        let b = -self.vector.x;
        let c = -(a * self.point.x + b * self.point.y);
        LineLinear2d { a, b, c }
    }

    /// Intersection with a line, rejected when it lies behind the ray origin
    /// (projection onto the ray direction below `epsilon`).
    pub fn collide(&self, line: &LineLinear2d, epsilon: f64) -> Option<Point2<f64>> {
        let collide = self.linear_form().collide(line)?;
        if self.vector.dot(&(collide - self.point)) < epsilon {
            return None;
        }
        Some(collide)
    }

    /// `p` is on the left of the ray, or within `epsilon` of it.
    pub fn is_on_left_side(&self, p: &Point2<f64>, epsilon: f64) -> bool {
        orthogonal_right(&self.vector).dot(&(p - self.point)) < epsilon
    }

    /// `p` is on the right of the ray, or within `epsilon` of it.
    pub fn is_on_right_side(&self, p: &Point2<f64>, epsilon: f64) -> bool {
        orthogonal_right(&self.vector).dot(&(p - self.point)) > -epsilon
    }

    /// `p` lies on the forward half of the ray's supporting line.
    fn in_collinear_ray(&self, p: &Point2<f64>) -> bool {
        self.vector.dot(&(p - self.point)) >= 0.0
    }

    /// First intersection point of two rays.
    ///
    /// Collinear overlapping rays yield the start of the overlap measured on
    /// `other`; degenerate zero-length rays behave as points.
    pub fn intersect(&self, other: &Ray2d) -> Option<Point2<f64>> {
        let u = self.vector;
        let v = other.vector;
        let w = self.point - other.point;
        let d = perp_dot(&u, &v);

        if d.abs() < EPSILON {
            // parallel: only collinear rays can meet
            if perp_dot(&u, &w) != 0.0 || perp_dot(&v, &w) != 0.0 {
                return None;
            }

            let du = u.dot(&u);
            let dv = v.dot(&v);

            if du == 0.0 && dv == 0.0 {
                return (self.point == other.point).then_some(self.point);
            }
            if du == 0.0 {
                return other.in_collinear_ray(&self.point).then_some(self.point);
            }
            if dv == 0.0 {
                return self.in_collinear_ray(&other.point).then_some(other.point);
            }

            let w2 = (self.point + u) - other.point;
            let (mut t0, mut t1) = if v.x != 0.0 {
                (w.x / v.x, w2.x / v.x)
            } else {
                (w.y / v.y, w2.y / v.y)
            };
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t1 < 0.0 {
                return None;
            }
            let t0 = t0.max(0.0);
            return Some(other.point + v * t0);
        }

        let s = perp_dot(&v, &w) / d;
        if s < 0.0 {
            return None;
        }
        let t = perp_dot(&u, &w) / d;
        if t < 0.0 {
            return None;
        }

        Some(self.point + u * s)
    }
}

/// Direction of the angle bisector between two unit edge directions, pointing
/// to the left of the pair (the interior for a counter-clockwise ring).
pub fn calc_vector_bisector(norm1: &Vector2<f64>, norm2: &Vector2<f64>) -> Vector2<f64> {
    let e1v = orthogonal_left(norm1);

    if norm1.dot(norm2) > 0.0 {
        return e1v + orthogonal_left(norm2);
    }

    let ret = norm2 - norm1;
    if e1v.dot(norm2) < 0.0 {
        return -ret;
    }
    ret
}

/// Bisector ray anchored at `p` between two edges given as unit directions.
pub fn calc_bisector(p: Point2<f64>, dir1: &Vector2<f64>, dir2: &Vector2<f64>) -> Ray2d {
    Ray2d::new(p, calc_vector_bisector(dir1, dir2))
}

/// Perpendicular distance from `p` to the supporting line of `begin → end`.
pub fn calc_distance(p: &Point2<f64>, begin: &Point2<f64>, end: &Point2<f64>) -> f64 {
    let n = unit(&(end - begin));
    let vector = p - begin;
    let projected = n * n.dot(&vector);
    (vector - projected).norm()
}
