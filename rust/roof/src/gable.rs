// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gable roofs, derived from hip roofs.
//!
//! Every triangular hip surface whose apex sits above two equally high base
//! corners becomes a vertical gable end: its apex moves to the midpoint of
//! the base, and all surfaces sharing that apex follow it.
//!
//! When two such triangles meet at one apex from opposite sides (a square
//! pyramid), each moves its apex to its own base midpoint, and the other
//! surfaces at the apex are given both new points as a ridge. The order of
//! the two ridge points in those surfaces is the one that does not fold the
//! surface onto itself.

use nalgebra::Point3;
use roofline_skeleton::polygon::segments_intersect;
use roofline_skeleton::EPSILON;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::hip::try_generate_hip_roof;

/// Gable roof surfaces, or an empty list if the footprint or pitch is
/// rejected.
///
/// `polygon` is reordered to counter-clockwise in place.
pub fn generate_gable_roof(
    polygon: &mut [Point3<f64>],
    pitch_degrees: f64,
) -> Vec<Vec<Point3<f64>>> {
    match try_generate_gable_roof(polygon, pitch_degrees) {
        Ok(surfaces) => surfaces,
        Err(err) => {
            tracing::warn!(error = %err, points = polygon.len(), "Gable roof rejected footprint");
            Vec::new()
        }
    }
}

/// Gable roof surfaces, reporting why a footprint was rejected.
pub fn try_generate_gable_roof(
    polygon: &mut [Point3<f64>],
    pitch_degrees: f64,
) -> Result<Vec<Vec<Point3<f64>>>> {
    let mut surfaces = try_generate_hip_roof(polygon, pitch_degrees)?;
    let gables = apply_gables(&mut surfaces);
    tracing::debug!(gables, surfaces = surfaces.len(), "Generated gable roof");
    Ok(surfaces)
}

/// Rewrite triangular hip ends of `surfaces` into gable ends.
///
/// Returns the number of gable apexes that were moved.
///
/// # Panics
///
/// If a ridge between two opposite gables can't be threaded through a
/// surface sharing their apex.
pub fn apply_gables(surfaces: &mut [Vec<Point3<f64>>]) -> usize {
    let mut processed = FxHashSet::default();
    let mut gables = 0;

    for i in 0..surfaces.len() {
        if processed.contains(&i) {
            continue;
        }
        let Some([top, bottom1, bottom2]) = gable_vertices(&surfaces[i]) else {
            continue;
        };
        processed.insert(i);
        gables += 1;

        let mut connected = Vec::new();
        for (j, surface) in surfaces.iter().enumerate() {
            connected.extend(surface.iter().filter(|v| same_point(v, &top)).map(|_| j));
        }
        connected.dedup();
        processed.extend(connected.iter().copied());

        match opposite_gable(surfaces, &connected, i) {
            Some(opposite) => split_into_ridge(surfaces, &connected, i, opposite, &top),
            None => {
                let apex = base_midpoint(&bottom1, &bottom2, top.z);
                for &j in &connected {
                    replace_point(&mut surfaces[j], &top, &apex);
                }
            }
        }
    }

    gables
}

/// `[top, bottom, bottom]` of a triangle whose top is strictly above two
/// bottoms of equal height. Heights compare within `EPSILON`.
fn gable_vertices(surface: &[Point3<f64>]) -> Option<[Point3<f64>; 3]> {
    let [a, b, c] = surface else {
        return None;
    };

    let is_top = |top: &Point3<f64>, p: &Point3<f64>, q: &Point3<f64>| {
        top.z - p.z > EPSILON && top.z - q.z > EPSILON && (p.z - q.z).abs() <= EPSILON
    };

    if is_top(a, b, c) {
        Some([*a, *b, *c])
    } else if is_top(b, a, c) {
        Some([*b, *a, *c])
    } else if is_top(c, a, b) {
        Some([*c, *a, *b])
    } else {
        None
    }
}

/// Surface in `connected` that is a gable sharing no base corner with the
/// gable `gable`.
fn opposite_gable(
    surfaces: &[Vec<Point3<f64>>],
    connected: &[usize],
    gable: usize,
) -> Option<usize> {
    // an opposite pair needs two more surfaces between them
    if connected.len() < 4 {
        return None;
    }
    let [_, b1, b2] = gable_vertices(&surfaces[gable])?;

    connected
        .iter()
        .copied()
        .filter(|&j| j != gable)
        .find(|&j| match gable_vertices(&surfaces[j]) {
            Some([_, c1, c2]) => [c1, c2]
                .iter()
                .all(|c| !same_point(c, &b1) && !same_point(c, &b2)),
            None => false,
        })
}

fn split_into_ridge(
    surfaces: &mut [Vec<Point3<f64>>],
    connected: &[usize],
    gable: usize,
    opposite: usize,
    top: &Point3<f64>,
) {
    let mut ridge = Vec::with_capacity(2);
    for j in [gable, opposite] {
        if let Some([apex, b1, b2]) = gable_vertices(&surfaces[j]) {
            let end = base_midpoint(&b1, &b2, apex.z);
            replace_point(&mut surfaces[j], top, &end);
            ridge.push(end);
        }
    }
    let [first, second] = ridge[..] else {
        panic!("opposite gables at apex {top:?} did not yield two ridge ends");
    };

    for &j in connected {
        if j == gable || j == opposite {
            continue;
        }
        surfaces[j] = thread_ridge(&surfaces[j], top, &first, &second);
    }
}

/// Replace `top` in `surface` with the ridge `first`/`second`, in whichever
/// order keeps the surface simple.
fn thread_ridge(
    surface: &[Point3<f64>],
    top: &Point3<f64>,
    first: &Point3<f64>,
    second: &Point3<f64>,
) -> Vec<Point3<f64>> {
    let n = surface.len();
    let mut forward = Vec::with_capacity(n + 1);
    let mut backward = Vec::with_capacity(n + 1);
    let mut forward_edges = Vec::with_capacity(2);
    let mut backward_edges = Vec::with_capacity(2);

    for (k, vertex) in surface.iter().enumerate() {
        if !same_point(vertex, top) {
            forward.push(*vertex);
            backward.push(*vertex);
            continue;
        }
        let previous = surface[(k + n - 1) % n];
        let next = surface[(k + 1) % n];

        forward.extend([*first, *second]);
        forward_edges.push((*first, previous));
        forward_edges.push((*second, next));

        backward.extend([*second, *first]);
        backward_edges.push((*second, previous));
        backward_edges.push((*first, next));
    }

    if forward_edges.len() != 2 {
        panic!(
            "surface must contain the gable apex {top:?} exactly once, found {}",
            forward_edges.len() / 2
        );
    }

    let crossed = |edges: &[(Point3<f64>, Point3<f64>)]| {
        segments_intersect(
            &edges[0].0.xy(),
            &edges[0].1.xy(),
            &edges[1].0.xy(),
            &edges[1].1.xy(),
        )
    };

    match (crossed(&forward_edges), crossed(&backward_edges)) {
        (true, false) => backward,
        (false, true) => forward,
        (forward_crossed, backward_crossed) => panic!(
            "could not create gable ridge through apex {top:?}: \
             forward crossed = {forward_crossed}, backward crossed = {backward_crossed}"
        ),
    }
}

fn base_midpoint(b1: &Point3<f64>, b2: &Point3<f64>, z: f64) -> Point3<f64> {
    Point3::new((b1.x + b2.x) / 2.0, (b1.y + b2.y) / 2.0, z)
}

fn replace_point(surface: &mut [Point3<f64>], from: &Point3<f64>, to: &Point3<f64>) {
    for vertex in surface.iter_mut().filter(|v| same_point(v, from)) {
        *vertex = *to;
    }
}

fn same_point(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON && (a.z - b.z).abs() <= EPSILON
}
