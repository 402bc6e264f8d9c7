//! Definition of various test shapes.

use std::collections::HashMap;

use crate::grid::BoundaryMesh;
use crate::types::{ParameterError, Result};

/// Create a regular sphere
///
/// A regular sphere is created by starting with a regular octahedron. The shape is then refined `refinement_level` times.
/// Each time the grid is refined, each triangle is split into four triangles (by adding lines connecting the midpoints of
/// each edge). The new points are then scaled so that they are a distance of 1 from the origin.
///
/// Elements are counter-clockwise when viewed from outside, so the normals point outwards.
/// Levels whose element count cannot be addressed are rejected.
pub fn regular_sphere(refinement_level: u32) -> Result<BoundaryMesh> {
    let nelements = 4_usize
        .checked_pow(refinement_level)
        .and_then(|n| n.checked_mul(8))
        .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<[usize; 3]>())
        .ok_or(ParameterError::RefinementTooLarge(refinement_level))?;
    let mut points = Vec::<[f64; 3]>::with_capacity(2 + nelements / 2);

    points.push([0.0, 0.0, 1.0]);
    points.push([1.0, 0.0, 0.0]);
    points.push([0.0, 1.0, 0.0]);
    points.push([-1.0, 0.0, 0.0]);
    points.push([0.0, -1.0, 0.0]);
    points.push([0.0, 0.0, -1.0]);

    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for _ in 0..refinement_level {
        let mut edge_points = HashMap::new();
        let mut new_cells = Vec::with_capacity(4 * cells.len());
        for c in &cells {
            let v = [points[c[0]], points[c[1]], points[c[2]]];
            let edges = [[1, 2], [0, 2], [0, 1]]
                .iter()
                .map(|&[i, j]| {
                    let key = (c[i].min(c[j]), c[i].max(c[j]));
                    *edge_points.entry(key).or_insert_with(|| {
                        let mut new_pt = [
                            0.5 * (v[i][0] + v[j][0]),
                            0.5 * (v[i][1] + v[j][1]),
                            0.5 * (v[i][2] + v[j][2]),
                        ];
                        let size = new_pt.iter().map(|&x| x * x).sum::<f64>().sqrt();
                        for x in new_pt.iter_mut() {
                            *x /= size;
                        }
                        points.push(new_pt);
                        points.len() - 1
                    })
                })
                .collect::<Vec<_>>();
            new_cells.push([c[0], edges[2], edges[1]]);
            new_cells.push([c[1], edges[0], edges[2]]);
            new_cells.push([c[2], edges[1], edges[0]]);
            new_cells.push([edges[0], edges[1], edges[2]]);
        }
        cells = new_cells;
    }

    BoundaryMesh::new(points, cells)
}

/// Create a tetrahedron with vertices at the origin and at `a`, `b` and `c` along the x, y and
/// z axes.
///
/// All four faces are oriented outwards.
pub fn tetrahedron(a: f64, b: f64, c: f64) -> Result<BoundaryMesh> {
    BoundaryMesh::new(
        vec![[0.0, 0.0, 0.0], [a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]],
        vec![[0, 2, 1], [0, 3, 2], [0, 1, 3], [1, 2, 3]],
    )
}
