//! Closed-form Laplace integrals over a flat triangle
//!
//! Both integrals reduce to sums over the three edges of the triangle. Vertices are expected in
//! counter-clockwise order with respect to `normal`.
use crate::grid::geometry::{cross, dot, norm, sub};
use crate::kernel::helmholtz_3d::M_INV_4PI;
use crate::types::KernelError;

/// The edges of a triangle as pairs of vertex indices.
const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

/// Integral of `1 / (4 pi |p - q|)` over a triangle, for a point `p` in its plane.
///
/// `tolerance` is the smallest admissible distance between `p` and the line through an edge.
pub fn single_layer_in_plane(
    point: &[f64; 3],
    vertices: &[[f64; 3]; 3],
    normal: &[f64; 3],
    tolerance: f64,
) -> Result<f64, KernelError> {
    let mut sum = 0.0;
    for (start, end) in EDGES {
        let a = &vertices[start];
        let b = &vertices[end];
        let edge = sub(b, a);
        let length = norm(&edge);
        if length == 0.0 {
            return Err(KernelError::DegenerateElement);
        }
        let tangent = [edge[0] / length, edge[1] / length, edge[2] / length];
        let outward = cross(&tangent, normal);

        let to_a = sub(a, point);
        let h = dot(&to_a, &outward);
        if h.abs() <= tolerance {
            return Err(KernelError::OnEdge);
        }
        let s_a = dot(&to_a, &tangent);
        let s_b = s_a + length;
        sum += h * ((s_b / h).asinh() - (s_a / h).asinh());
    }
    Ok(M_INV_4PI * sum)
}

/// Hypersingular Laplace operator of a triangle.
///
/// Returns the normal derivative along `target_normal` at `point` of the double layer potential
/// of the triangle with unit density, that is the integral of `d^2 G_0 / dn_p dn_q`. For a point
/// in the plane of the triangle this is the Hadamard finite part. The derivative of the solid
/// angle is written as a line integral along the edges, each of which is evaluated in closed
/// form.
pub fn hypersingular(
    point: &[f64; 3],
    target_normal: &[f64; 3],
    vertices: &[[f64; 3]; 3],
    tolerance: f64,
) -> Result<f64, KernelError> {
    let mut sum = 0.0;
    for (start, end) in EDGES {
        let a = &vertices[start];
        let b = &vertices[end];
        let edge = sub(b, a);
        let length = norm(&edge);
        if length == 0.0 {
            return Err(KernelError::DegenerateElement);
        }
        let tangent = [edge[0] / length, edge[1] / length, edge[2] / length];

        let to_a = sub(a, point);
        let r_a = norm(&to_a);
        let r_b = norm(&sub(b, point));
        let u = dot(&to_a, &tangent);
        let dist_squared = (r_a * r_a - u * u).max(0.0);

        if dist_squared <= tolerance * tolerance {
            // On the line through the edge: the point is either on the edge or the
            // contribution vanishes.
            if u <= tolerance && u + length >= -tolerance {
                return Err(KernelError::OnEdge);
            }
            continue;
        }

        let moment = dot(target_normal, &cross(&tangent, &to_a));
        sum += moment / dist_squared * ((u + length) / r_b - u / r_a);
    }
    Ok(M_INV_4PI * sum)
}
