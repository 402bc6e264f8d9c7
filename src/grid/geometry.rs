//! Geometric primitives on points in three dimensions

/// Difference `a - b`.
#[inline]
pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scalar product.
#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product.
#[inline]
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm.
#[inline]
pub fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    norm(&sub(a, b))
}

/// Centroid of a triangle.
pub fn centroid(v: &[[f64; 3]; 3]) -> [f64; 3] {
    let third = 1.0 / 3.0;
    [
        third * (v[0][0] + v[1][0] + v[2][0]),
        third * (v[0][1] + v[1][1] + v[2][1]),
        third * (v[0][2] + v[1][2] + v[2][2]),
    ]
}

/// Area of a triangle.
pub fn triangle_area(v: &[[f64; 3]; 3]) -> f64 {
    0.5 * norm(&cross(&sub(&v[1], &v[0]), &sub(&v[2], &v[0])))
}

/// Unit normal of a triangle.
///
/// The normal follows the right hand rule with respect to the vertex order, so a triangle that
/// is counter-clockwise when viewed from outside has an outward normal. Returns `None` for a
/// degenerate triangle.
pub fn unit_normal(v: &[[f64; 3]; 3]) -> Option<[f64; 3]> {
    let n = cross(&sub(&v[1], &v[0]), &sub(&v[2], &v[0]));
    let length = norm(&n);
    if length > 0.0 && length.is_finite() {
        Some([n[0] / length, n[1] / length, n[2] / length])
    } else {
        None
    }
}

/// Map a point of the reference triangle (0, 0), (1, 0), (0, 1) onto a physical triangle.
#[inline]
pub fn reference_to_physical(v: &[[f64; 3]; 3], x: f64, y: f64) -> [f64; 3] {
    let w0 = 1.0 - x - y;
    [
        w0 * v[0][0] + x * v[1][0] + y * v[2][0],
        w0 * v[0][1] + x * v[1][1] + y * v[2][1],
        w0 * v[0][2] + x * v[1][2] + y * v[2][2],
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_normal_follows_winding() {
        let v = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let n = unit_normal(&v).unwrap();
        assert_relative_eq!(n[2], 1.0);

        let w = [v[0], v[2], v[1]];
        let n = unit_normal(&w).unwrap();
        assert_relative_eq!(n[2], -1.0);
    }

    #[test]
    fn test_area_and_centroid() {
        let v = [[0.0, 0.0, 1.0], [2.0, 0.0, 1.0], [0.0, 3.0, 1.0]];
        assert_relative_eq!(triangle_area(&v), 3.0);
        let c = centroid(&v);
        assert_relative_eq!(c[0], 2.0 / 3.0);
        assert_relative_eq!(c[1], 1.0);
        assert_relative_eq!(c[2], 1.0);
    }

    #[test]
    fn test_degenerate_normal() {
        let v = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
        assert!(unit_normal(&v).is_none());
    }

    #[test]
    fn test_reference_map() {
        let v = [[1.0, 1.0, 0.0], [3.0, 1.0, 0.0], [1.0, 2.0, 5.0]];
        assert_eq!(reference_to_physical(&v, 0.0, 0.0), v[0]);
        assert_eq!(reference_to_physical(&v, 1.0, 0.0), v[1]);
        assert_eq!(reference_to_physical(&v, 0.0, 1.0), v[2]);
        assert_relative_eq!(distance(&v[0], &v[1]), 2.0);
    }
}
