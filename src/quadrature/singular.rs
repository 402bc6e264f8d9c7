//! Rule for integrals over the element that contains the collocation point.
//!
//! The reference triangle is split into the three sub-triangles formed by its centroid and two
//! of its vertices. The regular rule is mapped into each of them with a third of its weight, so
//! no point of the result lies at the centroid itself.
use crate::quadrature::types::QuadratureRule;

const REFERENCE_VERTICES: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
const REFERENCE_CENTROID: [f64; 2] = [1.0 / 3.0, 1.0 / 3.0];

/// Create the map from the reference triangle onto the sub-triangle (centroid, v0, v1).
///
/// (0, 0) is mapped to the centroid, (1, 0) to reference vertex `v0` and (0, 1) to reference
/// vertex `v1`.
fn create_subtriangle_mapper(v0: usize, v1: usize) -> impl Fn([f64; 2]) -> [f64; 2] {
    let c = REFERENCE_CENTROID;
    let p0 = REFERENCE_VERTICES[v0];
    let p1 = REFERENCE_VERTICES[v1];

    let col0 = [p0[0] - c[0], p0[1] - c[1]];
    let col1 = [p1[0] - c[0], p1[1] - c[1]];

    move |point: [f64; 2]| -> [f64; 2] {
        [
            c[0] + col0[0] * point[0] + col1[0] * point[1],
            c[1] + col0[1] * point[0] + col1[1] * point[1],
        ]
    }
}

/// Derive the singular rule from a regular rule.
///
/// The result has three times as many points as `regular`.
pub fn singular_rule(regular: &QuadratureRule) -> QuadratureRule {
    let npoints = 3 * regular.npoints();
    let mut points = Vec::with_capacity(npoints);
    let mut weights = Vec::with_capacity(npoints);

    for (v0, v1) in [(0, 1), (1, 2), (2, 0)] {
        let mapper = create_subtriangle_mapper(v0, v1);
        for (point, weight) in regular.iter() {
            points.push(mapper(*point));
            weights.push(weight / 3.0);
        }
    }

    QuadratureRule { points, weights }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quadrature::simplex_rules::regular_rule;
    use crate::quadrature::simplex_rules::test::{apply_rule, normalised_monomial_integral};
    use approx::*;

    #[test]
    fn test_size_and_weights() {
        let rule = singular_rule(&regular_rule());
        assert_eq!(rule.npoints(), 21);
        assert_relative_eq!(rule.weights.iter().sum::<f64>(), 1.0, max_relative = 1E-14);
    }

    #[test]
    fn test_exact_up_to_degree_five() {
        let rule = singular_rule(&regular_rule());
        for degree in 0..=5 {
            for i in 0..=degree {
                assert_relative_eq!(
                    apply_rule(&rule, i, degree - i),
                    normalised_monomial_integral(i, degree - i),
                    max_relative = 1E-12
                );
            }
        }
    }

    #[test]
    fn test_no_point_at_centroid() {
        let rule = singular_rule(&regular_rule());
        for p in &rule.points {
            let d = f64::hypot(p[0] - 1.0 / 3.0, p[1] - 1.0 / 3.0);
            assert!(d > 1E-3);
            assert!(p[0] >= 0.0 && p[1] >= 0.0 && p[0] + p[1] <= 1.0);
        }
    }
}
