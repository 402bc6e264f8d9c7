//! Quadrature based evaluation of element integrals on flat triangles.
use crate::grid::geometry::{
    centroid, dot, norm, reference_to_physical, sub, triangle_area, unit_normal,
};
use crate::kernel::flat_triangle;
use crate::kernel::helmholtz_3d::{greens_fct_derivatives, greens_fct_dynamic_part};
use crate::kernel::{CollocationPoint, ElementOperators, KernelEvaluator, OperatorRequest};
use crate::quadrature::QuadratureRule;
use crate::types::{c64, KernelError};
use num::Zero;

/// Kernel evaluator for flat triangles.
///
/// Off the element, L, M and Mt are integrated with the supplied rule. On the element, M and Mt
/// vanish and L is split into the closed-form Laplace part plus the bounded remainder
/// `(exp(ikr) - 1) / (4 pi r)`, which is integrated with the rule. N is always the closed-form
/// Laplace part plus the weakly singular difference between the Helmholtz and Laplace kernels.
///
/// All geometry is shifted to the centroid of the source element before it is used, so the
/// results do not depend on where the mesh sits in space.
#[derive(Debug, Clone)]
pub struct QuadratureKernelEvaluator {
    tolerance: f64,
}

impl QuadratureKernelEvaluator {
    /// Create a new evaluator.
    ///
    /// `tolerance` is the smallest admissible distance between the collocation point and a
    /// quadrature point, the plane of an on-element source or the line through an edge.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// The tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for QuadratureKernelEvaluator {
    fn default() -> Self {
        Self::new(1e-12)
    }
}

impl KernelEvaluator for QuadratureKernelEvaluator {
    fn evaluate(
        &self,
        wavenumber: c64,
        collocation: &CollocationPoint,
        source: &[[f64; 3]; 3],
        on_element: bool,
        rule: &QuadratureRule,
        request: OperatorRequest,
    ) -> Result<ElementOperators, KernelError> {
        // Element-local coordinates
        let origin = centroid(source);
        let local = [
            sub(&source[0], &origin),
            sub(&source[1], &origin),
            sub(&source[2], &origin),
        ];
        let local_point = sub(&collocation.point, &origin);
        let source = &local;
        let p = &local_point;

        let area = triangle_area(source);
        let source_normal = unit_normal(source).ok_or(KernelError::DegenerateElement)?;
        let n_p = &collocation.normal;

        let want_l = request.contains(OperatorRequest::SINGLE_LAYER);
        let want_m = request.contains(OperatorRequest::DOUBLE_LAYER) && !on_element;
        let want_mt = request.contains(OperatorRequest::ADJOINT_DOUBLE_LAYER) && !on_element;
        let want_n = request.contains(OperatorRequest::HYPERSINGULAR);
        let dynamic = !wavenumber.is_zero();

        if on_element {
            // Rounding of the absolute coordinates bounds how well the point can lie in the plane.
            let magnitude = collocation
                .point
                .iter()
                .chain(origin.iter())
                .fold(0.0_f64, |m, x| m.max(x.abs()));
            let limit = self.tolerance * (1.0 + area.sqrt()) + 16.0 * f64::EPSILON * magnitude;
            let distance = dot(p, &source_normal).abs();
            if distance > limit {
                return Err(KernelError::OffPlane { distance });
            }
        }

        let mut result = ElementOperators::zero();
        let needs_quadrature = want_l || want_m || want_mt || (want_n && dynamic);

        if needs_quadrature {
            let mut l = c64::zero();
            let mut m = c64::zero();
            let mut mt = c64::zero();
            let mut n = c64::zero();
            let normal_product = dot(n_p, &source_normal);

            for (point, weight) in rule.iter() {
                let q = reference_to_physical(source, point[0], point[1]);
                let diff = sub(&q, p);
                let r = norm(&diff);
                if r < self.tolerance {
                    return Err(KernelError::CoincidentQuadraturePoint { distance: r });
                }
                let w = weight * area;
                // dr/dn_p and dr/dn_q
                let a = -dot(&diff, n_p) / r;
                let b = dot(&diff, &source_normal) / r;

                if on_element {
                    if want_l && dynamic {
                        l += greens_fct_dynamic_part(wavenumber, r).value * w;
                    }
                } else {
                    let g = greens_fct_derivatives(wavenumber, r);
                    if want_l {
                        l += g.value * w;
                    }
                    if want_m {
                        m += g.first * (b * w);
                    }
                    if want_mt {
                        mt += g.first * (a * w);
                    }
                }

                if want_n && dynamic {
                    let d = greens_fct_dynamic_part(wavenumber, r);
                    n += (d.second * (a * b) + d.first * ((-normal_product - a * b) / r)) * w;
                }
            }
            result.single_layer = l;
            result.double_layer = m;
            result.adjoint_double_layer = mt;
            result.hypersingular = n;
        }

        if want_l && on_element {
            result.single_layer +=
                flat_triangle::single_layer_in_plane(p, source, &source_normal, self.tolerance)?;
        }
        if want_n {
            result.hypersingular += flat_triangle::hypersingular(p, n_p, source, self.tolerance)?;
        }

        if result.is_finite() {
            Ok(result)
        } else {
            Err(KernelError::NonFinite)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::helmholtz_3d::M_INV_4PI;
    use crate::quadrature::QuadratureRules;
    use approx::*;

    fn source() -> [[f64; 3]; 3] {
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    fn test_far_field_is_point_source() {
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let v = source();
        let c = centroid(&v);
        let p = [c[0], c[1], 50.0];
        let k = c64::new(0.05, 0.0);
        let ops = evaluator
            .evaluate(
                k,
                &CollocationPoint::new(p, [0.0, 0.0, 1.0]),
                &v,
                false,
                &rules.regular,
                OperatorRequest::ALL,
            )
            .unwrap();
        let g = greens_fct_derivatives(k, 50.0 - c[2]);
        let area = 0.5;
        assert_relative_eq!(ops.single_layer.re, g.value.re * area, max_relative = 1E-3);
        assert_relative_eq!(ops.single_layer.im, g.value.im * area, max_relative = 1E-3);
        // Source normal points towards p, so dr/dn_q = -1.
        assert_relative_eq!(ops.double_layer.re, -g.first.re * area, max_relative = 1E-3);
        // dr/dn_p = 1.
        assert_relative_eq!(ops.adjoint_double_layer.re, g.first.re * area, max_relative = 1E-3);
        // d^2 r / dn_p dn_q = 0 on the axis.
        assert_relative_eq!(ops.hypersingular.re, -g.second.re * area, max_relative = 1E-3);
    }

    #[test]
    fn test_on_element_laplace() {
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let v = source();
        let c = centroid(&v);
        let collocation = CollocationPoint::new(c, [0.0, 0.0, 1.0]);
        let ops = evaluator
            .evaluate(
                c64::zero(),
                &collocation,
                &v,
                true,
                &rules.singular,
                OperatorRequest::ALL,
            )
            .unwrap();
        assert_eq!(ops.double_layer, c64::zero());
        assert_eq!(ops.adjoint_double_layer, c64::zero());
        assert!(ops.single_layer.re > 0.0);
        assert_eq!(ops.single_layer.im, 0.0);
        // Finite part of the integral of 1 / (4 pi r^3) is negative.
        assert!(ops.hypersingular.re < 0.0);
    }

    #[test]
    fn test_on_element_dynamic_part() {
        // For small k the Helmholtz single layer tends to the Laplace one plus i k area / (4 pi).
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let v = source();
        let collocation = CollocationPoint::new(centroid(&v), [0.0, 0.0, 1.0]);
        let k = 1E-3;
        let ops0 = evaluator
            .evaluate(
                c64::zero(),
                &collocation,
                &v,
                true,
                &rules.singular,
                OperatorRequest::SINGLE_LAYER,
            )
            .unwrap();
        let ops = evaluator
            .evaluate(
                c64::new(k, 0.0),
                &collocation,
                &v,
                true,
                &rules.singular,
                OperatorRequest::SINGLE_LAYER,
            )
            .unwrap();
        assert_relative_eq!(ops.single_layer.re, ops0.single_layer.re, max_relative = 1E-5);
        assert_relative_eq!(ops.single_layer.im, k * 0.5 * M_INV_4PI, max_relative = 1E-5);
    }

    #[test]
    fn test_translated_element() {
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let k = c64::new(1.5, 0.0);
        // A tilted element, so rounding of the shifted centroid leaves the plane.
        let v = [[0.0, 0.0, 0.0], [0.3, 0.1, 0.05], [0.05, 0.25, 0.2]];
        let normal = unit_normal(&v).unwrap();
        let c = centroid(&v);
        let near = CollocationPoint::new([0.5, 0.4, 0.3], normal);
        let reference = [
            evaluator
                .evaluate(
                    k,
                    &CollocationPoint::new(c, normal),
                    &v,
                    true,
                    &rules.singular,
                    OperatorRequest::ALL,
                )
                .unwrap(),
            evaluator
                .evaluate(k, &near, &v, false, &rules.regular, OperatorRequest::ALL)
                .unwrap(),
        ];

        for offset in [1e4, 1e5, -3e6] {
            let shift = |x: &[f64; 3]| [x[0] + offset, x[1] + offset, x[2] + offset];
            let moved = [shift(&v[0]), shift(&v[1]), shift(&v[2])];
            let results = [
                // Centroid of the moved element and moved centroid of the unmoved one
                evaluator.evaluate(
                    k,
                    &CollocationPoint::new(centroid(&moved), normal),
                    &moved,
                    true,
                    &rules.singular,
                    OperatorRequest::ALL,
                ),
                evaluator.evaluate(
                    k,
                    &CollocationPoint::new(shift(&c), normal),
                    &moved,
                    true,
                    &rules.singular,
                    OperatorRequest::ALL,
                ),
            ];
            for ops in results {
                let ops = ops.unwrap();
                assert_relative_eq!(
                    ops.single_layer.re,
                    reference[0].single_layer.re,
                    max_relative = 1E-6
                );
                assert_relative_eq!(
                    ops.hypersingular.re,
                    reference[0].hypersingular.re,
                    max_relative = 1E-6
                );
            }
            let ops = evaluator
                .evaluate(
                    k,
                    &CollocationPoint::new(shift(&near.point), normal),
                    &moved,
                    false,
                    &rules.regular,
                    OperatorRequest::ALL,
                )
                .unwrap();
            assert_relative_eq!(
                ops.double_layer.re,
                reference[1].double_layer.re,
                max_relative = 1E-6
            );
            assert_relative_eq!(
                ops.hypersingular.re,
                reference[1].hypersingular.re,
                max_relative = 1E-6
            );
        }
    }

    #[test]
    fn test_request_subset() {
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let v = source();
        let collocation = CollocationPoint::new([0.2, 0.3, 1.0], [0.0, 0.0, 1.0]);
        let k = c64::new(2.0, 0.0);
        let all = evaluator
            .evaluate(k, &collocation, &v, false, &rules.regular, OperatorRequest::ALL)
            .unwrap();
        let potential = evaluator
            .evaluate(k, &collocation, &v, false, &rules.regular, OperatorRequest::POTENTIAL)
            .unwrap();
        assert_eq!(all.single_layer, potential.single_layer);
        assert_eq!(all.double_layer, potential.double_layer);
        assert_eq!(potential.adjoint_double_layer, c64::zero());
        assert_eq!(potential.hypersingular, c64::zero());
    }

    #[test]
    fn test_failures() {
        let rules = QuadratureRules::new();
        let evaluator = QuadratureKernelEvaluator::default();
        let v = source();

        let off_plane = CollocationPoint::new([0.3, 0.3, 0.1], [0.0, 0.0, 1.0]);
        assert!(matches!(
            evaluator.evaluate(
                c64::zero(),
                &off_plane,
                &v,
                true,
                &rules.singular,
                OperatorRequest::ALL
            ),
            Err(KernelError::OffPlane { .. })
        ));

        let q = reference_to_physical(&v, rules.regular.points[0][0], rules.regular.points[0][1]);
        assert!(matches!(
            evaluator.evaluate(
                c64::zero(),
                &CollocationPoint::exterior(q),
                &v,
                false,
                &rules.regular,
                OperatorRequest::POTENTIAL
            ),
            Err(KernelError::CoincidentQuadraturePoint { .. })
        ));

        let degenerate = [[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert_eq!(
            evaluator.evaluate(
                c64::zero(),
                &CollocationPoint::exterior([0.0, 0.0, 1.0]),
                &degenerate,
                false,
                &rules.regular,
                OperatorRequest::POTENTIAL
            ),
            Err(KernelError::DegenerateElement)
        );
    }
}
