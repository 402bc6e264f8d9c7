//! Evaluation of the field away from the boundary
use crate::grid::BoundaryMesh;
use crate::kernel::{CollocationPoint, KernelEvaluator, OperatorRequest};
use crate::quadrature::QuadratureRule;
use crate::solver::BoundaryData;
use crate::types::{c64, BemError, Domain, Result, SolverError};
use log::info;
use ndarray::Array1;
use rayon::prelude::*;

/// Evaluator of the representation formula `phi(p) = phi_inc(p) - sum L_j v_j + sum M_j phi_j`.
///
/// Points inside the closed surface evaluate to approximately zero. For the interior domain the
/// boundary terms change sign, `phi(p) = phi_inc(p) + sum L_j v_j - sum M_j phi_j`.
pub struct FieldEvaluator<'a, K: KernelEvaluator> {
    mesh: &'a BoundaryMesh,
    kernel: &'a K,
    rule: &'a QuadratureRule,
    parallel: bool,
    domain: Domain,
}

impl<'a, K: KernelEvaluator> FieldEvaluator<'a, K> {
    /// Create an evaluator using the regular quadrature rule.
    pub fn new(
        mesh: &'a BoundaryMesh,
        kernel: &'a K,
        rule: &'a QuadratureRule,
        parallel: bool,
    ) -> Self {
        Self {
            mesh,
            kernel,
            rule,
            parallel,
            domain: Domain::Exterior,
        }
    }

    /// Evaluate the formula of the given side of the surface instead.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Field at one point.
    pub fn evaluate_point(
        &self,
        index: usize,
        point: &[f64; 3],
        wavenumber: c64,
        boundary: &BoundaryData,
        incident: c64,
    ) -> Result<c64> {
        let collocation = CollocationPoint::exterior(*point);
        let mut value = c64::new(0.0, 0.0);
        for element in 0..self.mesh.number_of_elements() {
            let ops = self
                .kernel
                .evaluate(
                    wavenumber,
                    &collocation,
                    &self.mesh.element_vertices(element),
                    false,
                    self.rule,
                    OperatorRequest::POTENTIAL,
                )
                .map_err(|reason| BemError::KernelFailure {
                    collocation: index,
                    source_element: element,
                    reason,
                })?;
            value += ops.double_layer * boundary.phi[element]
                - ops.single_layer * boundary.velocity[element];
        }
        Ok(incident + value * self.domain.sign())
    }

    /// Field at every point.
    pub fn evaluate(
        &self,
        wavenumber: f64,
        boundary: &BoundaryData,
        points: &[[f64; 3]],
        incident: &[c64],
    ) -> Result<Array1<c64>> {
        let n = self.mesh.number_of_elements();
        for got in [boundary.phi.len(), boundary.velocity.len()] {
            if got != n {
                return Err(SolverError::DimensionMismatch { expected: n, got }.into());
            }
        }
        if incident.len() != points.len() {
            return Err(SolverError::DimensionMismatch {
                expected: points.len(),
                got: incident.len(),
            }
            .into());
        }
        info!(
            "Evaluating the field at {} {:?} points",
            points.len(),
            self.domain
        );
        let k = c64::new(wavenumber, 0.0);

        let values = if self.parallel {
            points
                .par_iter()
                .zip(incident.par_iter())
                .enumerate()
                .map(|(index, (point, &inc))| self.evaluate_point(index, point, k, boundary, inc))
                .collect::<Result<Vec<_>>>()?
        } else {
            points
                .iter()
                .zip(incident.iter())
                .enumerate()
                .map(|(index, (point, &inc))| self.evaluate_point(index, point, k, boundary, inc))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Array1::from_vec(values))
    }
}
