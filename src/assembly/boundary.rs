//! Assembly of the Burton-Miller coupled system
use crate::boundary::IncidentField;
use crate::grid::BoundaryMesh;
use crate::kernel::{CollocationPoint, KernelEvaluator, OperatorRequest};
use crate::quadrature::QuadratureRules;
use crate::types::{c64, BemError, Domain, Result};
use log::info;
use ndarray::{Array1, Array2};
use num::Zero;
use rayon::prelude::*;

/// The discretised boundary integral equations.
///
/// The boundary potential `phi` and normal derivative `v` satisfy `b * phi = a * v + rhs`, with
///
/// - `a = L + mu Mt + (mu / 2) I`
/// - `b = M + mu N - (1 / 2) I`
/// - `rhs = -(phi_inc + mu v_inc)`
///
/// for the exterior problem. For the interior problem the jump terms and the right-hand side
/// change sign: `a = L + mu Mt - (mu / 2) I`, `b = M + mu N + (1 / 2) I` and
/// `rhs = phi_inc + mu v_inc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoupledSystem {
    /// Coefficients of the normal derivative
    pub a: Array2<c64>,
    /// Coefficients of the potential
    pub b: Array2<c64>,
    /// Right-hand side
    pub rhs: Array1<c64>,
}

impl CoupledSystem {
    /// Number of unknowns of each kind.
    pub fn size(&self) -> usize {
        self.rhs.len()
    }
}

/// Assembler of the coupled system for one mesh.
pub struct BoundaryAssembler<'a, K: KernelEvaluator> {
    mesh: &'a BoundaryMesh,
    kernel: &'a K,
    rules: &'a QuadratureRules,
    parallel: bool,
    domain: Domain,
}

impl<'a, K: KernelEvaluator> BoundaryAssembler<'a, K> {
    /// Create an assembler for the exterior problem.
    pub fn new(
        mesh: &'a BoundaryMesh,
        kernel: &'a K,
        rules: &'a QuadratureRules,
        parallel: bool,
    ) -> Self {
        Self {
            mesh,
            kernel,
            rules,
            parallel,
            domain: Domain::Exterior,
        }
    }

    /// Assemble the equations of the given side of the surface instead.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Assemble one row of `a` and `b`.
    ///
    /// The collocation point is the centroid of element `row`. The singular rule is used for
    /// the element itself and the regular rule for every other element.
    pub fn assemble_row(
        &self,
        row: usize,
        wavenumber: c64,
        coupling: c64,
    ) -> Result<(Vec<c64>, Vec<c64>)> {
        let n = self.mesh.number_of_elements();
        let collocation = CollocationPoint::new(self.mesh.centroid(row), self.mesh.normal(row));
        let request = if coupling.is_zero() {
            OperatorRequest::POTENTIAL
        } else {
            OperatorRequest::ALL
        };

        let mut a_row = Vec::with_capacity(n);
        let mut b_row = Vec::with_capacity(n);
        for column in 0..n {
            let on_element = row == column;
            let ops = self
                .kernel
                .evaluate(
                    wavenumber,
                    &collocation,
                    &self.mesh.element_vertices(column),
                    on_element,
                    self.rules.rule(on_element),
                    request,
                )
                .map_err(|reason| BemError::KernelFailure {
                    collocation: row,
                    source_element: column,
                    reason,
                })?;
            a_row.push(ops.single_layer + coupling * ops.adjoint_double_layer);
            b_row.push(ops.double_layer + coupling * ops.hypersingular);
        }
        let jump = 0.5 * self.domain.sign();
        a_row[row] += coupling * jump;
        b_row[row] -= jump;
        Ok((a_row, b_row))
    }

    /// Assemble the coupled system.
    pub fn assemble(
        &self,
        wavenumber: f64,
        coupling: c64,
        incident: &IncidentField,
    ) -> Result<CoupledSystem> {
        let n = self.mesh.number_of_elements();
        info!(
            "Assembling {:?} system with {n} elements (k = {wavenumber}, mu = {coupling})",
            self.domain
        );
        let k = c64::new(wavenumber, 0.0);

        let rows = if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|row| self.assemble_row(row, k, coupling))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..n)
                .map(|row| self.assemble_row(row, k, coupling))
                .collect::<Result<Vec<_>>>()?
        };

        let mut a = Array2::<c64>::zeros((n, n));
        let mut b = Array2::<c64>::zeros((n, n));
        for (i, (a_row, b_row)) in rows.into_iter().enumerate() {
            for (j, (a_ij, b_ij)) in a_row.into_iter().zip(b_row).enumerate() {
                a[[i, j]] = a_ij;
                b[[i, j]] = b_ij;
            }
        }

        let rhs = incident
            .boundary_phi
            .iter()
            .zip(incident.boundary_velocity.iter())
            .map(|(&phi, &velocity)| -(phi + coupling * velocity) * self.domain.sign())
            .collect::<Array1<c64>>();

        Ok(CoupledSystem { a, b, rhs })
    }
}
