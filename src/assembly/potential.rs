//! Assembly of the operators that map boundary data to exterior points
use crate::grid::BoundaryMesh;
use crate::kernel::{CollocationPoint, KernelEvaluator, OperatorRequest};
use crate::quadrature::QuadratureRule;
use crate::solver::BoundaryData;
use crate::types::{c64, BemError, Result, SolverError};
use log::info;
use ndarray::{Array1, Array2};
use rayon::prelude::*;

/// Single and double layer operators from the boundary to a set of exterior points.
#[derive(Debug, Clone, PartialEq)]
pub struct ExteriorOperators {
    /// L, one row per exterior point and one column per element
    pub single_layer: Array2<c64>,
    /// M, one row per exterior point and one column per element
    pub double_layer: Array2<c64>,
}

impl ExteriorOperators {
    /// Number of exterior points.
    pub fn npoints(&self) -> usize {
        self.single_layer.nrows()
    }

    /// Evaluate the representation formula `phi_inc - L v + M phi` at every point.
    pub fn evaluate(&self, boundary: &BoundaryData, incident: &[c64]) -> Result<Array1<c64>> {
        let n = self.single_layer.ncols();
        if boundary.phi.len() != n || boundary.velocity.len() != n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                got: boundary.phi.len().min(boundary.velocity.len()),
            }
            .into());
        }
        if incident.len() != self.npoints() {
            return Err(SolverError::DimensionMismatch {
                expected: self.npoints(),
                got: incident.len(),
            }
            .into());
        }
        let scattered = self.double_layer.dot(&boundary.phi) - self.single_layer.dot(&boundary.velocity);
        Ok(Array1::from_iter(
            incident.iter().zip(scattered.iter()).map(|(&i, &s)| i + s),
        ))
    }
}

/// Assembler of the exterior operators for one mesh.
pub struct PotentialAssembler<'a, K: KernelEvaluator> {
    mesh: &'a BoundaryMesh,
    kernel: &'a K,
    rule: &'a QuadratureRule,
    parallel: bool,
}

impl<'a, K: KernelEvaluator> PotentialAssembler<'a, K> {
    /// Create an assembler. Exterior points never lie on an element, so only the regular rule
    /// is needed.
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
        }
    }

    /// L and M contributions of every element at one exterior point.
    pub fn assemble_point(
        &self,
        index: usize,
        point: &[f64; 3],
        wavenumber: c64,
    ) -> Result<(Vec<c64>, Vec<c64>)> {
        let collocation = CollocationPoint::exterior(*point);
        let n = self.mesh.number_of_elements();
        let mut single_layer = Vec::with_capacity(n);
        let mut double_layer = Vec::with_capacity(n);
        for element in 0..n {
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
            single_layer.push(ops.single_layer);
            double_layer.push(ops.double_layer);
        }
        Ok((single_layer, double_layer))
    }

    /// Assemble L and M for all points.
    pub fn assemble(&self, wavenumber: f64, points: &[[f64; 3]]) -> Result<ExteriorOperators> {
        let n = self.mesh.number_of_elements();
        let npoints = points.len();
        info!("Assembling exterior operators for {npoints} points and {n} elements");
        let k = c64::new(wavenumber, 0.0);

        let rows = if self.parallel {
            points
                .par_iter()
                .enumerate()
                .map(|(index, point)| self.assemble_point(index, point, k))
                .collect::<Result<Vec<_>>>()?
        } else {
            points
                .iter()
                .enumerate()
                .map(|(index, point)| self.assemble_point(index, point, k))
                .collect::<Result<Vec<_>>>()?
        };

        let mut single_layer = Array2::<c64>::zeros((npoints, n));
        let mut double_layer = Array2::<c64>::zeros((npoints, n));
        for (i, (l_row, m_row)) in rows.into_iter().enumerate() {
            for (j, (l, m)) in l_row.into_iter().zip(m_row).enumerate() {
                single_layer[[i, j]] = l;
                double_layer[[i, j]] = m;
            }
        }
        Ok(ExteriorOperators {
            single_layer,
            double_layer,
        })
    }
}
