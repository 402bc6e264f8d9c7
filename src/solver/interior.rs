//! The interior Helmholtz problem in the region enclosed by the surface
use crate::assembly::{BoundaryAssembler, CoupledSystem};
use crate::boundary::{BoundaryCondition, IncidentField};
use crate::diagnostics::{GeometryReport, GeometryValidator};
use crate::field::FieldEvaluator;
use crate::grid::BoundaryMesh;
use crate::kernel::{KernelEvaluator, QuadratureKernelEvaluator};
use crate::options::SolverOptions;
use crate::quadrature::QuadratureRules;
use crate::solver::linear::{BoundaryData, LinearSolver, LuEliminationSolver};
use crate::types::{c64, Domain, Result};
use log::info;
use ndarray::Array1;

/// One interior problem on a given mesh.
///
/// The normals of the mesh point out of the domain, and `v` is the derivative along them.
#[derive(Debug, Clone)]
pub struct InteriorProblem {
    /// Wavenumber k
    pub wavenumber: f64,
    /// Boundary condition on every element
    pub condition: BoundaryCondition,
    /// Field of the sources inside the surface, at the centroids and the interior points
    pub incident: IncidentField,
    /// Points inside the surface at which the field is evaluated
    pub points: Vec<[f64; 3]>,
}

impl InteriorProblem {
    /// Create a problem.
    pub fn new(
        wavenumber: f64,
        condition: BoundaryCondition,
        incident: IncidentField,
        points: Vec<[f64; 3]>,
    ) -> Self {
        Self {
            wavenumber,
            condition,
            incident,
            points,
        }
    }
}

/// Boundary data and interior field of a solved problem.
#[derive(Debug, Clone)]
pub struct InteriorSolution {
    /// Potential and normal derivative at the element centroids
    pub boundary: BoundaryData,
    /// Total potential at the interior points
    pub interior_phi: Array1<c64>,
    /// Findings of the geometry diagnostics
    pub report: GeometryReport,
}

/// Solver for interior Helmholtz problems on one mesh.
///
/// Only the direct boundary integral equation `(M + I / 2) phi = L v + phi_inc` is used. Its
/// singular wavenumbers are the true resonances of the enclosed region, so no coupling with the
/// hypersingular equation is needed. At a resonance the linear solve reports a singular matrix
/// or returns a large solution.
pub struct InteriorHelmholtzSolver<
    'a,
    K: KernelEvaluator = QuadratureKernelEvaluator,
    S: LinearSolver = LuEliminationSolver,
> {
    mesh: &'a BoundaryMesh,
    options: SolverOptions,
    kernel: K,
    linear_solver: S,
}

impl<'a> InteriorHelmholtzSolver<'a> {
    /// Create a solver with the quadrature kernel evaluator and the direct linear solver.
    pub fn new(mesh: &'a BoundaryMesh, options: SolverOptions) -> Self {
        let kernel = QuadratureKernelEvaluator::new(options.kernel_tolerance());
        Self::with_components(mesh, options, kernel, LuEliminationSolver)
    }
}

impl<'a, K: KernelEvaluator, S: LinearSolver> InteriorHelmholtzSolver<'a, K, S> {
    /// Create a solver with a custom kernel evaluator and linear solver.
    ///
    /// As for the exterior solver, the kernel evaluator is used as given.
    pub fn with_components(
        mesh: &'a BoundaryMesh,
        options: SolverOptions,
        kernel: K,
        linear_solver: S,
    ) -> Self {
        Self {
            mesh,
            options,
            kernel,
            linear_solver,
        }
    }

    /// The mesh.
    pub fn mesh(&self) -> &BoundaryMesh {
        self.mesh
    }

    /// The options.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Run every geometry check, including the orientation diagnostics.
    pub fn validate(&self, problem: &InteriorProblem) -> Result<GeometryReport> {
        let rules = QuadratureRules::new();
        self.run_diagnostics(problem, &rules)
    }

    /// Assemble the boundary system without running the geometry diagnostics.
    pub fn assemble(&self, problem: &InteriorProblem) -> Result<CoupledSystem> {
        self.validator().check_parameters(
            problem.wavenumber,
            &problem.condition,
            &problem.incident,
            &problem.points,
        )?;
        let rules = QuadratureRules::new();
        self.boundary_assembler(&rules)
            .assemble(problem.wavenumber, c64::new(0.0, 0.0), &problem.incident)
    }

    /// Solve a problem.
    ///
    /// Runs the geometry checks with the points expected inside the surface, assembles and
    /// solves the boundary system and evaluates the field at the interior points.
    pub fn solve(&self, problem: &InteriorProblem) -> Result<InteriorSolution> {
        let rules = QuadratureRules::new();
        let report = self.run_diagnostics(problem, &rules)?;

        let system = self.boundary_assembler(&rules).assemble(
            problem.wavenumber,
            c64::new(0.0, 0.0),
            &problem.incident,
        )?;

        info!("Solving for {} interior boundary unknowns", system.size());
        let boundary = self.linear_solver.solve(&system, &problem.condition)?;

        let interior_phi = FieldEvaluator::new(
            self.mesh,
            &self.kernel,
            &rules.regular,
            self.options.parallel(),
        )
        .with_domain(Domain::Interior)
        .evaluate(
            problem.wavenumber,
            &boundary,
            &problem.points,
            &problem.incident.exterior_phi,
        )?;

        Ok(InteriorSolution {
            boundary,
            interior_phi,
            report,
        })
    }

    fn validator(&self) -> GeometryValidator<'_> {
        GeometryValidator::new(self.mesh, &self.options).with_domain(Domain::Interior)
    }

    fn run_diagnostics(
        &self,
        problem: &InteriorProblem,
        rules: &QuadratureRules,
    ) -> Result<GeometryReport> {
        let validator = self.validator();
        let mut report = validator.validate(
            problem.wavenumber,
            &problem.condition,
            &problem.incident,
            &problem.points,
        )?;
        validator.orientation_diagnostics(&self.kernel, rules, &problem.points, &mut report)?;
        info!(
            "Geometry checks passed with {} warning(s)",
            report.warnings.len()
        );
        Ok(report)
    }

    fn boundary_assembler<'b>(&'b self, rules: &'b QuadratureRules) -> BoundaryAssembler<'b, K> {
        BoundaryAssembler::new(self.mesh, &self.kernel, rules, self.options.parallel())
            .with_domain(Domain::Interior)
    }
}
