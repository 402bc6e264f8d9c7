//! Acoustic BEM
//!
//! Collocation boundary element solver for the Helmholtz problem on closed surfaces made of
//! flat triangles. For the exterior problem the direct and hypersingular boundary integral
//! equations are combined with a Burton-Miller coupling so that the discrete system stays
//! uniquely solvable at every real wavenumber. The interior problem uses the direct equation
//! alone.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod boundary;
pub mod diagnostics;
pub mod field;
pub mod grid;
pub mod kernel;
pub mod options;
pub mod quadrature;
pub mod shapes;
pub mod solver;
pub mod types;

pub use boundary::{BoundaryCondition, ElementCondition, IncidentField};
pub use grid::BoundaryMesh;
pub use options::SolverOptions;
pub use solver::{
    ExteriorHelmholtzSolver, ExteriorProblem, InteriorHelmholtzSolver, InteriorProblem,
    InteriorSolution, SolutionField,
};
pub use types::{BemError, Domain, Result};
