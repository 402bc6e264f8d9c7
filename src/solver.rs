//! Linear solvers and the solver pipelines
pub mod exterior;
pub mod interior;
pub mod linear;

pub use exterior::{ExteriorHelmholtzSolver, ExteriorProblem, SolutionField};
pub use interior::{InteriorHelmholtzSolver, InteriorProblem, InteriorSolution};
pub use linear::{BoundaryData, LinearSolver, LuEliminationSolver};
