//! Assembly of the coupled boundary system and of the exterior operators
pub mod boundary;
pub mod potential;

pub use boundary::{BoundaryAssembler, CoupledSystem};
pub use potential::{ExteriorOperators, PotentialAssembler};
