//! Quadrature rules on the reference triangle
//!
//! The reference triangle has the vertices (0, 0), (1, 0) and (0, 1). Weights of every rule sum
//! to one, so integrals over a physical triangle are obtained by scaling with its area.
pub mod simplex_rules;
pub mod singular;
pub mod types;

pub use types::{QuadratureRule, QuadratureRules};
