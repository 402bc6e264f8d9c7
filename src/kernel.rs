//! Element integrals of the Helmholtz boundary operators
//!
//! A [`KernelEvaluator`] computes, for one collocation point and one flat source triangle, the
//! contributions of the single layer (L), double layer (M), adjoint double layer (Mt) and
//! hypersingular (N) operators. With `G(r) = exp(ikr) / (4 pi r)`:
//!
//! - L = integral of G
//! - M = integral of dG/dn_q (normal of the source element)
//! - Mt = integral of dG/dn_p (normal at the collocation point)
//! - N = integral of d^2G / dn_p dn_q
pub mod element_integrals;
pub mod flat_triangle;
pub mod helmholtz_3d;

pub use element_integrals::QuadratureKernelEvaluator;

use crate::quadrature::QuadratureRule;
use crate::types::{c64, KernelError};
use num::Zero;
use std::ops::BitOr;

/// A set of requested operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorRequest(u8);

impl OperatorRequest {
    /// Nothing.
    pub const NONE: Self = Self(0);
    /// Single layer operator L.
    pub const SINGLE_LAYER: Self = Self(1);
    /// Double layer operator M.
    pub const DOUBLE_LAYER: Self = Self(2);
    /// Adjoint double layer operator Mt.
    pub const ADJOINT_DOUBLE_LAYER: Self = Self(4);
    /// Hypersingular operator N.
    pub const HYPERSINGULAR: Self = Self(8);
    /// The operators of the representation formula, L and M.
    pub const POTENTIAL: Self = Self(1 | 2);
    /// All four operators.
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    /// Check whether every operator of `other` is requested.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OperatorRequest {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Operator contributions of one source element. Operators that were not requested are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementOperators {
    /// L
    pub single_layer: c64,
    /// M
    pub double_layer: c64,
    /// Mt
    pub adjoint_double_layer: c64,
    /// N
    pub hypersingular: c64,
}

impl ElementOperators {
    /// All contributions zero.
    pub fn zero() -> Self {
        Self {
            single_layer: c64::zero(),
            double_layer: c64::zero(),
            adjoint_double_layer: c64::zero(),
            hypersingular: c64::zero(),
        }
    }

    fn is_finite(&self) -> bool {
        [
            self.single_layer,
            self.double_layer,
            self.adjoint_double_layer,
            self.hypersingular,
        ]
        .iter()
        .all(|z| z.re.is_finite() && z.im.is_finite())
    }
}

/// Point at which the operators are evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollocationPoint {
    /// Position
    pub point: [f64; 3],
    /// Unit normal. Only used by Mt and N.
    pub normal: [f64; 3],
}

impl CollocationPoint {
    /// Create a collocation point.
    pub fn new(point: [f64; 3], normal: [f64; 3]) -> Self {
        Self { point, normal }
    }

    /// A point away from the surface, for which only L and M are evaluated.
    pub fn exterior(point: [f64; 3]) -> Self {
        Self {
            point,
            normal: [0.0, 0.0, 1.0],
        }
    }
}

/// Evaluator of element integrals.
pub trait KernelEvaluator: Sync {
    /// Evaluate the requested operators of one source element at a collocation point.
    ///
    /// `on_element` is set when the collocation point lies on the source element; `rule` is
    /// the quadrature rule selected for that case.
    fn evaluate(
        &self,
        wavenumber: c64,
        collocation: &CollocationPoint,
        source: &[[f64; 3]; 3],
        on_element: bool,
        rule: &QuadratureRule,
        request: OperatorRequest,
    ) -> Result<ElementOperators, KernelError>;
}
