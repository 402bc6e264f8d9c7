//! Boundary conditions and incident fields
use crate::grid::geometry::dot;
use crate::grid::BoundaryMesh;
use crate::kernel::helmholtz_3d::greens_fct_gradient;
use crate::types::{c64, ParameterError, Result};
use num::{One, Zero};

/// Affine condition `alpha * phi + beta * v = value` on one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementCondition {
    /// Coefficient of the potential
    pub alpha: c64,
    /// Coefficient of the normal derivative
    pub beta: c64,
    /// Right-hand side
    pub value: c64,
}

impl ElementCondition {
    /// Create a condition.
    pub fn new(alpha: c64, beta: c64, value: c64) -> Self {
        Self { alpha, beta, value }
    }

    /// Prescribed potential.
    pub fn dirichlet(value: c64) -> Self {
        Self::new(c64::one(), c64::zero(), value)
    }

    /// Prescribed normal derivative.
    pub fn neumann(value: c64) -> Self {
        Self::new(c64::zero(), c64::one(), value)
    }

    /// `max(|alpha|, |beta|) > epsilon`
    pub fn is_well_posed(&self, epsilon: f64) -> bool {
        self.alpha.norm().max(self.beta.norm()) > epsilon
    }
}

/// Boundary condition with one [`ElementCondition`] per mesh element.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCondition {
    conditions: Vec<ElementCondition>,
}

impl BoundaryCondition {
    /// Create a boundary condition from per-element conditions.
    pub fn new(conditions: Vec<ElementCondition>) -> Self {
        Self { conditions }
    }

    /// Dirichlet condition with the given potentials.
    pub fn dirichlet(values: &[c64]) -> Self {
        Self::new(values.iter().copied().map(ElementCondition::dirichlet).collect())
    }

    /// Neumann condition with the given normal derivatives.
    pub fn neumann(values: &[c64]) -> Self {
        Self::new(values.iter().copied().map(ElementCondition::neumann).collect())
    }

    /// Robin condition `alpha * phi + beta * v = value` with the same coefficients on every
    /// element.
    pub fn robin(alpha: c64, beta: c64, values: &[c64]) -> Self {
        Self::new(
            values
                .iter()
                .map(|&value| ElementCondition::new(alpha, beta, value))
                .collect(),
        )
    }

    /// Build the condition from the centroid and normal of each element.
    pub fn from_fn(
        mesh: &BoundaryMesh,
        f: impl Fn(&[f64; 3], &[f64; 3]) -> ElementCondition,
    ) -> Self {
        Self::new(
            (0..mesh.number_of_elements())
                .map(|index| f(&mesh.centroid(index), &mesh.normal(index)))
                .collect(),
        )
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check whether there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// All element conditions.
    pub fn conditions(&self) -> &[ElementCondition] {
        &self.conditions
    }

    /// Condition on an element.
    pub fn condition(&self, index: usize) -> &ElementCondition {
        &self.conditions[index]
    }

    /// The first element on which the condition is ill-posed.
    pub fn first_ill_posed(&self, epsilon: f64) -> Option<usize> {
        self.conditions
            .iter()
            .position(|c| !c.is_well_posed(epsilon))
    }

    /// Check whether the condition is well-posed on every element.
    pub fn is_well_posed(&self, epsilon: f64) -> bool {
        self.first_ill_posed(epsilon).is_none()
    }
}

/// An externally imposed field superposed on the scattered field.
///
/// Holds the incident potential and its normal derivative at every element centroid, and the
/// incident potential at every exterior point.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentField {
    /// Incident potential at the element centroids
    pub boundary_phi: Vec<c64>,
    /// Normal derivative of the incident potential at the element centroids
    pub boundary_velocity: Vec<c64>,
    /// Incident potential at the exterior points
    pub exterior_phi: Vec<c64>,
}

impl IncidentField {
    /// Create an incident field.
    pub fn new(
        boundary_phi: Vec<c64>,
        boundary_velocity: Vec<c64>,
        exterior_phi: Vec<c64>,
    ) -> Result<Self> {
        if boundary_velocity.len() != boundary_phi.len() {
            return Err(ParameterError::LengthMismatch {
                what: "incident normal derivative",
                expected: boundary_phi.len(),
                got: boundary_velocity.len(),
            }
            .into());
        }
        Ok(Self {
            boundary_phi,
            boundary_velocity,
            exterior_phi,
        })
    }

    /// No incident field.
    pub fn none(nelements: usize, npoints: usize) -> Self {
        Self {
            boundary_phi: vec![c64::zero(); nelements],
            boundary_velocity: vec![c64::zero(); nelements],
            exterior_phi: vec![c64::zero(); npoints],
        }
    }

    /// Sample a field given as a function returning the potential and its gradient.
    pub fn from_fn(
        mesh: &BoundaryMesh,
        points: &[[f64; 3]],
        f: impl Fn(&[f64; 3]) -> (c64, [c64; 3]),
    ) -> Self {
        let (boundary_phi, boundary_velocity): (Vec<c64>, Vec<c64>) = (0..mesh.number_of_elements())
            .map(|index| {
                let (phi, gradient) = f(&mesh.centroid(index));
                let n = mesh.normal(index);
                (
                    phi,
                    gradient[0] * n[0] + gradient[1] * n[1] + gradient[2] * n[2],
                )
            })
            .unzip();
        let exterior_phi = points.iter().map(|p| f(p).0).collect();
        Self {
            boundary_phi,
            boundary_velocity,
            exterior_phi,
        }
    }

    /// Plane wave `exp(i k d.x)` travelling along `direction`.
    pub fn plane_wave(
        wavenumber: f64,
        direction: [f64; 3],
        mesh: &BoundaryMesh,
        points: &[[f64; 3]],
    ) -> Self {
        let length = dot(&direction, &direction).sqrt();
        let d = [
            direction[0] / length,
            direction[1] / length,
            direction[2] / length,
        ];
        Self::from_fn(mesh, points, |x| {
            let phi = (c64::i() * wavenumber * dot(&d, x)).exp();
            let ik_phi = c64::i() * wavenumber * phi;
            (phi, [ik_phi * d[0], ik_phi * d[1], ik_phi * d[2]])
        })
    }

    /// Monopole `exp(ikr) / (4 pi r)` centred at `position`.
    pub fn point_source(
        wavenumber: f64,
        position: [f64; 3],
        mesh: &BoundaryMesh,
        points: &[[f64; 3]],
    ) -> Self {
        let k = c64::new(wavenumber, 0.0);
        Self::from_fn(mesh, points, |x| greens_fct_gradient(k, x, &position))
    }
}
