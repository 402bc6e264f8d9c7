//! Green's function of the Helmholtz equation in 3D
//!
//! `G(r) = exp(ikr) / (4 pi r)` together with its first two derivatives in `r`. The differences
//! to the Laplace kernel (k = 0) are evaluated in closed form so that on-element integrands stay
//! bounded or weakly singular.
use crate::types::c64;
use std::f64::consts::FRAC_1_PI;

/// 1 / (4 pi)
pub const M_INV_4PI: f64 = 0.25 * FRAC_1_PI;

/// Value, first and second radial derivative of a radial kernel.
#[derive(Debug, Clone, Copy)]
pub struct RadialDerivatives {
    /// G(r)
    pub value: c64,
    /// dG/dr
    pub first: c64,
    /// d^2G/dr^2
    pub second: c64,
}

/// Evaluate `exp(ikr)` for complex `k`.
#[inline]
fn phase(wavenumber: c64, r: f64) -> c64 {
    (c64::i() * wavenumber * r).exp()
}

/// Green's function `exp(ikr) / (4 pi r)`.
pub fn greens_fct(wavenumber: c64, r: f64) -> c64 {
    phase(wavenumber, r) * (M_INV_4PI / r)
}

/// Green's function and its radial derivatives.
pub fn greens_fct_derivatives(wavenumber: c64, r: f64) -> RadialDerivatives {
    let e = phase(wavenumber, r);
    let ikr = c64::i() * wavenumber * r;
    let inv_r = 1.0 / r;
    let value = e * (M_INV_4PI * inv_r);
    RadialDerivatives {
        value,
        first: value * (ikr - 1.0) * inv_r,
        second: value * (2.0 - 2.0 * ikr + ikr * ikr) * inv_r * inv_r,
    }
}

/// `G_k - G_0` and its radial derivatives.
pub fn greens_fct_dynamic_part(wavenumber: c64, r: f64) -> RadialDerivatives {
    let e = phase(wavenumber, r);
    let ikr = c64::i() * wavenumber * r;
    let inv_r = 1.0 / r;
    let scale = M_INV_4PI * inv_r;
    RadialDerivatives {
        value: (e - 1.0) * scale,
        first: (e * (ikr - 1.0) + 1.0) * scale * inv_r,
        second: (e * (2.0 - 2.0 * ikr + ikr * ikr) - 2.0) * scale * inv_r * inv_r,
    }
}

/// Gradient of the Green's function with respect to the target `x` for a source at `y`.
pub fn greens_fct_gradient(wavenumber: c64, x: &[f64; 3], y: &[f64; 3]) -> (c64, [c64; 3]) {
    let diff = [x[0] - y[0], x[1] - y[1], x[2] - y[2]];
    let r = (diff[0] * diff[0] + diff[1] * diff[1] + diff[2] * diff[2]).sqrt();
    let g = greens_fct_derivatives(wavenumber, r);
    let scale = g.first / r;
    (g.value, [scale * diff[0], scale * diff[1], scale * diff[2]])
}
