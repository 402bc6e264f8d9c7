//! Solution of the coupled system under the boundary condition
use crate::assembly::CoupledSystem;
use crate::boundary::BoundaryCondition;
use crate::types::{c64, SolverError};
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

/// Potential and normal derivative at every element centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryData {
    /// Potential
    pub phi: Array1<c64>,
    /// Normal derivative
    pub velocity: Array1<c64>,
}

/// Solver of the coupled system `b phi = a v + rhs` together with `alpha phi + beta v = f`.
pub trait LinearSolver: Sync {
    /// Return the potential and normal derivative on every element.
    fn solve(
        &self,
        system: &CoupledSystem,
        condition: &BoundaryCondition,
    ) -> Result<BoundaryData, SolverError>;
}

/// Direct solver.
///
/// On every element one of the two unknowns is eliminated with the boundary condition: the
/// normal derivative is kept where `|beta| < |alpha|` and the potential otherwise. The remaining
/// square system is solved by the LU factorisation with partial pivoting of `nalgebra`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuEliminationSolver;

impl LinearSolver for LuEliminationSolver {
    fn solve(
        &self,
        system: &CoupledSystem,
        condition: &BoundaryCondition,
    ) -> Result<BoundaryData, SolverError> {
        let n = system.size();
        for got in [
            system.a.nrows(),
            system.a.ncols(),
            system.b.nrows(),
            system.b.ncols(),
            condition.len(),
        ] {
            if got != n {
                return Err(SolverError::DimensionMismatch { expected: n, got });
            }
        }

        // Unknown j is v_j if keeps_velocity[j], and phi_j otherwise.
        let keeps_velocity = condition
            .conditions()
            .iter()
            .map(|c| c.beta.norm() < c.alpha.norm())
            .collect::<Vec<_>>();

        let mut matrix = DMatrix::<c64>::zeros(n, n);
        let mut rhs = DVector::from_iterator(n, system.rhs.iter().copied());
        for (j, c) in condition.conditions().iter().enumerate() {
            if keeps_velocity[j] {
                // phi_j = (f_j - beta_j v_j) / alpha_j
                let ratio = c.beta / c.alpha;
                let shift = c.value / c.alpha;
                for i in 0..n {
                    matrix[(i, j)] = -system.a[[i, j]] - ratio * system.b[[i, j]];
                    rhs[i] -= system.b[[i, j]] * shift;
                }
            } else {
                // v_j = (f_j - alpha_j phi_j) / beta_j
                let ratio = c.alpha / c.beta;
                let shift = c.value / c.beta;
                for i in 0..n {
                    matrix[(i, j)] = system.b[[i, j]] + ratio * system.a[[i, j]];
                    rhs[i] += system.a[[i, j]] * shift;
                }
            }
        }

        let unknowns = solve_dense(matrix, &rhs)?;

        let mut phi = Array1::<c64>::zeros(n);
        let mut velocity = Array1::<c64>::zeros(n);
        for (j, c) in condition.conditions().iter().enumerate() {
            if keeps_velocity[j] {
                velocity[j] = unknowns[j];
                phi[j] = (c.value - c.beta * unknowns[j]) / c.alpha;
            } else {
                phi[j] = unknowns[j];
                velocity[j] = (c.value - c.alpha * unknowns[j]) / c.beta;
            }
        }

        if phi
            .iter()
            .chain(velocity.iter())
            .all(|z| z.re.is_finite() && z.im.is_finite())
        {
            Ok(BoundaryData { phi, velocity })
        } else {
            Err(SolverError::NonFinite)
        }
    }
}

/// Solve a dense square system.
///
/// A pivot is treated as zero when it is below `f64::EPSILON` times the largest entry of the
/// matrix; the column of the first such pivot is reported.
fn solve_dense(matrix: DMatrix<c64>, rhs: &DVector<c64>) -> Result<DVector<c64>, SolverError> {
    if matrix.iter().any(|z| !(z.re.is_finite() && z.im.is_finite())) {
        return Err(SolverError::NonFinite);
    }
    let scale = matrix.iter().fold(0.0_f64, |m, z| m.max(z.norm()));
    let threshold = f64::EPSILON * scale;

    let lu = matrix.lu();
    let pivots = lu.u().diagonal();
    if let Some(column) = pivots.iter().position(|p| p.norm() <= threshold) {
        return Err(SolverError::SingularMatrix { column });
    }
    lu.solve(rhs).ok_or(SolverError::SingularMatrix {
        column: pivots.len().saturating_sub(1),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::boundary::ElementCondition;
    use approx::*;
    use ndarray::Array2;
    use num::{One, Zero};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_system(n: usize, rng: &mut StdRng) -> CoupledSystem {
        let mut entry = || c64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let mut a = Array2::from_shape_fn((n, n), |_| entry());
        let mut b = Array2::from_shape_fn((n, n), |_| entry());
        for i in 0..n {
            a[[i, i]] += c64::new(n as f64, 0.0);
            b[[i, i]] -= c64::new(n as f64, 0.0);
        }
        let rhs = Array1::from_shape_fn(n, |_| entry());
        CoupledSystem { a, b, rhs }
    }

    fn check_solution(system: &CoupledSystem, condition: &BoundaryCondition, data: &BoundaryData) {
        let residual = system.b.dot(&data.phi) - system.a.dot(&data.velocity) - &system.rhs;
        for r in residual.iter() {
            assert_abs_diff_eq!(r.norm(), 0.0, epsilon = 1e-10);
        }
        for (j, c) in condition.conditions().iter().enumerate() {
            let lhs = c.alpha * data.phi[j] + c.beta * data.velocity[j];
            assert_abs_diff_eq!((lhs - c.value).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_mixed_conditions() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 12;
        let system = random_system(n, &mut rng);
        let condition = BoundaryCondition::new(
            (0..n)
                .map(|j| match j % 3 {
                    0 => ElementCondition::dirichlet(c64::new(j as f64, 1.0)),
                    1 => ElementCondition::neumann(c64::new(1.0, -(j as f64))),
                    _ => ElementCondition::new(c64::new(0.3, 1.0), c64::new(2.0, 0.5), c64::one()),
                })
                .collect(),
        );
        let data = LuEliminationSolver.solve(&system, &condition).unwrap();
        check_solution(&system, &condition, &data);
        assert_eq!(data.phi[0], c64::new(0.0, 1.0));
        assert_eq!(data.velocity[1], c64::new(1.0, -1.0));
    }

    #[test]
    fn test_random_robin() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20;
        let system = random_system(n, &mut rng);
        let condition = BoundaryCondition::new(
            (0..n)
                .map(|_| {
                    ElementCondition::new(
                        c64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                        c64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                        c64::new(rng.gen_range(-1.0..1.0), 0.0),
                    )
                })
                .collect(),
        );
        let data = LuEliminationSolver.solve(&system, &condition).unwrap();
        check_solution(&system, &condition, &data);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut rng = StdRng::seed_from_u64(5);
        let system = random_system(4, &mut rng);
        let condition = BoundaryCondition::dirichlet(&[c64::zero(); 3]);
        assert_eq!(
            LuEliminationSolver.solve(&system, &condition),
            Err(SolverError::DimensionMismatch {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_singular_column_is_reported() {
        let mut rng = StdRng::seed_from_u64(13);
        let n = 6;
        let mut system = random_system(n, &mut rng);
        // Only v is kept, so the column of the eliminated system is minus the column of a.
        system.a.column_mut(1).fill(c64::zero());
        let condition = BoundaryCondition::dirichlet(&vec![c64::one(); n]);
        assert_eq!(
            LuEliminationSolver.solve(&system, &condition),
            Err(SolverError::SingularMatrix { column: 1 })
        );

        let condition = BoundaryCondition::neumann(&vec![c64::one(); n]);
        assert!(LuEliminationSolver.solve(&system, &condition).is_ok());
    }

    #[test]
    fn test_non_finite_system() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut system = random_system(4, &mut rng);
        system.b[[2, 3]] = c64::new(f64::NAN, 0.0);
        let condition = BoundaryCondition::neumann(&[c64::one(); 4]);
        assert_eq!(
            LuEliminationSolver.solve(&system, &condition),
            Err(SolverError::NonFinite)
        );
    }

    #[test]
    fn test_dense_solve() {
        let matrix = DMatrix::from_row_slice(
            3,
            3,
            &[
                c64::new(0.0, 0.0),
                c64::new(2.0, 1.0),
                c64::new(1.0, 0.0),
                c64::new(1.0, -1.0),
                c64::new(0.0, 0.0),
                c64::new(3.0, 0.0),
                c64::new(4.0, 0.0),
                c64::new(1.0, 0.0),
                c64::new(0.0, 2.0),
            ],
        );
        let expected = DVector::from_vec(vec![
            c64::new(1.0, 0.0),
            c64::new(0.0, -1.0),
            c64::new(2.0, 0.5),
        ]);
        let rhs = &matrix * &expected;
        let solution = solve_dense(matrix, &rhs).unwrap();
        for (x, e) in solution.iter().zip(expected.iter()) {
            assert_abs_diff_eq!((x - e).norm(), 0.0, epsilon = 1e-12);
        }
    }
}
