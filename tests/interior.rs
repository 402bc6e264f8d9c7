use acoustic_bem::boundary::{BoundaryCondition, IncidentField};
use acoustic_bem::kernel::helmholtz_3d::greens_fct_gradient;
use acoustic_bem::shapes::regular_sphere;
use acoustic_bem::solver::{InteriorHelmholtzSolver, InteriorProblem};
use acoustic_bem::types::c64;
use acoustic_bem::SolverOptions;
use ndarray::Array1;
use paste::paste;

const INTERIOR_POINTS: [[f64; 3]; 3] = [[0.0, 0.0, 0.3], [0.2, 0.1, -0.3], [0.0, 0.0, 0.0]];
const SOURCE: [f64; 3] = [0.0, 0.0, 3.0];

fn relative_error(approx: &Array1<c64>, exact: &[c64]) -> f64 {
    let num = approx
        .iter()
        .zip(exact.iter())
        .map(|(a, e)| (a - e).norm_sqr())
        .sum::<f64>();
    let den = exact.iter().map(|e| e.norm_sqr()).sum::<f64>();
    (num / den).sqrt()
}

fn dirichlet_condition(phi: &[c64], _velocity: &[c64]) -> BoundaryCondition {
    BoundaryCondition::dirichlet(phi)
}

fn neumann_condition(_phi: &[c64], velocity: &[c64]) -> BoundaryCondition {
    BoundaryCondition::neumann(velocity)
}

fn robin_condition(phi: &[c64], velocity: &[c64]) -> BoundaryCondition {
    let values = phi
        .iter()
        .zip(velocity.iter())
        .map(|(&p, &v)| p + c64::i() * v)
        .collect::<Vec<_>>();
    BoundaryCondition::robin(c64::new(1.0, 0.0), c64::i(), &values)
}

/// Solve for the field of a point source outside the sphere and return the relative errors of
/// phi, v and the interior field.
fn solve_point_source(
    level: u32,
    k: f64,
    condition: fn(&[c64], &[c64]) -> BoundaryCondition,
) -> (f64, f64, f64) {
    let mesh = regular_sphere(level).unwrap();
    let exact = IncidentField::point_source(k, SOURCE, &mesh, &INTERIOR_POINTS);
    let problem = InteriorProblem::new(
        k,
        condition(&exact.boundary_phi, &exact.boundary_velocity),
        IncidentField::none(mesh.number_of_elements(), INTERIOR_POINTS.len()),
        INTERIOR_POINTS.to_vec(),
    );
    let solution = InteriorHelmholtzSolver::new(&mesh, SolverOptions::default())
        .solve(&problem)
        .unwrap();
    assert!(!solution.report.has_warnings());
    (
        relative_error(&solution.boundary.phi, &exact.boundary_phi),
        relative_error(&solution.boundary.velocity, &exact.boundary_velocity),
        solution
            .interior_phi
            .iter()
            .zip(exact.exterior_phi.iter())
            .map(|(value, e)| (value - e).norm() / e.norm())
            .fold(0.0, f64::max),
    )
}

macro_rules! point_source_test {
    ($condition:ident, $k:expr, $name:ident) => {
        paste! {
            #[test]
            fn [<test_point_source_ $condition _ $name>]() {
                let (phi_error, velocity_error, field_error) =
                    solve_point_source(2, $k, [<$condition _condition>]);
                assert!(phi_error < 0.1, "phi error {phi_error}");
                assert!(velocity_error < 0.1, "v error {velocity_error}");
                assert!(field_error < 0.08, "field error {field_error}");
            }
        }
    };
}

point_source_test!(dirichlet, 1.0, k1);
point_source_test!(neumann, 1.0, k1);
point_source_test!(robin, 1.0, k1);
point_source_test!(dirichlet, 2.0, k2);
point_source_test!(neumann, 2.0, k2);
point_source_test!(robin, 2.0, k2);

#[test]
fn test_point_source_refinement() {
    let (_, coarse, _) = solve_point_source(2, 1.0, dirichlet_condition);
    let (_, fine, _) = solve_point_source(3, 1.0, dirichlet_condition);
    assert!(fine < 0.6 * coarse, "{coarse} -> {fine}");
}

#[test]
fn test_source_inside_the_cavity() {
    // Total field of a source inside plus a field that is regular inside; the inner source is
    // the incident field and the boundary condition fixes the total potential.
    let mesh = regular_sphere(2).unwrap();
    let k = 1.0;
    let inner = [0.0, 0.1, 0.2];
    let points = [[0.0, 0.0, 0.5], [0.3, -0.2, -0.3], [-0.4, 0.0, 0.0]];
    let incident = IncidentField::point_source(k, inner, &mesh, &points);
    let outer = IncidentField::point_source(k, SOURCE, &mesh, &points);
    let total_phi = incident
        .boundary_phi
        .iter()
        .zip(outer.boundary_phi.iter())
        .map(|(a, b)| a + b)
        .collect::<Vec<_>>();
    let total_velocity = incident
        .boundary_velocity
        .iter()
        .zip(outer.boundary_velocity.iter())
        .map(|(a, b)| a + b)
        .collect::<Vec<_>>();

    let problem = InteriorProblem::new(
        k,
        BoundaryCondition::dirichlet(&total_phi),
        incident.clone(),
        points.to_vec(),
    );
    let solution = InteriorHelmholtzSolver::new(&mesh, SolverOptions::default())
        .solve(&problem)
        .unwrap();

    assert!(relative_error(&solution.boundary.velocity, &total_velocity) < 0.05);
    for (value, p) in solution.interior_phi.iter().zip(points.iter()) {
        let exact = greens_fct_gradient(c64::new(k, 0.0), p, &inner).0
            + greens_fct_gradient(c64::new(k, 0.0), p, &SOURCE).0;
        assert!((value - exact).norm() < 0.02 * exact.norm());
    }
}
