//! Geometry validation and orientation diagnostics
//!
//! The checks run in a fixed order: parameter ranges, mesh diameter against the geometric
//! tolerance, coincident vertices, element size disproportion, well-posedness of the boundary
//! condition, orientation of the surface and placement of the field points. Fatal findings
//! are returned as errors; the others are logged and collected in a [`GeometryReport`].
use crate::boundary::{BoundaryCondition, IncidentField};
use crate::grid::BoundaryMesh;
use crate::kernel::{CollocationPoint, KernelEvaluator, OperatorRequest};
use crate::options::SolverOptions;
use crate::quadrature::QuadratureRules;
use crate::types::{
    c64, BemError, Domain, GeometryError, GeometryWarning, ParameterError, Result,
};
use itertools::Itertools;
use log::{debug, warn};
use num::Zero;
use rayon::prelude::*;

/// Element at whose centroid the orientation sum is evaluated.
const ORIENTATION_ELEMENT: usize = 0;

/// Findings of the geometry diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryReport {
    /// Largest distance between two vertices
    pub diameter: f64,
    /// Laplace double layer sum at the centroid of the first element
    pub orientation_sum: Option<f64>,
    /// Laplace double layer sum at each field point
    pub exterior_sums: Vec<f64>,
    /// Non-fatal findings
    pub warnings: Vec<GeometryWarning>,
}

impl GeometryReport {
    /// Check whether any warnings were raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn warn(&mut self, warning: GeometryWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Validator for a mesh together with the data of one problem.
pub struct GeometryValidator<'a> {
    mesh: &'a BoundaryMesh,
    options: &'a SolverOptions,
    domain: Domain,
}

impl<'a> GeometryValidator<'a> {
    /// Create a validator for an exterior problem.
    pub fn new(mesh: &'a BoundaryMesh, options: &'a SolverOptions) -> Self {
        Self {
            mesh,
            options,
            domain: Domain::Exterior,
        }
    }

    /// Check the field points against the given side of the surface instead.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Run the checks that do not need any kernel evaluations.
    pub fn validate(
        &self,
        wavenumber: f64,
        condition: &BoundaryCondition,
        incident: &IncidentField,
        points: &[[f64; 3]],
    ) -> Result<GeometryReport> {
        self.check_parameters(wavenumber, condition, incident, points)?;
        let mut report = GeometryReport {
            diameter: self.check_diameter()?,
            ..Default::default()
        };
        self.check_coincident_vertices()?;
        self.check_element_sizes(&mut report);
        self.check_well_posedness(condition)?;
        Ok(report)
    }

    /// Parameter ranges, capacities and the lengths of per-element and per-point data.
    pub fn check_parameters(
        &self,
        wavenumber: f64,
        condition: &BoundaryCondition,
        incident: &IncidentField,
        points: &[[f64; 3]],
    ) -> Result<()> {
        if !(wavenumber.is_finite() && wavenumber >= 0.0) {
            return Err(ParameterError::InvalidWavenumber(wavenumber).into());
        }
        let tolerance = self.options.geometry_tolerance();
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ParameterError::NonPositiveTolerance(tolerance).into());
        }

        let capacity = self.options.capacity();
        let nelements = self.mesh.number_of_elements();
        let point_label = match self.domain {
            Domain::Exterior => "exterior points",
            Domain::Interior => "interior points",
        };
        for (what, count, capacity) in [
            ("vertices", self.mesh.number_of_vertices(), capacity.max_vertices),
            ("elements", nelements, capacity.max_elements),
            (point_label, points.len(), capacity.max_exterior_points),
        ] {
            if count > capacity {
                return Err(ParameterError::CapacityExceeded {
                    what,
                    count,
                    capacity,
                }
                .into());
            }
        }

        for (what, expected, got) in [
            ("boundary condition", nelements, condition.len()),
            ("incident potential", nelements, incident.boundary_phi.len()),
            (
                "incident normal derivative",
                nelements,
                incident.boundary_velocity.len(),
            ),
            (
                "incident exterior potential",
                points.len(),
                incident.exterior_phi.len(),
            ),
        ] {
            if expected != got {
                return Err(ParameterError::LengthMismatch {
                    what,
                    expected,
                    got,
                }
                .into());
            }
        }
        Ok(())
    }

    /// The mesh diameter, which must be at least 100 times the geometric tolerance.
    pub fn check_diameter(&self) -> Result<f64> {
        let diameter = self.mesh.diameter();
        let tolerance = self.options.geometry_tolerance();
        if tolerance > diameter / 100.0 {
            return Err(ParameterError::ToleranceTooLarge {
                tolerance,
                diameter,
            }
            .into());
        }
        Ok(diameter)
    }

    /// Reject two vertices that are closer than the tolerance in every coordinate.
    ///
    /// Vertices are swept in order of their x coordinate, so only pairs within the tolerance in
    /// x are compared. The reported pair is the lexicographically smallest offending pair.
    pub fn check_coincident_vertices(&self) -> Result<()> {
        let tolerance = self.options.geometry_tolerance();
        let vertices = self.mesh.vertices();
        let order = (0..vertices.len())
            .sorted_by(|&i, &j| vertices[i][0].total_cmp(&vertices[j][0]))
            .collect_vec();

        let mut first_pair: Option<(usize, usize)> = None;
        for (position, &i) in order.iter().enumerate() {
            for &j in &order[position + 1..] {
                if vertices[j][0] - vertices[i][0] >= tolerance {
                    break;
                }
                if (vertices[j][1] - vertices[i][1]).abs() < tolerance
                    && (vertices[j][2] - vertices[i][2]).abs() < tolerance
                {
                    let pair = (i.min(j), i.max(j));
                    first_pair = Some(first_pair.map_or(pair, |p| p.min(pair)));
                }
            }
        }

        match first_pair {
            Some((first, second)) => {
                Err(GeometryError::CoincidentVertices { first, second }.into())
            }
            None => Ok(()),
        }
    }

    /// Warn if the element areas differ by more than the configured ratio.
    pub fn check_element_sizes(&self, report: &mut GeometryReport) {
        let areas = self.mesh.areas();
        let min_area = areas.iter().copied().fold(f64::INFINITY, f64::min);
        let max_area = areas.iter().copied().fold(0.0, f64::max);
        if max_area > self.options.area_ratio_limit() * min_area {
            report.warn(GeometryWarning::DisproportionateElements { min_area, max_area });
        }
    }

    /// Reject elements on which neither alpha nor beta is significant.
    pub fn check_well_posedness(&self, condition: &BoundaryCondition) -> Result<()> {
        match condition.first_ill_posed(self.options.well_posedness_epsilon()) {
            Some(element) => Err(GeometryError::IllPosedCondition { element }.into()),
            None => Ok(()),
        }
    }

    /// Orientation of the surface and placement of the field points.
    ///
    /// For a closed surface with outward normals the Laplace double layer of a unit density is
    /// -1/2 on the surface, -1 inside and 0 outside. A field point whose sum is further than the
    /// threshold from the value of its domain is reported.
    pub fn orientation_diagnostics(
        &self,
        kernel: &impl KernelEvaluator,
        rules: &QuadratureRules,
        points: &[[f64; 3]],
        report: &mut GeometryReport,
    ) -> Result<()> {
        let collocation = CollocationPoint::new(
            self.mesh.centroid(ORIENTATION_ELEMENT),
            self.mesh.normal(ORIENTATION_ELEMENT),
        );
        let sum = self
            .laplace_double_layer_sum(kernel, rules, &collocation, Some(ORIENTATION_ELEMENT))
            .map_err(|(source_element, reason)| BemError::KernelFailure {
                collocation: ORIENTATION_ELEMENT,
                source_element,
                reason,
            })?;
        debug!("Orientation sum at element {ORIENTATION_ELEMENT}: {sum}");
        report.orientation_sum = Some(sum);

        let tolerance = self.options.orientation_tolerance();
        if (sum + 0.5).abs() > tolerance {
            if (sum - 0.5).abs() < tolerance {
                return Err(GeometryError::InvertedOrientation {
                    element: ORIENTATION_ELEMENT,
                    sum,
                }
                .into());
            }
            report.warn(GeometryWarning::NotClosed {
                element: ORIENTATION_ELEMENT,
                sum,
            });
        }

        let point_sum = |(index, point): (usize, &[f64; 3])| {
            self.laplace_double_layer_sum(kernel, rules, &CollocationPoint::exterior(*point), None)
                .map_err(|(source_element, reason)| BemError::KernelFailure {
                    collocation: index,
                    source_element,
                    reason,
                })
        };
        let sums = if self.options.parallel() {
            points
                .par_iter()
                .enumerate()
                .map(point_sum)
                .collect::<Result<Vec<_>>>()?
        } else {
            points
                .iter()
                .enumerate()
                .map(point_sum)
                .collect::<Result<Vec<_>>>()?
        };

        let threshold = self.options.exterior_point_threshold();
        for (index, (point, &sum)) in points.iter().zip(sums.iter()).enumerate() {
            debug!("Double layer sum at {:?} point {index}: {sum}", self.domain);
            let point = *point;
            match self.domain {
                Domain::Exterior if sum.abs() > threshold => {
                    report.warn(GeometryWarning::SuspectExteriorPoint { index, point, sum })
                }
                Domain::Interior if (sum + 1.0).abs() > threshold => {
                    report.warn(GeometryWarning::SuspectInteriorPoint { index, point, sum })
                }
                _ => {}
            }
        }
        report.exterior_sums = sums;
        Ok(())
    }

    /// Sum of the Laplace double layer contributions of all elements.
    ///
    /// On failure, returns the source element and the kernel error.
    fn laplace_double_layer_sum(
        &self,
        kernel: &impl KernelEvaluator,
        rules: &QuadratureRules,
        collocation: &CollocationPoint,
        on_element: Option<usize>,
    ) -> std::result::Result<f64, (usize, crate::types::KernelError)> {
        let mut sum = 0.0;
        for element in 0..self.mesh.number_of_elements() {
            let on = on_element == Some(element);
            let ops = kernel
                .evaluate(
                    c64::zero(),
                    collocation,
                    &self.mesh.element_vertices(element),
                    on,
                    rules.rule(on),
                    OperatorRequest::DOUBLE_LAYER,
                )
                .map_err(|reason| (element, reason))?;
            sum += ops.double_layer.re;
        }
        Ok(sum)
    }
}
