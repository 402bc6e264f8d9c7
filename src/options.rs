//! Solver options

/// Runtime ceilings on problem sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    /// Maximum number of mesh vertices
    pub max_vertices: usize,
    /// Maximum number of mesh elements
    pub max_elements: usize,
    /// Maximum number of exterior points
    pub max_exterior_points: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_vertices: 50_000,
            max_elements: 20_000,
            max_exterior_points: 100_000,
        }
    }
}

/// Options controlling validation, assembly and field evaluation.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Geometric tolerance used for coincident vertices
    geometry_tolerance: f64,
    /// Smallest admissible distance between a collocation point and a quadrature point
    kernel_tolerance: f64,
    /// Lower bound on max(|alpha|, |beta|)
    well_posedness_epsilon: f64,
    /// Ratio of largest to smallest element area above which a warning is emitted
    area_ratio_limit: f64,
    /// Allowed deviation of the orientation sum from -1/2
    orientation_tolerance: f64,
    /// Largest admissible |double layer sum| at an exterior point
    exterior_point_threshold: f64,
    /// Size ceilings
    capacity: Capacity,
    /// Assemble rows and evaluate exterior points in parallel
    parallel: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            geometry_tolerance: 1e-6,
            kernel_tolerance: 1e-12,
            well_posedness_epsilon: 1e-6,
            area_ratio_limit: 10.0,
            orientation_tolerance: 0.1,
            exterior_point_threshold: 0.25,
            capacity: Capacity::default(),
            parallel: true,
        }
    }
}

impl SolverOptions {
    /// Geometric tolerance (EGEOM).
    pub fn geometry_tolerance(&self) -> f64 {
        self.geometry_tolerance
    }
    /// Set the geometric tolerance.
    pub fn set_geometry_tolerance(&mut self, tolerance: f64) {
        self.geometry_tolerance = tolerance;
    }

    /// Kernel tolerance.
    pub fn kernel_tolerance(&self) -> f64 {
        self.kernel_tolerance
    }
    /// Set the kernel tolerance.
    pub fn set_kernel_tolerance(&mut self, tolerance: f64) {
        self.kernel_tolerance = tolerance;
    }

    /// Well-posedness epsilon.
    pub fn well_posedness_epsilon(&self) -> f64 {
        self.well_posedness_epsilon
    }
    /// Set the well-posedness epsilon.
    pub fn set_well_posedness_epsilon(&mut self, epsilon: f64) {
        self.well_posedness_epsilon = epsilon;
    }

    /// Area ratio limit.
    pub fn area_ratio_limit(&self) -> f64 {
        self.area_ratio_limit
    }
    /// Set the area ratio limit.
    pub fn set_area_ratio_limit(&mut self, limit: f64) {
        self.area_ratio_limit = limit;
    }

    /// Orientation tolerance.
    pub fn orientation_tolerance(&self) -> f64 {
        self.orientation_tolerance
    }
    /// Set the orientation tolerance.
    pub fn set_orientation_tolerance(&mut self, tolerance: f64) {
        self.orientation_tolerance = tolerance;
    }

    /// Exterior point threshold.
    pub fn exterior_point_threshold(&self) -> f64 {
        self.exterior_point_threshold
    }
    /// Set the exterior point threshold.
    pub fn set_exterior_point_threshold(&mut self, threshold: f64) {
        self.exterior_point_threshold = threshold;
    }

    /// Size ceilings.
    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }
    /// Set the size ceilings.
    pub fn set_capacity(&mut self, capacity: Capacity) {
        self.capacity = capacity;
    }

    /// Whether assembly and field evaluation run in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }
    /// Enable or disable parallel assembly and field evaluation.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }
}
