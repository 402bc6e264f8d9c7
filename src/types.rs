//! Error, warning and scalar types shared by the solver stages
pub use cauchy::c64;

/// Side of the closed surface on which the field is sought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    /// The unbounded region into which the normals point.
    #[default]
    Exterior,
    /// The region enclosed by the surface.
    Interior,
}

impl Domain {
    /// Sign of the jump terms and of the boundary part of the representation formula: +1
    /// outside and -1 inside.
    pub fn sign(self) -> f64 {
        match self {
            Domain::Exterior => 1.0,
            Domain::Interior => -1.0,
        }
    }
}

/// Parameter errors, reported before any computation begins.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Negative or non-finite wavenumber.
    #[error("wavenumber must be finite and non-negative, got {0}")]
    InvalidWavenumber(f64),
    /// Geometric tolerance is not strictly positive.
    #[error("geometry tolerance must be positive, got {0}")]
    NonPositiveTolerance(f64),
    /// Geometric tolerance too coarse for the size of the mesh.
    #[error("geometry tolerance {tolerance} exceeds 1/100 of the mesh diameter {diameter}")]
    ToleranceTooLarge {
        /// Requested tolerance
        tolerance: f64,
        /// Mesh diameter
        diameter: f64,
    },
    /// A count exceeds the configured capacity.
    #[error("{what}: {count} exceeds the capacity of {capacity}")]
    CapacityExceeded {
        /// Name of the counted entity
        what: &'static str,
        /// Actual count
        count: usize,
        /// Configured ceiling
        capacity: usize,
    },
    /// Per-element or per-point data of the wrong length.
    #[error("{what}: expected {expected} entries, got {got}")]
    LengthMismatch {
        /// Name of the data set
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },
    /// A mesh without elements.
    #[error("the boundary mesh has no elements")]
    EmptyMesh,
    /// A refinement level whose element count overflows.
    #[error("refinement level {0} is too large")]
    RefinementTooLarge(u32),
    /// An element refers to a vertex that does not exist.
    #[error("element {element} refers to vertex {vertex}, but the mesh has {nvertices} vertices")]
    VertexIndexOutOfRange {
        /// Element index
        element: usize,
        /// Offending vertex index
        vertex: usize,
        /// Number of vertices in the mesh
        nvertices: usize,
    },
}

/// Fatal defects of the surface or of the boundary condition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Two vertices closer than the geometry tolerance in every coordinate.
    #[error("vertices {first} and {second} coincide within the geometry tolerance")]
    CoincidentVertices {
        /// First vertex index
        first: usize,
        /// Second vertex index
        second: usize,
    },
    /// An element with (numerically) zero area.
    #[error("element {element} is degenerate")]
    DegenerateElement {
        /// Element index
        element: usize,
    },
    /// Neither alpha nor beta is nonzero on an element.
    #[error("boundary condition on element {element} has alpha = beta = 0")]
    IllPosedCondition {
        /// Element index
        element: usize,
    },
    /// The k = 0 double layer sum points to inverted winding.
    #[error("elements appear to be wrongly oriented (double layer sum {sum} at element {element})")]
    InvertedOrientation {
        /// Element at whose centroid the sum was taken
        element: usize,
        /// Value of the sum
        sum: f64,
    },
}

/// Non-fatal findings of the geometry diagnostics.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryWarning {
    /// Element areas differ by more than the configured ratio.
    #[error("element areas range from {min_area} to {max_area}; the discretisation may be inaccurate")]
    DisproportionateElements {
        /// Smallest element area
        min_area: f64,
        /// Largest element area
        max_area: f64,
    },
    /// The double layer sum is far from -1/2 and from +1/2.
    #[error("double layer sum {sum} at element {element}: the boundary may not be closed")]
    NotClosed {
        /// Element at whose centroid the sum was taken
        element: usize,
        /// Value of the sum
        sum: f64,
    },
    /// A declared exterior point that does not look exterior.
    #[error("exterior point {index} at {point:?} has double layer sum {sum}; it may not be exterior")]
    SuspectExteriorPoint {
        /// Index of the point
        index: usize,
        /// Coordinates of the point
        point: [f64; 3],
        /// Value of the sum
        sum: f64,
    },
    /// A declared interior point that does not look interior.
    #[error("interior point {index} at {point:?} has double layer sum {sum}; it may not be interior")]
    SuspectInteriorPoint {
        /// Index of the point
        index: usize,
        /// Coordinates of the point
        point: [f64; 3],
        /// Value of the sum
        sum: f64,
    },
}

/// Failures of a kernel evaluation for one collocation point and source element.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A regular quadrature point sits on top of the collocation point.
    #[error("quadrature point at distance {distance} from the collocation point")]
    CoincidentQuadraturePoint {
        /// Distance between the points
        distance: f64,
    },
    /// On-element integration requested for a point outside the element plane.
    #[error("collocation point is {distance} away from the element plane")]
    OffPlane {
        /// Distance to the plane
        distance: f64,
    },
    /// The collocation point lies on an edge of the integrated element.
    #[error("collocation point lies on an element edge")]
    OnEdge,
    /// The source element has no area.
    #[error("degenerate source element")]
    DegenerateElement,
    /// The integral evaluated to NaN or infinity.
    #[error("operator evaluated to a non-finite value")]
    NonFinite,
}

/// Failures of the linear solve.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// No usable pivot in a column.
    #[error("system matrix is singular or nearly singular (column {column})")]
    SingularMatrix {
        /// Column without a usable pivot
        column: usize,
    },
    /// Matrix and vector sizes do not agree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        got: usize,
    },
    /// The solution contains NaN or infinity.
    #[error("solution contains non-finite values")]
    NonFinite,
}

/// Errors of the solver pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BemError {
    /// Out-of-range sizes, counts or tolerances
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),
    /// Defective surface or boundary condition
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    /// A kernel evaluation failed; the corresponding matrix entry is invalid.
    #[error("kernel failure for collocation element {collocation} and source element {source_element}: {reason}")]
    KernelFailure {
        /// Collocation element (row) or exterior point index
        collocation: usize,
        /// Source element (column)
        source_element: usize,
        /// Reason reported by the kernel evaluator
        reason: KernelError,
    },
    /// Linear solve failed; no boundary data is available.
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),
}

/// Result type of the solver pipeline
pub type Result<T> = std::result::Result<T, BemError>;
