//! Boundary mesh storage and geometric primitives

pub mod boundary_mesh;
pub mod geometry;

pub use boundary_mesh::BoundaryMesh;
