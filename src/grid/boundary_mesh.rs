//! Closed surface made of flat triangles

use crate::grid::geometry::{centroid, distance, triangle_area, unit_normal};
use crate::types::{GeometryError, ParameterError, Result};
use itertools::Itertools;

/// A boundary mesh of flat triangles.
///
/// Elements store the indices of their three vertices, counter-clockwise when viewed from
/// outside the surface. Centroids (the collocation points), outward unit normals and areas are
/// computed once on construction.
#[derive(Debug, Clone)]
pub struct BoundaryMesh {
    vertices: Vec<[f64; 3]>,
    elements: Vec<[usize; 3]>,
    centroids: Vec<[f64; 3]>,
    normals: Vec<[f64; 3]>,
    areas: Vec<f64>,
}

impl BoundaryMesh {
    /// Create a boundary mesh.
    pub fn new(vertices: Vec<[f64; 3]>, elements: Vec<[usize; 3]>) -> Result<Self> {
        if elements.is_empty() {
            return Err(ParameterError::EmptyMesh.into());
        }
        let nvertices = vertices.len();

        let mut centroids = Vec::with_capacity(elements.len());
        let mut normals = Vec::with_capacity(elements.len());
        let mut areas = Vec::with_capacity(elements.len());

        for (element_index, element) in elements.iter().enumerate() {
            if let Some(&vertex) = element.iter().find(|&&v| v >= nvertices) {
                return Err(ParameterError::VertexIndexOutOfRange {
                    element: element_index,
                    vertex,
                    nvertices,
                }
                .into());
            }
            let v = [
                vertices[element[0]],
                vertices[element[1]],
                vertices[element[2]],
            ];
            let normal = unit_normal(&v).ok_or(GeometryError::DegenerateElement {
                element: element_index,
            })?;
            centroids.push(centroid(&v));
            normals.push(normal);
            areas.push(triangle_area(&v));
        }

        Ok(Self {
            vertices,
            elements,
            centroids,
            normals,
            areas,
        })
    }

    /// Number of vertices.
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of elements.
    pub fn number_of_elements(&self) -> usize {
        self.elements.len()
    }

    /// All vertices.
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// All elements.
    pub fn elements(&self) -> &[[usize; 3]] {
        &self.elements
    }

    /// Coordinates of a vertex.
    pub fn vertex(&self, index: usize) -> [f64; 3] {
        self.vertices[index]
    }

    /// Vertex indices of an element.
    pub fn element(&self, index: usize) -> [usize; 3] {
        self.elements[index]
    }

    /// Coordinates of the three vertices of an element.
    pub fn element_vertices(&self, index: usize) -> [[f64; 3]; 3] {
        let e = &self.elements[index];
        [self.vertices[e[0]], self.vertices[e[1]], self.vertices[e[2]]]
    }

    /// Centroid of an element (its collocation point).
    pub fn centroid(&self, index: usize) -> [f64; 3] {
        self.centroids[index]
    }

    /// Outward unit normal of an element.
    pub fn normal(&self, index: usize) -> [f64; 3] {
        self.normals[index]
    }

    /// Area of an element.
    pub fn area(&self, index: usize) -> f64 {
        self.areas[index]
    }

    /// All element areas.
    pub fn areas(&self) -> &[f64] {
        &self.areas
    }

    /// Diameter of the mesh: the largest distance between any two vertices.
    pub fn diameter(&self) -> f64 {
        self.vertices
            .iter()
            .tuple_combinations()
            .map(|(a, b)| distance(a, b))
            .fold(0.0, f64::max)
    }

    /// The same surface with the winding of every element reversed.
    pub fn reversed(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            elements: self.elements.iter().map(|e| [e[0], e[2], e[1]]).collect(),
            centroids: self.centroids.clone(),
            normals: self.normals.iter().map(|n| [-n[0], -n[1], -n[2]]).collect(),
            areas: self.areas.clone(),
        }
    }
}
