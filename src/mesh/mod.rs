//! `Mesh` struct: an indexed mesh with separate position, normal and
//! texture-coordinate buffers, as handed to a renderer.
//!
//! The warp only ever rewrites the position buffer. Indices, sub-mesh
//! descriptors and texture coordinates are topology and stay untouched, and
//! normals are only rewritten when the caller asks for it
//! ([`Mesh::recalculate_normals`]).

use crate::float_types::Real;
use nalgebra::{Point2, Point3, Vector3};

pub mod normals;
pub mod shapes;

/// How consecutive indices are grouped into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeshTopology {
    /// Every three indices form a triangle
    #[default]
    Triangles,
    /// Every two indices form a line segment
    Lines,
}

impl MeshTopology {
    /// Number of indices that make up one primitive.
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            MeshTopology::Triangles => 3,
            MeshTopology::Lines => 2,
        }
    }
}

/// A contiguous range of the index buffer that is drawn as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubMeshDescriptor {
    pub index_start: usize,
    pub index_count: usize,
    pub topology: MeshTopology,
}

impl SubMeshDescriptor {
    pub const fn new(index_start: usize, index_count: usize, topology: MeshTopology) -> Self {
        SubMeshDescriptor {
            index_start,
            index_count,
            topology,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    topology: MeshTopology,

    /// Vertex positions
    vertices: Vec<Point3<Real>>,

    /// Per-vertex normals; empty, or the same length as `vertices`
    normals: Vec<Vector3<Real>>,

    /// Per-vertex texture coordinates; empty, or the same length as `vertices`
    tex_coords: Vec<Point2<Real>>,

    indices: Vec<u32>,

    submeshes: Vec<SubMeshDescriptor>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a triangle mesh from positions and a flat index buffer
    /// (three indices per triangle). Normals are left empty.
    pub fn from_triangles(vertices: Vec<Point3<Real>>, indices: Vec<u32>) -> Self {
        Mesh {
            topology: MeshTopology::Triangles,
            vertices,
            indices,
            ..Default::default()
        }
    }

    pub const fn topology(&self) -> MeshTopology {
        self.topology
    }

    pub fn set_topology(&mut self, topology: MeshTopology) {
        self.topology = topology;
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    /// Mutable access to the position buffer. The buffer length cannot change
    /// through this, so the other per-vertex buffers stay in step.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Point3<Real>] {
        &mut self.vertices
    }

    /// Replace the position buffer.
    ///
    /// If the vertex count changes, non-empty normal and texture-coordinate
    /// buffers are resized to match (new entries are zero).
    pub fn set_vertices(&mut self, vertices: Vec<Point3<Real>>) {
        let n = vertices.len();
        self.vertices = vertices;
        if !self.normals.is_empty() {
            self.normals.resize(n, Vector3::zeros());
        }
        if !self.tex_coords.is_empty() {
            self.tex_coords.resize(n, Point2::origin());
        }
    }

    #[inline]
    pub fn normals(&self) -> &[Vector3<Real>] {
        &self.normals
    }

    /// Replace the normal buffer. Returns `false` (and leaves the mesh
    /// unchanged) if `normals` is non-empty and its length differs from the
    /// vertex count.
    pub fn set_normals(&mut self, normals: Vec<Vector3<Real>>) -> bool {
        if !normals.is_empty() && normals.len() != self.vertices.len() {
            return false;
        }
        self.normals = normals;
        true
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Point2<Real>] {
        &self.tex_coords
    }

    /// Replace the texture-coordinate buffer, with the same length rule as
    /// [`Mesh::set_normals`].
    pub fn set_tex_coords(&mut self, tex_coords: Vec<Point2<Real>>) -> bool {
        if !tex_coords.is_empty() && tex_coords.len() != self.vertices.len() {
            return false;
        }
        self.tex_coords = tex_coords;
        true
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn submeshes(&self) -> &[SubMeshDescriptor] {
        &self.submeshes
    }

    pub fn push_submesh(&mut self, descriptor: SubMeshDescriptor) {
        self.submeshes.push(descriptor);
    }

    /// Iterate the triangles of the mesh as vertex-index triples.
    ///
    /// With no sub-meshes the whole index buffer is read using the mesh
    /// topology; otherwise each triangle sub-mesh is read. Triangles that
    /// reference a vertex outside the position buffer are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let ranges: Vec<&[u32]> = if self.submeshes.is_empty() {
            match self.topology {
                MeshTopology::Triangles => vec![&self.indices[..]],
                MeshTopology::Lines => Vec::new(),
            }
        } else {
            self.submeshes
                .iter()
                .filter(|sm| sm.topology == MeshTopology::Triangles)
                .filter_map(|sm| {
                    self.indices
                        .get(sm.index_start..sm.index_start.saturating_add(sm.index_count))
                })
                .collect()
        };

        let num_vertices = self.vertices.len();
        ranges.into_iter().flat_map(move |range| {
            range.chunks_exact(3).filter_map(move |tri| {
                let tri = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                tri.iter().all(|&i| i < num_vertices).then_some(tri)
            })
        })
    }

    /// Axis-aligned `(min, max)` corners of the position buffer, ignoring
    /// non-finite positions. `None` if there is no finite vertex.
    pub fn bounds(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut finite = self
            .vertices
            .iter()
            .filter(|p| crate::float_types::is_finite_point(p));
        let first = *finite.next()?;
        Some(finite.fold((first, first), |(mins, maxs), p| {
            (
                Point3::new(mins.x.min(p.x), mins.y.min(p.y), mins.z.min(p.z)),
                Point3::new(maxs.x.max(p.x), maxs.y.max(p.y), maxs.z.max(p.z)),
            )
        }))
    }
}
