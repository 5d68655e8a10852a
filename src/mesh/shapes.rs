//! Procedural meshes, mostly used as warp targets in tests and demos.

use super::{Mesh, MeshTopology, SubMeshDescriptor};
use crate::float_types::{PI, Real, TAU};
use nalgebra::{Point2, Point3};

impl Mesh {
    /// Axis-aligned box spanning `(0,0,0)..(width,length,height)` built from
    /// eight shared corners.
    ///
    /// ```text
    ///     4-------5
    ///    /|      /|
    ///   0-------1 |
    ///   | |     | |
    ///   | 7-----|-6
    ///   |/      |/
    ///   3-------2
    /// ```
    pub fn cuboid(width: Real, length: Real, height: Real) -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];

        // quads, counter-clockwise from outside
        let faces: [[u32; 4]; 6] = [
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // front
            [3, 7, 6, 2], // back
            [0, 4, 7, 3], // left
            [1, 2, 6, 5], // right
        ];
        let indices = faces
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .collect();

        let mut mesh = Mesh::from_triangles(vertices, indices);
        mesh.recalculate_normals();
        mesh
    }

    pub fn cube(width: Real) -> Mesh {
        Self::cuboid(width, width, width)
    }

    /// UV sphere centred on the origin with single-vertex poles on ±Y.
    ///
    /// `segments` is clamped to at least 3 and `stacks` to at least 2.
    pub fn sphere(radius: Real, segments: usize, stacks: usize) -> Mesh {
        let segments = segments.max(3);
        let stacks = stacks.max(2);

        let mut vertices = vec![Point3::new(0.0, radius, 0.0)];
        for j in 1..stacks {
            let phi = (j as Real / stacks as Real) * PI;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();
            for i in 0..segments {
                let theta = (i as Real / segments as Real) * TAU;
                vertices.push(Point3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()));
            }
        }
        vertices.push(Point3::new(0.0, -radius, 0.0));

        let north_pole = 0u32;
        let south_pole = (vertices.len() - 1) as u32;
        let ring = |j: usize, i: usize| (1 + (j - 1) * segments + (i % segments)) as u32;

        let mut indices = Vec::with_capacity(6 * segments * stacks);
        for i in 0..segments {
            indices.extend_from_slice(&[north_pole, ring(1, i + 1), ring(1, i)]);
        }
        for j in 1..stacks - 1 {
            for i in 0..segments {
                let (a, b) = (ring(j, i), ring(j, i + 1));
                let (c, d) = (ring(j + 1, i), ring(j + 1, i + 1));
                indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
        for i in 0..segments {
            indices.extend_from_slice(&[south_pole, ring(stacks - 1, i), ring(stacks - 1, i + 1)]);
        }

        let mut mesh = Mesh::from_triangles(vertices, indices);
        mesh.recalculate_normals();
        mesh
    }

    /// Flat `width × depth` grid in the XZ plane, centred on the origin, with
    /// `divisions × divisions` quads, texture coordinates in `[0, 1]²`, and
    /// one triangle sub-mesh covering every index.
    pub fn grid(width: Real, depth: Real, divisions: usize) -> Mesh {
        let divisions = divisions.max(1);
        let stride = divisions + 1;

        let mut vertices = Vec::with_capacity(stride * stride);
        let mut tex_coords = Vec::with_capacity(stride * stride);
        for row in 0..stride {
            let v = row as Real / divisions as Real;
            for col in 0..stride {
                let u = col as Real / divisions as Real;
                vertices.push(Point3::new((u - 0.5) * width, 0.0, (v - 0.5) * depth));
                tex_coords.push(Point2::new(u, v));
            }
        }

        let mut indices = Vec::with_capacity(6 * divisions * divisions);
        for row in 0..divisions {
            for col in 0..divisions {
                let a = (row * stride + col) as u32;
                let b = a + 1;
                let c = a + stride as u32;
                let d = c + 1;
                // counter-clockwise seen from +Y
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let index_count = indices.len();
        let mut mesh = Mesh::from_triangles(vertices, indices);
        let _ = mesh.set_tex_coords(tex_coords);
        mesh.push_submesh(SubMeshDescriptor::new(0, index_count, MeshTopology::Triangles));
        mesh.recalculate_normals();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = Mesh::sphere(2.0, 12, 6);
        assert_eq!(sphere.num_vertices(), 2 + 12 * 5);
        assert_eq!(sphere.triangles().count(), 2 * 12 * 5);
        for p in sphere.vertices() {
            assert!((p.coords.norm() - 2.0).abs() < 1e-6);
        }
        // outward-facing normals
        for (p, n) in sphere.vertices().iter().zip(sphere.normals()) {
            assert!(p.coords.dot(n) > 0.0);
        }
    }

    #[test]
    fn grid_faces_up_and_carries_uvs() {
        let grid = Mesh::grid(2.0, 2.0, 4);
        assert_eq!(grid.num_vertices(), 25);
        assert_eq!(grid.tex_coords().len(), 25);
        assert_eq!(grid.submeshes().len(), 1);
        for n in grid.normals() {
            assert!((n - Vector3::y()).norm() < 1e-6);
        }
    }

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = Mesh::cube(1.0);
        assert_eq!(cube.num_vertices(), 8);
        assert_eq!(cube.triangles().count(), 12);
    }
}
