//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the primitive shapes the scene
//! is built from, plus the batching operations (bake-transform and merge)
//! used to collapse static geometry into single draw calls.
//!
//! ## Supported Primitives
//!
//! - **Plane**: subdivided quad in the XY plane
//! - **Box**: axis-aligned box with subdivided faces
//! - **Cylinder**: capped cylinder/cone along the Y axis
//! - **Sphere**: UV sphere
//! - **Torus**: ring torus
//! - **Disc**: flat circle fan facing +Y
//!
//! Curved primitives take explicit segment counts; the quality setting maps
//! to segment counts through [`tessellation`].

pub mod primitives;

pub use primitives::*;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Transform, Vector3};

use crate::gfx::scene::vertex::Vertex3D;

/// Maps the user-facing quality setting to a tessellation segment count
///
/// `resolution = max(3, floor(base * (0.2 + quality / 20)))` — monotonic in
/// quality and never below 3, so degenerate curved meshes cannot be built.
pub fn tessellation(base: u32, quality: u32) -> u32 {
    let q = quality.clamp(crate::config::QUALITY_MIN, crate::config::QUALITY_MAX) as f32;
    let scaled = (base as f32 * (0.2 + q / 20.0)).floor() as u32;
    scaled.max(3)
}

/// Generated geometry ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bakes a transform into the vertex data
    ///
    /// Positions go through the full matrix; normals through the
    /// inverse-transpose of its linear part, renormalized, so non-uniform
    /// scaling keeps lighting correct.
    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        let linear = Matrix3::new(
            matrix.x.x, matrix.x.y, matrix.x.z, //
            matrix.y.x, matrix.y.y, matrix.y.z, //
            matrix.z.x, matrix.z.y, matrix.z.z,
        );
        let normal_matrix = linear
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        for position in &mut self.positions {
            let p = matrix.transform_point(cgmath::Point3::new(
                position[0],
                position[1],
                position[2],
            ));
            *position = [p.x, p.y, p.z];
        }
        for normal in &mut self.normals {
            let n = normal_matrix * Vector3::new(normal[0], normal[1], normal[2]);
            let n = if n.magnitude2() > 0.0 { n.normalize() } else { n };
            *normal = [n.x, n.y, n.z];
        }
    }

    /// Returns a transformed copy, leaving `self` untouched
    pub fn transformed(mut self, matrix: &Matrix4<f32>) -> Self {
        self.transform(matrix);
        self
    }

    /// Appends another geometry into this one, offsetting its indices
    ///
    /// This is the batching primitive: merging pre-transformed world-space
    /// geometry trades per-mesh matrix updates for a single draw call.
    pub fn merge(&mut self, other: GeometryData) {
        let offset = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.indices
            .extend(other.indices.into_iter().map(|i| i + offset));
    }

    /// Converts to the vertex format expected by the renderer
    pub fn to_vertices(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();
        (vertices, self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, Vector3};

    #[test]
    fn test_tessellation_floor_is_three() {
        for quality in 1..=100 {
            assert!(tessellation(8, quality) >= 3);
            assert!(tessellation(1, quality) >= 3);
        }
        // quality=1 with the wall base lands on the floor value
        assert_eq!(tessellation(8, 1), 3);
    }

    #[test]
    fn test_tessellation_is_monotonic() {
        for base in [2u32, 8, 12, 24] {
            let mut previous = 0;
            for quality in 1..=100 {
                let resolution = tessellation(base, quality);
                assert!(
                    resolution >= previous,
                    "resolution regressed at base={} quality={}",
                    base,
                    quality
                );
                previous = resolution;
            }
        }
    }

    #[test]
    fn test_tessellation_at_full_quality() {
        // 0.2 + 100/20 = 5.2
        assert_eq!(tessellation(8, 100), (8.0f32 * 5.2).floor() as u32);
        assert_eq!(tessellation(12, 100), (12.0f32 * 5.2).floor() as u32);
    }

    #[test]
    fn test_tessellation_clamps_out_of_range_quality() {
        assert_eq!(tessellation(8, 0), tessellation(8, 1));
        assert_eq!(tessellation(8, 1000), tessellation(8, 100));
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = generate_plane(1.0, 1.0, 1, 1);
        let b = generate_plane(1.0, 1.0, 1, 1);
        let a_vertices = a.vertex_count();
        let b_triangles = b.triangle_count();
        let a_triangles = a.triangle_count();

        a.merge(b);

        assert_eq!(a.vertex_count(), a_vertices * 2);
        assert_eq!(a.triangle_count(), a_triangles + b_triangles);
        let max_index = *a.indices.iter().max().unwrap() as usize;
        assert!(max_index < a.vertex_count());
    }

    #[test]
    fn test_transform_moves_positions_not_normals() {
        let mut plane = generate_plane(2.0, 2.0, 1, 1);
        plane.transform(&Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0)));

        for position in &plane.positions {
            assert!((position[1] - 5.0).abs() < 1e-6);
        }
        // Translation must leave the +Z normal alone
        for normal in &plane.normals {
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_transform_rotates_normals() {
        let mut plane = generate_plane(1.0, 1.0, 1, 1);
        plane.transform(&Matrix4::from_angle_x(cgmath::Rad(
            -std::f32::consts::FRAC_PI_2,
        )));

        // -90 degrees about X turns the +Z normal into +Y
        for normal in &plane.normals {
            assert!((normal[1] - 1.0).abs() < 1e-5, "normal was {:?}", normal);
        }
    }
}
