//! # Primitive Shape Generation
//!
//! Parametric mesh generators for the shapes the room is assembled from.
//! All shapes are generated with outward-facing normals and counter-clockwise
//! winding, deterministic for identical inputs.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a subdivided plane in the XY plane
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Returns a plane centered at the origin with its normal on +Z. Walls are
/// unit planes from this generator, scaled and rotated into place.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.positions.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let a = y * (w_segs + 1) + x;
            let b = a + 1;
            let c = a + w_segs + 1;
            let d = c + 1;

            // Counter-clockwise when viewed from +Z
            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[d, c, a]);
        }
    }

    data
}

/// Generate an axis-aligned box with subdivided faces
///
/// # Arguments
/// * `width`, `height`, `depth` - Extents along X, Y, Z
/// * `segments` - Subdivisions per face axis (1 = plain box)
///
/// Returns a box centered at the origin. Each face carries its own vertices
/// so normals stay hard at the edges.
pub fn generate_box(width: f32, height: f32, depth: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(1);

    let hw = width * 0.5;
    let hh = height * 0.5;
    let hd = depth * 0.5;

    // (origin corner, u edge, v edge, normal) per face; u x v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 3]); 6] = [
        // +Z
        ([-hw, -hh, hd], [width, 0.0, 0.0], [0.0, height, 0.0], [0.0, 0.0, 1.0]),
        // -Z
        ([hw, -hh, -hd], [-width, 0.0, 0.0], [0.0, height, 0.0], [0.0, 0.0, -1.0]),
        // +X
        ([hw, -hh, hd], [0.0, 0.0, -depth], [0.0, height, 0.0], [1.0, 0.0, 0.0]),
        // -X
        ([-hw, -hh, -hd], [0.0, 0.0, depth], [0.0, height, 0.0], [-1.0, 0.0, 0.0]),
        // +Y
        ([-hw, hh, hd], [width, 0.0, 0.0], [0.0, 0.0, -depth], [0.0, 1.0, 0.0]),
        // -Y
        ([-hw, -hh, -hd], [width, 0.0, 0.0], [0.0, 0.0, depth], [0.0, -1.0, 0.0]),
    ];

    for (origin, u_edge, v_edge, normal) in faces {
        let base = data.positions.len() as u32;

        for v in 0..=segs {
            let fv = v as f32 / segs as f32;
            for u in 0..=segs {
                let fu = u as f32 / segs as f32;
                data.positions.push([
                    origin[0] + u_edge[0] * fu + v_edge[0] * fv,
                    origin[1] + u_edge[1] * fu + v_edge[1] * fv,
                    origin[2] + u_edge[2] * fu + v_edge[2] * fv,
                ]);
                data.normals.push(normal);
            }
        }

        for v in 0..segs {
            for u in 0..segs {
                let a = base + v * (segs + 1) + u;
                let b = a + 1;
                let c = a + segs + 1;
                let d = c + 1;

                data.indices.extend_from_slice(&[a, b, d]);
                data.indices.extend_from_slice(&[d, c, a]);
            }
        }
    }

    data
}

/// Generate a capped cylinder (or cone frustum) along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius at +height/2
/// * `radius_bottom` - Radius at -height/2
/// * `height` - Extent along Y
/// * `segments` - Number of radial segments (minimum 3)
///
/// Returns a cylinder centered at the origin.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Slant-corrected side normal; reduces to (cos, 0, sin) for equal radii
    let dr = radius_bottom - radius_top;
    let slant = (height * height + dr * dr).sqrt();
    let (ny, nxz) = (dr / slant, height / slant);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();

        data.positions
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push([cos_a * nxz, ny, sin_a * nxz]);

        data.positions
            .push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push([cos_a * nxz, ny, sin_a * nxz]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices
            .extend_from_slice(&[bottom_next, top_current, top_next]);
    }

    // Caps get their own rings so the normals are flat
    for (y, normal, radius) in [
        (-half_height, [0.0, -1.0, 0.0], radius_bottom),
        (half_height, [0.0, 1.0, 0.0], radius_top),
    ] {
        if radius <= 0.0 {
            continue;
        }
        let center = data.positions.len() as u32;
        data.positions.push([0.0, y, 0.0]);
        data.normals.push(normal);

        let ring = data.positions.len() as u32;
        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            data.positions
                .push([radius * angle.cos(), y, radius * angle.sin()]);
            data.normals.push(normal);
        }

        for i in 0..segs {
            if normal[1] < 0.0 {
                data.indices
                    .extend_from_slice(&[center, ring + i, ring + i + 1]);
            } else {
                data.indices
                    .extend_from_slice(&[center, ring + i + 1, ring + i]);
            }
        }
    }

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (minimum 3)
/// * `latitude_segments` - Number of horizontal segments (minimum 2)
///
/// Returns a sphere centered at the origin.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.positions.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices
                .extend_from_slice(&[first, first + 1, second]);
            data.indices
                .extend_from_slice(&[first + 1, second + 1, second]);
        }
    }

    data
}

/// Generate a ring torus around the Y axis
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center
/// * `tube_radius` - Radius of the tube
/// * `radial_segments` - Segments around the main ring (minimum 3)
/// * `tubular_segments` - Segments around the tube (minimum 3)
///
/// Returns a torus centered at the origin, lying flat in the XZ plane.
pub fn generate_torus(
    radius: f32,
    tube_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for i in 0..=radial {
        let u = i as f32 * 2.0 * PI / radial as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=tubular {
            let v = j as f32 * 2.0 * PI / tubular as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let ring = radius + tube_radius * cos_v;
            data.positions
                .push([ring * cos_u, tube_radius * sin_v, ring * sin_u]);
            data.normals.push([cos_v * cos_u, sin_v, cos_v * sin_u]);
        }
    }

    for i in 0..radial {
        for j in 0..tubular {
            let a = i * (tubular + 1) + j;
            let b = (i + 1) * (tubular + 1) + j;
            let c = a + 1;
            let d = b + 1;

            data.indices.extend_from_slice(&[a, c, b]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

/// Generate a flat disc facing +Y
///
/// # Arguments
/// * `radius` - Disc radius
/// * `segments` - Number of fan segments (minimum 3)
///
/// Returns a disc centered at the origin in the XZ plane. Used for burner
/// plates and drain covers.
pub fn generate_disc(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    data.positions.push([0.0, 0.0, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.positions
            .push([radius * angle.cos(), 0.0, radius * angle.sin()]);
        data.normals.push([0.0, 1.0, 0.0]);
    }

    for i in 0..segs {
        data.indices.extend_from_slice(&[0, i + 2, i + 1]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertex_count(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert_eq!(plane.triangle_count(), 8);
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0, 1);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);

        let subdivided = generate_box(1.0, 2.0, 3.0, 4);
        assert_eq!(subdivided.vertex_count(), 6 * 25);
        assert_eq!(subdivided.triangle_count(), 6 * 16 * 2);
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.5, 0.5, 2.0, 8);
        assert!(cylinder.vertex_count() > 0);
        assert_eq!(cylinder.positions.len(), cylinder.normals.len());
        // 8 side quads + 2 caps of 8 triangles
        assert_eq!(cylinder.triangle_count(), 8 * 2 + 8 * 2);
    }

    #[test]
    fn test_cylinder_enforces_minimum_segments() {
        let degenerate = generate_cylinder(0.5, 0.5, 1.0, 1);
        let minimum = generate_cylinder(0.5, 0.5, 1.0, 3);
        assert_eq!(degenerate.vertex_count(), minimum.vertex_count());
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.0, 8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.positions.len(), sphere.normals.len());
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
    }

    #[test]
    fn test_sphere_radius_is_applied() {
        let sphere = generate_sphere(2.0, 8, 6);
        for position in &sphere.positions {
            let length =
                (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
            assert!((length - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(1.0, 0.25, 8, 6);
        assert_eq!(torus.vertex_count(), 9 * 7);
        assert_eq!(torus.triangle_count(), 8 * 6 * 2);
    }

    #[test]
    fn test_disc_generation() {
        let disc = generate_disc(0.5, 16);
        assert_eq!(disc.vertex_count(), 1 + 17);
        assert_eq!(disc.triangle_count(), 16);
        for normal in &disc.normals {
            assert_eq!(*normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_sphere(1.0, 12, 8);
        let b = generate_sphere(1.0, 12, 8);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.indices, b.indices);
    }
}
