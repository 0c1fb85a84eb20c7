//! Procedural construction of the kitchen scene
//!
//! The room shell is merged into two static batches (walls, floor+ceiling)
//! so the whole shell costs two draw calls. Furniture is discrete, the four
//! chairs are one GPU-instanced draw, and composite fixtures (sink, stove,
//! counter, ceiling lamp) are composed in local space by pure builder
//! functions and placed into world space with a single translation each.

use cgmath::{Matrix4, Rad, Vector3};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::gfx::geometry::{
    generate_box, generate_cylinder, generate_disc, generate_plane, generate_sphere,
    generate_torus, tessellation, GeometryData,
};
use crate::gfx::resources::material::slot;

use super::object::Object;

// Room dimensions are fixed; only tessellation density varies.
pub const ROOM_WIDTH: f32 = 10.0;
pub const ROOM_HEIGHT: f32 = 5.0;
pub const ROOM_DEPTH: f32 = 10.0;

// Base resolutions fed into the quality mapping, per primitive role.
const WALL_BASE_SEGMENTS: u32 = 8;
const FLOOR_BASE_SEGMENTS: u32 = 8;
const BOX_BASE_SEGMENTS: u32 = 2;
const RADIAL_BASE_SEGMENTS: u32 = 8;
const TUBULAR_BASE_SEGMENTS: u32 = 4;
const SPHERE_BASE_SEGMENTS: u32 = 6;

// The chair proxy is drawn 4x at low detail; its shape does not visibly
// change with quality, so it keeps a constant resolution.
const CHAIR_PROXY_SEGMENTS: u32 = 1;

fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

/// A fixture composed in local space
///
/// Sub-parts are positioned relative to the group origin; `place` converts
/// the whole subtree into world objects with one translation. New fixtures
/// can be added without recomputing any child's world position.
pub struct Group {
    name: &'static str,
    parts: Vec<Object>,
}

impl Group {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            parts: Vec::new(),
        }
    }

    pub fn add(&mut self, part: Object) {
        self.parts.push(part);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Places the group in world space by a single translation
    pub fn place(self, position: Vector3<f32>) -> Vec<Object> {
        let world = Matrix4::from_translation(position);
        let name = self.name;
        self.parts
            .into_iter()
            .map(|mut part| {
                part.reparent(world);
                part.name = format!("{}/{}", name, part.name);
                part
            })
            .collect()
    }
}

/// Builds the complete object list for one quality setting
///
/// Pure and deterministic: identical input yields an identical scene plan,
/// which is what makes teardown/rebuild round trips exact.
pub fn build_objects(quality: u32) -> Vec<Object> {
    let mut objects = Vec::new();

    objects.push(wall_batch(quality));
    objects.push(floor_ceiling_batch(quality));
    objects.extend(table(quality));
    objects.push(chairs());
    objects.extend(build_counter(quality).place(Vector3::new(-2.8, 0.0, -4.65)));
    // The sink sits on the counter top surface
    objects.extend(build_sink(quality).place(Vector3::new(-2.8, 0.98, -4.65)));
    objects.extend(build_stove(quality).place(Vector3::new(1.6, 0.0, -4.65)));
    objects.extend(build_ceiling_lamp(quality).place(Vector3::new(0.0, ROOM_HEIGHT, 0.0)));

    objects
}

/// Four walls as scaled unit planes, merged world-space into one batch
///
/// One draw call for the whole wall shell instead of four mesh transforms.
fn wall_batch(quality: u32) -> Object {
    let resolution = tessellation(WALL_BASE_SEGMENTS, quality);
    let mut batch = GeometryData::new();

    // (width, inward yaw, position)
    let walls = [
        (ROOM_WIDTH, 0.0, [0.0, ROOM_HEIGHT / 2.0, -ROOM_DEPTH / 2.0]),
        (ROOM_WIDTH, PI, [0.0, ROOM_HEIGHT / 2.0, ROOM_DEPTH / 2.0]),
        (ROOM_DEPTH, FRAC_PI_2, [-ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, 0.0]),
        (ROOM_DEPTH, -FRAC_PI_2, [ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, 0.0]),
    ];

    for (width, yaw, position) in walls {
        let wall = generate_plane(1.0, 1.0, resolution, resolution).transformed(
            &(translation(position[0], position[1], position[2])
                * Matrix4::from_angle_y(Rad(yaw))
                * Matrix4::from_nonuniform_scale(width, ROOM_HEIGHT, 1.0)),
        );
        batch.merge(wall);
    }

    Object::new("walls", slot::WALL, &batch)
}

/// Floor and ceiling merged into one batch drawn with the floor material
///
/// The merge uses a single material across the batch; the ceiling slot still
/// exists in the registry for recolor routing but has no dedicated mesh.
fn floor_ceiling_batch(quality: u32) -> Object {
    let resolution = tessellation(FLOOR_BASE_SEGMENTS, quality);
    let mut batch = GeometryData::new();

    let floor = generate_plane(1.0, 1.0, resolution, resolution).transformed(
        &(Matrix4::from_angle_x(Rad(-FRAC_PI_2))
            * Matrix4::from_nonuniform_scale(ROOM_WIDTH, ROOM_DEPTH, 1.0)),
    );
    batch.merge(floor);

    let ceiling = generate_plane(1.0, 1.0, resolution, resolution).transformed(
        &(translation(0.0, ROOM_HEIGHT, 0.0)
            * Matrix4::from_angle_x(Rad(FRAC_PI_2))
            * Matrix4::from_nonuniform_scale(ROOM_WIDTH, ROOM_DEPTH, 1.0)),
    );
    batch.merge(ceiling);

    Object::new("floor_ceiling", slot::FLOOR, &batch)
}

/// Table top and four legs as discrete quality-tessellated meshes
fn table(quality: u32) -> Vec<Object> {
    let segments = tessellation(BOX_BASE_SEGMENTS, quality);
    let mut objects = Vec::new();

    objects.push(
        Object::new("table_top", slot::TABLE, &generate_box(2.0, 0.1, 1.0, segments))
            .with_transform(translation(0.0, 1.0, 0.0)),
    );

    let leg = generate_box(0.1, 1.0, 0.1, segments);
    let leg_positions = [
        [-0.95, 0.5, -0.45],
        [0.95, 0.5, -0.45],
        [-0.95, 0.5, 0.45],
        [0.95, 0.5, 0.45],
    ];
    for (i, position) in leg_positions.iter().enumerate() {
        objects.push(
            Object::new(format!("table_leg_{}", i), slot::TABLE, &leg)
                .with_transform(translation(position[0], position[1], position[2])),
        );
    }

    objects
}

/// Four chairs as one GPU-instanced draw
///
/// One low-detail chair geometry (seat + backrest composed locally), four
/// per-instance transforms facing the table.
fn chairs() -> Object {
    let mut chair = GeometryData::new();

    let seat = generate_box(0.5, 0.05, 0.5, CHAIR_PROXY_SEGMENTS)
        .transformed(&translation(0.0, 0.45, 0.0));
    chair.merge(seat);

    let backrest = generate_box(0.5, 0.4, 0.05, CHAIR_PROXY_SEGMENTS)
        .transformed(&translation(0.0, 0.675, -0.225));
    chair.merge(backrest);

    // Two chairs per long table side, rotated to face the table
    let placements: [(f32, f32, f32); 4] = [
        (-1.0, -0.8, 0.0),
        (1.0, -0.8, 0.0),
        (-1.0, 0.8, PI),
        (1.0, 0.8, PI),
    ];
    let instances = placements
        .iter()
        .map(|&(x, z, yaw)| translation(x, 0.0, z) * Matrix4::from_angle_y(Rad(yaw)))
        .collect();

    Object::new("chairs", slot::CHAIR, &chair).with_instances(instances)
}

/// Sink fixture: basin, inner basin, drain, faucet and handles
///
/// Local origin is the center of the basin footprint; the group is placed
/// onto the counter top surface.
pub fn build_sink(quality: u32) -> Group {
    let radial = tessellation(RADIAL_BASE_SEGMENTS, quality);
    let mut sink = Group::new("sink");

    sink.add(
        Object::new("basin", slot::SINK_BASIN, &generate_box(1.1, 0.35, 0.55, 1))
            .with_transform(translation(0.0, 0.175, 0.0)),
    );
    sink.add(
        Object::new("inner_basin", slot::SINK_INNER, &generate_box(0.95, 0.3, 0.4, 1))
            .with_transform(translation(0.0, 0.23, 0.0)),
    );
    sink.add(
        Object::new("drain", slot::SINK_INNER, &generate_disc(0.06, radial))
            .with_transform(translation(0.0, 0.385, 0.0)),
    );

    sink.add(
        Object::new(
            "faucet_column",
            slot::SINK_FAUCET,
            &generate_cylinder(0.03, 0.03, 0.35, radial),
        )
        .with_transform(translation(0.0, 0.525, -0.24)),
    );
    // Spout runs horizontally over the basin
    sink.add(
        Object::new(
            "faucet_spout",
            slot::SINK_FAUCET,
            &generate_cylinder(0.025, 0.025, 0.3, radial),
        )
        .with_transform(translation(0.0, 0.7, -0.09) * Matrix4::from_angle_x(Rad(FRAC_PI_2))),
    );
    for (i, x) in [-0.12f32, 0.12].iter().enumerate() {
        sink.add(
            Object::new(
                format!("handle_{}", i),
                slot::SINK_FAUCET,
                &generate_cylinder(0.02, 0.02, 0.08, radial),
            )
            .with_transform(translation(*x, 0.39, -0.24)),
        );
    }

    sink
}

/// Stove fixture: body, oven door with handle, knobs, burners and grates
pub fn build_stove(quality: u32) -> Group {
    let segments = tessellation(BOX_BASE_SEGMENTS, quality);
    let radial = tessellation(RADIAL_BASE_SEGMENTS, quality);
    let tubular = tessellation(TUBULAR_BASE_SEGMENTS, quality);
    let mut stove = Group::new("stove");

    stove.add(
        Object::new("body", slot::STOVE_BODY, &generate_box(1.2, 1.0, 0.7, segments))
            .with_transform(translation(0.0, 0.5, 0.0)),
    );
    stove.add(
        Object::new("door", slot::STOVE_DOOR, &generate_box(1.0, 0.55, 0.06, 1))
            .with_transform(translation(0.0, 0.35, 0.38)),
    );
    // Door handle runs horizontally along the top edge of the door
    stove.add(
        Object::new(
            "door_handle",
            slot::STOVE_DETAIL,
            &generate_cylinder(0.025, 0.025, 0.9, radial),
        )
        .with_transform(translation(0.0, 0.66, 0.43) * Matrix4::from_angle_z(Rad(FRAC_PI_2))),
    );

    for (i, x) in [-0.36f32, -0.12, 0.12, 0.36].iter().enumerate() {
        stove.add(
            Object::new(
                format!("knob_{}", i),
                slot::STOVE_DETAIL,
                &generate_cylinder(0.035, 0.035, 0.04, radial),
            )
            .with_transform(translation(*x, 0.9, 0.37) * Matrix4::from_angle_x(Rad(FRAC_PI_2))),
        );
    }

    let burner_positions = [[-0.3f32, -0.18], [0.3, -0.18], [-0.3, 0.18], [0.3, 0.18]];
    for (i, position) in burner_positions.iter().enumerate() {
        stove.add(
            Object::new(
                format!("burner_{}", i),
                slot::STOVE_DETAIL,
                &generate_disc(0.12, radial),
            )
            .with_transform(translation(position[0], 1.001, position[1])),
        );
        stove.add(
            Object::new(
                format!("grate_{}", i),
                slot::STOVE_DETAIL,
                &generate_torus(0.12, 0.015, radial, tubular),
            )
            .with_transform(translation(position[0], 1.015, position[1])),
        );
    }

    stove
}

/// Counter fixture: base cabinet, overhanging top and utensil props
pub fn build_counter(quality: u32) -> Group {
    let segments = tessellation(BOX_BASE_SEGMENTS, quality);
    let radial = tessellation(RADIAL_BASE_SEGMENTS, quality);
    let mut counter = Group::new("counter");

    counter.add(
        Object::new("base", slot::COUNTER_BASE, &generate_box(3.0, 0.9, 0.6, segments))
            .with_transform(translation(0.0, 0.45, 0.0)),
    );
    counter.add(
        Object::new("top", slot::COUNTER_TOP, &generate_box(3.2, 0.08, 0.7, segments))
            .with_transform(translation(0.0, 0.94, 0.0)),
    );

    counter.add(
        Object::new("pot", slot::UTENSIL, &generate_cylinder(0.14, 0.14, 0.16, radial))
            .with_transform(translation(1.2, 1.06, 0.0)),
    );
    counter.add(
        Object::new(
            "pot_rim",
            slot::UTENSIL,
            &generate_torus(0.15, 0.012, radial, tessellation(TUBULAR_BASE_SEGMENTS, quality)),
        )
        .with_transform(translation(1.2, 1.14, 0.0)),
    );
    counter.add(
        Object::new("cutting_board", slot::UTENSIL, &generate_box(0.45, 0.02, 0.3, 1))
            .with_transform(translation(0.7, 0.99, 0.05)),
    );

    counter
}

/// Ceiling lamp: hanging beam and emissive bulb
///
/// Local origin is the ceiling attachment point; the fourth point light of
/// the rig shares the bulb's neighborhood so the fixture reads as lit.
pub fn build_ceiling_lamp(quality: u32) -> Group {
    let radial = tessellation(RADIAL_BASE_SEGMENTS, quality);
    let sphere = tessellation(SPHERE_BASE_SEGMENTS, quality);
    let mut lamp = Group::new("lamp");

    lamp.add(
        Object::new("beam", slot::STOVE_DETAIL, &generate_cylinder(0.05, 0.05, 3.0, radial))
            .with_transform(translation(0.0, -1.5, 0.0)),
    );
    lamp.add(
        Object::new("bulb", slot::LAMP_BULB, &generate_sphere(0.3, sphere * 2, sphere))
            .with_transform(translation(0.0, -3.15, 0.0)),
    );

    lamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::tessellation;
    use crate::gfx::resources::material::MaterialRegistry;

    #[test]
    fn test_build_is_deterministic() {
        let first = build_objects(25);
        let second = build_objects(25);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.slot, b.slot);
            assert_eq!(a.instance_count(), b.instance_count());
            assert_eq!(a.triangle_count(), b.triangle_count());
        }
    }

    #[test]
    fn test_room_shell_is_two_batches() {
        let objects = build_objects(25);
        let walls: Vec<_> = objects.iter().filter(|o| o.name == "walls").collect();
        let shell: Vec<_> = objects.iter().filter(|o| o.name == "floor_ceiling").collect();

        assert_eq!(walls.len(), 1);
        assert_eq!(shell.len(), 1);

        // Four merged planes of (res+1)^2 vertices each
        let resolution = tessellation(WALL_BASE_SEGMENTS, 25);
        let per_wall = (resolution + 1) * (resolution + 1);
        assert_eq!(walls[0].vertex_count(), 4 * per_wall);
        assert_eq!(shell[0].vertex_count(), 2 * per_wall);
    }

    #[test]
    fn test_wall_resolution_at_quality_extremes() {
        // floor(8 * 0.25) = 2 saturates to the minimum of 3
        let low = build_objects(1);
        let wall_low = low.iter().find(|o| o.name == "walls").unwrap();
        assert_eq!(wall_low.vertex_count(), 4 * 16);

        // floor(8 * 5.2) = 41 segments per axis
        let high = build_objects(100);
        let wall_high = high.iter().find(|o| o.name == "walls").unwrap();
        assert_eq!(wall_high.vertex_count(), 4 * 42 * 42);
    }

    #[test]
    fn test_chairs_are_one_instanced_draw() {
        let objects = build_objects(25);
        let chairs: Vec<_> = objects.iter().filter(|o| o.name == "chairs").collect();

        assert_eq!(chairs.len(), 1);
        assert_eq!(chairs[0].instance_count(), 4);
    }

    #[test]
    fn test_every_slot_in_use_is_registered() {
        for object in build_objects(25) {
            assert!(
                MaterialRegistry::category_of(object.slot).is_some(),
                "object {} references unknown slot {}",
                object.name,
                object.slot
            );
        }
    }

    #[test]
    fn test_groups_are_placed_by_translation() {
        let sink = build_sink(25);
        let local_y: Vec<f32> = sink.parts.iter().map(|p| p.transform.w.y).collect();

        let placed = build_sink(25).place(Vector3::new(-2.8, 0.98, -4.65));
        for (object, local) in placed.iter().zip(local_y) {
            assert!((object.transform.w.x - (-2.8 + 0.0)).abs() < 0.6);
            assert!((object.transform.w.y - (0.98 + local)).abs() < 1e-5);
            assert!(object.name.starts_with("sink/"));
        }
    }

    #[test]
    fn test_higher_quality_never_reduces_detail() {
        let low: u32 = build_objects(10).iter().map(|o| o.triangle_count()).sum();
        let high: u32 = build_objects(80).iter().map(|o| o.triangle_count()).sum();
        assert!(high >= low);
    }

    #[test]
    fn test_scene_stays_inside_room_bounds() {
        for object in build_objects(50) {
            let w = object.transform.w;
            assert!(w.x.abs() <= ROOM_WIDTH / 2.0 + 1e-3, "{} outside room", object.name);
            assert!(w.z.abs() <= ROOM_DEPTH / 2.0 + 1e-3, "{} outside room", object.name);
            assert!(w.y >= -1e-3 && w.y <= ROOM_HEIGHT + 1e-3);
        }
    }
}
