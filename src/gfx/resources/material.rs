//! Material system for flat-tint rendering
//!
//! Materials are owned centrally by [`MaterialRegistry`], keyed by semantic
//! slot, and routed for recoloring through [`MaterialCategory`]. Recoloring
//! mutates materials in place — meshes keep referencing the same slot and
//! pick up the new color on the next frame's uniform sync, without any
//! geometry rebuild.

use std::collections::HashMap;

use wgpu::Device;

use crate::config::{CategoryColors, MaterialCategory, Rgb};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Identifier of a concrete material slot
pub type SlotId = &'static str;

pub mod slot {
    use super::SlotId;

    pub const WALL: SlotId = "wall";
    pub const FLOOR: SlotId = "floor";
    pub const CEILING: SlotId = "ceiling";
    pub const COUNTER_BASE: SlotId = "counter_base";
    pub const COUNTER_TOP: SlotId = "counter_top";
    pub const UTENSIL: SlotId = "utensil";
    pub const TABLE: SlotId = "table";
    pub const CHAIR: SlotId = "chair";
    pub const STOVE_BODY: SlotId = "stove_body";
    pub const STOVE_DOOR: SlotId = "stove_door";
    pub const STOVE_DETAIL: SlotId = "stove_detail";
    pub const LAMP_BULB: SlotId = "lamp_bulb";
    pub const SINK_BASIN: SlotId = "sink_basin";
    pub const SINK_INNER: SlotId = "sink_inner";
    pub const SINK_FAUCET: SlotId = "sink_faucet";
}

/// Slot routing table: (slot, owning category, shade factor)
///
/// Each slot belongs to exactly one category; its color is the category
/// color scaled by the shade factor, so composite fixtures read as one
/// family while staying driven by a single map entry.
const SLOT_TABLE: &[(SlotId, MaterialCategory, f32)] = &[
    (slot::WALL, MaterialCategory::Walls, 1.0),
    (slot::FLOOR, MaterialCategory::Floor, 1.0),
    (slot::CEILING, MaterialCategory::Floor, 1.2),
    (slot::COUNTER_BASE, MaterialCategory::Counter, 1.0),
    (slot::COUNTER_TOP, MaterialCategory::Counter, 0.85),
    (slot::UTENSIL, MaterialCategory::Counter, 0.55),
    (slot::TABLE, MaterialCategory::Furniture, 1.0),
    (slot::CHAIR, MaterialCategory::Furniture, 0.9),
    (slot::STOVE_BODY, MaterialCategory::Appliances, 1.0),
    (slot::STOVE_DOOR, MaterialCategory::Appliances, 0.8),
    (slot::STOVE_DETAIL, MaterialCategory::Appliances, 0.5),
    (slot::LAMP_BULB, MaterialCategory::Appliances, 1.6),
    (slot::SINK_BASIN, MaterialCategory::Sink, 1.0),
    (slot::SINK_INNER, MaterialCategory::Sink, 0.8),
    (slot::SINK_FAUCET, MaterialCategory::Sink, 1.15),
];

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group Layout");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// A single flat-tint material slot
///
/// GPU resources are created lazily on the first uniform sync; identity
/// (slot key and bind group) is stable across recolors.
pub struct Material {
    pub slot: SlotId,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    dirty: bool,

    material_ubo: Option<MaterialUBO>,
    material_bindings: Option<MaterialBindings>,
}

impl Material {
    pub fn new(slot: SlotId, color: Rgb) -> Self {
        Self {
            slot,
            base_color: [color.r, color.g, color.b, 1.0],
            emissive: [0.0, 0.0, 0.0],
            dirty: true,
            material_ubo: None,
            material_bindings: None,
        }
    }

    fn with_emissive(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }

    /// Live recolor: mutates the color in place and schedules a uniform
    /// re-upload; the bind group is untouched
    pub fn set_color(&mut self, color: Rgb) {
        self.base_color = [color.r, color.g, color.b, self.base_color[3]];
        self.dirty = true;
    }

    pub fn color(&self) -> Rgb {
        Rgb::new(self.base_color[0], self.base_color[1], self.base_color[2])
    }

    /// Creates GPU resources on first call, then re-uploads only when dirty
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            self.material_ubo = Some(MaterialUBO::new(device));
            self.dirty = true;
        }

        if self.material_bindings.is_none() {
            let mut bindings = MaterialBindings::new(device);
            bindings.create_bind_group(
                device,
                self.material_ubo
                    .as_ref()
                    .expect("material UBO created above"),
            );
            self.material_bindings = Some(bindings);
        }

        if !self.dirty {
            return;
        }

        let uniform_data = MaterialUniform {
            base_color: self.base_color,
            emissive: self.emissive,
            _padding: 0.0,
        };

        if let Some(ubo) = &mut self.material_ubo {
            ubo.update_content(queue, uniform_data);
        }
        self.dirty = false;
    }

    /// Gets the bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bindings.as_ref().and_then(|b| b.bind_group())
    }
}

/// Central catalog of all material slots, keyed by semantic slot id
///
/// Rebuilt from the authoritative [`CategoryColors`] map on every scene
/// rebuild; recolor requests route through the category table.
pub struct MaterialRegistry {
    materials: HashMap<SlotId, Material>,
}

impl MaterialRegistry {
    /// Creates one material per slot, seeded from the color map
    pub fn build(colors: &CategoryColors) -> Self {
        let mut materials = HashMap::new();

        for &(slot_id, category, shade) in SLOT_TABLE {
            let mut material = Material::new(slot_id, colors.get(category).shaded(shade));
            if slot_id == slot::LAMP_BULB {
                material = material.with_emissive(1.0, 1.0, 0.88);
            }
            materials.insert(slot_id, material);
        }

        Self { materials }
    }

    /// Slots routed from a category, in table order
    pub fn slots_for(category: MaterialCategory) -> Vec<SlotId> {
        SLOT_TABLE
            .iter()
            .filter(|(_, c, _)| *c == category)
            .map(|(s, _, _)| *s)
            .collect()
    }

    /// The single category a slot belongs to
    pub fn category_of(slot_id: SlotId) -> Option<MaterialCategory> {
        SLOT_TABLE
            .iter()
            .find(|(s, _, _)| *s == slot_id)
            .map(|(_, c, _)| *c)
    }

    /// Applies a category color to every slot it routes to
    ///
    /// Material identity is preserved: meshes referencing a slot observe the
    /// new color on the next frame without re-binding.
    pub fn recolor(&mut self, category: MaterialCategory, color: Rgb) {
        for &(slot_id, slot_category, shade) in SLOT_TABLE {
            if slot_category != category {
                continue;
            }
            if let Some(material) = self.materials.get_mut(slot_id) {
                material.set_color(color.shaded(shade));
            }
        }
    }

    pub fn get(&self, slot_id: SlotId) -> Option<&Material> {
        self.materials.get(slot_id)
    }

    pub fn get_mut(&mut self, slot_id: SlotId) -> Option<&mut Material> {
        self.materials.get_mut(slot_id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Syncs every material's GPU state; clean materials are skipped
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_has_exactly_one_category() {
        for &(slot_id, category, _) in SLOT_TABLE {
            let owners: Vec<_> = SLOT_TABLE.iter().filter(|(s, _, _)| *s == slot_id).collect();
            assert_eq!(owners.len(), 1, "slot {} routed more than once", slot_id);
            assert_eq!(MaterialRegistry::category_of(slot_id), Some(category));
        }
    }

    #[test]
    fn test_build_seeds_all_slots_from_color_map() {
        let colors = CategoryColors::default();
        let registry = MaterialRegistry::build(&colors);

        assert_eq!(registry.len(), SLOT_TABLE.len());
        let wall = registry.get(slot::WALL).unwrap();
        assert_eq!(wall.color(), colors.get(MaterialCategory::Walls));
    }

    #[test]
    fn test_recolor_furniture_touches_only_table_and_chair() {
        let colors = CategoryColors::default();
        let mut registry = MaterialRegistry::build(&colors);
        let sink_before = registry.get(slot::SINK_BASIN).unwrap().color();
        let stove_before = registry.get(slot::STOVE_BODY).unwrap().color();

        let new = Rgb::from_hex("#112233").unwrap();
        registry.recolor(MaterialCategory::Furniture, new);

        assert_eq!(registry.get(slot::TABLE).unwrap().color(), new);
        assert_eq!(
            registry.get(slot::CHAIR).unwrap().color(),
            new.shaded(0.9)
        );
        assert_eq!(registry.get(slot::SINK_BASIN).unwrap().color(), sink_before);
        assert_eq!(registry.get(slot::STOVE_BODY).unwrap().color(), stove_before);
    }

    #[test]
    fn test_recolor_is_idempotent() {
        let colors = CategoryColors::default();
        let mut registry = MaterialRegistry::build(&colors);
        let new = Rgb::from_hex("#AABBCC").unwrap();

        registry.recolor(MaterialCategory::Sink, new);
        let first = registry.get(slot::SINK_FAUCET).unwrap().base_color;
        registry.recolor(MaterialCategory::Sink, new);
        let second = registry.get(slot::SINK_FAUCET).unwrap().base_color;

        assert_eq!(first, second);
    }

    #[test]
    fn test_recolor_round_trip_through_color_map() {
        let mut colors = CategoryColors::default();
        let mut registry = MaterialRegistry::build(&colors);

        let new = Rgb::from_hex("#336699").unwrap();
        colors.set(MaterialCategory::Walls, new);
        registry.recolor(MaterialCategory::Walls, new);

        assert_eq!(colors.get(MaterialCategory::Walls), new);
        assert_eq!(registry.get(slot::WALL).unwrap().color(), new);

        // A rebuild from the updated map reproduces the live state
        let rebuilt = MaterialRegistry::build(&colors);
        assert_eq!(
            rebuilt.get(slot::WALL).unwrap().base_color,
            registry.get(slot::WALL).unwrap().base_color
        );
    }

    #[test]
    fn test_category_slot_routing() {
        assert_eq!(
            MaterialRegistry::slots_for(MaterialCategory::Furniture),
            vec![slot::TABLE, slot::CHAIR]
        );
        assert_eq!(
            MaterialRegistry::slots_for(MaterialCategory::Sink),
            vec![slot::SINK_BASIN, slot::SINK_INNER, slot::SINK_FAUCET]
        );
    }

    #[test]
    fn test_lamp_bulb_keeps_emissive_across_recolor() {
        let colors = CategoryColors::default();
        let mut registry = MaterialRegistry::build(&colors);

        registry.recolor(MaterialCategory::Appliances, Rgb::from_hex("#101010").unwrap());
        let bulb = registry.get(slot::LAMP_BULB).unwrap();
        assert_eq!(bulb.emissive, [1.0, 1.0, 0.88]);
    }
}
