//! External configuration for the kitchen scene
//!
//! Quality, antialiasing and per-category colors are owned by the UI layer
//! and flow into the render session from outside. Quality and antialiasing
//! changes force a full session rebuild; color changes are applied live to
//! the material registry without touching geometry.

use std::fmt;

pub const QUALITY_MIN: u32 = 1;
pub const QUALITY_MAX: u32 = 100;
pub const DEFAULT_QUALITY: u32 = 25;

/// Semantic retexturing category
///
/// Each category routes a recolor request to one or more concrete material
/// slots (see `gfx::resources::material`). Every slot belongs to exactly one
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    Walls,
    Floor,
    Counter,
    Furniture,
    Appliances,
    Sink,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 6] = [
        MaterialCategory::Walls,
        MaterialCategory::Floor,
        MaterialCategory::Counter,
        MaterialCategory::Furniture,
        MaterialCategory::Appliances,
        MaterialCategory::Sink,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Walls => "Walls",
            MaterialCategory::Floor => "Floor",
            MaterialCategory::Counter => "Counter",
            MaterialCategory::Furniture => "Furniture",
            MaterialCategory::Appliances => "Appliances",
            MaterialCategory::Sink => "Sink",
        }
    }

    fn index(&self) -> usize {
        match self {
            MaterialCategory::Walls => 0,
            MaterialCategory::Floor => 1,
            MaterialCategory::Counter => 2,
            MaterialCategory::Furniture => 3,
            MaterialCategory::Appliances => 4,
            MaterialCategory::Sink => 5,
        }
    }
}

/// An RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` hex string (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Scales the color toward black (factor < 1) or white-clamped (factor > 1)
    pub fn shaded(&self, factor: f32) -> Self {
        Self::new(
            (self.r * factor).clamp(0.0, 1.0),
            (self.g * factor).clamp(0.0, 1.0),
            (self.b * factor).clamp(0.0, 1.0),
        )
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02X}{:02X}{:02X}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }
}

/// Authoritative category → color mapping
///
/// This map is the single source of truth for retexturing: it outlives
/// session rebuilds, and the material registry is rebuilt from it. Materials
/// are projections of this state, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryColors {
    colors: [Rgb; 6],
}

impl Default for CategoryColors {
    fn default() -> Self {
        let parse = |hex| Rgb::from_hex(hex).expect("default palette entry is valid hex");
        Self {
            colors: [
                parse("#DEB887"), // walls
                parse("#808080"), // floor
                parse("#8B4513"), // counter
                parse("#654321"), // furniture
                parse("#2F4F4F"), // appliances
                parse("#C0C0C0"), // sink
            ],
        }
    }
}

impl CategoryColors {
    pub fn get(&self, category: MaterialCategory) -> Rgb {
        self.colors[category.index()]
    }

    pub fn set(&mut self, category: MaterialCategory, color: Rgb) {
        self.colors[category.index()] = color;
    }
}

/// Rebuild-relevant configuration
///
/// Colors are deliberately not part of this struct: a color change never
/// triggers a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    /// Tessellation quality in `[1, 100]`
    pub quality: u32,
    /// 4x MSAA when set
    pub antialias: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            antialias: true,
        }
    }
}

impl RoomConfig {
    /// Saturates quality into its valid range
    pub fn clamped(mut self) -> Self {
        self.quality = self.quality.clamp(QUALITY_MIN, QUALITY_MAX);
        self
    }

    /// True when moving from `previous` to `self` requires a full
    /// teardown/rebuild of the render session
    pub fn needs_rebuild(&self, previous: &RoomConfig) -> bool {
        self != previous
    }
}

/// A configuration change emitted by the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigEvent {
    SetQuality(u32),
    SetAntialias(bool),
    SetColor(MaterialCategory, Rgb),
    CaptureScreenshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#DEB887", "#808080", "#112233", "#000000", "#FFFFFF"] {
            let color = Rgb::from_hex(hex).unwrap();
            assert_eq!(color.to_string(), hex);
        }
    }

    #[test]
    fn test_hex_rejects_malformed_input() {
        assert!(Rgb::from_hex("#12345").is_none());
        assert!(Rgb::from_hex("#1234567").is_none());
        assert!(Rgb::from_hex("#GGHHII").is_none());
        assert!(Rgb::from_hex("").is_none());
    }

    #[test]
    fn test_default_palette() {
        let colors = CategoryColors::default();
        assert_eq!(colors.get(MaterialCategory::Walls).to_string(), "#DEB887");
        assert_eq!(colors.get(MaterialCategory::Sink).to_string(), "#C0C0C0");
    }

    #[test]
    fn test_color_map_set_is_isolated() {
        let mut colors = CategoryColors::default();
        let new = Rgb::from_hex("#112233").unwrap();
        colors.set(MaterialCategory::Furniture, new);

        assert_eq!(colors.get(MaterialCategory::Furniture), new);
        assert_eq!(
            colors.get(MaterialCategory::Sink),
            CategoryColors::default().get(MaterialCategory::Sink)
        );
        assert_eq!(
            colors.get(MaterialCategory::Appliances),
            CategoryColors::default().get(MaterialCategory::Appliances)
        );
    }

    #[test]
    fn test_needs_rebuild_on_quality_change() {
        let previous = RoomConfig {
            quality: 25,
            antialias: true,
        };
        let changed = RoomConfig {
            quality: 50,
            antialias: true,
        };
        assert!(changed.needs_rebuild(&previous));
        assert!(!previous.needs_rebuild(&previous));
    }

    #[test]
    fn test_needs_rebuild_on_antialias_change() {
        let previous = RoomConfig::default();
        let changed = RoomConfig {
            antialias: false,
            ..previous
        };
        assert!(changed.needs_rebuild(&previous));
    }

    #[test]
    fn test_quality_clamping() {
        let config = RoomConfig {
            quality: 0,
            antialias: true,
        };
        assert_eq!(config.clamped().quality, QUALITY_MIN);

        let config = RoomConfig {
            quality: 500,
            antialias: true,
        };
        assert_eq!(config.clamped().quality, QUALITY_MAX);
    }
}
