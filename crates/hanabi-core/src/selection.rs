use crate::constants::*;
use crate::error::{ShowError, ShowResult};
use rand::prelude::*;
use smallvec::SmallVec;
use std::str::FromStr;

/// Firework shapes available in the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireworkCategory {
    Kiku,
    Botan,
    Meshibe,
    Poka,
    Kanmukiku,
    Heart,
    Love,
}

/// Static per-category look.
///
/// Fields:
/// - `particle_count`: directions generated per shell (0 for model-driven shapes)
/// - `point_size`: rendered point size in pixels
/// - `radius_m`: bloom radius in meters
/// - `bloom_duration_s`: how long the bloom stage lasts
/// - `times`: trail repeats per particle
/// - `gravity_strength`: downward pull applied by the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryPreset {
    pub particle_count: u32,
    pub point_size: f32,
    pub radius_m: f32,
    pub bloom_duration_s: f32,
    pub times: u32,
    pub gravity_strength: f32,
}

impl FireworkCategory {
    pub const ALL: [FireworkCategory; 7] = [
        FireworkCategory::Kiku,
        FireworkCategory::Botan,
        FireworkCategory::Meshibe,
        FireworkCategory::Poka,
        FireworkCategory::Kanmukiku,
        FireworkCategory::Heart,
        FireworkCategory::Love,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FireworkCategory::Kiku => "kiku",
            FireworkCategory::Botan => "botan",
            FireworkCategory::Meshibe => "meshibe",
            FireworkCategory::Poka => "poka",
            FireworkCategory::Kanmukiku => "kanmukiku",
            FireworkCategory::Heart => "heart",
            FireworkCategory::Love => "love",
        }
    }

    pub fn preset(self) -> CategoryPreset {
        let (particle_count, radius_m, bloom_duration_s, times, gravity_strength) = match self {
            FireworkCategory::Kiku => (300, 800.0, 2.0, 20, 1.0),
            FireworkCategory::Botan => (300, 800.0, 2.0, 10, 1.0),
            FireworkCategory::Meshibe => (250, 800.0, 3.0, 60, 1.0),
            FireworkCategory::Kanmukiku => (250, 800.0, 3.0, 60, 1.0),
            // slow opening, so a longer bloom
            FireworkCategory::Poka => (150, 200.0, 4.0, 80, 4.0),
            FireworkCategory::Heart | FireworkCategory::Love => (0, 50.0, 2.0, 1, 1.0),
        };
        CategoryPreset {
            particle_count,
            point_size: 4.0,
            radius_m,
            bloom_duration_s,
            times,
            gravity_strength,
        }
    }

    /// Dual-color shells launch an inner and an outer layer together.
    #[inline]
    pub fn is_paired(self) -> bool {
        matches!(self, FireworkCategory::Botan | FireworkCategory::Meshibe)
    }

    /// Shapes whose particle directions come from an external model.
    #[inline]
    pub fn uses_model_positions(self) -> bool {
        matches!(self, FireworkCategory::Heart | FireworkCategory::Love)
    }
}

impl FromStr for FireworkCategory {
    type Err = ShowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FireworkCategory::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ShowError::UnknownCategory(s.to_owned()))
    }
}

/// Linear RGBA color in 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> ShowResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(ShowError::InvalidColor(hex.to_owned()));
        }
        let mut channels = [1.0_f32; 4];
        for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
            let pair =
                std::str::from_utf8(chunk).map_err(|_| ShowError::InvalidColor(hex.to_owned()))?;
            let value =
                u8::from_str_radix(pair, 16).map_err(|_| ShowError::InvalidColor(hex.to_owned()))?;
            channels[i] = value as f32 / 255.0;
        }
        Ok(Rgba(channels))
    }
}

/// Named palette entries, each with a primary and a secondary color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorPreset {
    HotPink,
    Yellow,
    Pink,
    Purple,
    Orange,
    Red,
    Green,
    Cream,
    White,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 9] = [
        ColorPreset::HotPink,
        ColorPreset::Yellow,
        ColorPreset::Pink,
        ColorPreset::Purple,
        ColorPreset::Orange,
        ColorPreset::Red,
        ColorPreset::Green,
        ColorPreset::Cream,
        ColorPreset::White,
    ];

    pub const DEFAULT: ColorPreset = ColorPreset::HotPink;

    pub fn key(self) -> &'static str {
        match self {
            ColorPreset::HotPink => "hotPink",
            ColorPreset::Yellow => "yellow",
            ColorPreset::Pink => "pink",
            ColorPreset::Purple => "purple",
            ColorPreset::Orange => "orange",
            ColorPreset::Red => "red",
            ColorPreset::Green => "green",
            ColorPreset::Cream => "cream",
            ColorPreset::White => "white",
        }
    }

    /// `(primary, secondary)` hex strings.
    pub fn hex(self) -> (&'static str, &'static str) {
        match self {
            ColorPreset::HotPink => ("#ff4181", "#fdc322"),
            ColorPreset::Yellow => ("#fdc322", "#4483f9"),
            ColorPreset::Pink => ("#ffa6ea", "#ecf1ff"),
            ColorPreset::Purple => ("#8775ff", "#4effc1"),
            ColorPreset::Orange => ("#ff8c4e", "#9788ff"),
            ColorPreset::Red => ("#e00100", "#ffe0af"),
            ColorPreset::Green => ("#00de0b", "#ff7bdf"),
            ColorPreset::Cream => ("#ffe0af", "#ff6c1d"),
            ColorPreset::White => ("#ecf1ff", "#5bcf21"),
        }
    }

    pub fn primary(self) -> Rgba {
        Rgba::from_hex(self.hex().0).unwrap_or(Rgba::WHITE)
    }

    pub fn secondary(self) -> Rgba {
        Rgba::from_hex(self.hex().1).unwrap_or(Rgba::WHITE)
    }

    pub fn random(rng: &mut impl Rng) -> ColorPreset {
        *ColorPreset::ALL.choose(rng).unwrap_or(&ColorPreset::DEFAULT)
    }

    /// Up to `count` distinct presets in random order.
    pub fn random_palette(rng: &mut impl Rng, count: usize) -> Palette {
        ColorPreset::ALL
            .choose_multiple(rng, count.min(ColorPreset::ALL.len()))
            .copied()
            .collect()
    }
}

impl FromStr for ColorPreset {
    type Err = ShowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorPreset::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ShowError::UnknownColorPreset(s.to_owned()))
    }
}

pub type Palette = SmallVec<[ColorPreset; RANDOM_PALETTE_SIZE]>;

/// How a selection is colored.
#[derive(Clone, Debug, PartialEq)]
pub enum FireworkColor {
    Preset(ColorPreset),
    Custom { primary: Rgba, secondary: Rgba },
    /// Burst slot `k` uses entry `k mod len`; an empty palette falls back to
    /// the default preset.
    Random(Palette),
}

impl FireworkColor {
    /// `(primary, secondary)` for launch slot `slot`.
    pub fn for_slot(&self, slot: usize) -> (Rgba, Rgba) {
        match self {
            FireworkColor::Preset(p) => (p.primary(), p.secondary()),
            FireworkColor::Custom { primary, secondary } => (*primary, *secondary),
            FireworkColor::Random(palette) => {
                let p = if palette.is_empty() {
                    ColorPreset::DEFAULT
                } else {
                    palette[slot % palette.len()]
                };
                (p.primary(), p.secondary())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BurstType {
    #[default]
    Simultaneous,
    /// Slot `k` launches `k * STAGGER_SUB_DELAY_MS` after the selection offset.
    Staggered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LaunchMode {
    #[default]
    Solo,
    Burst(BurstType),
}

impl LaunchMode {
    #[inline]
    pub fn slot_count(self) -> usize {
        match self {
            LaunchMode::Solo => 1,
            LaunchMode::Burst(_) => BURST_COUNT,
        }
    }

    #[inline]
    pub fn is_staggered(self) -> bool {
        matches!(self, LaunchMode::Burst(BurstType::Staggered))
    }
}

/// One user-authored firework placed on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub category: FireworkCategory,
    pub color: FireworkColor,
    pub particle_count: u32,
    pub point_size: f32,
    pub radius_m: f32,
    pub launch_duration_s: f32,
    pub bloom_duration_s: f32,
    pub launch_height_m: f32,
    pub times: u32,
    pub gravity_strength: f32,
    pub mode: LaunchMode,
}

impl Selection {
    /// A solo selection using the category's preset look.
    pub fn new(category: FireworkCategory) -> Self {
        let preset = category.preset();
        Self {
            category,
            color: FireworkColor::Preset(ColorPreset::DEFAULT),
            particle_count: preset.particle_count,
            point_size: preset.point_size,
            radius_m: preset.radius_m,
            launch_duration_s: DEFAULT_LAUNCH_DURATION_S,
            bloom_duration_s: preset.bloom_duration_s,
            launch_height_m: DEFAULT_LAUNCH_HEIGHT_METERS,
            times: preset.times,
            gravity_strength: preset.gravity_strength,
            mode: LaunchMode::Solo,
        }
    }

    pub fn with_color(mut self, color: FireworkColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_mode(mut self, mode: LaunchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_launch_height(mut self, meters: f32) -> Self {
        self.launch_height_m = meters;
        self
    }

    pub fn with_durations(mut self, launch_s: f32, bloom_s: f32) -> Self {
        self.launch_duration_s = launch_s;
        self.bloom_duration_s = bloom_s;
        self
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.mode.slot_count()
    }

    /// Entities this selection expands into.
    #[inline]
    pub fn entity_count(&self) -> usize {
        let per_slot = if self.category.is_paired() { 2 } else { 1 };
        self.slot_count() * per_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_rgb_and_rgba() {
        let c = Rgba::from_hex("#ff0000").unwrap();
        assert_eq!(c.0, [1.0, 0.0, 0.0, 1.0]);
        let c = Rgba::from_hex("00ff0080").unwrap();
        assert!((c.0[3] - 128.0 / 255.0).abs() < 1e-6);
        assert!(Rgba::from_hex("#38a4cfff").is_ok());
    }

    #[test]
    fn hex_parsing_rejects_garbage() {
        for bad in ["", "#fff", "#gg0000", "#ff00001", "#ｆｆ00"] {
            assert_eq!(
                Rgba::from_hex(bad),
                Err(ShowError::InvalidColor(bad.to_owned()))
            );
        }
    }

    #[test]
    fn every_preset_color_parses() {
        for p in ColorPreset::ALL {
            let (a, b) = p.hex();
            assert!(Rgba::from_hex(a).is_ok(), "{a}");
            assert!(Rgba::from_hex(b).is_ok(), "{b}");
        }
    }

    #[test]
    fn category_keys_round_trip() {
        for c in FireworkCategory::ALL {
            assert_eq!(c.key().parse::<FireworkCategory>(), Ok(c));
        }
        assert!("peony".parse::<FireworkCategory>().is_err());
        assert_eq!("HOTPINK".parse::<ColorPreset>(), Ok(ColorPreset::HotPink));
    }

    #[test]
    fn entity_count_follows_mode_and_pairing() {
        let solo = Selection::new(FireworkCategory::Kiku);
        assert_eq!(solo.entity_count(), 1);
        let paired = Selection::new(FireworkCategory::Botan);
        assert_eq!(paired.entity_count(), 2);
        let burst = solo
            .clone()
            .with_mode(LaunchMode::Burst(BurstType::Staggered));
        assert_eq!(burst.entity_count(), 5);
        let paired_burst = paired.with_mode(LaunchMode::Burst(BurstType::Simultaneous));
        assert_eq!(paired_burst.entity_count(), 10);
    }

    #[test]
    fn random_palette_cycles_per_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = ColorPreset::random_palette(&mut rng, RANDOM_PALETTE_SIZE);
        assert_eq!(palette.len(), RANDOM_PALETTE_SIZE);
        let mut unique = palette.to_vec();
        unique.sort_by_key(|p| p.key());
        unique.dedup();
        assert_eq!(unique.len(), palette.len());
        let color = FireworkColor::Random(palette.clone());
        assert_eq!(color.for_slot(0), color.for_slot(RANDOM_PALETTE_SIZE));
        assert_eq!(color.for_slot(1).0, palette[1].primary());
    }
}
