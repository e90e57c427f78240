use glam::{Mat4, Vec3};
use rand::prelude::*;

/// Source of randomized launch transforms.
///
/// The scheduler asks once per launch (once per pair for dual-color shells)
/// and uses the returned matrix as-is.
pub trait PlacementProvider {
    fn place(&mut self, base: &Mat4, spread_m: f32) -> Mat4;
}

/// Offsets the base transform by a uniform random x/y translation in
/// `[-spread, spread]`, applied in the base frame.
pub struct RandomPlacement {
    rng: StdRng,
}

impl RandomPlacement {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PlacementProvider for RandomPlacement {
    fn place(&mut self, base: &Mat4, spread_m: f32) -> Mat4 {
        let spread = spread_m.abs();
        let x = (self.rng.gen::<f32>() - 0.5) * 2.0 * spread;
        let y = (self.rng.gen::<f32>() - 0.5) * 2.0 * spread;
        *base * Mat4::from_translation(Vec3::new(x, y, 0.0))
    }
}

impl<P: PlacementProvider + ?Sized> PlacementProvider for Box<P> {
    fn place(&mut self, base: &Mat4, spread_m: f32) -> Mat4 {
        (**self).place(base, spread_m)
    }
}
