//! Small scalar/vector helpers shared by the force, spring and scene code

use rand::Rng;

use crate::simulation::states::{Color, NVec2};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &NVec2, b: &NVec2) -> f64 {
    (b - a).norm()
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Random opaque color, each channel uniform in [0, 1)
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color {
        r: rng.random::<f32>(),
        g: rng.random::<f32>(),
        b: rng.random::<f32>(),
    }
}
