//! Target placement
//!
//! The play area is queried on every spawn, so a resized window takes effect
//! on the next target.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Supplies the current size of the visible play area
pub trait PlayArea {
    /// (width, height) of the visible area
    fn bounds(&self) -> Vec2;
}

/// Any closure returning a size is a bounds provider
impl<F: Fn() -> Vec2> PlayArea for F {
    fn bounds(&self) -> Vec2 {
        self()
    }
}

/// A play area of constant size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPlayArea {
    pub width: f32,
    pub height: f32,
}

impl FixedPlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for FixedPlayArea {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_PLAY_WIDTH,
            crate::consts::DEFAULT_PLAY_HEIGHT,
        )
    }
}

impl PlayArea for FixedPlayArea {
    fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Pick a top-left corner so a `target_size` square stays fully inside `bounds`.
///
/// Uniform over `[0, width - size] x [0, height - size]`. An area smaller than
/// the target collapses that axis to 0.
pub fn random_target_position<R: Rng>(bounds: Vec2, target_size: f32, rng: &mut R) -> Vec2 {
    let max = (bounds - Vec2::splat(target_size)).max(Vec2::ZERO);
    // NaN bounds would poison the range below
    let max = Vec2::new(finite_or_zero(max.x), finite_or_zero(max.y));
    Vec2::new(rng.random_range(0.0..=max.x), rng.random_range(0.0..=max.y))
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
