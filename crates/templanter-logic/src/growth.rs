//! Growth template: four fixed steps run once per plant per tick.
//!
//! 1. [`GrowthStrategy::check_environment`] derives a modifier from water.
//! 2. [`calculate_growth`] turns rate × minutes × modifier into a delta.
//! 3. [`apply_growth`] adds the delta, clamps, and reports underflow.
//! 4. The stage transition check, which lives on [`crate::plant::Plant`].
//!
//! Strategies only differ in step 1.

use serde::{Deserialize, Serialize};

use crate::catalog::PlantTypeInfo;
use crate::constants::growth::{
    BOOSTED_REDUCED_MODIFIER, DRY_MODIFIER, FULL, GERMINATION_PER_MINUTE, LOW_WATER_THRESHOLD,
    REDUCED_MODIFIER,
};
use crate::lifecycle::GrowthStage;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GrowthStrategy {
    #[default]
    Normal,
    /// Nutrient-fed plants; `multiplier` scales every positive modifier.
    Boosted { multiplier: f32 },
}

impl GrowthStrategy {
    /// Step 1: growth modifier for the current water level.
    pub fn check_environment(&self, water: f32) -> f32 {
        if water <= 0.0 {
            return DRY_MODIFIER;
        }
        match *self {
            GrowthStrategy::Normal => {
                if water < LOW_WATER_THRESHOLD {
                    REDUCED_MODIFIER
                } else {
                    1.0
                }
            }
            GrowthStrategy::Boosted { multiplier } => {
                let base = if water < LOW_WATER_THRESHOLD { BOOSTED_REDUCED_MODIFIER } else { 1.0 };
                base * multiplier
            }
        }
    }

    pub fn is_boosted(&self) -> bool {
        matches!(self, GrowthStrategy::Boosted { .. })
    }
}

/// Step 2: progress delta for `minutes` of growth in `stage`.
///
/// Seeds germinate at a fixed rate regardless of water; ripe, decaying and
/// dead plants do not grow.
pub fn calculate_growth(
    stage: GrowthStage,
    info: &PlantTypeInfo,
    minutes: f32,
    modifier: f32,
) -> f32 {
    match stage {
        GrowthStage::Seed => GERMINATION_PER_MINUTE * minutes,
        GrowthStage::Growing => info.growth_per_minute() * minutes * modifier,
        GrowthStage::Ripe | GrowthStage::Decaying | GrowthStage::Dead => 0.0,
    }
}

/// Step 3: add `delta` to `progress`, clamped to `[0, 100]`.
///
/// Returns `true` when the unclamped result went below zero.
pub fn apply_growth(progress: &mut f32, delta: f32) -> bool {
    let raw = *progress + delta;
    *progress = raw.clamp(0.0, FULL);
    raw < 0.0
}

/// Water lost over `minutes`, independent of stage.
pub fn water_depletion(info: &PlantTypeInfo, minutes: f32) -> f32 {
    info.depletion_per_minute() * minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, PlantKind};

    #[test]
    fn normal_modifiers() {
        let s = GrowthStrategy::Normal;
        assert_eq!(s.check_environment(100.0), 1.0);
        assert_eq!(s.check_environment(20.0), 1.0);
        assert_eq!(s.check_environment(19.9), 0.5);
        assert_eq!(s.check_environment(0.0), -0.2);
    }

    #[test]
    fn boosted_modifiers() {
        let s = GrowthStrategy::Boosted { multiplier: 1.5 };
        assert_eq!(s.check_environment(50.0), 1.5);
        assert!((s.check_environment(10.0) - 1.125).abs() < 1e-6);
        // Dry plants shrink at the same rate whether boosted or not.
        assert_eq!(s.check_environment(0.0), -0.2);
    }

    #[test]
    fn growth_by_stage() {
        let catalog = Catalog::builtin();
        let tomato = catalog.info(PlantKind::Tomato);
        assert_eq!(calculate_growth(GrowthStage::Seed, tomato, 3.0, 0.5), 3.0);
        let growing = calculate_growth(GrowthStage::Growing, tomato, 60.0, 1.0);
        assert!((growing - 100.0 / 72.0).abs() < 1e-4);
        assert_eq!(calculate_growth(GrowthStage::Ripe, tomato, 60.0, 1.0), 0.0);
        assert_eq!(calculate_growth(GrowthStage::Dead, tomato, 60.0, 1.0), 0.0);
    }

    #[test]
    fn apply_clamps_and_reports_underflow() {
        let mut p = 99.5;
        assert!(!apply_growth(&mut p, 2.0));
        assert_eq!(p, 100.0);

        let mut p = 0.01;
        assert!(apply_growth(&mut p, -0.5));
        assert_eq!(p, 0.0);

        let mut p = 0.0;
        assert!(!apply_growth(&mut p, 0.0));
    }

    #[test]
    fn depletion_matches_interval() {
        let catalog = Catalog::builtin();
        let tomato = catalog.info(PlantKind::Tomato);
        // Full tank drains over the 8 h interval.
        assert!((water_depletion(tomato, 480.0) - 100.0).abs() < 1e-3);
    }
}
