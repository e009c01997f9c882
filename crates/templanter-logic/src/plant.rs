//! Per-plant record: the tick update, watering, harvest value and the
//! notices a plant raises for the staff.
//!
//! A plant never reads the catalog on its own; every call that needs the
//! kind's parameters takes the shared [`PlantTypeInfo`] by reference.
//!
//! ```
//! use templanter_logic::catalog::{Catalog, PlantKind};
//! use templanter_logic::lifecycle::GrowthStage;
//! use templanter_logic::plant::Plant;
//!
//! let catalog = Catalog::builtin();
//! let mut basil = Plant::new(1, PlantKind::Basil, 0, 0, 0);
//! basil.update(catalog.info(PlantKind::Basil), 10.0, 10);
//! assert_eq!(basil.stage, GrowthStage::Growing);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{PlantKind, PlantTypeInfo};
use crate::constants::decay::{DEATH_AFTER_MINUTES, DECAYING_VALUE_DIVISOR, RIPE_SHELF_LIFE_MINUTES};
use crate::constants::growth::{FULL, GERMINATION_THRESHOLD, THIRSTY_THRESHOLD};
use crate::growth::{apply_growth, calculate_growth, water_depletion, GrowthStrategy};
use crate::lifecycle::GrowthStage;

/// Something a plant wants the staff to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    NeedsWater,
    Ripe,
    Decaying,
    Dead,
}

impl Notice {
    pub fn name(self) -> &'static str {
        match self {
            Notice::NeedsWater => "NeedsWater",
            Notice::Ripe => "Ripe",
            Notice::Decaying => "Decaying",
            Notice::Dead => "Dead",
        }
    }
}

/// Which notices have already gone out during the current episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeFlags {
    pub needs_water: bool,
    pub ripe: bool,
    pub decaying: bool,
    pub dead: bool,
}

impl NoticeFlags {
    fn clear_stage_flags(&mut self) {
        self.ripe = false;
        self.decaying = false;
        self.dead = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u32,
    pub kind: PlantKind,
    pub x: u32,
    pub y: u32,
    pub stage: GrowthStage,
    /// Growth progress, 0–100.
    pub growth: f32,
    /// Water level, 0–100.
    pub water: f32,
    /// In-world minute of the last successful watering.
    pub last_watered: u64,
    /// Minutes spent ripe or decaying.
    pub decay_timer: f32,
    pub strategy: GrowthStrategy,
    pub notified: NoticeFlags,
}

impl Plant {
    /// A freshly planted seed with a full tank.
    pub fn new(id: u32, kind: PlantKind, x: u32, y: u32, now: u64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            stage: GrowthStage::Seed,
            growth: 0.0,
            water: FULL,
            last_watered: now,
            decay_timer: 0.0,
            strategy: GrowthStrategy::Normal,
            notified: NoticeFlags::default(),
        }
    }

    /// Rebuild a plant from its saved fields. Strategy and notice flags
    /// start fresh, so a restored ripe plant announces itself again on its
    /// first tick. The decay timer starts at zero; callers holding a saved
    /// timer set it afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: u32,
        kind: PlantKind,
        x: u32,
        y: u32,
        stage: GrowthStage,
        growth: f32,
        water: f32,
        last_watered: u64,
    ) -> Self {
        Self {
            stage,
            growth: growth.clamp(0.0, FULL),
            water: water.clamp(0.0, FULL),
            last_watered,
            ..Self::new(id, kind, x, y, last_watered)
        }
    }

    /// Advance this plant by `minutes` of in-world time. `now` is the clock
    /// reading after the advance. Returns the notices raised this tick.
    pub fn update(&mut self, info: &PlantTypeInfo, minutes: f32, now: u64) -> Vec<Notice> {
        if self.stage.is_terminal() || minutes <= 0.0 {
            return Vec::new();
        }

        self.water = (self.water - water_depletion(info, minutes)).max(0.0);

        let modifier = self.strategy.check_environment(self.water);
        let delta = calculate_growth(self.stage, info, minutes, modifier);
        let underflow = apply_growth(&mut self.growth, delta);

        if let Some(next) = self.next_stage(minutes, underflow) {
            self.transition(next);
        }

        self.collect_notices(info, now)
    }

    /// Step 4 of the growth template: decide the stage after this tick's growth.
    fn next_stage(&mut self, minutes: f32, underflow: bool) -> Option<GrowthStage> {
        match self.stage {
            GrowthStage::Seed if self.growth >= GERMINATION_THRESHOLD => Some(GrowthStage::Growing),
            GrowthStage::Growing if underflow => Some(GrowthStage::Decaying),
            GrowthStage::Growing if self.growth >= FULL => Some(GrowthStage::Ripe),
            GrowthStage::Ripe => {
                self.decay_timer += minutes;
                (self.decay_timer > RIPE_SHELF_LIFE_MINUTES).then_some(GrowthStage::Decaying)
            }
            GrowthStage::Decaying => {
                self.decay_timer += minutes;
                (self.decay_timer > DEATH_AFTER_MINUTES).then_some(GrowthStage::Dead)
            }
            _ => None,
        }
    }

    fn transition(&mut self, next: GrowthStage) {
        debug_assert!(self.stage.can_transition_to(next));
        log::debug!(
            "plant {} at ({}, {}): {} -> {}",
            self.id,
            self.x,
            self.y,
            self.stage,
            next
        );
        self.stage = next;
        self.notified.clear_stage_flags();
    }

    fn collect_notices(&mut self, info: &PlantTypeInfo, now: u64) -> Vec<Notice> {
        let mut notices = Vec::new();

        if self.stage.accepts_water() && !self.notified.needs_water && self.needs_water(info, now) {
            self.notified.needs_water = true;
            notices.push(Notice::NeedsWater);
        }

        let (flag, notice) = match self.stage {
            GrowthStage::Ripe => (&mut self.notified.ripe, Notice::Ripe),
            GrowthStage::Decaying => (&mut self.notified.decaying, Notice::Decaying),
            GrowthStage::Dead => (&mut self.notified.dead, Notice::Dead),
            GrowthStage::Seed | GrowthStage::Growing => return notices,
        };
        if !*flag {
            *flag = true;
            notices.push(notice);
        }
        notices
    }

    /// Refill the tank. Returns `false` (and changes nothing) for dead plants.
    pub fn water(&mut self, now: u64) -> bool {
        if !self.stage.accepts_water() {
            return false;
        }
        self.water = FULL;
        self.last_watered = now;
        self.notified.needs_water = false;
        true
    }

    pub fn needs_water(&self, info: &PlantTypeInfo, now: u64) -> bool {
        self.water < THIRSTY_THRESHOLD
            || now.saturating_sub(self.last_watered) > info.water_interval_minutes()
    }

    pub fn can_harvest(&self) -> bool {
        self.stage.can_harvest()
    }

    /// Sale value if harvested now; `None` when not harvestable.
    pub fn harvest_value(&self, info: &PlantTypeInfo) -> Option<i64> {
        match self.stage {
            GrowthStage::Ripe => Some(info.sell_price),
            GrowthStage::Decaying => Some(info.sell_price / DECAYING_VALUE_DIVISOR),
            _ => None,
        }
    }

    /// Switch to boosted growth. Reapplying replaces the multiplier.
    pub fn apply_nutrient(&mut self, multiplier: f32) {
        self.strategy = GrowthStrategy::Boosted { multiplier };
    }
}
