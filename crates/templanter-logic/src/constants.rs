//! Fixed greenhouse rules. These thresholds are part of the lifecycle
//! definition rather than tunable settings (see [`crate::config`] for those).

pub mod growth {
    /// Upper bound for growth progress and water level.
    pub const FULL: f32 = 100.0;
    /// Germination rate while in the seed stage (progress points per minute).
    pub const GERMINATION_PER_MINUTE: f32 = 1.0;
    /// Seed stage ends once progress reaches this value.
    pub const GERMINATION_THRESHOLD: f32 = 10.0;
    /// Below this water level growth runs at the reduced modifier.
    pub const LOW_WATER_THRESHOLD: f32 = 20.0;
    /// Below this water level the plant asks to be watered.
    pub const THIRSTY_THRESHOLD: f32 = 30.0;
    pub const REDUCED_MODIFIER: f32 = 0.5;
    pub const BOOSTED_REDUCED_MODIFIER: f32 = 0.75;
    /// Growth direction and scale when completely dry (fraction of normal rate).
    pub const DRY_MODIFIER: f32 = -0.2;
    pub const DEFAULT_BOOST: f32 = 1.5;
}

pub mod decay {
    /// Minutes a ripe plant keeps before it starts decaying.
    pub const RIPE_SHELF_LIFE_MINUTES: f32 = 24.0 * 60.0;
    /// Total decay-timer minutes after which a plant dies.
    pub const DEATH_AFTER_MINUTES: f32 = 72.0 * 60.0;
    /// Harvest value divisor while decaying.
    pub const DECAYING_VALUE_DIVISOR: i64 = 2;
}

pub mod time {
    pub const MINUTES_PER_HOUR: u32 = 60;
    pub const HOURS_PER_DAY: u32 = 24;
}

pub mod staff {
    pub const MIN_SKILL: u8 = 1;
    pub const MAX_SKILL: u8 = 5;
    /// Experience needed per overall level (threshold = level × this).
    pub const EXPERIENCE_PER_LEVEL: u32 = 100;
    /// Speed multiplier by skill level 1..=5.
    pub const SKILL_EFFICIENCY: [f32; 5] = [1.0, 1.18, 1.43, 1.82, 2.5];
}

pub mod grid {
    /// Largest number of tiles a greenhouse grid may have.
    pub const MAX_CELLS: u32 = 65_536;
}
