//! Tunable simulation settings.
//!
//! Everything a scenario or save slot may want to change lives in
//! [`SimConfig`]; lifecycle thresholds that define the rules themselves are
//! in [`crate::constants`]. Missing JSON fields fall back to the defaults,
//! so a config file only needs the values it overrides.
//!
//! ```
//! use templanter_logic::config::SimConfig;
//!
//! let config = SimConfig::from_json(r#"{ "starting_money": 1000 }"#).unwrap();
//! assert_eq!(config.starting_money, 1000);
//! assert_eq!(config.grid_width, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::grid::MAX_CELLS;
use crate::constants::growth::DEFAULT_BOOST;
use crate::constants::staff::{MAX_SKILL, MIN_SKILL};

/// Clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Real seconds that make up one in-world minute.
    pub real_seconds_per_minute: f32,
    pub day_start_hour: u32,
    pub night_start_hour: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            real_seconds_per_minute: 1.0,
            day_start_hour: 6,
            night_start_hour: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub time: TimeConfig,
    pub grid_width: u32,
    pub grid_height: u32,
    pub starting_money: i64,
    pub hire_cost: i64,
    /// Daily salary of a freshly hired level-1 worker.
    pub base_salary: i64,
    /// Salary raise per overall level gained.
    pub salary_per_level: i64,
    /// Inclusive range for each starting skill of a new hire.
    pub starting_skill_min: u8,
    pub starting_skill_max: u8,
    /// Fraction of harvest value added per harvesting level above 1.
    pub harvest_skill_bonus: f32,
    /// Growth multiplier applied by a nutrient pack.
    pub nutrient_boost: f32,
    pub nutrient_cost: i64,
    /// Price of training a skill up to each star level; index 0 is unused.
    pub training_costs: [i64; 5],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            grid_width: 3,
            grid_height: 3,
            starting_money: 500,
            hire_cost: 150,
            base_salary: 50,
            salary_per_level: 5,
            starting_skill_min: 1,
            starting_skill_max: 2,
            harvest_skill_bonus: 0.05,
            nutrient_boost: DEFAULT_BOOST,
            nutrient_cost: 50,
            training_costs: [0, 100, 250, 500, 1000],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

impl SimConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Cost of training a skill from `current` to the next star.
    pub fn training_cost(&self, current: u8) -> i64 {
        let next = usize::from(current.min(MAX_SKILL - 1)) + 1;
        self.training_costs[next - 1]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |field, reason: &str| ConfigError::OutOfRange {
            field,
            reason: reason.to_string(),
        };

        let seconds = self.time.real_seconds_per_minute;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(out_of_range("time.real_seconds_per_minute", "must be > 0"));
        }
        if self.time.day_start_hour >= self.time.night_start_hour
            || self.time.night_start_hour > 24
        {
            return Err(out_of_range(
                "time.day_start_hour",
                "must be before night_start_hour, both within a day",
            ));
        }
        if !grid_size_ok(self.grid_width, self.grid_height) {
            return Err(out_of_range(
                "grid",
                "width and height must be non-zero, at most 65536 tiles",
            ));
        }
        if self.starting_money < 0
            || self.hire_cost < 0
            || self.base_salary < 0
            || self.salary_per_level < 0
            || self.nutrient_cost < 0
            || self.training_costs.iter().any(|c| *c < 0)
        {
            return Err(out_of_range("economy", "money values must not be negative"));
        }
        if self.starting_skill_min < MIN_SKILL
            || self.starting_skill_max > MAX_SKILL
            || self.starting_skill_min > self.starting_skill_max
        {
            return Err(out_of_range("starting_skill", "must be an ordered range within 1..=5"));
        }
        if !(0.0..=1.0).contains(&self.harvest_skill_bonus) {
            return Err(out_of_range("harvest_skill_bonus", "must be within 0..=1"));
        }
        if !self.nutrient_boost.is_finite() || self.nutrient_boost < 1.0 {
            return Err(out_of_range("nutrient_boost", "must be >= 1"));
        }
        Ok(())
    }
}

/// Non-empty and no more than [`MAX_CELLS`] tiles.
pub fn grid_size_ok(width: u32, height: u32) -> bool {
    width > 0
        && height > 0
        && width.checked_mul(height).map_or(false, |cells| cells <= MAX_CELLS)
}
