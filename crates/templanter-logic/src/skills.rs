//! Worker skills, speed lookup and experience-driven progression.
//!
//! Each worker has four star ratings (1–5). A skill's level turns into a
//! speed multiplier through [`skill_efficiency`]; task time is the base
//! duration divided by that multiplier. Overall level is separate and
//! raised by experience: every level costs `level × 100` experience and
//! raises the daily salary.
//!
//! ```
//! use templanter_logic::skills::Progression;
//!
//! let mut p = Progression::new(50);
//! assert_eq!(p.gain_experience(150, 5), 1);
//! assert_eq!((p.level, p.experience, p.salary), (2, 50, 55));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::staff::{EXPERIENCE_PER_LEVEL, MAX_SKILL, MIN_SKILL, SKILL_EFFICIENCY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Watering,
    Harvesting,
    Cashiering,
    Security,
}

impl Skill {
    pub const ALL: [Skill; 4] =
        [Skill::Watering, Skill::Harvesting, Skill::Cashiering, Skill::Security];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Watering => "watering",
            Skill::Harvesting => "harvesting",
            Skill::Cashiering => "cashiering",
            Skill::Security => "security",
        }
    }

    /// Case-insensitive; also accepts `"cashier"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "watering" => Some(Skill::Watering),
            "harvesting" => Some(Skill::Harvesting),
            "cashiering" | "cashier" => Some(Skill::Cashiering),
            "security" => Some(Skill::Security),
            _ => None,
        }
    }
}

/// Star ratings for the four skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub watering: u8,
    pub harvesting: u8,
    pub cashiering: u8,
    pub security: u8,
}

impl Default for SkillSet {
    fn default() -> Self {
        Self::uniform(MIN_SKILL)
    }
}

impl SkillSet {
    pub fn uniform(level: u8) -> Self {
        let level = level.clamp(MIN_SKILL, MAX_SKILL);
        Self {
            watering: level,
            harvesting: level,
            cashiering: level,
            security: level,
        }
    }

    /// Build from explicit levels, clamping each into 1..=5.
    pub fn new(watering: u8, harvesting: u8, cashiering: u8, security: u8) -> Self {
        let c = |v: u8| v.clamp(MIN_SKILL, MAX_SKILL);
        Self {
            watering: c(watering),
            harvesting: c(harvesting),
            cashiering: c(cashiering),
            security: c(security),
        }
    }

    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Watering => self.watering,
            Skill::Harvesting => self.harvesting,
            Skill::Cashiering => self.cashiering,
            Skill::Security => self.security,
        }
    }

    fn get_mut(&mut self, skill: Skill) -> &mut u8 {
        match skill {
            Skill::Watering => &mut self.watering,
            Skill::Harvesting => &mut self.harvesting,
            Skill::Cashiering => &mut self.cashiering,
            Skill::Security => &mut self.security,
        }
    }

    /// Raise a skill by one star. Returns `false` if already at the cap.
    pub fn train(&mut self, skill: Skill) -> bool {
        let level = self.get_mut(skill);
        if *level >= MAX_SKILL {
            return false;
        }
        *level += 1;
        true
    }

    pub fn efficiency(&self, skill: Skill) -> f32 {
        skill_efficiency(self.get(skill))
    }
}

/// Speed multiplier for a skill level. Out-of-range levels clamp into 1..=5.
pub fn skill_efficiency(level: u8) -> f32 {
    let index = level.clamp(MIN_SKILL, MAX_SKILL) - MIN_SKILL;
    SKILL_EFFICIENCY[usize::from(index)]
}

/// Minutes a task of `base_minutes` takes at `level`.
pub fn task_duration(base_minutes: f32, level: u8) -> f32 {
    base_minutes / skill_efficiency(level)
}

/// Overall level, experience toward the next level, and daily salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub experience: u32,
    pub salary: i64,
}

impl Progression {
    pub fn new(salary: i64) -> Self {
        Self {
            level: 1,
            experience: 0,
            salary,
        }
    }

    /// Experience needed to leave the current level.
    pub fn threshold(&self) -> u32 {
        self.level.saturating_mul(EXPERIENCE_PER_LEVEL)
    }

    /// Add experience and apply every level-up it pays for. Returns the
    /// number of levels gained.
    pub fn gain_experience(&mut self, amount: u32, salary_increment: i64) -> u32 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while self.experience >= self.threshold() {
            self.experience -= self.threshold();
            self.level += 1;
            self.salary += salary_increment;
            gained += 1;
        }
        gained
    }
}
