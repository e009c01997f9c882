//! Starting profiles for new hires

use rand::Rng;
use templanter_logic::config::SimConfig;
use templanter_logic::skills::SkillSet;

use crate::components::Worker;

/// Roll each skill uniformly from the configured starting range.
pub fn roll_starting_skills(rng: &mut impl Rng, min: u8, max: u8) -> SkillSet {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    SkillSet::new(
        rng.gen_range(lo..=hi),
        rng.gen_range(lo..=hi),
        rng.gen_range(lo..=hi),
        rng.gen_range(lo..=hi),
    )
}

/// A fresh level-1 worker with no roles.
pub fn generate_worker(
    id: u32,
    name: impl Into<String>,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Worker {
    let skills = roll_starting_skills(rng, config.starting_skill_min, config.starting_skill_max);
    Worker::new(id, name, skills, config.base_salary)
}
