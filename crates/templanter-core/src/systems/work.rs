//! Work system - advances busy timers and executes queued tasks
//!
//! Each worker in roster order burns the elapsed minutes off its busy
//! timer; if that leaves it idle with something queued, it pops the oldest
//! task and carries it out. At most one task starts per worker per tick.

use hecs::{Entity, World};
use templanter_logic::catalog::Catalog;
use templanter_logic::config::SimConfig;
use templanter_logic::skills::Skill;
use templanter_logic::work::TaskKind;

use crate::components::{Grid, GridPos, Plant, Task, Worker};

/// What happened when a worker ran a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskOutcome {
    Watered { plant_id: u32 },
    /// The plant was sold; `value` is the stage price, `bonus` the
    /// harvesting-skill extra on top.
    Harvested { plant_id: u32, value: i64, bonus: i64 },
    Served { customer_id: u32 },
    Patrolled { zone: u32 },
    Rested,
    /// The target was gone or no longer in a state the task applies to.
    Skipped,
}

impl TaskOutcome {
    pub fn earnings(&self) -> i64 {
        match self {
            TaskOutcome::Harvested { value, bonus, .. } => value + bonus,
            _ => 0,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TaskOutcome::Skipped)
    }
}

/// One executed task.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkReport {
    pub worker: Entity,
    pub worker_id: u32,
    pub task: Task,
    pub outcome: TaskOutcome,
    pub levels_gained: u32,
}

/// Run every worker in `roster` for `minutes`. Harvested plants are
/// despawned and removed from `grid` immediately, so later workers in the
/// same tick see them as gone.
pub fn work_system(
    world: &mut World,
    grid: &mut Grid,
    roster: &[Entity],
    catalog: &Catalog,
    config: &SimConfig,
    minutes: f32,
    now: u64,
) -> Vec<WorkReport> {
    let mut reports = Vec::new();

    for &entity in roster {
        let (task, worker_id, harvest_level) = {
            let Ok(mut worker) = world.get::<&mut Worker>(entity) else {
                continue;
            };
            worker.advance_timer(minutes);
            let Some(task) = worker.next_task() else {
                continue;
            };
            (task, worker.id, worker.skills.get(Skill::Harvesting))
        };

        let outcome = execute(world, grid, catalog, config, &task, harvest_level, now);

        let Ok(mut worker) = world.get::<&mut Worker>(entity) else {
            continue;
        };
        let duration = worker.duration_for(&task.kind);
        worker.start_busy(duration);

        let levels_gained = if outcome.is_skipped() {
            log::debug!("{} skipped task {} ({})", worker.name, task.id, task.kind.label());
            0
        } else {
            log::debug!(
                "{} finished task {} ({}) in {:.1} min",
                worker.name,
                task.id,
                task.kind.label(),
                duration
            );
            let gained = worker
                .progression
                .gain_experience(task.kind.experience_reward(), config.salary_per_level);
            if gained > 0 {
                log::info!(
                    "{} reached level {}, salary now ${}/day",
                    worker.name,
                    worker.progression.level,
                    worker.progression.salary
                );
            }
            gained
        };
        drop(worker);

        reports.push(WorkReport {
            worker: entity,
            worker_id,
            task,
            outcome,
            levels_gained,
        });
    }

    reports
}

fn execute(
    world: &mut World,
    grid: &mut Grid,
    catalog: &Catalog,
    config: &SimConfig,
    task: &Task,
    harvest_level: u8,
    now: u64,
) -> TaskOutcome {
    match task.kind {
        TaskKind::Water => {
            let Some(target) = task.target else {
                return TaskOutcome::Skipped;
            };
            let Ok(mut plant) = world.get::<&mut Plant>(target) else {
                return TaskOutcome::Skipped;
            };
            if plant.water(now) {
                TaskOutcome::Watered { plant_id: plant.id }
            } else {
                TaskOutcome::Skipped
            }
        }
        TaskKind::Harvest => {
            let Some(target) = task.target else {
                return TaskOutcome::Skipped;
            };
            let (plant_id, pos, value) = {
                let Ok(plant) = world.get::<&Plant>(target) else {
                    return TaskOutcome::Skipped;
                };
                let Some(value) = plant.harvest_value(catalog.info(plant.kind)) else {
                    return TaskOutcome::Skipped;
                };
                (plant.id, GridPos::new(plant.x, plant.y), value)
            };

            let bonus = harvest_bonus(value, harvest_level, config.harvest_skill_bonus);
            if grid.get(pos) == Some(target) {
                grid.clear(pos);
            }
            // The entity was just read, so it exists.
            let _ = world.despawn(target);
            TaskOutcome::Harvested { plant_id, value, bonus }
        }
        TaskKind::ServeCustomer { customer_id } => TaskOutcome::Served { customer_id },
        TaskKind::Patrol { zone } => TaskOutcome::Patrolled { zone },
        TaskKind::Rest { .. } => TaskOutcome::Rested,
    }
}

/// Extra money a skilled harvester gets: `floor(value × rate × (level − 1))`.
pub fn harvest_bonus(value: i64, level: u8, rate: f32) -> i64 {
    let steps = f64::from(level.saturating_sub(1));
    (value as f64 * f64::from(rate) * steps).floor() as i64
}
