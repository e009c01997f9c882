//! Dispatch system - turns notices into tasks and routes them to workers
//!
//! Routing is role-scoped on first assignment: the first *available* worker
//! in registration order that holds the task's role gets it. If nobody
//! qualifies the task waits in a single FIFO backlog, which is drained
//! after workers have run by handing the oldest task to whichever worker is
//! available, role or not.

use std::collections::VecDeque;

use hecs::{Entity, World};
use templanter_logic::work::{task_for_notice, Role, TaskKind};

use super::notices::PlantNotice;
use crate::components::{Task, Worker};

/// Where a new task ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Worker(Entity),
    Backlogged,
}

/// Outcome of one payroll run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollReport {
    /// `(worker id, amount)` for each salary paid.
    pub paid: Vec<(u32, i64)>,
    /// `(worker id, amount owed)` for each salary the balance could not cover.
    pub unpaid: Vec<(u32, i64)>,
}

impl PayrollReport {
    pub fn total_paid(&self) -> i64 {
        self.paid.iter().map(|(_, amount)| amount).sum()
    }

    pub fn total_unpaid(&self) -> i64 {
        self.unpaid.iter().map(|(_, amount)| amount).sum()
    }
}

/// Worker roster plus the global backlog (stored in engine)
#[derive(Debug, Default)]
pub struct Dispatcher {
    roster: Vec<Entity>,
    backlog: VecDeque<Task>,
    next_task_id: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worker at the end of the roster. Duplicates are ignored.
    pub fn register(&mut self, worker: Entity) {
        if !self.roster.contains(&worker) {
            self.roster.push(worker);
        }
    }

    /// Remove a worker from the roster. Its queued tasks move to the back
    /// of the backlog in their original order. Returns how many moved.
    pub fn unregister(&mut self, world: &World, worker: Entity) -> usize {
        let Some(index) = self.roster.iter().position(|w| *w == worker) else {
            return 0;
        };
        self.roster.remove(index);

        let Ok(mut w) = world.get::<&mut Worker>(worker) else {
            return 0;
        };
        let orphaned = w.drain_queue();
        let moved = orphaned.len();
        self.backlog.extend(orphaned);
        moved
    }

    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn backlog(&self) -> impl Iterator<Item = &Task> {
        self.backlog.iter()
    }

    pub fn clear(&mut self) {
        self.roster.clear();
        self.backlog.clear();
    }

    fn new_task(&mut self, kind: TaskKind, target: Option<Entity>) -> Task {
        self.next_task_id += 1;
        Task {
            id: self.next_task_id,
            kind,
            target,
        }
    }

    /// Turn a plant notice into a task and route it. Dead plants produce
    /// no task.
    pub fn handle_notice(&mut self, world: &World, notice: &PlantNotice) -> Option<Assignment> {
        let Some(kind) = task_for_notice(notice.notice) else {
            log::debug!(
                "plant {} at ({}, {}) died; nothing to dispatch",
                notice.plant_id,
                notice.pos.x,
                notice.pos.y
            );
            return None;
        };
        Some(self.submit(world, kind, Some(notice.plant)))
    }

    /// Create a task and give it to the first available worker holding its
    /// role, or backlog it. Available means idle with an empty queue; a
    /// qualified worker who still has queued tasks is skipped.
    pub fn submit(
        &mut self,
        world: &World,
        kind: TaskKind,
        target: Option<Entity>,
    ) -> Assignment {
        let task = self.new_task(kind, target);

        for &entity in &self.roster {
            let Ok(mut worker) = world.get::<&mut Worker>(entity) else {
                continue;
            };
            if worker.is_available() && worker.qualifies_for(&task) {
                log::debug!("task {} ({}) -> {}", task.id, kind.label(), worker.name);
                worker.enqueue(task);
                return Assignment::Worker(entity);
            }
        }

        log::debug!("task {} ({}) backlogged", task.id, kind.label());
        self.backlog.push_back(task);
        Assignment::Backlogged
    }

    /// Hand backlog tasks, oldest first, to available workers in roster
    /// order regardless of role. Stops when the backlog is empty or nobody
    /// is available. Returns the number of tasks handed out.
    pub fn drain_backlog(&mut self, world: &World) -> usize {
        let mut handed_out = 0;

        for &entity in &self.roster {
            if self.backlog.is_empty() {
                break;
            }
            let Ok(mut worker) = world.get::<&mut Worker>(entity) else {
                continue;
            };
            if !worker.is_available() {
                continue;
            }
            if let Some(task) = self.backlog.pop_front() {
                log::debug!("backlog task {} ({}) -> {}", task.id, task.kind.label(), worker.name);
                worker.enqueue(task);
                handed_out += 1;
            }
        }

        handed_out
    }

    /// Drop every pending task aimed at `target`, in the backlog and in
    /// worker queues. Returns how many were dropped.
    pub fn cancel_for_target(&mut self, world: &World, target: Entity) -> usize {
        let before = self.backlog.len();
        self.backlog.retain(|t| t.target != Some(target));
        let mut cancelled = before - self.backlog.len();

        for &entity in &self.roster {
            if let Ok(mut worker) = world.get::<&mut Worker>(entity) {
                cancelled += worker.cancel_tasks_targeting(target);
            }
        }
        cancelled
    }

    /// Pay every worker's salary in roster order. A salary the balance
    /// cannot cover is skipped and reported; later workers still get paid
    /// if they can be.
    pub fn pay_all(&self, world: &World, balance: &mut i64) -> PayrollReport {
        let mut report = PayrollReport::default();

        for &entity in &self.roster {
            let Ok(worker) = world.get::<&Worker>(entity) else {
                continue;
            };
            let salary = worker.progression.salary;
            if *balance >= salary {
                *balance -= salary;
                report.paid.push((worker.id, salary));
            } else {
                log::warn!(
                    "cannot pay {} (${}): balance is ${}",
                    worker.name,
                    salary,
                    balance
                );
                report.unpaid.push((worker.id, salary));
            }
        }

        report
    }

    pub fn workers_with_role(&self, world: &World, role: Role) -> Vec<Entity> {
        self.roster
            .iter()
            .copied()
            .filter(|&e| world.get::<&Worker>(e).map_or(false, |w| w.has_role(role)))
            .collect()
    }

    pub fn available_count(&self, world: &World) -> usize {
        self.roster
            .iter()
            .filter(|&&e| world.get::<&Worker>(e).map_or(false, |w| w.is_available()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GridPos;
    use templanter_logic::catalog::PlantKind;
    use templanter_logic::plant::Notice;
    use templanter_logic::skills::SkillSet;

    fn hire(world: &mut World, dispatcher: &mut Dispatcher, id: u32, roles: &[Role]) -> Entity {
        let mut worker = Worker::new(id, format!("Worker {id}"), SkillSet::default(), 50);
        for role in roles {
            worker.grant_role(*role);
        }
        let entity = world.spawn((worker,));
        dispatcher.register(entity);
        entity
    }

    fn notice(plant: Entity, notice: Notice) -> PlantNotice {
        PlantNotice {
            plant,
            plant_id: 1,
            kind: PlantKind::Tomato,
            pos: GridPos::default(),
            notice,
        }
    }

    fn queue_len(world: &World, e: Entity) -> usize {
        world.get::<&Worker>(e).map(|w| w.queue.len()).unwrap_or(0)
    }

    #[test]
    fn test_notice_goes_to_first_qualified_worker() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let waterer = hire(&mut world, &mut d, 1, &[Role::Waterer]);
        let harvester_a = hire(&mut world, &mut d, 2, &[Role::Harvester]);
        let harvester_b = hire(&mut world, &mut d, 3, &[Role::Harvester]);
        let plant = world.spawn(());

        let assignment = d.handle_notice(&world, &notice(plant, Notice::Ripe));
        assert_eq!(assignment, Some(Assignment::Worker(harvester_a)));
        assert_eq!(queue_len(&world, waterer), 0);
        assert_eq!(queue_len(&world, harvester_b), 0);

        // harvester_a now has a queued task, so is no longer available.
        let assignment = d.handle_notice(&world, &notice(plant, Notice::Decaying));
        assert_eq!(assignment, Some(Assignment::Worker(harvester_b)));
    }

    #[test]
    fn test_qualified_worker_with_queue_is_skipped() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let guard = hire(&mut world, &mut d, 1, &[Role::Security]);

        assert_eq!(d.submit(&world, TaskKind::Patrol { zone: 1 }, None), Assignment::Worker(guard));
        assert_eq!(d.submit(&world, TaskKind::Patrol { zone: 2 }, None), Assignment::Backlogged);
        assert_eq!(queue_len(&world, guard), 1);
        assert_eq!(d.backlog_len(), 1);
    }

    #[test]
    fn test_dead_notice_creates_no_task() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        hire(&mut world, &mut d, 1, &[Role::Harvester]);
        let plant = world.spawn(());
        assert_eq!(d.handle_notice(&world, &notice(plant, Notice::Dead)), None);
        assert_eq!(d.backlog_len(), 0);
    }

    #[test]
    fn test_unqualified_goes_to_backlog_then_drains_to_anyone() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let cashier = hire(&mut world, &mut d, 1, &[Role::Cashier]);
        let plant = world.spawn(());

        assert_eq!(
            d.handle_notice(&world, &notice(plant, Notice::Ripe)),
            Some(Assignment::Backlogged)
        );
        assert_eq!(d.backlog_len(), 1);

        assert_eq!(d.drain_backlog(&world), 1);
        assert_eq!(d.backlog_len(), 0);
        assert_eq!(queue_len(&world, cashier), 1);
    }

    #[test]
    fn test_backlog_drain_is_fifo_and_one_per_available_worker() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let plant = world.spawn(());
        for _ in 0..3 {
            d.submit(&world, TaskKind::Water, Some(plant));
        }
        let ids: Vec<u64> = d.backlog().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let a = hire(&mut world, &mut d, 1, &[]);
        let b = hire(&mut world, &mut d, 2, &[]);
        world.get::<&mut Worker>(b).unwrap().start_busy(5.0);

        assert_eq!(d.drain_backlog(&world), 1);
        assert_eq!(world.get::<&Worker>(a).unwrap().queue[0].id, 1);
        assert_eq!(d.backlog().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_rest_goes_to_any_available_worker() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let busy = hire(&mut world, &mut d, 1, &[Role::Security]);
        let free = hire(&mut world, &mut d, 2, &[Role::Cashier]);
        world.get::<&mut Worker>(busy).unwrap().start_busy(1.0);

        assert_eq!(
            d.submit(&world, TaskKind::Rest { minutes: 30.0 }, None),
            Assignment::Worker(free)
        );
        assert_eq!(d.available_count(&world), 0);
    }

    #[test]
    fn test_unregister_returns_queue_to_backlog() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let w = hire(&mut world, &mut d, 1, &[Role::Waterer]);
        let plant = world.spawn(());
        d.submit(&world, TaskKind::Water, Some(plant));
        world.get::<&mut Worker>(w).unwrap().enqueue(Task {
            id: 99,
            kind: TaskKind::Water,
            target: Some(plant),
        });

        assert_eq!(d.unregister(&world, w), 2);
        assert!(d.roster().is_empty());
        assert_eq!(d.backlog().map(|t| t.id).collect::<Vec<_>>(), vec![1, 99]);
        assert_eq!(d.unregister(&world, w), 0);
    }

    #[test]
    fn test_cancel_for_target() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        hire(&mut world, &mut d, 1, &[Role::Waterer]);
        let doomed = world.spawn(());
        let other = world.spawn(());
        d.submit(&world, TaskKind::Water, Some(doomed));
        d.submit(&world, TaskKind::Harvest, Some(doomed));
        d.submit(&world, TaskKind::Harvest, Some(other));

        assert_eq!(d.cancel_for_target(&world, doomed), 2);
        assert_eq!(d.backlog_len(), 1);
    }

    #[test]
    fn test_payroll_skips_unaffordable_and_continues() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let rich = hire(&mut world, &mut d, 1, &[]);
        hire(&mut world, &mut d, 2, &[]);
        hire(&mut world, &mut d, 3, &[]);
        world.get::<&mut Worker>(rich).unwrap().progression.salary = 80;

        // 100: pays 80, cannot pay 50, then cannot pay 50 either (20 left).
        let mut balance = 100;
        let report = d.pay_all(&world, &mut balance);
        assert_eq!(report.paid, vec![(1, 80)]);
        assert_eq!(report.unpaid, vec![(2, 50), (3, 50)]);
        assert_eq!(balance, 20);

        let mut balance = 130;
        let report = d.pay_all(&world, &mut balance);
        assert_eq!(report.total_paid(), 130);
        assert_eq!(report.unpaid, vec![(3, 50)]);
        assert_eq!(balance, 0);
    }

    #[test]
    fn test_workers_with_role() {
        let mut world = World::new();
        let mut d = Dispatcher::new();
        let a = hire(&mut world, &mut d, 1, &[Role::Waterer, Role::Harvester]);
        hire(&mut world, &mut d, 2, &[Role::Cashier]);
        let c = hire(&mut world, &mut d, 3, &[Role::Harvester]);
        assert_eq!(d.workers_with_role(&world, Role::Harvester), vec![a, c]);
    }
}
