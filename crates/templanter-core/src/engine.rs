//! Simulation engine - main entry point for running the greenhouse
//!
//! [`Greenhouse`] owns the ECS world, the planting grid, the clock, the
//! dispatcher and the money. Each in-world minute runs in a fixed order:
//!
//! 1. clock tick
//! 2. growth pass over the grid (row-major), publishing notices
//! 3. notices drained into the dispatcher (assignment or backlog)
//! 4. workers advance timers and run queued tasks
//! 5. backlog drained into workers that are now available
//! 6. payroll, when the tick rolled the day over
//!
//! Player actions take `&mut self`, so they can only happen between ticks.

use std::io::{Read, Write};
use std::sync::Arc;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use templanter_logic::catalog::{Catalog, PlantKind};
use templanter_logic::clock::{SimClock, Tick};
use templanter_logic::config::{grid_size_ok, ConfigError, SimConfig};
use templanter_logic::constants::grid::MAX_CELLS;
use templanter_logic::skills::Skill;
use templanter_logic::work::{Role, TaskKind};

use crate::components::*;
use crate::error::ActionError;
use crate::generation::{generate_name, generate_worker};
use crate::persistence::{
    read_save, write_save, ClockRecord, PlantRecord, SaveData, SaveError, SaveFormat, WorkerRecord,
    SAVE_VERSION,
};
use crate::systems::*;

/// Running totals kept across saves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub plants_planted: u64,
    pub plants_harvested: u64,
    /// Money earned from harvests, skill bonuses included.
    pub harvest_income: i64,
    pub tasks_completed: u64,
    /// Tasks whose target had vanished or no longer applied.
    pub tasks_skipped: u64,
    pub salaries_paid: i64,
    pub salaries_missed: u64,
}

/// Everything that happened during one in-world minute.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: Tick,
    pub notices: usize,
    pub work: Vec<WorkReport>,
    pub backlog_assigned: usize,
    pub payroll: Option<PayrollReport>,
}

/// Read-only view of a plant for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantView {
    pub id: u32,
    pub pos: GridPos,
    pub kind: PlantKind,
    pub name: String,
    pub stage: &'static str,
    pub growth_percent: f32,
    pub water_percent: f32,
    pub needs_water: bool,
    pub can_harvest: bool,
    pub boosted: bool,
}

/// Read-only view of a worker for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerView {
    pub id: u32,
    pub name: String,
    pub busy: bool,
    pub busy_remaining: f32,
    pub roles: Vec<Role>,
    pub level: u32,
    pub experience: u32,
    pub salary: i64,
    pub skills: templanter_logic::skills::SkillSet,
    pub queued: usize,
    pub zone: Option<u32>,
}

/// Main simulation engine
pub struct Greenhouse {
    /// ECS world containing plants and workers
    pub world: World,
    catalog: Arc<Catalog>,
    config: SimConfig,
    clock: SimClock,
    grid: Grid,
    dispatcher: Dispatcher,
    notices: NoticeChannel,
    balance: i64,
    stats: Statistics,
    rng: StdRng,
    next_plant_id: u32,
    next_worker_id: u32,
}

impl Greenhouse {
    /// A new greenhouse with the built-in catalog and an entropy-seeded RNG.
    pub fn new(config: SimConfig) -> Self {
        Self::with_catalog(config, Arc::new(Catalog::builtin()), StdRng::from_entropy())
    }

    /// Deterministic greenhouse for tests and replays.
    pub fn with_seed(config: SimConfig, seed: u64) -> Self {
        Self::with_catalog(config, Arc::new(Catalog::builtin()), StdRng::seed_from_u64(seed))
    }

    /// Seeded greenhouse that refuses a config `SimConfig::validate` rejects.
    /// The other constructors trust their config.
    pub fn validated(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_seed(config, seed))
    }

    pub fn with_catalog(config: SimConfig, catalog: Arc<Catalog>, rng: StdRng) -> Self {
        Self {
            world: World::new(),
            catalog,
            clock: SimClock::new(config.time.clone()),
            grid: Grid::new(config.grid_width, config.grid_height),
            dispatcher: Dispatcher::new(),
            notices: NoticeChannel::new(),
            balance: config.starting_money,
            stats: Statistics::default(),
            rng,
            next_plant_id: 1,
            next_worker_id: 1,
            config,
        }
    }

    // ── Time ───────────────────────────────────────────────────────────

    /// Feed real elapsed seconds. Runs one full tick per in-world minute
    /// crossed; nothing happens while paused.
    pub fn advance(&mut self, real_seconds: f32) -> Vec<TickReport> {
        self.clock
            .advance(real_seconds)
            .into_iter()
            .map(|tick| self.run_tick(tick))
            .collect()
    }

    /// Run exactly one in-world minute, ignoring pause and the real-time
    /// accumulator.
    pub fn step_minute(&mut self) -> TickReport {
        let tick = self.clock.step();
        self.run_tick(tick)
    }

    fn run_tick(&mut self, tick: Tick) -> TickReport {
        const MINUTES: f32 = 1.0;
        let now = tick.index;

        let notices = growth_system(
            &mut self.world,
            &self.grid,
            &self.catalog,
            MINUTES,
            now,
            &mut self.notices,
        );

        for notice in self.notices.drain() {
            self.dispatcher.handle_notice(&self.world, &notice);
        }

        let work = work_system(
            &mut self.world,
            &mut self.grid,
            self.dispatcher.roster(),
            &self.catalog,
            &self.config,
            MINUTES,
            now,
        );
        for report in &work {
            self.record_work(report);
        }

        let backlog_assigned = self.dispatcher.drain_backlog(&self.world);

        let payroll = tick.day_rolled.then(|| self.run_payroll());

        TickReport {
            tick,
            notices,
            work,
            backlog_assigned,
            payroll,
        }
    }

    fn record_work(&mut self, report: &WorkReport) {
        match report.outcome {
            TaskOutcome::Skipped => self.stats.tasks_skipped += 1,
            TaskOutcome::Harvested { plant_id, value, bonus } => {
                let earned = value + bonus;
                self.balance += earned;
                self.stats.plants_harvested += 1;
                self.stats.harvest_income += earned;
                self.stats.tasks_completed += 1;
                log::info!(
                    "worker {} harvested plant {} for ${}",
                    report.worker_id,
                    plant_id,
                    earned
                );
            }
            _ => self.stats.tasks_completed += 1,
        }
    }

    fn run_payroll(&mut self) -> PayrollReport {
        let report = self.dispatcher.pay_all(&self.world, &mut self.balance);
        self.stats.salaries_paid += report.total_paid();
        self.stats.salaries_missed += report.unpaid.len() as u64;
        log::info!(
            "day {} payroll: paid ${}, {} unpaid, balance ${}",
            self.clock.day(),
            report.total_paid(),
            report.unpaid.len(),
            self.balance
        );
        report
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // ── Plant actions ──────────────────────────────────────────────────

    fn check_bounds(&self, pos: GridPos) -> Result<(), ActionError> {
        if self.grid.contains(pos) {
            Ok(())
        } else {
            Err(ActionError::OutOfBounds {
                pos,
                width: self.grid.width(),
                height: self.grid.height(),
            })
        }
    }

    fn plant_at(&self, pos: GridPos) -> Result<Entity, ActionError> {
        self.check_bounds(pos)?;
        self.grid.get(pos).ok_or(ActionError::EmptyTile { pos })
    }

    fn spend(&mut self, cost: i64) -> Result<(), ActionError> {
        if self.balance < cost {
            return Err(ActionError::InsufficientFunds {
                cost,
                balance: self.balance,
            });
        }
        self.balance -= cost;
        Ok(())
    }

    /// Buy a seed and plant it. Returns the new plant's id.
    pub fn plant_seed(&mut self, kind: PlantKind, x: u32, y: u32) -> Result<u32, ActionError> {
        let pos = GridPos::new(x, y);
        self.check_bounds(pos)?;
        if self.grid.is_occupied(pos) {
            return Err(ActionError::Occupied { pos });
        }
        let info = self.catalog.info(kind);
        let (cost, name) = (info.seed_cost, info.name.clone());
        self.spend(cost)?;

        let id = self.next_plant_id;
        self.next_plant_id += 1;
        let entity = self.world.spawn((Plant::new(id, kind, x, y, self.clock.now()),));
        self.grid.place(pos, entity);
        self.stats.plants_planted += 1;

        log::info!("planted {} at {} for ${}", name, pos, cost);
        Ok(id)
    }

    /// Pick a kind weighted by customer demand.
    pub fn random_kind(&mut self) -> PlantKind {
        let roll: f32 = self.rng.gen();
        self.catalog.pick_by_demand(roll)
    }

    /// Water the plant at a tile by hand.
    pub fn water(&mut self, x: u32, y: u32) -> Result<(), ActionError> {
        let pos = GridPos::new(x, y);
        let entity = self.plant_at(pos)?;
        let now = self.clock.now();
        let mut plant = self
            .world
            .get::<&mut Plant>(entity)
            .map_err(|_| ActionError::EmptyTile { pos })?;
        if !plant.water(now) {
            return Err(ActionError::PlantDead { pos });
        }
        log::info!("watered plant {} at {}", plant.id, pos);
        Ok(())
    }

    /// Harvest by hand. Returns the sale value (no skill bonus).
    pub fn harvest(&mut self, x: u32, y: u32) -> Result<i64, ActionError> {
        let pos = GridPos::new(x, y);
        let entity = self.plant_at(pos)?;
        let (id, value) = {
            let plant = self
                .world
                .get::<&Plant>(entity)
                .map_err(|_| ActionError::EmptyTile { pos })?;
            let value = plant
                .harvest_value(self.catalog.info(plant.kind))
                .ok_or(ActionError::NotHarvestable { pos })?;
            (plant.id, value)
        };

        self.take_plant(pos, entity);
        self.balance += value;
        self.stats.plants_harvested += 1;
        self.stats.harvest_income += value;
        log::info!("harvested plant {} at {} for ${}", id, pos, value);
        Ok(value)
    }

    /// Dig up whatever is on a tile, dead or alive.
    pub fn remove_plant(&mut self, x: u32, y: u32) -> Result<PlantKind, ActionError> {
        let pos = GridPos::new(x, y);
        let entity = self.plant_at(pos)?;
        let kind = self
            .world
            .get::<&Plant>(entity)
            .map(|p| p.kind)
            .map_err(|_| ActionError::EmptyTile { pos })?;
        self.take_plant(pos, entity);
        log::info!("removed {:?} from {}", kind, pos);
        Ok(kind)
    }

    fn take_plant(&mut self, pos: GridPos, entity: Entity) {
        self.grid.clear(pos);
        let cancelled = self.dispatcher.cancel_for_target(&self.world, entity);
        if cancelled > 0 {
            log::debug!("cancelled {} pending tasks for plant at {}", cancelled, pos);
        }
        let _ = self.world.despawn(entity);
    }

    /// Feed a nutrient pack to the plant on a tile, switching it to
    /// boosted growth.
    pub fn apply_nutrient(&mut self, x: u32, y: u32) -> Result<(), ActionError> {
        let pos = GridPos::new(x, y);
        let entity = self.plant_at(pos)?;
        let dead = self
            .world
            .get::<&Plant>(entity)
            .map(|p| p.stage.is_terminal())
            .map_err(|_| ActionError::EmptyTile { pos })?;
        if dead {
            return Err(ActionError::PlantDead { pos });
        }
        self.spend(self.config.nutrient_cost)?;

        if let Ok(mut plant) = self.world.get::<&mut Plant>(entity) {
            plant.apply_nutrient(self.config.nutrient_boost);
        }
        log::info!("applied nutrient at {}", pos);
        Ok(())
    }

    // ── Staff actions ──────────────────────────────────────────────────

    fn worker_entity(&self, worker_id: u32) -> Result<Entity, ActionError> {
        self.dispatcher
            .roster()
            .iter()
            .copied()
            .find(|&e| self.world.get::<&Worker>(e).map_or(false, |w| w.id == worker_id))
            .ok_or(ActionError::UnknownWorker(worker_id))
    }

    /// Hire a worker with random starting skills and no roles. Returns the
    /// new worker's id.
    pub fn hire_worker(&mut self, name: &str) -> Result<u32, ActionError> {
        self.spend(self.config.hire_cost)?;

        let id = self.next_worker_id;
        self.next_worker_id += 1;
        let worker = generate_worker(id, name, &self.config, &mut self.rng);
        let entity = self.world.spawn((worker,));
        self.dispatcher.register(entity);

        log::info!("hired {} as worker #{} for ${}", name, id, self.config.hire_cost);
        Ok(id)
    }

    /// Hire a worker with a generated name.
    pub fn hire_random_worker(&mut self) -> Result<u32, ActionError> {
        let name = generate_name(&mut self.rng);
        self.hire_worker(&name)
    }

    /// Let a worker go. Their queued tasks return to the backlog.
    pub fn fire_worker(&mut self, worker_id: u32) -> Result<(), ActionError> {
        let entity = self.worker_entity(worker_id)?;
        let moved = self.dispatcher.unregister(&self.world, entity);
        let _ = self.world.despawn(entity);
        log::info!("fired worker #{}; {} tasks returned to backlog", worker_id, moved);
        Ok(())
    }

    /// Give a worker a role. `Ok(false)` if they already had it.
    pub fn grant_role(&mut self, worker_id: u32, role: Role) -> Result<bool, ActionError> {
        let entity = self.worker_entity(worker_id)?;
        let mut worker = self
            .world
            .get::<&mut Worker>(entity)
            .map_err(|_| ActionError::UnknownWorker(worker_id))?;
        Ok(worker.grant_role(role))
    }

    pub fn revoke_role(&mut self, worker_id: u32, role: Role) -> Result<bool, ActionError> {
        let entity = self.worker_entity(worker_id)?;
        let mut worker = self
            .world
            .get::<&mut Worker>(entity)
            .map_err(|_| ActionError::UnknownWorker(worker_id))?;
        Ok(worker.revoke_role(role))
    }

    pub fn assign_zone(&mut self, worker_id: u32, zone: Option<u32>) -> Result<(), ActionError> {
        let entity = self.worker_entity(worker_id)?;
        let mut worker = self
            .world
            .get::<&mut Worker>(entity)
            .map_err(|_| ActionError::UnknownWorker(worker_id))?;
        worker.zone = zone;
        Ok(())
    }

    /// Pay to raise one skill by a star. `Ok(false)` (and no charge) if the
    /// skill is already maxed.
    pub fn train_skill(&mut self, worker_id: u32, skill: Skill) -> Result<bool, ActionError> {
        let entity = self.worker_entity(worker_id)?;
        let current = self
            .world
            .get::<&Worker>(entity)
            .map(|w| w.skills.get(skill))
            .map_err(|_| ActionError::UnknownWorker(worker_id))?;
        if current >= templanter_logic::constants::staff::MAX_SKILL {
            return Ok(false);
        }

        self.spend(self.config.training_cost(current))?;
        let mut worker = self
            .world
            .get::<&mut Worker>(entity)
            .map_err(|_| ActionError::UnknownWorker(worker_id))?;
        worker.skills.train(skill);
        log::info!("{} trained {} to {}", worker.name, skill.name(), worker.skills.get(skill));
        Ok(true)
    }

    /// Queue an application-created task (serving a customer, a patrol, a
    /// break, or a manual water/harvest order for the plant at `at`).
    pub fn submit_task(
        &mut self,
        kind: TaskKind,
        at: Option<GridPos>,
    ) -> Result<Assignment, ActionError> {
        let target = at.map(|pos| self.plant_at(pos)).transpose()?;
        Ok(self.dispatcher.submit(&self.world, kind, target))
    }

    // ── Inspection ─────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn backlog_len(&self) -> usize {
        self.dispatcher.backlog_len()
    }

    pub fn available_workers(&self) -> usize {
        self.dispatcher.available_count(&self.world)
    }

    pub fn workers_with_role(&self, role: Role) -> Vec<u32> {
        self.dispatcher
            .workers_with_role(&self.world, role)
            .into_iter()
            .filter_map(|e| self.world.get::<&Worker>(e).ok().map(|w| w.id))
            .collect()
    }

    pub fn plant_count(&self) -> usize {
        self.world.query::<&Plant>().iter().count()
    }

    pub fn worker_count(&self) -> usize {
        self.dispatcher.roster().len()
    }

    fn view_plant(&self, pos: GridPos, plant: &Plant) -> PlantView {
        let info = self.catalog.info(plant.kind);
        PlantView {
            id: plant.id,
            pos,
            kind: plant.kind,
            name: info.name.clone(),
            stage: plant.stage.name(),
            growth_percent: plant.growth,
            water_percent: plant.water,
            needs_water: plant.stage.accepts_water() && plant.needs_water(info, self.clock.now()),
            can_harvest: plant.can_harvest(),
            boosted: plant.strategy.is_boosted(),
        }
    }

    pub fn plant_view(&self, x: u32, y: u32) -> Option<PlantView> {
        let pos = GridPos::new(x, y);
        let entity = self.grid.get(pos)?;
        let plant = self.world.get::<&Plant>(entity).ok()?;
        Some(self.view_plant(pos, &plant))
    }

    /// All plants in row-major grid order.
    pub fn plants(&self) -> Vec<PlantView> {
        self.grid
            .occupied()
            .filter_map(|(pos, e)| {
                let plant = self.world.get::<&Plant>(e).ok()?;
                Some(self.view_plant(pos, &plant))
            })
            .collect()
    }

    pub fn worker_view(&self, worker_id: u32) -> Option<WorkerView> {
        let entity = self.worker_entity(worker_id).ok()?;
        let worker = self.world.get::<&Worker>(entity).ok()?;
        Some(Self::view_worker(&worker))
    }

    /// All workers in roster order.
    pub fn worker_views(&self) -> Vec<WorkerView> {
        self.dispatcher
            .roster()
            .iter()
            .filter_map(|&e| self.world.get::<&Worker>(e).ok().map(|w| Self::view_worker(&w)))
            .collect()
    }

    fn view_worker(worker: &Worker) -> WorkerView {
        WorkerView {
            id: worker.id,
            name: worker.name.clone(),
            busy: worker.is_busy(),
            busy_remaining: worker.remaining_busy(),
            roles: worker.roles.clone(),
            level: worker.progression.level,
            experience: worker.progression.experience,
            salary: worker.progression.salary,
            skills: worker.skills,
            queued: worker.queue.len(),
            zone: worker.zone,
        }
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Snapshot the persistent state.
    pub fn snapshot(&self) -> SaveData {
        let plants = self
            .grid
            .occupied()
            .filter_map(|(_, e)| {
                let plant = self.world.get::<&Plant>(e).ok()?;
                Some(PlantRecord::from_plant(&plant, &self.catalog))
            })
            .collect();
        let workers = self
            .dispatcher
            .roster()
            .iter()
            .filter_map(|&e| {
                let worker = self.world.get::<&Worker>(e).ok()?;
                Some(WorkerRecord::from_worker(&worker))
            })
            .collect();

        SaveData {
            version: SAVE_VERSION,
            money: self.balance,
            clock: ClockRecord {
                day: self.clock.day(),
                hour: self.clock.hour(),
                minute: self.clock.minute(),
                elapsed_minutes: self.clock.now(),
            },
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            statistics: self.stats,
            next_plant_id: self.next_plant_id,
            next_worker_id: self.next_worker_id,
            plants,
            workers,
        }
    }

    /// Save greenhouse state to a writer
    pub fn save<W: Write>(&self, writer: W, format: SaveFormat) -> Result<(), SaveError> {
        write_save(writer, &self.snapshot(), format)
    }

    /// Load greenhouse state from a reader. On error nothing changes.
    pub fn load<R: Read>(&mut self, reader: R, format: SaveFormat) -> Result<(), SaveError> {
        let data = read_save(reader, format)?;
        self.restore(data)
    }

    /// Replace the current state with a snapshot. On error nothing changes.
    pub fn restore(&mut self, data: SaveData) -> Result<(), SaveError> {
        if !grid_size_ok(data.grid_width, data.grid_height) {
            return Err(SaveError::InvalidRecord(format!(
                "grid {}x{} is empty or larger than {} tiles",
                data.grid_width, data.grid_height, MAX_CELLS
            )));
        }

        let plants = data
            .plants
            .iter()
            .map(|r| r.to_plant(&self.catalog))
            .collect::<Result<Vec<_>, _>>()?;
        let workers = data
            .workers
            .iter()
            .map(WorkerRecord::to_worker)
            .collect::<Result<Vec<_>, _>>()?;

        let mut world = World::new();
        let mut grid = Grid::new(data.grid_width, data.grid_height);
        let mut max_plant_id = 0;
        for plant in plants {
            let pos = GridPos::new(plant.x, plant.y);
            if !grid.contains(pos) || grid.is_occupied(pos) {
                return Err(SaveError::InvalidRecord(format!(
                    "plant {} at {} is off-grid or overlaps another",
                    plant.id, pos
                )));
            }
            max_plant_id = max_plant_id.max(plant.id);
            let entity = world.spawn((plant,));
            grid.place(pos, entity);
        }

        let mut dispatcher = Dispatcher::new();
        let mut max_worker_id = 0;
        for worker in workers {
            max_worker_id = max_worker_id.max(worker.id);
            let entity = world.spawn((worker,));
            dispatcher.register(entity);
        }

        let mut clock = SimClock::new(self.config.time.clone());
        clock.set_time(
            data.clock.day,
            data.clock.hour,
            data.clock.minute,
            data.clock.elapsed_minutes,
        );

        self.world = world;
        self.grid = grid;
        self.dispatcher = dispatcher;
        self.notices = NoticeChannel::new();
        self.clock = clock;
        self.balance = data.money;
        self.stats = data.statistics;
        self.next_plant_id = data.next_plant_id.max(max_plant_id + 1);
        self.next_worker_id = data.next_worker_id.max(max_worker_id + 1);

        log::info!(
            "loaded day {} with {} plants, {} workers, ${}",
            self.clock.day(),
            self.grid.occupied_count(),
            self.dispatcher.roster().len(),
            self.balance
        );
        Ok(())
    }
}

impl Default for Greenhouse {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
