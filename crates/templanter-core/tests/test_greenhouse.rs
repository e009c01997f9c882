//! Integration tests for the greenhouse engine driven tick by tick.
//!
//! Exercises: growth → notices → dispatch/backlog → work → payroll → save/load.

use templanter_core::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn greenhouse() -> Greenhouse {
    Greenhouse::with_seed(SimConfig::default(), 2024)
}

fn with_plant(gh: &mut Greenhouse, x: u32, y: u32, f: impl FnOnce(&mut Plant)) {
    let entity = gh.grid().get(GridPos::new(x, y)).expect("no plant on tile");
    let mut plant = gh.world.get::<&mut Plant>(entity).expect("not a plant");
    f(&mut plant);
}

fn steps(gh: &mut Greenhouse, minutes: u32) -> Vec<TickReport> {
    (0..minutes).map(|_| gh.step_minute()).collect()
}

// ── Dispatch ───────────────────────────────────────────────────────────

#[test]
fn ripe_plant_without_harvester_goes_through_backlog() {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Tomato, 1, 1).unwrap();
    let id = gh.hire_worker("Rosa Reyes").unwrap();
    with_plant(&mut gh, 1, 1, |p| {
        p.stage = GrowthStage::Growing;
        p.growth = 99.99;
    });

    // Ripens, nobody holds Harvester, so the task is backlogged and then
    // handed to the first available worker regardless of role.
    let first = gh.step_minute();
    assert_eq!(first.notices, 1);
    assert!(first.work.is_empty());
    assert_eq!(first.backlog_assigned, 1);
    assert_eq!(gh.backlog_len(), 0);
    assert_eq!(gh.worker_view(id).unwrap().queued, 1);

    let second = gh.step_minute();
    assert_eq!(second.work.len(), 1);
    let TaskOutcome::Harvested { value, bonus, .. } = second.work[0].outcome else {
        panic!("expected a harvest, got {:?}", second.work[0].outcome);
    };
    assert_eq!(value, 30);
    assert_eq!(gh.balance(), 500 - 8 - 150 + value + bonus);
    assert_eq!(gh.plant_count(), 0);
    assert!(!gh.grid().is_occupied(GridPos::new(1, 1)));
    assert!(gh.worker_view(id).unwrap().busy);
}

#[test]
fn thirsty_plant_is_watered_by_waterer_same_tick() {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Basil, 0, 0).unwrap();
    let id = gh.hire_worker("Tomas Quill").unwrap();
    gh.grant_role(id, Role::Waterer).unwrap();
    with_plant(&mut gh, 0, 0, |p| p.water = 25.0);

    let report = gh.step_minute();
    assert_eq!(report.notices, 1);
    assert_eq!(report.work.len(), 1);
    assert_eq!(report.work[0].outcome, TaskOutcome::Watered { plant_id: 1 });
    assert_eq!(gh.plant_view(0, 0).unwrap().water_percent, 100.0);
    assert_eq!(gh.worker_view(id).unwrap().experience, 5);
}

#[test]
fn role_holder_is_preferred_over_earlier_hire() {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Lettuce, 2, 0).unwrap();
    let idle = gh.hire_worker("First Hire").unwrap();
    let waterer = gh.hire_worker("Second Hire").unwrap();
    gh.grant_role(waterer, Role::Waterer).unwrap();
    with_plant(&mut gh, 2, 0, |p| p.water = 10.0);

    let report = gh.step_minute();
    assert_eq!(report.work.len(), 1);
    assert_eq!(report.work[0].worker_id, waterer);
    assert_eq!(gh.worker_view(idle).unwrap().experience, 0);
}

#[test]
fn backlog_is_handed_out_oldest_first_across_workers() {
    let mut gh = greenhouse();
    let first = gh.hire_worker("Ana").unwrap();
    let second = gh.hire_worker("Bea").unwrap();

    // Nobody holds Security, so every patrol waits in the backlog.
    for zone in 1..=3 {
        assert_eq!(
            gh.submit_task(TaskKind::Patrol { zone }, None),
            Ok(Assignment::Backlogged)
        );
    }
    assert_eq!(gh.backlog_len(), 3);

    let report = gh.step_minute();
    assert_eq!(report.backlog_assigned, 2);
    assert_eq!(gh.backlog_len(), 1);
    assert_eq!(gh.worker_view(first).unwrap().queued, 1);
    assert_eq!(gh.worker_view(second).unwrap().queued, 1);

    let report = gh.step_minute();
    let done: Vec<(u32, TaskOutcome)> =
        report.work.iter().map(|w| (w.worker_id, w.outcome)).collect();
    assert_eq!(
        done,
        vec![
            (first, TaskOutcome::Patrolled { zone: 1 }),
            (second, TaskOutcome::Patrolled { zone: 2 }),
        ]
    );

    assert_eq!(
        gh.submit_task(TaskKind::Patrol { zone: 4 }, None),
        Ok(Assignment::Backlogged)
    );
    let zones: Vec<u32> = steps(&mut gh, 60)
        .into_iter()
        .flat_map(|r| r.work)
        .filter_map(|w| match w.outcome {
            TaskOutcome::Patrolled { zone } => Some(zone),
            _ => None,
        })
        .collect();
    assert_eq!(zones, vec![3, 4]);
    assert_eq!(gh.backlog_len(), 0);
}

#[test]
fn removing_a_plant_cancels_its_backlogged_tasks() {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Rose, 0, 2).unwrap();
    with_plant(&mut gh, 0, 2, |p| p.water = 5.0);

    gh.step_minute();
    assert_eq!(gh.backlog_len(), 1);

    gh.remove_plant(0, 2).unwrap();
    assert_eq!(gh.backlog_len(), 0);

    let id = gh.hire_worker("Late Hire").unwrap();
    for report in steps(&mut gh, 30) {
        assert!(report.work.is_empty());
    }
    assert_eq!(gh.worker_view(id).unwrap().experience, 0);
}

#[test]
fn dead_plants_raise_no_tasks() {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Orchid, 1, 0).unwrap();
    gh.hire_worker("Idle Hands").unwrap();
    with_plant(&mut gh, 1, 0, |p| {
        p.stage = GrowthStage::Decaying;
        p.decay_timer = 72.0 * 60.0;
    });

    // Crosses the death threshold this tick; the Dead notice maps to no task.
    let report = gh.step_minute();
    assert_eq!(gh.plant_view(1, 0).unwrap().stage, "Dead");
    assert_eq!(report.notices, 1);
    assert_eq!(report.backlog_assigned, 0);
    assert_eq!(gh.backlog_len(), 0);
}

// ── Economy ────────────────────────────────────────────────────────────

#[test]
fn payroll_skips_salaries_it_cannot_cover() {
    let mut gh = greenhouse();
    for name in ["Ana", "Bea", "Cal"] {
        gh.hire_worker(name).unwrap();
    }
    assert_eq!(gh.balance(), 50);

    let payrolls: Vec<PayrollReport> = steps(&mut gh, 18 * 60)
        .into_iter()
        .filter_map(|r| r.payroll)
        .collect();
    assert_eq!(payrolls.len(), 1);
    assert_eq!(payrolls[0].paid, vec![(1, 50)]);
    assert_eq!(payrolls[0].unpaid, vec![(2, 50), (3, 50)]);
    assert_eq!(gh.balance(), 0);
    assert_eq!(gh.stats().salaries_missed, 2);
}

#[test]
fn full_day_with_staff_keeps_plants_alive() {
    let mut gh = Greenhouse::with_seed(
        SimConfig {
            starting_money: 2_000,
            ..SimConfig::default()
        },
        5,
    );
    for x in 0..3 {
        gh.plant_seed(PlantKind::Basil, x, 0).unwrap();
    }
    let id = gh.hire_worker("Day Shift").unwrap();
    gh.grant_role(id, Role::Waterer).unwrap();

    steps(&mut gh, 24 * 60);

    for plant in gh.plants() {
        assert!(plant.water_percent > 0.0, "plant {} dried out", plant.id);
        assert_ne!(plant.stage, "Dead");
    }
    assert!(gh.stats().tasks_completed > 0);
    assert_eq!(gh.clock().day(), 2);
}

// ── Persistence ────────────────────────────────────────────────────────

fn populated() -> Greenhouse {
    let mut gh = greenhouse();
    gh.plant_seed(PlantKind::Tomato, 0, 0).unwrap();
    gh.plant_seed(PlantKind::Cactus, 2, 1).unwrap();
    let id = gh.hire_worker("Rosa Reyes").unwrap();
    gh.grant_role(id, Role::Harvester).unwrap();
    gh.assign_zone(id, Some(2)).unwrap();
    steps(&mut gh, 90);
    gh
}

#[test]
fn json_save_load_save_is_a_fixed_point() {
    let gh = populated();
    let mut first = Vec::new();
    gh.save(&mut first, SaveFormat::Json).unwrap();

    let mut restored = Greenhouse::with_seed(SimConfig::default(), 1);
    restored.load(&first[..], SaveFormat::Json).unwrap();
    let mut second = Vec::new();
    restored.save(&mut second, SaveFormat::Json).unwrap();

    assert_eq!(String::from_utf8(first).unwrap(), String::from_utf8(second).unwrap());
    assert_eq!(restored.clock().now(), 90);
    assert_eq!(restored.plants(), gh.plants());
    assert_eq!(restored.worker_view(1).unwrap().roles, vec![Role::Harvester]);
    assert_eq!(restored.worker_view(1).unwrap().zone, Some(2));
}

#[test]
fn binary_save_round_trips() {
    let gh = populated();
    let mut bytes = Vec::new();
    gh.save(&mut bytes, SaveFormat::Binary).unwrap();

    let mut restored = Greenhouse::default();
    restored.load(&bytes[..], SaveFormat::Binary).unwrap();
    assert_eq!(restored.snapshot(), gh.snapshot());
}

#[test]
fn ids_continue_after_load() {
    let gh = populated();
    let mut bytes = Vec::new();
    gh.save(&mut bytes, SaveFormat::Json).unwrap();

    let mut restored = Greenhouse::default();
    restored.load(&bytes[..], SaveFormat::Json).unwrap();
    assert_eq!(restored.plant_seed(PlantKind::Basil, 1, 1), Ok(3));
    assert_eq!(restored.hire_worker("Next"), Ok(2));
}

#[test]
fn failed_load_changes_nothing() {
    let gh = populated();
    let mut data = gh.snapshot();
    data.plants[1].x = data.plants[0].x;
    data.plants[1].y = data.plants[0].y;

    let mut target = greenhouse();
    target.plant_seed(PlantKind::Basil, 1, 1).unwrap();
    let before = target.snapshot();

    assert!(matches!(target.restore(data), Err(SaveError::InvalidRecord(_))));
    assert_eq!(target.snapshot(), before);

    let mut garbage: &[u8] = b"{ not json";
    assert!(target.load(&mut garbage, SaveFormat::Json).is_err());
    assert_eq!(target.snapshot(), before);
}
