//! Templanter Headless Simulation Harness
//!
//! Validates pure simulation logic, the shipped plant data and the engine
//! end to end. Runs entirely in-process: no rendering, no input.
//!
//! Usage:
//!   cargo run -p templanter-simtest
//!   cargo run -p templanter-simtest -- --verbose

use templanter_core::persistence::SaveFormat;
use templanter_core::prelude::*;
use templanter_logic::catalog::PlantTypeInfo;
use templanter_logic::plant::Notice;

// ── Plant catalog (same JSON a frontend ships) ─────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/plant_catalog.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    println!("=== Templanter Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Plant catalog data
    results.extend(validate_catalog(verbose));

    // 2. Config defaults and validation
    results.extend(validate_config(verbose));

    // 3. Tended lifecycle sweep, every kind
    results.extend(validate_tended_growth(verbose));

    // 4. Neglect sweep, every kind
    results.extend(validate_neglect(verbose));

    // 5. Staffed greenhouse over several days
    results.extend(validate_staffed_greenhouse(verbose));

    // 6. Save/load fixed point
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Plant Catalog ────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Plant Catalog ---");
    let mut results = Vec::new();

    let entries: Vec<PlantTypeInfo> = match serde_json::from_str(CATALOG_JSON) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_entry_count".into(),
        passed: entries.len() == PlantKind::ALL.len(),
        detail: format!("{} plant kinds loaded", entries.len()),
    });

    let catalog = match Catalog::from_entries(entries) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_build".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_matches_builtin".into(),
        passed: catalog == Catalog::builtin(),
        detail: "data file agrees with the compiled-in table".into(),
    });

    let unprofitable: Vec<_> = catalog
        .iter()
        .filter(|info| info.sell_price <= info.seed_cost)
        .map(|info| info.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_profitable".into(),
        passed: unprofitable.is_empty(),
        detail: if unprofitable.is_empty() {
            "every plant sells for more than its seed".into()
        } else {
            format!("sell price not above seed cost: {}", unprofitable.join(", "))
        },
    });

    let demand: f32 = catalog.iter().map(|info| info.demand_weight).sum();
    results.push(TestResult {
        name: "catalog_demand_total".into(),
        passed: (demand - 100.0).abs() < 0.01,
        detail: format!("demand weights sum to {:.2}%", demand),
    });

    for tier in [PlantTier::Beginner, PlantTier::Intermediate, PlantTier::Advanced] {
        let kinds = catalog.by_tier(tier);
        if verbose {
            println!("  {:?}: {:?}", tier, kinds);
        }
        results.push(TestResult {
            name: format!("catalog_tier_{:?}", tier).to_lowercase(),
            passed: !kinds.is_empty(),
            detail: format!("{} kinds", kinds.len()),
        });
    }

    results
}

// ── 2. Config ───────────────────────────────────────────────────────────

fn validate_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    let defaults = SimConfig::default();
    results.push(TestResult {
        name: "config_defaults_valid".into(),
        passed: defaults.validate().is_ok(),
        detail: format!(
            "{}x{} grid, ${} start, hire ${}",
            defaults.grid_width, defaults.grid_height, defaults.starting_money, defaults.hire_cost
        ),
    });

    let partial = SimConfig::from_json(r#"{ "grid_width": 5, "starting_money": 900 }"#);
    results.push(TestResult {
        name: "config_partial_json".into(),
        passed: matches!(
            &partial,
            Ok(c) if c.grid_width == 5 && c.grid_height == 3 && c.starting_money == 900
        ),
        detail: "missing fields fall back to defaults".into(),
    });

    let rejected = SimConfig::from_json(r#"{ "grid_width": 0 }"#);
    results.push(TestResult {
        name: "config_rejects_empty_grid".into(),
        passed: rejected.is_err(),
        detail: match rejected {
            Err(e) => e.to_string(),
            Ok(_) => "zero-width grid accepted".into(),
        },
    });

    results
}

// ── 3. Tended Growth ────────────────────────────────────────────────────

/// Minute a plant reaches Ripe when watered every time it asks.
fn tended_ripen_minute(info: &PlantTypeInfo) -> Option<u64> {
    let mut plant = Plant::new(1, info.kind, 0, 0, 0);
    let limit = u64::from(info.growth_time_hours) * 60 * 2;

    for minute in 1..=limit {
        let notices = plant.update(info, 1.0, minute);
        if notices.contains(&Notice::NeedsWater) {
            plant.water(minute);
        }
        if plant.stage == GrowthStage::Ripe {
            return Some(minute);
        }
        if plant.stage != GrowthStage::Seed && plant.stage != GrowthStage::Growing {
            return None;
        }
    }
    None
}

fn validate_tended_growth(verbose: bool) -> Vec<TestResult> {
    println!("--- Tended Growth ---");
    let catalog = Catalog::builtin();
    let mut results = Vec::new();

    for info in catalog.iter() {
        // Germination takes ten minutes, then the last 90% of growth runs
        // at the catalog rate.
        let expected = 10.0 + 0.9 * info.growth_time_hours as f64 * 60.0;
        let ripe = tended_ripen_minute(info);
        if verbose {
            println!("  {:<12} ripe at {:?} (expected ~{:.0})", info.name, ripe, expected);
        }

        let passed = ripe.map_or(false, |m| (m as f64 - expected).abs() <= expected * 0.01 + 2.0);
        results.push(TestResult {
            name: format!("tended_{:?}", info.kind).to_lowercase(),
            passed,
            detail: match ripe {
                Some(m) => format!("ripe at minute {} (expected ~{:.0})", m, expected),
                None => "never ripened".into(),
            },
        });
    }

    results
}

// ── 4. Neglect ──────────────────────────────────────────────────────────

fn validate_neglect(verbose: bool) -> Vec<TestResult> {
    println!("--- Neglect ---");
    let catalog = Catalog::builtin();
    let mut results = Vec::new();

    for info in catalog.iter() {
        let mut plant = Plant::new(1, info.kind, 0, 0, 0);
        let mut decaying_at = None;
        let mut dead_at = None;
        let mut ripened = false;

        for minute in 1..=50_000u64 {
            plant.update(info, 1.0, minute);
            match plant.stage {
                GrowthStage::Ripe => ripened = true,
                GrowthStage::Decaying if decaying_at.is_none() => decaying_at = Some(minute),
                GrowthStage::Dead => {
                    dead_at = Some(minute);
                    break;
                }
                _ => {}
            }
        }

        if verbose {
            println!(
                "  {:<12} decaying at {:?}, dead at {:?}",
                info.name, decaying_at, dead_at
            );
        }

        let passed = !ripened
            && plant.water == 0.0
            && matches!((decaying_at, dead_at), (Some(d), Some(x)) if x > d);
        results.push(TestResult {
            name: format!("neglect_{:?}", info.kind).to_lowercase(),
            passed,
            detail: format!("decaying at {:?}, dead at {:?}", decaying_at, dead_at),
        });
    }

    results
}

// ── 5. Staffed Greenhouse ───────────────────────────────────────────────

fn validate_staffed_greenhouse(verbose: bool) -> Vec<TestResult> {
    println!("--- Staffed Greenhouse ---");
    let mut results = Vec::new();

    let config = SimConfig {
        starting_money: 2_000,
        ..SimConfig::default()
    };
    let mut gh = Greenhouse::with_seed(config, 11);

    let mut seed_spend = 0;
    for y in 0..3 {
        for x in 0..3 {
            let kind = if (x + y) % 2 == 0 { PlantKind::Basil } else { PlantKind::Lettuce };
            if gh.plant_seed(kind, x, y).is_ok() {
                seed_spend += gh.catalog().info(kind).seed_cost;
            }
        }
    }

    let mut hire_spend = 0;
    for role in [Role::Waterer, Role::Waterer, Role::Harvester] {
        match gh.hire_random_worker() {
            Ok(id) => {
                hire_spend += gh.config().hire_cost;
                let _ = gh.grant_role(id, role);
            }
            Err(e) => log::warn!("hire failed: {}", e),
        }
    }

    let days = 4;
    let mut payrolls = 0;
    for _ in 0..days * 24 * 60 {
        let report = gh.step_minute();
        if report.payroll.is_some() {
            payrolls += 1;
        }
    }

    let stats = *gh.stats();
    if verbose {
        println!("  stats: {:?}", stats);
        for w in gh.worker_views() {
            println!(
                "  #{} {:<18} {:?} lvl {} xp {} ${}/day",
                w.id, w.name, w.roles, w.level, w.experience, w.salary
            );
        }
    }

    results.push(TestResult {
        name: "staffed_harvests".into(),
        passed: stats.plants_harvested == 9,
        detail: format!("{} of 9 plants harvested", stats.plants_harvested),
    });

    let dead = gh.plants().iter().filter(|p| p.stage == "Dead").count();
    results.push(TestResult {
        name: "staffed_no_deaths".into(),
        passed: dead == 0,
        detail: format!("{} dead plants", dead),
    });

    results.push(TestResult {
        name: "staffed_payroll_daily".into(),
        passed: payrolls == days,
        detail: format!("{} payroll runs over {} days", payrolls, days),
    });

    let expected_balance =
        2_000 - seed_spend - hire_spend - stats.salaries_paid + stats.harvest_income;
    results.push(TestResult {
        name: "staffed_books_balance".into(),
        passed: gh.balance() == expected_balance,
        detail: format!("balance ${} (ledger ${})", gh.balance(), expected_balance),
    });

    results.push(TestResult {
        name: "staffed_grid_consistent".into(),
        passed: gh.plant_count() == gh.grid().occupied_count(),
        detail: format!(
            "{} plants, {} occupied tiles",
            gh.plant_count(),
            gh.grid().occupied_count()
        ),
    });

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut gh = Greenhouse::with_seed(SimConfig::default(), 3);
    let _ = gh.plant_seed(PlantKind::Tomato, 0, 0);
    let _ = gh.plant_seed(PlantKind::Orchid, 1, 2);
    if let Ok(id) = gh.hire_worker("Rosa Reyes") {
        let _ = gh.grant_role(id, Role::Waterer);
    }
    for _ in 0..500 {
        gh.step_minute();
    }

    for format in [SaveFormat::Json, SaveFormat::Binary] {
        let name = format!("save_fixed_point_{:?}", format).to_lowercase();
        let outcome = save_load_save(&gh, format);
        results.push(TestResult {
            name,
            passed: matches!(outcome, Ok(true)),
            detail: match outcome {
                Ok(true) => "save → load → save is byte-identical".into(),
                Ok(false) => "second save differs".into(),
                Err(e) => e.to_string(),
            },
        });
    }

    results
}

fn save_load_save(gh: &Greenhouse, format: SaveFormat) -> Result<bool, SaveError> {
    let mut first = Vec::new();
    gh.save(&mut first, format)?;

    let mut restored = Greenhouse::with_seed(gh.config().clone(), 0);
    restored.load(&first[..], format)?;

    let mut second = Vec::new();
    restored.save(&mut second, format)?;
    Ok(first == second)
}
