//! Pure simulation logic for Templanter.
//!
//! This crate contains the greenhouse rules that are independent of any ECS,
//! renderer, or save-file backend. Functions take plain data and return
//! results, making them unit-testable and reusable by the engine crate and
//! the headless harness alike.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Immutable per-kind plant parameters (growth time, prices, demand) |
//! | [`clock`] | Real seconds → in-world minute ticks, calendar rollover, pause |
//! | [`config`] | Tunable simulation settings loaded from JSON |
//! | [`constants`] | Fixed lifecycle thresholds and staff progression constants |
//! | [`growth`] | Four-step growth template with normal/boosted strategies |
//! | [`lifecycle`] | Growth stages and the legal transition table |
//! | [`plant`] | Per-plant record: tick update, watering, harvest value, notices |
//! | [`skills`] | Skill levels, efficiency lookup, experience and leveling |
//! | [`work`] | Worker roles and task kinds (durations, rewards, required role) |

pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod growth;
pub mod lifecycle;
pub mod plant;
pub mod skills;
pub mod work;
