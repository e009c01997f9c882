//! Templanter Core - Greenhouse Simulation Engine
//!
//! An ECS-based simulation of a small greenhouse business: plants grow on a
//! fixed grid, raise notices when they need attention, and hired workers
//! pick up the resulting tasks.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Plants and workers
//! - **Components**: Pure data attached to entities (Plant, Worker)
//! - **Systems**: Growth, notice dispatch, task execution, payroll
//!
//! # Example
//!
//! ```rust
//! use templanter_core::prelude::*;
//!
//! let mut greenhouse = Greenhouse::with_seed(SimConfig::default(), 7);
//! greenhouse.plant_seed(PlantKind::Tomato, 0, 0).unwrap();
//!
//! let id = greenhouse.hire_worker("Rosa Reyes").unwrap();
//! greenhouse.grant_role(id, Role::Waterer).unwrap();
//!
//! // One in-world hour
//! for _ in 0..60 {
//!     greenhouse.step_minute();
//! }
//! assert_eq!(greenhouse.balance(), 500 - 8 - 150);
//! ```

pub mod components;
pub mod engine;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{Greenhouse, PlantView, Statistics, TickReport, WorkerView};
    pub use crate::error::ActionError;
    pub use crate::persistence::{SaveError, SaveFormat};
    pub use crate::systems::{Assignment, PayrollReport, TaskOutcome, WorkReport};
    pub use templanter_logic::catalog::{Catalog, PlantKind, PlantTier};
    pub use templanter_logic::config::SimConfig;
    pub use templanter_logic::lifecycle::GrowthStage;
    pub use templanter_logic::skills::Skill;
    pub use templanter_logic::work::{Role, TaskKind};
}
