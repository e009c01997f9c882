//! Component definitions for the ECS simulation.
//!
//! Components are plain data attached to entities. Plants use the logic
//! crate's [`Plant`] record directly as their component.

mod common;
mod staff;

pub use common::*;
pub use staff::*;
pub use templanter_logic::plant::Plant;
