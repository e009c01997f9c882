//! Errors returned by player actions on the greenhouse.
//!
//! A failed action never changes any state.

use crate::components::GridPos;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("tile {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: GridPos, width: u32, height: u32 },

    #[error("tile {pos} already has a plant")]
    Occupied { pos: GridPos },

    #[error("need ${cost} but only ${balance} available")]
    InsufficientFunds { cost: i64, balance: i64 },

    #[error("tile {pos} is empty")]
    EmptyTile { pos: GridPos },

    #[error("plant at {pos} is not ready to harvest")]
    NotHarvestable { pos: GridPos },

    #[error("no worker with id {0}")]
    UnknownWorker(u32),

    #[error("plant at {pos} is dead")]
    PlantDead { pos: GridPos },
}
