//! Generation - random names and starting profiles for hires

mod names;
mod staff;

pub use names::*;
pub use staff::*;
