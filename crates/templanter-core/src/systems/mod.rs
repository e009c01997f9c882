//! Systems - logic that operates on components

mod dispatch;
mod growth;
mod notices;
mod work;

pub use dispatch::*;
pub use growth::*;
pub use notices::*;
pub use work::*;
