pub mod countdown;
pub mod launch;
pub mod map;
pub mod snapshot;

pub use countdown::*;
pub use launch::*;
pub use map::*;
pub use snapshot::*;
