pub mod corridor;

pub use corridor::{Action, Corridor, CorridorConfig};
