pub mod q_table;
pub mod rollout;

pub use q_table::{Episode, QTable, QTableAgent, QTableAgentConfig};
pub use rollout::{Rollout, RolloutStep};

use strum::VariantArray;

/// An action type drawn from a small fixed set, usable as a column of a dense table
///
/// `index` must agree with the position of the action in [`VariantArray::VARIANTS`],
/// which is also the tie-break order for greedy selection.
pub trait DiscreteAction: Copy + PartialEq + VariantArray {
    fn index(self) -> usize;
}
