mod input;
mod pillar;

pub use input::{ChartInput, PillarInput};
pub use pillar::{Chart, Pillar, PillarPosition, SlotType};
