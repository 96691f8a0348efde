pub mod labels;
pub mod table;

pub use labels::{Branch, Element, LabelField, Stem};
pub use table::{SexagenaryCycle, StemBranchPair, CYCLE, CYCLE_LEN};
