use super::labels::{Branch, LabelField, Stem};

/// Length of the sexagenary cycle: lcm(10, 12).
pub const CYCLE_LEN: usize = 60;

/// A valid stem/branch pairing and its position in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StemBranchPair {
    pub index: usize,
    pub stem: Stem,
    pub branch: Branch,
}

impl StemBranchPair {
    /// "jia-zi" style name in the given label representation.
    pub fn name(&self, field: LabelField) -> String {
        format!("{}-{}", self.stem.label(field), self.branch.label(field))
    }
}

/// The 60-pair stem/branch table, advanced in lock-step from index 0.
pub struct SexagenaryCycle {
    pairs: [StemBranchPair; CYCLE_LEN],
}

/// Process-wide cycle table.
pub static CYCLE: SexagenaryCycle = SexagenaryCycle::new();

impl SexagenaryCycle {
    const fn new() -> Self {
        let mut pairs = [StemBranchPair {
            index: 0,
            stem: Stem::Jia,
            branch: Branch::Zi,
        }; CYCLE_LEN];

        let mut i = 0;
        while i < CYCLE_LEN {
            pairs[i] = StemBranchPair {
                index: i,
                stem: Stem::ALL[i % Stem::ALL.len()],
                branch: Branch::ALL[i % Branch::ALL.len()],
            };
            i += 1;
        }

        Self { pairs }
    }

    /// Pair at `index mod 60`.
    pub fn value_at(&self, index: usize) -> StemBranchPair {
        self.pairs[index % CYCLE_LEN]
    }

    /// First pair matching both fields, or `None` when the combination never
    /// occurs in the cycle (e.g. a yang stem with a yin branch).
    pub fn find(&self, stem: Stem, branch: Branch) -> Option<StemBranchPair> {
        self.pairs
            .iter()
            .find(|p| p.stem == stem && p.branch == branch)
            .copied()
    }

    pub fn index_of(&self, stem: Stem, branch: Branch) -> Option<usize> {
        self.find(stem, branch).map(|p| p.index)
    }

    pub fn validate(&self, stem: Stem, branch: Branch) -> bool {
        self.find(stem, branch).is_some()
    }

    /// Resolve a pair from its labels. Unknown labels and invalid combinations
    /// both yield `None`.
    pub fn find_by_label(
        &self,
        field: LabelField,
        stem_label: &str,
        branch_label: &str,
    ) -> Option<StemBranchPair> {
        let stem = Stem::from_label(field, stem_label)?;
        let branch = Branch::from_label(field, branch_label)?;
        self.find(stem, branch)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StemBranchPair> {
        self.pairs.iter()
    }
}
