use std::collections::BTreeMap;

use crate::Gap;

/// Decides the sequence in which gaps are attempted. The input is always the extraction order
/// (row-major, down before across for a shared start cell). An ordering only changes how much
/// work the search does, never whether it finds a fill.
pub trait OrderingStrategy {
    fn arrange(&self, gaps: Vec<Gap>) -> Vec<Gap>;
}

/// Row by row, starting from the upper left corner: the extraction order untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl OrderingStrategy for Linear {
    fn arrange(&self, gaps: Vec<Gap>) -> Vec<Gap> {
        gaps
    }
}

/// Anti-diagonal sweep from the upper left corner. Gaps starting on the same anti-diagonal keep
/// their extraction order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagonal;

impl OrderingStrategy for Diagonal {
    fn arrange(&self, mut gaps: Vec<Gap>) -> Vec<Gap> {
        // `sort_by_key` is stable.
        gaps.sort_by_key(|gap| gap.row + gap.column);
        gaps
    }
}

/// Longest gaps first. A length shared by no other gap is the most constrained kind of slot, so
/// such a gap jumps to the very front of everything staged so far; a length shared by several
/// gaps is appended as a block in extraction order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByLength;

impl OrderingStrategy for ByLength {
    fn arrange(&self, gaps: Vec<Gap>) -> Vec<Gap> {
        let mut gaps_by_length: BTreeMap<usize, Vec<Gap>> = BTreeMap::new();
        for gap in gaps {
            gaps_by_length.entry(gap.length).or_insert_with(|| vec![]).push(gap);
        }

        let mut result: Vec<Gap> = Vec::with_capacity(gaps_by_length.values().map(Vec::len).sum());
        for (_, group) in gaps_by_length.into_iter().rev() {
            if group.len() == 1 {
                result.insert(0, group[0]);
            } else {
                result.extend(group);
            }
        }

        result
    }
}

/// The built-in orderings, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapOrder {
    Linear,
    Diagonal,
    #[default]
    ByLength,
}

impl GapOrder {
    pub const ALL: [GapOrder; 3] = [GapOrder::Linear, GapOrder::Diagonal, GapOrder::ByLength];

    pub fn name(&self) -> &'static str {
        match self {
            GapOrder::Linear => "linear",
            GapOrder::Diagonal => "diagonal",
            GapOrder::ByLength => "by-length",
        }
    }
}

impl OrderingStrategy for GapOrder {
    fn arrange(&self, gaps: Vec<Gap>) -> Vec<Gap> {
        match self {
            GapOrder::Linear => Linear.arrange(gaps),
            GapOrder::Diagonal => Diagonal.arrange(gaps),
            GapOrder::ByLength => ByLength.arrange(gaps),
        }
    }
}
