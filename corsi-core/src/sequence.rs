use serde::{Deserialize, Serialize};

/// An ordered list of block indices presented to the participant.
///
/// Immutable after creation; serializes as a plain array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Vec<usize>);

impl Sequence {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn get(&self, item: usize) -> Option<usize> {
        self.0.get(item).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// True when no two consecutive indices are equal.
    pub fn has_no_adjacent_repeats(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] != pair[1])
    }

    /// True when every index addresses one of `num_positions` blocks.
    pub fn in_range(&self, num_positions: usize) -> bool {
        self.0.iter().all(|&index| index < num_positions)
    }
}

impl From<Vec<usize>> for Sequence {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}
