//! Discrete speed steps for the global time dilation.
//!
//! The ladder is sorted ascending. Lookups treat runs of equal values
//! transparently, so duplicates are tolerated rather than removed.

use tracing::warn;

/// Smallest dilation the clock will ever hold, whatever the world allows.
pub const DILATION_FLOOR: f32 = f32::EPSILON;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedLadder {
    values: Vec<f32>,
    index: usize,
}

impl SpeedLadder {
    /// Creates a sorted ladder positioned at index 0.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut ladder = Self {
            values: values.into(),
            index: 0,
        };
        ladder.sort();
        ladder
    }

    /// Re-sorts ascending. Stable, so equal values keep their relative order.
    pub fn sort(&mut self) {
        self.values.sort_by(|a, b| a.total_cmp(b));
    }

    /// Drops out-of-range values from the front, then from the back.
    ///
    /// Stops at the first in-range value on each end. Out-of-range values
    /// between two in-range values are left where they are. Returns the
    /// removed values.
    pub fn prune_to_range(&mut self, min: f32, max: f32) -> Vec<f32> {
        let in_range = |v: &f32| *v >= min && *v <= max;

        let leading = self.values.iter().take_while(|v| !in_range(*v)).count();
        let mut pruned: Vec<f32> = self.values.drain(..leading).collect();

        let trailing = self.values.iter().rev().take_while(|v| !in_range(*v)).count();
        let keep = self.values.len() - trailing;
        pruned.extend(self.values.drain(keep..));

        for value in &pruned {
            warn!(
                "Speed option {:.6} is not in the valid range ({:.6} .. {:.6}), pruning it",
                value, min, max
            );
        }

        self.index = self.index.min(self.values.len().saturating_sub(1));
        pruned
    }

    /// Inserts `fallback` and resets the index to 0 if the ladder is empty.
    ///
    /// Returns whether anything was inserted.
    pub fn ensure_non_empty(&mut self, fallback: f32) -> bool {
        if !self.values.is_empty() {
            return false;
        }
        warn!("No valid speed options defined; added one: {:.6}", fallback);
        self.values.push(fallback);
        self.index = 0;
        true
    }

    /// Greatest index whose value does not exceed `target`.
    ///
    /// Ties resolve to the highest such index. A target below every value
    /// yields 0 and a target above every value yields the last index.
    pub fn find_approximate_index(&self, target: f32) -> usize {
        self.values
            .partition_point(|v| *v <= target)
            .saturating_sub(1)
    }

    pub fn can_step_up(&self, index: usize) -> bool {
        index + 1 < self.values.len()
    }

    pub fn can_step_down(&self, index: usize) -> bool {
        index > 0
    }

    /// Moves one step up and returns the new value.
    pub fn step_up(&mut self) -> Option<f32> {
        if !self.can_step_up(self.index) {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// Moves one step down and returns the new value.
    pub fn step_down(&mut self) -> Option<f32> {
        if !self.can_step_down(self.index) {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    /// Moves the index to the floor of `target` and returns the value there.
    pub fn snap_to(&mut self, target: f32) -> Option<f32> {
        self.index = self.find_approximate_index(target);
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Sets the index, clamped to the last valid position.
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.values.len().saturating_sub(1));
    }

    pub fn value(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn current(&self) -> Option<f32> {
        self.value(self.index)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
