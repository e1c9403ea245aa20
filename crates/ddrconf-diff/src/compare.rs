//! The comparator: orchestrates the individual analyses for one table pair.
//!
//! ```text
//! Start ─┬─ lengths equal ──► positional keys equal? ─ yes ─► IdenticalOrder
//!        │                                           └ no ──► same key set? ─ yes ─► Reordered
//!        │                                                                   └ no ──► StructuralMismatch
//!        └─ lengths differ ─► unique entries ─► common subset ─► compare(common) [nested]
//!                                                               └► StructuralMismatch
//! ```

use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, warn};

use ddrconf_types::Record;

use crate::config::CompareConfig;
use crate::duplicates::{find_duplicates, DuplicateGroup};
use crate::error::CompareError;
use crate::interference::{check_interference, InterferenceReport};
use crate::keyset::{diff_key_sets, UniqueEntry};
use crate::order::{matched_value_diffs, positional_value_diffs, same_positional_keys, ValueDiff};
use crate::relocate::{relocate_blocks, Relocation};

/// Classification of a table pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Lengths or register sets differ.
    StructuralMismatch,
    /// Same registers at the same positions.
    IdenticalOrder { diff_count: usize },
    /// Same registers, different positions.
    Reordered { diff_count: usize },
}

impl Outcome {
    /// Number of value differences; zero for a structural mismatch.
    pub fn diff_count(&self) -> usize {
        match self {
            Self::StructuralMismatch => 0,
            Self::IdenticalOrder { diff_count } | Self::Reordered { diff_count } => *diff_count,
        }
    }

    pub fn is_structural_mismatch(&self) -> bool {
        matches!(self, Self::StructuralMismatch)
    }
}

/// Result of the common-subset comparison run after a length mismatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CommonSubset<K, V> {
    /// The two lists share no registers.
    Empty,
    /// The common registers were compared.
    Compared(Box<Comparison<K, V>>),
    /// The branch was abandoned.
    Failed(CompareError),
}

/// Structured result of comparing two register lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comparison<K, V> {
    pub outcome: Outcome,
    pub left_len: usize,
    pub right_len: usize,
    /// Left occurrences with no counterpart on the right.
    pub left_only: Vec<UniqueEntry<K, V>>,
    /// Right occurrences with no counterpart on the left.
    pub right_only: Vec<UniqueEntry<K, V>>,
    pub value_diffs: Vec<ValueDiff<K, V>>,
    /// Moved blocks; only populated for [`Outcome::Reordered`].
    pub relocation: Relocation<K, V>,
    /// Nested comparison of the common registers; only present when the
    /// lengths differ.
    pub common: Option<CommonSubset<K, V>>,
}

impl<K, V> Comparison<K, V> {
    fn new(left_len: usize, right_len: usize) -> Self {
        Self {
            outcome: Outcome::StructuralMismatch,
            left_len,
            right_len,
            left_only: Vec::new(),
            right_only: Vec::new(),
            value_diffs: Vec::new(),
            relocation: Relocation::default(),
            common: None,
        }
    }

    /// The nested common-subset comparison, if it ran to completion.
    pub fn common_comparison(&self) -> Option<&Comparison<K, V>> {
        match &self.common {
            Some(CommonSubset::Compared(nested)) => Some(&**nested),
            _ => None,
        }
    }

    /// The error that abandoned the common-subset comparison, if any.
    pub fn common_error(&self) -> Option<&CompareError> {
        match &self.common {
            Some(CommonSubset::Failed(err)) => Some(err),
            _ => None,
        }
    }

    /// Value differences, counting those found in the common subset when the
    /// lengths differ.
    pub fn total_diff_count(&self) -> usize {
        match self.common_comparison() {
            Some(nested) => nested.total_diff_count(),
            None => self.outcome.diff_count(),
        }
    }
}

/// Duplicate groups found on each side of a table pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Duplicates<K, V> {
    pub left: Vec<DuplicateGroup<K, V>>,
    pub right: Vec<DuplicateGroup<K, V>>,
}

impl<K, V> Default for Duplicates<K, V> {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }
}

impl<K, V> Duplicates<K, V> {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Number of duplicated registers over both sides.
    pub fn total(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

/// A table comparison together with its duplicate analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableComparison<K, V> {
    pub comparison: Comparison<K, V>,
    pub duplicates: Duplicates<K, V>,
    pub interference: Vec<InterferenceReport<K, V>>,
}

/// Compares register lists according to a [`CompareConfig`].
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare one table pair, including duplicate and interference analysis.
    ///
    /// Interference is only analysed when both lists have the same length,
    /// the register sets match, and at least one value differs.
    pub fn compare_table<K, V>(
        &self,
        left: &[Record<K, V>],
        right: &[Record<K, V>],
    ) -> TableComparison<K, V>
    where
        K: Copy + Eq + Hash,
        V: Copy + Eq,
    {
        let comparison = self.compare(left, right);

        if !self.config.scan_duplicates {
            return TableComparison {
                comparison,
                duplicates: Duplicates::default(),
                interference: Vec::new(),
            };
        }

        let duplicates = Duplicates {
            left: self.scan_duplicates(left),
            right: self.scan_duplicates(right),
        };
        let interference = if !duplicates.is_empty()
            && left.len() == right.len()
            && !comparison.outcome.is_structural_mismatch()
            && comparison.outcome.diff_count() > 0
        {
            check_interference(left, right, &duplicates.left, &duplicates.right)
        } else {
            Vec::new()
        };

        debug!(
            duplicates = duplicates.total(),
            interference = interference.len(),
            "duplicate analysis complete"
        );

        TableComparison {
            comparison,
            duplicates,
            interference,
        }
    }

    /// Compare two register lists.
    ///
    /// Lists of different length are always a [`Outcome::StructuralMismatch`];
    /// their common registers are compared recursively and the result nested
    /// in [`Comparison::common`].
    pub fn compare<K, V>(&self, left: &[Record<K, V>], right: &[Record<K, V>]) -> Comparison<K, V>
    where
        K: Copy + Eq + Hash,
        V: Copy + Eq,
    {
        if left.len() == right.len() {
            self.compare_equal_length(left, right)
        } else {
            self.compare_unequal_length(left, right)
        }
    }

    fn compare_unequal_length<K, V>(
        &self,
        left: &[Record<K, V>],
        right: &[Record<K, V>],
    ) -> Comparison<K, V>
    where
        K: Copy + Eq + Hash,
        V: Copy + Eq,
    {
        let mut result = Comparison::new(left.len(), right.len());
        let keys = diff_key_sets(left, right);

        debug!(
            left = left.len(),
            right = right.len(),
            left_only = keys.left_only.len(),
            right_only = keys.right_only.len(),
            "length mismatch"
        );

        result.common = Some(match keys.extract_common(left, right) {
            Ok((common_left, common_right)) if common_left.is_empty() => {
                debug_assert!(common_right.is_empty());
                CommonSubset::Empty
            }
            // The sublists are owned by this frame and dropped once the
            // nested comparison has been built.
            Ok((common_left, common_right)) => {
                CommonSubset::Compared(Box::new(self.compare(&common_left, &common_right)))
            }
            Err(err) => {
                warn!(error = %err, "abandoning common-subset comparison");
                CommonSubset::Failed(err)
            }
        });
        result.left_only = keys.left_only;
        result.right_only = keys.right_only;
        result
    }

    fn compare_equal_length<K, V>(
        &self,
        left: &[Record<K, V>],
        right: &[Record<K, V>],
    ) -> Comparison<K, V>
    where
        K: Copy + Eq + Hash,
        V: Copy + Eq,
    {
        let mut result = Comparison::new(left.len(), right.len());

        if same_positional_keys(left, right) {
            result.value_diffs = positional_value_diffs(left, right);
            result.outcome = Outcome::IdenticalOrder {
                diff_count: result.value_diffs.len(),
            };
            debug!(entries = left.len(), diffs = result.value_diffs.len(), "same order");
            return result;
        }

        let keys = diff_key_sets(left, right);
        if !keys.is_same_key_set() {
            debug!(
                left_only = keys.left_only.len(),
                right_only = keys.right_only.len(),
                "same length but different register sets"
            );
            result.left_only = keys.left_only;
            result.right_only = keys.right_only;
            return result;
        }

        result.relocation = relocate_blocks(left, right, &self.config);
        result.value_diffs = matched_value_diffs(left, right);
        result.outcome = Outcome::Reordered {
            diff_count: result.value_diffs.len(),
        };
        debug!(
            blocks = result.relocation.blocks.len(),
            diffs = result.value_diffs.len(),
            "same registers, different order"
        );
        result
    }

    fn scan_duplicates<K, V>(&self, list: &[Record<K, V>]) -> Vec<DuplicateGroup<K, V>>
    where
        K: Copy + Eq,
        V: Copy,
    {
        find_duplicates(
            list,
            self.config.max_group_size,
            self.config.max_duplicate_groups,
        )
    }
}
