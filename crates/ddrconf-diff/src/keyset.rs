//! Key-set differencer: which registers each side has that the other lacks.
//!
//! Matching is by register address only and treats each occurrence on its
//! own: a register written twice on the left and once on the right has one
//! common occurrence and one left-only occurrence.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use tracing::warn;

use ddrconf_types::Record;

use crate::error::{CompareError, CompareResult};

/// A record occurrence with no counterpart on the other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UniqueEntry<K, V> {
    /// Position in the list the record came from.
    pub index: usize,
    pub record: Record<K, V>,
}

/// The result of differencing the register sets of two lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySetDiff<K, V> {
    /// Left occurrences without a match on the right, in left order.
    pub left_only: Vec<UniqueEntry<K, V>>,
    /// Right occurrences without a match on the left, in right order.
    pub right_only: Vec<UniqueEntry<K, V>>,
    /// Common occurrences counted while walking the left list.
    pub common_left: usize,
    /// Common occurrences counted while walking the right list.
    pub common_right: usize,
    left_matched: Vec<bool>,
    right_matched: Vec<bool>,
}

impl<K: Copy, V: Copy> KeySetDiff<K, V> {
    /// `true` if both lists hold the same registers with the same multiplicity.
    pub fn is_same_key_set(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    /// The common-occurrence count, provided both sides agree on it.
    pub fn check_consistency(&self) -> CompareResult<usize> {
        if self.common_left == self.common_right {
            Ok(self.common_left)
        } else {
            warn!(
                left = self.common_left,
                right = self.common_right,
                "common register counts disagree"
            );
            Err(CompareError::InternalConsistency {
                left: self.common_left,
                right: self.common_right,
            })
        }
    }

    /// Copy the common occurrences of each side into fresh lists.
    ///
    /// Each sublist keeps the order of the list it was taken from. The two
    /// sublists always have equal length; a disagreement is reported as
    /// [`CompareError::InternalConsistency`].
    pub fn extract_common(
        &self,
        left: &[Record<K, V>],
        right: &[Record<K, V>],
    ) -> CompareResult<(Vec<Record<K, V>>, Vec<Record<K, V>>)> {
        let count = self.check_consistency()?;
        let common_left = collect_matched(left, &self.left_matched, count)?;
        let common_right = collect_matched(right, &self.right_matched, count)?;
        Ok((common_left, common_right))
    }
}

/// Partition two lists into left-only, right-only and common occurrences.
pub fn diff_key_sets<K, V>(left: &[Record<K, V>], right: &[Record<K, V>]) -> KeySetDiff<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    let left_matched = match_occurrences(left, right);
    let right_matched = match_occurrences(right, left);

    KeySetDiff {
        left_only: unmatched(left, &left_matched),
        right_only: unmatched(right, &right_matched),
        common_left: left_matched.iter().filter(|&&m| m).count(),
        common_right: right_matched.iter().filter(|&&m| m).count(),
        left_matched,
        right_matched,
    }
}

/// For every record of `from`, whether it consumes an as-yet unmatched
/// occurrence of the same register in `against`.
fn match_occurrences<K, V>(from: &[Record<K, V>], against: &[Record<K, V>]) -> Vec<bool>
where
    K: Copy + Eq + Hash,
{
    let mut available: HashMap<K, usize> = HashMap::new();
    for record in against {
        *available.entry(record.reg).or_default() += 1;
    }

    from.iter()
        .map(|record| match available.get_mut(&record.reg) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        })
        .collect()
}

fn unmatched<K: Copy, V: Copy>(list: &[Record<K, V>], matched: &[bool]) -> Vec<UniqueEntry<K, V>> {
    list.iter()
        .zip(matched)
        .enumerate()
        .filter(|(_, (_, &m))| !m)
        .map(|(index, (record, _))| UniqueEntry {
            index,
            record: *record,
        })
        .collect()
}

fn collect_matched<K: Copy, V: Copy>(
    list: &[Record<K, V>],
    matched: &[bool],
    count: usize,
) -> CompareResult<Vec<Record<K, V>>> {
    let mut out = Vec::new();
    out.try_reserve_exact(count).map_err(|_| {
        warn!(requested = count, "common subset allocation failed");
        CompareError::ResourceExhausted { requested: count }
    })?;
    out.extend(
        list.iter()
            .zip(matched)
            .filter(|(_, &m)| m)
            .map(|(record, _)| *record),
    );
    if out.len() != count {
        return Err(CompareError::InternalConsistency {
            left: count,
            right: out.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddrconf_types::DdrcParam;

    fn list(pairs: &[(u32, u32)]) -> Vec<DdrcParam> {
        pairs.iter().map(|&(r, v)| DdrcParam::new(r, v)).collect()
    }

    #[test]
    fn identical_lists_share_everything() {
        let l = list(&[(1, 1), (2, 2)]);
        let diff = diff_key_sets(&l, &l);
        assert!(diff.is_same_key_set());
        assert_eq!(diff.check_consistency(), Ok(2));
    }

    #[test]
    fn unique_entries_keep_original_indices() {
        let left = list(&[(1, 0), (2, 0), (3, 0)]);
        let right = list(&[(9, 0), (3, 7), (1, 0), (8, 0)]);
        let diff = diff_key_sets(&left, &right);

        assert_eq!(diff.left_only.len(), 1);
        assert_eq!(diff.left_only[0].index, 1);
        assert_eq!(diff.left_only[0].record.reg, 2);
        assert_eq!(
            diff.right_only.iter().map(|u| u.index).collect::<Vec<_>>(),
            vec![0, 3]
        );
        assert_eq!(diff.common_left, 2);
        assert_eq!(diff.common_right, 2);
    }

    #[test]
    fn duplicates_match_occurrence_by_occurrence() {
        let left = list(&[(1, 0), (1, 1), (2, 0)]);
        let right = list(&[(2, 0), (1, 5)]);
        let diff = diff_key_sets(&left, &right);

        assert_eq!(diff.left_only.len(), 1);
        assert_eq!(diff.left_only[0].index, 1);
        assert!(diff.right_only.is_empty());
        assert_eq!(diff.check_consistency(), Ok(2));
    }

    #[test]
    fn extracted_sublists_keep_their_own_order() {
        let left = list(&[(1, 1), (2, 2), (3, 3)]);
        let right = list(&[(3, 3), (1, 1)]);
        let diff = diff_key_sets(&left, &right);
        let (l, r) = diff.extract_common(&left, &right).unwrap();
        assert_eq!(l, list(&[(1, 1), (3, 3)]));
        assert_eq!(r, list(&[(3, 3), (1, 1)]));
    }

    #[test]
    fn disagreeing_counts_are_an_internal_error() {
        let left = list(&[(1, 1)]);
        let mut diff = diff_key_sets(&left, &left);
        diff.common_right = 0;
        assert_eq!(
            diff.extract_common(&left, &left),
            Err(CompareError::InternalConsistency { left: 1, right: 0 })
        );
    }

    #[test]
    fn disjoint_lists_have_no_common_subset() {
        let left = list(&[(1, 1)]);
        let right = list(&[(2, 1), (3, 1)]);
        let diff = diff_key_sets(&left, &right);
        let (l, r) = diff.extract_common(&left, &right).unwrap();
        assert!(l.is_empty() && r.is_empty());
    }
}
