//! Order classification and value comparison for equal-length lists.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use serde::Serialize;

use ddrconf_types::Record;

/// A register whose value differs between the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValueDiff<K, V> {
    /// Position of the register in the left list.
    pub left_index: usize,
    /// Position of the matching register in the right list.
    pub right_index: usize,
    pub reg: K,
    pub left: V,
    pub right: V,
}

/// `true` if both lists carry the same register at every position.
pub fn same_positional_keys<K: Eq, V>(left: &[Record<K, V>], right: &[Record<K, V>]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.reg == r.reg)
}

/// Value differences between two lists already known to be in the same order.
pub fn positional_value_diffs<K, V>(
    left: &[Record<K, V>],
    right: &[Record<K, V>],
) -> Vec<ValueDiff<K, V>>
where
    K: Copy,
    V: Copy + Eq,
{
    left.iter()
        .zip(right)
        .enumerate()
        .filter(|(_, (l, r))| l.val != r.val)
        .map(|(i, (l, r))| ValueDiff {
            left_index: i,
            right_index: i,
            reg: l.reg,
            left: l.val,
            right: r.val,
        })
        .collect()
}

/// Value differences between two lists holding the same registers in a
/// different order.
///
/// Each left record is paired with the first not-yet-paired right record of
/// the same register, so repeated registers pair up in list order. Left
/// records without a partner are skipped; differences are reported in left
/// order.
pub fn matched_value_diffs<K, V>(
    left: &[Record<K, V>],
    right: &[Record<K, V>],
) -> Vec<ValueDiff<K, V>>
where
    K: Copy + Eq + Hash,
    V: Copy + Eq,
{
    let mut positions: HashMap<K, VecDeque<usize>> = HashMap::new();
    for (j, record) in right.iter().enumerate() {
        positions.entry(record.reg).or_default().push_back(j);
    }

    let mut diffs = Vec::new();
    for (i, l) in left.iter().enumerate() {
        let Some(j) = positions.get_mut(&l.reg).and_then(VecDeque::pop_front) else {
            continue;
        };
        let r = &right[j];
        if l.val != r.val {
            diffs.push(ValueDiff {
                left_index: i,
                right_index: j,
                reg: l.reg,
                left: l.val,
                right: r.val,
            });
        }
    }
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddrconf_types::DdrcParam;

    fn list(pairs: &[(u32, u32)]) -> Vec<DdrcParam> {
        pairs.iter().map(|&(r, v)| DdrcParam::new(r, v)).collect()
    }

    #[test]
    fn positional_keys() {
        let a = list(&[(1, 0), (2, 0)]);
        let b = list(&[(1, 9), (2, 9)]);
        let c = list(&[(2, 0), (1, 0)]);
        assert!(same_positional_keys(&a, &b));
        assert!(!same_positional_keys(&a, &c));
        assert!(!same_positional_keys(&a, &a[..1]));
    }

    #[test]
    fn positional_diffs_report_index_and_both_values() {
        let a = list(&[(1, 0), (2, 5), (3, 0)]);
        let b = list(&[(1, 0), (2, 6), (3, 0)]);
        let diffs = positional_value_diffs(&a, &b);
        assert_eq!(
            diffs,
            vec![ValueDiff { left_index: 1, right_index: 1, reg: 2, left: 5, right: 6 }]
        );
    }

    #[test]
    fn matched_diffs_follow_register_not_position() {
        let a = list(&[(0x10, 1), (0x20, 2), (0x30, 3)]);
        let b = list(&[(0x20, 2), (0x10, 9), (0x30, 3)]);
        let diffs = matched_value_diffs(&a, &b);
        assert_eq!(
            diffs,
            vec![ValueDiff { left_index: 0, right_index: 1, reg: 0x10, left: 1, right: 9 }]
        );
    }

    #[test]
    fn matched_diffs_pair_duplicates_in_order() {
        let a = list(&[(1, 1), (2, 0), (1, 2)]);
        let b = list(&[(2, 0), (1, 1), (1, 3)]);
        let diffs = matched_value_diffs(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].left_index, 2);
        assert_eq!(diffs[0].right_index, 2);
        assert_eq!(diffs[0].right, 3);
    }
}
