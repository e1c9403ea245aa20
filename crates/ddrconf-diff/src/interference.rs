//! Duplicate-interference checker.
//!
//! When a duplicated register also carries a value difference it is unclear
//! which occurrence's difference matters, so such registers are called out
//! separately from ordinary value differences.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use ddrconf_types::Record;

use crate::duplicates::DuplicateGroup;

/// Which list a duplicate group was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Values at one occurrence of an interfering register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InterferenceEntry<V> {
    pub index: usize,
    pub left: V,
    pub right: V,
}

/// A duplicated register involved in at least one value difference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterferenceReport<K, V> {
    pub reg: K,
    /// The side whose duplicate group triggered the report.
    pub side: Side,
    /// Every recorded occurrence of the group, with both sides' values.
    pub entries: Vec<InterferenceEntry<V>>,
}

/// Report duplicated registers that also differ in value at some position.
///
/// Left groups are checked before right groups and each register is reported
/// at most once. Positions are compared as aligned pairs, so both lists must
/// have the same length; otherwise nothing is reported.
pub fn check_interference<K, V>(
    left: &[Record<K, V>],
    right: &[Record<K, V>],
    left_groups: &[DuplicateGroup<K, V>],
    right_groups: &[DuplicateGroup<K, V>],
) -> Vec<InterferenceReport<K, V>>
where
    K: Copy + Eq + Hash,
    V: Copy + Eq,
{
    if left.len() != right.len() {
        return Vec::new();
    }

    let mut reported = HashSet::new();
    let mut reports = Vec::new();

    let sides = left_groups
        .iter()
        .map(|g| (Side::Left, g))
        .chain(right_groups.iter().map(|g| (Side::Right, g)));

    for (side, group) in sides {
        if reported.contains(&group.reg) {
            continue;
        }
        let differs = left
            .iter()
            .zip(right)
            .any(|(l, r)| l.reg == group.reg && l.val != r.val);
        if !differs {
            continue;
        }

        reports.push(InterferenceReport {
            reg: group.reg,
            side,
            entries: group
                .occurrences
                .iter()
                .map(|o| InterferenceEntry {
                    index: o.index,
                    left: left[o.index].val,
                    right: right[o.index].val,
                })
                .collect(),
        });
        reported.insert(group.reg);
    }

    reports
}
