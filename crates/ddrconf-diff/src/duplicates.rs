//! Duplicate scanner: registers programmed more than once within one table.
//!
//! A register written twice with the same value is redundant; written twice
//! with different values the later write wins on hardware, which is usually a
//! mistake in the table. Both cases are reported as a [`DuplicateGroup`].

use serde::Serialize;

use ddrconf_types::Record;

/// One occurrence of a duplicated register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Occurrence<V> {
    /// Position in the original list.
    pub index: usize,
    pub val: V,
}

/// Every recorded occurrence of a register that appears at least twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup<K, V> {
    pub reg: K,
    /// Occurrences in list order, capped at the configured group size.
    pub occurrences: Vec<Occurrence<V>>,
}

impl<K, V> DuplicateGroup<K, V> {
    /// Number of recorded occurrences.
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    /// Original list positions of the recorded occurrences.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.occurrences.iter().map(|o| o.index)
    }
}

impl<K, V: PartialEq> DuplicateGroup<K, V> {
    /// `true` if the occurrences do not all write the same value.
    pub fn has_conflicting_values(&self) -> bool {
        self.occurrences
            .windows(2)
            .any(|pair| pair[0].val != pair[1].val)
    }
}

/// Find every register that appears more than once in `list`.
///
/// Groups are returned in order of the first occurrence of each register.
/// Each record belongs to at most one group. At most `max_group_size`
/// occurrences are recorded per group; further occurrences are consumed
/// silently so the register still yields exactly one group. Scanning stops
/// once `max_groups` groups have been found.
pub fn find_duplicates<K, V>(
    list: &[Record<K, V>],
    max_group_size: usize,
    max_groups: usize,
) -> Vec<DuplicateGroup<K, V>>
where
    K: Copy + Eq,
    V: Copy,
{
    let mut consumed = vec![false; list.len()];
    let mut groups = Vec::new();

    for (i, head) in list.iter().enumerate() {
        if groups.len() >= max_groups {
            break;
        }
        if consumed[i] {
            continue;
        }

        let mut occurrences = vec![Occurrence {
            index: i,
            val: head.val,
        }];
        for (j, record) in list.iter().enumerate().skip(i + 1) {
            if record.reg != head.reg {
                continue;
            }
            consumed[j] = true;
            if occurrences.len() < max_group_size {
                occurrences.push(Occurrence {
                    index: j,
                    val: record.val,
                });
            }
        }

        if occurrences.len() > 1 {
            groups.push(DuplicateGroup {
                reg: head.reg,
                occurrences,
            });
        }
    }

    groups
}
