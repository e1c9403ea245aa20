//! Block relocator: explain a reordering as contiguous moved blocks.
//!
//! Given two lists with the same registers in a different order, a single
//! forward pass with one cursor per list groups the mismatch region into
//! blocks instead of reporting every displaced register on its own.
//!
//! The scan is deliberately bounded: a register only counts as "found" on the
//! other side if it appears within `lookahead_window` entries of the other
//! cursor. Blocks that moved further than the window are reported as several
//! smaller blocks or as one-sided blocks. This is an approximation and not a
//! longest-common-subsequence diff.

use std::ops::Range;

use serde::Serialize;
use tracing::trace;

use ddrconf_types::Record;

use crate::config::CompareConfig;

/// How a [`RelocatedBlock`] pairs up across the two lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Both sides consumed entries: the block moved.
    Relocated,
    /// Only the left side consumed entries.
    LeftOnly,
    /// Only the right side consumed entries.
    RightOnly,
}

/// A contiguous run of entries consumed by the relocator on each side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelocatedBlock<K, V> {
    /// Entries of the left list covered by the block (may be empty).
    pub left: Range<usize>,
    /// Entries of the right list covered by the block (may be empty).
    pub right: Range<usize>,
    /// The block is the unmatched remainder after the other list ran out.
    pub trailing: bool,
    /// Copies of the covered left records, so the block can be shown after
    /// the compared lists are gone.
    pub left_records: Vec<Record<K, V>>,
    pub right_records: Vec<Record<K, V>>,
}

impl<K: Copy, V: Copy> RelocatedBlock<K, V> {
    fn capture(
        left: &[Record<K, V>],
        right: &[Record<K, V>],
        left_range: Range<usize>,
        right_range: Range<usize>,
        trailing: bool,
    ) -> Self {
        Self {
            left_records: left[left_range.clone()].to_vec(),
            right_records: right[right_range.clone()].to_vec(),
            left: left_range,
            right: right_range,
            trailing,
        }
    }
}

impl<K, V> RelocatedBlock<K, V> {
    pub fn kind(&self) -> BlockKind {
        match (self.left.is_empty(), self.right.is_empty()) {
            (false, false) => BlockKind::Relocated,
            (false, true) => BlockKind::LeftOnly,
            _ => BlockKind::RightOnly,
        }
    }
}

/// A run of registers found at aligned positions on both sides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchedRun {
    pub left: Range<usize>,
    pub right: Range<usize>,
}

impl MatchedRun {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Output of the block relocator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Relocation<K, V> {
    /// Mismatch blocks in scan order.
    pub blocks: Vec<RelocatedBlock<K, V>>,
    /// Long matched runs, only collected when
    /// [`CompareConfig::summarize_matched_runs`] is set.
    pub matched_runs: Vec<MatchedRun>,
}

impl<K, V> Default for Relocation<K, V> {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            matched_runs: Vec::new(),
        }
    }
}

impl<K, V> Relocation<K, V> {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Partition the mismatch region of two reordered lists into blocks.
pub fn relocate_blocks<K, V>(
    left: &[Record<K, V>],
    right: &[Record<K, V>],
    config: &CompareConfig,
) -> Relocation<K, V>
where
    K: Copy + Eq,
    V: Copy,
{
    let window = config.lookahead_window;
    let mut relocation = Relocation::default();
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        if left[i].reg == right[j].reg {
            let (start_i, start_j) = (i, j);
            while i < left.len() && j < right.len() && left[i].reg == right[j].reg {
                i += 1;
                j += 1;
            }
            if config.summarize_matched_runs && i - start_i > config.matched_run_min_len {
                relocation.matched_runs.push(MatchedRun {
                    left: start_i..i,
                    right: start_j..j,
                });
            }
            continue;
        }

        let (start_i, start_j) = (i, j);
        while i < left.len() && !appears_within(&left[i].reg, right, j, window) {
            i += 1;
        }
        while j < right.len() && !appears_within(&right[j].reg, left, i, window) {
            j += 1;
        }

        // Both heads are visible in the other's window (a swapped pair, for
        // instance). Consume in lock step until the cursors line up again.
        if i == start_i && j == start_j {
            while i < left.len() && j < right.len() && left[i].reg != right[j].reg {
                i += 1;
                j += 1;
            }
        }

        trace!(left = ?(start_i..i), right = ?(start_j..j), "relocated block");
        relocation.blocks.push(RelocatedBlock::capture(
            left,
            right,
            start_i..i,
            start_j..j,
            false,
        ));
    }

    if i < left.len() {
        relocation.blocks.push(RelocatedBlock::capture(
            left,
            right,
            i..left.len(),
            j..j,
            true,
        ));
    }
    if j < right.len() {
        relocation.blocks.push(RelocatedBlock::capture(
            left,
            right,
            i..i,
            j..right.len(),
            true,
        ));
    }

    relocation
}

/// `true` if `reg` occurs in `list[from..from + window]`.
fn appears_within<K: Eq, V>(reg: &K, list: &[Record<K, V>], from: usize, window: usize) -> bool {
    let end = from.saturating_add(window).min(list.len());
    list.get(from..end)
        .is_some_and(|slice| slice.iter().any(|r| r.reg == *reg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddrconf_types::PhyParam;

    fn keys(regs: &[u32]) -> Vec<PhyParam> {
        regs.iter().map(|&r| PhyParam::new(r, 0)).collect()
    }

    fn spans(rel: &Relocation<u32, u16>) -> Vec<(Range<usize>, Range<usize>, bool)> {
        rel.blocks
            .iter()
            .map(|b| (b.left.clone(), b.right.clone(), b.trailing))
            .collect()
    }

    fn config(window: usize) -> CompareConfig {
        CompareConfig {
            lookahead_window: window,
            ..Default::default()
        }
    }

    #[test]
    fn identical_lists_have_no_blocks() {
        let l = keys(&[1, 2, 3]);
        assert!(relocate_blocks(&l, &l, &config(50)).is_empty());
    }

    #[test]
    fn swapped_pair_is_one_block() {
        let l = keys(&[0x10, 0x20, 0x30]);
        let r = keys(&[0x20, 0x10, 0x30]);
        let rel = relocate_blocks(&l, &r, &config(50));
        assert_eq!(
            spans(&rel),
            vec![(0..2, 0..2, false)]
        );
        assert_eq!(rel.blocks[0].kind(), BlockKind::Relocated);
    }

    #[test]
    fn moved_block_inside_window_spans_the_whole_mismatch() {
        // [4, 5] moved from the end to the front. Both heads are visible in
        // the other's window, so the region is consumed in lock step until
        // the cursors line up again, which here is the end of both lists.
        let l = keys(&[1, 2, 3, 4, 5]);
        let r = keys(&[4, 5, 1, 2, 3]);
        let rel = relocate_blocks(&l, &r, &config(50));
        assert_eq!(
            spans(&rel),
            vec![(0..5, 0..5, false)]
        );
    }

    #[test]
    fn move_beyond_window_yields_one_sided_blocks() {
        // Register 100 moved from the front to the back, further than the window.
        let mut l = vec![100];
        l.extend(1..=6);
        let mut r: Vec<u32> = (1..=6).collect();
        r.push(100);
        let rel = relocate_blocks(&keys(&l), &keys(&r), &config(2));

        assert_eq!(
            spans(&rel),
            vec![
                (0..1, 0..0, false),
                (7..7, 6..7, true),
            ]
        );
        assert_eq!(rel.blocks[0].kind(), BlockKind::LeftOnly);
        assert_eq!(rel.blocks[1].kind(), BlockKind::RightOnly);
    }

    #[test]
    fn same_move_inside_window_is_a_single_scan_block() {
        let mut l = vec![100];
        l.extend(1..=6);
        let mut r: Vec<u32> = (1..=6).collect();
        r.push(100);
        let rel = relocate_blocks(&keys(&l), &keys(&r), &config(50));
        // 100 is visible in the right window and 1 in the left window:
        // lock-step consumption runs to the end of both lists.
        assert_eq!(
            spans(&rel),
            vec![(0..7, 0..7, false)]
        );
    }

    #[test]
    fn long_matched_runs_are_summarized_when_enabled() {
        let mut l: Vec<u32> = (1..=12).collect();
        l.extend([50, 60]);
        let mut r: Vec<u32> = (1..=12).collect();
        r.extend([60, 50]);
        let cfg = CompareConfig {
            summarize_matched_runs: true,
            ..Default::default()
        };
        let rel = relocate_blocks(&keys(&l), &keys(&r), &cfg);
        assert_eq!(rel.matched_runs, vec![MatchedRun { left: 0..12, right: 0..12 }]);
        assert_eq!(rel.matched_runs[0].len(), 12);
        assert_eq!(rel.blocks.len(), 1);

        let rel = relocate_blocks(&keys(&l), &keys(&r), &CompareConfig::default());
        assert!(rel.matched_runs.is_empty());
    }

    #[test]
    fn zero_window_still_terminates() {
        let l = keys(&[1, 2, 3]);
        let r = keys(&[3, 2, 1]);
        let rel = relocate_blocks(&l, &r, &config(0));
        // Nothing is ever "found" with an empty window, so both sides are
        // consumed whole by the extension scans.
        assert_eq!(
            spans(&rel),
            vec![(0..3, 0..3, false)]
        );
    }
}
