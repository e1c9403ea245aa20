use serde::{Deserialize, Serialize};

/// Tuning knobs for the comparison engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// How many entries ahead of the other cursor the block relocator looks
    /// for a displaced register before declaring it part of a moved block.
    pub lookahead_window: usize,
    /// Maximum number of occurrences recorded per duplicate group. Later
    /// occurrences of the same register are consumed but not recorded.
    pub max_group_size: usize,
    /// Maximum number of duplicate groups reported per list.
    pub max_duplicate_groups: usize,
    /// Record positional matched runs found by the block relocator.
    pub summarize_matched_runs: bool,
    /// Matched runs must be longer than this to be recorded.
    pub matched_run_min_len: usize,
    /// Run the duplicate scanner and interference checker on every table.
    pub scan_duplicates: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            lookahead_window: 50,
            max_group_size: 64,
            max_duplicate_groups: 100,
            summarize_matched_runs: false,
            matched_run_min_len: 10,
            scan_duplicates: true,
        }
    }
}
