//! Comparison engine for DDR register tables.
//!
//! Compares two ordered register lists and classifies them as structurally
//! identical, identical but reordered, or structurally divergent, collecting
//! every value-level difference along the way.
//!
//! # Key Types
//!
//! - [`Comparator`] / [`Comparison`] / [`Outcome`] -- the orchestrator and its result
//! - [`DuplicateGroup`] -- repeated addresses within one list
//! - [`KeySetDiff`] / [`UniqueEntry`] -- left-only, right-only and common addresses
//! - [`ValueDiff`] -- a register whose value differs between the two sides
//! - [`RelocatedBlock`] -- a contiguous run of registers that moved
//! - [`InterferenceReport`] -- a duplicated register that also carries a value difference
//! - [`TimingReport`] -- every table of two [`ddrconf_types::DramTiming`] datasets

pub mod compare;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod interference;
pub mod keyset;
pub mod order;
pub mod relocate;
pub mod timing;

pub use compare::{CommonSubset, Comparator, Comparison, Duplicates, Outcome, TableComparison};
pub use config::CompareConfig;
pub use duplicates::{find_duplicates, DuplicateGroup, Occurrence};
pub use error::{CompareError, CompareResult};
pub use interference::{check_interference, InterferenceEntry, InterferenceReport, Side};
pub use keyset::{diff_key_sets, KeySetDiff, UniqueEntry};
pub use order::{matched_value_diffs, positional_value_diffs, same_positional_keys, ValueDiff};
pub use relocate::{relocate_blocks, BlockKind, MatchedRun, RelocatedBlock, Relocation};
pub use timing::{
    compare_timing, FieldDiff, Section, SectionGroup, TableDigest, TableEntry, TableReport, TimingReport,
};
