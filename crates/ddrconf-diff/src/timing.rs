//! Table-level orchestration over two complete timing datasets.
//!
//! Every table is compared independently; a structural problem in one table
//! or section never prevents the others from being evaluated.

use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, warn};

use ddrconf_types::{table_checksum, DramTiming, PackedRecord, Record, TableKind};

use crate::compare::{Comparator, Outcome, TableComparison};
use crate::keyset::diff_key_sets;

/// One compared table, with the metadata shown in its header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableEntry<K, V> {
    pub name: String,
    pub kind: TableKind,
    pub left_len: usize,
    pub right_len: usize,
    pub left_bytes: usize,
    pub right_bytes: usize,
    pub left_crc: u32,
    pub right_crc: u32,
    pub result: TableComparison<K, V>,
    /// Sizes and checksums of the common sublists, present when the lengths
    /// differ and the common subset was compared.
    pub common_digest: Option<TableDigest>,
}

/// Packed sizes and checksums of both sides of a register list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TableDigest {
    pub left_bytes: usize,
    pub right_bytes: usize,
    pub left_crc: u32,
    pub right_crc: u32,
}

/// A compared table of either width.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableReport {
    Ddrc(TableEntry<u32, u32>),
    Phy(TableEntry<u32, u16>),
}

impl TableReport {
    pub fn name(&self) -> &str {
        match self {
            Self::Ddrc(t) => &t.name,
            Self::Phy(t) => &t.name,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Ddrc(t) => t.result.comparison.outcome,
            Self::Phy(t) => t.result.comparison.outcome,
        }
    }

    /// Value differences, including those of a nested common subset.
    pub fn total_diff_count(&self) -> usize {
        match self {
            Self::Ddrc(t) => t.result.comparison.total_diff_count(),
            Self::Phy(t) => t.result.comparison.total_diff_count(),
        }
    }
}

/// A scalar field that differs between the two datasets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub name: String,
    pub left: u32,
    pub right: u32,
}

/// Tables and fields belonging to one entry of a section (one FSP, say).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectionGroup {
    pub label: Option<String>,
    pub fields: Vec<FieldDiff>,
    pub tables: Vec<TableReport>,
}

/// One top-level section of the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    /// Left and right entry counts for sections that are arrays of set-points.
    pub entries: Option<(usize, usize)>,
    pub groups: Vec<SectionGroup>,
}

impl Section {
    fn single(name: &str, table: TableReport) -> Self {
        Self {
            name: name.to_string(),
            entries: None,
            groups: vec![SectionGroup {
                label: None,
                fields: Vec::new(),
                tables: vec![table],
            }],
        }
    }

    /// The set-point counts differ, so the per-set-point tables were skipped.
    pub fn count_mismatch(&self) -> bool {
        matches!(self.entries, Some((l, r)) if l != r)
    }

    pub fn has_structural_errors(&self) -> bool {
        self.count_mismatch()
            || self
                .groups
                .iter()
                .flat_map(|g| &g.tables)
                .any(|t| t.outcome().is_structural_mismatch())
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableReport> {
        self.groups.iter().flat_map(|g| &g.tables)
    }
}

/// Comparison of two complete timing datasets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub sections: Vec<Section>,
    pub left_bytes: usize,
    pub right_bytes: usize,
}

impl TimingReport {
    /// Right size minus left size, in bytes.
    pub fn size_difference(&self) -> i64 {
        self.right_bytes as i64 - self.left_bytes as i64
    }

    pub fn has_structural_errors(&self) -> bool {
        self.sections.iter().any(Section::has_structural_errors)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableReport> {
        self.sections.iter().flat_map(Section::tables)
    }

    /// Scalar fields (bypass, drate, fw_type) that differ.
    pub fn field_diffs(&self) -> impl Iterator<Item = &FieldDiff> {
        self.sections
            .iter()
            .flat_map(|s| &s.groups)
            .flat_map(|g| &g.fields)
    }

    pub fn field_diff_count(&self) -> usize {
        self.field_diffs().count()
    }

    /// Register value differences over every table plus differing scalar fields.
    pub fn total_diff_count(&self) -> usize {
        self.tables().map(TableReport::total_diff_count).sum::<usize>() + self.field_diff_count()
    }
}

/// Compare every table of two timing datasets.
pub fn compare_timing(
    left: &DramTiming,
    right: &DramTiming,
    comparator: &Comparator,
) -> TimingReport {
    let mut sections = vec![Section::single(
        "ddrc_cfg",
        TableReport::Ddrc(table_entry(comparator, "ddrc_cfg", &left.ddrc_cfg, &right.ddrc_cfg)),
    )];

    sections.push(compare_fsp_cfg(left, right, comparator));

    sections.push(Section::single(
        "ddrphy_cfg",
        TableReport::Phy(table_entry(comparator, "ddrphy_cfg", &left.ddrphy_cfg, &right.ddrphy_cfg)),
    ));

    sections.push(compare_fsp_msg(left, right, comparator));

    for (name, l, r) in [
        ("ddrphy_trained_csr", &left.ddrphy_trained_csr, &right.ddrphy_trained_csr),
        ("ddrphy_pie", &left.ddrphy_pie, &right.ddrphy_pie),
    ] {
        sections.push(Section::single(
            name,
            TableReport::Phy(table_entry(comparator, name, l, r)),
        ));
    }

    let report = TimingReport {
        sections,
        left_bytes: left.total_bytes(),
        right_bytes: right.total_bytes(),
    };
    debug!(
        tables = report.tables().count(),
        structural = report.has_structural_errors(),
        "timing comparison complete"
    );
    report
}

fn compare_fsp_cfg(left: &DramTiming, right: &DramTiming, comparator: &Comparator) -> Section {
    let mut section = Section {
        name: "fsp_cfg".to_string(),
        entries: Some((left.fsp_cfg.len(), right.fsp_cfg.len())),
        groups: Vec::new(),
    };
    if section.count_mismatch() {
        warn!(left = left.fsp_cfg.len(), right = right.fsp_cfg.len(), "FSP entry counts differ");
        return section;
    }

    for (i, (l, r)) in left.fsp_cfg.iter().zip(&right.fsp_cfg).enumerate() {
        let mut group = SectionGroup {
            label: Some(format!("FSP {i}")),
            ..Default::default()
        };
        let name = format!("fsp_cfg[{i}].ddrc_cfg");
        group
            .tables
            .push(TableReport::Ddrc(table_entry(comparator, &name, &l.ddrc_cfg, &r.ddrc_cfg)));
        push_field(&mut group.fields, format!("fsp_cfg[{i}].bypass"), l.bypass, r.bypass);
        section.groups.push(group);
    }
    section
}

fn compare_fsp_msg(left: &DramTiming, right: &DramTiming, comparator: &Comparator) -> Section {
    let mut section = Section {
        name: "fsp_msg".to_string(),
        entries: Some((left.fsp_msg.len(), right.fsp_msg.len())),
        groups: Vec::new(),
    };
    if section.count_mismatch() {
        warn!(left = left.fsp_msg.len(), right = right.fsp_msg.len(), "FSP message counts differ");
        return section;
    }

    for (i, (l, r)) in left.fsp_msg.iter().zip(&right.fsp_msg).enumerate() {
        let mut group = SectionGroup {
            label: Some(format!("FSP Message {i}")),
            ..Default::default()
        };
        push_field(&mut group.fields, format!("fsp_msg[{i}].drate"), l.drate, r.drate);
        push_field(
            &mut group.fields,
            format!("fsp_msg[{i}].fw_type"),
            l.fw_type.code(),
            r.fw_type.code(),
        );
        for (table, lt, rt) in [
            ("fsp_phy_cfg", &l.fsp_phy_cfg, &r.fsp_phy_cfg),
            ("fsp_phy_msgh_cfg", &l.fsp_phy_msgh_cfg, &r.fsp_phy_msgh_cfg),
            ("fsp_phy_pie_cfg", &l.fsp_phy_pie_cfg, &r.fsp_phy_pie_cfg),
        ] {
            let name = format!("fsp_msg[{i}].{table}");
            group
                .tables
                .push(TableReport::Phy(table_entry(comparator, &name, lt, rt)));
        }
        section.groups.push(group);
    }
    section
}

fn push_field(fields: &mut Vec<FieldDiff>, name: String, left: u32, right: u32) {
    if left != right {
        fields.push(FieldDiff { name, left, right });
    }
}

fn table_entry<K, V>(
    comparator: &Comparator,
    name: &str,
    left: &[Record<K, V>],
    right: &[Record<K, V>],
) -> TableEntry<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy + Eq,
    Record<K, V>: PackedRecord,
{
    debug!(table = name, left = left.len(), right = right.len(), "comparing table");
    let size = <Record<K, V> as PackedRecord>::PACKED_SIZE;
    let result = comparator.compare_table(left, right);

    // The nested comparison only keeps indices, so the common sublists are
    // rebuilt here to size and checksum them.
    let common_digest = result
        .comparison
        .common_comparison()
        .and_then(|_| diff_key_sets(left, right).extract_common(left, right).ok())
        .map(|(common_left, common_right)| TableDigest {
            left_bytes: common_left.len() * size,
            right_bytes: common_right.len() * size,
            left_crc: table_checksum(&common_left),
            right_crc: table_checksum(&common_right),
        });

    TableEntry {
        name: name.to_string(),
        kind: <Record<K, V> as PackedRecord>::KIND,
        left_len: left.len(),
        right_len: right.len(),
        left_bytes: left.len() * size,
        right_bytes: right.len() * size,
        left_crc: table_checksum(left),
        right_crc: table_checksum(right),
        result,
        common_digest,
    }
}
