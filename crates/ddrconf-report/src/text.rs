//! Human-readable comparison report.
//!
//! The layout follows the firmware team's review format: one boxed section
//! per dataset section, `E:`/`W:`/`I:` status lines, and side-by-side
//! LEFT/RIGHT columns wherever both datasets contribute entries.

use std::fmt::{self, Display, Formatter};

use ddrconf_diff::{
    CommonSubset, Comparison, MatchedRun, Outcome, RelocatedBlock, Section, TableComparison,
    TableDigest, TableEntry, TableReport, TimingReport,
};
use ddrconf_types::TableKind;

use crate::style::{self, entry_cell, hex, kib, side_by_side, zip_longest, RULE};

/// Rows shown per side of a relocated block before the rest is elided.
pub const DEFAULT_MAX_BLOCK_ROWS: usize = 10;

#[derive(Clone, Debug)]
pub struct TextOptions {
    /// List every duplicate register instead of a one-line count.
    pub list_duplicates: bool,
    pub max_block_rows: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            list_duplicates: false,
            max_block_rows: DEFAULT_MAX_BLOCK_ROWS,
        }
    }
}

/// Display adapter rendering a [`TimingReport`] as text.
pub struct TextReport<'a> {
    report: &'a TimingReport,
    options: &'a TextOptions,
}

/// Render a report to a string.
pub fn render_text(report: &TimingReport, options: &TextOptions) -> String {
    TextReport::new(report, options).to_string()
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a TimingReport, options: &'a TextOptions) -> Self {
        Self { report, options }
    }

    fn write_section(&self, f: &mut Formatter<'_>, section: &Section) -> fmt::Result {
        style::section_box(f, &format!("Checking {}", section.name))?;

        if let Some((left, right)) = section.entries {
            let noun = entry_noun(&section.name);
            writeln!(f, "  {noun} Entries: Left={left}, Right={right}")?;
            if left != right {
                style::error(f, "  ", format!("Number of {noun} entries do not match!"))?;
                return writeln!(f);
            }
        }

        for group in &section.groups {
            let Some(label) = &group.label else {
                for table in &group.tables {
                    self.write_table(f, table, "  ")?;
                }
                continue;
            };
            writeln!(f)?;
            writeln!(f, "  {label}:")?;
            for field in &group.fields {
                writeln!(
                    f,
                    "    {}: {} → {}",
                    short_name(&field.name),
                    field.left,
                    field.right
                )?;
            }
            for table in &group.tables {
                style::sub_box_open(f, "  ", short_name(table.name()))?;
                self.write_table(f, table, "    ")?;
                style::sub_box_close(f, "  ")?;
            }
        }

        if section.entries.is_some() && section.has_structural_errors() {
            writeln!(f)?;
            style::warning(f, "  ", "Structural errors found")?;
        }
        writeln!(f)
    }

    fn write_table(&self, f: &mut Formatter<'_>, table: &TableReport, indent: &str) -> fmt::Result {
        match table {
            TableReport::Ddrc(entry) => self.write_entry(f, entry, indent),
            TableReport::Phy(entry) => self.write_entry(f, entry, indent),
        }
    }

    fn write_entry<K, V>(
        &self,
        f: &mut Formatter<'_>,
        entry: &TableEntry<K, V>,
        indent: &str,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        writeln!(f, "{indent}Entries: Left={}, Right={}", entry.left_len, entry.right_len)?;
        let digest = TableDigest {
            left_bytes: entry.left_bytes,
            right_bytes: entry.right_bytes,
            left_crc: entry.left_crc,
            right_crc: entry.right_crc,
        };
        write_digest(f, &digest, indent)?;

        let comparison = &entry.result.comparison;
        self.write_comparison(f, comparison, entry.kind, entry.common_digest.as_ref(), indent)?;
        write_summary(f, comparison.outcome, indent)?;
        self.write_duplicates(f, &entry.result, entry.kind, indent)
    }

    fn write_comparison<K, V>(
        &self,
        f: &mut Formatter<'_>,
        c: &Comparison<K, V>,
        kind: TableKind,
        common_digest: Option<&TableDigest>,
        indent: &str,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        match c.outcome {
            Outcome::StructuralMismatch if c.left_len != c.right_len => {
                style::warning(f, indent, "Structural differences found")?;
                write_unique(f, c, kind, indent)?;
                self.write_common(f, c, kind, common_digest, indent)
            }
            Outcome::StructuralMismatch => {
                style::error(f, indent, "Arrays have same length but different register sets!")?;
                if !c.left_only.is_empty() {
                    style::info(f, indent, "Registers in LEFT but not in RIGHT:")?;
                    for entry in &c.left_only {
                        writeln!(f, "{indent}    {}", entry_cell(entry.index, &entry.record, kind, 3))?;
                    }
                }
                if !c.right_only.is_empty() {
                    style::info(f, indent, "Registers in RIGHT but not in LEFT:")?;
                    for entry in &c.right_only {
                        writeln!(f, "{indent}    {}", entry_cell(entry.index, &entry.record, kind, 3))?;
                    }
                }
                Ok(())
            }
            Outcome::IdenticalOrder { diff_count } => {
                if diff_count > 0 {
                    style::info(f, indent, format!("Registers match, {diff_count} value differences"))?;
                    write_value_diffs(f, c, kind, indent, 3)?;
                }
                Ok(())
            }
            Outcome::Reordered { diff_count } => {
                style::warning(f, indent, "Registers match, different order")?;
                self.write_relocation(f, c, kind, indent)?;
                if diff_count > 0 {
                    style::info(f, indent, format!("Value differences: {diff_count}"))?;
                    write_value_diffs(f, c, kind, indent, 4)?;
                }
                Ok(())
            }
        }
    }

    fn write_common<K, V>(
        &self,
        f: &mut Formatter<'_>,
        c: &Comparison<K, V>,
        kind: TableKind,
        digest: Option<&TableDigest>,
        indent: &str,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        match &c.common {
            Some(CommonSubset::Compared(nested)) => {
                writeln!(f)?;
                style::common_box_open(f, indent)?;
                let nested_indent = format!("{indent}  ");
                writeln!(
                    f,
                    "{nested_indent}Entries: Left={}, Right={}",
                    nested.left_len, nested.right_len
                )?;
                if let Some(digest) = digest {
                    write_digest(f, digest, &nested_indent)?;
                }
                // Common sublists have equal length, so this never recurses again.
                self.write_comparison(f, nested, kind, None, &nested_indent)?;
                write_summary(f, nested.outcome, &nested_indent)?;
                style::common_box_close(f, indent)
            }
            Some(CommonSubset::Failed(err)) => {
                writeln!(f)?;
                style::common_box_open(f, indent)?;
                style::error(f, indent, err)?;
                style::common_box_close(f, indent)
            }
            Some(CommonSubset::Empty) | None => style::info(f, indent, "No common registers found"),
        }
    }

    fn write_relocation<K, V>(
        &self,
        f: &mut Formatter<'_>,
        c: &Comparison<K, V>,
        kind: TableKind,
        indent: &str,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        style::info(f, indent, "Reordered registers:")?;
        let width = style::column_width(kind);
        style::column_header(f, indent, width)?;

        // Matched runs are interleaved with the blocks in scan order.
        let mut runs = c.relocation.matched_runs.iter().peekable();
        for block in &c.relocation.blocks {
            while let Some(run) = runs.next_if(|r| r.left.end <= block.left.start) {
                write_matched_run(f, run, indent)?;
            }
            self.write_block(f, block, kind, indent, width)?;
        }
        for run in runs {
            write_matched_run(f, run, indent)?;
        }
        Ok(())
    }

    fn write_block<K, V>(
        &self,
        f: &mut Formatter<'_>,
        block: &RelocatedBlock<K, V>,
        kind: TableKind,
        indent: &str,
        width: usize,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        let max = self.options.max_block_rows;
        for (k, left, right) in zip_longest(&block.left_records, &block.right_records).take(max) {
            let left = left
                .map(|r| entry_cell(block.left.start + k, r, kind, 4))
                .unwrap_or_default();
            let right = right
                .map(|r| entry_cell(block.right.start + k, r, kind, 4))
                .unwrap_or_default();
            side_by_side(f, indent, width, &left, &right)?;
        }

        let more = |n: usize| {
            if n > max {
                format!("... ({} more)", n - max)
            } else {
                String::new()
            }
        };
        let (left_len, right_len) = (block.left_records.len(), block.right_records.len());
        if left_len > max || right_len > max {
            side_by_side(f, indent, width, &more(left_len), &more(right_len))?;
        }
        Ok(())
    }

    fn write_duplicates<K, V>(
        &self,
        f: &mut Formatter<'_>,
        result: &TableComparison<K, V>,
        kind: TableKind,
        indent: &str,
    ) -> fmt::Result
    where
        K: Copy + Into<u64>,
        V: Copy + Into<u64>,
    {
        if result.duplicates.is_empty() {
            return Ok(());
        }

        if !result.interference.is_empty() {
            style::warning(f, indent, "Duplicate registers involved in value differences:")?;
            for report in &result.interference {
                write!(
                    f,
                    "{indent}    Reg {}: duplicated {} times at indices:",
                    hex(report.reg, kind.reg_digits()),
                    report.entries.len()
                )?;
                for entry in &report.entries {
                    write!(f, " [{}]", entry.index)?;
                }
                writeln!(f)?;
                for entry in &report.entries {
                    writeln!(
                        f,
                        "{indent}        [{}] Left={}, Right={}",
                        entry.index,
                        hex(entry.left, kind.val_digits()),
                        hex(entry.right, kind.val_digits())
                    )?;
                }
            }
        }

        if !self.options.list_duplicates {
            return style::info(
                f,
                indent,
                format!(
                    "Duplicate registers found: {} (use --list-duplicates for details)",
                    result.duplicates.total()
                ),
            );
        }

        style::info(f, indent, "Duplicate registers:")?;
        let width = 37;
        style::column_header(f, indent, width)?;
        let cell = |reg: K, count: usize| format!("{} ({count} times)", hex(reg, kind.reg_digits()));
        for (_, left, right) in zip_longest(&result.duplicates.left, &result.duplicates.right) {
            let left = left.map(|g| cell(g.reg, g.count())).unwrap_or_default();
            let right = right.map(|g| cell(g.reg, g.count())).unwrap_or_default();
            side_by_side(f, indent, width, &left, &right)?;
        }
        Ok(())
    }

    fn write_totals(&self, f: &mut Formatter<'_>) -> fmt::Result {
        style::section_box(f, "Total Configuration Sizes")?;
        let (left, right) = (self.report.left_bytes, self.report.right_bytes);
        writeln!(f, "  Left:  {left} bytes ({})", kib(left))?;
        writeln!(f, "  Right: {right} bytes ({})", kib(right))?;
        let diff = self.report.size_difference();
        if diff != 0 {
            writeln!(f, "  Difference: {diff:+} bytes ({:+.2} kB)", diff as f64 / 1024.0)?;
        }
        writeln!(f)
    }
}

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        style::banner(f, "DDR Configuration Comparison Tool")?;
        writeln!(f)?;

        for section in &self.report.sections {
            self.write_section(f, section)?;
        }
        self.write_totals(f)?;

        writeln!(f, "{RULE}")?;
        style::info(f, "                      ", "COMPARISON COMPLETE")?;
        writeln!(f, "{RULE}")
    }
}

fn write_digest(f: &mut Formatter<'_>, d: &TableDigest, indent: &str) -> fmt::Result {
    writeln!(
        f,
        "{indent}Size:    Left={} bytes ({}), Right={} bytes ({})",
        d.left_bytes,
        kib(d.left_bytes),
        d.right_bytes,
        kib(d.right_bytes)
    )?;
    writeln!(f, "{indent}CRC:     Left=0x{:08x}, Right=0x{:08x}", d.left_crc, d.right_crc)
}

fn write_unique<K, V>(
    f: &mut Formatter<'_>,
    c: &Comparison<K, V>,
    kind: TableKind,
    indent: &str,
) -> fmt::Result
where
    K: Copy + Into<u64>,
    V: Copy + Into<u64>,
{
    style::info(f, indent, "Unique registers:")?;
    let width = style::column_width(kind);
    style::column_header(f, indent, width)?;
    for (_, left, right) in zip_longest(&c.left_only, &c.right_only) {
        let left = left
            .map(|e| entry_cell(e.index, &e.record, kind, 3))
            .unwrap_or_default();
        let right = right
            .map(|e| entry_cell(e.index, &e.record, kind, 3))
            .unwrap_or_default();
        side_by_side(f, indent, width, &left, &right)?;
    }
    Ok(())
}

fn write_value_diffs<K, V>(
    f: &mut Formatter<'_>,
    c: &Comparison<K, V>,
    kind: TableKind,
    indent: &str,
    index_width: usize,
) -> fmt::Result
where
    K: Copy + Into<u64>,
    V: Copy + Into<u64>,
{
    style::info(f, indent, "Register value differences:")?;
    for diff in &c.value_diffs {
        writeln!(
            f,
            "{indent}    [{:>iw$}] Reg {}: {} → {}",
            diff.left_index,
            hex(diff.reg, kind.reg_digits()),
            hex(diff.left, kind.val_digits()),
            hex(diff.right, kind.val_digits()),
            iw = index_width,
        )?;
    }
    Ok(())
}

fn write_matched_run(f: &mut Formatter<'_>, run: &MatchedRun, indent: &str) -> fmt::Result {
    let len = run.len();
    writeln!(
        f,
        "{indent}  [{:4}-{:4}] ({len} registers)           [{:4}-{:4}] ({len} registers)",
        run.left.start,
        run.left.end - 1,
        run.right.start,
        run.right.end - 1,
    )
}

fn write_summary(f: &mut Formatter<'_>, outcome: Outcome, indent: &str) -> fmt::Result {
    match outcome {
        Outcome::IdenticalOrder { diff_count: 0 } => {
            style::success(f, indent, "Registers and values match")
        }
        _ => Ok(()),
    }
}

fn entry_noun(section: &str) -> &'static str {
    match section {
        "fsp_msg" => "FSP Message",
        _ => "FSP",
    }
}

/// Last path component of a dotted table or field name.
fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddrconf_diff::{compare_timing, CompareError, Comparator};
    use ddrconf_types::{table_checksum, DdrcParam, DramTiming, FspConfig, FspMessage, PhyParam};

    fn render(left: &DramTiming, right: &DramTiming, options: &TextOptions) -> String {
        colored::control::set_override(false);
        let report = compare_timing(left, right, &Comparator::default());
        render_text(&report, options)
    }

    fn with_ddrc(pairs: &[(u32, u32)]) -> DramTiming {
        DramTiming {
            ddrc_cfg: pairs.iter().map(|&(r, v)| DdrcParam::new(r, v)).collect(),
            ..Default::default()
        }
    }

    fn with_phy(pairs: &[(u32, u16)]) -> DramTiming {
        DramTiming {
            ddrphy_cfg: pairs.iter().map(|&(r, v)| PhyParam::new(r, v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn identical_datasets_report_success() {
        let t = with_ddrc(&[(0x3d40_0000, 1), (0x3d40_0010, 2)]);
        let out = render(&t, &t, &TextOptions::default());
        assert!(out.contains("DDR Configuration Comparison Tool"));
        assert!(out.contains("│ Checking ddrc_cfg"));
        assert!(out.contains("│ Checking ddrphy_pie"));
        assert!(out.contains("Registers and values match"));
        assert!(out.contains("I: COMPARISON COMPLETE"));
        assert!(!out.contains("W:"));
        assert!(!out.contains("E:"));
        assert!(!out.contains("Difference:"));
    }

    #[test]
    fn value_difference_is_listed() {
        let out = render(
            &with_ddrc(&[(0x10, 1), (0x20, 2)]),
            &with_ddrc(&[(0x10, 1), (0x20, 3)]),
            &TextOptions::default(),
        );
        assert!(out.contains("I: Registers match, 1 value differences"));
        assert!(out.contains("    [  1] Reg 0x00000020: 0x00000002 → 0x00000003"));
    }

    #[test]
    fn length_mismatch_shows_unique_and_common() {
        let out = render(
            &with_phy(&[(0x100, 1), (0x200, 2)]),
            &with_phy(&[(0x100, 1), (0x200, 5), (0x300, 3)]),
            &TextOptions::default(),
        );
        assert!(out.contains("W: Structural differences found"));
        assert!(out.contains("I: Unique registers:"));
        assert!(out.contains("[  2] Reg 0x00300 = 0x0003"));
        assert!(out.contains("┌─ Comparing common registers"));
        assert!(out.contains("I: Registers match, 1 value differences"));
        assert!(out.contains("[  1] Reg 0x00200: 0x0002 → 0x0005"));
    }

    #[test]
    fn same_length_different_sets_is_an_error() {
        let out = render(
            &with_ddrc(&[(0x10, 1), (0x20, 2)]),
            &with_ddrc(&[(0x10, 1), (0x30, 2)]),
            &TextOptions::default(),
        );
        assert!(out.contains("E: Arrays have same length but different register sets!"));
        assert!(out.contains("I: Registers in LEFT but not in RIGHT:"));
        assert!(out.contains("[  1] Reg 0x00000020 = 0x00000002"));
        assert!(out.contains("[  1] Reg 0x00000030 = 0x00000002"));
    }

    #[test]
    fn long_relocated_block_is_elided() {
        let options = TextOptions {
            max_block_rows: 2,
            ..Default::default()
        };
        let out = render(
            &with_phy(&[(1, 0), (2, 0), (3, 0), (4, 0)]),
            &with_phy(&[(4, 0), (3, 0), (2, 0), (1, 0)]),
            &options,
        );
        assert!(out.contains("W: Registers match, different order"));
        assert!(out.contains("I: Reordered registers:"));
        assert!(out.contains("[   0] Reg 0x00001 = 0x0000"));
        assert!(out.contains("... (2 more)"));
        assert!(!out.contains("[   3] Reg"));
    }

    #[test]
    fn duplicate_summary_and_listing() {
        let t = with_ddrc(&[(0x10, 1), (0x10, 2), (0x20, 3)]);
        let out = render(&t, &t, &TextOptions::default());
        assert!(out.contains(
            "I: Duplicate registers found: 2 (use --list-duplicates for details)"
        ));

        let listed = render(
            &t,
            &t,
            &TextOptions {
                list_duplicates: true,
                ..Default::default()
            },
        );
        assert!(listed.contains("I: Duplicate registers:"));
        assert!(listed.contains("0x00000010 (2 times)"));
    }

    #[test]
    fn interference_is_reported() {
        let out = render(
            &with_ddrc(&[(0x1, 1), (0x2, 5), (0x1, 1)]),
            &with_ddrc(&[(0x1, 1), (0x2, 5), (0x1, 9)]),
            &TextOptions::default(),
        );
        assert!(out.contains("W: Duplicate registers involved in value differences:"));
        assert!(out.contains("Reg 0x00000001: duplicated 2 times at indices: [0] [2]"));
        assert!(out.contains("[2] Left=0x00000001, Right=0x00000009"));
    }

    #[test]
    fn fsp_count_mismatch_is_an_error() {
        let left = DramTiming {
            fsp_cfg: vec![
                FspConfig {
                    ddrc_cfg: vec![DdrcParam::new(0x10, 1)],
                    bypass: 0,
                },
                FspConfig::default(),
            ],
            ..Default::default()
        };
        let right = DramTiming {
            fsp_cfg: vec![FspConfig::default()],
            ..Default::default()
        };
        let out = render(&left, &right, &TextOptions::default());
        assert!(out.contains("  FSP Entries: Left=2, Right=1"));
        assert!(out.contains("E: Number of FSP entries do not match!"));
        assert!(out.contains("Difference: -8 bytes (-0.01 kB)"));
    }

    #[test]
    fn fsp_message_fields_and_boxes() {
        let msg = |drate| FspMessage {
            drate,
            fsp_phy_cfg: vec![PhyParam::new(0x54000, 1)],
            ..Default::default()
        };
        let left = DramTiming {
            fsp_msg: vec![msg(3200)],
            ..Default::default()
        };
        let right = DramTiming {
            fsp_msg: vec![msg(1600)],
            ..Default::default()
        };
        let out = render(&left, &right, &TextOptions::default());
        assert!(out.contains("  FSP Message Entries: Left=1, Right=1"));
        assert!(out.contains("  FSP Message 0:"));
        assert!(out.contains("    drate: 3200 → 1600"));
        assert!(out.contains("  ┌─── fsp_phy_cfg ─"));
        assert!(out.contains("  ┌─── fsp_phy_pie_cfg ─"));
    }

    #[test]
    fn common_box_carries_subset_size_and_crc() {
        let out = render(
            &with_phy(&[(0x100, 1), (0x200, 2)]),
            &with_phy(&[(0x100, 1), (0x200, 5), (0x300, 3)]),
            &TextOptions::default(),
        );
        let common_left = vec![PhyParam::new(0x100, 1), PhyParam::new(0x200, 2)];
        let common_right = vec![PhyParam::new(0x100, 1), PhyParam::new(0x200, 5)];

        let boxed = &out[out.find("┌─ Comparing common registers").unwrap()..];
        assert!(boxed.contains("\n    Entries: Left=2, Right=2\n    Size:    Left=12 bytes"));
        assert!(boxed.contains(&format!(
            "\n    CRC:     Left=0x{:08x}, Right=0x{:08x}\n",
            table_checksum(&common_left),
            table_checksum(&common_right)
        )));
    }

    #[test]
    fn failed_common_subset_is_an_error_in_the_box() {
        colored::control::set_override(false);
        let mut report = compare_timing(
            &with_ddrc(&[(0x10, 1), (0x20, 2)]),
            &with_ddrc(&[(0x10, 1), (0x20, 2), (0x30, 3)]),
            &Comparator::default(),
        );
        let TableReport::Ddrc(entry) = &mut report.sections[0].groups[0].tables[0] else {
            panic!("ddrc_cfg is a controller table");
        };
        entry.result.comparison.common =
            Some(CommonSubset::Failed(CompareError::ResourceExhausted { requested: 3 }));
        entry.common_digest = None;

        let out = render_text(&report, &TextOptions::default());
        let open = out.find("  ┌─ Comparing common registers").unwrap();
        let error = out.find("  E: memory allocation failed for 3 common registers").unwrap();
        let close = out[error..].find("  └─").map(|i| error + i).unwrap();
        assert!(open < error && error < close);
        assert!(!out.contains("No common registers found"));
        assert!(!out[open..close].contains("Entries:"));
    }
}
