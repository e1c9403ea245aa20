//! Shared text styling: status prefixes, boxes, hex fields and columns.

use std::fmt::{self, Display, Formatter};

use colored::Colorize;

use ddrconf_types::{Record, TableKind};

pub(crate) const RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════";

const RULE_WIDTH: usize = 75;
const BOX_WIDTH: usize = 73;
const SUB_BOX_WIDTH: usize = 66;
const COMMON_BOX_WIDTH: usize = 58;

pub(crate) fn error(f: &mut Formatter<'_>, indent: &str, msg: impl Display) -> fmt::Result {
    writeln!(f, "{indent}{}", format!("E: {msg}").red().bold())
}

pub(crate) fn warning(f: &mut Formatter<'_>, indent: &str, msg: impl Display) -> fmt::Result {
    writeln!(f, "{indent}{}", format!("W: {msg}").yellow().bold())
}

pub(crate) fn info(f: &mut Formatter<'_>, indent: &str, msg: impl Display) -> fmt::Result {
    writeln!(f, "{indent}{}", format!("I: {msg}").yellow().bold())
}

pub(crate) fn success(f: &mut Formatter<'_>, indent: &str, msg: impl Display) -> fmt::Result {
    writeln!(f, "{indent}{}", msg.to_string().green().bold())
}

/// Double rule with a centered title.
pub(crate) fn banner(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{:^width$}", title, width = RULE_WIDTH)?;
    writeln!(f, "{RULE}")
}

pub(crate) fn section_box(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    let bar = "─".repeat(BOX_WIDTH);
    writeln!(f, "┌{bar}┐")?;
    writeln!(f, "│ {:<width$}│", title, width = BOX_WIDTH - 1)?;
    writeln!(f, "└{bar}┘")
}

pub(crate) fn sub_box_open(f: &mut Formatter<'_>, indent: &str, title: &str) -> fmt::Result {
    let fill = SUB_BOX_WIDTH.saturating_sub(title.chars().count() + 5);
    writeln!(f, "{indent}┌─── {title} {}┐", "─".repeat(fill))
}

pub(crate) fn sub_box_close(f: &mut Formatter<'_>, indent: &str) -> fmt::Result {
    writeln!(f, "{indent}└{}┘", "─".repeat(SUB_BOX_WIDTH))
}

pub(crate) fn common_box_open(f: &mut Formatter<'_>, indent: &str) -> fmt::Result {
    let title = "─ Comparing common registers ";
    let fill = COMMON_BOX_WIDTH.saturating_sub(title.chars().count());
    writeln!(f, "{indent}┌{title}{}┐", "─".repeat(fill))
}

pub(crate) fn common_box_close(f: &mut Formatter<'_>, indent: &str) -> fmt::Result {
    writeln!(f, "{indent}└{}┘", "─".repeat(COMMON_BOX_WIDTH))
}

/// Zero-padded hex with a fixed digit count.
pub(crate) fn hex(value: impl Into<u64>, digits: usize) -> String {
    format!("0x{:0width$x}", value.into(), width = digits)
}

pub(crate) fn kib(bytes: usize) -> String {
    format!("{:.2} kB", bytes as f64 / 1024.0)
}

/// `[idx] Reg <addr> = <value>` with the index right-aligned.
pub(crate) fn entry_cell<K, V>(
    index: usize,
    record: &Record<K, V>,
    kind: TableKind,
    index_width: usize,
) -> String
where
    K: Copy + Into<u64>,
    V: Copy + Into<u64>,
{
    format!(
        "[{:>iw$}] Reg {} = {}",
        index,
        hex(record.reg, kind.reg_digits()),
        hex(record.val, kind.val_digits()),
        iw = index_width,
    )
}

pub(crate) fn column_width(kind: TableKind) -> usize {
    match kind {
        TableKind::Ddrc => 40,
        TableKind::Phy => 37,
    }
}

pub(crate) fn column_header(f: &mut Formatter<'_>, indent: &str, width: usize) -> fmt::Result {
    writeln!(f, "{indent}  {:<width$}  RIGHT", "LEFT")?;
    let bar = "─".repeat(width);
    writeln!(f, "{indent}  {bar}  {bar}")
}

pub(crate) fn side_by_side(
    f: &mut Formatter<'_>,
    indent: &str,
    width: usize,
    left: &str,
    right: &str,
) -> fmt::Result {
    let line = format!("{indent}  {left:<width$}  {right}");
    writeln!(f, "{}", line.trim_end())
}

/// Cells of a zip that pads the shorter side with empty strings.
pub(crate) fn zip_longest<'a, T>(
    left: &'a [T],
    right: &'a [T],
) -> impl Iterator<Item = (usize, Option<&'a T>, Option<&'a T>)> + 'a {
    (0..left.len().max(right.len())).map(move |k| (k, left.get(k), right.get(k)))
}
