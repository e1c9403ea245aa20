//! Plain listing of one dataset: every table with its size, checksum and
//! records, in programming order.

use std::fmt::{self, Display, Formatter};

use ddrconf_types::{table_checksum, DramTiming, PackedRecord, Record};

use crate::style::{self, hex};

/// Display adapter for a dataset dump.
pub struct Dump<'a>(pub &'a DramTiming);

pub fn render_dump(timing: &DramTiming) -> String {
    Dump(timing).to_string()
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = self.0;
        style::banner(f, "DDR Configuration Dump Tool")?;

        write_table(f, "ddrc_cfg", &t.ddrc_cfg)?;
        for (i, fsp) in t.fsp_cfg.iter().enumerate() {
            write_table(f, &format!("fsp_cfg[{i}].ddrc_cfg"), &fsp.ddrc_cfg)?;
            writeln!(f)?;
            writeln!(f, "fsp_cfg[{i}].bypass={}", fsp.bypass)?;
        }

        write_table(f, "ddrphy_cfg", &t.ddrphy_cfg)?;
        for (i, msg) in t.fsp_msg.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "fsp_msg[{i}].drate={}", msg.drate)?;
            writeln!(f, "fsp_msg[{i}].fw_type={}", msg.fw_type.code())?;
            write_table(f, &format!("fsp_msg[{i}].fsp_phy_cfg"), &msg.fsp_phy_cfg)?;
            write_table(f, &format!("fsp_msg[{i}].fsp_phy_msgh_cfg"), &msg.fsp_phy_msgh_cfg)?;
            write_table(f, &format!("fsp_msg[{i}].fsp_phy_pie_cfg"), &msg.fsp_phy_pie_cfg)?;
        }

        write_table(f, "ddrphy_trained_csr", &t.ddrphy_trained_csr)?;
        write_table(f, "ddrphy_pie", &t.ddrphy_pie)?;

        writeln!(f)?;
        style::banner(f, "DUMP COMPLETE")?;
        writeln!(f)
    }
}

/// Empty tables are skipped entirely.
fn write_table<K, V>(f: &mut Formatter<'_>, name: &str, records: &[Record<K, V>]) -> fmt::Result
where
    Record<K, V>: PackedRecord,
    K: Copy + Into<u64>,
    V: Copy + Into<u64>,
{
    if records.is_empty() {
        return Ok(());
    }
    let kind = <Record<K, V> as PackedRecord>::KIND;

    writeln!(f)?;
    writeln!(f, "{name}")?;
    writeln!(
        f,
        "entries={}, size={} bytes",
        records.len(),
        records.len() * kind.record_size()
    )?;
    writeln!(f, "crc32=0x{:08x}", table_checksum(records))?;
    for (i, record) in records.iter().enumerate() {
        writeln!(
            f,
            "[{i:>4}]={{{}, {}}}",
            hex(record.reg, kind.reg_digits()),
            hex(record.val, kind.val_digits())
        )?;
    }
    Ok(())
}
