//! Register records and their packed layout.

use serde::{Deserialize, Serialize};

/// Largest register address a PHY table may carry (20 bits).
pub const PHY_ADDR_MAX: u32 = 0x000F_FFFF;

/// One register programming step: write `val` to `reg`.
///
/// Records are ordered by programming order inside a table; the same `reg`
/// may legitimately appear more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record<K, V> {
    /// The register address.
    pub reg: K,
    /// The value written to the register.
    pub val: V,
}

impl<K, V> Record<K, V> {
    pub const fn new(reg: K, val: V) -> Self {
        Self { reg, val }
    }
}

/// DDR controller register: 32-bit address, 32-bit value.
pub type DdrcParam = Record<u32, u32>;

/// DDR PHY register: 20-bit address (stored in a `u32`), 16-bit value.
pub type PhyParam = Record<u32, u16>;

/// The width class of a register table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Controller table of [`DdrcParam`].
    Ddrc,
    /// PHY table of [`PhyParam`].
    Phy,
}

impl TableKind {
    /// Hex digits used to print an address of this kind.
    pub fn reg_digits(self) -> usize {
        match self {
            Self::Ddrc => 8,
            Self::Phy => 5,
        }
    }

    /// Hex digits used to print a value of this kind.
    pub fn val_digits(self) -> usize {
        match self {
            Self::Ddrc => 8,
            Self::Phy => 4,
        }
    }

    /// Size in bytes of one packed record.
    pub fn record_size(self) -> usize {
        match self {
            Self::Ddrc => DdrcParam::PACKED_SIZE,
            Self::Phy => PhyParam::PACKED_SIZE,
        }
    }
}

/// A record with a fixed packed little-endian encoding.
///
/// The packed layout is the one the firmware tables use in memory, so sizes
/// and checksums computed from it match what the boot loader sees.
pub trait PackedRecord {
    const PACKED_SIZE: usize;
    const KIND: TableKind;

    fn write_packed(&self, out: &mut Vec<u8>);
}

impl PackedRecord for DdrcParam {
    const PACKED_SIZE: usize = 8;
    const KIND: TableKind = TableKind::Ddrc;

    fn write_packed(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.reg.to_le_bytes());
        out.extend_from_slice(&self.val.to_le_bytes());
    }
}

impl PackedRecord for PhyParam {
    const PACKED_SIZE: usize = 6;
    const KIND: TableKind = TableKind::Phy;

    fn write_packed(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.reg.to_le_bytes());
        out.extend_from_slice(&self.val.to_le_bytes());
    }
}

/// Serialize a table into its packed byte layout.
pub fn pack_records<R: PackedRecord>(records: &[R]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * R::PACKED_SIZE);
    for record in records {
        record.write_packed(&mut out);
    }
    out
}
