//! Integrity checksum over packed register tables.
//!
//! This is the nibble-table CRC32 used by the i.MX boot firmware to guard its
//! DDR tables. It is not the IEEE CRC-32 (the table differs), so a generic
//! CRC crate would not reproduce the firmware's values. The result is for
//! display only; nothing in the comparison depends on it.

use crate::record::{pack_records, PackedRecord};

const CRC_TABLE: [u32; 16] = [
    0x4DBD_F21C, 0x500A_E278, 0x76D3_D2D4, 0x6B64_C2B0,
    0x3B61_B38C, 0x26D6_A3E8, 0x000F_9344, 0x1DB8_8320,
    0xA005_713C, 0xBDB2_6158, 0x9B6B_51F4, 0x86DC_4190,
    0xD6D9_30AC, 0xCB6E_20C8, 0xEDB7_1064, 0xF000_0000,
];

/// Compute the firmware CRC32 of a byte buffer, one nibble at a time.
pub fn crc32(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |crc, &byte| {
        let byte = u32::from(byte);
        let crc = (crc >> 4) ^ CRC_TABLE[((crc ^ byte) & 0x0F) as usize];
        (crc >> 4) ^ CRC_TABLE[((crc ^ (byte >> 4)) & 0x0F) as usize]
    })
}

/// Checksum of a table in its packed layout.
pub fn table_checksum<R: PackedRecord>(records: &[R]) -> u32 {
    crc32(&pack_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DdrcParam, PhyParam};
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc32(&[]), 0);
        assert_eq!(table_checksum::<PhyParam>(&[]), 0);
    }

    #[test]
    fn single_zero_byte_walks_table_entry_zero_twice() {
        let first = (CRC_TABLE[0] >> 4) ^ CRC_TABLE[(CRC_TABLE[0] & 0x0F) as usize];
        assert_eq!(crc32(&[0]), first);
    }

    #[test]
    fn value_change_changes_checksum() {
        let a = [DdrcParam::new(0x10, 1), DdrcParam::new(0x20, 2)];
        let b = [DdrcParam::new(0x10, 1), DdrcParam::new(0x20, 3)];
        assert_ne!(table_checksum(&a), table_checksum(&b));
    }

    #[test]
    fn order_changes_checksum() {
        let a = [PhyParam::new(0x10, 1), PhyParam::new(0x20, 2)];
        let b = [PhyParam::new(0x20, 2), PhyParam::new(0x10, 1)];
        assert_ne!(table_checksum(&a), table_checksum(&b));
    }

    #[test]
    fn checksum_matches_manual_packing() {
        let table = [DdrcParam::new(0xdead_beef, 0x1234_5678)];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        assert_eq!(table_checksum(&table), crc32(&bytes));
    }

    proptest! {
        #[test]
        fn prop_phy_checksum_covers_six_bytes_per_record(
            pairs in prop::collection::vec((0u32..=0xF_FFFF, any::<u16>()), 0..64),
        ) {
            let table: Vec<PhyParam> = pairs.iter().map(|&(r, v)| PhyParam::new(r, v)).collect();
            let packed = pack_records(&table);
            prop_assert_eq!(packed.len(), table.len() * 6);
            prop_assert_eq!(table_checksum(&table), crc32(&packed));
        }
    }
}
