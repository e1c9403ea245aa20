//! Foundation types for ddrconf.
//!
//! This crate describes the data being compared: register records, the tables
//! that hold them, and the DRAM timing dataset that groups the tables. It also
//! owns the two pieces of I/O-adjacent plumbing every other crate needs:
//! dataset loading and the integrity checksum.
//!
//! # Key Types
//!
//! - [`Record`] -- one `(reg, val)` programming step, generic over key and value
//! - [`DdrcParam`] / [`PhyParam`] -- controller (32/32-bit) and PHY (20/16-bit) records
//! - [`TableKind`] -- record width tag used for sizes and hex formatting
//! - [`DramTiming`] -- the full dataset: controller, FSP, PHY, PIE tables
//! - [`crc32`] / [`table_checksum`] -- checksum over the packed table layout

pub mod checksum;
pub mod error;
pub mod load;
pub mod record;
pub mod timing;

pub use checksum::{crc32, table_checksum};
pub use error::{TypeError, TypeResult};
pub use record::{pack_records, DdrcParam, PackedRecord, PhyParam, Record, TableKind, PHY_ADDR_MAX};
pub use timing::{DramTiming, FspConfig, FspMessage, FwType};
