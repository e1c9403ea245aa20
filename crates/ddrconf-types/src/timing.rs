//! The DRAM timing dataset: every register table a board needs to bring up
//! its DDR controller and PHY.

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::record::{DdrcParam, PackedRecord, PhyParam, PHY_ADDR_MAX};

/// Training firmware image selected for a frequency set-point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FwType {
    #[default]
    #[serde(rename = "1d")]
    OneD,
    #[serde(rename = "2d")]
    TwoD,
}

impl FwType {
    /// Numeric code used by the firmware headers.
    pub fn code(self) -> u32 {
        match self {
            Self::OneD => 0,
            Self::TwoD => 1,
        }
    }
}

/// Controller configuration for one frequency set-point (FSP).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FspConfig {
    #[serde(default)]
    pub ddrc_cfg: Vec<DdrcParam>,
    #[serde(default)]
    pub bypass: u32,
}

/// PHY training message for one frequency set-point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FspMessage {
    /// Data rate in MT/s.
    pub drate: u32,
    #[serde(default)]
    pub fw_type: FwType,
    /// Per-set-point PHY configuration.
    #[serde(default)]
    pub fsp_phy_cfg: Vec<PhyParam>,
    /// Message block header.
    #[serde(default)]
    pub fsp_phy_msgh_cfg: Vec<PhyParam>,
    /// Per-set-point PIE sequence.
    #[serde(default)]
    pub fsp_phy_pie_cfg: Vec<PhyParam>,
}

/// A complete DRAM timing dataset.
///
/// Every table is an ordered register list; the order is the programming
/// order the boot firmware follows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DramTiming {
    #[serde(default)]
    pub ddrc_cfg: Vec<DdrcParam>,
    #[serde(default)]
    pub fsp_cfg: Vec<FspConfig>,
    #[serde(default)]
    pub ddrphy_cfg: Vec<PhyParam>,
    #[serde(default)]
    pub fsp_msg: Vec<FspMessage>,
    #[serde(default)]
    pub ddrphy_trained_csr: Vec<PhyParam>,
    #[serde(default)]
    pub ddrphy_pie: Vec<PhyParam>,
}

impl DramTiming {
    /// Every PHY table with its display name, in dataset order.
    pub fn phy_tables(&self) -> Vec<(String, &[PhyParam])> {
        let mut tables = vec![("ddrphy_cfg".to_string(), self.ddrphy_cfg.as_slice())];
        for (i, msg) in self.fsp_msg.iter().enumerate() {
            tables.push((format!("fsp_msg[{i}].fsp_phy_cfg"), msg.fsp_phy_cfg.as_slice()));
            tables.push((format!("fsp_msg[{i}].fsp_phy_msgh_cfg"), msg.fsp_phy_msgh_cfg.as_slice()));
            tables.push((format!("fsp_msg[{i}].fsp_phy_pie_cfg"), msg.fsp_phy_pie_cfg.as_slice()));
        }
        tables.push(("ddrphy_trained_csr".to_string(), self.ddrphy_trained_csr.as_slice()));
        tables.push(("ddrphy_pie".to_string(), self.ddrphy_pie.as_slice()));
        tables
    }

    /// Every controller table with its display name, in dataset order.
    pub fn ddrc_tables(&self) -> Vec<(String, &[DdrcParam])> {
        let mut tables = vec![("ddrc_cfg".to_string(), self.ddrc_cfg.as_slice())];
        for (i, fsp) in self.fsp_cfg.iter().enumerate() {
            tables.push((format!("fsp_cfg[{i}].ddrc_cfg"), fsp.ddrc_cfg.as_slice()));
        }
        tables
    }

    /// Total packed size of all tables, in bytes.
    pub fn total_bytes(&self) -> usize {
        let ddrc: usize = self.ddrc_tables().iter().map(|(_, t)| t.len()).sum();
        let phy: usize = self.phy_tables().iter().map(|(_, t)| t.len()).sum();
        ddrc * DdrcParam::PACKED_SIZE + phy * PhyParam::PACKED_SIZE
    }

    /// Reject PHY records whose address does not fit in 20 bits.
    pub fn validate(&self) -> TypeResult<()> {
        for (name, table) in self.phy_tables() {
            if let Some((index, record)) =
                table.iter().enumerate().find(|(_, r)| r.reg > PHY_ADDR_MAX)
            {
                return Err(TypeError::AddressOutOfRange {
                    table: name,
                    index,
                    reg: record.reg,
                });
            }
        }
        Ok(())
    }
}
