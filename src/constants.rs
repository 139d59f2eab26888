/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Distance light travels in one millisecond (m)
pub const RANGE_MS_M: f64 = SPEED_OF_LIGHT_M_S * 1.0E-3;

/// BeiDou time is 14 s behind GPS time
pub const BDT_GPST_OFFSET_S: i64 = 14;

/// QZSS PRN = MSM satellite id + 192
pub const QZSS_PRN_OFFSET: u8 = 192;

/// SBAS PRN = MSM satellite id + 119
pub const SBAS_PRN_OFFSET: u8 = 119;

/// Maximal number of MSM cells (cell mask size)
pub const MSM_MAX_CELLS: usize = 64;
