use crate::constants::SPEED_OF_LIGHT_M_S;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS/QZSS/SBAS) same frequency as E1 and B1aB1c
    #[default]
    L1,
    /// L2 (GPS/QZSS)
    L2,
    /// L5 (GPS/QZSS/SBAS/NavIC) same frequency as E5A and B2A
    L5,
    /// L6 (GPS/QZSS) same frequency as E6
    L6,
    /// G1 (Glonass) FDMA
    G1,
    /// G2 (Glonass) FDMA
    G2,
    /// E1 (Galileo)
    E1,
    /// E5 (Galileo) same frequency as B2
    E5,
    /// E5A (Galileo) same frequency as L5
    E5A,
    /// E5B (Galileo) same frequency as B2iB2b
    E5B,
    /// E6 (Galileo) same frequency as L6
    E6,
    /// B1aB1c (BDS) same frequency as L1
    B1aB1c,
    /// B1I (BDS)
    B1I,
    /// B2I/B2B (BDS) same frequency as E5b
    B2iB2b,
    /// B2 (BDS) same frequency as E5
    B2,
    /// B2A (BDS) same frequency as L5 and E5A
    B2A,
    /// B3 (BDS)
    B3,
    /// S band (NavIC)
    S,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::L6 => write!(f, "L6"),
            Self::G1 => write!(f, "G1"),
            Self::G2 => write!(f, "G2"),
            Self::E1 => write!(f, "E1"),
            Self::E5 => write!(f, "E5"),
            Self::E5A => write!(f, "E5A"),
            Self::E5B => write!(f, "E5B"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B1aB1c => write!(f, "B1A/B1C"),
            Self::B2iB2b => write!(f, "B2I/B2B"),
            Self::B2 => write!(f, "B2"),
            Self::B3 => write!(f, "B3"),
            Self::B2A => write!(f, "B2A"),
            Self::S => write!(f, "S"),
        }
    }
}

impl Carrier {
    /// Carrier frequency in Hz. For FDMA carriers, this is the
    /// frequency of channel 0: use [Self::fdma_frequency].
    pub fn frequency(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 | Self::B1aB1c => 1575.42E6_f64,
            Self::L2 => 1227.60E6_f64,
            Self::L5 | Self::E5A | Self::B2A => 1176.45E6_f64,
            Self::E5 | Self::B2 => 1191.795E6_f64,
            Self::L6 | Self::E6 => 1278.750E6_f64,
            Self::B3 => 1268.52E6_f64,
            Self::E5B | Self::B2iB2b => 1207.14E6_f64,
            Self::B1I => 1561.098E6_f64,
            Self::G1 => 1602.0E6_f64,
            Self::G2 => 1246.0E6_f64,
            Self::S => 2492.028E6_f64,
        }
    }

    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }

    /// True for Glonass frequency division carriers
    pub fn is_fdma(&self) -> bool {
        matches!(self, Self::G1 | Self::G2)
    }

    /// Carrier frequency (Hz) of given FDMA frequency channel number (-7..=6).
    /// Identical to [Self::frequency] for CDMA carriers.
    pub fn fdma_frequency(&self, fcn: i8) -> f64 {
        match self {
            Self::G1 => self.frequency() + fcn as f64 * 562.5E3_f64,
            Self::G2 => self.frequency() + fcn as f64 * 437.5E3_f64,
            _ => self.frequency(),
        }
    }
}
