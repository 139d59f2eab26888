//! MSM signal identifiers
use crate::{carrier::Carrier, prelude::Constellation};

/// Signal an MSM signal identifier stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsmSignal {
    /// [Carrier] signal is modulated on
    pub carrier: Carrier,
    /// RINEX observation code (band and attribute), like "1C"
    pub code: &'static str,
}

const GPS: [&str; 32] = [
    "", "1C", "1P", "1W", "", "", "", "2C",
    "2P", "2W", "", "", "", "", "2S", "2L",
    "2X", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "1S", "1L", "1X",
];

const GLONASS: [&str; 32] = [
    "", "1C", "1P", "", "", "", "", "2C",
    "2P", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "",
];

const GALILEO: [&str; 32] = [
    "", "1C", "1A", "1B", "1X", "1Z", "", "6C",
    "6A", "6B", "6X", "6Z", "", "7I", "7Q", "7X",
    "", "8I", "8Q", "8X", "", "5I", "5Q", "5X",
    "", "", "", "", "", "", "", "",
];

const SBAS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "",
    "", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "", "", "",
];

const QZSS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "",
    "6S", "6L", "6X", "", "", "", "2S", "2L",
    "2X", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "1S", "1L", "1X",
];

const BEIDOU: [&str; 32] = [
    "", "2I", "2Q", "2X", "", "", "", "6I",
    "6Q", "6X", "", "", "", "7I", "7Q", "7X",
    "", "", "", "", "", "5D", "5P", "5X",
    "7D", "", "", "", "", "1D", "1P", "1X",
];

const IRNSS: [&str; 32] = [
    "", "", "", "", "", "", "", "9A",
    "", "", "", "", "", "", "", "",
    "", "", "", "", "", "5A", "", "",
    "", "", "", "", "", "", "", "",
];

fn carrier(constellation: Constellation, band: char) -> Option<Carrier> {
    let carrier = match (constellation, band) {
        (Constellation::GPS | Constellation::QZSS | Constellation::SBAS, '1') => Carrier::L1,
        (Constellation::GPS | Constellation::QZSS, '2') => Carrier::L2,
        (Constellation::GPS | Constellation::QZSS | Constellation::SBAS, '5') => Carrier::L5,
        (Constellation::QZSS, '6') => Carrier::L6,
        (Constellation::Glonass, '1') => Carrier::G1,
        (Constellation::Glonass, '2') => Carrier::G2,
        (Constellation::Galileo, '1') => Carrier::E1,
        (Constellation::Galileo, '5') => Carrier::E5A,
        (Constellation::Galileo, '6') => Carrier::E6,
        (Constellation::Galileo, '7') => Carrier::E5B,
        (Constellation::Galileo, '8') => Carrier::E5,
        (Constellation::BeiDou, '1') => Carrier::B1aB1c,
        (Constellation::BeiDou, '2') => Carrier::B1I,
        (Constellation::BeiDou, '5') => Carrier::B2A,
        (Constellation::BeiDou, '6') => Carrier::B3,
        (Constellation::BeiDou, '7') => Carrier::B2iB2b,
        (Constellation::BeiDou, '8') => Carrier::B2,
        (Constellation::IRNSS, '5') => Carrier::L5,
        (Constellation::IRNSS, '9') => Carrier::S,
        _ => return None,
    };
    Some(carrier)
}

/// Returns the [MsmSignal] of this 1-based MSM signal identifier,
/// None for reserved identifiers.
pub fn msm_signal(constellation: Constellation, signal_id: u8) -> Option<MsmSignal> {
    let table = match constellation {
        Constellation::GPS => &GPS,
        Constellation::Glonass => &GLONASS,
        Constellation::Galileo => &GALILEO,
        Constellation::SBAS => &SBAS,
        Constellation::QZSS => &QZSS,
        Constellation::BeiDou => &BEIDOU,
        Constellation::IRNSS => &IRNSS,
        _ => return None,
    };

    let code = *table.get((signal_id as usize).checked_sub(1)?)?;
    let band = code.chars().next()?;

    Some(MsmSignal {
        carrier: carrier(constellation, band)?,
        code,
    })
}
