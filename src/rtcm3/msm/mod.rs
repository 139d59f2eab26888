//! Multiple Signal Messages (MSM1..7)
//!
//! MSM pack a variable satellite x signal observation matrix:
//! a [MsmHeader] carrying the [MsmMask], per satellite rough values,
//! then per cell fine values. Raw integers are kept as transmitted
//! so messages re-encode exactly; [Msm::observations] reconstructs
//! full precision measurements.
use crate::{
    codec::{BitReader, BitWriter},
    error::Error,
    message::{BitPayload, Body, MessageId},
    prelude::Constellation,
    registry::Registry,
};

mod header;
mod mask;
mod observation;
mod signal;

pub use header::{MsmEpoch, MsmHeader};
pub use mask::MsmMask;
pub use observation::{lock_time, msm_sv, MsmObservation, MsmSatellite};
pub use signal::{msm_signal, MsmSignal};

/// Constellations supported by MSM and their message number base
/// (MSMn number = base + n).
pub const CONSTELLATIONS: [(Constellation, u16); 7] = [
    (Constellation::GPS, 1070),
    (Constellation::Glonass, 1080),
    (Constellation::Galileo, 1090),
    (Constellation::SBAS, 1100),
    (Constellation::QZSS, 1110),
    (Constellation::BeiDou, 1120),
    (Constellation::IRNSS, 1130),
];

/// MSM type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MsmKind {
    /// Compact pseudo ranges
    Msm1,
    /// Compact phase ranges
    Msm2,
    /// Compact pseudo and phase ranges
    Msm3,
    /// Full pseudo and phase ranges, CNR
    #[default]
    Msm4,
    /// [MsmKind::Msm4] plus phase range rates and extended info
    Msm5,
    /// High resolution [MsmKind::Msm4]
    Msm6,
    /// High resolution [MsmKind::Msm5]
    Msm7,
}

impl MsmKind {
    pub const ALL: [Self; 7] = [
        Self::Msm1,
        Self::Msm2,
        Self::Msm3,
        Self::Msm4,
        Self::Msm5,
        Self::Msm6,
        Self::Msm7,
    ];

    /// 1..=7
    pub fn number(&self) -> u16 {
        match self {
            Self::Msm1 => 1,
            Self::Msm2 => 2,
            Self::Msm3 => 3,
            Self::Msm4 => 4,
            Self::Msm5 => 5,
            Self::Msm6 => 6,
            Self::Msm7 => 7,
        }
    }

    pub fn from_number(number: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.number() == number)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Msm1 => "MSM1",
            Self::Msm2 => "MSM2",
            Self::Msm3 => "MSM3",
            Self::Msm4 => "MSM4",
            Self::Msm5 => "MSM5",
            Self::Msm6 => "MSM6",
            Self::Msm7 => "MSM7",
        }
    }

    /// Rough range integer milliseconds are transmitted
    pub fn has_rough_integer(&self) -> bool {
        *self >= Self::Msm4
    }

    /// Extended satellite info and phase range rates are transmitted
    pub fn has_extended_data(&self) -> bool {
        matches!(self, Self::Msm5 | Self::Msm7)
    }

    pub fn has_pseudorange(&self) -> bool {
        *self != Self::Msm2
    }

    /// Phase range, lock time and half cycle ambiguity are transmitted
    pub fn has_phase(&self) -> bool {
        *self != Self::Msm1
    }

    pub fn has_cnr(&self) -> bool {
        *self >= Self::Msm4
    }

    /// MSM6 and MSM7 high resolution fields
    pub fn high_resolution(&self) -> bool {
        matches!(self, Self::Msm6 | Self::Msm7)
    }

    fn pseudorange_width(&self) -> usize {
        if self.high_resolution() {
            20
        } else {
            15
        }
    }

    fn phase_width(&self) -> usize {
        if self.high_resolution() {
            24
        } else {
            22
        }
    }

    fn lock_time_width(&self) -> usize {
        if self.high_resolution() {
            10
        } else {
            4
        }
    }

    fn cnr_width(&self) -> usize {
        if self.high_resolution() {
            10
        } else {
            6
        }
    }
}

/// Raw satellite data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MsmSatelliteData {
    /// Rough range integer milliseconds, 255 = invalid (MSM4..7)
    pub rough_range_ms: u8,
    /// Extended info (MSM5/7). Glonass: frequency channel number + 7
    pub extended_info: u8,
    /// Rough range modulo 1 ms, 2^-10 ms resolution
    pub rough_range_mod: u16,
    /// Rough phase range rate (m/s), -8192 = invalid (MSM5/7)
    pub rough_rate: i16,
}

impl Default for MsmSatelliteData {
    fn default() -> Self {
        Self {
            rough_range_ms: 255,
            extended_info: 0,
            rough_range_mod: 0,
            rough_rate: -8192,
        }
    }
}

/// Raw cell data. The most negative value of fine fields stands for "invalid".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MsmCellData {
    /// Fine pseudo range, 2^-24 ms (15 bits) or 2^-29 ms (20 bits)
    pub fine_pseudorange: i32,
    /// Fine phase range, 2^-29 ms (22 bits) or 2^-31 ms (24 bits)
    pub fine_phase: i32,
    /// Lock time indicator (4 or 10 bits)
    pub lock_time: u16,
    pub half_cycle: bool,
    /// CNR, 1 dB-Hz (6 bits) or 2^-4 dB-Hz (10 bits), 0 = not available
    pub cnr: u16,
    /// Fine phase range rate, 0.0001 m/s (MSM5/7)
    pub fine_rate: i16,
}

/// MSM1..7 message, of any constellation
#[derive(Debug, Clone, PartialEq)]
pub struct Msm {
    pub constellation: Constellation,
    pub kind: MsmKind,
    pub header: MsmHeader,
    /// One entry per satellite of the mask
    pub satellites: Vec<MsmSatelliteData>,
    /// One entry per present cell, in transmission order
    pub cells: Vec<MsmCellData>,
}

impl Msm {
    pub fn new(constellation: Constellation, kind: MsmKind) -> Self {
        Self {
            constellation,
            kind,
            header: MsmHeader::default(),
            satellites: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// RTCM message number
    pub fn number(&self) -> u16 {
        CONSTELLATIONS
            .iter()
            .find(|(constellation, _)| *constellation == self.constellation)
            .map(|(_, base)| base + self.kind.number())
            .unwrap_or_default()
    }

    /// Returns the constellation and [MsmKind] of an MSM message number
    pub fn from_number(number: u16) -> Option<Self> {
        let (constellation, base) = CONSTELLATIONS
            .iter()
            .find(|(_, base)| number > *base && number <= base + 7)?;
        let kind = MsmKind::from_number(number - base)?;
        Some(Self::new(*constellation, kind))
    }

    /// Interpreted [MsmEpoch]
    pub fn epoch(&self) -> MsmEpoch {
        self.header.epoch(self.constellation)
    }
}

impl Body for Msm {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(self.number() as u32)
    }
}

impl BitPayload for Msm {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        let number = reader.read_u16(12)?;
        if number != self.number() {
            return Err(Error::InvalidField("message number"));
        }

        self.header = MsmHeader::decode(reader)?;

        let nsat = self.header.mask.satellites().len();
        let ncell = self.header.mask.cell_count();
        let kind = self.kind;

        self.satellites = vec![MsmSatelliteData::default(); nsat];
        self.cells = vec![MsmCellData::default(); ncell];

        if kind.has_rough_integer() {
            for sat in self.satellites.iter_mut() {
                sat.rough_range_ms = reader.read_u8(8)?;
            }
        }
        if kind.has_extended_data() {
            for sat in self.satellites.iter_mut() {
                sat.extended_info = reader.read_u8(4)?;
            }
        }
        for sat in self.satellites.iter_mut() {
            sat.rough_range_mod = reader.read_u16(10)?;
        }
        if kind.has_extended_data() {
            for sat in self.satellites.iter_mut() {
                sat.rough_rate = reader.read_i32(14)? as i16;
            }
        }

        if kind.has_pseudorange() {
            for cell in self.cells.iter_mut() {
                cell.fine_pseudorange = reader.read_i32(kind.pseudorange_width())?;
            }
        }
        if kind.has_phase() {
            for cell in self.cells.iter_mut() {
                cell.fine_phase = reader.read_i32(kind.phase_width())?;
            }
            for cell in self.cells.iter_mut() {
                cell.lock_time = reader.read_u16(kind.lock_time_width())?;
            }
            for cell in self.cells.iter_mut() {
                cell.half_cycle = reader.read_bool()?;
            }
        }
        if kind.has_cnr() {
            for cell in self.cells.iter_mut() {
                cell.cnr = reader.read_u16(kind.cnr_width())?;
            }
        }
        if kind.has_extended_data() {
            for cell in self.cells.iter_mut() {
                cell.fine_rate = reader.read_i32(15)? as i16;
            }
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        if self.satellites.len() != self.header.mask.satellites().len() {
            return Err(Error::InvalidField("satellite data count"));
        }
        if self.cells.len() != self.header.mask.cell_count() {
            return Err(Error::InvalidField("cell data count"));
        }

        let kind = self.kind;

        writer.write_u32(12, self.number() as u32)?;
        self.header.encode(writer)?;

        if kind.has_rough_integer() {
            for sat in self.satellites.iter() {
                writer.write_u32(8, sat.rough_range_ms as u32)?;
            }
        }
        if kind.has_extended_data() {
            for sat in self.satellites.iter() {
                writer.write_u32(4, sat.extended_info as u32)?;
            }
        }
        for sat in self.satellites.iter() {
            writer.write_u32(10, sat.rough_range_mod as u32)?;
        }
        if kind.has_extended_data() {
            for sat in self.satellites.iter() {
                writer.write_i32(14, sat.rough_rate as i32)?;
            }
        }

        if kind.has_pseudorange() {
            for cell in self.cells.iter() {
                writer.write_i32(kind.pseudorange_width(), cell.fine_pseudorange)?;
            }
        }
        if kind.has_phase() {
            for cell in self.cells.iter() {
                writer.write_i32(kind.phase_width(), cell.fine_phase)?;
            }
            for cell in self.cells.iter() {
                writer.write_u32(kind.lock_time_width(), cell.lock_time as u32)?;
            }
            for cell in self.cells.iter() {
                writer.write_bool(cell.half_cycle)?;
            }
        }
        if kind.has_cnr() {
            for cell in self.cells.iter() {
                writer.write_u32(kind.cnr_width(), cell.cnr as u32)?;
            }
        }
        if kind.has_extended_data() {
            for cell in self.cells.iter() {
                writer.write_i32(15, cell.fine_rate as i32)?;
            }
        }
        Ok(())
    }
}

/// Registers these [MsmKind]s, for every constellation
pub(crate) fn register(registry: &mut Registry<u32, dyn BitPayload>, kinds: &[MsmKind]) {
    for (constellation, base) in CONSTELLATIONS {
        for kind in kinds.iter().copied() {
            registry.register((base + kind.number()) as u32, move || {
                Box::new(Msm::new(constellation, kind))
            });
        }
    }
}
