use itertools::iproduct;

use crate::{
    codec::{BitReader, BitWriter},
    constants::MSM_MAX_CELLS,
    error::Error,
};

/// Satellite and signal masks, and the cell mask over their cross product.
/// Identifiers are 1-based and ascending, the cell mask is satellite major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsmMask {
    satellites: Vec<u8>,
    signals: Vec<u8>,
    cells: Vec<bool>,
}

fn ascending_ids(ids: &[u8], max: u8) -> bool {
    ids.iter().all(|id| (1..=max).contains(id)) && ids.windows(2).all(|w| w[0] < w[1])
}

/// 1-based positions of set bits, MSB first
fn mask_ids(mask: u64, width: usize) -> Vec<u8> {
    (0..width)
        .filter(|i| (mask >> (width - 1 - i)) & 0x01 != 0)
        .map(|i| i as u8 + 1)
        .collect()
}

fn ids_mask(ids: &[u8], width: usize) -> u64 {
    ids.iter()
        .fold(0, |mask, id| mask | (1u64 << (width - *id as usize)))
}

impl MsmMask {
    /// Builds a new [MsmMask].
    /// - satellites: ascending satellite ids (1..=64)
    /// - signals: ascending signal ids (1..=32)
    /// - cells: presence flag of each (satellite, signal) pair, satellite major.
    pub fn new(satellites: Vec<u8>, signals: Vec<u8>, cells: Vec<bool>) -> Result<Self, Error> {
        if !ascending_ids(&satellites, 64) {
            return Err(Error::InvalidField("satellite mask"));
        }
        if !ascending_ids(&signals, 32) {
            return Err(Error::InvalidField("signal mask"));
        }
        if satellites.len() * signals.len() > MSM_MAX_CELLS {
            return Err(Error::CellMaskOverflow {
                satellites: satellites.len(),
                signals: signals.len(),
            });
        }
        if cells.len() != satellites.len() * signals.len() {
            return Err(Error::InvalidField("cell mask size"));
        }
        Ok(Self {
            satellites,
            signals,
            cells,
        })
    }

    /// Builds a [MsmMask] where every signal of every satellite is present.
    pub fn full(satellites: Vec<u8>, signals: Vec<u8>) -> Result<Self, Error> {
        let cells = vec![true; satellites.len() * signals.len()];
        Self::new(satellites, signals, cells)
    }

    /// Satellite ids
    pub fn satellites(&self) -> &[u8] {
        &self.satellites
    }

    /// Signal ids
    pub fn signals(&self) -> &[u8] {
        &self.signals
    }

    pub fn is_present(&self, satellite: usize, signal: usize) -> bool {
        satellite < self.satellites.len()
            && signal < self.signals.len()
            && self.cells[satellite * self.signals.len() + signal]
    }

    /// Number of cells carrying data
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|present| **present).count()
    }

    /// (satellite index, signal index) of every present cell, in transmission order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        iproduct!(0..self.satellites.len(), 0..self.signals.len())
            .filter(|(sat, sig)| self.cells[sat * self.signals.len() + sig])
    }

    pub(crate) fn decode(reader: &mut BitReader<'_>) -> Result<Self, Error> {
        let satellites = mask_ids(reader.read_u64(64)?, 64);
        let signals = mask_ids(reader.read_u32(32)? as u64, 32);

        if satellites.len() * signals.len() > MSM_MAX_CELLS {
            return Err(Error::CellMaskOverflow {
                satellites: satellites.len(),
                signals: signals.len(),
            });
        }

        let cells = (0..satellites.len() * signals.len())
            .map(|_| reader.read_bool())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            satellites,
            signals,
            cells,
        })
    }

    pub(crate) fn encode(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write_u64(64, ids_mask(&self.satellites, 64))?;
        writer.write_u32(32, ids_mask(&self.signals, 32) as u32)?;
        for present in self.cells.iter() {
            writer.write_bool(*present)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_positions() {
        assert_eq!(mask_ids(0x8000_0000_0000_0001, 64), vec![1, 64]);
        assert_eq!(mask_ids(0x4000_0100, 32), vec![2, 24]);
        assert_eq!(ids_mask(&[1, 64], 64), 0x8000_0000_0000_0001);
        assert_eq!(ids_mask(&[2, 24], 32), 0x4000_0100);
    }

    #[test]
    fn cell_iteration() {
        let mask = MsmMask::new(
            vec![3, 7],
            vec![2, 15, 22],
            vec![true, false, true, false, true, false],
        )
        .unwrap();
        assert_eq!(mask.cell_count(), 3);
        assert_eq!(mask.cells().collect::<Vec<_>>(), vec![(0, 0), (0, 2), (1, 1)]);
        assert!(mask.is_present(1, 1));
        assert!(!mask.is_present(1, 2));
        assert!(!mask.is_present(2, 0));
    }

    #[test]
    fn invalid_masks() {
        assert_eq!(
            MsmMask::full((1..=9).collect(), (1..=8).collect()),
            Err(Error::CellMaskOverflow {
                satellites: 9,
                signals: 8
            })
        );
        assert_eq!(
            MsmMask::full(vec![4, 2], vec![1]),
            Err(Error::InvalidField("satellite mask"))
        );
        assert_eq!(
            MsmMask::full(vec![1], vec![33]),
            Err(Error::InvalidField("signal mask"))
        );
        assert_eq!(
            MsmMask::new(vec![1], vec![1, 2], vec![true]),
            Err(Error::InvalidField("cell mask size"))
        );
    }
}
