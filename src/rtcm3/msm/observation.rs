use hifitime::Duration;

use crate::{
    constants::{QZSS_PRN_OFFSET, RANGE_MS_M, SBAS_PRN_OFFSET, SPEED_OF_LIGHT_M_S},
    prelude::{Constellation, SV},
    rtcm3::msm::{msm_signal, Msm, MsmSignal},
};

/// 2^-10
const P2_10: f64 = 1.0 / 1024.0;

/// 2^-4
const P2_4: f64 = 1.0 / 16.0;

/// 10 bit lock time indicator: offset of each 32 values segment,
/// segment n (starting at 32(n+1)) has a 2^n ms resolution.
const LOCK_TIME_OFFSETS: [u64; 22] = [
    0, 64, 256, 768, 2048, 5120, 12288, 28672, 65536, 147456, 327680, 720896, 1572864,
    3407872, 7340032, 15728640, 33554432, 71303168, 150994944, 318767104, 671088640,
    1409286144,
];

/// Interprets a lock time indicator, 4 bit (MSM1..5) or 10 bit (MSM6/7) wide.
/// Returns None for reserved values.
pub fn lock_time(indicator: u16, extended: bool) -> Option<Duration> {
    let ms = if extended {
        match indicator {
            0..=63 => indicator as u64,
            64..=704 => {
                let n = (indicator as usize - 64) / 32 + 1;
                (1u64 << n) * indicator as u64 - LOCK_TIME_OFFSETS[n]
            },
            _ => return None,
        }
    } else {
        match indicator {
            0 => 0,
            1..=15 => 1u64 << (indicator + 4),
            _ => return None,
        }
    };
    Some(Duration::from_milliseconds(ms as f64))
}

/// Receiver independent satellite identity. QZSS and SBAS identifiers are
/// shifted to their PRN.
pub fn msm_sv(constellation: Constellation, satellite_id: u8) -> Option<SV> {
    let prn = match constellation {
        Constellation::QZSS => satellite_id.checked_add(QZSS_PRN_OFFSET)?,
        Constellation::SBAS => satellite_id.checked_add(SBAS_PRN_OFFSET)?,
        _ => satellite_id,
    };
    Some(SV::new(constellation, prn))
}

/// Reconstructed observations of one satellite
#[derive(Debug, Clone, PartialEq)]
pub struct MsmSatellite {
    /// MSM satellite id (1-based position in the satellite mask)
    pub satellite_id: u8,
    /// [SV], when the id maps to a valid PRN
    pub sv: Option<SV>,
    /// Glonass frequency channel number, when transmitted
    pub fcn: Option<i8>,
    /// Present signals only
    pub signals: Vec<MsmObservation>,
}

/// Reconstructed observation of one present cell.
/// Each measurement is None when not transmitted by this MSM type
/// or when flagged as invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct MsmObservation {
    /// MSM signal id (1-based position in the signal mask)
    pub signal_id: u8,
    /// Signal this id stands for, None for reserved ids
    pub signal: Option<MsmSignal>,
    /// Pseudo range (m)
    pub pseudorange_m: Option<f64>,
    /// Carrier phase (cycles)
    pub carrier_phase_cycles: Option<f64>,
    /// Phase range rate (m/s)
    pub phase_range_rate_m_s: Option<f64>,
    /// Carrier to noise ratio (dB-Hz)
    pub cnr_dbhz: Option<f64>,
    /// Lock time
    pub lock_time: Option<Duration>,
    /// Half cycle ambiguity flag
    pub half_cycle_ambiguity: Option<bool>,
}

impl Msm {
    /// Rough range of satellite `index` (m). A rough range of exactly
    /// 0.0 stands for "no data".
    fn rough_range_m(&self, index: usize) -> Option<f64> {
        let satellite = self.satellites.get(index)?;

        let mut rough = 0.0;
        if self.kind.has_rough_integer() {
            if satellite.rough_range_ms != 255 {
                rough = satellite.rough_range_ms as f64 * RANGE_MS_M;
            }
            if rough != 0.0 {
                rough += satellite.rough_range_mod as f64 * P2_10 * RANGE_MS_M;
            }
        } else {
            rough = satellite.rough_range_mod as f64 * P2_10 * RANGE_MS_M;
        }

        if rough == 0.0 {
            None
        } else {
            Some(rough)
        }
    }

    fn rough_rate_m_s(&self, index: usize) -> Option<f64> {
        if !self.kind.has_extended_data() {
            return None;
        }
        let satellite = self.satellites.get(index)?;
        if satellite.rough_rate == -8192 {
            None
        } else {
            Some(satellite.rough_rate as f64)
        }
    }

    fn fcn(&self, index: usize) -> Option<i8> {
        if self.constellation != Constellation::Glonass || !self.kind.has_extended_data() {
            return None;
        }
        let info = self.satellites.get(index)?.extended_info;
        if info > 13 {
            None
        } else {
            Some(info as i8 - 7)
        }
    }

    /// Reconstructs full precision observations, as a sparse per satellite array.
    /// Each satellite only carries the signals its cell mask row marks present.
    pub fn observations(&self) -> Vec<MsmSatellite> {
        let mask = &self.header.mask;
        let high_resolution = self.kind.high_resolution();

        let (pr_resolution, pr_sentinel) = if high_resolution {
            (2.0_f64.powi(-29), -(1 << 19))
        } else {
            (2.0_f64.powi(-24), -(1 << 14))
        };

        let (cp_resolution, cp_sentinel) = if high_resolution {
            (2.0_f64.powi(-31), -(1 << 23))
        } else {
            (2.0_f64.powi(-29), -(1 << 21))
        };

        let cnr_resolution = if high_resolution { P2_4 } else { 1.0 };

        let mut satellites = mask
            .satellites()
            .iter()
            .enumerate()
            .map(|(index, satellite_id)| MsmSatellite {
                satellite_id: *satellite_id,
                sv: msm_sv(self.constellation, *satellite_id),
                fcn: self.fcn(index),
                signals: Vec::new(),
            })
            .collect::<Vec<_>>();

        for ((sat, sig), cell) in mask.cells().zip(self.cells.iter()) {
            let signal_id = mask.signals()[sig];
            let signal = msm_signal(self.constellation, signal_id);
            let rough = self.rough_range_m(sat);
            let fcn = satellites[sat].fcn;

            let pseudorange_m = match rough {
                Some(rough)
                    if self.kind.has_pseudorange() && cell.fine_pseudorange != pr_sentinel =>
                {
                    Some(rough + cell.fine_pseudorange as f64 * pr_resolution * RANGE_MS_M)
                },
                _ => None,
            };

            let frequency = signal.and_then(|signal| {
                if signal.carrier.is_fdma() {
                    fcn.map(|fcn| signal.carrier.fdma_frequency(fcn))
                } else {
                    Some(signal.carrier.frequency())
                }
            });

            let carrier_phase_cycles = match (rough, frequency) {
                (Some(rough), Some(frequency))
                    if self.kind.has_phase() && cell.fine_phase != cp_sentinel =>
                {
                    let range = rough + cell.fine_phase as f64 * cp_resolution * RANGE_MS_M;
                    Some(range * frequency / SPEED_OF_LIGHT_M_S)
                },
                _ => None,
            };

            let phase_range_rate_m_s = match (rough, self.rough_rate_m_s(sat)) {
                (Some(_), Some(rate)) if cell.fine_rate != -16384 => {
                    Some(rate + cell.fine_rate as f64 * 0.0001)
                },
                _ => None,
            };

            let cnr_dbhz = if self.kind.has_cnr() && cell.cnr != 0 {
                Some(cell.cnr as f64 * cnr_resolution)
            } else {
                None
            };

            let (lock_time, half_cycle_ambiguity) = if self.kind.has_phase() {
                (
                    lock_time(cell.lock_time, high_resolution),
                    Some(cell.half_cycle),
                )
            } else {
                (None, None)
            };

            satellites[sat].signals.push(MsmObservation {
                signal_id,
                signal,
                pseudorange_m,
                carrier_phase_cycles,
                phase_range_rate_m_s,
                cnr_dbhz,
                lock_time,
                half_cycle_ambiguity,
            });
        }

        satellites
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::Unit;
    use rstest::*;

    #[rstest]
    #[case(0, false, Some(0))]
    #[case(1, false, Some(32))]
    #[case(15, false, Some(524_288))]
    #[case(16, false, None)]
    #[case(63, true, Some(63))]
    #[case(64, true, Some(64))]
    #[case(96, true, Some(128))]
    #[case(100, true, Some(144))]
    #[case(704, true, Some(67_108_864))]
    #[case(705, true, None)]
    fn lock_time_indicators(
        #[case] indicator: u16,
        #[case] extended: bool,
        #[case] expected_ms: Option<i64>,
    ) {
        assert_eq!(
            lock_time(indicator, extended),
            expected_ms.map(|ms| Unit::Millisecond * ms)
        );
    }

    #[test]
    fn prn_offsets() {
        assert_eq!(
            msm_sv(Constellation::QZSS, 1),
            Some(SV::new(Constellation::QZSS, 193))
        );
        assert_eq!(
            msm_sv(Constellation::SBAS, 1),
            Some(SV::new(Constellation::SBAS, 120))
        );
        assert_eq!(
            msm_sv(Constellation::GPS, 12),
            Some(SV::new(Constellation::GPS, 12))
        );
        assert_eq!(msm_sv(Constellation::QZSS, 64), None);
    }
}
