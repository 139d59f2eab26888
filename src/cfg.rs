#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::message::Protocol;

/// Message catalogue to register
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum MessageSet {
    /// Messages most applications need
    #[default]
    Default,
    /// [MessageSet::Default] plus less common messages
    /// (RTCM3 MSM1..3 and 1033, RTCM2 type 14, UBX MON-VER, OEM VERSION,
    /// NMEA GST, ASTERIX CAT034), layered on top of the default set.
    Extended,
}

/// Framing options of one protocol
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FramingOpts {
    /// Largest frame we accept, in bytes (sync and checksum included).
    /// Larger declarations are reported as size errors.
    pub max_frame_len: usize,
}

impl FramingOpts {
    pub fn new(max_frame_len: usize) -> Self {
        Self { max_frame_len }
    }
}

fn default_rtcm3_opts() -> FramingOpts {
    // preamble + length, 1023 payload bytes, CRC
    FramingOpts::new(3 + 1023 + 3)
}

fn default_rtcm2_opts() -> FramingOpts {
    // 2 header words + 31 data words, 3 bytes each
    FramingOpts::new(6 + 31 * 3)
}

fn default_ubx_opts() -> FramingOpts {
    FramingOpts::new(8192)
}

fn default_oem_opts() -> FramingOpts {
    FramingOpts::new(8192)
}

fn default_nmea_opts() -> FramingOpts {
    FramingOpts::new(256)
}

fn default_asterix_opts() -> FramingOpts {
    FramingOpts::new(8192)
}

fn default_asterix_categories() -> Vec<u8> {
    vec![2]
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// [MessageSet] registered by every parser
    #[cfg_attr(feature = "serde", serde(default))]
    pub message_set: MessageSet,
    /// RTCM v3 framing
    #[cfg_attr(feature = "serde", serde(default = "default_rtcm3_opts"))]
    pub rtcm3: FramingOpts,
    /// RTCM v2 framing
    #[cfg_attr(feature = "serde", serde(default = "default_rtcm2_opts"))]
    pub rtcm2: FramingOpts,
    /// UBX framing
    #[cfg_attr(feature = "serde", serde(default = "default_ubx_opts"))]
    pub ubx: FramingOpts,
    /// OEM framing
    #[cfg_attr(feature = "serde", serde(default = "default_oem_opts"))]
    pub oem: FramingOpts,
    /// NMEA framing. The standard limits sentences to 82 characters,
    /// proprietary sentences are usually longer.
    #[cfg_attr(feature = "serde", serde(default = "default_nmea_opts"))]
    pub nmea: FramingOpts,
    /// ASTERIX framing
    #[cfg_attr(feature = "serde", serde(default = "default_asterix_opts"))]
    pub asterix: FramingOpts,
    /// ASTERIX categories we synchronize on. Data blocks of
    /// other categories are not recognized.
    #[cfg_attr(feature = "serde", serde(default = "default_asterix_categories"))]
    pub asterix_categories: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            message_set: MessageSet::default(),
            rtcm3: default_rtcm3_opts(),
            rtcm2: default_rtcm2_opts(),
            ubx: default_ubx_opts(),
            oem: default_oem_opts(),
            nmea: default_nmea_opts(),
            asterix: default_asterix_opts(),
            asterix_categories: default_asterix_categories(),
        }
    }
}

impl Config {
    /// [FramingOpts] of this [Protocol]
    pub fn framing(&self, protocol: Protocol) -> &FramingOpts {
        match protocol {
            Protocol::RtcmV3 => &self.rtcm3,
            Protocol::RtcmV2 => &self.rtcm2,
            Protocol::Ubx => &self.ubx,
            Protocol::Oem => &self.oem,
            Protocol::Nmea => &self.nmea,
            Protocol::Asterix => &self.asterix,
        }
    }

    /// Copies and returns [Config] with desired [MessageSet]
    pub fn with_message_set(&self, message_set: MessageSet) -> Self {
        let mut s = self.clone();
        s.message_set = message_set;
        s
    }

    /// Copies and returns [Config] with this maximal frame length
    /// for given [Protocol]
    pub fn with_max_frame_len(&self, protocol: Protocol, max_frame_len: usize) -> Self {
        let mut s = self.clone();
        let opts = match protocol {
            Protocol::RtcmV3 => &mut s.rtcm3,
            Protocol::RtcmV2 => &mut s.rtcm2,
            Protocol::Ubx => &mut s.ubx,
            Protocol::Oem => &mut s.oem,
            Protocol::Nmea => &mut s.nmea,
            Protocol::Asterix => &mut s.asterix,
        };
        opts.max_frame_len = max_frame_len;
        s
    }

    /// Copies and returns [Config] with these ASTERIX categories
    pub fn with_asterix_categories(&self, categories: &[u8]) -> Self {
        let mut s = self.clone();
        s.asterix_categories = categories.to_vec();
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builders() {
        let cfg = Config::default()
            .with_message_set(MessageSet::Extended)
            .with_max_frame_len(Protocol::Nmea, 82)
            .with_asterix_categories(&[1, 2]);
        assert_eq!(cfg.message_set, MessageSet::Extended);
        assert_eq!(cfg.framing(Protocol::Nmea).max_frame_len, 82);
        assert_eq!(cfg.framing(Protocol::RtcmV3).max_frame_len, 1029);
        assert_eq!(cfg.asterix_categories, vec![1, 2]);
    }
}
