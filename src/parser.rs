//! Push driven stream parser
use log::{debug, error, warn};

use crate::{
    cfg::{Config, MessageSet},
    decoder::{BitDecoder, ByteDecoder, Decoder, SentenceDecoder},
    error::{ErrorEvent, ErrorKind},
    events::{Events, HandlerError, Subscription},
    framing::{Framer, NmeaFramer, Rtcm2Framer, TableFramer},
    message::{Message, Protocol},
};

/// [Parser] ties one [Framer] to one [Decoder] and delivers
/// the outcome of every completed frame on its event channels.
/// Everything happens synchronously within [Parser::push].
///
/// ```
/// use gnss_stream::prelude::*;
///
/// let mut parser = Parser::nmea(&Config::default());
/// parser.on_message(|msg| {
///     assert_eq!(msg.name(), "GBS");
///     Ok(())
/// });
///
/// let sentence = b"$GPGBS,015509.00,-0.031,-0.186,0.219,19,0.000,-0.354,6.972*4D\r\n";
/// assert_eq!(parser.push_slice(sentence), 1);
/// ```
#[derive(Debug)]
pub struct Parser<F: Framer, D: Decoder> {
    framer: F,
    decoder: D,
    events: Events,
}

/// Protocol agnostic [Parser]
pub type DynParser = Parser<Box<dyn Framer + Send>, Box<dyn Decoder + Send>>;

impl<F: Framer, D: Decoder> Parser<F, D> {
    /// Builds a new [Parser]. Both [Framer] and [Decoder]
    /// should support the same [Protocol].
    pub fn new(framer: F, decoder: D) -> Self {
        Self {
            framer,
            decoder,
            events: Events::default(),
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.framer.protocol()
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Mutable access to the [Decoder], for example to register custom messages.
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Consumes one byte. Returns true when this byte completed
    /// a frame that was decoded and published as a [Message].
    pub fn push(&mut self, byte: u8) -> bool {
        let protocol = self.framer.protocol();

        let Some(result) = self.framer.push(byte) else {
            return false;
        };

        let event = match result {
            Ok(frame) => {
                self.events.publish_raw_frame(frame.protocol, frame.bytes());
                match self.decoder.decode(&frame) {
                    Ok(message) => {
                        self.events.publish_message(&message);
                        return true;
                    },
                    Err(event) => event,
                }
            },
            Err(error) => ErrorEvent::new(protocol, error),
        };

        match event.kind {
            ErrorKind::UnknownMessage => debug!("{}", event),
            ErrorKind::Decode | ErrorKind::TrailingData => error!("{}", event),
            _ => warn!("{}", event),
        }

        self.events.publish_error(&event);
        false
    }

    /// Consumes all bytes, returns the number of published [Message]s.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|byte| self.push(**byte)).count()
    }

    /// Drops any partially received frame.
    pub fn reset(&mut self) {
        self.framer.reset();
    }

    /// Subscribes to decoded [Message]s. Returning an error from the handler
    /// publishes a [crate::prelude::ErrorKind::Publication] error event.
    pub fn on_message<H>(&mut self, handler: H) -> Subscription
    where
        H: FnMut(&Message) -> Result<(), HandlerError> + Send + 'static,
    {
        self.events.on_message(handler)
    }

    /// Subscribes to validated raw frames, before decoding.
    pub fn on_raw_frame<H>(&mut self, handler: H) -> Subscription
    where
        H: FnMut(Protocol, &[u8]) + Send + 'static,
    {
        self.events.on_raw_frame(handler)
    }

    /// Subscribes to [ErrorEvent]s.
    pub fn on_error<H>(&mut self, handler: H) -> Subscription
    where
        H: FnMut(&ErrorEvent) + Send + 'static,
    {
        self.events.on_error(handler)
    }

    /// Cancels a [Subscription]. Returns false if it was not active.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }
}

impl Parser<TableFramer, BitDecoder> {
    /// RTCM v3 [Parser]
    pub fn rtcm3(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::rtcm3::default_set(),
            MessageSet::Extended => crate::rtcm3::extended_set(),
        };
        Self::new(
            TableFramer::new(crate::rtcm3::layout(), cfg.rtcm3.max_frame_len),
            BitDecoder::new(Protocol::RtcmV3, registry),
        )
    }
}

impl Parser<Rtcm2Framer, BitDecoder> {
    /// RTCM v2 [Parser]
    pub fn rtcm2(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::rtcm2::default_set(),
            MessageSet::Extended => crate::rtcm2::extended_set(),
        };
        Self::new(
            Rtcm2Framer::new(cfg.rtcm2.max_frame_len),
            BitDecoder::new(Protocol::RtcmV2, registry),
        )
    }
}

impl Parser<TableFramer, ByteDecoder> {
    /// UBX [Parser]
    pub fn ubx(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::ubx::default_set(),
            MessageSet::Extended => crate::ubx::extended_set(),
        };
        Self::new(
            TableFramer::new(crate::ubx::layout(), cfg.ubx.max_frame_len),
            ByteDecoder::new(Protocol::Ubx, registry),
        )
    }

    /// OEM binary [Parser]
    pub fn oem(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::oem::default_set(),
            MessageSet::Extended => crate::oem::extended_set(),
        };
        Self::new(
            TableFramer::new(crate::oem::layout(), cfg.oem.max_frame_len),
            ByteDecoder::new(Protocol::Oem, registry),
        )
    }

    /// ASTERIX [Parser], synchronized on [Config::asterix_categories]
    pub fn asterix(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::asterix::default_set(),
            MessageSet::Extended => crate::asterix::extended_set(),
        };
        Self::new(
            TableFramer::new(
                crate::asterix::layout(&cfg.asterix_categories),
                cfg.asterix.max_frame_len,
            ),
            ByteDecoder::new(Protocol::Asterix, registry),
        )
    }
}

impl Parser<NmeaFramer, SentenceDecoder> {
    /// NMEA-0183 [Parser]
    pub fn nmea(cfg: &Config) -> Self {
        let registry = match cfg.message_set {
            MessageSet::Default => crate::nmea::default_set(),
            MessageSet::Extended => crate::nmea::extended_set(),
        };
        Self::new(
            NmeaFramer::new(cfg.nmea.max_frame_len),
            SentenceDecoder::new(registry),
        )
    }
}

impl DynParser {
    /// Builds the [Parser] of any [Protocol]
    pub fn for_protocol(protocol: Protocol, cfg: &Config) -> Self {
        fn boxed<F, D>(parser: Parser<F, D>) -> DynParser
        where
            F: Framer + Send + 'static,
            D: Decoder + Send + 'static,
        {
            let framer: Box<dyn Framer + Send> = Box::new(parser.framer);
            let decoder: Box<dyn Decoder + Send> = Box::new(parser.decoder);
            Parser::new(framer, decoder)
        }

        match protocol {
            Protocol::RtcmV3 => boxed(Parser::rtcm3(cfg)),
            Protocol::RtcmV2 => boxed(Parser::rtcm2(cfg)),
            Protocol::Ubx => boxed(Parser::ubx(cfg)),
            Protocol::Oem => boxed(Parser::oem(cfg)),
            Protocol::Nmea => boxed(Parser::nmea(cfg)),
            Protocol::Asterix => boxed(Parser::asterix(cfg)),
        }
    }
}
