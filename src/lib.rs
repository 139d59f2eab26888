#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod carrier;
mod cfg;
mod constants;
mod decoder;
mod error;
mod events;
mod message;
mod parser;
mod registry;

// public modules
pub mod checksum;
pub mod codec;
pub mod framing;

// protocols
pub mod asterix;
pub mod nmea;
pub mod oem;
pub mod rtcm2;
pub mod rtcm3;
pub mod ubx;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::carrier::Carrier;
    pub use crate::cfg::{Config, FramingOpts, MessageSet};
    pub use crate::decoder::{sentence_key, BitDecoder, ByteDecoder, Decoder, SentenceDecoder};
    pub use crate::error::{Error, ErrorEvent, ErrorKind};
    pub use crate::events::{HandlerError, Subscription};
    pub use crate::framing::{Frame, Framer};
    pub use crate::message::{
        BitPayload, Body, BytePayload, Message, MessageId, Protocol, SentencePayload,
    };
    pub use crate::parser::{DynParser, Parser};
    pub use crate::registry::{Constructor, Registry};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Unit};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
