use std::sync::{Arc, Mutex};

use rstest::*;

use crate::{
    oem::{self, ClockStatus, Component, OemHeader, Time, UtcStatus, Version},
    prelude::*,
    tests::{capture, errors, init_logger},
    ubx::{self, AckAck, AckNak, MonVer, NavClock},
};

fn nav_clock() -> NavClock {
    NavClock {
        itow_ms: 345_600_250,
        bias_ns: -1_245_678,
        drift_ns_s: 312,
        time_accuracy_ns: 25,
        freq_accuracy_ps_s: 870,
    }
}

#[test]
fn ubx_messages() {
    init_logger();

    let mut parser = Parser::ubx(&Config::default());
    let clocks = capture::<NavClock, _, _>(&mut parser);
    let acks = capture::<AckAck, _, _>(&mut parser);
    let naks = capture::<AckNak, _, _>(&mut parser);
    let errors = errors(&mut parser);

    let mut stream = vec![0x62, 0xB5, 0x00];
    stream.extend(ubx::encode(&nav_clock()).unwrap());
    stream.extend(ubx::encode(&AckAck { class: 0x06, id: 0x01 }).unwrap());
    stream.push(0xB5);
    stream.extend(ubx::encode(&AckNak { class: 0x06, id: 0x8A }).unwrap());

    assert_eq!(parser.push_slice(&stream), 3);
    assert!(errors.lock().unwrap().is_empty());

    let clocks = clocks.lock().unwrap();
    assert_eq!(clocks[0], nav_clock());
    assert_eq!(
        clocks[0].time_of_week(),
        Unit::Day * 4 + Unit::Millisecond * 250
    );
    assert_eq!(clocks[0].bias(), Unit::Nanosecond * -1_245_678);

    assert_eq!(acks.lock().unwrap()[0], AckAck { class: 0x06, id: 0x01 });
    assert_eq!(naks.lock().unwrap()[0], AckNak { class: 0x06, id: 0x8A });
}

#[test]
fn ubx_corrupted_payload() {
    init_logger();

    let mut frame = ubx::encode(&nav_clock()).unwrap();
    frame[ubx::HEADER_LEN + 5] ^= 0x40;

    let mut parser = Parser::ubx(&Config::default());
    let errors = errors(&mut parser);

    assert_eq!(parser.push_slice(&frame), 0);
    // the next frame is not lost
    assert_eq!(parser.push_slice(&ubx::encode(&nav_clock()).unwrap()), 1);

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Checksum);
    assert_eq!(errors[0].protocol, Protocol::Ubx);
}

#[test]
fn mon_ver_is_an_extension() {
    init_logger();

    let version = MonVer {
        sw_version: "ROM SPG 5.10 (7b202e)".to_string(),
        hw_version: "000A0000".to_string(),
        extensions: vec![
            "FWVER=SPG 5.10".to_string(),
            "PROTVER=34.10".to_string(),
            "GPS;GLO;GAL;BDS".to_string(),
        ],
    };
    let frame = ubx::encode(&version).unwrap();
    assert_eq!(frame.len(), ubx::HEADER_LEN + 40 + 3 * 30 + 2);

    let mut parser = Parser::ubx(&Config::default());
    let errors = errors(&mut parser);
    assert_eq!(parser.push_slice(&frame), 0);
    assert_eq!(
        errors.lock().unwrap()[0].error,
        Error::UnknownMessage(MessageId::Numeric(MonVer::ID))
    );

    let mut parser = Parser::ubx(&Config::default().with_message_set(MessageSet::Extended));
    let decoded = capture::<MonVer, _, _>(&mut parser);
    assert_eq!(parser.push_slice(&frame), 1);
    assert_eq!(decoded.lock().unwrap()[0], version);
}

fn time() -> Time {
    Time {
        clock_status: ClockStatus::Valid,
        offset_s: -1.7525e-9,
        offset_std_s: 7.8e-10,
        utc_offset_s: -18.0,
        utc_year: 2024,
        utc_month: 6,
        utc_day: 17,
        utc_hour: 13,
        utc_minute: 42,
        utc_ms: 12_500,
        utc_status: UtcStatus::Valid,
    }
}

#[test]
fn oem_time() {
    init_logger();

    let header = OemHeader {
        port_address: 0x20,
        sequence: 0,
        idle_time: 156,
        time_status: 180,
        week: 2_318,
        ms: 135_780_000,
        receiver_status: 0x0200_0020,
        sw_version: 16_248,
        ..OemHeader::new(0)
    };
    let frame = oem::encode(&header, &time()).unwrap();
    assert_eq!(frame.len(), oem::HEADER_LEN + 44 + 4);

    let mut parser = Parser::oem(&Config::default());
    let decoded = capture::<Time, _, _>(&mut parser);
    let errors = errors(&mut parser);

    let headers = Arc::new(Mutex::new(Vec::new()));
    let shared = headers.clone();
    parser.on_raw_frame(move |_, bytes| {
        shared.lock().unwrap().push(OemHeader::decode(bytes));
    });

    assert_eq!(parser.push_slice(&frame), 1);
    assert!(errors.lock().unwrap().is_empty());
    assert_eq!(decoded.lock().unwrap()[0], time());

    // message id is taken from the payload
    let headers = headers.lock().unwrap();
    assert_eq!(
        headers[0],
        Ok(OemHeader {
            message_id: Time::ID as u16,
            ..header
        })
    );
}

#[test]
fn oem_version_is_an_extension() {
    init_logger();

    let version = Version {
        components: vec![Component {
            kind: 1,
            model: "FFNRNNCBN".to_string(),
            serial_number: "BFN11190099".to_string(),
            hw_version: "OEM729-1.01".to_string(),
            sw_version: "OM7CR0810RN0000".to_string(),
            boot_version: "OM7BR0001RBG000".to_string(),
            compile_date: "2023/Sep/26".to_string(),
            compile_time: "12:01:47".to_string(),
        }],
    };
    let frame = oem::encode(&OemHeader::default(), &version).unwrap();

    let mut parser = Parser::oem(&Config::default());
    let errors = errors(&mut parser);
    assert_eq!(parser.push_slice(&frame), 0);
    assert_eq!(errors.lock().unwrap()[0].kind, ErrorKind::UnknownMessage);

    let mut parser = Parser::oem(&Config::default().with_message_set(MessageSet::Extended));
    let decoded = capture::<Version, _, _>(&mut parser);
    assert_eq!(parser.push_slice(&frame), 1);
    assert_eq!(decoded.lock().unwrap()[0], version);
}

#[test]
fn oem_clock_status() {
    let mut time = time();
    time.clock_status = ClockStatus::Other(7);
    let frame = oem::encode(&OemHeader::default(), &time).unwrap();

    let mut parser = Parser::oem(&Config::default());
    let decoded = capture::<Time, _, _>(&mut parser);
    assert_eq!(parser.push_slice(&frame), 1);
    assert_eq!(decoded.lock().unwrap()[0].clock_status, ClockStatus::Other(7));
}

#[rstest]
#[case(Protocol::RtcmV3)]
#[case(Protocol::RtcmV2)]
#[case(Protocol::Ubx)]
#[case(Protocol::Oem)]
#[case(Protocol::Nmea)]
#[case(Protocol::Asterix)]
fn dyn_parser(#[case] protocol: Protocol) {
    init_logger();

    let stream = match protocol {
        Protocol::RtcmV3 => vec![0xD3, 0x00, 0x00, 0x47, 0xEA, 0x4B],
        Protocol::RtcmV2 => crate::rtcm2::encode(&crate::rtcm2::SpecialMessage {
            text: "DYN".to_string(),
            ..Default::default()
        })
        .unwrap(),
        Protocol::Ubx => ubx::encode(&nav_clock()).unwrap(),
        Protocol::Oem => oem::encode(&OemHeader::default(), &time()).unwrap(),
        Protocol::Nmea => b"$GPZDA,160012.71,11,03,2004,-1,00*7D\r\n".to_vec(),
        // north marker
        Protocol::Asterix => vec![0x02, 0x00, 0x05, 0x40, 0x01],
    };

    let mut parser = DynParser::for_protocol(protocol, &Config::default());
    assert_eq!(parser.protocol(), protocol);

    let protocols = Arc::new(Mutex::new(Vec::new()));
    let shared = protocols.clone();
    parser.on_raw_frame(move |protocol, _| shared.lock().unwrap().push(protocol));

    let published = parser.push_slice(&stream);
    assert_eq!(*protocols.lock().unwrap(), vec![protocol]);

    // the empty RTCM frame carries no message number
    if protocol == Protocol::RtcmV3 {
        assert_eq!(published, 0);
    } else {
        assert_eq!(published, 1);
    }
}
