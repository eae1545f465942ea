#![cfg(feature = "std")]

use std::io::{self, Read};

use bindecl::{
    ByteSource, Bytes, DecodeExt, Descriptor, Error, Format, ReaderSource, SliceSource, U8, U16,
    U32, Value,
};
use either::Either;

/// A reader handing out one byte per call, interrupted before each.
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl<'a> Trickle<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            interrupt: true,
        }
    }
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if !self.interrupt {
            return Err(io::ErrorKind::Interrupted.into());
        }

        match (self.data.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("unplugged"))
    }
}

#[test]
fn reader_source_reassembles_short_reads() {
    let mut source = ReaderSource::new(Trickle::new(&[0x12, 0x34, 0x56, 0x78, 0x9A]));

    let (value, consumed) = Descriptor::from(U32.big()).read(&mut source).unwrap();
    assert_eq!(value, Value::from(0x1234_5678u32));
    assert_eq!(consumed, 4);

    assert!(!source.is_exhausted().unwrap());
    assert_eq!(source.position(), 4);
    assert_eq!(source.take(1).unwrap(), [0x9A]);
    assert!(source.is_exhausted().unwrap());
}

#[test]
fn failed_reads_consume_nothing() {
    let mut source = ReaderSource::new(&[0x01, 0x02][..]);

    let err = Descriptor::from(U32).read(&mut source).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientData {
            needed: 4,
            available: 2
        }
    ));
    assert_eq!(source.position(), 0);

    let (value, _) = Descriptor::from(U16.big()).read(&mut source).unwrap();
    assert_eq!(value, Value::from(0x0102u16));
}

#[test]
fn reader_errors_propagate() {
    let err = Descriptor::from(U8)
        .read(&mut ReaderSource::new(Broken))
        .unwrap_err();

    assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::Other));
}

#[test]
fn large_reads_span_chunks() {
    let data: Vec<u8> = (0..2000u32).map(|i| i as u8).collect();
    let mut source = ReaderSource::new(&data[..]);

    assert_eq!(source.take(700).unwrap(), data[..700]);
    assert_eq!(source.take(1300).unwrap(), data[700..]);
    assert!(source.is_exhausted().unwrap());
}

#[test]
fn huge_lengths_fail_cleanly() {
    let format = Format::builder()
        .field("length", U32.big())
        .field("payload", Bytes::count("length"))
        .build()
        .unwrap();

    let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x00];
    for err in [
        format.decode_slice(&data).unwrap_err(),
        format.decode_reader(&data[..]).unwrap_err(),
    ] {
        assert_eq!(err.path(), "payload");
        assert!(matches!(
            err.root(),
            Error::InsufficientData {
                needed: 0xFFFF_FFFF,
                available: 1
            }
        ));
    }
}

#[test]
fn slices_and_readers_agree() {
    let format = Format::builder()
        .field("length", U8)
        .field("payload", Bytes::count("length"))
        .field("tail", U16.little())
        .build()
        .unwrap();

    let data = [0x02, 0xAA, 0xBB, 0x01, 0x00];

    let from_slice = format.decode_slice(&data).unwrap();
    let from_reader = format.decode_reader(Trickle::new(&data)).unwrap();

    assert_eq!(from_slice, from_reader);
    assert_eq!(from_slice.get("tail"), Some(&Value::from(1u16)));
}

#[test]
fn reader_trailing_data_is_rejected() {
    let format = Format::builder().field("a", U8).build().unwrap();

    let err = format.decode_reader(&[1, 2][..]).unwrap_err();
    assert!(matches!(err, Error::TrailingData { position: 1 }));
}

#[test]
fn either_source() {
    let data = [0x00, 0x2A];

    let sources: [Either<SliceSource, ReaderSource<&[u8]>>; 2] = [
        Either::Left(SliceSource::new(&data)),
        Either::Right(ReaderSource::new(&data[..])),
    ];

    for mut source in sources {
        let (value, consumed) = Descriptor::from(U16.big()).read(&mut source).unwrap();
        assert_eq!(value, Value::from(42u16));
        assert_eq!(consumed, 2);
        assert!(source.is_exhausted().unwrap());
    }
}
