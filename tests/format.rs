#![cfg(feature = "std")]

use std::sync::Arc;

use bindecl::{
    Array, ByteOrder, ByteSource, Bytes, ConfigError, Context, Decode, DecodeExt, Error, Format,
    Length, Options, Scope, SliceSource, Str, U8, U16, Value,
};

fn packet() -> Format {
    Format::builder()
        .field("length", U8)
        .field("payload", Bytes::count("length"))
        .build()
        .unwrap()
}

#[test]
fn length_prefixed_payload() {
    let data = [0x03, 0xAA, 0xBB, 0xCC];
    let decoded = packet()
        .decode_source(&mut SliceSource::new(&data), Options::default())
        .unwrap();

    assert_eq!(decoded.consumed, 4);
    assert_eq!(decoded.fields.get("length"), Some(&Value::from(3u8)));
    assert_eq!(
        decoded.fields.get("payload"),
        Some(&Value::from(vec![0xAAu8, 0xBB, 0xCC]))
    );
    assert_eq!(
        decoded.fields.names().collect::<Vec<_>>(),
        ["length", "payload"]
    );
}

#[test]
fn trailing_data_is_rejected() {
    let data = [0x01, 0xAA, 0xFF];

    let err = packet().decode_slice(&data).unwrap_err();
    assert!(matches!(err, Error::TrailingData { position: 2 }));

    let mut source = SliceSource::new(&data);
    let decoded = packet()
        .decode_source(&mut source, Options::allow_leftover())
        .unwrap();

    assert_eq!(decoded.consumed, 2);
    assert_eq!(source.remaining(), [0xFF]);
}

#[test]
fn empty_format_decodes_nothing() {
    let format = Format::builder().build().unwrap();
    assert!(format.decode_slice(&[]).unwrap().is_empty());
}

#[test]
fn duplicate_fields_are_rejected() {
    let err = Format::builder()
        .field("a", U8)
        .field("b", U8)
        .field("a", U16)
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidConfiguration(ConfigError::DuplicateField(name)) if name == "a"
    ));
}

#[test]
fn unresolved_references_fail_before_reading() {
    let format = Format::builder()
        .field("data", Bytes::count("missing"))
        .build()
        .unwrap();

    let mut source = SliceSource::new(&[1, 2, 3]);
    let err = format
        .decode_source(&mut source, Options::default())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidConfiguration(ConfigError::UnresolvedReference(name)) if name == "missing"
    ));
    assert_eq!(source.position(), 0);
}

#[test]
fn references_must_precede_their_use() {
    let format = Format::builder()
        .field("payload", Bytes::count("length"))
        .field("length", U8)
        .build()
        .unwrap();

    let err = format.decode_slice(&[0, 0]).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidConfiguration(ConfigError::UnresolvedReference(_))
    ));
}

#[test]
fn references_to_non_integers_fail() {
    let format = Format::builder()
        .field("name", Str::count(1))
        .field("data", Bytes::count("name"))
        .build()
        .unwrap();

    let err = format.decode_slice(b"a").unwrap_err();
    assert_eq!(err.path(), "data");
    assert!(matches!(err.root(), Error::UnexpectedValue { .. }));
}

#[test]
fn computed_lengths() {
    let format = Format::builder()
        .field("rows", U8)
        .field("cols", U8)
        .field(
            "cells",
            Bytes::count(Length::computed(|s| {
                Ok(s.integer("rows")? * s.integer("cols")?)
            })),
        )
        .build()
        .unwrap();

    let fields = format.decode_slice(&[2, 3, 1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(
        fields.get("cells").and_then(Value::as_bytes),
        Some(&[1, 2, 3, 4, 5, 6][..])
    );
}

#[test]
fn nested_formats_inherit_byte_order() {
    let inner = Format::builder()
        .field("a", U16)
        .field("b", U16.little())
        .build()
        .unwrap();

    let outer = Format::builder()
        .byte_order(ByteOrder::Big)
        .field("inner", inner.clone())
        .field("swapped", inner.little())
        .build()
        .unwrap();

    let fields = outer.decode_slice(&[1, 2, 1, 2, 1, 2, 1, 2]).unwrap();

    let inner = fields.get("inner").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("a"), Some(&Value::from(258u16)));
    assert_eq!(inner.get("b"), Some(&Value::from(513u16)));

    let swapped = fields.get("swapped").and_then(Value::as_record).unwrap();
    assert_eq!(swapped.get("a"), Some(&Value::from(513u16)));
    assert_eq!(swapped.get("b"), Some(&Value::from(513u16)));
}

#[test]
fn nested_format_order_overrides_container() {
    let inner = Format::builder()
        .byte_order(ByteOrder::Little)
        .field("a", U16)
        .build()
        .unwrap();

    let outer = Format::builder()
        .byte_order(ByteOrder::Big)
        .field("b", U16)
        .field("inner", inner.clone())
        .field("held", inner.big())
        .build()
        .unwrap();

    let fields = outer.decode_slice(&[1, 2, 1, 2, 1, 2]).unwrap();
    assert_eq!(fields.get("b"), Some(&Value::from(258u16)));

    let inner = fields.get("inner").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("a"), Some(&Value::from(513u16)));

    // The format's own order beats the one on the descriptor holding it.
    let held = fields.get("held").and_then(Value::as_record).unwrap();
    assert_eq!(held.get("a"), Some(&Value::from(513u16)));
}

#[test]
fn array_budget_from_fields() {
    let format = Format::builder()
        .field("size", U8)
        .field("items", Array::with_budget(U16.little(), "size"))
        .field("rest", U8)
        .field(
            "tail",
            Array::with_budget(U8, Length::computed(|s| Ok(s.integer("rest")? * 2))),
        )
        .build()
        .unwrap();

    let fields = format.decode_slice(&[4, 1, 0, 2, 0, 1, 7, 8]).unwrap();

    assert_eq!(
        fields.get("items"),
        Some(&Value::Array(vec![Value::from(1u16), Value::from(2u16)]))
    );
    assert_eq!(
        fields.get("tail"),
        Some(&Value::Array(vec![Value::from(7u8), Value::from(8u8)]))
    );

    let err = format.decode_slice(&[3, 1, 0, 2, 0, 0]).unwrap_err();
    assert_eq!(err.path(), "items");
    assert!(matches!(
        err.root(),
        Error::InvalidConfiguration(ConfigError::BudgetOverrun { .. })
    ));
}

#[test]
fn missing_record_field() {
    let mut fields: Context = [("a", Value::from(1u8))].into_iter().collect();

    assert_eq!(fields.take_as::<u8>("a").unwrap(), 1);

    let err = fields.take_as::<u8>("a").unwrap_err();
    assert!(matches!(err, Error::MissingField(name) if name == "a"));
}

#[test]
fn nested_formats_see_outer_fields() {
    let inner = Format::builder()
        .field("data", Bytes::count("n"))
        .build()
        .unwrap();

    let outer = Format::builder()
        .field("n", U8)
        .field("inner", inner)
        .build()
        .unwrap();

    let fields = outer.decode_slice(&[2, 7, 8]).unwrap();
    let inner = fields.get("inner").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("data"), Some(&Value::from(vec![7u8, 8])));
}

#[test]
fn inner_fields_shadow_outer_ones() {
    let inner = Format::builder()
        .field("n", U8)
        .field("data", Bytes::count("n"))
        .build()
        .unwrap();

    let outer = Format::builder()
        .field("n", U8)
        .field("inner", inner)
        .build()
        .unwrap();

    let fields = outer.decode_slice(&[5, 1, 9]).unwrap();
    let inner = fields.get("inner").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("data"), Some(&Value::from(vec![9u8])));
}

#[test]
fn errors_record_their_path() {
    let header = Format::builder()
        .field("items", Array::with_count(U16, 3))
        .build()
        .unwrap();

    let format = Format::builder()
        .field("version", U8)
        .field("header", header)
        .build()
        .unwrap();

    let err = format.decode_slice(&[1, 0, 0, 0, 0]).unwrap_err();

    assert_eq!(err.path(), "header.items[2]");
    assert!(matches!(
        err.root(),
        Error::InsufficientData {
            needed: 2,
            available: 0
        }
    ));
    assert_eq!(
        err.to_string(),
        "In field `header`: In field `items`: In element 2: Needed 2 bytes, but only 0 remain."
    );
}

#[test]
fn transforms_apply_after_decoding() {
    let format = Format::builder()
        .field("flag", U8.map(|v| Value::Bool(v != Value::UInt(0))))
        .field(
            "doubled",
            U8.try_map(|v| {
                let x = v.as_usize().ok_or_else(|| Error::custom("not an integer"))?;
                Ok(Value::from(x * 2))
            }),
        )
        .build()
        .unwrap();

    let fields = format.decode_slice(&[1, 21]).unwrap();
    assert_eq!(fields.get("flag"), Some(&Value::Bool(true)));
    assert_eq!(fields.get("doubled"), Some(&Value::from(42u8)));
}

#[test]
fn later_fields_see_transformed_values() {
    let format = Format::builder()
        .field("length", U8.map(|v| Value::from(v.as_usize().unwrap_or(0) + 1)))
        .field("payload", Bytes::count("length"))
        .build()
        .unwrap();

    let fields = format.decode_slice(&[1, 7, 8]).unwrap();
    assert_eq!(fields.get("payload"), Some(&Value::from(vec![7u8, 8])));
}

#[test]
fn transform_errors_abort_decoding() {
    let format = Format::builder()
        .field("checked", U8.try_map(|_| Err(Error::custom("rejected"))))
        .build()
        .unwrap();

    let err = format.decode_slice(&[0]).unwrap_err();
    assert_eq!(err.path(), "checked");
    assert!(matches!(err.root(), Error::Custom(message) if message == "rejected"));
}

/// An unsigned LEB128 integer.
struct VarInt;

impl Decode for VarInt {
    fn decode(&self, source: &mut dyn ByteSource, _: &Scope<'_>) -> Result<Value, Error> {
        let mut x = 0u128;

        for shift in (0..128).step_by(7) {
            let byte = source.take(1)?[0];

            x |= ((byte & 0x7F) as u128) << shift;
            if byte & 0x80 == 0 {
                return Ok(Value::UInt(x));
            }
        }

        Err(Error::custom("varint is too long"))
    }
}

#[test]
fn custom_decoders() {
    let format = Format::builder()
        .field("length", VarInt)
        .field("payload", Bytes::count("length"))
        .build()
        .unwrap();

    let mut data = vec![0x82, 0x01];
    data.extend(std::iter::repeat_n(0xEE, 130));

    let fields = format.decode_slice(&data).unwrap();
    assert_eq!(fields.get("length"), Some(&Value::from(130u8)));
    assert_eq!(
        fields.get("payload").and_then(Value::as_bytes).map(<[u8]>::len),
        Some(130)
    );
}

#[test]
fn formats_are_shared_between_threads() {
    let format = Arc::new(packet());

    std::thread::scope(|s| {
        for n in 0..4u8 {
            let format = Arc::clone(&format);

            s.spawn(move || {
                let mut data = vec![n];
                data.extend((0..n).map(|i| i * 2));

                let fields = format.decode_slice(&data).unwrap();
                assert_eq!(fields.get("length"), Some(&Value::from(n)));
                assert_eq!(fields.get("payload").and_then(Value::as_bytes), Some(&data[1..]));
            });
        }
    });
}

#[test]
fn contexts_collect_and_display() {
    let context: Context = [("a", Value::from(1u8)), ("b", Value::from("x"))]
        .into_iter()
        .collect();

    assert_eq!(context.len(), 2);
    assert_eq!(context.to_string(), r#"{a: 1, b: "x"}"#);
}
