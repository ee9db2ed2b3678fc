use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::error::{CodecError, Result};
use crate::float::{f32_from_bits, f32_to_bits};
use crate::reader::ValueReader;
use crate::type_tag::{FieldType, TypeTag};
use crate::value::{
    Color, Color32, Decimal, PlayerLookup, Quaternion, Value, Vector2, Vector3, Vector4,
};

/// Player id written for an invalid or absent player handle.
pub const INVALID_PLAYER_ID: i32 = -1;

/// Encode `value` as `tag`, appending to `dst`. Returns the new offset.
///
/// Layouts are big-endian; floats go through the arithmetic bit assembly in
/// [`crate::float`]; float64 is written as text:
/// ```text
/// ┌────────────────────┬──────────────────────────────┐
/// │ Length (4B BE i32) │ ASCII round-trip digits       │
/// └────────────────────┴──────────────────────────────┘
/// ```
///
/// Nothing is written if the value does not match the tag.
pub fn encode_value(value: &Value, tag: TypeTag, dst: &mut BytesMut) -> Result<usize> {
    let found = value.type_tag();
    if found != tag {
        return Err(CodecError::TypeMismatch {
            expected: tag,
            found,
        });
    }

    match value {
        Value::Bool(v) => dst.put_u8(u8::from(*v)),
        Value::Int8(v) => dst.put_i8(*v),
        Value::UInt8(v) => dst.put_u8(*v),
        Value::Int16(v) => dst.put_i16(*v),
        Value::UInt16(v) | Value::Char(v) => dst.put_u16(*v),
        Value::Int32(v) => dst.put_i32(*v),
        Value::UInt32(v) => dst.put_u32(*v),
        Value::Int64(v) => dst.put_i64(*v),
        Value::UInt64(v) => dst.put_u64(*v),
        Value::Float32(v) => put_f32(dst, *v),
        Value::Float64(v) => put_f64_text(dst, *v)?,
        Value::Decimal(v) => {
            for word in v.words() {
                dst.put_u32(word);
            }
        }
        Value::Vector2(v) => put_floats(dst, &[v.x, v.y]),
        Value::Vector3(v) => put_floats(dst, &[v.x, v.y, v.z]),
        Value::Vector4(v) => put_floats(dst, &[v.x, v.y, v.z, v.w]),
        Value::Quaternion(v) => put_floats(dst, &[v.x, v.y, v.z, v.w]),
        Value::Color(v) => put_floats(dst, &[v.r, v.g, v.b, v.a]),
        Value::Color32(v) => dst.put_slice(&[v.r, v.g, v.b, v.a]),
        Value::Player(v) => dst.put_i32(v.map_or(INVALID_PLAYER_ID, |p| p.id())),
    }
    Ok(dst.len())
}

/// Decode a value of type `tag` at the reader's cursor.
///
/// Player ids are resolved through `players`; an id that no longer resolves
/// decodes to `Value::Player(None)`.
pub fn decode_value(
    tag: TypeTag,
    src: &mut ValueReader<'_>,
    players: &dyn PlayerLookup,
) -> Result<Value> {
    if let Some(width) = tag.fixed_bytes() {
        src.ensure(width)?;
    }

    let value = match tag {
        TypeTag::Bool => Value::Bool(src.read_u8()? != 0),
        TypeTag::Int8 => Value::Int8(src.read_u8()? as i8),
        TypeTag::UInt8 => Value::UInt8(src.read_u8()?),
        TypeTag::Int16 => Value::Int16(src.read_u16()? as i16),
        TypeTag::UInt16 => Value::UInt16(src.read_u16()?),
        TypeTag::Char => Value::Char(src.read_u16()?),
        TypeTag::Int32 => Value::Int32(src.read_u32()? as i32),
        TypeTag::UInt32 => Value::UInt32(src.read_u32()?),
        TypeTag::Int64 => Value::Int64(src.read_u64()? as i64),
        TypeTag::UInt64 => Value::UInt64(src.read_u64()?),
        TypeTag::Float32 => Value::Float32(get_f32(src)?),
        TypeTag::Float64 => Value::Float64(get_f64_text(src)?),
        TypeTag::Decimal => {
            let flags = src.read_u32()?;
            let lo = src.read_u32()?;
            let mid = src.read_u32()?;
            let hi = src.read_u32()?;
            Value::Decimal(Decimal::from_words(flags, lo, mid, hi)?)
        }
        TypeTag::Vector2 => {
            let [x, y] = get_floats(src)?;
            Value::Vector2(Vector2 { x, y })
        }
        TypeTag::Vector3 => {
            let [x, y, z] = get_floats(src)?;
            Value::Vector3(Vector3 { x, y, z })
        }
        TypeTag::Vector4 => {
            let [x, y, z, w] = get_floats(src)?;
            Value::Vector4(Vector4 { x, y, z, w })
        }
        TypeTag::Quaternion => {
            let [x, y, z, w] = get_floats(src)?;
            Value::Quaternion(Quaternion { x, y, z, w })
        }
        TypeTag::Color => {
            let [r, g, b, a] = get_floats(src)?;
            Value::Color(Color { r, g, b, a })
        }
        TypeTag::Color32 => {
            let [r, g, b, a] = [src.read_u8()?, src.read_u8()?, src.read_u8()?, src.read_u8()?];
            Value::Color32(Color32 { r, g, b, a })
        }
        TypeTag::Player => {
            let id = src.read_u32()? as i32;
            Value::Player(players.resolve(id))
        }
    };
    Ok(value)
}

/// Encode a declared field.
///
/// Unsupported fields are dropped: nothing is written and the offset is
/// returned unchanged.
pub fn encode_field(value: &Value, field: &FieldType, dst: &mut BytesMut) -> Result<usize> {
    match field {
        FieldType::Supported(tag) => encode_value(value, *tag, dst),
        FieldType::Unsupported(name) => {
            warn!(type_name = %name, "dropping field of unsupported type on encode");
            Ok(dst.len())
        }
    }
}

/// Decode a declared field. Unsupported fields consume nothing and yield `None`.
pub fn decode_field(
    field: &FieldType,
    src: &mut ValueReader<'_>,
    players: &dyn PlayerLookup,
) -> Result<Option<Value>> {
    match field {
        FieldType::Supported(tag) => decode_value(*tag, src, players).map(Some),
        FieldType::Unsupported(name) => {
            warn!(type_name = %name, "skipping field of unsupported type on decode");
            Ok(None)
        }
    }
}

fn put_f32(dst: &mut BytesMut, value: f32) {
    dst.put_u32(f32_to_bits(value));
}

fn get_f32(src: &mut ValueReader<'_>) -> Result<f32> {
    Ok(f32_from_bits(src.read_u32()?))
}

fn put_floats(dst: &mut BytesMut, values: &[f32]) {
    for value in values {
        put_f32(dst, *value);
    }
}

fn get_floats<const N: usize>(src: &mut ValueReader<'_>) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        *slot = get_f32(src)?;
    }
    Ok(out)
}

// float64 has no arithmetic bit assembly on the storage side; it travels as
// the shortest text that parses back to the same value.
fn put_f64_text(dst: &mut BytesMut, value: f64) -> Result<()> {
    let text = format!("{value:?}");
    let len = i32::try_from(text.len()).map_err(|_| CodecError::TextTooLong(text.len()))?;
    dst.reserve(4 + text.len());
    dst.put_i32(len);
    dst.extend(text.bytes().map(|b| b & 0x7F));
    Ok(())
}

fn get_f64_text(src: &mut ValueReader<'_>) -> Result<f64> {
    let len = src.peek_u32()? as i32;
    let len = usize::try_from(len).map_err(|_| CodecError::InvalidLength(len))?;
    src.ensure(4 + len)?;
    src.read_u32()?;
    let raw = src.read_bytes(len)?;
    let text: String = raw.iter().map(|b| char::from(b & 0x7F)).collect();
    text.parse::<f64>()
        .map_err(|_| CodecError::InvalidFloatText(text))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::value::{AnyPlayer, NoPlayers, PlayerRef};

    fn encode(value: &Value) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_value(value, value.type_tag(), &mut buf).unwrap();
        buf
    }

    fn roundtrip(value: &Value) -> Value {
        let buf = encode(value);
        let mut reader = ValueReader::new(&buf);
        let decoded = decode_value(value.type_tag(), &mut reader, &AnyPlayer).unwrap();
        assert!(reader.is_empty(), "{value:?} left {} bytes", reader.remaining());
        decoded
    }

    #[test]
    fn fixed_width_matches_encoded_length() {
        for tag in TypeTag::ALL {
            let Some(width) = tag.fixed_bytes() else {
                continue;
            };
            assert_eq!(encode(&Value::default_for(tag)).len(), width, "{tag}");
        }
    }

    #[test]
    fn integer_layouts_are_big_endian() {
        assert_eq!(encode(&Value::Int32(1_000_000_000)).as_ref(), &[0x3B, 0x9A, 0xCA, 0x00]);
        assert_eq!(encode(&Value::Int16(-2)).as_ref(), &[0xFF, 0xFE]);
        assert_eq!(encode(&Value::Int8(-1)).as_ref(), &[0xFF]);
        assert_eq!(encode(&Value::Char(u16::from(b'A'))).as_ref(), &[0x00, 0x41]);
        assert_eq!(
            encode(&Value::UInt64(0x0102_0304_0506_0708)).as_ref(),
            &[1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(encode(&Value::Bool(true)).as_ref(), &[0x01]);
    }

    #[test]
    fn float32_layout_is_ieee() {
        assert_eq!(encode(&Value::Float32(1.5)).as_ref(), &[0x3F, 0xC0, 0x00, 0x00]);
        assert_eq!(encode(&Value::Float32(-0.0)).as_ref(), &[0x80, 0, 0, 0]);
        assert_eq!(encode(&Value::Float32(f32::NAN)).as_ref(), &[0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn signed_integers_round_trip_at_extremes() {
        for value in [
            Value::Int8(i8::MIN),
            Value::Int8(i8::MAX),
            Value::Int16(i16::MIN),
            Value::Int16(-0x7FFF),
            Value::Int32(i32::MIN),
            Value::Int64(i64::MIN),
            Value::Int64(i64::MAX),
            Value::UInt16(u16::MAX),
            Value::UInt32(u32::MAX),
            Value::UInt64(u64::MAX),
        ] {
            assert_eq!(roundtrip(&value), value);
        }
    }

    #[test]
    fn decimal_words_in_order() {
        let d = Decimal::new(-((1i128 << 64) + 2), 4).unwrap();
        let buf = encode(&Value::Decimal(d));
        assert_eq!(
            buf.as_ref(),
            &[
                0x80, 0x04, 0x00, 0x00, // flags
                0x00, 0x00, 0x00, 0x02, // lo
                0x00, 0x00, 0x00, 0x00, // mid
                0x00, 0x00, 0x00, 0x01, // hi
            ]
        );
        assert_eq!(roundtrip(&Value::Decimal(d)), Value::Decimal(d));
    }

    #[test]
    fn float64_travels_as_text() {
        let buf = encode(&Value::Float64(1.5));
        assert_eq!(buf.as_ref(), &[0, 0, 0, 3, b'1', b'.', b'5']);

        let values = [
            0.1,
            -0.0,
            1e300,
            f64::MIN_POSITIVE,
            5e-324,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for value in values {
            let Value::Float64(back) = roundtrip(&Value::Float64(value)) else {
                panic!("wrong variant");
            };
            assert_eq!(back.to_bits(), value.to_bits(), "{value:e}");
        }

        let Value::Float64(nan) = roundtrip(&Value::Float64(f64::NAN)) else {
            panic!("wrong variant");
        };
        assert!(nan.is_nan());
    }

    #[test]
    fn float64_accepts_host_text_forms() {
        for (text, expected) in [("Infinity", f64::INFINITY), ("1E+300", 1e300), ("-2.5", -2.5)] {
            let mut buf = BytesMut::new();
            buf.put_i32(text.len() as i32);
            buf.put_slice(text.as_bytes());
            let mut reader = ValueReader::new(&buf);
            let value = decode_value(TypeTag::Float64, &mut reader, &NoPlayers).unwrap();
            assert_eq!(value, Value::Float64(expected));
        }
    }

    #[test]
    fn float64_rejects_bad_prefix_and_text() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF];
        let err = decode_value(TypeTag::Float64, &mut ValueReader::new(&buf), &NoPlayers)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidLength(-1)));

        let buf = [0, 0, 0, 2, b'x', b'y'];
        let err = decode_value(TypeTag::Float64, &mut ValueReader::new(&buf), &NoPlayers)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidFloatText(_)));

        let buf = [0, 0, 0, 9, b'1'];
        let err = decode_value(TypeTag::Float64, &mut ValueReader::new(&buf), &NoPlayers)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn aggregates_round_trip() {
        for value in [
            Value::Vector2(Vector2 { x: 1.0, y: -1.0 }),
            Value::Vector3(Vector3 {
                x: 1.5,
                y: -2.25,
                z: 0.0,
            }),
            Value::Vector4(Vector4 {
                x: f32::MAX,
                y: f32::MIN_POSITIVE,
                z: -0.0,
                w: f32::INFINITY,
            }),
            Value::Quaternion(Quaternion::IDENTITY),
            Value::Color(Color {
                r: 0.25,
                g: 0.5,
                b: 0.75,
                a: 1.0,
            }),
            Value::Color32(Color32 {
                r: 1,
                g: 2,
                b: 254,
                a: 255,
            }),
        ] {
            assert_eq!(roundtrip(&value), value);
        }
    }

    #[test]
    fn player_ids_resolve_through_lookup() {
        let player = Value::Player(Some(PlayerRef::new(42)));
        assert_eq!(encode(&player).as_ref(), &[0, 0, 0, 42]);
        assert_eq!(roundtrip(&player), player);

        assert_eq!(encode(&Value::Player(None)).as_ref(), &[0xFF; 4]);
        assert_eq!(roundtrip(&Value::Player(None)), Value::Player(None));

        let buf = encode(&player);
        let gone = decode_value(TypeTag::Player, &mut ValueReader::new(&buf), &NoPlayers).unwrap();
        assert_eq!(gone, Value::Player(None));
    }

    #[test]
    fn mismatched_value_is_rejected_without_writing() {
        let mut buf = BytesMut::new();
        let err = encode_value(&Value::Int32(1), TypeTag::Float32, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch {
                expected: TypeTag::Float32,
                found: TypeTag::Int32
            }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn truncated_aggregate_does_not_consume() {
        let buf = encode(&Value::Vector3(Vector3::default()));
        let mut reader = ValueReader::new(&buf[..10]);
        assert!(decode_value(TypeTag::Vector3, &mut reader, &NoPlayers).is_err());
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn truncated_float64_text_does_not_consume_prefix() {
        let buf = [0, 0, 0, 9, b'1'];
        let mut reader = ValueReader::new(&buf);
        let err = decode_value(TypeTag::Float64, &mut reader, &NoPlayers).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedEof {
                needed: 13,
                remaining: 5
            }
        ));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn unsupported_field_is_a_no_op() {
        let mut buf = BytesMut::from(&[9u8][..]);
        let field = FieldType::Unsupported("UnityEngine.Vector2Int".into());
        assert_eq!(encode_field(&Value::Int32(5), &field, &mut buf).unwrap(), 1);
        assert_eq!(buf.as_ref(), &[9]);

        let mut reader = ValueReader::new(&buf);
        assert_eq!(decode_field(&field, &mut reader, &NoPlayers).unwrap(), None);
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn health_and_position_scenario() {
        let health = Value::Int32(1_000_000_000);
        let pos = Value::Vector3(Vector3 {
            x: 1.5,
            y: -2.25,
            z: 0.0,
        });
        let mut buf = BytesMut::new();
        assert_eq!(encode_value(&health, TypeTag::Int32, &mut buf).unwrap(), 4);
        assert_eq!(encode_value(&pos, TypeTag::Vector3, &mut buf).unwrap(), 16);

        let mut reader = ValueReader::new(&buf);
        assert_eq!(reader.read(TypeTag::Int32, &NoPlayers).unwrap(), health);
        assert_eq!(reader.offset(), 4);
        assert_eq!(reader.read(TypeTag::Vector3, &NoPlayers).unwrap(), pos);
        assert_eq!(reader.offset(), 16);
    }

    fn arb_f32() -> impl Strategy<Value = f32> {
        any::<u32>()
            .prop_map(f32::from_bits)
            .prop_filter("NaN compares unequal", |v| !v.is_nan())
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i8>().prop_map(Value::Int8),
            any::<u8>().prop_map(Value::UInt8),
            any::<i16>().prop_map(Value::Int16),
            any::<u16>().prop_map(Value::UInt16),
            any::<u16>().prop_map(Value::Char),
            any::<i32>().prop_map(Value::Int32),
            any::<u32>().prop_map(Value::UInt32),
            any::<i64>().prop_map(Value::Int64),
            any::<u64>().prop_map(Value::UInt64),
            arb_f32().prop_map(Value::Float32),
            any::<f64>()
                .prop_filter("NaN compares unequal", |v| !v.is_nan())
                .prop_map(Value::Float64),
            (any::<i128>(), 0u32..=28).prop_filter_map("fits 96 bits", |(m, s)| {
                Decimal::new(m >> 32, s).map(Value::Decimal)
            }),
            (arb_f32(), arb_f32()).prop_map(|(x, y)| Value::Vector2(Vector2 { x, y })),
            (arb_f32(), arb_f32(), arb_f32())
                .prop_map(|(x, y, z)| Value::Vector3(Vector3 { x, y, z })),
            (arb_f32(), arb_f32(), arb_f32(), arb_f32())
                .prop_map(|(x, y, z, w)| Value::Quaternion(Quaternion { x, y, z, w })),
            any::<[u8; 4]>().prop_map(|[r, g, b, a]| Value::Color32(Color32 { r, g, b, a })),
            (0i32..=i32::MAX).prop_map(|id| Value::Player(Some(PlayerRef::new(id)))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 1024,
            rng_algorithm: proptest::test_runner::RngAlgorithm::ChaCha,
            rng_seed: proptest::test_runner::RngSeed::Fixed(0xC0_DE_C5),
            .. ProptestConfig::default()
        })]

        #[test]
        fn any_value_round_trips(value in arb_value()) {
            prop_assert_eq!(roundtrip(&value), value);
        }

        #[test]
        fn sequences_decode_at_encode_offsets(values in proptest::collection::vec(arb_value(), 0..24)) {
            let mut buf = BytesMut::new();
            let mut offsets = Vec::with_capacity(values.len());
            for value in &values {
                offsets.push(encode_value(value, value.type_tag(), &mut buf).unwrap());
            }

            let mut reader = ValueReader::new(&buf);
            for (value, offset) in values.iter().zip(&offsets) {
                let decoded = reader.read(value.type_tag(), &AnyPlayer).unwrap();
                prop_assert_eq!(&decoded, value);
                prop_assert_eq!(reader.offset(), *offset);
            }
            prop_assert!(reader.is_empty());
        }
    }
}
