//! Conversion between typed values and JSON.
//!
//! Scalars map to JSON numbers and booleans. Non-finite floats are the
//! strings `"NaN"`, `"Infinity"` and `"-Infinity"`. Decimals are strings to
//! keep all 96 bits. Vectors, quaternions and colors are component arrays;
//! players are ids or `null`.

use savestate_codec::{
    Color, Color32, Decimal, PlayerRef, Quaternion, TypeTag, Value, Vector2, Vector3, Vector4,
};
use serde_json::{json, Value as Json};

use crate::error::{BufferError, Result};

/// Read a JSON value as type `tag`.
pub fn value_from_json(tag: TypeTag, json: &Json) -> Result<Value> {
    let err = |message: &str| BufferError::Json {
        tag,
        message: message.to_string(),
    };

    let value = match tag {
        TypeTag::Bool => Value::Bool(json.as_bool().ok_or_else(|| err("expected boolean"))?),
        TypeTag::Int8 => Value::Int8(int_from(json, tag)?),
        TypeTag::UInt8 => Value::UInt8(int_from(json, tag)?),
        TypeTag::Int16 => Value::Int16(int_from(json, tag)?),
        TypeTag::UInt16 => Value::UInt16(int_from(json, tag)?),
        TypeTag::Char => match json {
            Json::String(s) => {
                let mut units = s.encode_utf16();
                match (units.next(), units.next()) {
                    (Some(unit), None) => Value::Char(unit),
                    _ => return Err(err("expected a single UTF-16 code unit")),
                }
            }
            _ => Value::Char(int_from(json, tag)?),
        },
        TypeTag::Int32 => Value::Int32(int_from(json, tag)?),
        TypeTag::UInt32 => Value::UInt32(int_from(json, tag)?),
        TypeTag::Int64 => Value::Int64(json.as_i64().ok_or_else(|| err("expected i64"))?),
        TypeTag::UInt64 => Value::UInt64(json.as_u64().ok_or_else(|| err("expected u64"))?),
        TypeTag::Float32 => Value::Float32(float_from(json, tag)? as f32),
        TypeTag::Float64 => Value::Float64(float_from(json, tag)?),
        TypeTag::Decimal => {
            let decimal: Decimal = match json {
                Json::String(s) => s.parse()?,
                Json::Number(n) => n.to_string().parse()?,
                _ => return Err(err("expected decimal string")),
            };
            Value::Decimal(decimal)
        }
        TypeTag::Vector2 => {
            let [x, y] = floats_from(json, tag)?;
            Value::Vector2(Vector2 { x, y })
        }
        TypeTag::Vector3 => {
            let [x, y, z] = floats_from(json, tag)?;
            Value::Vector3(Vector3 { x, y, z })
        }
        TypeTag::Vector4 => {
            let [x, y, z, w] = floats_from(json, tag)?;
            Value::Vector4(Vector4 { x, y, z, w })
        }
        TypeTag::Quaternion => {
            let [x, y, z, w] = floats_from(json, tag)?;
            Value::Quaternion(Quaternion { x, y, z, w })
        }
        TypeTag::Color => {
            let [r, g, b, a] = floats_from(json, tag)?;
            Value::Color(Color { r, g, b, a })
        }
        TypeTag::Color32 => {
            let items = array_of::<4>(json, tag)?;
            let mut channels = [0u8; 4];
            for (channel, item) in channels.iter_mut().zip(items) {
                *channel = int_from(item, tag)?;
            }
            let [r, g, b, a] = channels;
            Value::Color32(Color32 { r, g, b, a })
        }
        TypeTag::Player => match json {
            Json::Null => Value::Player(None),
            _ => {
                let id: i32 = int_from(json, tag)?;
                Value::Player((id >= 0).then(|| PlayerRef::new(id)))
            }
        },
    };
    Ok(value)
}

/// Render a value as JSON.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Bool(v) => json!(v),
        Value::Int8(v) => json!(v),
        Value::UInt8(v) => json!(v),
        Value::Int16(v) => json!(v),
        Value::UInt16(v) => json!(v),
        Value::Char(v) => match char::from_u32(u32::from(*v)) {
            Some(c) => json!(c.to_string()),
            None => json!(v),
        },
        Value::Int32(v) => json!(v),
        Value::UInt32(v) => json!(v),
        Value::Int64(v) => json!(v),
        Value::UInt64(v) => json!(v),
        Value::Float32(v) => float_to_json(f64::from(*v)),
        Value::Float64(v) => float_to_json(*v),
        Value::Decimal(v) => json!(v.to_string()),
        Value::Vector2(v) => floats_to_json(&[v.x, v.y]),
        Value::Vector3(v) => floats_to_json(&[v.x, v.y, v.z]),
        Value::Vector4(v) => floats_to_json(&[v.x, v.y, v.z, v.w]),
        Value::Quaternion(v) => floats_to_json(&[v.x, v.y, v.z, v.w]),
        Value::Color(v) => floats_to_json(&[v.r, v.g, v.b, v.a]),
        Value::Color32(v) => json!([v.r, v.g, v.b, v.a]),
        Value::Player(v) => match v {
            Some(player) => json!(player.id()),
            None => Json::Null,
        },
    }
}

fn int_from<T: TryFrom<i64>>(json: &Json, tag: TypeTag) -> Result<T> {
    json.as_i64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| BufferError::Json {
            tag,
            message: format!("expected integer in range, got {json}"),
        })
}

fn float_from(json: &Json, tag: TypeTag) -> Result<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
    .ok_or_else(|| BufferError::Json {
        tag,
        message: format!("expected number, got {json}"),
    })
}

fn array_of<const N: usize>(json: &Json, tag: TypeTag) -> Result<&[Json]> {
    match json.as_array() {
        Some(items) if items.len() == N => Ok(items),
        _ => Err(BufferError::Json {
            tag,
            message: format!("expected array of {N} components, got {json}"),
        }),
    }
}

fn floats_from<const N: usize>(json: &Json, tag: TypeTag) -> Result<[f32; N]> {
    let items = array_of::<N>(json, tag)?;
    let mut out = [0.0f32; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = float_from(item, tag)? as f32;
    }
    Ok(out)
}

fn float_to_json(value: f64) -> Json {
    if value.is_nan() {
        json!("NaN")
    } else if value == f64::INFINITY {
        json!("Infinity")
    } else if value == f64::NEG_INFINITY {
        json!("-Infinity")
    } else {
        json!(value)
    }
}

fn floats_to_json(values: &[f32]) -> Json {
    Json::Array(values.iter().map(|v| float_to_json(f64::from(*v))).collect())
}
