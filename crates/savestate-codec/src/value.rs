//! Runtime values carried through the codec.

use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};
use crate::type_tag::TypeTag;

/// Two-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Four-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Rotation quaternion, stored `x, y, z, w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Linear RGBA color with float channels. Defaults to fully transparent black.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// RGBA color with byte channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// 128-bit decimal: 96-bit magnitude, sign and a power-of-ten scale.
///
/// Stored as the four 32-bit words the wire format uses: a flags word
/// (sign in bit 31, scale in bits 16..24) followed by the low, middle and
/// high magnitude words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    flags: u32,
    lo: u32,
    mid: u32,
    hi: u32,
}

impl Decimal {
    pub const MAX_SCALE: u32 = 28;
    const SIGN_BIT: u32 = 0x8000_0000;
    const SCALE_SHIFT: u32 = 16;
    const MAX_MAGNITUDE: u128 = (1u128 << 96) - 1;

    /// Build from a signed mantissa and scale (`value = mantissa / 10^scale`).
    ///
    /// Returns `None` if the magnitude does not fit 96 bits or the scale
    /// exceeds 28.
    pub fn new(mantissa: i128, scale: u32) -> Option<Self> {
        let magnitude = mantissa.unsigned_abs();
        if magnitude > Self::MAX_MAGNITUDE || scale > Self::MAX_SCALE {
            return None;
        }
        let sign = if mantissa < 0 { Self::SIGN_BIT } else { 0 };
        Some(Self {
            flags: sign | (scale << Self::SCALE_SHIFT),
            lo: magnitude as u32,
            mid: (magnitude >> 32) as u32,
            hi: (magnitude >> 64) as u32,
        })
    }

    /// Rebuild from wire words. Bits outside sign and scale are discarded.
    pub fn from_words(flags: u32, lo: u32, mid: u32, hi: u32) -> Result<Self> {
        let scale = (flags >> Self::SCALE_SHIFT) & 0xFF;
        if scale > Self::MAX_SCALE {
            return Err(CodecError::InvalidDecimalScale(scale));
        }
        Ok(Self {
            flags: (flags & Self::SIGN_BIT) | (scale << Self::SCALE_SHIFT),
            lo,
            mid,
            hi,
        })
    }

    /// Wire words in encoding order: flags, lo, mid, hi.
    pub fn words(&self) -> [u32; 4] {
        [self.flags, self.lo, self.mid, self.hi]
    }

    pub fn scale(&self) -> u32 {
        (self.flags >> Self::SCALE_SHIFT) & 0xFF
    }

    pub fn is_sign_negative(&self) -> bool {
        self.flags & Self::SIGN_BIT != 0
    }

    /// Unsigned 96-bit magnitude.
    pub fn magnitude(&self) -> u128 {
        (self.hi as u128) << 64 | (self.mid as u128) << 32 | self.lo as u128
    }

    /// Signed mantissa. A negative zero collapses to zero.
    pub fn mantissa(&self) -> i128 {
        let magnitude = self.magnitude() as i128;
        if self.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.magnitude().to_string();
        let scale = self.scale() as usize;
        if self.is_sign_negative() {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        } else {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        }
    }
}

impl FromStr for Decimal {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CodecError::InvalidDecimalText(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int, frac) = body.split_once('.').unwrap_or((body, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut magnitude: u128 = 0;
        for digit in int.bytes().chain(frac.bytes()) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add((digit - b'0') as u128))
                .filter(|m| *m <= Self::MAX_MAGNITUDE)
                .ok_or_else(invalid)?;
        }
        let scale = u32::try_from(frac.len()).map_err(|_| invalid())?;
        let mantissa = magnitude as i128;
        let mut decimal = Self::new(mantissa, scale).ok_or_else(invalid)?;
        if negative {
            decimal.flags |= Self::SIGN_BIT;
        }
        Ok(decimal)
    }
}

/// A live reference to a player, identified by a session-stable integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerRef(i32);

impl PlayerRef {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> i32 {
        self.0
    }
}

/// Resolves encoded player ids back to live references on decode.
pub trait PlayerLookup {
    /// Returns `None` if no player with this id is present.
    fn resolve(&self, id: i32) -> Option<PlayerRef>;
}

impl<F> PlayerLookup for F
where
    F: Fn(i32) -> Option<PlayerRef>,
{
    fn resolve(&self, id: i32) -> Option<PlayerRef> {
        self(id)
    }
}

/// Lookup that accepts every non-negative id.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPlayer;

impl PlayerLookup for AnyPlayer {
    fn resolve(&self, id: i32) -> Option<PlayerRef> {
        (id >= 0).then(|| PlayerRef::new(id))
    }
}

/// Lookup for sessions with no players present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlayers;

impl PlayerLookup for NoPlayers {
    fn resolve(&self, _id: i32) -> Option<PlayerRef> {
        None
    }
}

/// A typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    /// A UTF-16 code unit.
    Char(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Quaternion(Quaternion),
    Color(Color),
    Color32(Color32),
    /// `None` is an invalid handle, encoded as id `-1`.
    Player(Option<PlayerRef>),
}

impl Value {
    /// The value substituted when a source has nothing for a field.
    pub fn default_for(tag: TypeTag) -> Value {
        match tag {
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Int8 => Value::Int8(0),
            TypeTag::UInt8 => Value::UInt8(0),
            TypeTag::Int16 => Value::Int16(0),
            TypeTag::UInt16 => Value::UInt16(0),
            TypeTag::Char => Value::Char(0),
            TypeTag::Int32 => Value::Int32(0),
            TypeTag::UInt32 => Value::UInt32(0),
            TypeTag::Int64 => Value::Int64(0),
            TypeTag::UInt64 => Value::UInt64(0),
            TypeTag::Float32 => Value::Float32(0.0),
            TypeTag::Float64 => Value::Float64(0.0),
            TypeTag::Decimal => Value::Decimal(Decimal::default()),
            TypeTag::Vector2 => Value::Vector2(Vector2::default()),
            TypeTag::Vector3 => Value::Vector3(Vector3::default()),
            TypeTag::Vector4 => Value::Vector4(Vector4::default()),
            TypeTag::Quaternion => Value::Quaternion(Quaternion::IDENTITY),
            TypeTag::Color => Value::Color(Color::default()),
            TypeTag::Color32 => Value::Color32(Color32::default()),
            TypeTag::Player => Value::Player(None),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::Int8(_) => TypeTag::Int8,
            Value::UInt8(_) => TypeTag::UInt8,
            Value::Int16(_) => TypeTag::Int16,
            Value::UInt16(_) => TypeTag::UInt16,
            Value::Char(_) => TypeTag::Char,
            Value::Int32(_) => TypeTag::Int32,
            Value::UInt32(_) => TypeTag::UInt32,
            Value::Int64(_) => TypeTag::Int64,
            Value::UInt64(_) => TypeTag::UInt64,
            Value::Float32(_) => TypeTag::Float32,
            Value::Float64(_) => TypeTag::Float64,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::Vector2(_) => TypeTag::Vector2,
            Value::Vector3(_) => TypeTag::Vector3,
            Value::Vector4(_) => TypeTag::Vector4,
            Value::Quaternion(_) => TypeTag::Quaternion,
            Value::Color(_) => TypeTag::Color,
            Value::Color32(_) => TypeTag::Color32,
            Value::Player(_) => TypeTag::Player,
        }
    }
}
