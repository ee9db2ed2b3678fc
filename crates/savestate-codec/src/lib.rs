//! Bit-exact typed value codec for save-state buffers.
//!
//! Every value is encoded at a fixed width per type (float64 excepted):
//! - Integers big-endian, two's complement for signed types
//! - float32 assembled arithmetically into its IEEE-754 bit pattern
//! - float64 as length-prefixed round-trip text
//! - Vectors, quaternions and colors component-wise
//!
//! Encode and decode passes run through explicit cursor objects
//! ([`ValueWriter`], [`ValueReader`]); there is no shared buffer state.

pub mod codec;
pub mod error;
pub mod float;
pub mod reader;
pub mod type_tag;
pub mod value;
pub mod writer;

pub use codec::{decode_field, decode_value, encode_field, encode_value, INVALID_PLAYER_ID};
pub use error::{CodecError, Result};
pub use float::{f32_from_bits, f32_to_bits, CANONICAL_NAN};
pub use reader::ValueReader;
pub use type_tag::{FieldType, TypeTag};
pub use value::{
    AnyPlayer, Color, Color32, Decimal, NoPlayers, PlayerLookup, PlayerRef, Quaternion, Value,
    Vector2, Vector3, Vector4,
};
pub use writer::ValueWriter;
