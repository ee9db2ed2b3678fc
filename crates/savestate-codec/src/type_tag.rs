//! Supported field types.
//!
//! The set is closed: every type the codec understands has a [`TypeTag`]
//! variant and (except `Float64`) a fixed bit width. Type names coming from
//! persisted configuration that match no tag become [`FieldType::Unsupported`]
//! and are dropped by the codec.

use std::fmt;

/// Identifies one of the supported value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Char,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Vector2,
    Vector3,
    Vector4,
    Quaternion,
    Color,
    Color32,
    Player,
}

impl TypeTag {
    /// Every supported tag, in declaration order.
    pub const ALL: [TypeTag; 20] = [
        TypeTag::Bool,
        TypeTag::Int8,
        TypeTag::UInt8,
        TypeTag::Int16,
        TypeTag::UInt16,
        TypeTag::Char,
        TypeTag::Int32,
        TypeTag::UInt32,
        TypeTag::Int64,
        TypeTag::UInt64,
        TypeTag::Float32,
        TypeTag::Float64,
        TypeTag::Decimal,
        TypeTag::Vector2,
        TypeTag::Vector3,
        TypeTag::Vector4,
        TypeTag::Quaternion,
        TypeTag::Color,
        TypeTag::Color32,
        TypeTag::Player,
    ];

    /// Encoded width in bits, or `None` for variable-width types.
    pub const fn fixed_bits(self) -> Option<u32> {
        let bits = match self {
            TypeTag::Bool | TypeTag::Int8 | TypeTag::UInt8 => 8,
            TypeTag::Int16 | TypeTag::UInt16 | TypeTag::Char => 16,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Float32 => 32,
            TypeTag::Color32 | TypeTag::Player => 32,
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Vector2 => 64,
            TypeTag::Vector3 => 96,
            TypeTag::Decimal | TypeTag::Vector4 | TypeTag::Quaternion | TypeTag::Color => 128,
            TypeTag::Float64 => return None,
        };
        Some(bits)
    }

    /// Encoded width in whole bytes, or `None` for variable-width types.
    pub const fn fixed_bytes(self) -> Option<usize> {
        match self.fixed_bits() {
            Some(bits) => Some(bits as usize / 8),
            None => None,
        }
    }

    /// Canonical short name, as written in instruction tables.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int8 => "int8",
            TypeTag::UInt8 => "uint8",
            TypeTag::Int16 => "int16",
            TypeTag::UInt16 => "uint16",
            TypeTag::Char => "char",
            TypeTag::Int32 => "int32",
            TypeTag::UInt32 => "uint32",
            TypeTag::Int64 => "int64",
            TypeTag::UInt64 => "uint64",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
            TypeTag::Decimal => "decimal",
            TypeTag::Vector2 => "vector2",
            TypeTag::Vector3 => "vector3",
            TypeTag::Vector4 => "vector4",
            TypeTag::Quaternion => "quaternion",
            TypeTag::Color => "color",
            TypeTag::Color32 => "color32",
            TypeTag::Player => "player",
        }
    }

    /// Resolve a type name.
    ///
    /// Accepts the canonical short names and the fully-qualified host type
    /// names that authoring tools emit (`System.Int32`, `UnityEngine.Vector3`,
    /// `VRC.SDKBase.VRCPlayerApi`, ...).
    pub fn from_name(name: &str) -> Option<TypeTag> {
        let tag = match name {
            "bool" | "System.Boolean" => TypeTag::Bool,
            "int8" | "System.SByte" => TypeTag::Int8,
            "uint8" | "System.Byte" => TypeTag::UInt8,
            "int16" | "System.Int16" => TypeTag::Int16,
            "uint16" | "System.UInt16" => TypeTag::UInt16,
            "char" | "System.Char" => TypeTag::Char,
            "int32" | "System.Int32" => TypeTag::Int32,
            "uint32" | "System.UInt32" => TypeTag::UInt32,
            "int64" | "System.Int64" => TypeTag::Int64,
            "uint64" | "System.UInt64" => TypeTag::UInt64,
            "float32" | "System.Single" => TypeTag::Float32,
            "float64" | "System.Double" => TypeTag::Float64,
            "decimal" | "System.Decimal" => TypeTag::Decimal,
            "vector2" | "UnityEngine.Vector2" => TypeTag::Vector2,
            "vector3" | "UnityEngine.Vector3" => TypeTag::Vector3,
            "vector4" | "UnityEngine.Vector4" => TypeTag::Vector4,
            "quaternion" | "UnityEngine.Quaternion" => TypeTag::Quaternion,
            "color" | "UnityEngine.Color" => TypeTag::Color,
            "color32" | "UnityEngine.Color32" => TypeTag::Color32,
            "player" | "VRC.SDKBase.VRCPlayerApi" => TypeTag::Player,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared type of one buffer field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A type the codec can encode.
    Supported(TypeTag),
    /// A type name with no codec support. Contributes zero bits.
    Unsupported(String),
}

impl FieldType {
    /// Classify a type name.
    pub fn parse(name: &str) -> Self {
        match TypeTag::from_name(name) {
            Some(tag) => FieldType::Supported(tag),
            None => FieldType::Unsupported(name.to_string()),
        }
    }

    /// The tag, if supported.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            FieldType::Supported(tag) => Some(*tag),
            FieldType::Unsupported(_) => None,
        }
    }

    /// Encoded width in bits. Unsupported fields occupy zero bits.
    pub fn fixed_bits(&self) -> Option<u32> {
        match self {
            FieldType::Supported(tag) => tag.fixed_bits(),
            FieldType::Unsupported(_) => Some(0),
        }
    }
}

impl From<TypeTag> for FieldType {
    fn from(tag: TypeTag) -> Self {
        FieldType::Supported(tag)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Supported(tag) => tag.fmt(f),
            FieldType::Unsupported(name) => write!(f, "{name} (unsupported)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_whole_bytes() {
        for tag in TypeTag::ALL {
            if let Some(bits) = tag.fixed_bits() {
                assert_eq!(bits % 8, 0, "{tag} is not byte aligned");
            }
        }
    }

    #[test]
    fn float64_is_variable_width() {
        assert_eq!(TypeTag::Float64.fixed_bits(), None);
        assert_eq!(TypeTag::Float64.fixed_bytes(), None);
    }

    #[test]
    fn names_resolve_back_to_tags() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn host_type_names_resolve() {
        assert_eq!(TypeTag::from_name("System.Int32"), Some(TypeTag::Int32));
        assert_eq!(
            TypeTag::from_name("UnityEngine.Quaternion"),
            Some(TypeTag::Quaternion)
        );
        assert_eq!(
            TypeTag::from_name("VRC.SDKBase.VRCPlayerApi"),
            Some(TypeTag::Player)
        );
    }

    #[test]
    fn unknown_names_are_unsupported_with_zero_width() {
        let field = FieldType::parse("UnityEngine.Vector3Int");
        assert_eq!(field.tag(), None);
        assert_eq!(field.fixed_bits(), Some(0));
    }
}
