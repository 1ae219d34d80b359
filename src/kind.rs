//! Value kinds: the closed set of local representations a parameter can carry.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Enum8,
    Enum16,
    Enum32,
    UEnum8,
    UEnum16,
    UEnum32,
    Bool,
    Bool32,
    String,
    WString,
    UInt8Array,
    UInt16Array,
    UInt32Array,
    /// `key:value`
    StringString,
    /// `key:value`, value decimal
    StringInt32,
    /// `key:value`, value hex
    StringUInt32,
    /// `key/value`
    StringUInt8,
    Address,
    Bag,
}

impl ValueKind {
    /// Size of the local representation; 0 for kinds without a static size.
    pub const fn size(self) -> usize {
        use ValueKind::*;
        match self {
            Int8 | UInt8 | Enum8 | UEnum8 | Bool => 1,
            Int16 | UInt16 | Enum16 | UEnum16 => 2,
            Int32 | UInt32 | Enum32 | UEnum32 | Bool32 => 4,
            Int64 | UInt64 | Address => 8,
            String | WString | UInt8Array | UInt16Array | UInt32Array | StringString
            | StringInt32 | StringUInt32 | StringUInt8 | Bag => 0,
        }
    }

    pub const fn is_fixed_size(self) -> bool {
        self.size() != 0
    }

    pub const fn is_enum(self) -> bool {
        use ValueKind::*;
        matches!(self, Enum8 | Enum16 | Enum32 | UEnum8 | UEnum16 | UEnum32)
    }

    /// Integer-valued kinds (plain integers, enums, address); these carry bounds and ranges.
    pub const fn is_integral(self) -> bool {
        use ValueKind::*;
        matches!(
            self,
            Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64 | Address
        ) || self.is_enum()
    }

    /// Integral kinds whose numerals are written as `0x` hex.
    pub const fn packs_hex(self) -> bool {
        use ValueKind::*;
        matches!(
            self,
            UInt8 | UInt16 | UInt32 | UInt64 | UEnum8 | UEnum16 | UEnum32 | Address
        )
    }

    pub const fn is_tuple(self) -> bool {
        use ValueKind::*;
        matches!(self, StringString | StringInt32 | StringUInt32 | StringUInt8)
    }

    pub const fn is_array(self) -> bool {
        use ValueKind::*;
        matches!(self, UInt8Array | UInt16Array | UInt32Array)
    }

    /// Inclusive numeric domain of an integral kind.
    pub const fn int_domain(self) -> Option<(i128, i128)> {
        use ValueKind::*;
        Some(match self {
            Int8 | Enum8 => (i8::MIN as i128, i8::MAX as i128),
            Int16 | Enum16 => (i16::MIN as i128, i16::MAX as i128),
            Int32 | Enum32 => (i32::MIN as i128, i32::MAX as i128),
            Int64 => (i64::MIN as i128, i64::MAX as i128),
            UInt8 | UEnum8 => (0, u8::MAX as i128),
            UInt16 | UEnum16 => (0, u16::MAX as i128),
            UInt32 | UEnum32 => (0, u32::MAX as i128),
            UInt64 | Address => (0, u64::MAX as i128),
            _ => return None,
        })
    }

    /// Width in bytes of one array element.
    pub const fn array_element_size(self) -> Option<usize> {
        match self {
            ValueKind::UInt8Array => Some(1),
            ValueKind::UInt16Array => Some(2),
            ValueKind::UInt32Array => Some(4),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        use ValueKind::*;
        match self {
            Int8 => "int8",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            UInt8 => "uint8",
            UInt16 => "uint16",
            UInt32 => "uint32",
            UInt64 => "uint64",
            Enum8 => "enum8",
            Enum16 => "enum16",
            Enum32 => "enum32",
            UEnum8 => "uenum8",
            UEnum16 => "uenum16",
            UEnum32 => "uenum32",
            Bool => "bool",
            Bool32 => "bool32",
            String => "string",
            WString => "wstring",
            UInt8Array => "uint8_array",
            UInt16Array => "uint16_array",
            UInt32Array => "uint32_array",
            StringString => "string_string",
            StringInt32 => "string_int32",
            StringUInt32 => "string_uint32",
            StringUInt8 => "string_uint8",
            Address => "address",
            Bag => "bag",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
