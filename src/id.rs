//! Parameter identifiers and tags.
//!
//! An identifier is a 32-bit word packing three fields:
//!
//! | bits    | field          |
//! |---------|----------------|
//! | 29      | virtual flag   |
//! | 14..=28 | parameter set  |
//! | 0..=13  | type index     |
//!
//! Type indices are 1-based inside a set; 0 for either the set or the type means "unset".

use crate::error::Error;
use std::fmt;

const TYPE_BITS: u32 = 14;
const SET_BITS: u32 = 15;

const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;
const SET_MASK: u32 = ((1 << SET_BITS) - 1) << TYPE_BITS;
const VIRTUAL_BIT: u32 = 1 << (TYPE_BITS + SET_BITS);

/// Largest parameter set id that fits the encoding.
pub const MAX_SET_ID: u16 = ((1u32 << SET_BITS) - 1) as u16;
/// Largest type index that fits the encoding.
pub const MAX_TYPE_INDEX: u16 = TYPE_MASK as u16;

/// Encoded parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ParamId(u32);

impl ParamId {
    /// Reserved identifier; also used as the "any id" wildcard by list searches.
    pub const UNDEFINED: ParamId = ParamId(0);

    /// Encode `(virtual, set, type_index)`. Out-of-range fields are masked.
    pub const fn encode(is_virtual: bool, set: u16, type_index: u16) -> ParamId {
        let v = if is_virtual { VIRTUAL_BIT } else { 0 };
        ParamId(v | (((set as u32) << TYPE_BITS) & SET_MASK) | (type_index as u32 & TYPE_MASK))
    }

    pub const fn from_raw(raw: u32) -> ParamId {
        ParamId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_virtual(self) -> bool {
        self.0 & VIRTUAL_BIT != 0
    }

    pub const fn paramset(self) -> u16 {
        ((self.0 & SET_MASK) >> TYPE_BITS) as u16
    }

    pub const fn type_index(self) -> u16 {
        (self.0 & TYPE_MASK) as u16
    }

    pub const fn is_undefined(self) -> bool {
        self.paramset() == 0 || self.type_index() == 0
    }

    /// Same identifier with the virtual flag cleared.
    pub const fn concrete(self) -> ParamId {
        ParamId(self.0 & !VIRTUAL_BIT)
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual() {
            write!(f, "{}:{}(virtual)", self.paramset(), self.type_index())
        } else {
            write!(f, "{}:{}", self.paramset(), self.type_index())
        }
    }
}

/// Instance tag distinguishing repeated occurrences of one identifier in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tag(u8);

impl Tag {
    pub const MAX: u8 = 99;
    pub const DEFAULT: Tag = Tag(0);

    pub fn new(value: i64) -> Result<Tag, Error> {
        if (0..=Tag::MAX as i64).contains(&value) {
            Ok(Tag(value as u8))
        } else {
            Err(Error::InvalidParameter(format!("tag {} outside 0..={}", value, Tag::MAX)))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_fields() {
        let id = ParamId::encode(false, 0x7fff, 0x3fff);
        assert_eq!(id.paramset(), MAX_SET_ID);
        assert_eq!(id.type_index(), MAX_TYPE_INDEX);
        assert!(!id.is_virtual());

        let v = ParamId::encode(true, 3, 7);
        assert!(v.is_virtual());
        assert_eq!(v.paramset(), 3);
        assert_eq!(v.type_index(), 7);
        assert_eq!(v.concrete(), ParamId::encode(false, 3, 7));
    }

    #[test]
    fn zero_fields_are_undefined() {
        assert!(ParamId::UNDEFINED.is_undefined());
        assert!(ParamId::encode(false, 0, 4).is_undefined());
        assert!(ParamId::encode(false, 4, 0).is_undefined());
        assert!(!ParamId::encode(false, 4, 1).is_undefined());
    }

    #[test]
    fn tag_bounds() {
        assert_eq!(Tag::new(0).unwrap().get(), 0);
        assert_eq!(Tag::new(99).unwrap().get(), 99);
        assert!(Tag::new(100).is_err());
        assert!(Tag::new(-1).is_err());
    }
}
