//! Local (in-memory) parameter values.

use crate::element::ParamList;
use crate::error::{Error, Result};
use crate::kind::ValueKind;
use byteorder::{ByteOrder, NativeEndian};
use std::cmp::Ordering;

/// A single parameter value in local format. One variant per [`ValueKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Enum8(i8),
    Enum16(i16),
    Enum32(i32),
    UEnum8(u8),
    UEnum16(u16),
    UEnum32(u32),
    Bool(bool),
    Bool32(bool),
    String(String),
    WString(String),
    UInt8Array(Vec<u8>),
    UInt16Array(Vec<u16>),
    UInt32Array(Vec<u32>),
    StringString(String, String),
    StringInt32(String, i32),
    StringUInt32(String, u32),
    StringUInt8(String, u8),
    Address(u64),
    Bag(ParamList),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int8(_) => ValueKind::Int8,
            Value::Int16(_) => ValueKind::Int16,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::UInt8(_) => ValueKind::UInt8,
            Value::UInt16(_) => ValueKind::UInt16,
            Value::UInt32(_) => ValueKind::UInt32,
            Value::UInt64(_) => ValueKind::UInt64,
            Value::Enum8(_) => ValueKind::Enum8,
            Value::Enum16(_) => ValueKind::Enum16,
            Value::Enum32(_) => ValueKind::Enum32,
            Value::UEnum8(_) => ValueKind::UEnum8,
            Value::UEnum16(_) => ValueKind::UEnum16,
            Value::UEnum32(_) => ValueKind::UEnum32,
            Value::Bool(_) => ValueKind::Bool,
            Value::Bool32(_) => ValueKind::Bool32,
            Value::String(_) => ValueKind::String,
            Value::WString(_) => ValueKind::WString,
            Value::UInt8Array(_) => ValueKind::UInt8Array,
            Value::UInt16Array(_) => ValueKind::UInt16Array,
            Value::UInt32Array(_) => ValueKind::UInt32Array,
            Value::StringString(..) => ValueKind::StringString,
            Value::StringInt32(..) => ValueKind::StringInt32,
            Value::StringUInt32(..) => ValueKind::StringUInt32,
            Value::StringUInt8(..) => ValueKind::StringUInt8,
            Value::Address(_) => ValueKind::Address,
            Value::Bag(_) => ValueKind::Bag,
        }
    }

    /// Numeric value of integral kinds, widened so every kind fits.
    pub fn as_i128(&self) -> Option<i128> {
        Some(match self {
            Value::Int8(x) | Value::Enum8(x) => *x as i128,
            Value::Int16(x) | Value::Enum16(x) => *x as i128,
            Value::Int32(x) | Value::Enum32(x) => *x as i128,
            Value::Int64(x) => *x as i128,
            Value::UInt8(x) | Value::UEnum8(x) => *x as i128,
            Value::UInt16(x) | Value::UEnum16(x) => *x as i128,
            Value::UInt32(x) | Value::UEnum32(x) => *x as i128,
            Value::UInt64(x) | Value::Address(x) => *x as i128,
            _ => return None,
        })
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|v| u64::try_from(v).ok())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) | Value::Bool32(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::WString(s) => Some(s),
            _ => None,
        }
    }

    /// Key of a tuple value.
    pub fn tuple_key(&self) -> Option<&str> {
        match self {
            Value::StringString(k, _)
            | Value::StringInt32(k, _)
            | Value::StringUInt32(k, _)
            | Value::StringUInt8(k, _) => Some(k),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&ParamList> {
        match self {
            Value::Bag(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_bag_mut(&mut self) -> Option<&mut ParamList> {
        match self {
            Value::Bag(l) => Some(l),
            _ => None,
        }
    }

    /// Build an integral value of `kind` from a number already checked against its domain.
    pub fn from_int(kind: ValueKind, v: i128) -> Result<Value> {
        let (lo, hi) = kind
            .int_domain()
            .ok_or_else(|| Error::InvalidOperation(format!("{} is not integral", kind)))?;
        if v < lo || v > hi {
            return Err(Error::FailedOperation(format!("{} outside {} domain", v, kind)));
        }
        Ok(match kind {
            ValueKind::Int8 => Value::Int8(v as i8),
            ValueKind::Int16 => Value::Int16(v as i16),
            ValueKind::Int32 => Value::Int32(v as i32),
            ValueKind::Int64 => Value::Int64(v as i64),
            ValueKind::UInt8 => Value::UInt8(v as u8),
            ValueKind::UInt16 => Value::UInt16(v as u16),
            ValueKind::UInt32 => Value::UInt32(v as u32),
            ValueKind::UInt64 => Value::UInt64(v as u64),
            ValueKind::Enum8 => Value::Enum8(v as i8),
            ValueKind::Enum16 => Value::Enum16(v as i16),
            ValueKind::Enum32 => Value::Enum32(v as i32),
            ValueKind::UEnum8 => Value::UEnum8(v as u8),
            ValueKind::UEnum16 => Value::UEnum16(v as u16),
            ValueKind::UEnum32 => Value::UEnum32(v as u32),
            ValueKind::Address => Value::Address(v as u64),
            _ => return Err(Error::InvalidOperation(format!("{} is not integral", kind))),
        })
    }

    /// Length used for bounds checks: characters, array elements, tuple key characters,
    /// or bag members. `None` for scalar kinds.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) | Value::WString(s) => Some(s.chars().count()),
            Value::UInt8Array(a) => Some(a.len()),
            Value::UInt16Array(a) => Some(a.len()),
            Value::UInt32Array(a) => Some(a.len()),
            Value::Bag(l) => Some(l.len()),
            v => v.tuple_key().map(|k| k.chars().count()),
        }
    }

    /// Static size of the local representation (0 for variable-size kinds).
    pub fn size_of(&self) -> usize {
        self.kind().size()
    }

    /// Copy the native-endian local representation into `out`; returns bytes written.
    pub fn copy_out(&self, out: &mut [u8]) -> Result<usize> {
        let size = self.size_of();
        if size == 0 {
            return Err(Error::InvalidOperation(format!(
                "copy-out unsupported for {}",
                self.kind()
            )));
        }
        if out.len() < size {
            return Err(Error::InvalidParameter(format!(
                "copy-out needs {} bytes, got {}",
                size,
                out.len()
            )));
        }
        let out = &mut out[..size];
        match self {
            Value::Int8(x) | Value::Enum8(x) => out[0] = *x as u8,
            Value::UInt8(x) | Value::UEnum8(x) => out[0] = *x,
            Value::Bool(b) => out[0] = *b as u8,
            Value::Int16(x) | Value::Enum16(x) => NativeEndian::write_i16(out, *x),
            Value::UInt16(x) | Value::UEnum16(x) => NativeEndian::write_u16(out, *x),
            Value::Int32(x) | Value::Enum32(x) => NativeEndian::write_i32(out, *x),
            Value::UInt32(x) | Value::UEnum32(x) => NativeEndian::write_u32(out, *x),
            Value::Bool32(b) => NativeEndian::write_u32(out, *b as u32),
            Value::Int64(x) => NativeEndian::write_i64(out, *x),
            Value::UInt64(x) | Value::Address(x) => NativeEndian::write_u64(out, *x),
            v => {
                return Err(Error::InvalidOperation(format!(
                    "copy-out unsupported for {}",
                    v.kind()
                )))
            }
        }
        Ok(size)
    }

    /// Ordering between two values of the same kind. Compound kinds (arrays, tuples, bags)
    /// only support structural equality via `==`.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        if self.kind() != other.kind() {
            return Err(Error::InvalidParameter(format!(
                "cannot compare {} with {}",
                self.kind(),
                other.kind()
            )));
        }
        if let (Some(a), Some(b)) = (self.as_i128(), other.as_i128()) {
            return Ok(a.cmp(&b));
        }
        if let (Some(a), Some(b)) = (self.as_bool(), other.as_bool()) {
            return Ok(a.cmp(&b));
        }
        if let (Some(a), Some(b)) = (self.as_str(), other.as_str()) {
            return Ok(a.cmp(b));
        }
        Err(Error::InvalidOperation(format!(
            "ordering unsupported for {}",
            self.kind()
        )))
    }
}
