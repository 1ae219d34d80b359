//! Pack parameters to text and unpack them back, against a [`Registry`].
//!
//! Handles every value kind, tags, quoting, nested bags (with field-context bookkeeping),
//! validation on unpack, blacklist filtering, and the truncation-safe "pack into a caller
//! buffer" contract.
//!
//! Packed element: `[prefix.]name[tag]=value`. Packed list: elements joined by the configured
//! delimiter. Bags pack as `{member,member,...}` with `,` between members at any depth.

use crate::blacklist::Blacklist;
use crate::descriptor::Descriptor;
use crate::element::{ParamElement, ParamList};
use crate::error::{record, Error, Result};
use crate::id::{ParamId, Tag};
use crate::inherit;
use crate::kind::ValueKind;
use crate::parser;
use crate::registry::Registry;
use crate::tokenize::split_args;
use crate::validate;
use crate::value::Value;
use byteorder::{BigEndian, ByteOrder};
use std::fmt::Write;
use tracing::{debug, trace, warn};

/// Deepest bag nesting accepted by pack and unpack.
pub const MAX_BAG_DEPTH: usize = 64;

const EQ: char = '=';
const ESC: char = '\\';
const BAG_DELIM: char = ',';

/// Output options for packing; the delimiter also splits lists on unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    pub delimiter: char,
    /// Omit the `prefix.` segment of each key.
    pub no_prefix: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            delimiter: ',',
            no_prefix: false,
        }
    }
}

impl PackOptions {
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn no_prefix(mut self, no_prefix: bool) -> Self {
        self.no_prefix = no_prefix;
        self
    }
}

/// How a list unpack treats keys it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackPolicy {
    /// Any unknown key fails the whole list.
    Strict,
    /// Unknown keys are logged and skipped.
    Lenient,
}

#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r Registry,
    options: PackOptions,
}

struct Resolved {
    id: ParamId,
    desc: &'static Descriptor,
    tag: Tag,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Codec {
            registry,
            options: PackOptions::default(),
        }
    }

    pub fn with_options(registry: &'r Registry, options: PackOptions) -> Self {
        Codec { registry, options }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn options(&self) -> PackOptions {
        self.options
    }

    // ==================== Pack ====================

    /// Pack one element as `[prefix.]name[tag]=value`.
    pub fn pack_element(&self, element: &ParamElement) -> Result<String> {
        let mut out = String::new();
        record(self.write_element(&mut out, element, 0).map(|_| out))
    }

    /// Pack a list, elements joined by the configured delimiter.
    pub fn pack_list(&self, list: &ParamList) -> Result<String> {
        let mut out = String::new();
        record(self.write_list(&mut out, list, self.options.delimiter, 0).map(|_| out))
    }

    /// Pack only the value of `element`, as it appears right of `=`.
    pub fn pack_value(&self, element: &ParamElement) -> Result<String> {
        let mut out = String::new();
        let result = self.value_of(element).and_then(|(desc, value)| {
            self.write_value(&mut out, element.id, desc, value, 0)
        });
        record(result.map(|_| out))
    }

    /// Bytes [`pack_element`](Self::pack_element) would produce.
    pub fn packed_element_len(&self, element: &ParamElement) -> Result<usize> {
        self.pack_element(element).map(|s| s.len())
    }

    pub fn packed_list_len(&self, list: &ParamList) -> Result<usize> {
        self.pack_list(list).map(|s| s.len())
    }

    /// Pack into a caller buffer. Writes at most `buf.len()` bytes and always returns the
    /// full packed length, so a return value above `buf.len()` means the output was truncated.
    pub fn pack_element_into(&self, element: &ParamElement, buf: &mut [u8]) -> Result<usize> {
        let packed = self.pack_element(element)?;
        Ok(copy_truncated(&packed, buf))
    }

    /// List form of [`pack_element_into`](Self::pack_element_into).
    pub fn pack_list_into(&self, list: &ParamList, buf: &mut [u8]) -> Result<usize> {
        let packed = self.pack_list(list)?;
        Ok(copy_truncated(&packed, buf))
    }

    fn value_of<'e>(&self, element: &'e ParamElement) -> Result<(&'static Descriptor, &'e Value)> {
        let desc = self.registry.concrete_descriptor(element.id)?;
        let value = element
            .value
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter(format!("{} has no value", desc.name)))?;
        if value.kind() != desc.kind {
            return Err(Error::InvalidParameter(format!(
                "{} holds {}, declared {}",
                desc.name,
                value.kind(),
                desc.kind
            )));
        }
        Ok((desc, value))
    }

    fn write_list(&self, out: &mut String, list: &ParamList, delim: char, depth: usize) -> Result<()> {
        for (i, element) in list.iter().enumerate() {
            if i > 0 {
                out.push(delim);
            }
            self.write_element(out, element, depth)?;
        }
        Ok(())
    }

    fn write_element(&self, out: &mut String, element: &ParamElement, depth: usize) -> Result<()> {
        let (desc, value) = self.value_of(element)?;
        if !self.options.no_prefix {
            let prefix = self
                .registry
                .set_id_to_prefix(element.id.paramset())
                .ok_or_else(|| Error::InvalidParameter(format!("unknown identifier {}", element.id)))?;
            out.push_str(prefix);
            out.push('.');
        }
        out.push_str(desc.name);
        if element.tag() != Tag::DEFAULT {
            write!(out, "[{}]", element.tag())?;
        }
        out.push(EQ);
        self.write_value(out, element.id, desc, value, depth)
    }

    fn write_value(
        &self,
        out: &mut String,
        id: ParamId,
        desc: &Descriptor,
        value: &Value,
        depth: usize,
    ) -> Result<()> {
        let extra = [self.options.delimiter];
        match value {
            Value::Bool(b) | Value::Bool32(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::String(s) | Value::WString(s) => {
                out.try_reserve(s.len() + 2)?;
                parser::write_string(out, s, &extra);
            }
            Value::UInt8Array(a) => write_array(out, a.len(), 1, |i, b| b[0] = a[i])?,
            Value::UInt16Array(a) => {
                write_array(out, a.len(), 2, |i, b| BigEndian::write_u16(b, a[i]))?
            }
            Value::UInt32Array(a) => {
                write_array(out, a.len(), 4, |i, b| BigEndian::write_u32(b, a[i]))?
            }
            Value::StringString(k, v) => {
                write_tuple_key(out, k, &extra);
                out.push(':');
                parser::write_string(out, v, &extra);
            }
            Value::StringInt32(k, v) => {
                write_tuple_key(out, k, &extra);
                write!(out, ":{}", v)?;
            }
            Value::StringUInt32(k, v) => {
                write_tuple_key(out, k, &extra);
                write!(out, ":0x{:x}", v)?;
            }
            Value::StringUInt8(k, v) => {
                write_tuple_key(out, k, &extra);
                write!(out, "/{}", v)?;
            }
            Value::Bag(members) => {
                if depth >= MAX_BAG_DEPTH {
                    return Err(Error::FailedOperation(format!(
                        "{}: bags nested deeper than {}",
                        desc.name, MAX_BAG_DEPTH
                    )));
                }
                out.push('{');
                self.write_list(out, members, BAG_DELIM, depth + 1)?;
                out.push('}');
            }
            v => {
                let n = v.as_i128().ok_or_else(|| {
                    Error::InvalidOperation(format!("{}: cannot pack {}", id, v.kind()))
                })?;
                match desc.kind.is_enum().then(|| desc.enum_name(n as i64)).flatten() {
                    Some(name) => out.push_str(name),
                    None => write_int(out, desc.kind, n)?,
                }
            }
        }
        Ok(())
    }

    // ==================== Unpack ====================

    /// Unpack one element from its key and value text. A key without prefix resolves in
    /// `default_set`.
    pub fn unpack_element(&self, key: &str, value: &str, default_set: u16) -> Result<ParamElement> {
        record(self.unpack_pair(key, value, default_set, 0))
    }

    /// Like [`unpack_element`](Self::unpack_element) but rejects blacklisted identifiers.
    pub fn unpack_element_filtered(
        &self,
        key: &str,
        value: &str,
        default_set: u16,
        blacklist: Option<&Blacklist>,
    ) -> Result<ParamElement> {
        let result = self.resolve_key(key, default_set).and_then(|r| {
            if blacklist.is_some_and(|b| b.contains_tag(r.id, r.tag)) {
                return Err(Error::InvalidOperation(format!("{} is blacklisted", r.desc.name)));
            }
            self.finish_element(r, value, 0)
        });
        record(result)
    }

    /// Unpack a single `key=value` text.
    pub fn unpack_element_str(&self, text: &str, default_set: u16) -> Result<ParamElement> {
        let result = split_args(text, EQ, self.options.delimiter, ESC).and_then(|pairs| {
            match pairs.as_slice() {
                [(k, v)] => self.unpack_pair(k, v, default_set, 0),
                _ => Err(Error::FailedOperation(format!(
                    "expected one element, found {}",
                    pairs.len()
                ))),
            }
        });
        record(result)
    }

    /// Unpack a delimited list. Any unknown key or bad value fails the whole list;
    /// blacklisted identifiers are skipped.
    pub fn unpack_list(
        &self,
        text: &str,
        default_set: u16,
        blacklist: Option<&Blacklist>,
    ) -> Result<ParamList> {
        self.unpack_list_with(text, default_set, blacklist, UnpackPolicy::Strict)
    }

    pub fn unpack_list_with(
        &self,
        text: &str,
        default_set: u16,
        blacklist: Option<&Blacklist>,
        policy: UnpackPolicy,
    ) -> Result<ParamList> {
        let result = split_args(text, EQ, self.options.delimiter, ESC)
            .and_then(|pairs| self.unpack_pairs(pairs, default_set, blacklist, policy, 0));
        if let Err(ref e) = result {
            debug!(error = %e, "list unpack failed");
        }
        record(result)
    }

    /// Unpack the value text of parameter `id`.
    pub fn unpack_value(&self, id: ParamId, text: &str) -> Result<Value> {
        let result = self.registry.concrete_descriptor(id).and_then(|desc| {
            let value = self.parse_value(id, desc, text, 0)?;
            validate::validate(desc, &value)?;
            Ok(value)
        });
        record(result)
    }

    fn unpack_pairs(
        &self,
        pairs: Vec<(String, String)>,
        default_set: u16,
        blacklist: Option<&Blacklist>,
        policy: UnpackPolicy,
        depth: usize,
    ) -> Result<ParamList> {
        let mut list = ParamList::new();
        for (key, value) in pairs {
            let resolved = match self.lookup_key(&key, default_set)? {
                Some(r) => r,
                None if policy == UnpackPolicy::Lenient => {
                    warn!(key = %key, "skipping unknown parameter");
                    continue;
                }
                None => return Err(unknown_key(&key)),
            };
            if blacklist.is_some_and(|b| b.contains_tag(resolved.id, resolved.tag)) {
                debug!(key = %key, "skipping blacklisted parameter");
                continue;
            }
            list.append(self.finish_element(resolved, &value, depth)?);
        }
        Ok(list)
    }

    fn unpack_pair(&self, key: &str, value: &str, default_set: u16, depth: usize) -> Result<ParamElement> {
        let resolved = self.resolve_key(key, default_set)?;
        self.finish_element(resolved, value, depth)
    }

    fn resolve_key(&self, key: &str, default_set: u16) -> Result<Resolved> {
        self.lookup_key(key, default_set)?
            .ok_or_else(|| unknown_key(key))
    }

    /// Resolve a key; `None` when its paramset or name is not registered. Malformed keys,
    /// virtual parameters and bad tags are errors.
    fn lookup_key(&self, key: &str, default_set: u16) -> Result<Option<Resolved>> {
        let parsed = parser::parse_key(key.trim())?;
        let set = match parsed.prefix {
            Some(p) => match self.registry.prefix_to_set_id(p) {
                Some(set) => set,
                None => return Ok(None),
            },
            None => default_set,
        };
        let Some(id) = self.registry.name_to_id(set, parsed.name) else {
            return Ok(None);
        };
        let desc = self.registry.concrete_descriptor(id)?;
        let tag = match parsed.tag {
            Some(t) => {
                let n: i64 = t
                    .parse()
                    .map_err(|_| Error::FailedOperation(format!("bad tag {:?}", t)))?;
                Tag::new(n)?
            }
            None => Tag::DEFAULT,
        };
        Ok(Some(Resolved { id, desc, tag }))
    }

    fn finish_element(&self, r: Resolved, text: &str, depth: usize) -> Result<ParamElement> {
        let value = self.parse_value(r.id, r.desc, text.trim(), depth)?;
        validate::validate(r.desc, &value)?;
        trace!(name = r.desc.name, tag = r.tag.get(), "unpacked");
        Ok(ParamElement::new(r.id, value).with_tag(r.tag))
    }

    fn parse_value(&self, id: ParamId, desc: &Descriptor, text: &str, depth: usize) -> Result<Value> {
        let kind = desc.kind;
        let bad = |why: &str| Error::FailedOperation(format!("{}: {} ({:?})", desc.name, why, text));
        match kind {
            ValueKind::Bool | ValueKind::Bool32 => {
                let b = if text.eq_ignore_ascii_case("true") || text == "1" {
                    true
                } else if text.eq_ignore_ascii_case("false") || text == "0" {
                    false
                } else {
                    return Err(bad("not a boolean"));
                };
                Ok(if kind == ValueKind::Bool {
                    Value::Bool(b)
                } else {
                    Value::Bool32(b)
                })
            }
            ValueKind::String | ValueKind::WString => {
                let s = read_whole_string(text).map_err(|_| bad("malformed string"))?;
                Ok(if kind == ValueKind::String {
                    Value::String(s)
                } else {
                    Value::WString(s)
                })
            }
            ValueKind::UInt8Array => {
                let bytes = read_array(text, 1).map_err(|e: String| bad(e.as_str()))?;
                Ok(Value::UInt8Array(bytes))
            }
            ValueKind::UInt16Array => {
                let bytes = read_array(text, 2).map_err(|e: String| bad(e.as_str()))?;
                Ok(Value::UInt16Array(bytes.chunks(2).map(BigEndian::read_u16).collect()))
            }
            ValueKind::UInt32Array => {
                let bytes = read_array(text, 4).map_err(|e: String| bad(e.as_str()))?;
                Ok(Value::UInt32Array(bytes.chunks(4).map(BigEndian::read_u32).collect()))
            }
            ValueKind::StringString => {
                let (k, rest) = read_tuple_key(text, ':').map_err(|_| bad("malformed tuple"))?;
                let v = read_whole_string(rest).map_err(|_| bad("malformed tuple"))?;
                Ok(Value::StringString(k, v))
            }
            ValueKind::StringInt32 => {
                let (k, rest) = read_tuple_key(text, ':').map_err(|_| bad("malformed tuple"))?;
                let n = parser::parse_int(rest.trim())?;
                let v = i32::try_from(n).map_err(|_| bad("tuple value out of range"))?;
                Ok(Value::StringInt32(k, v))
            }
            ValueKind::StringUInt32 => {
                let (k, rest) = read_tuple_key(text, ':').map_err(|_| bad("malformed tuple"))?;
                let n = parser::parse_int(rest.trim())?;
                let v = u32::try_from(n).map_err(|_| bad("tuple value out of range"))?;
                Ok(Value::StringUInt32(k, v))
            }
            ValueKind::StringUInt8 => {
                let (k, rest) = read_tuple_key(text, '/').map_err(|_| bad("malformed tuple"))?;
                let n = parser::parse_int(rest.trim())?;
                let v = u8::try_from(n).map_err(|_| bad("tuple value out of range"))?;
                Ok(Value::StringUInt8(k, v))
            }
            ValueKind::Bag => self.parse_bag(id, desc, text, depth),
            _ if kind.is_enum() => match desc.enum_value(text) {
                Some(v) => Value::from_int(kind, v as i128),
                None => Value::from_int(kind, parser::parse_int(text)?),
            },
            _ => Value::from_int(kind, parser::parse_int(text)?),
        }
    }

    fn parse_bag(&self, id: ParamId, desc: &Descriptor, text: &str, depth: usize) -> Result<Value> {
        if depth >= MAX_BAG_DEPTH {
            return Err(Error::FailedOperation(format!(
                "{}: bags nested deeper than {}",
                desc.name, MAX_BAG_DEPTH
            )));
        }
        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .ok_or_else(|| Error::FailedOperation(format!("{}: bag must be {{...}}", desc.name)))?;
        let pairs = split_args(inner, EQ, BAG_DELIM, ESC)?;
        let mut members = self.unpack_pairs(pairs, id.paramset(), None, UnpackPolicy::Strict, depth + 1)?;
        for member in members.iter_mut() {
            inherit::attach_field(self.registry, id, member);
        }
        Ok(Value::Bag(members))
    }

    // ==================== Construction and lookups ====================

    /// Build an element from a local value, checking kind, virtuality and bounds.
    pub fn create_element(&self, id: ParamId, tag: Tag, value: Value) -> Result<ParamElement> {
        let result = self.registry.concrete_descriptor(id).and_then(|desc| {
            validate::validate(desc, &value)?;
            let mut element = ParamElement::new(id, value).with_tag(tag);
            if let Some(Value::Bag(members)) = element.value.as_mut() {
                for member in members.iter_mut() {
                    inherit::attach_field(self.registry, id, member);
                }
            }
            Ok(element)
        });
        record(result)
    }

    /// Default value of `id`, or `None` if it has none or is blacklisted.
    pub fn default_value(&self, id: ParamId, blacklist: Option<&Blacklist>) -> Result<Option<Value>> {
        if blacklist.is_some_and(|b| b.contains_tag(id, Tag::DEFAULT)) {
            return Ok(None);
        }
        let result = self.registry.concrete_descriptor(id).and_then(|desc| match desc.default {
            Some(text) => {
                let value = self.parse_value(id, desc, text, 0)?;
                validate::validate(desc, &value)?;
                Ok(Some(value))
            }
            None => Ok(None),
        });
        record(result)
    }

    /// Member of bag `element` filling the field called `name`.
    pub fn bag_field<'e>(&self, element: &'e ParamElement, name: &str) -> Option<&'e ParamElement> {
        let field = inherit::field_by_name(self.registry, element.id, name)?;
        element.bag()?.find_field(field.context, field.index)
    }

    /// Structural check of a bag element against its field table.
    pub fn check_bag(&self, element: &ParamElement) -> Result<()> {
        let result = match element.bag() {
            Some(members) => validate::check_bag(self.registry, element.id, members).map_err(|diags| {
                let text: Vec<String> = diags.iter().map(ToString::to_string).collect();
                Error::FailedOperation(text.join("; "))
            }),
            None => Err(Error::InvalidParameter(format!("{} is not a bag", element.id))),
        };
        record(result)
    }
}

fn unknown_key(key: &str) -> Error {
    Error::FailedOperation(format!("unknown parameter {:?}", key))
}

fn copy_truncated(packed: &str, buf: &mut [u8]) -> usize {
    let n = packed.len().min(buf.len());
    buf[..n].copy_from_slice(&packed.as_bytes()[..n]);
    packed.len()
}

fn write_int(out: &mut String, kind: ValueKind, n: i128) -> Result<()> {
    if kind.packs_hex() {
        write!(out, "0x{:x}", n)?;
    } else {
        write!(out, "{}", n)?;
    }
    Ok(())
}

fn write_array(
    out: &mut String,
    count: usize,
    width: usize,
    fill: impl Fn(usize, &mut [u8]),
) -> Result<()> {
    out.try_reserve(8 + count * width * 2)?;
    write!(out, "{:08x}", count)?;
    let mut buf = [0u8; 4];
    for i in 0..count {
        fill(i, &mut buf[..width]);
        for b in &buf[..width] {
            write!(out, "{:02x}", b)?;
        }
    }
    Ok(())
}

fn read_array(text: &str, width: usize) -> Result<Vec<u8>, String> {
    let (count, body) = parser::parse_hex_blob(text).map_err(|e| e.to_string())?;
    if body.len() != count * width * 2 {
        return Err(format!(
            "declared {} elements, found {} hex digits",
            count,
            body.len()
        ));
    }
    body.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| "bad hex digit".to_string())
        })
        .collect()
}

fn write_tuple_key(out: &mut String, key: &str, extra: &[char]) {
    let mut stops = vec![':', '/'];
    stops.extend_from_slice(extra);
    parser::write_string(out, key, &stops);
}

/// Split `key<sep>rest`; returns the key and the text after the separator.
fn read_tuple_key(text: &str, sep: char) -> Result<(String, &str)> {
    let (key, rest) = parser::read_string(text, &[sep])?;
    let rest = rest
        .strip_prefix(sep)
        .ok_or_else(|| Error::FailedOperation(format!("missing {:?} in tuple", sep)))?;
    Ok((key, rest))
}

/// A string that must span all of `text`.
fn read_whole_string(text: &str) -> Result<String> {
    let (s, rest) = parser::read_string(text, &[])?;
    if !rest.trim().is_empty() {
        return Err(Error::FailedOperation(format!("trailing text after string: {:?}", rest)));
    }
    Ok(s)
}
