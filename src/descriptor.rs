//! Static parameter descriptors.
//!
//! Descriptor tables are produced ahead of time (normally by a schema compiler) and are
//! immutable for the life of the process. Every table is `&'static` so generated code can
//! declare whole parameter sets as `static` items:
//!
//! ```ignore
//! static PARAMS: [Descriptor; 2] = [
//!     Descriptor::new("rate", ValueKind::UInt16).bounds(1, 1000).default("0x64"),
//!     Descriptor::new("mode", ValueKind::Enum8).enums(&MODES),
//! ];
//! static SET: DescriptorSet = DescriptorSet::new(7, "radio", &PARAMS);
//! ```

use crate::id::ParamId;
use crate::kind::ValueKind;

/// One `(name, value)` entry of an enumerated-value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: &'static str,
    pub value: i64,
}

impl EnumEntry {
    pub const fn new(name: &'static str, value: i64) -> Self {
        EnumEntry { name, value }
    }
}

/// Inclusive integer range, optionally named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry {
    pub name: Option<&'static str>,
    pub min: i64,
    pub max: i64,
}

impl RangeEntry {
    pub const fn named(name: &'static str, min: i64, max: i64) -> Self {
        RangeEntry { name: Some(name), min, max }
    }

    pub const fn anonymous(min: i64, max: i64) -> Self {
        RangeEntry { name: None, min, max }
    }

    pub fn contains(&self, v: i128) -> bool {
        (self.min as i128) <= v && v <= (self.max as i128)
    }
}

/// How often a bag field may occur among the bag's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Mandatory,
    Optional,
    Array { min: usize, max: usize },
}

/// One entry of a bag's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagField {
    pub name: &'static str,
    pub index: u16,
    /// Identifier members must carry (or derive from) to fill this field.
    pub id: ParamId,
    /// Bag kind that declared the field; differs from the owning bag for inherited fields.
    pub context: ParamId,
    pub occurrence: Occurrence,
}

impl BagField {
    pub const fn new(name: &'static str, index: u16, id: ParamId, context: ParamId) -> Self {
        BagField {
            name,
            index,
            id,
            context,
            occurrence: Occurrence::Mandatory,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.occurrence = Occurrence::Optional;
        self
    }

    pub const fn array(mut self, min: usize, max: usize) -> Self {
        self.occurrence = Occurrence::Array { min, max };
        self
    }
}

/// Which operations a parameter permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub get: bool,
    pub set: bool,
    pub config: bool,
}

impl Access {
    pub const ALL: Access = Access { get: true, set: true, config: true };
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub name: &'static str,
    pub kind: ValueKind,
    /// Abstract parameter usable only as an inheritance anchor.
    pub is_virtual: bool,
    pub access: Access,
    /// Default value in packed text form.
    pub default: Option<&'static str>,
    /// Numeric bound, or length bound for strings, arrays, tuple keys and bags.
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub enums: &'static [EnumEntry],
    pub ranges: &'static [RangeEntry],
    pub fields: &'static [BagField],
    pub children: &'static [ParamId],
    pub description: Option<&'static str>,
}

impl Descriptor {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Descriptor {
            name,
            kind,
            is_virtual: false,
            access: Access::ALL,
            default: None,
            min: None,
            max: None,
            enums: &[],
            ranges: &[],
            fields: &[],
            children: &[],
            description: None,
        }
    }

    pub const fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub const fn access(mut self, get: bool, set: bool, config: bool) -> Self {
        self.access = Access { get, set, config };
        self
    }

    pub const fn default(mut self, packed: &'static str) -> Self {
        self.default = Some(packed);
        self
    }

    pub const fn bounds(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub const fn enums(mut self, table: &'static [EnumEntry]) -> Self {
        self.enums = table;
        self
    }

    pub const fn ranges(mut self, table: &'static [RangeEntry]) -> Self {
        self.ranges = table;
        self
    }

    pub const fn fields(mut self, table: &'static [BagField]) -> Self {
        self.fields = table;
        self
    }

    pub const fn children(mut self, ids: &'static [ParamId]) -> Self {
        self.children = ids;
        self
    }

    pub const fn describe(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }

    pub fn enum_name(&self, value: i64) -> Option<&'static str> {
        self.enums.iter().find(|e| e.value == value).map(|e| e.name)
    }

    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.enums.iter().find(|e| e.name == name).map(|e| e.value)
    }

    pub fn field_by_index(&self, index: u16) -> Option<&'static BagField> {
        self.fields.iter().find(|f| f.index == index)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static BagField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A parameter set: a namespace of descriptors sharing a prefix.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorSet {
    pub id: u16,
    pub prefix: &'static str,
    pub descriptors: &'static [Descriptor],
    /// Set whose names this set imports.
    pub parent: Option<u16>,
}

impl DescriptorSet {
    pub const fn new(id: u16, prefix: &'static str, descriptors: &'static [Descriptor]) -> Self {
        DescriptorSet {
            id,
            prefix,
            descriptors,
            parent: None,
        }
    }

    pub const fn extends(mut self, parent: u16) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Identifier of the descriptor at `index` (0-based), virtual flag included.
    pub fn index_to_id(&self, index: usize) -> Option<ParamId> {
        let d = self.descriptors.get(index)?;
        Some(ParamId::encode(d.is_virtual, self.id, (index + 1) as u16))
    }

    pub fn descriptor(&self, id: ParamId) -> Option<&'static Descriptor> {
        if id.paramset() != self.id || id.type_index() == 0 {
            return None;
        }
        self.descriptors.get(id.type_index() as usize - 1)
    }

    pub fn name_to_id(&self, name: &str) -> Option<ParamId> {
        let index = self.descriptors.iter().position(|d| d.name == name)?;
        self.index_to_id(index)
    }
}
