//! Parameter sets shared by the integration tests.
//!
//! `test` (id 1) covers every value kind plus bags, ranges and a virtual base;
//! `ext` (id 2) extends `test` with a bag that inherits fields from `test.mybag`.

#![allow(dead_code)]

use paramwire::{
    BagField, Codec, Descriptor, DescriptorSet, EnumEntry, ParamElement, ParamId, RangeEntry,
    Registry, ValueKind,
};

pub const TEST: u16 = 1;
pub const EXT: u16 = 2;

const fn t(type_index: u16) -> ParamId {
    ParamId::encode(false, TEST, type_index)
}

pub const MYUINT8: ParamId = t(1);
pub const MYINT8: ParamId = t(2);
pub const MYINT16: ParamId = t(3);
pub const MYINT32: ParamId = t(4);
pub const MYINT64: ParamId = t(5);
pub const MYUINT16: ParamId = t(6);
pub const MYUINT32: ParamId = t(7);
pub const MYUINT64: ParamId = t(8);
pub const MYENUM: ParamId = t(9);
pub const MYUENUM: ParamId = t(10);
pub const MYBOOL: ParamId = t(11);
pub const MYBOOL32: ParamId = t(12);
pub const MYSTRING: ParamId = t(13);
pub const MYWSTRING: ParamId = t(14);
pub const MYBYTES: ParamId = t(15);
pub const MYWORDS: ParamId = t(16);
pub const MYDWORDS: ParamId = t(17);
pub const MYKV: ParamId = t(18);
pub const MYKINT: ParamId = t(19);
pub const MYKUINT: ParamId = t(20);
pub const MYKBYTE: ParamId = t(21);
pub const MYADDR: ParamId = t(22);
pub const MYBAG: ParamId = t(23);
pub const MYRANGE: ParamId = t(24);
pub const SHAPE: ParamId = ParamId::encode(true, TEST, 25);
pub const CIRCLE: ParamId = t(26);
pub const SQUARE: ParamId = t(27);
pub const SHAPEBAG: ParamId = t(28);
pub const READONLY: ParamId = t(29);
pub const ANYBAG: ParamId = t(30);
pub const MYENUM16: ParamId = t(31);
pub const MYENUM32: ParamId = t(32);
pub const MYUENUM8: ParamId = t(33);
pub const MYUENUM32: ParamId = t(34);

pub const EXTBAG: ParamId = ParamId::encode(false, EXT, 1);
pub const EXTRA: ParamId = ParamId::encode(false, EXT, 2);

static COLORS: [EnumEntry; 3] = [
    EnumEntry::new("red", 1),
    EnumEntry::new("green", 2),
    EnumEntry::new("blue", -3),
];

static MODES: [EnumEntry; 3] = [
    EnumEntry::new("off", 0),
    EnumEntry::new("auto", 0x10),
    EnumEntry::new("manual", 0x20),
];

static LEVELS16: [EnumEntry; 3] = [
    EnumEntry::new("lowest", i16::MIN as i64),
    EnumEntry::new("zero", 0),
    EnumEntry::new("highest", i16::MAX as i64),
];

static LEVELS32: [EnumEntry; 3] = [
    EnumEntry::new("lowest", i32::MIN as i64),
    EnumEntry::new("minus7", -7),
    EnumEntry::new("highest", i32::MAX as i64),
];

static FLAGS8: [EnumEntry; 3] = [
    EnumEntry::new("none", 0),
    EnumEntry::new("seven", 0x7),
    EnumEntry::new("all", u8::MAX as i64),
];

static FLAGS32: [EnumEntry; 3] = [
    EnumEntry::new("none", 0),
    EnumEntry::new("page", 0x100),
    EnumEntry::new("all", u32::MAX as i64),
];

static BANDS: [RangeEntry; 3] = [
    RangeEntry::named("low", 0, 9),
    RangeEntry::anonymous(20, 29),
    RangeEntry::named("high", 100, 199),
];

static BAG_FIELDS: [BagField; 3] = [
    BagField::new("myint", 0, MYINT32, MYBAG),
    BagField::new("mystr", 1, MYSTRING, MYBAG).optional(),
    BagField::new("flags", 2, MYBOOL, MYBAG).array(0, 3),
];

static SHAPE_FIELDS: [BagField; 1] = [BagField::new("shape", 0, SHAPE, SHAPEBAG)];

static SHAPE_CHILDREN: [ParamId; 2] = [CIRCLE, SQUARE];

pub static TEST_PARAMS: [Descriptor; 34] = [
    Descriptor::new("myuint8", ValueKind::UInt8)
        .bounds(0x5, 0x3f)
        .default("0x10")
        .describe("Bounded byte."),
    Descriptor::new("myint8", ValueKind::Int8),
    Descriptor::new("myint16", ValueKind::Int16),
    Descriptor::new("myint32", ValueKind::Int32),
    Descriptor::new("myint64", ValueKind::Int64),
    Descriptor::new("myuint16", ValueKind::UInt16),
    Descriptor::new("myuint32", ValueKind::UInt32),
    Descriptor::new("myuint64", ValueKind::UInt64),
    Descriptor::new("myenum", ValueKind::Enum8).enums(&COLORS).default("green"),
    Descriptor::new("myuenum", ValueKind::UEnum16).enums(&MODES),
    Descriptor::new("mybool", ValueKind::Bool),
    Descriptor::new("mybool32", ValueKind::Bool32),
    Descriptor::new("mystring", ValueKind::String).max(32).default("hello"),
    Descriptor::new("mywstring", ValueKind::WString),
    Descriptor::new("mybytes", ValueKind::UInt8Array).max(16),
    Descriptor::new("mywords", ValueKind::UInt16Array),
    Descriptor::new("mydwords", ValueKind::UInt32Array),
    Descriptor::new("mykv", ValueKind::StringString),
    Descriptor::new("mykint", ValueKind::StringInt32),
    Descriptor::new("mykuint", ValueKind::StringUInt32),
    Descriptor::new("mykbyte", ValueKind::StringUInt8),
    Descriptor::new("myaddr", ValueKind::Address),
    Descriptor::new("mybag", ValueKind::Bag).fields(&BAG_FIELDS),
    Descriptor::new("myrange", ValueKind::Int32).ranges(&BANDS),
    Descriptor::new("shape", ValueKind::Int32).virtual_().children(&SHAPE_CHILDREN),
    Descriptor::new("circle", ValueKind::Int32),
    Descriptor::new("square", ValueKind::Int32),
    Descriptor::new("shapebag", ValueKind::Bag).fields(&SHAPE_FIELDS),
    Descriptor::new("readonly", ValueKind::UInt8).access(true, false, false),
    Descriptor::new("anybag", ValueKind::Bag),
    Descriptor::new("myenum16", ValueKind::Enum16).enums(&LEVELS16),
    Descriptor::new("myenum32", ValueKind::Enum32).enums(&LEVELS32),
    Descriptor::new("myuenum8", ValueKind::UEnum8).enums(&FLAGS8),
    Descriptor::new("myuenum32", ValueKind::UEnum32).enums(&FLAGS32),
];

static EXT_FIELDS: [BagField; 3] = [
    BagField::new("myint", 0, MYINT32, MYBAG),
    BagField::new("mystr", 1, MYSTRING, MYBAG).optional(),
    BagField::new("extra", 2, EXTRA, EXTBAG),
];

pub static EXT_PARAMS: [Descriptor; 2] = [
    Descriptor::new("extbag", ValueKind::Bag).fields(&EXT_FIELDS),
    Descriptor::new("extra", ValueKind::UInt16),
];

pub static TEST_SET: DescriptorSet = DescriptorSet::new(TEST, "test", &TEST_PARAMS);
pub static EXT_SET: DescriptorSet = DescriptorSet::new(EXT, "ext", &EXT_PARAMS).extends(TEST);

pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.init(TEST_SET).expect("register test");
    registry.init(EXT_SET).expect("register ext");
    registry
}

/// Pack `element`, unpack the text again, and return the unpacked element.
pub fn round_trip(codec: &Codec<'_>, element: &ParamElement) -> ParamElement {
    let packed = codec.pack_element(element).expect("pack");
    let (key, value) = packed.split_once('=').expect("key=value");
    codec.unpack_element(key, value, TEST).expect("unpack")
}
