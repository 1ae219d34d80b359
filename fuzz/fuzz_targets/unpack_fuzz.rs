//! Unpack fuzz target: feed arbitrary text to the list unpacker.
//! Unpack must not panic; whatever it accepts must pack and unpack to the same list.
//! Build with: cargo fuzz run unpack_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;
#[cfg(fuzzing)]
use paramwire::{BagField, Codec, Descriptor, DescriptorSet, EnumEntry, ParamId, Registry, ValueKind};

#[cfg(fuzzing)]
const fn id(type_index: u16) -> ParamId {
    ParamId::encode(false, 1, type_index)
}

#[cfg(fuzzing)]
static MODES: [EnumEntry; 2] = [EnumEntry::new("on", 1), EnumEntry::new("off", 0)];

#[cfg(fuzzing)]
static BAG_FIELDS: [BagField; 1] = [BagField::new("n", 0, id(1), id(7)).array(0, 8)];

#[cfg(fuzzing)]
static FUZZ_PARAMS: [Descriptor; 7] = [
    Descriptor::new("n", ValueKind::Int32),
    Descriptor::new("u", ValueKind::UInt16).bounds(0, 1000),
    Descriptor::new("s", ValueKind::String),
    Descriptor::new("m", ValueKind::UEnum8).enums(&MODES),
    Descriptor::new("a", ValueKind::UInt16Array),
    Descriptor::new("t", ValueKind::StringUInt8),
    Descriptor::new("b", ValueKind::Bag).fields(&BAG_FIELDS),
];

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let mut registry = Registry::new();
    if registry.init(DescriptorSet::new(1, "f", &FUZZ_PARAMS)).is_err() {
        return;
    }
    let codec = Codec::new(&registry);
    if let Ok(list) = codec.unpack_list(s, 1, None) {
        let packed = codec.pack_list(&list).expect("accepted input packs");
        let again = codec.unpack_list(&packed, 1, None).expect("packed output unpacks");
        assert_eq!(again, list);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run unpack_fuzz");
}
