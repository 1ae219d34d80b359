//! # paramwire: parameter marshalling and validation
//!
//! Typed parameters for exchanging configuration and control data between processes:
//! a parameter is an `(identifier, tag, value)` triple, parameters gather into lists,
//! and lists nest inside compound values ("bags"). Values convert between a local
//! representation ([`Value`]) and a canonical, human-readable packed text form.
//!
//! ## Pieces
//!
//! - **Descriptors**: static tables ([`DescriptorSet`]) describing each parameter's name,
//!   kind, bounds, enum names, ranges, bag fields and children.
//! - **Registry**: the sets known to a process ([`Registry`]), consulted by every operation.
//! - **Codec**: pack/unpack of elements and lists with validation ([`Codec`]).
//! - **Lists**: owned, ordered element sequences with tag, field and tuple-key search
//!   ([`ParamList`]).
//! - **Blacklists** and the **config file** layer.
//!
//! ## Packed text
//!
//! ```text
//! radio.rate=0x64,radio.mode=auto,radio.name="north, east",radio.peer[2]={radio.addr=0xa}
//! ```
//!
//! - Unsigned kinds pack as `0x` hex, signed kinds as decimal.
//! - Enums pack as their symbolic name when the value is known.
//! - Arrays pack as `<8 hex digit count><big-endian hex elements>`.
//! - Tuples pack as `key:value` (or `key/value` for the string/uint8 tuple).
//! - Bags pack as `{member,member}`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry.init(RADIO_SET)?;
//! let codec = Codec::new(&registry);
//! let list = codec.unpack_list("radio.rate=0x64,radio.mode=auto", RADIO_SET.id, None)?;
//! assert_eq!(codec.pack_list(&list)?, "radio.rate=0x64,radio.mode=auto");
//! ```

pub mod blacklist;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod dump;
pub mod element;
pub mod error;
pub mod id;
pub mod inherit;
pub mod kind;
pub mod parser;
pub mod registry;
pub mod tokenize;
pub mod validate;
pub mod value;

pub use blacklist::{allow_config, allow_get, allow_set, Blacklist};
pub use codec::{Codec, PackOptions, UnpackPolicy, MAX_BAG_DEPTH};
pub use descriptor::{Access, BagField, Descriptor, DescriptorSet, EnumEntry, Occurrence, RangeEntry};
pub use element::{ParamElement, ParamList};
pub use error::{last_error, Error, ErrorKind, Result};
pub use id::{ParamId, Tag};
pub use kind::ValueKind;
pub use registry::Registry;
pub use tokenize::split_args;
pub use validate::{check_bag, value_get_range_id, FieldDiagnostic, FieldProblem, RangeMatch};
pub use value::Value;
