//! Blacklists: identifier sets excluded from get/set/config operations, unpack and defaults.

use crate::element::{ParamElement, ParamList};
use crate::error::{Error, Result};
use crate::id::{ParamId, Tag};
use crate::parser;
use crate::registry::Registry;
use tracing::warn;

/// Identifiers excluded from an operation. Entries added without a tag block every tag of
/// their identifier; tagged entries block that one instance only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blacklist {
    any_tag: ParamList,
    tagged: ParamList,
}

impl Blacklist {
    pub fn new() -> Self {
        Blacklist::default()
    }

    /// Every element of `list` blocks its identifier under any tag.
    pub fn from_list(list: ParamList) -> Self {
        Blacklist {
            any_tag: list,
            tagged: ParamList::new(),
        }
    }

    pub fn add(&mut self, id: ParamId) {
        self.any_tag.append(ParamElement::bare(id));
    }

    pub fn add_tagged(&mut self, id: ParamId, tag: Tag) {
        self.tagged.append(ParamElement::bare(id).with_tag(tag));
    }

    /// Whether `id` is blocked under every tag.
    pub fn contains(&self, id: ParamId) -> bool {
        self.any_tag.contains(id)
    }

    /// Whether the instance `(id, tag)` is blocked, by an untagged or an exact entry.
    pub fn contains_tag(&self, id: ParamId, tag: Tag) -> bool {
        self.contains(id) || self.tagged.find_tag(id, tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.any_tag.len() + self.tagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.any_tag.is_empty() && self.tagged.is_empty()
    }

    /// Parse the blacklist file format: one `[prefix.]name[tag]` per line, `#` comments.
    /// Unknown names are skipped with a warning.
    pub fn parse(registry: &Registry, text: &str, default_set: u16) -> Result<Blacklist> {
        let mut out = Blacklist::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let key = parser::parse_key(line)?;
            let set = match key.prefix {
                Some(p) => match registry.prefix_to_set_id(p) {
                    Some(s) => s,
                    None => {
                        warn!(line = line_no + 1, prefix = p, "blacklist: unknown paramset");
                        continue;
                    }
                },
                None => default_set,
            };
            let Some(id) = registry.name_to_id(set, key.name) else {
                warn!(line = line_no + 1, name = key.name, "blacklist: unknown parameter");
                continue;
            };
            match key.tag {
                Some(t) => {
                    let t: i64 = t
                        .parse()
                        .map_err(|_| Error::FailedOperation(format!("bad tag {:?}", t)))?;
                    out.add_tagged(id, Tag::new(t)?);
                }
                None => out.add(id),
            }
        }
        Ok(out)
    }
}

fn permitted(
    registry: &Registry,
    id: ParamId,
    blacklist: Option<&Blacklist>,
    op: impl Fn(&crate::descriptor::Access) -> bool,
) -> bool {
    if id.is_virtual() || blacklist.is_some_and(|b| b.contains(id)) {
        return false;
    }
    match registry.descriptor(id) {
        Some(d) => !d.is_virtual && op(&d.access),
        None => false,
    }
}

pub fn allow_get(registry: &Registry, id: ParamId, blacklist: Option<&Blacklist>) -> bool {
    permitted(registry, id, blacklist, |a| a.get)
}

pub fn allow_set(registry: &Registry, id: ParamId, blacklist: Option<&Blacklist>) -> bool {
    permitted(registry, id, blacklist, |a| a.set)
}

pub fn allow_config(registry: &Registry, id: ParamId, blacklist: Option<&Blacklist>) -> bool {
    permitted(registry, id, blacklist, |a| a.config)
}
