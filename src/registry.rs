//! Registry of parameter sets.
//!
//! The registry is an explicit object handed to the [codec](crate::codec) rather than
//! process-wide state. Populate it once with [`Registry::init`] before sharing it; lookups
//! take `&self` and are safe to run from many threads at once.

use crate::descriptor::{Descriptor, DescriptorSet};
use crate::error::{Error, Result};
use crate::id::{ParamId, MAX_SET_ID, MAX_TYPE_INDEX};
use crate::kind::ValueKind;
use crate::parser;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    sets: BTreeMap<u16, DescriptorSet>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a parameter set. Fails on duplicate id or prefix and on malformed tables.
    pub fn init(&mut self, set: DescriptorSet) -> Result<()> {
        if set.id == 0 || set.id > MAX_SET_ID {
            return Err(Error::InvalidParameter(format!(
                "paramset id {} outside 1..={}",
                set.id, MAX_SET_ID
            )));
        }
        if self.sets.contains_key(&set.id) {
            return Err(Error::InvalidOperation(format!(
                "paramset {} already registered",
                set.id
            )));
        }
        if !parser::is_ident(set.prefix) {
            return Err(Error::InvalidParameter(format!(
                "invalid prefix {:?}",
                set.prefix
            )));
        }
        if self.sets.values().any(|s| s.prefix == set.prefix) {
            return Err(Error::InvalidOperation(format!(
                "prefix {:?} already registered",
                set.prefix
            )));
        }
        if let Some(parent) = set.parent {
            if !self.sets.contains_key(&parent) {
                return Err(Error::InvalidParameter(format!(
                    "paramset {} extends unregistered set {}",
                    set.id, parent
                )));
            }
        }
        if set.descriptors.len() > MAX_TYPE_INDEX as usize {
            return Err(Error::InvalidParameter(format!(
                "paramset {} has {} descriptors (max {})",
                set.id,
                set.descriptors.len(),
                MAX_TYPE_INDEX
            )));
        }
        let mut names = HashSet::new();
        for d in set.descriptors {
            if !names.insert(d.name) {
                return Err(Error::InvalidParameter(format!(
                    "{}.{} declared twice",
                    set.prefix, d.name
                )));
            }
            check_descriptor(set.prefix, d)?;
        }
        debug!(id = set.id, prefix = set.prefix, count = set.len(), "paramset registered");
        self.sets.insert(set.id, set);
        Ok(())
    }

    /// Drop every registered set.
    pub fn deinit(&mut self) {
        debug!(count = self.sets.len(), "registry cleared");
        self.sets.clear();
    }

    pub fn set(&self, set_id: u16) -> Option<&DescriptorSet> {
        self.sets.get(&set_id)
    }

    pub fn sets(&self) -> impl Iterator<Item = &DescriptorSet> {
        self.sets.values()
    }

    pub fn first_id(&self, set_id: u16) -> Option<ParamId> {
        self.set(set_id)?.index_to_id(0)
    }

    pub fn last_id(&self, set_id: u16) -> Option<ParamId> {
        let set = self.set(set_id)?;
        set.index_to_id(set.len().checked_sub(1)?)
    }

    pub fn num_parameters(&self, set_id: u16) -> Option<usize> {
        self.set(set_id).map(DescriptorSet::len)
    }

    pub fn index_to_id(&self, index: usize, set_id: u16) -> Option<ParamId> {
        self.set(set_id)?.index_to_id(index)
    }

    pub fn prefix_to_set_id(&self, prefix: &str) -> Option<u16> {
        self.sets.values().find(|s| s.prefix == prefix).map(|s| s.id)
    }

    pub fn set_id_to_prefix(&self, set_id: u16) -> Option<&'static str> {
        self.set(set_id).map(|s| s.prefix)
    }

    /// Descriptor of `id`, virtual or not.
    pub fn descriptor(&self, id: ParamId) -> Option<&'static Descriptor> {
        self.set(id.paramset())?.descriptor(id)
    }

    /// Descriptor of an instantiable (registered, non-virtual) identifier.
    pub fn concrete_descriptor(&self, id: ParamId) -> Result<&'static Descriptor> {
        if id.is_virtual() {
            return Err(Error::InvalidParameter(format!("{} is virtual", id)));
        }
        let d = self
            .descriptor(id)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown identifier {}", id)))?;
        if d.is_virtual {
            return Err(Error::InvalidParameter(format!("{} is virtual", d.name)));
        }
        Ok(d)
    }

    /// Resolve `name` in `set_id`, falling back through the set's parents.
    pub fn name_to_id(&self, set_id: u16, name: &str) -> Option<ParamId> {
        let mut current = Some(set_id);
        let mut hops = 0;
        while let Some(sid) = current {
            let set = self.set(sid)?;
            if let Some(id) = set.name_to_id(name) {
                return Some(id);
            }
            current = set.parent;
            hops += 1;
            if hops > self.sets.len() {
                return None;
            }
        }
        None
    }

    /// `prefix.name` of `id`.
    pub fn qualified_name(&self, id: ParamId) -> Option<String> {
        let set = self.set(id.paramset())?;
        let d = set.descriptor(id)?;
        Some(format!("{}.{}", set.prefix, d.name))
    }
}

fn check_descriptor(prefix: &str, d: &Descriptor) -> Result<()> {
    let malformed = |what: &str| Error::InvalidParameter(format!("{}.{}: {}", prefix, d.name, what));
    if !parser::is_ident(d.name) {
        return Err(malformed("invalid name"));
    }
    if let (Some(min), Some(max)) = (d.min, d.max) {
        if min > max {
            return Err(malformed("min above max"));
        }
    }
    if !d.enums.is_empty() && !d.kind.is_enum() {
        return Err(malformed("enum table on non-enum kind"));
    }
    if !d.ranges.is_empty() && !d.kind.is_integral() {
        return Err(malformed("ranges on non-integral kind"));
    }
    if !d.fields.is_empty() && d.kind != ValueKind::Bag {
        return Err(malformed("field table on non-bag kind"));
    }
    let mut ranges: Vec<_> = d.ranges.iter().collect();
    ranges.sort_by_key(|r| r.min);
    for r in &ranges {
        if r.min > r.max {
            return Err(malformed("inverted range"));
        }
    }
    if ranges.windows(2).any(|w| w[0].max >= w[1].min) {
        return Err(malformed("overlapping ranges"));
    }
    Ok(())
}
