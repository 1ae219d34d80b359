//! Documentation dump of a parameter set: one commented block per configurable parameter,
//! followed by its default in packed form (or a commented-out key when it has none).

use crate::codec::Codec;
use crate::descriptor::{Descriptor, Occurrence};
use crate::element::ParamElement;
use crate::error::Result;
use crate::registry::Registry;
use std::fmt::Write;

/// Describe every configurable, non-virtual parameter of `set_id`.
pub fn describe(codec: &Codec<'_>, set_id: u16) -> Result<String> {
    let registry = codec.registry();
    let mut out = String::new();
    let Some(set) = registry.set(set_id) else {
        return Ok(out);
    };
    for (index, desc) in set.descriptors.iter().enumerate() {
        let Some(id) = set.index_to_id(index) else {
            continue;
        };
        if desc.is_virtual || !desc.access.config {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        describe_descriptor(&mut out, registry, desc)?;
        match codec.default_value(id, None)? {
            Some(value) => {
                let packed = codec.pack_element(&ParamElement::new(id, value))?;
                writeln!(out, "{}", packed)?;
            }
            None => writeln!(out, "# {}.{}=", set.prefix, desc.name)?,
        }
    }
    Ok(out)
}

fn describe_descriptor(out: &mut String, registry: &Registry, desc: &Descriptor) -> Result<()> {
    writeln!(out, "# {} ({})", desc.name, desc.kind)?;
    if let Some(text) = desc.description {
        for line in text.lines() {
            writeln!(out, "#   {}", line)?;
        }
    }
    if desc.min.is_some() || desc.max.is_some() {
        let side = |b: Option<i64>| b.map_or_else(|| "*".to_string(), |v| v.to_string());
        let what = if desc.kind.is_integral() { "range" } else { "length" };
        writeln!(out, "#   {}: [{}, {}]", what, side(desc.min), side(desc.max))?;
    }
    if !desc.enums.is_empty() {
        let values: Vec<String> = desc
            .enums
            .iter()
            .map(|e| format!("{}={}", e.name, e.value))
            .collect();
        writeln!(out, "#   values: {}", values.join(", "))?;
    }
    if !desc.ranges.is_empty() {
        let ranges: Vec<String> = desc
            .ranges
            .iter()
            .map(|r| match r.name {
                Some(n) => format!("{}=[{}, {}]", n, r.min, r.max),
                None => format!("[{}, {}]", r.min, r.max),
            })
            .collect();
        writeln!(out, "#   ranges: {}", ranges.join(", "))?;
    }
    for field in desc.fields {
        let occurs = match field.occurrence {
            Occurrence::Mandatory => "mandatory".to_string(),
            Occurrence::Optional => "optional".to_string(),
            Occurrence::Array { min, max } => format!("{}..{}", min, max),
        };
        let member = registry
            .qualified_name(field.id)
            .unwrap_or_else(|| field.id.to_string());
        writeln!(out, "#   field {} ({}): {}", field.name, occurs, member)?;
    }
    if !desc.access.get || !desc.access.set {
        let mut modes = Vec::new();
        if desc.access.get {
            modes.push("get");
        }
        if desc.access.set {
            modes.push("set");
        }
        modes.push("config");
        writeln!(out, "#   access: {}", modes.join(" "))?;
    }
    Ok(())
}
