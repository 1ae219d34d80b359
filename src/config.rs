//! Config files: packed elements one per line, `#` comments, blacklist filtering.
//!
//! Loading is lenient about keys: entries naming unknown or blacklisted parameters are
//! dropped (and logged) while the rest of the file is kept. Malformed keys and values still fail.

use crate::blacklist::{self, Blacklist};
use crate::codec::{Codec, UnpackPolicy};
use crate::element::{ParamElement, ParamList};
use crate::error::Result;
use std::path::Path;
use tracing::debug;

const LINE: char = '\n';

fn line_codec<'r>(codec: &Codec<'r>) -> Codec<'r> {
    Codec::with_options(codec.registry(), codec.options().delimiter(LINE))
}

/// Cut a line at the first `#` outside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => in_quote = !in_quote,
            '#' if !in_quote => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse config text. Keys without a prefix resolve in `default_set`.
pub fn load(
    codec: &Codec<'_>,
    text: &str,
    default_set: u16,
    blacklist: Option<&Blacklist>,
) -> Result<ParamList> {
    let body: Vec<&str> = text.lines().map(strip_comment).collect();
    let list = line_codec(codec).unpack_list_with(
        &body.join("\n"),
        default_set,
        blacklist,
        UnpackPolicy::Lenient,
    )?;
    debug!(count = list.len(), "config loaded");
    Ok(list)
}

/// Render `list` one element per line, in list order.
pub fn write(codec: &Codec<'_>, list: &ParamList) -> Result<String> {
    let mut out = line_codec(codec).pack_list(list)?;
    if !out.is_empty() {
        out.push(LINE);
    }
    Ok(out)
}

/// Defaults of every configurable parameter in `set_id` that declares one.
pub fn defaults(codec: &Codec<'_>, set_id: u16, blacklist: Option<&Blacklist>) -> Result<ParamList> {
    let registry = codec.registry();
    let mut list = ParamList::new();
    let Some(set) = registry.set(set_id) else {
        return Ok(list);
    };
    for index in 0..set.len() {
        let Some(id) = set.index_to_id(index) else {
            continue;
        };
        if !blacklist::allow_config(registry, id, blacklist) {
            continue;
        }
        if let Some(value) = codec.default_value(id, blacklist)? {
            list.append(ParamElement::new(id, value));
        }
    }
    Ok(list)
}

/// Overlay `overrides` on `base`: each override replaces any element with the same
/// identifier and tag.
pub fn merge(base: &mut ParamList, overrides: ParamList) {
    for element in overrides {
        while let Some((pos, _)) = base.find_next(element.id, Some(element.tag()), 0) {
            base.remove(pos);
        }
        base.append(element);
    }
}

pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn write_file(path: impl AsRef<Path>, text: &str) -> Result<()> {
    Ok(std::fs::write(path, text)?)
}

pub fn load_file(
    codec: &Codec<'_>,
    path: impl AsRef<Path>,
    default_set: u16,
    blacklist: Option<&Blacklist>,
) -> Result<ParamList> {
    let text = read_file(path)?;
    load(codec, &text, default_set, blacklist)
}

pub fn save_file(codec: &Codec<'_>, path: impl AsRef<Path>, list: &ParamList) -> Result<()> {
    write_file(path, &write(codec, list)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_outside_quotes_only() {
        assert_eq!(strip_comment("a=1 # note"), "a=1 ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment(r#"s="x # y" # tail"#), r#"s="x # y" "#);
        assert_eq!(strip_comment(r##"s="q\"#" #t"##), r##"s="q\"#" "##);
    }
}
