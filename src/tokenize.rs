//! Split delimited `key=value` buffers into pairs.
//!
//! The splitter understands just enough of the packed grammar to find element boundaries:
//! delimiters inside `{...}` or inside `"..."` do not split, and an escape character before
//! a top-level delimiter makes it literal. Escapes inside braces are kept for the nested
//! split. Values are otherwise passed through untouched so that per-kind unpacking sees
//! quotes and nested bags verbatim.

use crate::error::{Error, Result};

/// Split `buf` into `(key, value)` pairs.
///
/// Keys and values are trimmed; empty segments are skipped; a segment without `eq` yields an
/// empty value. Unterminated quotes or unbalanced braces fail the whole buffer.
pub fn split_args(buf: &str, eq: char, delim: char, esc: char) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut in_quote = false;
    let mut depth = 0usize;
    let mut chars = buf.chars();

    let mut finish = |key: &mut String, value: &mut String, in_value: &mut bool| -> Result<()> {
        let k = key.trim();
        let v = value.trim();
        if k.is_empty() {
            if *in_value || !v.is_empty() {
                return Err(Error::FailedOperation(format!("missing key before {:?}", v)));
            }
        } else {
            pairs.push((k.to_string(), v.to_string()));
        }
        key.clear();
        value.clear();
        *in_value = false;
        Ok(())
    };

    while let Some(c) = chars.next() {
        let target = if in_value { &mut value } else { &mut key };
        if in_quote {
            target.push(c);
            if c == esc {
                if let Some(n) = chars.next() {
                    target.push(n);
                }
            } else if c == '"' {
                in_quote = false;
            }
            continue;
        }
        match c {
            _ if c == esc => match chars.next() {
                Some(n) if n == delim && depth == 0 => target.push(n),
                Some(n) => {
                    target.push(c);
                    target.push(n);
                }
                None => target.push(c),
            },
            '"' => {
                in_quote = true;
                target.push(c);
            }
            '{' => {
                depth += 1;
                target.push(c);
            }
            '}' => {
                if depth == 0 {
                    return Err(Error::FailedOperation("unbalanced '}'".to_string()));
                }
                depth -= 1;
                target.push(c);
            }
            _ if c == delim && depth == 0 => finish(&mut key, &mut value, &mut in_value)?,
            _ if c == eq && !in_value && depth == 0 => in_value = true,
            _ => target.push(c),
        }
    }
    if in_quote {
        return Err(Error::FailedOperation("unterminated quote".to_string()));
    }
    if depth != 0 {
        return Err(Error::FailedOperation("unbalanced '{'".to_string()));
    }
    finish(&mut key, &mut value, &mut in_value)?;
    Ok(pairs)
}
