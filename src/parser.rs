//! Parse the lexical pieces of packed text using PEST, plus string quoting.

use crate::error::{Error, Result};
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "packed.pest"]
struct PackedParser;

/// Left-hand side of a packed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key<'a> {
    pub prefix: Option<&'a str>,
    pub name: &'a str,
    /// Raw tag digits, range-checked by the caller.
    pub tag: Option<&'a str>,
}

/// Parse `[prefix.]name[tag]`.
pub fn parse_key(source: &str) -> Result<Key<'_>> {
    let pairs = PackedParser::parse(Rule::key, source)
        .map_err(|e| Error::FailedOperation(format!("bad key {:?}: {}", source, e)))?;
    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| Error::FailedOperation("empty key".to_string()))?;
    let mut key = Key {
        prefix: None,
        name: "",
        tag: None,
    };
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::prefix => key.prefix = Some(inner.as_str()),
            Rule::name => key.name = inner.as_str(),
            Rule::tag => key.tag = Some(inner.as_str()),
            _ => {}
        }
    }
    Ok(key)
}

/// Whether `s` is usable as a paramset prefix or parameter name inside a key.
pub fn is_ident(s: &str) -> bool {
    PackedParser::parse(Rule::whole_ident, s).is_ok()
}

/// Parse a decimal or `0x` hex integer literal.
pub fn parse_int(source: &str) -> Result<i128> {
    let bad = || Error::FailedOperation(format!("not an integer: {:?}", source));
    let pairs = PackedParser::parse(Rule::int_literal, source).map_err(|_| bad())?;
    let lit = pairs
        .into_iter()
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(bad)?;
    match lit.as_rule() {
        Rule::hex_int => i128::from_str_radix(&lit.as_str()[2..], 16).map_err(|_| bad()),
        Rule::dec_int => lit.as_str().parse::<i128>().map_err(|_| bad()),
        _ => Err(bad()),
    }
}

/// Parse `<8 hex digit count><body>`; returns the declared element count and body digits.
pub fn parse_hex_blob(source: &str) -> Result<(usize, &str)> {
    let bad = |why: &str| Error::FailedOperation(format!("bad hex array {:?}: {}", source, why));
    let pairs = PackedParser::parse(Rule::hex_blob, source).map_err(|e| bad(&e.to_string()))?;
    let pair = pairs.into_iter().next().ok_or_else(|| bad("empty"))?;
    let mut count = 0usize;
    let mut body = "";
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::blob_len => {
                count = usize::from_str_radix(inner.as_str(), 16).map_err(|_| bad("length"))?
            }
            Rule::blob_body => body = inner.as_str(),
            _ => {}
        }
    }
    Ok((count, body))
}

/// Characters that force a string into quoted form.
const SPECIAL: &[char] = &[',', '{', '}', '"', '\\', '#', '\n', '\r'];

pub fn needs_quoting(s: &str, extra: &[char]) -> bool {
    s.trim() != s || s.contains(SPECIAL) || s.contains(extra)
}

/// Append `s` to `out`, quoting and escaping when it could be misread.
pub fn write_string(out: &mut String, s: &str, extra: &[char]) {
    if !needs_quoting(s, extra) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Read a string (quoted or raw) from the front of `source`.
///
/// A raw string runs up to the first character in `stop` (or the end); the returned rest
/// starts at that character. A quoted string ends at its closing quote.
pub fn read_string<'a>(source: &'a str, stop: &[char]) -> Result<(String, &'a str)> {
    let Some(quoted) = source.strip_prefix('"') else {
        let end = source.find(stop).unwrap_or(source.len());
        return Ok((source[..end].to_string(), &source[end..]));
    };
    let mut out = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((out, &quoted[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(Error::FailedOperation(format!("unterminated string {:?}", source)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_forms() {
        let k = parse_key("test.myuint8[12]").unwrap();
        assert_eq!(k.prefix, Some("test"));
        assert_eq!(k.name, "myuint8");
        assert_eq!(k.tag, Some("12"));

        let k = parse_key("myuint8").unwrap();
        assert_eq!(k.prefix, None);
        assert_eq!(k.name, "myuint8");
        assert_eq!(k.tag, None);

        assert_eq!(parse_key("a[-1]").unwrap().tag, Some("-1"));
        assert!(parse_key("a[x]").is_err());
        assert!(parse_key("a.b.c").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(is_ident("myuint8"));
        assert!(is_ident("_x-1"));
        assert!(!is_ident("my rate"));
        assert!(!is_ident("1x"));
        assert!(!is_ident("a.b"));
        assert!(!is_ident(""));
    }

    #[test]
    fn int_literals() {
        assert_eq!(parse_int("0x40").unwrap(), 64);
        assert_eq!(parse_int("-12").unwrap(), -12);
        assert_eq!(parse_int("+7").unwrap(), 7);
        assert!(parse_int("0x").is_err());
        assert!(parse_int("12a").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn hex_blob() {
        assert_eq!(parse_hex_blob("00000002beef").unwrap(), (2, "beef"));
        assert_eq!(parse_hex_blob("00000000").unwrap(), (0, ""));
        assert!(parse_hex_blob("0002be").is_err());
        assert!(parse_hex_blob("00000001zz").is_err());
    }

    #[test]
    fn quoting_round_trip() {
        for s in ["plain", " padded ", "a,b", "{x}", "say \"hi\"", "back\\slash", "two\nlines"] {
            let mut out = String::new();
            write_string(&mut out, s, &[]);
            let (back, rest) = read_string(&out, &[]).unwrap();
            assert_eq!(back, s);
            assert!(rest.is_empty());
        }
        let mut out = String::new();
        write_string(&mut out, "plain", &[]);
        assert_eq!(out, "plain");
    }

    #[test]
    fn raw_string_stops() {
        let (k, rest) = read_string("key:value", &[':']).unwrap();
        assert_eq!(k, "key");
        assert_eq!(rest, ":value");
        assert!(read_string("\"open", &[]).is_err());
    }
}
