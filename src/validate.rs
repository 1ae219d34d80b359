//! Value validation against descriptors: bounds, enum membership, named ranges, and bag
//! structure.

use crate::descriptor::{BagField, Descriptor, Occurrence};
use crate::element::ParamList;
use crate::error::{Error, Result};
use crate::id::ParamId;
use crate::inherit;
use crate::registry::Registry;
use crate::value::Value;
use std::fmt;

/// Check `value` against `desc`. Kinds must already agree.
pub fn validate(desc: &Descriptor, value: &Value) -> Result<()> {
    if value.kind() != desc.kind {
        return Err(Error::InvalidParameter(format!(
            "{}: expected {}, got {}",
            desc.name,
            desc.kind,
            value.kind()
        )));
    }
    if let Some(n) = value.as_i128() {
        return check_integral(desc, n);
    }
    if let Some(len) = value.length() {
        let len = len as i128;
        if desc.min.is_some_and(|m| len < m as i128) || desc.max.is_some_and(|m| len > m as i128) {
            return Err(Error::FailedOperation(format!(
                "{}: length {} outside {}",
                desc.name,
                len,
                bounds_text(desc)
            )));
        }
    }
    Ok(())
}

fn check_integral(desc: &Descriptor, n: i128) -> Result<()> {
    if desc.min.is_some_and(|m| n < m as i128) || desc.max.is_some_and(|m| n > m as i128) {
        return Err(Error::FailedOperation(format!(
            "{}: {} outside {}",
            desc.name,
            n,
            bounds_text(desc)
        )));
    }
    let in_range = desc.ranges.iter().any(|r| r.contains(n));
    if desc.kind.is_enum() {
        let member = desc.enums.iter().any(|e| e.value as i128 == n);
        if (!desc.enums.is_empty() || !desc.ranges.is_empty()) && !member && !in_range {
            return Err(Error::FailedOperation(format!(
                "{}: {} is not a known value",
                desc.name, n
            )));
        }
    } else if !desc.ranges.is_empty() && !in_range {
        return Err(Error::FailedOperation(format!(
            "{}: {} in no declared range",
            desc.name, n
        )));
    }
    Ok(())
}

fn bounds_text(desc: &Descriptor) -> String {
    let side = |b: Option<i64>| b.map_or_else(|| "*".to_string(), |v| v.to_string());
    format!("[{}, {}]", side(desc.min), side(desc.max))
}

/// Range a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMatch {
    Named(&'static str),
    /// Index of an unnamed range in the descriptor's range table.
    Anonymous(usize),
}

/// Which declared range holds `value`; `None` when no range matches or the value is not integral.
pub fn value_get_range_id(desc: &Descriptor, value: &Value) -> Option<RangeMatch> {
    let n = value.as_i128()?;
    desc.ranges
        .iter()
        .enumerate()
        .find(|(_, r)| r.contains(n))
        .map(|(i, r)| match r.name {
            Some(name) => RangeMatch::Named(name),
            None => RangeMatch::Anonymous(i),
        })
}

/// Structural problem with one bag field or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Duplicate { found: usize },
    TooFew { found: usize, min: usize },
    TooMany { found: usize, max: usize },
    /// A member that fills no declared field.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Declared field name; `None` for unrecognized members.
    pub field: Option<&'static str>,
    pub id: ParamId,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = self.field.unwrap_or("<member>");
        match &self.problem {
            FieldProblem::Missing => write!(f, "{}: missing", who),
            FieldProblem::Duplicate { found } => write!(f, "{}: present {} times", who, found),
            FieldProblem::TooFew { found, min } => {
                write!(f, "{}: {} present, at least {} required", who, found, min)
            }
            FieldProblem::TooMany { found, max } => {
                write!(f, "{}: {} present, at most {} allowed", who, found, max)
            }
            FieldProblem::Unrecognized => write!(f, "{}: unrecognized member {}", who, self.id),
        }
    }
}

/// Check the members of a bag of kind `bag` against its field table.
pub fn check_bag(
    registry: &Registry,
    bag: ParamId,
    members: &ParamList,
) -> Result<(), Vec<FieldDiagnostic>> {
    let fields: &[BagField] = registry.descriptor(bag).map(|d| d.fields).unwrap_or_default();
    let mut out = Vec::new();
    for field in fields {
        let found = members
            .iter()
            .filter(|m| inherit::fills(registry, m.id, field.id))
            .count();
        let problem = match field.occurrence {
            Occurrence::Mandatory if found == 0 => Some(FieldProblem::Missing),
            Occurrence::Mandatory | Occurrence::Optional if found > 1 => {
                Some(FieldProblem::Duplicate { found })
            }
            Occurrence::Array { min, .. } if found < min => {
                Some(FieldProblem::TooFew { found, min })
            }
            Occurrence::Array { max, .. } if found > max => {
                Some(FieldProblem::TooMany { found, max })
            }
            _ => None,
        };
        if let Some(problem) = problem {
            out.push(FieldDiagnostic {
                field: Some(field.name),
                id: field.id,
                problem,
            });
        }
    }
    for m in members {
        if !fields.iter().any(|f| inherit::fills(registry, m.id, f.id)) {
            out.push(FieldDiagnostic {
                field: None,
                id: m.id,
                problem: FieldProblem::Unrecognized,
            });
        }
    }
    if out.is_empty() {
        Ok(())
    } else {
        Err(out)
    }
}
