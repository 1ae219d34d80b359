//! Parameter elements and lists.
//!
//! A [`ParamList`] owns its elements outright; a bag value owns its member list, so a tree
//! of nested bags has exactly one owner per node. Lists are ordered: [`ParamList::insert`]
//! adds at the head, [`ParamList::append`] at the tail, and every search walks from the head.

use crate::error::Result;
use crate::id::{ParamId, Tag};
use crate::value::Value;
use std::collections::VecDeque;

/// One parameter instance: identifier, tag, optional value and its bag-field role.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamElement {
    pub id: ParamId,
    tag: Tag,
    /// Bag kind this element is a field of, or `UNDEFINED` for free-standing parameters.
    pub context: ParamId,
    /// Field index inside `context`.
    pub id_in_context: u16,
    pub value: Option<Value>,
}

impl ParamElement {
    pub fn new(id: ParamId, value: Value) -> Self {
        ParamElement {
            id,
            value: Some(value),
            ..Default::default()
        }
    }

    /// Element with identifier only, as used by blacklists.
    pub fn bare(id: ParamId) -> Self {
        ParamElement {
            id,
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Set the tag; values outside `0..=99` are rejected.
    pub fn set_tag(&mut self, tag: i64) -> Result<()> {
        self.tag = Tag::new(tag)?;
        Ok(())
    }

    pub fn is_field(&self) -> bool {
        self.context != ParamId::UNDEFINED
    }

    pub fn bag(&self) -> Option<&ParamList> {
        self.value.as_ref().and_then(Value::as_bag)
    }

    fn matches(&self, id: ParamId, tag: Option<Tag>) -> bool {
        (id == ParamId::UNDEFINED || self.id == id) && tag.map_or(true, |t| self.tag == t)
    }
}

/// Ordered, owning sequence of parameter elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamList {
    elements: VecDeque<ParamElement>,
}

impl ParamList {
    pub fn new() -> Self {
        ParamList::default()
    }

    /// Add at the head.
    pub fn insert(&mut self, element: ParamElement) {
        self.elements.push_front(element);
    }

    /// Add at the tail.
    pub fn append(&mut self, element: ParamElement) {
        self.elements.push_back(element);
    }

    /// Move every element of `other` to the tail of `self`.
    pub fn extend(&mut self, other: ParamList) {
        self.elements.extend(other.elements);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamElement> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParamElement> {
        self.elements.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&ParamElement> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ParamElement> {
        self.elements.get_mut(index)
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<ParamElement> {
        self.elements.remove(index)
    }

    /// Remove every element matching `id` (any tag); returns how many were removed.
    pub fn remove_all(&mut self, id: ParamId) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        before - self.elements.len()
    }

    /// Release every element and its owned value.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Membership test by identifier, ignoring tags.
    pub fn contains(&self, id: ParamId) -> bool {
        self.find(id).is_some()
    }

    /// First element with `id`, any tag.
    pub fn find(&self, id: ParamId) -> Option<&ParamElement> {
        self.iter().find(|e| e.matches(id, None))
    }

    pub fn find_mut(&mut self, id: ParamId) -> Option<&mut ParamElement> {
        self.iter_mut().find(|e| e.matches(id, None))
    }

    /// First element with exactly `tag`. `ParamId::UNDEFINED` matches any identifier.
    pub fn find_tag(&self, id: ParamId, tag: Tag) -> Option<&ParamElement> {
        self.iter().find(|e| e.matches(id, Some(tag)))
    }

    /// Next match at or after `start`, with its position. `tag: None` matches any tag.
    pub fn find_next(
        &self,
        id: ParamId,
        tag: Option<Tag>,
        start: usize,
    ) -> Option<(usize, &ParamElement)> {
        self.iter()
            .enumerate()
            .skip(start)
            .find(|(_, e)| e.matches(id, tag))
    }

    /// Every element with `id` in list order.
    pub fn find_all(&self, id: ParamId) -> Vec<&ParamElement> {
        self.iter().filter(|e| e.matches(id, None)).collect()
    }

    pub fn find_all_tag(&self, id: ParamId, tag: Tag) -> Vec<&ParamElement> {
        self.iter().filter(|e| e.matches(id, Some(tag))).collect()
    }

    pub fn param_count(&self, id: ParamId) -> usize {
        self.iter().filter(|e| e.matches(id, None)).count()
    }

    pub fn param_count_tag(&self, id: ParamId, tag: Tag) -> usize {
        self.iter().filter(|e| e.matches(id, Some(tag))).count()
    }

    /// Bag member filling field `index` of bag kind `context`.
    pub fn find_field(&self, context: ParamId, index: u16) -> Option<&ParamElement> {
        self.iter()
            .find(|e| e.context == context && e.id_in_context == index)
    }

    /// Tuple-valued element of `id` whose key is `key`, else the one keyed `wildcard`.
    pub fn find_tuple(&self, id: ParamId, key: &str, wildcard: &str) -> Option<&ParamElement> {
        let keyed = |k: &str| {
            self.iter().find(|e| {
                e.id == id && e.value.as_ref().and_then(Value::tuple_key) == Some(k)
            })
        };
        keyed(key).or_else(|| keyed(wildcard))
    }
}

impl IntoIterator for ParamList {
    type Item = ParamElement;
    type IntoIter = std::collections::vec_deque::IntoIter<ParamElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a ParamElement;
    type IntoIter = std::collections::vec_deque::Iter<'a, ParamElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<ParamElement> for ParamList {
    fn from_iter<I: IntoIterator<Item = ParamElement>>(iter: I) -> Self {
        ParamList {
            elements: iter.into_iter().collect(),
        }
    }
}
