//! Parent/child identifier relations and bag field lookup.

use crate::descriptor::BagField;
use crate::element::ParamElement;
use crate::id::ParamId;
use crate::registry::Registry;

/// Child `index` of `parent`'s children table.
pub fn child(registry: &Registry, parent: ParamId, index: usize) -> Option<ParamId> {
    registry.descriptor(parent)?.children.get(index).copied()
}

/// Whether `id` is reachable from `ancestor` through children tables. An identifier is not
/// its own child.
pub fn is_child_of(registry: &Registry, id: ParamId, ancestor: ParamId) -> bool {
    let mut stack = vec![ancestor];
    let mut seen = Vec::new();
    while let Some(current) = stack.pop() {
        let Some(d) = registry.descriptor(current) else {
            continue;
        };
        for &c in d.children {
            if c.concrete() == id.concrete() {
                return true;
            }
            if !seen.contains(&c) {
                seen.push(c);
                stack.push(c);
            }
        }
    }
    false
}

/// Whether `id` may fill a field declared with `field_id`.
pub fn fills(registry: &Registry, id: ParamId, field_id: ParamId) -> bool {
    id.concrete() == field_id.concrete() || is_child_of(registry, id, field_id)
}

/// Field of bag kind `bag` that an element with identifier `id` fills.
pub fn field_for(registry: &Registry, bag: ParamId, id: ParamId) -> Option<&'static BagField> {
    registry
        .descriptor(bag)?
        .fields
        .iter()
        .find(|f| fills(registry, id, f.id))
}

/// Field of bag kind `bag` at `index`.
pub fn field_by_index(registry: &Registry, bag: ParamId, index: u16) -> Option<&'static BagField> {
    registry.descriptor(bag)?.field_by_index(index)
}

/// Field of bag kind `bag` named `name`.
pub fn field_by_name(registry: &Registry, bag: ParamId, name: &str) -> Option<&'static BagField> {
    registry.descriptor(bag)?.field_by_name(name)
}

/// Record `element`'s role as a field of bag kind `bag`. Returns false (and leaves the
/// element free-standing) if the bag declares no matching field.
pub fn attach_field(registry: &Registry, bag: ParamId, element: &mut ParamElement) -> bool {
    match field_for(registry, bag, element.id) {
        Some(f) => {
            element.context = f.context;
            element.id_in_context = f.index;
            true
        }
        None => {
            element.context = ParamId::UNDEFINED;
            element.id_in_context = 0;
            false
        }
    }
}
