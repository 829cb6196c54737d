//! Structmap lookup (spec.md §4.5.2), dispatching on layout.

use crate::arena::{Arena, Offset};
use crate::term::Term;

use super::node::{fragment, CondensedNodeRepr, HeaderRepr, SparseNodeRepr, L, LAYOUT_SPARSE, SLOT_CHILD, SLOT_VALUE};

#[must_use]
pub fn get(arena: &Arena, h: HeaderRepr, key: u64) -> Option<Term> {
    if h.height < 64 && (key >> (h.height * L)) != 0 {
        return None;
    }
    let mut offset = h.root;
    let mut level = h.height - 1;
    loop {
        let frag = fragment(key, level);
        let slot = if h.layout == LAYOUT_SPARSE {
            let node: SparseNodeRepr = arena.read(offset);
            node.slots[frag]
        } else {
            let node: CondensedNodeRepr = arena.read(offset);
            node.slot_at(arena, frag)?
        };
        if level == 0 {
            return (slot.tag == SLOT_VALUE).then_some(slot.value);
        }
        if slot.tag != SLOT_CHILD {
            return None;
        }
        offset = slot.child;
        level -= 1;
    }
}
