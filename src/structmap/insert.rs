//! Structmap insertion (spec.md §4.5.3): heighten-then-descend.

use std::cmp::Ordering;

use crate::arena::{offset_cmp, Arena, Offset};
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{fragment, SlotRepr, SparseNodeRepr, L, SLOT_CHILD, SLOT_VALUE};

pub struct InsertResult {
    pub root: Offset,
    pub height: u32,
    pub previous: Option<Term>,
}

fn select_modifiable_node(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    cutoff: Offset,
    replacement: SparseNodeRepr,
) -> Result<Offset> {
    if offset_cmp(node_offset, cutoff) != Ordering::Less {
        arena.write(node_offset, replacement);
        Ok(node_offset)
    } else {
        region.alloc(arena, replacement)
    }
}

/// Grows the tree by one level at a time, wrapping the current root as
/// slot 0 of a new one, until `key`'s set bits fit within `height` levels
/// (spec.md §4.5.4's `heighten`). Every key already stored has all-zero
/// bits above the old height, so slot 0 is always the right place for it.
pub fn heighten_to_fit(arena: &mut Arena, region: &mut Region, mut root: Offset, mut height: u32, key: u64) -> Result<(Offset, u32)> {
    while height < 64 && (key >> (height * L)) != 0 {
        let mut new_root = SparseNodeRepr::empty();
        new_root.slots[0] = SlotRepr::branch(root);
        root = region.alloc(arena, new_root)?;
        height += 1;
    }
    Ok((root, height))
}

pub fn insert(arena: &mut Arena, region: &mut Region, root: Offset, height: u32, key: u64, value: Term, cutoff: Offset) -> Result<InsertResult> {
    let (root, height) = heighten_to_fit(arena, region, root, height, key)?;
    let (new_root, previous) = insert_rec(arena, region, root, height - 1, key, value, cutoff)?;
    Ok(InsertResult { root: new_root, height, previous })
}

fn insert_rec(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    level: u32,
    key: u64,
    value: Term,
    cutoff: Offset,
) -> Result<(Offset, Option<Term>)> {
    let node: SparseNodeRepr = arena.read(node_offset);
    let frag = fragment(key, level);
    if level == 0 {
        let slot = node.slots[frag];
        let previous = (slot.tag == SLOT_VALUE).then_some(slot.value);
        let mut new_node = node;
        new_node.slots[frag] = SlotRepr::leaf(value);
        let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
        return Ok((off, previous));
    }
    let slot = node.slots[frag];
    let child_offset = if slot.tag == SLOT_CHILD { slot.child } else { region.alloc(arena, SparseNodeRepr::empty())? };
    let (new_child, previous) = insert_rec(arena, region, child_offset, level - 1, key, value, cutoff)?;
    let mut new_node = node;
    new_node.slots[frag] = SlotRepr::branch(new_child);
    let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
    Ok((off, previous))
}
