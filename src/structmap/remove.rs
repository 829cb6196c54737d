//! Structmap removal (spec.md §4.5.5).
//!
//! Clearing a leaf slot never shrinks the tree's height back down and
//! never collapses a branch that ends up all-empty, mirroring the HAMT's
//! `remove` (spec.md's structmap Non-goals: no in-place shrinking).

use std::cmp::Ordering;

use crate::arena::{offset_cmp, Arena, Offset};
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{fragment, SlotRepr, SparseNodeRepr, L, SLOT_CHILD, SLOT_VALUE};

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

pub fn remove(arena: &mut Arena, region: &mut Region, root: Offset, height: u32, key: u64, cutoff: Offset) -> Result<Option<(Offset, Term)>> {
    if height < 64 && (key >> (height * L)) != 0 {
        return Ok(None);
    }
    remove_rec(arena, region, root, height - 1, key, cutoff)
}

fn remove_rec(arena: &mut Arena, region: &mut Region, node_offset: Offset, level: u32, key: u64, cutoff: Offset) -> Result<Option<(Offset, Term)>> {
    let node: SparseNodeRepr = arena.read(node_offset);
    let frag = fragment(key, level);
    let slot = node.slots[frag];
    if level == 0 {
        if slot.tag != SLOT_VALUE {
            return Ok(None);
        }
        let mut new_node = node;
        new_node.slots[frag] = SlotRepr::EMPTY;
        let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
        return Ok(Some((off, slot.value)));
    }
    if slot.tag != SLOT_CHILD {
        return Ok(None);
    }
    let Some((new_child, removed)) = remove_rec(arena, region, slot.child, level - 1, key, cutoff)? else {
        return Ok(None);
    };
    let mut new_node = node;
    new_node.slots[frag] = SlotRepr::branch(new_child);
    let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
    Ok(Some((off, removed)))
}
