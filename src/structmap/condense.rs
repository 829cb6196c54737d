//! Converts a finished sparse structmap into the compacted, read-only
//! condensed layout (spec.md §4.5's "condensed" form) — the same
//! popcount-indexing technique as the teacher's bitmap-compressed `Inner`
//! CHAMP node, applied here to a fixed-height trie instead of a hashed one.

use crate::arena::{Arena, Offset};
use crate::error::Result;
use crate::region::Region;

use super::node::{CondensedNodeRepr, SlotRepr, SparseNodeRepr, FANOUT, SLOT_CHILD, SLOT_EMPTY};

pub fn condense(arena: &mut Arena, region: &mut Region, root: Offset, height: u32) -> Result<Offset> {
    condense_rec(arena, region, root, height - 1)
}

fn condense_rec(arena: &mut Arena, region: &mut Region, node_offset: Offset, level: u32) -> Result<Offset> {
    let node: SparseNodeRepr = arena.read(node_offset);
    let mut bitmap = 0u32;
    let mut packed = Vec::with_capacity(FANOUT);
    for frag in 0..FANOUT {
        let slot = node.slots[frag];
        if slot.tag == SLOT_EMPTY {
            continue;
        }
        bitmap |= 1 << frag;
        if level > 0 && slot.tag == SLOT_CHILD {
            let new_child = condense_rec(arena, region, slot.child, level - 1)?;
            packed.push(SlotRepr::branch(new_child));
        } else {
            packed.push(slot);
        }
    }
    let first = region.alloc_slice(arena, &packed)?.unwrap_or(crate::arena::SENTINEL);
    region.alloc(arena, CondensedNodeRepr::new(bitmap, first))
}
