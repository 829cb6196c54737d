//! HAMT removal (spec.md §4.4.4).
//!
//! Clearing a leaf never collapses an otherwise-empty branch back into its
//! parent (spec.md's HAMT Non-goals stop at "clear the leaf slot") — a
//! branch cell that ends up pointing at an all-`Empty` node is left alone.
//! Likewise a collision bucket that shrinks to one entry keeps its
//! `Collision` tag rather than being reclassified back to `Item`.

use std::cmp::Ordering;

use crate::arena::{offset_cmp, Arena, Offset};
use crate::capability::Capability;
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{fragment, CellRepr, NodeRepr, BRANCH, COLLISION, EMPTY, ITEM};

pub struct RemoveResult {
    pub offset: Offset,
    pub removed: Term,
}

fn select_modifiable_node(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    cutoff: Offset,
    replacement: NodeRepr,
) -> Result<Offset> {
    if offset_cmp(node_offset, cutoff) != Ordering::Less {
        arena.write(node_offset, replacement);
        Ok(node_offset)
    } else {
        region.alloc(arena, replacement)
    }
}

pub fn remove(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    hash: u64,
    shift: u32,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<RemoveResult>> {
    let node: NodeRepr = arena.read(node_offset);
    let frag = fragment(hash, shift);
    let cell = node.cells[frag];
    match cell.tag {
        EMPTY => Ok(None),
        ITEM => {
            if cell.hash != hash || cap.compare(arena, key, &cell.key) != Ordering::Equal {
                return Ok(None);
            }
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::EMPTY;
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(Some(RemoveResult { offset: off, removed: cell.value }))
        }
        BRANCH => {
            let Some(child) = remove(arena, region, cell.child, hash, shift + super::node::BITS_PER_LEVEL, key, cutoff, cap)?
            else {
                return Ok(None);
            };
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::branch(child.offset);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(Some(RemoveResult { offset: off, removed: child.removed }))
        }
        COLLISION => {
            let entries = super::node::read_collision_bucket(arena, cell.child, cell.collision_len);
            let Some(pos) = entries.iter().position(|e| cap.compare(arena, key, &e.key) == Ordering::Equal) else {
                return Ok(None);
            };
            let removed = entries[pos].value;
            let mut remaining = entries;
            remaining.remove(pos);
            let len = remaining.len() as u32;
            let bucket = region
                .alloc_slice(arena, &remaining)?
                .expect("a collision bucket has at least 2 entries before removal");
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::collision(bucket, len);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(Some(RemoveResult { offset: off, removed }))
        }
        _ => unreachable!("cell tag is one of EMPTY/ITEM/BRANCH/COLLISION"),
    }
}
