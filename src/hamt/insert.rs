//! HAMT insertion (spec.md §4.4.3), grounded on the teacher's
//! `ops/insert.rs` recursive-descent-and-rebuild shape, adapted from
//! bitmap-compressed nodes to this crate's fixed 32-slot array.

use std::cmp::Ordering;

use crate::arena::{offset_cmp, Arena, Offset};
use crate::capability::Capability;
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{fragment, CellRepr, CollisionEntry, NodeRepr, BRANCH, COLLISION, EMPTY, ITEM, MAX_SHIFT};

pub struct InsertResult {
    pub offset: Offset,
    pub previous: Option<Term>,
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

#[allow(clippy::too_many_arguments)]
pub fn insert(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    hash: u64,
    shift: u32,
    key: Term,
    value: Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<InsertResult> {
    let node: NodeRepr = arena.read(node_offset);
    let frag = fragment(hash, shift);
    let cell = node.cells[frag];
    match cell.tag {
        EMPTY => {
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::item(hash, key, value);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(InsertResult { offset: off, previous: None })
        }
        ITEM if cell.hash == hash && cap.compare(arena, &key, &cell.key) == Ordering::Equal => {
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::item(hash, key, value);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(InsertResult { offset: off, previous: Some(cell.value) })
        }
        ITEM => {
            let descended = branch_for_two(
                arena,
                region,
                cutoff,
                shift + BITS_PER_LEVEL_U32,
                cell.hash,
                cell.key,
                cell.value,
                hash,
                key,
                value,
            )?;
            let mut new_node = node;
            new_node.cells[frag] = descended;
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(InsertResult { offset: off, previous: None })
        }
        BRANCH => {
            let child = insert(arena, region, cell.child, hash, shift + BITS_PER_LEVEL_U32, key, value, cutoff, cap)?;
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::branch(child.offset);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(InsertResult { offset: off, previous: child.previous })
        }
        COLLISION => {
            let mut entries = super::node::read_collision_bucket(arena, cell.child, cell.collision_len);
            let mut previous = None;
            if let Some(pos) = entries.iter().position(|e| cap.compare(arena, &key, &e.key) == Ordering::Equal) {
                previous = Some(entries[pos].value);
                entries[pos] = CollisionEntry { hash, key, value };
            } else {
                entries.push(CollisionEntry { hash, key, value });
            }
            let len = entries.len() as u32;
            let bucket = region
                .alloc_slice(arena, &entries)?
                .expect("collision bucket is never empty after an insert");
            let mut new_node = node;
            new_node.cells[frag] = CellRepr::collision(bucket, len);
            let off = select_modifiable_node(arena, region, node_offset, cutoff, new_node)?;
            Ok(InsertResult { offset: off, previous })
        }
        _ => unreachable!("cell tag is one of EMPTY/ITEM/BRANCH/COLLISION"),
    }
}

const BITS_PER_LEVEL_U32: u32 = super::node::BITS_PER_LEVEL;

/// Builds (possibly several levels of) branch nodes to separate two items
/// that share a fragment at `shift`, terminating in a [`CellRepr::collision`]
/// bucket once the hash's fragment bits are exhausted.
#[allow(clippy::too_many_arguments)]
fn branch_for_two(
    arena: &mut Arena,
    region: &mut Region,
    cutoff: Offset,
    shift: u32,
    hash_a: u64,
    key_a: Term,
    value_a: Term,
    hash_b: u64,
    key_b: Term,
    value_b: Term,
) -> Result<CellRepr> {
    if shift > MAX_SHIFT {
        let entries = [
            CollisionEntry { hash: hash_a, key: key_a, value: value_a },
            CollisionEntry { hash: hash_b, key: key_b, value: value_b },
        ];
        let bucket = region.alloc_slice(arena, &entries)?.expect("two entries is never empty");
        return Ok(CellRepr::collision(bucket, 2));
    }
    let frag_a = fragment(hash_a, shift);
    let frag_b = fragment(hash_b, shift);
    let mut node = NodeRepr::empty();
    if frag_a == frag_b {
        let nested = branch_for_two(arena, region, cutoff, shift + BITS_PER_LEVEL_U32, hash_a, key_a, value_a, hash_b, key_b, value_b)?;
        node.cells[frag_a] = nested;
    } else {
        node.cells[frag_a] = CellRepr::item(hash_a, key_a, value_a);
        node.cells[frag_b] = CellRepr::item(hash_b, key_b, value_b);
    }
    let off = region.alloc(arena, node)?;
    Ok(CellRepr::branch(off))
}
