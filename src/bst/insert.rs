//! Top-down-equivalent, cutoff-disciplined red-black insertion.
//!
//! Structured as a recursive descent that path-copies on the way down and
//! rebalances on the way up, the functional style every persistent
//! red-black tree reference uses (Okasaki's four-case `balance`). The
//! cutoff check happens once per touched node, in [`select_modifiable_node`]
//! / [`relink`] — everything above that is the ordinary algorithm.

use std::cmp::Ordering;

use crate::arena::{Arena, Offset, SENTINEL};
use crate::capability::Capability;
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{is_red, relink, select_modifiable_node, NodeRepr, BLACK, RED};

/// Result of inserting into one subtree: its (possibly new) root offset,
/// and the previous value if `key` already existed there.
pub struct InsertResult {
    pub offset: Offset,
    pub previous: Option<Term>,
}

pub fn insert(
    arena: &mut Arena,
    region: &mut Region,
    root: Offset,
    key: Term,
    value: Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<InsertResult> {
    let InsertResult { offset, previous } = insert_rec(arena, region, root, key, value, cutoff, cap)?;
    let node: NodeRepr = arena.read(offset);
    let offset = if node.color != BLACK {
        relink(arena, region, cutoff, offset, BLACK, node.left, node.right)?
    } else {
        offset
    };
    Ok(InsertResult { offset, previous })
}

fn insert_rec(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    key: Term,
    value: Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<InsertResult> {
    if node_offset == SENTINEL {
        let off = region.alloc(arena, NodeRepr::leaf(key, value, RED))?;
        return Ok(InsertResult { offset: off, previous: None });
    }
    let node: NodeRepr = arena.read(node_offset);
    match cap.compare(arena, &key, &node.key) {
        Ordering::Less => {
            let InsertResult { offset: new_left, previous } =
                insert_rec(arena, region, node.left, key, value, cutoff, cap)?;
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { left: new_left, ..node },
            )?;
            let balanced = balance(arena, region, cutoff, target)?;
            Ok(InsertResult { offset: balanced, previous })
        }
        Ordering::Greater => {
            let InsertResult { offset: new_right, previous } =
                insert_rec(arena, region, node.right, key, value, cutoff, cap)?;
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { right: new_right, ..node },
            )?;
            let balanced = balance(arena, region, cutoff, target)?;
            Ok(InsertResult { offset: balanced, previous })
        }
        Ordering::Equal => {
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { value, ..node },
            )?;
            Ok(InsertResult { offset: target, previous: Some(node.value) })
        }
    }
}

/// Okasaki's four-case rebalance: resolves a red-red violation one level
/// below a black node by rotating the offending subtree into a red node
/// with two black children. A no-op if `node_offset` is not black or has
/// no such violation.
fn balance(arena: &mut Arena, region: &mut Region, cutoff: Offset, node_offset: Offset) -> Result<Offset> {
    let z: NodeRepr = arena.read(node_offset);
    if z.color != BLACK {
        return Ok(node_offset);
    }
    if is_red(arena, z.left) {
        let l: NodeRepr = arena.read(z.left);
        if is_red(arena, l.left) {
            let ll: NodeRepr = arena.read(l.left);
            let new_ll = relink(arena, region, cutoff, l.left, BLACK, ll.left, ll.right)?;
            let new_z = relink(arena, region, cutoff, node_offset, BLACK, l.right, z.right)?;
            return relink(arena, region, cutoff, z.left, RED, new_ll, new_z);
        }
        if is_red(arena, l.right) {
            let lr: NodeRepr = arena.read(l.right);
            let new_l = relink(arena, region, cutoff, z.left, BLACK, l.left, lr.left)?;
            let new_z = relink(arena, region, cutoff, node_offset, BLACK, lr.right, z.right)?;
            return relink(arena, region, cutoff, l.right, RED, new_l, new_z);
        }
    }
    if is_red(arena, z.right) {
        let r: NodeRepr = arena.read(z.right);
        if is_red(arena, r.left) {
            let rl: NodeRepr = arena.read(r.left);
            let new_z = relink(arena, region, cutoff, node_offset, BLACK, z.left, rl.left)?;
            let new_r = relink(arena, region, cutoff, z.right, BLACK, rl.right, r.right)?;
            return relink(arena, region, cutoff, r.left, RED, new_z, new_r);
        }
        if is_red(arena, r.right) {
            let rr: NodeRepr = arena.read(r.right);
            let new_z = relink(arena, region, cutoff, node_offset, BLACK, z.left, r.left)?;
            let new_rr = relink(arena, region, cutoff, z.right, BLACK, rr.left, rr.right)?;
            return relink(arena, region, cutoff, z.right, RED, new_z, new_rr);
        }
    }
    Ok(node_offset)
}
