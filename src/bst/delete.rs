//! Cutoff-disciplined red-black deletion (spec.md §4.3.4).
//!
//! Follows the standard two-phase technique: splice out a node with at
//! most one child (copying an in-order successor down first when the
//! target has two), then, if a black node was physically removed, resolve
//! the resulting double-black deficit on the way back up. The deficit
//! resolution is CLRS's four-case fixup, translated to the no-parent-
//! pointer recursive setting: each level's caller holds both the shrunk
//! child and its sibling, which is exactly what the fixup needs.

use crate::arena::{Arena, Offset, SENTINEL};
use crate::capability::Capability;
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;

use super::node::{is_red, relink, select_modifiable_node, NodeRepr, BLACK, RED};

pub struct DeleteResult {
    pub offset: Offset,
    pub removed: Term,
}

/// One subtree's deletion outcome: its new root offset (`SENTINEL` if the
/// subtree is now empty) and whether it is short one black node.
struct DelResult {
    offset: Offset,
    extra_black: bool,
}

pub fn delete(
    arena: &mut Arena,
    region: &mut Region,
    root: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<DeleteResult>> {
    let Some((result, removed)) = delete_rec(arena, region, root, key, cutoff, cap)? else {
        return Ok(None);
    };
    let offset = if result.offset == SENTINEL {
        SENTINEL
    } else {
        let node: NodeRepr = arena.read(result.offset);
        if node.color != BLACK {
            relink(arena, region, cutoff, result.offset, BLACK, node.left, node.right)?
        } else {
            result.offset
        }
    };
    Ok(Some(DeleteResult { offset, removed }))
}

fn delete_rec(
    arena: &mut Arena,
    region: &mut Region,
    node_offset: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<(DelResult, Term)>> {
    if node_offset == SENTINEL {
        return Ok(None);
    }
    let node: NodeRepr = arena.read(node_offset);
    match cap.compare(arena, key, &node.key) {
        std::cmp::Ordering::Less => {
            let Some((child, removed)) = delete_rec(arena, region, node.left, key, cutoff, cap)? else {
                return Ok(None);
            };
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { left: child.offset, ..node },
            )?;
            let resolved = if child.extra_black {
                fixup_left(arena, region, cutoff, target, arena.read(target))?
            } else {
                DelResult { offset: target, extra_black: false }
            };
            Ok(Some((resolved, removed)))
        }
        std::cmp::Ordering::Greater => {
            let Some((child, removed)) = delete_rec(arena, region, node.right, key, cutoff, cap)? else {
                return Ok(None);
            };
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { right: child.offset, ..node },
            )?;
            let resolved = if child.extra_black {
                fixup_right(arena, region, cutoff, target, arena.read(target))?
            } else {
                DelResult { offset: target, extra_black: false }
            };
            Ok(Some((resolved, removed)))
        }
        std::cmp::Ordering::Equal => {
            if node.left == SENTINEL && node.right == SENTINEL {
                let extra_black = node.color == BLACK;
                return Ok(Some((DelResult { offset: SENTINEL, extra_black }, node.value)));
            }
            if node.left == SENTINEL {
                let r: NodeRepr = arena.read(node.right);
                let off = select_modifiable_node(arena, region, node.right, cutoff, NodeRepr { color: BLACK, ..r })?;
                return Ok(Some((DelResult { offset: off, extra_black: false }, node.value)));
            }
            if node.right == SENTINEL {
                let l: NodeRepr = arena.read(node.left);
                let off = select_modifiable_node(arena, region, node.left, cutoff, NodeRepr { color: BLACK, ..l })?;
                return Ok(Some((DelResult { offset: off, extra_black: false }, node.value)));
            }
            let (succ_key, succ_value) = find_min(arena, node.right);
            let (succ_result, _) = delete_rec(arena, region, node.right, &succ_key, cutoff, cap)?
                .expect("in-order successor is present in a non-empty right subtree");
            let target = select_modifiable_node(
                arena,
                region,
                node_offset,
                cutoff,
                NodeRepr { key: succ_key, value: succ_value, right: succ_result.offset, ..node },
            )?;
            let resolved = if succ_result.extra_black {
                fixup_right(arena, region, cutoff, target, arena.read(target))?
            } else {
                DelResult { offset: target, extra_black: false }
            };
            Ok(Some((resolved, node.value)))
        }
    }
}

fn find_min(arena: &Arena, mut offset: Offset) -> (Term, Term) {
    loop {
        let node: NodeRepr = arena.read(offset);
        if node.left == SENTINEL {
            return (node.key, node.value);
        }
        offset = node.left;
    }
}

/// Resolves a double-black deficit in `node`'s left child.
fn fixup_left(arena: &mut Arena, region: &mut Region, cutoff: Offset, node_offset: Offset, n: NodeRepr) -> Result<DelResult> {
    if is_red(arena, n.right) {
        let w: NodeRepr = arena.read(n.right);
        let new_n = relink(arena, region, cutoff, node_offset, RED, n.left, w.left)?;
        let new_top = relink(arena, region, cutoff, n.right, BLACK, new_n, w.right)?;
        let inner = fixup_left(arena, region, cutoff, new_n, arena.read(new_n))?;
        debug_assert!(!inner.extra_black);
        let top_now: NodeRepr = arena.read(new_top);
        let final_top = relink(arena, region, cutoff, new_top, top_now.color, inner.offset, top_now.right)?;
        return Ok(DelResult { offset: final_top, extra_black: false });
    }
    let w_off = n.right;
    let w: NodeRepr = arena.read(w_off);
    if !is_red(arena, w.left) && !is_red(arena, w.right) {
        let new_w = relink(arena, region, cutoff, w_off, RED, w.left, w.right)?;
        let top = relink(arena, region, cutoff, node_offset, BLACK, n.left, new_w)?;
        return Ok(DelResult { offset: top, extra_black: n.color != RED });
    }
    if !is_red(arena, w.right) {
        let wl: NodeRepr = arena.read(w.left);
        let new_w = relink(arena, region, cutoff, w_off, RED, wl.right, w.right)?;
        let new_wl = relink(arena, region, cutoff, w.left, BLACK, wl.left, new_w)?;
        let top = relink(arena, region, cutoff, node_offset, n.color, n.left, new_wl)?;
        return fixup_left(arena, region, cutoff, top, arena.read(top));
    }
    let wr: NodeRepr = arena.read(w.right);
    let new_wr = relink(arena, region, cutoff, w.right, BLACK, wr.left, wr.right)?;
    let new_n = relink(arena, region, cutoff, node_offset, BLACK, n.left, w.left)?;
    let new_top = relink(arena, region, cutoff, w_off, n.color, new_n, new_wr)?;
    Ok(DelResult { offset: new_top, extra_black: false })
}

/// Resolves a double-black deficit in `node`'s right child — mirror image
/// of [`fixup_left`].
fn fixup_right(arena: &mut Arena, region: &mut Region, cutoff: Offset, node_offset: Offset, n: NodeRepr) -> Result<DelResult> {
    if is_red(arena, n.left) {
        let w: NodeRepr = arena.read(n.left);
        let new_n = relink(arena, region, cutoff, node_offset, RED, w.right, n.right)?;
        let new_top = relink(arena, region, cutoff, n.left, BLACK, w.left, new_n)?;
        let inner = fixup_right(arena, region, cutoff, new_n, arena.read(new_n))?;
        debug_assert!(!inner.extra_black);
        let top_now: NodeRepr = arena.read(new_top);
        let final_top = relink(arena, region, cutoff, new_top, top_now.color, top_now.left, inner.offset)?;
        return Ok(DelResult { offset: final_top, extra_black: false });
    }
    let w_off = n.left;
    let w: NodeRepr = arena.read(w_off);
    if !is_red(arena, w.left) && !is_red(arena, w.right) {
        let new_w = relink(arena, region, cutoff, w_off, RED, w.left, w.right)?;
        let top = relink(arena, region, cutoff, node_offset, BLACK, new_w, n.right)?;
        return Ok(DelResult { offset: top, extra_black: n.color != RED });
    }
    if !is_red(arena, w.left) {
        let wr: NodeRepr = arena.read(w.right);
        let new_w = relink(arena, region, cutoff, w_off, RED, w.left, wr.left)?;
        let new_wr = relink(arena, region, cutoff, w.right, BLACK, new_w, wr.right)?;
        let top = relink(arena, region, cutoff, node_offset, n.color, new_wr, n.right)?;
        return fixup_right(arena, region, cutoff, top, arena.read(top));
    }
    let wl: NodeRepr = arena.read(w.left);
    let new_wl = relink(arena, region, cutoff, w.left, BLACK, wl.left, wl.right)?;
    let new_w = relink(arena, region, cutoff, w_off, n.color, new_wl, w.right)?;
    let new_top = relink(arena, region, cutoff, node_offset, BLACK, new_w, n.right)?;
    Ok(DelResult { offset: new_top, extra_black: false })
}
