//! The in-arena physical node and header records for a BST (spec.md §4.3).

use crate::arena::{offset_cmp, Arena, Offset, SENTINEL};
use crate::error::Result;
use crate::region::Region;
use crate::term::Term;
use std::cmp::Ordering;

pub const RED: u8 = 0;
pub const BLACK: u8 = 1;

/// One red-black node: a key/value pair plus two child offsets and a color
/// bit. Fixed-size and `Copy`, so it allocates and copies as one `memalign`
/// call (spec.md §4.3.2).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NodeRepr {
    pub key: Term,
    pub value: Term,
    pub left: Offset,
    pub right: Offset,
    pub color: u8,
    pub(crate) _pad: [u8; 7],
}

impl NodeRepr {
    #[must_use]
    pub const fn leaf(key: Term, value: Term, color: u8) -> Self {
        Self {
            key,
            value,
            left: SENTINEL,
            right: SENTINEL,
            color,
            _pad: [0; 7],
        }
    }
}

/// The root handle for one BST instance (spec.md §4.3.1): a count, cached
/// content hash, cached external-size total, and a root node offset.
/// A fresh copy of this record is allocated by every `insert`/`delete` —
/// it is cheap (one `memalign` of 40 bytes) and keeps old readers' header
/// offsets valid, so there is no cutoff-based reuse here unlike node
/// records.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HeaderRepr {
    pub root: Offset,
    pub count: u64,
    pub external_size: u64,
    pub hash: u64,
}

impl HeaderRepr {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            root: SENTINEL,
            count: 0,
            external_size: 0,
            hash: 0,
        }
    }
}

#[must_use]
pub fn is_red(arena: &Arena, offset: Offset) -> bool {
    offset != SENTINEL && arena.read::<NodeRepr>(offset).color == RED
}

/// Returns `node_offset` itself if it was allocated at or after `cutoff`
/// (meaning this mutation already owns it exclusively), or a fresh copy of
/// `replacement` otherwise (spec.md §4.1's cutoff/path-copy discipline).
pub fn select_modifiable_node(
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

/// Rewrites the node at `offset` with new color/children, keeping its own
/// key/value (used by rotations, which only ever change linkage and color,
/// never which key lives at a given physical offset).
pub fn relink(
    arena: &mut Arena,
    region: &mut Region,
    cutoff: Offset,
    offset: Offset,
    color: u8,
    left: Offset,
    right: Offset,
) -> Result<Offset> {
    let existing: NodeRepr = arena.read(offset);
    let updated = NodeRepr {
        left,
        right,
        color,
        ..existing
    };
    select_modifiable_node(arena, region, offset, cutoff, updated)
}
