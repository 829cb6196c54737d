//! Fixed fan-out HAMT node and cell layout (spec.md §4.4).
//!
//! Unlike the teacher's bitmap-compressed `Inner` node, each node here is a
//! fixed 32-slot array indexed directly by a 5-bit hash fragment — the
//! open question of how to shape a cell was resolved by adding a fourth
//! `Collision` tag alongside `Empty`/`Item`/`Branch`, one slot wide like
//! the others, rather than compressing occupied slots by popcount (that
//! compression technique is instead used for the structmap's condensed
//! layout, where read-only nodes make the extra indirection worthwhile).

use crate::arena::{Arena, Offset, SENTINEL};
use crate::term::Term;

pub const BITS_PER_LEVEL: u32 = 5;
pub const FANOUT: usize = 1 << BITS_PER_LEVEL;
pub const MAX_SHIFT: u32 = 60;

pub const EMPTY: u8 = 0;
pub const ITEM: u8 = 1;
pub const BRANCH: u8 = 2;
pub const COLLISION: u8 = 3;

#[must_use]
pub const fn fragment(hash: u64, shift: u32) -> usize {
    ((hash >> shift) & 0x1F) as usize
}

/// One slot in a [`NodeRepr`]'s 32-wide array.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CellRepr {
    pub tag: u8,
    _pad: [u8; 7],
    pub hash: u64,
    pub key: Term,
    pub value: Term,
    pub child: Offset,
    pub collision_len: u32,
    _pad2: [u8; 4],
}

impl CellRepr {
    pub const EMPTY: Self = Self {
        tag: EMPTY,
        _pad: [0; 7],
        hash: 0,
        key: Term::from_u64(0),
        value: Term::from_u64(0),
        child: SENTINEL,
        collision_len: 0,
        _pad2: [0; 4],
    };

    #[must_use]
    pub const fn item(hash: u64, key: Term, value: Term) -> Self {
        Self {
            tag: ITEM,
            hash,
            key,
            value,
            child: SENTINEL,
            collision_len: 0,
            _pad: [0; 7],
            _pad2: [0; 4],
        }
    }

    #[must_use]
    pub const fn branch(child: Offset) -> Self {
        Self {
            tag: BRANCH,
            hash: 0,
            key: Term::from_u64(0),
            value: Term::from_u64(0),
            child,
            collision_len: 0,
            _pad: [0; 7],
            _pad2: [0; 4],
        }
    }

    #[must_use]
    pub const fn collision(bucket: Offset, len: u32) -> Self {
        Self {
            tag: COLLISION,
            hash: 0,
            key: Term::from_u64(0),
            value: Term::from_u64(0),
            child: bucket,
            collision_len: len,
            _pad: [0; 7],
            _pad2: [0; 4],
        }
    }
}

/// An entry in a collision bucket — a flat array appended to whenever a
/// node position has exhausted the hash's fragment bits, or (vanishingly
/// rarely) two distinct full 64-bit hashes truly coincide.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CollisionEntry {
    pub hash: u64,
    pub key: Term,
    pub value: Term,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct NodeRepr {
    pub cells: [CellRepr; FANOUT],
}

impl NodeRepr {
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: [CellRepr::EMPTY; FANOUT] }
    }
}

/// The root handle for one HAMT instance: count, cached content hash,
/// cached external-size total, and a root node offset. Always non-empty —
/// an empty map's root points at an all-`Empty` node rather than using a
/// sentinel, so lookups don't need a special empty-map branch.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HeaderRepr {
    pub root: Offset,
    pub count: u64,
    pub external_size: u64,
    pub hash: u64,
}

pub fn read_collision_bucket(arena: &Arena, offset: Offset, len: u32) -> Vec<CollisionEntry> {
    (0..len as usize).map(|i| arena.read_at(offset, i)).collect()
}
