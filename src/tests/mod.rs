//! Test suite, organized the way the teacher's own `tests/` module is:
//! one file per concern rather than one file per container, since most
//! properties here (canonical hash, persistence, completeness) apply
//! identically across the BST/HAMT/structmap.

mod allocation_failure;
mod collision;
mod hash;
mod invariants;

use crate::arena::{Arena, ArenaOptions};

/// A small arena, sized the way every test here wants it: big enough not
/// to grow mid-test and mask an offset-stability bug, small enough that a
/// leaked allocation shows up in `committed_len` immediately.
pub(crate) fn fresh_arena() -> Arena {
    Arena::new(ArenaOptions { initial_capacity: 64 * 1024, min_grow: 64 * 1024 })
}
