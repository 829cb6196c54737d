//! The lower-bound set (spec.md §4.6): an ordered multiset of live cutoff
//! offsets with a cached O(1) minimum, used by the arena's GC coordinator
//! to find how far back the committed prefix is still referenced.
//!
//! Built directly on top of this crate's own [`crate::bst`] rather than a
//! second hand-rolled balanced tree — the "balanced tree" spec.md §4.6 asks
//! for already exists, and every reader still gets the usual BST
//! guarantees (ordered iteration, `O(log n)` add/remove).

use crate::arena::{Arena, Offset, SENTINEL};
use crate::bst;
use crate::error::Result;
use crate::term::Term;

/// `bst` maps a cutoff offset (as a `u64` key) to its live reference count
/// (as a `u64` value) — `add`ing the same offset twice bumps the count
/// instead of duplicating an entry, and `remove` only drops the entry once
/// its count reaches zero. `cached_min` is `SENTINEL` when the set is empty.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HeaderRepr {
    pub entries: Offset,
    pub cached_min: Offset,
}

impl HeaderRepr {
    #[must_use]
    pub const fn empty(entries: Offset) -> Self {
        Self { entries, cached_min: SENTINEL }
    }
}

pub fn init(arena: &mut Arena) -> Result<Offset> {
    let entries = bst::init(arena)?;
    arena.alloc(HeaderRepr::empty(entries))
}

#[must_use]
pub fn header(arena: &Arena, header_offset: Offset) -> HeaderRepr {
    arena.read(header_offset)
}

/// The cached minimum live cutoff, or `None` if no reader currently holds
/// one (spec.md §4.6's `get_lowest`, `O(1)`).
#[must_use]
pub fn get_lowest(arena: &Arena, header_offset: Offset) -> Option<Offset> {
    let h = header(arena, header_offset);
    (h.cached_min != SENTINEL).then_some(h.cached_min)
}

fn refcount_of(arena: &Arena, entries: Offset, offset: Offset) -> u64 {
    bst::get(arena, entries, &Term::from_u64(offset)).and_then(|v| v.as_u64()).unwrap_or(0)
}

fn leftmost(arena: &Arena, entries: Offset) -> Option<Offset> {
    bst::iter(arena, entries).next().and_then(|(k, _)| k.as_u64())
}

/// Records one more live reader pinned at `offset`.
pub fn add(arena: &mut Arena, header_offset: Offset, offset: Offset, cutoff: Offset) -> Result<Offset> {
    arena.try_mutate(|arena| {
        let h = header(arena, header_offset);
        let refcount = refcount_of(arena, h.entries, offset);
        let new_entries = bst::insert(arena, h.entries, Term::from_u64(offset), Term::from_u64(refcount + 1), cutoff)?;
        let new_min = match h.cached_min {
            SENTINEL => offset,
            m if crate::arena::offset_cmp(offset, m) == std::cmp::Ordering::Less => offset,
            m => m,
        };
        arena.alloc(HeaderRepr { entries: new_entries, cached_min: new_min })
    })
}

/// Releases one reader pinned at `offset`; the entry is dropped from the
/// multiset once its reference count reaches zero.
pub fn remove(arena: &mut Arena, header_offset: Offset, offset: Offset, cutoff: Offset) -> Result<Offset> {
    arena.try_mutate(|arena| {
        let h = header(arena, header_offset);
        let refcount = refcount_of(arena, h.entries, offset);
        debug_assert!(refcount > 0, "removing a cutoff offset that was never added");
        let new_entries = if refcount > 1 {
            bst::insert(arena, h.entries, Term::from_u64(offset), Term::from_u64(refcount - 1), cutoff)?
        } else {
            bst::delete(arena, h.entries, &Term::from_u64(offset), cutoff)?.map_or(h.entries, |(root, _)| root)
        };
        let new_min = if h.cached_min == offset {
            leftmost(arena, new_entries).unwrap_or(SENTINEL)
        } else {
            h.cached_min
        };
        arena.alloc(HeaderRepr { entries: new_entries, cached_min: new_min })
    })
}
