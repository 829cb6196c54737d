//! The log map (spec.md §2 row H): an append-only command log — `Set`,
//! `Delete`, `Snapshot` — that periodically consolidates into this crate's
//! own BST.
//!
//! Entries are a singly-linked list of arena-allocated records (newest
//! first, each pointing at its predecessor) rather than a growable array —
//! the same link-structured idiom every other container in this crate
//! uses, and it means appending one entry never needs to relocate the
//! ones before it. `consolidate` walks the list back to front, reverses
//! it, and replays the commands into a BST in the order they were issued.

use crate::arena::{Arena, Offset, SENTINEL};
use crate::bst;
use crate::error::Result;
use crate::term::Term;

pub const CMD_SET: u8 = 0;
pub const CMD_DELETE: u8 = 1;
pub const CMD_SNAPSHOT: u8 = 2;

#[repr(C)]
#[derive(Clone, Copy)]
struct EntryRepr {
    tag: u8,
    _pad: [u8; 7],
    key: Term,
    value: Term,
    prev: Offset,
}

/// `head` is the most recently appended entry, or [`SENTINEL`] if the log
/// is empty; `len` counts entries since the last consolidation.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HeaderRepr {
    pub head: Offset,
    pub len: u64,
}

impl HeaderRepr {
    #[must_use]
    pub const fn empty() -> Self {
        Self { head: SENTINEL, len: 0 }
    }
}

pub fn init(arena: &mut Arena) -> Result<Offset> {
    arena.alloc(HeaderRepr::empty())
}

#[must_use]
pub fn header(arena: &Arena, header_offset: Offset) -> HeaderRepr {
    arena.read(header_offset)
}

#[must_use]
pub fn len(arena: &Arena, header_offset: Offset) -> u64 {
    header(arena, header_offset).len
}

fn append(arena: &mut Arena, header_offset: Offset, tag: u8, key: Term, value: Term) -> Result<Offset> {
    let old = header(arena, header_offset);
    let entry = EntryRepr { tag, _pad: [0; 7], key, value, prev: old.head };
    let head = arena.alloc(entry)?;
    arena.alloc(HeaderRepr { head, len: old.len + 1 })
}

pub fn append_set(arena: &mut Arena, header_offset: Offset, key: Term, value: Term) -> Result<Offset> {
    append(arena, header_offset, CMD_SET, key, value)
}

pub fn append_delete(arena: &mut Arena, header_offset: Offset, key: Term) -> Result<Offset> {
    append(arena, header_offset, CMD_DELETE, key, Term::from_u64(0))
}

/// Records a snapshot marker. Carries no payload and has no effect on
/// [`consolidate`]'s replay other than being skipped; callers use it as an
/// external bookkeeping boundary (e.g. "everything before here was part of
/// generation N").
pub fn append_snapshot(arena: &mut Arena, header_offset: Offset) -> Result<Offset> {
    append(arena, header_offset, CMD_SNAPSHOT, Term::from_u64(0), Term::from_u64(0))
}

/// Replays every command appended since the log was last empty into
/// `bst_header` (oldest first), then returns the updated BST header offset
/// alongside a fresh, empty log header. `bst_header` may be a freshly
/// [`bst::init`]ed tree or an existing one being folded further.
pub fn consolidate(arena: &mut Arena, header_offset: Offset, bst_header: Offset, cutoff: Offset) -> Result<(Offset, Offset)> {
    arena.try_mutate(|arena| {
        let h = header(arena, header_offset);
        let mut entries = Vec::with_capacity(h.len as usize);
        let mut cursor = h.head;
        while cursor != SENTINEL {
            let e: EntryRepr = arena.read(cursor);
            entries.push(e);
            cursor = e.prev;
        }
        entries.reverse();

        let mut bst_header = bst_header;
        for e in entries {
            match e.tag {
                CMD_SET => bst_header = bst::insert(arena, bst_header, e.key, e.value, cutoff)?,
                CMD_DELETE => {
                    if let Some((new_header, _)) = bst::delete(arena, bst_header, &e.key, cutoff)? {
                        bst_header = new_header;
                    }
                }
                CMD_SNAPSHOT => {}
                other => debug_assert!(false, "unknown log command tag {other}"),
            }
        }

        let new_log = init(arena)?;
        Ok((bst_header, new_log))
    })
}
