//! Offset-addressed, path-copy fixed-height trie keyed by `u64` (spec.md
//! §4.5) — the structmap component, named for indexing fixed struct-like
//! field slots rather than arbitrary ordered keys the way the BST does.

mod condense;
mod get;
mod insert;
mod iter;
mod node;
mod remove;

use crate::arena::{Arena, Offset};
use crate::error::Result;
use crate::hasher::Hasher;
use crate::region::Region;
use crate::term::{self, Term};

pub use iter::Iter;
pub use node::{CondensedNodeRepr, HeaderRepr, SparseNodeRepr, LAYOUT_CONDENSED, LAYOUT_SPARSE};

/// Allocates an empty structmap (height 1, sparse layout), returning its
/// header offset.
pub fn init(arena: &mut Arena) -> Result<Offset> {
    let root = arena.alloc(node::SparseNodeRepr::empty())?;
    arena.alloc(HeaderRepr::empty(root))
}

#[must_use]
pub fn header(arena: &Arena, header_offset: Offset) -> HeaderRepr {
    arena.read(header_offset)
}

#[must_use]
pub fn len(arena: &Arena, header_offset: Offset) -> u64 {
    header(arena, header_offset).count
}

#[must_use]
pub fn header_hash(arena: &Arena, header_offset: Offset) -> u64 {
    header(arena, header_offset).hash
}

#[must_use]
pub fn header_external_size(arena: &Arena, header_offset: Offset) -> u64 {
    header(arena, header_offset).external_size
}

fn entry_digest(key: u64, arena: &Arena, value: &Term) -> u64 {
    let mut h = Hasher::new();
    h.continue_bytes(&key.to_le_bytes());
    term::hash_continue(arena, &mut h, value);
    h.finish()
}

#[must_use]
pub fn get(arena: &Arena, header_offset: Offset, key: u64) -> Option<Term> {
    get::get(arena, header(arena, header_offset), key)
}

#[must_use]
pub fn contains_key(arena: &Arena, header_offset: Offset, key: u64) -> bool {
    get(arena, header_offset, key).is_some()
}

/// Inserts or replaces `key` -> `value`, returning the new header offset.
/// Growing the tree to fit a larger key (spec.md §4.5.4 `heighten`) happens
/// automatically and is reflected in the returned header.
pub fn insert(arena: &mut Arena, header_offset: Offset, key: u64, value: Term, cutoff: Offset) -> Result<Offset> {
    let mut region = Region::scratch(arena);
    insert_in_region(arena, &mut region, header_offset, key, value, cutoff)
}

/// Like [`insert`], but allocates through a caller-supplied [`Region`]
/// instead of an unbounded scratch one (spec.md §4.1, §8 scenario 6).
pub fn insert_in_region(arena: &mut Arena, region: &mut Region, header_offset: Offset, key: u64, value: Term, cutoff: Offset) -> Result<Offset> {
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        assert_eq!(old.layout, LAYOUT_SPARSE, "insert is only defined on the mutable sparse layout");
        let result = insert::insert(arena, region, old.root, old.height, key, value, cutoff)?;
        let mut new_hash = old.hash ^ entry_digest(key, arena, &value);
        let mut new_external = old.external_size + term::external_size(arena, &value);
        let mut new_count = old.count + 1;
        if let Some(previous) = result.previous {
            new_hash ^= entry_digest(key, arena, &previous);
            new_external -= term::external_size(arena, &previous);
            new_count -= 1;
        }
        arena.alloc(HeaderRepr {
            root: result.root,
            height: result.height,
            layout: LAYOUT_SPARSE,
            count: new_count,
            external_size: new_external,
            hash: new_hash,
            ..old
        })
    })
}

pub fn remove(arena: &mut Arena, header_offset: Offset, key: u64, cutoff: Offset) -> Result<Option<(Offset, Term)>> {
    let mut region = Region::scratch(arena);
    remove_in_region(arena, &mut region, header_offset, key, cutoff)
}

/// Like [`remove`], but allocates through a caller-supplied [`Region`].
pub fn remove_in_region(arena: &mut Arena, region: &mut Region, header_offset: Offset, key: u64, cutoff: Offset) -> Result<Option<(Offset, Term)>> {
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        assert_eq!(old.layout, LAYOUT_SPARSE, "remove is only defined on the mutable sparse layout");
        let Some((new_root, removed)) = remove::remove(arena, region, old.root, old.height, key, cutoff)? else {
            return Ok(None);
        };
        let new_hash = old.hash ^ entry_digest(key, arena, &removed);
        let new_external = old.external_size - term::external_size(arena, &removed);
        let new_header = arena.alloc(HeaderRepr {
            root: new_root,
            count: old.count - 1,
            external_size: new_external,
            hash: new_hash,
            ..old
        })?;
        Ok(Some((new_header, removed)))
    })
}

#[must_use]
pub fn iter(arena: &Arena, header_offset: Offset) -> Iter<'_> {
    Iter::new(arena, header(arena, header_offset))
}

/// Rebuilds the whole tree into the compacted, read-only condensed layout
/// (spec.md §4.5's two physical forms) — returns a fresh header offset;
/// the sparse original is left untouched and still usable for further
/// mutation.
pub fn condense(arena: &mut Arena, header_offset: Offset) -> Result<Offset> {
    let mut region = Region::scratch(arena);
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        let new_root = condense::condense(arena, &mut region, old.root, old.height)?;
        arena.alloc(HeaderRepr { root: new_root, layout: LAYOUT_CONDENSED, ..old })
    })
}

/// Content equality, used when a [`Term`] nested inside another container
/// points at a structmap (spec.md §4.2) — structmaps otherwise compare by
/// header-offset identity only (spec.md §4.5's open question on equality).
#[must_use]
pub fn deep_eq(arena: &Arena, a_header: Offset, b_header: Offset) -> bool {
    if a_header == b_header {
        return true;
    }
    let ha = header(arena, a_header);
    let hb = header(arena, b_header);
    if ha.count != hb.count || ha.hash != hb.hash {
        return false;
    }
    let mut ia = iter(arena, a_header);
    let mut ib = iter(arena, b_header);
    loop {
        match (ia.next(), ib.next()) {
            (None, None) => return true,
            (Some((ak, av)), Some((bk, bv))) => {
                if ak != bk || term::cmp(arena, &av, &bv) != std::cmp::Ordering::Equal {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
