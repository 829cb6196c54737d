//! Offset-addressed, path-copy red-black tree (spec.md §4.3).
//!
//! A BST is addressed by a *header offset*, not owned by a Rust value — the
//! header record at that offset carries the root, count, and two caches
//! (content hash, external size) that every mutation updates incrementally
//! rather than recomputing by walking the tree.

mod delete;
mod insert;
mod iter;
mod node;

use std::cmp::Ordering;

use crate::arena::{Arena, Offset, SENTINEL};
use crate::capability::{Capability, DefaultCapability};
use crate::error::Result;
use crate::hasher::Hasher;
use crate::region::Region;
use crate::term::{self, Term};

pub use iter::Iter;
pub use node::{HeaderRepr, NodeRepr};

/// Allocates an empty BST, returning its header offset.
pub fn init(arena: &mut Arena) -> Result<Offset> {
    arena.alloc(HeaderRepr::empty())
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

/// Looks up `key` using the default capability.
#[must_use]
pub fn get(arena: &Arena, header_offset: Offset, key: &Term) -> Option<Term> {
    get_with(arena, header_offset, key, &DefaultCapability)
}

/// Looks up `key` using a caller-supplied [`Capability`].
#[must_use]
pub fn get_with(arena: &Arena, header_offset: Offset, key: &Term, cap: &dyn Capability) -> Option<Term> {
    let mut cursor = header(arena, header_offset).root;
    while cursor != SENTINEL {
        let node: NodeRepr = arena.read(cursor);
        match cap.compare(arena, key, &node.key) {
            Ordering::Less => cursor = node.left,
            Ordering::Greater => cursor = node.right,
            Ordering::Equal => return Some(node.value),
        }
    }
    None
}

#[must_use]
pub fn contains_key(arena: &Arena, header_offset: Offset, key: &Term) -> bool {
    get(arena, header_offset, key).is_some()
}

fn entry_digest(arena: &Arena, key: &Term, value: &Term) -> u64 {
    let mut h = Hasher::new();
    term::hash_continue(arena, &mut h, key);
    term::hash_continue(arena, &mut h, value);
    h.finish()
}

/// Inserts or replaces `key` -> `value`, returning the new header offset.
/// `cutoff`: node offsets at or after this value are treated as owned by
/// this mutation and may be overwritten in place; earlier offsets are
/// path-copied (spec.md §4.1).
pub fn insert(
    arena: &mut Arena,
    header_offset: Offset,
    key: Term,
    value: Term,
    cutoff: Offset,
) -> Result<Offset> {
    insert_with(arena, header_offset, key, value, cutoff, &DefaultCapability)
}

pub fn insert_with(
    arena: &mut Arena,
    header_offset: Offset,
    key: Term,
    value: Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Offset> {
    let mut region = Region::scratch(arena);
    insert_in_region(arena, &mut region, header_offset, key, value, cutoff, cap)
}

/// Like [`insert_with`], but allocates every node through a caller-supplied
/// [`Region`] instead of an unbounded scratch one — lets a mutator cap how
/// much arena space one insert may consume (spec.md §4.1, §8 scenario 6).
pub fn insert_in_region(
    arena: &mut Arena,
    region: &mut Region,
    header_offset: Offset,
    key: Term,
    value: Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Offset> {
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        let result = insert::insert(arena, region, old.root, key, value, cutoff, cap)?;
        let mut new_hash = old.hash ^ entry_digest(arena, &key, &value);
        let mut new_external = old.external_size + cap.external_size(arena, &key) + cap.external_size(arena, &value);
        let mut new_count = old.count + 1;
        if let Some(previous) = result.previous {
            new_hash ^= entry_digest(arena, &key, &previous);
            new_external -= cap.external_size(arena, &key) + cap.external_size(arena, &previous);
            new_count -= 1;
        }
        arena.alloc(HeaderRepr {
            root: result.offset,
            count: new_count,
            external_size: new_external,
            hash: new_hash,
        })
    })
}

/// Removes `key`, returning the new header offset and the removed value,
/// or `None` if `key` was absent (the header offset is unchanged in that
/// case — callers should keep using `header_offset`).
pub fn delete(
    arena: &mut Arena,
    header_offset: Offset,
    key: &Term,
    cutoff: Offset,
) -> Result<Option<(Offset, Term)>> {
    delete_with(arena, header_offset, key, cutoff, &DefaultCapability)
}

pub fn delete_with(
    arena: &mut Arena,
    header_offset: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<(Offset, Term)>> {
    let mut region = Region::scratch(arena);
    delete_in_region(arena, &mut region, header_offset, key, cutoff, cap)
}

/// Like [`delete_with`], but allocates through a caller-supplied [`Region`].
pub fn delete_in_region(
    arena: &mut Arena,
    region: &mut Region,
    header_offset: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<(Offset, Term)>> {
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        let Some(result) = delete::delete(arena, region, old.root, key, cutoff, cap)? else {
            return Ok(None);
        };
        let new_hash = old.hash ^ entry_digest(arena, key, &result.removed);
        let new_external = old.external_size - cap.external_size(arena, key) - cap.external_size(arena, &result.removed);
        let new_header = arena.alloc(HeaderRepr {
            root: result.offset,
            count: old.count - 1,
            external_size: new_external,
            hash: new_hash,
        })?;
        Ok(Some((new_header, result.removed)))
    })
}

#[must_use]
pub fn iter(arena: &Arena, header_offset: Offset) -> Iter<'_> {
    Iter::new(arena, header(arena, header_offset).root)
}

/// Lexicographic comparison of two BSTs' contents, used when a `Term`
/// nested inside another container points at a BST (spec.md §4.2).
#[must_use]
pub fn cmp(arena: &Arena, a_header: Offset, b_header: Offset) -> Ordering {
    if a_header == b_header {
        return Ordering::Equal;
    }
    let mut a_iter = iter(arena, a_header);
    let mut b_iter = iter(arena, b_header);
    loop {
        match (a_iter.next(), b_iter.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((ak, av)), Some((bk, bv))) => {
                match term::cmp(arena, &ak, &bk) {
                    Ordering::Equal => {}
                    other => return other,
                }
                match term::cmp(arena, &av, &bv) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
        }
    }
}

/// Validates the red-black invariants against the real tree shape — used
/// only by tests (spec.md §8's "canonical form" properties).
#[must_use]
pub fn check_invariants(arena: &Arena, header_offset: Offset) -> bool {
    let h = header(arena, header_offset);
    if h.root != SENTINEL && arena.read::<NodeRepr>(h.root).color != node::BLACK {
        return false;
    }
    black_height(arena, h.root).is_some()
}

fn black_height(arena: &Arena, offset: Offset) -> Option<u64> {
    if offset == SENTINEL {
        return Some(1);
    }
    let n: NodeRepr = arena.read(offset);
    if n.color == node::RED {
        if node::is_red(arena, n.left) || node::is_red(arena, n.right) {
            return None;
        }
    }
    let left = black_height(arena, n.left)?;
    let right = black_height(arena, n.right)?;
    if left != right {
        return None;
    }
    Some(left + u64::from(n.color == node::BLACK))
}
