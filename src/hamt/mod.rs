//! Offset-addressed, path-copy CHAMP-style hash map (spec.md §4.4).

pub(crate) mod get;
pub(crate) mod insert;
mod iter;
pub(crate) mod node;
pub(crate) mod remove;

use crate::arena::{Arena, Offset};
use crate::capability::{Capability, DefaultCapability};
use crate::error::Result;
use crate::hasher::Hasher;
use crate::region::Region;
use crate::term::{self, Term};

pub use iter::Iter;
pub use node::{CellRepr, HeaderRepr, NodeRepr};

/// Allocates an empty HAMT, returning its header offset.
pub fn init(arena: &mut Arena) -> Result<Offset> {
    let root = arena.alloc(NodeRepr::empty())?;
    arena.alloc(HeaderRepr { root, count: 0, external_size: 0, hash: 0 })
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

fn key_hash(arena: &Arena, key: &Term) -> u64 {
    let mut h = Hasher::new();
    term::hash_continue(arena, &mut h, key);
    h.finish()
}

fn entry_digest(arena: &Arena, key: &Term, value: &Term) -> u64 {
    let mut h = Hasher::new();
    term::hash_continue(arena, &mut h, key);
    term::hash_continue(arena, &mut h, value);
    h.finish()
}

#[must_use]
pub fn get(arena: &Arena, header_offset: Offset, key: &Term) -> Option<Term> {
    get_with(arena, header_offset, key, &DefaultCapability)
}

#[must_use]
pub fn get_with(arena: &Arena, header_offset: Offset, key: &Term, cap: &dyn Capability) -> Option<Term> {
    let hash = key_hash(arena, key);
    get::get(arena, header(arena, header_offset).root, hash, key, cap)
}

#[must_use]
pub fn contains_key(arena: &Arena, header_offset: Offset, key: &Term) -> bool {
    get(arena, header_offset, key).is_some()
}

pub fn insert(arena: &mut Arena, header_offset: Offset, key: Term, value: Term, cutoff: Offset) -> Result<Offset> {
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

/// Like [`insert_with`], but allocates through a caller-supplied [`Region`]
/// instead of an unbounded scratch one (spec.md §4.1, §8 scenario 6).
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
        let hash = key_hash(arena, &key);
        let result = insert::insert(arena, region, old.root, hash, 0, key, value, cutoff, cap)?;
        let mut new_hash = old.hash ^ entry_digest(arena, &key, &value);
        let mut new_external = old.external_size + cap.external_size(arena, &key) + cap.external_size(arena, &value);
        let mut new_count = old.count + 1;
        if let Some(previous) = result.previous {
            new_hash ^= entry_digest(arena, &key, &previous);
            new_external -= cap.external_size(arena, &key) + cap.external_size(arena, &previous);
            new_count -= 1;
        }
        arena.alloc(HeaderRepr { root: result.offset, count: new_count, external_size: new_external, hash: new_hash })
    })
}

pub fn remove(arena: &mut Arena, header_offset: Offset, key: &Term, cutoff: Offset) -> Result<Option<(Offset, Term)>> {
    remove_with(arena, header_offset, key, cutoff, &DefaultCapability)
}

pub fn remove_with(
    arena: &mut Arena,
    header_offset: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<(Offset, Term)>> {
    let mut region = Region::scratch(arena);
    remove_in_region(arena, &mut region, header_offset, key, cutoff, cap)
}

/// Like [`remove_with`], but allocates through a caller-supplied [`Region`].
pub fn remove_in_region(
    arena: &mut Arena,
    region: &mut Region,
    header_offset: Offset,
    key: &Term,
    cutoff: Offset,
    cap: &dyn Capability,
) -> Result<Option<(Offset, Term)>> {
    arena.try_mutate(|arena| {
        let old = header(arena, header_offset);
        let hash = key_hash(arena, key);
        let Some(result) = remove::remove(arena, region, old.root, hash, 0, key, cutoff, cap)? else {
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
