//! Per-call behavior bundle, replacing the comparator/render/external-size
//! function pointers spec.md §9 attaches to a BST header.
//!
//! spec.md's C ancestor stores three raw function pointers in the header
//! bytes themselves. That only works because C has no trait objects; in
//! Rust the idiomatic shape is a small trait passed by the caller at each
//! call site, the same way `champ-trie`'s `ChampMap<K, V>` carries its
//! `Hash + Eq` behavior through generic bounds rather than through stored
//! pointers. A `Capability` is never written into the arena — it travels
//! alongside the header offset, for the lifetime of one call.

use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::term::Term;

/// The behavior a container needs to order, render, and size its terms.
pub trait Capability {
    /// Orders two terms. Must be a total order consistent across the whole
    /// lifetime of a given tree — changing it between calls on the same
    /// header produces an unspecified but not unsafe result.
    fn compare(&self, arena: &Arena, a: &Term, b: &Term) -> Ordering;

    /// Produces a human-readable rendering of a term, used only by
    /// `Debug` impls and diagnostics.
    fn render(&self, arena: &Arena, term: &Term) -> String;

    /// The "external size" contribution of a term beyond its inline
    /// 16 bytes: `0` for scalars, the nested container's external size
    /// otherwise.
    fn external_size(&self, arena: &Arena, term: &Term) -> u64;
}

/// The capability every container uses unless a caller supplies another:
/// orders terms by tag then payload (recursing into nested containers'
/// own default ordering), renders with `Debug`, and sizes via
/// [`crate::term::external_size`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCapability;

impl Capability for DefaultCapability {
    fn compare(&self, arena: &Arena, a: &Term, b: &Term) -> Ordering {
        crate::term::cmp(arena, a, b)
    }

    fn render(&self, _arena: &Arena, term: &Term) -> String {
        format!("{term:?}")
    }

    fn external_size(&self, arena: &Arena, term: &Term) -> u64 {
        crate::term::external_size(arena, term)
    }
}

impl fmt::Debug for dyn Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Capability")
    }
}
