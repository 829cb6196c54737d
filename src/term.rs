//! The tagged key/value carried by every container (spec.md §3, §4.2).

use std::cmp::Ordering;
use std::fmt;

use crate::arena::{Arena, Offset};
use crate::hasher::Hasher;

/// Discriminant for [`Term`]'s payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TermTag {
    /// An inline 64-bit unsigned integer.
    U64 = 0,
    /// An inline 64-bit float.
    Dbl = 1,
    /// An offset to a BST header.
    Bst = 2,
    /// An offset to a structmap header.
    Structmap = 3,
}

/// A tagged sum value carried as a key or value: `u64`, `f64`, or an offset
/// handle to a BST/structmap root (spec.md §3).
///
/// `Term` has value semantics — copying one never deep-copies the
/// persistent structure it may reference, because that structure is
/// immutable once published.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Term {
    tag: u8,
    _pad: [u8; 7],
    payload: u64,
}

impl Term {
    /// Wraps a `u64` scalar.
    #[must_use]
    pub const fn from_u64(v: u64) -> Self {
        Self {
            tag: TermTag::U64 as u8,
            _pad: [0; 7],
            payload: v,
        }
    }

    /// Wraps an `f64` scalar.
    #[must_use]
    pub fn from_f64(v: f64) -> Self {
        Self {
            tag: TermTag::Dbl as u8,
            _pad: [0; 7],
            payload: v.to_bits(),
        }
    }

    /// Wraps a BST header offset.
    #[must_use]
    pub const fn from_bst(header: Offset) -> Self {
        Self {
            tag: TermTag::Bst as u8,
            _pad: [0; 7],
            payload: header,
        }
    }

    /// Wraps a structmap header offset.
    #[must_use]
    pub const fn from_structmap(header: Offset) -> Self {
        Self {
            tag: TermTag::Structmap as u8,
            _pad: [0; 7],
            payload: header,
        }
    }

    /// This term's tag.
    #[must_use]
    pub fn tag(&self) -> TermTag {
        match self.tag {
            0 => TermTag::U64,
            1 => TermTag::Dbl,
            2 => TermTag::Bst,
            _ => TermTag::Structmap,
        }
    }

    /// The raw payload bits, regardless of tag.
    #[must_use]
    pub const fn raw_payload(&self) -> u64 {
        self.payload
    }

    /// Returns the `u64` value if this term is tagged `U64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        matches!(self.tag(), TermTag::U64).then_some(self.payload)
    }

    /// Returns the `f64` value if this term is tagged `Dbl`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        matches!(self.tag(), TermTag::Dbl).then_some(f64::from_bits(self.payload))
    }

    /// Returns the BST header offset if this term is tagged `Bst`.
    #[must_use]
    pub fn as_bst(&self) -> Option<Offset> {
        matches!(self.tag(), TermTag::Bst).then_some(self.payload)
    }

    /// Returns the structmap header offset if this term is tagged
    /// `Structmap`.
    #[must_use]
    pub fn as_structmap(&self) -> Option<Offset> {
        matches!(self.tag(), TermTag::Structmap).then_some(self.payload)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            TermTag::U64 => write!(f, "Term::U64({})", self.payload),
            TermTag::Dbl => write!(f, "Term::Dbl({})", f64::from_bits(self.payload)),
            TermTag::Bst => write!(f, "Term::Bst(@{})", self.payload),
            TermTag::Structmap => write!(f, "Term::Structmap(@{})", self.payload),
        }
    }
}

/// Orders primarily by tag, then by payload; `Bst`/`Structmap` payloads
/// delegate to the respective container's own `cmp` (spec.md §4.2).
///
/// Nested containers are compared (and hashed — see [`hash_continue`]) using
/// the default term ordering, matching the single-comparator-per-tree model
/// spec.md describes: a `Term`'s tag carries no capture of whichever
/// comparator built the subtree it points at, only the BST/structmap header
/// the value actually lives at.
#[must_use]
pub fn cmp(arena: &Arena, a: &Term, b: &Term) -> Ordering {
    match a.tag().cmp(&b.tag()) {
        Ordering::Equal => {}
        other => return other,
    }
    match a.tag() {
        TermTag::U64 => a.payload.cmp(&b.payload),
        TermTag::Dbl => f64::from_bits(a.payload)
            .partial_cmp(&f64::from_bits(b.payload))
            .unwrap_or(Ordering::Equal),
        TermTag::Bst => crate::bst::cmp(arena, a.payload, b.payload),
        TermTag::Structmap => {
            // Identity by default (spec.md §4.5); fall back to content
            // comparison only when the roots differ but may still be
            // content-equal.
            if a.payload == b.payload {
                Ordering::Equal
            } else if crate::structmap::deep_eq(arena, a.payload, b.payload) {
                Ordering::Equal
            } else {
                a.payload.cmp(&b.payload)
            }
        }
    }
}

/// Feeds `term` into `hasher`: the tag byte, then either the scalar bytes or
/// the referenced container's cached content hash (spec.md §4.2) — this
/// makes the hash depend only on content, never on tree shape.
pub fn hash_continue(arena: &Arena, hasher: &mut Hasher, term: &Term) {
    hasher.continue_bytes(&[term.tag]);
    match term.tag() {
        TermTag::U64 | TermTag::Dbl => hasher.continue_bytes(&term.payload.to_le_bytes()),
        TermTag::Bst => hasher.continue_bytes(&crate::bst::header_hash(arena, term.payload).to_le_bytes()),
        TermTag::Structmap => {
            hasher.continue_bytes(&crate::structmap::header_hash(arena, term.payload).to_le_bytes());
        }
    }
}

/// `0` for scalars; the recursive external size of the referenced container
/// otherwise (spec.md §4.2).
#[must_use]
pub fn external_size(arena: &Arena, term: &Term) -> u64 {
    match term.tag() {
        TermTag::U64 | TermTag::Dbl => 0,
        TermTag::Bst => crate::bst::header_external_size(arena, term.payload),
        TermTag::Structmap => crate::structmap::header_external_size(arena, term.payload),
    }
}
