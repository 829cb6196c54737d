//! Offset-addressed, path-copy persistent associative containers sharing
//! one linear arena.
//!
//! Three container families live side by side over the same [`arena::Arena`]:
//!
//! - [`bst`] — an order-preserving red-black tree, built top-down with path
//!   copying and an explicit cutoff deciding when a node may be mutated in
//!   place versus copied.
//! - [`hamt`] — a hash array mapped trie using the same arena/offset
//!   discipline, unordered, keyed by term hash.
//! - [`structmap`] — a tag-sharded trie keyed by a raw `u64` identifier,
//!   with a mutable sparse layout and a read-only, popcount-compacted
//!   condensed layout.
//!
//! All three obey one invariant: once a mutation publishes a new root
//! offset, no byte at an offset strictly less than the caller-supplied
//! cutoff has been modified. That is what makes old root offsets cheap,
//! valid snapshots, and what makes a failed mutation's speculative
//! allocations safe to discard by rewinding the arena cursor.
//!
//! [`lowerbound`] tracks which cutoffs are still held by live readers;
//! [`logmap`] layers an append-only command log on top that periodically
//! consolidates into a [`bst`]; [`gc`] is the cross-thread notification
//! word a read-only collector uses to find what is safe to reclaim.
//!
//! # References
//!
//! - Okasaki, 1999 — "Purely Functional Data Structures" (the red-black
//!   insertion balance this crate's [`bst`] uses)
//! - Cormen, Leiserson, Rivest & Stein — "Introduction to Algorithms" (the
//!   red-black deletion fixup cases, adapted to a parent-pointer-free,
//!   path-copying recursive form)
//! - Bagwell, 2001 — "Ideal Hash Trees"; Steindorfer & Vinju, 2015 —
//!   "Optimizing Hash-Array Mapped Tries..." (the CHAMP-style popcount
//!   compaction this crate's [`structmap`] condensed layout reuses)

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod bst;
pub mod capability;
pub mod error;
pub mod gc;
pub mod hamt;
pub mod hasher;
pub mod logmap;
pub mod lowerbound;
pub mod region;
pub mod structmap;
pub mod term;

#[cfg(test)]
mod tests;

pub use arena::{Arena, ArenaOptions, Offset};
pub use capability::{Capability, DefaultCapability};
pub use error::{PatchError, Result};
pub use term::{Term, TermTag};
