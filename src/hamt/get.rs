//! HAMT lookup (spec.md §4.4.2).

use std::cmp::Ordering;

use crate::arena::Arena;
use crate::capability::Capability;
use crate::term::Term;

use super::node::{fragment, NodeRepr, BRANCH, COLLISION, EMPTY, ITEM};

#[must_use]
pub fn get(arena: &Arena, mut node_offset: crate::arena::Offset, hash: u64, key: &Term, cap: &dyn Capability) -> Option<Term> {
    let mut shift = 0u32;
    loop {
        let node: NodeRepr = arena.read(node_offset);
        let cell = node.cells[fragment(hash, shift)];
        match cell.tag {
            EMPTY => return None,
            ITEM => {
                return (cell.hash == hash && cap.compare(arena, key, &cell.key) == Ordering::Equal)
                    .then_some(cell.value);
            }
            BRANCH => {
                node_offset = cell.child;
                shift += super::node::BITS_PER_LEVEL;
            }
            COLLISION => {
                let entries = super::node::read_collision_bucket(arena, cell.child, cell.collision_len);
                return entries
                    .into_iter()
                    .find(|e| cap.compare(arena, key, &e.key) == Ordering::Equal)
                    .map(|e| e.value);
            }
            _ => return None,
        }
    }
}
