//! Ascending-key traversal over a structmap snapshot, either layout.

use crate::arena::{Arena, Offset};
use crate::term::Term;

use super::node::{CondensedNodeRepr, HeaderRepr, SparseNodeRepr, L, LAYOUT_SPARSE, SLOT_CHILD, SLOT_VALUE};

struct StackFrame {
    offset: Offset,
    next_frag: usize,
    level: u32,
    prefix: u64,
}

pub struct Iter<'a> {
    arena: &'a Arena,
    sparse: bool,
    stack: Vec<StackFrame>,
}

impl<'a> Iter<'a> {
    pub(super) fn new(arena: &'a Arena, h: HeaderRepr) -> Self {
        Self {
            arena,
            sparse: h.layout == LAYOUT_SPARSE,
            stack: vec![StackFrame { offset: h.root, next_frag: 0, level: h.height - 1, prefix: 0 }],
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u64, Term);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.next_frag >= super::node::FANOUT {
                self.stack.pop();
                continue;
            }
            let frag = frame.next_frag;
            frame.next_frag += 1;
            let (offset, level, prefix) = (frame.offset, frame.level, frame.prefix);

            let slot = if self.sparse {
                let node: SparseNodeRepr = self.arena.read(offset);
                node.slots[frag]
            } else {
                let node: CondensedNodeRepr = self.arena.read(offset);
                let Some(s) = node.slot_at(self.arena, frag) else { continue };
                s
            };
            let child_prefix = prefix | ((frag as u64) << (level * L));
            if level == 0 {
                if slot.tag == SLOT_VALUE {
                    return Some((child_prefix, slot.value));
                }
                continue;
            }
            if slot.tag == SLOT_CHILD {
                self.stack.push(StackFrame { offset: slot.child, next_frag: 0, level: level - 1, prefix: child_prefix });
            }
        }
    }
}
