//! Unordered traversal over a HAMT snapshot.

use crate::arena::{Arena, Offset};
use crate::term::Term;

use super::node::{NodeRepr, BRANCH, COLLISION, EMPTY, ITEM};

enum Frame {
    Node(Offset, usize),
    Bucket(Vec<(Term, Term)>, usize),
}

pub struct Iter<'a> {
    arena: &'a Arena,
    stack: Vec<Frame>,
}

impl<'a> Iter<'a> {
    pub(super) fn new(arena: &'a Arena, root: Offset) -> Self {
        Self { arena, stack: vec![Frame::Node(root, 0)] }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Term, Term);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.last_mut()? {
                Frame::Bucket(entries, idx) => {
                    if *idx >= entries.len() {
                        self.stack.pop();
                        continue;
                    }
                    let pair = entries[*idx];
                    *idx += 1;
                    return Some(pair);
                }
                Frame::Node(offset, idx) => {
                    if *idx >= super::node::FANOUT {
                        self.stack.pop();
                        continue;
                    }
                    let node: NodeRepr = self.arena.read(*offset);
                    let cell = node.cells[*idx];
                    *idx += 1;
                    match cell.tag {
                        EMPTY => {}
                        ITEM => return Some((cell.key, cell.value)),
                        BRANCH => self.stack.push(Frame::Node(cell.child, 0)),
                        COLLISION => {
                            let entries = super::node::read_collision_bucket(self.arena, cell.child, cell.collision_len)
                                .into_iter()
                                .map(|e| (e.key, e.value))
                                .collect();
                            self.stack.push(Frame::Bucket(entries, 0));
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
