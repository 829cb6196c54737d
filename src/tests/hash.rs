//! `header.hash` (spec.md §8, invariant 5): XOR over reachable entries of
//! `hash(key) ^ hash(value) ^ tag bits`, maintained incrementally — so it
//! must return to zero on a full roundtrip, be order-independent, and
//! change on overwrite.

use super::fresh_arena;
use crate::term::Term;
use crate::{bst, hamt, structmap};

#[test]
fn bst_empty_hash_is_zero() {
    let mut arena = fresh_arena();
    let header = bst::init(&mut arena).unwrap();
    assert_eq!(bst::header_hash(&arena, header), 0);
}

#[test]
fn bst_roundtrip_hash_returns_to_zero() {
    let mut arena = fresh_arena();
    let mut header = bst::init(&mut arena).unwrap();
    for i in 0_u64..10 {
        let cutoff = arena.cursor();
        header = bst::insert(&mut arena, header, Term::from_u64(i), Term::from_u64(i * 3), cutoff).unwrap();
    }
    for i in 0_u64..10 {
        let cutoff = arena.cursor();
        let (new_header, _) = bst::delete(&mut arena, header, &Term::from_u64(i), cutoff).unwrap().unwrap();
        header = new_header;
    }
    assert_eq!(bst::header_hash(&arena, header), 0);
    assert_eq!(bst::len(&arena, header), 0);
}

#[test]
fn bst_hash_is_insertion_order_independent() {
    let mut arena = fresh_arena();
    let mut forward = bst::init(&mut arena).unwrap();
    for i in 0_u64..30 {
        let cutoff = arena.cursor();
        forward = bst::insert(&mut arena, forward, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    let mut backward = bst::init(&mut arena).unwrap();
    for i in (0_u64..30).rev() {
        let cutoff = arena.cursor();
        backward = bst::insert(&mut arena, backward, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    assert_eq!(bst::header_hash(&arena, forward), bst::header_hash(&arena, backward));
    assert_eq!(bst::len(&arena, forward), bst::len(&arena, backward));
}

#[test]
fn bst_hash_changes_on_overwrite() {
    let mut arena = fresh_arena();
    let mut header = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    header = bst::insert(&mut arena, header, Term::from_u64(1), Term::from_u64(1), cutoff).unwrap();
    let h1 = bst::header_hash(&arena, header);
    let cutoff = arena.cursor();
    header = bst::insert(&mut arena, header, Term::from_u64(1), Term::from_u64(2), cutoff).unwrap();
    let h2 = bst::header_hash(&arena, header);
    assert_ne!(h1, h2);
}

#[test]
fn hamt_hash_is_insertion_order_independent() {
    let mut arena = fresh_arena();
    let mut forward = hamt::init(&mut arena).unwrap();
    for i in 0_u64..30 {
        let cutoff = arena.cursor();
        forward = hamt::insert(&mut arena, forward, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    let mut backward = hamt::init(&mut arena).unwrap();
    for i in (0_u64..30).rev() {
        let cutoff = arena.cursor();
        backward = hamt::insert(&mut arena, backward, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    assert_eq!(hamt::header_hash(&arena, forward), hamt::header_hash(&arena, backward));
}

#[test]
fn hamt_roundtrip_hash_returns_to_zero() {
    let mut arena = fresh_arena();
    let mut header = hamt::init(&mut arena).unwrap();
    for i in 0_u64..20 {
        let cutoff = arena.cursor();
        header = hamt::insert(&mut arena, header, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    for i in 0_u64..20 {
        let cutoff = arena.cursor();
        let (new_header, _) = hamt::remove(&mut arena, header, &Term::from_u64(i), cutoff).unwrap().unwrap();
        header = new_header;
    }
    assert_eq!(hamt::header_hash(&arena, header), 0);
}

#[test]
fn structmap_hash_is_insertion_order_independent() {
    let mut arena = fresh_arena();
    let mut forward = structmap::init(&mut arena).unwrap();
    for i in 0_u64..30 {
        let cutoff = arena.cursor();
        forward = structmap::insert(&mut arena, forward, i, Term::from_u64(i), cutoff).unwrap();
    }
    let mut backward = structmap::init(&mut arena).unwrap();
    for i in (0_u64..30).rev() {
        let cutoff = arena.cursor();
        backward = structmap::insert(&mut arena, backward, i, Term::from_u64(i), cutoff).unwrap();
    }
    assert_eq!(structmap::header_hash(&arena, forward), structmap::header_hash(&arena, backward));
}

#[test]
fn structmap_roundtrip_hash_returns_to_zero() {
    let mut arena = fresh_arena();
    let mut header = structmap::init(&mut arena).unwrap();
    for i in 0_u64..20 {
        let cutoff = arena.cursor();
        header = structmap::insert(&mut arena, header, i, Term::from_u64(i), cutoff).unwrap();
    }
    for i in 0_u64..20 {
        let cutoff = arena.cursor();
        let (new_header, _) = structmap::remove(&mut arena, header, i, cutoff).unwrap().unwrap();
        header = new_header;
    }
    assert_eq!(structmap::header_hash(&arena, header), 0);
}

#[test]
fn nested_bst_in_bst_hash_depends_on_inner_content() {
    let mut arena = fresh_arena();
    let mut inner_a = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    inner_a = bst::insert(&mut arena, inner_a, Term::from_u64(1), Term::from_u64(2), cutoff).unwrap();

    let mut inner_b = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    inner_b = bst::insert(&mut arena, inner_b, Term::from_u64(1), Term::from_u64(3), cutoff).unwrap();

    let mut outer_a = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    outer_a = bst::insert(&mut arena, outer_a, Term::from_u64(0), Term::from_bst(inner_a), cutoff).unwrap();

    let mut outer_b = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    outer_b = bst::insert(&mut arena, outer_b, Term::from_u64(0), Term::from_bst(inner_b), cutoff).unwrap();

    assert_ne!(bst::header_hash(&arena, outer_a), bst::header_hash(&arena, outer_b));
}
