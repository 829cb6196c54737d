//! Red-black structural invariants (spec.md §8, invariants 1-3) and
//! content-canonicity: the same set of entries produces the same
//! `(count, hash, external_size)` triple regardless of how it was built.

use super::fresh_arena;
use crate::term::Term;
use crate::{bst, hamt, structmap};

#[test]
fn freshly_built_tree_satisfies_red_black_invariants() {
    let mut arena = fresh_arena();
    let mut header = bst::init(&mut arena).unwrap();
    for i in 0_u64..200 {
        let cutoff = arena.cursor();
        header = bst::insert(&mut arena, header, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
        assert!(bst::check_invariants(&arena, header), "violated after inserting {i}");
    }
}

#[test]
fn invariants_hold_through_interleaved_delete() {
    let mut arena = fresh_arena();
    let mut header = bst::init(&mut arena).unwrap();
    for i in 0_u64..100 {
        let cutoff = arena.cursor();
        header = bst::insert(&mut arena, header, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    for i in (0_u64..100).step_by(2) {
        let cutoff = arena.cursor();
        let (new_header, _) = bst::delete(&mut arena, header, &Term::from_u64(i), cutoff).unwrap().unwrap();
        header = new_header;
        assert!(bst::check_invariants(&arena, header), "violated after deleting {i}");
    }
}

#[test]
fn bst_insert_order_does_not_affect_content() {
    let mut arena = fresh_arena();
    let orders: [&[(u64, u64)]; 3] = [
        &[(1, 10), (2, 20), (3, 30)],
        &[(3, 30), (2, 20), (1, 10)],
        &[(2, 20), (3, 30), (1, 10)],
    ];
    let headers: Vec<crate::arena::Offset> = orders
        .iter()
        .map(|pairs| {
            let mut h = bst::init(&mut arena).unwrap();
            for &(k, v) in *pairs {
                let cutoff = arena.cursor();
                h = bst::insert(&mut arena, h, Term::from_u64(k), Term::from_u64(v), cutoff).unwrap();
            }
            h
        })
        .collect();

    for w in headers.windows(2) {
        assert_eq!(bst::header_hash(&arena, w[0]), bst::header_hash(&arena, w[1]));
        assert_eq!(bst::len(&arena, w[0]), bst::len(&arena, w[1]));
        assert_eq!(bst::cmp(&arena, w[0], w[1]), std::cmp::Ordering::Equal);
    }
}

#[test]
fn hamt_insert_order_does_not_affect_content() {
    let mut arena = fresh_arena();
    let entries: Vec<(u64, u64)> = (0..80).map(|i| (i, i * 7)).collect();

    let mut forward = hamt::init(&mut arena).unwrap();
    for &(k, v) in &entries {
        let cutoff = arena.cursor();
        forward = hamt::insert(&mut arena, forward, Term::from_u64(k), Term::from_u64(v), cutoff).unwrap();
    }
    let mut backward = hamt::init(&mut arena).unwrap();
    for &(k, v) in entries.iter().rev() {
        let cutoff = arena.cursor();
        backward = hamt::insert(&mut arena, backward, Term::from_u64(k), Term::from_u64(v), cutoff).unwrap();
    }
    assert_eq!(hamt::header_hash(&arena, forward), hamt::header_hash(&arena, backward));
    assert_eq!(hamt::len(&arena, forward), hamt::len(&arena, backward));
}

#[test]
fn external_size_accounts_nested_containers() {
    let mut arena = fresh_arena();
    let mut inner = bst::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    inner = bst::insert(&mut arena, inner, Term::from_u64(1), Term::from_u64(2), cutoff).unwrap();
    let inner_size = bst::header_external_size(&arena, inner);

    let mut outer = structmap::init(&mut arena).unwrap();
    let cutoff = arena.cursor();
    outer = structmap::insert(&mut arena, outer, 0, Term::from_bst(inner), cutoff).unwrap();

    assert_eq!(structmap::header_external_size(&arena, outer), inner_size);
}
