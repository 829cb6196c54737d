//! Allocation-failure atomicity (spec.md §8 scenario 6): a region with just
//! enough room for the first two inserts must fail the third with
//! `AllocationFailure`, leaving the arena cursor and the tree exactly as
//! they were just before that call.

use super::fresh_arena;
use crate::capability::DefaultCapability;
use crate::error::PatchError;
use crate::region::Region;
use crate::term::Term;
use crate::{bst, hamt, structmap};

#[test]
fn bst_third_insert_into_an_exhausted_region_fails_atomically() {
    let k1 = Term::from_u64(1);
    let k2 = Term::from_u64(2);
    let k3 = Term::from_u64(3);

    // The exact byte cost of two node-sized inserts depends on node layout
    // and rebalancing, not on anything this test should hardcode — measure
    // it by running the same two inserts unbounded first.
    let mut probe = fresh_arena();
    let mut probe_header = bst::init(&mut probe).unwrap();
    let region_start = probe.cursor();
    let cutoff = probe.cursor();
    probe_header = bst::insert(&mut probe, probe_header, k1, Term::from_u64(10), cutoff).unwrap();
    let cutoff = probe.cursor();
    let _ = bst::insert(&mut probe, probe_header, k2, Term::from_u64(20), cutoff).unwrap();
    let budget = (probe.cursor() - region_start) as usize;

    let mut arena = fresh_arena();
    let mut header = bst::init(&mut arena).unwrap();
    let mut region = Region::bounded(&arena, budget);

    let cutoff = arena.cursor();
    header = bst::insert_in_region(&mut arena, &mut region, header, k1, Term::from_u64(10), cutoff, &DefaultCapability).unwrap();
    let cutoff = arena.cursor();
    header = bst::insert_in_region(&mut arena, &mut region, header, k2, Term::from_u64(20), cutoff, &DefaultCapability).unwrap();

    let pre_third_cursor = arena.cursor();
    let entries_before: Vec<_> = bst::iter(&arena, header).collect();
    let hash_before = bst::header_hash(&arena, header);

    let cutoff = arena.cursor();
    let err = bst::insert_in_region(&mut arena, &mut region, header, k3, Term::from_u64(30), cutoff, &DefaultCapability)
        .expect_err("region has no room left for a third node");
    assert!(matches!(err, PatchError::AllocationFailure { .. }));

    assert_eq!(arena.cursor(), pre_third_cursor, "a failed insert must leave the cursor untouched");
    assert_eq!(bst::get(&arena, header, &k3), None, "the failed key must not be visible");
    assert_eq!(bst::header_hash(&arena, header), hash_before);
    let entries_after: Vec<_> = bst::iter(&arena, header).collect();
    assert_eq!(entries_before, entries_after, "the tree must be bit-identical to its post-second-insert state");
}

#[test]
fn hamt_third_insert_into_an_exhausted_region_fails_atomically() {
    let k1 = Term::from_u64(100);
    let k2 = Term::from_u64(200);
    let k3 = Term::from_u64(300);

    let mut probe = fresh_arena();
    let mut probe_header = hamt::init(&mut probe).unwrap();
    let region_start = probe.cursor();
    let cutoff = probe.cursor();
    probe_header = hamt::insert(&mut probe, probe_header, k1, Term::from_u64(1), cutoff).unwrap();
    let cutoff = probe.cursor();
    let _ = hamt::insert(&mut probe, probe_header, k2, Term::from_u64(2), cutoff).unwrap();
    let budget = (probe.cursor() - region_start) as usize;

    let mut arena = fresh_arena();
    let header = hamt::init(&mut arena).unwrap();
    let mut region = Region::bounded(&arena, budget);

    let cutoff = arena.cursor();
    let header = hamt::insert_in_region(&mut arena, &mut region, header, k1, Term::from_u64(1), cutoff, &DefaultCapability).unwrap();
    let cutoff = arena.cursor();
    let header = hamt::insert_in_region(&mut arena, &mut region, header, k2, Term::from_u64(2), cutoff, &DefaultCapability).unwrap();

    let pre_third_cursor = arena.cursor();
    let hash_before = hamt::header_hash(&arena, header);

    let cutoff = arena.cursor();
    let err = hamt::insert_in_region(&mut arena, &mut region, header, k3, Term::from_u64(3), cutoff, &DefaultCapability)
        .expect_err("region has no room left for a third node");
    assert!(matches!(err, PatchError::AllocationFailure { .. }));

    assert_eq!(arena.cursor(), pre_third_cursor);
    assert_eq!(hamt::get(&arena, header, &k3), None);
    assert_eq!(hamt::header_hash(&arena, header), hash_before);
}

#[test]
fn structmap_third_insert_into_an_exhausted_region_fails_atomically() {
    let mut probe = fresh_arena();
    let mut probe_header = structmap::init(&mut probe).unwrap();
    let region_start = probe.cursor();
    let cutoff = probe.cursor();
    probe_header = structmap::insert(&mut probe, probe_header, 1, Term::from_u64(10), cutoff).unwrap();
    let cutoff = probe.cursor();
    let _ = structmap::insert(&mut probe, probe_header, 2, Term::from_u64(20), cutoff).unwrap();
    let budget = (probe.cursor() - region_start) as usize;

    let mut arena = fresh_arena();
    let mut header = structmap::init(&mut arena).unwrap();
    let mut region = Region::bounded(&arena, budget);

    let cutoff = arena.cursor();
    header = structmap::insert_in_region(&mut arena, &mut region, header, 1, Term::from_u64(10), cutoff).unwrap();
    let cutoff = arena.cursor();
    header = structmap::insert_in_region(&mut arena, &mut region, header, 2, Term::from_u64(20), cutoff).unwrap();

    let pre_third_cursor = arena.cursor();
    let hash_before = structmap::header_hash(&arena, header);

    let cutoff = arena.cursor();
    let err = structmap::insert_in_region(&mut arena, &mut region, header, 3, Term::from_u64(30), cutoff)
        .expect_err("region has no room left for a third slot allocation");
    assert!(matches!(err, PatchError::AllocationFailure { .. }));

    assert_eq!(arena.cursor(), pre_third_cursor);
    assert_eq!(structmap::get(&arena, header, 3), None);
    assert_eq!(structmap::header_hash(&arena, header), hash_before);
}
