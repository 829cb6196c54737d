//! HAMT collision-cell tests (spec.md §9's hash-collision open question,
//! resolved in SPEC_FULL.md by adding a `Collision` cell).
//!
//! The public API hashes keys with a process-seeded SipHash the test
//! cannot override, so these drive the crate-internal `hamt::insert`/`get`/
//! `remove` functions directly with a forced, shared `hash` value — the
//! same idea as the teacher's `CollidingKey` with a user-controlled `Hash`
//! impl, applied one layer lower since `Term`'s hash isn't user-pluggable.

use super::fresh_arena;
use crate::capability::DefaultCapability;
use crate::hamt::node::NodeRepr;
use crate::hamt::{get, insert, remove};
use crate::region::Region;
use crate::term::Term;

const FORCED_HASH: u64 = 0xDEAD_BEEF_CAFE_F00D;

#[test]
fn two_colliding_keys_build_a_collision_cell() {
    let mut arena = fresh_arena();
    let root = arena.alloc(NodeRepr::empty()).unwrap();

    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let r1 = insert::insert(&mut arena, &mut region, root, FORCED_HASH, 0, Term::from_u64(1), Term::from_u64(100), cutoff, &DefaultCapability).unwrap();
    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let r2 = insert::insert(&mut arena, &mut region, r1.offset, FORCED_HASH, 0, Term::from_u64(2), Term::from_u64(200), cutoff, &DefaultCapability).unwrap();

    assert_eq!(get::get(&arena, r2.offset, FORCED_HASH, &Term::from_u64(1), &DefaultCapability).and_then(|v| v.as_u64()), Some(100));
    assert_eq!(get::get(&arena, r2.offset, FORCED_HASH, &Term::from_u64(2), &DefaultCapability).and_then(|v| v.as_u64()), Some(200));
    assert_eq!(get::get(&arena, r2.offset, FORCED_HASH, &Term::from_u64(3), &DefaultCapability), None);
}

#[test]
fn three_colliding_keys() {
    let mut arena = fresh_arena();
    let mut root = arena.alloc(NodeRepr::empty()).unwrap();
    for i in 0_u64..3 {
        let cutoff = arena.cursor();
        let mut region = Region::scratch(&arena);
        root = insert::insert(&mut arena, &mut region, root, FORCED_HASH, 0, Term::from_u64(i), Term::from_u64(i * 10), cutoff, &DefaultCapability).unwrap().offset;
    }
    for i in 0_u64..3 {
        assert_eq!(get::get(&arena, root, FORCED_HASH, &Term::from_u64(i), &DefaultCapability).and_then(|v| v.as_u64()), Some(i * 10));
    }
}

#[test]
fn overwrite_in_collision_bucket() {
    let mut arena = fresh_arena();
    let root = arena.alloc(NodeRepr::empty()).unwrap();
    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let r1 = insert::insert(&mut arena, &mut region, root, FORCED_HASH, 0, Term::from_u64(1), Term::from_u64(1), cutoff, &DefaultCapability).unwrap();
    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let r2 = insert::insert(&mut arena, &mut region, r1.offset, FORCED_HASH, 0, Term::from_u64(2), Term::from_u64(2), cutoff, &DefaultCapability).unwrap();
    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let r3 = insert::insert(&mut arena, &mut region, r2.offset, FORCED_HASH, 0, Term::from_u64(1), Term::from_u64(99), cutoff, &DefaultCapability).unwrap();

    assert_eq!(r3.previous.and_then(|v| v.as_u64()), Some(1));
    assert_eq!(get::get(&arena, r3.offset, FORCED_HASH, &Term::from_u64(1), &DefaultCapability).and_then(|v| v.as_u64()), Some(99));
}

#[test]
fn remove_from_collision_bucket() {
    let mut arena = fresh_arena();
    let mut root = arena.alloc(NodeRepr::empty()).unwrap();
    for i in 0_u64..3 {
        let cutoff = arena.cursor();
        let mut region = Region::scratch(&arena);
        root = insert::insert(&mut arena, &mut region, root, FORCED_HASH, 0, Term::from_u64(i), Term::from_u64(i), cutoff, &DefaultCapability).unwrap().offset;
    }
    let cutoff = arena.cursor();
    let mut region = Region::scratch(&arena);
    let result = remove::remove(&mut arena, &mut region, root, FORCED_HASH, 0, &Term::from_u64(1), cutoff, &DefaultCapability).unwrap().unwrap();
    root = result.offset;
    assert_eq!(result.removed.as_u64(), Some(1));
    assert_eq!(get::get(&arena, root, FORCED_HASH, &Term::from_u64(0), &DefaultCapability).and_then(|v| v.as_u64()), Some(0));
    assert_eq!(get::get(&arena, root, FORCED_HASH, &Term::from_u64(1), &DefaultCapability), None);
    assert_eq!(get::get(&arena, root, FORCED_HASH, &Term::from_u64(2), &DefaultCapability).and_then(|v| v.as_u64()), Some(2));
}

#[test]
fn mixed_collisions_and_normal_keys_via_public_api() {
    // Ordinary distinct keys almost never collide with a random process
    // seed; exercise the public insert path to confirm non-colliding keys
    // and the low-level colliding ones above share the same node shape
    // (both are ordinary `NodeRepr`s with 32 cells).
    let mut arena = fresh_arena();
    let mut header = crate::hamt::init(&mut arena).unwrap();
    for i in 0_u64..20 {
        let cutoff = arena.cursor();
        header = crate::hamt::insert(&mut arena, header, Term::from_u64(i), Term::from_u64(i), cutoff).unwrap();
    }
    assert_eq!(crate::hamt::len(&arena, header), 20);
    for i in 0_u64..20 {
        assert_eq!(crate::hamt::get(&arena, header, &Term::from_u64(i)).and_then(|v| v.as_u64()), Some(i));
    }
}
