use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use btree_list::{BTreeList, DEFAULT_ORDER, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The number of operations to perform in each randomized run.
const TEST_SIZE: usize = 10_000;

/// Orders small enough to force deep trees and frequent rebalancing.
const SMALL_ORDERS: [usize; 6] = [2, 3, 4, 5, 7, 16];

fn list_with_order<T>(order: usize) -> BTreeList<T> {
    BTreeList::with_order(order).expect("order is at least 2")
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Asserts the list holds exactly `model`, reading it every way the API allows.
fn assert_matches(list: &BTreeList<u64>, model: &[u64]) {
    list.validate().unwrap();
    assert_eq!(list.len(), model.len());
    assert_eq!(list.is_empty(), model.is_empty());
    assert_eq!(list.to_vec().unwrap(), model);
    assert!(list.iter().eq(model.iter()));

    let mut seen = Vec::with_capacity(model.len());
    list.for_each(|&value| seen.push(value));
    assert_eq!(seen, model);

    assert_eq!(list.first(), model.first().ok_or(Error::Empty));
    assert_eq!(list.last(), model.last().ok_or(Error::Empty));
}

// ─── Construction and sizing ─────────────────────────────────────────────────

#[test]
fn new_list_uses_default_order() {
    let list: BTreeList<u8> = BTreeList::new();
    assert_eq!(list.order(), DEFAULT_ORDER);
    assert_eq!(list.min_occupancy(), DEFAULT_ORDER / 2);
    assert_eq!(list.height(), 0);
    assert!(list.is_empty());
    list.validate().unwrap();
}

#[test]
fn orders_below_two_are_rejected() {
    for order in [0, 1] {
        assert_eq!(
            BTreeList::<u8>::with_order(order).unwrap_err(),
            Error::InvalidOrder { order }
        );
    }
    assert_eq!(list_with_order::<u8>(2).min_occupancy(), 1);
    assert_eq!(list_with_order::<u8>(3).min_occupancy(), 2);
}

#[test]
fn push_round_trips_around_level_boundaries() {
    for order in [2, 3, 4, 9, DEFAULT_ORDER] {
        let sizes = [0, 1, order - 1, order, order + 1, 2 * order * order, 2 * order * order + 1];
        for n in sizes {
            let mut list = list_with_order(order);
            for value in 0..n as u64 {
                list.push(value);
            }
            let model: Vec<u64> = (0..n as u64).collect();
            assert_matches(&list, &model);
            for (index, value) in model.iter().enumerate() {
                assert_eq!(list.get(index), Ok(value));
            }
        }
    }
}

#[test]
fn height_stays_logarithmic() {
    let mut list = list_with_order(4);
    list.append_all(0..100_000u64);
    // Every non-root node is at least half full: height <= log2(n) + 1.
    assert!(list.height() <= 17, "height {} is too deep", list.height());

    while list.len() > 1 {
        let mid = list.len() / 2;
        list.remove(mid).unwrap();
    }
    list.validate().unwrap();
    assert_eq!(list.height(), 0);
}

// ─── Positional edits against a Vec model ────────────────────────────────────

/// Replays seeded random edits on a list and a `Vec`, comparing them in full every
/// `check_every` steps.
fn replay_random_edits(order: usize, seed: u64, check_every: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = list_with_order(order);
    let mut model: Vec<u64> = Vec::new();

    for step in 0..TEST_SIZE {
        let value: u64 = rng.r#gen();
        match rng.gen_range(0..10) {
            0..=3 => {
                let index = rng.gen_range(0..=model.len());
                list.insert(index, value).unwrap();
                model.insert(index, value);
            }
            4..=6 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                assert_eq!(list.remove(index), Ok(model.remove(index)));
            }
            7 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                let old = std::mem::replace(&mut model[index], value);
                assert_eq!(list.set(index, value), Ok(old));
            }
            8 => {
                list.push(value);
                model.push(value);
            }
            _ if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                assert_eq!(list.get(index), Ok(&model[index]));
            }
            _ => {}
        }
        if step % check_every == 0 {
            assert_matches(&list, &model);
        }
    }
    assert_matches(&list, &model);

    while !model.is_empty() {
        let index = rng.gen_range(0..model.len());
        assert_eq!(list.remove(index), Ok(model.remove(index)));
    }
    assert_matches(&list, &model);
    assert_eq!(list.height(), 0);
}

#[test]
fn random_edits_match_vec_at_default_order() {
    replay_random_edits(DEFAULT_ORDER, 0x5eed, 1);
}

#[test]
fn random_edits_match_vec_at_small_orders() {
    for (seed, order) in SMALL_ORDERS.into_iter().enumerate() {
        replay_random_edits(order, seed as u64, 500);
    }
}

#[test]
fn front_insertions_renumber_everything() {
    let mut list = list_with_order(3);
    for value in 0..2_000u64 {
        list.insert(0, value).unwrap();
    }
    let model: Vec<u64> = (0..2_000u64).rev().collect();
    assert_matches(&list, &model);
}

#[test]
fn failed_edits_leave_list_unchanged() {
    let mut list = list_with_order(4);
    list.append_all(0..50u64);
    let before = list.clone();

    assert_eq!(list.get(50), Err(Error::OutOfRange { index: 50, len: 50 }));
    assert_eq!(list.set(50, 0), Err(Error::OutOfRange { index: 50, len: 50 }));
    assert_eq!(list.remove(usize::MAX), Err(Error::OutOfRange { index: usize::MAX, len: 50 }));
    assert_eq!(list.insert(51, 0), Err(Error::InsertOutOfRange { index: 51, len: 50 }));

    assert_eq!(list, before);
    list.validate().unwrap();

    let mut empty: BTreeList<u64> = BTreeList::new();
    assert_eq!(empty.remove(0), Err(Error::OutOfRange { index: 0, len: 0 }));
    assert_eq!(empty.insert(0, 7), Ok(()));
}

#[test]
fn cleared_list_is_reusable() {
    let mut list = list_with_order(2);
    list.append_all(0..300u64);
    list.clear();
    assert_matches(&list, &[]);
    assert_eq!(list.order(), 2);

    list.append_all(10..20u64);
    assert_matches(&list, &(10..20).collect::<Vec<_>>());
}

// ─── Bulk append ─────────────────────────────────────────────────────────────

#[test]
fn bulk_append_matches_repeated_push() {
    for order in SMALL_ORDERS {
        for n in [0, 1, order, order * order + 1, 1_000] {
            let mut pushed = list_with_order(order);
            for value in 0..n as u64 {
                pushed.push(value);
            }
            let mut bulk = list_with_order(order);
            bulk.append_all(0..n as u64);

            bulk.validate().unwrap();
            assert_eq!(bulk, pushed);
        }
    }
}

#[test]
fn bulk_append_after_edits() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut list = list_with_order(3);
    let mut model: Vec<u64> = Vec::new();

    for round in 0..40u64 {
        let batch: Vec<u64> = (0..rng.gen_range(0..60)).map(|i| round * 1_000 + i).collect();
        list.append_all(batch.iter().copied());
        model.extend_from_slice(&batch);
        list.validate().unwrap();

        for _ in 0..rng.gen_range(0..20) {
            if model.is_empty() {
                break;
            }
            let index = rng.gen_range(0..model.len());
            assert_eq!(list.remove(index), Ok(model.remove(index)));
        }
    }
    assert_matches(&list, &model);
}

// ─── Copies and conversions ──────────────────────────────────────────────────

#[test]
fn clone_is_independent() {
    let mut original = list_with_order(4);
    original.append_all(0..500u64);
    let mut copy = original.clone();
    copy.validate().unwrap();
    assert_eq!(copy, original);

    copy.insert(0, 999).unwrap();
    copy.remove(250).unwrap();
    original.set(499, 0).unwrap();

    let mut left: Vec<u64> = (0..500).collect();
    left[499] = 0;
    assert_matches(&original, &left);

    let mut right: Vec<u64> = (0..500).collect();
    right.insert(0, 999);
    right.remove(250);
    assert_matches(&copy, &right);
}

#[test]
fn owned_values_move_out_in_order() {
    let mut list = list_with_order(3);
    list.append_all((0..100).map(|i| i.to_string()));
    list.remove(0).unwrap();

    let strings: Vec<String> = list.clone().into_iter().collect();
    assert_eq!(strings, (1..100).map(|i| i.to_string()).collect::<Vec<_>>());

    let mut reversed = list.clone().into_iter();
    assert_eq!(reversed.next_back().as_deref(), Some("99"));
    assert_eq!(reversed.len(), 98);

    assert_eq!(list.into_vec(), strings);
}

#[test]
fn conversions_keep_position_order() {
    let from_array = BTreeList::from([3u64, 1, 2]);
    let from_vec = BTreeList::from(vec![3u64, 1, 2]);
    let collected: BTreeList<u64> = [3, 1, 2].into_iter().collect();
    assert_eq!(from_array, from_vec);
    assert_eq!(from_vec, collected);
    assert_eq!(hash_of(&from_array), hash_of(&collected));
    assert_eq!(format!("{from_array:?}"), "[3, 1, 2]");

    let mut extended = BTreeList::new();
    extended.extend([3u64]);
    extended.extend(&[1, 2]);
    assert_eq!(extended, from_array);
}

#[test]
fn ordering_is_lexicographic() {
    let short = BTreeList::from([1, 2]);
    let long = BTreeList::from([1, 2, 0]);
    let bigger = BTreeList::from([1, 3]);
    assert!(short < long);
    assert!(long < bigger);
    assert_eq!(short.partial_cmp(&short.clone()), Some(std::cmp::Ordering::Equal));
}

#[test]
fn iterator_can_be_forked() {
    let mut list = list_with_order(2);
    list.append_all(0..64u64);
    let mut iter = list.iter();
    iter.by_ref().take(10).for_each(drop);

    let fork = iter.clone();
    assert_eq!(fork.len(), 54);
    assert!(fork.eq(iter.by_ref()));
    assert_eq!(iter.next(), None);
}

// ─── Randomized operation sequences ──────────────────────────────────────────

#[derive(Debug, Clone)]
enum ListOp {
    Insert(usize, u64),
    Remove(usize),
    Set(usize, u64),
    Push(u64),
    Append(Vec<u64>),
    Get(usize),
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        4 => (any::<usize>(), any::<u64>()).prop_map(|(i, v)| ListOp::Insert(i, v)),
        3 => any::<usize>().prop_map(ListOp::Remove),
        1 => (any::<usize>(), any::<u64>()).prop_map(|(i, v)| ListOp::Set(i, v)),
        1 => any::<u64>().prop_map(ListOp::Push),
        1 => proptest::collection::vec(any::<u64>(), 0..40).prop_map(ListOp::Append),
        1 => any::<usize>().prop_map(ListOp::Get),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Replays the same operations on a `BTreeList` and a `Vec`, including out-of-range
    /// positions, and checks results and structure after every step.
    #[test]
    fn list_ops_match_vec(
        order in 2usize..10,
        ops in proptest::collection::vec(list_op_strategy(), 0..200),
    ) {
        let mut list = list_with_order(order);
        let mut model: Vec<u64> = Vec::new();

        for op in ops {
            let len = model.len();
            match op {
                // Bias positions into range while still hitting `len` and `len + 1`.
                ListOp::Insert(index, value) => {
                    let index = index % (len + 2);
                    if index <= len {
                        prop_assert_eq!(list.insert(index, value), Ok(()));
                        model.insert(index, value);
                    } else {
                        prop_assert_eq!(list.insert(index, value), Err(Error::InsertOutOfRange { index, len }));
                    }
                }
                ListOp::Remove(index) => {
                    let index = index % (len + 1);
                    if index < len {
                        prop_assert_eq!(list.remove(index), Ok(model.remove(index)));
                    } else {
                        prop_assert_eq!(list.remove(index), Err(Error::OutOfRange { index, len }));
                    }
                }
                ListOp::Set(index, value) => {
                    let index = index % (len + 1);
                    if index < len {
                        let old = std::mem::replace(&mut model[index], value);
                        prop_assert_eq!(list.set(index, value), Ok(old));
                    } else {
                        prop_assert_eq!(list.set(index, value), Err(Error::OutOfRange { index, len }));
                    }
                }
                ListOp::Push(value) => {
                    list.push(value);
                    model.push(value);
                }
                ListOp::Append(values) => {
                    list.append_all(values.iter().copied());
                    model.extend(values);
                }
                ListOp::Get(index) => {
                    let index = index % (len + 1);
                    prop_assert_eq!(list.get(index).ok(), model.get(index));
                }
            }

            prop_assert_eq!(list.validate(), Ok(()));
            prop_assert_eq!(list.len(), model.len());
        }

        prop_assert_eq!(list.into_vec(), model);
    }
}
