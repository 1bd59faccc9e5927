//! # LIFO Cleaning Tests
//!
//! A cleaning pass walks backward from the set's clean cursor, flags blocks that
//! are DIRTY without BLOCK_IO_INPROG as DISKWRITEINPROG, and stops after `assoc`
//! slots or `to_clean` flags. The next pass resumes one slot past the last slot
//! visited.

use std::collections::HashSet;

use blkcache_policy::common::{BlockIndex, BlockState, SetIndex};
use blkcache_policy::engine::{BlockStates, StateTable};
use blkcache_policy::{CachePolicy, PolicyError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{attached_lifo, cursors, table_with};
use crate::common::mocks::states::{MockStates, RecordingStates};

const V: BlockState = BlockState::VALID;
const D: BlockState = BlockState::DIRTY;
const IO: BlockState = BlockState::BLOCK_IO_INPROG;
const WB: BlockState = BlockState::DISKWRITEINPROG;

/// assoc=4, blocks 100..=103 = [DIRTY, VALID, DIRTY|BLOCK_IO_INPROG, INVALID],
/// clean cursor at 103, two blocks requested.
#[test]
fn mixed_set_scan_from_last_slot() {
    let mut policy = attached_lifo(128, 4);
    let set = SetIndex::new(25);

    // Move the clean cursor to 103: one flag on block 100 stops the pass there
    // and the cursor wraps past the start of the set.
    let mut table = table_with(128, &[(100, D)]);
    assert_eq!(policy.clean_set(&mut table, set, 1), Ok(1));
    assert_eq!(cursors(&policy, 25).clean_cursor, BlockIndex::new(103));

    let table = table_with(128, &[(100, D), (101, V), (102, D | IO)]);
    let mut states = RecordingStates::new(table);
    assert_eq!(policy.clean_set(&mut states, set, 2), Ok(1));

    assert_eq!(states.take_visits(), vec![103, 102, 101, 100]);
    assert_eq!(states.table.get(BlockIndex::new(100)), D | WB);
    assert_eq!(states.table.get(BlockIndex::new(101)), V);
    assert_eq!(states.table.get(BlockIndex::new(102)), D | IO);
    assert_eq!(states.table.get(BlockIndex::new(103)), BlockState::INVALID);
    // Scanned 4 == assoc, so the pass ends after stepping past 100, which wraps.
    assert_eq!(cursors(&policy, 25).clean_cursor, BlockIndex::new(103));
}

#[test]
fn stops_once_target_reached() {
    let mut policy = attached_lifo(16, 8);
    let mut table = table_with(16, &[(0, D), (7, D), (6, D), (5, D)]);

    assert_eq!(policy.clean_set(&mut table, SetIndex::new(0), 2), Ok(2));
    assert_eq!(table.get(BlockIndex::new(0)), D | WB);
    assert_eq!(table.get(BlockIndex::new(7)), D | WB);
    assert_eq!(table.get(BlockIndex::new(6)), D);
    assert_eq!(cursors(&policy, 0).clean_cursor, BlockIndex::new(6));

    assert_eq!(policy.clean_set(&mut table, SetIndex::new(0), 2), Ok(2));
    assert_eq!(table.get(BlockIndex::new(6)), D | WB);
    assert_eq!(table.get(BlockIndex::new(5)), D | WB);
    assert_eq!(cursors(&policy, 0).clean_cursor, BlockIndex::new(4));
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 3)]
#[case(4, 4)]
#[case(100, 4)]
fn never_flags_more_than_requested(#[case] to_clean: usize, #[case] expected: usize) {
    let mut policy = attached_lifo(8, 4);
    let mut table = StateTable::from_states(vec![V | D; 8]);

    assert_eq!(policy.clean_set(&mut table, SetIndex::new(1), to_clean), Ok(expected));
    let flagged = table.iter().filter(|(_, s)| s.contains(WB)).count();
    assert_eq!(flagged, expected);
    // Set 0 is never touched.
    assert!((0..4).all(|i| table.get(BlockIndex::new(i)) == V | D));
}

#[test]
fn zero_target_leaves_cursor_in_place() {
    let mut policy = attached_lifo(8, 4);
    let mut states = RecordingStates::new(StateTable::from_states(vec![D; 8]));

    assert_eq!(policy.clean_set(&mut states, SetIndex::new(1), 0), Ok(0));
    assert!(states.take_visits().is_empty());
    assert_eq!(cursors(&policy, 1).clean_cursor, BlockIndex::new(4));
}

#[test]
fn skips_clean_and_busy_blocks() {
    let mut policy = attached_lifo(8, 8);
    let mut table = table_with(
        8,
        &[
            (0, V),
            (1, D | IO),
            (2, IO),
            (3, BlockState::INVALID),
            (4, V | D | IO),
            (5, WB),
        ],
    );
    let before = table.clone();

    assert_eq!(policy.clean_set(&mut table, SetIndex::new(0), 8), Ok(0));
    assert_eq!(table, before);
}

/// A block already flagged for write-back but still DIRTY without block I/O is
/// flagged again; the flag is idempotent.
#[test]
fn pending_write_back_stays_eligible() {
    let mut policy = attached_lifo(4, 4);
    let mut table = table_with(4, &[(2, D | WB)]);

    assert_eq!(policy.clean_set(&mut table, SetIndex::new(0), 4), Ok(1));
    assert_eq!(table.get(BlockIndex::new(2)), D | WB);
}

#[test]
fn full_pass_returns_cursor_to_start() {
    let mut policy = attached_lifo(32, 8);
    let mut table = StateTable::new(32);
    assert_eq!(policy.clean_set(&mut table, SetIndex::new(2), 8), Ok(0));
    assert_eq!(cursors(&policy, 2).clean_cursor, BlockIndex::new(16));
}

/// Consecutive passes that together scan `assoc` slots visit every block of the
/// set exactly once.
#[test]
fn consecutive_passes_visit_each_block_once() {
    let mut policy = attached_lifo(64, 16);
    let dirty: Vec<(u64, BlockState)> = [33, 37, 38, 42, 47].iter().map(|&i| (i, D)).collect();
    let mut states = RecordingStates::new(table_with(64, &dirty));
    let set = SetIndex::new(2);

    let mut visited = Vec::new();
    while visited.len() < 16 {
        let _ = policy.clean_set(&mut states, set, 1).unwrap();
        visited.extend(states.take_visits());
    }

    assert_eq!(visited.len(), 16);
    let unique: HashSet<u64> = visited.iter().copied().collect();
    assert_eq!(unique, (32..48).collect::<HashSet<u64>>());
    assert_eq!(
        visited,
        vec![32, 47, 46, 45, 44, 43, 42, 41, 40, 39, 38, 37, 36, 35, 34, 33]
    );
}

#[test]
fn cleaning_leaves_eviction_cursor_alone() {
    let mut policy = attached_lifo(8, 4);
    let mut table = StateTable::from_states(vec![D; 8]);
    let _ = policy.clean_set(&mut table, SetIndex::new(0), 2).unwrap();
    assert_eq!(cursors(&policy, 0).eviction_cursor, BlockIndex::new(0));
    assert_eq!(cursors(&policy, 0).clean_cursor, BlockIndex::new(2));
}

#[test]
fn cleaning_writes_only_the_write_back_flag() {
    let mut policy = attached_lifo(16, 4);
    let mut states = MockStates::new();
    let _ = states
        .expect_get()
        .withf(|i| (4..8).contains(&i.val()))
        .returning(|i| if i.val() == 6 { D } else { V });
    let _ = states
        .expect_set_flag()
        .withf(|i, flag| i.val() == 6 && *flag == WB)
        .times(1)
        .return_const(());
    let _ = states.expect_clear_flag().never();

    assert_eq!(policy.clean_set(&mut states, SetIndex::new(1), 4), Ok(1));
}

#[test]
fn set_beyond_cache_is_rejected() {
    let mut policy = attached_lifo(16, 4);
    let mut table = StateTable::new(16);
    assert_eq!(
        policy.clean_set(&mut table, SetIndex::new(9), 1),
        Err(PolicyError::SetOutOfRange {
            set: 9,
            num_sets: 4
        })
    );
}
