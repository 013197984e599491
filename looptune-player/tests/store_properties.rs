//! Property tests for the circular store and traversal stack

use looptune_player::playlist::{Playlist, SortKey, Track, TraversalStack};
use looptune_player::StoreError;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    InsertFront(u8),
    InsertBack(u8),
    InsertAt(u8, usize),
    RemoveFront,
    RemoveBack,
    RemoveAt(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u8>().prop_map(Op::InsertFront),
        3 => any::<u8>().prop_map(Op::InsertBack),
        3 => (any::<u8>(), 0usize..12).prop_map(|(v, p)| Op::InsertAt(v, p)),
        2 => Just(Op::RemoveFront),
        2 => Just(Op::RemoveBack),
        2 => (0usize..12).prop_map(Op::RemoveAt),
        1 => Just(Op::Clear),
    ]
}

fn track(value: u8) -> Track {
    Track::new(format!("song{:03}.mp3", value), format!("artist{}", value % 7))
}

fn sources(list: &Playlist) -> Vec<String> {
    list.iter().map(|t| t.source.clone()).collect()
}

proptest! {
    #[test]
    fn prop_count_matches_reachable_nodes(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut list = Playlist::new();
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::InsertFront(v) => {
                    list.insert_front(track(v));
                    model.insert(0, track(v).source);
                }
                Op::InsertBack(v) => {
                    list.insert_back(track(v));
                    model.push(track(v).source);
                }
                Op::InsertAt(v, pos) => {
                    let result = list.insert_at(track(v), pos);
                    if pos >= 1 && pos <= model.len() + 1 {
                        prop_assert!(result.is_ok());
                        model.insert(pos - 1, track(v).source);
                    } else {
                        let is_out_of_range = matches!(result, Err(StoreError::OutOfRange { .. }));
                        prop_assert!(is_out_of_range);
                    }
                }
                Op::RemoveFront => {
                    let result = list.remove_front();
                    if model.is_empty() {
                        prop_assert_eq!(result, Err(StoreError::EmptyStore));
                    } else {
                        prop_assert_eq!(result.unwrap().source, model.remove(0));
                    }
                }
                Op::RemoveBack => {
                    let result = list.remove_back();
                    match model.pop() {
                        Some(expected) => prop_assert_eq!(result.unwrap().source, expected),
                        None => prop_assert_eq!(result, Err(StoreError::EmptyStore)),
                    }
                }
                Op::RemoveAt(pos) => {
                    let result = list.remove_at(pos);
                    if model.is_empty() {
                        prop_assert_eq!(result, Err(StoreError::EmptyStore));
                    } else if pos >= 1 && pos <= model.len() {
                        prop_assert_eq!(result.unwrap().source, model.remove(pos - 1));
                    } else {
                        let is_out_of_range = matches!(result, Err(StoreError::OutOfRange { .. }));
                        prop_assert!(is_out_of_range);
                    }
                }
                Op::Clear => {
                    list.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(list.len(), model.len());
            prop_assert_eq!(list.cycle_len(), model.len());
            prop_assert_eq!(list.is_empty(), list.head().is_none());
            prop_assert_eq!(sources(&list), model.clone());
        }
    }

    #[test]
    fn prop_reverse_stack_mirrors_forward(values in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut list = Playlist::new();
        for v in &values {
            list.insert_back(track(*v));
        }

        let forward: Vec<_> = list.node_ids().collect();
        let mut stack = TraversalStack::from_playlist(&list);
        let mut backward = Vec::new();
        while let Some(id) = stack.pop() {
            backward.push(id);
        }
        backward.reverse();

        prop_assert_eq!(backward, forward);
        prop_assert_eq!(sources(&list).len(), values.len());
    }

    #[test]
    fn prop_sort_is_idempotent(values in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut list = Playlist::new();
        for v in &values {
            list.insert_back(track(*v));
        }

        for key in [SortKey::Title, SortKey::Artist] {
            list.sort_by(key);
            let once = sources(&list);
            list.sort_by(key);
            prop_assert_eq!(sources(&list), once);
            prop_assert_eq!(list.cycle_len(), values.len());
        }
    }
}

#[test]
fn test_clear_twice_is_noop() {
    let mut list = Playlist::with_name("x");
    for v in 0..5 {
        list.insert_back(track(v));
    }
    list.clear();
    assert_eq!(list.len(), 0);
    assert_eq!(list.cycle_len(), 0);
    list.clear();
    assert_eq!(list.len(), 0);
    assert!(list.head().is_none());
}

#[test]
fn test_insert_two_past_end_is_out_of_range() {
    let mut list = Playlist::new();
    for v in 0..3 {
        list.insert_back(track(v));
    }
    let result = list.insert_at(track(9), list.len() + 2);
    assert!(matches!(result, Err(StoreError::OutOfRange { .. })));
    assert_eq!(list.len(), 3);
}

#[test]
fn test_positions_follow_new_head() {
    let mut list = Playlist::new();
    list.insert_back(track(1));
    list.insert_back(track(2));
    list.insert_front(track(0));
    assert_eq!(list.get(1).unwrap().source, "song000.mp3");
    list.remove_front().unwrap();
    assert_eq!(list.get(1).unwrap().source, "song001.mp3");
}
