use bplsm_core::{BPTree, Config, Error, LeveledIndex, Record};

fn demo_index() -> LeveledIndex<i32, i32> {
    LeveledIndex::new(6, 2, 3).unwrap()
}

#[test]
fn test_demo_sequence() {
    let mut index = demo_index();

    for i in 1..24 {
        index.insert(i, i * 2);
        for j in (1..=i).filter(|&j| i <= 18 || j != 5) {
            assert_eq!(index.get(&j), Some(&(j * 2)), "key {} after inserting {}", j, i);
        }
        index.check_invariants().unwrap();

        if i == 18 {
            index.remove(5);
            assert_eq!(index.get(&5), None);
            assert_eq!(index.get(&4), Some(&8));
            assert_eq!(index.get(&6), Some(&12));
        }
    }

    assert_eq!(index.get(&5), None);
    assert_eq!(index.get(&4), Some(&8));
    assert_eq!(index.get(&6), Some(&12));
    assert_eq!(index.get(&23), Some(&46));
}

fn populated() -> LeveledIndex<i32, i32> {
    let mut index = demo_index();
    for i in 0..100 {
        index.insert(i, i * 2);
    }
    index
}

#[test]
fn test_get_after_bulk_insert() {
    let index = populated();
    for i in 0..100 {
        assert_eq!(index.get(&i), Some(&(i * 2)));
    }
    assert!(index.level_count() > 3);
    index.check_invariants().unwrap();
}

#[test]
fn test_delete_everything() {
    let mut index = populated();
    for i in 0..100 {
        index.remove(i);
        assert_eq!(index.get(&i), None);
    }
    assert_eq!(index.iter().count(), 0);
    index.check_invariants().unwrap();
}

#[test]
fn test_delete_then_add() {
    let mut index = populated();
    for i in 0..50 {
        index.remove(i);
        assert_eq!(index.get(&i), None);
    }
    for i in 100..150 {
        index.insert(i, i * 2);
        assert_eq!(index.get(&i), Some(&(i * 2)));
    }
    for i in 0..50 {
        assert_eq!(index.get(&i), None);
    }
    for i in 50..150 {
        assert_eq!(index.get(&i), Some(&(i * 2)));
    }
}

#[test]
fn test_remove_then_reinsert() {
    let mut index = populated();
    index.remove(0);
    index.insert(0, 0);
    assert_eq!(index.get(&0), Some(&0));
}

#[test]
fn test_tombstone_survives_later_merges() {
    let mut index = populated();
    index.remove(0);
    for i in 100..150 {
        index.insert(i, i * 2);
        assert_eq!(index.get(&i), Some(&(i * 2)));
    }
    assert_eq!(index.get(&0), None);
}

#[test]
fn test_recency_across_forced_cascades() {
    let mut index = demo_index();
    index.insert(42, 1);
    for i in 0..5 {
        index.insert(i, i);
    }
    assert_eq!(index.get_record(&42).map(|(level, _)| level), Some(1));

    index.insert(42, 2);
    for i in 100..111 {
        index.insert(i, i);
    }
    assert_eq!(index.get(&42), Some(&2));
    index.check_invariants().unwrap();
}

#[test]
fn test_merged_view_is_sorted_and_complete() {
    let mut index = LeveledIndex::with_config(Config::new(4, 3, 4)).unwrap();
    for i in (0..60).rev() {
        index.insert(i, format!("v{}", i));
    }
    for i in (0..60).step_by(7) {
        index.remove(i);
    }

    let keys: Vec<_> = index.iter().map(|(k, _)| *k).collect();
    let expected: Vec<_> = (0..60).filter(|i| i % 7 != 0).collect();
    assert_eq!(keys, expected);

    let ranged: Vec<_> = index.range(&10, &16).map(|(k, v)| (*k, v.clone())).collect();
    assert_eq!(
        ranged,
        vec![
            (10, "v10".to_string()),
            (11, "v11".to_string()),
            (12, "v12".to_string()),
            (13, "v13".to_string()),
            (15, "v15".to_string()),
        ]
    );
}

#[test]
fn test_order_below_three_is_rejected() {
    assert!(matches!(
        BPTree::<i32, i32>::new(2),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        LeveledIndex::<i32, i32>::new(6, 2, 1),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_tree_small_order_insert_and_remove() {
    let mut tree = BPTree::new(3).unwrap();
    for i in 0..4 {
        tree.insert_or_update(i, i);
    }
    tree.remove(&2);
    tree.check_invariants().unwrap();

    let keys: Vec<_> = tree.iter().map(|r| *r.key()).collect();
    assert_eq!(keys, vec![0, 1, 3]);
}

#[test]
fn test_tree_iterator_is_ordered() {
    let mut tree = BPTree::new(3).unwrap();
    for i in [5, 3, 9, 0, 7, 1, 8, 2, 6, 4] {
        tree.insert_or_update(i, i);
    }
    let keys: Vec<_> = (&tree).into_iter().map(Record::key).copied().collect();
    assert_eq!(keys, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_tree_interleaved_workload_keeps_invariants() {
    for order in 3..9 {
        let mut tree = BPTree::new(order).unwrap();
        let mut key: u64 = 17;
        for step in 0..2000u64 {
            key = key.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let k = (key >> 33) % 256;
            if step % 3 == 0 {
                tree.remove(&k);
            } else {
                tree.insert_or_update(k, step);
            }
            tree.check_invariants()
                .unwrap_or_else(|e| panic!("order {} step {}: {}", order, step, e));
        }
    }
}
