use std::collections::BTreeSet;

use proptest::prelude::*;
use skipshard::{IndexError, ShardedSkipList, SkipList, UniqueSkipList};

#[derive(Debug, Clone)]
enum Op {
    Add(i16),
    Remove(i16),
    Find(i16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-50i16..50).prop_map(Op::Add),
        2 => (-50i16..50).prop_map(Op::Remove),
        1 => (-50i16..50).prop_map(Op::Find),
    ]
}

/// Удаляет одно вхождение из отсортированной модели.
fn remove_one(
    model: &mut Vec<i16>,
    value: i16,
) -> bool {
    match model.binary_search(&value) {
        Ok(pos) => {
            model.remove(pos);
            true
        }
        Err(_) => false,
    }
}

proptest! {
    #[test]
    fn prop_behaves_like_sorted_vec(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let list = SkipList::new();
        let mut model: Vec<i16> = Vec::new();

        for op in ops {
            match op {
                Op::Add(v) => {
                    list.add(v);
                    let pos = model.partition_point(|x| *x <= v);
                    model.insert(pos, v);
                }
                Op::Remove(v) => {
                    prop_assert_eq!(list.remove(&v), remove_one(&mut model, v));
                }
                Op::Find(v) => {
                    let expected = if model.binary_search(&v).is_ok() {
                        Ok(v)
                    } else {
                        Err(IndexError::NotFound)
                    };
                    prop_assert_eq!(list.find(&v), expected);
                }
            }

            prop_assert_eq!(list.len(), model.len());
        }

        prop_assert_eq!(list.to_vec(), model);
        prop_assert!(list.validate_invariants().is_ok());
    }
}

proptest! {
    #[test]
    fn prop_unique_behaves_like_btreeset(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let list = UniqueSkipList::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Add(v) => {
                    let expected = if model.insert(v) {
                        Ok(())
                    } else {
                        Err(IndexError::DuplicateKey)
                    };
                    prop_assert_eq!(list.add(v), expected);
                }
                Op::Remove(v) => {
                    prop_assert_eq!(list.remove(&v), model.remove(&v));
                }
                Op::Find(v) => {
                    prop_assert_eq!(list.contains(&v), model.contains(&v));
                }
            }
        }

        prop_assert_eq!(list.to_vec(), model.into_iter().collect::<Vec<_>>());
        prop_assert!(list.validate_invariants().is_ok());
    }
}

proptest! {
    #[test]
    fn prop_bulk_load_equals_sort(mut values in prop::collection::vec(any::<i32>(), 0..2000)) {
        let list = SkipList::new();
        list.add_range(values.clone());

        values.sort_unstable();
        prop_assert_eq!(list.to_vec(), values);
        prop_assert!(list.validate_invariants().is_ok());
    }
}

proptest! {
    #[test]
    fn prop_sharded_copy_to_is_sorted(
        values in prop::collection::vec(any::<u16>(), 0..500),
        shards in 1usize..9,
    ) {
        let index = ShardedSkipList::new(shards, move |v: &u16| *v as usize % shards).unwrap();
        index.add_range(values.clone()).unwrap();

        for v in &values {
            prop_assert!(index.contains(v));
        }

        let mut buf = vec![0u16; values.len()];
        index.copy_to(&mut buf, 0).unwrap();

        let mut expected = values;
        expected.sort_unstable();
        prop_assert_eq!(&buf, &expected);
        prop_assert_eq!(index.to_sorted_vec(), expected);
        prop_assert!(index.validate_invariants().is_ok());
    }
}
