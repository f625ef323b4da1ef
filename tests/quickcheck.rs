use compare::Compare;
use quickcheck::{Arbitrary, Gen};
use rbmap::TreeMap;

pub trait Remove<K, C> where C: Compare<K> {
    fn remove<V>(&self, map: &mut TreeMap<K, V, C>) -> Option<(K, V)>;
}

macro_rules! remove {
    ($K:ty, $V:ty, $R:ty) => {
        mod remove {
            use crate::Remove;
            use quickcheck::{quickcheck, TestResult};
            use rbmap::TreeMap;

            #[test]
            fn removes_key() {
                fn test(mut map: TreeMap<$K, $V>, removal: $R) -> TestResult {
                    match removal.remove(&mut map) {
                        None => TestResult::discard(),
                        Some((ref key, _)) => TestResult::from_bool(
                            !map.contains_key(key) &&
                            map.get(key).is_none() &&
                            map.iter().find(|e| e.0 == key).is_none()
                        ),
                    }
                }

                quickcheck(test as fn(TreeMap<$K, $V>, $R) -> TestResult);
            }

            #[test]
            fn affects_no_others() {
                fn test(mut map: TreeMap<$K, $V>, removal: $R) -> bool {
                    let old_map = map.clone();

                    match removal.remove(&mut map) {
                        None => map == old_map,
                        Some((ref key, _)) =>
                            map.iter().collect::<Vec<_>>() ==
                               old_map.iter().filter(|e| e.0 != key).collect::<Vec<_>>()
                    }
                }

                quickcheck(test as fn(TreeMap<$K, $V>, $R) -> bool);
            }

            #[test]
            fn sets_len() {
                fn test(mut map: TreeMap<$K, $V>, removal: $R) -> bool {
                    let old_len = map.len();

                    match removal.remove(&mut map) {
                        None => map.len() == old_len,
                        Some(_) => map.len() == old_len - 1,
                    }
                }

                quickcheck(test as fn(TreeMap<$K, $V>, $R) -> bool);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Find<Q>(Q);

impl<Q> Arbitrary for Find<Q> where Q: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Self { Find(Q::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> { Box::new(self.0.shrink().map(Find)) }
}

impl<Q, K, C> Remove<K, C> for Find<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut TreeMap<K, V, C>) -> Option<(K, V)> { map.remove(&self.0) }
}

mod find {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn sets_len() {
        fn test(mut map: TreeMap<u32, u16>, key: u32, value: u16) -> bool {
            let old_len = map.len();

            if map.insert(key, value).is_some() {
                map.len() == old_len
            } else {
                map.len() == old_len + 1
            }
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn inserts_key() {
        fn test(mut map: TreeMap<u32, u16>, key: u32, value: u16) -> bool {
            map.insert(key, value);

            map.contains_key(&key) &&
            map.get(&key) == Some(&value) &&
            map.iter().filter(|e| *e.0 == key).collect::<Vec<_>>() == [(&key, &value)]
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn returns_old_value() {
        fn test(mut map: TreeMap<u32, u16>, key: u32, value: u16) -> bool {
            map.get(&key).cloned() == map.insert(key, value)
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn insert_then_remove_restores() {
        fn test(mut map: TreeMap<u32, u16>, key: u32, value: u16) -> bool {
            if map.contains_key(&key) { return true; }

            let old_map = map.clone();
            map.insert(key, value);
            map.remove(&key) == Some((key, value)) && map.get(&key).is_none() && map == old_map
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32, u16) -> bool);
    }

    remove!{u32, u16, crate::Find<u32>}
}

#[derive(Clone, Debug)]
pub struct Max;

impl Arbitrary for Max { fn arbitrary(_gen: &mut Gen) -> Self { Max } }

impl<K, C> Remove<K, C> for Max where C: Compare<K> {
    fn remove<V>(&self, map: &mut TreeMap<K, V, C>) -> Option<(K, V)> { map.remove_last() }
}

mod last {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>) -> bool {
            map.last() == map.iter().rev().next() &&
            map.last_key().ok() == map.keys().next_back()
        }

        quickcheck(test as fn(TreeMap<u32, u16>) -> bool);
    }

    remove!{u32, u16, crate::Max}
}

#[derive(Clone, Debug)]
pub struct Min;

impl Arbitrary for Min { fn arbitrary(_gen: &mut Gen) -> Self { Min } }

impl<K, C> Remove<K, C> for Min where C: Compare<K> {
    fn remove<V>(&self, map: &mut TreeMap<K, V, C>) -> Option<(K, V)> { map.remove_first() }
}

mod first {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>) -> bool {
            map.first() == map.iter().next() && map.first_key().ok() == map.keys().next()
        }

        quickcheck(test as fn(TreeMap<u32, u16>) -> bool);
    }

    remove!{u32, u16, crate::Min}
}

mod succ {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>, key: u32) -> bool {
            map.succ(&key, false) == map.iter().find(|e| *e.0 > key)
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>, key: u32) -> bool {
            map.succ(&key, true) == map.iter().find(|e| *e.0 >= key)
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32) -> bool);
    }
}

mod pred {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>, key: u32) -> bool {
            map.pred(&key, false) == map.iter().rev().find(|e| *e.0 < key)
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: TreeMap<u32, u16>, key: u32) -> bool {
            map.pred(&key, true) == map.iter().rev().find(|e| *e.0 <= key)
        }

        quickcheck(test as fn(TreeMap<u32, u16>, u32) -> bool);
    }
}

mod iter {
    use quickcheck::quickcheck;
    use rbmap::TreeMap;

    #[test]
    fn ascends() {
        fn test(map: TreeMap<u32, u16>) -> bool {
            map.iter().zip(map.iter().skip(1)).all(|(e1, e2)| e1.0 < e2.0)
        }

        quickcheck(test as fn(TreeMap<u32, u16>) -> bool);
    }

    #[test]
    fn descends_when_reversed() {
        fn test(map: TreeMap<u32, u16>) -> bool {
            map.iter().rev().zip(map.iter().rev().skip(1)).all(|(e2, e1)| e2.0 > e1.0)
        }

        quickcheck(test as fn(TreeMap<u32, u16>) -> bool);
    }

    #[test]
    fn size_hint_is_exact() {
        fn test(map: TreeMap<u32, u16>) -> bool {
            let mut len = map.len();
            let mut it = map.iter();

            loop {
                if it.size_hint() != (len, Some(len)) { return false; }
                if it.next().is_none() { break; }
                len -= 1;
            }

            len == 0 && it.size_hint() == (0, Some(0))
        }

        quickcheck(test as fn(TreeMap<u32, u16>) -> bool);
    }

    #[quickcheck_macros::quickcheck]
    fn len_matches_traversal(map: TreeMap<u32, u16>) -> bool {
        map.len() == map.iter().count() && map.len() == map.keys().count()
    }

    #[quickcheck_macros::quickcheck]
    fn into_iter_agrees_with_iter(map: TreeMap<u32, u16>) -> bool {
        let borrowed: Vec<(u32, u16)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        map.into_iter().collect::<Vec<_>>() == borrowed
    }

    #[quickcheck_macros::quickcheck]
    fn iter_mut_visits_every_value(mut map: TreeMap<u32, u16>) -> bool {
        let expected: Vec<(u32, u32)> = map.iter().map(|(&k, &v)| (k, v as u32 + 1)).collect();
        let mut widened: TreeMap<u32, u32> = map.iter().map(|(&k, &v)| (k, v as u32)).collect();

        for (_, value) in widened.iter_mut() { *value += 1; }
        for value in map.values_mut() { *value = value.wrapping_add(1); }

        widened.into_iter().collect::<Vec<_>>() == expected &&
        map.iter().zip(expected.iter()).all(|(e, x)| *e.1 == x.1 as u16)
    }
}

mod range {
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rbmap::TreeMap;
    use std::ops::Bound::*;

    #[derive(Clone, Debug)]
    struct Bound<T>(std::ops::Bound<T>);

    impl<T> Bound<T> {
        fn as_ref(&self) -> std::ops::Bound<&T> {
            match self.0 {
                Included(ref t) => Included(t),
                Excluded(ref t) => Excluded(t),
                Unbounded => Unbounded,
            }
        }
    }

    impl<T> Arbitrary for Bound<T> where T: Arbitrary {
        fn arbitrary(gen: &mut Gen) -> Self {
            Bound(match gen.choose(&[0, 1, 2]).copied() {
                Some(0) => Included(T::arbitrary(gen)),
                Some(1) => Excluded(T::arbitrary(gen)),
                _ => Unbounded,
            })
        }
    }

    fn expected<'a>(map: &'a TreeMap<u32, u16>, min: &Bound<u32>, max: &Bound<u32>)
        -> Vec<(&'a u32, &'a u16)> {

        map.iter()
            .skip_while(|e| match min.0 {
                Included(ref t) => e.0 < t,
                Excluded(ref t) => e.0 <= t,
                Unbounded => false,
            })
            .take_while(|e| match max.0 {
                Included(ref t) => e.0 <= t,
                Excluded(ref t) => e.0 < t,
                Unbounded => true,
            })
            .collect()
    }

    #[quickcheck]
    fn range(map: TreeMap<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
        map.range(min.as_ref(), max.as_ref()).collect::<Vec<_>>() == expected(&map, &min, &max)
    }

    #[quickcheck]
    fn range_rev(map: TreeMap<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
        let mut expected = expected(&map, &min, &max);
        expected.reverse();
        map.range(min.as_ref(), max.as_ref()).rev().collect::<Vec<_>>() == expected
    }

    #[quickcheck]
    fn range_view(map: TreeMap<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
        match map.range_view(min.as_ref(), max.as_ref()) {
            Err(_) => match (&min.0, &max.0) {
                (Included(lo) | Excluded(lo), Included(hi) | Excluded(hi)) => lo > hi,
                _ => false,
            },
            Ok(view) => {
                let expected = expected(&map, &min, &max);
                view.iter().collect::<Vec<_>>() == expected &&
                view.len() == expected.len() &&
                view.first() == expected.first().cloned() &&
                view.last() == expected.last().cloned()
            }
        }
    }
}

mod bulk {
    use quickcheck_macros::quickcheck;
    use rbmap::{Error, TreeMap};

    #[quickcheck]
    fn agrees_with_collect(map: TreeMap<u32, u16>) -> bool {
        let sorted: Vec<(u32, u16)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        TreeMap::from_sorted(sorted).map_or(false, |built| built == map)
    }

    #[quickcheck]
    fn rejects_unsorted(keys: Vec<u8>) -> bool {
        let entries: Vec<(u8, ())> = keys.iter().map(|&k| (k, ())).collect();
        let first_bad = keys.windows(2).position(|w| w[0] >= w[1]).map(|i| i + 1);

        match (TreeMap::from_sorted(entries), first_bad) {
            (Ok(map), None) => map.len() == keys.len(),
            (Err(Error::Unsorted { index }), Some(bad)) => index == bad,
            _ => false,
        }
    }

    #[quickcheck]
    fn stays_balanced_under_updates(keys: Vec<u16>, extra: Vec<u16>) -> bool {
        let mut keys = keys;
        keys.sort();
        keys.dedup();

        let mut map = TreeMap::from_sorted(keys.iter().map(|&k| (k, ()))).unwrap();
        let mut expected: std::collections::BTreeSet<u16> = keys.into_iter().collect();

        for k in extra {
            if k % 2 == 0 {
                map.insert(k, ());
                expected.insert(k);
            } else {
                map.remove(&(k - 1));
                expected.remove(&(k - 1));
            }
        }

        map.keys().cloned().collect::<Vec<_>>() == expected.into_iter().collect::<Vec<_>>()
    }
}
