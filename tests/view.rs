use quickcheck_macros::quickcheck;
use rbmap::{Error, TreeMap};
use std::ops::Bound::{Excluded, Included};

fn scenario() -> TreeMap<u32, u32> {
    [5, 3, 8, 1, 4, 7, 9, 2, 6].iter().map(|&k| (k, k * 10)).collect()
}

fn keys<'a, I>(iter: I) -> Vec<u32> where I: Iterator<Item=&'a u32> {
    iter.cloned().collect()
}

#[test]
fn sub_view_is_half_open() {
    let map = scenario();
    let view = map.sub_view(&3, &8).unwrap();

    assert_eq!(keys(view.keys()), [3, 4, 5, 6, 7]);
    assert_eq!(view.len(), 5);
    assert_eq!(view.first(), Some((&3, &30)));
    assert_eq!(view.last(), Some((&7, &70)));
    assert!(view.contains_key(&3));
    assert!(!view.contains_key(&8));
    assert_eq!(view.get(&8), None);
    assert_eq!(view.get(&5), Some(&50));
}

#[test]
fn sub_view_rejects_empty_or_inverted_limits() {
    let map = scenario();

    assert_eq!(map.sub_view(&4, &4).err(), Some(Error::InvalidRange));
    assert_eq!(map.sub_view(&8, &3).err(), Some(Error::InvalidRange));
    assert_eq!(map.range_view(Included(&8), Excluded(&3)).err(), Some(Error::InvalidRange));

    let empty = map.range_view(Included(&4), Excluded(&4)).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn head_and_tail_views() {
    let map = scenario();

    assert_eq!(keys(map.head_view(&4).keys()), [1, 2, 3]);
    assert_eq!(keys(map.tail_view(&7).keys()), [7, 8, 9]);
    assert_eq!(keys(map.head_view(&0).keys()), Vec::<u32>::new());
    assert_eq!(keys(map.tail_view(&10).keys()), Vec::<u32>::new());
    assert_eq!(keys(map.range_view(Excluded(&2), Included(&5)).unwrap().keys()), [3, 4, 5]);
}

#[test]
fn views_iterate_backwards() {
    let map = scenario();
    let view = map.sub_view(&2, &6).unwrap();

    assert_eq!(keys(view.keys().rev()), [5, 4, 3, 2]);
    assert_eq!(view.values().rev().cloned().collect::<Vec<_>>(), [50, 40, 30, 20]);
}

#[test]
fn empty_window_has_no_extremes() {
    let map = scenario();
    let view = map.sub_view(&10, &20).unwrap();

    assert!(view.is_empty());
    assert_eq!(view.first(), None);
    assert_eq!(view.first_key(), Err(Error::NoSuchElement));
    assert_eq!(view.last_key(), Err(Error::NoSuchElement));

    let empty: TreeMap<u32, u32> = TreeMap::new();
    assert_eq!(empty.first_key(), Err(Error::NoSuchElement));
    assert_eq!(empty.last_key(), Err(Error::NoSuchElement));
}

#[test]
fn nested_views_intersect() {
    let map = scenario();
    let outer = map.sub_view(&3, &8).unwrap();

    assert_eq!(keys(outer.sub_view(&1, &5).unwrap().keys()), [3, 4]);
    assert_eq!(keys(outer.tail_view(&6).keys()), [6, 7]);
    assert_eq!(keys(outer.head_view(&9).keys()), [3, 4, 5, 6, 7]);
    assert_eq!(keys(outer.sub_view(&8, &9).unwrap().keys()), Vec::<u32>::new());
    assert_eq!(outer.sub_view(&6, &5).err(), Some(Error::InvalidRange));
}

#[test]
fn views_see_later_changes() {
    let mut map = scenario();
    map.remove(&4);
    map.insert(0, 0);

    {
        let view = map.sub_view(&3, &8).unwrap();
        assert_eq!(keys(view.keys()), [3, 5, 6, 7]);
    }

    map.insert(4, 44);
    let view = map.sub_view(&3, &8).unwrap();
    assert_eq!(view.get(&4), Some(&44));
}

#[test]
fn insert_inside_window() {
    let mut map = scenario();

    {
        let mut view = map.sub_view_mut(&3, &8).unwrap();
        assert_eq!(view.insert(5, 55), Ok(Some(50)));
        assert_eq!(view.insert(3, 33), Ok(Some(30)));
        assert_eq!(view.len(), 5);
    }

    map.remove(&6);

    {
        let mut view = map.sub_view_mut(&3, &8).unwrap();
        assert_eq!(view.insert(6, 66), Ok(None));
    }

    assert_eq!(map.get(&3), Some(&33));
    assert_eq!(map.get(&5), Some(&55));
    assert_eq!(map.get(&6), Some(&66));
    assert_eq!(map.len(), 9);
}

#[test]
fn insert_outside_window_fails() {
    let mut map = scenario();
    let before = map.clone();

    {
        let mut view = map.sub_view_mut(&3, &8).unwrap();
        assert_eq!(view.insert(8, 0), Err(Error::KeyOutOfRange));
        assert_eq!(view.insert(2, 0), Err(Error::KeyOutOfRange));
        assert_eq!(view.insert(100, 0), Err(Error::KeyOutOfRange));
    }

    assert_eq!(map, before);

    let mut tail = map.tail_view_mut(&5);
    assert_eq!(tail.insert(4, 0), Err(Error::KeyOutOfRange));
    assert_eq!(tail.insert(10, 100), Ok(None));
}

#[test]
fn lookups_outside_window_miss() {
    let mut map = scenario();

    {
        let mut view = map.sub_view_mut(&3, &8).unwrap();
        assert_eq!(view.get(&2), None);
        assert_eq!(view.get_mut(&9), None);
        assert_eq!(view.remove(&9), None);
        assert_eq!(view.remove(&1), None);
        assert_eq!(view.remove(&4), Some((4, 40)));

        if let Some(value) = view.get_mut(&7) { *value = 77; }
    }

    assert_eq!(keys(map.keys()), [1, 2, 3, 5, 6, 7, 8, 9]);
    assert_eq!(map.get(&7), Some(&77));
}

#[test]
fn clear_empties_only_the_window() {
    let mut map = scenario();

    {
        let mut view = map.sub_view_mut(&3, &8).unwrap();
        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.first_key(), Err(Error::NoSuchElement));
    }

    assert_eq!(keys(map.keys()), [1, 2, 8, 9]);
}

#[test]
fn mutable_iteration_stays_in_window() {
    let mut map = scenario();

    {
        let mut view = map.range_view_mut(Excluded(&2), Included(&5)).unwrap();
        for (key, value) in view.iter_mut() { *value = key + 1000; }
        for value in view.values_mut().rev() { *value += 1; }
    }

    assert_eq!(map.values().cloned().collect::<Vec<_>>(),
               [10, 20, 1004, 1005, 1006, 60, 70, 80, 90]);
}

#[test]
fn nested_mutable_views_intersect() {
    let mut map = scenario();

    {
        let mut outer = map.sub_view_mut(&2, &8).unwrap();
        let mut inner = outer.tail_view_mut(&6);

        assert_eq!(inner.insert(5, 0), Err(Error::KeyOutOfRange));
        assert_eq!(inner.insert(8, 0), Err(Error::KeyOutOfRange));
        assert_eq!(keys(inner.keys()), [6, 7]);
        inner.clear();
    }

    assert_eq!(keys(map.keys()), [1, 2, 3, 4, 5, 8, 9]);
}

#[test]
fn views_follow_a_custom_order() {
    use compare::{Compare, natural};

    let mut map = TreeMap::with_cmp(natural::<u32>().rev());
    for key in 1..10u32 { map.insert(key, ()); }

    let view = map.sub_view(&8, &3).unwrap();
    assert_eq!(keys(view.keys()), [8, 7, 6, 5, 4]);
    assert_eq!(map.sub_view(&3, &8).err(), Some(Error::InvalidRange));
    assert!(map.cmp().compares_lt(&8, &3));
}

#[quickcheck]
fn views_hold_only_window_keys(map: TreeMap<u8, ()>, lo: u8, hi: u8) -> bool {
    match map.sub_view(&lo, &hi) {
        Err(_) => lo >= hi,
        Ok(view) => {
            view.keys().all(|k| lo <= *k && *k < hi) &&
            view.len() == map.keys().filter(|k| lo <= **k && **k < hi).count()
        }
    }
}

#[quickcheck]
fn nested_views_never_widen(map: TreeMap<u8, ()>, bounds: (u8, u8, u8, u8)) -> bool {
    let (a, b, c, d) = bounds;

    let outer = match map.sub_view(&a, &b) {
        Ok(outer) => outer,
        Err(_) => return a >= b,
    };

    let inner = match outer.sub_view(&c, &d) {
        Ok(inner) => inner,
        Err(_) => return c >= d,
    };

    let lo = a.max(c);
    let hi = b.min(d);

    inner.keys().all(|k| outer.contains_key(k)) &&
    inner.keys().all(|k| lo <= *k && *k < hi) &&
    inner.len() == map.keys().filter(|k| lo <= **k && **k < hi).count()
}

#[quickcheck]
fn out_of_range_insert_leaves_map_unchanged(map: TreeMap<u8, u8>, lo: u8, hi: u8, key: u8)
    -> bool {

    let mut map = map;
    let before = map.clone();

    let outcome = match map.sub_view_mut(&lo, &hi) {
        Err(_) => return lo >= hi,
        Ok(mut view) => view.insert(key, 0),
    };

    if lo <= key && key < hi {
        outcome.is_ok() && map.get(&key) == Some(&0)
    } else {
        outcome == Err(Error::KeyOutOfRange) && map == before
    }
}

#[test]
fn mutable_iterators_know_their_length() {
    let mut map = scenario();

    assert_eq!(map.iter_mut().size_hint(), (9, Some(9)));
    assert_eq!(map.values_mut().rev().count(), 9);

    let mut view = map.sub_view_mut(&3, &8).unwrap();
    assert_eq!(view.iter_mut().size_hint(), (5, Some(5)));
    assert_eq!(view.values_mut().size_hint(), (5, Some(5)));

    let mut it = view.iter_mut();
    let (_, last) = it.next_back().unwrap();
    *last = 0;
    assert_eq!(it.len(), 4);
    drop(it);

    assert_eq!(view.get(&7), Some(&0));
}
