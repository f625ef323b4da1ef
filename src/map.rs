//! An ordered map based on a red-black tree.

use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::ops::{self, Bound};
use std::vec;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::node::{Span, Tree};
use crate::view::{View, ViewMut, Window};

/// An ordered map based on a red-black tree.
///
/// Entries are ordered by a comparator, which defaults to the natural order of the keys. Besides
/// the usual lookups, the map hands out [`View`]s and [`ViewMut`]s (live windows onto a range of
/// its keys) and fail-fast [`Cursor`]s.
///
/// The behavior of this map is undefined if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code. A comparator that panics leaves the panic to the caller of the triggering
/// operation.
#[derive(Clone)]
pub struct TreeMap<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<K, V>,
    cmp: C,
}

impl<K, V> TreeMap<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { TreeMap::with_cmp(compare::natural()) }

    /// Builds a map from entries that are already in strictly ascending key order.
    ///
    /// This links the entries into a balanced tree in linear time instead of inserting them one
    /// by one. Fails with [`Error::Unsorted`] if a key does not order strictly after the one
    /// before it.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = rbmap::TreeMap::from_sorted(vec![(1, "a"), (2, "b"), (3, "c")]).unwrap();
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.first_key(), Ok(&1));
    ///
    /// let err = rbmap::TreeMap::from_sorted(vec![(1, "a"), (1, "b")]).unwrap_err();
    /// assert_eq!(err, rbmap::Error::Unsorted { index: 1 });
    /// ```
    pub fn from_sorted<I>(entries: I) -> Result<Self> where I: IntoIterator<Item=(K, V)> {
        TreeMap::from_sorted_with_cmp(entries, compare::natural())
    }
}

impl<K, V, C> TreeMap<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = rbmap::TreeMap::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        TreeMap { tree: Tree::new(), cmp }
    }

    /// Builds a map ordered by the given comparator from entries that are already in strictly
    /// ascending order under it.
    pub fn from_sorted_with_cmp<I>(entries: I, cmp: C) -> Result<Self>
        where I: IntoIterator<Item=(K, V)> {

        let entries: Vec<(K, V)> = entries.into_iter().collect();

        for (index, pair) in entries.windows(2).enumerate() {
            if !cmp.compares_lt(&pair[0].0, &pair[1].0) {
                return Err(Error::Unsorted { index: index + 1 });
            }
        }

        Ok(TreeMap { tree: Tree::from_sorted(entries), cmp })
    }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool { self.tree.root().is_none() }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let map: rbmap::TreeMap<i32, &str> = rbmap::TreeMap::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: rbmap::TreeMap<i32, &str, _> = rbmap::TreeMap::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the map.
    ///
    /// This is a structural change: cursors created before it become stale.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Inserts an entry into the map, returning the previous value, if any, associated
    /// with the key.
    ///
    /// Replacing the value of a key that is already present is not a structural change.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.insert(&self.cmp, key, value)
    }

    /// Removes and returns the entry whose key is equal to the given key, returning
    /// `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let id = self.tree.find(&self.cmp, key)?;
        Some(self.tree.remove(id))
    }

    /// Checks if the map contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).is_some()
    }

    /// Checks if any entry of the map has the given value.
    ///
    /// Values are not indexed, so this walks the whole map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_value(&"a"));
    /// assert!(!map.contains_value(&"b"));
    /// ```
    pub fn contains_value(&self, value: &V) -> bool where V: PartialEq {
        self.values().any(|v| v == value)
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).map(|id| self.tree.entry(id).1)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// map.insert(1, "a");
    ///
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let id = self.tree.find(&self.cmp, key)?;
        Some(self.tree.entry_mut(id).1)
    }

    /// Returns a reference to the map's minimum key and a reference to its associated
    /// value, or `None` if the map is empty.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|id| self.tree.entry(id))
    }

    /// Returns a reference to the map's maximum key and a reference to its associated
    /// value, or `None` if the map is empty.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|id| self.tree.entry(id))
    }

    /// Returns the map's minimum key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoSuchElement`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// assert_eq!(map.first_key(), Err(rbmap::Error::NoSuchElement));
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.first_key(), Ok(&1));
    /// ```
    pub fn first_key(&self) -> Result<&K> {
        self.first().map(|e| e.0).ok_or(Error::NoSuchElement)
    }

    /// Returns the map's maximum key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoSuchElement`] if the map is empty.
    pub fn last_key(&self) -> Result<&K> {
        self.last().map(|e| e.0).ok_or(Error::NoSuchElement)
    }

    /// Removes the map's minimum key and returns it and its associated value, or `None` if the
    /// map is empty.
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        let id = self.tree.first()?;
        Some(self.tree.remove(id))
    }

    /// Removes the map's maximum key and returns it and its associated value, or `None` if the
    /// map is empty.
    pub fn remove_last(&mut self) -> Option<(K, V)> {
        let id = self.tree.last()?;
        Some(self.tree.remove(id))
    }

    /// Returns a reference to the predecessor of the given key and a
    /// reference to its associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the greatest key that is strictly less than
    /// the given key. If `inclusive` is `true`, this method finds the greatest key that is less
    /// than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.pred(&1, false), None);
    /// assert_eq!(map.pred(&2, false), Some((&1, &"a")));
    /// assert_eq!(map.pred(&4, false), Some((&3, &"c")));
    ///
    /// assert_eq!(map.pred(&0, true), None);
    /// assert_eq!(map.pred(&2, true), Some((&2, &"b")));
    /// ```
    pub fn pred<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.pred(&self.cmp, key, inclusive).map(|id| self.tree.entry(id))
    }

    /// Returns a reference to the successor of the given key and a
    /// reference to its associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the smallest key that is strictly greater than
    /// the given key. If `inclusive` is `true`, this method finds the smallest key that is greater
    /// than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.succ(&0, false), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, false), Some((&3, &"c")));
    /// assert_eq!(map.succ(&3, false), None);
    ///
    /// assert_eq!(map.succ(&1, true), Some((&1, &"a")));
    /// assert_eq!(map.succ(&4, true), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.succ(&self.cmp, key, inclusive).map(|id| self.tree.entry(id))
    }

    /// Returns an iterator over the map's entries with immutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next_back(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter { range: Range::new(&self.tree, Span::whole(&self.tree)), len: self.len() }
    }

    /// Returns an iterator over the map's entries with mutable references to the values.
    ///
    /// The references are gathered up front, so creating the iterator takes O(n log n) time and
    /// O(n) memory. Use [`get_mut`](TreeMap::get_mut) to update a few values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 2;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        let span = Span::whole(&self.tree);
        IterMut(self.tree.entries_mut(span).into_iter())
    }

    /// Returns an iterator over the map's keys in ascending order.
    pub fn keys(&self) -> Keys<K, V> { Keys(self.iter().range) }

    /// Returns an iterator over the map's values in ascending order of their keys.
    pub fn values(&self) -> Values<K, V> { Values(self.iter().range) }

    /// Returns an iterator over mutable references to the map's values in ascending order of
    /// their keys.
    ///
    /// Gathers the references up front, like [`iter_mut`](TreeMap::iter_mut).
    pub fn values_mut(&mut self) -> ValuesMut<K, V> { ValuesMut(self.iter_mut().0) }

    /// Returns an iterator over the map's entries whose keys lie in the given range.
    ///
    /// Limits that enclose no keys, including inverted ones, yield nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included, Unbounded};
    ///
    /// let mut map = rbmap::TreeMap::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// assert_eq!(map.range(Excluded(&"a"), Unbounded).collect::<Vec<_>>(),
    ///     [(&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Included(&"a"), Excluded(&"b")).collect::<Vec<_>>(),
    ///     [(&"a", &1)]);
    /// ```
    pub fn range<'a>(&'a self, lower: Bound<&'a K>, upper: Bound<&'a K>) -> Range<'a, K, V> {
        let span = Window::new(lower, upper).span(&self.tree, &self.cmp);
        Range::new(&self.tree, span)
    }

    /// Returns a fail-fast cursor positioned before the map's first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::TreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut cursor = map.cursor();
    /// assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
    ///
    /// map.insert(3, "c");
    /// assert_eq!(cursor.next(&map), Err(rbmap::Error::ConcurrentModification));
    /// ```
    pub fn cursor(&self) -> Cursor<K> { Cursor::new(self, self.tree.first(), Bound::Unbounded) }

    /// Returns a view of the entries whose keys are strictly less than `hi`.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: rbmap::TreeMap<_, _> = (1..10).map(|k| (k, ())).collect();
    /// let view = map.head_view(&4);
    /// assert_eq!(view.keys().collect::<Vec<_>>(), [&1, &2, &3]);
    /// ```
    pub fn head_view<'a>(&'a self, hi: &'a K) -> View<'a, K, V, C> {
        View::new(self, Window::new(Bound::Unbounded, Bound::Excluded(hi)))
    }

    /// Returns a view of the entries whose keys are greater than or equal to `lo`.
    pub fn tail_view<'a>(&'a self, lo: &'a K) -> View<'a, K, V, C> {
        View::new(self, Window::new(Bound::Included(lo), Bound::Unbounded))
    }

    /// Returns a view of the entries whose keys lie in `[lo, hi)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] unless `lo` orders strictly before `hi`.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: rbmap::TreeMap<_, _> = (1..10).map(|k| (k, ())).collect();
    ///
    /// let view = map.sub_view(&3, &8).unwrap();
    /// assert_eq!(view.keys().collect::<Vec<_>>(), [&3, &4, &5, &6, &7]);
    ///
    /// assert_eq!(map.sub_view(&8, &3).unwrap_err(), rbmap::Error::InvalidRange);
    /// ```
    pub fn sub_view<'a>(&'a self, lo: &'a K, hi: &'a K) -> Result<View<'a, K, V, C>> {
        Ok(View::new(self, Window::half_open(lo, hi, &self.cmp)?))
    }

    /// Returns a view of the entries whose keys lie between the given bounds.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] if the lower bound's key orders after the upper
    /// bound's.
    pub fn range_view<'a>(&'a self, lower: Bound<&'a K>, upper: Bound<&'a K>)
        -> Result<View<'a, K, V, C>> {

        Ok(View::new(self, Window::checked(lower, upper, &self.cmp)?))
    }

    /// Returns a mutable view of the entries whose keys are strictly less than `hi`.
    pub fn head_view_mut<'a>(&'a mut self, hi: &'a K) -> ViewMut<'a, K, V, C> {
        ViewMut::new(self, Window::new(Bound::Unbounded, Bound::Excluded(hi)))
    }

    /// Returns a mutable view of the entries whose keys are greater than or equal to `lo`.
    pub fn tail_view_mut<'a>(&'a mut self, lo: &'a K) -> ViewMut<'a, K, V, C> {
        ViewMut::new(self, Window::new(Bound::Included(lo), Bound::Unbounded))
    }

    /// Returns a mutable view of the entries whose keys lie in `[lo, hi)`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map: rbmap::TreeMap<_, _> = (1..10).map(|k| (k, ())).collect();
    ///
    /// {
    ///     let mut view = map.sub_view_mut(&3, &8).unwrap();
    ///     assert_eq!(view.remove(&5), Some((5, ())));
    ///     assert_eq!(view.remove(&9), None);
    ///     assert!(view.insert(10, ()).is_err());
    /// }
    ///
    /// assert_eq!(map.len(), 8);
    /// assert!(map.contains_key(&9));
    /// ```
    pub fn sub_view_mut<'a>(&'a mut self, lo: &'a K, hi: &'a K) -> Result<ViewMut<'a, K, V, C>> {
        let window = Window::half_open(lo, hi, &self.cmp)?;
        Ok(ViewMut::new(self, window))
    }

    /// Returns a mutable view of the entries whose keys lie between the given bounds.
    pub fn range_view_mut<'a>(&'a mut self, lower: Bound<&'a K>, upper: Bound<&'a K>)
        -> Result<ViewMut<'a, K, V, C>> {

        let window = Window::checked(lower, upper, &self.cmp)?;
        Ok(ViewMut::new(self, window))
    }

    pub(crate) fn tree(&self) -> &Tree<K, V> { &self.tree }

    pub(crate) fn parts_mut(&mut self) -> (&mut Tree<K, V>, &C) { (&mut self.tree, &self.cmp) }
}

impl<K, V, C> Debug for TreeMap<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for TreeMap<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { TreeMap::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for TreeMap<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut map: Self = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for TreeMap<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<K, V, C, Q: ?Sized> ops::Index<&Q> for TreeMap<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut TreeMap<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Returns an iterator that consumes the map, yielding its entries in ascending order.
    fn into_iter(self) -> IntoIter<K, V> { IntoIter(self.tree.into_entries().into_iter()) }
}

impl<K, V, C> PartialEq for TreeMap<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp.compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for TreeMap<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for TreeMap<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Equal),
                (None, Some(_)) => return Some(Less),
                (Some(_), None) => return Some(Greater),
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.partial_cmp(r.1) {
                        Some(Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for TreeMap<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.cmp(r.1) {
                        Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator that consumes the map.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// Acquire through the `IntoIterator` trait:
///
/// ```
/// let mut map = rbmap::TreeMap::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
///
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, "a"), (2, "b")]);
/// ```
pub struct IntoIter<K, V>(vec::IntoIter<(K, V)>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// An iterator over the map's entries with immutable references to the values.
///
/// Acquire through [`TreeMap::iter`] or the `IntoIterator` trait.
pub struct Iter<'a, K: 'a, V: 'a> {
    range: Range<'a, K, V>,
    len: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> { Iter { range: self.range.clone(), len: self.len } }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let next = self.range.next()?;
        self.len -= 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        let next_back = self.range.next_back()?;
        self.len -= 1;
        Some(next_back)
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the map's entries with mutable references to the values.
///
/// Acquire through [`TreeMap::iter_mut`] or the `IntoIterator` trait.
pub struct IterMut<'a, K: 'a, V: 'a>(vec::IntoIter<(&'a K, &'a mut V)>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An iterator over the entries of a map or view whose keys lie in a given range, with
/// immutable references to the values.
///
/// Acquire through [`TreeMap::range`] or [`View::iter`].
pub struct Range<'a, K: 'a, V: 'a> {
    tree: &'a Tree<K, V>,
    span: Span,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>, span: Span) -> Self { Range { tree, span } }
}

impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Range<'a, K, V> { Range { tree: self.tree, span: self.span } }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.span.next(tree).map(|id| tree.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.span.is_empty() { (0, Some(0)) } else { (1, None) }
    }
}

impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.span.next_back(tree).map(|id| tree.entry(id))
    }
}

/// An iterator over the entries of a view with mutable references to the values.
///
/// Acquire through [`ViewMut::iter_mut`].
pub struct RangeMut<'a, K: 'a, V: 'a>(vec::IntoIter<(&'a K, &'a mut V)>);

impl<'a, K, V> RangeMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut Tree<K, V>, span: Span) -> Self {
        RangeMut(tree.entries_mut(span).into_iter())
    }
}

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for RangeMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for RangeMut<'a, K, V> {}

/// An iterator over the keys of a map or view, in ascending order.
pub struct Keys<'a, K: 'a, V: 'a>(pub(crate) Range<'a, K, V>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Keys<'a, K, V> { Keys(self.0.clone()) }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|e| e.0) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> { self.0.next_back().map(|e| e.0) }
}

/// An iterator over the values of a map or view, in ascending order of their keys.
pub struct Values<'a, K: 'a, V: 'a>(pub(crate) Range<'a, K, V>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Values<'a, K, V> { Values(self.0.clone()) }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> { self.0.next().map(|e| e.1) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> { self.0.next_back().map(|e| e.1) }
}

/// An iterator over mutable references to the values of a map or view.
pub struct ValuesMut<'a, K: 'a, V: 'a>(pub(crate) vec::IntoIter<(&'a K, &'a mut V)>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    fn next(&mut self) -> Option<&'a mut V> { self.0.next().map(|e| e.1) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a mut V> { self.0.next_back().map(|e| e.1) }
}

impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {}
