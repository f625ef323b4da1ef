//! Live range views onto a map.

use compare::Compare;
use std::cmp::Ordering;
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};
use std::ops::Bound::{self, Excluded, Included, Unbounded};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::map::{Keys, Range, RangeMut, TreeMap, Values, ValuesMut};
use crate::node::{NodeId, Span, Tree};

/// The key range a view or cursor is confined to.
pub(crate) struct Window<'a, K: 'a> {
    lower: Bound<&'a K>,
    upper: Bound<&'a K>,
}

impl<'a, K> Clone for Window<'a, K> {
    fn clone(&self) -> Self { *self }
}

impl<'a, K> Copy for Window<'a, K> {}

impl<'a, K> Window<'a, K> {
    pub fn new(lower: Bound<&'a K>, upper: Bound<&'a K>) -> Self { Window { lower, upper } }

    pub fn upper(&self) -> Bound<&'a K> { self.upper }

    /// A window with independent bounds, rejected if the lower key orders after the upper one.
    pub fn checked<C>(lower: Bound<&'a K>, upper: Bound<&'a K>, cmp: &C) -> Result<Self>
        where C: Compare<K> {

        if let (Included(lo) | Excluded(lo), Included(hi) | Excluded(hi)) = (lower, upper) {
            if cmp.compares_gt(lo, hi) { return Err(Error::InvalidRange); }
        }

        Ok(Window::new(lower, upper))
    }

    /// The window `[lo, hi)`, rejected unless `lo` orders strictly before `hi`.
    pub fn half_open<C>(lo: &'a K, hi: &'a K, cmp: &C) -> Result<Self> where C: Compare<K> {
        if !cmp.compares_lt(lo, hi) { return Err(Error::InvalidRange); }
        Ok(Window::new(Included(lo), Excluded(hi)))
    }

    /// Checks if the key lies below the lower bound.
    pub fn too_low<Q: ?Sized, C>(&self, cmp: &C, key: &Q) -> bool where C: Compare<Q, K> {
        match self.lower {
            Unbounded => false,
            Included(lo) => cmp.compares_lt(key, lo),
            Excluded(lo) => cmp.compares_le(key, lo),
        }
    }

    /// Checks if the key lies at or beyond the upper bound.
    pub fn too_high<Q: ?Sized, C>(&self, cmp: &C, key: &Q) -> bool where C: Compare<Q, K> {
        match self.upper {
            Unbounded => false,
            Included(hi) => cmp.compares_gt(key, hi),
            Excluded(hi) => cmp.compares_ge(key, hi),
        }
    }

    pub fn contains<Q: ?Sized, C>(&self, cmp: &C, key: &Q) -> bool where C: Compare<Q, K> {
        !self.too_low(cmp, key) && !self.too_high(cmp, key)
    }

    /// Returns the window covering the keys both windows cover.
    pub fn intersect<C>(self, other: Self, cmp: &C) -> Self where C: Compare<K> {
        Window {
            lower: tighter(self.lower, other.lower, cmp, Greater),
            upper: tighter(self.upper, other.upper, cmp, Less),
        }
    }

    /// Returns the first node of the tree inside the window.
    pub fn first<V, C>(&self, tree: &Tree<K, V>, cmp: &C) -> Option<NodeId> where C: Compare<K> {
        let id = match self.lower {
            Unbounded => tree.first(),
            Included(lo) => tree.succ(cmp, lo, true),
            Excluded(lo) => tree.succ(cmp, lo, false),
        };

        id.filter(|&id| !self.too_high(cmp, tree.key(id)))
    }

    /// Returns the last node of the tree inside the window.
    pub fn last<V, C>(&self, tree: &Tree<K, V>, cmp: &C) -> Option<NodeId> where C: Compare<K> {
        let id = match self.upper {
            Unbounded => tree.last(),
            Included(hi) => tree.pred(cmp, hi, true),
            Excluded(hi) => tree.pred(cmp, hi, false),
        };

        id.filter(|&id| !self.too_low(cmp, tree.key(id)))
    }

    pub fn span<V, C>(&self, tree: &Tree<K, V>, cmp: &C) -> Span where C: Compare<K> {
        Span::new(self.first(tree, cmp), self.last(tree, cmp))
    }
}

// Picks the more restrictive of two bounds on the same end. `keep` is the ordering of the
// bound key that restricts more: `Greater` for lower bounds and `Less` for upper ones.
fn tighter<'a, K, C>(a: Bound<&'a K>, b: Bound<&'a K>, cmp: &C, keep: Ordering) -> Bound<&'a K>
    where C: Compare<K> {

    match (a, b) {
        (Unbounded, bound) | (bound, Unbounded) => bound,
        (Included(x) | Excluded(x), Included(y) | Excluded(y)) => match cmp.compare(x, y) {
            Equal => if let Excluded(_) = a { a } else { b },
            order => if order == keep { a } else { b },
        },
    }
}

/// A live window onto the entries of a map whose keys lie in a range.
///
/// A view copies nothing: reads go straight to the map it was taken from. Views of views narrow
/// the range to the intersection of both, never widening it.
///
/// Acquire through [`TreeMap::head_view`], [`TreeMap::tail_view`], [`TreeMap::sub_view`] or
/// [`TreeMap::range_view`].
pub struct View<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    map: &'a TreeMap<K, V, C>,
    window: Window<'a, K>,
}

impl<'a, K, V, C> Clone for View<'a, K, V, C> where C: Compare<K> {
    fn clone(&self) -> Self { View { map: self.map, window: self.window } }
}

impl<'a, K, V, C> Debug for View<'a, K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> View<'a, K, V, C> where C: Compare<K> {
    pub(crate) fn new(map: &'a TreeMap<K, V, C>, window: Window<'a, K>) -> Self {
        View { map, window }
    }

    /// Returns the number of entries in the view.
    ///
    /// This walks every entry in the range.
    pub fn len(&self) -> usize { self.iter().count() }

    /// Checks if the view is empty.
    pub fn is_empty(&self) -> bool { self.first().is_none() }

    /// Checks if the view contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.get(key).is_some()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the key is
    /// outside the view or not in the map.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&'a V> where C: Compare<Q, K> {
        let map = self.map;
        if !self.window.contains(map.cmp(), key) { return None; }
        map.get(key)
    }

    /// Returns the view's minimum key and its value, or `None` if the view is empty.
    pub fn first(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.map.tree();
        self.window.first(tree, self.map.cmp()).map(|id| tree.entry(id))
    }

    /// Returns the view's maximum key and its value, or `None` if the view is empty.
    pub fn last(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.map.tree();
        self.window.last(tree, self.map.cmp()).map(|id| tree.entry(id))
    }

    /// Returns the view's minimum key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoSuchElement`] if no key of the map lies in the view.
    pub fn first_key(&self) -> Result<&'a K> {
        self.first().map(|e| e.0).ok_or(Error::NoSuchElement)
    }

    /// Returns the view's maximum key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoSuchElement`] if no key of the map lies in the view.
    pub fn last_key(&self) -> Result<&'a K> {
        self.last().map(|e| e.0).ok_or(Error::NoSuchElement)
    }

    /// Returns an iterator over the view's entries in ascending order.
    pub fn iter(&self) -> Range<'a, K, V> {
        let tree = self.map.tree();
        Range::new(tree, self.window.span(tree, self.map.cmp()))
    }

    /// Returns an iterator over the view's keys in ascending order.
    pub fn keys(&self) -> Keys<'a, K, V> { Keys(self.iter()) }

    /// Returns an iterator over the view's values in ascending order of their keys.
    pub fn values(&self) -> Values<'a, K, V> { Values(self.iter()) }

    /// Returns a fail-fast cursor positioned before the view's first entry.
    ///
    /// The cursor stops at the view's upper bound, which it keeps a copy of.
    pub fn cursor(&self) -> Cursor<K> where K: Clone {
        let first = self.window.first(self.map.tree(), self.map.cmp());
        Cursor::new(self.map, first, self.window.upper().cloned())
    }

    /// Returns a view of this view's entries whose keys are strictly less than `hi`.
    pub fn head_view<'b>(&self, hi: &'b K) -> View<'b, K, V, C> where 'a: 'b {
        self.narrow(Window::new(Unbounded, Excluded(hi)))
    }

    /// Returns a view of this view's entries whose keys are greater than or equal to `lo`.
    pub fn tail_view<'b>(&self, lo: &'b K) -> View<'b, K, V, C> where 'a: 'b {
        self.narrow(Window::new(Included(lo), Unbounded))
    }

    /// Returns a view of this view's entries whose keys lie in `[lo, hi)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] unless `lo` orders strictly before `hi`.
    pub fn sub_view<'b>(&self, lo: &'b K, hi: &'b K) -> Result<View<'b, K, V, C>> where 'a: 'b {
        Ok(self.narrow(Window::half_open(lo, hi, self.map.cmp())?))
    }

    /// Returns a view of this view's entries whose keys lie between the given bounds.
    pub fn range_view<'b>(&self, lower: Bound<&'b K>, upper: Bound<&'b K>)
        -> Result<View<'b, K, V, C>> where 'a: 'b {

        Ok(self.narrow(Window::checked(lower, upper, self.map.cmp())?))
    }

    fn narrow<'b>(&self, window: Window<'b, K>) -> View<'b, K, V, C> where 'a: 'b {
        let outer: Window<'b, K> = self.window;
        View::new(self.map, outer.intersect(window, self.map.cmp()))
    }
}

/// A live window onto the entries of a map whose keys lie in a range, through which entries in
/// that range can be inserted, updated and removed.
///
/// Acquire through [`TreeMap::head_view_mut`], [`TreeMap::tail_view_mut`],
/// [`TreeMap::sub_view_mut`] or [`TreeMap::range_view_mut`].
pub struct ViewMut<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    map: &'a mut TreeMap<K, V, C>,
    window: Window<'a, K>,
}

impl<'a, K, V, C> ViewMut<'a, K, V, C> where C: Compare<K> {
    pub(crate) fn new(map: &'a mut TreeMap<K, V, C>, window: Window<'a, K>) -> Self {
        ViewMut { map, window }
    }

    fn cmp(&self) -> &C { TreeMap::cmp(self.map) }

    /// Returns a read-only view of the same range.
    pub fn as_view(&self) -> View<K, V, C> { View::new(self.map, self.window) }

    /// Returns the number of entries in the view.
    ///
    /// This walks every entry in the range.
    pub fn len(&self) -> usize { self.as_view().len() }

    /// Checks if the view is empty.
    pub fn is_empty(&self) -> bool { self.as_view().is_empty() }

    /// Checks if the view contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.as_view().contains_key(key)
    }

    /// Returns a reference to the value associated with the given key, or `None` if the key is
    /// outside the view or not in the map.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.as_view().get(key)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None` if the
    /// key is outside the view or not in the map.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        if !self.window.contains(self.cmp(), key) { return None; }
        self.map.get_mut(key)
    }

    /// Returns the view's minimum key and its value, or `None` if the view is empty.
    pub fn first(&self) -> Option<(&K, &V)> { self.as_view().first() }

    /// Returns the view's maximum key and its value, or `None` if the view is empty.
    pub fn last(&self) -> Option<(&K, &V)> { self.as_view().last() }

    /// Returns the view's minimum key, failing with [`Error::NoSuchElement`] if it is empty.
    pub fn first_key(&self) -> Result<&K> { self.as_view().first_key() }

    /// Returns the view's maximum key, failing with [`Error::NoSuchElement`] if it is empty.
    pub fn last_key(&self) -> Result<&K> { self.as_view().last_key() }

    /// Inserts an entry into the underlying map, returning the previous value, if any,
    /// associated with the key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::KeyOutOfRange`] if the key lies outside the view; the map is left
    /// unmodified.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if !self.window.contains(self.cmp(), &key) {
            tracing::debug!("rejected insert outside the view's range");
            return Err(Error::KeyOutOfRange);
        }

        Ok(self.map.insert(key, value))
    }

    /// Removes and returns the entry whose key is equal to the given key, returning `None` if
    /// the key is outside the view or not in the map.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        if !self.window.contains(self.cmp(), key) { return None; }
        self.map.remove(key)
    }

    /// Removes every entry in the view from the underlying map, leaving the rest of the map
    /// untouched.
    pub fn clear(&mut self) {
        let (tree, cmp) = self.map.parts_mut();
        while let Some(id) = self.window.first(tree, cmp) { tree.remove(id); }
    }

    /// Returns an iterator over the view's entries in ascending order.
    pub fn iter(&self) -> Range<K, V> { self.as_view().iter() }

    /// Returns an iterator over the view's entries with mutable references to the values.
    ///
    /// The references are gathered up front, so creating the iterator takes O(k log k) time
    /// and O(k) memory for the k entries in the view.
    pub fn iter_mut(&mut self) -> RangeMut<K, V> {
        let (tree, cmp) = self.map.parts_mut();
        let span = self.window.span(tree, cmp);
        RangeMut::new(tree, span)
    }

    /// Returns an iterator over the view's keys in ascending order.
    pub fn keys(&self) -> Keys<K, V> { self.as_view().keys() }

    /// Returns an iterator over the view's values in ascending order of their keys.
    pub fn values(&self) -> Values<K, V> { self.as_view().values() }

    /// Returns an iterator over mutable references to the view's values in ascending order of
    /// their keys.
    ///
    /// Gathers the references up front, like [`iter_mut`](ViewMut::iter_mut).
    pub fn values_mut(&mut self) -> ValuesMut<K, V> {
        let (tree, cmp) = self.map.parts_mut();
        let span = self.window.span(tree, cmp);
        ValuesMut(tree.entries_mut(span).into_iter())
    }

    /// Returns a fail-fast cursor positioned before the view's first entry.
    ///
    /// The cursor stops at the view's upper bound. Drop the view and pass the cursor the
    /// underlying map.
    pub fn cursor(&self) -> Cursor<K> where K: Clone { self.as_view().cursor() }

    /// Returns a read-only view of this view's entries whose keys are strictly less than `hi`.
    pub fn head_view<'b>(&'b self, hi: &'b K) -> View<'b, K, V, C> {
        self.as_view().head_view(hi)
    }

    /// Returns a read-only view of this view's entries whose keys are greater than or equal to
    /// `lo`.
    pub fn tail_view<'b>(&'b self, lo: &'b K) -> View<'b, K, V, C> {
        self.as_view().tail_view(lo)
    }

    /// Returns a read-only view of this view's entries whose keys lie in `[lo, hi)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] unless `lo` orders strictly before `hi`.
    pub fn sub_view<'b>(&'b self, lo: &'b K, hi: &'b K) -> Result<View<'b, K, V, C>> {
        self.as_view().sub_view(lo, hi)
    }

    /// Returns a read-only view of this view's entries whose keys lie between the given bounds.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] if the lower bound's key orders after the upper
    /// bound's.
    pub fn range_view<'b>(&'b self, lower: Bound<&'b K>, upper: Bound<&'b K>)
        -> Result<View<'b, K, V, C>> {

        self.as_view().range_view(lower, upper)
    }

    /// Returns a mutable view of this view's entries whose keys are strictly less than `hi`.
    pub fn head_view_mut<'b>(&'b mut self, hi: &'b K) -> ViewMut<'b, K, V, C> {
        self.narrow(Window::new(Unbounded, Excluded(hi)))
    }

    /// Returns a mutable view of this view's entries whose keys are greater than or equal to
    /// `lo`.
    pub fn tail_view_mut<'b>(&'b mut self, lo: &'b K) -> ViewMut<'b, K, V, C> {
        self.narrow(Window::new(Included(lo), Unbounded))
    }

    /// Returns a mutable view of this view's entries whose keys lie in `[lo, hi)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRange`] unless `lo` orders strictly before `hi`.
    pub fn sub_view_mut<'b>(&'b mut self, lo: &'b K, hi: &'b K) -> Result<ViewMut<'b, K, V, C>> {
        let window = Window::half_open(lo, hi, self.cmp())?;
        Ok(self.narrow(window))
    }

    fn narrow<'b>(&'b mut self, window: Window<'b, K>) -> ViewMut<'b, K, V, C> {
        let outer: Window<'b, K> = self.window;
        let window = outer.intersect(window, self.cmp());
        ViewMut::new(self.map, window)
    }
}
