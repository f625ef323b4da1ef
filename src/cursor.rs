//! Fail-fast cursors.

use compare::Compare;
use std::ops::Bound::{self, Unbounded};

use crate::error::{Error, Result};
use crate::map::TreeMap;
use crate::node::NodeId;
use crate::view::Window;

/// A fail-fast cursor over the entries of a map or view, in ascending order.
///
/// Unlike the map's iterators, a cursor does not borrow the map. Each call takes the map
/// explicitly, so the map may be modified between calls. The cursor records the map's
/// structural-change count when it is created; once the map is changed by anything other than
/// the cursor's own [`remove`](Cursor::remove), every further call fails with
/// [`Error::ConcurrentModification`]. Replacing the value of an existing key is not a
/// structural change.
///
/// A cursor belongs to the map it was created from: handed any other map, including a clone
/// or a replacement assigned to the same variable, it fails with
/// [`Error::ConcurrentModification`]. It borrows neither the map nor the view it came from,
/// so it can remove entries through `&mut map` while bounded.
///
/// # Examples
///
/// ```
/// let mut map: rbmap::TreeMap<_, _> = (1..6).map(|k| (k, k * 10)).collect();
///
/// let mut cursor = map.cursor();
/// loop {
///     let key = match cursor.next(&map).unwrap() {
///         Some((&key, _)) => key,
///         None => break,
///     };
///
///     if key % 2 == 0 {
///         cursor.remove(&mut map).unwrap();
///     }
/// }
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), [&1, &3, &5]);
/// ```
#[derive(Clone)]
pub struct Cursor<K> {
    next: Option<NodeId>,
    last: Option<NodeId>,
    expected: u64,
    identity: u64,
    upper: Bound<K>,
}

impl<K> Cursor<K> {
    pub(crate) fn new<V, C>(map: &TreeMap<K, V, C>, first: Option<NodeId>, upper: Bound<K>)
        -> Self where C: Compare<K> {

        let tree = map.tree();
        Cursor {
            next: first,
            last: None,
            expected: tree.stamp(),
            identity: tree.identity(),
            upper,
        }
    }

    fn check<V, C>(&self, map: &TreeMap<K, V, C>) -> Result<()> where C: Compare<K> {
        let tree = map.tree();

        if tree.identity() != self.identity {
            tracing::debug!(expected = self.identity, actual = tree.identity(),
                            "cursor used with a different map");
            return Err(Error::ConcurrentModification);
        }

        let actual = tree.stamp();

        if actual != self.expected {
            tracing::debug!(expected = self.expected, actual,
                            "cursor detected a structural change");
            return Err(Error::ConcurrentModification);
        }

        Ok(())
    }

    // The successor is only checked against the upper bound when it is about to be returned,
    // since a removal may hand the cursor a node whose entry was replaced.
    fn upcoming<V, C>(&self, map: &TreeMap<K, V, C>) -> Option<NodeId> where C: Compare<K> {
        let window = Window::new(Unbounded, self.upper.as_ref());
        self.next.filter(|&id| !window.too_high(map.cmp(), map.tree().key(id)))
    }

    /// Checks if another entry remains.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ConcurrentModification`] if the map changed structurally behind the
    /// cursor's back.
    pub fn has_next<V, C>(&self, map: &TreeMap<K, V, C>) -> Result<bool> where C: Compare<K> {
        self.check(map)?;
        Ok(self.upcoming(map).is_some())
    }

    /// Advances the cursor, returning the next entry or `None` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ConcurrentModification`] if the map changed structurally behind the
    /// cursor's back.
    pub fn next<'m, V, C>(&mut self, map: &'m TreeMap<K, V, C>) -> Result<Option<(&'m K, &'m V)>>
        where C: Compare<K> {

        self.check(map)?;

        let id = match self.upcoming(map) {
            Some(id) => id,
            None => return Ok(None),
        };

        let tree = map.tree();
        self.next = tree.next(id);
        self.last = Some(id);
        Ok(Some(tree.entry(id)))
    }

    /// Removes the entry most recently returned by [`next`](Cursor::next) from the map and
    /// returns it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ConcurrentModification`] if the map changed structurally behind the
    /// cursor's back, and with [`Error::InvalidState`] if `next` has not returned an entry since
    /// the cursor was created or since the last removal.
    pub fn remove<V, C>(&mut self, map: &mut TreeMap<K, V, C>) -> Result<(K, V)>
        where C: Compare<K> {

        self.check(map)?;

        let last = self.last.take().ok_or(Error::InvalidState)?;
        let (tree, _) = map.parts_mut();

        // a node with two children survives and takes over its successor's entry
        if tree.left(last).is_some() && tree.right(last).is_some() { self.next = Some(last); }

        let entry = tree.remove(last);
        self.expected = tree.stamp();
        Ok(entry)
    }
}
