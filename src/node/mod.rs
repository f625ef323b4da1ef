mod iter;


use compare::Compare;
use std::cmp::Ordering::*;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

pub use self::iter::Span;

/// A stable handle to a node in a tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Option<NodeId>) -> Self {
        Node { key, value, color: Color::Red, parent, left: None, right: None }
    }

    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(0);

fn fresh_identity() -> u64 { NEXT_IDENTITY.fetch_add(1, Relaxed) }

/// A red-black tree whose nodes live in an arena and link to each other by handle.
///
/// Children are reached through `left`/`right`, and `parent` is a plain back-reference used
/// for navigation and rebalancing. Every structural change (a node linked in or spliced out)
/// bumps `stamp`; replacing the value of an existing key does not.
///
/// `identity` is unique to each tree in the process, clones included, so node handles taken
/// from one tree are never mistaken for handles into another.
pub struct Tree<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
    stamp: u64,
    identity: u64,
}

impl<K, V> Clone for Tree<K, V> where K: Clone, V: Clone {
    fn clone(&self) -> Self {
        Tree {
            nodes: self.nodes.clone(),
            free: self.free.clone(),
            root: self.root,
            len: self.len,
            stamp: self.stamp,
            identity: fresh_identity(),
        }
    }
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Tree {
            nodes: vec![],
            free: vec![],
            root: None,
            len: 0,
            stamp: 0,
            identity: fresh_identity(),
        }
    }

    /// Links a strictly ascending run of entries into a balanced tree without comparing keys.
    ///
    /// The result has the shape of a complete binary tree: every level is black except the
    /// deepest, incomplete one, which is red, so all root-to-leaf paths share a black-height.
    pub fn from_sorted(entries: Vec<(K, V)>) -> Self {
        let len = entries.len();
        let nodes = entries.into_iter().map(|(key, value)| Some(Node::new(key, value, None)));
        let mut tree = Tree {
            nodes: nodes.collect(),
            free: vec![],
            root: None,
            len,
            stamp: 0,
            identity: fresh_identity(),
        };

        let red_level = red_level(len);
        tree.root = tree.link_sorted(0, 0, len, None, red_level);
        tracing::trace!(len, red_level, "linked sorted entries");
        tree
    }

    fn link_sorted(&mut self, depth: usize, lo: usize, hi: usize, parent: Option<NodeId>,
                   red_level: usize) -> Option<NodeId> {
        if lo >= hi { return None; }

        let id = NodeId(lo + (hi - lo - 1) / 2);
        let left = self.link_sorted(depth + 1, lo, id.0, Some(id), red_level);
        let right = self.link_sorted(depth + 1, id.0 + 1, hi, Some(id), red_level);

        let node = self.node_mut(id);
        node.parent = parent;
        node.left = left;
        node.right = right;
        node.color = if depth == red_level { Color::Red } else { Color::Black };
        Some(id)
    }

    pub fn len(&self) -> usize { self.len }

    pub fn stamp(&self) -> u64 { self.stamp }

    pub fn identity(&self) -> u64 { self.identity }

    pub fn root(&self) -> Option<NodeId> { self.root }

    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes[id.0].as_ref().expect("handle refers to a released node")
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes[id.0].as_mut().expect("handle refers to a released node")
    }

    pub fn key(&self, id: NodeId) -> &K { &self.node(id).key }

    pub fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }

    pub fn entry_mut(&mut self, id: NodeId) -> (&K, &mut V) {
        let node = self.node_mut(id);
        (&node.key, &mut node.value)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> { self.node(id).left }

    pub fn right(&self, id: NodeId) -> Option<NodeId> { self.node(id).right }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.node(id).parent }

    fn color(&self, id: NodeId) -> Color { self.node(id).color }

    fn set_color(&mut self, id: NodeId, color: Color) { self.node_mut(id).color = color; }

    // absent children count as black
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| self.color(id) == Color::Red)
    }

    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> Side {
        if self.left(parent) == child { Side::Left } else { Side::Right }
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.nodes[id.0].take().expect("node released twice");
        self.free.push(id);
        node
    }

    pub fn clear(&mut self) {
        tracing::trace!(len = self.len, "clearing tree");
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
        self.stamp += 1;
    }

    /// Returns the node whose key is equal to the given key.
    pub fn find<Q: ?Sized, C>(&self, cmp: &C, key: &Q) -> Option<NodeId>
        where C: Compare<Q, K> {

        let mut link = self.root;

        while let Some(id) = link {
            let node = self.node(id);
            link = match cmp.compare(key, &node.key) {
                Equal => return Some(id),
                Less => node.left,
                Greater => node.right,
            };
        }

        None
    }

    /// Returns the node with the smallest key greater than (or, if `inclusive`, equal to) the
    /// given key.
    pub fn succ<Q: ?Sized, C>(&self, cmp: &C, key: &Q, inclusive: bool) -> Option<NodeId>
        where C: Compare<Q, K> {

        let mut closest = None;
        let mut link = self.root;

        while let Some(id) = link {
            let node = self.node(id);
            link = match cmp.compare(key, &node.key) {
                Equal if inclusive => return Some(id),
                Less => {
                    closest = Some(id);
                    node.left
                }
                _ => node.right,
            };
        }

        closest
    }

    /// Returns the node with the greatest key less than (or, if `inclusive`, equal to) the given
    /// key.
    pub fn pred<Q: ?Sized, C>(&self, cmp: &C, key: &Q, inclusive: bool) -> Option<NodeId>
        where C: Compare<Q, K> {

        let mut closest = None;
        let mut link = self.root;

        while let Some(id) = link {
            let node = self.node(id);
            link = match cmp.compare(key, &node.key) {
                Equal if inclusive => return Some(id),
                Greater => {
                    closest = Some(id);
                    node.right
                }
                _ => node.left,
            };
        }

        closest
    }

    pub fn first(&self) -> Option<NodeId> { self.root.map(|id| self.extremum(id, Side::Left)) }

    pub fn last(&self) -> Option<NodeId> { self.root.map(|id| self.extremum(id, Side::Right)) }

    fn extremum(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.node(id).child(side) { id = child; }
        id
    }

    /// Returns the in-order successor of the given node.
    pub fn next(&self, id: NodeId) -> Option<NodeId> { self.step(id, Side::Right) }

    /// Returns the in-order predecessor of the given node.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> { self.step(id, Side::Left) }

    fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.node(id).child(side) {
            return Some(self.extremum(child, side.opposite()));
        }

        let mut child = id;
        let mut parent = self.parent(id);

        while let Some(id) = parent {
            if self.node(id).child(side) != Some(child) { break; }
            child = id;
            parent = self.parent(id);
        }

        parent
    }

    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                *self.node_mut(parent).child_mut(side) = new;
            }
        }
    }

    fn rotate(&mut self, x: NodeId, side: Side) {
        match side {
            Side::Left => self.rotate_left(x),
            Side::Right => self.rotate_right(x),
        }
    }

    /// Lifts the right child of `x` into its place, making `x` its left child.
    pub fn rotate_left(&mut self, x: NodeId) { self.lift(x, Side::Left) }

    /// Lifts the left child of `x` into its place, making `x` its right child.
    pub fn rotate_right(&mut self, x: NodeId) { self.lift(x, Side::Right) }

    // Moves `x` down towards `side`, lifting its child on the opposite side into its place.
    fn lift(&mut self, x: NodeId, side: Side) {
        let other = side.opposite();
        let y = self.node(x).child(other).expect("rotation without a pivot child");

        let inner = self.node(y).child(side);
        *self.node_mut(x).child_mut(other) = inner;
        if let Some(inner) = inner { self.node_mut(inner).parent = Some(x); }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));

        *self.node_mut(y).child_mut(side) = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    /// Inserts an entry, returning the previous value if the key was already present.
    pub fn insert<C>(&mut self, cmp: &C, key: K, value: V) -> Option<V> where C: Compare<K> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut link = self.root;

        while let Some(id) = link {
            parent = link;
            let node = self.node_mut(id);
            side = match cmp.compare(&key, &node.key) {
                Equal => return Some(mem::replace(&mut node.value, value)),
                Less => Side::Left,
                Greater => Side::Right,
            };
            link = node.child(side);
        }

        let id = self.alloc(Node::new(key, value, parent));

        match parent {
            None => self.root = Some(id),
            Some(parent) => *self.node_mut(parent).child_mut(side) = Some(id),
        }

        self.len += 1;
        self.stamp += 1;
        self.insert_fixup(id);
        None
    }

    fn insert_fixup(&mut self, mut x: NodeId) {
        while let Some(mut parent) = self.parent(x) {
            if self.color(parent) == Color::Black { break; }

            // a red node is never the root
            let grandparent = self.parent(parent).expect("red node without a parent");
            let side = self.side_of(grandparent, Some(parent));

            match self.node(grandparent).child(side.opposite()) {
                Some(uncle) if self.color(uncle) == Color::Red => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    x = grandparent;
                }
                _ => {
                    if self.side_of(parent, Some(x)) != side {
                        self.rotate(parent, side);
                        mem::swap(&mut x, &mut parent);
                    }

                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate(grandparent, side.opposite());
                }
            }
        }

        if let Some(root) = self.root { self.set_color(root, Color::Black); }
    }

    /// Removes the given node from the tree and returns its entry.
    ///
    /// A node with two children is not unlinked itself: it takes over the entry of its in-order
    /// successor, and the successor's node is spliced out instead.
    pub fn remove(&mut self, id: NodeId) -> (K, V) {
        let target = match (self.left(id), self.right(id)) {
            (Some(_), Some(right)) => {
                let succ = self.extremum(right, Side::Left);
                self.swap_entries(id, succ);
                succ
            }
            _ => id,
        };

        let child = self.left(target).or(self.right(target));
        let parent = self.parent(target);
        if let Some(child) = child { self.node_mut(child).parent = parent; }
        self.replace_child(parent, target, child);

        let node = self.release(target);
        self.len -= 1;
        self.stamp += 1;

        if node.color == Color::Black { self.remove_fixup(child, parent); }
        (node.key, node.value)
    }

    fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.nodes.split_at_mut(hi);
        let x = head[lo].as_mut().expect("handle refers to a released node");
        let y = tail[0].as_mut().expect("handle refers to a released node");
        mem::swap(&mut x.key, &mut y.key);
        mem::swap(&mut x.value, &mut y.value);
    }

    // `x` may be an empty position, so its parent is tracked alongside it.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let p = match parent {
                Some(p) => p,
                None => break,
            };

            let side = self.side_of(p, x);
            let other = side.opposite();
            let mut sibling =
                self.node(p).child(other).expect("black-height deficit without a sibling");

            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling =
                    self.node(p).child(other).expect("black-height deficit without a sibling");
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(other);

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                x = Some(p);
                parent = self.parent(p);
            } else {
                if !self.is_red(far) {
                    if let Some(near) = near { self.set_color(near, Color::Black); }
                    self.set_color(sibling, Color::Red);
                    self.rotate(sibling, other);
                    sibling = self.node(p).child(other).expect("rotation lost the sibling");
                }

                let color = self.color(p);
                self.set_color(sibling, color);
                self.set_color(p, Color::Black);
                if let Some(far) = self.node(sibling).child(other) {
                    self.set_color(far, Color::Black);
                }
                self.rotate(p, side);

                x = self.root;
                parent = None;
            }
        }

        if let Some(x) = x { self.set_color(x, Color::Black); }
    }

    /// Returns the entries of the span in order, with mutable references to the values.
    ///
    /// The span's nodes are visited first and then carved out of the arena in slot order, so
    /// every value is borrowed exactly once.
    pub fn entries_mut(&mut self, mut span: Span) -> Vec<(&K, &mut V)> {
        let mut slots = vec![];
        while let Some(id) = span.next(self) { slots.push((id.0, slots.len())); }
        slots.sort_unstable();

        let mut entries: Vec<Option<(&K, &mut V)>> = slots.iter().map(|_| None).collect();
        let mut rest = &mut self.nodes[..];
        let mut offset = 0;

        for (slot, pos) in slots {
            let (_, tail) = mem::take(&mut rest).split_at_mut(slot - offset);
            let (node, tail) = tail.split_first_mut().expect("span node outside the arena");
            let Node { key, value, .. } = node.as_mut().expect("handle refers to a released node");
            entries[pos] = Some((&*key, value));
            rest = tail;
            offset = slot + 1;
        }

        entries.into_iter().map(|e| e.expect("span node visited twice")).collect()
    }

    /// Consumes the tree, returning its entries in order.
    pub fn into_entries(mut self) -> Vec<(K, V)> {
        let mut ids = Vec::with_capacity(self.len);
        let mut link = self.first();

        while let Some(id) = link {
            ids.push(id);
            link = self.next(id);
        }

        ids.into_iter().map(|id| {
            let node = self.release(id);
            (node.key, node.value)
        }).collect()
    }
}

/// Returns the depth at which a complete tree of `len` nodes has its last, incomplete level.
fn red_level(len: usize) -> usize {
    let mut level = 0;
    let mut m = len as isize - 1;

    while m >= 0 {
        level += 1;
        m = m / 2 - 1;
    }

    level
}
