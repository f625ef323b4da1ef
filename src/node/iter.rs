use super::{NodeId, Tree};

/// The unvisited part of an in-order walk: the nodes from `front` through `back`, inclusive.
///
/// A span holds no borrow of its tree. Callers pass the tree to each step and must not change
/// its structure between steps.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl Span {
    pub fn new(front: Option<NodeId>, back: Option<NodeId>) -> Span {
        match (front, back) {
            (Some(_), Some(_)) => Span { front: front, back: back },
            _ => Span::empty(),
        }
    }

    pub fn empty() -> Span { Span { front: None, back: None } }

    pub fn whole<K, V>(tree: &Tree<K, V>) -> Span { Span::new(tree.first(), tree.last()) }

    pub fn is_empty(&self) -> bool { self.front.is_none() }

    pub fn next<K, V>(&mut self, tree: &Tree<K, V>) -> Option<NodeId> {
        let id = self.front?;

        if self.front == self.back {
            *self = Span::empty();
        } else {
            self.front = tree.next(id);
        }

        Some(id)
    }

    pub fn next_back<K, V>(&mut self, tree: &Tree<K, V>) -> Option<NodeId> {
        let id = self.back?;

        if self.front == self.back {
            *self = Span::empty();
        } else {
            self.back = tree.prev(id);
        }

        Some(id)
    }
}
