//! Errors reported by the map, its views and its cursors.

/// Result type for fallible map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating on a map.
///
/// Every error is local to the operation that reported it; the map is left
/// unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("key lies outside the view's range")]
    KeyOutOfRange,

    #[error("lower bound does not precede upper bound")]
    InvalidRange,

    #[error("entry {index} is not strictly greater than its predecessor")]
    Unsorted { index: usize },

    #[error("cursor has no entry to remove")]
    InvalidState,

    #[error("map was structurally modified outside the cursor")]
    ConcurrentModification,

    #[error("no such element")]
    NoSuchElement,
}
