//! An ordered map based on a red-black tree.
//!
//! [`TreeMap`] keeps its entries sorted by a comparator from the [`compare`] crate, which
//! defaults to the natural order of the keys. On top of the usual lookups it offers:
//!
//! - live range views ([`View`], [`ViewMut`]) that read from and write through to the map,
//! - fail-fast [`Cursor`]s that detect structural changes made behind their back,
//! - linear-time construction from entries that are already sorted.
//!
//! # Examples
//!
//! ```
//! use rbmap::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
//!     map.insert(key, key * 10);
//! }
//!
//! let view = map.sub_view(&3, &8).unwrap();
//! assert_eq!(view.keys().collect::<Vec<_>>(), [&3, &4, &5, &6, &7]);
//! assert_eq!(view.first_key(), Ok(&3));
//! assert_eq!(view.last_key(), Ok(&7));
//! ```

pub mod map;

mod cursor;
mod error;
mod node;
mod view;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use crate::cursor::Cursor;
pub use crate::error::{Error, Result};
pub use crate::map::TreeMap;
pub use crate::view::{View, ViewMut};
