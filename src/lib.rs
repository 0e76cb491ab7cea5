//! # Sets of canonical keys
//!
//! A [`Set`](set::Set) is an unordered collection of keys in which two keys count as the same
//! member whenever they coerce to the same string, the way keys of a dynamically typed map behave.
//! The integer `1`, the float `1.0` and the string `"1"` are all one member. The set still
//! remembers the value that was first inserted for each member, and hands it back from
//! [`Set::keys`](set::Set::keys).
//!
//! ```
//! use keyset::{keyset, prelude::*};
//!
//! let mut set = keyset![1, 2];
//! assert!(set.has("1"));
//! assert!(!set.add("2"));
//!
//! let other = keyset!["1", 3];
//! assert_eq!(set.intersect(&other).keys(), vec![Key::Int(1)]);
//! assert_eq!(set.union(&other).size(), 3);
//! ```

#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod key;
pub mod prelude;
pub mod set;
pub mod utils;


/// Small vector, sized to fit the digits of any float.
type SmallVec<T> = smallvec::SmallVec<[T; 24]>;

/// Builds a [`Set`](set::Set) of [`Key`](key::Key) values, which may have different types.
///
/// ```
/// use keyset::{keyset, prelude::*};
///
/// let set = keyset![1, "A", 2.5, true];
/// assert_eq!(set.size(), 4);
/// assert!(set.has("true"));
/// ```
#[macro_export]
macro_rules! keyset {
    () => (
        $crate::set::Set::<$crate::key::Key>::new()
    );
    ($($key: expr),+ $(,)?) => (
        $crate::set::Set::<$crate::key::Key>::from_keys([$($crate::key::Key::from($key)),+])
    );
}
