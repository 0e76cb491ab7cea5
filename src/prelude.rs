//! Crate prelude.

// The actual prelude.
pub use crate::{
    key::{Canonical, Key},
    set::{KeySource, Set, SetError},
};

// Convenient imports within the crate.
pub(crate) use crate::{utils::fmt_number, SmallVec};
pub(crate) use bitvec::prelude::*;
pub(crate) use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::{btree_map::Entry, BTreeMap},
    fmt::{Debug, Display, Formatter, Result as FmtResult, Write},
};
