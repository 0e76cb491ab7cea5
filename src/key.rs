//! Keys and their canonical string forms.

use crate::prelude::*;
use crate::utils::widen;
use derive_more::From;
use std::num::TryFromIntError;

/// A value that can be coerced into a canonical string.
///
/// The canonical string is the sole identity of a key within a [`Set`]: two keys are the same member
/// if and only if their canonical strings are equal, whatever their types.
pub trait Canonical {
    /// The canonical string form of the key.
    fn canonical(&self) -> Cow<'_, str>;
}

impl Canonical for str {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Canonical for String {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn canonical(&self) -> Cow<'_, str> {
        (**self).canonical()
    }
}

/// Implements [`Canonical`] through [`ToString`].
macro_rules! impl_canonical {
    ($($t: ty),*) => {
        $(
            impl Canonical for $t {
                fn canonical(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

impl_canonical!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char);

impl Canonical for f64 {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Owned(fmt_number(*self))
    }
}

impl Canonical for f32 {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Owned(fmt_number(*self))
    }
}

/// A dynamically typed key, allowing a single [`Set`] to hold numbers, strings and booleans at
/// once.
///
/// Equality on [`Key`] compares the values themselves, so `Key::Int(1) != Key::Str("1")`, even
/// though both are the same member of a [`Set`].
///
/// Integers wider than 32 bits other than `i64` only convert through [`TryFrom`], failing outside
/// the range of `i64`. Use a `Set<u64>` or similar to hold the full range.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Key {
    /// An integer.
    Int(i64),
    /// A float. Integral floats coerce like the matching integer.
    Float(f64),
    /// A string.
    Str(String),
    /// A boolean, coerced into `true` or `false`.
    Bool(bool),
}

/// Implements [`From`] for [`Key`] on types that widen losslessly into a variant.
macro_rules! impl_from {
    ($variant: ident, $inner: ty; $($t: ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(value: $t) -> Self {
                    Self::$variant(<$inner>::from(value))
                }
            }
        )*
    };
}

impl_from!(Int, i64; i8, i16, i32, u8, u16, u32);
impl_from!(Str, String; &str, char);

/// Keeps the digits of the `f32`, so the key coerces like the `f32` itself.
impl From<f32> for Key {
    fn from(value: f32) -> Self {
        Self::Float(widen(value))
    }
}

/// Implements [`TryFrom`] for [`Key`] on integers that might not fit into an `i64`.
macro_rules! impl_try_from {
    ($($t: ty),*) => {
        $(
            impl TryFrom<$t> for Key {
                type Error = TryFromIntError;

                fn try_from(value: $t) -> Result<Self, Self::Error> {
                    i64::try_from(value).map(Self::Int)
                }
            }
        )*
    };
}

impl_try_from!(i128, isize, u64, u128, usize);

impl Canonical for Key {
    fn canonical(&self) -> Cow<'_, str> {
        match self {
            Self::Int(n) => n.canonical(),
            Self::Float(x) => x.canonical(),
            Self::Str(s) => s.canonical(),
            Self::Bool(b) => b.canonical(),
        }
    }
}

/// Writes the canonical form.
impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.canonical())
    }
}
