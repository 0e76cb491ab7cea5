//! Sets of canonical keys [`Set`].

use crate::prelude::*;
use std::collections::btree_map;

/// An unordered collection of keys, unique up to their [canonical](Canonical) string form.
///
/// Each member remembers the original value it was first inserted with, which is what
/// [`Set::keys`] and iteration return. Inserting another value with the same canonical form is a
/// no-op, and the binary operations always keep the originals of the left operand.
///
/// ## Invariants
///
/// Every entry of the inner map is keyed by the canonical form of its value.
#[derive(Clone)]
pub struct Set<K = Key> {
    /// Maps each canonical key to the original value first inserted under it.
    map: BTreeMap<String, K>,
}

// -------------------- Errors -------------------- //

/// Invalid argument to a set operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetError {
    /// An intersection over no sets at all was requested, which has no sensible value.
    EmptyIntersection,
}

impl Display for SetError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::EmptyIntersection => f.write_str("cannot intersect an empty family of sets"),
        }
    }
}

impl std::error::Error for SetError {}

// -------------------- Operands -------------------- //

/// Anything that can be used as the right operand of [`Set::intersect`] or [`Set::union`]: a set,
/// a reference to one, or a sequence of keys.
///
/// Sequences are gathered into a set before the operation runs, so they behave exactly as the set
/// built from them would.
pub trait KeySource<'a, K: Clone + 'a> {
    /// Normalizes the operand into a set, borrowing when possible.
    fn into_key_set(self) -> Cow<'a, Set<K>>;
}

impl<'a, K: Clone> KeySource<'a, K> for &'a Set<K> {
    fn into_key_set(self) -> Cow<'a, Set<K>> {
        Cow::Borrowed(self)
    }
}

impl<'a, K: Clone + 'a> KeySource<'a, K> for Set<K> {
    fn into_key_set(self) -> Cow<'a, Set<K>> {
        Cow::Owned(self)
    }
}

/// Implements [`KeySource`] for sequences of keys.
macro_rules! impl_key_source {
    ($(<$($n: ident),*> $t: ty),*) => {
        $(
            impl<'a, K: Canonical + Clone + 'a, T: Into<K> + Clone $(, const $n: usize)*>
                KeySource<'a, K> for $t
            {
                fn into_key_set(self) -> Cow<'a, Set<K>> {
                    Cow::Owned(self.into_iter().map(T::clone).collect())
                }
            }
        )*
    };
}

impl_key_source!(<> &[T], <> &Vec<T>, <N> &[T; N]);

impl<'a, K: Canonical + Clone + 'a, T: Into<K>> KeySource<'a, K> for Vec<T> {
    fn into_key_set(self) -> Cow<'a, Set<K>> {
        Cow::Owned(self.into_iter().collect())
    }
}

impl<'a, K: Canonical + Clone + 'a, T: Into<K>, const N: usize> KeySource<'a, K> for [T; N] {
    fn into_key_set(self) -> Cow<'a, Set<K>> {
        Cow::Owned(self.into_iter().collect())
    }
}

// -------------------- Basic traits -------------------- //

impl<K> Default for Set<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists the original values.
impl<K: Debug> Debug for Set<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.map.values()).finish()
    }
}

/// Lists the canonical keys in roster notation. Keys are quoted and escaped, so that distinct sets
/// are written differently.
impl<K> Display for Set<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_char('{')?;
        let mut iter = self.map.keys();
        if let Some(fst) = iter.next() {
            write!(f, "{fst:?}")?;
        }
        for key in iter {
            write!(f, ", {key:?}")?;
        }
        f.write_char('}')
    }
}

impl<K: Canonical, T: Into<K>> FromIterator<T> for Set<K> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Canonical, T: Into<K>> Extend<T> for Set<K> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K> IntoIterator for Set<K> {
    type Item = K;
    type IntoIter = btree_map::IntoValues<String, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_values()
    }
}

impl<'a, K> IntoIterator for &'a Set<K> {
    type Item = &'a K;
    type IntoIter = btree_map::Values<'a, String, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.values()
    }
}

/// Two sets are equal when they hold the same canonical keys, whatever their original values.
impl<K, L> PartialEq<Set<L>> for Set<K> {
    fn eq(&self, other: &Set<L>) -> bool {
        self.map.keys().eq(other.map.keys())
    }
}

impl<K> Eq for Set<K> {}

/// Sets are partially ordered by inclusion.
impl<K, L> PartialOrd<Set<L>> for Set<K> {
    fn le(&self, other: &Set<L>) -> bool {
        self.subset(other)
    }

    fn ge(&self, other: &Set<L>) -> bool {
        other.subset(self)
    }

    fn lt(&self, other: &Set<L>) -> bool {
        self.size() < other.size() && self.subset(other)
    }

    fn gt(&self, other: &Set<L>) -> bool {
        other.lt(self)
    }

    fn partial_cmp(&self, other: &Set<L>) -> Option<Ordering> {
        let cmp = self.size().cmp(&other.size());
        let test = match cmp {
            Ordering::Equal => self.eq(other),
            Ordering::Less => self.le(other),
            Ordering::Greater => self.ge(other),
        };

        if test {
            Some(cmp)
        } else {
            None
        }
    }
}

// -------------------- Queries -------------------- //

impl<K> Set<K> {
    /// The empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Number of distinct canonical keys.
    #[must_use]
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the original values, in no particular order.
    #[must_use]
    pub fn iter(&self) -> btree_map::Values<'_, String, K> {
        self.map.values()
    }

    /// Removes all keys.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Whether a canonical key is present.
    fn has_canonical(&self, canonical: &str) -> bool {
        self.map.contains_key(canonical)
    }

    /// Subset relation ⊆, by canonical keys.
    #[must_use]
    pub fn subset<L>(&self, other: &Set<L>) -> bool {
        self.size() <= other.size() && self.map.keys().all(|key| other.has_canonical(key))
    }
}

impl<K: Clone> Set<K> {
    /// The original values, one per member.
    ///
    /// The order is unspecified. Sort the result if you need a stable order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.map.values().cloned().collect()
    }
}

// -------------------- Mutation -------------------- //

impl<K: Canonical> Set<K> {
    /// Builds a set by adding each key in order. Later duplicates are ignored.
    #[must_use]
    pub fn from_keys<I: IntoIterator>(keys: I) -> Self
    where
        I::Item: Into<K>,
    {
        keys.into_iter().collect()
    }

    /// Whether a key with the same canonical form as `key` is present.
    ///
    /// The key needn't have the same type as the stored keys.
    #[must_use]
    pub fn has<Q: Canonical + ?Sized>(&self, key: &Q) -> bool {
        self.has_canonical(&key.canonical())
    }

    /// Inserts a key, unless its canonical form is already present. In the latter case the stored
    /// value is kept as is.
    ///
    /// Returns whether the key was inserted.
    pub fn add<T: Into<K>>(&mut self, key: T) -> bool {
        let key = key.into();
        let canonical = key.canonical().into_owned();
        match self.map.entry(canonical) {
            Entry::Vacant(entry) => {
                entry.insert(key);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Removes the key with the same canonical form as `key`.
    ///
    /// Returns whether a key was removed.
    pub fn remove<Q: Canonical + ?Sized>(&mut self, key: &Q) -> bool {
        self.map.remove(&*key.canonical()).is_some()
    }
}

// -------------------- Algebra -------------------- //

impl<K: Canonical + Clone> Set<K> {
    /// Moves or copies into `self` every key of `other` whose canonical form is absent.
    fn absorb(&mut self, other: Cow<'_, Self>) {
        match other {
            Cow::Borrowed(other) => {
                for (canonical, key) in &other.map {
                    if !self.has_canonical(canonical) {
                        self.map.insert(canonical.clone(), key.clone());
                    }
                }
            }
            Cow::Owned(other) => {
                for (canonical, key) in other.map {
                    self.map.entry(canonical).or_insert(key);
                }
            }
        }
    }

    /// Intersection x ∩ y.
    ///
    /// The result keeps the original values from `self`.
    #[must_use]
    pub fn intersect<'a, S: KeySource<'a, K>>(&self, other: S) -> Self
    where
        K: 'a,
    {
        let other = other.into_key_set();
        let map = self
            .map
            .iter()
            .filter(|(canonical, _)| other.has_canonical(canonical))
            .map(|(canonical, key)| (canonical.clone(), key.clone()))
            .collect();

        Self { map }
    }

    /// Union x ∪ y.
    ///
    /// For members in both sets, the result keeps the original values from `self`.
    #[must_use]
    pub fn union<'a, S: KeySource<'a, K>>(&self, other: S) -> Self
    where
        K: 'a,
    {
        let mut union = self.clone();
        union.absorb(other.into_key_set());
        union
    }

    /// Intersection over an iterator, folding [`Set::intersect`] from the left.
    ///
    /// The result keeps the original values from the first set.
    ///
    /// ## Errors
    ///
    /// Returns [`SetError::EmptyIntersection`] if the iterator is empty.
    pub fn intersect_all<'a, I>(sets: I) -> Result<Self, SetError>
    where
        I: IntoIterator,
        I::Item: KeySource<'a, K>,
        K: 'a,
    {
        let mut iter = sets.into_iter();
        let fst = iter
            .next()
            .ok_or(SetError::EmptyIntersection)?
            .into_key_set();

        // Which keys of the first set survive every intersection so far.
        let mut alive = bitvec![1; fst.size()];
        for set in iter {
            if alive.not_any() {
                break;
            }

            let set = set.into_key_set();
            for (canonical, mut bit) in fst.map.keys().zip(alive.iter_mut()) {
                if *bit && !set.has_canonical(canonical) {
                    *bit = false;
                }
            }
        }

        let map = fst
            .map
            .iter()
            .zip(alive.iter().by_vals())
            .filter(|(_, keep)| *keep)
            .map(|((canonical, key), _)| (canonical.clone(), key.clone()))
            .collect();

        Ok(Self { map })
    }

    /// Union over an iterator, folding [`Set::union`] from the left.
    ///
    /// For members in several sets, the result keeps the original values from the first of them.
    /// The union of no sets is empty.
    #[must_use]
    pub fn union_all<'a, I>(sets: I) -> Self
    where
        I: IntoIterator,
        I::Item: KeySource<'a, K>,
        K: 'a,
    {
        let mut union = Self::new();
        for set in sets {
            union.absorb(set.into_key_set());
        }
        union
    }
}

/// Tests for [`Set`].
#[cfg(test)]
mod set {
    use super::*;
    use crate::keyset;

    /// Sorts keys by canonical form.
    fn sorted<K: Canonical>(mut keys: Vec<K>) -> Vec<K> {
        keys.sort_by(|a, b| a.canonical().cmp(&b.canonical()));
        keys
    }

    /// The set {a, b, c}.
    fn abc() -> Set<String> {
        let mut set = Set::new();
        set.add("a");
        set.add("b");
        set.add("c");
        set
    }

    /// Test [`Set::from_keys`].
    #[test]
    fn from_keys() {
        let set: Set<String> = Set::from_keys(["foo", "bar", "baz", "foo"]);
        assert_eq!(set.size(), 3);
        assert_eq!(sorted(set.keys()), ["bar", "baz", "foo"]);

        let empty: Set = Set::from_keys(Vec::<Key>::new());
        assert!(empty.is_empty());
    }

    /// The first occurrence of a canonical key wins on construction.
    #[test]
    fn from_keys_first_wins() {
        let set = keyset![1, "1", 1.0];
        assert_eq!(set.keys(), [Key::Int(1)]);
    }

    /// Test [`Set::size`].
    #[test]
    fn size() {
        assert_eq!(abc().size(), 3);
        assert_eq!(Set::<Key>::new().size(), 0);
    }

    /// Test [`Set::keys`].
    #[test]
    fn keys() {
        assert_eq!(sorted(abc().keys()), ["a", "b", "c"]);

        // Keys keep their type.
        let mut set: Set = Set::new();
        set.add(1);
        assert_eq!(set.keys(), [Key::Int(1)]);
    }

    /// [`Set::keys`] returns a fresh vector.
    #[test]
    fn keys_fresh() {
        let set = abc();
        let mut keys = set.keys();
        keys.clear();
        assert_eq!(set.size(), 3);
    }

    /// Test [`Set::has`].
    #[test]
    fn has() {
        let set = abc();
        assert!(set.has("a"));
        assert!(set.has("b"));
        assert!(set.has("c"));
        assert!(!set.has("foo"));
    }

    /// Test [`Set::add`].
    #[test]
    fn add() {
        let mut set = abc();
        assert!(!set.has("foo"));
        assert!(set.add("foo"));
        assert!(set.has("foo"));

        assert!(set.has("a"));
        assert!(!set.add("a"));
        assert!(set.has("a"));
    }

    /// Keys coercing to the same string are the same member.
    #[test]
    fn add_coerced() {
        let mut set: Set = Set::new();
        assert!(set.add(1));
        assert!(!set.add("1"));
        assert!(!set.add(1.0));
        assert!(set.has("1"));
        assert!(set.has(&1_u8));
        assert_eq!(set.keys(), [Key::Int(1)]);
    }

    /// Test [`Set::remove`].
    #[test]
    fn remove() {
        let mut set = abc();
        assert!(set.remove("a"));
        assert!(!set.has("a"));
        assert_eq!(set.size(), 2);

        assert!(!set.remove("a"));
        assert!(!set.remove("foo"));
        assert_eq!(set.size(), 2);
    }

    /// Removal also goes through coercion.
    #[test]
    fn remove_coerced() {
        let mut set = keyset!["1", 2];
        assert!(set.remove(&1));
        assert!(set.remove(&2.0));
        assert!(set.is_empty());
    }

    /// Test [`Set::intersect`].
    #[test]
    fn intersect() {
        let s1 = keyset![1, 2];
        let s2 = keyset![1, 3];
        assert_eq!(s1.intersect(&s2).keys(), [Key::Int(1)]);

        // Neither operand changes.
        assert_eq!(sorted(s1.keys()), [Key::Int(1), Key::Int(2)]);
        assert_eq!(sorted(s2.keys()), [Key::Int(1), Key::Int(3)]);
    }

    /// [`Set::intersect`] keeps the keys in `self`.
    #[test]
    fn intersect_bias() {
        let s1 = keyset![1, 2];
        let s2 = keyset!["1", 3];
        assert_eq!(s1.intersect(&s2).keys(), [Key::Int(1)]);
        assert_eq!(s2.intersect(&s1).keys(), [Key::from("1")]);
    }

    /// [`Set::intersect`] takes sequences.
    #[test]
    fn intersect_sequence() {
        let s1 = keyset![1, 2];
        let expected = s1.intersect(keyset!["1", 3]).keys();

        assert_eq!(s1.intersect(&[Key::from("1"), Key::from(3)]).keys(), expected);
        assert_eq!(s1.intersect(vec![Key::from("1"), Key::from(3)]).keys(), expected);
        assert_eq!(s1.intersect(["1"]).keys(), expected);
        assert_eq!(s1.intersect(&vec![1.0]).keys(), expected);
        assert_eq!(s1.intersect(&["1", "3"][..]).keys(), expected);
    }

    /// Test [`Set::union`].
    #[test]
    fn union() {
        let s1 = keyset![1, 2];
        let s2 = keyset![1, 3];
        let union = s1.union(&s2);
        assert_eq!(sorted(union.keys()), [Key::Int(1), Key::Int(2), Key::Int(3)]);

        // Neither operand changes.
        assert_eq!(sorted(s1.keys()), [Key::Int(1), Key::Int(2)]);
        assert_eq!(sorted(s2.keys()), [Key::Int(1), Key::Int(3)]);
    }

    /// [`Set::union`] keeps the keys in `self`, and takes the rest from `other`.
    #[test]
    fn union_bias() {
        let s1 = keyset![1, 2];
        let s2 = keyset!["1", 3];
        assert_eq!(
            sorted(s1.union(&s2).keys()),
            [Key::Int(1), Key::Int(2), Key::Int(3)]
        );
        assert_eq!(
            sorted(s2.union(s1).keys()),
            [Key::from("1"), Key::Int(2), Key::Int(3)]
        );
    }

    /// [`Set::union`] takes sequences.
    #[test]
    fn union_sequence() {
        let s1 = keyset![1, 2];
        let expected = sorted(s1.union(keyset!["1", 3]).keys());

        assert_eq!(sorted(s1.union([Key::from("1"), Key::from(3)]).keys()), expected);
        assert_eq!(sorted(s1.union(&[Key::from("1"), Key::from(3)]).keys()), expected);
        assert_eq!(sorted(s1.union(vec![Key::from("1"), Key::from(3)]).keys()), expected);
    }

    /// Test [`Set::intersect_all`].
    #[test]
    fn intersect_all() {
        let sets = [keyset![1, 2, 3], keyset![2, 3, "A"], keyset![3, "A", "B"]];
        let inter = Set::intersect_all(&sets).unwrap();
        assert_eq!(inter.keys(), [Key::Int(3)]);

        // Owned sets work too.
        assert_eq!(Set::intersect_all(sets).unwrap().keys(), [Key::Int(3)]);
    }

    /// [`Set::intersect_all`] keeps the keys in the first set.
    #[test]
    fn intersect_all_bias() {
        let sets = [keyset!["1", 2], keyset![1, 2], keyset![1.0, "2"]];
        let inter = Set::intersect_all(&sets).unwrap();
        assert_eq!(sorted(inter.keys()), [Key::from("1"), Key::Int(2)]);
    }

    /// [`Set::intersect_all`] matches repeated [`Set::intersect`].
    #[test]
    fn intersect_all_fold() {
        let sets = [keyset![1, 2, 3, 4], keyset![4, 2, 9], keyset![], keyset![2]];
        for n in 1..=sets.len() {
            let fold = sets[1..n]
                .iter()
                .fold(sets[0].clone(), |acc, set| acc.intersect(set));
            assert_eq!(Set::intersect_all(&sets[..n]).unwrap(), fold);
        }
    }

    /// [`Set::intersect_all`] of a single set is that set.
    #[test]
    fn intersect_all_single() {
        let set = keyset![1, "A"];
        assert_eq!(Set::intersect_all([&set]).unwrap(), set);
    }

    /// [`Set::intersect_all`] fails on no sets.
    #[test]
    fn intersect_all_empty() {
        let sets: [Set; 0] = [];
        assert_eq!(Set::intersect_all(sets), Err(SetError::EmptyIntersection));
        assert_eq!(
            SetError::EmptyIntersection.to_string(),
            "cannot intersect an empty family of sets"
        );
    }

    /// Test [`Set::union_all`].
    #[test]
    fn union_all() {
        let sets = [
            keyset![1, 2, 3],
            keyset![2, 3, "A"],
            keyset![3, "A", "B"],
            keyset!["1"],
        ];
        let union = Set::union_all(&sets);
        assert_eq!(
            sorted(union.keys()),
            [Key::Int(1), Key::Int(2), Key::Int(3), Key::from("A"), Key::from("B")]
        );
    }

    /// [`Set::union_all`] keeps the keys from the first set containing them.
    #[test]
    fn union_all_bias() {
        let sets = [keyset![1], keyset!["1", "2"], keyset![2, 3.0]];
        let union = Set::union_all(sets);
        assert_eq!(
            sorted(union.keys()),
            [Key::Int(1), Key::from("2"), Key::Float(3.0)]
        );
    }

    /// [`Set::union_all`] of no sets is empty.
    #[test]
    fn union_all_empty() {
        let sets: [Set; 0] = [];
        assert!(Set::union_all(sets).is_empty());
    }

    /// Equality ignores original values.
    #[test]
    fn eq() {
        assert_eq!(keyset![1, 2], keyset!["2", 1.0]);
        assert_ne!(keyset![1, 2], keyset![1]);

        let strings: Set<String> = Set::from_keys(["1", "2"]);
        assert_eq!(keyset![1, 2], strings);
    }

    /// Test the subset order.
    #[test]
    fn subset() {
        let small = keyset![1];
        let big = keyset!["1", 2];
        let other = keyset![3];

        assert!(small.subset(&big));
        assert!(!big.subset(&small));
        assert!(small < big);
        assert!(big >= small);
        assert_eq!(small.partial_cmp(&small.clone()), Some(Ordering::Equal));
        assert_eq!(small.partial_cmp(&other), None);
        assert!(keyset![].subset(&other));
    }

    /// Test formatting.
    #[test]
    fn fmt() {
        let set = keyset![2, "A", 1.5];
        assert_eq!(set.to_string(), r#"{"1.5", "2", "A"}"#);
        assert_eq!(Set::<Key>::new().to_string(), "{}");
        assert_eq!(
            format!("{:?}", keyset![1, "A"]),
            r#"{Int(1), Str("A")}"#
        );
    }

    /// Distinct sets are written differently, even when keys contain separators or quotes.
    #[test]
    fn fmt_escaped() {
        let joined = keyset!["a, b"];
        let split = keyset!["a", "b"];
        assert_ne!(joined, split);
        assert_eq!(joined.to_string(), r#"{"a, b"}"#);
        assert_eq!(split.to_string(), r#"{"a", "b"}"#);
        assert_eq!(keyset![r#"say "hi""#].to_string(), r#"{"say \"hi\""}"#);
    }

    /// Iteration yields the original values.
    #[test]
    fn iter() {
        let mut set = keyset!["x", 4];
        let mut keys: Vec<_> = set.iter().cloned().collect();
        assert_eq!(sorted(keys.clone()), [Key::Int(4), Key::from("x")]);

        keys = set.clone().into_iter().collect();
        assert_eq!(keys.len(), 2);

        set.extend([5, 4]);
        assert_eq!(set.size(), 3);
        set.clear();
        assert!(set.is_empty());
    }
}
