use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::table::Entry as TableEntry;
use crate::table::HopscotchTable;
use crate::table::DEFAULT_BUCKET_COUNT;

/// A hash set implemented using the hopscotch `HopscotchTable` as the
/// underlying storage.
///
/// `HopscotchSet<T, S>` stores values that implement `Hash + Eq` and uses
/// a hasher builder `S` to hash them. The storage behaves exactly like the
/// map's: every value sits within `H` buckets of its home bucket or in a
/// small overflow storage.
#[derive(Clone)]
pub struct HopscotchSet<
    T,
    S,
    const H: usize = 62,
    const GROWTH_NUM: usize = 2,
    const GROWTH_DEN: usize = 1,
> {
    table: HopscotchTable<T, H, GROWTH_NUM, GROWTH_DEN>,
    hash_builder: S,
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Debug
    for HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchSet;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut set: HopscotchSet<_, _> = HopscotchSet::with_hasher(SimpleHasher);
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HopscotchTable::with_bucket_count(DEFAULT_BUCKET_COUNT),
            hash_builder,
        }
    }

    /// Creates a new hash set sized to hold at least `capacity` values
    /// without growing.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let mut set = Self::with_hasher(hash_builder);
        if capacity > set.capacity() {
            set.reserve(capacity);
        }
        set
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the set can hold before the next
    /// insertion triggers a grow.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of logical buckets.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all values from the set, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns `true` if the set contains the given value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |stored| stored == value)
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` when the value was not already present. The stored
    /// value is kept when an equal one is inserted again.
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        let hash_builder = &self.hash_builder;
        match self.table.entry(
            hash,
            |stored| *stored == value,
            |stored| hash_builder.hash_one(stored),
        ) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Removes a value from the set. Returns `true` when it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to the given value.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        let hash_builder = &self.hash_builder;
        self.table.remove(
            hash,
            |stored| stored == value,
            |stored| hash_builder.hash_one(stored),
        )
    }

    /// Retains only the values for which the predicate returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let hash_builder = &self.hash_builder;
        self.table.retain(
            |stored| keep(stored),
            |stored| hash_builder.hash_one(stored),
        );
    }

    /// Sizes the set so that at least `capacity` total values fit without
    /// growing.
    pub fn reserve(&mut self, capacity: usize) {
        let hash_builder = &self.hash_builder;
        self.table
            .reserve(capacity, |stored| hash_builder.hash_one(stored));
    }

    /// Shrinks the set to the smallest bucket count that keeps the current
    /// values under the maximum load factor.
    pub fn shrink_to_fit(&mut self) {
        let hash_builder = &self.hash_builder;
        self.table
            .shrink_to_fit(|stored| hash_builder.hash_one(stored));
    }

    /// Returns an iterator over the values of the set, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, T, H, GROWTH_NUM, GROWTH_DEN> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes all values and returns an iterator over them.
    ///
    /// The set is emptied when this is called, not when the iterator is
    /// consumed.
    pub fn drain(&mut self) -> Drain<T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash set using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set sized for at least `capacity` values using
    /// the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Default
    for HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Extend<T>
    for HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let required = self.len().saturating_add(lower);
        if required > self.capacity() {
            self.reserve(required);
        }
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> FromIterator<T>
    for HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> IntoIterator
    for &'a HopscotchSet<T, S, H, GROWTH_NUM, GROWTH_DEN>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, H, GROWTH_NUM, GROWTH_DEN>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a [`HopscotchSet`].
pub struct Iter<'a, T, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    inner: crate::table::Iter<'a, T, H, GROWTH_NUM, GROWTH_DEN>,
}

impl<'a, T, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Iterator
    for Iter<'a, T, H, GROWTH_NUM, GROWTH_DEN>
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A draining iterator over the values of a [`HopscotchSet`].
pub struct Drain<T> {
    inner: crate::table::Drain<T>,
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
