use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::table::Entry as TableEntry;
use crate::table::HopscotchTable;
use crate::table::{DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};

/// A hash map implemented using the hopscotch `HopscotchTable` as the
/// underlying storage.
///
/// `HopscotchMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a hasher builder `S` to hash keys. Every key sits
/// within `H` buckets of the bucket its hash maps to, or in a small
/// overflow storage when the hash function is degenerate, so lookups scan
/// at most one short run of buckets.
///
/// Unlike the standard library map, [`insert`] does not overwrite: when
/// the key is already present the existing value is kept and the call
/// reports that nothing was inserted. Use [`entry`] or [`get_mut`] to
/// update values in place.
///
/// The neighborhood size `H` (1 to 62, default 62) and the growth ratio
/// `GROWTH_NUM / GROWTH_DEN` (at least 1.1, default 2) are compile-time
/// parameters. Power-of-two growth ratios keep the bucket count a power of
/// two, which lets home buckets be computed with a mask instead of a
/// modulo.
///
/// [`insert`]: HopscotchMap::insert
/// [`entry`]: HopscotchMap::entry
/// [`get_mut`]: HopscotchMap::get_mut
#[derive(Clone)]
pub struct HopscotchMap<
    K,
    V,
    S,
    const H: usize = 62,
    const GROWTH_NUM: usize = 2,
    const GROWTH_DEN: usize = 1,
> {
    table: HopscotchTable<(K, V), H, GROWTH_NUM, GROWTH_DEN>,
    hash_builder: S,
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Debug
    for HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder and the
    /// default 16 buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
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
    /// let map: HopscotchMap<i32, String, _> = HopscotchMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.bucket_count(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_bucket_count_and_hasher(DEFAULT_BUCKET_COUNT, hash_builder)
    }

    /// Creates a new hash map sized to hold at least `capacity` elements
    /// without growing.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let buckets = min_buckets_for(capacity).max(DEFAULT_BUCKET_COUNT);
        Self::with_bucket_count_and_hasher(buckets, hash_builder)
    }

    /// Creates a new hash map with at least `bucket_count` logical
    /// buckets.
    ///
    /// The count is rounded up to a power of two when the growth ratio
    /// permits mask-based bucket mapping.
    pub fn with_bucket_count_and_hasher(bucket_count: usize, hash_builder: S) -> Self {
        Self {
            table: HopscotchTable::with_bucket_count(bucket_count),
            hash_builder,
        }
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before the next
    /// insertion triggers a grow.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of logical buckets.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the number of elements currently in the overflow storage.
    ///
    /// This stays zero unless more than `H` keys hash into the same
    /// neighborhood, which for a reasonable hash function does not happen.
    pub fn overflow_len(&self) -> usize {
        self.table.overflow_len()
    }

    /// Returns an upper bound on the number of elements the map can ever
    /// hold, limited by the maximum allocation size.
    pub fn max_size(&self) -> usize {
        self.table.max_size()
    }

    /// Returns the current load factor, `len() / bucket_count()`.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the maximum load factor, 0.9 unless changed.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Sets the maximum load factor.
    ///
    /// The new factor takes effect on the next insertion; the map does not
    /// resize immediately.
    ///
    /// # Panics
    ///
    /// Panics if `max_load_factor` is not positive.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) {
        self.table.set_max_load_factor(max_load_factor);
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the map, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
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
    /// let mut map: HopscotchMap<_, _, _> = HopscotchMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |kv| kv.0 == *key).map(|kv| &kv.1)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |kv| kv.0 == *key)
            .map(|kv| &mut kv.1)
    }

    /// Returns `true` if the map contains a value for the given key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns a mutable reference to the stored value, plus `true` when
    /// the pair was inserted. When the key is already present the existing
    /// value is kept, `false` is reported, and the given key and value are
    /// dropped.
    ///
    /// Inserting may grow the map or displace other entries within their
    /// neighborhoods.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
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
    /// let mut map: HopscotchMap<_, _, _> = HopscotchMap::with_hasher(SimpleHasher);
    ///
    /// let (value, inserted) = map.insert(7, "x");
    /// assert_eq!(*value, "x");
    /// assert!(inserted);
    ///
    /// let (value, inserted) = map.insert(7, "y");
    /// assert_eq!(*value, "x");
    /// assert!(!inserted);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        let hash = self.hash_builder.hash_one(&key);
        let hash_builder = &self.hash_builder;
        match self.table.entry(
            hash,
            |kv| kv.0 == key,
            |kv| hash_builder.hash_one(&kv.0),
        ) {
            TableEntry::Occupied(entry) => (&mut entry.into_mut().1, false),
            TableEntry::Vacant(entry) => (&mut entry.insert((key, value)).1, true),
        }
    }

    /// Gets the entry for the given key for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
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
    /// let mut map: HopscotchMap<_, _, _> = HopscotchMap::with_hasher(SimpleHasher);
    ///
    /// map.entry(1).or_insert_with(|| "expensive".to_string());
    /// map.entry(1).and_modify(|v| v.push('!'));
    /// assert_eq!(map.get(&1), Some(&"expensive!".to_string()));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, H, GROWTH_NUM, GROWTH_DEN> {
        let hash = self.hash_builder.hash_one(&key);
        let hash_builder = &self.hash_builder;
        match self.table.entry(
            hash,
            |kv| kv.0 == key,
            |kv| hash_builder.hash_one(&kv.0),
        ) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Removes a key from the map, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        let hash_builder = &self.hash_builder;
        self.table.remove(
            hash,
            |kv| kv.0 == *key,
            |kv| hash_builder.hash_one(&kv.0),
        )
    }

    /// Retains only the pairs for which the predicate returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
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
    /// let mut map: HopscotchMap<_, _, _> = HopscotchMap::with_hasher(SimpleHasher);
    /// for key in 0..8 {
    ///     map.insert(key, key * 10);
    /// }
    ///
    /// map.retain(|key, _| key % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        let hash_builder = &self.hash_builder;
        self.table.retain(
            |kv| keep(&kv.0, &mut kv.1),
            |kv| hash_builder.hash_one(&kv.0),
        );
    }

    /// Sizes the map for at least `bucket_count` logical buckets,
    /// re-placing every element.
    ///
    /// The count is raised as needed to keep the current elements at or
    /// under the maximum load factor and rounded to a power of two when
    /// the growth ratio permits mask-based bucket mapping.
    pub fn rehash(&mut self, bucket_count: usize) {
        let hash_builder = &self.hash_builder;
        self.table
            .rehash(bucket_count, |kv| hash_builder.hash_one(&kv.0));
    }

    /// Sizes the map so that at least `capacity` total elements fit
    /// without growing.
    pub fn reserve(&mut self, capacity: usize) {
        let hash_builder = &self.hash_builder;
        self.table
            .reserve(capacity, |kv| hash_builder.hash_one(&kv.0));
    }

    /// Shrinks the map to the smallest bucket count that keeps the current
    /// elements under the maximum load factor.
    pub fn shrink_to_fit(&mut self) {
        let hash_builder = &self.hash_builder;
        self.table
            .shrink_to_fit(|kv| hash_builder.hash_one(&kv.0));
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// Each stored pair is yielded exactly once, in an arbitrary order
    /// that changes across mutating operations.
    pub fn iter(&self) -> Iter<'_, K, V, H, GROWTH_NUM, GROWTH_DEN> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V, H, GROWTH_NUM, GROWTH_DEN> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V, H, GROWTH_NUM, GROWTH_DEN> {
        Values { inner: self.iter() }
    }

    /// Removes all pairs and returns an iterator over them.
    ///
    /// The map is emptied when this is called, not when the iterator is
    /// consumed.
    pub fn drain(&mut self) -> Drain<K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let hash_builder = &self.hash_builder;
        self.table
            .assert_invariants(|kv| hash_builder.hash_one(&kv.0));
    }
}

fn min_buckets_for(capacity: usize) -> usize {
    let target = capacity as f32 / DEFAULT_MAX_LOAD_FACTOR;
    let floor = target as usize;
    if (floor as f32) < target { floor + 1 } else { floor }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use hopscotch_map::HopscotchMap;
    /// #
    /// # #[derive(Default)]
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HopscotchMap<i32, String, SimpleHasher> = HopscotchMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash map sized for at least `capacity` elements using
    /// the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Default
    for HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Index<&K>
    for HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value for the given key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Extend<(K, V)>
    for HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair from the iterator. Pairs whose key is already
    /// present are dropped, matching [`insert`].
    ///
    /// [`insert`]: HopscotchMap::insert
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let required = self.len().saturating_add(lower);
        if required > self.capacity() {
            self.reserve(required);
        }
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    FromIterator<(K, V)> for HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> IntoIterator
    for &'a HopscotchMap<K, V, S, H, GROWTH_NUM, GROWTH_DEN>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HopscotchMap`].
///
/// [`entry`]: HopscotchMap::entry
pub enum Entry<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>),
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    Entry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference to the value.
    ///
    /// The closure only runs when the key is absent, so this is the way to
    /// construct expensive values in place.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    Entry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    entry: crate::table::VacantEntry<'a, (K, V), H, GROWTH_NUM, GROWTH_DEN>,
    key: K,
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    VacantEntry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    /// Gets a reference to the key that would be used when inserting a
    /// value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
{
    entry: crate::table::OccupiedEntry<'a, (K, V), H, GROWTH_NUM, GROWTH_DEN>,
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    OccupiedEntry<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the entry's value and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a [`HopscotchMap`].
pub struct Iter<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    inner: crate::table::Iter<'a, (K, V), H, GROWTH_NUM, GROWTH_DEN>,
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Iterator
    for Iter<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

/// An iterator over the keys of a [`HopscotchMap`].
pub struct Keys<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    inner: Iter<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>,
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Iterator
    for Keys<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a [`HopscotchMap`].
pub struct Values<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    inner: Iter<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>,
}

impl<'a, K, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Iterator
    for Values<'a, K, V, H, GROWTH_NUM, GROWTH_DEN>
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a [`HopscotchMap`].
pub struct Drain<K, V> {
    inner: crate::table::Drain<(K, V)>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
