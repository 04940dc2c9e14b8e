//! A hash table using hopscotch hashing with per-bucket neighborhood
//! bitmaps.
//!
//! Hopscotch hashing keeps every stored value within a fixed distance `H`
//! (the neighborhood size) of the bucket its hash maps it to. A lookup
//! therefore inspects at most one short, contiguous run of buckets. When an
//! insertion finds no empty slot inside the neighborhood, an empty slot
//! located further ahead by linear probing is hopped backwards. An occupant
//! of an intermediate bucket that can legally move forward without leaving
//! its own neighborhood is displaced into the empty slot, which moves the
//! empty slot closer to where it is needed. If no occupant can move, the
//! value either goes to a small overflow vector or the table grows,
//! depending on whether growing could actually change the neighborhood.
//!
//! [`HopscotchTable<V>`] stores values of type `V` and is a fairly
//! low-level structure: every operation takes the value's hash and an
//! equality predicate, and mutating operations additionally take a rehash
//! function used to recompute hashes during displacement bookkeeping and
//! resizing. Prefer the [`HopscotchMap<K, V, S>`] or [`HopscotchSet<T, S>`]
//! wrappers unless you are building your own map or set structure.
//!
//! ## Design
//!
//! The table is a contiguous sequence of buckets. Each bucket holds at most
//! one value in uninitialized storage, plus a 64-bit bitmap. Bit 0 records
//! whether the storage is live. Bit 1 records whether some value whose home
//! is this bucket currently lives in the overflow vector. Bit `i + 2`
//! records that the bucket at offset `i` holds a value homed here, for
//! `0 <= i < H`. Scanning a neighborhood is a walk over the set bits of a
//! single word.
//!
//! The physical array is `bucket_count() + H - 1` buckets long. The extra
//! trailing buckets let the last logical bucket own a full neighborhood
//! without wrapping, which keeps the displacement loop free of modular
//! arithmetic.
//!
//! The growth ratio is a compile-time rational `GROWTH_NUM / GROWTH_DEN`.
//! When both sides are powers of two and the ratio is an integer, the
//! logical bucket count is kept a power of two and home buckets are
//! computed with a mask instead of a modulo. Any other ratio uses the plain
//! modulo path. Both paths agree for the same input.
//!
//! The overflow vector exists to stop resize loops under degenerate hash
//! functions. More than `H` values hashing to the same home bucket can
//! never all sit in the neighborhood, and growing the table does not
//! separate them, so without the overflow path such inputs would grow the
//! table until allocation fails. Before falling back, the insert checks
//! whether the next expansion would move any occupant of the relevant
//! neighborhood. Only when the answer is no does the value overflow;
//! otherwise the table grows and the insert retries.
//!
//! ## Invariants
//!
//! 1. An occupied bucket at index `i` holding a value with home bucket `h`
//!    satisfies `0 <= i - h < H`, and bit `i - h` of `h`'s neighborhood is
//!    set. Values that cannot satisfy this live in the overflow vector and
//!    `h` has its overflow bit set.
//! 2. A bucket's neighborhood bits enumerate exactly the occupied buckets
//!    in `[h, h + H)` whose values are homed at `h`.
//! 3. A bucket's overflow bit is set iff at least one overflow element is
//!    homed at it.
//! 4. `len()` equals the number of occupied buckets plus the overflow
//!    length.
//! 5. Storage is read only when the occupancy bit is set.
//!
//! [`HopscotchMap<K, V, S>`]: crate::map::HopscotchMap
//! [`HopscotchSet<T, S>`]: crate::set::HopscotchSet

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem::MaybeUninit;

/// Widest supported neighborhood. Two bits of the bitmap word are reserved
/// for the occupancy and overflow flags.
const MAX_NEIGHBORHOOD: usize = 62;

const OCCUPIED_BIT: u64 = 1;
const OVERFLOW_BIT: u64 = 1 << 1;
const RESERVED_BITS: u32 = 2;

/// Upper bound on the linear probe for an empty slot during insertion.
/// Probing further than this is a strong signal that the table is badly
/// clustered and should grow instead.
const MAX_PROBE: usize = 4096;

pub(crate) const DEFAULT_BUCKET_COUNT: usize = 16;
pub(crate) const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.9;

/// Smallest logical bucket count that keeps `len` elements at or under
/// `max_load_factor`.
fn min_buckets_for(len: usize, max_load_factor: f32) -> usize {
    let target = len as f32 / max_load_factor;
    let floor = target as usize;
    if (floor as f32) < target { floor + 1 } else { floor }
}

fn threshold_for(bucket_count: usize, max_load_factor: f32) -> usize {
    (bucket_count as f32 * max_load_factor) as usize
}

/// One slot of the table: maybe-initialized storage for a value plus the
/// bitmap described in the module docs.
///
/// The occupancy bit is the single source of truth for whether `storage`
/// is initialized. The neighborhood and overflow bits are bookkeeping for
/// values homed at this bucket and say nothing about this bucket's own
/// storage.
struct Bucket<V> {
    bits: u64,
    storage: MaybeUninit<V>,
}

impl<V> Bucket<V> {
    fn empty() -> Self {
        Bucket {
            bits: 0,
            storage: MaybeUninit::uninit(),
        }
    }

    #[inline(always)]
    fn is_occupied(&self) -> bool {
        self.bits & OCCUPIED_BIT != 0
    }

    #[inline(always)]
    fn has_overflow(&self) -> bool {
        self.bits & OVERFLOW_BIT != 0
    }

    #[inline(always)]
    fn set_overflow(&mut self, has_overflow: bool) {
        if has_overflow {
            self.bits |= OVERFLOW_BIT;
        } else {
            self.bits &= !OVERFLOW_BIT;
        }
    }

    /// The neighborhood presence bits, shifted down so bit `i` corresponds
    /// to the bucket at offset `i` from this one.
    #[inline(always)]
    fn neighborhood(&self) -> u64 {
        self.bits >> RESERVED_BITS
    }

    #[inline(always)]
    fn neighbor_present(&self, offset: usize) -> bool {
        debug_assert!(offset < MAX_NEIGHBORHOOD);
        self.bits >> (offset as u32 + RESERVED_BITS) & 1 != 0
    }

    #[inline(always)]
    fn toggle_neighbor(&mut self, offset: usize) {
        debug_assert!(offset < MAX_NEIGHBORHOOD);
        self.bits ^= 1 << (offset as u32 + RESERVED_BITS);
    }

    /// Writes `value` into the storage and marks the bucket occupied.
    ///
    /// Installing over a live value would leak it, so the bucket must be
    /// empty.
    #[inline(always)]
    fn install(&mut self, value: V) {
        debug_assert!(!self.is_occupied());
        self.storage.write(value);
        self.bits |= OCCUPIED_BIT;
    }

    /// Reads the value out and marks the bucket empty. The neighborhood and
    /// overflow bits are left untouched.
    ///
    /// # Safety
    ///
    /// The bucket must be occupied.
    #[inline(always)]
    unsafe fn take(&mut self) -> V {
        debug_assert!(self.is_occupied());
        self.bits &= !OCCUPIED_BIT;
        // SAFETY: The caller guarantees the occupancy bit was set, which is
        // the invariant under which `storage` is initialized.
        unsafe { self.storage.assume_init_read() }
    }

    /// Drops the value in place and marks the bucket empty.
    ///
    /// # Safety
    ///
    /// The bucket must be occupied.
    #[inline(always)]
    unsafe fn remove(&mut self) {
        debug_assert!(self.is_occupied());
        self.bits &= !OCCUPIED_BIT;
        // SAFETY: The caller guarantees the occupancy bit was set.
        unsafe { self.storage.assume_init_drop() }
    }

    /// Moves this bucket's value into `other` and marks this bucket empty.
    /// `other`'s neighborhood and overflow bits are preserved; only its
    /// occupancy changes.
    ///
    /// # Safety
    ///
    /// `self` must be occupied and `other` must not be.
    #[inline(always)]
    unsafe fn swap_into_empty(&mut self, other: &mut Bucket<V>) {
        debug_assert!(self.is_occupied());
        debug_assert!(!other.is_occupied());
        self.bits &= !OCCUPIED_BIT;
        other.bits |= OCCUPIED_BIT;
        // SAFETY: The caller guarantees `self` held an initialized value
        // and `other` did not, so this is a plain relocation.
        unsafe {
            other.storage.write(self.storage.assume_init_read());
        }
    }

    /// Shared access to the stored value.
    ///
    /// # Safety
    ///
    /// The bucket must be occupied.
    #[inline(always)]
    unsafe fn value(&self) -> &V {
        debug_assert!(self.is_occupied());
        // SAFETY: The caller guarantees the occupancy bit was set.
        unsafe { self.storage.assume_init_ref() }
    }

    /// Mutable access to the stored value.
    ///
    /// # Safety
    ///
    /// The bucket must be occupied.
    #[inline(always)]
    unsafe fn value_mut(&mut self) -> &mut V {
        debug_assert!(self.is_occupied());
        // SAFETY: The caller guarantees the occupancy bit was set.
        unsafe { self.storage.assume_init_mut() }
    }

    /// Drops the value if one is present and zeroes every bit, including
    /// the neighborhood and overflow bookkeeping.
    fn clear(&mut self) {
        if self.is_occupied() {
            // SAFETY: The occupancy bit says the storage is initialized.
            unsafe { self.storage.assume_init_drop() }
        }
        self.bits = 0;
    }
}

impl<V> Drop for Bucket<V> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<V>() && self.is_occupied() {
            // SAFETY: The occupancy bit says the storage is initialized.
            unsafe { self.storage.assume_init_drop() }
        }
    }
}

impl<V> Clone for Bucket<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut storage = MaybeUninit::uninit();
        if self.is_occupied() {
            // SAFETY: The occupancy bit says the storage is initialized.
            storage.write(unsafe { self.storage.assume_init_ref() }.clone());
        }
        Bucket {
            bits: self.bits,
            storage,
        }
    }
}

fn empty_buckets<V>(physical: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(physical);
    buckets.resize_with(physical, Bucket::empty);
    buckets
}

/// Where a located value lives.
enum Slot {
    Bucket(usize),
    Overflow(usize),
}

/// A hash table using hopscotch hashing.
///
/// `HopscotchTable<V>` stores values of type `V` and provides insertion,
/// lookup, and removal with bounded neighborhood scans. Unlike standard
/// maps, this implementation requires you to provide the hash value, an
/// equality predicate, and (for mutating operations) a rehash function for
/// each call.
///
/// The neighborhood size `H` must be between 1 and 62. The growth ratio
/// `GROWTH_NUM / GROWTH_DEN` must be at least 1.1. Both are checked at
/// compile time when the table is constructed.
pub struct HopscotchTable<
    V,
    const H: usize = 62,
    const GROWTH_NUM: usize = 2,
    const GROWTH_DEN: usize = 1,
> {
    buckets: Vec<Bucket<V>>,
    overflow: Vec<V>,

    len: usize,
    max_load_factor: f32,
    load_threshold: usize,
}

impl<V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>
{
    const PARAMS_OK: () = {
        assert!(H >= 1, "neighborhood size must be at least 1");
        assert!(H <= MAX_NEIGHBORHOOD, "neighborhood size must be at most 62");
        assert!(GROWTH_DEN != 0, "growth ratio denominator must be non-zero");
        assert!(
            10 * GROWTH_NUM >= 11 * GROWTH_DEN,
            "growth ratio must be at least 1.1"
        );
    };

    /// Whether home buckets can be computed with a mask. Requires the
    /// logical bucket count to stay a power of two, which holds exactly
    /// when the growth ratio is an integral power of two.
    const POW2_MOD: bool = GROWTH_NUM.is_power_of_two()
        && GROWTH_DEN.is_power_of_two()
        && GROWTH_NUM % GROWTH_DEN == 0;

    /// Creates a table with at least `bucket_count` logical buckets and the
    /// default max load factor of 0.9.
    ///
    /// When the growth ratio permits mask-based home computation the count
    /// is rounded up to the next power of two.
    pub fn with_bucket_count(bucket_count: usize) -> Self {
        Self::with_bucket_count_and_load_factor(bucket_count, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Creates a table with at least `bucket_count` logical buckets and the
    /// given max load factor.
    ///
    /// # Panics
    ///
    /// Panics if `max_load_factor` is not positive.
    pub fn with_bucket_count_and_load_factor(bucket_count: usize, max_load_factor: f32) -> Self {
        let () = Self::PARAMS_OK;
        assert!(max_load_factor > 0.0, "max load factor must be positive");

        let logical = if Self::POW2_MOD {
            bucket_count.max(1).next_power_of_two()
        } else {
            bucket_count.max(1)
        };

        Self {
            buckets: empty_buckets(logical + H - 1),
            overflow: Vec::new(),
            len: 0,
            max_load_factor,
            load_threshold: threshold_for(logical, max_load_factor),
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of logical buckets.
    ///
    /// The physical array is `H - 1` buckets longer so that the last
    /// logical bucket can own a full neighborhood.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() + 1 - H
    }

    /// Returns the number of values the table can hold before the next
    /// insertion triggers a grow.
    pub fn capacity(&self) -> usize {
        self.load_threshold
    }

    /// Returns the number of values currently in the overflow storage.
    ///
    /// Non-zero values indicate that more than `H` keys hashed into the
    /// same neighborhood, which usually points at a degenerate hash
    /// function.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Returns an upper bound on the number of values the table can ever
    /// hold, limited by the maximum allocation size.
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / core::mem::size_of::<Bucket<V>>().max(1)
    }

    /// Returns the current load factor, `len() / bucket_count()`.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.bucket_count() as f32
    }

    /// Returns the maximum load factor.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the maximum load factor and recomputes the grow threshold.
    ///
    /// # Panics
    ///
    /// Panics if `max_load_factor` is not positive.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) {
        assert!(max_load_factor > 0.0, "max load factor must be positive");
        self.max_load_factor = max_load_factor;
        self.load_threshold = threshold_for(self.bucket_count(), max_load_factor);
    }

    #[inline(always)]
    fn home_for(hash: u64, bucket_count: usize) -> usize {
        if Self::POW2_MOD {
            debug_assert!(bucket_count.is_power_of_two());
            hash as usize & (bucket_count - 1)
        } else {
            hash as usize % bucket_count
        }
    }

    #[inline(always)]
    fn home_bucket(&self, hash: u64) -> usize {
        Self::home_for(hash, self.bucket_count())
    }

    fn expanded_count(bucket_count: usize) -> usize {
        bucket_count
            .checked_mul(GROWTH_NUM)
            .expect("bucket count overflow")
            .div_ceil(GROWTH_DEN)
    }

    /// Finds a value by hash and equality predicate.
    ///
    /// Returns a reference to the value if found. Never mutates the table.
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.len == 0 {
            return None;
        }

        let home = self.home_bucket(hash);
        if let Some(index) = self.find_in_neighborhood(home, &eq) {
            // SAFETY: `find_in_neighborhood` only reports occupied buckets.
            return Some(unsafe { self.buckets[index].value() });
        }

        if !self.buckets[home].has_overflow() {
            return None;
        }

        self.find_overflow(eq)
    }

    /// Finds a value by hash and equality predicate, returning a mutable
    /// reference.
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.len == 0 {
            return None;
        }

        let home = self.home_bucket(hash);
        if let Some(index) = self.find_in_neighborhood(home, &eq) {
            // SAFETY: `find_in_neighborhood` only reports occupied buckets.
            return Some(unsafe { self.buckets[index].value_mut() });
        }

        if !self.buckets[home].has_overflow() {
            return None;
        }

        self.find_overflow_mut(eq)
    }

    #[cold]
    #[inline(never)]
    fn find_overflow(&self, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.overflow.iter().find(|value| eq(value))
    }

    #[cold]
    #[inline(never)]
    fn find_overflow_mut(&mut self, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.overflow.iter_mut().find(|value| eq(value))
    }

    #[cold]
    #[inline(never)]
    fn find_overflow_index(&self, eq: &impl Fn(&V) -> bool) -> Option<usize> {
        self.overflow.iter().position(eq)
    }

    /// Scans the neighborhood bitmap of `home` for a matching value and
    /// returns its bucket index.
    #[inline]
    fn find_in_neighborhood(&self, home: usize, eq: &impl Fn(&V) -> bool) -> Option<usize> {
        let mut bits = self.buckets[home].neighborhood();
        while bits != 0 {
            let offset = bits.trailing_zeros() as usize;
            bits &= bits - 1;

            let index = home + offset;
            // SAFETY: A set neighborhood bit means the bucket at that
            // offset is occupied by a value homed at `home`.
            if eq(unsafe { self.buckets[index].value() }) {
                return Some(index);
            }
        }
        None
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the value is absent, locating the vacant entry performs the whole
    /// placement search up front: the table may grow and existing values
    /// may be displaced within their neighborhoods before this returns.
    ///
    /// `rehash` must return the same hash for a stored value that was used
    /// when it was inserted.
    #[inline]
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        rehash: impl Fn(&V) -> u64,
    ) -> Entry<'_, V, H, GROWTH_NUM, GROWTH_DEN> {
        let home = self.home_bucket(hash);
        if let Some(index) = self.find_in_neighborhood(home, &eq) {
            return Entry::Occupied(OccupiedEntry {
                table: self,
                home,
                slot: Slot::Bucket(index),
                home_has_other_overflow: false,
            });
        }

        if self.buckets[home].has_overflow() {
            if let Some(index) = self.find_overflow_index(&eq) {
                let bucket_count = self.bucket_count();
                // Resolved now so that a later `remove` does not need the
                // rehash function to decide whether the flag can be
                // cleared.
                let home_has_other_overflow = self
                    .overflow
                    .iter()
                    .enumerate()
                    .any(|(i, value)| i != index && Self::home_for(rehash(value), bucket_count) == home);
                return Entry::Occupied(OccupiedEntry {
                    table: self,
                    home,
                    slot: Slot::Overflow(index),
                    home_has_other_overflow,
                });
            }
        }

        if self.len + 1 > self.load_threshold {
            self.grow(&rehash);
        }

        let mut home = self.home_bucket(hash);
        loop {
            if let Some(index) = self.locate_free_slot(home) {
                return Entry::Vacant(VacantEntry {
                    table: self,
                    home,
                    slot: Some(index),
                });
            }

            if !self.rehash_would_shift_neighborhood(home, &rehash) {
                // Growing cannot reshuffle this neighborhood, so the value
                // is committed to the overflow storage instead.
                return Entry::Vacant(VacantEntry {
                    table: self,
                    home,
                    slot: None,
                });
            }

            self.grow(&rehash);
            home = self.home_bucket(hash);
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// The value is identified by its hash and an equality predicate.
    /// Removal never shrinks the table.
    pub fn remove(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        rehash: impl Fn(&V) -> u64,
    ) -> Option<V> {
        if self.len == 0 {
            return None;
        }

        let home = self.home_bucket(hash);
        if let Some(index) = self.find_in_neighborhood(home, &eq) {
            // SAFETY: `find_in_neighborhood` only reports occupied buckets.
            let value = unsafe { self.buckets[index].take() };
            self.buckets[home].toggle_neighbor(index - home);
            self.len -= 1;
            return Some(value);
        }

        if !self.buckets[home].has_overflow() {
            return None;
        }

        let index = self.find_overflow_index(&eq)?;
        let value = self.overflow.swap_remove(index);
        self.len -= 1;
        self.clear_overflow_flag_if_last(home, &rehash);
        Some(value)
    }

    /// Clears `home`'s overflow flag when no remaining overflow element is
    /// homed there. Scans the whole overflow storage, which is fine because
    /// the storage is empty for every non-degenerate hash function.
    fn clear_overflow_flag_if_last(&mut self, home: usize, rehash: &impl Fn(&V) -> u64) {
        let bucket_count = self.bucket_count();
        if !self
            .overflow
            .iter()
            .any(|value| Self::home_for(rehash(value), bucket_count) == home)
        {
            self.buckets[home].set_overflow(false);
        }
    }

    /// Retains only the values for which the predicate returns `true`.
    ///
    /// The predicate may mutate the values it keeps, but must not change
    /// the parts of a value that determine its hash.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut V) -> bool, rehash: impl Fn(&V) -> u64) {
        let bucket_count = self.bucket_count();

        for index in 0..self.buckets.len() {
            if !self.buckets[index].is_occupied() {
                continue;
            }
            // SAFETY: Occupancy checked above.
            if keep(unsafe { self.buckets[index].value_mut() }) {
                continue;
            }

            // SAFETY: Occupancy checked above.
            let home = Self::home_for(rehash(unsafe { self.buckets[index].value() }), bucket_count);
            // SAFETY: Occupancy checked above.
            unsafe { self.buckets[index].remove() };
            self.buckets[home].toggle_neighbor(index - home);
            self.len -= 1;
        }

        if self.overflow.is_empty() {
            return;
        }

        let mut index = 0;
        while index < self.overflow.len() {
            if keep(&mut self.overflow[index]) {
                index += 1;
            } else {
                self.overflow.swap_remove(index);
                self.len -= 1;
            }
        }

        // Rebuild the overflow flags wholesale rather than rescanning the
        // storage once per removed element.
        for bucket in self.buckets.iter_mut() {
            bucket.set_overflow(false);
        }
        let (buckets, overflow) = (&mut self.buckets, &self.overflow);
        for value in overflow {
            buckets[Self::home_for(rehash(value), bucket_count)].set_overflow(true);
        }
    }

    /// Removes all values from the table, keeping the allocated buckets.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.overflow.clear();
        self.len = 0;
    }

    /// Sizes the table for at least `bucket_count` logical buckets,
    /// re-placing every value.
    ///
    /// The count is raised to whatever is needed to keep the current
    /// elements at or under the maximum load factor, and rounded to a power
    /// of two when the growth ratio permits mask-based home computation.
    pub fn rehash(&mut self, bucket_count: usize, rehash: impl Fn(&V) -> u64) {
        let target = bucket_count.max(min_buckets_for(self.len, self.max_load_factor));
        self.rehash_to(target, &rehash);
    }

    /// Sizes the table so that at least `capacity` total values fit
    /// without growing.
    pub fn reserve(&mut self, capacity: usize, rehash: impl Fn(&V) -> u64) {
        self.rehash(min_buckets_for(capacity, self.max_load_factor), rehash);
    }

    /// Shrinks the table to the smallest bucket count that keeps the
    /// current values under the maximum load factor.
    pub fn shrink_to_fit(&mut self, rehash: impl Fn(&V) -> u64) {
        self.rehash(0, rehash);
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, rehash: &impl Fn(&V) -> u64) {
        self.rehash_to(Self::expanded_count(self.bucket_count()), rehash);
    }

    /// Swaps in a fresh table and re-places every value into it.
    ///
    /// Values are moved out of their old buckets one by one. The overflow
    /// storage is moved across wholesale afterwards; its elements keep
    /// their relative order and only the overflow flags are recomputed for
    /// the new bucket count. The swap happens before any value moves, so a
    /// panicking rehash function leaves `self` a consistent table holding
    /// whatever was already re-placed, with the remainder dropped along
    /// with the old storage.
    fn rehash_to(&mut self, bucket_count: usize, rehash: &impl Fn(&V) -> u64) {
        let mut old = Self::with_bucket_count_and_load_factor(bucket_count, self.max_load_factor);
        core::mem::swap(self, &mut old);

        for bucket in old.buckets.iter_mut() {
            if !bucket.is_occupied() {
                continue;
            }
            // SAFETY: Occupancy checked above. `take` clears the bit, so
            // the old storage will not double-drop the moved value.
            let value = unsafe { bucket.take() };
            self.place(value, rehash);
        }

        let old_overflow = core::mem::take(&mut old.overflow);
        let new_count = self.bucket_count();
        for value in &old_overflow {
            self.buckets[Self::home_for(rehash(value), new_count)].set_overflow(true);
        }
        self.len += old_overflow.len();
        self.overflow.extend(old_overflow);
    }

    /// Places a value that is known not to be in the table. Used by the
    /// rehash loop, which has no duplicates and normally has headroom, so
    /// the load threshold is not consulted.
    fn place(&mut self, value: V, rehash: &impl Fn(&V) -> u64) {
        let hash = rehash(&value);
        loop {
            let home = self.home_bucket(hash);
            if let Some(index) = self.locate_free_slot(home) {
                debug_assert!(!self.buckets[home].neighbor_present(index - home));
                self.buckets[index].install(value);
                self.buckets[home].toggle_neighbor(index - home);
                self.len += 1;
                return;
            }

            if !self.rehash_would_shift_neighborhood(home, rehash) {
                self.buckets[home].set_overflow(true);
                self.overflow.push(value);
                self.len += 1;
                return;
            }

            self.grow(rehash);
        }
    }

    /// Finds an empty bucket inside `home`'s neighborhood, displacing
    /// occupants if necessary. Returns `None` when neither probing nor
    /// displacement can produce one.
    fn locate_free_slot(&mut self, home: usize) -> Option<usize> {
        let mut empty = self.find_empty_bucket(home)?;
        loop {
            if empty - home < H {
                return Some(empty);
            }
            if !self.move_empty_closer(&mut empty) {
                return None;
            }
        }
    }

    /// Linear probe for the first empty bucket at or after `start`, bounded
    /// by `MAX_PROBE` and the physical array length.
    fn find_empty_bucket(&self, start: usize) -> Option<usize> {
        let limit = (start + MAX_PROBE).min(self.buckets.len());
        (start..limit).find(|&index| !self.buckets[index].is_occupied())
    }

    /// One hopscotch move: relocates some occupant from below `empty` into
    /// the empty bucket, so the empty bucket index strictly decreases.
    ///
    /// Candidate anchor buckets are scanned in ascending order starting at
    /// `empty - H + 1`, and within an anchor the lowest-offset occupant is
    /// taken first. An anchor's occupant at `anchor + offset` may move to
    /// `empty` exactly when `empty - anchor < H`, which holds for every
    /// anchor in the range. Ascending order keeps the progress monotonic
    /// and rules out cycling.
    fn move_empty_closer(&mut self, empty: &mut usize) -> bool {
        debug_assert!(*empty >= H);
        let start = *empty + 1 - H;

        for anchor in start..*empty {
            let bits = self.buckets[anchor].neighborhood();
            if bits == 0 {
                continue;
            }

            let offset = bits.trailing_zeros() as usize;
            let from = anchor + offset;
            if from >= *empty {
                // The anchor's lowest occupant already sits at or past the
                // empty bucket; higher offsets only sit further out.
                continue;
            }

            let (left, right) = self.buckets.split_at_mut(*empty);
            // SAFETY: The neighborhood bit marks `from` occupied, and
            // `empty` was located (and kept) unoccupied.
            unsafe { left[from].swap_into_empty(&mut right[0]) };

            debug_assert!(!self.buckets[anchor].neighbor_present(*empty - anchor));
            self.buckets[anchor].toggle_neighbor(offset);
            self.buckets[anchor].toggle_neighbor(*empty - anchor);

            *empty = from;
            return true;
        }

        false
    }

    /// Whether growing to the next bucket count would move any occupant of
    /// `home`'s neighborhood to a different home. When it would not, a grow
    /// cannot open up the neighborhood and the pending value belongs in the
    /// overflow storage.
    fn rehash_would_shift_neighborhood(&self, home: usize, rehash: &impl Fn(&V) -> u64) -> bool {
        let bucket_count = self.bucket_count();
        let expanded = Self::expanded_count(bucket_count);

        for index in home..home + H {
            let bucket = &self.buckets[index];
            if !bucket.is_occupied() {
                continue;
            }
            // SAFETY: Occupancy checked above.
            let hash = rehash(unsafe { bucket.value() });
            if Self::home_for(hash, bucket_count) != Self::home_for(hash, expanded) {
                return true;
            }
        }

        false
    }

    /// Returns an iterator over all values in the table.
    ///
    /// The iterator yields `&V` references in an arbitrary order. The order
    /// is not specified and changes across mutating operations.
    pub fn iter(&self) -> Iter<'_, V, H, GROWTH_NUM, GROWTH_DEN> {
        Iter {
            table: self,
            bucket_index: 0,
            overflow_index: 0,
        }
    }

    /// Removes all values and returns an iterator over them.
    ///
    /// The table is emptied when this is called, not when the iterator is
    /// consumed. Values not yielded before the iterator is dropped are
    /// dropped with it. The bucket allocation is retained.
    pub fn drain(&mut self) -> Drain<V> {
        let physical = self.buckets.len();
        let buckets = core::mem::replace(&mut self.buckets, empty_buckets(physical));
        let overflow = core::mem::take(&mut self.overflow);
        self.len = 0;

        Drain {
            buckets: buckets.into_iter(),
            overflow: overflow.into_iter(),
        }
    }

    /// Verifies the structural invariants listed in the module docs.
    /// Test-only; the cost is a full scan of the table per call.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, rehash: impl Fn(&V) -> u64) {
        let bucket_count = self.bucket_count();

        let mut in_buckets = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_occupied() {
                in_buckets += 1;
                // SAFETY: Occupancy checked above.
                let home = Self::home_for(rehash(unsafe { bucket.value() }), bucket_count);
                assert!(index >= home && index - home < H, "value outside its neighborhood");
                assert!(
                    self.buckets[home].neighbor_present(index - home),
                    "neighbor bit missing for occupied bucket"
                );
            }
        }

        for (home, bucket) in self.buckets.iter().enumerate() {
            let mut bits = bucket.neighborhood();
            while bits != 0 {
                let offset = bits.trailing_zeros() as usize;
                bits &= bits - 1;

                assert!(offset < H, "neighbor bit beyond the neighborhood");
                let index = home + offset;
                assert!(self.buckets[index].is_occupied(), "neighbor bit on empty bucket");
                // SAFETY: Occupancy asserted above.
                let hash = rehash(unsafe { self.buckets[index].value() });
                assert_eq!(
                    Self::home_for(hash, bucket_count),
                    home,
                    "neighbor bit for a value homed elsewhere"
                );
            }

            let homed_overflow = self
                .overflow
                .iter()
                .any(|value| Self::home_for(rehash(value), bucket_count) == home);
            assert_eq!(
                bucket.has_overflow(),
                homed_overflow,
                "overflow flag out of sync with overflow storage"
            );
        }

        assert_eq!(self.len, in_buckets + self.overflow.len(), "length out of sync");
    }

    /// Returns occupancy and overflow statistics for debugging.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let occupied_slots = self.buckets.iter().filter(|b| b.is_occupied()).count();

        DebugStats {
            populated: self.len,
            bucket_count: self.bucket_count(),
            physical_slots: self.buckets.len(),
            occupied_slots,
            overflow_entries: self.overflow.len(),
            load_factor: if self.bucket_count() == 0 {
                0.0
            } else {
                self.len as f64 / self.bucket_count() as f64
            },
        }
    }

    /// Returns a histogram of distances from each stored value to its home
    /// bucket. Index `i` counts values seated `i` buckets past their home.
    #[cfg(feature = "stats")]
    pub fn distance_histogram(&self, rehash: impl Fn(&V) -> u64) -> Vec<usize> {
        let bucket_count = self.bucket_count();
        let mut histogram = alloc::vec![0usize; H];

        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_occupied() {
                // SAFETY: Occupancy checked above.
                let home = Self::home_for(rehash(unsafe { bucket.value() }), bucket_count);
                histogram[index - home] += 1;
            }
        }

        histogram
    }
}

impl<V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Default
    for HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>
{
    fn default() -> Self {
        Self::with_bucket_count(DEFAULT_BUCKET_COUNT)
    }
}

impl<V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Clone
    for HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            overflow: self.overflow.clone(),
            len: self.len,
            max_load_factor: self.max_load_factor,
            load_threshold: self.load_threshold,
        }
    }
}

impl<V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Debug
    for HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HopscotchTable")
            .field("len", &self.len)
            .field("bucket_count", &self.bucket_count())
            .field("overflow_len", &self.overflow.len())
            .field("load_threshold", &self.load_threshold)
            .finish()
    }
}

/// Occupancy and overflow statistics for a table.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table.
    pub populated: usize,
    /// Logical bucket count.
    pub bucket_count: usize,
    /// Physical slot count, including the trailing neighborhood pad.
    pub physical_slots: usize,
    /// Number of physical slots currently occupied.
    pub occupied_slots: usize,
    /// Number of values in the overflow storage.
    pub overflow_entries: usize,
    /// `populated / bucket_count`.
    pub load_factor: f64,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-prints the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hopscotch Table Statistics ===");
        println!(
            "Population: {}/{} buckets ({:.2}% load factor)",
            self.populated,
            self.bucket_count,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {}/{} occupied (pad included)",
            self.occupied_slots, self.physical_slots
        );
        println!("Overflow: {} entries", self.overflow_entries);
    }
}

/// A view into a single entry in the table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on
/// [`HopscotchTable`].
///
/// [`entry`]: HopscotchTable::entry
pub enum Entry<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    /// A vacant entry. A destination slot (or the overflow storage) has
    /// already been resolved for it.
    Vacant(VacantEntry<'a, V, H, GROWTH_NUM, GROWTH_DEN>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V, H, GROWTH_NUM, GROWTH_DEN>),
}

impl<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    Entry<'a, V, H, GROWTH_NUM, GROWTH_DEN>
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
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant entry in the table.
///
/// The destination was resolved when the entry was created: either a bucket
/// inside the home neighborhood, or the overflow storage when displacement
/// could not produce one and growing would not help.
pub struct VacantEntry<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    table: &'a mut HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>,
    home: usize,
    /// Resolved bucket index, or `None` for the overflow storage.
    slot: Option<usize>,
}

impl<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    VacantEntry<'a, V, H, GROWTH_NUM, GROWTH_DEN>
{
    /// Inserts the value and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        match self.slot {
            Some(index) => {
                debug_assert!(index - self.home < H);
                debug_assert!(!table.buckets[self.home].neighbor_present(index - self.home));
                table.buckets[index].install(value);
                table.buckets[self.home].toggle_neighbor(index - self.home);
                table.len += 1;
                // SAFETY: Installed just above.
                unsafe { table.buckets[index].value_mut() }
            }
            None => {
                table.buckets[self.home].set_overflow(true);
                table.overflow.push(value);
                table.len += 1;
                let index = table.overflow.len() - 1;
                &mut table.overflow[index]
            }
        }
    }
}

/// A view into an occupied entry in the table.
pub struct OccupiedEntry<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    table: &'a mut HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>,
    home: usize,
    slot: Slot,
    /// For overflow entries: whether another overflow element shares the
    /// home bucket, resolved when the entry was created.
    home_has_other_overflow: bool,
}

impl<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize>
    OccupiedEntry<'a, V, H, GROWTH_NUM, GROWTH_DEN>
{
    /// Gets a reference to the value.
    pub fn get(&self) -> &V {
        match self.slot {
            // SAFETY: The entry was located occupied and the table is
            // borrowed for the entry's lifetime.
            Slot::Bucket(index) => unsafe { self.table.buckets[index].value() },
            Slot::Overflow(index) => &self.table.overflow[index],
        }
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        match self.slot {
            // SAFETY: The entry was located occupied and the table is
            // borrowed for the entry's lifetime.
            Slot::Bucket(index) => unsafe { self.table.buckets[index].value_mut() },
            Slot::Overflow(index) => &mut self.table.overflow[index],
        }
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        match self.slot {
            // SAFETY: The entry was located occupied and the table is
            // borrowed for the entry's lifetime.
            Slot::Bucket(index) => unsafe { self.table.buckets[index].value_mut() },
            Slot::Overflow(index) => &mut self.table.overflow[index],
        }
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        match self.slot {
            Slot::Bucket(index) => {
                // SAFETY: The entry was located occupied.
                let value = unsafe { self.table.buckets[index].take() };
                self.table.buckets[self.home].toggle_neighbor(index - self.home);
                self.table.len -= 1;
                value
            }
            Slot::Overflow(index) => {
                let value = self.table.overflow.swap_remove(index);
                self.table.len -= 1;
                if !self.home_has_other_overflow {
                    self.table.buckets[self.home].set_overflow(false);
                }
                value
            }
        }
    }
}

/// An iterator over the values of a [`HopscotchTable`].
pub struct Iter<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> {
    table: &'a HopscotchTable<V, H, GROWTH_NUM, GROWTH_DEN>,
    bucket_index: usize,
    overflow_index: usize,
}

impl<'a, V, const H: usize, const GROWTH_NUM: usize, const GROWTH_DEN: usize> Iterator
    for Iter<'a, V, H, GROWTH_NUM, GROWTH_DEN>
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket_index < self.table.buckets.len() {
            let bucket = &self.table.buckets[self.bucket_index];
            self.bucket_index += 1;
            if bucket.is_occupied() {
                // SAFETY: Occupancy checked above.
                return Some(unsafe { bucket.value() });
            }
        }

        let value = self.table.overflow.get(self.overflow_index)?;
        self.overflow_index += 1;
        Some(value)
    }
}

/// A draining iterator over the values of a [`HopscotchTable`].
pub struct Drain<V> {
    buckets: alloc::vec::IntoIter<Bucket<V>>,
    overflow: alloc::vec::IntoIter<V>,
}

impl<V> Iterator for Drain<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        for mut bucket in self.buckets.by_ref() {
            if bucket.is_occupied() {
                // SAFETY: Occupancy checked above. `take` clears the bit,
                // so dropping the bucket afterwards is fine.
                return Some(unsafe { bucket.take() });
            }
        }

        self.overflow.next()
    }
}

#[cfg(test)]
mod tests {
    use core::hash::Hash;
    use core::hash::Hasher;

    use siphasher::sip::SipHasher;

    use super::*;

    fn sip(value: &u64) -> u64 {
        let mut hasher = SipHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    /// Hash that encodes the home directly: values are `home * 1000 + k`.
    fn thousands(value: &u64) -> u64 {
        value / 1000
    }

    fn zero(_: &u64) -> u64 {
        0
    }

    fn identity(value: &u64) -> u64 {
        *value
    }

    fn insert_with<const H: usize, const GN: usize, const GD: usize>(
        table: &mut HopscotchTable<u64, H, GN, GD>,
        hash: fn(&u64) -> u64,
        value: u64,
    ) -> bool {
        match table.entry(hash(&value), |v| *v == value, hash) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    #[test]
    fn empty_table() {
        let table: HopscotchTable<u64> = HopscotchTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert_eq!(table.find(12345, |_| true), None);
    }

    #[test]
    fn bucket_bitmap_encoding() {
        let mut bucket: Bucket<u64> = Bucket::empty();
        assert!(!bucket.is_occupied());
        assert!(!bucket.has_overflow());
        assert_eq!(bucket.neighborhood(), 0);

        bucket.install(7);
        assert!(bucket.is_occupied());
        assert!(!bucket.has_overflow());
        // SAFETY: Installed above.
        assert_eq!(unsafe { *bucket.value() }, 7);

        bucket.set_overflow(true);
        assert!(bucket.has_overflow());
        assert!(bucket.is_occupied());

        bucket.toggle_neighbor(0);
        bucket.toggle_neighbor(61);
        assert!(bucket.neighbor_present(0));
        assert!(bucket.neighbor_present(61));
        assert!(!bucket.neighbor_present(30));
        assert_eq!(bucket.neighborhood(), 1 | 1 << 61);

        bucket.toggle_neighbor(0);
        assert!(!bucket.neighbor_present(0));

        // SAFETY: Still occupied.
        let value = unsafe { bucket.take() };
        assert_eq!(value, 7);
        assert!(!bucket.is_occupied());
        // Bookkeeping bits survive the removal of the stored value.
        assert!(bucket.has_overflow());
        assert!(bucket.neighbor_present(61));

        bucket.clear();
        assert_eq!(bucket.bits, 0);
    }

    #[test]
    fn swap_into_empty_moves_value_only() {
        let mut from: Bucket<u64> = Bucket::empty();
        let mut to: Bucket<u64> = Bucket::empty();
        from.install(42);
        to.toggle_neighbor(3);
        to.set_overflow(true);

        // SAFETY: `from` occupied, `to` empty.
        unsafe { from.swap_into_empty(&mut to) };

        assert!(!from.is_occupied());
        assert!(to.is_occupied());
        // SAFETY: Occupied after the move.
        assert_eq!(unsafe { *to.value() }, 42);
        assert!(to.neighbor_present(3));
        assert!(to.has_overflow());
    }

    #[test]
    fn insert_and_find() {
        let mut table: HopscotchTable<u64> = HopscotchTable::default();

        for value in 0..100 {
            assert!(insert_with(&mut table, sip, value));
        }
        assert_eq!(table.len(), 100);

        for value in 0..100 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        assert_eq!(table.find(sip(&500), |v| *v == 500), None);
        table.assert_invariants(sip);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut table: HopscotchTable<u64> = HopscotchTable::default();

        assert!(insert_with(&mut table, sip, 7));
        assert!(!insert_with(&mut table, sip, 7));
        assert!(!insert_with(&mut table, sip, 7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut table: HopscotchTable<u64> = HopscotchTable::default();
        insert_with(&mut table, sip, 10);

        *table.find_mut(sip(&10), |v| *v == 10).unwrap() = 10;
        assert_eq!(table.find(sip(&10), |v| *v == 10), Some(&10));
        assert!(table.find_mut(sip(&11), |v| *v == 11).is_none());
    }

    #[test]
    fn displacement_seats_value_in_neighborhood() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);

        // Homes 0 through 4 occupy slots 0 through 4 directly.
        for value in [1, 1001, 2001, 3001, 4001] {
            assert!(insert_with(&mut table, thousands, value));
        }

        // Home 1 is full through slot 4; the first empty slot is 5, one
        // past the neighborhood. Seating this value requires displacing
        // the home-2 occupant from slot 2 into slot 5.
        assert!(insert_with(&mut table, thousands, 1002));
        assert_eq!(table.len(), 6);
        assert_eq!(table.overflow_len(), 0);

        for value in [1, 1001, 2001, 3001, 4001, 1002] {
            assert_eq!(
                table.find(thousands(&value), |v| *v == value),
                Some(&value)
            );
        }
        table.assert_invariants(thousands);

        // The displaced value sits outside its home bucket but inside the
        // home's neighborhood.
        assert!(!table.buckets[2].is_occupied() || unsafe { *table.buckets[2].value() } != 2001);
        assert!(table.buckets[5].is_occupied());
    }

    #[test]
    fn degenerate_hash_overflows_after_neighborhood_fills() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);

        for value in 1..=8 {
            assert!(insert_with(&mut table, zero, value));
        }

        assert_eq!(table.len(), 8);
        assert_eq!(table.overflow_len(), 4);
        assert!(table.buckets[0].has_overflow());
        for value in 1..=8 {
            assert_eq!(table.find(0, |v| *v == value), Some(&value));
        }
        table.assert_invariants(zero);

        // Removing one overflowed value leaves the flag set for the rest.
        assert_eq!(table.remove(0, |v| *v == 5, zero), Some(5));
        assert_eq!(table.len(), 7);
        assert_eq!(table.overflow_len(), 3);
        assert!(table.buckets[0].has_overflow());
        table.assert_invariants(zero);

        // Removing the last overflowed value clears the flag.
        for value in [6, 7, 8] {
            assert_eq!(table.remove(0, |v| *v == value, zero), Some(value));
        }
        assert!(!table.buckets[0].has_overflow());
        assert_eq!(table.overflow_len(), 0);
        assert_eq!(table.len(), 4);
        table.assert_invariants(zero);
    }

    #[test]
    fn neighborhood_of_one_overflows_on_first_collision() {
        let mut table: HopscotchTable<u64, 1, 2, 1> = HopscotchTable::with_bucket_count(16);

        assert!(insert_with(&mut table, zero, 1));
        assert!(insert_with(&mut table, zero, 2));

        assert_eq!(table.len(), 2);
        assert_eq!(table.overflow_len(), 1);
        assert_eq!(table.find(0, |v| *v == 1), Some(&1));
        assert_eq!(table.find(0, |v| *v == 2), Some(&2));
        table.assert_invariants(zero);
    }

    #[test]
    fn widest_neighborhood() {
        let mut table: HopscotchTable<u64, 62, 2, 1> = HopscotchTable::with_bucket_count(16);

        for value in 0..200 {
            assert!(insert_with(&mut table, sip, value));
        }
        assert_eq!(table.len(), 200);
        assert_eq!(table.overflow_len(), 0);
        for value in 0..200 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(sip);
    }

    #[test]
    fn exhausted_probe_window_falls_back_to_grow() {
        // A table this small is entirely covered by the probe window, so
        // filling every physical slot exercises the no-empty-slot path.
        let mut table: HopscotchTable<u64, 4, 2, 1> =
            HopscotchTable::with_bucket_count_and_load_factor(4, 2.0);
        assert_eq!(table.buckets.len(), 7);

        // Homes 0..4 plus displacements fill all seven physical slots.
        for value in [0, 1, 2, 3, 4, 8, 12] {
            assert!(insert_with(&mut table, identity, value));
        }
        assert_eq!(table.len(), 7);
        assert!(table.buckets.iter().all(|bucket| bucket.is_occupied()));
        table.assert_invariants(identity);

        // No empty bucket exists. Hashes 4, 8, 12 map elsewhere under the
        // doubled bucket count, so the table grows rather than overflows.
        assert!(insert_with(&mut table, identity, 16));
        assert_eq!(table.len(), 8);
        assert!(table.bucket_count() >= 8);
        assert_eq!(table.overflow_len(), 0);
        for value in [0, 1, 2, 3, 4, 8, 12, 16] {
            assert_eq!(table.find(identity(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(identity);
    }

    #[test]
    fn growth_ratio_three_halves_uses_modulo() {
        let mut table: HopscotchTable<u64, 8, 3, 2> = HopscotchTable::with_bucket_count(16);

        for value in 0..100 {
            assert!(insert_with(&mut table, sip, value));
        }

        assert_eq!(table.len(), 100);
        // 16 -> 24 -> 36 -> 54 -> 81 -> 122 under a 3/2 ratio.
        assert!(!table.bucket_count().is_power_of_two());
        assert!(table.bucket_count() >= 100);
        for value in 0..100 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(sip);
    }

    #[test]
    fn load_threshold_triggers_growth() {
        let mut table: HopscotchTable<u64> = HopscotchTable::with_bucket_count(16);
        assert_eq!(table.capacity(), 14);

        for value in 0..15 {
            assert!(insert_with(&mut table, sip, value));
        }

        assert_eq!(table.len(), 15);
        assert_eq!(table.bucket_count(), 32);
        table.assert_invariants(sip);
    }

    #[test]
    fn rehash_preserves_contents() {
        let mut table: HopscotchTable<u64> = HopscotchTable::with_bucket_count(16);
        for value in 0..50 {
            insert_with(&mut table, sip, value);
        }

        table.rehash(200, sip);
        assert_eq!(table.bucket_count(), 256);
        assert_eq!(table.len(), 50);
        for value in 0..50 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(sip);

        // Shrinking keeps enough buckets for the current load.
        table.rehash(0, sip);
        assert_eq!(table.bucket_count(), 64);
        for value in 0..50 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(sip);
    }

    #[test]
    fn rehash_carries_overflow_and_reflags() {
        let mut table: HopscotchTable<u64, 2, 2, 1> = HopscotchTable::with_bucket_count(16);
        for value in 1..=5 {
            insert_with(&mut table, zero, value);
        }
        assert_eq!(table.overflow_len(), 3);

        table.rehash(64, zero);
        assert_eq!(table.len(), 5);
        // Same home under every bucket count, so the stragglers stay in
        // overflow and bucket 0 keeps its flag.
        assert_eq!(table.overflow_len(), 3);
        assert!(table.buckets[0].has_overflow());
        for value in 1..=5 {
            assert_eq!(table.find(0, |v| *v == value), Some(&value));
        }
        table.assert_invariants(zero);
    }

    #[test]
    fn reserve_makes_room() {
        let mut table: HopscotchTable<u64> = HopscotchTable::with_bucket_count(16);
        table.reserve(1000, sip);
        assert!(table.capacity() >= 1000);

        let buckets_before = table.bucket_count();
        for value in 0..1000 {
            insert_with(&mut table, sip, value);
        }
        assert_eq!(table.bucket_count(), buckets_before);
        table.assert_invariants(sip);
    }

    #[test]
    fn shrink_to_fit_reduces_buckets() {
        let mut table: HopscotchTable<u64> = HopscotchTable::with_bucket_count(1024);
        for value in 0..10 {
            insert_with(&mut table, sip, value);
        }

        table.shrink_to_fit(sip);
        assert_eq!(table.bucket_count(), 16);
        for value in 0..10 {
            assert_eq!(table.find(sip(&value), |v| *v == value), Some(&value));
        }
        table.assert_invariants(sip);
    }

    #[test]
    fn remove_returns_value() {
        let mut table: HopscotchTable<u64> = HopscotchTable::default();
        for value in 0..20 {
            insert_with(&mut table, sip, value);
        }

        assert_eq!(table.remove(sip(&7), |v| *v == 7, sip), Some(7));
        assert_eq!(table.remove(sip(&7), |v| *v == 7, sip), None);
        assert_eq!(table.len(), 19);
        assert_eq!(table.find(sip(&7), |v| *v == 7), None);
        table.assert_invariants(sip);
    }

    #[test]
    fn entry_remove_from_overflow_keeps_flags_consistent() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);
        for value in 1..=8 {
            insert_with(&mut table, zero, value);
        }
        assert_eq!(table.overflow_len(), 4);

        // Values 5 through 8 are the overflowed ones.
        for (removed, value) in (1..=4).zip(5..=8u64) {
            match table.entry(0, |v| *v == value, zero) {
                Entry::Occupied(entry) => assert_eq!(entry.remove(), value),
                Entry::Vacant(_) => panic!("value {value} should be present"),
            }
            assert_eq!(table.overflow_len(), 4 - removed);
            assert_eq!(table.buckets[0].has_overflow(), removed < 4);
            table.assert_invariants(zero);
        }
    }

    #[test]
    fn entry_occupied_get_mut() {
        let mut table: HopscotchTable<(u64, u64)> = HopscotchTable::default();
        let hash = |kv: &(u64, u64)| sip(&kv.0);

        match table.entry(sip(&1), |kv| kv.0 == 1, hash) {
            Entry::Vacant(entry) => {
                entry.insert((1, 10));
            }
            Entry::Occupied(_) => panic!("table was empty"),
        }

        match table.entry(sip(&1), |kv| kv.0 == 1, hash) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.get(), &(1, 10));
                entry.get_mut().1 = 20;
                assert_eq!(entry.into_mut().1, 20);
            }
            Entry::Vacant(_) => panic!("value should be present"),
        }

        assert_eq!(table.find(sip(&1), |kv| kv.0 == 1), Some(&(1, 20)));
    }

    /// Spread-out values hash normally; values of 1000 and up clump onto
    /// bucket 0 so some of them overflow.
    fn clumped(value: &u64) -> u64 {
        if *value >= 1000 { 0 } else { sip(value) }
    }

    #[test]
    fn retain_drops_and_reflags() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(64);
        for value in 0..40 {
            insert_with(&mut table, clumped, value);
        }
        for value in 1000..1008 {
            insert_with(&mut table, clumped, value);
        }
        assert!(table.overflow_len() > 0);

        table.retain(|value| *value % 2 == 0, clumped);

        assert_eq!(table.len(), 24);
        for value in 0..40u64 {
            let expected = value % 2 == 0;
            assert_eq!(
                table.find(clumped(&value), |v| *v == value).is_some(),
                expected
            );
        }
        for value in 1000..1008u64 {
            let expected = value % 2 == 0;
            assert_eq!(table.find(0, |v| *v == value).is_some(), expected);
        }
        table.assert_invariants(clumped);
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);
        for value in 1..=8 {
            insert_with(&mut table, zero, value);
        }
        let buckets = table.bucket_count();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), buckets);
        assert_eq!(table.overflow_len(), 0);
        assert_eq!(table.find(0, |_| true), None);
        assert_eq!(table.iter().count(), 0);
        table.assert_invariants(zero);

        // Flags and neighbor bits were reset, so reinsertion works from a
        // clean slate.
        for value in 1..=8 {
            assert!(insert_with(&mut table, zero, value));
        }
        table.assert_invariants(zero);
    }

    #[test]
    fn iteration_yields_each_value_once() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(64);
        for value in 0..30 {
            insert_with(&mut table, clumped, value);
        }
        for value in 1000..1006 {
            insert_with(&mut table, clumped, value);
        }

        let mut seen: std::vec::Vec<u64> = table.iter().copied().collect();
        seen.sort_unstable();
        let mut expected: std::vec::Vec<u64> = (0..30).chain(1000..1006).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn drain_empties_table() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);
        for value in 1..=8 {
            insert_with(&mut table, zero, value);
        }

        let mut drained: std::vec::Vec<u64> = table.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, (1..=8).collect::<std::vec::Vec<u64>>());

        assert!(table.is_empty());
        assert_eq!(table.overflow_len(), 0);
        table.assert_invariants(zero);
        assert!(insert_with(&mut table, zero, 1));
    }

    #[test]
    fn drain_drops_unconsumed_values() {
        use std::rc::Rc;

        let marker = Rc::new(());
        let mut table: HopscotchTable<(u64, Rc<()>)> = HopscotchTable::default();
        let hash = |kv: &(u64, Rc<()>)| sip(&kv.0);
        for key in 0..10 {
            match table.entry(sip(&key), |kv| kv.0 == key, hash) {
                Entry::Vacant(entry) => {
                    entry.insert((key, Rc::clone(&marker)));
                }
                Entry::Occupied(_) => unreachable!(),
            }
        }
        assert_eq!(Rc::strong_count(&marker), 11);

        let mut drain = table.drain();
        drain.next();
        drop(drain);
        assert_eq!(Rc::strong_count(&marker), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let mut table: HopscotchTable<u64, 4, 2, 1> = HopscotchTable::with_bucket_count(16);
        for value in 1..=8 {
            insert_with(&mut table, zero, value);
        }

        let mut copy = table.clone();
        assert_eq!(copy.len(), table.len());
        copy.remove(0, |v| *v == 1, zero);

        assert_eq!(copy.len(), 7);
        assert_eq!(table.len(), 8);
        assert_eq!(table.find(0, |v| *v == 1), Some(&1));
        copy.assert_invariants(zero);
        table.assert_invariants(zero);
    }
}
