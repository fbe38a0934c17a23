use core::alloc::Layout;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops;
use core::ptr;
use core::slice;

use bytemuck::Zeroable;

use super::inner::Inner;
use super::inner::OCCUPIED;
use super::inner::VACANT;
use crate::types::AltAllocator;
use crate::types::ErrorReason;
use crate::types::Global;
use crate::types::LengthType;
use crate::types::VxErr;
use crate::types::VxResult;

/// A per-unit destructor, run on a unit just before it is dropped.
pub type UnitFree<T> = fn(&mut T);

/// A growable vector whose capacity always fits exactly.
///
/// Every growth past the current capacity reallocates to precisely the new
/// count, and new slots are zero-filled, so `T` must be `Zeroable`.
///
/// Insertion and removal both go through [`Vx::shift`]. A removed or
/// destroyed unit first has the optional [`UnitFree`] destructor run on it,
/// but only if the slot is occupied: written through `push`, `append`,
/// `insert`, `emplace`, `set`, or mutable access. Zero-filled slots made by
/// `create`, `grow`, or `shift` stay vacant until written.
pub struct Vx<T, A: AltAllocator = Global, L: LengthType = usize>
where
    usize: TryFrom<L>,
{
    inner:     Inner<A, L>,
    len:       L,
    unit_free: Option<UnitFree<T>>,
    _ph:       PhantomData<T>,
}

unsafe impl<T: Send, A: AltAllocator + Send, L: LengthType + Send> Send for Vx<T, A, L>
where
    usize: TryFrom<L>,
{
}

impl<T: Zeroable> Vx<T> {
    /// An empty vector on the global allocator. Does not allocate.
    pub const fn new() -> Self {
        return Self::new_in(Global);
    }

    /// A vector of `count` zeroed, vacant units on the global allocator.
    pub fn create(count: usize, unit_free: Option<UnitFree<T>>) -> VxResult<Self> {
        return Self::create_in(Global, count, unit_free);
    }
}

impl<T: Zeroable> Default for Vx<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T, A: AltAllocator, L: LengthType> Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    const UNIT: Layout = Layout::new::<T>();

    /// Takes the vector out of `handle` and destroys it, leaving `None`.
    ///
    /// Does nothing if `handle` is already `None`.
    pub fn free(handle: &mut Option<Self>) {
        drop(handle.take());
    }

    #[inline]
    pub const fn len(&self) -> L {
        return self.len;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len == L::ZERO_VALUE;
    }

    #[inline]
    pub const fn capacity(&self) -> L {
        return self.inner.capacity();
    }

    /// Size of a single unit in bytes.
    #[inline]
    pub const fn unit_size(&self) -> usize {
        return size_of::<T>();
    }

    #[inline]
    pub const fn unit_free(&self) -> Option<UnitFree<T>> {
        return self.unit_free;
    }

    /// Whether the unit at `index` has been written since it was zero-filled.
    pub fn is_occupied(&self, index: L) -> bool {
        let at = index.as_usize();
        if at >= self.len.as_usize() {
            return false;
        }
        return unsafe { *self.flags().add(at) == OCCUPIED };
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data(), self.len.as_usize()) }
    }

    /// Mutable access to every live unit, all of which count as occupied
    /// from here on.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len.as_usize();
        unsafe {
            self.flags().write_bytes(OCCUPIED, len);
            slice::from_raw_parts_mut(self.data(), len)
        }
    }

    /// Mutable access to the live units in `range`, marking only those
    /// occupied.
    ///
    /// Panics if `range` is not inside the live units.
    pub(crate) fn units_mut(&mut self, range: ops::Range<usize>) -> &mut [T] {
        let len = self.len.as_usize();
        assert!(
            range.start <= range.end && range.end <= len,
            "unit range {}..{} is outside the {} live units",
            range.start,
            range.end,
            len
        );
        let count = range.end - range.start;
        unsafe {
            self.flags().add(range.start).write_bytes(OCCUPIED, count);
            return slice::from_raw_parts_mut(self.data().add(range.start), count);
        }
    }

    pub fn get(&self, index: L) -> Option<&T> {
        return self.as_slice().get(index.as_usize());
    }

    /// Mutable access to one unit, marking it occupied.
    pub fn get_mut(&mut self, index: L) -> Option<&mut T> {
        let at = index.as_usize();
        if at >= self.len.as_usize() {
            return None;
        }
        unsafe {
            self.flags().add(at).write(OCCUPIED);
            return Some(&mut *self.data().add(at));
        }
    }

    /// Replaces the unit at `index`, returning the old one.
    ///
    /// The destructor is not run on the returned unit.
    pub fn set(&mut self, index: L, item: T) -> VxResult<T> {
        let Some(slot) = self.get_mut(index) else {
            return Err(VxErr::new(ErrorReason::OutOfBounds));
        };
        return Ok(core::mem::replace(slot, item));
    }

    /// Removes the last unit and hands it back without running the destructor.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == L::ZERO_VALUE {
            return None;
        }
        self.len -= L::ONE_VALUE;
        return Some(unsafe { ptr::read(self.data().add(self.len.as_usize())) });
    }

    /// Reallocates to hold exactly `new_capacity` units.
    ///
    /// Fails with `ShrinkBelowCount` if that would not fit the live units.
    pub fn reserve(&mut self, new_capacity: L) -> VxResult<()> {
        if new_capacity < self.len {
            diag!(
                warn,
                "cannot resize a vector of {} units to a capacity of {}",
                self.len.as_usize(),
                new_capacity.as_usize()
            );
            return Err(VxErr::new(ErrorReason::ShrinkBelowCount));
        }
        if new_capacity == self.capacity() {
            return Ok(());
        }
        return self.inner.resize(Self::UNIT, self.len.as_usize(), new_capacity);
    }

    /// Drops any capacity beyond the live units.
    pub fn shrink(&mut self) -> VxResult<()> {
        if self.capacity() == self.len {
            return Ok(());
        }
        return self.inner.resize(Self::UNIT, self.len.as_usize(), self.len);
    }

    #[inline]
    fn data(&self) -> *mut T {
        return self.inner.data_ptr();
    }

    #[inline]
    fn flags(&self) -> *mut u8 {
        return self.inner.flags_ptr();
    }

    /// Writes `item` over the slot at `at` and marks it occupied. The slot's
    /// previous bits are forgotten, not dropped.
    unsafe fn put(&mut self, at: usize, item: T) {
        unsafe {
            self.data().add(at).write(item);
            self.flags().add(at).write(OCCUPIED);
        }
    }

    /// Runs the destructor on the occupied units in `[start, start + count)`
    /// and drops all of them.
    unsafe fn destroy(&mut self, start: usize, count: usize) {
        for at in start..start + count {
            unsafe {
                let slot = self.data().add(at);
                if let Some(unit_free) = self.unit_free {
                    if *self.flags().add(at) == OCCUPIED {
                        unit_free(&mut *slot);
                    }
                }
                ptr::drop_in_place(slot);
            }
        }
    }

    /// Removes the `count` units in front of `at`.
    fn shift_left(&mut self, at: usize, count: usize) -> VxResult<()> {
        let Some(start) = at.checked_sub(count) else {
            return Err(VxErr::new(ErrorReason::OutOfBounds));
        };
        let len = self.len.as_usize();
        let (Some(start_len), Some(new_len)) = (L::from_usize(start), L::from_usize(len - count))
        else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };

        // A panicking destructor leaks the tail rather than double dropping.
        self.len = start_len;
        unsafe {
            self.destroy(start, count);
            ptr::copy(self.data().add(at), self.data().add(start), len - at);
            ptr::copy(self.flags().add(at), self.flags().add(start), len - at);
        }
        self.len = new_len;
        return Ok(());
    }
}

impl<T: Zeroable, A: AltAllocator, L: LengthType> Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    /// An empty vector. Does not allocate.
    pub const fn new_in(alloc: A) -> Self {
        return Self {
            inner:     Inner::new_in(alloc, Self::UNIT),
            len:       L::ZERO_VALUE,
            unit_free: None,
            _ph:       PhantomData,
        };
    }

    /// A vector of `count` zeroed, vacant units in a block of exactly that
    /// capacity.
    pub fn create_in(alloc: A, count: L, unit_free: Option<UnitFree<T>>) -> VxResult<Self> {
        let inner = Inner::with_capacity_in(alloc, Self::UNIT, count)?;
        return Ok(Self {
            inner:     inner,
            len:       count,
            unit_free: unit_free,
            _ph:       PhantomData,
        });
    }

    /// Adds `by` zeroed, vacant units to the end, reallocating to exactly
    /// the new count if they do not fit.
    pub fn grow(&mut self, by: L) -> VxResult<()> {
        let Some(new_len) = self.len.checked_add(by) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        if self.capacity() < new_len {
            self.reserve(new_len)?;
        }

        let at = self.len.as_usize();
        let count = by.as_usize();
        unsafe {
            self.data().add(at).write_bytes(0, count);
            self.flags().add(at).write_bytes(VACANT, count);
        }
        self.len = new_len;
        return Ok(());
    }

    pub fn push(&mut self, item: T) -> VxResult<()> {
        self.grow(L::ONE_VALUE)?;
        let last = self.len.as_usize() - 1;
        unsafe { self.put(last, item) };
        return Ok(());
    }

    /// Appends clones of every unit in `src`.
    pub fn append(&mut self, src: &[T]) -> VxResult<()>
    where
        T: Clone,
    {
        let Some(by) = L::from_usize(src.len()) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        let start = self.len.as_usize();
        self.grow(by)?;
        for (i, item) in src.iter().enumerate() {
            unsafe { self.put(start + i, item.clone()) };
        }
        return Ok(());
    }

    /// Opens or closes a gap at `index`.
    ///
    /// A positive `delta` moves the units at and after `index` right by
    /// `delta`, leaving `delta` zeroed vacant slots starting at `index`.
    ///
    /// A negative `delta` removes the `|delta|` units just before `index`,
    /// running the destructor on the occupied ones, and closes the gap.
    /// Removal never allocates.
    pub fn shift(&mut self, index: L, delta: isize) -> VxResult<()> {
        let at = index.as_usize();
        if at > self.len.as_usize() {
            return Err(VxErr::new(ErrorReason::OutOfBounds));
        }
        match delta.cmp(&0) {
            Ordering::Equal => return Ok(()),
            Ordering::Less => return self.shift_left(at, delta.unsigned_abs()),
            Ordering::Greater => return self.shift_right(at, delta.unsigned_abs()),
        }
    }

    pub fn insert(&mut self, index: L, item: T) -> VxResult<()> {
        self.shift(index, 1)?;
        unsafe { self.put(index.as_usize(), item) };
        return Ok(());
    }

    /// Inserts clones of every unit in `src` so the first lands at `index`.
    pub fn emplace(&mut self, index: L, src: &[T]) -> VxResult<()>
    where
        T: Clone,
    {
        let Ok(delta) = isize::try_from(src.len()) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        self.shift(index, delta)?;
        let start = index.as_usize();
        for (i, item) in src.iter().enumerate() {
            unsafe { self.put(start + i, item.clone()) };
        }
        return Ok(());
    }

    fn shift_right(&mut self, at: usize, count: usize) -> VxResult<()> {
        let Some(by) = L::from_usize(count) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        let len = self.len.as_usize();
        self.grow(by)?;

        // The zeroed tail from `grow` is overwritten bitwise, never dropped.
        unsafe {
            ptr::copy(self.data().add(at), self.data().add(at + count), len - at);
            ptr::copy(self.flags().add(at), self.flags().add(at + count), len - at);
            self.data().add(at).write_bytes(0, count);
            self.flags().add(at).write_bytes(VACANT, count);
        }
        return Ok(());
    }
}

impl<T, A: AltAllocator, L: LengthType> Drop for Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    fn drop(&mut self) {
        let len = self.len.as_usize();
        self.len = L::ZERO_VALUE;
        unsafe { self.destroy(0, len) };
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::Index<L> for Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    type Output = T;

    fn index(&self, index: L) -> &T {
        return &self.as_slice()[index.as_usize()];
    }
}

impl<T, A: AltAllocator, L: LengthType> ops::IndexMut<L> for Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    fn index_mut(&mut self, index: L) -> &mut T {
        let len = self.len.as_usize();
        let Some(slot) = self.get_mut(index) else {
            panic!("index out of bounds: the len is {} but the index is {}", len, index.as_usize());
        };
        return slot;
    }
}

impl<T: fmt::Debug, A: AltAllocator, L: LengthType> fmt::Debug for Vx<T, A, L>
where
    usize: TryFrom<L>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.as_slice()).finish();
    }
}
