use core::alloc::Layout;
use core::ptr;
use core::ptr::NonNull;

use crate::types::AltAllocator;
use crate::types::ErrorReason;
use crate::types::LengthType;
use crate::types::VxErr;
use crate::types::VxResult;

pub(crate) const VACANT: u8 = 0;
pub(crate) const OCCUPIED: u8 = 1;

const fn layout_array(layout: Layout, length: usize) -> VxResult<Layout> {
    let lay = layout.pad_to_align();
    let Some(len) = length.checked_mul(lay.size()) else {
        return Err(VxErr::new(ErrorReason::UsizeOverflow));
    };
    let Ok(lay) = Layout::from_size_align(len, layout.align()) else {
        return Err(VxErr::new(ErrorReason::LayoutFailure));
    };
    return Ok(lay);
}

/// The layout of a block holding `capacity` units followed by one occupancy
/// byte per unit, and the offset of that flag region.
fn block_layout(unit: Layout, capacity: usize) -> VxResult<(Layout, usize)> {
    let data = layout_array(unit, capacity)?;
    let flags = layout_array(Layout::new::<u8>(), capacity)?;
    let Ok((block, offset)) = data.extend(flags) else {
        return Err(VxErr::new(ErrorReason::LayoutFailure));
    };
    return Ok((block.pad_to_align(), offset));
}

/// The header of a vector: capacity, the single backing block, and the
/// allocator that owns it.
///
/// Knows nothing about the unit type beyond its `Layout`; dropping the live
/// units is the job of the `Vx` wrapping it.
pub(crate) struct Inner<A: AltAllocator, L: LengthType>
where
    usize: TryFrom<L>,
{
    ptr:      NonNull<u8>,
    block:    Layout,
    flags:    usize,
    capacity: L,
    alloc:    A,
}

impl<A: AltAllocator, L: LengthType> Inner<A, L>
where
    usize: TryFrom<L>,
{
    pub(crate) const fn new_in(alloc: A, unit: Layout) -> Self {
        return Self {
            ptr:      dangling(unit),
            block:    empty_block(unit),
            flags:    0,
            capacity: L::ZERO_VALUE,
            alloc:    alloc,
        };
    }

    pub(crate) fn with_capacity_in(alloc: A, unit: Layout, capacity: L) -> VxResult<Self> {
        let mut inner = Self::new_in(alloc, unit);
        inner.resize(unit, 0, capacity)?;
        return Ok(inner);
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> L {
        return self.capacity;
    }

    #[inline]
    pub(crate) const fn data_ptr<T>(&self) -> *mut T {
        return self.ptr.as_ptr().cast();
    }

    #[inline]
    pub(crate) const fn flags_ptr(&self) -> *mut u8 {
        return unsafe { self.ptr.as_ptr().add(self.flags) };
    }

    /// Moves the first `keep` units and their flags into a fresh zeroed block
    /// of exactly `capacity` units, then releases the old block.
    ///
    /// On failure nothing changes. `keep` must not exceed either capacity.
    pub(crate) fn resize(&mut self, unit: Layout, keep: usize, capacity: L) -> VxResult<()> {
        let Ok(cap) = usize::try_from(capacity) else {
            return Err(VxErr::new(ErrorReason::UsizeOverflow));
        };
        debug_assert!(keep <= cap && keep <= self.capacity.as_usize());

        if cap == 0 {
            self.release();
            self.ptr = dangling(unit);
            self.block = empty_block(unit);
            self.flags = 0;
            self.capacity = capacity;
            return Ok(());
        }

        let (block, flags) = block_layout(unit, cap)?;
        let Ok(new) = self.alloc.allocate_zeroed(block) else {
            diag!(error, "failed to allocate {} bytes for {} units", block.size(), cap);
            return Err(VxErr::new(ErrorReason::AllocFailure));
        };
        let new = new.cast::<u8>();

        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new.as_ptr(), keep * unit.size());
            ptr::copy_nonoverlapping(self.flags_ptr(), new.as_ptr().add(flags), keep);
        }
        self.release();

        self.ptr = new;
        self.block = block;
        self.flags = flags;
        self.capacity = capacity;
        return Ok(());
    }

    fn release(&mut self) {
        if self.block.size() == 0 {
            return;
        }
        unsafe { self.alloc.deallocate(self.ptr, self.block) };
        self.block = empty_block(Layout::new::<u8>());
    }
}

impl<A: AltAllocator, L: LengthType> Drop for Inner<A, L>
where
    usize: TryFrom<L>,
{
    fn drop(&mut self) {
        self.release();
    }
}

const fn dangling(unit: Layout) -> NonNull<u8> {
    // Alignments are never zero, so this never hits the null pointer.
    return unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(unit.align())) };
}

const fn empty_block(unit: Layout) -> Layout {
    return unsafe { Layout::from_size_align_unchecked(0, unit.align()) };
}
