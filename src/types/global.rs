use core::alloc::Layout;
use core::ptr::NonNull;

use alloc::alloc;

use super::AllocError;
use super::AltAllocator;

/// The process wide allocator, reached through `alloc::alloc`.
///
/// This is the default allocator of `Vx` and `VxStr`.
#[derive(Debug, Copy, Clone, Default)]
pub struct Global;

unsafe impl AltAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        // alloc::alloc() is undefined for zero sized layouts.
        if layout.size() == 0 {
            return Err(AllocError);
        }
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(ptr, layout.size()));
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError);
        }
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(AllocError);
        };
        return Ok(NonNull::slice_from_raw_parts(ptr, layout.size()));
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }
}
