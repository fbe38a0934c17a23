use core::alloc::Layout;
use core::ptr::NonNull;

use allocator_api2::alloc::Allocator;

use super::AllocError;
use super::AltAllocator;

// Any allocator_api2 allocator can back a `Vx`.
unsafe impl<A: Allocator> AltAllocator for A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        return <Self as Allocator>::allocate(self, layout).map_err(|_| AllocError);
    }

    #[inline]
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        return <Self as Allocator>::allocate_zeroed(self, layout).map_err(|_| AllocError);
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { <Self as Allocator>::deallocate(self, ptr, layout) };
    }
}
