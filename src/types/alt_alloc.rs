use core::alloc::Layout;
use core::ptr::NonNull;

use super::AllocError;

/// The memory source behind a `Vx`.
///
/// The standard `Allocator` trait is still unstable, so this is the subset of
/// it a vector needs: every resize of a `Vx` is an exact-fit move into a fresh
/// zeroed block, so there is no `grow`/`shrink` here.
///
/// Safety requirements mirror the allocator API:
/// <https://doc.rust-lang.org/std/alloc/trait.Allocator.html>
pub unsafe trait AltAllocator {
    /// Allocates a block described by `layout`.
    ///
    /// A zero sized `layout` may be refused; `Vx` never asks for one.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Allocates just like `allocate` but the block is all zero bytes.
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ret = self.allocate(layout)?;
        let ptr = ret.cast::<u8>();
        unsafe { ptr.write_bytes(0, ret.len()) };
        return Ok(ret);
    }

    /// Releases a block previously returned by this allocator.
    ///
    /// `layout` must be the layout the block was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}
