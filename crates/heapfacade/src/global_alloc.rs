//! `#[global_allocator]` support.
//!
//! Routes Rust's heap through the facade, and therefore through whichever
//! backend this build selected:
//!
//! ```rust,ignore
//! use heapfacade::FacadeAlloc;
//!
//! #[global_allocator]
//! static GLOBAL: FacadeAlloc = FacadeAlloc;
//! ```

use crate::facade;
use crate::util::MIN_ALIGN;
use core::alloc::{GlobalAlloc, Layout};

/// A zero-sized unit struct that implements [`GlobalAlloc`] on top of the
/// facade.
pub struct FacadeAlloc;

unsafe impl GlobalAlloc for FacadeAlloc {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let size = layout.size();
        let align = layout.align();

        // Zero-size types: return a well-aligned dangling pointer.
        if size == 0 {
            return align as *mut u8;
        }

        if align <= MIN_ALIGN {
            facade::allocate(size)
        } else {
            facade::aligned_allocate(align, size)
        }
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let size = layout.size();
        let align = layout.align();

        if size == 0 {
            return align as *mut u8;
        }

        if align <= MIN_ALIGN {
            facade::zero_allocate(1, size)
        } else {
            facade::aligned_zero_allocate(align, 1, size)
        }
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        facade::free(ptr);
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let old_size = layout.size();
        let align = layout.align();

        // Old allocation was zero-sized: this is effectively a fresh alloc.
        if old_size == 0 {
            return self.alloc(Layout::from_size_align_unchecked(new_size, align));
        }

        if align <= MIN_ALIGN {
            facade::reallocate(ptr, new_size)
        } else {
            // The native realloc only guarantees MIN_ALIGN, so over-aligned
            // blocks move by hand.
            let new_ptr = facade::aligned_allocate(align, new_size);
            if !new_ptr.is_null() {
                core::ptr::copy_nonoverlapping(ptr, new_ptr, old_size.min(new_size));
                facade::free(ptr);
            }
            new_ptr
        }
    }
}
