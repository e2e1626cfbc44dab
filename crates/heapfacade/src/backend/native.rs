//! Native backend: delegates to the host C allocator.
//!
//! This crate never exports `malloc`/`free` under their own names, so the
//! libc symbols resolve to the real allocator without any `dlsym` dance.

use super::MemoryBackend;
use core::ffi::c_void;
use core::ptr;

pub struct NativeBackend;

unsafe impl MemoryBackend for NativeBackend {
    #[inline]
    unsafe fn allocate(&self, size: usize) -> *mut u8 {
        libc::malloc(size) as *mut u8
    }

    #[inline]
    unsafe fn aligned_allocate(&self, alignment: usize, size: usize) -> *mut u8 {
        memalign(alignment, size)
    }

    #[inline]
    unsafe fn zero_allocate(&self, count: usize, size: usize) -> *mut u8 {
        libc::calloc(count, size) as *mut u8
    }

    unsafe fn aligned_zero_allocate(&self, alignment: usize, count: usize, size: usize) -> *mut u8 {
        // No calloc equivalent with alignment control; allocate then zero.
        let total = match count.checked_mul(size) {
            Some(t) => t,
            None => return ptr::null_mut(),
        };
        let p = memalign(alignment, total);
        if !p.is_null() {
            ptr::write_bytes(p, 0, total);
        }
        p
    }

    #[inline]
    unsafe fn reallocate(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
        // glibc frees the block on realloc(p, 0) and returns null, which would
        // read as "failed, old block still live". Keep a one-byte block instead.
        let new_size = if ptr.is_null() { new_size } else { new_size.max(1) };
        libc::realloc(ptr as *mut c_void, new_size) as *mut u8
    }

    #[inline]
    unsafe fn free(&self, ptr: *mut u8) {
        libc::free(ptr as *mut c_void);
    }
}

/// `posix_memalign` with the alignment raised to the pointer size it
/// requires. Non-power-of-two alignments are rejected by libc (null).
unsafe fn memalign(alignment: usize, size: usize) -> *mut u8 {
    let alignment = alignment.max(core::mem::size_of::<*mut c_void>());
    let mut out: *mut c_void = ptr::null_mut();
    if libc::posix_memalign(&mut out, alignment, size) == 0 {
        out as *mut u8
    } else {
        ptr::null_mut()
    }
}
