//! Embedded backend: dlmalloc fed exclusively by a [`GrowthProvider`].
//!
//! dlmalloc owns all free-list and segment bookkeeping. This module only
//! adapts its sized, Rust-style interface to the C-style one the facade
//! exposes, and turns refused growth into null allocations.
//!
//! Block layout:
//!
//! ```text
//!   base                          user pointer
//!   |<------------ align ------------>|
//!   [ padding ... | BlockHeader       ][ size bytes ... ]
//! ```
//!
//! The header records the requested size and alignment so `free` and
//! `reallocate` can hand dlmalloc the sizes it expects.

use super::MemoryBackend;
use crate::growth::{GrowthProvider, GROWTH_FAILED};
use crate::sync::Mutex;
use crate::util::{checked_align_up, MIN_ALIGN};
use crate::{diag, init};
use core::ptr;
use dlmalloc::{Allocator, Dlmalloc};

#[repr(C)]
#[derive(Clone, Copy)]
struct BlockHeader {
    size: usize,
    align: usize,
}

// The header always fits in the smallest prefix.
const _: () = assert!(core::mem::size_of::<BlockHeader>() <= MIN_ALIGN);

/// dlmalloc's view of the environment: one growth provider, no release.
pub struct GrowthSource<G> {
    provider: G,
}

unsafe impl<G: GrowthProvider> Allocator for GrowthSource<G> {
    fn alloc(&self, size: usize) -> (*mut u8, usize, u32) {
        init::ensure_initialized();

        let granted = match checked_align_up(size, self.provider.page_size()) {
            Some(g) if g <= isize::MAX as usize => g,
            _ => {
                diag::growth_rejected(size);
                return (ptr::null_mut(), 0, 0);
            }
        };
        let base = unsafe { self.provider.grow(granted as isize) };
        if base == GROWTH_FAILED {
            diag::growth_rejected(granted);
            return (ptr::null_mut(), 0, 0);
        }
        diag::growth_granted(granted);
        (base, granted, 0)
    }

    fn remap(&self, _ptr: *mut u8, _oldsize: usize, _newsize: usize, _can_move: bool) -> *mut u8 {
        ptr::null_mut()
    }

    fn free_part(&self, _ptr: *mut u8, _oldsize: usize, _newsize: usize) -> bool {
        false
    }

    fn free(&self, _ptr: *mut u8, _size: usize) -> bool {
        false
    }

    fn can_release_part(&self, _flags: u32) -> bool {
        false
    }

    fn allocates_zeros(&self) -> bool {
        self.provider.grows_zeroed()
    }

    fn page_size(&self) -> usize {
        self.provider.page_size()
    }
}

struct Heap<G>(Dlmalloc<GrowthSource<G>>);

// dlmalloc's raw segment pointers are only touched under the mutex.
unsafe impl<G: Send> Send for Heap<G> {}

/// dlmalloc over `G`, serialized by an allocation-free lock.
pub struct EmbeddedBackend<G> {
    heap: Mutex<Heap<G>>,
}

impl<G> EmbeddedBackend<G> {
    pub const fn new(provider: G) -> Self {
        EmbeddedBackend {
            heap: Mutex::new(Heap(Dlmalloc::new_with_allocator(GrowthSource { provider }))),
        }
    }
}

impl<G: GrowthProvider> EmbeddedBackend<G> {
    unsafe fn allocate_block(&self, alignment: usize, size: usize, zeroed: bool) -> *mut u8 {
        // Alignment is honored. Values that are not powers of two cannot be
        // honored and fall back to the default.
        let align = if alignment.is_power_of_two() {
            alignment.max(MIN_ALIGN)
        } else {
            MIN_ALIGN
        };
        let total = match size.checked_add(align) {
            Some(t) => t,
            None => return ptr::null_mut(),
        };

        let base = {
            let mut heap = self.heap.lock();
            if zeroed {
                heap.0.calloc(total, align)
            } else {
                heap.0.malloc(total, align)
            }
        };
        if base.is_null() {
            return ptr::null_mut();
        }

        let user = base.add(align);
        write_header(user, BlockHeader { size, align });
        user
    }
}

#[inline]
unsafe fn header_of(user: *mut u8) -> *mut BlockHeader {
    (user as *mut BlockHeader).sub(1)
}

#[inline]
unsafe fn read_header(user: *mut u8) -> BlockHeader {
    ptr::read(header_of(user))
}

#[inline]
unsafe fn write_header(user: *mut u8, header: BlockHeader) {
    ptr::write(header_of(user), header);
}

unsafe impl<G: GrowthProvider> MemoryBackend for EmbeddedBackend<G> {
    unsafe fn allocate(&self, size: usize) -> *mut u8 {
        self.allocate_block(MIN_ALIGN, size, false)
    }

    unsafe fn aligned_allocate(&self, alignment: usize, size: usize) -> *mut u8 {
        self.allocate_block(alignment, size, false)
    }

    unsafe fn zero_allocate(&self, count: usize, size: usize) -> *mut u8 {
        match count.checked_mul(size) {
            Some(total) => self.allocate_block(MIN_ALIGN, total, true),
            None => ptr::null_mut(),
        }
    }

    unsafe fn aligned_zero_allocate(&self, alignment: usize, count: usize, size: usize) -> *mut u8 {
        match count.checked_mul(size) {
            Some(total) => self.allocate_block(alignment, total, true),
            None => ptr::null_mut(),
        }
    }

    unsafe fn reallocate(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
        if ptr.is_null() {
            return self.allocate(new_size);
        }
        let old = read_header(ptr);
        let new_total = match new_size.checked_add(old.align) {
            Some(t) => t,
            None => return ptr::null_mut(),
        };

        let base = {
            let mut heap = self.heap.lock();
            heap.0
                .realloc(ptr.sub(old.align), old.size + old.align, old.align, new_total)
        };
        if base.is_null() {
            return ptr::null_mut();
        }

        let user = base.add(old.align);
        write_header(
            user,
            BlockHeader {
                size: new_size,
                align: old.align,
            },
        );
        user
    }

    unsafe fn free(&self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }
        let header = read_header(ptr);
        let mut heap = self.heap.lock();
        heap.0
            .free(ptr.sub(header.align), header.size + header.align, header.align);
    }
}
