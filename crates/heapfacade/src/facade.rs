//! The six allocation primitives.
//!
//! Each forwards unconditionally to [`backend::selected()`]. The facade keeps
//! no state of its own, validates nothing, and reports every failure as a
//! null pointer.

use crate::backend::{self, MemoryBackend};
#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
use crate::growth::{GrowthObserver, GrowthProvider};

/// Allocate `size` bytes. `allocate(0)` returns null or a freeable pointer.
///
/// # Safety
/// The result must be released with [`free`] or [`reallocate`].
#[inline]
pub unsafe fn allocate(size: usize) -> *mut u8 {
    backend::selected().allocate(size)
}

/// Allocate `size` bytes aligned to `alignment`, which must be a power of two.
///
/// # Safety
/// As [`allocate`].
#[inline]
pub unsafe fn aligned_allocate(alignment: usize, size: usize) -> *mut u8 {
    backend::selected().aligned_allocate(alignment, size)
}

/// Allocate `count * size` zeroed bytes. Null if the product overflows.
///
/// # Safety
/// As [`allocate`].
#[inline]
pub unsafe fn zero_allocate(count: usize, size: usize) -> *mut u8 {
    backend::selected().zero_allocate(count, size)
}

/// [`zero_allocate`] with an alignment, which must be a power of two.
///
/// # Safety
/// As [`allocate`].
#[inline]
pub unsafe fn aligned_zero_allocate(alignment: usize, count: usize, size: usize) -> *mut u8 {
    backend::selected().aligned_zero_allocate(alignment, count, size)
}

/// Resize the block at `ptr` to `new_size`, preserving the first
/// `min(old, new)` bytes. A null `ptr` behaves as [`allocate`]. On null
/// return the old block is untouched and must still be freed.
///
/// # Safety
/// `ptr` must be null or a live pointer from this facade.
#[inline]
pub unsafe fn reallocate(ptr: *mut u8, new_size: usize) -> *mut u8 {
    backend::selected().reallocate(ptr, new_size)
}

/// Release a block. Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a live pointer from this facade; double free is
/// undefined behavior.
#[inline]
pub unsafe fn free(ptr: *mut u8) {
    backend::selected().free(ptr)
}

/// Unit of memory growth for this environment: 64 KiB on wasm32, the OS page
/// size elsewhere.
#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
pub fn page_size() -> usize {
    crate::growth::provider().page_size()
}

/// Register a callback run after the linear memory grows, so components that
/// track address-space bounds can resynchronize. Returns `false` where the
/// growth provider has no observers (the heap-break variant).
#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
pub fn set_growth_observer(observer: GrowthObserver) -> bool {
    crate::growth::provider().set_observer(observer)
}
