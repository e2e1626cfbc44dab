use core::sync::atomic::{AtomicUsize, Ordering};

/// Align `value` up to the next multiple of `align`, a power of two.
/// `None` if that would wrap.
#[inline]
pub const fn checked_align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

/// Minimum alignment for all allocations (matches max_align_t on 64-bit).
pub const MIN_ALIGN: usize = 16;

/// Page size assumed until `init_page_size` has queried the OS.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

static PAGE_SIZE_CACHED: AtomicUsize = AtomicUsize::new(DEFAULT_PAGE_SIZE);

/// Initialize the page size from the OS. Must be called once during init.
///
/// # Safety
/// Must be called from single-threaded context (init).
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub unsafe fn init_page_size() {
    let ps = crate::platform::query_page_size();
    let ps = if ps.is_power_of_two() { ps } else { DEFAULT_PAGE_SIZE };
    PAGE_SIZE_CACHED.store(ps, Ordering::Release);
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub unsafe fn init_page_size() {}

/// OS page size. 4096 until initialization, the real value afterwards.
#[inline(always)]
pub fn page_size() -> usize {
    PAGE_SIZE_CACHED.load(Ordering::Relaxed)
}
