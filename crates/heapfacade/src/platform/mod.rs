//! Raw environment primitives: anonymous mappings, the heap break, the OS
//! page size, and the wasm32 linear-memory intrinsics.

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "linux")]
pub use linux as sys;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(target_os = "macos")]
pub use macos as sys;

#[cfg(target_arch = "wasm32")]
pub mod wasm32;

/// Map anonymous read-write memory. Returns null on failure.
///
/// # Safety
/// Caller must ensure `size` is page-aligned and non-zero.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[inline]
pub unsafe fn map_anonymous(size: usize) -> *mut u8 {
    sys::map_anonymous(size)
}

/// Unmap previously mapped memory.
///
/// # Safety
/// `ptr` must have been returned by `map_anonymous` and `size` must match.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[inline]
pub unsafe fn unmap(ptr: *mut u8, size: usize) {
    sys::unmap(ptr, size);
}

/// Move the heap break by `delta` bytes.
///
/// Returns the previous break, or the all-ones pointer when the OS refuses.
///
/// # Safety
/// Moving the break changes memory that other code in the process may
/// consider its own.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[inline]
pub unsafe fn move_break(delta: isize) -> *mut u8 {
    sys::move_break(delta)
}

/// Query the OS page size. Returns 0 if the query fails.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[inline]
pub fn query_page_size() -> usize {
    sys::query_page_size()
}
