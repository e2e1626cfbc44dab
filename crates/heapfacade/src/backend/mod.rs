//! The two allocation backends and the build-time choice between them.
//!
//! Exactly one backend is bound to the facade. `build.rs` sets
//! `cfg(embedded_backend)` when the `embedded` feature is on or the target is
//! bare wasm32; otherwise the host's libc allocator is used. Both backend
//! types stay available as plain types so either can be driven directly.

pub mod embedded;
#[cfg(not(all(target_arch = "wasm32", not(target_os = "wasi"))))]
pub mod native;

/// The six primitives every backend provides.
///
/// Failure is always a null return; nothing panics or unwinds.
///
/// # Safety
/// Non-null results must be valid for the requested size and stay valid
/// until passed to `free` or `reallocate` on the same backend.
pub unsafe trait MemoryBackend: Sync {
    /// `malloc`. `size == 0` yields null or a unique freeable pointer.
    unsafe fn allocate(&self, size: usize) -> *mut u8;

    /// `alignment` must be a power of two; other values give backend-defined
    /// results.
    unsafe fn aligned_allocate(&self, alignment: usize, size: usize) -> *mut u8;

    /// `calloc`. Null if `count * size` overflows.
    unsafe fn zero_allocate(&self, count: usize, size: usize) -> *mut u8;

    unsafe fn aligned_zero_allocate(&self, alignment: usize, count: usize, size: usize)
        -> *mut u8;

    /// `realloc`. On null return `ptr` is untouched and still owned by the
    /// caller.
    unsafe fn reallocate(&self, ptr: *mut u8, new_size: usize) -> *mut u8;

    /// `free`. Null is ignored.
    unsafe fn free(&self, ptr: *mut u8);
}

#[cfg(embedded_backend)]
pub type Selected = embedded::EmbeddedBackend<&'static crate::growth::Selected>;

#[cfg(embedded_backend)]
static SELECTED: Selected = embedded::EmbeddedBackend::new(&crate::growth::PROVIDER);

#[cfg(not(embedded_backend))]
pub type Selected = native::NativeBackend;

#[cfg(not(embedded_backend))]
static SELECTED: Selected = native::NativeBackend;

/// The backend this build binds the facade to. Lives for the whole process.
#[inline(always)]
pub fn selected() -> &'static Selected {
    &SELECTED
}
