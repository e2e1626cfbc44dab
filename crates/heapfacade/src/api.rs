//! C ABI for the facade.
//!
//! Symbols carry a `heapfacade_` prefix so they never interpose the
//! platform allocator.

use crate::facade;
use core::ffi::c_void;

#[no_mangle]
pub unsafe extern "C" fn heapfacade_allocate(size: usize) -> *mut c_void {
    facade::allocate(size) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn heapfacade_aligned_allocate(alignment: usize, size: usize) -> *mut c_void {
    facade::aligned_allocate(alignment, size) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn heapfacade_zero_allocate(count: usize, size: usize) -> *mut c_void {
    facade::zero_allocate(count, size) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn heapfacade_aligned_zero_allocate(
    alignment: usize,
    count: usize,
    size: usize,
) -> *mut c_void {
    facade::aligned_zero_allocate(alignment, count, size) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn heapfacade_reallocate(ptr: *mut c_void, new_size: usize) -> *mut c_void {
    facade::reallocate(ptr as *mut u8, new_size) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn heapfacade_free(ptr: *mut c_void) {
    facade::free(ptr as *mut u8)
}

#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
#[no_mangle]
pub extern "C" fn heapfacade_page_size() -> usize {
    facade::page_size()
}
