//! Allocation facade with a build-time choice of backend.
//!
//! Six malloc-style primitives ([`allocate`], [`aligned_allocate`],
//! [`zero_allocate`], [`aligned_zero_allocate`], [`reallocate`], [`free`])
//! forward to exactly one backend:
//!
//! - the host C allocator (default), or
//! - dlmalloc growing its heap through a [`GrowthProvider`] (feature
//!   `embedded`, and always on bare wasm32).
//!
//! The growth provider is `sbrk` on Linux/macOS and `memory.grow` on wasm32.

extern crate libc;

pub mod api;
pub mod backend;
pub mod config;
pub mod diag;
pub mod facade;
pub mod global_alloc;
pub mod growth;
pub mod init;
pub mod platform;
pub mod sync;
pub mod util;

pub use facade::{
    aligned_allocate, aligned_zero_allocate, allocate, free, reallocate, zero_allocate,
};
#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
pub use facade::{page_size, set_growth_observer};
pub use global_alloc::FacadeAlloc;
pub use growth::{GrowthObserver, GrowthProvider, GROWTH_FAILED};
