//! Growth providers: the only way the embedded backend obtains memory.
//!
//! A provider extends the backing region by a signed byte delta and reports
//! the unit it grows in. Exactly one provider type is selected per target:
//!
//! - wasm32: [`linear::LinearGrowth`] over the engine's linear memory.
//! - Linux/macOS: [`brk::BreakGrowth`] over `sbrk(2)`.

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub mod brk;
pub mod linear;

/// Returned by [`GrowthProvider::grow`] when the environment refuses.
///
/// All-ones, matching `sbrk`'s `(void *)-1`; never a valid block base.
pub const GROWTH_FAILED: *mut u8 = usize::MAX as *mut u8;

/// Callback invoked after the region has grown, with the base of the new
/// block and its length in bytes.
pub type GrowthObserver = fn(base: *mut u8, len: usize);

/// Source of backing memory for the embedded allocator.
///
/// # Safety
/// A non-failing `grow(delta)` with `delta > 0` must return the base of at
/// least `delta` bytes of readable and writable memory that nothing else in
/// the process will hand out. Implementations hold no lock; callers must
/// serialize concurrent `grow` calls.
pub unsafe trait GrowthProvider: Send + Sync {
    /// Grow by `delta` bytes.
    ///
    /// Returns the previous top of the region, which is the base of the new
    /// block, or [`GROWTH_FAILED`]. Negative deltas always fail; zero
    /// returns the current top without growing.
    ///
    /// # Safety
    /// Must not race with another `grow` on the same region.
    unsafe fn grow(&self, delta: isize) -> *mut u8;

    /// Minimal unit of growth, in bytes.
    fn page_size(&self) -> usize;

    /// Whether freshly grown memory is guaranteed to read as zero.
    fn grows_zeroed(&self) -> bool {
        false
    }

    /// Register a callback fired after each successful growth. Returns
    /// `false` if this provider has no notion of observers.
    fn set_observer(&self, observer: GrowthObserver) -> bool {
        let _ = observer;
        false
    }
}

unsafe impl<G: GrowthProvider + ?Sized> GrowthProvider for &G {
    #[inline]
    unsafe fn grow(&self, delta: isize) -> *mut u8 {
        (**self).grow(delta)
    }

    #[inline]
    fn page_size(&self) -> usize {
        (**self).page_size()
    }

    #[inline]
    fn grows_zeroed(&self) -> bool {
        (**self).grows_zeroed()
    }

    #[inline]
    fn set_observer(&self, observer: GrowthObserver) -> bool {
        (**self).set_observer(observer)
    }
}

#[cfg(target_arch = "wasm32")]
pub type Selected = linear::LinearGrowth<linear::Wasm32Memory>;

#[cfg(all(
    not(target_arch = "wasm32"),
    any(target_os = "linux", target_os = "macos")
))]
pub type Selected = brk::BreakGrowth;

#[cfg(target_arch = "wasm32")]
pub(crate) static PROVIDER: Selected = linear::LinearGrowth::new(linear::Wasm32Memory);

#[cfg(all(
    not(target_arch = "wasm32"),
    any(target_os = "linux", target_os = "macos")
))]
pub(crate) static PROVIDER: Selected = brk::BreakGrowth::new();

/// The process-wide growth provider for this target.
#[cfg(any(target_arch = "wasm32", target_os = "linux", target_os = "macos"))]
#[inline(always)]
pub fn provider() -> &'static Selected {
    &PROVIDER
}
