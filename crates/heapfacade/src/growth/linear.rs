//! Growth over a single grow-only linear memory, as exposed by wasm engines.
//!
//! The memory grows in fixed 64 KiB pages and never shrinks. There is no heap
//! break: the "top" of the region is simply its current size.

use super::{GrowthObserver, GrowthProvider, GROWTH_FAILED};
use crate::util::checked_align_up;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Page size of wasm linear memory. Fixed by the architecture.
pub const LINEAR_PAGE_SIZE: usize = 65536;

/// The environment intrinsics a linear memory offers.
///
/// # Safety
/// `base() + size() * LINEAR_PAGE_SIZE` bytes starting at `base()` must be
/// addressable, and a successful `grow` must extend that range in place.
pub unsafe trait LinearMemory: Send + Sync {
    /// Address of byte 0 of the memory.
    fn base(&self) -> *mut u8;

    /// Current size in pages.
    fn size(&self) -> usize;

    /// Grow by `pages`. Returns the previous size in pages, or `usize::MAX`
    /// if the memory cannot grow that far.
    fn grow(&self, pages: usize) -> usize;
}

/// [`GrowthProvider`] over a [`LinearMemory`].
pub struct LinearGrowth<M> {
    memory: M,
    /// `GrowthObserver` stored as an address, 0 when unset.
    observer: AtomicUsize,
}

impl<M> LinearGrowth<M> {
    pub const fn new(memory: M) -> Self {
        Self {
            memory,
            observer: AtomicUsize::new(0),
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn clear_observer(&self) {
        self.observer.store(0, Ordering::Release);
    }

    fn notify(&self, base: *mut u8, len: usize) {
        let f = self.observer.load(Ordering::Acquire);
        if f != 0 {
            let observer: GrowthObserver = unsafe { core::mem::transmute(f) };
            observer(base, len);
        }
    }
}

impl<M: LinearMemory> LinearGrowth<M> {
    /// Current end of the region, or [`GROWTH_FAILED`] when the end lies past
    /// the address space (a full 4 GiB memory on wasm32).
    pub fn top(&self) -> *mut u8 {
        self.address_of_page(self.memory.size()).unwrap_or(GROWTH_FAILED)
    }

    /// Current size of the region in bytes, saturating at `usize::MAX`.
    pub fn region_size(&self) -> usize {
        self.memory.size().saturating_mul(LINEAR_PAGE_SIZE)
    }

    fn address_of_page(&self, page: usize) -> Option<*mut u8> {
        let offset = page.checked_mul(LINEAR_PAGE_SIZE)?;
        let addr = (self.memory.base() as usize).checked_add(offset)?;
        if addr == GROWTH_FAILED as usize {
            return None;
        }
        Some(addr as *mut u8)
    }
}

unsafe impl<M: LinearMemory> GrowthProvider for LinearGrowth<M> {
    unsafe fn grow(&self, delta: isize) -> *mut u8 {
        if delta < 0 {
            return GROWTH_FAILED;
        }
        if delta == 0 {
            return self.top();
        }

        let bytes = match checked_align_up(delta as usize, LINEAR_PAGE_SIZE) {
            Some(b) => b,
            None => return GROWTH_FAILED,
        };
        let previous = self.memory.grow(bytes / LINEAR_PAGE_SIZE);
        if previous == usize::MAX {
            return GROWTH_FAILED;
        }

        // The old top is the base of the block we just gained.
        let base = match self.address_of_page(previous) {
            Some(base) => base,
            None => return GROWTH_FAILED,
        };
        self.notify(base, bytes);
        base
    }

    #[inline]
    fn page_size(&self) -> usize {
        LINEAR_PAGE_SIZE
    }

    #[inline]
    fn grows_zeroed(&self) -> bool {
        true
    }

    fn set_observer(&self, observer: GrowthObserver) -> bool {
        self.observer.store(observer as usize, Ordering::Release);
        true
    }
}

/// Linear memory 0 of the running wasm instance.
#[cfg(target_arch = "wasm32")]
pub struct Wasm32Memory;

#[cfg(target_arch = "wasm32")]
unsafe impl LinearMemory for Wasm32Memory {
    #[inline]
    fn base(&self) -> *mut u8 {
        core::ptr::null_mut()
    }

    #[inline]
    fn size(&self) -> usize {
        crate::platform::wasm32::memory_pages()
    }

    #[inline]
    fn grow(&self, pages: usize) -> usize {
        crate::platform::wasm32::grow_pages(pages)
    }
}

/// A linear memory emulated inside a fixed anonymous mapping.
///
/// Lets the linear-memory provider and the embedded backend run on a host
/// with the same page size, the same grow-only contract, and a hard maximum
/// that stands in for the engine's memory limit.
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub struct SimulatedMemory {
    base: *mut u8,
    max_pages: usize,
    pages: AtomicUsize,
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl Send for SimulatedMemory {}
#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl Sync for SimulatedMemory {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl SimulatedMemory {
    /// Reserve room for `max_pages` pages, `initial_pages` of them live.
    /// Returns `None` if the reservation fails or the sizes are inconsistent.
    pub fn new(initial_pages: usize, max_pages: usize) -> Option<Self> {
        if max_pages == 0 || initial_pages > max_pages {
            return None;
        }
        let len = max_pages.checked_mul(LINEAR_PAGE_SIZE)?;
        let base = unsafe { crate::platform::map_anonymous(len) };
        if base.is_null() {
            return None;
        }
        Some(SimulatedMemory {
            base,
            max_pages,
            pages: AtomicUsize::new(initial_pages),
        })
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl LinearMemory for SimulatedMemory {
    fn base(&self) -> *mut u8 {
        self.base
    }

    fn size(&self) -> usize {
        self.pages.load(Ordering::Acquire)
    }

    fn grow(&self, pages: usize) -> usize {
        let mut current = self.pages.load(Ordering::Relaxed);
        loop {
            let next = match current.checked_add(pages) {
                Some(n) if n <= self.max_pages => n,
                _ => return usize::MAX,
            };
            match self.pages.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return current,
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl Drop for SimulatedMemory {
    fn drop(&mut self) {
        unsafe { crate::platform::unmap(self.base, self.max_pages * LINEAR_PAGE_SIZE) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Page counter with no backing storage; addresses start at 0 like wasm.
    struct CountingMemory {
        pages: AtomicUsize,
        max_pages: usize,
    }

    impl CountingMemory {
        fn new(pages: usize, max_pages: usize) -> Self {
            CountingMemory {
                pages: AtomicUsize::new(pages),
                max_pages,
            }
        }
    }

    unsafe impl LinearMemory for CountingMemory {
        fn base(&self) -> *mut u8 {
            core::ptr::null_mut()
        }

        fn size(&self) -> usize {
            self.pages.load(Ordering::Relaxed)
        }

        fn grow(&self, pages: usize) -> usize {
            let current = self.pages.load(Ordering::Relaxed);
            if current.saturating_add(pages) > self.max_pages {
                return usize::MAX;
            }
            self.pages.store(current + pages, Ordering::Relaxed);
            current
        }
    }

    #[test]
    fn one_byte_grows_one_page() {
        let g = LinearGrowth::new(CountingMemory::new(2, 16));
        let base = unsafe { g.grow(1) };
        assert_eq!(base as usize, 2 * LINEAR_PAGE_SIZE);
        assert_eq!(g.region_size(), 3 * LINEAR_PAGE_SIZE);
    }

    #[test]
    fn exact_page_multiple_is_not_rounded_further() {
        let g = LinearGrowth::new(CountingMemory::new(0, 16));
        unsafe { g.grow(2 * LINEAR_PAGE_SIZE as isize) };
        assert_eq!(g.memory().size(), 2);
    }

    #[test]
    fn zero_delta_reports_top_without_growing() {
        let g = LinearGrowth::new(CountingMemory::new(5, 16));
        assert_eq!(unsafe { g.grow(0) } as usize, 5 * LINEAR_PAGE_SIZE);
        assert_eq!(g.memory().size(), 5);
    }

    #[test]
    fn negative_delta_fails_and_keeps_size() {
        let g = LinearGrowth::new(CountingMemory::new(3, 16));
        assert_eq!(unsafe { g.grow(-1) }, GROWTH_FAILED);
        assert_eq!(unsafe { g.grow(isize::MIN) }, GROWTH_FAILED);
        assert_eq!(g.memory().size(), 3);
    }

    #[test]
    fn oversized_delta_is_refused() {
        let g = LinearGrowth::new(CountingMemory::new(0, 16));
        assert_eq!(unsafe { g.grow(isize::MAX) }, GROWTH_FAILED);
        assert_eq!(g.memory().size(), 0);
    }

    #[test]
    fn refused_growth_returns_sentinel() {
        let g = LinearGrowth::new(CountingMemory::new(15, 16));
        assert_eq!(unsafe { g.grow(2 * LINEAR_PAGE_SIZE as isize) }, GROWTH_FAILED);
        assert_eq!(g.memory().size(), 15);
    }

    #[test]
    fn full_address_space_does_not_overflow() {
        // One page more than a usize can address.
        let pages = usize::MAX / LINEAR_PAGE_SIZE + 1;
        let g = LinearGrowth::new(CountingMemory::new(pages, pages));
        assert_eq!(g.region_size(), usize::MAX);
        assert_eq!(g.top(), GROWTH_FAILED);
        assert_eq!(unsafe { g.grow(0) }, GROWTH_FAILED);
        assert_eq!(unsafe { g.grow(1) }, GROWTH_FAILED);
        assert_eq!(g.memory().size(), pages);
    }

    static SEEN_BASE: AtomicUsize = AtomicUsize::new(0);
    static SEEN_LEN: AtomicUsize = AtomicUsize::new(0);

    fn record(base: *mut u8, len: usize) {
        SEEN_BASE.store(base as usize, Ordering::SeqCst);
        SEEN_LEN.store(len, Ordering::SeqCst);
    }

    #[test]
    fn observer_sees_each_successful_growth() {
        let g = LinearGrowth::new(CountingMemory::new(1, 4));
        assert!(g.set_observer(record));

        unsafe { g.grow(100) };
        assert_eq!(SEEN_BASE.load(Ordering::SeqCst), LINEAR_PAGE_SIZE);
        assert_eq!(SEEN_LEN.load(Ordering::SeqCst), LINEAR_PAGE_SIZE);

        // Refused and zero-sized requests do not notify.
        SEEN_LEN.store(0, Ordering::SeqCst);
        unsafe { g.grow(10 * LINEAR_PAGE_SIZE as isize) };
        unsafe { g.grow(0) };
        assert_eq!(SEEN_LEN.load(Ordering::SeqCst), 0);

        g.clear_observer();
        unsafe { g.grow(1) };
        assert_eq!(SEEN_LEN.load(Ordering::SeqCst), 0);
    }
}
