//! Linear-memory growth over a simulated wasm memory.

#![cfg(any(target_os = "linux", target_os = "macos"))]

use heapfacade::growth::linear::{LinearGrowth, LinearMemory, SimulatedMemory, LINEAR_PAGE_SIZE};
use heapfacade::{GrowthProvider, GROWTH_FAILED};

fn provider(initial_pages: usize, max_pages: usize) -> LinearGrowth<SimulatedMemory> {
    LinearGrowth::new(SimulatedMemory::new(initial_pages, max_pages).expect("reserve simulated memory"))
}

#[test]
fn page_size_is_fixed() {
    let g = provider(0, 1);
    assert_eq!(g.page_size(), 65536);
    assert_eq!(g.page_size(), LINEAR_PAGE_SIZE);
}

#[test]
fn one_byte_rounds_up_to_one_page() {
    let g = provider(1, 8);
    let before = g.region_size();
    let base = unsafe { g.grow(1) };
    assert_ne!(base, GROWTH_FAILED);
    assert_eq!(base, unsafe { g.memory().base().add(before) });
    assert_eq!(g.region_size() - before, g.page_size());
}

#[test]
fn grown_block_is_usable() {
    let g = provider(0, 4);
    unsafe {
        let base = g.grow(3 * LINEAR_PAGE_SIZE as isize - 7);
        assert_ne!(base, GROWTH_FAILED);
        std::ptr::write_bytes(base, 0xA5, 3 * LINEAR_PAGE_SIZE);
        assert_eq!(base.add(3 * LINEAR_PAGE_SIZE - 1).read(), 0xA5);
    }
    assert_eq!(g.memory().size(), 3);
}

#[test]
fn fresh_pages_read_as_zero() {
    let g = provider(0, 2);
    assert!(g.grows_zeroed());
    unsafe {
        let base = g.grow(LINEAR_PAGE_SIZE as isize);
        let page = std::slice::from_raw_parts(base, LINEAR_PAGE_SIZE);
        assert!(page.iter().all(|&b| b == 0));
    }
}

#[test]
fn region_size_never_decreases() {
    let g = provider(0, 64);
    let mut last = g.region_size();
    for delta in [1isize, 65536, 65537, 0, -1, 200_000, -65536, 3, 1 << 20, isize::MIN] {
        let before_top = g.top();
        let base = unsafe { g.grow(delta) };
        let size = g.region_size();
        assert!(size >= last, "region shrank from {} to {} on grow({})", last, size, delta);
        if delta > 0 && base != GROWTH_FAILED {
            // The new block starts at the previous top.
            assert_eq!(base, before_top);
        }
        last = size;
    }
}

#[test]
fn negative_delta_always_fails() {
    let g = provider(2, 8);
    for delta in [-1isize, -65536, isize::MIN] {
        assert_eq!(unsafe { g.grow(delta) }, GROWTH_FAILED);
        assert_eq!(g.memory().size(), 2);
    }
}

#[test]
fn zero_delta_returns_top_unchanged() {
    let g = provider(3, 8);
    let top = g.top();
    assert_eq!(unsafe { g.grow(0) }, top);
    assert_eq!(unsafe { g.grow(0) }, top);
    assert_eq!(g.memory().size(), 3);
}

#[test]
fn growth_past_the_limit_fails() {
    let g = provider(0, 2);
    assert_ne!(unsafe { g.grow(4096) }, GROWTH_FAILED);
    assert_ne!(unsafe { g.grow(4096) }, GROWTH_FAILED);
    assert_eq!(unsafe { g.grow(4096) }, GROWTH_FAILED);
    assert_eq!(g.memory().size(), 2);
    // A request that would straddle the limit fails whole.
    let g = provider(1, 2);
    assert_eq!(unsafe { g.grow(2 * LINEAR_PAGE_SIZE as isize) }, GROWTH_FAILED);
    assert_eq!(g.memory().size(), 1);
}

#[test]
fn inconsistent_reservations_are_refused() {
    assert!(SimulatedMemory::new(0, 0).is_none());
    assert!(SimulatedMemory::new(5, 4).is_none());
    assert!(SimulatedMemory::new(0, usize::MAX).is_none());
}
