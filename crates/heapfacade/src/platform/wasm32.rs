use core::arch::wasm32;

/// Current size of linear memory 0, in pages.
#[inline]
pub fn memory_pages() -> usize {
    wasm32::memory_size::<0>()
}

/// Grow linear memory 0 by `pages`. Returns the previous size in pages, or
/// `usize::MAX` when the engine refuses.
#[inline]
pub fn grow_pages(pages: usize) -> usize {
    wasm32::memory_grow::<0>(pages)
}
