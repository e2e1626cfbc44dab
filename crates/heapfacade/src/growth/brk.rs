use super::{GrowthProvider, GROWTH_FAILED};
use crate::{init, platform, util};

/// Growth through the process heap break.
///
/// `grow` hands positive and zero deltas to `sbrk` and returns whatever it
/// returns; the OS already works in pages, so nothing is rounded here.
/// Negative deltas are refused before they reach the OS: memory handed to
/// the allocator is never given back.
pub struct BreakGrowth;

impl BreakGrowth {
    pub const fn new() -> Self {
        BreakGrowth
    }
}

impl Default for BreakGrowth {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GrowthProvider for BreakGrowth {
    #[inline]
    unsafe fn grow(&self, delta: isize) -> *mut u8 {
        if delta < 0 {
            return GROWTH_FAILED;
        }
        platform::move_break(delta)
    }

    fn page_size(&self) -> usize {
        init::ensure_initialized();
        util::page_size()
    }
}
