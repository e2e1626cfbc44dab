use crate::{config, util};
use core::sync::atomic::{AtomicU8, Ordering};

const UNINIT: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

static INIT_STATE: AtomicU8 = AtomicU8::new(UNINIT);

/// Library constructor -- called before main().
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[used]
#[cfg_attr(target_os = "linux", link_section = ".init_array")]
#[cfg_attr(target_os = "macos", link_section = "__DATA,__mod_init_func")]
static CTOR: unsafe extern "C" fn() = {
    unsafe extern "C" fn init() {
        heapfacade_init();
    }
    init
};

/// Cache the OS page size and read the environment. Idempotent; concurrent
/// callers wait for the first one to finish.
///
/// Nothing here allocates, so it is safe to reach from inside an allocation.
pub unsafe fn heapfacade_init() {
    match INIT_STATE.compare_exchange(UNINIT, INITIALIZING, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {}
        Err(INITIALIZING) => {
            while INIT_STATE.load(Ordering::Acquire) == INITIALIZING {
                core::hint::spin_loop();
            }
            return;
        }
        Err(_) => return,
    }

    util::init_page_size();
    config::read_config();

    INIT_STATE.store(READY, Ordering::Release);
}

#[inline]
pub fn ensure_initialized() {
    if INIT_STATE.load(Ordering::Acquire) != READY {
        init_slow();
    }
}

#[cold]
#[inline(never)]
fn init_slow() {
    unsafe { heapfacade_init() }
}

#[inline(always)]
pub fn is_ready() -> bool {
    INIT_STATE.load(Ordering::Acquire) == READY
}
