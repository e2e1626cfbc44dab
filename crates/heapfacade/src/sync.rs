use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicI32, Ordering};

const UNLOCKED: i32 = 0;
const LOCKED: i32 = 1;
const CONTENDED: i32 = 2;

/// Lock word for the embedded heap. Futex-backed on Linux, spinning
/// elsewhere (wasm32 is single-threaded in practice).
/// `std::sync::Mutex` is off limits: it may allocate.
pub struct RawLock {
    state: AtomicI32,
}

unsafe impl Send for RawLock {}
unsafe impl Sync for RawLock {}

impl RawLock {
    pub const fn new() -> Self {
        Self {
            state: AtomicI32::new(UNLOCKED),
        }
    }

    #[inline]
    pub fn lock(&self) {
        if self
            .state
            .compare_exchange(UNLOCKED, LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            return;
        }
        self.lock_contended();
    }

    #[cold]
    fn lock_contended(&self) {
        while self.state.swap(CONTENDED, Ordering::Acquire) != UNLOCKED {
            wait(&self.state);
        }
    }

    #[inline]
    pub fn unlock(&self) {
        if self.state.swap(UNLOCKED, Ordering::Release) == CONTENDED {
            wake_one(&self.state);
        }
    }
}

#[cfg(target_os = "linux")]
fn wait(state: &AtomicI32) {
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            state as *const AtomicI32,
            libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
            CONTENDED,
            core::ptr::null::<libc::timespec>(),
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn wait(_state: &AtomicI32) {
    core::hint::spin_loop();
}

#[cfg(target_os = "linux")]
#[cold]
fn wake_one(state: &AtomicI32) {
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            state as *const AtomicI32,
            libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
            1i32,
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn wake_one(_state: &AtomicI32) {}

/// Allocation-free mutex around a value.
pub struct Mutex<T> {
    raw: RawLock,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    pub const fn new(data: T) -> Self {
        Self {
            raw: RawLock::new(),
            data: UnsafeCell::new(data),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.raw.lock();
        MutexGuard { mutex: self }
    }
}

pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
}

impl<T> core::ops::Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> core::ops::DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.raw.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn guards_serialize_increments() {
        let counter = Arc::new(Mutex::new(0usize));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        *counter.lock() += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock(), 40_000);
    }
}
