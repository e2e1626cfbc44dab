use core::ptr;

extern "C" {
    // Darwin declares the increment as `int`, unlike glibc's `intptr_t`.
    fn sbrk(increment: libc::c_int) -> *mut libc::c_void;
}

pub unsafe fn map_anonymous(size: usize) -> *mut u8 {
    let result = libc::mmap(
        ptr::null_mut(),
        size,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
    );
    if result == libc::MAP_FAILED {
        ptr::null_mut()
    } else {
        result as *mut u8
    }
}

pub unsafe fn unmap(ptr: *mut u8, size: usize) {
    libc::munmap(ptr as *mut libc::c_void, size);
}

pub unsafe fn move_break(delta: isize) -> *mut u8 {
    match libc::c_int::try_from(delta) {
        Ok(increment) => sbrk(increment) as *mut u8,
        Err(_) => usize::MAX as *mut u8,
    }
}

pub fn query_page_size() -> usize {
    let ps = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if ps > 0 { ps as usize } else { 0 }
}
