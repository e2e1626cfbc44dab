#![no_main]

use heapfacade::{aligned_allocate, allocate, free, reallocate, zero_allocate};
use libfuzzer_sys::fuzz_target;

/// Interprets the input as a sequence of facade operations.
///
/// Each operation is four bytes:
///   byte 0: opcode (0=allocate, 1=free, 2=reallocate, 3=zero_allocate,
///           4=aligned_allocate)
///   byte 1-2: size (little-endian u16)
///   byte 3: slot index
///
/// Every live block carries a fill byte derived from its slot, checked before
/// the block is resized or released.
const MAX_SLOTS: usize = 64;

fn fill(slot: usize) -> u8 {
    (slot as u8) ^ 0xA5
}

unsafe fn check(ptr: *mut u8, len: usize, slot: usize) {
    for j in 0..len.min(256) {
        assert_eq!(*ptr.add(j), fill(slot), "slot {} corrupted at offset {}", slot, j);
    }
}

fuzz_target!(|data: &[u8]| {
    let mut slots: [*mut u8; MAX_SLOTS] = [std::ptr::null_mut(); MAX_SLOTS];
    let mut sizes: [usize; MAX_SLOTS] = [0; MAX_SLOTS];

    let mut i = 0;
    while i + 4 <= data.len() {
        let opcode = data[i] % 5;
        let size = u16::from_le_bytes([data[i + 1], data[i + 2]]) as usize;
        let slot = (data[i + 3] as usize) % MAX_SLOTS;
        i += 4;

        unsafe {
            match opcode {
                1 => {
                    check(slots[slot], sizes[slot], slot);
                    free(slots[slot]);
                    slots[slot] = std::ptr::null_mut();
                    sizes[slot] = 0;
                    continue;
                }
                2 => {
                    check(slots[slot], sizes[slot], slot);
                    let ptr = reallocate(slots[slot], size);
                    if ptr.is_null() {
                        // The old block is still valid.
                        continue;
                    }
                    check(ptr, sizes[slot].min(size), slot);
                    slots[slot] = ptr;
                }
                0 | 3 | 4 => {
                    free(slots[slot]);
                    let ptr = match opcode {
                        0 => allocate(size),
                        3 => {
                            let count = (size >> 8).max(1);
                            let elem = (size & 0xFF).max(1);
                            let ptr = zero_allocate(count, elem);
                            if !ptr.is_null() {
                                for j in 0..(count * elem).min(256) {
                                    assert_eq!(*ptr.add(j), 0, "zero_allocate dirty at {}", j);
                                }
                            }
                            ptr
                        }
                        _ => {
                            let alignment = 1usize << (size % 13);
                            let ptr = aligned_allocate(alignment, size);
                            if !ptr.is_null() {
                                assert_eq!(ptr as usize % alignment, 0);
                            }
                            ptr
                        }
                    };
                    slots[slot] = ptr;
                    if ptr.is_null() {
                        sizes[slot] = 0;
                        continue;
                    }
                    if opcode == 3 {
                        sizes[slot] = (size >> 8).max(1) * (size & 0xFF).max(1);
                    } else {
                        sizes[slot] = size;
                    }
                }
                _ => unreachable!(),
            }
            std::ptr::write_bytes(slots[slot], fill(slot), sizes[slot].min(256));
        }
    }

    for slot in &mut slots {
        unsafe { free(*slot) };
        *slot = std::ptr::null_mut();
    }
});
