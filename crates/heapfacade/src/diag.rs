//! Allocation-free diagnostics.
//!
//! Messages go straight to file descriptor 2. Formatting happens on the
//! stack because these paths run while an allocation is in progress.

use crate::config;

/// Write `msg` to stderr. A no-op where there is no stderr.
#[cold]
pub fn report(msg: &[u8]) {
    #[cfg(unix)]
    unsafe {
        libc::write(2, msg.as_ptr() as *const libc::c_void, msg.len());
    }
    #[cfg(not(unix))]
    let _ = msg;
}

/// The environment refused to grow the region by `bytes`. Returns whether a
/// line was written.
#[cold]
pub fn growth_rejected(bytes: usize) -> bool {
    if config::trace_level() < config::TRACE_REJECTIONS {
        return false;
    }
    report_event(b"heapfacade: growth of ", bytes, b" bytes rejected\n");
    true
}

/// The region grew by `bytes`. Returns whether a line was written.
pub fn growth_granted(bytes: usize) -> bool {
    if config::trace_level() < config::TRACE_ALL {
        return false;
    }
    report_event(b"heapfacade: grew region by ", bytes, b" bytes\n");
    true
}

fn report_event(prefix: &[u8], value: usize, suffix: &[u8]) {
    let mut line = [0u8; 96];
    let mut digits = [0u8; 20];
    let number = format_usize(value, &mut digits);

    let mut len = 0;
    for part in [prefix, number, suffix] {
        let end = (len + part.len()).min(line.len());
        line[len..end].copy_from_slice(&part[..end - len]);
        len = end;
    }
    report(&line[..len]);
}

/// Decimal rendering of `value` into the tail of `buf`.
fn format_usize(mut value: usize, buf: &mut [u8; 20]) -> &[u8] {
    let mut pos = buf.len();
    loop {
        pos -= 1;
        buf[pos] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[pos..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_follow_the_trace_level() {
        config::set_trace_level(config::TRACE_OFF);
        assert!(!growth_rejected(4096));
        assert!(!growth_granted(4096));

        config::set_trace_level(config::TRACE_REJECTIONS);
        assert!(growth_rejected(4096));
        assert!(!growth_granted(4096));

        config::set_trace_level(config::TRACE_ALL);
        assert!(growth_rejected(4096));
        assert!(growth_granted(4096));

        config::set_trace_level(config::TRACE_OFF);
    }

    #[test]
    fn formats_decimal() {
        let mut buf = [0u8; 20];
        assert_eq!(format_usize(0, &mut buf), b"0");
        assert_eq!(format_usize(65536, &mut buf), b"65536");
        assert_eq!(
            format_usize(usize::MAX, &mut buf),
            usize::MAX.to_string().as_bytes()
        );
    }
}
