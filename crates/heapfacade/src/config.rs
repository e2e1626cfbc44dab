use core::sync::atomic::{AtomicUsize, Ordering};

/// Growth diagnostics are off.
pub const TRACE_OFF: usize = 0;
/// Report growth the environment refused.
pub const TRACE_REJECTIONS: usize = 1;
/// Report every growth, successful or not.
pub const TRACE_ALL: usize = 2;

/// Cached config values (read once at init, never allocate).
static TRACE_LEVEL: AtomicUsize = AtomicUsize::new(TRACE_OFF);

/// Read configuration from environment variables.
///
/// # Safety
/// Must be called from single-threaded context (init).
#[cfg(unix)]
pub unsafe fn read_config() {
    let key = b"HEAPFACADE_TRACE\0";
    let val = libc::getenv(key.as_ptr() as *const libc::c_char);
    let raw = if val.is_null() {
        None
    } else {
        Some(core::ffi::CStr::from_ptr(val).to_bytes())
    };
    TRACE_LEVEL.store(level_from(raw), Ordering::Relaxed);
}

/// No environment to read on other targets; everything stays at defaults.
#[cfg(not(unix))]
pub unsafe fn read_config() {}

pub fn trace_level() -> usize {
    TRACE_LEVEL.load(Ordering::Relaxed)
}

#[cfg(test)]
pub(crate) fn set_trace_level(level: usize) {
    TRACE_LEVEL.store(level, Ordering::Relaxed);
}

/// Map a raw `HEAPFACADE_TRACE` value to a level. Unset is off, numbers are
/// capped at [`TRACE_ALL`], and anything else (including empty) counts as
/// [`TRACE_REJECTIONS`].
fn level_from(raw: Option<&[u8]>) -> usize {
    match raw {
        None => TRACE_OFF,
        Some(bytes) => match parse_usize(bytes) {
            Some(level) => level.min(TRACE_ALL),
            None => TRACE_REJECTIONS,
        },
    }
}

/// Parse a decimal string without allocating.
/// Empty strings and non-digits yield `None`; overflow saturates.
fn parse_usize(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() {
        return None;
    }
    let mut result: usize = 0;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return None;
        }
        result = result.saturating_mul(10).saturating_add((byte - b'0') as usize);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_digits() {
        assert_eq!(parse_usize(b"0"), Some(0));
        assert_eq!(parse_usize(b"2"), Some(2));
        assert_eq!(parse_usize(b"4096"), Some(4096));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_usize(b""), None);
        assert_eq!(parse_usize(b"yes"), None);
        assert_eq!(parse_usize(b"12a"), None);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(parse_usize(b"99999999999999999999999"), Some(usize::MAX));
    }

    #[test]
    fn unset_trace_is_off() {
        assert_eq!(level_from(None), TRACE_OFF);
    }

    #[test]
    fn numeric_trace_levels_are_capped() {
        assert_eq!(level_from(Some(b"0")), TRACE_OFF);
        assert_eq!(level_from(Some(b"1")), TRACE_REJECTIONS);
        assert_eq!(level_from(Some(b"2")), TRACE_ALL);
        assert_eq!(level_from(Some(b"7")), TRACE_ALL);
        assert_eq!(level_from(Some(b"99999999999999999999999")), TRACE_ALL);
    }

    #[test]
    fn empty_or_garbage_trace_reports_rejections() {
        assert_eq!(level_from(Some(b"")), TRACE_REJECTIONS);
        assert_eq!(level_from(Some(b"yes")), TRACE_REJECTIONS);
    }
}
