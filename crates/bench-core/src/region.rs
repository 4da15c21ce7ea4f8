//! Page-aligned executable memory for a single snippet.
//!
//! Allocates a private anonymous mapping, copies the snippet bytes in while
//! the pages are still writable, then flips the mapping to read+execute.
//! The pages are never simultaneously writable and executable (W^X):
//! `mprotect` is the only operation that changes protection, and it always
//! moves strictly from RW to RX, never back.

use std::ffi::c_void;
use std::ptr;

/// Owns a page-aligned `mmap`ed region holding one snippet's machine code.
///
/// Construction either succeeds or aborts the process: allocation failure at
/// this layer means the host is out of virtual memory or `mprotect` is
/// unavailable, neither of which the caller can meaningfully recover from.
/// Dropping the region unmaps it; using `exec_ptr()` afterward is a program
/// error with no runtime check (the memory may already belong to something
/// else).
pub struct ExecutableRegion {
    ptr: *mut c_void,
    size: usize,
}

// SAFETY: the region owns its mapping exclusively and exposes no interior
// mutability; moving it between threads is sound as long as callers respect
// the single-owner drop-unmaps contract documented on the type.
unsafe impl Send for ExecutableRegion {}

impl ExecutableRegion {
    /// Map `bytes` into a fresh read+execute region.
    ///
    /// # Aborts
    /// Calls `log::error!` and `std::process::exit(1)` if `mmap` or
    /// `mprotect` fails. This matches the fatal-error policy in § 7 of the
    /// design doc: allocation failure here is unrecoverable.
    pub fn new(bytes: &[u8]) -> Self {
        let page_size = page_size();
        let size = round_up(bytes.len().max(1), page_size);

        // SAFETY: MAP_ANONYMOUS|MAP_PRIVATE with fd -1 and offset 0 creates a
        // private anonymous mapping; the returned pointer is checked against
        // MAP_FAILED before use.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_ANONYMOUS | libc::MAP_PRIVATE,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            let err = std::io::Error::last_os_error();
            log::error!("mmap({size} bytes) failed: {err}");
            std::process::exit(1);
        }

        // SAFETY: ptr was just mapped RW for `size` bytes; bytes.len() <= size.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), ptr as *mut u8, bytes.len());
        }

        // SAFETY: ptr/size describe the mapping just created; PROT_READ|PROT_EXEC
        // is a strictly narrower protection than the PROT_READ|PROT_WRITE it had.
        let rc = unsafe { libc::mprotect(ptr, size, libc::PROT_READ | libc::PROT_EXEC) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            log::error!("mprotect({size} bytes, RX) failed: {err}");
            std::process::exit(1);
        }

        Self { ptr, size }
    }

    /// Stable address of the first byte of the snippet, valid until this
    /// region is dropped.
    pub fn exec_ptr(&self) -> *const () {
        self.ptr as *const ()
    }

    /// Size in bytes of the underlying mapping (page-rounded).
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for ExecutableRegion {
    fn drop(&mut self) {
        // SAFETY: ptr/size describe a mapping owned exclusively by this
        // region and created by mmap in `new`.
        unsafe {
            libc::munmap(self.ptr, self.size);
        }
    }
}

fn round_up(n: usize, multiple: usize) -> usize {
    n.div_ceil(multiple) * multiple
}

fn page_size() -> usize {
    // SAFETY: sysconf(_SC_PAGESIZE) is always safe and returns the page size.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 { 4096 } else { size as usize }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_page_multiple() {
        let ps = page_size();
        assert_eq!(round_up(1, ps), ps);
        assert_eq!(round_up(ps, ps), ps);
        assert_eq!(round_up(ps + 1, ps), 2 * ps);
    }

    #[test]
    fn region_copies_bytes_and_is_executable() {
        // `ret` for both common architectures' trampoline use: the bytes
        // themselves don't matter for this test, only that mapping and
        // copying succeed and the pointer is non-null and page-aligned.
        let region = ExecutableRegion::new(&crate::trampoline::RET_ONLY);
        assert!(!region.exec_ptr().is_null());
        assert_eq!(region.exec_ptr() as usize % page_size(), 0);
        assert_eq!(region.size(), page_size());
    }

    #[test]
    fn region_size_rounds_up_for_larger_snippets() {
        let ps = page_size();
        let bytes = vec![0x90u8; ps + 16];
        let region = ExecutableRegion::new(&bytes);
        assert_eq!(region.size(), 2 * ps);
    }
}
