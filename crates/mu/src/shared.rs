//! Shared result block.
//!
//! An anonymous `MAP_SHARED` mapping created by the parent before `fork`. The
//! child publishes its final tally into it exactly once; the parent reads it
//! once after `waitpid` returns and then unmaps it.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::counters::Tally;

const UNWRITTEN: u32 = 0;
const WRITTEN: u32 = 1;

/// Layout of the shared mapping.
#[repr(C)]
#[derive(Debug)]
pub struct ResultBlock {
    written: AtomicU32,
    tally: AtomicU64,
}

impl ResultBlock {
    /// A block in the unwritten state (same bit pattern as a fresh mapping).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            written: AtomicU32::new(UNWRITTEN),
            tally: AtomicU64::new(0),
        }
    }

    /// Store `tally` and mark the block written.
    pub fn publish(&self, tally: Tally) {
        self.tally.store(tally.pack(), Ordering::SeqCst);
        self.written.store(WRITTEN, Ordering::SeqCst);
    }

    /// The published tally, or `None` if the writer never got that far.
    #[must_use]
    pub fn read(&self) -> Option<Tally> {
        if self.written.load(Ordering::SeqCst) != WRITTEN {
            return None;
        }
        Some(Tally::unpack(self.tally.load(Ordering::SeqCst)))
    }
}

impl Default for ResultBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
pub use mapping::SharedResultBlock;

#[cfg(unix)]
mod mapping {
    use std::io;
    use std::ptr::NonNull;

    use super::ResultBlock;
    use crate::error::IsolationError;

    /// Owner of one mapped [`ResultBlock`]; unmaps on drop.
    #[derive(Debug)]
    pub struct SharedResultBlock {
        ptr: NonNull<ResultBlock>,
    }

    impl SharedResultBlock {
        /// Map a zeroed block visible to this process and any child forked
        /// after this call.
        pub fn map() -> Result<Self, IsolationError> {
            // SAFETY: anonymous mapping, no fd, kernel picks the address.
            let raw = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    std::mem::size_of::<ResultBlock>(),
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_SHARED | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if raw == libc::MAP_FAILED {
                return Err(IsolationError::SharedMemory(io::Error::last_os_error()));
            }
            let ptr = NonNull::new(raw.cast::<ResultBlock>()).ok_or_else(|| {
                IsolationError::SharedMemory(io::Error::other("mmap returned null"))
            })?;
            // Anonymous mappings are zero-filled, which is the unwritten state.
            Ok(Self { ptr })
        }

        #[must_use]
        pub fn block(&self) -> &ResultBlock {
            // SAFETY: the mapping is page-aligned, zero-initialized (a valid
            // `ResultBlock`) and lives until `self` is dropped.
            unsafe { self.ptr.as_ref() }
        }

        pub(crate) fn as_ptr(&self) -> *mut ResultBlock {
            self.ptr.as_ptr()
        }
    }

    impl Drop for SharedResultBlock {
        fn drop(&mut self) {
            // SAFETY: pointer and length are exactly those returned by/passed
            // to mmap in `map`.
            unsafe {
                libc::munmap(
                    self.ptr.as_ptr().cast::<libc::c_void>(),
                    std::mem::size_of::<ResultBlock>(),
                );
            }
        }
    }
}
