use thiserror::Error;

/// Failures surfaced by the allocator's public operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The heap source could not extend the heap. Recoverable: retry with a
  /// smaller request or release something first.
  #[error("out of memory: heap cannot grow by {0} bytes")]
  OutOfMemory(usize),

  /// The pointer handed to `release`/`resize` lies outside the heap's
  /// payload range or off the alignment grid.
  #[error("invalid pointer {0:#x}: outside the heap or misaligned")]
  InvalidPointer(usize),

  /// Chunk sizes no longer tile the heap exactly. Unrecoverable: the header
  /// chain is the only record of the heap's structure.
  #[error("heap corruption: chunks account for {accounted} bytes of a {heap_size}-byte heap")]
  HeapCorruption { accounted: usize, heap_size: usize },
}
