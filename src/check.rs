use log::debug;

use crate::error::AllocError;
use crate::heap::HeapSource;
use crate::implicit::ImplicitAllocator;

/// Aggregate heap statistics reported by [`ImplicitAllocator::validate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapInfo {
  pub allocated_chunks: usize,
  pub free_chunks: usize,
  pub allocated_bytes: usize,
  pub free_bytes: usize,
}

impl<H: HeapSource> ImplicitAllocator<H> {
  /// Walks the whole heap chunk by chunk, counting allocated and free chunks
  /// and bytes, and checks that the chunk sizes tile the heap exactly.
  ///
  /// On a corrupted heap this panics, or returns
  /// [`AllocError::HeapCorruption`] when
  /// [`panic_on_corruption(false)`](Self::panic_on_corruption) was chosen.
  /// `verbose` emits one `debug!` line per chunk and never changes the
  /// outcome.
  pub fn validate(
    &self,
    verbose: bool,
  ) -> Result<HeapInfo, AllocError> {
    let mut info = HeapInfo::default();

    let mut cursor = self.next_chunk(None);
    while let Some(off) = cursor {
      let header = self.chunk(off);
      if verbose {
        debug!(
          "chunk @ {off:#x}: {} bytes, {}",
          header.size,
          if header.allocated { "allocated" } else { "free" },
        );
      }

      if header.allocated {
        info.allocated_chunks += 1;
        info.allocated_bytes += header.size;
      } else {
        info.free_chunks += 1;
        info.free_bytes += header.size;
      }
      cursor = self.next_chunk(Some(off));
    }

    let accounted = info.allocated_bytes + info.free_bytes;
    let heap_size = self.heap.size();
    if accounted != heap_size {
      if self.panic_on_corruption {
        panic!("heap corruption: chunks account for {accounted} bytes of a {heap_size}-byte heap");
      }
      return Err(AllocError::HeapCorruption { accounted, heap_size });
    }

    Ok(info)
  }
}
