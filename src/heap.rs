use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error};
use std::ptr;

use log::trace;

use crate::align::ALIGNMENT;
use crate::error::AllocError;

/// Source of the raw bytes underneath the allocator: one contiguous region
/// with a low boundary, a current size and a grow-by-N primitive.
///
/// # Safety
///
/// Implementations must keep the region contiguous and its base stable:
/// `lo()` must not change while `size() > 0`, every successful `grow(n)`
/// must extend the region by exactly `n` bytes at `lo() + old size`, and the
/// whole `[lo(), lo() + size())` span must stay readable and writable.
pub unsafe trait HeapSource {
  /// Extends the heap by exactly `bytes`, returning the byte offset of the
  /// new region from `lo()`.
  fn grow(&mut self, bytes: usize) -> Result<usize, AllocError>;

  /// Lowest address of the heap region.
  fn lo(&self) -> *const u8;

  /// Lowest address of the heap region, writable.
  fn lo_mut(&mut self) -> *mut u8;

  /// Current heap size in bytes.
  fn size(&self) -> usize;

  /// Address of the last valid heap byte. Meaningless while the heap is
  /// empty.
  fn hi(&self) -> *const u8 {
    unsafe { self.lo().add(self.size().saturating_sub(1)) }
  }

  /// Shrinks back to an empty heap.
  fn reset(&mut self);
}

/// Heap region inside an owned, fixed-capacity, 16-byte-aligned buffer.
///
/// The buffer is reserved up front so the base address never moves; `grow`
/// extends the logical heap within the reserved capacity and fails with
/// [`AllocError::OutOfMemory`] once the capacity is exhausted.
pub struct BufferHeap {
  base: *mut u8,
  capacity: usize,
  len: usize,
}

impl BufferHeap {
  /// Reserves `capacity` bytes for the heap to grow into.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` exceeds `isize::MAX`.
  pub fn with_capacity(capacity: usize) -> Self {
    if capacity == 0 {
      return Self {
        base: ptr::null_mut(),
        capacity: 0,
        len: 0,
      };
    }

    let layout =
      Layout::from_size_align(capacity, ALIGNMENT).expect("heap capacity overflows a Layout");
    let base = unsafe { alloc_zeroed(layout) };
    if base.is_null() {
      handle_alloc_error(layout);
    }

    Self { base, capacity, len: 0 }
  }
}

impl Drop for BufferHeap {
  fn drop(&mut self) {
    if !self.base.is_null() {
      unsafe {
        dealloc(self.base, Layout::from_size_align_unchecked(self.capacity, ALIGNMENT));
      }
    }
  }
}

unsafe impl HeapSource for BufferHeap {
  fn grow(
    &mut self,
    bytes: usize,
  ) -> Result<usize, AllocError> {
    if self.capacity - self.len < bytes {
      return Err(AllocError::OutOfMemory(bytes));
    }

    let offset = self.len;
    self.len += bytes;
    trace!("buffer heap grown by {bytes} bytes to {}", self.len);
    Ok(offset)
  }

  fn lo(&self) -> *const u8 {
    self.base
  }

  fn lo_mut(&mut self) -> *mut u8 {
    self.base
  }

  fn size(&self) -> usize {
    self.len
  }

  fn reset(&mut self) {
    self.len = 0;
  }
}

/// Heap region grown with `sbrk(2)`, the way the program break works: the
/// base is wherever the break sat (padded up to the alignment unit) when the
/// first chunk was requested, and every grow pushes the break further.
///
/// Single-threaded use only. The region stays contiguous only while nothing
/// else moves the program break, so a process using this source must not
/// route its other allocations through `brk`/`sbrk`.
#[cfg(unix)]
pub struct SbrkHeap {
  base: *mut u8,
  len: usize,
}

#[cfg(unix)]
impl SbrkHeap {
  pub fn new() -> Self {
    Self {
      base: ptr::null_mut(),
      len: 0,
    }
  }
}

#[cfg(unix)]
unsafe impl HeapSource for SbrkHeap {
  fn grow(
    &mut self,
    bytes: usize,
  ) -> Result<usize, AllocError> {
    use libc::{c_void, intptr_t, sbrk};

    unsafe {
      if self.base.is_null() {
        // First growth: pad the break up to the alignment unit so every
        // payload lands on the 16-byte grid.
        let brk = sbrk(0) as usize;
        let pad = crate::align!(brk) - brk;
        if pad != 0 && sbrk(pad as intptr_t) == usize::MAX as *mut c_void {
          return Err(AllocError::OutOfMemory(bytes));
        }
        self.base = (brk + pad) as *mut u8;
      }

      let address = sbrk(bytes as intptr_t);
      if address == usize::MAX as *mut c_void {
        return Err(AllocError::OutOfMemory(bytes));
      }

      let offset = self.len;
      self.len += bytes;
      trace!("program break heap grown by {bytes} bytes to {}", self.len);
      Ok(offset)
    }
  }

  fn lo(&self) -> *const u8 {
    self.base
  }

  fn lo_mut(&mut self) -> *mut u8 {
    self.base
  }

  fn size(&self) -> usize {
    self.len
  }

  fn reset(&mut self) {
    use libc::{intptr_t, sbrk};

    if self.len > 0 {
      unsafe {
        sbrk(-(self.len as intptr_t));
      }
      self.len = 0;
    }
  }
}
