use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::align;
use crate::chunk::{ChunkHeader, HDR_SIZE};
use crate::error::AllocError;
use crate::heap::{BufferHeap, HeapSource};

/// Smallest payload a split remainder must be able to hold to become its own
/// free chunk. Remainders below this stay inside the allocated chunk.
pub const MIN_PAYLOAD_ON_SPLIT: usize = 16;

/// Implicit-free-list allocator over a [`HeapSource`].
///
/// Free/allocated status lives only in the per-chunk headers embedded in the
/// heap itself; finding a free chunk is a linear first-fit scan from the low
/// boundary. Chunks are addressed internally by byte offset from the heap
/// base, so only the header views and the payload boundary touch raw
/// pointers.
pub struct ImplicitAllocator<H: HeapSource = BufferHeap> {
  pub(crate) heap: H,
  pub(crate) min_payload_on_split: usize,
  pub(crate) panic_on_corruption: bool,
}

impl ImplicitAllocator<BufferHeap> {
  /// Allocator over an owned buffer that can grow up to `capacity` bytes.
  pub fn new(capacity: usize) -> Self {
    Self::with_heap(BufferHeap::with_capacity(capacity))
  }
}

impl<H: HeapSource> ImplicitAllocator<H> {
  /// Allocator over any heap source. The heap starts empty.
  pub fn with_heap(heap: H) -> Self {
    Self {
      heap,
      min_payload_on_split: MIN_PAYLOAD_ON_SPLIT,
      panic_on_corruption: true,
    }
  }

  /// Sets the minimum payload a split remainder must hold to become its own
  /// free chunk (default 16).
  pub fn min_payload_on_split(
    mut self,
    bytes: usize,
  ) -> Self {
    self.min_payload_on_split = bytes;
    self
  }

  /// Chooses whether `validate` panics on a corrupted heap (the default) or
  /// returns [`AllocError::HeapCorruption`].
  pub fn panic_on_corruption(
    mut self,
    panic: bool,
  ) -> Self {
    self.panic_on_corruption = panic;
    self
  }

  /// Resets to an empty heap, discarding every chunk.
  pub fn init(&mut self) {
    self.heap.reset();
  }

  /// Current heap size in bytes.
  pub fn heap_size(&self) -> usize {
    self.heap.size()
  }

  /// Allocates a block of at least `size` bytes, 16-byte aligned.
  ///
  /// Reuses the first sufficiently large free chunk if one exists, splitting
  /// off the excess; otherwise grows the heap by one chunk.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let size = align!(size);
    let csz = HDR_SIZE + size;

    let off = match self.first_fit(csz) {
      Some(off) => {
        self.split(off, csz);
        off
      }
      None => self.request_chunk(csz)?,
    };
    self.chunk_mut(off).allocated = true;

    debug!("allocate({size}) -> chunk @ {off:#x}");
    Ok(self.payload(off))
  }

  /// Releases a block, merging it with any free chunks directly after it.
  ///
  /// # Safety
  ///
  /// `ptr` must have been returned by [`allocate`](Self::allocate) or
  /// [`resize`](Self::resize) on this allocator and not released since.
  /// Obviously foreign pointers (outside the heap, off the alignment grid)
  /// are rejected with [`AllocError::InvalidPointer`]; anything subtler is
  /// undefined behavior.
  pub unsafe fn release(
    &mut self,
    ptr: NonNull<u8>,
  ) -> Result<(), AllocError> {
    let off = self.payload_to_header(ptr.as_ptr())?;
    self.chunk_mut(off).allocated = false;
    self.coalesce(off);

    debug!("release(chunk @ {off:#x})");
    Ok(())
  }

  /// Resizes a block, in place when possible, relocating otherwise.
  ///
  /// `resize(None, size)` allocates; `resize(Some(ptr), 0)` releases and
  /// returns `Ok(None)`. Contents up to the smaller of the old and new sizes
  /// are preserved; bytes beyond the old size are uninitialized.
  ///
  /// # Safety
  ///
  /// Same contract as [`release`](Self::release) for a `Some` pointer.
  pub unsafe fn resize(
    &mut self,
    ptr: Option<NonNull<u8>>,
    size: usize,
  ) -> Result<Option<NonNull<u8>>, AllocError> {
    let ptr = match ptr {
      None => return self.allocate(size).map(Some),
      Some(ptr) => ptr,
    };
    if size == 0 {
      unsafe { self.release(ptr)? };
      return Ok(None);
    }

    let size = align!(size);
    let csz = HDR_SIZE + size;
    let off = self.payload_to_header(ptr.as_ptr())?;
    let old = self.chunk(off).size;

    if old >= csz {
      // Shrink (or exact fit): keep the pointer. A freshly split remainder
      // must not sit next to an already-free successor.
      if self.split(off, csz) {
        if let Some(rem) = self.next_chunk(Some(off)) {
          self.coalesce(rem);
        }
      }
      return Ok(Some(ptr));
    }

    // old < csz from here on, so the subtraction cannot underflow.
    let needed = csz - old;
    if let Some(next) = self.next_chunk(Some(off)) {
      let neighbor = self.chunk(next);
      if !neighbor.allocated && neighbor.size >= needed {
        self.chunk_mut(off).size = old + neighbor.size;
        self.split(off, csz);
        debug!("resize: chunk @ {off:#x} grew in place to {csz}");
        return Ok(Some(ptr));
      }
    }

    // Relocate: the old chunk stays allocated while the new one is carved
    // out, so first-fit cannot hand back the block being moved.
    let new = self.allocate(size)?;
    let keep = (old - HDR_SIZE).min(size);
    unsafe {
      ptr::copy_nonoverlapping(ptr.as_ptr(), new.as_ptr(), keep);
      self.release(ptr)?;
    }
    debug!("resize: chunk @ {off:#x} relocated");
    Ok(Some(new))
  }

  /// Returns the chunk following `at`, the first chunk for `None`, or `None`
  /// once the heap's high boundary is reached.
  pub(crate) fn next_chunk(
    &self,
    at: Option<usize>,
  ) -> Option<usize> {
    let heap_size = self.heap.size();
    let at = match at {
      None => return if heap_size == 0 { None } else { Some(0) },
      Some(off) => off,
    };

    let size = self.chunk(at).size;
    // A corrupted size field must not loop in place or walk past the heap
    // end; the checker's sum invariant reports the damage.
    if size == 0 {
      return None;
    }
    match at.checked_add(size) {
      Some(next) if next < heap_size => Some(next),
      _ => None,
    }
  }

  pub(crate) fn chunk(
    &self,
    off: usize,
  ) -> ChunkHeader {
    unsafe { *(self.heap.lo().add(off) as *const ChunkHeader) }
  }

  fn chunk_mut(
    &mut self,
    off: usize,
  ) -> &mut ChunkHeader {
    unsafe { &mut *(self.heap.lo_mut().add(off) as *mut ChunkHeader) }
  }

  fn init_chunk(
    &mut self,
    off: usize,
    size: usize,
    allocated: bool,
  ) {
    unsafe {
      (self.heap.lo_mut().add(off) as *mut ChunkHeader).write(ChunkHeader::new(size, allocated));
    }
  }

  fn payload(
    &mut self,
    off: usize,
  ) -> NonNull<u8> {
    unsafe { NonNull::new_unchecked(self.heap.lo_mut().add(off + HDR_SIZE)) }
  }

  fn payload_to_header(
    &self,
    ptr: *const u8,
  ) -> Result<usize, AllocError> {
    let base = self.heap.lo() as usize;
    let addr = ptr as usize;
    if addr < base + HDR_SIZE
      || addr >= base + self.heap.size()
      || (addr - base) % align::ALIGNMENT != 0
    {
      return Err(AllocError::InvalidPointer(addr));
    }
    Ok(addr - base - HDR_SIZE)
  }

  /// First free chunk with `size >= csz`, scanning from the heap start.
  fn first_fit(
    &self,
    csz: usize,
  ) -> Option<usize> {
    let mut cursor = self.next_chunk(None);
    while let Some(off) = cursor {
      let header = self.chunk(off);
      if !header.allocated && header.size >= csz {
        return Some(off);
      }
      cursor = self.next_chunk(Some(off));
    }
    None
  }

  /// Cuts the chunk at `off` down to `csz` bytes, turning the remainder into
  /// a free chunk. Returns whether a cut happened; remainders too small to
  /// hold a header plus the minimum payload stay inside the chunk.
  fn split(
    &mut self,
    off: usize,
    csz: usize,
  ) -> bool {
    let remain = self.chunk(off).size - csz;
    if remain < HDR_SIZE + self.min_payload_on_split {
      return false;
    }

    self.chunk_mut(off).size = csz;
    self.init_chunk(off + csz, remain, false);
    trace!("split chunk @ {off:#x} into {csz} + {remain}");
    true
  }

  /// Merges the free chunk at `off` with every free chunk directly after it.
  /// Never looks backward: an already-free predecessor stays separate.
  fn coalesce(
    &mut self,
    off: usize,
  ) {
    let mut total = 0;
    let mut cursor = Some(off);
    while let Some(c) = cursor {
      let header = self.chunk(c);
      if header.allocated {
        break;
      }
      total += header.size;
      cursor = self.next_chunk(Some(c));
    }

    if total != self.chunk(off).size {
      trace!("coalesced chunk @ {off:#x} to {total} bytes");
    }
    self.chunk_mut(off).size = total;
  }

  /// Grows the heap by one chunk of `csz` bytes.
  fn request_chunk(
    &mut self,
    csz: usize,
  ) -> Result<usize, AllocError> {
    let off = self.heap.grow(csz)?;
    self.init_chunk(off, csz, false);
    Ok(off)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::slice;

  fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
  }

  // Deterministic PRNG for the mixed workload; no external randomness in
  // tests.
  struct Lcg(u64);

  impl Lcg {
    fn next(&mut self) -> u64 {
      self.0 = self
        .0
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
      self.0 >> 16
    }
  }

  #[test]
  fn payloads_are_aligned() {
    let mut heap = ImplicitAllocator::new(8192);

    for size in [0usize, 1, 2, 8, 15, 16, 17, 31, 32, 63, 64, 100, 255] {
      let ptr = heap.allocate(size).unwrap();
      assert_eq!(ptr.as_ptr() as usize % align::ALIGNMENT, 0, "size {size}");
    }

    heap.validate(false).unwrap();
  }

  #[test]
  fn first_fit_reuses_freed_chunk() {
    let mut heap = ImplicitAllocator::new(4096);

    let first = heap.allocate(8).unwrap();
    unsafe { (first.as_ptr() as *mut u64).write(3) };

    let second = heap.allocate(8).unwrap();
    unsafe { (second.as_ptr() as *mut u64).write(7) };

    let before = heap.heap_size();
    unsafe { heap.release(first).unwrap() };

    // The freed chunk is found again before the heap grows.
    let third = heap.allocate(8).unwrap();
    assert_eq!(third, first);
    assert_eq!(heap.heap_size(), before);

    unsafe { assert_eq!((second.as_ptr() as *mut u64).read(), 7) };
  }

  #[test]
  fn allocation_grows_heap_when_nothing_fits() {
    let mut heap = ImplicitAllocator::new(256);

    let first = heap.allocate(16).unwrap();
    heap.allocate(16).unwrap();
    unsafe { heap.release(first).unwrap() };

    // The free chunk is too small, so the heap must grow.
    let before = heap.heap_size();
    let big = heap.allocate(32).unwrap();
    assert_ne!(big, first);
    assert!(heap.heap_size() > before);
  }

  #[test]
  fn split_leaves_viable_remainder() {
    let mut heap = ImplicitAllocator::new(256);

    let block = heap.allocate(64).unwrap();
    unsafe { heap.release(block).unwrap() };

    heap.allocate(8).unwrap();
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
    assert_eq!(info.allocated_bytes, HDR_SIZE + 16);
    assert_eq!(info.free_chunks, 1);
    assert_eq!(info.free_bytes, 64 - 16);
  }

  #[test]
  fn split_skipped_when_remainder_too_small() {
    let mut heap = ImplicitAllocator::new(256);

    let block = heap.allocate(64).unwrap();
    unsafe { heap.release(block).unwrap() };

    // Remainder would be 16 bytes, below header + minimum payload, so the
    // excess stays inside the allocated chunk.
    heap.allocate(48).unwrap();
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
    assert_eq!(info.allocated_bytes, HDR_SIZE + 64);
    assert_eq!(info.free_chunks, 0);
  }

  #[test]
  fn releasing_before_a_free_neighbor_coalesces_forward() {
    let mut heap = ImplicitAllocator::new(1024);
    let csz = HDR_SIZE + 32;

    let a = heap.allocate(32).unwrap();
    let b = heap.allocate(32).unwrap();
    heap.allocate(32).unwrap();

    unsafe {
      heap.release(b).unwrap();
      heap.release(a).unwrap();
    }

    let info = heap.validate(false).unwrap();
    assert_eq!(info.free_chunks, 1);
    assert_eq!(info.free_bytes, 2 * csz);

    // A request that fits the merged span but neither original chunk is
    // served without growing the heap.
    let before = heap.heap_size();
    let merged = heap.allocate(64).unwrap();
    assert_eq!(merged, a);
    assert_eq!(heap.heap_size(), before);
  }

  #[test]
  fn release_does_not_merge_into_preceding_free_chunk() {
    let mut heap = ImplicitAllocator::new(1024);

    let a = heap.allocate(32).unwrap();
    let b = heap.allocate(32).unwrap();
    heap.allocate(32).unwrap();

    // Freeing in ascending address order: when b is released, the already
    // free chunk a is never extended over it.
    unsafe {
      heap.release(a).unwrap();
      heap.release(b).unwrap();
    }

    let info = heap.validate(false).unwrap();
    assert_eq!(info.free_chunks, 2);
    assert_eq!(info.free_bytes, 2 * (HDR_SIZE + 32));

    // Neither 48-byte chunk fits an 80-byte request, so the heap grows even
    // though the combined free space would suffice.
    let before = heap.heap_size();
    heap.allocate(64).unwrap();
    assert!(heap.heap_size() > before);
  }

  #[test]
  fn resize_shrink_keeps_pointer_and_coalesces_remainder() {
    let mut heap = ImplicitAllocator::new(1024);

    let block = heap.allocate(96).unwrap();
    unsafe { ptr::write_bytes(block.as_ptr(), 0xC3, 96) };
    let tail = heap.allocate(16).unwrap();
    unsafe { heap.release(tail).unwrap() };

    let shrunk = unsafe { heap.resize(Some(block), 32).unwrap().unwrap() };
    assert_eq!(shrunk, block);

    let contents = unsafe { slice::from_raw_parts(shrunk.as_ptr(), 32) };
    assert!(contents.iter().all(|&b| b == 0xC3));

    // The split remainder merged with the free tail chunk behind it.
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
    assert_eq!(info.allocated_bytes, HDR_SIZE + 32);
    assert_eq!(info.free_chunks, 1);
    assert_eq!(info.free_bytes, heap.heap_size() - (HDR_SIZE + 32));
  }

  #[test]
  fn resize_grows_in_place_into_free_neighbor() {
    let mut heap = ImplicitAllocator::new(1024);

    let a = heap.allocate(16).unwrap();
    unsafe { ptr::write_bytes(a.as_ptr(), 0x5E, 16) };
    let b = heap.allocate(32).unwrap();
    heap.allocate(16).unwrap();

    unsafe { heap.release(b).unwrap() };

    let before = heap.heap_size();
    let grown = unsafe { heap.resize(Some(a), 48).unwrap().unwrap() };
    assert_eq!(grown, a);
    assert_eq!(heap.heap_size(), before);

    let contents = unsafe { slice::from_raw_parts(grown.as_ptr(), 16) };
    assert!(contents.iter().all(|&b| b == 0x5E));

    // The absorbed neighbor is gone; its excess stayed inside the grown
    // chunk because the remainder was below the split threshold.
    let info = heap.validate(false).unwrap();
    assert_eq!(info.free_chunks, 0);
  }

  #[test]
  fn resize_relocates_and_preserves_contents() {
    let mut heap = ImplicitAllocator::new(1024);

    let a = heap.allocate(16).unwrap();
    unsafe { ptr::write_bytes(a.as_ptr(), 0xA7, 16) };
    // An allocated blocker right behind rules out in-place growth.
    heap.allocate(16).unwrap();

    let moved = unsafe { heap.resize(Some(a), 64).unwrap().unwrap() };
    assert_ne!(moved, a);

    let contents = unsafe { slice::from_raw_parts(moved.as_ptr(), 16) };
    assert!(contents.iter().all(|&b| b == 0xA7));

    // The old chunk was released behind the relocation.
    let info = heap.validate(false).unwrap();
    assert_eq!(info.free_chunks, 1);
    assert_eq!(info.free_bytes, HDR_SIZE + 16);
  }

  #[test]
  fn resize_with_null_pointer_allocates() {
    let mut heap = ImplicitAllocator::new(256);

    let ptr = unsafe { heap.resize(None, 16).unwrap().unwrap() };
    assert_eq!(ptr.as_ptr() as usize % align::ALIGNMENT, 0);

    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
  }

  #[test]
  fn resize_to_zero_releases() {
    let mut heap = ImplicitAllocator::new(256);

    let ptr = heap.allocate(16).unwrap();
    let result = unsafe { heap.resize(Some(ptr), 0).unwrap() };
    assert_eq!(result, None);

    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 0);
    assert_eq!(info.free_chunks, 1);
  }

  #[test]
  fn out_of_memory_is_recoverable() {
    let mut heap = ImplicitAllocator::new(64);

    assert_eq!(heap.allocate(64), Err(AllocError::OutOfMemory(HDR_SIZE + 64)));

    // The failed request left no trace; a smaller one still succeeds.
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 0);
    assert_eq!(info.free_chunks, 0);
    heap.allocate(32).unwrap();
  }

  #[test]
  fn failed_resize_leaves_block_intact() {
    let mut heap = ImplicitAllocator::new(64);

    let block = heap.allocate(32).unwrap();
    unsafe { ptr::write_bytes(block.as_ptr(), 0x42, 32) };

    let result = unsafe { heap.resize(Some(block), 64) };
    assert!(matches!(result, Err(AllocError::OutOfMemory(_))));

    let contents = unsafe { slice::from_raw_parts(block.as_ptr(), 32) };
    assert!(contents.iter().all(|&b| b == 0x42));
    heap.validate(false).unwrap();
  }

  #[test]
  fn invalid_pointers_are_rejected() {
    let mut heap = ImplicitAllocator::new(256);
    let block = heap.allocate(16).unwrap();

    unsafe {
      // Off the alignment grid.
      let misaligned = NonNull::new_unchecked(block.as_ptr().wrapping_add(8));
      assert!(matches!(
        heap.release(misaligned),
        Err(AllocError::InvalidPointer(_))
      ));

      // The heap base itself: there is no payload before the first header.
      let base = NonNull::new_unchecked(block.as_ptr().wrapping_sub(HDR_SIZE));
      assert!(matches!(heap.release(base), Err(AllocError::InvalidPointer(_))));

      // Far outside the heap.
      let foreign = NonNull::new_unchecked(usize::MAX as *mut u8);
      assert!(matches!(
        heap.resize(Some(foreign), 32),
        Err(AllocError::InvalidPointer(_))
      ));
    }

    // The rejected calls touched nothing.
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
  }

  #[test]
  fn raised_split_threshold_suppresses_splitting() {
    let mut heap = ImplicitAllocator::new(256).min_payload_on_split(64);

    let block = heap.allocate(64).unwrap();
    unsafe { heap.release(block).unwrap() };

    // A 48-byte remainder is viable under the default threshold but not
    // under this one.
    heap.allocate(8).unwrap();
    let info = heap.validate(false).unwrap();
    assert_eq!(info.allocated_chunks, 1);
    assert_eq!(info.allocated_bytes, HDR_SIZE + 64);
    assert_eq!(info.free_chunks, 0);
  }

  #[test]
  fn init_resets_to_an_empty_heap() {
    let mut heap = ImplicitAllocator::new(256);

    let first = heap.allocate(16).unwrap();
    heap.allocate(32).unwrap();

    heap.init();
    assert_eq!(heap.heap_size(), 0);
    let info = heap.validate(false).unwrap();
    assert_eq!(info, Default::default());

    // The region is reused from its low boundary.
    let again = heap.allocate(16).unwrap();
    assert_eq!(again, first);
  }

  #[test]
  fn live_allocations_never_overlap() {
    let mut heap = ImplicitAllocator::new(4096);
    let mut live: Vec<(usize, usize)> = Vec::new();

    for size in [8usize, 24, 64, 1, 100, 16] {
      let ptr = heap.allocate(size).unwrap();
      live.push((ptr.as_ptr() as usize, size));
    }

    // Punch a hole and refill it to force first-fit reuse.
    let (addr, _) = live.remove(2);
    unsafe {
      heap
        .release(NonNull::new_unchecked(addr as *mut u8))
        .unwrap()
    };
    for size in [16usize, 24] {
      let ptr = heap.allocate(size).unwrap();
      live.push((ptr.as_ptr() as usize, size));
    }

    for (i, &(a, asz)) in live.iter().enumerate() {
      for &(b, bsz) in live.iter().skip(i + 1) {
        assert!(a + asz <= b || b + bsz <= a, "blocks {a:#x}+{asz} and {b:#x}+{bsz} overlap");
      }
    }
  }

  #[test]
  fn mixed_workload_preserves_contents_and_invariants() {
    init_logs();

    let mut heap = ImplicitAllocator::new(1 << 20);
    let mut rng = Lcg(0x1337);
    let mut live: Vec<(NonNull<u8>, usize, u8)> = Vec::new();

    for i in 0..600u64 {
      let action = rng.next() % 10;
      if live.is_empty() || (action < 5 && live.len() < 12) {
        let size = 1 + (rng.next() % 512) as usize;
        let tag = (i & 0xff) as u8;
        let ptr = heap.allocate(size).unwrap();
        unsafe { ptr::write_bytes(ptr.as_ptr(), tag, size) };
        live.push((ptr, size, tag));
      } else if action < 7 {
        let idx = (rng.next() as usize) % live.len();
        let (ptr, size, tag) = live[idx];
        let new_size = 1 + (rng.next() % 512) as usize;
        let keep = size.min(new_size);

        let moved = unsafe { heap.resize(Some(ptr), new_size).unwrap().unwrap() };
        let contents = unsafe { slice::from_raw_parts(moved.as_ptr(), keep) };
        assert!(
          contents.iter().all(|&b| b == tag),
          "resize lost contents at op {i}"
        );
        unsafe { ptr::write_bytes(moved.as_ptr(), tag, new_size) };
        live[idx] = (moved, new_size, tag);
      } else {
        let idx = (rng.next() as usize) % live.len();
        let (ptr, size, tag) = live.swap_remove(idx);
        let contents = unsafe { slice::from_raw_parts(ptr.as_ptr(), size) };
        assert!(
          contents.iter().all(|&b| b == tag),
          "block changed before release at op {i}"
        );
        unsafe { heap.release(ptr).unwrap() };
      }

      if i % 50 == 0 {
        heap.validate(false).unwrap();
      }
    }

    for (ptr, size, tag) in live.drain(..) {
      let contents = unsafe { slice::from_raw_parts(ptr.as_ptr(), size) };
      assert!(contents.iter().all(|&b| b == tag));
      unsafe { heap.release(ptr).unwrap() };
    }
    heap.validate(false).unwrap();
  }

  #[cfg(unix)]
  #[test]
  #[ignore = "moves the process-wide program break; run single-threaded"]
  fn allocator_over_program_break() {
    use crate::heap::SbrkHeap;

    let mut heap = ImplicitAllocator::with_heap(SbrkHeap::new());

    let first = heap.allocate(8).unwrap();
    unsafe { (first.as_ptr() as *mut u64).write(3) };

    let second = heap.allocate(12).unwrap();
    unsafe {
      (second.as_ptr() as *mut u32).write(25);
      assert_eq!((first.as_ptr() as *mut u64).read(), 3);

      heap.release(first).unwrap();
    }

    let third = heap.allocate(8).unwrap();
    assert_eq!(third, first);

    heap.validate(false).unwrap();
    heap.init();
  }
}
