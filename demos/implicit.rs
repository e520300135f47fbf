use std::io::Read;
use std::ptr;

use imallocator::{ImplicitAllocator, align::ALIGNMENT};

/// Waits until the user presses ENTER.
/// Useful when you want to follow the heap state step by step; run with
/// `RUST_LOG=trace` to watch the split/coalesce decisions as they happen.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn print_stats(
  label: &str,
  heap: &ImplicitAllocator,
) {
  let info = heap.validate(true).unwrap();
  println!(
    "[{}] heap = {} bytes | allocated: {} chunks / {} bytes | free: {} chunks / {} bytes",
    label,
    heap.heap_size(),
    info.allocated_chunks,
    info.allocated_bytes,
    info.free_chunks,
    info.free_bytes,
  );
}

fn main() {
  env_logger::init();

  // Our implicit-list allocator over a 4 KiB owned buffer. There is no
  // bookkeeping outside the buffer: every chunk starts with a 16-byte
  // header holding its size and status, and the next chunk sits exactly
  // `size` bytes further.
  let mut heap = ImplicitAllocator::new(4096);

  print_stats("start", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Allocate 24 bytes. The request is rounded up to the 16-byte unit,
  //    so the chunk holds 32 payload bytes plus its header.
  // --------------------------------------------------------------------
  let first = heap.allocate(24).unwrap();
  println!("\n[1] Allocate 24 bytes -> {:?}", first);
  println!("[1] Address % {} = {}", ALIGNMENT, first.as_ptr() as usize % ALIGNMENT);

  unsafe { ptr::write_bytes(first.as_ptr(), 0xAB, 24) };
  println!("[1] Initialized the block with 0xAB");
  print_stats("1", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Two more blocks, so the heap holds three chunks back to back.
  // --------------------------------------------------------------------
  let second = heap.allocate(100).unwrap();
  let third = heap.allocate(8).unwrap();
  println!("\n[2] Allocate 100 bytes -> {:?}, 8 bytes -> {:?}", second, third);
  print_stats("2", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Release the middle block. Its successor is allocated, so it simply
  //    becomes a free chunk in place.
  // --------------------------------------------------------------------
  unsafe { heap.release(second).unwrap() };
  println!("\n[3] Released the 100-byte block at {:?}", second);
  print_stats("3", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Allocate 32 bytes: first-fit finds the freed chunk and splits it,
  //    leaving a smaller free chunk behind. The heap does not grow.
  // --------------------------------------------------------------------
  let reused = heap.allocate(32).unwrap();
  println!("\n[4] Allocate 32 bytes (check reuse of the freed chunk)");
  println!(
    "[4] reused == second? {}",
    if reused == second {
      "Yes, first-fit found the freed chunk"
    } else {
      "No, it allocated somewhere else"
    }
  );
  print_stats("4", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Grow the first block with resize. Its right-hand neighbor is the
  //    free split remainder, so the block grows in place when the
  //    remainder is large enough; otherwise it relocates and the contents
  //    move with it.
  // --------------------------------------------------------------------
  let grown = unsafe { heap.resize(Some(first), 48).unwrap().unwrap() };
  println!("\n[5] Resized the first block to 48 bytes -> {:?}", grown);
  println!(
    "[5] grown == first? {}",
    if grown == first { "Yes, it grew in place" } else { "No, it relocated" }
  );

  let still_there = unsafe { std::slice::from_raw_parts(grown.as_ptr(), 24) };
  println!(
    "[5] First 24 bytes still 0xAB? {}",
    still_there.iter().all(|&b| b == 0xAB)
  );
  print_stats("5", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 6) Release everything. Forward coalescing folds trailing free chunks
  //    together as each block before them is released.
  // --------------------------------------------------------------------
  unsafe {
    heap.release(third).unwrap();
    heap.release(reused).unwrap();
    heap.release(grown).unwrap();
  }
  println!("\n[6] Released every block");
  print_stats("6", &heap);

  println!("\n[7] End of example. Dropping the allocator frees the buffer.");
}
