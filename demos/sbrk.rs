//! Walkthrough of the allocator over the real program break.
//!
//! Unix only: the heap lives at the top of the data segment and grows with
//! `sbrk(2)`, so you can watch the break move with tools like `pmap` or
//! `htop` while the demo pauses.

#[cfg(unix)]
fn main() {
  use std::io::Read;

  use imallocator::{ImplicitAllocator, SbrkHeap};
  use libc::sbrk;

  /// Prints the current program break using `sbrk(0)`.
  /// The program break is the upper boundary of the heap managed via
  /// brk/sbrk.
  unsafe fn print_program_break(label: &str) {
    println!(
      "[{}] PID = {}, program break (sbrk(0)) = {:?}",
      label,
      std::process::id(),
      unsafe { sbrk(0) },
    );
  }

  fn block_until_enter_pressed() {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
  }

  env_logger::init();

  let mut heap = ImplicitAllocator::with_heap(SbrkHeap::new());

  unsafe {
    print_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) First allocation: the substrate pads the break up to the 16-byte
    //    unit, then pushes it by one chunk.
    // --------------------------------------------------------------------
    let first = heap.allocate(8).unwrap();
    println!("\n[1] Allocate 8 bytes -> {:?}", first);
    print_program_break("after first alloc");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) A large block to make the break move visibly (64 KiB).
    // --------------------------------------------------------------------
    let big = heap.allocate(64 * 1024).unwrap();
    println!("\n[2] Allocate 64 KiB -> {:?}", big);
    print_program_break("after large alloc");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Release and reuse: the break does not move again, the freed chunk
    //    is recycled by the first-fit scan.
    // --------------------------------------------------------------------
    heap.release(first).unwrap();
    let reused = heap.allocate(8).unwrap();
    println!(
      "\n[3] reused == first? {}",
      if reused == first { "Yes, it reused the freed chunk" } else { "No" }
    );
    print_program_break("after reuse");

    let info = heap.validate(true).unwrap();
    println!(
      "[3] {} allocated / {} free chunks over {} heap bytes",
      info.allocated_chunks,
      info.free_chunks,
      heap.heap_size(),
    );
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) init() hands the whole region back by pulling the break down.
    // --------------------------------------------------------------------
    heap.init();
    print_program_break("after init");
    println!("\n[4] End of example.");
  }
}

#[cfg(not(unix))]
fn main() {
  println!("This demo needs a unix program break; see demos/implicit.rs instead.");
}
