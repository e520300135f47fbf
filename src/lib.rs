//! # imallocator - An Implicit-Free-List Memory Allocator
//!
//! This crate provides an **implicit free list** allocator: free/allocated
//! status is encoded in per-chunk headers embedded directly in the heap,
//! with no separate free-list bookkeeping structure. Locating a free chunk
//! is a linear scan of the whole heap.
//!
//! ## Overview
//!
//! ```text
//!   Implicit Free List Concept:
//!
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                          HEAP MEMORY                               │
//!   │                                                                    │
//!   │   ┌───┬──────┬───┬──────────┬───┬──┬───┬───────────────────────┐   │
//!   │   │ H │ used │ H │   free   │ H │u.│ H │         free          │   │
//!   │   └───┴──────┴───┴──────────┴───┴──┴───┴───────────────────────┘   │
//!   │     │          │              │      │                             │
//!   │     └──────────┴──────────────┴──────┴── headers: (size, status)   │
//!   │                                                                    │
//!   │   The next chunk is always at `this chunk + this chunk's size`.    │
//!   │   There is no list head and no next pointer: the chain of sizes    │
//!   │   IS the list.                                                     │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//!   Allocation: first-fit scan, O(number of chunks).
//!   Release: O(following free chunks) forward merge.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   imallocator
//!   ├── align      - The 16-byte alignment unit (align!, align)
//!   ├── chunk      - Chunk header layout (internal)
//!   ├── heap       - HeapSource substrate: BufferHeap, SbrkHeap
//!   ├── implicit   - ImplicitAllocator: allocate / release / resize
//!   ├── check      - Heap consistency checker (validate, HeapInfo)
//!   └── error      - AllocError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use imallocator::ImplicitAllocator;
//!
//! let mut heap = ImplicitAllocator::new(4096);
//!
//! let block = heap.allocate(64).unwrap();
//! unsafe {
//!     // Use the memory.
//!     block.as_ptr().write_bytes(0xAB, 64);
//!
//!     // Free it again.
//!     heap.release(block).unwrap();
//! }
//!
//! let info = heap.validate(false).unwrap();
//! assert_eq!(info.free_chunks, 1);
//! ```
//!
//! ## How It Works
//!
//! Every chunk is a fixed-size header followed by its payload:
//!
//! ```text
//!   Single Chunk:
//!   ┌────────────────────────┬────────────────────────────────┐
//!   │     Chunk Header       │          Payload               │
//!   │  ┌──────────────────┐  │                                │
//!   │  │ size: N          │  │  ┌──────────────────────────┐  │
//!   │  │ allocated: bool  │  │  │   N - 16 bytes usable    │  │
//!   │  └──────────────────┘  │  └──────────────────────────┘  │
//!   │       16 bytes         │                                │
//!   └────────────────────────┴────────────────────────────────┘
//!                            ▲
//!                            └── Pointer returned to the caller
//! ```
//!
//! `allocate` rounds the request up to the 16-byte unit, scans for the first
//! free chunk that fits, splits off any viable excess, and only grows the
//! heap when nothing fits. `release` flips the chunk to free and merges it
//! with every free chunk directly after it. `resize` shrinks in place, grows
//! into a free right-hand neighbor, or relocates.
//!
//! The heap bytes themselves come from a [`HeapSource`]: an owned
//! fixed-capacity buffer ([`BufferHeap`]) or, on unix, the program break
//! ([`SbrkHeap`]) grown via `sbrk(2)`.
//!
//! ## Features
//!
//! - **Zero out-of-band metadata**: the header chain is the whole data
//!   structure
//! - **First-fit reuse**: freed chunks are found again before the heap grows
//! - **Splitting and forward coalescing**: bounded fragmentation in both
//!   directions
//! - **Built-in consistency checker**: `validate` proves the chunk sizes
//!   tile the heap exactly
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; use external
//!   locking to share an instance
//! - **Forward coalescing only**: a free chunk is never merged into an
//!   already-free predecessor
//! - **Linear search**: no segregated size classes, no free-list index
//!
//! ## Safety
//!
//! `allocate` and `validate` are safe. `release` and `resize` trust the
//! caller's payload pointer and are `unsafe`; obviously foreign pointers
//! (outside the heap, off the 16-byte grid) are rejected, anything subtler
//! is the caller's contract.

pub mod align;
mod check;
mod chunk;
mod error;
pub mod heap;
mod implicit;

pub use check::HeapInfo;
pub use error::AllocError;
#[cfg(unix)]
pub use heap::SbrkHeap;
pub use heap::{BufferHeap, HeapSource};
pub use implicit::{ImplicitAllocator, MIN_PAYLOAD_ON_SPLIT};
