//! Memory use of a trial must not grow with the number of dice thrown.
//!
//! This binary installs an allocator that records the largest single
//! allocation, so it keeps exactly one test to avoid interference.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use woundsim::parallel::BatchRunner;
use woundsim::server::api::{decode_request, simulate};

struct LargestAllocation;

static LARGEST: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for LargestAllocation {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        LARGEST.fetch_max(layout.size(), Ordering::Relaxed);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        LARGEST.fetch_max(new_size, Ordering::Relaxed);
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static GLOBAL: LargestAllocation = LargestAllocation;

const ONE_MIB: usize = 1 << 20;

#[test]
fn trial_with_millions_of_dice_allocates_no_per_die_buffer() {
    // a per-die Vec<u32> would need 80 MB here
    let body = r#"{"strength":4,"endurance":4,"diceNumber":20000000,"touchDifficulty":6,"runNumber":1,"seed":1}"#;
    let request = decode_request(body).expect("request is within bounds");
    let runner = BatchRunner::sequential();

    LARGEST.store(0, Ordering::Relaxed);
    let response = simulate(&request, &runner).expect("batch runs");
    let largest = LARGEST.load(Ordering::Relaxed);

    assert_eq!(response.results.len(), 1);
    assert!(response.results[0] <= 20_000_000);
    assert_eq!(response.summary.histogram.len(), 1);
    assert!(
        largest < ONE_MIB,
        "largest allocation was {largest} bytes for one trial"
    );
}
