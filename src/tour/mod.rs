//! Tour representation and duplicate-tour detection.
//!
//! - [`TourStore`]: doubly linked cycle with ranks, O(1) queries and
//!   O(length) segment reversal
//! - [`TourHash`]: XOR-of-edges tour hashing with per-node random keys
//! - [`HashTable`]: fixed-size `(hash, cost)` table of tours seen in a trial

mod hash;
mod store;

pub use hash::{HashTable, TourHash, HASH_TABLE_SIZE};
pub use store::TourStore;
