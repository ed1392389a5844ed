//! Tour hashing and the visited-tour table.
//!
//! # Algorithm
//!
//! Every node draws a random 32-bit key once per run. An undirected edge
//! hashes to `key(a) * key(b)` (wrapping), and a tour hashes to the XOR of
//! its edge hashes. Since XOR is its own inverse, a 2-opt move updates the
//! hash by toggling its four edges, and undoing the move toggles them back.
//!
//! [`HashTable`] stores `(hash, cost)` pairs of tours reached in the current
//! trial with open addressing and a double-hash probe step. Once the load
//! limit is reached the table stops growing and an insert only replaces the
//! entry at the home slot when its cost is not larger.
//!
//! Distinct tours may share a `(hash, cost)` pair. Such collisions are
//! accepted and end a trial early.

use rand::Rng;

use super::TourStore;
use crate::models::NodeId;

/// Per-node random keys used to hash tours.
///
/// # Examples
///
/// ```
/// use u_lkh::tour::{TourHash, TourStore};
///
/// let mut rng = u_numflow::random::create_rng(7);
/// let keys = TourHash::new(4, &mut rng);
///
/// let a = TourStore::from_order(&[1, 2, 3, 4]).unwrap();
/// let b = TourStore::from_order(&[2, 3, 4, 1]).unwrap();
/// assert_eq!(keys.of_tour(&a), keys.of_tour(&b));
/// ```
#[derive(Debug, Clone)]
pub struct TourHash {
    keys: Vec<u32>,
}

impl TourHash {
    /// Draws one key per node from `rng`.
    pub fn new<R: Rng>(dimension: usize, rng: &mut R) -> Self {
        Self {
            keys: (0..dimension).map(|_| rng.random::<u32>()).collect(),
        }
    }

    /// Uses explicit keys; `keys[0]` belongs to node 1.
    pub fn from_keys(keys: Vec<u32>) -> Self {
        Self { keys }
    }

    /// Hash contribution of the undirected edge `(a, b)`.
    #[inline]
    pub fn edge(&self, a: NodeId, b: NodeId) -> u32 {
        self.keys[a - 1].wrapping_mul(self.keys[b - 1])
    }

    /// Hash delta of the 2-opt move that removes `(t1, t2)` and `(t3, t4)`
    /// and adds `(t2, t3)` and `(t4, t1)`.
    #[inline]
    pub fn swap_delta(&self, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId) -> u32 {
        self.edge(t1, t2) ^ self.edge(t3, t4) ^ self.edge(t2, t3) ^ self.edge(t4, t1)
    }

    /// Hash of the whole tour.
    pub fn of_tour(&self, tour: &TourStore) -> u32 {
        (1..=tour.dimension()).fold(0, |h, a| h ^ self.edge(a, tour.succ(a)))
    }
}

/// Number of slots in a [`HashTable`].
pub const HASH_TABLE_SIZE: usize = 65521;

const MAX_LOAD_FACTOR: f64 = 0.75;
const EMPTY: i64 = i64::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    hash: u32,
    cost: i64,
}

/// Fixed-size open-addressing set of `(hash, cost)` pairs.
///
/// # Examples
///
/// ```
/// use u_lkh::tour::HashTable;
///
/// let mut table = HashTable::new();
/// assert!(!table.search(42, 100));
/// table.insert(42, 100);
/// assert!(table.search(42, 100));
/// assert!(!table.search(42, 101));
/// ```
#[derive(Debug, Clone)]
pub struct HashTable {
    entries: Vec<Entry>,
    count: usize,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HashTable {
    /// Creates an empty table with [`HASH_TABLE_SIZE`] slots.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry { hash: 0, cost: EMPTY }; HASH_TABLE_SIZE],
            count: 0,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.fill(Entry { hash: 0, cost: EMPTY });
        self.count = 0;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no entry has been inserted since the last clear.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn max_count(&self) -> usize {
        (MAX_LOAD_FACTOR * self.entries.len() as f64) as usize
    }

    #[inline]
    fn step(&self, hash: u32) -> usize {
        (hash % 97) as usize + 1
    }

    #[inline]
    fn probe(&self, index: usize, step: usize) -> usize {
        let size = self.entries.len();
        (index + size - step) % size
    }

    /// Inserts `(hash, cost)`.
    ///
    /// At the load limit no empty slot is taken; the pair only replaces an
    /// occupied home slot of higher or equal cost.
    pub fn insert(&mut self, hash: u32, cost: i64) {
        let mut index = hash as usize % self.entries.len();
        if self.count >= self.max_count() {
            let home = self.entries[index];
            if home.cost == EMPTY || cost > home.cost {
                return;
            }
        } else {
            let step = self.step(hash);
            while self.entries[index].cost != EMPTY {
                index = self.probe(index, step);
            }
            self.count += 1;
        }
        self.entries[index] = Entry { hash, cost };
    }

    /// Returns `true` if `(hash, cost)` has been inserted.
    pub fn search(&self, hash: u32, cost: i64) -> bool {
        let mut index = hash as usize % self.entries.len();
        let step = self.step(hash);
        for _ in 0..self.entries.len() {
            let e = self.entries[index];
            if e.hash == hash && e.cost == cost {
                return true;
            }
            if e.cost == EMPTY {
                return false;
            }
            index = self.probe(index, step);
        }
        false
    }
}
