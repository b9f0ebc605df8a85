//! Keyed priority queue over vertices.
//!
//! A binary min-heap paired with a position index, so any queued vertex can be re-keyed
//! or removed in O(log n).

pub mod key;
pub mod keyed_queue;

pub use key::Key;
pub use keyed_queue::KeyedQueue;
