//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for vertex neighbor lists (road and grid graphs rarely exceed 8).
pub type SmallVec8<T> = SmallVec<[T; 8]>;

/// SmallVec sized for the endpoints involved in a single trace entry.
pub type SmallVec2<T> = SmallVec<[T; 2]>;
