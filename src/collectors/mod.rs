//! Built-in terminal stages.
//!
//! Each constructor returns a typed
//! [`TerminalHandle`](crate::TerminalHandle) for
//! [`LazyPipeline::collect`](crate::LazyPipeline::collect). Custom sinks
//! implement [`TerminalStage`](crate::TerminalStage) and wrap themselves
//! with `TerminalHandle::new`.

mod count;
mod find;
mod for_each;
mod group_by;
mod join;
mod matching;
mod min_max;
mod reduce;
mod sum;
mod to_map;
mod to_vec;

pub use count::count;
pub use find::{find_first, find_last};
pub use for_each::for_each;
pub use group_by::{group_by, group_by_with};
pub use join::join;
pub use matching::{all_match, any_match, none_match};
pub use min_max::{max, max_by, min, min_by};
pub use reduce::{fold, reduce};
pub use sum::{average, sum};
pub use to_map::to_map;
pub use to_vec::to_vec;
