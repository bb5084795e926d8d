//! Built-in intermediate stages.
//!
//! Each constructor returns a typed
//! [`IntermediateHandle`](crate::IntermediateHandle) ready to be chained
//! with [`LazyPipeline::add`](crate::LazyPipeline::add). Custom stages
//! implement [`Stage`](crate::Stage) directly and wrap themselves with
//! `IntermediateHandle::new`.

mod distinct;
mod drop_while;
mod filter;
mod flat_map;
mod limit;
mod map;
mod peek;
mod skip;
mod sorted;
mod take_while;

pub use distinct::{distinct, distinct_by};
pub use drop_while::drop_while;
pub use filter::filter;
pub use flat_map::flat_map;
pub use limit::limit;
pub use map::map;
pub use peek::peek;
pub use skip::skip;
pub use sorted::{sorted, sorted_by};
pub use take_while::take_while;
