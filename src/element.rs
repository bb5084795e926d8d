//! Type-erased pipeline elements.
//!
//! The core never inspects element values, so runtime storage is uniformly
//! type-erased: every element travelling through the stage chain is a
//! `Box<dyn Any>`. The typed operator constructors box and downcast at the
//! edges, so user code never sees a raw `Element` unless it implements a
//! custom stage.

use crate::error::{PipelineError, PipelineResult};
use std::any::Any;

/// A single value flowing through the pipeline.
pub type Element = Box<dyn Any>;

/// Box a value into an [`Element`].
#[inline]
pub fn boxed<T: 'static>(value: T) -> Element {
    Box::new(value)
}

/// Downcast an [`Element`] back to a concrete type.
///
/// Fails with [`PipelineError::ElementType`] when the chain was assembled
/// with mismatched stage types; never panics.
pub fn downcast<T: 'static>(element: Element) -> PipelineResult<T> {
    element
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| PipelineError::ElementType {
            expected: std::any::type_name::<T>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let element = boxed(17_i32);
        assert_eq!(downcast::<i32>(element).unwrap(), 17);
    }

    #[test]
    fn test_mismatch_is_an_error() {
        let element = boxed("not a number");
        let err = downcast::<i64>(element).unwrap_err();
        assert!(matches!(err, PipelineError::ElementType { .. }));
        assert!(err.to_string().contains("i64"));
    }
}
