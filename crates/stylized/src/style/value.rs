use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{Payload, Value};
use crate::node::Node;

/// A value wrapping a fixed payload.
pub struct StyleValue<T> {
    value: Arc<T>,
}

impl<T> StyleValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    pub fn inner(&self) -> &T {
        &self.value
    }
}

impl<T> Value for StyleValue<T>
where
    T: Any + Send + Sync + fmt::Debug,
{
    fn get(&self, _node: &Node) -> Payload {
        self.value.clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for StyleValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}
