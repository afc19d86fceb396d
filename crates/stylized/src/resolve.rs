//! Reading values out of styles.
//!
//! Two visitors turn a resolved style into something usable:
//!
//! - `ValueResolver` follows references until it reaches a value, whose
//!   payload it returns, or a group, which it returns as is.
//! - `Dereferencer` follows references until it reaches the first style that
//!   is not a reference and returns that style.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::config::ReferenceGuard;
use crate::error::{Result, StyleError};
use crate::node::Node;
use crate::path::PathSource;
use crate::style::{Group, Payload, Reference, Style, Value, Visitor};

/// The outcome of reading a style.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// A value's payload.
    Payload(Payload),
    /// A group, which is already its own value.
    Group(Style),
}

impl Resolved {
    /// Clones the payload out if it has type `T`.
    ///
    /// A group can be read back as a [`Style`].
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Resolved::Payload(payload) => payload.downcast_ref::<T>().cloned(),
            Resolved::Group(group) => (group as &dyn Any).downcast_ref::<T>().cloned(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Resolved::Group(_))
    }
}

struct ValueResolver;

impl<'a> Visitor<&'a Node> for ValueResolver {
    type Output = Result<Resolved>;

    fn on_value(&self, node: &'a Node, value: &Arc<dyn Value>) -> Result<Resolved> {
        Ok(Resolved::Payload(value.get(node)))
    }

    fn on_group(&self, _: &'a Node, group: &Arc<dyn Group>) -> Result<Resolved> {
        Ok(Resolved::Group(Style::Group(group.clone())))
    }

    fn on_reference(&self, node: &'a Node, reference: &Arc<dyn Reference>) -> Result<Resolved> {
        let _guard = ReferenceGuard::enter(reference)?;
        reference.get(node)?.accept(node, self)
    }
}

struct Dereferencer;

impl<'a> Visitor<&'a Node> for Dereferencer {
    type Output = Result<Style>;

    fn on_value(&self, _: &'a Node, value: &Arc<dyn Value>) -> Result<Style> {
        Ok(Style::Value(value.clone()))
    }

    fn on_group(&self, _: &'a Node, group: &Arc<dyn Group>) -> Result<Style> {
        Ok(Style::Group(group.clone()))
    }

    fn on_reference(&self, node: &'a Node, reference: &Arc<dyn Reference>) -> Result<Style> {
        let _guard = ReferenceGuard::enter(reference)?;
        reference.get(node)?.accept(node, self)
    }
}

impl Style {
    /// Reads this style's own value, following references.
    pub fn resolved_self(&self) -> Result<Resolved> {
        self.accept(&Node::root(self.clone()), &ValueResolver)
    }

    /// Reads the value at `path`, looked up from this style.
    ///
    /// # Errors
    ///
    /// [`StyleError::ReferenceNotFound`] when the path does not resolve, or
    /// whatever error a reference met on the way to the value.
    pub fn resolved<P: PathSource + ?Sized>(&self, path: &P) -> Result<Resolved> {
        let root = Node::root(self.clone());
        let node = root.try_resolve(path)?.ok_or_else(|| {
            debug!(path = ?path.raw_strings(), style = %self, "value not found");
            StyleError::not_found(path, &root)
        })?;
        node.current().accept(&node, &ValueResolver)
    }

    /// Reads this style's own value as `T`.
    ///
    /// ```rust
    /// use stylized::{attr_value, Result};
    ///
    /// # fn main() -> Result<()> {
    /// let blue = attr_value("blue", 0x0000ffu32);
    /// assert_eq!(blue.value::<u32>()?, 0x0000ff);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// [`StyleError::ReferenceNotFound`] with a [`TypeMismatch`] cause when
    /// the payload is not a `T`.
    ///
    /// [`TypeMismatch`]: crate::TypeMismatch
    pub fn value<T: Any + Clone>(&self) -> Result<T> {
        self.resolved_self()?.downcast::<T>().ok_or_else(|| {
            StyleError::type_mismatch::<T, _>(&(), &Node::root(self.clone()))
        })
    }

    /// Like [`Style::value`], but `None` on any failure.
    pub fn value_or_none<T: Any + Clone>(&self) -> Option<T> {
        self.resolved_self().ok()?.downcast::<T>()
    }

    /// Reads the value at `path` as `T`.
    ///
    /// # Errors
    ///
    /// [`StyleError::ReferenceNotFound`] when the path does not resolve or the
    /// payload is not a `T`. [`StyleError::ReferenceDepthExceeded`] when
    /// references along the way nest past the limit.
    pub fn get<T: Any + Clone, P: PathSource + ?Sized>(&self, path: &P) -> Result<T> {
        let root = Node::root(self.clone());
        let node = root.try_resolve(path)?.ok_or_else(|| {
            debug!(path = ?path.raw_strings(), style = %self, "value not found");
            StyleError::not_found(path, &root)
        })?;
        node.current()
            .accept(&node, &ValueResolver)?
            .downcast::<T>()
            .ok_or_else(|| StyleError::type_mismatch::<T, P>(path, &node))
    }

    /// Like [`Style::get`], but `None` on any failure.
    pub fn get_or_none<T: Any + Clone, P: PathSource + ?Sized>(&self, path: &P) -> Option<T> {
        let node = Node::root(self.clone()).resolve(path)?;
        node.current()
            .accept(&node, &ValueResolver)
            .ok()?
            .downcast::<T>()
    }

    /// Strips direct reference indirection.
    ///
    /// Values and groups are returned unchanged. A reference is replaced by
    /// its target, repeatedly, until the target is not a reference. Members
    /// of a group are left alone.
    pub fn dereference(&self) -> Result<Style> {
        self.accept(&Node::root(self.clone()), &Dereferencer)
    }
}
