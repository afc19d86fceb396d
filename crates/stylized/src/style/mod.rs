//! The style model: values, groups and references.
//!
//! A [`Style`] is always exactly one of three kinds. Code that needs to treat
//! the kinds differently implements a [`Visitor`] and calls [`Style::accept`],
//! which dispatches to the matching method. Resolution, dereferencing and
//! formatting are all visitors, so adding a new operation never touches the
//! kinds themselves.
//!
//! The built-in implementations are:
//!
//! - [`StyleValue`]: a fixed payload,
//! - [`StyleGroup`]: empty, single-entry and multi-entry groups,
//! - [`StaticReference`], [`SelfReference`], [`NamedReference`] and
//!   [`ComputedReference`].
//!
//! Custom kinds can implement [`Value`], [`Group`] or [`Reference`] directly.

mod group;
mod reference;
mod value;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::node::Node;

pub use group::StyleGroup;
pub(crate) use group::ChildLookup;
pub use reference::{ComputedReference, NamedReference, SelfReference, StaticReference};
pub use value::StyleValue;

/// Shared, type-erased payload of a value.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A terminal style holding a payload.
///
/// The node is the position the value was reached from. Plain values ignore
/// it; custom values may use it to compute their payload.
pub trait Value: fmt::Debug + Send + Sync {
    fn get(&self, node: &Node) -> Payload;
}

/// A style holding named children.
pub trait Group: fmt::Debug + Send + Sync {
    /// Returns the child named `key`, or `None` when the group (including the
    /// parent it derives from) has no such child.
    fn get(&self, node: &Node, key: &str) -> Option<Style>;

    /// Local keys, in a stable order.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A style pointing at another style.
pub trait Reference: fmt::Debug + Send + Sync {
    /// Returns the style this reference currently denotes.
    ///
    /// Called on every lookup; nothing is cached.
    fn get(&self, node: &Node) -> Result<Style>;

    /// Dotted name of what this reference points to. Empty when anonymous.
    fn name(&self) -> String {
        String::new()
    }
}

/// A node of the style tree.
///
/// Cloning is cheap: every variant is a shared pointer. Two styles are equal
/// when they share the same underlying allocation.
#[derive(Clone)]
pub enum Style {
    Value(Arc<dyn Value>),
    Group(Arc<dyn Group>),
    Reference(Arc<dyn Reference>),
}

/// Double dispatch over the three style kinds.
///
/// `In` is whatever context the operation needs (a node, a key, a
/// formatter). Exactly one method is called per [`Style::accept`].
pub trait Visitor<In> {
    type Output;

    fn on_value(&self, data: In, value: &Arc<dyn Value>) -> Self::Output;
    fn on_group(&self, data: In, group: &Arc<dyn Group>) -> Self::Output;
    fn on_reference(&self, data: In, reference: &Arc<dyn Reference>) -> Self::Output;
}

impl Style {
    /// Dispatches `data` to the visitor method matching this style's kind.
    pub fn accept<In, V>(&self, data: In, visitor: &V) -> V::Output
    where
        V: Visitor<In> + ?Sized,
    {
        match self {
            Style::Value(value) => visitor.on_value(data, value),
            Style::Group(group) => visitor.on_group(data, group),
            Style::Reference(reference) => visitor.on_reference(data, reference),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Style::Value(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Style::Group(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Style::Reference(_))
    }

    /// The reference name, for references. `None` for values and groups.
    pub fn reference_name(&self) -> Option<String> {
        match self {
            Style::Reference(reference) => Some(reference.name()),
            _ => None,
        }
    }

    /// Local keys of a group. Empty for values and references.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Style::Group(group) => group.keys(),
            _ => Vec::new(),
        }
    }

    fn data_ptr(&self) -> *const () {
        match self {
            Style::Value(value) => Arc::as_ptr(value) as *const (),
            Style::Group(group) => Arc::as_ptr(group) as *const (),
            Style::Reference(reference) => Arc::as_ptr(reference) as *const (),
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.data_ptr() == other.data_ptr()
    }
}

impl Eq for Style {}

/// Formats a style with the `Debug` output of its implementation.
struct Describe;

impl<'a, 'b> Visitor<&'a mut fmt::Formatter<'b>> for Describe {
    type Output = fmt::Result;

    fn on_value(&self, f: &'a mut fmt::Formatter<'b>, value: &Arc<dyn Value>) -> fmt::Result {
        write!(f, "{:?}", value)
    }

    fn on_group(&self, f: &'a mut fmt::Formatter<'b>, group: &Arc<dyn Group>) -> fmt::Result {
        write!(f, "{:?}", group)
    }

    fn on_reference(
        &self,
        f: &'a mut fmt::Formatter<'b>,
        reference: &Arc<dyn Reference>,
    ) -> fmt::Result {
        write!(f, "{:?}", reference)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(f, &Describe)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(f, &Describe)
    }
}

impl From<&Style> for Style {
    fn from(style: &Style) -> Self {
        style.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{group, reference, reference_to, value};

    struct Kind;

    impl Visitor<()> for Kind {
        type Output = &'static str;

        fn on_value(&self, _: (), _: &Arc<dyn Value>) -> &'static str {
            "value"
        }

        fn on_group(&self, _: (), _: &Arc<dyn Group>) -> &'static str {
            "group"
        }

        fn on_reference(&self, _: (), _: &Arc<dyn Reference>) -> &'static str {
            "reference"
        }
    }

    #[test]
    fn test_accept_dispatches_to_own_kind() {
        assert_eq!(value(1).accept((), &Kind), "value");
        assert_eq!(group(None, |_| Ok(())).unwrap().accept((), &Kind), "group");
        assert_eq!(reference("a").accept((), &Kind), "reference");
    }

    #[test]
    fn test_equality_is_by_allocation() {
        let one = value(1);
        assert_eq!(one, one.clone());
        assert_ne!(one, value(1));
        assert_ne!(one, reference_to(one.clone()));
    }

    #[test]
    fn test_display_uses_kind_formatting() {
        assert_eq!(value(42).to_string(), "42");
        assert_eq!(reference("a . b").to_string(), "SelfReference(a.b)");
        assert_eq!(reference_to(value("x")).to_string(), "Reference(\"x\")");
    }

    #[test]
    fn test_keys_and_names() {
        let g = group(None, |g| {
            g.set("b", value(2));
            g.set("a", value(1));
            Ok(())
        })
        .unwrap();
        assert_eq!(g.keys(), ["b", "a"]);
        assert!(value(1).keys().is_empty());
        assert_eq!(reference("x.y").reference_name().as_deref(), Some("x.y"));
        assert_eq!(value(1).reference_name(), None);
    }
}
