//! Constructors for styles.
//!
//! Groups are built with a closure that receives a [`GroupBuilder`]:
//!
//! ```rust
//! use stylized::{attr, attr_value, group, named, value, Result};
//!
//! # fn main() -> Result<()> {
//! let blue = attr_value("blue", "#0000ff");
//! let white = attr("white");
//! let primary = named("primary", blue.clone());
//!
//! let colors = group(None, |g| {
//!     g.add(&blue)?;                  // under its own name, "blue"
//!     g.set_ref(&white, value("#ffffff"))?;
//!     g.set("green", value("#00ff00"));
//!     g.set("example", blue.clone()); // stored as a lookup of "blue"
//!     Ok(())
//! })?;
//!
//! assert_eq!(colors.get::<&str, _>(&white)?, "#ffffff");
//! assert_eq!(colors.get::<&str, _>("example")?, "#0000ff");
//! assert_eq!(primary.value::<&str>()?, "#0000ff");
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, StyleError};
use crate::node::Node;
use crate::path::{join_dotted, KeyPath, PathSource};
use crate::style::{
    ComputedReference, NamedReference, SelfReference, StaticReference, Style, StyleGroup,
    StyleValue,
};

/// A value holding `value`.
pub fn value<T>(value: T) -> Style
where
    T: Any + Send + Sync + fmt::Debug,
{
    Style::Value(Arc::new(StyleValue::new(value)))
}

/// A reference that looks `path` up from wherever it is read.
pub fn reference<P: PathSource + ?Sized>(path: &P) -> Style {
    Style::Reference(Arc::new(SelfReference::new(KeyPath::of(path))))
}

/// An anonymous reference to `target`.
pub fn reference_to(target: Style) -> Style {
    Style::Reference(Arc::new(StaticReference::new(target)))
}

/// A reference to `target` carrying the dotted form of `name`.
pub fn named<P: PathSource + ?Sized>(name: &P, target: Style) -> Style {
    Style::Reference(Arc::new(NamedReference::new(dotted(name), target)))
}

/// A named reference calling `callback` on every read.
pub fn computed<P, F>(name: &P, callback: F) -> Style
where
    P: PathSource + ?Sized,
    F: Fn(&Node) -> Result<Style> + Send + Sync + 'static,
{
    Style::Reference(Arc::new(ComputedReference::new(dotted(name), callback)))
}

/// Builds a group deriving from `from`.
///
/// # Errors
///
/// Whatever `build` returns, typically [`StyleError::InvalidReferenceName`]
/// from [`GroupBuilder::add`].
pub fn group<F>(from: Option<Style>, build: F) -> Result<Style>
where
    F: FnOnce(&mut GroupBuilder) -> Result<()>,
{
    let mut builder = GroupBuilder::new(from);
    build(&mut builder)?;
    Ok(builder.build())
}

/// An attribute: a reference to whatever `name` resolves to where it is read.
///
/// Used as a key it stands for `name`. Without a value anywhere in scope it
/// does not resolve.
pub fn attr(name: &str) -> Style {
    reference(name)
}

/// An attribute with a default value.
pub fn attr_value<T>(name: &str, value: T) -> Style
where
    T: Any + Send + Sync + fmt::Debug,
{
    named(name, self::value(value))
}

/// An attribute computed from the node it is read at.
pub fn attr_fn<F>(name: &str, callback: F) -> Style
where
    F: Fn(&Node) -> Result<Style> + Send + Sync + 'static,
{
    computed(name, callback)
}

/// A named group: `named(name, group(from, build)?)`.
pub fn named_group<F>(name: &str, from: Option<Style>, build: F) -> Result<Style>
where
    F: FnOnce(&mut GroupBuilder) -> Result<()>,
{
    Ok(named(name, group(from, build)?))
}

fn dotted<P: PathSource + ?Sized>(name: &P) -> String {
    join_dotted(KeyPath::of(name).iter())
}

/// Collects the entries of a group.
///
/// Setting the same key twice keeps the last style, at the position of the
/// first.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    parent: Option<Style>,
    entries: IndexMap<String, Style>,
}

impl GroupBuilder {
    pub fn new(parent: Option<Style>) -> Self {
        Self {
            parent,
            entries: IndexMap::new(),
        }
    }

    /// Stores `style` under `key`, as given.
    ///
    /// A named reference is stored as a lookup of its name, so it resolves
    /// in the scope of this group rather than to its own target. Anonymous
    /// references, values and groups are stored unchanged.
    pub fn set(&mut self, key: impl Into<String>, style: impl Into<Style>) -> &mut Self {
        let style = lookup_by_name(style.into());
        self.entries.insert(key.into(), style);
        self
    }

    /// Stores a value holding `payload` under `key`.
    pub fn set_value<T>(&mut self, key: impl Into<String>, payload: T) -> &mut Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        self.entries.insert(key.into(), value(payload));
        self
    }

    /// Stores `reference` under its own name.
    ///
    /// # Errors
    ///
    /// [`StyleError::InvalidReferenceName`] when `reference` is not a
    /// reference with a single-segment name.
    pub fn add(&mut self, reference: &Style) -> Result<&mut Self> {
        let key = single_name(reference)?;
        self.entries.insert(key, reference.clone());
        Ok(self)
    }

    /// Stores `style` under the name of `reference`, as [`GroupBuilder::set`]
    /// would.
    ///
    /// # Errors
    ///
    /// Same as [`GroupBuilder::add`].
    pub fn set_ref(&mut self, reference: &Style, style: impl Into<Style>) -> Result<&mut Self> {
        let key = single_name(reference)?;
        Ok(self.set(key, style))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finishes the group in the smallest shape that holds its entries.
    pub fn build(self) -> Style {
        StyleGroup::from_entries(self.entries, self.parent).into()
    }
}

fn lookup_by_name(style: Style) -> Style {
    match style.reference_name() {
        Some(name) if !name.is_empty() => reference(name.as_str()),
        _ => style,
    }
}

fn single_name(reference: &Style) -> Result<String> {
    let name = match reference {
        Style::Reference(r) => KeyPath::of(r.name().as_str()),
        _ => return Err(StyleError::unnamed(reference)),
    };
    match name.len() {
        0 => Err(StyleError::unnamed(reference)),
        1 => Ok(name.segments()[0].clone()),
        _ => Err(StyleError::dotted_name(reference)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Blue,
        White,
    }

    #[test]
    fn test_group_shapes() {
        let empty = group(None, |_| Ok(())).unwrap();
        assert!(empty.keys().is_empty());

        let two = group(None, |g| {
            g.set("a", value(1)).set("b", value(2));
            Ok(())
        })
        .unwrap();
        assert_eq!(two.keys(), ["a", "b"]);
    }

    #[test]
    fn test_add_uses_reference_name() {
        let blue = attr_value("blue", Color::Blue);
        let colors = group(None, |g| {
            g.add(&blue)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(colors.keys(), ["blue"]);
        assert_eq!(colors.get::<Color, _>(&blue).unwrap(), Color::Blue);
    }

    #[test]
    fn test_add_rejects_bad_names() {
        for bad in [reference_to(value(1)), attr(" . "), value(1)] {
            let err = group(None, |g| {
                g.add(&bad)?;
                Ok(())
            })
            .unwrap_err();
            assert!(err.to_string().starts_with("Reference does not have a name"));
        }

        let err = group(None, |g| {
            g.set_ref(&reference("a.b"), value(1))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, StyleError::InvalidReferenceName { .. }));
    }

    #[test]
    fn test_set_stores_named_reference_as_lookup() {
        let blue = attr_value("blue", Color::Blue);
        let g = group(None, |g| {
            g.set("alias", blue.clone());
            Ok(())
        })
        .unwrap();
        // `blue` is not in the group, so the lookup has nothing to find.
        assert!(g.get::<Color, _>("alias").is_err());

        let g = group(None, |g| {
            g.add(&blue)?;
            g.set("alias", blue.clone());
            Ok(())
        })
        .unwrap();
        assert_eq!(g.get::<Color, _>("alias").unwrap(), Color::Blue);
    }

    #[test]
    fn test_last_set_wins() {
        let g = group(None, |g| {
            g.set_value("c", Color::Blue);
            g.set_value("c", Color::White);
            Ok(())
        })
        .unwrap();
        assert_eq!(g.keys(), ["c"]);
        assert_eq!(g.get::<Color, _>("c").unwrap(), Color::White);
    }

    #[test]
    fn test_names_are_canonical() {
        assert_eq!(named(" a . b ", value(1)).reference_name().unwrap(), "a.b");
        assert_eq!(attr("x").reference_name().unwrap(), "x");
        let computed = attr_fn("now", |_| Ok(value(0)));
        assert_eq!(computed.reference_name().unwrap(), "now");
    }

    #[test]
    fn test_attr_fn_reads_from_node() {
        let doubled = attr_fn("doubled", |node| {
            let base = node.get("base")?.value::<i32>()?;
            Ok(value(base * 2))
        });
        let g = group(None, |g| {
            g.set_value("base", 21);
            g.set("answer", reference_to(doubled.clone()));
            Ok(())
        })
        .unwrap();
        assert_eq!(g.get::<i32, _>("answer").unwrap(), 42);
    }

    #[test]
    fn test_named_group() {
        let colors = named_group("colors", None, |g| {
            g.set_value("white", Color::White);
            Ok(())
        })
        .unwrap();
        assert_eq!(colors.reference_name().unwrap(), "colors");
        assert_eq!(colors.get::<Color, _>("white").unwrap(), Color::White);
    }
}
