//! Scoped path resolution.
//!
//! A [`Node`] is a style together with the chain of scopes it was reached
//! through. Nodes are built on the fly while resolving and dropped when the
//! call returns.
//!
//! # Resolution
//!
//! Given `foo = { a: bar, c: 3, d: 4 }` and `bar = { b: 1, c: 2 }`, where
//! `[bar]` is the node for `bar` nested inside `[foo]`:
//!
//! | From | Path | Result |
//! |------|------|--------|
//! | `[foo]`, `[bar]` | `a.b` | `1` |
//! | `[foo]`, `[bar]` | `a` | `bar` |
//! | `[foo]` | `b` | not found |
//! | `[bar]` | `b` | `1` |
//! | `[foo]` | `c` | `3` |
//! | `[bar]` | `c` | `2` |
//! | `[foo]`, `[bar]` | `d` | `4` |
//!
//! The first segment is looked up in the current style and, on a miss, in
//! each enclosing scope in turn. Once a segment matches, the rest of the path
//! is looked up inside the matched style only. A group still consults the
//! style it derives from, but the enclosing scopes are not searched again.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{self, LookupScope, ReferenceGuard};
use crate::error::{Result, StyleError};
use crate::path::{KeyPath, PathSource};
use crate::style::{ChildLookup, Group, Reference, Style, Value, Visitor};

/// A style positioned inside its enclosing scopes.
///
/// Nodes compare by value: two nodes are equal when their styles are equal
/// and their parents are equal, all the way up.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

struct NodeInner {
    current: Style,
    parent: Option<Node>,
}

impl Node {
    /// A node with no enclosing scope.
    pub fn root(style: Style) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                current: style,
                parent: None,
            }),
        }
    }

    /// A node for `style` nested inside this one.
    pub fn child(&self, style: Style) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                current: style,
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn current(&self) -> &Style {
        &self.inner.current
    }

    pub fn parent(&self) -> Option<&Node> {
        self.inner.parent.as_ref()
    }

    /// Number of nodes in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = self;
        while let Some(parent) = node.parent() {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Finds the node for `path`, or `None`.
    ///
    /// An empty path resolves to this node.
    pub fn resolve<P: PathSource + ?Sized>(&self, path: &P) -> Option<Node> {
        self.try_resolve(path).ok().flatten()
    }

    /// Like [`Node::resolve`], but tells a miss apart from a lookup that was
    /// cut off by the reference depth limit.
    ///
    /// # Errors
    ///
    /// [`StyleError::ReferenceDepthExceeded`] when following references
    /// anywhere along the lookup ran past
    /// [`max_reference_depth`](crate::config::max_reference_depth).
    pub fn try_resolve<P: PathSource + ?Sized>(&self, path: &P) -> Result<Option<Node>> {
        let scope = LookupScope::begin();
        let path = KeyPath::of(path);
        let found = self.resolve_segments(path.segments(), true);
        scope.finish(found)
    }

    /// Returns the style at `path`.
    ///
    /// # Errors
    ///
    /// [`StyleError::ReferenceNotFound`] carrying the raw path and this node
    /// when nothing matches, or [`StyleError::ReferenceDepthExceeded`] when
    /// the lookup was cut off.
    pub fn get<P: PathSource + ?Sized>(&self, path: &P) -> Result<Style> {
        match self.try_resolve(path)? {
            Some(node) => Ok(node.current().clone()),
            None => {
                debug!(path = ?path.raw_strings(), node = %self, "reference not found");
                Err(StyleError::not_found(path, self))
            }
        }
    }

    /// Returns the style at `path`, or `None`.
    pub fn get_or_none<P: PathSource + ?Sized>(&self, path: &P) -> Option<Style> {
        self.resolve(path).map(|node| node.current().clone())
    }

    fn resolve_segments(&self, keys: &[String], check_parent: bool) -> Option<Node> {
        match keys.split_first() {
            None => Some(self.clone()),
            Some((key, rest)) => self.resolve_down(key, rest, check_parent),
        }
    }

    fn resolve_down(&self, key: &str, rest: &[String], check_parent: bool) -> Option<Node> {
        let mut scope = self;
        loop {
            if let Some(style) = scope.current().accept((scope, key), &ChildLookup) {
                trace!(key, depth = scope.depth(), "matched");
                // A match commits: the rest of the path stays below it.
                let child = style.accept(scope, &IntoNode)?;
                return child.resolve_segments(rest, false);
            }
            if !check_parent {
                trace!(key, "not found below matched style");
                return None;
            }
            if config::depth_exceeded() {
                trace!(key, "reference depth exceeded, not searching enclosing scopes");
                return None;
            }
            match scope.parent() {
                Some(parent) => {
                    trace!(key, "falling back to enclosing scope");
                    scope = parent;
                }
                None => {
                    trace!(key, "not found in any scope");
                    return None;
                }
            }
        }
    }
}

/// Wraps a matched style in a child node of the scope it was found in.
///
/// References are followed first, so the child node always holds the value
/// or group they lead to.
struct IntoNode;

impl<'a> Visitor<&'a Node> for IntoNode {
    type Output = Option<Node>;

    fn on_value(&self, scope: &'a Node, value: &Arc<dyn Value>) -> Option<Node> {
        Some(scope.child(Style::Value(value.clone())))
    }

    fn on_group(&self, scope: &'a Node, group: &Arc<dyn Group>) -> Option<Node> {
        Some(scope.child(Style::Group(group.clone())))
    }

    fn on_reference(&self, scope: &'a Node, reference: &Arc<dyn Reference>) -> Option<Node> {
        let _guard = ReferenceGuard::enter(reference).ok()?;
        match reference.get(scope) {
            Ok(target) => target.accept(scope, self),
            Err(error) => {
                trace!(%error, "matched reference has no target");
                None
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.current() == other.current() && self.parent() == other.parent())
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            None => write!(f, "Node({})", self.current()),
            Some(parent) => write!(f, "Node({}, parent={})", self.current(), parent),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
