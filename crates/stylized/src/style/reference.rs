use std::fmt;

use super::{Reference, Style};
use crate::error::Result;
use crate::node::Node;
use crate::path::KeyPath;

/// An anonymous reference to a fixed style.
pub struct StaticReference {
    target: Style,
}

impl StaticReference {
    pub fn new(target: Style) -> Self {
        Self { target }
    }
}

impl Reference for StaticReference {
    fn get(&self, _node: &Node) -> Result<Style> {
        Ok(self.target.clone())
    }
}

impl fmt::Debug for StaticReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({})", self.target)
    }
}

/// A reference that looks its path up from wherever it is read.
///
/// The lookup starts at the node the reference is reached from, so the same
/// reference placed in two groups can resolve to two different styles.
pub struct SelfReference {
    path: KeyPath,
}

impl SelfReference {
    pub fn new(path: KeyPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }
}

impl Reference for SelfReference {
    fn get(&self, node: &Node) -> Result<Style> {
        node.get(&self.path)
    }

    fn name(&self) -> String {
        self.path.to_string()
    }
}

impl fmt::Debug for SelfReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelfReference({})", self.path)
    }
}

/// A named reference to a fixed style.
pub struct NamedReference {
    name: String,
    target: Style,
}

impl NamedReference {
    pub fn new(name: impl Into<String>, target: Style) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

impl Reference for NamedReference {
    fn get(&self, _node: &Node) -> Result<Style> {
        Ok(self.target.clone())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Debug for NamedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({}: {})", self.name, self.target)
    }
}

type Callback = dyn Fn(&Node) -> Result<Style> + Send + Sync;

/// A named reference whose target is computed on every read.
pub struct ComputedReference {
    name: String,
    callback: Box<Callback>,
}

impl ComputedReference {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Node) -> Result<Style> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(callback),
        }
    }
}

impl Reference for ComputedReference {
    fn get(&self, node: &Node) -> Result<Style> {
        (self.callback)(node)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Debug for ComputedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComputedReference({})", self.name)
    }
}
