use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use super::{Group, Reference, Style, Value, Visitor};
use crate::config::ReferenceGuard;
use crate::node::Node;

/// The built-in group, in three shapes.
///
/// Most groups hold zero or one entry, so those get their own variants
/// instead of a map. All three behave the same: a key missing locally is
/// looked up in `parent`, the style the group derives from.
pub enum StyleGroup {
    Empty {
        parent: Option<Style>,
    },
    Single {
        key: String,
        value: Style,
        parent: Option<Style>,
    },
    Multi {
        styles: IndexMap<String, Style>,
        parent: Option<Style>,
    },
}

impl StyleGroup {
    pub fn empty(parent: Option<Style>) -> Self {
        StyleGroup::Empty { parent }
    }

    pub fn single(key: impl Into<String>, value: Style, parent: Option<Style>) -> Self {
        StyleGroup::Single {
            key: key.into(),
            value,
            parent,
        }
    }

    pub fn multi(styles: IndexMap<String, Style>, parent: Option<Style>) -> Self {
        StyleGroup::Multi { styles, parent }
    }

    /// Picks the smallest shape able to hold `entries`.
    ///
    /// Later entries replace earlier ones with the same key.
    pub fn from_entries<I>(entries: I, parent: Option<Style>) -> Self
    where
        I: IntoIterator<Item = (String, Style)>,
    {
        let mut styles: IndexMap<String, Style> = entries.into_iter().collect();
        match styles.len() {
            0 => StyleGroup::empty(parent),
            1 => match styles.pop() {
                Some((key, value)) => StyleGroup::single(key, value, parent),
                None => StyleGroup::empty(parent),
            },
            _ => StyleGroup::multi(styles, parent),
        }
    }

    /// The style this group derives from.
    pub fn parent(&self) -> Option<&Style> {
        match self {
            StyleGroup::Empty { parent }
            | StyleGroup::Single { parent, .. }
            | StyleGroup::Multi { parent, .. } => parent.as_ref(),
        }
    }

    fn local(&self, key: &str) -> Option<&Style> {
        match self {
            StyleGroup::Empty { .. } => None,
            StyleGroup::Single {
                key: own, value, ..
            } => (own == key).then_some(value),
            StyleGroup::Multi { styles, .. } => styles.get(key),
        }
    }
}

impl Group for StyleGroup {
    fn get(&self, node: &Node, key: &str) -> Option<Style> {
        if let Some(style) = self.local(key) {
            return Some(style.clone());
        }
        self.parent()?.accept((node, key), &ChildLookup)
    }

    fn keys(&self) -> Vec<String> {
        match self {
            StyleGroup::Empty { .. } => Vec::new(),
            StyleGroup::Single { key, .. } => vec![key.clone()],
            StyleGroup::Multi { styles, .. } => styles.keys().cloned().collect(),
        }
    }
}

impl From<StyleGroup> for Style {
    fn from(group: StyleGroup) -> Self {
        Style::Group(Arc::new(group))
    }
}

struct Origin<'a>(Option<&'a Style>);

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(parent) => write!(f, "from: {}", parent),
            None => f.write_str("from: none"),
        }
    }
}

impl fmt::Debug for StyleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = Origin(self.parent());
        match self {
            StyleGroup::Empty { .. } => write!(f, "Group({})", from),
            StyleGroup::Single { key, value, .. } => {
                write!(f, "Group({}: {}, {})", key, value, from)
            }
            StyleGroup::Multi { styles, .. } => {
                f.write_str("Group(")?;
                for (key, value) in styles {
                    write!(f, "{}: {}, ", key, value)?;
                }
                write!(f, "{})", from)
            }
        }
    }
}

/// Finds the direct child named by the key, looking through references.
///
/// Values have no children. Groups answer with [`Group::get`]. References are
/// followed from the same node and the question is asked again of their
/// target, so a chain of references costs no path segment.
pub(crate) struct ChildLookup;

impl<'a> Visitor<(&'a Node, &'a str)> for ChildLookup {
    type Output = Option<Style>;

    fn on_value(&self, _: (&'a Node, &'a str), _: &Arc<dyn Value>) -> Option<Style> {
        None
    }

    fn on_group(&self, (node, key): (&'a Node, &'a str), group: &Arc<dyn Group>) -> Option<Style> {
        group.get(node, key)
    }

    fn on_reference(
        &self,
        (node, key): (&'a Node, &'a str),
        reference: &Arc<dyn Reference>,
    ) -> Option<Style> {
        let _guard = ReferenceGuard::enter(reference).ok()?;
        match reference.get(node) {
            Ok(target) => target.accept((node, key), self),
            Err(error) => {
                trace!(key, %error, "reference target unavailable during lookup");
                None
            }
        }
    }
}
