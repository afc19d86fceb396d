//! # Stylized - inheritable style trees with lazy references
//!
//! Stylized resolves named attributes through a tree of layered groups. A
//! group can derive from another group, any entry can point somewhere else by
//! a dotted path, and nothing is looked up until a value is actually read.
//! That makes it possible to describe a base theme once and derive variants
//! that override a handful of attributes without copying the rest.
//!
//! ## Core concepts
//!
//! - [`Style`]: one of three kinds
//!     - a **value** holding an opaque payload,
//!     - a **group** of named children with an optional parent it derives from,
//!     - a **reference** that yields another style when asked.
//! - [`Node`]: a position in the tree together with the lexical scopes around it.
//!   Lookups that miss locally fall back to the enclosing scopes.
//! - [`KeyPath`]: the canonical dotted path. Anything implementing
//!   [`PathSource`] (strings, references, tuples, vectors, `Option`) can be used
//!   wherever a path is expected.
//!
//! ## Quick start
//!
//! ```rust
//! use stylized::{attr, group, reference, value, Result};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Color { Blue, Green, White }
//!
//! # fn main() -> Result<()> {
//! let colors = group(None, |g| {
//!     g.set("blue", value(Color::Blue));
//!     g.set("white", value(Color::White));
//!     g.set("green", value(Color::Green));
//!     Ok(())
//! })?;
//!
//! // A derived theme: `primary` points at `green`, which is only
//! // defined in the parent group.
//! let theme = group(Some(colors), |g| {
//!     g.set("primary", reference("green"));
//!     Ok(())
//! })?;
//!
//! assert_eq!(theme.get::<Color, _>("primary")?, Color::Green);
//! assert_eq!(theme.get::<Color, _>(&attr("white"))?, Color::White);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cycles
//!
//! References are followed lazily, so nothing stops a reference from leading
//! back to itself. Following is capped at [`max_reference_depth`] nested
//! references per thread; a read that runs into the cap fails with
//! [`StyleError::ReferenceDepthExceeded`].

pub mod build;
pub mod config;
mod error;
pub mod node;
pub mod path;
mod resolve;
pub mod style;

pub use build::{
    attr, attr_fn, attr_value, computed, group, named, named_group, reference, reference_to,
    value, GroupBuilder,
};
pub use config::{max_reference_depth, set_max_reference_depth, DEFAULT_MAX_REFERENCE_DEPTH};
pub use error::{Result, StyleError, TypeMismatch};
pub use node::Node;
pub use path::{join_dotted, sanitize, tokenize, DottedSegments, KeyPath, PathSource, Text};
pub use resolve::Resolved;
pub use style::{Group, Payload, Reference, Style, StyleGroup, Value, Visitor};
