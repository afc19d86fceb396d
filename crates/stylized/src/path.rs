//! Dotted path tokenization.
//!
//! Every place that accepts a path goes through the same two stages:
//!
//! 1. **Extraction**: a [`PathSource`] pushes raw strings. Strings push
//!    themselves, a reference pushes its name, collections and tuples push
//!    their elements left to right, and `None` pushes nothing.
//! 2. **Sanitizing**: each raw string is split by [`tokenize`] and the results
//!    are flattened into one canonical [`KeyPath`].
//!
//! # Tokenization rules
//!
//! | Input | Segments |
//! |-------|----------|
//! | `"key.value"` | `["key", "value"]` |
//! | `" a. b .c "` | `["a", "b", "c"]` |
//! | `"..key.."` | `["key"]` |
//! | `"key..value"` | `["key", "value"]` |
//! | `"a b.c"` | `["a b", "c"]` |
//! | `" . . "` | `[]` |

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;
use std::sync::Arc;

use crate::node::Node;
use crate::style::Style;

/// Splits a dotted string into trimmed, non-empty segments.
///
/// The returned iterator borrows `text` and is cheap to clone, so the same
/// sequence can be walked again by cloning it before iterating.
///
/// # Example
///
/// ```rust
/// use stylized::tokenize;
///
/// let segments: Vec<&str> = tokenize("  a . b .. c  ").collect();
/// assert_eq!(segments, ["a", "b", "c"]);
/// ```
pub fn tokenize(text: &str) -> DottedSegments<'_> {
    DottedSegments { text, pos: 0 }
}

/// Iterator returned by [`tokenize`].
#[derive(Debug, Clone)]
pub struct DottedSegments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for DottedSegments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut start: Option<usize> = None;
        let mut end = self.pos;

        for (offset, c) in self.text[self.pos..].char_indices() {
            let at = self.pos + offset;
            if c == '.' {
                if let Some(start) = start {
                    self.pos = at + 1;
                    return Some(&self.text[start..end]);
                }
            } else if !c.is_whitespace() {
                if start.is_none() {
                    start = Some(at);
                }
                end = at + c.len_utf8();
            }
        }

        self.pos = self.text.len();
        start.map(|start| &self.text[start..end])
    }
}

impl FusedIterator for DottedSegments<'_> {}

/// Tokenizes every raw string and flattens the segments, in order.
pub fn sanitize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segments = Vec::new();
    for item in raw {
        segments.extend(tokenize(item.as_ref()).map(str::to_owned));
    }
    segments
}

/// Joins segments with single dots.
pub fn join_dotted<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            joined.push('.');
        }
        joined.push_str(segment.as_ref());
    }
    joined
}

/// Anything that can contribute raw, not yet tokenized, path strings.
///
/// Implementations exist for strings, numbers, [`Style`] (a reference
/// contributes its name, a text value its text), `Option`, slices, arrays,
/// vectors, tuples, smart pointers and [`KeyPath`]. Wrap any other `Display`
/// type in [`Text`].
///
/// # Example
///
/// ```rust
/// use stylized::{attr, KeyPath};
///
/// let colors = attr("colors");
/// let path = KeyPath::of(&(&colors, "color.primary", None::<&str>, vec!["dark"]));
/// assert_eq!(path.to_string(), "colors.color.primary.dark");
/// ```
pub trait PathSource {
    /// Appends this source's raw strings to `out`.
    fn extract(&self, out: &mut Vec<String>);

    /// Collects the raw strings into a new vector.
    fn raw_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.extract(&mut out);
        out
    }
}

impl PathSource for str {
    fn extract(&self, out: &mut Vec<String>) {
        out.push(self.to_owned());
    }
}

impl PathSource for String {
    fn extract(&self, out: &mut Vec<String>) {
        out.push(self.clone());
    }
}

impl PathSource for () {
    fn extract(&self, _out: &mut Vec<String>) {}
}

/// A reference contributes its name and a value holding text contributes
/// that text. Other values and groups contribute nothing.
impl PathSource for Style {
    fn extract(&self, out: &mut Vec<String>) {
        match self {
            Style::Reference(reference) => out.push(reference.name()),
            Style::Value(value) => {
                let payload = value.get(&Node::root(self.clone()));
                if let Some(text) = payload.downcast_ref::<String>() {
                    out.push(text.clone());
                } else if let Some(text) = payload.downcast_ref::<&'static str>() {
                    out.push((*text).to_owned());
                }
            }
            Style::Group(_) => {}
        }
    }
}

impl PathSource for KeyPath {
    fn extract(&self, out: &mut Vec<String>) {
        out.extend(self.segments.iter().cloned());
    }
}

impl<T: PathSource + ?Sized> PathSource for &T {
    fn extract(&self, out: &mut Vec<String>) {
        (**self).extract(out);
    }
}

impl<T: PathSource + ?Sized> PathSource for Box<T> {
    fn extract(&self, out: &mut Vec<String>) {
        (**self).extract(out);
    }
}

impl<T: PathSource + ?Sized> PathSource for Rc<T> {
    fn extract(&self, out: &mut Vec<String>) {
        (**self).extract(out);
    }
}

impl<T: PathSource + ?Sized> PathSource for Arc<T> {
    fn extract(&self, out: &mut Vec<String>) {
        (**self).extract(out);
    }
}

impl<T: PathSource> PathSource for Option<T> {
    fn extract(&self, out: &mut Vec<String>) {
        if let Some(inner) = self {
            inner.extract(out);
        }
    }
}

impl<T: PathSource> PathSource for [T] {
    fn extract(&self, out: &mut Vec<String>) {
        for item in self {
            item.extract(out);
        }
    }
}

impl<T: PathSource, const N: usize> PathSource for [T; N] {
    fn extract(&self, out: &mut Vec<String>) {
        self.as_slice().extract(out);
    }
}

impl<T: PathSource> PathSource for Vec<T> {
    fn extract(&self, out: &mut Vec<String>) {
        self.as_slice().extract(out);
    }
}

impl<T: PathSource> PathSource for VecDeque<T> {
    fn extract(&self, out: &mut Vec<String>) {
        for item in self {
            item.extract(out);
        }
    }
}

macro_rules! display_path_source {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PathSource for $ty {
                fn extract(&self, out: &mut Vec<String>) {
                    out.push(self.to_string());
                }
            }
        )*
    };
}

display_path_source!(char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! tuple_path_source {
    ($($name:ident $var:ident),+) => {
        impl<$($name: PathSource),+> PathSource for ($($name,)+) {
            fn extract(&self, out: &mut Vec<String>) {
                let ($($var,)+) = self;
                $($var.extract(out);)+
            }
        }
    };
}

tuple_path_source!(A a);
tuple_path_source!(A a, B b);
tuple_path_source!(A a, B b, C c);
tuple_path_source!(A a, B b, C c, D d);
tuple_path_source!(A a, B b, C c, D d, E e);
tuple_path_source!(A a, B b, C c, D d, E e, F f);
tuple_path_source!(A a, B b, C c, D d, E e, F f, G g);
tuple_path_source!(A a, B b, C c, D d, E e, F f, G g, H h);

/// Uses a value's `Display` output as a raw path string.
///
/// ```rust
/// use std::fmt;
/// use stylized::{KeyPath, Text};
///
/// struct ColorsPrimary;
///
/// impl fmt::Display for ColorsPrimary {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("colors.colorPrimary")
///     }
/// }
///
/// assert_eq!(KeyPath::of(&Text(ColorsPrimary)).len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<T>(pub T);

impl<T: fmt::Display> PathSource for Text<T> {
    fn extract(&self, out: &mut Vec<String>) {
        out.push(self.0.to_string());
    }
}

/// A canonical sequence of path segments.
///
/// Segments are never empty and never carry surrounding whitespace or dots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Extracts and sanitizes any path source.
    pub fn of<P: PathSource + ?Sized>(source: &P) -> Self {
        Self {
            segments: sanitize(source.raw_strings()),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the only segment, if the path has exactly one.
    pub fn single(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.segments.iter()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_dotted(&self.segments))
    }
}

impl<'a> IntoIterator for &'a KeyPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATORS: &[&str] = &[".", "..", " ..", ".. ", ". .", " . .", ". . "];
    const BLANKS: &[&str] = &["", " ", "\u{a0}", "\u{202f}"];

    fn tokens(text: &str) -> Vec<&str> {
        tokenize(text).collect()
    }

    fn permutations(items: &[&str]) -> Vec<String> {
        if items.is_empty() {
            return vec![String::new()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for tail in permutations(&rest) {
                out.push(format!("{}{}", head, tail));
            }
        }
        out
    }

    #[test]
    fn test_tokenize_blank_inputs_are_empty() {
        for &blank in BLANKS {
            assert!(tokens(blank).is_empty(), "input {:?}", blank);
            for &separator in SEPARATORS {
                for input in permutations(&[separator, blank])
                    .into_iter()
                    .chain(permutations(&[blank, separator, separator]))
                    .chain(permutations(&[blank, blank, separator]))
                {
                    assert!(tokens(&input).is_empty(), "input {:?}", input);
                }
            }
        }
    }

    #[test]
    fn test_tokenize_single_item() {
        assert_eq!(tokens("key"), ["key"]);
        for &blank in BLANKS {
            for input in permutations(&[blank, "key"]) {
                assert_eq!(tokens(&input), ["key"], "input {:?}", input);
            }
            for &separator in SEPARATORS {
                for input in permutations(&[blank, separator, "key"])
                    .into_iter()
                    .chain(permutations(&[separator, blank, separator, "key"]))
                {
                    assert_eq!(tokens(&input), ["key"], "input {:?}", input);
                }
            }
        }
    }

    #[test]
    fn test_tokenize_two_items() {
        assert_eq!(tokens("key.value"), ["key", "value"]);
        for &blank in BLANKS {
            for key in permutations(&["key", blank, blank]) {
                for value in permutations(&["value", blank, blank]) {
                    let input = format!("{}.{}", key, value);
                    assert_eq!(tokens(&input), ["key", "value"], "input {:?}", input);
                }
            }
        }
        for &separator in SEPARATORS {
            for key in permutations(&["key", separator]) {
                for value in permutations(&["value", separator]) {
                    let input = format!("{}.{}", key, value);
                    assert_eq!(tokens(&input), ["key", "value"], "input {:?}", input);
                }
            }
        }
    }

    #[test]
    fn test_tokenize_three_items() {
        assert_eq!(tokens("a.b.c"), ["a", "b", "c"]);
        assert_eq!(tokens("  a . b .. c  "), ["a", "b", "c"]);
        for &separator in SEPARATORS {
            for a in permutations(&["a", separator]) {
                for b in permutations(&["b", separator]) {
                    for c in permutations(&["c", separator]) {
                        let input = format!("{}.{}.{}", a, b, c);
                        assert_eq!(tokens(&input), ["a", "b", "c"], "input {:?}", input);
                    }
                }
            }
        }
    }

    #[test]
    fn test_tokenize_keeps_inner_spaces() {
        assert_eq!(tokens("a b. c"), ["a b", "c"]);
        assert_eq!(tokens("a.b c"), ["a", "b c"]);
        assert_eq!(tokens("a b.c"), ["a b", "c"]);
    }

    #[test]
    fn test_tokenize_multibyte_segments() {
        assert_eq!(tokens("café.thé"), ["café", "thé"]);
        assert_eq!(tokens("\u{a0}ключ\u{a0}.\u{202f}значение"), ["ключ", "значение"]);
    }

    #[test]
    fn test_tokenize_is_restartable() {
        let segments = tokenize("x.y");
        let first: Vec<_> = segments.clone().collect();
        let second: Vec<_> = segments.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sanitize_tokenizes_then_flattens() {
        let raw = vec!["a.b", " ", "..c", "d e"];
        assert_eq!(sanitize(raw), vec!["a", "b", "c", "d e"]);
    }

    #[test]
    fn test_join_dotted() {
        assert_eq!(join_dotted(["a", "b", "c"]), "a.b.c");
        assert_eq!(join_dotted(Vec::<String>::new()), "");
    }

    #[test]
    fn test_key_path_from_mixed_sources() {
        let nested = vec![vec!["a", "b.c"], vec![], vec!["d"]];
        assert_eq!(KeyPath::of(&nested).to_string(), "a.b.c.d");

        let mixed = ("x", 3u8, None::<String>, Some("y"), ["z"]);
        assert_eq!(KeyPath::of(&mixed).segments(), ["x", "3", "y", "z"]);

        assert!(KeyPath::of(&()).is_empty());
        assert!(KeyPath::of(" .. ").is_empty());
    }

    #[test]
    fn test_key_path_single() {
        assert_eq!(KeyPath::of("key").single(), Some("key"));
        assert_eq!(KeyPath::of("a.b").single(), None);
        assert_eq!(KeyPath::of("").single(), None);
    }

    #[test]
    fn test_text_uses_display() {
        assert_eq!(KeyPath::of(&Text(4.5)).segments(), ["4", "5"]);
    }

    #[test]
    fn test_style_sources() {
        use crate::build::{group, named, reference, value};

        assert_eq!(KeyPath::of(&reference("a.b")).segments(), ["a", "b"]);
        assert_eq!(KeyPath::of(&named("c", value(1))).segments(), ["c"]);
        assert_eq!(KeyPath::of(&value("a.b")).segments(), ["a", "b"]);
        assert_eq!(KeyPath::of(&value(String::from("d"))).segments(), ["d"]);

        assert!(KeyPath::of(&value(3)).is_empty());
        let g = group(None, |g| {
            g.set("x", value(1));
            Ok(())
        })
        .unwrap();
        assert!(KeyPath::of(&g).is_empty());
        assert_eq!(KeyPath::of(&(&g, "x")).segments(), ["x"]);
    }
}
