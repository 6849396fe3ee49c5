//! Segment trie node.
//!
//! Every node owns one pattern segment and its children in registration order.
//! Keys reaching this module already carry the HTTP method as their first
//! segment (`GET/users/:id`), so method and path share one tree.

use crate::error::{RouteError, RouteResult};
use crate::params::Params;
use crate::segment::{Segment, CATCH_ALL_KEY, MULTI_SEGMENT_KEY};

/// A vertex of the route tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Segment text exactly as registered.
    segment: String,

    /// Classified kind of `segment`.
    kind: Segment,

    /// Terminal value, present only where a route ends.
    value: Option<T>,

    /// Children in insertion order.
    children: Vec<Node<T>>,

    /// Whether one of `children` is wildcard-family.
    has_wildcard: bool,
}

impl<T> Node<T> {
    fn new(segment: &str, kind: Segment) -> Self {
        Self {
            segment: segment.to_string(),
            kind,
            value: None,
            children: Vec::new(),
            has_wildcard: false,
        }
    }

    /// Creates the root of a tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", Segment::Static)
    }

    /// Returns the segment text as registered.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns the classified kind.
    #[must_use]
    pub fn kind(&self) -> &Segment {
        &self.kind
    }

    /// Returns the terminal value, if a route ends here.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// The key is validated completely before the tree is touched, so a
    /// rejected registration leaves the tree unchanged.
    pub fn insert(&mut self, key: &str, value: T) -> RouteResult<Option<T>> {
        let segments = parse_key(key)?;
        self.check_conflicts(key, &segments)?;
        Ok(self.insert_segments(&segments, value))
    }

    /// Walks the existing path of `segments` looking for a second wildcard.
    fn check_conflicts(&self, key: &str, segments: &[(&str, Segment)]) -> RouteResult<()> {
        let mut node = self;
        for (raw, kind) in segments {
            if let Some(child) = node.children.iter().find(|c| c.segment == *raw) {
                node = child;
                continue;
            }
            if kind.is_wildcard() {
                if let Some(existing) = node.children.iter().find(|c| c.kind.is_wildcard()) {
                    return Err(RouteError::ConflictingWildcard {
                        pattern: key.to_string(),
                        segment: (*raw).to_string(),
                        existing: existing.segment.clone(),
                    });
                }
            }
            // Everything below a new node is new as well.
            return Ok(());
        }
        Ok(())
    }

    fn insert_segments(&mut self, segments: &[(&str, Segment)], value: T) -> Option<T> {
        let Some(((raw, kind), rest)) = segments.split_first() else {
            return self.value.replace(value);
        };

        let index = match self.children.iter().position(|c| c.segment == *raw) {
            Some(index) => index,
            None => {
                if kind.is_wildcard() {
                    self.has_wildcard = true;
                }
                self.children.push(Node::new(raw, kind.clone()));
                self.children.len() - 1
            }
        };

        self.children[index].insert_segments(rest, value)
    }

    /// Searches `path` below this node.
    ///
    /// Captures are appended to `params`. When nothing matches, `params` is
    /// restored to the length it had on entry.
    pub fn search<'a>(&'a self, path: &str, params: &mut Params) -> Option<&'a T> {
        let mark = params.len();
        let found = self.walk(path, params);
        if found.is_none() {
            params.truncate(mark);
        }
        found
    }

    fn walk<'a>(&'a self, path: &str, params: &mut Params) -> Option<&'a T> {
        let mut node = self;
        let mut rest = path;

        loop {
            rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                return node.value.as_ref();
            }

            let (segment, tail) = match rest.find('/') {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            };

            if let Some(child) = node.static_child(segment) {
                node = child;
                rest = tail;
                continue;
            }

            if !node.has_wildcard {
                return None;
            }

            if let Some(child) = node.children.iter().find(|c| c.kind.capture(segment, params)) {
                node = child;
                rest = tail;
                continue;
            }

            for (kind, key) in [
                (Segment::MultiSegment, MULTI_SEGMENT_KEY),
                (Segment::CatchAll, CATCH_ALL_KEY),
            ] {
                if let Some(child) = node.children.iter().find(|c| c.kind == kind) {
                    params.push(key, rest);
                    return child.value.as_ref();
                }
            }

            return None;
        }
    }

    fn static_child(&self, segment: &str) -> Option<&Node<T>> {
        self.children
            .iter()
            .find(|c| c.kind == Segment::Static && c.segment == segment)
    }

    /// Returns the child whose registered text is `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Node<T>> {
        self.children.iter().find(|c| c.segment == segment)
    }
}

/// Splits and classifies a key, enforcing per-route invariants.
fn parse_key(key: &str) -> RouteResult<Vec<(&str, Segment)>> {
    let raw_segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(raw_segments.len());
    let mut seen: Vec<&str> = Vec::new();

    for (i, raw) in raw_segments.iter().enumerate() {
        let kind = Segment::parse(raw).map_err(|source| RouteError::InvalidSegment {
            pattern: key.to_string(),
            source,
        })?;

        if kind.is_terminal() && i + 1 != raw_segments.len() {
            return Err(RouteError::WildcardNotLast {
                pattern: key.to_string(),
                segment: (*raw).to_string(),
            });
        }

        segments.push((*raw, kind));
    }

    for (_, kind) in &segments {
        for name in kind.param_names() {
            if seen.contains(&name) {
                return Err(RouteError::DuplicateParam {
                    pattern: key.to_string(),
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }
    }

    Ok(segments)
}
