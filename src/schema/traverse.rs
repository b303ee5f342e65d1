//! Depth-first leaf traversal of JSON documents
//!
//! The traversal is a lazy iterator driven by an explicit stack of child
//! iterators, so document depth never turns into call-stack depth and a
//! consumer can stop early (e.g. `.take(limit)`).

use crate::path::{value_text, PathExpression, PathSegment};
use serde_json::Value;
use std::borrow::Cow;

/// A scalar found during traversal, with the path that reaches it
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<'a> {
    /// Path from the document root to the scalar
    pub path: PathExpression,
    /// The scalar itself
    pub value: &'a Value,
}

impl Leaf<'_> {
    /// String form of the scalar
    pub fn text(&self) -> Cow<'_, str> {
        value_text(self.value)
    }
}

/// Pending children of one compound node
enum Frame<'a> {
    Object(serde_json::map::Iter<'a>),
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
}

impl<'a> Frame<'a> {
    /// Open a frame for a compound value; `None` for scalars
    fn open(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Object(map.iter())),
            Value::Array(items) => Some(Self::Array(items.iter().enumerate())),
            _ => None,
        }
    }

    fn next_child(&mut self) -> Option<(PathSegment, &'a Value)> {
        match self {
            Self::Object(iter) => iter
                .next()
                .map(|(key, value)| (PathSegment::Key(key.clone()), value)),
            Self::Array(iter) => iter
                .next()
                .map(|(position, value)| (PathSegment::Index(position), value)),
        }
    }
}

/// Lazy depth-first sequence of leaves, in document order
pub struct Traversal<'a> {
    root: Option<&'a Value>,
    stack: Vec<Frame<'a>>,
    prefix: Vec<PathSegment>,
}

impl<'a> Traversal<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root: Some(root),
            stack: Vec::new(),
            prefix: Vec::new(),
        }
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = Leaf<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            match Frame::open(root) {
                Some(frame) => self.stack.push(frame),
                None => {
                    // A scalar document is its own single leaf
                    let path = PathExpression::new(vec![PathSegment::Key(
                        value_text(root).into_owned(),
                    )])?;
                    return Some(Leaf { path, value: root });
                }
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some((segment, child)) = frame.next_child() else {
                self.stack.pop();
                self.prefix.truncate(self.stack.len().saturating_sub(1));
                continue;
            };

            if let Some(child_frame) = Frame::open(child) {
                self.prefix.push(segment);
                self.stack.push(child_frame);
                continue;
            }

            let mut segments = Vec::with_capacity(self.prefix.len() + 1);
            segments.extend(self.prefix.iter().cloned());
            segments.push(segment);
            let path = PathExpression::new(segments)?;
            return Some(Leaf { path, value: child });
        }
    }
}

/// Walk a document and yield every leaf with its path
///
/// Empty objects and arrays contribute no leaves. A scalar document yields
/// itself under a one-segment path named after its own text; that path does
/// not extract back to the scalar, which is intended.
pub fn traverse(value: &Value) -> Traversal<'_> {
    Traversal::new(value)
}

/// Count the leaves of a document without materializing paths
pub fn count_leaves(value: &Value) -> usize {
    let mut count = 0;
    let mut pending: Vec<&Value> = vec![value];

    while let Some(current) = pending.pop() {
        match current {
            Value::Object(map) => pending.extend(map.values()),
            Value::Array(items) => pending.extend(items.iter()),
            _ => count += 1,
        }
    }

    count
}
