//! Singly linked list whose payload kind is fixed at creation.
//!
//! Nodes live in a slot arena and are chained through `next` indices, so the
//! list keeps its singly linked shape (positional access walks from the head)
//! while unlinked slots are recycled. An explicit tail index keeps
//! `push_back` constant time.

pub mod typed;

pub use typed::{Float, FloatList, Int, IntList, Payload, Text, TextList, TypedList};

/// Longest text payload stored by a list, in bytes.
///
/// Longer inputs are cut at the last char boundary that fits.
pub const MAX_TEXT_LEN: usize = 1024;

#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Kind {
    Int,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// Owned text, `None` when a null string was stored.
    Text(Option<String>),
}

impl Value {
    /// Copies `value` into an owned text payload of at most [`MAX_TEXT_LEN`] bytes.
    #[must_use]
    pub fn text(value: Option<&str>) -> Self {
        Self::Text(value.map(|value| truncate(value, MAX_TEXT_LEN).to_string()))
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Text(_) => Kind::Text,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The borrowed text, `Some(None)` for a stored null string.
    #[must_use]
    pub fn as_text(&self) -> Option<Option<&str>> {
        match self {
            Self::Text(value) => Some(value.as_deref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(Some(value)) => write!(f, "{value:?}"),
            Self::Text(None) => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::text(Some(value))
    }
}

impl From<Option<&str>> for Value {
    fn from(value: Option<&str>) -> Self {
        Self::text(value)
    }
}

fn truncate(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot store {found} value in {expected} list")]
    KindMismatch { expected: Kind, found: Kind },
    #[error("list is empty")]
    Empty,
    #[error("position {pos} is out of bounds for list of size {size}")]
    OutOfBounds { pos: usize, size: usize },
}

#[derive(Debug, Clone)]
struct Node {
    value: Value,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct List {
    kind: Kind,
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    size: usize,
}

impl List {
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            size: 0,
        }
    }

    /// Releases every node together with the list itself.
    pub fn destroy(self) {
        log::trace!("destroying {} list with {} nodes", self.kind, self.size);
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn check_kind(&self, value: &Value) -> Result<(), Error> {
        if value.kind() == self.kind {
            Ok(())
        } else {
            Err(Error::KindMismatch {
                expected: self.kind,
                found: value.kind(),
            })
        }
    }

    fn node(&self, idx: usize) -> &Node {
        match self.slots[idx] {
            Some(ref node) => node,
            None => unreachable!("slot {idx} is linked but vacant"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        match self.slots[idx] {
            Some(ref mut node) => node,
            None => unreachable!("slot {idx} is linked but vacant"),
        }
    }

    fn alloc(&mut self, value: Value, next: Option<usize>) -> usize {
        let node = Node { value, next };
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Node {
        let node = self.slots[idx].take();
        self.free.push(idx);
        match node {
            Some(node) => node,
            None => unreachable!("released vacant slot {idx}"),
        }
    }

    /// Slot index of the node at `pos`, walking from the head.
    fn index_of(&self, pos: usize) -> Result<usize, Error> {
        if pos >= self.size {
            return Err(Error::OutOfBounds {
                pos,
                size: self.size,
            });
        }
        let mut idx = self.head.ok_or(Error::Empty)?;
        for _ in 0..pos {
            idx = self
                .node(idx)
                .next
                .ok_or(Error::OutOfBounds { pos, size: self.size })?;
        }
        Ok(idx)
    }

    /// Appends `value` without checking its kind.
    pub(crate) fn append(&mut self, value: Value) {
        let idx = self.alloc(value, None);
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.size += 1;
    }

    /// Inserts `value` before `pos` without checking its kind.
    pub(crate) fn link_before(&mut self, pos: usize, value: Value) {
        if pos >= self.size {
            self.append(value);
            return;
        }
        if pos == 0 {
            let idx = self.alloc(value, self.head);
            self.head = Some(idx);
        } else {
            let Ok(prev) = self.index_of(pos - 1) else {
                unreachable!("position {} is within size {}", pos - 1, self.size);
            };
            let next = self.node(prev).next;
            let idx = self.alloc(value, next);
            self.node_mut(prev).next = Some(idx);
        }
        self.size += 1;
    }

    /// Replaces the payload at `pos` without checking its kind.
    pub(crate) fn replace(&mut self, pos: usize, value: Value) -> Result<Value, Error> {
        let idx = self.index_of(pos)?;
        Ok(std::mem::replace(&mut self.node_mut(idx).value, value))
    }

    pub fn push_back(&mut self, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        self.check_kind(&value)?;
        self.append(value);
        Ok(())
    }

    /// Unlinks the head node and hands back its payload.
    ///
    /// Popping an empty list does nothing.
    pub fn pop_front(&mut self) -> Option<Value> {
        let head = self.head?;
        let node = self.release(head);
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.size -= 1;
        Some(node.value)
    }

    pub fn front(&self) -> Result<&Value, Error> {
        let head = self.head.ok_or(Error::Empty)?;
        Ok(&self.node(head).value)
    }

    pub fn back(&self) -> Result<&Value, Error> {
        let tail = self.tail.ok_or(Error::Empty)?;
        Ok(&self.node(tail).value)
    }

    pub fn get(&self, pos: usize) -> Result<&Value, Error> {
        let idx = self.index_of(pos)?;
        Ok(&self.node(idx).value)
    }

    /// Inserts `value` before position `pos`, or appends when `pos >= len()`.
    pub fn insert(&mut self, pos: usize, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        self.check_kind(&value)?;
        self.link_before(pos, value);
        Ok(())
    }

    /// Replaces the payload at `pos`, returning the previous one.
    pub fn swap(&mut self, pos: usize, value: impl Into<Value>) -> Result<Value, Error> {
        let value = value.into();
        self.check_kind(&value)?;
        self.replace(pos, value)
    }

    /// Keeps the first `n` nodes and releases the rest.
    ///
    /// Trimming to zero destroys the list, so `None` is returned.
    #[must_use]
    pub fn trim(mut self, n: usize) -> Option<Self> {
        if n == 0 {
            self.destroy();
            return None;
        }
        if n >= self.size {
            return Some(self);
        }
        let Ok(last) = self.index_of(n - 1) else {
            unreachable!("position {} is within size {}", n - 1, self.size);
        };
        let mut next = self.node_mut(last).next.take();
        self.tail = Some(last);
        while let Some(idx) = next {
            next = self.release(idx).next;
        }
        self.size = n;
        Some(self)
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.head,
        }
    }
}

pub struct Iter<'a> {
    list: &'a List,
    next: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?);
        self.next = node.next;
        Some(&node.value)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "List<{}>({})[", self.kind, self.size)?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}
