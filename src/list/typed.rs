use super::{Error, Kind, List, Value};
use std::marker::PhantomData;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Int {}
    impl Sealed for super::Float {}
    impl Sealed for super::Text {}
}

/// Payload kind of a [`TypedList`] together with its native types.
pub trait Payload: sealed::Sealed {
    const KIND: Kind;

    /// What is pushed or inserted.
    type Input<'a>;
    /// What is read back without taking ownership.
    type Output<'a>;
    /// What is handed back when a node is unlinked or overwritten.
    type Owned;

    fn into_value(input: Self::Input<'_>) -> Value;
    fn borrow(value: &Value) -> Option<Self::Output<'_>>;
    fn take(value: Value) -> Option<Self::Owned>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Int {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Float {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {}

impl Payload for Int {
    const KIND: Kind = Kind::Int;

    type Input<'a> = i64;
    type Output<'a> = i64;
    type Owned = i64;

    fn into_value(input: i64) -> Value {
        Value::Int(input)
    }

    fn borrow(value: &Value) -> Option<i64> {
        value.as_int()
    }

    fn take(value: Value) -> Option<i64> {
        value.as_int()
    }
}

impl Payload for Float {
    const KIND: Kind = Kind::Float;

    type Input<'a> = f64;
    type Output<'a> = f64;
    type Owned = f64;

    fn into_value(input: f64) -> Value {
        Value::Float(input)
    }

    fn borrow(value: &Value) -> Option<f64> {
        value.as_float()
    }

    fn take(value: Value) -> Option<f64> {
        value.as_float()
    }
}

impl Payload for Text {
    const KIND: Kind = Kind::Text;

    type Input<'a> = Option<&'a str>;
    type Output<'a> = Option<&'a str>;
    type Owned = Option<String>;

    fn into_value(input: Option<&str>) -> Value {
        Value::text(input)
    }

    fn borrow(value: &Value) -> Option<Option<&str>> {
        value.as_text()
    }

    fn take(value: Value) -> Option<Option<String>> {
        match value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Integer list.
pub type IntList = TypedList<Int>;
/// Floating point list.
pub type FloatList = TypedList<Float>;
/// Text list owning a copy of every pushed string.
pub type TextList = TypedList<Text>;

/// A [`List`] whose kind is fixed by `P`, reading and writing native values.
#[derive(Debug, Clone)]
pub struct TypedList<P> {
    inner: List,
    payload: PhantomData<P>,
}

impl<P> Default for TypedList<P>
where
    P: Payload,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TypedList<P>
where
    P: Payload,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: List::new(P::KIND),
            payload: PhantomData,
        }
    }

    fn narrow(value: &Value) -> Result<P::Output<'_>, Error> {
        P::borrow(value).ok_or(Error::KindMismatch {
            expected: P::KIND,
            found: value.kind(),
        })
    }

    pub fn destroy(self) {
        self.inner.destroy();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn push_back(&mut self, value: P::Input<'_>) {
        self.inner.append(P::into_value(value));
    }

    pub fn pop_front(&mut self) -> Option<P::Owned> {
        self.inner.pop_front().and_then(P::take)
    }

    pub fn front(&self) -> Result<P::Output<'_>, Error> {
        Self::narrow(self.inner.front()?)
    }

    pub fn back(&self) -> Result<P::Output<'_>, Error> {
        Self::narrow(self.inner.back()?)
    }

    pub fn get(&self, pos: usize) -> Result<P::Output<'_>, Error> {
        Self::narrow(self.inner.get(pos)?)
    }

    /// Inserts before `pos`, or appends when `pos >= len()`.
    pub fn insert(&mut self, pos: usize, value: P::Input<'_>) {
        self.inner.link_before(pos, P::into_value(value));
    }

    pub fn swap(&mut self, pos: usize, value: P::Input<'_>) -> Result<Option<P::Owned>, Error> {
        let previous = self.inner.replace(pos, P::into_value(value))?;
        Ok(P::take(previous))
    }

    /// See [`List::trim`].
    #[must_use]
    pub fn trim(self, n: usize) -> Option<Self> {
        let inner = self.inner.trim(n)?;
        Some(Self {
            inner,
            payload: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = P::Output<'_>> + '_ {
        self.inner.iter().filter_map(P::borrow)
    }
}

impl<P> std::fmt::Display for TypedList<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::{FloatList, IntList, TextList};
    use color_eyre::eyre;

    #[test]
    fn int_list_fifo() -> eyre::Result<()> {
        let mut list = IntList::new();
        list.push_back(5);
        list.push_back(3);
        list.push_back(9);
        assert_eq!(list.len(), 3);
        assert_eq!(list.pop_front(), Some(5));
        assert_eq!(list.pop_front(), Some(3));
        assert_eq!(list.len(), 1);
        assert_eq!(list.front()?, 9);
        list.destroy();
        Ok(())
    }

    #[test]
    fn float_list_sorted_insert() -> eyre::Result<()> {
        let mut list = FloatList::new();
        for value in [0.5, 2.0, 1.25] {
            let pos = list.iter().take_while(|&have| have <= value).count();
            list.insert(pos, value);
        }
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![0.5, 1.25, 2.0]);
        assert_eq!(list.swap(0, 0.25)?, Some(0.5));
        assert_eq!(list.get(0)?, 0.25);
        Ok(())
    }

    #[test]
    fn text_list_owns_copies() -> eyre::Result<()> {
        let mut name = String::from("KATRINA");
        let mut list = TextList::new();
        list.push_back(Some(name.as_str()));
        list.push_back(None);
        name.make_ascii_lowercase();
        assert_eq!(list.front()?, Some("KATRINA"));
        assert_eq!(list.back()?, None);
        assert_eq!(list.pop_front(), Some(Some("KATRINA".to_string())));
        Ok(())
    }

    #[test]
    fn typed_trim() {
        let mut list = IntList::new();
        for value in 0..5 {
            list.push_back(value);
        }
        let list = list.trim(3);
        assert_eq!(
            list.as_ref().map(|list| list.iter().collect::<Vec<_>>()),
            Some(vec![0, 1, 2])
        );
        assert!(list.and_then(|list| list.trim(0)).is_none());
    }
}
