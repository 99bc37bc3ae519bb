use alloc::{borrow::Cow, vec::Vec};
use core::{
    fmt::{self, Display, Formatter},
    slice,
};

/// Key-value argument of a [`Tag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub key: Cow<'static, str>,
    pub value: Cow<'static, str>,
}

/// Named, optionally parameterized label of a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: Cow<'static, str>,
    pub args: Vec<Arg>,
}

impl Tag {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn arg(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        self.args.push(Arg {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Value of the first argument with the key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.iter().find(|arg| arg.key == key).map(|arg| arg.value.as_ref())
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (index, Arg { key, value }) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str(")")
    }
}

/// Ordered tag list of a definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First tag with the name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.name == name)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.0.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Tag> for Tags {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = alloc::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
