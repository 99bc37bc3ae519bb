use alloc::{borrow::Cow, sync::Arc, vec::Vec};
use core::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

use crate::definition::Definition;

/// Pure transform over the candidate definitions of a lookup
#[derive(Clone)]
pub enum Modifier {
    /// Keeps the candidates matching the predicate
    Filter(Arc<dyn Fn(&Definition) -> bool + Send + Sync>),
    /// Reorders the candidates, equal candidates keep their registration order
    Sort(Arc<dyn Fn(&Definition, &Definition) -> Ordering + Send + Sync>),
}

impl Modifier {
    #[inline]
    #[must_use]
    pub fn filter<F>(predicate: F) -> Self
    where
        F: Fn(&Definition) -> bool + Send + Sync + 'static,
    {
        Self::Filter(Arc::new(predicate))
    }

    #[inline]
    #[must_use]
    pub fn sort<F>(compare: F) -> Self
    where
        F: Fn(&Definition, &Definition) -> Ordering + Send + Sync + 'static,
    {
        Self::Sort(Arc::new(compare))
    }

    pub(crate) fn apply<T>(&self, candidates: &mut Vec<T>, definition: impl Fn(&T) -> &Definition) {
        match self {
            Self::Filter(predicate) => candidates.retain(|candidate| predicate(definition(candidate))),
            Self::Sort(compare) => candidates.sort_by(|left, right| compare(definition(left), definition(right))),
        }
    }
}

impl Debug for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(_) => f.write_str("Filter"),
            Self::Sort(_) => f.write_str("Sort"),
        }
    }
}

fn tag_names<I, S>(names: I) -> Vec<Cow<'static, str>>
where
    I: IntoIterator<Item = S>,
    S: Into<Cow<'static, str>>,
{
    names.into_iter().map(Into::into).collect()
}

/// Keeps definitions that have every one of the tags
#[must_use]
pub fn with_tags<I, S>(names: I) -> Modifier
where
    I: IntoIterator<Item = S>,
    S: Into<Cow<'static, str>>,
{
    let names = tag_names(names);
    Modifier::filter(move |definition| names.iter().all(|name| definition.tags().contains(name)))
}

/// Keeps definitions that have none of the tags
#[must_use]
pub fn without_tags<I, S>(names: I) -> Modifier
where
    I: IntoIterator<Item = S>,
    S: Into<Cow<'static, str>>,
{
    let names = tag_names(names);
    Modifier::filter(move |definition| !names.iter().any(|name| definition.tags().contains(name)))
}
