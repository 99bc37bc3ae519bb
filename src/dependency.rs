use alloc::{borrow::Cow, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{any::Handle, any::TypeInfo, Container};

/// How a dependency slot is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Exactly one definition of the type
    Single,
    /// Every definition of the sequence type itself, or else of its element type
    Sequence { element: TypeInfo },
    /// Same as [`DependencyKind::Sequence`], spread into the trailing parameter
    Variadic { element: TypeInfo },
    /// The resolving container itself
    Container,
}

/// Typed input a definition needs before it can be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: Cow<'static, str>,
    pub index: usize,
    pub type_info: TypeInfo,
    pub kind: DependencyKind,
    /// Slot accepts absence, e.g. `Option<Arc<T>>`
    pub optional: bool,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self.kind, DependencyKind::Sequence { .. } | DependencyKind::Variadic { .. })
    }
}

/// First variadic parameter that is not the last one
#[must_use]
pub(crate) fn misplaced_variadic(dependencies: &[Dependency]) -> Option<&Dependency> {
    dependencies
        .iter()
        .rev()
        .skip(1)
        .find(|dependency| matches!(dependency.kind, DependencyKind::Variadic { .. }))
}

/// Resolved value of one dependency before it is extracted into its slot
#[doc(hidden)]
pub enum Argument {
    /// Optional dependency without definitions
    Unset,
    Single(Handle),
    Sequence(Vec<Handle>),
    Container(Container),
}

impl Debug for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Single(_) => f.write_str("Single"),
            Self::Sequence(handles) => f.debug_tuple("Sequence").field(&handles.len()).finish(),
            Self::Container(_) => f.write_str("Container"),
        }
    }
}
