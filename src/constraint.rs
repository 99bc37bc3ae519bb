use alloc::{borrow::Cow, collections::BTreeMap, vec::Vec};
use core::any::TypeId;

use crate::{any::TypeInfo, dependency::Dependency, modifier::Modifier};

/// Configuration of one dependency slot
#[derive(Debug, Clone, Default)]
pub struct Constraint {
    /// Absence of definitions leaves the slot unset instead of failing
    pub optional: bool,
    pub modifiers: Vec<Modifier>,
}

impl Constraint {
    #[inline]
    #[must_use]
    pub const fn new(optional: bool, modifiers: Vec<Modifier>) -> Self {
        Self { optional, modifiers }
    }

    #[inline]
    #[must_use]
    pub const fn optional() -> Self {
        Self {
            optional: true,
            modifiers: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// Constraints of a parameter list, looked up by position, then by name, then by type
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    by_index: BTreeMap<usize, Constraint>,
    by_name: BTreeMap<Cow<'static, str>, Constraint>,
    by_type: BTreeMap<TypeId, Constraint>,
    default: Constraint,
}

impl Constraints {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraint of the parameter at `index`
    #[must_use]
    pub fn index(mut self, index: usize, constraint: Constraint) -> Self {
        self.by_index.insert(index, constraint);
        self
    }

    /// Constraint of the autowired field or parameter named `name`
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>, constraint: Constraint) -> Self {
        self.by_name.insert(name.into(), constraint);
        self
    }

    /// Constraint of every slot resolving `T`: the `T` of `Arc<T>` and `Option<Arc<T>>`,
    /// the whole `Vec<Arc<T>>` of a sequence slot
    #[must_use]
    pub fn of<T: ?Sized + 'static>(mut self, constraint: Constraint) -> Self {
        self.by_type.insert(TypeInfo::of::<T>().id, constraint);
        self
    }

    /// Entries of `other` override the ones of `self`
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.by_index.extend(other.by_index);
        self.by_name.extend(other.by_name);
        self.by_type.extend(other.by_type);
        self
    }

    #[must_use]
    pub(crate) fn choose(&self, dependency: &Dependency) -> &Constraint {
        self.by_index
            .get(&dependency.index)
            .or_else(|| self.by_name.get(&dependency.name))
            .or_else(|| self.by_type.get(&dependency.type_info.id))
            .unwrap_or(&self.default)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty() && self.by_name.is_empty() && self.by_type.is_empty()
    }
}
