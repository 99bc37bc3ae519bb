use alloc::{sync::Arc, vec::Vec};
use core::{
    fmt::{self, Debug, Display, Formatter},
    ops::Deref,
    panic::Location,
};

use crate::{
    any::TypeInfo,
    compiler::{Compiler, CompilerKind},
    config::Config,
    constraint::Constraints,
    dependency::Dependency,
    tag::Tags,
};

/// Registration order of a definition within its builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionId(pub(crate) usize);

impl DefinitionId {
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Display for DefinitionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registered recipe for obtaining a value of a type.
/// Immutable once registered.
pub struct Definition {
    pub(crate) id: DefinitionId,
    pub(crate) compiler: Compiler,
    pub(crate) tags: Tags,
    pub(crate) constraints: Constraints,
    pub(crate) config: Config,
    pub(crate) aliases: Vec<TypeInfo>,
    pub(crate) location: &'static Location<'static>,
}

impl Definition {
    #[inline]
    #[must_use]
    pub const fn id(&self) -> DefinitionId {
        self.id
    }

    /// Type the definition produces
    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.compiler.type_info()
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> CompilerKind {
        self.compiler.kind()
    }

    #[inline]
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    #[must_use]
    pub const fn is_unshared(&self) -> bool {
        !self.config.cache_provides
    }

    /// Interfaces the definition is additionally indexed under
    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &[TypeInfo] {
        &self.aliases
    }

    /// Call site of the registration
    #[inline]
    #[must_use]
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }

    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        self.compiler.dependencies()
    }

    #[inline]
    #[must_use]
    pub(crate) const fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    #[inline]
    #[must_use]
    pub(crate) const fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

impl Debug for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("id", &self.id)
            .field("type_info", &self.type_info())
            .field("kind", &self.kind())
            .field("tags", &self.tags)
            .field("unshared", &self.is_unshared())
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Read-only view of a definition with its dependencies annotated
#[derive(Debug, Clone)]
pub struct DefinitionView {
    pub(crate) definition: Arc<Definition>,
    pub(crate) dependencies: Vec<DependencyView>,
}

impl DefinitionView {
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyView] {
        &self.dependencies
    }
}

impl Deref for DefinitionView {
    type Target = Definition;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

/// Dependency of a definition and the definitions currently satisfying it
#[derive(Debug, Clone)]
pub struct DependencyView {
    pub dependency: Dependency,
    pub optional: bool,
    pub definitions: Vec<DefinitionId>,
}
