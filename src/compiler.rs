mod autowire;
mod constructor;
mod value;

pub use autowire::Autowire;
pub(crate) use constructor::Constructor;
pub(crate) use value::Value;

use alloc::vec::Vec;

use crate::{
    any::{RcAny, TypeInfo},
    closer::Closer,
    dependency::{Argument, Dependency},
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    service::{BoxCloneService, Service as _},
};

/// Recipe a definition was registered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerKind {
    Value,
    Autowire,
    Constructor,
}

pub(crate) struct Created {
    pub(crate) value: RcAny,
    pub(crate) closer: Option<Closer>,
}

pub(crate) type CreateErrorKind = InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>;

pub(crate) type BoxedCloneCreate = BoxCloneService<Vec<Argument>, Created, CreateErrorKind>;

/// Describes and manufactures the instances of one definition
pub(crate) enum Compiler {
    Value(Value),
    Autowire(autowire::Autowired),
    Constructor(Constructor),
}

impl Compiler {
    #[inline]
    #[must_use]
    pub(crate) const fn kind(&self) -> CompilerKind {
        match self {
            Self::Value(_) => CompilerKind::Value,
            Self::Autowire(_) => CompilerKind::Autowire,
            Self::Constructor(_) => CompilerKind::Constructor,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn type_info(&self) -> TypeInfo {
        match self {
            Self::Value(value) => value.type_info,
            Self::Autowire(autowired) => autowired.type_info,
            Self::Constructor(constructor) => constructor.type_info,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn dependencies(&self) -> &[Dependency] {
        match self {
            Self::Value(_) => &[],
            Self::Autowire(autowired) => &autowired.dependencies,
            Self::Constructor(constructor) => &constructor.dependencies,
        }
    }

    /// Creates an instance from the arguments resolved for [`Self::dependencies`], in the same order
    pub(crate) fn create(&self, arguments: Vec<Argument>) -> Result<Created, CreateErrorKind> {
        match self {
            Self::Value(value) => Ok(Created {
                value: value.value.clone(),
                closer: None,
            }),
            Self::Autowire(autowired) => autowired.create.clone().call(arguments),
            Self::Constructor(constructor) => constructor.create.clone().call(arguments),
        }
    }
}
