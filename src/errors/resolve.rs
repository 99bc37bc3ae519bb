use alloc::{boxed::Box, string::String};
use core::panic::Location;

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::{any::TypeInfo, cycle::format_path};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Type {type_info} does not exist")]
    DoesNotExist { type_info: TypeInfo },
    #[error("Type {type_info} has {count} definitions, but a single one is requested")]
    MultipleDefinitions { type_info: TypeInfo, count: usize },
    #[error("Type {type_info}: cycle detected: {}", format_path(.path))]
    CycleDetected { type_info: TypeInfo, path: Box<[TypeInfo]> },
    #[error("Function {function}: variadic parameter {index} must be the last one")]
    InvalidFunction { function: &'static str, index: usize },
    #[error("Incorrect provides type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: &'static str },
    #[error("Type {type_info} (registered at {location}): {source}")]
    Instantiator {
        type_info: TypeInfo,
        location: &'static Location<'static>,
        source: InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>,
    },
    #[error("Unable to resolve target because the container panicked: {message}")]
    Panicked { message: String },
    #[error(transparent)]
    Call(InstantiateErrorKind),
}

/// Resolution error annotated with the call site of the top-level resolve or call
#[derive(thiserror::Error, Debug)]
#[error("{location}: {kind}")]
pub struct ResolveError {
    pub location: &'static Location<'static>,
    pub kind: ResolveErrorKind,
}

impl ResolveError {
    #[inline]
    #[must_use]
    pub(crate) const fn new(location: &'static Location<'static>, kind: ResolveErrorKind) -> Self {
        Self { location, kind }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ResolveErrorKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn into_kind(self) -> ResolveErrorKind {
        self.kind
    }
}
