use alloc::borrow::Cow;
use core::panic::Location;

use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum RegistryErrorKind {
    #[error("Invalid type {type_info}: field `{field}` is declared more than once")]
    InvalidType { type_info: TypeInfo, field: Cow<'static, str> },
    #[error("Invalid constructor of {type_info}: variadic parameter #{index} must be the last one")]
    InvalidConstructor { type_info: TypeInfo, index: usize },
    #[error("Alias {interface} is not an interface")]
    NotInterface { interface: TypeInfo },
    #[error("{type_info} does not implement interface {interface}, the alias was built for {implementor}")]
    NotImplementInterface {
        type_info: TypeInfo,
        interface: TypeInfo,
        implementor: TypeInfo,
    },
}

/// Registration error annotated with the registration call site
#[derive(thiserror::Error, Debug)]
#[error("{location}: {kind}")]
pub struct RegistryError {
    pub location: &'static Location<'static>,
    pub kind: RegistryErrorKind,
}

impl RegistryError {
    #[inline]
    #[must_use]
    pub(crate) const fn new(location: &'static Location<'static>, kind: RegistryErrorKind) -> Self {
        Self { location, kind }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &RegistryErrorKind {
        &self.kind
    }
}
