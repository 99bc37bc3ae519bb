use alloc::boxed::Box;
use core::fmt::{self, Debug, Formatter};

use crate::errors::InstantiateErrorKind;

/// Teardown callback returned by a constructor alongside the instance it created.
///
/// The container collects closers in creation order and runs them in reverse on [`crate::Container::close`].
pub struct Closer(Box<dyn FnOnce() -> Result<(), InstantiateErrorKind> + Send + Sync>);

impl Closer {
    #[inline]
    #[must_use]
    pub fn new<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self(Box::new(move || f().map_err(Into::into)))
    }

    /// Closer that can't fail
    #[inline]
    #[must_use]
    pub fn infallible<F>(f: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self(Box::new(move || {
            f();
            Ok(())
        }))
    }

    #[inline]
    pub(crate) fn close(self) -> Result<(), InstantiateErrorKind> {
        (self.0)()
    }
}

impl Debug for Closer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Closer").finish_non_exhaustive()
    }
}
