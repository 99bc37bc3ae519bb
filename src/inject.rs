use alloc::{sync::Arc, vec::Vec};
use core::ops::{Deref, DerefMut};

/// Variadic tail of a parameter list.
///
/// Resolved exactly like a `Vec<Arc<T>>` parameter, but a constructor may only take it last.
pub struct Variadic<T: ?Sized>(pub Vec<Arc<T>>);

impl<T: ?Sized> Variadic<T> {
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<Arc<T>> {
        self.0
    }
}

impl<T: ?Sized> Deref for Variadic<T> {
    type Target = Vec<Arc<T>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> DerefMut for Variadic<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: ?Sized> IntoIterator for Variadic<T> {
    type Item = Arc<T>;
    type IntoIter = alloc::vec::IntoIter<Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
