use alloc::{boxed::Box, sync::Arc};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{is_unsized, Handle, RcAny, TypeInfo},
    registry::Projection,
};

/// Interface type a definition is additionally indexed under.
///
/// Built from the cast of the concrete instance into the interface, usually with [`crate::alias!`].
#[derive(Clone)]
pub struct Alias {
    pub(crate) interface: TypeInfo,
    pub(crate) implementor: TypeInfo,
    pub(crate) is_interface: bool,
    pub(crate) projection: Projection,
}

impl Alias {
    #[must_use]
    pub fn new<T, I>(cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        T: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            interface: TypeInfo::of::<I>(),
            implementor: TypeInfo::of::<T>(),
            is_interface: is_unsized::<I>(),
            projection: Arc::new(move |value: RcAny| {
                value.downcast::<T>().ok().map(|value| Box::new(cast(value)) as Handle)
            }),
        }
    }

    #[inline]
    #[must_use]
    pub const fn interface(&self) -> TypeInfo {
        self.interface
    }

    #[inline]
    #[must_use]
    pub const fn implementor(&self) -> TypeInfo {
        self.implementor
    }
}

impl Debug for Alias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("interface", &self.interface)
            .field("implementor", &self.implementor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Alias;
    use crate::any::{RcAny, TypeInfo};

    use alloc::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    #[test]
    fn test_alias_projects_into_interface() {
        let alias = alias!(English => dyn Greeter);

        assert_eq!(alias.interface(), TypeInfo::of::<dyn Greeter>());
        assert_eq!(alias.implementor(), TypeInfo::of::<English>());
        assert!(alias.is_interface);

        let value: RcAny = Arc::new(English);
        let handle = (alias.projection)(value).unwrap();
        let greeter = handle.downcast::<Arc<dyn Greeter>>().unwrap();

        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_alias_to_sized_type() {
        let alias = Alias::new::<English, English>(|value| value);

        assert!(!alias.is_interface);

        let value: RcAny = Arc::new(1_u8);
        assert!((alias.projection)(value).is_none());
    }
}
