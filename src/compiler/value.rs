use alloc::sync::Arc;

use crate::any::{RcAny, TypeInfo};

/// Value built outside the container, served as is on every request
pub(crate) struct Value {
    pub(crate) type_info: TypeInfo,
    pub(crate) value: RcAny,
}

impl Value {
    #[inline]
    #[must_use]
    pub(crate) fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            value: Arc::new(value),
        }
    }
}
