use alloc::{boxed::Box, sync::Arc};
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    mem,
};

/// Type-erased instance as it is stored in the cache
pub(crate) type RcAny = Arc<dyn Any + Send + Sync>;

/// Type-erased `Arc<K>` for the key type `K` a definition was found under
pub(crate) type Handle = Box<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Short name without module paths, e.g. `Arc<alloc::string::String>` becomes `Arc<String>`
    #[must_use]
    pub fn short_name(&self) -> String {
        let mut short = String::with_capacity(self.name.len());
        let mut segment_start = 0;
        for (index, char) in self.name.char_indices() {
            if matches!(char, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
                short.push_str(last_segment(&self.name[segment_start..index]));
                short.push(char);
                segment_start = index + char.len_utf8();
            }
        }
        short.push_str(last_segment(&self.name[segment_start..]));
        short
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Trait objects and slices are referenced through fat pointers, sized types through thin ones
#[inline]
#[must_use]
pub(crate) const fn is_unsized<T: ?Sized>() -> bool {
    mem::size_of::<*const T>() != mem::size_of::<*const ()>()
}
