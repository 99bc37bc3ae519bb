use alloc::{string::String, vec::Vec};
use core::fmt::Write as _;

use crate::{any::TypeInfo, definition::DefinitionId, errors::ResolveErrorKind};

/// Definitions under construction along one resolution path.
///
/// Appending never mutates the receiver, so sibling branches of one resolution
/// each extend their own copy of the parent path.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cycle {
    path: Vec<(DefinitionId, TypeInfo)>,
}

impl Cycle {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { path: Vec::new() }
    }

    #[must_use]
    pub(crate) fn contains(&self, id: DefinitionId) -> bool {
        self.path.iter().any(|(entry, _)| *entry == id)
    }

    /// # Errors
    /// Returns [`ResolveErrorKind::CycleDetected`] if the definition is already on the path
    pub(crate) fn append(&self, id: DefinitionId, type_info: TypeInfo) -> Result<Self, ResolveErrorKind> {
        if self.contains(id) {
            return Err(self.closed_by(type_info, [type_info]));
        }

        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push((id, type_info));
        Ok(Self { path })
    }

    /// Cycle of this path continued by `chain`, which leads back onto the path
    #[must_use]
    pub(crate) fn closed_by(&self, type_info: TypeInfo, chain: impl IntoIterator<Item = TypeInfo>) -> ResolveErrorKind {
        let path = self
            .path
            .iter()
            .map(|(_, type_info)| *type_info)
            .chain(chain)
            .collect();
        ResolveErrorKind::CycleDetected { type_info, path }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.path.len()
    }
}

pub(crate) fn format_path(path: &[TypeInfo]) -> String {
    let mut formatted = String::new();
    for (index, type_info) in path.iter().enumerate() {
        if index > 0 {
            formatted.push_str(" -> ");
        }
        let _ = write!(formatted, "{type_info}");
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::{format_path, Cycle};
    use crate::{any::TypeInfo, definition::DefinitionId, errors::ResolveErrorKind};

    struct A;
    struct B;

    #[test]
    fn test_append_is_copy_on_write() {
        let root = Cycle::new();
        let left = root.append(DefinitionId(1), TypeInfo::of::<A>()).unwrap();
        let right = root.append(DefinitionId(2), TypeInfo::of::<B>()).unwrap();

        assert_eq!(root.len(), 0);
        assert!(left.contains(DefinitionId(1)));
        assert!(!left.contains(DefinitionId(2)));
        assert!(right.contains(DefinitionId(2)));
        assert!(!right.contains(DefinitionId(1)));
    }

    #[test]
    fn test_append_detects_reentry() {
        let path = Cycle::new()
            .append(DefinitionId(1), TypeInfo::of::<A>())
            .and_then(|path| path.append(DefinitionId(2), TypeInfo::of::<B>()))
            .unwrap();

        match path.append(DefinitionId(1), TypeInfo::of::<A>()) {
            Err(ResolveErrorKind::CycleDetected { type_info, path }) => {
                assert_eq!(type_info, TypeInfo::of::<A>());
                assert_eq!(path.len(), 3);
                assert_eq!(
                    format_path(&path),
                    format!("{} -> {} -> {}", TypeInfo::of::<A>(), TypeInfo::of::<B>(), TypeInfo::of::<A>())
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_closed_by_chain() {
        let path = Cycle::new().append(DefinitionId(2), TypeInfo::of::<B>()).unwrap();

        match path.closed_by(TypeInfo::of::<A>(), [TypeInfo::of::<A>(), TypeInfo::of::<B>()]) {
            ResolveErrorKind::CycleDetected { type_info, path } => {
                assert_eq!(type_info, TypeInfo::of::<A>());
                assert_eq!(
                    format_path(&path),
                    format!("{} -> {} -> {}", TypeInfo::of::<B>(), TypeInfo::of::<A>(), TypeInfo::of::<B>())
                );
            }
            kind => panic!("unexpected error: {kind}"),
        }
    }
}
