use alloc::{boxed::Box, sync::Arc, vec::Vec};

use crate::{
    any::{Handle, TypeInfo},
    dependency::{Argument, Dependency, DependencyKind},
    errors::ResolveErrorKind,
    inject::Variadic,
    Container,
};

/// Injectable slot shape: a parameter of a constructor or a called function, an autowired field,
/// or the target of [`Container::resolve`].
///
/// Implemented for `Arc<T>`, `Option<Arc<T>>`, `Vec<Arc<T>>`, [`Variadic<T>`] and [`Container`].
pub trait DependencyResolver: Sized {
    /// Describes the slot at position `index`
    fn dependency(index: usize) -> Dependency;

    #[doc(hidden)]
    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind>;

    #[inline]
    #[must_use]
    fn type_info() -> TypeInfo {
        Self::dependency(0).type_info
    }
}

fn single<T: ?Sized + 'static>(index: usize, optional: bool) -> Dependency {
    let type_info = TypeInfo::of::<T>();
    Dependency {
        name: type_info.short_name().into(),
        index,
        type_info,
        kind: DependencyKind::Single,
        optional,
    }
}

fn sequence<T: ?Sized + Send + Sync + 'static>(index: usize, variadic: bool) -> Dependency {
    let element = TypeInfo::of::<T>();
    Dependency {
        name: element.short_name().into(),
        index,
        type_info: TypeInfo::of::<Vec<Arc<T>>>(),
        kind: if variadic {
            DependencyKind::Variadic { element }
        } else {
            DependencyKind::Sequence { element }
        },
        optional: false,
    }
}

fn downcast<T: ?Sized + Send + Sync + 'static>(handle: Handle) -> Result<Arc<T>, ResolveErrorKind> {
    handle
        .downcast::<Arc<T>>()
        .map(|value| *value)
        .map_err(|_| ResolveErrorKind::IncorrectType {
            expected: TypeInfo::of::<Arc<T>>(),
            actual: "handle of another type",
        })
}

fn unexpected<T: ?Sized + 'static>(argument: &Argument) -> ResolveErrorKind {
    ResolveErrorKind::IncorrectType {
        expected: TypeInfo::of::<T>(),
        actual: match argument {
            Argument::Unset => "unset argument",
            Argument::Single(_) => "single argument",
            Argument::Sequence(_) => "sequence argument",
            Argument::Container(_) => "container argument",
        },
    }
}

/// Each handle holds either one element or a whole registered sequence
fn collect<T: ?Sized + Send + Sync + 'static>(handles: Vec<Handle>) -> Result<Vec<Arc<T>>, ResolveErrorKind> {
    let mut values = Vec::with_capacity(handles.len());
    for handle in handles {
        let handle = match handle.downcast::<Arc<T>>() {
            Ok(value) => {
                values.push(*value);
                continue;
            }
            Err(handle) => handle,
        };
        let sequence: Box<Arc<Vec<Arc<T>>>> = handle.downcast().map_err(|_| ResolveErrorKind::IncorrectType {
            expected: TypeInfo::of::<Arc<T>>(),
            actual: "handle of another type",
        })?;
        values.extend(sequence.iter().cloned());
    }
    Ok(values)
}

impl<T: ?Sized + Send + Sync + 'static> DependencyResolver for Arc<T> {
    fn dependency(index: usize) -> Dependency {
        single::<T>(index, false)
    }

    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind> {
        match argument {
            Argument::Single(handle) => downcast(handle),
            Argument::Unset => Err(ResolveErrorKind::DoesNotExist {
                type_info: TypeInfo::of::<T>(),
            }),
            argument => Err(unexpected::<Self>(&argument)),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> DependencyResolver for Option<Arc<T>> {
    fn dependency(index: usize) -> Dependency {
        single::<T>(index, true)
    }

    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind> {
        match argument {
            Argument::Single(handle) => downcast(handle).map(Some),
            Argument::Unset => Ok(None),
            argument => Err(unexpected::<Self>(&argument)),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> DependencyResolver for Vec<Arc<T>> {
    fn dependency(index: usize) -> Dependency {
        sequence::<T>(index, false)
    }

    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind> {
        match argument {
            Argument::Sequence(handles) => collect(handles),
            Argument::Unset => Ok(Vec::new()),
            argument => Err(unexpected::<Self>(&argument)),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> DependencyResolver for Variadic<T> {
    fn dependency(index: usize) -> Dependency {
        sequence::<T>(index, true)
    }

    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind> {
        Vec::<Arc<T>>::extract(argument).map(Variadic)
    }
}

impl DependencyResolver for Container {
    fn dependency(index: usize) -> Dependency {
        let type_info = TypeInfo::of::<Container>();
        Dependency {
            name: type_info.short_name().into(),
            index,
            type_info,
            kind: DependencyKind::Container,
            optional: false,
        }
    }

    fn extract(argument: Argument) -> Result<Self, ResolveErrorKind> {
        match argument {
            Argument::Container(container) => Ok(container),
            argument => Err(unexpected::<Self>(&argument)),
        }
    }
}

/// Ordered parameter list of a constructor or a called function
pub trait Dependencies: Sized {
    fn dependencies() -> Vec<Dependency>;

    #[doc(hidden)]
    fn extract_all(arguments: Vec<Argument>) -> Result<Self, ResolveErrorKind>;
}

macro_rules! impl_dependencies {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments, clippy::vec_init_then_push)]
        impl<$($ty,)*> Dependencies for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            fn dependencies() -> Vec<Dependency> {
                let mut index = 0;
                let mut dependencies = Vec::new();
                $(
                    dependencies.push($ty::dependency(index));
                    index += 1;
                )*
                dependencies
            }

            fn extract_all(arguments: Vec<Argument>) -> Result<Self, ResolveErrorKind> {
                let mut arguments = arguments.into_iter();
                Ok(($($ty::extract(arguments.next().unwrap_or(Argument::Unset))?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependencies);

#[cfg(test)]
mod tests {
    use super::{Dependencies, DependencyResolver};
    use crate::{
        any::{Handle, TypeInfo},
        dependency::{Argument, DependencyKind},
        errors::ResolveErrorKind,
        inject::Variadic,
        Container,
    };

    use alloc::{boxed::Box, string::String, sync::Arc, vec, vec::Vec};

    fn handle<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Handle {
        Box::new(value)
    }

    #[test]
    fn test_describe_slots() {
        let dependencies = <(Arc<String>, Option<Arc<u8>>, Vec<Arc<String>>, Variadic<String>)>::dependencies();

        assert_eq!(dependencies.len(), 4);
        assert_eq!(dependencies[0].name, "String");
        assert_eq!(dependencies[0].type_info, TypeInfo::of::<String>());
        assert_eq!(dependencies[0].kind, DependencyKind::Single);
        assert!(!dependencies[0].optional);
        assert!(dependencies[1].optional);
        assert_eq!(dependencies[1].index, 1);
        assert_eq!(dependencies[2].type_info, TypeInfo::of::<Vec<Arc<String>>>());
        assert_eq!(
            dependencies[2].kind,
            DependencyKind::Sequence {
                element: TypeInfo::of::<String>()
            }
        );
        assert_eq!(
            dependencies[3].kind,
            DependencyKind::Variadic {
                element: TypeInfo::of::<String>()
            }
        );
        assert_eq!(Container::type_info(), TypeInfo::of::<Container>());
    }

    #[test]
    fn test_extract_single() {
        let value = Arc::<String>::extract(Argument::Single(handle(Arc::new(String::from("value"))))).unwrap();
        assert_eq!(*value, "value");

        assert!(matches!(
            Arc::<String>::extract(Argument::Unset),
            Err(ResolveErrorKind::DoesNotExist { .. })
        ));
        assert!(matches!(
            Arc::<String>::extract(Argument::Single(handle(Arc::new(1_u8)))),
            Err(ResolveErrorKind::IncorrectType { .. })
        ));
        assert!(Option::<Arc<String>>::extract(Argument::Unset).unwrap().is_none());
    }

    #[test]
    fn test_extract_sequence_appends_registered_sequences() {
        let handles = vec![
            handle(Arc::new(String::from("a"))),
            handle(Arc::new(vec![Arc::new(String::from("b")), Arc::new(String::from("c"))])),
        ];

        let Variadic(values) = Variadic::<String>::extract(Argument::Sequence(handles)).unwrap();
        let values: Vec<&str> = values.iter().map(|value| value.as_str()).collect();

        assert_eq!(values, ["a", "b", "c"]);
        assert!(Vec::<Arc<String>>::extract(Argument::Unset).unwrap().is_empty());
    }
}
