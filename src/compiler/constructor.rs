use alloc::{boxed::Box, sync::Arc, vec::Vec};

use super::{BoxedCloneCreate, CreateErrorKind, Created};
use crate::{
    any::TypeInfo,
    dependency::{misplaced_variadic, Argument, Dependency},
    dependency_resolver::Dependencies,
    errors::{InstantiatorErrorKind, RegistryErrorKind},
    instantiator::Instantiator,
    service::{service_fn, BoxCloneService},
};

pub(crate) struct Constructor {
    pub(crate) type_info: TypeInfo,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) create: BoxedCloneCreate,
}

impl Constructor {
    /// # Errors
    /// Returns [`RegistryErrorKind::InvalidConstructor`] if a variadic parameter is not the last one
    pub(crate) fn new<Inst, Deps>(instantiator: Inst) -> Result<Self, RegistryErrorKind>
    where
        Inst: Instantiator<Deps>,
        Deps: Dependencies + 'static,
    {
        let type_info = TypeInfo::of::<Inst::Provides>();
        let dependencies = Deps::dependencies();

        if let Some(dependency) = misplaced_variadic(&dependencies) {
            return Err(RegistryErrorKind::InvalidConstructor {
                type_info,
                index: dependency.index,
            });
        }

        let mut instantiator = instantiator;
        let create = BoxCloneService(Box::new(service_fn(move |arguments: Vec<Argument>| -> Result<Created, CreateErrorKind> {
            let dependencies = Deps::extract_all(arguments).map_err(InstantiatorErrorKind::Deps)?;
            let (provides, closer) = instantiator
                .instantiate(dependencies)
                .map_err(|err| InstantiatorErrorKind::Factory(err.into()))?;

            Ok(Created {
                value: Arc::new(provides),
                closer,
            })
        })));

        Ok(Self {
            type_info,
            dependencies,
            create,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Constructor;
    use crate::{
        any::{Handle, TypeInfo},
        compiler::Compiler,
        dependency::Argument,
        errors::{InstantiateErrorKind, InstantiatorErrorKind, RegistryErrorKind, ResolveErrorKind},
        inject::Variadic,
        instantiator::with_closer,
        Closer,
    };

    use alloc::{boxed::Box, string::String, sync::Arc, vec};

    #[test]
    fn test_constructor_describes_parameters() {
        let constructor = Constructor::new(|name: Arc<String>, _: Option<Arc<u8>>| {
            Ok::<_, InstantiateErrorKind>(name.len())
        })
        .unwrap();

        assert_eq!(constructor.type_info, TypeInfo::of::<usize>());
        assert_eq!(constructor.dependencies.len(), 2);
        assert_eq!(constructor.dependencies[1].index, 1);
    }

    #[test]
    fn test_variadic_must_be_last() {
        let result = Constructor::new(|_: Variadic<String>, _: Arc<u8>| Ok::<_, InstantiateErrorKind>(()));

        assert!(matches!(
            result,
            Err(RegistryErrorKind::InvalidConstructor { index: 0, .. })
        ));
        assert!(Constructor::new(|_: Arc<u8>, _: Variadic<String>| Ok::<_, InstantiateErrorKind>(())).is_ok());
    }

    #[test]
    fn test_create() {
        let compiler = Compiler::Constructor(
            Constructor::new(with_closer(|value: Arc<u8>| {
                Ok::<_, InstantiateErrorKind>((u32::from(*value) * 2, Closer::infallible(|| {})))
            }))
            .unwrap(),
        );

        let handle: Handle = Box::new(Arc::new(21_u8));
        let created = compiler.create(vec![Argument::Single(handle)]).unwrap();

        assert_eq!(created.value.downcast::<u32>().ok().as_deref(), Some(&42));
        assert!(created.closer.is_some());
    }

    #[test]
    fn test_create_errors() {
        let compiler = Compiler::Constructor(
            Constructor::new(|_: Arc<u8>| Err::<u32, _>(anyhow::anyhow!("unavailable"))).unwrap(),
        );

        assert!(matches!(
            compiler.create(vec![Argument::Unset]),
            Err(InstantiatorErrorKind::Deps(ResolveErrorKind::DoesNotExist { .. }))
        ));

        let handle: Handle = Box::new(Arc::new(1_u8));
        assert!(matches!(
            compiler.create(vec![Argument::Single(handle)]),
            Err(InstantiatorErrorKind::Factory(InstantiateErrorKind::Custom(_)))
        ));
    }
}
