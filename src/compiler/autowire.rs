use alloc::{borrow::Cow, boxed::Box, sync::Arc, vec::Vec};

use super::{BoxedCloneCreate, Compiler, CreateErrorKind, Created};
use crate::{
    any::TypeInfo,
    dependency::{Argument, Dependency},
    dependency_resolver::DependencyResolver,
    errors::{InstantiatorErrorKind, RegistryErrorKind, ResolveErrorKind},
    service::{service_fn, BoxCloneService},
};

type Assign<T> = Arc<dyn Fn(&mut T, Argument) -> Result<(), ResolveErrorKind> + Send + Sync>;

/// Field table of a structure the container creates by itself.
///
/// The instance starts as `T::default()` and every declared field is assigned its resolved value,
/// in declaration order. A structure without declared fields is just default-initialized.
///
/// # Examples
/// ```rust
/// use std::sync::Arc;
/// use trellis::{Autowire, Builder};
///
/// struct Database;
///
/// #[derive(Default)]
/// struct UserService {
///     database: Option<Arc<Database>>,
/// }
///
/// let builder = Builder::new();
/// builder.add(Database).unwrap();
/// builder
///     .autowire(Autowire::<UserService>::new().field("database", |service, database: Arc<Database>| {
///         service.database = Some(database);
///     }))
///     .unwrap();
///
/// let service = builder.build().get::<UserService>().unwrap();
/// assert!(service.database.is_some());
/// ```
pub struct Autowire<T> {
    fields: Vec<(Dependency, Assign<T>)>,
}

impl<T> Autowire<T>
where
    T: Default + Send + Sync + 'static,
{
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a field, `assign` stores the resolved value into the instance
    #[must_use]
    pub fn field<Dep, F>(mut self, name: impl Into<Cow<'static, str>>, assign: F) -> Self
    where
        Dep: DependencyResolver + 'static,
        F: Fn(&mut T, Dep) + Send + Sync + 'static,
    {
        let mut dependency = Dep::dependency(self.fields.len());
        dependency.name = name.into();

        self.fields.push((
            dependency,
            Arc::new(move |instance: &mut T, argument: Argument| -> Result<(), ResolveErrorKind> {
                assign(instance, Dep::extract(argument)?);
                Ok(())
            }),
        ));
        self
    }

    /// # Errors
    /// Returns [`RegistryErrorKind::InvalidType`] if a field name is declared more than once
    pub(crate) fn compile(self) -> Result<Compiler, RegistryErrorKind> {
        let type_info = TypeInfo::of::<T>();

        for (index, (dependency, _)) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|(declared, _)| declared.name == dependency.name) {
                return Err(RegistryErrorKind::InvalidType {
                    type_info,
                    field: dependency.name.clone(),
                });
            }
        }

        let (dependencies, assigns): (Vec<_>, Vec<_>) = self.fields.into_iter().unzip();
        let create = BoxCloneService(Box::new(service_fn(
            move |arguments: Vec<Argument>| -> Result<Created, CreateErrorKind> {
                let mut instance = T::default();
                for (assign, argument) in assigns.iter().zip(arguments) {
                    assign(&mut instance, argument).map_err(InstantiatorErrorKind::Deps)?;
                }

                Ok(Created {
                    value: Arc::new(instance),
                    closer: None,
                })
            },
        )));

        Ok(Compiler::Autowire(Autowired {
            type_info,
            dependencies,
            create,
        }))
    }
}

impl<T> Default for Autowire<T>
where
    T: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Autowired {
    pub(crate) type_info: TypeInfo,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) create: BoxedCloneCreate,
}

#[cfg(test)]
mod tests {
    use super::Autowire;
    use crate::{
        any::{Handle, TypeInfo},
        dependency::Argument,
        errors::RegistryErrorKind,
    };

    use alloc::{boxed::Box, string::String, sync::Arc, vec, vec::Vec};

    #[derive(Default)]
    struct Handler {
        prefix: Option<Arc<String>>,
        limits: Vec<Arc<u32>>,
    }

    #[test]
    fn test_fields_become_dependencies() {
        let compiler = Autowire::<Handler>::new()
            .field("prefix", |handler, prefix: Option<Arc<String>>| handler.prefix = prefix)
            .field("limits", |handler, limits: Vec<Arc<u32>>| handler.limits = limits)
            .compile()
            .unwrap();

        let dependencies = compiler.dependencies();
        assert_eq!(compiler.type_info(), TypeInfo::of::<Handler>());
        assert_eq!(dependencies.len(), 2);
        assert_eq!(dependencies[0].name, "prefix");
        assert_eq!(dependencies[1].name, "limits");
        assert_eq!(dependencies[1].index, 1);

        let limit: Handle = Box::new(Arc::new(10_u32));
        let created = compiler
            .create(vec![Argument::Unset, Argument::Sequence(vec![limit])])
            .unwrap();
        let handler = created.value.downcast::<Handler>().ok().unwrap();

        assert!(handler.prefix.is_none());
        assert_eq!(handler.limits.len(), 1);
    }

    #[test]
    fn test_no_fields() {
        let compiler = Autowire::<Handler>::new().compile().unwrap();

        assert!(compiler.dependencies().is_empty());
        assert!(compiler.create(Vec::new()).is_ok());
    }

    #[test]
    fn test_duplicate_field() {
        let result = Autowire::<Handler>::new()
            .field("prefix", |handler, prefix: Option<Arc<String>>| handler.prefix = prefix)
            .field("prefix", |handler, prefix: Option<Arc<String>>| handler.prefix = prefix)
            .compile();

        assert!(matches!(result, Err(RegistryErrorKind::InvalidType { .. })));
    }
}
