use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec, vec::Vec};
use core::{any::TypeId, panic::Location};
use tracing::debug;

use crate::{
    any::{Handle, RcAny, TypeInfo},
    compiler::Compiler,
    definition::{Definition, DefinitionId, DefinitionView, DependencyView},
    dependency::{Dependency, DependencyKind},
    errors::RegistryErrorKind,
    modifier::Modifier,
    options::Options,
};

/// Turns the cached instance of a definition into a handle of the type it is indexed under
pub(crate) type Projection = Arc<dyn Fn(RcAny) -> Option<Handle> + Send + Sync>;

#[must_use]
pub(crate) fn projection<T: Send + Sync + 'static>() -> Projection {
    Arc::new(|value: RcAny| value.downcast::<T>().ok().map(|value| Box::new(value) as Handle))
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) definition: Arc<Definition>,
    pub(crate) projection: Projection,
}

/// Definitions by the types they are reachable under, in registration order
#[derive(Clone, Default)]
pub(crate) struct Registry {
    entries: BTreeMap<TypeId, Vec<Entry>>,
    definitions: Vec<Arc<Definition>>,
    next_id: usize,
}

impl Registry {
    /// Indexes the definition under its produced type and each of its aliases.
    /// Nothing is indexed if any alias is invalid.
    ///
    /// # Errors
    /// - Returns [`RegistryErrorKind::NotInterface`] if an alias is not a trait object
    /// - Returns [`RegistryErrorKind::NotImplementInterface`] if an alias was built for another type
    pub(crate) fn add(
        &mut self,
        compiler: Compiler,
        projection: Projection,
        options: Options,
        location: &'static Location<'static>,
    ) -> Result<Arc<Definition>, RegistryErrorKind> {
        let type_info = compiler.type_info();
        let Options {
            aliases,
            tags,
            constraints,
            config,
        } = options;

        let mut keys = vec![(type_info, projection)];
        for alias in aliases {
            if alias.interface == type_info {
                debug!(%type_info, "Alias to the produced type skipped");
                continue;
            }
            if !alias.is_interface {
                return Err(RegistryErrorKind::NotInterface {
                    interface: alias.interface,
                });
            }
            if alias.implementor != type_info {
                return Err(RegistryErrorKind::NotImplementInterface {
                    type_info,
                    interface: alias.interface,
                    implementor: alias.implementor,
                });
            }
            if keys.iter().all(|(key, _)| *key != alias.interface) {
                keys.push((alias.interface, alias.projection));
            }
        }

        let definition = Arc::new(Definition {
            id: DefinitionId(self.next_id),
            compiler,
            tags,
            constraints,
            config,
            aliases: keys[1..].iter().map(|(key, _)| *key).collect(),
            location,
        });
        self.next_id += 1;

        for (key, projection) in keys {
            self.entries.entry(key.id).or_default().push(Entry {
                definition: definition.clone(),
                projection,
            });
        }
        self.definitions.push(definition.clone());

        debug!(id = %definition.id(), %type_info, "Definition added");

        Ok(definition)
    }

    /// Definitions indexed under the type, after applying the modifiers in sequence
    #[must_use]
    pub(crate) fn find(&self, type_info: TypeInfo, modifiers: &[Modifier]) -> Vec<Entry> {
        let mut candidates = self.entries.get(&type_info.id).cloned().unwrap_or_default();
        for modifier in modifiers {
            modifier.apply(&mut candidates, |entry| &*entry.definition);
        }
        candidates
    }

    /// Candidates of a dependency slot.
    /// A sequence slot without definitions of its own type falls back to its element type.
    #[must_use]
    pub(crate) fn candidates(&self, dependency: &Dependency, modifiers: &[Modifier]) -> Vec<Entry> {
        match dependency.kind {
            DependencyKind::Single => self.find(dependency.type_info, modifiers),
            DependencyKind::Sequence { element } | DependencyKind::Variadic { element } => {
                let candidates = self.find(dependency.type_info, modifiers);
                if candidates.is_empty() {
                    self.find(element, modifiers)
                } else {
                    candidates
                }
            }
            DependencyKind::Container => Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn definitions(&self) -> &[Arc<Definition>] {
        &self.definitions
    }

    #[must_use]
    pub(crate) fn views(&self) -> Vec<DefinitionView> {
        self.definitions
            .iter()
            .map(|definition| DefinitionView {
                definition: definition.clone(),
                dependencies: definition
                    .dependencies()
                    .iter()
                    .map(|dependency| {
                        let constraint = definition.constraints().choose(dependency);
                        DependencyView {
                            dependency: dependency.clone(),
                            optional: constraint.optional || dependency.optional,
                            definitions: self
                                .candidates(dependency, &constraint.modifiers)
                                .iter()
                                .map(|entry| entry.definition.id())
                                .collect(),
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{projection, Registry};
    use crate::{
        alias::Alias,
        any::{RcAny, TypeInfo},
        compiler::{Compiler, Constructor, Value},
        config::Config,
        dependency::Argument,
        dependency_resolver::DependencyResolver,
        errors::{InstantiateErrorKind, RegistryErrorKind},
        modifier::{with_tags, without_tags, Modifier},
        options::Options,
        tag::Tag,
    };

    use alloc::{string::String, sync::Arc, vec::Vec};
    use core::panic::Location;
    use tracing_test::traced_test;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Service(&'static str);

    impl Named for Service {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn add(registry: &mut Registry, service: Service, options: Options) -> Result<(), RegistryErrorKind> {
        registry
            .add(
                Compiler::Value(Value::new(service)),
                projection::<Service>(),
                options,
                Location::caller(),
            )
            .map(|_| ())
    }

    fn ids(registry: &Registry, type_info: TypeInfo, modifiers: &[Modifier]) -> Vec<usize> {
        registry
            .find(type_info, modifiers)
            .iter()
            .map(|entry| entry.definition.id().get())
            .collect()
    }

    #[test]
    #[traced_test]
    fn test_find_in_registration_order() {
        let mut registry = Registry::default();
        add(&mut registry, Service("a"), Options::new()).unwrap();
        add(&mut registry, Service("b"), Options::new()).unwrap();
        add(&mut registry, Service("c"), Options::new().config(Config::unshared())).unwrap();

        assert_eq!(ids(&registry, TypeInfo::of::<Service>(), &[]), [0, 1, 2]);
        assert!(ids(&registry, TypeInfo::of::<String>(), &[]).is_empty());
        assert!(registry.definitions()[2].is_unshared());
    }

    #[test]
    #[traced_test]
    fn test_alias() {
        let mut registry = Registry::default();
        add(
            &mut registry,
            Service("a"),
            Options::new()
                .alias(alias!(Service => dyn Named))
                .alias(Alias::new::<Service, Service>(|value| value)),
        )
        .unwrap();

        assert_eq!(ids(&registry, TypeInfo::of::<Service>(), &[]), [0]);
        assert_eq!(ids(&registry, TypeInfo::of::<dyn Named>(), &[]), [0]);
        assert_eq!(registry.definitions()[0].aliases(), [TypeInfo::of::<dyn Named>()]);

        let entry = registry.find(TypeInfo::of::<dyn Named>(), &[]).remove(0);
        let value: RcAny = Arc::new(Service("a"));
        let handle = (entry.projection)(value).unwrap();
        let named = Arc::<dyn Named>::extract(Argument::Single(handle)).unwrap();
        assert_eq!(named.name(), "a");
    }

    #[test]
    #[traced_test]
    fn test_invalid_alias_is_atomic() {
        let mut registry = Registry::default();

        let not_interface = add(
            &mut registry,
            Service("a"),
            Options::new()
                .alias(alias!(Service => dyn Named))
                .alias(Alias::new::<Service, String>(|_| Arc::new(String::new()))),
        );
        assert!(matches!(not_interface, Err(RegistryErrorKind::NotInterface { .. })));

        struct Other;
        impl Named for Other {
            fn name(&self) -> &str {
                "other"
            }
        }

        let not_implement = add(&mut registry, Service("a"), Options::new().alias(alias!(Other => dyn Named)));
        assert!(matches!(
            not_implement,
            Err(RegistryErrorKind::NotImplementInterface { .. })
        ));

        assert!(registry.definitions().is_empty());
        assert!(ids(&registry, TypeInfo::of::<dyn Named>(), &[]).is_empty());

        add(&mut registry, Service("a"), Options::new()).unwrap();
        assert_eq!(registry.definitions()[0].id().get(), 0);
    }

    #[test]
    #[traced_test]
    fn test_modifiers() {
        let mut registry = Registry::default();
        add(&mut registry, Service("a"), Options::new().tag(Tag::new("x"))).unwrap();
        add(&mut registry, Service("b"), Options::new().tag(Tag::new("y"))).unwrap();
        add(&mut registry, Service("c"), Options::new().tag(Tag::new("x")).tag(Tag::new("y"))).unwrap();

        let type_info = TypeInfo::of::<Service>();
        assert_eq!(ids(&registry, type_info, &[with_tags(["x"])]), [0, 2]);
        assert_eq!(ids(&registry, type_info, &[with_tags(["x", "y"])]), [2]);
        assert_eq!(ids(&registry, type_info, &[without_tags(["x"])]), [1]);
        assert_eq!(
            ids(&registry, type_info, &[Modifier::sort(|left, right| right.id().cmp(&left.id()))]),
            [2, 1, 0]
        );
        assert_eq!(
            ids(
                &registry,
                type_info,
                &[
                    with_tags(["y"]),
                    Modifier::sort(|left, right| left.tags().len().cmp(&right.tags().len()).reverse())
                ]
            ),
            [2, 1]
        );
    }

    #[test]
    #[traced_test]
    fn test_views() {
        let mut registry = Registry::default();
        add(&mut registry, Service("a"), Options::new()).unwrap();
        registry
            .add(
                Compiler::Constructor(
                    Constructor::new(|services: Vec<Arc<Service>>, _: Option<Arc<String>>| {
                        Ok::<_, InstantiateErrorKind>(services.len())
                    })
                    .unwrap(),
                ),
                projection::<usize>(),
                Options::new(),
                Location::caller(),
            )
            .unwrap();

        let views = registry.views();
        assert_eq!(views.len(), 2);
        assert!(views[0].dependencies().is_empty());

        let dependencies = views[1].dependencies();
        assert_eq!(views[1].type_info(), TypeInfo::of::<usize>());
        assert_eq!(dependencies[0].definitions.len(), 1);
        assert!(!dependencies[0].optional);
        assert!(dependencies[1].definitions.is_empty());
        assert!(dependencies[1].optional);
    }
}
