use alloc::vec::Vec;
use core::panic::Location;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    compiler::{Autowire, Compiler, Constructor, Value},
    definition::{DefinitionId, DefinitionView},
    dependency_resolver::Dependencies,
    errors::{RegistryError, RegistryErrorKind},
    instantiator::{with_closer, Instantiator, WithCloser},
    options::Options,
    registry::{projection, Projection, Registry},
    Container,
};

/// Accumulates definitions and freezes them into containers.
///
/// Registration is thread-safe, definition ids follow the registration order.
/// Every registration method records its call site, which is reported by registration errors
/// and by [`crate::Definition::location`].
#[derive(Default)]
pub struct Builder {
    registry: Mutex<Registry>,
}

impl Builder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value built outside the container
    ///
    /// # Errors
    /// Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn add<T: Send + Sync + 'static>(&self, value: T) -> Result<DefinitionId, RegistryError> {
        self.add_with_options(value, Options::new())
    }

    /// # Errors
    /// Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn add_with_options<T: Send + Sync + 'static>(&self, value: T, options: Options) -> Result<DefinitionId, RegistryError> {
        self.register(
            Location::caller(),
            Ok(Compiler::Value(Value::new(value))),
            projection::<T>(),
            options,
        )
    }

    /// Registers a constructor function
    ///
    /// # Errors
    /// - Returns [`RegistryError`] if a variadic parameter is not the last one
    /// - Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn provide<Inst, Deps>(&self, instantiator: Inst) -> Result<DefinitionId, RegistryError>
    where
        Inst: Instantiator<Deps>,
        Deps: Dependencies + 'static,
    {
        self.provide_with_options(instantiator, Options::new())
    }

    /// # Errors
    /// - Returns [`RegistryError`] if a variadic parameter is not the last one
    /// - Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn provide_with_options<Inst, Deps>(&self, instantiator: Inst, options: Options) -> Result<DefinitionId, RegistryError>
    where
        Inst: Instantiator<Deps>,
        Deps: Dependencies + 'static,
    {
        self.register(
            Location::caller(),
            Constructor::new(instantiator).map(Compiler::Constructor),
            projection::<Inst::Provides>(),
            options,
        )
    }

    /// Registers a constructor returning `Result<(Provides, Closer), Error>`
    ///
    /// # Errors
    /// - Returns [`RegistryError`] if a variadic parameter is not the last one
    /// - Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn provide_with_closer<F, Deps>(&self, f: F, options: Options) -> Result<DefinitionId, RegistryError>
    where
        WithCloser<F>: Instantiator<Deps>,
        Deps: Dependencies + 'static,
    {
        self.provide_with_options(with_closer(f), options)
    }

    /// Registers a structure created by the container from its field table
    ///
    /// # Errors
    /// - Returns [`RegistryError`] if a field is declared more than once
    /// - Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn autowire<T>(&self, autowire: Autowire<T>) -> Result<DefinitionId, RegistryError>
    where
        T: Default + Send + Sync + 'static,
    {
        self.autowire_with_options(autowire, Options::new())
    }

    /// # Errors
    /// - Returns [`RegistryError`] if a field is declared more than once
    /// - Returns [`RegistryError`] if an alias of the options is invalid
    #[track_caller]
    pub fn autowire_with_options<T>(&self, autowire: Autowire<T>, options: Options) -> Result<DefinitionId, RegistryError>
    where
        T: Default + Send + Sync + 'static,
    {
        self.register(Location::caller(), autowire.compile(), projection::<T>(), options)
    }

    fn register(
        &self,
        location: &'static Location<'static>,
        compiler: Result<Compiler, RegistryErrorKind>,
        projection: Projection,
        options: Options,
    ) -> Result<DefinitionId, RegistryError> {
        compiler
            .and_then(|compiler| self.registry.lock().add(compiler, projection, options, location))
            .map(|definition| definition.id())
            .map_err(|kind| {
                let err = RegistryError::new(location, kind);
                error!("{}", err);
                err
            })
    }

    /// Freezes the current definitions into a new container.
    /// Later registrations don't affect it.
    #[must_use]
    pub fn build(&self) -> Container {
        let registry = self.registry.lock().clone();
        debug!(definitions = registry.definitions().len(), "Container built");
        Container::new(registry)
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<DefinitionView> {
        self.registry.lock().views()
    }
}
