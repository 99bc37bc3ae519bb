use alloc::{borrow::ToOwned as _, boxed::Box, collections::BTreeMap, string::String, sync::Arc, vec::Vec};
use core::{
    any::{type_name, Any},
    fmt::{self, Debug, Formatter},
    mem,
    panic::{AssertUnwindSafe, Location},
};
use parking_lot::Mutex;
use std::{
    panic,
    thread::{self, ThreadId},
};
use tracing::{debug, debug_span, error, info_span, warn};

use crate::{
    any::{Handle, RcAny, TypeInfo},
    cache::CacheSlot,
    callable::Callable,
    closer::Closer,
    compiler::Created,
    constraint::{Constraint, Constraints},
    cycle::Cycle,
    definition::{Definition, DefinitionId, DefinitionView},
    dependency::{misplaced_variadic, Argument, Dependency, DependencyKind},
    dependency_resolver::{Dependencies, DependencyResolver},
    errors::{CloseErrorKind, InstantiatorErrorKind, ResolveError, ResolveErrorKind},
    modifier::Modifier,
    registry::{Entry, Registry},
};

/// Resolves object graphs from a frozen snapshot of definitions.
///
/// Cloning is cheap, clones share the cache and the collected closers.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    state: Mutex<State>,
}

struct State {
    /// `None` once the container is closed
    registry: Option<Arc<Registry>>,
    cache: BTreeMap<DefinitionId, Arc<CacheSlot>>,
    closers: Vec<Closer>,
    /// Pending slot each blocked thread waits for
    waiting: Vec<(ThreadId, DefinitionId)>,
}

impl State {
    /// Types of the pending slots leading from `id` back to a slot owned by `current`, following
    /// the slots their owners wait for. `None` if the owners don't wait on `current`.
    fn wait_chain(&self, mut id: DefinitionId, current: ThreadId) -> Option<Vec<TypeInfo>> {
        let mut chain = Vec::new();
        for _ in 0..=self.waiting.len() {
            let slot = self.cache.get(&id).filter(|slot| slot.is_pending())?;
            chain.push(slot.type_info());
            if slot.owner() == current {
                return Some(chain);
            }
            id = self
                .waiting
                .iter()
                .find(|(thread, _)| *thread == slot.owner())
                .map(|(_, id)| *id)?;
        }
        None
    }
}

impl Container {
    #[must_use]
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                state: Mutex::new(State {
                    registry: Some(Arc::new(registry)),
                    cache: BTreeMap::new(),
                    closers: Vec::new(),
                    waiting: Vec::new(),
                }),
            }),
        }
    }

    /// Resolves a slot: `Arc<T>`, `Option<Arc<T>>`, `Vec<Arc<T>>`, [`crate::Variadic<T>`] or the container itself.
    /// Candidates are narrowed by the modifiers before the slot is filled.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::DoesNotExist`] if no definition matches, unless the slot is `Option<Arc<T>>`
    /// - Returns [`ResolveErrorKind::MultipleDefinitions`] if more than one definition matches a single slot
    /// - Returns [`ResolveErrorKind::CycleDetected`] if a definition depends on itself
    /// - Returns [`ResolveErrorKind::Instantiator`] if a constructor fails
    /// - Returns [`ResolveErrorKind::Panicked`] if construction panics
    #[track_caller]
    pub fn resolve<R: DependencyResolver>(&self, modifiers: &[Modifier]) -> Result<R, ResolveError> {
        let location = Location::caller();
        let dependency = R::dependency(0);

        let span = info_span!("resolve", dependency = %dependency.type_info);
        let _guard = span.enter();

        let constraint = Constraint::new(false, modifiers.to_vec());
        catch_panic(|| {
            let argument = self.resolve_dependency(&dependency, &constraint, &Cycle::new())?;
            R::extract(argument)
        })
        .map_err(|kind| {
            error!("{}", kind);
            ResolveError::new(location, kind)
        })
    }

    /// Resolves the single definition of `T`
    ///
    /// # Errors
    /// See [`Self::resolve`]
    #[inline]
    #[track_caller]
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveError> {
        self.resolve(&[])
    }

    /// Resolves every definition of `T` in registration order
    ///
    /// # Errors
    /// See [`Self::resolve`], an absent `T` is [`ResolveErrorKind::DoesNotExist`] as well
    #[inline]
    #[track_caller]
    pub fn get_all<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>, ResolveError> {
        self.resolve(&[])
    }

    /// Checks whether a definition of `T` passes the modifiers, nothing is constructed
    #[must_use]
    pub fn has<T: ?Sized + 'static>(&self, modifiers: &[Modifier]) -> bool {
        self.registry()
            .is_some_and(|registry| !registry.find(TypeInfo::of::<T>(), modifiers).is_empty())
    }

    /// Calls the function with its parameters resolved like the parameters of a constructor
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::Call`] with the error returned by the function
    /// - Returns [`ResolveErrorKind::InvalidFunction`] if a variadic parameter is not the last one
    /// - Returns any other [`ResolveErrorKind`] if a parameter can't be resolved, see [`Self::resolve`]
    #[track_caller]
    pub fn call<F, Deps>(&self, f: F, constraints: &Constraints) -> Result<F::Output, ResolveError>
    where
        F: Callable<Deps>,
        Deps: Dependencies,
    {
        let location = Location::caller();

        let span = info_span!("call", function = type_name::<F>());
        let _guard = span.enter();

        catch_panic(move || {
            let dependencies = Deps::dependencies();
            if let Some(dependency) = misplaced_variadic(&dependencies) {
                return Err(ResolveErrorKind::InvalidFunction {
                    function: type_name::<F>(),
                    index: dependency.index,
                });
            }

            let arguments = self.resolve_arguments(&dependencies, constraints, &Cycle::new())?;
            let dependencies = Deps::extract_all(arguments)?;
            f.call(dependencies).map_err(ResolveErrorKind::Call)
        })
        .map_err(|kind| {
            error!("{}", kind);
            ResolveError::new(location, kind)
        })
    }

    /// Drops the definitions and the cache, then runs the collected closers in reverse creation order.
    /// Resolution fails with [`ResolveErrorKind::DoesNotExist`] afterwards, constructions still running
    /// at that moment run their closer on completion and fail the same way.
    ///
    /// # Errors
    /// Returns [`CloseErrorKind::Closer`] with the first closer error, the remaining closers are skipped
    pub fn close(&self) -> Result<(), CloseErrorKind> {
        let span = info_span!("close");
        let _guard = span.enter();

        let closers = {
            let mut state = self.inner.state.lock();
            state.registry = None;
            state.cache.clear();
            mem::take(&mut state.closers)
        };

        debug!(closers = closers.len(), "Running closers");
        for closer in closers.into_iter().rev() {
            if let Err(err) = closer.close() {
                let err = CloseErrorKind::Closer(err);
                error!("{}", err);
                return Err(err);
            }
        }

        debug!("Closed");
        Ok(())
    }

    /// Definitions of the container with their dependencies annotated, empty once closed
    #[must_use]
    pub fn definitions(&self) -> Vec<DefinitionView> {
        self.registry().map(|registry| registry.views()).unwrap_or_default()
    }

    #[inline]
    fn registry(&self) -> Option<Arc<Registry>> {
        self.inner.state.lock().registry.clone()
    }

    fn resolve_arguments(
        &self,
        dependencies: &[Dependency],
        constraints: &Constraints,
        cycle: &Cycle,
    ) -> Result<Vec<Argument>, ResolveErrorKind> {
        dependencies
            .iter()
            .map(|dependency| self.resolve_dependency(dependency, constraints.choose(dependency), cycle))
            .collect()
    }

    /// Absence of exactly the requested type leaves an optional slot unset, any other error propagates
    fn resolve_dependency(
        &self,
        dependency: &Dependency,
        constraint: &Constraint,
        cycle: &Cycle,
    ) -> Result<Argument, ResolveErrorKind> {
        match self.resolve_target(dependency, &constraint.modifiers, cycle) {
            Err(ResolveErrorKind::DoesNotExist { type_info })
                if (constraint.optional || dependency.optional) && type_info == dependency.type_info =>
            {
                debug!(%type_info, "Optional dependency left unset");
                Ok(Argument::Unset)
            }
            result => result,
        }
    }

    fn resolve_target(
        &self,
        dependency: &Dependency,
        modifiers: &[Modifier],
        cycle: &Cycle,
    ) -> Result<Argument, ResolveErrorKind> {
        if dependency.kind == DependencyKind::Container {
            return Ok(Argument::Container(self.clone()));
        }

        let type_info = dependency.type_info;
        let Some(registry) = self.registry() else {
            warn!(%type_info, "Container is closed");
            return Err(ResolveErrorKind::DoesNotExist { type_info });
        };

        let candidates = registry.candidates(dependency, modifiers);
        match candidates.len() {
            0 => Err(ResolveErrorKind::DoesNotExist { type_info }),
            1 if !dependency.is_sequence() => self.instantiate(&candidates[0], cycle).map(Argument::Single),
            count if !dependency.is_sequence() => Err(ResolveErrorKind::MultipleDefinitions { type_info, count }),
            _ => candidates
                .iter()
                .map(|entry| self.instantiate(entry, cycle))
                .collect::<Result<_, _>>()
                .map(Argument::Sequence),
        }
    }

    /// Instance of the candidate as a handle of the type it was found under
    fn instantiate(&self, entry: &Entry, cycle: &Cycle) -> Result<Handle, ResolveErrorKind> {
        let definition = &entry.definition;
        let value = if definition.is_unshared() {
            let path = cycle.append(definition.id(), definition.type_info())?;
            self.construct(definition, &path)?
        } else {
            self.shared(definition, cycle)?
        };

        (entry.projection)(value).ok_or_else(|| ResolveErrorKind::IncorrectType {
            expected: definition.type_info(),
            actual: "instance of another type",
        })
    }

    /// Cached instance of a shared definition, constructed by the first caller.
    /// Waiting for a slot whose construction transitively waits for this thread is a cycle.
    fn shared(&self, definition: &Definition, cycle: &Cycle) -> Result<RcAny, ResolveErrorKind> {
        let id = definition.id();
        let type_info = definition.type_info();
        let current = thread::current().id();

        loop {
            let (slot, path) = {
                let mut state = self.inner.state.lock();
                match state.cache.get(&id).cloned() {
                    Some(slot) => {
                        if let Some(value) = slot.get() {
                            debug!(%id, %type_info, "Found in cache");
                            return Ok(value);
                        }

                        // Pending on our own path would never be published
                        cycle.append(id, type_info)?;
                        if let Some(chain) = state.wait_chain(id, current) {
                            return Err(cycle.closed_by(type_info, chain));
                        }

                        state.waiting.push((current, id));
                        (slot, None)
                    }
                    None => {
                        let path = cycle.append(id, type_info)?;
                        let slot = Arc::new(CacheSlot::pending(current, type_info));
                        state.cache.insert(id, slot.clone());
                        (slot, Some(path))
                    }
                }
            };

            let Some(path) = path else {
                debug!(%id, %type_info, "Waiting for concurrent construction");
                let value = slot.wait();
                self.inner.state.lock().waiting.retain(|(thread, _)| *thread != current);

                if let Some(value) = value {
                    return Ok(value);
                }
                debug!(%id, %type_info, "Concurrent construction abandoned");
                continue;
            };

            let pending = PendingGuard {
                inner: &self.inner,
                id,
                slot,
                published: false,
            };
            let value = self.construct(definition, &path)?;
            pending.publish(value.clone());
            debug!(%id, %type_info, "Cached");

            return Ok(value);
        }
    }

    fn construct(&self, definition: &Definition, path: &Cycle) -> Result<RcAny, ResolveErrorKind> {
        let type_info = definition.type_info();

        let span = debug_span!("construct", id = %definition.id(), %type_info);
        let _guard = span.enter();

        let arguments = self.resolve_arguments(definition.dependencies(), definition.constraints(), path)?;
        let Created { value, closer } = definition.compiler().create(arguments).map_err(|source| {
            let err = ResolveErrorKind::Instantiator {
                type_info,
                location: definition.location(),
                source: match source {
                    InstantiatorErrorKind::Deps(err) => InstantiatorErrorKind::Deps(Box::new(err)),
                    InstantiatorErrorKind::Factory(err) => InstantiatorErrorKind::Factory(err),
                },
            };
            error!("{}", err);
            err
        })?;

        let mut state = self.inner.state.lock();
        if state.registry.is_none() {
            drop(state);
            warn!("Container closed during construction");
            if let Some(Err(err)) = closer.map(Closer::close) {
                error!(%err, "Closer failed");
            }
            return Err(ResolveErrorKind::DoesNotExist { type_info });
        }
        if let Some(closer) = closer {
            state.closers.push(closer);
            debug!("Closer collected");
        }
        drop(state);

        debug!("Constructed");
        Ok(value)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Container")
            .field("closed", &state.registry.is_none())
            .field("cached", &state.cache.len())
            .field("closers", &state.closers.len())
            .finish()
    }
}

/// Removes an unpublished slot and wakes its waiters, so they retry instead of hanging
struct PendingGuard<'a> {
    inner: &'a ContainerInner,
    id: DefinitionId,
    slot: Arc<CacheSlot>,
    published: bool,
}

impl PendingGuard<'_> {
    fn publish(mut self, value: RcAny) {
        self.slot.publish(value);
        self.published = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.published {
            return;
        }

        {
            let mut state = self.inner.state.lock();
            if state.cache.get(&self.id).is_some_and(|slot| Arc::ptr_eq(slot, &self.slot)) {
                state.cache.remove(&self.id);
            }
        }
        self.slot.abandon();
    }
}

fn catch_panic<T>(f: impl FnOnce() -> Result<T, ResolveErrorKind>) -> Result<T, ResolveErrorKind> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(ResolveErrorKind::Panicked {
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
