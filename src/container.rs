use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    cache::Cache,
    errors::{CloseErrorKind, ProducerErrorKind, RegistryErrorKind, ResolutionChain, ResolveErrorKind},
    finalizer::Finalizer,
    guard::ChainGuard,
    lifetime::Lifetime,
    lock::KeyLocks,
    producer::Producer,
    registry::{Registration, Registry},
    resolver::DependencyResolver,
    service::Service as _,
    ProduceErrorKind,
};

/// A dependency resolution container: a clonable handle over a shared
/// registry, singleton cache and construction locks. Cloning is cheap and
/// every clone refers to the same container state.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(registry),
                cache: Mutex::new(Cache::new()),
                singleton_locks: KeyLocks::default(),
            }),
        }
    }

    /// Registers a producer on a live container. See [`Registry::provide`].
    ///
    /// # Errors
    /// Returns [`RegistryErrorKind::Duplicate`] if the type is already
    /// registered.
    pub fn provide<P, Deps>(&self, producer: P, lifetime: Lifetime) -> Result<(), RegistryErrorKind>
    where
        P: Producer<Deps, Error = ProduceErrorKind> + Send + Sync,
        P::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.inner.registry.write().register_producer(producer, lifetime)
    }

    /// Registers a capability alias on a live container. See
    /// [`Registry::alias`].
    ///
    /// # Errors
    /// Returns [`RegistryErrorKind::MissingImplementation`] or
    /// [`RegistryErrorKind::Duplicate`], as for [`Registry::alias`].
    pub fn alias<Impl, Cap, F>(&self, coerce: F) -> Result<(), RegistryErrorKind>
    where
        Impl: Send + Sync + 'static,
        Cap: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<Impl>) -> Arc<Cap> + Clone + Send + Sync + 'static,
    {
        self.inner.registry.write().register_alias(coerce)
    }

    /// Attaches a disposal action on a live container. See
    /// [`Registry::add_finalizer`].
    ///
    /// # Errors
    /// Returns [`RegistryErrorKind::MissingImplementation`] if `Dep` has no
    /// registration yet.
    pub fn add_finalizer<Dep>(&self, finalizer: impl Finalizer<Dep> + Send + Sync) -> Result<(), RegistryErrorKind>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        self.inner.registry.write().register_finalizer(finalizer)
    }

    /// Resolves a shared handle on the requested capability, honoring its
    /// registered lifetime: singletons are constructed lazily exactly once
    /// and cached, transients are constructed anew on every call.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotRegistered`] if the capability has no
    ///   registration.
    /// - [`ResolveErrorKind::CircularDependency`] if the capability is
    ///   re-entered while already being resolved on this call stack.
    /// - [`ResolveErrorKind::Producer`] if the producer or one of its
    ///   dependencies fails.
    pub fn get<Dep>(&self) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<Dep>();
        let span = info_span!("get", dependency = type_info.name);
        let _guard = span.enter();

        let type_id = type_info.id;

        if let Some(dependency) = self.inner.cache.lock().get::<Dep>(&type_id) {
            debug!("Found in cache");
            return Ok(dependency);
        }

        let Some(registration) = self.inner.registry.read().get(&type_id) else {
            let err = ResolveErrorKind::NotRegistered { type_info };
            error!("{}", err);
            return Err(err);
        };

        let _chain = match ChainGuard::enter(Arc::as_ptr(&self.inner) as usize, type_info) {
            Ok(chain) => chain,
            Err(chain) => {
                let err = ResolveErrorKind::CircularDependency {
                    chain: ResolutionChain(chain),
                };
                error!("{}", err);
                return Err(err);
            }
        };

        match registration.lifetime {
            Lifetime::Singleton => {
                let lock = self.inner.singleton_locks.obtain(type_id);
                let _construction = lock.lock();

                // The loser of a construction race lands here after the
                // winner has published its instance.
                if let Some(dependency) = self.inner.cache.lock().get::<Dep>(&type_id) {
                    debug!("Found in cache");
                    return Ok(dependency);
                }

                let dependency = self.produce_handle::<Dep>(registration, type_info)?;
                self.inner.cache.lock().insert(type_id, dependency.clone());
                debug!("Cached");
                Ok(dependency)
            }
            Lifetime::Transient => self.produce_handle::<Dep>(registration, type_info),
        }
    }

    /// Resolves an owned instance of the requested capability. Only valid
    /// for transient registrations; a singleton has exactly one shared
    /// instance and can't give up ownership of it.
    ///
    /// # Errors
    /// As for [`Self::get`], plus [`ResolveErrorKind::NotTransient`] for
    /// singleton registrations and capability aliases.
    pub fn get_transient<Dep>(&self) -> Result<Dep, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<Dep>();
        let span = info_span!("get_transient", dependency = type_info.name);
        let _guard = span.enter();

        let Some(registration) = self.inner.registry.read().get(&type_info.id) else {
            let err = ResolveErrorKind::NotRegistered { type_info };
            error!("{}", err);
            return Err(err);
        };

        let (Lifetime::Transient, Some(mut producer)) = (registration.lifetime, registration.produce_value) else {
            let err = ResolveErrorKind::NotTransient { type_info };
            error!("{}", err);
            return Err(err);
        };

        let _chain = match ChainGuard::enter(Arc::as_ptr(&self.inner) as usize, type_info) {
            Ok(chain) => chain,
            Err(chain) => {
                let err = ResolveErrorKind::CircularDependency {
                    chain: ResolutionChain(chain),
                };
                error!("{}", err);
                return Err(err);
            }
        };

        match producer.call(self.clone()) {
            Ok(dependency) => match dependency.downcast::<Dep>() {
                Ok(dependency) => Ok(*dependency),
                Err(incorrect_type) => {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: type_info.id,
                        actual: (*incorrect_type).type_id(),
                    };
                    error!("{}", err);
                    Err(err)
                }
            },
            Err(ProducerErrorKind::Deps(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Producer(ProducerErrorKind::Deps(Box::new(err))))
            }
            Err(ProducerErrorKind::Factory(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Producer(ProducerErrorKind::Factory(err)))
            }
        }
    }

    /// Closes the container: runs finalizers for every singleton that was
    /// actually constructed, in reverse registration order, then drops the
    /// cached instances. Calling it again is a no-op. Finalizer failures
    /// are collected and reported together after all remaining finalizers
    /// have run.
    ///
    /// # Errors
    /// Returns [`CloseErrorKind::Finalize`] with the collected failures.
    pub fn close(&self) -> Result<(), CloseErrorKind> {
        self.inner.close()
    }

    fn produce_handle<Dep>(&self, registration: Registration, type_info: TypeInfo) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        let mut producer = registration.produce_handle;
        match producer.call(self.clone()) {
            Ok(dependency) => match dependency.downcast::<Arc<Dep>>() {
                Ok(dependency) => Ok(*dependency),
                Err(incorrect_type) => {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: type_info.id,
                        actual: (*incorrect_type).type_id(),
                    };
                    error!("{}", err);
                    Err(err)
                }
            },
            Err(ProducerErrorKind::Deps(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Producer(ProducerErrorKind::Deps(Box::new(err))))
            }
            Err(ProducerErrorKind::Factory(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Producer(ProducerErrorKind::Factory(err)))
            }
        }
    }
}

struct ContainerInner {
    registry: RwLock<Registry>,
    cache: Mutex<Cache>,
    singleton_locks: KeyLocks,
}

impl ContainerInner {
    fn close(&self) -> Result<(), CloseErrorKind> {
        let teardown_order = self.registry.read().teardown_order();

        let mut failures = Vec::new();
        for type_id in teardown_order {
            // An in-flight construction of this key holds its lock while
            // publishing, so it finishes and gets finalized here instead of
            // racing the teardown.
            let construction_lock = self.singleton_locks.obtain(type_id);
            let _construction = construction_lock.lock();

            let Some(dependency) = self.cache.lock().remove(&type_id) else {
                continue;
            };
            let Some(registration) = self.registry.read().get(&type_id) else {
                continue;
            };
            let Some(mut finalizer) = registration.finalizer else {
                continue;
            };
            match finalizer.call(dependency) {
                Ok(()) => debug!(dependency = registration.type_info.name, "Finalizer called"),
                Err(err) => {
                    error!(dependency = registration.type_info.name, "Finalizer failed: {}", err);
                    failures.push((registration.type_info, err));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CloseErrorKind::Finalize { failures })
        }
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!("{}", err);
        } else {
            debug!("Container closed on drop");
        }
    }
}
