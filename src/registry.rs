use core::{any::TypeId, fmt};
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

use crate::{
    any::{BoxedAny, TypeInfo},
    errors::{ProducerErrorKind, RegistryErrorKind, ResolveErrorKind},
    finalizer::{boxed_finalizer_factory, BoxedCloneFinalizer, Finalizer},
    lifetime::Lifetime,
    producer::{boxed_handle_producer, boxed_value_producer, BoxedCloneProducer, Producer},
    resolver::DependencyResolver,
    service::{service_fn, BoxCloneService},
    ProduceErrorKind,
};

#[derive(Clone)]
pub(crate) struct Registration {
    /// Produces a shared `Arc` handle, boxed behind `dyn Any`.
    pub(crate) produce_handle: BoxedCloneProducer,
    /// Produces the owned value. `None` for capability aliases, which only
    /// ever hand out shared handles coerced from their implementation.
    pub(crate) produce_value: Option<BoxedCloneProducer>,
    pub(crate) lifetime: Lifetime,
    pub(crate) finalizer: Option<BoxedCloneFinalizer>,
    pub(crate) type_info: TypeInfo,
}

/// Mapping from capability keys to registrations.
///
/// Registration is rejecting: a second `provide` (or `alias`) for an
/// already-occupied key fails with [`RegistryErrorKind::Duplicate`] rather
/// than silently replacing the earlier one, so wiring bugs surface at
/// registration time. Registration order is recorded and drives the
/// container's teardown order (reverse of registration).
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<TypeId, Registration>,
    order: Vec<TypeId>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("entries", &self.entries.len()).finish_non_exhaustive()
    }
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a producer for its `Provides` type under the given
    /// lifetime.
    ///
    /// # Errors
    /// Returns [`RegistryErrorKind::Duplicate`] if the type is already
    /// registered.
    #[inline]
    pub fn provide<P, Deps>(mut self, producer: P, lifetime: Lifetime) -> Result<Self, RegistryErrorKind>
    where
        P: Producer<Deps, Error = ProduceErrorKind> + Send + Sync,
        P::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.register_producer(producer, lifetime)?;
        Ok(self)
    }

    /// Registers capability `Cap` (typically a `dyn Trait` type) as an
    /// alias of the already-registered implementation `Impl`. The coercion
    /// closure maps the implementation handle to the capability handle,
    /// usually just `|dep| dep as Arc<dyn Capability>`. The alias inherits
    /// the implementation's lifetime, so a singleton keeps its identity
    /// across every capability it is exposed under.
    ///
    /// # Errors
    /// - Returns [`RegistryErrorKind::MissingImplementation`] if `Impl` has
    ///   no registration yet.
    /// - Returns [`RegistryErrorKind::Duplicate`] if `Cap` is already
    ///   registered.
    #[inline]
    pub fn alias<Impl, Cap, F>(mut self, coerce: F) -> Result<Self, RegistryErrorKind>
    where
        Impl: Send + Sync + 'static,
        Cap: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<Impl>) -> Arc<Cap> + Clone + Send + Sync + 'static,
    {
        self.register_alias(coerce)?;
        Ok(self)
    }

    /// Attaches a disposal action to the registration of `Dep`, replacing
    /// any previous one. The finalizer runs during container close, only if
    /// the singleton instance was actually constructed.
    ///
    /// # Warning
    /// A finalizer on a transient registration never runs: transients are
    /// not cached, so the container holds no instance to dispose.
    ///
    /// # Errors
    /// Returns [`RegistryErrorKind::MissingImplementation`] if `Dep` has no
    /// registration yet.
    #[inline]
    pub fn add_finalizer<Dep>(mut self, finalizer: impl Finalizer<Dep> + Send + Sync) -> Result<Self, RegistryErrorKind>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        self.register_finalizer(finalizer)?;
        Ok(self)
    }
}

impl Registry {
    pub(crate) fn register_producer<P, Deps>(&mut self, producer: P, lifetime: Lifetime) -> Result<(), RegistryErrorKind>
    where
        P: Producer<Deps, Error = ProduceErrorKind> + Send + Sync,
        P::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        let registration = Registration {
            produce_handle: boxed_handle_producer(producer.clone()),
            produce_value: Some(boxed_value_producer(producer)),
            lifetime,
            finalizer: None,
            type_info: TypeInfo::of::<P::Provides>(),
        };
        self.insert::<P::Provides>(registration)
    }

    pub(crate) fn register_alias<Impl, Cap, F>(&mut self, coerce: F) -> Result<(), RegistryErrorKind>
    where
        Impl: Send + Sync + 'static,
        Cap: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<Impl>) -> Arc<Cap> + Clone + Send + Sync + 'static,
    {
        let Some(implementation) = self.entries.get(&TypeId::of::<Impl>()) else {
            return Err(RegistryErrorKind::MissingImplementation {
                type_info: TypeInfo::of::<Impl>(),
            });
        };
        let lifetime = implementation.lifetime;

        let produce_handle = BoxCloneService(Box::new(service_fn(move |container: crate::Container| {
            let implementation = match container.get::<Impl>() {
                Ok(implementation) => implementation,
                Err(err) => return Err(ProducerErrorKind::Deps(err)),
            };
            Ok(Box::new(coerce(implementation)) as BoxedAny)
        })));

        self.insert::<Cap>(Registration {
            produce_handle,
            produce_value: None,
            lifetime,
            finalizer: None,
            type_info: TypeInfo::of::<Cap>(),
        })
    }

    pub(crate) fn register_finalizer<Dep>(&mut self, finalizer: impl Finalizer<Dep> + Send + Sync) -> Result<(), RegistryErrorKind>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        match self.entries.get_mut(&TypeId::of::<Dep>()) {
            Some(registration) => {
                registration.finalizer = Some(boxed_finalizer_factory(finalizer));
                debug!(dependency = registration.type_info.name, "Finalizer attached");
                Ok(())
            }
            None => Err(RegistryErrorKind::MissingImplementation {
                type_info: TypeInfo::of::<Dep>(),
            }),
        }
    }

    fn insert<Dep: ?Sized + 'static>(&mut self, registration: Registration) -> Result<(), RegistryErrorKind> {
        use std::collections::btree_map::Entry::{Occupied, Vacant};

        let type_id = TypeId::of::<Dep>();
        match self.entries.entry(type_id) {
            Occupied(_) => Err(RegistryErrorKind::Duplicate {
                type_info: registration.type_info,
            }),
            Vacant(entry) => {
                debug!(
                    dependency = registration.type_info.name,
                    lifetime = registration.lifetime.name(),
                    "Registered"
                );
                entry.insert(registration);
                self.order.push(type_id);
                Ok(())
            }
        }
    }

    #[must_use]
    pub(crate) fn get(&self, type_id: &TypeId) -> Option<Registration> {
        self.entries.get(type_id).cloned()
    }

    /// Capability keys in reverse registration order, for disposal.
    #[must_use]
    pub(crate) fn teardown_order(&self) -> Vec<TypeId> {
        self.order.iter().rev().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;
    use std::sync::Arc;

    use super::Registry;
    use crate::{errors::RegistryErrorKind, instance, Lifetime, ProduceErrorKind};

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    #[derive(Clone)]
    struct EnglishGreeter;

    impl Greeter for EnglishGreeter {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let registry = Registry::new().provide(|| Ok::<_, ProduceErrorKind>(1_i32), Lifetime::Transient).unwrap();

        let err = registry.provide(|| Ok::<_, ProduceErrorKind>(2_i32), Lifetime::Singleton).unwrap_err();
        assert!(matches!(
            err,
            RegistryErrorKind::Duplicate { type_info } if type_info.id == TypeId::of::<i32>()
        ));
    }

    #[test]
    fn test_alias_requires_implementation() {
        let err = Registry::new()
            .alias(|greeter: Arc<EnglishGreeter>| greeter as Arc<dyn Greeter>)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryErrorKind::MissingImplementation { type_info } if type_info.id == TypeId::of::<EnglishGreeter>()
        ));
    }

    #[test]
    fn test_alias_inherits_lifetime() {
        let registry = Registry::new()
            .provide(instance(EnglishGreeter), Lifetime::Singleton)
            .unwrap()
            .alias(|greeter: Arc<EnglishGreeter>| greeter as Arc<dyn Greeter>)
            .unwrap();

        let registration = registry.get(&TypeId::of::<dyn Greeter>()).unwrap();
        assert_eq!(registration.lifetime, Lifetime::Singleton);
        assert!(registration.produce_value.is_none());
    }

    #[test]
    fn test_finalizer_requires_implementation() {
        let err = Registry::new()
            .add_finalizer(|_: Arc<EnglishGreeter>| Ok(()))
            .unwrap_err();
        assert!(matches!(err, RegistryErrorKind::MissingImplementation { .. }));
    }

    #[test]
    fn test_teardown_order_is_reverse_registration() {
        let registry = Registry::new()
            .provide(|| Ok::<_, ProduceErrorKind>(1_i8), Lifetime::Singleton)
            .unwrap()
            .provide(|| Ok::<_, ProduceErrorKind>(1_i16), Lifetime::Singleton)
            .unwrap()
            .provide(|| Ok::<_, ProduceErrorKind>(1_i32), Lifetime::Singleton)
            .unwrap();

        assert_eq!(
            registry.teardown_order(),
            vec![TypeId::of::<i32>(), TypeId::of::<i16>(), TypeId::of::<i8>()]
        );
    }
}
