use std::sync::Arc;

use crate::{
    any::BoxedAny,
    service::{service_fn, BoxCloneService},
};

/// A disposal action for a singleton dependency, called during container
/// close with the cached instance, only if that instance was actually
/// constructed.
pub trait Finalizer<Dep: ?Sized>: Clone + 'static {
    fn finalize(&mut self, dependency: Arc<Dep>) -> anyhow::Result<()>;
}

pub(crate) type BoxedCloneFinalizer = BoxCloneService<BoxedAny, (), anyhow::Error>;

#[must_use]
pub(crate) fn boxed_finalizer_factory<Dep, Fin>(mut finalizer: Fin) -> BoxedCloneFinalizer
where
    Dep: ?Sized + Send + Sync + 'static,
    Fin: Finalizer<Dep> + Send + Sync,
{
    BoxCloneService(Box::new(service_fn(move |dependency: BoxedAny| {
        let handle = dependency
            .downcast::<Arc<Dep>>()
            .expect("Failed to downcast value in finalizer factory");
        finalizer.finalize(*handle)
    })))
}

impl<F, Dep> Finalizer<Dep> for F
where
    Dep: ?Sized,
    F: FnMut(Arc<Dep>) -> anyhow::Result<()> + Clone + 'static,
{
    #[inline]
    fn finalize(&mut self, dependency: Arc<Dep>) -> anyhow::Result<()> {
        self(dependency)
    }
}
