use std::sync::Arc;

use crate::{errors::ResolveErrorKind, resolver::DependencyResolver, Container};

/// A shared handle on a dependency, honoring its registered lifetime:
/// the same instance for singletons, a fresh one per resolution for
/// transients. `Dep` may be unsized (`Inject<dyn Capability>`).
pub struct Inject<Dep: ?Sized>(pub Arc<Dep>);

impl<Dep: ?Sized + Send + Sync + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    fn resolve(container: &Container) -> Result<Self, Self::Error> {
        container.get().map(Self)
    }
}

/// An owned dependency, constructed anew on every resolution.
/// Only valid for capabilities registered with a transient lifetime.
pub struct InjectTransient<Dep>(pub Dep);

impl<Dep: Send + Sync + 'static> DependencyResolver for InjectTransient<Dep> {
    type Error = ResolveErrorKind;

    fn resolve(container: &Container) -> Result<Self, Self::Error> {
        container.get_transient().map(Self)
    }
}
