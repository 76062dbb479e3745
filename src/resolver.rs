use crate::{errors::ResolveErrorKind, Container};

/// The act of producing a value satisfying a requested capability.
///
/// Implemented by [`crate::Inject`] and [`crate::InjectTransient`], and by
/// tuples of resolvers so that producer closures can take several
/// dependencies as parameters.
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn resolve(container: &Container) -> Result<Self, Self::Error>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(container: &Container) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(container).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    };
    use tracing::debug;
    use tracing_test::traced_test;

    use super::DependencyResolver;
    use crate::{
        errors::ProduceErrorKind,
        inject::{Inject, InjectTransient},
        instance, Container, Lifetime, Registry,
    };

    struct Request;

    #[derive(Clone)]
    struct Instance;

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: Send + Sync + 'static>() {
            resolver::<Inject<Dep>>();
            resolver::<InjectTransient<Dep>>();
            resolver::<(Inject<Dep>, InjectTransient<Dep>)>();
        }
    }

    #[test]
    #[traced_test]
    fn test_singleton_resolve() {
        let request_producer_call_count = Arc::new(AtomicU8::new(0));

        let registry = Registry::new()
            .provide(
                {
                    let request_producer_call_count = request_producer_call_count.clone();
                    move || {
                        request_producer_call_count.fetch_add(1, Ordering::SeqCst);

                        debug!("Call request producer");
                        Ok::<_, ProduceErrorKind>(Request)
                    }
                },
                Lifetime::Singleton,
            )
            .unwrap()
            .provide(instance(Instance), Lifetime::Transient)
            .unwrap();
        let container = Container::new(registry);

        let request_1 = Inject::<Request>::resolve(&container).unwrap();
        let request_2 = Inject::<Request>::resolve(&container).unwrap();
        let _ = Inject::<Instance>::resolve(&container).unwrap();

        assert!(Arc::ptr_eq(&request_1.0, &request_2.0));
        assert_eq!(request_producer_call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_transient_resolve() {
        let request_producer_call_count = Arc::new(AtomicU8::new(0));

        let registry = Registry::new()
            .provide(
                {
                    let request_producer_call_count = request_producer_call_count.clone();
                    move || {
                        request_producer_call_count.fetch_add(1, Ordering::SeqCst);

                        debug!("Call request producer");
                        Ok::<_, ProduceErrorKind>(Request)
                    }
                },
                Lifetime::Transient,
            )
            .unwrap();
        let container = Container::new(registry);

        let _ = InjectTransient::<Request>::resolve(&container).unwrap();
        InjectTransient::<Request>::resolve(&container).unwrap();

        assert_eq!(request_producer_call_count.load(Ordering::SeqCst), 2);
    }
}
