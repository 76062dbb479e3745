use std::sync::Arc;
use tracing::debug;

use crate::{
    any::BoxedAny,
    errors::{ProduceErrorKind, ProducerErrorKind, ResolveErrorKind},
    resolver::DependencyResolver,
    service::{service_fn, BoxCloneService},
    Container,
};

/// A factory able to construct one instance of a registered type.
///
/// Implemented for every `FnMut(Deps…) -> Result<Provides, Err>` closure
/// whose parameters are dependency resolvers ([`crate::Inject`] /
/// [`crate::InjectTransient`]), so the dependency graph is spelled out as
/// ordinary typed parameters rather than discovered at runtime.
pub trait Producer<Deps>: Clone + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<ProduceErrorKind>;

    fn produce(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

pub(crate) type BoxedCloneProducer = BoxCloneService<Container, BoxedAny, ProducerErrorKind<ResolveErrorKind, ProduceErrorKind>>;

/// Boxes a producer so that resolution yields a shared `Arc` handle.
#[must_use]
pub(crate) fn boxed_handle_producer<P, Deps>(producer: P) -> BoxedCloneProducer
where
    P: Producer<Deps> + Send + Sync,
    P::Provides: Send + Sync,
    Deps: DependencyResolver<Error = ResolveErrorKind>,
{
    BoxCloneService(Box::new(service_fn({
        move |container: Container| {
            let dependencies = match Deps::resolve(&container) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(ProducerErrorKind::Deps(err)),
            };
            let dependency = match producer.clone().produce(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(ProducerErrorKind::Factory(err.into())),
            };

            debug!("Produced");

            Ok(Box::new(Arc::new(dependency)) as BoxedAny)
        }
    })))
}

/// Boxes a producer so that resolution yields the owned value itself.
#[must_use]
pub(crate) fn boxed_value_producer<P, Deps>(producer: P) -> BoxedCloneProducer
where
    P: Producer<Deps> + Send + Sync,
    P::Provides: Send + Sync,
    Deps: DependencyResolver<Error = ResolveErrorKind>,
{
    BoxCloneService(Box::new(service_fn({
        move |container: Container| {
            let dependencies = match Deps::resolve(&container) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(ProducerErrorKind::Deps(err)),
            };
            let dependency = match producer.clone().produce(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(ProducerErrorKind::Factory(err.into())),
            };

            debug!("Produced");

            Ok(Box::new(dependency) as BoxedAny)
        }
    })))
}

macro_rules! impl_producer {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<Func, Response, Err, $($ty,)*> Producer<($($ty,)*)> for Func
        where
            Func: FnMut($($ty,)*) -> Result<Response, Err> + Clone + 'static,
            Response: 'static,
            Err: Into<ProduceErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn produce(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_producer);

/// Wraps a value created outside the container into a producer that clones
/// it on every resolution.
#[inline]
#[must_use]
pub const fn instance<T: Clone + 'static>(value: T) -> impl Producer<(), Provides = T, Error = ProduceErrorKind> {
    move || Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    };
    use tracing::debug;
    use tracing_test::traced_test;

    use super::{boxed_value_producer, instance, DependencyResolver, Producer};
    use crate::{errors::ProduceErrorKind, inject::InjectTransient, service::Service as _, Container, Lifetime, Registry};

    struct Request(bool);
    struct Response(bool);

    #[test]
    #[allow(dead_code)]
    fn test_factory_helper() {
        fn assert_producer<Deps: DependencyResolver, F: Producer<Deps>>(_f: F) {}
        fn assert_closure_producers() {
            assert_producer(|| Ok::<_, ProduceErrorKind>(()));
            assert_producer(instance(1_i32));
            assert_producer(
                |_: InjectTransient<u8>,
                 _: InjectTransient<u16>,
                 _: InjectTransient<u32>,
                 _: InjectTransient<u64>,
                 _: InjectTransient<i8>,
                 _: InjectTransient<i16>,
                 _: InjectTransient<i32>| Ok::<_, ProduceErrorKind>(()),
            );
        }
    }

    #[test]
    #[traced_test]
    fn test_boxed_value_producer() {
        let request_producer_call_count = Arc::new(AtomicU8::new(0));
        let response_producer_call_count = Arc::new(AtomicU8::new(0));

        let registry = Registry::new()
            .provide(
                {
                    let request_producer_call_count = request_producer_call_count.clone();
                    move || {
                        request_producer_call_count.fetch_add(1, Ordering::SeqCst);

                        debug!("Call request producer");
                        Ok::<_, ProduceErrorKind>(Request(true))
                    }
                },
                Lifetime::Transient,
            )
            .unwrap();
        let container = Container::new(registry);

        let mut response_producer = boxed_value_producer({
            let response_producer_call_count = response_producer_call_count.clone();
            move |InjectTransient(Request(val_1)), InjectTransient(Request(val_2))| {
                assert_eq!(val_1, val_2);

                response_producer_call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call response producer");
                Ok::<_, ProduceErrorKind>(Response(val_1))
            }
        });

        let response_1 = response_producer.call(container.clone()).unwrap();
        let response_2 = response_producer.call(container).unwrap();

        assert!(response_1.downcast::<Response>().unwrap().0);
        assert!(response_2.downcast::<Response>().unwrap().0);
        assert_eq!(request_producer_call_count.load(Ordering::SeqCst), 4);
        assert_eq!(response_producer_call_count.load(Ordering::SeqCst), 2);
    }
}
