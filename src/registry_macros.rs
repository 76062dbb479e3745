/// Registers one implementation type under every capability trait it
/// satisfies, in one call.
///
/// Expands to an [`crate::Registry::alias`] call per listed trait, in the
/// listed order, each coercing the implementation handle to the trait
/// object. The implementation must already be registered with
/// [`crate::Registry::provide`] (which covers resolution by the concrete
/// type itself); an empty capability list leaves the registry unchanged.
///
/// # Examples
/// ```rust
/// use plugboard::{expose, instance, Lifetime, Registry};
/// use std::sync::Arc;
///
/// trait Roster: Send + Sync {}
/// trait Schedule: Send + Sync {}
///
/// #[derive(Clone)]
/// struct Keeper;
///
/// impl Roster for Keeper {}
/// impl Schedule for Keeper {}
///
/// let registry = Registry::new()
///     .provide(instance(Keeper), Lifetime::Singleton)
///     .unwrap();
/// let registry = expose!(registry, Keeper => [Roster, Schedule]).unwrap();
/// ```
#[macro_export]
macro_rules! expose {
    ($registry:expr, $implementation:ty => [ $($capability:path),* $(,)? ]) => {{
        (|| -> ::core::result::Result<$crate::Registry, $crate::RegistryErrorKind> {
            #[allow(unused_mut)]
            let mut registry = $registry;
            $(
                registry = registry.alias(|implementation: ::std::sync::Arc<$implementation>| {
                    implementation as ::std::sync::Arc<dyn $capability>
                })?;
            )*
            ::core::result::Result::Ok(registry)
        })()
    }};
}
