//! A thread-safe dependency resolution container.
//!
//! Capabilities (concrete types or `dyn Trait` objects) are registered
//! explicitly against producers with a [`Lifetime`] policy, then resolved
//! on demand through [`Container::get`] / [`Container::get_transient`].
//! Producers declare their own dependencies as [`Inject`] /
//! [`InjectTransient`] parameters, which the container resolves
//! recursively, rejecting cyclic graphs instead of overflowing the stack.

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod errors;
pub(crate) mod finalizer;
pub(crate) mod global;
pub(crate) mod guard;
pub(crate) mod inject;
pub(crate) mod lifetime;
pub(crate) mod lock;
pub(crate) mod producer;
pub(crate) mod registry;
pub(crate) mod registry_macros;
pub(crate) mod resolver;
pub(crate) mod service;

pub use any::TypeInfo;
pub use container::Container;
pub use errors::{CloseErrorKind, ProduceErrorKind, ProducerErrorKind, RegistryErrorKind, ResolutionChain, ResolveErrorKind};
pub use finalizer::Finalizer;
pub use global::{global, init_global, reset_global};
pub use inject::{Inject, InjectTransient};
pub use lifetime::Lifetime;
pub use producer::{instance, Producer};
pub use registry::Registry;
pub use resolver::DependencyResolver;
