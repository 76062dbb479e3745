use core::{
    any::TypeId,
    fmt::{self, Display, Formatter},
};

use super::produce::{ProduceErrorKind, ProducerErrorKind};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Producer not found in registry for `{type_info}`")]
    NotRegistered { type_info: TypeInfo },
    #[error("Capability `{type_info}` can't be resolved as an owned transient instance")]
    NotTransient { type_info: TypeInfo },
    #[error("Cyclic dependency detected: {chain}")]
    CircularDependency { chain: ResolutionChain },
    #[error("Incorrect producer provides type. Actual: {actual:?}, expected: {expected:?}")]
    IncorrectType { expected: TypeId, actual: TypeId },
    #[error(transparent)]
    Producer(ProducerErrorKind<Box<ResolveErrorKind>, ProduceErrorKind>),
}

/// The chain of capability keys that was being resolved when a cycle was
/// detected, ending with the key that was re-entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionChain(pub Box<[TypeInfo]>);

impl Display for ResolutionChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys = self.0.iter();
        if let Some(key) = keys.next() {
            write!(f, "`{key}`")?;
        }
        for key in keys {
            write!(f, " -> `{key}`")?;
        }
        Ok(())
    }
}
