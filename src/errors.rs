mod close;
mod produce;
mod registry;
mod resolve;

pub use close::CloseErrorKind;
pub use produce::{ProduceErrorKind, ProducerErrorKind};
pub use registry::RegistryErrorKind;
pub use resolve::{ResolutionChain, ResolveErrorKind};
