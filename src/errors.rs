mod container;
mod instantiate;
mod instantiator;
mod registry;
mod resolve;

pub use container::CloseErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use registry::{RegistryError, RegistryErrorKind};
pub use resolve::{ResolveError, ResolveErrorKind};
