//! Typed IoC container.
//!
//! A [`Builder`] collects definitions of three kinds: values built outside the container ([`Builder::add`]),
//! constructor functions ([`Builder::provide`]) and structures with a field table ([`Builder::autowire`]).
//! [`Builder::build`] freezes them into a [`Container`], which builds object graphs on demand:
//! shared definitions once per container, unshared ones per request.
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis::{Builder, InstantiateErrorKind};
//!
//! struct Config {
//!     port: u16,
//! }
//!
//! struct Server {
//!     addr: String,
//! }
//!
//! let builder = Builder::new();
//! builder.add(Config { port: 8080 }).unwrap();
//! builder
//!     .provide(|config: Arc<Config>| {
//!         Ok::<_, InstantiateErrorKind>(Server {
//!             addr: format!("0.0.0.0:{}", config.port),
//!         })
//!     })
//!     .unwrap();
//!
//! let container = builder.build();
//! assert_eq!(container.get::<Server>().unwrap().addr, "0.0.0.0:8080");
//! container.close().unwrap();
//! ```

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod alias;
pub(crate) mod any;
pub(crate) mod builder;
pub(crate) mod cache;
pub(crate) mod callable;
pub(crate) mod closer;
pub(crate) mod compiler;
pub(crate) mod config;
pub(crate) mod constraint;
pub(crate) mod container;
pub(crate) mod cycle;
pub(crate) mod definition;
pub(crate) mod dependency;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod instantiator;
pub(crate) mod modifier;
pub(crate) mod options;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod tag;

pub use alias::Alias;
pub use any::TypeInfo;
pub use builder::Builder;
pub use callable::{CallResult, Callable};
pub use closer::Closer;
pub use compiler::{Autowire, CompilerKind};
pub use config::Config;
pub use constraint::{Constraint, Constraints};
pub use container::Container;
pub use definition::{Definition, DefinitionId, DefinitionView, DependencyView};
pub use dependency::{Dependency, DependencyKind};
pub use dependency_resolver::{Dependencies, DependencyResolver};
pub use errors::{
    CloseErrorKind, InstantiateErrorKind, InstantiatorErrorKind, RegistryError, RegistryErrorKind, ResolveError,
    ResolveErrorKind,
};
pub use inject::Variadic;
pub use instantiator::{with_closer, Instantiator, WithCloser};
pub use modifier::{with_tags, without_tags, Modifier};
pub use options::Options;
pub use tag::{Arg, Tag, Tags};
