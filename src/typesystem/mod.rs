//! Type resolution and the generated-type registry.
//!
//! This module is the hub between the descriptor parser and the layout planner.
//! It resolves named nested types to concrete records and coordinates one-time
//! generation per aggregate name.
//!
//! # Key Components
//!
//! - [`AggregateKind`]: Value (identity-free) vs reference (identity-bearing) aggregates
//! - [`ClassLoader`]: The external resolution capability consumed by the core
//! - [`StaticLoader`]: A concurrent map-backed loader for tests and embedding
//! - [`TypeResolver`]: Per-request memoized resolution of named types
//! - [`GeneratedRegistry`]: Central registry of generated types with serialized
//!   per-name generation
//!
//! # Registry Architecture
//!
//! Following the crate's registry conventions, the primary name index is a
//! lock-free `SkipMap`, per-name generation locks live in a `DashMap`, and an
//! append-only `boxcar::Vec` preserves insertion order for iteration. Concurrent
//! generation requests for the same name are serialized so that all callers
//! observe the same generated type (or the same terminal error); requests for
//! distinct names proceed independently.
//!
//! # Examples
//!
//! ```rust
//! use aggregen::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
//! let point = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
//! assert_eq!(point.kind(), AggregateKind::Value);
//! # Ok::<(), aggregen::Error>(())
//! ```

mod loader;
mod registry;
mod resolver;

use strum::Display;

pub use loader::{ClassLoader, StaticLoader};
pub use registry::GeneratedRegistry;
pub(crate) use registry::RegistryInner;
pub use resolver::{ResolvedType, TypeResolver};

/// The two admissible aggregate kinds.
///
/// A value aggregate has no identity: equality and copying are structural over
/// its fields, instances are immutable, and updates go through withers. A
/// reference aggregate has identity and supports in-place mutation through
/// setters.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    /// Identity-free, immutable, structurally compared
    Value,
    /// Identity-bearing, mutable in place
    Reference,
}
