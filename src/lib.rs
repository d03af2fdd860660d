// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # aggregen
//!
//! A runtime generator for aggregate types driven by compact field descriptors.
//! Built in pure Rust, `aggregen` turns descriptor lists such as `"x:I"` or
//! `"st:QPoint2D;:value"` into fully usable types at runtime: it plans a slot
//! layout, synthesizes typed and generic factories, getters, withers, and
//! setters, and publishes the result through a concurrent registry.
//!
//! ## Features
//!
//! - **Descriptor-driven generation** - Compact `name:type[:value]` field
//!   descriptors, no build step and no code generation
//! - **Value and reference aggregates** - Identity-free immutable values with
//!   functional update, or shared mutable cells with pointer identity
//! - **Flattened storage** - Nested value types spliced inline into their
//!   container's slot layout, recursively
//! - **Typed and generic operation surfaces** - Every operation in a concrete
//!   Rust form and a boxed form, observably equivalent
//! - **Precise failure staging** - Structural errors abort generation;
//!   behavioral errors surface only on the invocation that triggers them
//! - **Concurrent registry** - Lock-free lookup with serialized, one-time
//!   generation per name
//!
//! ## Quick Start
//!
//! Add `aggregen` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! aggregen = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use aggregen::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
//! let point = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
//!
//! let p = point.make_value(&[Value::Int32(1), Value::Int32(2)])?;
//! let x = point.field("x")?;
//! assert_eq!(x.get::<i32>(&p)?, 1);
//! # Ok::<(), aggregen::Error>(())
//! ```
//!
//! ### Nested Aggregates
//!
//! ```rust
//! use aggregen::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
//! let point = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
//!
//! // Reference storage: one handle slot per field.
//! let line = registry.generate_value_class("Line2D", &["st:LPoint2D;", "en:LPoint2D;"])?;
//! assert_eq!(line.plan().width(), 2);
//!
//! // Flattened storage: the nested layout is spliced inline.
//! let flat = registry.generate_value_class(
//!     "FlattenedLine2D",
//!     &["st:QPoint2D;:value", "en:QPoint2D;:value"],
//! )?;
//! assert_eq!(flat.plan().width(), 4);
//! # Ok::<(), aggregen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `aggregen` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`descriptor`] - The field descriptor grammar and parser
//! - [`typesystem`] - Named-type resolution and the generated-type registry
//! - [`layout`] - Slot layout planning for generated aggregates
//! - [`synth`] - The synthesized operation surface and instance storage
//! - [`validation`] - Structural and behavioral admissibility rules
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with the failure stage
//! encoded in the error kind:
//!
//! ```rust
//! use aggregen::{Error, prelude::*};
//! use std::sync::Arc;
//!
//! let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
//! match registry.generate_value_class("Bad", &["p:QAbsent;:value"]) {
//!     Err(Error::ClassNotFound(name)) => assert_eq!(name, "Absent"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the aggregen library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use aggregen::prelude::*;
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// let point = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
/// # Ok::<(), aggregen::Error>(())
/// ```
pub mod prelude;

/// Field descriptor grammar, parsing, and the parsed field model.
///
/// A descriptor is `name:type` with an optional `:value` suffix requesting
/// default-value semantics. Types are single-letter primitive codes
/// (`Z B S C I J F D`), `L<name>;` for reference storage of a named type, or
/// `Q<name>;` for flattened storage of a named value type.
///
/// # Key Types
///
/// - [`descriptor::FieldSpec`] - One parsed field
/// - [`descriptor::TypeRef`] / [`descriptor::StorageRequest`] - Type and
///   storage halves of a descriptor
/// - [`descriptor::PrimitiveKind`] - The eight primitive kinds and their widths
///
/// # Main Functions
///
/// - [`descriptor::parse_field_descriptor`] - Parse a single descriptor
/// - [`descriptor::parse_field_descriptors`] - Parse a whole list, fail-fast
pub mod descriptor;

/// Slot layout planning for generated aggregates.
///
/// The planner assigns each field a contiguous range of 32-bit storage units:
/// one unit for narrow primitives and reference handles, two for wide
/// primitives, and the nested type's full recursive width for flattened value
/// fields.
///
/// # Key Types
///
/// - [`layout::ClassPlan`] - The finished, immutable layout
/// - [`layout::LayoutPlanner`] - The single-pass planning algorithm
/// - [`layout::ResolvedStorage`] / [`layout::SlotRange`] - Per-field records
pub mod layout;

/// The synthesized operation surface and instance storage.
///
/// # Key Types
///
/// - [`GeneratedType`] - A generated type and its factories
/// - [`FieldHandle`] - Per-field getters, withers, and setters
/// - [`Instance`], [`ValueInstance`], [`RefInstance`] - Instance storage
/// - [`Value`] / [`FieldValue`] - Boxed values and the typed bridge
pub mod synth;

/// Named-type resolution and the generated-type registry.
///
/// # Key Types
///
/// - [`GeneratedRegistry`] - The generation entry point and name index
/// - [`typesystem::ClassLoader`] / [`typesystem::StaticLoader`] - External
///   resolution of names the registry does not own
/// - [`typesystem::TypeResolver`] - Memoizing per-plan name resolution
/// - [`typesystem::AggregateKind`] - Value versus reference
pub mod typesystem;

/// Structural and behavioral admissibility rules.
///
/// Structural rules run at generation time and prevent a type from ever
/// existing; behavioral rules run at invocation time and fail only the
/// triggering call. Policy knobs live in [`validation::GeneratorConfig`].
pub mod validation;

/// `aggregen` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. This is used consistently throughout the crate for all
/// fallible operations.
///
/// # Examples
///
/// ```rust
/// use aggregen::{prelude::*, Result};
///
/// fn point_type(registry: &GeneratedRegistry) -> Result<GeneratedTypeRc> {
///     registry.generate_value_class("Point2D", &["x:I", "y:I"])
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `aggregen` Error type
///
/// The main error type for all operations in this crate. Structural variants
/// are raised at generation time, behavioral variants at operation-invocation
/// time.
///
/// # Examples
///
/// ```rust
/// use aggregen::{Error, prelude::*};
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// match registry.generate_value_class("Bad", &["x:I", "x:I"]) {
///     Err(Error::DuplicateField(name)) => assert_eq!(name, "x"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;

/// Main entry point for generating aggregate types.
///
/// See [`typesystem::GeneratedRegistry`] for the generation pipeline and name
/// index.
///
/// # Example
///
/// ```rust
/// use aggregen::{GeneratedRegistry, typesystem::StaticLoader};
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// let ty = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
/// assert_eq!(ty.plan().width(), 2);
/// # Ok::<(), aggregen::Error>(())
/// ```
pub use typesystem::GeneratedRegistry;

/// The synthesized type surface and the values that flow through it.
///
/// - [`GeneratedType`] - Factories and field lookup for one generated type
/// - [`FieldHandle`] - Getter, wither, and setter entry points for one field
/// - [`Instance`] - A value or reference aggregate instance
/// - [`Value`] - The uniform boxed value representation
/// - [`FieldValue`] - The typed narrowing bridge
pub use synth::{FieldHandle, FieldValue, GeneratedType, GeneratedTypeRc, Instance, Value};
