//! # aggregen Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits from the aggregen library. Import this module to get quick access
//! to the essential types for runtime aggregate generation.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all aggregen operations
pub use crate::Error;

/// The result type used throughout aggregen
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Central registry and generation entry point
pub use crate::typesystem::GeneratedRegistry;

/// External name resolution
pub use crate::typesystem::{AggregateKind, ClassLoader, StaticLoader};

// ================================================================================================
// Generated Types and Instances
// ================================================================================================

/// The synthesized operation surface
pub use crate::synth::{FieldHandle, GeneratedType, GeneratedTypeRc};

/// Instances and the values that flow through generated operations
pub use crate::synth::{FieldValue, Instance, RefInstance, Value, ValueInstance};

// ================================================================================================
// Descriptors and Layout
// ================================================================================================

/// The parsed field descriptor model
pub use crate::descriptor::{FieldSpec, PrimitiveKind, StorageRequest, TypeRef};

/// Descriptor parsing functions
pub use crate::descriptor::{parse_field_descriptor, parse_field_descriptors};

/// Planned layouts
pub use crate::layout::{ClassPlan, PlannedField, ResolvedStorage, SlotRange};

// ================================================================================================
// Configuration
// ================================================================================================

/// Generation policy knobs
pub use crate::validation::{GeneratorConfig, GeneratorFlags};
