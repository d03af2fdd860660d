//! Synthesis of the runtime operation surface for generated aggregates.
//!
//! Once planning succeeds, synthesis wires the plan into a [`GeneratedType`]:
//! typed and generic factories on the type, plus per-field [`FieldHandle`]
//! accessors carrying getters, withers, and setters. Values cross the surface
//! either as concrete Rust types (through [`FieldValue`]) or boxed as
//! [`Value`]; the two forms are observably equivalent.
//!
//! # Key Components
//!
//! - [`Value`] / [`FieldValue`]: Boxed representation and the typed bridge
//! - [`Instance`] / [`ValueInstance`] / [`RefInstance`]: Instance storage
//! - [`GeneratedType`] / [`FieldHandle`]: The synthesized operation surface

mod generated;
mod instance;
mod value;

pub use generated::{FieldHandle, GeneratedType, GeneratedTypeRc};
pub use instance::{Instance, RefInstance, ValueInstance};
pub use value::{FieldValue, Value};

pub(crate) use value::Slot;
