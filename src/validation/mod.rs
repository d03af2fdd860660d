//! Admissibility rules for generated aggregates
//!
//! This module decides whether a requested layout or operation is admissible
//! and reports the correct error kind at the correct stage. Structural rules
//! run at generation time and prevent a type from ever existing; behavioral
//! rules run at operation-invocation time and fail only the triggering call.

mod behavior;
mod config;
mod structural;

pub use behavior::BehaviorValidator;
pub use config::{GeneratorConfig, GeneratorFlags};
pub use structural::StructuralValidator;
